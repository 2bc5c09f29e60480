//! `duka data`: JSON backup export and import.

use duka_core::{export_file_name, ImportMode};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{emit, Context};
use crate::cli::DataCommand;
use crate::error::{AppError, AppResult};

/// `--out -` writes the document to standard output.
const STDOUT_MARKER: &str = "-";

pub async fn run<W: Write>(ctx: &Context, action: DataCommand, out: &mut W) -> AppResult<()> {
    match action {
        DataCommand::Export { out: target } => export(ctx, target, out).await,
        DataCommand::Import { file, mode } => import(ctx, &file, mode, out).await,
    }
}

async fn export<W: Write>(ctx: &Context, target: Option<PathBuf>, out: &mut W) -> AppResult<()> {
    let document = ctx.db.sales().export().await?;

    let path = match target {
        Some(path) if path.as_os_str() == STDOUT_MARKER => {
            return emit(out, &format!("{}\n", document));
        }
        Some(path) => path,
        None => PathBuf::from(export_file_name(ctx.now().date_naive())),
    };

    fs::write(&path, document).map_err(|e| AppError::io(&path, e))?;
    info!(path = %path.display(), "Wrote sales backup");
    emit(out, &format!("Exported sales to {}\n", path.display()))
}

async fn import<W: Write>(ctx: &Context, file: &Path, mode: ImportMode, out: &mut W) -> AppResult<()> {
    let text = fs::read_to_string(file).map_err(|e| AppError::io(file, e))?;
    let outcome = ctx.db.sales().import(&text, mode).await?;

    let mut message = format!(
        "Imported {} of {} sales ({})",
        outcome.added, outcome.received, outcome.mode
    );
    if outcome.skipped > 0 {
        message.push_str(&format!(", {} already stored", outcome.skipped));
    }
    message.push_str(&format!(". {} sales in total\n", outcome.total));
    emit(out, &message)
}

#[cfg(test)]
mod tests {
    use super::super::testing::{context, run, store_sales};
    use crate::error::ErrorCode;
    use serde_json::Value;
    use std::fs;

    const STORED: &str = r#"[
        {"id": 1, "itemName": "Soap", "quantity": 1, "totalSale": 75, "saleDate": "2024-01-01T10:00:00.000Z"},
        {"id": 2, "itemName": "Rice", "quantity": 2, "totalSale": 240, "saleDate": "2024-01-02T10:00:00.000Z"}
    ]"#;

    #[tokio::test]
    async fn test_export_to_stdout() {
        let ctx = context().await;
        store_sales(&ctx, STORED).await;

        let text = run(&ctx, &["data", "export", "--out", "-"]).await.unwrap();
        let doc: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc.as_array().unwrap().len(), 2);
        assert_eq!(doc[1]["itemName"], "Rice");
    }

    #[tokio::test]
    async fn test_export_to_file() {
        let ctx = context().await;
        store_sales(&ctx, STORED).await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");

        let text = run(&ctx, &["data", "export", "--out", path.to_str().unwrap()])
            .await
            .unwrap();
        assert!(text.starts_with("Exported sales to"));

        let doc: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc[0]["id"], 1);
    }

    #[tokio::test]
    async fn test_merge_import_counts() {
        let ctx = context().await;
        store_sales(&ctx, STORED).await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("incoming.json");
        fs::write(
            &path,
            r#"[
                {"id": 2, "itemName": "Rice", "quantity": 2, "totalSale": 240},
                {"id": 3, "itemName": "Salt", "quantity": 1, "totalSale": 55}
            ]"#,
        )
        .unwrap();

        let text = run(&ctx, &["data", "import", path.to_str().unwrap(), "--mode", "merge"])
            .await
            .unwrap();
        assert_eq!(text, "Imported 1 of 2 sales (merge), 1 already stored. 3 sales in total\n");
    }

    #[tokio::test]
    async fn test_invalid_import_keeps_store() {
        let ctx = context().await;
        store_sales(&ctx, STORED).await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, r#"{"salesData": []}"#).unwrap();

        let err = run(&ctx, &["data", "import", path.to_str().unwrap(), "--mode", "replace"])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidImport);
        assert_eq!(ctx.db.sales().load_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_import_missing_file() {
        let ctx = context().await;
        let err = run(&ctx, &["data", "import", "/nonexistent/duka.json", "--mode", "merge"])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Internal);
    }
}
