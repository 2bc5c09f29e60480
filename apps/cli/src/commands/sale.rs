//! `duka sale`: list, record from stock, delete.

use std::io::Write;
use tracing::info;

use super::{emit, emit_json, Context};
use crate::cli::SaleCommand;
use crate::error::AppResult;

pub async fn run<W: Write>(ctx: &Context, action: SaleCommand, out: &mut W) -> AppResult<()> {
    match action {
        SaleCommand::List { json } => {
            let sales = ctx.db.sales().load_all().await?;
            if json {
                emit_json(out, &sales)
            } else {
                emit(out, &ctx.renderer().sales(&sales))
            }
        }
        SaleCommand::Record { item, quantity } => {
            let sale = ctx.db.inventory().record_sale(&item, quantity).await?;
            info!(id = %sale.id, "Sale recorded from stock");
            emit(
                out,
                &format!(
                    "Recorded sale {}: {} x {} for {} ({})\n",
                    sale.id,
                    sale.quantity,
                    sale.item_name,
                    ctx.config.currency().format(sale.total_sale),
                    sale.status()
                ),
            )
        }
        SaleCommand::Delete { id } => {
            let removed = ctx.db.sales().delete(&id).await?;
            emit(
                out,
                &format!("Deleted sale {} ({})\n", removed.id, removed.item_name),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{context, run, store_sales};
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_record_from_stock_then_delete() {
        let ctx = context().await;
        let added = run(
            &ctx,
            &["inventory", "add", "--name", "Soap", "--buy", "50", "--sell", "75", "--quantity", "10"],
        )
        .await
        .unwrap();
        let id = added
            .split_whitespace()
            .nth(2)
            .unwrap()
            .to_string();

        let text = run(&ctx, &["sale", "record", "--item", &id, "--quantity", "3"])
            .await
            .unwrap();
        assert!(text.contains("3 x Soap for Ksh 225.00 (Profit)"));

        let sales = ctx.db.sales().load_all().await.unwrap();
        assert_eq!(sales.len(), 1);
        let sale_id = sales[0].id.to_string();

        let listed = run(&ctx, &["sale", "list"]).await.unwrap();
        assert!(listed.contains("Soap"));

        run(&ctx, &["sale", "delete", &sale_id]).await.unwrap();
        assert!(ctx.db.sales().load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_sale() {
        let ctx = context().await;
        store_sales(&ctx, r#"[{"id": 1, "itemName": "Soap"}]"#).await;

        let err = run(&ctx, &["sale", "delete", "99"]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_record_more_than_stock() {
        let ctx = context().await;
        let added = run(
            &ctx,
            &["inventory", "add", "--name", "Salt", "--buy", "40", "--sell", "55", "--quantity", "1"],
        )
        .await
        .unwrap();
        let id = added.split_whitespace().nth(2).unwrap().to_string();

        let err = run(&ctx, &["sale", "record", "--item", &id, "--quantity", "2"])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
    }
}
