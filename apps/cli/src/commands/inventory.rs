//! `duka inventory`: list, add, delete.

use chrono::Utc;
use duka_core::validation::parse_price;
use duka_core::InventoryItem;
use std::io::Write;

use super::{emit, emit_json, Context};
use crate::cli::InventoryCommand;
use crate::error::AppResult;

pub async fn run<W: Write>(ctx: &Context, action: InventoryCommand, out: &mut W) -> AppResult<()> {
    match action {
        InventoryCommand::List { json } => {
            let items = ctx.db.inventory().load_all().await?;
            if json {
                emit_json(out, &items)
            } else {
                emit(out, &ctx.renderer().inventory(&items))
            }
        }
        InventoryCommand::Add {
            name,
            buy,
            sell,
            quantity,
            description,
        } => {
            let buy_price = parse_price("buyPrice", &buy)?;
            let sell_price = parse_price("sellPrice", &sell)?;
            let item = InventoryItem::new(
                &name,
                buy_price,
                sell_price,
                quantity,
                &description,
                &Utc::now(),
            )?;

            let item = ctx.db.inventory().add(item).await?;
            emit(
                out,
                &format!(
                    "Added item {} ({}, {} in stock)\n",
                    item.id, item.name, item.quantity
                ),
            )
        }
        InventoryCommand::Delete { id } => {
            let removed = ctx.db.inventory().delete(&id).await?;
            emit(out, &format!("Deleted item {} ({})\n", removed.id, removed.name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{context, run};
    use crate::error::ErrorCode;
    use serde_json::Value;

    #[tokio::test]
    async fn test_add_list_delete() {
        let ctx = context().await;
        let added = run(
            &ctx,
            &["inventory", "add", "--name", "Rice", "--buy", "100", "--sell", "120.50", "--quantity", "4"],
        )
        .await
        .unwrap();
        assert!(added.ends_with("(Rice, 4 in stock)\n"));
        let id = added.split_whitespace().nth(2).unwrap().to_string();

        let listed = run(&ctx, &["inventory", "list"]).await.unwrap();
        assert!(listed.contains("Rice"));
        assert!(listed.contains("Investment        Ksh 400.00"));
        assert!(listed.contains("Retail Value      Ksh 482.00"));

        let json: Value =
            serde_json::from_str(&run(&ctx, &["inventory", "list", "--json"]).await.unwrap()).unwrap();
        assert_eq!(json[0]["name"], "Rice");

        let deleted = run(&ctx, &["inventory", "delete", &id]).await.unwrap();
        assert!(deleted.contains("Deleted item"));
        let listed = run(&ctx, &["inventory", "list"]).await.unwrap();
        assert!(listed.contains("No inventory items"));
    }

    #[tokio::test]
    async fn test_add_rejects_bad_prices() {
        let ctx = context().await;
        let err = run(
            &ctx,
            &["inventory", "add", "--name", "Rice", "--buy", "cheap", "--sell", "120", "--quantity", "4"],
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(ctx.db.inventory().load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_rejects_blank_name() {
        let ctx = context().await;
        let err = run(
            &ctx,
            &["inventory", "add", "--name", " ", "--buy", "1", "--sell", "2", "--quantity", "1"],
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_delete_unknown_item() {
        let ctx = context().await;
        let err = run(&ctx, &["inventory", "delete", "42"]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
