//! # Inventory
//!
//! Stock items, their valuation and turning a sale of stock into a
//! [`SaleRecord`].
//!
//! ## Recording a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sell_from_stock(items, "1704103200000", 3, now)                        │
//! │       │                                                                 │
//! │       ├── no item with that id?     → CoreError::ItemNotFound           │
//! │       ├── quantity <= 0?            → ValidationError::MustBePositive   │
//! │       ├── quantity > stock?         → CoreError::InsufficientStock      │
//! │       │                                                                 │
//! │       ├── stock -= quantity                                             │
//! │       └── SaleRecord {                                                  │
//! │             totalCost  = buyPrice  × qty                                │
//! │             totalSale  = sellPrice × qty                                │
//! │             profitLoss = (sellPrice − buyPrice) × qty                   │
//! │           }                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::normalize::{lenient_money, lenient_quantity, total_quantity};
use crate::types::{RecordId, SaleRecord};
use crate::validation::{
    validate_description, validate_item_name, validate_price, validate_sale_quantity,
    validate_stock_quantity,
};

// =============================================================================
// Inventory Item
// =============================================================================

/// An item held in stock (`inventoryItems`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: RecordId,
    pub name: String,
    pub buy_price: Money,
    pub sell_price: Money,
    pub quantity: i64,
    #[serde(default)]
    pub description: String,
}

impl InventoryItem {
    /// Creates a validated item. The id is the creation time in milliseconds.
    pub fn new(
        name: &str,
        buy_price: Money,
        sell_price: Money,
        quantity: i64,
        description: &str,
        now: &DateTime<Utc>,
    ) -> CoreResult<Self> {
        validate_item_name(name)?;
        validate_price("buyPrice", buy_price)?;
        validate_price("sellPrice", sell_price)?;
        validate_stock_quantity(quantity)?;
        validate_description(description)?;

        Ok(InventoryItem {
            id: RecordId::from_millis(now.timestamp_millis()),
            name: name.trim().to_string(),
            buy_price,
            sell_price,
            quantity,
            description: description.to_string(),
        })
    }

    /// Reads a stored item, tolerating missing or mistyped fields.
    ///
    /// Returns `None` only for elements that are not objects.
    pub fn from_stored(value: &Value) -> Option<Self> {
        let fields = value.as_object()?;
        let field = |key: &str| fields.get(key).filter(|v| !v.is_null());

        Some(InventoryItem {
            id: field("id")
                .and_then(RecordId::from_value)
                .unwrap_or_else(RecordId::synthesize),
            name: field("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            buy_price: field("buyPrice").and_then(lenient_money).unwrap_or_default(),
            sell_price: field("sellPrice").and_then(lenient_money).unwrap_or_default(),
            quantity: field("quantity").and_then(lenient_quantity).unwrap_or(0),
            description: field("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
    }

    /// Margin per unit.
    pub fn unit_margin(&self) -> Money {
        self.sell_price - self.buy_price
    }

    /// What the current stock cost to buy.
    pub fn investment(&self) -> Money {
        self.buy_price * self.quantity
    }

    /// What the current stock sells for.
    pub fn retail_value(&self) -> Money {
        self.sell_price * self.quantity
    }

    /// `(sellPrice − buyPrice) × quantity`
    pub fn potential_profit(&self) -> Money {
        self.unit_margin() * self.quantity
    }
}

// =============================================================================
// Valuation
// =============================================================================

/// Totals over the whole inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryValuation {
    pub item_count: usize,
    pub total_units: i64,
    pub investment: Money,
    pub retail_value: Money,
    pub potential_profit: Money,
}

impl InventoryValuation {
    pub fn from_items(items: &[InventoryItem]) -> Self {
        InventoryValuation {
            item_count: items.len(),
            total_units: total_quantity(items.iter().map(|i| i.quantity)),
            investment: items.iter().map(InventoryItem::investment).sum(),
            retail_value: items.iter().map(InventoryItem::retail_value).sum(),
            potential_profit: items.iter().map(InventoryItem::potential_profit).sum(),
        }
    }
}

// =============================================================================
// Sales From Stock
// =============================================================================

/// Builds the sale for selling `quantity` units of `item` at `now`.
///
/// Does not touch the item's stock; see [`sell_from_stock`].
pub fn record_sale(item: &InventoryItem, quantity: i64, now: &DateTime<Utc>) -> CoreResult<SaleRecord> {
    validate_sale_quantity(quantity)?;
    if quantity > item.quantity {
        return Err(CoreError::InsufficientStock {
            item: item.name.clone(),
            available: item.quantity,
            requested: quantity,
        });
    }

    let mut extra = Map::new();
    extra.insert("buyPrice".to_string(), units_value(item.buy_price));
    extra.insert("salePrice".to_string(), units_value(item.sell_price));

    Ok(SaleRecord {
        id: RecordId::from_millis(now.timestamp_millis()),
        item_name: item.name.clone(),
        quantity,
        total_cost: item.buy_price * quantity,
        total_sale: item.sell_price * quantity,
        profit_loss: item.unit_margin() * quantity,
        sale_date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        extra,
    })
}

/// Sells from the item with id `key`, decrementing its stock.
pub fn sell_from_stock(
    items: &mut [InventoryItem],
    key: &str,
    quantity: i64,
    now: &DateTime<Utc>,
) -> CoreResult<SaleRecord> {
    let item = items
        .iter_mut()
        .find(|item| item.id.matches(key))
        .ok_or_else(|| CoreError::ItemNotFound(key.to_string()))?;

    let sale = record_sale(item, quantity, now)?;
    item.quantity -= quantity;
    Ok(sale)
}

/// Removes the item with id `key` and returns it.
pub fn remove_item(items: &mut Vec<InventoryItem>, key: &str) -> CoreResult<InventoryItem> {
    let position = items
        .iter()
        .position(|item| item.id.matches(key))
        .ok_or_else(|| CoreError::ItemNotFound(key.to_string()))?;
    Ok(items.remove(position))
}

/// Amounts are stored as plain currency units, like the rest of the document.
fn units_value(amount: Money) -> Value {
    if amount.minor() == 0 {
        Value::from(amount.major())
    } else {
        Value::from(amount.as_units())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
    }

    fn soap(quantity: i64) -> InventoryItem {
        InventoryItem::new(
            "Soap",
            Money::from_cents(5_000),
            Money::from_cents(7_500),
            quantity,
            "Bar soap",
            &now(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_item_validates() {
        let item = soap(10);
        assert_eq!(item.id, RecordId::from_millis(1704103200000));

        let err = InventoryItem::new("", Money::zero(), Money::zero(), 1, "", &now()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::Required { .. })));
        assert!(InventoryItem::new("X", Money::zero(), Money::zero(), -1, "", &now()).is_err());
    }

    #[test]
    fn test_item_figures() {
        let item = soap(4);
        assert_eq!(item.investment(), Money::from_cents(20_000));
        assert_eq!(item.retail_value(), Money::from_cents(30_000));
        assert_eq!(item.potential_profit(), Money::from_cents(10_000));
    }

    #[test]
    fn test_valuation_totals() {
        let mut loss_leader = soap(2);
        loss_leader.sell_price = Money::from_cents(4_000);
        let valuation = InventoryValuation::from_items(&[soap(4), loss_leader]);
        assert_eq!(valuation.item_count, 2);
        assert_eq!(valuation.total_units, 6);
        assert_eq!(valuation.investment, Money::from_cents(30_000));
        assert_eq!(valuation.retail_value, Money::from_cents(38_000));
        assert_eq!(valuation.potential_profit, Money::from_cents(8_000));
    }

    #[test]
    fn test_from_stored_is_lenient() {
        let item = InventoryItem::from_stored(&json!({
            "id": 5, "name": "Rice", "buyPrice": null, "sellPrice": "120", "quantity": 3
        }))
        .unwrap();
        assert_eq!(item.buy_price, Money::zero());
        assert_eq!(item.sell_price, Money::from_cents(12_000));
        assert_eq!(item.description, "");
        assert!(InventoryItem::from_stored(&json!("junk")).is_none());
    }

    #[test]
    fn test_record_sale_shape() {
        let sale = record_sale(&soap(10), 3, &now()).unwrap();
        assert_eq!(sale.quantity, 3);
        assert_eq!(sale.total_cost, Money::from_cents(15_000));
        assert_eq!(sale.total_sale, Money::from_cents(22_500));
        assert_eq!(sale.profit_loss, Money::from_cents(7_500));
        assert_eq!(sale.sale_date, "2024-01-01T10:00:00.000Z");
        assert_eq!(sale.extra.get("buyPrice"), Some(&json!(50)));
        assert_eq!(sale.extra.get("salePrice"), Some(&json!(75)));
    }

    #[test]
    fn test_sell_from_stock_decrements() {
        let mut items = vec![soap(5)];
        let key = items[0].id.to_string();

        sell_from_stock(&mut items, &key, 2, &now()).unwrap();
        assert_eq!(items[0].quantity, 3);

        let err = sell_from_stock(&mut items, &key, 4, &now()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock { available: 3, requested: 4, .. }
        ));
        assert_eq!(items[0].quantity, 3);

        assert!(sell_from_stock(&mut items, &key, 0, &now()).is_err());
        assert!(matches!(
            sell_from_stock(&mut items, "nope", 1, &now()),
            Err(CoreError::ItemNotFound(_))
        ));
    }

    #[test]
    fn test_remove_item() {
        let mut items = vec![soap(1)];
        let key = items[0].id.to_string();
        assert!(remove_item(&mut items, "missing").is_err());
        assert_eq!(remove_item(&mut items, &key).unwrap().name, "Soap");
        assert!(items.is_empty());
    }
}
