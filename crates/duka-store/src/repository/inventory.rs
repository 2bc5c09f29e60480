//! # Inventory Repository
//!
//! Reads and writes the `inventoryItems` document. Selling from stock also
//! appends to `salesData`, so this repository holds a [`SalesRepository`]
//! over the same storage.

use chrono::Utc;
use duka_core::inventory::{remove_item, sell_from_stock};
use duka_core::validation::validate_record_key;
use duka_core::{CoreError, InventoryItem, RecordId, SaleRecord, INVENTORY_KEY};
use tracing::{debug, info, warn};

use super::{read_array, write_json, ReadMode, SalesRepository};
use crate::error::{DbError, DbResult};
use crate::storage::Storage;

/// Repository for stock items.
#[derive(Debug, Clone)]
pub struct InventoryRepository<S> {
    storage: S,
    sales: SalesRepository<S>,
}

impl<S: Storage + Clone> InventoryRepository<S> {
    /// Creates a new InventoryRepository.
    pub fn new(storage: S) -> Self {
        let sales = SalesRepository::new(storage.clone());
        InventoryRepository { storage, sales }
    }

    /// Loads every item. Elements that are not objects are skipped.
    pub async fn load_all(&self) -> DbResult<Vec<InventoryItem>> {
        let raw = read_array(&self.storage, INVENTORY_KEY, ReadMode::Lenient).await?;
        let total = raw.len();
        let items: Vec<InventoryItem> = raw.iter().filter_map(InventoryItem::from_stored).collect();

        if items.len() < total {
            warn!(
                skipped = total - items.len(),
                "Skipped unreadable inventory entries"
            );
        }
        debug!(count = items.len(), "Loaded inventory");
        Ok(items)
    }

    /// Loads every item before a write.
    ///
    /// ## Errors
    /// `DbError::CorruptDocument` if any entry is unreadable, so that a write
    /// never drops it.
    async fn load_for_write(&self) -> DbResult<Vec<InventoryItem>> {
        let raw = read_array(&self.storage, INVENTORY_KEY, ReadMode::Strict).await?;
        let items: Vec<InventoryItem> = raw.iter().filter_map(InventoryItem::from_stored).collect();
        if items.len() < raw.len() {
            return Err(DbError::corrupt(
                INVENTORY_KEY,
                format!("{} entries are not items", raw.len() - items.len()),
            ));
        }
        Ok(items)
    }

    /// Replaces the inventory.
    pub async fn save_all(&self, items: &[InventoryItem]) -> DbResult<()> {
        debug!(count = items.len(), "Saving inventory");
        write_json(&self.storage, INVENTORY_KEY, items).await
    }

    /// Adds an item to the end of the inventory.
    ///
    /// A millisecond id already in use is moved to the next free millisecond.
    pub async fn add(&self, mut item: InventoryItem) -> DbResult<InventoryItem> {
        let mut items = self.load_for_write().await?;

        item.id = free_id(&items, item.id);
        items.push(item.clone());
        self.save_all(&items).await?;

        info!(id = %item.id, name = %item.name, quantity = item.quantity, "Added inventory item");
        Ok(item)
    }

    /// Sells `quantity` units of the item with id `key`.
    ///
    /// The sale is appended to the sales collection and the item's stock
    /// is reduced.
    ///
    /// ## Errors
    /// - `CoreError::ItemNotFound` if no item has that id
    /// - `CoreError::InsufficientStock` if the stock is too low
    pub async fn record_sale(&self, key: &str, quantity: i64) -> DbResult<SaleRecord> {
        let key = validate_record_key(key).map_err(CoreError::from)?;

        let mut items = self.load_for_write().await?;

        let sale = sell_from_stock(&mut items, key, quantity, &Utc::now())?;
        self.sales.record(&sale).await?;
        self.save_all(&items).await?;

        Ok(sale)
    }

    /// Deletes the item with id `key` and returns it.
    pub async fn delete(&self, key: &str) -> DbResult<InventoryItem> {
        let key = validate_record_key(key).map_err(CoreError::from)?;

        let mut items = self.load_for_write().await?;

        let removed = remove_item(&mut items, key)?;
        self.save_all(&items).await?;

        info!(id = %removed.id, name = %removed.name, "Deleted inventory item");
        Ok(removed)
    }
}

/// `id`, or the next unused millisecond after it.
fn free_id(items: &[InventoryItem], id: RecordId) -> RecordId {
    let taken = |candidate: &RecordId| items.iter().any(|item| &item.id == candidate);
    if !taken(&id) {
        return id;
    }

    let RecordId::Number(number) = &id else {
        return RecordId::synthesize();
    };
    let Some(mut millis) = number.as_i64() else {
        return RecordId::synthesize();
    };
    loop {
        millis += 1;
        let candidate = RecordId::from_millis(millis);
        if !taken(&candidate) {
            return candidate;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::storage::MemoryStorage;
    use chrono::TimeZone;
    use duka_core::{InventoryValuation, Money, SALES_KEY};

    fn item(name: &str, buy: i64, sell: i64, quantity: i64, millis: i64) -> InventoryItem {
        let at = Utc.timestamp_millis_opt(millis).unwrap();
        InventoryItem::new(
            name,
            Money::from_cents(buy),
            Money::from_cents(sell),
            quantity,
            "",
            &at,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_add_and_load() {
        let repo = InventoryRepository::new(MemoryStorage::new());
        repo.add(item("Soap", 5_000, 7_500, 10, 1)).await.unwrap();
        repo.add(item("Rice", 10_000, 12_000, 4, 2)).await.unwrap();

        let items = repo.load_all().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].name, "Rice");

        let valuation = InventoryValuation::from_items(&items);
        assert_eq!(valuation.total_units, 14);
        assert_eq!(valuation.investment, Money::from_cents(90_000));
    }

    #[tokio::test]
    async fn test_add_moves_clashing_ids() {
        let repo = InventoryRepository::new(MemoryStorage::new());
        repo.add(item("Soap", 5_000, 7_500, 1, 100)).await.unwrap();
        let second = repo.add(item("Salt", 4_000, 5_500, 1, 100)).await.unwrap();

        assert_eq!(second.id, RecordId::from_millis(101));
        assert!(repo.delete("100").await.is_ok());
        assert!(repo.delete("101").await.is_ok());
    }

    #[tokio::test]
    async fn test_load_skips_non_objects() {
        let storage = MemoryStorage::with_items([(
            INVENTORY_KEY,
            r#"[{"id": 1, "name": "Soap", "buyPrice": "50", "sellPrice": 75, "quantity": 3}, 7]"#,
        )])
        .await;
        let items = InventoryRepository::new(storage).load_all().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].buy_price, Money::from_cents(5_000));
    }

    #[tokio::test]
    async fn test_writes_refuse_unreadable_entries() {
        let doc = r#"[{"id": 1, "name": "Soap", "buyPrice": 50, "sellPrice": 75, "quantity": 3}, 7]"#;
        let storage = MemoryStorage::with_items([(INVENTORY_KEY, doc)]).await;
        let repo = InventoryRepository::new(storage.clone());

        assert!(matches!(
            repo.add(item("Rice", 10_000, 12_000, 4, 2)).await,
            Err(DbError::CorruptDocument { .. })
        ));
        assert!(matches!(
            repo.record_sale("1", 1).await,
            Err(DbError::CorruptDocument { .. })
        ));
        assert!(matches!(repo.delete("1").await, Err(DbError::CorruptDocument { .. })));

        assert_eq!(storage.get_item(INVENTORY_KEY).await.unwrap().as_deref(), Some(doc));
        assert!(storage.get_item(SALES_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_record_sale_appends_and_decrements() {
        let storage = MemoryStorage::new();
        let repo = InventoryRepository::new(storage.clone());
        repo.add(item("Soap", 5_000, 7_500, 10, 1)).await.unwrap();

        let sale = repo.record_sale("1", 3).await.unwrap();
        assert_eq!(sale.total_cost, Money::from_cents(15_000));
        assert_eq!(sale.total_sale, Money::from_cents(22_500));
        assert_eq!(sale.profit_loss, Money::from_cents(7_500));

        assert_eq!(repo.load_all().await.unwrap()[0].quantity, 7);
        let sales = SalesRepository::new(storage.clone()).load_all().await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].item_name, "Soap");
        assert!(storage.get_item(SALES_KEY).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_record_sale_rejects_overselling() {
        let storage = MemoryStorage::new();
        let repo = InventoryRepository::new(storage.clone());
        repo.add(item("Soap", 5_000, 7_500, 2, 1)).await.unwrap();

        let err = repo.record_sale("1", 5).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::InsufficientStock { available: 2, requested: 5, .. })
        ));
        // Nothing was written
        assert_eq!(repo.load_all().await.unwrap()[0].quantity, 2);
        assert!(storage.get_item(SALES_KEY).await.unwrap().is_none());

        assert!(matches!(
            repo.record_sale("99", 1).await,
            Err(DbError::Core(CoreError::ItemNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_delete_on_sqlite() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.inventory();
        repo.add(item("Soap", 5_000, 7_500, 2, 1)).await.unwrap();
        repo.add(item("Rice", 10_000, 12_000, 4, 2)).await.unwrap();

        let removed = repo.delete("1").await.unwrap();
        assert_eq!(removed.name, "Soap");
        let items = repo.load_all().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Rice");

        assert!(matches!(
            repo.delete("1").await,
            Err(DbError::Core(CoreError::ItemNotFound(_)))
        ));
    }
}
