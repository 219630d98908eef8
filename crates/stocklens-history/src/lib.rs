use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use stocklens_core::{HistoryStore, ItemStore, StockItem, Transaction};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory item and history store backing the gateway and tests.
#[derive(Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<Uuid, StockItem>>,
    histories: RwLock<HashMap<Uuid, Vec<Transaction>>>,
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn upsert(&self, item: StockItem) -> anyhow::Result<StockItem> {
        let mut items = self.items.write().await;
        items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn fetch(&self, item_id: Uuid) -> anyhow::Result<Option<StockItem>> {
        Ok(self.items.read().await.get(&item_id).cloned())
    }

    async fn list(&self) -> anyhow::Result<Vec<StockItem>> {
        let items = self.items.read().await;
        let mut all: Vec<StockItem> = items.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }
}

#[async_trait]
impl HistoryStore for MemoryStore {
    async fn record(
        &self,
        item_id: Uuid,
        transaction: Transaction,
    ) -> anyhow::Result<Transaction> {
        // Stock-moving transactions adjust the item's on-hand quantity;
        // metadata transactions leave it untouched. Quantity never goes
        // below zero, matching how the surrounding application releases
        // reservations.
        if transaction.kind.moves_stock() {
            let delta = transaction.change_amount.trunc().to_i64().unwrap_or(0);
            let mut items = self.items.write().await;
            if let Some(item) = items.get_mut(&item_id) {
                item.quantity = (item.quantity + delta).max(0);
            }
        }

        let mut histories = self.histories.write().await;
        histories
            .entry(item_id)
            .or_default()
            .push(transaction.clone());

        Ok(transaction)
    }

    async fn history(&self, item_id: Uuid) -> anyhow::Result<Vec<Transaction>> {
        let histories = self.histories.read().await;
        Ok(histories.get(&item_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use stocklens_core::TransactionType;

    fn item(quantity: i64) -> StockItem {
        StockItem {
            id: Uuid::new_v4(),
            name: "Pallet wrap".to_string(),
            cost_price: None,
            quantity,
            low_stock_threshold: 10,
            critical_stock_threshold: 3,
        }
    }

    fn transaction(kind: TransactionType, change_amount: i64) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            kind,
            change_amount: Decimal::from(change_amount),
            cost_price: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn recording_stock_movements_adjusts_quantity() {
        let store = MemoryStore::default();
        let item = store.upsert(item(5)).await.unwrap();

        store
            .record(item.id, transaction(TransactionType::In, 10))
            .await
            .unwrap();
        store
            .record(item.id, transaction(TransactionType::Out, -4))
            .await
            .unwrap();

        let stored = store.fetch(item.id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 11);
    }

    #[tokio::test]
    async fn quantity_clamps_at_zero() {
        let store = MemoryStore::default();
        let item = store.upsert(item(2)).await.unwrap();

        store
            .record(item.id, transaction(TransactionType::Out, -9))
            .await
            .unwrap();

        let stored = store.fetch(item.id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 0);
    }

    #[tokio::test]
    async fn metadata_transactions_leave_quantity_untouched() {
        let store = MemoryStore::default();
        let item = store.upsert(item(7)).await.unwrap();

        store
            .record(item.id, transaction(TransactionType::AttributeChange, 3))
            .await
            .unwrap();
        store
            .record(item.id, transaction(TransactionType::Archive, -3))
            .await
            .unwrap();

        let stored = store.fetch(item.id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 7);
    }

    #[tokio::test]
    async fn history_preserves_insertion_order() {
        let store = MemoryStore::default();
        let item = store.upsert(item(0)).await.unwrap();

        for amount in [1, 2, 3] {
            store
                .record(item.id, transaction(TransactionType::In, amount))
                .await
                .unwrap();
        }

        let history = store.history(item.id).await.unwrap();
        let amounts: Vec<Decimal> = history.iter().map(|tx| tx.change_amount).collect();
        assert_eq!(
            amounts,
            vec![Decimal::from(1), Decimal::from(2), Decimal::from(3)]
        );
    }

    #[tokio::test]
    async fn unknown_item_reads_are_empty_not_errors() {
        let store = MemoryStore::default();
        assert!(store.fetch(Uuid::new_v4()).await.unwrap().is_none());
        assert!(store.history(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_is_sorted_by_name() {
        let store = MemoryStore::default();
        for name in ["Zip ties", "Anchor bolts", "Mesh tape"] {
            let mut item = item(1);
            item.name = name.to_string();
            store.upsert(item).await.unwrap();
        }

        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.name)
            .collect();
        assert_eq!(names, vec!["Anchor bolts", "Mesh tape", "Zip ties"]);
    }
}
