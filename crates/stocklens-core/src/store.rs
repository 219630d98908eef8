use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{StockItem, Transaction};

#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn upsert(&self, item: StockItem) -> anyhow::Result<StockItem>;
    async fn fetch(&self, item_id: Uuid) -> anyhow::Result<Option<StockItem>>;
    async fn list(&self) -> anyhow::Result<Vec<StockItem>>;
}

/// Ordered transaction history per item. Implementations must return
/// transactions in insertion order; callers re-sort for their own needs.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn record(
        &self,
        item_id: Uuid,
        transaction: Transaction,
    ) -> anyhow::Result<Transaction>;
    async fn history(&self, item_id: Uuid) -> anyhow::Result<Vec<Transaction>>;
}
