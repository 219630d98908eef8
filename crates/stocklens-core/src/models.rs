use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    In,
    Out,
    Transfer,
    AttributeChange,
    Archive,
    Restore,
}

impl TransactionType {
    /// Whether a transaction of this type moves physical stock.
    /// Attribute changes, archive and restore are metadata-only.
    pub fn moves_stock(self) -> bool {
        matches!(
            self,
            TransactionType::In | TransactionType::Out | TransactionType::Transfer
        )
    }
}

/// A single entry in an item's stock history. `cost_price` is only
/// meaningful on `In` transactions, where it carries the unit purchase
/// price of the received stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub change_amount: Decimal,
    pub cost_price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// A supply event: stock received in with a positive unit cost.
    pub fn is_supply(&self) -> bool {
        self.kind == TransactionType::In
            && self.cost_price.is_some_and(|price| price > Decimal::ZERO)
    }

    pub fn supply_price(&self) -> Decimal {
        self.cost_price.unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    pub id: Uuid,
    pub name: String,
    /// Manually set current cost, if the warehouse operator has entered one.
    pub cost_price: Option<Decimal>,
    pub quantity: i64,
    pub low_stock_threshold: i64,
    pub critical_stock_threshold: i64,
}
