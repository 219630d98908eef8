pub mod models;
pub mod store;
pub mod timeframe;

pub use models::{StockItem, Transaction, TransactionType};
pub use store::{HistoryStore, ItemStore};
pub use timeframe::{ParseTimeframeError, Timeframe};
