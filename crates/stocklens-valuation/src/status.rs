use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Out,
    Critical,
    Low,
    Ok,
}

/// Classifies current stock against the item's thresholds. Evaluated
/// fresh on every read; a quantity sitting exactly on a threshold takes
/// the more severe bucket.
pub fn evaluate_stock_status(
    quantity: i64,
    low_threshold: i64,
    critical_threshold: i64,
) -> StockStatus {
    if quantity == 0 {
        StockStatus::Out
    } else if quantity <= critical_threshold {
        StockStatus::Critical
    } else if quantity <= low_threshold {
        StockStatus::Low
    } else {
        StockStatus::Ok
    }
}
