use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stocklens_core::{StockItem, Timeframe, Transaction};

use crate::costs::{CostSummary, compute_costs};
use crate::series::{PriceSeries, build_series};
use crate::status::{StockStatus, evaluate_stock_status};

/// Everything the item detail view derives from an item and its history.
/// Recomputed in full on every call; there is no cached state, so
/// identical inputs (including `now`) give identical output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub last_in_cost_price: Decimal,
    pub weighted_average_cost: Decimal,
    pub series: PriceSeries,
    pub stock_status: StockStatus,
}

impl DerivedMetrics {
    pub fn compute(
        item: &StockItem,
        transactions: &[Transaction],
        timeframe: Timeframe,
        now: DateTime<Utc>,
    ) -> Self {
        let CostSummary {
            last_in_cost_price,
            weighted_average_cost,
        } = compute_costs(transactions, item.cost_price);

        let series = build_series(transactions, item.cost_price, timeframe, now);
        let stock_status = evaluate_stock_status(
            item.quantity,
            item.low_stock_threshold,
            item.critical_stock_threshold,
        );

        Self {
            last_in_cost_price,
            weighted_average_cost,
            series,
            stock_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use stocklens_core::TransactionType;
    use uuid::Uuid;

    fn item(cost_price: Option<i64>, quantity: i64) -> StockItem {
        StockItem {
            id: Uuid::new_v4(),
            name: "M6 hex bolt".to_string(),
            cost_price: cost_price.map(Decimal::from),
            quantity,
            low_stock_threshold: 10,
            critical_stock_threshold: 3,
        }
    }

    #[test]
    fn combines_costs_series_and_status() {
        let now = Utc.with_ymd_and_hms(2026, 6, 15, 9, 0, 0).unwrap();
        let history = vec![
            Transaction {
                id: Uuid::new_v4(),
                kind: TransactionType::In,
                change_amount: Decimal::from(2),
                cost_price: Some(Decimal::from(100)),
                created_at: now - Duration::days(12),
            },
            Transaction {
                id: Uuid::new_v4(),
                kind: TransactionType::In,
                change_amount: Decimal::from(3),
                cost_price: Some(Decimal::from(200)),
                created_at: now - Duration::days(4),
            },
        ];

        let metrics = DerivedMetrics::compute(&item(None, 5), &history, Timeframe::All, now);
        assert_eq!(metrics.weighted_average_cost, Decimal::from(160));
        assert_eq!(metrics.last_in_cost_price, Decimal::from(200));
        assert_eq!(metrics.stock_status, StockStatus::Low);
        // Two day buckets plus the current point.
        assert_eq!(metrics.series.points.len(), 3);
    }

    #[test]
    fn empty_inputs_resolve_through_fallbacks() {
        let now = Utc.with_ymd_and_hms(2026, 6, 15, 9, 0, 0).unwrap();
        let metrics = DerivedMetrics::compute(&item(None, 0), &[], Timeframe::OneYear, now);
        assert_eq!(metrics.last_in_cost_price, Decimal::ZERO);
        assert_eq!(metrics.weighted_average_cost, Decimal::ZERO);
        assert_eq!(metrics.stock_status, StockStatus::Out);
        assert!(metrics.series.points.is_empty());
    }

    #[test]
    fn serializes_for_the_http_edge() {
        let now = Utc.with_ymd_and_hms(2026, 6, 15, 9, 0, 0).unwrap();
        let metrics = DerivedMetrics::compute(&item(Some(25), 50), &[], Timeframe::All, now);
        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["stock_status"], "ok");
        assert_eq!(json["series"]["points"][0]["label"], "Current");
    }
}
