use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stocklens_core::{Timeframe, Transaction};

use crate::costs::classify_supply;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub avg: Decimal,
    pub date: NaiveDate,
    pub has_data: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
    pub actual_min: Decimal,
    pub actual_max: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub points: Vec<SeriesPoint>,
    pub range: PriceRange,
    /// Percentage change from the first recorded supply price to the
    /// current price. Computed against the full history, not the active
    /// timeframe window.
    pub yearly_change: Decimal,
}

struct DayBucket {
    date: NaiveDate,
    avg: Decimal,
}

/// Supply transactions grouped by UTC calendar day, mean price per day.
/// Buckets are keyed by date, not by a formatted label, so bucketing
/// cannot drift with locale settings.
fn day_buckets(supply: &[&Transaction]) -> Vec<DayBucket> {
    let mut grouped: BTreeMap<NaiveDate, Vec<Decimal>> = BTreeMap::new();
    for tx in supply {
        grouped
            .entry(tx.created_at.date_naive())
            .or_default()
            .push(tx.supply_price());
    }

    grouped
        .into_iter()
        .map(|(date, prices)| {
            let sum: Decimal = prices.iter().copied().sum();
            DayBucket {
                date,
                avg: sum / Decimal::from(prices.len()),
            }
        })
        .collect()
}

fn day_label(date: NaiveDate) -> String {
    date.format("%-d %b").to_string()
}

/// Supply price chart data for one item.
///
/// `now` is passed in rather than read from the clock so the same inputs
/// always produce the same series. Degenerate inputs (no history, zero
/// prices) resolve through fallbacks; this never fails.
pub fn build_series(
    transactions: &[Transaction],
    item_cost_price: Option<Decimal>,
    timeframe: Timeframe,
    now: DateTime<Utc>,
) -> PriceSeries {
    let mut supply = classify_supply(transactions);
    supply.sort_by_key(|tx| tx.created_at);

    let current_price = match item_cost_price {
        Some(price) if price > Decimal::ZERO => price,
        _ => supply
            .last()
            .map(|tx| tx.supply_price())
            .unwrap_or(Decimal::ZERO),
    };

    let buckets = day_buckets(&supply);

    // Baseline is the first bucket of the full history, before the window
    // filter. The item page shows the same change figure on every timeframe.
    let yearly_change = match buckets.first() {
        Some(first) if !first.avg.is_zero() => {
            (current_price - first.avg) / first.avg * Decimal::ONE_HUNDRED
        }
        _ => Decimal::ZERO,
    };

    let cutoff = timeframe.window().map(|window| (now - window).date_naive());

    let mut points: Vec<SeriesPoint> = buckets
        .into_iter()
        .filter(|bucket| cutoff.is_none_or(|cutoff| bucket.date >= cutoff))
        .map(|bucket| SeriesPoint {
            label: day_label(bucket.date),
            avg: bucket.avg,
            date: bucket.date,
            has_data: true,
        })
        .collect();

    // Synthetic trailing point anchors the chart at today's price. It sits
    // at `now`, so it is inside every window by construction.
    points.push(SeriesPoint {
        label: "Current".to_string(),
        avg: current_price,
        date: now.date_naive(),
        has_data: current_price > Decimal::ZERO,
    });

    points.retain(|point| point.avg > Decimal::ZERO);

    let range = display_range(&points, current_price);

    PriceSeries {
        points,
        range,
        yearly_change,
    }
}

/// Padded display range so the chart never renders flat against its edges.
fn display_range(points: &[SeriesPoint], current_price: Decimal) -> PriceRange {
    let (actual_min, actual_max) = match points.first() {
        None => {
            if current_price > Decimal::ZERO {
                (current_price, current_price)
            } else {
                (Decimal::from(100), Decimal::from(110))
            }
        }
        Some(first) => {
            let mut min = first.avg;
            let mut max = first.avg;
            for point in &points[1..] {
                min = min.min(point.avg);
                max = max.max(point.avg);
            }
            (min, max)
        }
    };

    let (min, max) = if actual_min == actual_max {
        (
            (actual_min * Decimal::new(8, 1)).max(Decimal::ZERO),
            actual_max * Decimal::new(12, 1),
        )
    } else {
        let pad = (actual_max - actual_min) * Decimal::new(15, 2);
        ((actual_min - pad).max(Decimal::ZERO), actual_max + pad)
    };

    PriceRange {
        min,
        max,
        actual_min,
        actual_max,
    }
}
