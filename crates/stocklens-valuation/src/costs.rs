use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stocklens_core::Transaction;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    pub last_in_cost_price: Decimal,
    pub weighted_average_cost: Decimal,
}

/// Supply transactions in their original relative order. The input is
/// never mutated; callers re-sort the result as needed.
pub fn classify_supply(transactions: &[Transaction]) -> Vec<&Transaction> {
    transactions.iter().filter(|tx| tx.is_supply()).collect()
}

/// Last supply price and weighted average cost over the item's history.
///
/// Both values fall back to the item's manually set cost (or zero) when
/// no supply transaction qualifies. Total over any well-typed input; no
/// rounding happens here, display rounding is the caller's concern.
pub fn compute_costs(
    transactions: &[Transaction],
    item_cost_price: Option<Decimal>,
) -> CostSummary {
    let fallback = item_cost_price.unwrap_or(Decimal::ZERO);
    let supply = classify_supply(transactions);

    let last_in_cost_price = supply
        .iter()
        .max_by_key(|tx| tx.created_at)
        .map(|tx| tx.supply_price())
        .unwrap_or(fallback);

    let mut total_value = Decimal::ZERO;
    let mut total_quantity = Decimal::ZERO;
    for tx in &supply {
        if tx.change_amount > Decimal::ZERO {
            total_value += tx.change_amount * tx.supply_price();
            total_quantity += tx.change_amount;
        }
    }

    let weighted_average_cost = if total_quantity.is_zero() {
        fallback
    } else {
        total_value / total_quantity
    };

    CostSummary {
        last_in_cost_price,
        weighted_average_cost,
    }
}
