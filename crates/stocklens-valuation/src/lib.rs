pub mod costs;
pub mod metrics;
pub mod series;
pub mod status;

pub use costs::{CostSummary, classify_supply, compute_costs};
pub use metrics::DerivedMetrics;
pub use series::{PriceRange, PriceSeries, SeriesPoint, build_series};
pub use status::{StockStatus, evaluate_stock_status};
