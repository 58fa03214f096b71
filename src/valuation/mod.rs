//! Value estimation: the depreciation curve shared by scoring and scenario
//! projection, the per-listing fair value model, and the quick trade-in
//! projector.

mod depreciation;
mod fair_value;
mod trade_in;

pub use depreciation::{DepreciationModel, DepreciationPolicy, MonthlyProjection};
pub use fair_value::{ConditionFactors, FairValueEstimator, ValuationPolicy};
pub use trade_in::{TradeInEstimator, TradeInPolicy};
