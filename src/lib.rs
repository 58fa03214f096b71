//! Multi-criteria vehicle valuation and ownership-decision engine.
//!
//! Four capabilities over a read-only record store:
//! - fair market value estimation for individual listings ([`valuation`])
//! - six-factor weighted scoring with deal classification ([`scoring`])
//! - constraint filtering and ranked matching ([`recommend`])
//! - multi-year total-cost-of-ownership scenario comparison ([`scenario`])
//!
//! All components take an explicit valuation year instead of reading the wall
//! clock, so identical inputs always produce identical outputs.

pub mod config;
pub mod domain;
pub mod market;
pub mod preferences;
pub mod recommend;
pub mod scenario;
pub mod scoring;
pub mod store;
pub mod valuation;

pub use config::{ConfigError, EngineConfig};
pub use domain::{
    Condition, DriverFit, Drivetrain, FuelType, Listing, ListingId, MarketStatistics, Problem,
    ProblemFrequency, ProblemSeverity, ScenarioVehicle, Vehicle, VehicleId, VehicleSummary,
};
pub use market::{MarketAnalyzer, MarketHeat, RegionStats};
pub use preferences::{BuyerPreferences, PreferenceError, PreferenceWeights};
pub use recommend::{MatchReport, RecommendError, Recommender, ScoredMatch};
pub use scenario::{
    OwnershipScenario, ScenarioAnalysis, ScenarioComparator, ScenarioComparison, ScenarioError,
    ScenarioPolicy,
};
pub use scoring::{DealQuality, ScoreResult, ScoringEngine, ScoringError, ScoringPolicy};
pub use store::{ListingQuery, RecordStore, StoreError, VehicleFilter};
pub use valuation::{
    DepreciationModel, DepreciationPolicy, FairValueEstimator, TradeInEstimator, ValuationPolicy,
};
