use serde::{Deserialize, Serialize};

/// Constants for the quick trade-in projection: a flat monthly decay that
/// steepens once the odometer passes the out-of-warranty threshold, and the
/// dealer haircut below private-party value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeInPolicy {
    pub monthly_rate: f64,
    pub steep_monthly_rate: f64,
    pub steep_mileage_threshold: f64,
    pub trade_in_discount: f64,
}

impl Default for TradeInPolicy {
    fn default() -> Self {
        Self {
            monthly_rate: 0.015,
            steep_monthly_rate: 0.020,
            steep_mileage_threshold: 50_000.0,
            trade_in_discount: 0.87,
        }
    }
}

/// Lightweight month-over-month value projection for wait-vs-sell decisions.
/// Unlike [`DepreciationModel`](super::DepreciationModel) this tracks a single
/// unit's market value with a stepped flat rate rather than the full factor
/// curve.
#[derive(Debug, Clone, Default)]
pub struct TradeInEstimator {
    policy: TradeInPolicy,
}

impl TradeInEstimator {
    pub fn new(policy: TradeInPolicy) -> Self {
        Self { policy }
    }

    /// Compounds the monthly rate over `months`, switching to the steep rate
    /// for each month whose starting odometer is at or past the threshold.
    pub fn project_private_party(
        &self,
        current_value: f64,
        current_mileage: f64,
        monthly_miles: f64,
        months: u32,
    ) -> f64 {
        let mut value = current_value;
        for month in 0..months {
            let start_mileage = current_mileage + monthly_miles * f64::from(month);
            let rate = if start_mileage >= self.policy.steep_mileage_threshold {
                self.policy.steep_monthly_rate
            } else {
                self.policy.monthly_rate
            };
            value *= 1.0 - rate;
        }
        value.max(0.0)
    }

    /// Private-party projection discounted to a typical dealer trade-in offer.
    pub fn trade_in_value(
        &self,
        current_value: f64,
        current_mileage: f64,
        monthly_miles: f64,
        months: u32,
    ) -> f64 {
        self.project_private_party(current_value, current_mileage, monthly_miles, months)
            * self.policy.trade_in_discount
    }
}
