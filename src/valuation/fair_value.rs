use serde::{Deserialize, Serialize};

use crate::domain::{Condition, Listing, Vehicle};

/// Condition multipliers applied to the age/mileage-adjusted base value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionFactors {
    pub excellent: f64,
    pub good: f64,
    pub fair: f64,
    pub poor: f64,
}

impl ConditionFactors {
    pub fn factor(&self, condition: Condition) -> f64 {
        match condition {
            Condition::Excellent => self.excellent,
            Condition::Good => self.good,
            Condition::Fair => self.fair,
            Condition::Poor => self.poor,
        }
    }
}

/// Constants behind the fair-value estimate: retention curve, mileage
/// adjustments, condition multipliers, and flat feature premiums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationPolicy {
    /// MSRP retention for ages 0..N; ages past the end follow the linear
    /// tail below.
    pub retention_by_age: Vec<f64>,
    pub late_retention_slope: f64,
    pub retention_floor: f64,
    pub expected_miles_per_year: f64,
    /// Dollars docked per mile over expectation, capped at a share of base.
    pub excess_mile_penalty: f64,
    pub excess_penalty_cap_share: f64,
    /// Dollars credited per mile under expectation, capped likewise.
    pub deficit_mile_bonus: f64,
    pub deficit_bonus_cap_share: f64,
    pub condition_factors: ConditionFactors,
    pub leather_premium: f64,
    pub tow_package_premium: f64,
    pub nav_premium: f64,
}

impl Default for ValuationPolicy {
    fn default() -> Self {
        Self {
            retention_by_age: vec![0.90, 0.75, 0.65, 0.55, 0.50],
            late_retention_slope: 0.04,
            retention_floor: 0.30,
            expected_miles_per_year: 12_000.0,
            excess_mile_penalty: 0.10,
            excess_penalty_cap_share: 0.20,
            deficit_mile_bonus: 0.08,
            deficit_bonus_cap_share: 0.10,
            condition_factors: ConditionFactors {
                excellent: 1.10,
                good: 1.00,
                fair: 0.85,
                poor: 0.65,
            },
            leather_premium: 1_500.0,
            tow_package_premium: 1_000.0,
            nav_premium: 800.0,
        }
    }
}

impl ValuationPolicy {
    fn retention(&self, age_years: i32) -> f64 {
        let age = age_years.max(0) as usize;
        if let Some(retention) = self.retention_by_age.get(age) {
            return *retention;
        }

        let last_index = self.retention_by_age.len().saturating_sub(1);
        let last = self
            .retention_by_age
            .last()
            .copied()
            .unwrap_or(self.retention_floor);
        let tail_years = (age - last_index) as f64;
        (last - self.late_retention_slope * tail_years).max(self.retention_floor)
    }
}

/// Point-in-time fair market value of a specific listing. Pure function of
/// its inputs; never returns a negative value.
#[derive(Debug, Clone, Default)]
pub struct FairValueEstimator {
    policy: ValuationPolicy,
}

impl FairValueEstimator {
    pub fn new(policy: ValuationPolicy) -> Self {
        Self { policy }
    }

    pub fn fair_value(&self, vehicle: &Vehicle, listing: &Listing, as_of_year: i32) -> f64 {
        let policy = &self.policy;
        let age = (as_of_year - vehicle.year).max(0);
        let mut value = vehicle.msrp * policy.retention(age);

        let expected_mileage = f64::from(age) * policy.expected_miles_per_year;
        let mileage_delta = f64::from(listing.mileage) - expected_mileage;
        if mileage_delta > 0.0 {
            let penalty =
                (mileage_delta * policy.excess_mile_penalty).min(value * policy.excess_penalty_cap_share);
            value -= penalty;
        } else {
            let bonus = (mileage_delta.abs() * policy.deficit_mile_bonus)
                .min(value * policy.deficit_bonus_cap_share);
            value += bonus;
        }

        value *= policy.condition_factors.factor(listing.condition);

        if listing.has_leather {
            value += policy.leather_premium;
        }
        if listing.has_tow_package {
            value += policy.tow_package_premium;
        }
        if listing.has_nav {
            value += policy.nav_premium;
        }

        value.max(0.0)
    }
}
