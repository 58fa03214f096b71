use serde::{Deserialize, Serialize};

use crate::domain::{FuelType, ScenarioVehicle};

/// Tunable constants behind the depreciation curve. The defaults encode the
/// shipped model; callers can deserialize an alternative table to retune it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepreciationPolicy {
    pub base_annual_rate: f64,
    pub first_year_factor: f64,
    pub early_years_factor: f64,
    pub mid_years_factor: f64,
    pub late_years_factor: f64,
    pub baseline_miles_per_year: f64,
    pub high_mileage_factor: f64,
    pub elevated_mileage_factor: f64,
    pub electric_factor: f64,
    pub annual_rate_cap: f64,
}

impl Default for DepreciationPolicy {
    fn default() -> Self {
        Self {
            base_annual_rate: 0.15,
            first_year_factor: 1.5,
            early_years_factor: 1.2,
            mid_years_factor: 1.0,
            late_years_factor: 0.7,
            baseline_miles_per_year: 12_000.0,
            high_mileage_factor: 1.3,
            elevated_mileage_factor: 1.1,
            electric_factor: 1.25,
            annual_rate_cap: 0.40,
        }
    }
}

/// One row of a monthly value projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyProjection {
    pub month: u32,
    pub value: f64,
    pub age_years: f64,
    pub mileage: f64,
    pub annual_rate: f64,
}

/// Age/mileage/brand/demand/powertrain-aware value decay model. Ages are
/// measured against a fixed valuation year so projections stay deterministic.
#[derive(Debug, Clone)]
pub struct DepreciationModel {
    policy: DepreciationPolicy,
    valuation_year: i32,
}

impl DepreciationModel {
    pub fn new(policy: DepreciationPolicy, valuation_year: i32) -> Self {
        Self {
            policy,
            valuation_year,
        }
    }

    pub fn for_year(valuation_year: i32) -> Self {
        Self::new(DepreciationPolicy::default(), valuation_year)
    }

    pub fn valuation_year(&self) -> i32 {
        self.valuation_year
    }

    /// Annual depreciation rate in [0, cap]: a base rate scaled by four
    /// independent step-function factors.
    pub fn annual_rate(&self, vehicle: &ScenarioVehicle, age_years: f64, mileage: f64) -> f64 {
        let policy = &self.policy;
        let whole_years = age_years.floor().max(0.0);

        let age_factor = if whole_years <= 1.0 {
            policy.first_year_factor
        } else if whole_years <= 3.0 {
            policy.early_years_factor
        } else if whole_years <= 5.0 {
            policy.mid_years_factor
        } else {
            policy.late_years_factor
        };

        let miles_per_year = mileage / whole_years.max(1.0);
        let mileage_factor = if miles_per_year > policy.baseline_miles_per_year * 1.5 {
            policy.high_mileage_factor
        } else if miles_per_year > policy.baseline_miles_per_year {
            policy.elevated_mileage_factor
        } else {
            1.0
        };

        let reliability_factor = 1.2 - vehicle.brand_reliability_score / 50.0;
        let demand_factor = 1.15 - vehicle.market_demand_score / 50.0;
        let powertrain_factor = if vehicle.fuel_type == FuelType::Electric {
            policy.electric_factor
        } else {
            1.0
        };

        let rate = policy.base_annual_rate
            * age_factor
            * mileage_factor
            * reliability_factor
            * demand_factor
            * powertrain_factor;

        rate.clamp(0.0, policy.annual_rate_cap)
    }

    /// Projects value month by month for `months_forward` months. Entry 0 is
    /// the identity row (purchase price, current mileage); every later month
    /// recomputes age, mileage, and rate before compounding at rate/12.
    pub fn project_value(
        &self,
        vehicle: &ScenarioVehicle,
        months_forward: u32,
        annual_mileage: f64,
    ) -> Vec<MonthlyProjection> {
        let current_age = (self.valuation_year - vehicle.year).max(0) as f64;
        let mut value = vehicle.purchase_price;
        let mut projections = Vec::with_capacity(months_forward as usize + 1);

        for month in 0..=months_forward {
            let age_years = current_age + f64::from(month) / 12.0;
            let mileage = vehicle.current_mileage + annual_mileage * f64::from(month) / 12.0;
            let annual_rate = self.annual_rate(vehicle, age_years, mileage);

            if month > 0 {
                value *= 1.0 - annual_rate / 12.0;
            }

            projections.push(MonthlyProjection {
                month,
                value,
                age_years,
                mileage,
                annual_rate,
            });
        }

        projections
    }
}
