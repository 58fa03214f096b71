use serde::{Deserialize, Serialize};

/// Floating tolerance applied when checking that weights sum to 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Weight validation failure. Invalid weights are rejected, never silently
/// normalized.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PreferenceError {
    #[error("weight `{name}` must be a finite value in [0, 1], got {value}")]
    WeightOutOfRange { name: &'static str, value: f64 },
    #[error("weights must sum to 1.0 within {WEIGHT_SUM_TOLERANCE}, got {sum}")]
    WeightSumMismatch { sum: f64 },
}

/// The six scoring weights a buyer assigns across desirability factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreferenceWeights {
    pub price: f64,
    pub reliability: f64,
    pub comfort: f64,
    pub features: f64,
    pub resale: f64,
    pub maintenance: f64,
}

impl PreferenceWeights {
    pub fn new(
        price: f64,
        reliability: f64,
        comfort: f64,
        features: f64,
        resale: f64,
        maintenance: f64,
    ) -> Result<Self, PreferenceError> {
        let weights = Self {
            price,
            reliability,
            comfort,
            features,
            resale,
            maintenance,
        };
        weights.validate()?;
        Ok(weights)
    }

    /// Checks the sum-to-one invariant. Deserialized or hand-built weights
    /// pass through here before any scoring begins.
    pub fn validate(&self) -> Result<(), PreferenceError> {
        for (name, value) in self.entries() {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(PreferenceError::WeightOutOfRange { name, value });
            }
        }

        let sum: f64 = self.entries().iter().map(|(_, value)| value).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(PreferenceError::WeightSumMismatch { sum });
        }

        Ok(())
    }

    fn entries(&self) -> [(&'static str, f64); 6] {
        [
            ("price", self.price),
            ("reliability", self.reliability),
            ("comfort", self.comfort),
            ("features", self.features),
            ("resale", self.resale),
            ("maintenance", self.maintenance),
        ]
    }

    /// Balanced default emphasizing value and dependability.
    pub const fn balanced() -> Self {
        Self {
            price: 0.25,
            reliability: 0.25,
            comfort: 0.20,
            features: 0.15,
            resale: 0.10,
            maintenance: 0.05,
        }
    }

    /// Preset for commuters: fuel and upkeep costs dominate.
    pub const fn efficiency_focused() -> Self {
        Self {
            price: 0.20,
            reliability: 0.20,
            comfort: 0.15,
            features: 0.15,
            resale: 0.10,
            maintenance: 0.20,
        }
    }

    /// Preset for buyers planning to keep the vehicle past 100k miles.
    pub const fn reliability_focused() -> Self {
        Self {
            price: 0.20,
            reliability: 0.30,
            comfort: 0.15,
            features: 0.15,
            resale: 0.15,
            maintenance: 0.05,
        }
    }

    /// Preset for long-haul comfort seekers.
    pub const fn comfort_focused() -> Self {
        Self {
            price: 0.15,
            reliability: 0.20,
            comfort: 0.30,
            features: 0.20,
            resale: 0.10,
            maintenance: 0.05,
        }
    }
}

impl Default for PreferenceWeights {
    fn default() -> Self {
        Self::balanced()
    }
}

/// Buyer profile: budget, physical fit, hard constraints, and scoring weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyerPreferences {
    pub budget_max: f64,
    pub driver_height_in: u32,
    pub max_mileage: u32,
    pub min_cargo_cuft: f64,
    pub min_towing_lbs: u32,
    pub require_four_wheel_drive: bool,
    pub require_tall_driver_suitable: bool,
    pub weights: PreferenceWeights,
}

impl BuyerPreferences {
    /// Profile with permissive constraints; callers tighten what they need.
    pub fn new(budget_max: f64, driver_height_in: u32, weights: PreferenceWeights) -> Self {
        Self {
            budget_max,
            driver_height_in,
            max_mileage: 100_000,
            min_cargo_cuft: 0.0,
            min_towing_lbs: 0,
            require_four_wheel_drive: false,
            require_tall_driver_suitable: false,
            weights,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_satisfy_sum_invariant() {
        for weights in [
            PreferenceWeights::balanced(),
            PreferenceWeights::efficiency_focused(),
            PreferenceWeights::reliability_focused(),
            PreferenceWeights::comfort_focused(),
        ] {
            weights.validate().expect("preset weights sum to 1.0");
        }
    }

    #[test]
    fn rejects_weights_not_summing_to_one() {
        let err = PreferenceWeights::new(0.5, 0.5, 0.5, 0.0, 0.0, 0.0)
            .expect_err("sum 1.5 must be rejected");
        assert!(matches!(err, PreferenceError::WeightSumMismatch { .. }));
    }

    #[test]
    fn rejects_negative_weight() {
        let err = PreferenceWeights::new(-0.1, 0.4, 0.3, 0.2, 0.1, 0.1)
            .expect_err("negative weight must be rejected");
        assert!(matches!(
            err,
            PreferenceError::WeightOutOfRange { name: "price", .. }
        ));
    }

    #[test]
    fn accepts_sum_within_tolerance() {
        PreferenceWeights::new(0.25, 0.25, 0.2, 0.15, 0.1, 0.05 + 5e-7)
            .expect("rounding noise inside tolerance is accepted");
    }
}
