//! Lifestyle functionality scoring for scenario vehicles: how well a fleet
//! serves cargo, passenger space, comfort, outdoor use, range, and running
//! cost, each on a 0-10 scale.

use serde::{Deserialize, Serialize};

use crate::domain::{FuelType, ScenarioVehicle};
use crate::preferences::{PreferenceError, WEIGHT_SUM_TOLERANCE};

/// Weights over the six functionality dimensions. Same sum-to-one rule as the
/// buyer scoring weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FunctionalityWeights {
    pub cargo: f64,
    pub legroom: f64,
    pub comfort: f64,
    pub outdoor: f64,
    pub range: f64,
    pub cost_efficiency: f64,
}

impl FunctionalityWeights {
    pub fn validate(&self) -> Result<(), PreferenceError> {
        let entries = [
            ("cargo", self.cargo),
            ("legroom", self.legroom),
            ("comfort", self.comfort),
            ("outdoor", self.outdoor),
            ("range", self.range),
            ("cost_efficiency", self.cost_efficiency),
        ];
        for (name, value) in entries {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(PreferenceError::WeightOutOfRange { name, value });
            }
        }

        let sum: f64 = entries.iter().map(|(_, value)| value).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(PreferenceError::WeightSumMismatch { sum });
        }
        Ok(())
    }
}

impl Default for FunctionalityWeights {
    fn default() -> Self {
        Self {
            cargo: 0.15,
            legroom: 0.25,
            comfort: 0.20,
            outdoor: 0.20,
            range: 0.10,
            cost_efficiency: 0.10,
        }
    }
}

/// Per-dimension scores for one vehicle, each in [0, 10].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionalityBreakdown {
    pub vehicle: String,
    pub cargo: f64,
    pub legroom: f64,
    pub comfort: f64,
    pub outdoor: f64,
    pub range: f64,
    pub cost_efficiency: f64,
    pub weighted_total: f64,
}

/// Scores scenario vehicles on the six lifestyle dimensions.
#[derive(Debug, Clone, Default)]
pub struct FunctionalityScorer {
    weights: FunctionalityWeights,
}

impl FunctionalityScorer {
    pub fn new(weights: FunctionalityWeights) -> Result<Self, PreferenceError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    /// A trailer adds usable cargo volume on top of the built-in capacity.
    pub fn score(&self, vehicle: &ScenarioVehicle, has_trailer: bool) -> FunctionalityBreakdown {
        let weights = &self.weights;

        let effective_cargo = if has_trailer {
            vehicle.cargo_capacity_cuft + 100.0
        } else {
            vehicle.cargo_capacity_cuft
        };
        let cargo = (effective_cargo / 15.0).min(10.0);

        let avg_legroom = (vehicle.legroom_front_in + vehicle.legroom_rear_in) / 2.0;
        let legroom = (avg_legroom / 4.2).min(10.0);

        let comfort = vehicle.ride_comfort_score.clamp(0.0, 10.0);

        let mut outdoor = 0.0;
        if vehicle.roof_rack_capable {
            outdoor += 3.0;
        }
        if vehicle.four_wheel_capable {
            outdoor += 3.0;
        }
        if vehicle.towing_capacity_lbs >= 3_500 {
            outdoor += 4.0;
        } else if vehicle.towing_capacity_lbs >= 2_000 {
            outdoor += 2.0;
        }

        let range = range_score(vehicle);

        let cost_per_mile = running_cost_per_mile(vehicle);
        let cost_efficiency = (10.0 - cost_per_mile * 100.0).max(0.0);

        let weighted_total = cargo * weights.cargo
            + legroom * weights.legroom
            + comfort * weights.comfort
            + outdoor * weights.outdoor
            + range * weights.range
            + cost_efficiency * weights.cost_efficiency;

        FunctionalityBreakdown {
            vehicle: vehicle.name.clone(),
            cargo,
            legroom,
            comfort,
            outdoor,
            range,
            cost_efficiency,
            weighted_total,
        }
    }
}

fn range_score(vehicle: &ScenarioVehicle) -> f64 {
    match vehicle.fuel_type {
        FuelType::Electric => {
            if vehicle.mpge > 100.0 {
                5.0
            } else {
                3.0
            }
        }
        _ => {
            // Trucks carry larger tanks than the passenger fleet.
            let tank_gallons = if vehicle.model.to_lowercase().contains("truck") {
                20.0
            } else {
                16.0
            };
            (tank_gallons * vehicle.mpg_highway / 50.0).min(10.0)
        }
    }
}

/// Fuel plus scheduled maintenance, dollars per mile.
fn running_cost_per_mile(vehicle: &ScenarioVehicle) -> f64 {
    let fuel = match vehicle.fuel_type {
        FuelType::Electric => 0.04,
        _ => {
            if vehicle.mpg_highway > 0.0 {
                3.50 / vehicle.mpg_highway
            } else {
                0.0
            }
        }
    };
    fuel + vehicle.maintenance_per_mile
}
