//! The six sub-scores behind a listing's total. Each returns a value clamped
//! to [0, 100]; missing inputs fall back to neutral midpoints rather than
//! failing the whole evaluation.

use crate::domain::{
    Condition, DriverFit, FuelType, Listing, MarketStatistics, Problem, ProblemFrequency,
    ProblemSeverity, Vehicle,
};
use crate::preferences::BuyerPreferences;

use super::policy::BrandPolicy;

fn clamped(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

/// Average of a budget-utilization component and a market-position component.
/// Listings over budget score 0 on the budget half; without market data the
/// market half is a neutral 50.
pub fn price_score(
    listing: &Listing,
    prefs: &BuyerPreferences,
    market: Option<&MarketStatistics>,
) -> f64 {
    let budget_component = if listing.asking_price > prefs.budget_max || prefs.budget_max <= 0.0 {
        0.0
    } else {
        let utilization = listing.asking_price / prefs.budget_max;
        100.0 - 30.0 * utilization
    };

    let market_component = match market.and_then(|stats| stats.avg_price) {
        Some(avg) if avg > 0.0 => {
            let ratio = listing.asking_price / avg;
            if ratio < 0.85 {
                100.0
            } else if ratio < 0.95 {
                80.0
            } else if ratio < 1.05 {
                60.0
            } else if ratio < 1.15 {
                40.0
            } else {
                20.0
            }
        }
        _ => 50.0,
    };

    clamped((budget_component + market_component) / 2.0)
}

/// Brand baseline minus per-problem deductions. Severity sets the base
/// deduction and widespread or common frequency adds to it.
pub fn reliability_score(vehicle: &Vehicle, problems: &[Problem], policy: &BrandPolicy) -> f64 {
    let mut score = policy.reliability_score(&vehicle.make);

    for problem in problems {
        if !problem.applies_to_year(vehicle.year) {
            continue;
        }
        let severity_penalty = match problem.severity {
            ProblemSeverity::Critical => 20.0,
            ProblemSeverity::Major => 10.0,
            ProblemSeverity::Moderate => 5.0,
            ProblemSeverity::Minor => 2.0,
        };
        let frequency_penalty = match problem.frequency {
            ProblemFrequency::Widespread => 5.0,
            ProblemFrequency::Common => 3.0,
            ProblemFrequency::Occasional | ProblemFrequency::Rare => 0.0,
        };
        score -= severity_penalty + frequency_penalty;
    }

    clamped(score)
}

/// Driver-fit component averaged with the measured seat scores. With no fit
/// data on record the whole sub-score is a neutral 50.
pub fn comfort_score(prefs: &BuyerPreferences, fit: Option<&DriverFit>) -> f64 {
    let Some(fit) = fit else {
        return 50.0;
    };

    let height_component = if !fit.height_in_range(prefs.driver_height_in) {
        30.0
    } else if prefs.require_tall_driver_suitable && !fit.tall_driver_suitable {
        20.0
    } else {
        100.0
    };

    let seat = f64::from(fit.seat_comfort_score) * 10.0;
    let lumbar = f64::from(fit.lumbar_support_score) * 10.0;
    let adjustability = f64::from(fit.seat_adjustability_score) * 10.0;

    clamped((height_component + seat + lumbar + adjustability) / 4.0)
}

/// Starts at 50 and moves on capability versus the buyer's stated needs plus
/// a few equipment premiums.
pub fn features_score(vehicle: &Vehicle, listing: &Listing, prefs: &BuyerPreferences) -> f64 {
    let mut score = 50.0;

    // A zero minimum still earns the surplus bonus; capacity beyond the
    // stated need differentiates vehicles even when nothing was required.
    if vehicle.cargo_capacity_cuft >= prefs.min_cargo_cuft {
        let excess = vehicle.cargo_capacity_cuft - prefs.min_cargo_cuft;
        score += (excess / 2.0).min(25.0);
    }

    if vehicle.towing_capacity_lbs >= prefs.min_towing_lbs {
        score += if vehicle.towing_capacity_lbs >= 8_000 {
            25.0
        } else if vehicle.towing_capacity_lbs >= 5_000 {
            15.0
        } else {
            10.0
        };
    }

    if prefs.require_four_wheel_drive {
        if vehicle.drivetrain.is_four_wheel_capable() {
            score += 10.0;
        } else {
            score -= 30.0;
        }
    }

    if listing.has_leather {
        score += 5.0;
    }
    if listing.has_tow_package {
        score += 5.0;
    }
    if listing.has_nav {
        score += 3.0;
    }

    clamped(score)
}

fn resale_mileage_component(mileage: u32) -> f64 {
    if mileage < 20_000 {
        100.0
    } else if mileage < 50_000 {
        85.0
    } else if mileage < 75_000 {
        70.0
    } else if mileage < 100_000 {
        55.0
    } else {
        40.0
    }
}

fn condition_component(condition: Condition) -> f64 {
    match condition {
        Condition::Excellent => 100.0,
        Condition::Good => 85.0,
        Condition::Fair => 65.0,
        Condition::Poor => 40.0,
    }
}

/// Weighted blend of brand retention reputation, odometer tier, and condition.
pub fn resale_score(vehicle: &Vehicle, listing: &Listing, policy: &BrandPolicy) -> f64 {
    let brand = policy.resale_score(&vehicle.make, &vehicle.model);
    let mileage = resale_mileage_component(listing.mileage);
    let condition = condition_component(listing.condition);

    clamped(brand * 0.5 + mileage * 0.3 + condition * 0.2)
}

fn maintenance_mileage_component(mileage: u32) -> f64 {
    if mileage < 30_000 {
        100.0
    } else if mileage < 60_000 {
        85.0
    } else if mileage < 100_000 {
        70.0
    } else {
        55.0
    }
}

/// Powertrain sets both the fuel-cost component and the baseline upkeep
/// expectation; brand reputation and accumulated mileage adjust it.
pub fn maintenance_score(vehicle: &Vehicle, listing: &Listing, policy: &BrandPolicy) -> f64 {
    let mpg = if vehicle.mpg_combined > 0.0 {
        vehicle.mpg_combined
    } else {
        20.0
    };

    let (fuel_component, base_component) = match vehicle.fuel_type {
        FuelType::Electric => (100.0, 90.0),
        FuelType::Hybrid => ((mpg * 3.0).min(100.0), 75.0),
        FuelType::Gasoline | FuelType::Diesel => ((mpg * 4.0).min(100.0), 70.0),
    };

    let brand = policy.maintenance_score(&vehicle.make);
    let mileage = maintenance_mileage_component(listing.mileage);

    clamped(fuel_component * 0.3 + base_component * 0.3 + brand * 0.2 + mileage * 0.2)
}
