//! Constraint filtering and ranked matching over the listing inventory, plus
//! the two-vehicle split-budget strategy.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{Listing, Vehicle};
use crate::preferences::{BuyerPreferences, PreferenceError, PreferenceWeights};
use crate::scoring::{ScoreResult, ScoringEngine, ScoringError};
use crate::store::{ListingQuery, RecordStore, StoreError};

/// Hard-constraint failure that removes a listing before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintViolation {
    OverBudget,
    MileageTooHigh,
    DrivetrainMismatch,
    NotTallDriverSuitable,
    HeightOutOfRange,
    InsufficientCargo,
    InsufficientTowing,
}

impl ConstraintViolation {
    pub const fn reason(self) -> &'static str {
        match self {
            ConstraintViolation::OverBudget => "asking price exceeds budget",
            ConstraintViolation::MileageTooHigh => "mileage exceeds maximum",
            ConstraintViolation::DrivetrainMismatch => "lacks AWD/4WD",
            ConstraintViolation::NotTallDriverSuitable => "not suitable for tall drivers",
            ConstraintViolation::HeightOutOfRange => "driver height outside recommended range",
            ConstraintViolation::InsufficientCargo => "cargo capacity below minimum",
            ConstraintViolation::InsufficientTowing => "towing capacity below minimum",
        }
    }
}

/// Listing removed by a hard constraint, retained for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredListing {
    pub listing: Listing,
    pub violation: ConstraintViolation,
}

/// Listing dropped because its supporting records could not be loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedListing {
    pub listing_id: crate::domain::ListingId,
    pub reason: String,
}

/// One surviving listing with its full evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    pub listing: Listing,
    pub score: ScoreResult,
    pub distance_miles: Option<f64>,
}

/// Outcome of a matching run. Filtered and skipped listings are reported
/// explicitly rather than silently dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub matches: Vec<ScoredMatch>,
    pub filtered: Vec<FilteredListing>,
    pub skipped: Vec<SkippedListing>,
}

/// Two complementary vehicles inside one combined budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehiclePair {
    pub daily: ScoredMatch,
    pub adventure: ScoredMatch,
    pub combined_price: f64,
    pub combined_score: f64,
}

/// Outcome of the split-budget search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DualStrategyReport {
    pub pairs: Vec<VehiclePair>,
    pub daily_report: MatchReport,
    pub adventure_report: MatchReport,
}

#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    #[error(transparent)]
    Preferences(#[from] PreferenceError),
    #[error("record store failure: {0}")]
    Store(#[from] StoreError),
}

impl From<ScoringError> for RecommendError {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::Preferences(err) => RecommendError::Preferences(err),
        }
    }
}

/// Searches the inventory for the listings that best fit a buyer.
pub struct Recommender<S: RecordStore> {
    store: Arc<S>,
    engine: ScoringEngine,
}

impl<S: RecordStore> Recommender<S> {
    pub fn new(store: Arc<S>, engine: ScoringEngine) -> Self {
        Self { store, engine }
    }

    /// Applies hard constraints, scores the survivors, and returns the top
    /// `limit` by total score. Listings whose supporting records fail to load
    /// are skipped and reported; a bad record never aborts the run.
    pub fn find_best_matches(
        &self,
        prefs: &BuyerPreferences,
        query: &ListingQuery,
        limit: usize,
    ) -> Result<MatchReport, RecommendError> {
        prefs.weights.validate()?;

        let listings = self.store.listings(query)?;
        debug!(candidates = listings.len(), "matching listings");

        let mut report = MatchReport::default();

        for listing in listings {
            let vehicle = match self.store.vehicle(listing.vehicle_id) {
                Ok(Some(vehicle)) => vehicle,
                Ok(None) => {
                    warn!(listing_id = listing.id.0, "listing has no catalog vehicle");
                    report.skipped.push(SkippedListing {
                        listing_id: listing.id,
                        reason: "catalog vehicle missing".to_string(),
                    });
                    continue;
                }
                Err(err) => {
                    warn!(listing_id = listing.id.0, error = %err, "vehicle lookup failed");
                    report.skipped.push(SkippedListing {
                        listing_id: listing.id,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            let fit = match self.store.fit_data(vehicle.id) {
                Ok(fit) => fit,
                Err(err) => {
                    warn!(listing_id = listing.id.0, error = %err, "fit lookup failed");
                    report.skipped.push(SkippedListing {
                        listing_id: listing.id,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            if let Some(violation) = check_constraints(&vehicle, &listing, prefs, fit.as_ref()) {
                report.filtered.push(FilteredListing { listing, violation });
                continue;
            }

            let market = self
                .store
                .market_statistics(&vehicle.make, &vehicle.model, vehicle.year, None)
                .unwrap_or_else(|err| {
                    warn!(listing_id = listing.id.0, error = %err, "market lookup failed");
                    None
                });
            let problems = self
                .store
                .problems(&vehicle.make, &vehicle.model, Some(vehicle.year))
                .unwrap_or_else(|err| {
                    warn!(listing_id = listing.id.0, error = %err, "problem lookup failed");
                    Vec::new()
                });

            let score = self.engine.score_listing(
                &vehicle,
                &listing,
                prefs,
                market.as_ref(),
                &problems,
                fit.as_ref(),
            )?;

            let distance_miles = self
                .store
                .closest_distance(&listing.city, &listing.state)
                .ok()
                .flatten();

            report.matches.push(ScoredMatch {
                listing,
                score,
                distance_miles,
            });
        }

        report.matches.sort_by(|a, b| {
            b.score
                .total_score
                .partial_cmp(&a.score.total_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.listing.id.cmp(&b.listing.id))
        });
        report.matches.truncate(limit);

        Ok(report)
    }

    /// Split-budget search for a daily commuter plus an adventure rig: 40% of
    /// the budget goes to the commuter, 60% to the rig, and the top two of
    /// each side are crossed into pairs ranked by average combined score.
    pub fn dual_vehicle_strategy(
        &self,
        total_budget: f64,
        driver_height_in: u32,
        query: &ListingQuery,
    ) -> Result<DualStrategyReport, RecommendError> {
        let daily_prefs = daily_driver_prefs(total_budget * 0.40, driver_height_in)?;
        let adventure_prefs = adventure_prefs(total_budget * 0.60, driver_height_in)?;

        let daily_report = self.find_best_matches(&daily_prefs, query, 2)?;
        let adventure_report = self.find_best_matches(&adventure_prefs, query, 2)?;

        let mut pairs = Vec::new();
        for daily in &daily_report.matches {
            for adventure in &adventure_report.matches {
                if daily.listing.id == adventure.listing.id {
                    continue;
                }
                let combined_price = daily.listing.asking_price + adventure.listing.asking_price;
                if combined_price > total_budget {
                    continue;
                }
                pairs.push(VehiclePair {
                    daily: daily.clone(),
                    adventure: adventure.clone(),
                    combined_price,
                    combined_score: (daily.score.total_score + adventure.score.total_score) / 2.0,
                });
            }
        }

        pairs.sort_by(|a, b| {
            b.combined_score
                .partial_cmp(&a.combined_score)
                .unwrap_or(Ordering::Equal)
        });

        Ok(DualStrategyReport {
            pairs,
            daily_report,
            adventure_report,
        })
    }
}

/// Hard constraints in a fixed order; the first violation wins. Fit-dependent
/// checks pass when no fit data exists, the comfort sub-score absorbs the
/// uncertainty instead.
fn check_constraints(
    vehicle: &Vehicle,
    listing: &Listing,
    prefs: &BuyerPreferences,
    fit: Option<&crate::domain::DriverFit>,
) -> Option<ConstraintViolation> {
    if listing.asking_price > prefs.budget_max {
        return Some(ConstraintViolation::OverBudget);
    }
    if listing.mileage > prefs.max_mileage {
        return Some(ConstraintViolation::MileageTooHigh);
    }
    if prefs.require_four_wheel_drive && !vehicle.drivetrain.is_four_wheel_capable() {
        return Some(ConstraintViolation::DrivetrainMismatch);
    }
    if let Some(fit) = fit {
        if prefs.require_tall_driver_suitable && !fit.tall_driver_suitable {
            return Some(ConstraintViolation::NotTallDriverSuitable);
        }
        if !fit.height_in_range(prefs.driver_height_in) {
            return Some(ConstraintViolation::HeightOutOfRange);
        }
    }
    if vehicle.cargo_capacity_cuft < prefs.min_cargo_cuft {
        return Some(ConstraintViolation::InsufficientCargo);
    }
    if vehicle.towing_capacity_lbs < prefs.min_towing_lbs {
        return Some(ConstraintViolation::InsufficientTowing);
    }
    None
}

fn daily_driver_prefs(
    budget: f64,
    driver_height_in: u32,
) -> Result<BuyerPreferences, PreferenceError> {
    let weights = PreferenceWeights::new(0.25, 0.20, 0.20, 0.05, 0.05, 0.25)?;
    let mut prefs = BuyerPreferences::new(budget, driver_height_in, weights);
    prefs.min_cargo_cuft = 20.0;
    prefs.max_mileage = 80_000;
    Ok(prefs)
}

fn adventure_prefs(
    budget: f64,
    driver_height_in: u32,
) -> Result<BuyerPreferences, PreferenceError> {
    let weights = PreferenceWeights::new(0.15, 0.25, 0.20, 0.30, 0.05, 0.05)?;
    let mut prefs = BuyerPreferences::new(budget, driver_height_in, weights);
    prefs.min_cargo_cuft = 60.0;
    prefs.min_towing_lbs = 5_000;
    prefs.max_mileage = 80_000;
    prefs.require_four_wheel_drive = true;
    prefs.require_tall_driver_suitable = true;
    Ok(prefs)
}
