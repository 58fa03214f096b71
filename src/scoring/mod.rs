//! Six-factor weighted scoring of a single listing: sub-scores, weighted
//! total, fair-value delta, deal classification, and a recommendation string.

pub mod policy;
pub mod rules;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{DriverFit, Listing, MarketStatistics, Problem, Vehicle, VehicleSummary};
use crate::preferences::{BuyerPreferences, PreferenceError};
use crate::valuation::{FairValueEstimator, ValuationPolicy};

pub use policy::{
    classify_deal, default_deal_rules, default_recommendation_rules, recommend, BrandPolicy,
    DealQuality, DealRule, PolicyError, RecommendationRule,
};

/// Everything tunable about scoring, bundled so one struct can be
/// deserialized from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub brands: BrandPolicy,
    pub deal_rules: Vec<DealRule>,
    pub recommendation_rules: Vec<RecommendationRule>,
    pub valuation: ValuationPolicy,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            brands: BrandPolicy::default(),
            deal_rules: default_deal_rules(),
            recommendation_rules: default_recommendation_rules(),
            valuation: ValuationPolicy::default(),
        }
    }
}

/// The six sub-scores, each in [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub price: f64,
    pub reliability: f64,
    pub comfort: f64,
    pub features: f64,
    pub resale: f64,
    pub maintenance: f64,
}

/// Full evaluation of one listing for one buyer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub vehicle: VehicleSummary,
    pub total_score: f64,
    pub breakdown: ScoreBreakdown,
    pub fair_value: f64,
    pub asking_price: f64,
    /// Asking minus fair; negative means priced below fair value.
    pub price_delta: f64,
    pub price_delta_pct: f64,
    pub deal_quality: DealQuality,
    pub recommendation: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error(transparent)]
    Preferences(#[from] PreferenceError),
}

/// Scores listings against buyer preferences. Holds the policy tables and a
/// fixed valuation year so repeated evaluations are deterministic.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    policy: ScoringPolicy,
    estimator: FairValueEstimator,
    valuation_year: i32,
}

impl ScoringEngine {
    pub fn new(policy: ScoringPolicy, valuation_year: i32) -> Self {
        let estimator = FairValueEstimator::new(policy.valuation.clone());
        Self {
            policy,
            estimator,
            valuation_year,
        }
    }

    pub fn for_year(valuation_year: i32) -> Self {
        Self::new(ScoringPolicy::default(), valuation_year)
    }

    pub fn valuation_year(&self) -> i32 {
        self.valuation_year
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Evaluates one listing. Weights are re-validated here so preferences
    /// deserialized from stored profiles cannot bypass the sum invariant.
    pub fn score_listing(
        &self,
        vehicle: &Vehicle,
        listing: &Listing,
        prefs: &BuyerPreferences,
        market: Option<&MarketStatistics>,
        problems: &[Problem],
        fit: Option<&DriverFit>,
    ) -> Result<ScoreResult, ScoringError> {
        prefs.weights.validate()?;

        let brands = &self.policy.brands;
        let breakdown = ScoreBreakdown {
            price: rules::price_score(listing, prefs, market),
            reliability: rules::reliability_score(vehicle, problems, brands),
            comfort: rules::comfort_score(prefs, fit),
            features: rules::features_score(vehicle, listing, prefs),
            resale: rules::resale_score(vehicle, listing, brands),
            maintenance: rules::maintenance_score(vehicle, listing, brands),
        };

        let weights = &prefs.weights;
        let total_score = breakdown.price * weights.price
            + breakdown.reliability * weights.reliability
            + breakdown.comfort * weights.comfort
            + breakdown.features * weights.features
            + breakdown.resale * weights.resale
            + breakdown.maintenance * weights.maintenance;

        let fair_value = self
            .estimator
            .fair_value(vehicle, listing, self.valuation_year);
        let price_delta = listing.asking_price - fair_value;
        let price_delta_pct = if fair_value > 0.0 {
            price_delta / fair_value * 100.0
        } else {
            0.0
        };

        let has_severe_problem = problems
            .iter()
            .any(|problem| problem.applies_to_year(vehicle.year) && problem.severity.is_severe());

        let deal_quality = classify_deal(&self.policy.deal_rules, price_delta_pct, total_score);
        let recommendation = recommend(
            &self.policy.recommendation_rules,
            total_score,
            price_delta_pct,
            has_severe_problem,
        );

        debug!(
            listing_id = listing.id.0,
            total_score,
            price_delta_pct,
            deal = deal_quality.label(),
            "scored listing"
        );

        Ok(ScoreResult {
            vehicle: VehicleSummary::from(vehicle),
            total_score,
            breakdown,
            fair_value,
            asking_price: listing.asking_price,
            price_delta,
            price_delta_pct,
            deal_quality,
            recommendation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Condition, Drivetrain, FuelType, ListingId, ProblemFrequency, ProblemSeverity, VehicleId,
    };
    use crate::preferences::PreferenceWeights;
    use chrono::NaiveDate;

    #[test]
    fn policy_survives_a_json_round_trip() {
        let policy = ScoringPolicy::default();
        let json = serde_json::to_string(&policy).expect("policy serializes");
        let restored: ScoringPolicy = serde_json::from_str(&json).expect("policy deserializes");
        assert_eq!(policy, restored);
    }

    fn tacoma() -> Vehicle {
        Vehicle {
            id: VehicleId(1),
            make: "Toyota".to_string(),
            model: "Tacoma".to_string(),
            year: 2024,
            trim: "TRD Off-Road".to_string(),
            body_style: "Truck".to_string(),
            drivetrain: Drivetrain::FourWheel,
            fuel_type: FuelType::Gasoline,
            seating_capacity: 5,
            cargo_capacity_cuft: 61.0,
            towing_capacity_lbs: 6_500,
            mpg_city: 19.0,
            mpg_highway: 24.0,
            mpg_combined: 21.0,
            mpge: 0.0,
            legroom_front_in: 42.9,
            legroom_rear_in: 34.6,
            headroom_front_in: 39.5,
            headroom_rear_in: 38.5,
            msrp: 47_995.0,
        }
    }

    fn listing(asking_price: f64) -> Listing {
        Listing {
            id: ListingId(7),
            vehicle_id: VehicleId(1),
            listing_date: NaiveDate::from_ymd_opt(2026, 3, 10).expect("valid date"),
            mileage: 18_000,
            asking_price,
            sale_price: None,
            sold: false,
            condition: Condition::Excellent,
            city: "San Jose".to_string(),
            state: "CA".to_string(),
            region: "Bay Area".to_string(),
            has_leather: false,
            has_tow_package: true,
            has_nav: false,
            has_sunroof: false,
            has_premium_audio: false,
            source: "manual".to_string(),
        }
    }

    fn prefs() -> BuyerPreferences {
        BuyerPreferences::new(55_000.0, 70, PreferenceWeights::balanced())
    }

    #[test]
    fn total_is_the_weighted_sum_of_the_breakdown() {
        let engine = ScoringEngine::for_year(2026);
        let vehicle = tacoma();
        let listing = listing(40_000.0);
        let prefs = prefs();

        let result = engine
            .score_listing(&vehicle, &listing, &prefs, None, &[], None)
            .expect("valid preferences");

        let expected = result.breakdown.price * 0.25
            + result.breakdown.reliability * 0.25
            + result.breakdown.comfort * 0.20
            + result.breakdown.features * 0.15
            + result.breakdown.resale * 0.10
            + result.breakdown.maintenance * 0.05;
        assert!((result.total_score - expected).abs() < 1e-9);
        assert!((0.0..=100.0).contains(&result.total_score));
    }

    #[test]
    fn invalid_weights_are_rejected_before_scoring() {
        let engine = ScoringEngine::for_year(2026);
        let vehicle = tacoma();
        let listing = listing(40_000.0);
        let mut prefs = prefs();
        prefs.weights.price = 0.9; // sum now far above 1.0

        let err = engine
            .score_listing(&vehicle, &listing, &prefs, None, &[], None)
            .expect_err("weights summing past 1.0 must fail");
        assert!(matches!(err, ScoringError::Preferences(_)));
    }

    #[test]
    fn price_delta_is_relative_to_fair_value() {
        let engine = ScoringEngine::for_year(2026);
        let vehicle = tacoma();
        let listing = listing(30_000.0);

        let result = engine
            .score_listing(&vehicle, &listing, &prefs(), None, &[], None)
            .expect("valid preferences");

        assert!((result.price_delta - (30_000.0 - result.fair_value)).abs() < 1e-9);
        assert!(
            (result.price_delta_pct - result.price_delta / result.fair_value * 100.0).abs() < 1e-9
        );
    }

    #[test]
    fn severe_problem_forces_an_avoid_recommendation() {
        let engine = ScoringEngine::for_year(2026);
        let vehicle = tacoma();
        // Overpriced, worn, and rough enough that no rung above the
        // known-problems row can match.
        let mut listing = listing(60_000.0);
        listing.mileage = 150_000;
        listing.condition = Condition::Fair;
        let problems = vec![Problem {
            make: "Toyota".to_string(),
            model: "Tacoma".to_string(),
            year_start: 2024,
            year_end: 2024,
            category: "transmission".to_string(),
            description: "transmission failure".to_string(),
            severity: ProblemSeverity::Critical,
            frequency: ProblemFrequency::Widespread,
            avg_repair_cost: 6_000.0,
        }];

        let result = engine
            .score_listing(&vehicle, &listing, &prefs(), None, &problems, None)
            .expect("valid preferences");

        assert_eq!(
            result.recommendation,
            "AVOID - Known major problems with this model"
        );
    }

    #[test]
    fn well_priced_strong_vehicle_is_an_excellent_deal() {
        let engine = ScoringEngine::for_year(2026);
        let vehicle = tacoma();
        let mut listing = listing(0.0);
        let fit = DriverFit {
            vehicle_id: vehicle.id,
            recommended_height_min_in: 62,
            recommended_height_max_in: 78,
            seat_comfort_score: 9,
            lumbar_support_score: 9,
            seat_adjustability_score: 9,
            tall_driver_suitable: true,
        };

        // Ask 20% under fair value.
        let fair = engine
            .score_listing(&vehicle, &listing, &prefs(), None, &[], Some(&fit))
            .expect("valid preferences")
            .fair_value;
        listing.asking_price = fair * 0.80;

        let result = engine
            .score_listing(&vehicle, &listing, &prefs(), None, &[], Some(&fit))
            .expect("valid preferences");

        assert_eq!(result.deal_quality, DealQuality::Excellent);
        assert_eq!(result.deal_quality.label(), "Excellent Deal");
    }
}
