//! End-to-end scoring behavior: sub-score aggregation, deal classification,
//! and recommendation text driven through the public engine with store-backed
//! fixture data.

mod common;

use car_valuation::domain::ProblemSeverity;
use car_valuation::preferences::{BuyerPreferences, PreferenceWeights};
use car_valuation::scoring::{DealQuality, ScoringEngine};
use car_valuation::store::RecordStore;

use common::{problem, seeded_store};

fn buyer(budget: f64) -> BuyerPreferences {
    BuyerPreferences::new(budget, 72, PreferenceWeights::balanced())
}

#[test]
fn twenty_percent_below_fair_value_is_an_excellent_deal() {
    let store = seeded_store();
    let engine = ScoringEngine::for_year(2026);

    let vehicle = store
        .vehicle(car_valuation::VehicleId(1))
        .expect("store")
        .expect("tacoma");
    let mut listing = store.listings(&Default::default()).expect("store")[0].clone();
    let market = store
        .market_statistics(&vehicle.make, &vehicle.model, vehicle.year, None)
        .expect("store");
    let fit = store.fit_data(vehicle.id).expect("store");

    // Price the listing 20% under its own fair value.
    let fair = engine
        .score_listing(&vehicle, &listing, &buyer(50_000.0), market.as_ref(), &[], fit.as_ref())
        .expect("valid preferences")
        .fair_value;
    listing.asking_price = fair * 0.80;

    let result = engine
        .score_listing(&vehicle, &listing, &buyer(50_000.0), market.as_ref(), &[], fit.as_ref())
        .expect("valid preferences");

    assert!((result.price_delta_pct - -20.0).abs() < 1e-9);
    assert!(result.total_score >= 75.0, "score {}", result.total_score);
    assert_eq!(result.deal_quality, DealQuality::Excellent);
    assert_eq!(result.deal_quality.label(), "Excellent Deal");
}

#[test]
fn breakdown_and_total_stay_in_bounds() {
    let store = seeded_store();
    let engine = ScoringEngine::for_year(2026);
    let prefs = buyer(60_000.0);

    for listing in store.listings(&Default::default()).expect("store") {
        let vehicle = store
            .vehicle(listing.vehicle_id)
            .expect("store")
            .expect("vehicle exists");
        let market = store
            .market_statistics(&vehicle.make, &vehicle.model, vehicle.year, None)
            .expect("store");
        let problems = store
            .problems(&vehicle.make, &vehicle.model, Some(vehicle.year))
            .expect("store");
        let fit = store.fit_data(vehicle.id).expect("store");

        let result = engine
            .score_listing(
                &vehicle,
                &listing,
                &prefs,
                market.as_ref(),
                &problems,
                fit.as_ref(),
            )
            .expect("valid preferences");

        for score in [
            result.total_score,
            result.breakdown.price,
            result.breakdown.reliability,
            result.breakdown.comfort,
            result.breakdown.features,
            result.breakdown.resale,
            result.breakdown.maintenance,
        ] {
            assert!((0.0..=100.0).contains(&score), "score {score} out of bounds");
        }
        assert!(result.fair_value >= 0.0);
    }
}

#[test]
fn applicable_critical_problem_forces_avoid() {
    let store = seeded_store();
    let engine = ScoringEngine::for_year(2026);

    let vehicle = store
        .vehicle(car_valuation::VehicleId(2))
        .expect("store")
        .expect("model y");
    let listing = store.listings(&Default::default()).expect("store")
        .into_iter()
        .find(|l| l.vehicle_id == vehicle.id)
        .expect("model y listing");
    let drivetrain = problem("Tesla", "Model Y", (2023, 2025), ProblemSeverity::Critical);
    let mut suspension = problem("Tesla", "Model Y", (2023, 2025), ProblemSeverity::Critical);
    suspension.category = "suspension".to_string();
    let problems = vec![drivetrain, suspension];

    let result = engine
        .score_listing(&vehicle, &listing, &buyer(60_000.0), None, &problems, None)
        .expect("valid preferences");

    assert!(result.total_score < 60.0, "score {}", result.total_score);
    assert_eq!(
        result.recommendation,
        "AVOID - Known major problems with this model"
    );
}

#[test]
fn stored_problems_outside_the_model_year_are_ignored() {
    let store = seeded_store();
    let engine = ScoringEngine::for_year(2026);

    let vehicle = store
        .vehicle(car_valuation::VehicleId(2))
        .expect("store")
        .expect("model y");
    let listing = store.listings(&Default::default()).expect("store")
        .into_iter()
        .find(|l| l.vehicle_id == vehicle.id)
        .expect("model y listing");

    // The seeded Major problem covers 2020-2021; this is a 2024.
    let problems = store
        .problems(&vehicle.make, &vehicle.model, Some(vehicle.year))
        .expect("store");
    assert!(problems.is_empty());

    let result = engine
        .score_listing(&vehicle, &listing, &buyer(60_000.0), None, &problems, None)
        .expect("valid preferences");
    assert_ne!(
        result.recommendation,
        "AVOID - Known major problems with this model"
    );
}
