//! Matching behavior through the public recommender: hard constraints,
//! ranking, skip accounting, and the dual-vehicle strategy.

mod common;

use std::sync::Arc;

use car_valuation::domain::{ListingId, VehicleId};
use car_valuation::preferences::{BuyerPreferences, PreferenceWeights};
use car_valuation::recommend::{ConstraintViolation, Recommender};
use car_valuation::scoring::ScoringEngine;
use car_valuation::store::ListingQuery;

use common::{listing, seeded_store, tall_buyer};

fn recommender(store: common::MemoryStore) -> Recommender<common::MemoryStore> {
    Recommender::new(Arc::new(store), ScoringEngine::for_year(2026))
}

#[test]
fn tall_driver_requirement_excludes_unsuitable_vehicles() {
    let recommender = recommender(seeded_store());
    let prefs = tall_buyer(60_000.0);

    let report = recommender
        .find_best_matches(&prefs, &ListingQuery::default(), 10)
        .expect("matching succeeds");

    // Model Y fit data says tall_driver_suitable = false; both of its
    // listings must land in the filtered set no matter the price.
    for matched in &report.matches {
        assert_ne!(matched.listing.vehicle_id, VehicleId(2));
    }
    let model_y_filtered = report
        .filtered
        .iter()
        .filter(|f| f.listing.vehicle_id == VehicleId(2))
        .count();
    assert_eq!(model_y_filtered, 2);
    assert!(report
        .filtered
        .iter()
        .filter(|f| f.listing.vehicle_id == VehicleId(2))
        .all(|f| f.violation == ConstraintViolation::NotTallDriverSuitable));
}

#[test]
fn budget_and_mileage_constraints_hold() {
    let recommender = recommender(seeded_store());
    let mut prefs = BuyerPreferences::new(40_000.0, 70, PreferenceWeights::balanced());
    prefs.max_mileage = 30_000;

    let report = recommender
        .find_best_matches(&prefs, &ListingQuery::default(), 10)
        .expect("matching succeeds");

    for matched in &report.matches {
        assert!(matched.listing.asking_price <= 40_000.0);
        assert!(matched.listing.mileage <= 30_000);
    }
    assert!(report
        .filtered
        .iter()
        .any(|f| f.violation == ConstraintViolation::OverBudget));
    assert!(report
        .filtered
        .iter()
        .any(|f| f.violation == ConstraintViolation::MileageTooHigh));
}

#[test]
fn matches_are_ranked_by_score_with_stable_ties() {
    let recommender = recommender(seeded_store());
    let prefs = BuyerPreferences::new(60_000.0, 70, PreferenceWeights::balanced());

    let report = recommender
        .find_best_matches(&prefs, &ListingQuery::default(), 10)
        .expect("matching succeeds");

    assert!(!report.matches.is_empty());
    for window in report.matches.windows(2) {
        let (a, b) = (&window[0], &window[1]);
        assert!(
            a.score.total_score > b.score.total_score
                || (a.score.total_score == b.score.total_score && a.listing.id < b.listing.id)
        );
    }
}

#[test]
fn limit_truncates_after_ranking() {
    let recommender = recommender(seeded_store());
    let prefs = BuyerPreferences::new(60_000.0, 70, PreferenceWeights::balanced());

    let full = recommender
        .find_best_matches(&prefs, &ListingQuery::default(), 10)
        .expect("matching succeeds");
    let top_two = recommender
        .find_best_matches(&prefs, &ListingQuery::default(), 2)
        .expect("matching succeeds");

    assert_eq!(top_two.matches.len(), 2);
    assert_eq!(top_two.matches[0].listing.id, full.matches[0].listing.id);
    assert_eq!(top_two.matches[1].listing.id, full.matches[1].listing.id);
}

#[test]
fn orphan_listing_is_skipped_not_fatal() {
    let mut store = seeded_store();
    store.listings.push(listing(99, 404, 30_000.0, 20_000, "Bay Area"));
    let recommender = recommender(store);
    let prefs = BuyerPreferences::new(60_000.0, 70, PreferenceWeights::balanced());

    let report = recommender
        .find_best_matches(&prefs, &ListingQuery::default(), 10)
        .expect("matching succeeds despite the orphan");

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].listing_id, ListingId(99));
    assert!(!report.matches.is_empty());
}

#[test]
fn matches_carry_distance_when_the_store_knows_it() {
    let recommender = recommender(seeded_store());
    let prefs = BuyerPreferences::new(60_000.0, 70, PreferenceWeights::balanced());

    let report = recommender
        .find_best_matches(&prefs, &ListingQuery::default(), 10)
        .expect("matching succeeds");

    // Every fixture listing sits in Sacramento, which the store geocodes.
    assert!(report
        .matches
        .iter()
        .all(|m| m.distance_miles == Some(88.0)));
}

#[test]
fn dual_strategy_pairs_stay_inside_the_budget() {
    let recommender = recommender(seeded_store());

    let report = recommender
        .dual_vehicle_strategy(100_000.0, 70, &ListingQuery::default())
        .expect("strategy succeeds");

    for pair in &report.pairs {
        assert!(pair.combined_price <= 100_000.0);
        assert_ne!(pair.daily.listing.id, pair.adventure.listing.id);
        let avg = (pair.daily.score.total_score + pair.adventure.score.total_score) / 2.0;
        assert!((pair.combined_score - avg).abs() < 1e-9);
    }
    for window in report.pairs.windows(2) {
        assert!(window[0].combined_score >= window[1].combined_score);
    }
}
