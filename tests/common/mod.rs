//! Shared in-memory store and fixture inventory for the integration tests.

use std::collections::HashMap;

use chrono::NaiveDate;

use car_valuation::domain::{
    Condition, DriverFit, Drivetrain, FuelType, Listing, ListingId, MarketStatistics, Problem,
    ProblemFrequency, ProblemSeverity, Vehicle, VehicleId,
};
use car_valuation::preferences::{BuyerPreferences, PreferenceWeights};
use car_valuation::store::{ListingQuery, RecordStore, StoreError, VehicleFilter};

/// Vector-backed store used by every integration test.
pub struct MemoryStore {
    pub vehicles: Vec<Vehicle>,
    pub listings: Vec<Listing>,
    pub problems: Vec<Problem>,
    pub fits: Vec<DriverFit>,
    pub distances: HashMap<String, f64>,
}

impl RecordStore for MemoryStore {
    fn vehicle(&self, id: VehicleId) -> Result<Option<Vehicle>, StoreError> {
        Ok(self.vehicles.iter().find(|v| v.id == id).cloned())
    }

    fn find_vehicles(&self, filter: &VehicleFilter) -> Result<Vec<Vehicle>, StoreError> {
        Ok(self
            .vehicles
            .iter()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect())
    }

    fn listings(&self, query: &ListingQuery) -> Result<Vec<Listing>, StoreError> {
        Ok(self
            .listings
            .iter()
            .filter(|l| query.matches(l))
            .cloned()
            .collect())
    }

    fn market_statistics(
        &self,
        make: &str,
        model: &str,
        year: i32,
        region: Option<&str>,
    ) -> Result<Option<MarketStatistics>, StoreError> {
        let vehicle_ids: Vec<VehicleId> = self
            .vehicles
            .iter()
            .filter(|v| v.make == make && v.model == model && v.year == year)
            .map(|v| v.id)
            .collect();

        let group: Vec<&Listing> = self
            .listings
            .iter()
            .filter(|l| vehicle_ids.contains(&l.vehicle_id))
            .filter(|l| region.map_or(true, |r| l.region == r))
            .collect();
        if group.is_empty() {
            return Ok(None);
        }

        let count = group.len() as f64;
        let prices: Vec<f64> = group.iter().map(|l| l.asking_price).collect();
        let avg_price = prices.iter().sum::<f64>() / count;
        let sold: Vec<f64> = group
            .iter()
            .filter(|l| l.sold)
            .filter_map(|l| l.sale_price)
            .collect();

        Ok(Some(MarketStatistics {
            listing_count: group.len() as u32,
            avg_price: Some(avg_price),
            min_price: prices.iter().copied().reduce(f64::min),
            max_price: prices.iter().copied().reduce(f64::max),
            avg_mileage: Some(group.iter().map(|l| f64::from(l.mileage)).sum::<f64>() / count),
            sold_count: group.iter().filter(|l| l.sold).count() as u32,
            avg_sale_price: if sold.is_empty() {
                None
            } else {
                Some(sold.iter().sum::<f64>() / sold.len() as f64)
            },
        }))
    }

    fn problems(
        &self,
        make: &str,
        model: &str,
        year: Option<i32>,
    ) -> Result<Vec<Problem>, StoreError> {
        Ok(self
            .problems
            .iter()
            .filter(|p| p.make == make && p.model == model)
            .filter(|p| year.map_or(true, |y| p.applies_to_year(y)))
            .cloned()
            .collect())
    }

    fn fit_data(&self, id: VehicleId) -> Result<Option<DriverFit>, StoreError> {
        Ok(self.fits.iter().find(|f| f.vehicle_id == id).cloned())
    }

    fn closest_distance(&self, city: &str, _state: &str) -> Result<Option<f64>, StoreError> {
        Ok(self.distances.get(city).copied())
    }
}

pub fn vehicle(
    id: i64,
    make: &str,
    model: &str,
    year: i32,
    drivetrain: Drivetrain,
    fuel_type: FuelType,
    msrp: f64,
) -> Vehicle {
    Vehicle {
        id: VehicleId(id),
        make: make.to_string(),
        model: model.to_string(),
        year,
        trim: String::new(),
        body_style: "SUV".to_string(),
        drivetrain,
        fuel_type,
        seating_capacity: 5,
        cargo_capacity_cuft: 70.0,
        towing_capacity_lbs: 5_000,
        mpg_city: 18.0,
        mpg_highway: 23.0,
        mpg_combined: 20.0,
        mpge: 0.0,
        legroom_front_in: 42.0,
        legroom_rear_in: 36.0,
        headroom_front_in: 39.0,
        headroom_rear_in: 38.0,
        msrp,
    }
}

pub fn listing(
    id: i64,
    vehicle_id: i64,
    asking_price: f64,
    mileage: u32,
    region: &str,
) -> Listing {
    Listing {
        id: ListingId(id),
        vehicle_id: VehicleId(vehicle_id),
        listing_date: NaiveDate::from_ymd_opt(2026, 2, 14).expect("valid date"),
        mileage,
        asking_price,
        sale_price: None,
        sold: false,
        condition: Condition::Good,
        city: "Sacramento".to_string(),
        state: "CA".to_string(),
        region: region.to_string(),
        has_leather: false,
        has_tow_package: false,
        has_nav: false,
        has_sunroof: false,
        has_premium_audio: false,
        source: "fixture".to_string(),
    }
}

pub fn fit(vehicle_id: i64, tall_suitable: bool, max_height: u32) -> DriverFit {
    DriverFit {
        vehicle_id: VehicleId(vehicle_id),
        recommended_height_min_in: 60,
        recommended_height_max_in: max_height,
        seat_comfort_score: 8,
        lumbar_support_score: 8,
        seat_adjustability_score: 8,
        tall_driver_suitable: tall_suitable,
    }
}

pub fn problem(make: &str, model: &str, years: (i32, i32), severity: ProblemSeverity) -> Problem {
    Problem {
        make: make.to_string(),
        model: model.to_string(),
        year_start: years.0,
        year_end: years.1,
        category: "drivetrain".to_string(),
        description: "fixture problem".to_string(),
        severity,
        frequency: ProblemFrequency::Common,
        avg_repair_cost: 2_500.0,
    }
}

/// Captures engine tracing in test output when `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Inventory with three models across two regions: a Tacoma (tall-friendly),
/// a Model Y (cramped for tall drivers), and a Lexus GX.
pub fn seeded_store() -> MemoryStore {
    init_tracing();
    let vehicles = vec![
        vehicle(
            1,
            "Toyota",
            "Tacoma",
            2023,
            Drivetrain::FourWheel,
            FuelType::Gasoline,
            44_000.0,
        ),
        vehicle(
            2,
            "Tesla",
            "Model Y",
            2024,
            Drivetrain::AllWheel,
            FuelType::Electric,
            50_000.0,
        ),
        vehicle(
            3,
            "Lexus",
            "GX",
            2022,
            Drivetrain::FourWheel,
            FuelType::Gasoline,
            64_000.0,
        ),
    ];

    let listings = vec![
        listing(10, 1, 36_000.0, 28_000, "Bay Area"),
        listing(11, 1, 39_500.0, 22_000, "Bay Area"),
        listing(12, 1, 33_000.0, 41_000, "Central Valley"),
        listing(13, 2, 41_000.0, 19_000, "Bay Area"),
        listing(14, 2, 38_500.0, 30_000, "Central Valley"),
        listing(15, 3, 52_000.0, 45_000, "Bay Area"),
    ];

    let fits = vec![fit(1, true, 80), fit(2, false, 74), fit(3, true, 79)];

    let problems = vec![problem(
        "Tesla",
        "Model Y",
        (2020, 2021),
        ProblemSeverity::Major,
    )];

    let mut distances = HashMap::new();
    distances.insert("Sacramento".to_string(), 88.0);

    MemoryStore {
        vehicles,
        listings,
        problems,
        fits,
        distances,
    }
}

pub fn tall_buyer(budget: f64) -> BuyerPreferences {
    let mut prefs = BuyerPreferences::new(budget, 75, PreferenceWeights::balanced());
    prefs.require_tall_driver_suitable = true;
    prefs
}
