use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier for a catalog vehicle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct VehicleId(pub i64);

/// Identifier for a market listing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ListingId(pub i64);

/// Driven wheels of a vehicle, as advertised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Drivetrain {
    FrontWheel,
    RearWheel,
    AllWheel,
    FourWheel,
}

impl Drivetrain {
    /// AWD and 4WD both satisfy an off-road drivetrain requirement.
    pub const fn is_four_wheel_capable(self) -> bool {
        matches!(self, Drivetrain::AllWheel | Drivetrain::FourWheel)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Drivetrain::FrontWheel => "FWD",
            Drivetrain::RearWheel => "RWD",
            Drivetrain::AllWheel => "AWD",
            Drivetrain::FourWheel => "4WD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelType {
    Gasoline,
    Diesel,
    Hybrid,
    Electric,
}

/// Advertised mechanical and cosmetic condition of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// Immutable catalog record for one make/model/year/trim. Created by import,
/// never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub trim: String,
    pub body_style: String,
    pub drivetrain: Drivetrain,
    pub fuel_type: FuelType,
    pub seating_capacity: u8,
    pub cargo_capacity_cuft: f64,
    pub towing_capacity_lbs: u32,
    pub mpg_city: f64,
    pub mpg_highway: f64,
    pub mpg_combined: f64,
    pub mpge: f64,
    pub legroom_front_in: f64,
    pub legroom_rear_in: f64,
    pub headroom_front_in: f64,
    pub headroom_rear_in: f64,
    pub msrp: f64,
}

impl Vehicle {
    pub fn display_name(&self) -> String {
        if self.trim.is_empty() {
            format!("{} {} {}", self.year, self.make, self.model)
        } else {
            format!("{} {} {} {}", self.year, self.make, self.model, self.trim)
        }
    }
}

/// One market instance of a catalog vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub vehicle_id: VehicleId,
    pub listing_date: NaiveDate,
    pub mileage: u32,
    pub asking_price: f64,
    pub sale_price: Option<f64>,
    pub sold: bool,
    pub condition: Condition,
    pub city: String,
    pub state: String,
    pub region: String,
    pub has_leather: bool,
    pub has_tow_package: bool,
    pub has_nav: bool,
    pub has_sunroof: bool,
    pub has_premium_audio: bool,
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProblemSeverity {
    Minor,
    Moderate,
    Major,
    Critical,
}

impl ProblemSeverity {
    /// Major and critical problems can force an avoid recommendation.
    pub const fn is_severe(self) -> bool {
        matches!(self, ProblemSeverity::Major | ProblemSeverity::Critical)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProblemFrequency {
    Rare,
    Occasional,
    Common,
    Widespread,
}

/// Known reliability issue tied to a make/model/year range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub make: String,
    pub model: String,
    pub year_start: i32,
    pub year_end: i32,
    pub category: String,
    pub description: String,
    pub severity: ProblemSeverity,
    pub frequency: ProblemFrequency,
    pub avg_repair_cost: f64,
}

impl Problem {
    pub fn applies_to_year(&self, year: i32) -> bool {
        self.year_start <= year && year <= self.year_end
    }
}

/// Per-vehicle comfort and ergonomic profile from hands-on testing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverFit {
    pub vehicle_id: VehicleId,
    pub recommended_height_min_in: u32,
    pub recommended_height_max_in: u32,
    /// 1-10 scales.
    pub seat_comfort_score: u8,
    pub lumbar_support_score: u8,
    pub seat_adjustability_score: u8,
    pub tall_driver_suitable: bool,
}

impl DriverFit {
    pub fn height_in_range(&self, driver_height_in: u32) -> bool {
        self.recommended_height_min_in <= driver_height_in
            && driver_height_in <= self.recommended_height_max_in
    }
}

/// Aggregated market data for one make/model/year, optionally per region.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarketStatistics {
    pub listing_count: u32,
    pub avg_price: Option<f64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub avg_mileage: Option<f64>,
    pub sold_count: u32,
    pub avg_sale_price: Option<f64>,
}

/// Vehicle record used by ownership projections: a concrete unit with a
/// purchase price and odometer reading, plus the running-cost figures the
/// catalog does not track. Constructed by the caller, consumed once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioVehicle {
    pub name: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub purchase_price: f64,
    pub current_mileage: f64,
    pub fuel_type: FuelType,
    pub cargo_capacity_cuft: f64,
    pub towing_capacity_lbs: u32,
    pub mpg_city: f64,
    pub mpg_highway: f64,
    pub mpge: f64,
    pub legroom_front_in: f64,
    pub legroom_rear_in: f64,
    /// 1-10 scale.
    pub ride_comfort_score: f64,
    pub roof_rack_capable: bool,
    pub four_wheel_capable: bool,
    pub insurance_annual: f64,
    pub registration_annual: f64,
    pub maintenance_per_mile: f64,
    /// 1-10 scales; both slow depreciation as they rise.
    pub brand_reliability_score: f64,
    pub market_demand_score: f64,
}

/// Compact vehicle identification carried on reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSummary {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub trim: String,
}

impl From<&Vehicle> for VehicleSummary {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            make: vehicle.make.clone(),
            model: vehicle.model.clone(),
            year: vehicle.year,
            trim: vehicle.trim.clone(),
        }
    }
}
