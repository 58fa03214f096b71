use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{DriverFit, Listing, MarketStatistics, Problem, Vehicle, VehicleId};

/// Error enumeration for record store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// Criteria for catalog lookups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleFilter {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
}

impl VehicleFilter {
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        self.make
            .as_deref()
            .map_or(true, |make| vehicle.make == make)
            && self
                .model
                .as_deref()
                .map_or(true, |model| vehicle.model == model)
            && self.year_min.map_or(true, |min| vehicle.year >= min)
            && self.year_max.map_or(true, |max| vehicle.year <= max)
    }
}

/// Criteria for listing lookups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingQuery {
    pub vehicle_id: Option<VehicleId>,
    pub region: Option<String>,
    pub min_date: Option<NaiveDate>,
    pub sold_only: bool,
}

impl ListingQuery {
    pub fn matches(&self, listing: &Listing) -> bool {
        self.vehicle_id.map_or(true, |id| listing.vehicle_id == id)
            && self
                .region
                .as_deref()
                .map_or(true, |region| listing.region == region)
            && self
                .min_date
                .map_or(true, |date| listing.listing_date >= date)
            && (!self.sold_only || listing.sold)
    }
}

/// Read-only boundary to the external record store. The engine never writes
/// through this trait; persistence and import jobs live elsewhere.
pub trait RecordStore: Send + Sync {
    fn vehicle(&self, id: VehicleId) -> Result<Option<Vehicle>, StoreError>;

    fn find_vehicles(&self, filter: &VehicleFilter) -> Result<Vec<Vehicle>, StoreError>;

    fn listings(&self, query: &ListingQuery) -> Result<Vec<Listing>, StoreError>;

    fn market_statistics(
        &self,
        make: &str,
        model: &str,
        year: i32,
        region: Option<&str>,
    ) -> Result<Option<MarketStatistics>, StoreError>;

    fn problems(
        &self,
        make: &str,
        model: &str,
        year: Option<i32>,
    ) -> Result<Vec<Problem>, StoreError>;

    fn fit_data(&self, id: VehicleId) -> Result<Option<DriverFit>, StoreError>;

    /// Optional geolocation collaborator. A store without distance data keeps
    /// the default; an absent result must never fail scoring.
    fn closest_distance(&self, _city: &str, _state: &str) -> Result<Option<f64>, StoreError> {
        Ok(None)
    }
}
