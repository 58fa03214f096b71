//! Aggregate analysis over the listing inventory: regional pricing spreads,
//! underpriced listings, and overall market heat.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Listing, Vehicle, VehicleSummary};
use crate::store::{ListingQuery, RecordStore, StoreError, VehicleFilter};

/// Price statistics for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionStats {
    pub region: String,
    pub listing_count: u32,
    pub avg_price: f64,
    pub median_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub price_std_dev: f64,
    pub avg_mileage: f64,
    pub sold_count: u32,
    pub avg_sale_price: Option<f64>,
}

/// Cheapest-versus-priciest region spread for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageOpportunity {
    pub cheapest_region: String,
    pub cheapest_avg_price: f64,
    pub priciest_region: String,
    pub priciest_avg_price: f64,
    pub price_spread: f64,
}

/// Unsold listing priced meaningfully below its model-year average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderpricedListing {
    pub listing: Listing,
    pub vehicle: VehicleSummary,
    pub model_year_avg_price: f64,
    pub savings: f64,
    pub savings_pct: f64,
}

/// Overall supply/demand read with plain-language advice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketHeat {
    pub listing_count: u32,
    pub sold_count: u32,
    pub sell_through_rate: f64,
    pub classification: String,
    pub advice: String,
}

/// Read-only analytics over a record store.
pub struct MarketAnalyzer<S: RecordStore> {
    store: Arc<S>,
}

impl<S: RecordStore> MarketAnalyzer<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Per-region price statistics for one make/model, optionally pinned to a
    /// model year. Regions are returned cheapest first.
    pub fn regional_pricing(
        &self,
        make: &str,
        model: &str,
        year: Option<i32>,
    ) -> Result<Vec<RegionStats>, StoreError> {
        let mut by_region: BTreeMap<String, Vec<Listing>> = BTreeMap::new();
        for (_, listing) in self.model_listings(make, model, year)? {
            by_region.entry(listing.region.clone()).or_default().push(listing);
        }

        let mut stats: Vec<RegionStats> = by_region
            .into_iter()
            .map(|(region, listings)| region_stats(region, &listings))
            .collect();
        stats.sort_by(|a, b| a.avg_price.total_cmp(&b.avg_price));

        debug!(make, model, regions = stats.len(), "regional pricing computed");
        Ok(stats)
    }

    /// Spread between the cheapest and priciest regions, when at least two
    /// regions have data.
    pub fn arbitrage(
        &self,
        make: &str,
        model: &str,
        year: Option<i32>,
    ) -> Result<Option<ArbitrageOpportunity>, StoreError> {
        let stats = self.regional_pricing(make, model, year)?;
        let (Some(cheapest), Some(priciest)) = (stats.first(), stats.last()) else {
            return Ok(None);
        };
        if cheapest.region == priciest.region {
            return Ok(None);
        }

        Ok(Some(ArbitrageOpportunity {
            cheapest_region: cheapest.region.clone(),
            cheapest_avg_price: cheapest.avg_price,
            priciest_region: priciest.region.clone(),
            priciest_avg_price: priciest.avg_price,
            price_spread: priciest.avg_price - cheapest.avg_price,
        }))
    }

    /// Unsold listings asking at least `threshold_pct` percent below their
    /// model-year average, best savings first. Model years with a single
    /// listing have no meaningful average and are ignored.
    pub fn underpriced_listings(
        &self,
        threshold_pct: f64,
    ) -> Result<Vec<UnderpricedListing>, StoreError> {
        let vehicles = self.store.find_vehicles(&VehicleFilter::default())?;
        let vehicle_by_id: BTreeMap<_, _> = vehicles.iter().map(|v| (v.id, v)).collect();

        let listings = self.store.listings(&ListingQuery::default())?;

        let mut group_totals: BTreeMap<(String, String, i32), (f64, u32)> = BTreeMap::new();
        for listing in &listings {
            let Some(vehicle) = vehicle_by_id.get(&listing.vehicle_id) else {
                continue;
            };
            let key = (vehicle.make.clone(), vehicle.model.clone(), vehicle.year);
            let entry = group_totals.entry(key).or_insert((0.0, 0));
            entry.0 += listing.asking_price;
            entry.1 += 1;
        }

        let mut underpriced = Vec::new();
        for listing in listings {
            if listing.sold {
                continue;
            }
            let Some(vehicle) = vehicle_by_id.get(&listing.vehicle_id) else {
                continue;
            };
            let key = (vehicle.make.clone(), vehicle.model.clone(), vehicle.year);
            let Some(&(total, count)) = group_totals.get(&key) else {
                continue;
            };
            if count < 2 {
                continue;
            }

            let avg = total / f64::from(count);
            let savings = avg - listing.asking_price;
            let savings_pct = savings / avg * 100.0;
            if savings_pct >= threshold_pct {
                underpriced.push(UnderpricedListing {
                    vehicle: VehicleSummary::from(*vehicle),
                    listing,
                    model_year_avg_price: avg,
                    savings,
                    savings_pct,
                });
            }
        }

        underpriced.sort_by(|a, b| b.savings_pct.total_cmp(&a.savings_pct));
        Ok(underpriced)
    }

    /// Classifies the whole market by sell-through rate, with listing volume
    /// breaking the coarse tiers.
    pub fn market_heat(&self) -> Result<MarketHeat, StoreError> {
        let listings = self.store.listings(&ListingQuery::default())?;
        let listing_count = listings.len() as u32;
        let sold_count = listings.iter().filter(|listing| listing.sold).count() as u32;

        let sell_through_rate = if listing_count > 0 {
            f64::from(sold_count) / f64::from(listing_count) * 100.0
        } else {
            0.0
        };

        let (classification, advice) = if sell_through_rate > 60.0 {
            if listing_count < 10 {
                (
                    "Hot Seller's Market",
                    "Inventory is scarce and moving fast. Act quickly on good listings.",
                )
            } else {
                (
                    "Seller's Market",
                    "Vehicles are selling well. Expect limited negotiating room.",
                )
            }
        } else if sell_through_rate > 40.0 {
            (
                "Balanced Market",
                "Supply and demand are roughly even. Negotiate on overpriced listings.",
            )
        } else if listing_count > 20 {
            (
                "Buyer's Market",
                "Plenty of inventory is sitting. Negotiate aggressively.",
            )
        } else {
            (
                "Slow Buyer's Market",
                "Little is selling. Wait for price drops or make low offers.",
            )
        };

        Ok(MarketHeat {
            listing_count,
            sold_count,
            sell_through_rate,
            classification: classification.to_string(),
            advice: advice.to_string(),
        })
    }

    fn model_listings(
        &self,
        make: &str,
        model: &str,
        year: Option<i32>,
    ) -> Result<Vec<(Vehicle, Listing)>, StoreError> {
        let filter = VehicleFilter {
            make: Some(make.to_string()),
            model: Some(model.to_string()),
            year_min: year,
            year_max: year,
        };
        let vehicles = self.store.find_vehicles(&filter)?;

        let mut pairs = Vec::new();
        for vehicle in vehicles {
            let query = ListingQuery {
                vehicle_id: Some(vehicle.id),
                ..ListingQuery::default()
            };
            for listing in self.store.listings(&query)? {
                pairs.push((vehicle.clone(), listing));
            }
        }
        Ok(pairs)
    }
}

fn region_stats(region: String, listings: &[Listing]) -> RegionStats {
    let prices: Vec<f64> = listings.iter().map(|listing| listing.asking_price).collect();
    let count = prices.len();
    let avg_price = prices.iter().sum::<f64>() / count as f64;

    let mut sorted = prices.clone();
    sorted.sort_by(f64::total_cmp);
    let median_price = if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    };

    // Sample standard deviation; a single listing has no spread.
    let price_std_dev = if count > 1 {
        let variance = prices
            .iter()
            .map(|price| (price - avg_price).powi(2))
            .sum::<f64>()
            / (count - 1) as f64;
        variance.sqrt()
    } else {
        0.0
    };

    let avg_mileage = listings
        .iter()
        .map(|listing| f64::from(listing.mileage))
        .sum::<f64>()
        / count as f64;

    let sold: Vec<f64> = listings
        .iter()
        .filter(|listing| listing.sold)
        .filter_map(|listing| listing.sale_price)
        .collect();
    let sold_count = listings.iter().filter(|listing| listing.sold).count() as u32;
    let avg_sale_price = if sold.is_empty() {
        None
    } else {
        Some(sold.iter().sum::<f64>() / sold.len() as f64)
    };

    RegionStats {
        region,
        listing_count: count as u32,
        avg_price,
        median_price,
        min_price: sorted.first().copied().unwrap_or(0.0),
        max_price: sorted.last().copied().unwrap_or(0.0),
        price_std_dev,
        avg_mileage,
        sold_count,
        avg_sale_price,
    }
}
