//! Cost-of-ownership arithmetic: upfront acquisition, operating costs over
//! the horizon, and the resulting net financial position.

use serde::{Deserialize, Serialize};

use crate::domain::FuelType;
use crate::valuation::DepreciationModel;

use super::{OwnershipScenario, ScenarioPolicy};

/// Upfront costs to put the scenario's vehicles in the driveway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionCosts {
    pub purchase_price: f64,
    /// Negative: money credited back at the dealer.
    pub trade_in_credit: f64,
    pub sales_tax: f64,
    pub registration: f64,
    pub transfer_fees: f64,
    pub trailer: f64,
    pub total: f64,
}

/// Per-vehicle fuel/insurance/registration/maintenance plus shared storage
/// and trailer depreciation over the horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleOperatingCosts {
    pub vehicle: String,
    pub fuel: f64,
    pub insurance: f64,
    pub registration: f64,
    pub maintenance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingCosts {
    pub per_vehicle: Vec<VehicleOperatingCosts>,
    pub storage: f64,
    pub trailer_depreciation: f64,
    pub total: f64,
}

/// End value of one vehicle at the horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutureValue {
    pub vehicle: String,
    pub value: f64,
}

/// Full financial picture at the end of the horizon. `net_position` is
/// retained value plus unlocked credits minus everything spent; negative
/// means the scenario costs money overall, as ownership usually does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetPosition {
    pub acquisition: AcquisitionCosts,
    pub operating: OperatingCosts,
    pub future_values: Vec<FutureValue>,
    pub total_future_value: f64,
    pub credits: f64,
    pub total_costs: f64,
    pub net_position: f64,
    pub monthly_equivalent: f64,
}

pub fn acquisition_costs(scenario: &OwnershipScenario) -> AcquisitionCosts {
    let purchase_price: f64 = scenario
        .vehicles
        .iter()
        .map(|vehicle| vehicle.purchase_price)
        .sum();
    let vehicle_count = scenario.vehicles.len() as f64;

    let trade_in_credit = -scenario.trade_in_value;
    let sales_tax = (purchase_price - scenario.trade_in_value) * scenario.sales_tax_rate;
    let registration = scenario.registration_fee * vehicle_count;
    let transfer_fees = scenario.transfer_fee * vehicle_count;
    let trailer = scenario.trailer_cost;

    AcquisitionCosts {
        purchase_price,
        trade_in_credit,
        sales_tax,
        registration,
        transfer_fees,
        trailer,
        total: purchase_price + trade_in_credit + sales_tax + registration + transfer_fees + trailer,
    }
}

/// Each vehicle is charged the scenario's full annual mileage; callers model
/// split driving by lowering the mileage figure.
pub fn operating_costs(scenario: &OwnershipScenario, policy: &ScenarioPolicy) -> OperatingCosts {
    let months = f64::from(scenario.months_to_analyze);
    let years = months / 12.0;
    let miles = scenario.annual_mileage * years;

    let per_vehicle: Vec<VehicleOperatingCosts> = scenario
        .vehicles
        .iter()
        .map(|vehicle| {
            let fuel = if vehicle.fuel_type == FuelType::Electric {
                miles * policy.electric_cost_per_mile
            } else {
                let mpg = (vehicle.mpg_city + vehicle.mpg_highway) / 2.0;
                if mpg > 0.0 {
                    miles / mpg * policy.gas_price_per_gallon
                } else {
                    0.0
                }
            };

            VehicleOperatingCosts {
                vehicle: vehicle.name.clone(),
                fuel,
                insurance: vehicle.insurance_annual * years,
                registration: vehicle.registration_annual * years,
                maintenance: miles * vehicle.maintenance_per_mile,
            }
        })
        .collect();

    let storage = scenario.storage_cost_monthly * months;
    let trailer_depreciation = if scenario.trailer_cost > 0.0 {
        scenario.trailer_depreciation_annual * years
    } else {
        0.0
    };

    let total = per_vehicle
        .iter()
        .map(|costs| costs.fuel + costs.insurance + costs.registration + costs.maintenance)
        .sum::<f64>()
        + storage
        + trailer_depreciation;

    OperatingCosts {
        per_vehicle,
        storage,
        trailer_depreciation,
        total,
    }
}

pub fn net_position(
    scenario: &OwnershipScenario,
    policy: &ScenarioPolicy,
    depreciation: &DepreciationModel,
) -> NetPosition {
    let acquisition = acquisition_costs(scenario);
    let operating = operating_costs(scenario, policy);

    let future_values: Vec<FutureValue> = scenario
        .vehicles
        .iter()
        .map(|vehicle| {
            let projections = depreciation.project_value(
                vehicle,
                scenario.months_to_analyze,
                scenario.annual_mileage,
            );
            let value = projections.last().map_or(vehicle.purchase_price, |p| p.value);
            FutureValue {
                vehicle: vehicle.name.clone(),
                value,
            }
        })
        .collect();
    let total_future_value: f64 = future_values.iter().map(|fv| fv.value).sum();

    // Credits unlock only once the horizon reaches the unlock month.
    let credits = if scenario.months_to_analyze >= scenario.months_until_credits {
        scenario.pending_credits
    } else {
        0.0
    };

    let total_costs = acquisition.total + operating.total;
    let net = total_future_value + credits - total_costs;
    let monthly_equivalent = -net / f64::from(scenario.months_to_analyze.max(1));

    NetPosition {
        acquisition,
        operating,
        future_values,
        total_future_value,
        credits,
        total_costs,
        net_position: net,
        monthly_equivalent,
    }
}
