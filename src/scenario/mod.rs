//! Multi-year ownership scenario analysis: total cost of ownership, lifestyle
//! functionality, depreciation projections, and a blended recommendation
//! score for ranking scenarios against each other.

pub mod costs;
pub mod credits;
pub mod functionality;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::ScenarioVehicle;
use crate::valuation::{DepreciationModel, MonthlyProjection};

pub use costs::{
    acquisition_costs, net_position, operating_costs, AcquisitionCosts, FutureValue, NetPosition,
    OperatingCosts, VehicleOperatingCosts,
};
pub use credits::CreditSchedule;
pub use functionality::{FunctionalityBreakdown, FunctionalityScorer, FunctionalityWeights};

/// One candidate ownership plan: which vehicles to hold, for how long, and
/// the money flows attached to acquiring and keeping them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipScenario {
    pub name: String,
    pub vehicles: Vec<ScenarioVehicle>,
    pub months_to_analyze: u32,
    pub annual_mileage: f64,
    /// Lump credit that unlocks only when the horizon reaches the unlock month.
    pub pending_credits: f64,
    pub months_until_credits: u32,
    pub trade_in_value: f64,
    pub sales_tax_rate: f64,
    pub registration_fee: f64,
    pub transfer_fee: f64,
    pub trailer_cost: f64,
    pub trailer_depreciation_annual: f64,
    pub storage_cost_monthly: f64,
}

/// Tunable pricing and blending constants. The financial range maps net
/// position onto a 0-10 score; it is policy, not an invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPolicy {
    pub gas_price_per_gallon: f64,
    pub electric_cost_per_mile: f64,
    pub financial_weight: f64,
    pub functionality_weight: f64,
    pub financial_floor: f64,
    pub financial_ceiling: f64,
}

impl Default for ScenarioPolicy {
    fn default() -> Self {
        Self {
            gas_price_per_gallon: 3.50,
            electric_cost_per_mile: 0.04,
            financial_weight: 0.4,
            functionality_weight: 0.6,
            financial_floor: -30_000.0,
            financial_ceiling: 10_000.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("scenario `{0}` has no vehicles")]
    EmptyScenario(String),
    #[error("scenario `{0}` has a zero-month horizon")]
    ZeroHorizon(String),
}

/// Depreciation outlook for one vehicle over the horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleDepreciation {
    pub vehicle: String,
    pub current_value: f64,
    pub future_value: f64,
    pub total_depreciation: f64,
    pub projections: Vec<MonthlyProjection>,
}

/// Complete analysis of one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioAnalysis {
    pub scenario_name: String,
    pub financial: NetPosition,
    /// Average functionality across the scenario's vehicles, 0-10.
    pub functionality_score: f64,
    pub functionality_details: Vec<FunctionalityBreakdown>,
    pub depreciation: Vec<VehicleDepreciation>,
    /// Financial and functionality blend, 0-10, higher is better.
    pub recommendation_score: f64,
}

/// One row of the side-by-side comparison table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub scenario: String,
    pub recommendation_score: f64,
    pub functionality_score: f64,
    pub net_position: f64,
    pub monthly_cost: f64,
    pub total_costs: f64,
}

/// Ranked outcome of comparing several scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub analyses: Vec<ScenarioAnalysis>,
    /// Same analyses ordered by recommendation score, best first.
    pub ranked: Vec<ScenarioAnalysis>,
    pub best_scenario: String,
    pub table: Vec<ComparisonRow>,
}

/// Analyzes and ranks ownership scenarios with a fixed valuation year and a
/// caller-chosen functionality weighting.
#[derive(Debug, Clone)]
pub struct ScenarioComparator {
    depreciation: DepreciationModel,
    scorer: FunctionalityScorer,
    policy: ScenarioPolicy,
}

impl ScenarioComparator {
    pub fn new(
        depreciation: DepreciationModel,
        scorer: FunctionalityScorer,
        policy: ScenarioPolicy,
    ) -> Self {
        Self {
            depreciation,
            scorer,
            policy,
        }
    }

    pub fn for_year(valuation_year: i32) -> Self {
        Self::new(
            DepreciationModel::for_year(valuation_year),
            FunctionalityScorer::default(),
            ScenarioPolicy::default(),
        )
    }

    pub fn analyze_scenario(
        &self,
        scenario: &OwnershipScenario,
    ) -> Result<ScenarioAnalysis, ScenarioError> {
        if scenario.vehicles.is_empty() {
            return Err(ScenarioError::EmptyScenario(scenario.name.clone()));
        }
        if scenario.months_to_analyze == 0 {
            return Err(ScenarioError::ZeroHorizon(scenario.name.clone()));
        }

        let financial = costs::net_position(scenario, &self.policy, &self.depreciation);

        let has_trailer = scenario.trailer_cost > 0.0;
        let functionality_details: Vec<FunctionalityBreakdown> = scenario
            .vehicles
            .iter()
            .map(|vehicle| self.scorer.score(vehicle, has_trailer))
            .collect();
        let functionality_score = functionality_details
            .iter()
            .map(|breakdown| breakdown.weighted_total)
            .sum::<f64>()
            / functionality_details.len() as f64;

        let depreciation = scenario
            .vehicles
            .iter()
            .map(|vehicle| self.depreciation_outlook(vehicle, scenario))
            .collect();

        let recommendation_score =
            self.recommendation_score(financial.net_position, functionality_score);

        debug!(
            scenario = %scenario.name,
            net = financial.net_position,
            functionality = functionality_score,
            recommendation = recommendation_score,
            "scenario analyzed"
        );

        Ok(ScenarioAnalysis {
            scenario_name: scenario.name.clone(),
            financial,
            functionality_score,
            functionality_details,
            depreciation,
            recommendation_score,
        })
    }

    /// Analyzes every scenario and ranks by recommendation score descending.
    pub fn compare_scenarios(
        &self,
        scenarios: &[OwnershipScenario],
    ) -> Result<ScenarioComparison, ScenarioError> {
        let analyses: Vec<ScenarioAnalysis> = scenarios
            .iter()
            .map(|scenario| self.analyze_scenario(scenario))
            .collect::<Result<_, _>>()?;

        let mut ranked = analyses.clone();
        ranked.sort_by(|a, b| b.recommendation_score.total_cmp(&a.recommendation_score));

        let best_scenario = ranked
            .first()
            .map(|analysis| analysis.scenario_name.clone())
            .unwrap_or_default();

        info!(
            scenarios = analyses.len(),
            best = %best_scenario,
            "scenario comparison complete"
        );

        let table = ranked
            .iter()
            .map(|analysis| ComparisonRow {
                scenario: analysis.scenario_name.clone(),
                recommendation_score: analysis.recommendation_score,
                functionality_score: analysis.functionality_score,
                net_position: analysis.financial.net_position,
                monthly_cost: analysis.financial.monthly_equivalent,
                total_costs: analysis.financial.total_costs,
            })
            .collect();

        Ok(ScenarioComparison {
            analyses,
            ranked,
            best_scenario,
            table,
        })
    }

    fn depreciation_outlook(
        &self,
        vehicle: &ScenarioVehicle,
        scenario: &OwnershipScenario,
    ) -> VehicleDepreciation {
        let projections = self.depreciation.project_value(
            vehicle,
            scenario.months_to_analyze,
            scenario.annual_mileage,
        );
        let future_value = projections
            .last()
            .map_or(vehicle.purchase_price, |p| p.value);

        VehicleDepreciation {
            vehicle: vehicle.name.clone(),
            current_value: vehicle.purchase_price,
            future_value,
            total_depreciation: vehicle.purchase_price - future_value,
            projections,
        }
    }

    /// Net position mapped onto [0, 10] across the policy range, then blended
    /// with functionality.
    fn recommendation_score(&self, net_position: f64, functionality: f64) -> f64 {
        let policy = &self.policy;
        let span = policy.financial_ceiling - policy.financial_floor;
        let financial = ((net_position - policy.financial_floor) / span * 10.0).clamp(0.0, 10.0);
        financial * policy.financial_weight + functionality * policy.functionality_weight
    }
}
