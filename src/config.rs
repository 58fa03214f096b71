//! Environment-driven engine configuration. Every knob has a default so the
//! engine runs with no environment at all; a `.env` file is honored when
//! present.

use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::scenario::ScenarioPolicy;

/// Top-level configuration for the valuation engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Year ages are measured against. Fixed here so every component sees the
    /// same clock.
    pub valuation_year: i32,
    pub pricing: PricingConfig,
    pub blend: BlendConfig,
    pub telemetry: TelemetryConfig,
    /// Optional CSV overriding the built-in brand tables.
    pub brand_table_path: Option<PathBuf>,
}

/// Fuel and electricity price assumptions for scenario costing.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    pub gas_price_per_gallon: f64,
    pub electric_cost_per_mile: f64,
}

/// Recommendation-score blend and the net-position normalization range.
/// Tunable policy, not invariants.
#[derive(Debug, Clone)]
pub struct BlendConfig {
    pub financial_weight: f64,
    pub functionality_weight: f64,
    pub financial_floor: f64,
    pub financial_ceiling: f64,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl EngineConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let valuation_year = env::var("CV_VALUATION_YEAR")
            .unwrap_or_else(|_| "2026".to_string())
            .parse::<i32>()
            .map_err(|_| ConfigError::InvalidYear)?;

        let gas_price_per_gallon = parse_price("CV_GAS_PRICE", 3.50)?;
        let electric_cost_per_mile = parse_price("CV_ELECTRIC_COST_PER_MILE", 0.04)?;

        let financial_weight = parse_number("CV_FINANCIAL_WEIGHT", 0.4)?;
        let functionality_weight = parse_number("CV_FUNCTIONALITY_WEIGHT", 0.6)?;
        let financial_floor = parse_number("CV_FINANCIAL_FLOOR", -30_000.0)?;
        let financial_ceiling = parse_number("CV_FINANCIAL_CEILING", 10_000.0)?;
        if financial_ceiling <= financial_floor {
            return Err(ConfigError::InvalidRange);
        }

        let log_level = env::var("CV_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let brand_table_path = env::var("CV_BRAND_TABLE").ok().map(PathBuf::from);

        Ok(Self {
            valuation_year,
            pricing: PricingConfig {
                gas_price_per_gallon,
                electric_cost_per_mile,
            },
            blend: BlendConfig {
                financial_weight,
                functionality_weight,
                financial_floor,
                financial_ceiling,
            },
            telemetry: TelemetryConfig { log_level },
            brand_table_path,
        })
    }

    /// Assembles the scenario policy this configuration describes.
    pub fn scenario_policy(&self) -> ScenarioPolicy {
        ScenarioPolicy {
            gas_price_per_gallon: self.pricing.gas_price_per_gallon,
            electric_cost_per_mile: self.pricing.electric_cost_per_mile,
            financial_weight: self.blend.financial_weight,
            functionality_weight: self.blend.functionality_weight,
            financial_floor: self.blend.financial_floor,
            financial_ceiling: self.blend.financial_ceiling,
        }
    }
}

fn parse_price(var: &'static str, default: f64) -> Result<f64, ConfigError> {
    let value = parse_number(var, default)?;
    if value < 0.0 {
        return Err(ConfigError::InvalidPrice { var });
    }
    Ok(value)
}

fn parse_number(var: &'static str, default: f64) -> Result<f64, ConfigError> {
    let Ok(raw) = env::var(var) else {
        return Ok(default);
    };
    let value = raw
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidPrice { var })?;
    if !value.is_finite() {
        return Err(ConfigError::InvalidPrice { var });
    }
    Ok(value)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidYear,
    InvalidPrice { var: &'static str },
    InvalidRange,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidYear => write!(f, "CV_VALUATION_YEAR must be a valid year"),
            ConfigError::InvalidPrice { var } => {
                write!(f, "{var} must be a non-negative number")
            }
            ConfigError::InvalidRange => {
                write!(f, "CV_FINANCIAL_CEILING must be above CV_FINANCIAL_FLOOR")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
