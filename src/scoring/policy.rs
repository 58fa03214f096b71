use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Error loading an external policy table.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("failed to read policy table: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed policy row: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct BrandRow {
    make: String,
    reliability: f64,
    resale: f64,
    maintenance: f64,
}

/// Per-make/per-model lookup tables behind the reliability, resale, and
/// maintenance sub-scores. Keyed lookups fall back to a documented default so
/// unknown brands score neutrally; the tables can be retuned from CSV or JSON
/// without touching scoring logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandPolicy {
    pub reliability: BTreeMap<String, f64>,
    pub default_reliability: f64,
    pub resale: BTreeMap<String, f64>,
    pub default_resale: f64,
    pub maintenance: BTreeMap<String, f64>,
    pub default_maintenance: f64,
    /// Model-level resale adjustments for historically strong retainers.
    pub model_resale_bonus: BTreeMap<String, f64>,
}

impl Default for BrandPolicy {
    fn default() -> Self {
        let reliability = BTreeMap::from(
            [
                ("Toyota", 95.0),
                ("Lexus", 98.0),
                ("Honda", 90.0),
                ("Acura", 88.0),
                ("Nissan", 72.0),
                ("Ford", 70.0),
                ("Chevrolet", 68.0),
                ("GMC", 68.0),
                ("RAM", 65.0),
                ("Tesla", 65.0),
            ]
            .map(|(make, score)| (make.to_string(), score)),
        );

        let resale = BTreeMap::from(
            [
                ("Toyota", 90.0),
                ("Lexus", 85.0),
                ("Honda", 85.0),
                ("Ford", 75.0),
                ("GMC", 70.0),
                ("Chevrolet", 65.0),
                ("Tesla", 60.0),
            ]
            .map(|(make, score)| (make.to_string(), score)),
        );

        let maintenance = BTreeMap::from(
            [
                ("Toyota", 90.0),
                ("Honda", 88.0),
                ("Tesla", 80.0),
                ("Lexus", 75.0),
                ("Ford", 70.0),
                ("Chevrolet", 68.0),
                ("GMC", 68.0),
            ]
            .map(|(make, score)| (make.to_string(), score)),
        );

        let model_resale_bonus = BTreeMap::from(
            [
                ("Tacoma", 10.0),
                ("4Runner", 10.0),
                ("Land Cruiser", 10.0),
                ("GX", 10.0),
                ("LX", 10.0),
                ("F-150", 5.0),
            ]
            .map(|(model, bonus)| (model.to_string(), bonus)),
        );

        Self {
            reliability,
            default_reliability: 75.0,
            resale,
            default_resale: 70.0,
            maintenance,
            default_maintenance: 70.0,
            model_resale_bonus,
        }
    }
}

impl BrandPolicy {
    pub fn reliability_score(&self, make: &str) -> f64 {
        self.reliability
            .get(make)
            .copied()
            .unwrap_or(self.default_reliability)
    }

    pub fn resale_score(&self, make: &str, model: &str) -> f64 {
        let base = self.resale.get(make).copied().unwrap_or(self.default_resale);
        base + self.model_resale_bonus.get(model).copied().unwrap_or(0.0)
    }

    pub fn maintenance_score(&self, make: &str) -> f64 {
        self.maintenance
            .get(make)
            .copied()
            .unwrap_or(self.default_maintenance)
    }

    /// Replaces the per-make tables from a `make,reliability,resale,maintenance`
    /// CSV. Model-level bonuses keep their current values.
    pub fn load_csv(&mut self, path: &Path) -> Result<(), PolicyError> {
        let mut reader = csv::Reader::from_path(path)?;

        self.reliability.clear();
        self.resale.clear();
        self.maintenance.clear();

        for row in reader.deserialize() {
            let row: BrandRow = row?;
            self.reliability.insert(row.make.clone(), row.reliability);
            self.resale.insert(row.make.clone(), row.resale);
            self.maintenance.insert(row.make, row.maintenance);
        }

        Ok(())
    }

    pub fn from_csv_path(path: &Path) -> Result<Self, PolicyError> {
        let mut policy = Self::default();
        policy.load_csv(path)?;
        Ok(policy)
    }
}

/// Categorical deal quality derived from price delta and total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealQuality {
    Excellent,
    VeryGood,
    Good,
    Fair,
    SlightlyOverpriced,
    Overpriced,
}

impl DealQuality {
    pub const fn label(self) -> &'static str {
        match self {
            DealQuality::Excellent => "Excellent Deal",
            DealQuality::VeryGood => "Very Good Deal",
            DealQuality::Good => "Good Deal",
            DealQuality::Fair => "Fair Deal",
            DealQuality::SlightlyOverpriced => "Slightly Overpriced",
            DealQuality::Overpriced => "Overpriced",
        }
    }
}

/// One row of the deal-quality ladder. `None` bounds always match, so the
/// final catch-all row carries no bounds at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealRule {
    pub max_price_delta_pct: Option<f64>,
    pub min_total_score: Option<f64>,
    pub quality: DealQuality,
}

impl DealRule {
    fn matches(&self, price_delta_pct: f64, total_score: f64) -> bool {
        self.max_price_delta_pct
            .map_or(true, |max| price_delta_pct <= max)
            && self.min_total_score.map_or(true, |min| total_score >= min)
    }
}

/// Deal ladder ordered from most to least favorable; first match wins.
pub fn default_deal_rules() -> Vec<DealRule> {
    vec![
        DealRule {
            max_price_delta_pct: Some(-15.0),
            min_total_score: Some(75.0),
            quality: DealQuality::Excellent,
        },
        DealRule {
            max_price_delta_pct: Some(-10.0),
            min_total_score: Some(70.0),
            quality: DealQuality::VeryGood,
        },
        DealRule {
            max_price_delta_pct: Some(-5.0),
            min_total_score: Some(65.0),
            quality: DealQuality::Good,
        },
        DealRule {
            max_price_delta_pct: Some(5.0),
            min_total_score: Some(60.0),
            quality: DealQuality::Fair,
        },
        DealRule {
            max_price_delta_pct: Some(10.0),
            min_total_score: None,
            quality: DealQuality::SlightlyOverpriced,
        },
        DealRule {
            max_price_delta_pct: None,
            min_total_score: None,
            quality: DealQuality::Overpriced,
        },
    ]
}

pub fn classify_deal(rules: &[DealRule], price_delta_pct: f64, total_score: f64) -> DealQuality {
    rules
        .iter()
        .find(|rule| rule.matches(price_delta_pct, total_score))
        .map(|rule| rule.quality)
        .unwrap_or(DealQuality::Overpriced)
}

/// One row of the recommendation ladder, combining score, price delta, and
/// known severe problems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRule {
    pub min_total_score: Option<f64>,
    pub max_price_delta_pct: Option<f64>,
    pub requires_severe_problem: bool,
    pub advice: String,
}

impl RecommendationRule {
    fn matches(&self, total_score: f64, price_delta_pct: f64, has_severe_problem: bool) -> bool {
        self.min_total_score.map_or(true, |min| total_score >= min)
            && self
                .max_price_delta_pct
                .map_or(true, |max| price_delta_pct <= max)
            && (!self.requires_severe_problem || has_severe_problem)
    }
}

/// Recommendation ladder; a severe-problem row sits above the generic avoid
/// row so known defects surface in the advice even at a favorable price.
pub fn default_recommendation_rules() -> Vec<RecommendationRule> {
    let rule = |min_total_score: Option<f64>,
                max_price_delta_pct: Option<f64>,
                requires_severe_problem: bool,
                advice: &str| RecommendationRule {
        min_total_score,
        max_price_delta_pct,
        requires_severe_problem,
        advice: advice.to_string(),
    };

    vec![
        rule(
            Some(80.0),
            Some(-10.0),
            false,
            "STRONG BUY - Excellent vehicle at great price",
        ),
        rule(Some(70.0), Some(-5.0), false, "BUY - Good vehicle at fair price"),
        rule(
            Some(65.0),
            Some(5.0),
            false,
            "CONSIDER - Decent option, negotiate lower",
        ),
        rule(Some(60.0), None, false, "HOLD - Explore other options first"),
        rule(
            None,
            None,
            true,
            "AVOID - Known major problems with this model",
        ),
        rule(None, None, false, "AVOID - Better options available"),
    ]
}

pub fn recommend(
    rules: &[RecommendationRule],
    total_score: f64,
    price_delta_pct: f64,
    has_severe_problem: bool,
) -> String {
    rules
        .iter()
        .find(|rule| rule.matches(total_score, price_delta_pct, has_severe_problem))
        .map(|rule| rule.advice.clone())
        .unwrap_or_else(|| "AVOID - Better options available".to_string())
}
