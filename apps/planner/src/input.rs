//! # Input Document
//!
//! The JSON document the planner reads: one event, its catalog, and
//! optional per-event settings.
//!
//! ```json
//! {
//!   "event": { "guest_count": 100, "cocktails_selected": ["mojito"] },
//!   "recipes": [ { "cocktail_id": "mojito", "ingredient_id": "ron", "quantity": 60, "unit": "ml" } ],
//!   "ingredients": [ { "id": "ron", "name": "Ron blanco", "package_volume": 750,
//!                      "measurement_unit": "ml", "purchase_unit": "botella 750ml" } ],
//!   "settings": { "hours": 4, "consumptionRate": 1.5 }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use barra_core::validation::validate_plan;
use barra_core::{CalculationSettings, DistributionMode, EventSnapshot, Ingredient, RecipeItem};
use serde::{Deserialize, Serialize};

use crate::config::CalculationDefaults;
use crate::error::{PlannerError, PlannerResult};

/// One planning request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanInput {
    pub event: EventSnapshot,

    #[serde(default)]
    pub recipes: Vec<RecipeItem>,

    #[serde(default)]
    pub ingredients: Vec<Ingredient>,

    /// Per-event settings; anything missing comes from the config.
    #[serde(default)]
    pub settings: SettingsOverrides,
}

/// `CalculationSettings` with every field optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsOverrides {
    #[serde(default)]
    pub hours: Option<f64>,
    #[serde(default)]
    pub consumption_rate: Option<f64>,
    #[serde(default)]
    pub safety_margin: Option<f64>,
    #[serde(default)]
    pub distribution: Option<HashMap<String, f64>>,
    #[serde(default)]
    pub extra_ice_bags: Option<i32>,
    #[serde(default)]
    pub distribution_mode: Option<DistributionMode>,
}

impl SettingsOverrides {
    /// Fills the gaps from the configured defaults.
    pub fn resolve(&self, defaults: &CalculationDefaults) -> CalculationSettings {
        CalculationSettings {
            hours: self.hours.unwrap_or(defaults.hours),
            consumption_rate: self.consumption_rate.unwrap_or(defaults.consumption_rate),
            safety_margin: self.safety_margin.unwrap_or(defaults.safety_margin),
            distribution: self.distribution.clone().unwrap_or_default(),
            extra_ice_bags: self.extra_ice_bags.or(defaults.extra_ice_bags),
            distribution_mode: self.distribution_mode.unwrap_or(defaults.distribution_mode),
        }
    }
}

impl PlanInput {
    /// Parses an input document.
    pub fn from_json(contents: &str) -> PlannerResult<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Reads and parses an input file.
    pub fn from_file(path: &Path) -> PlannerResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| PlannerError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Runs every input validator on the event, the resolved settings and
    /// the catalog.
    pub fn validate(&self, settings: &CalculationSettings) -> PlannerResult<()> {
        validate_plan(&self.event, settings, &self.recipes, &self.ingredients)?;
        Ok(())
    }
}
