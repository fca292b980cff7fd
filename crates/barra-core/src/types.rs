//! # Domain Types
//!
//! Inputs and outputs of the shopping list calculation.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  INPUTS (read-only snapshots)                                          │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Ingredient    │   │   RecipeItem    │   │  EventSnapshot  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  ingredient_id  │   │  guest_count    │       │
//! │  │  package_volume │   │  cocktail_id  ──┼──►│  cocktails_     │       │
//! │  │  purchase_unit  │   │  quantity, unit │   │    selected     │       │
//! │  │  yield_pieces?  │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                        ┌─────────────────────────┐                      │
//! │                        │  CalculationSettings    │                      │
//! │                        │  hours, consumptionRate │                      │
//! │                        │  safetyMargin, ...      │                      │
//! │                        └─────────────────────────┘                      │
//! │                                                                         │
//! │  OUTPUTS                                                               │
//! │  ┌──────────────────────┐   ┌──────────────────────┐                   │
//! │  │  CalculationResult   │   │  CocktailAllocation  │                   │
//! │  │  one per ingredient  │   │  one per cocktail    │                   │
//! │  │  + one for ice       │   └──────────────────────┘                   │
//! │  └──────────────────────┘                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Naming on the wire
//! Catalog, recipe and event rows keep the backend's snake_case columns.
//! Settings and results use camelCase, which is what the calculator island
//! on the website sends and renders.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Substring in a purchase unit marking goods bought by weight.
pub const KILOGRAM_MARKER: &str = "kg";

// =============================================================================
// Ingredient
// =============================================================================

/// A catalog entry describing how an ingredient is bought.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Ingredient {
    /// Catalog identifier.
    pub id: String,

    /// Display name, also the sort key of the shopping list.
    pub name: String,

    /// Free-form tag ("licores", "mezcladores", "frutas", "hielo").
    #[serde(default)]
    pub category: String,

    /// Amount in one purchase unit, in `measurement_unit`.
    /// A bottle of 750 ml has `package_volume = 750`.
    #[serde(default)]
    pub package_volume: Option<f64>,

    /// Unit `package_volume` is expressed in ("ml", "gr").
    #[serde(default)]
    pub measurement_unit: String,

    /// What is actually bought ("botella 750ml", "kg", "bolsa 3kg").
    pub purchase_unit: String,

    /// Pieces obtained from one purchase unit (wedges per kg of limes).
    #[serde(default)]
    pub yield_pieces: Option<u32>,
}

impl Ingredient {
    /// Returns the piece yield when it is usable (present and non-zero).
    #[inline]
    pub fn piece_yield(&self) -> Option<u32> {
        self.yield_pieces.filter(|&pieces| pieces > 0)
    }

    /// Returns the package volume when it is a usable divisor.
    #[inline]
    pub fn usable_package_volume(&self) -> Option<f64> {
        self.package_volume
            .filter(|volume| volume.is_finite() && *volume > 0.0)
    }

    /// True when the purchase unit is weighed (contains "kg", any case).
    ///
    /// Weighed goods keep two decimals in the shopping list; everything
    /// else is rounded up to whole units.
    pub fn is_sold_by_weight(&self) -> bool {
        self.purchase_unit
            .to_lowercase()
            .contains(KILOGRAM_MARKER)
    }
}

// =============================================================================
// Recipe Item
// =============================================================================

/// One line of a cocktail recipe, per single serving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecipeItem {
    /// Cocktail this line belongs to.
    pub cocktail_id: String,

    /// Ingredient consumed.
    pub ingredient_id: String,

    /// Amount per serving, > 0.
    pub quantity: f64,

    /// Unit symbol from the conversion table, or "pieza".
    pub unit: String,
}

// =============================================================================
// Event Snapshot
// =============================================================================

/// The part of an event record the calculator reads.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EventSnapshot {
    /// Number of guests.
    pub guest_count: u32,

    /// Cocktails chosen for the event, in the order the client picked them.
    #[serde(default)]
    pub cocktails_selected: Vec<String>,
}

// =============================================================================
// Distribution Mode
// =============================================================================

/// How cocktails without an explicit percentage get their share.
///
/// ## Example: `distribution = { A: 70 }`, cocktails `[A, B]`, 600 drinks
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  NORMALIZED (default)             │  LEGACY                             │
/// │  ─────────────────────            │  ──────                             │
/// │  A: 70% of 600 = 420              │  A: 70% of 600 = 420                │
/// │  B: remaining 30% = 180           │  B: 600 / 2    = 300                │
/// │  Total: 600                       │  Total: 720 (over-allocated)        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
/// Legacy reproduces the numbers the back-office printed before the
/// remainder split existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DistributionMode {
    /// Unassigned cocktails split the unallocated remainder.
    #[default]
    Normalized,
    /// Unassigned cocktails each get `total / selected_count`.
    Legacy,
}

impl std::fmt::Display for DistributionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistributionMode::Normalized => write!(f, "normalized"),
            DistributionMode::Legacy => write!(f, "legacy"),
        }
    }
}

impl std::str::FromStr for DistributionMode {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normalized" | "normalised" => Ok(DistributionMode::Normalized),
            "legacy" | "compat" => Ok(DistributionMode::Legacy),
            _ => Err(crate::error::ValidationError::NotAllowed {
                field: "distribution_mode".to_string(),
                allowed: vec!["normalized".to_string(), "legacy".to_string()],
            }),
        }
    }
}

// =============================================================================
// Calculation Settings
// =============================================================================

/// Parameters of one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CalculationSettings {
    /// Expected service duration in hours.
    pub hours: f64,

    /// Drinks per guest per hour.
    pub consumption_rate: f64,

    /// Overhead factor for every ingredient except ice (1.1 = +10%).
    pub safety_margin: f64,

    /// Percentage (0-100) of total drinks per cocktail id.
    #[serde(default)]
    pub distribution: HashMap<String, f64>,

    /// Bags added to (or removed from) the computed ice count.
    #[serde(default)]
    pub extra_ice_bags: Option<i32>,

    /// How cocktails without a percentage are handled.
    #[serde(default)]
    pub distribution_mode: DistributionMode,
}

impl Default for CalculationSettings {
    fn default() -> Self {
        CalculationSettings {
            hours: crate::DEFAULT_HOURS,
            consumption_rate: crate::DEFAULT_CONSUMPTION_RATE,
            safety_margin: crate::DEFAULT_SAFETY_MARGIN,
            distribution: HashMap::new(),
            extra_ice_bags: None,
            distribution_mode: DistributionMode::default(),
        }
    }
}

impl CalculationSettings {
    /// Continuous estimate of drinks served: guests × hours × rate.
    #[inline]
    pub fn estimated_drinks(&self, guest_count: u32) -> f64 {
        guest_count as f64 * self.hours * self.consumption_rate
    }
}

// =============================================================================
// Outputs
// =============================================================================

/// One line of the shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub ingredient_id: String,
    pub ingredient_name: String,
    pub category: String,
    /// Final amount to buy, already rounded.
    pub total_quantity: f64,
    pub purchase_unit: String,
    /// "<quantity> <purchaseUnit>(s)", e.g. "4 botella 750ml(s)".
    pub details: String,
}

impl CalculationResult {
    /// Formats the `details` string for a quantity and unit.
    pub fn format_details(quantity: f64, purchase_unit: &str) -> String {
        format!("{} {}(s)", quantity, purchase_unit)
    }
}

/// Drinks attributed to one selected cocktail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CocktailAllocation {
    pub cocktail_id: String,
    /// Share of the total estimate, in percent.
    pub percent: f64,
    /// Continuous drink count.
    pub drinks: f64,
}

// =============================================================================
// Unit Tests
// =============================================================================
