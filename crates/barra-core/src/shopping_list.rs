//! # Shopping List Aggregator
//!
//! Builds the purchase list for one event.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    generate_shopping_list()                             │
//! │                                                                         │
//! │  EventSnapshot + CalculationSettings                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  total drinks = guests × hours × rate          (kept fractional)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  allocate per cocktail ── distribution % or even share                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  for each recipe line of each cocktail                                  │
//! │       ├── ingredient missing? ──► skip + MissingIngredient              │
//! │       └── purchase requirement ──► totals[ingredient_id] += units       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  × safety margin ──► "kg": 2 decimals │ otherwise: ceiling              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  + ice bags = ceil(guests / 4) + extra          (no margin)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sort by ingredient name                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The function never fails. Every fallback it takes is reported in
//! [`ShoppingList::warnings`].

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::error::{CalculationWarning, CoreError, CoreResult};
use crate::purchase::calculate_purchase_requirement;
use crate::types::{
    CalculationResult, CalculationSettings, CocktailAllocation, DistributionMode, EventSnapshot,
    Ingredient, RecipeItem,
};
use crate::{
    GUESTS_PER_ICE_BAG, ICE_CATEGORY, ICE_PURCHASE_UNIT, ICE_RESULT_ID, ICE_RESULT_NAME,
};

/// Tolerance when checking that cocktail shares add up to 100%.
const PERCENT_TOLERANCE: f64 = 1e-6;

/// Relative tolerance removed from a raw quantity before taking the ceiling.
/// Large enough to absorb f64 rounding error, far below any real demand.
const CEILING_TOLERANCE: f64 = 1e-12;

// =============================================================================
// Shopping List
// =============================================================================

/// The complete result of one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingList {
    /// One entry per ingredient plus the ice entry, sorted by name.
    pub items: Vec<CalculationResult>,

    /// Drinks attributed to each selected cocktail, in selection order.
    pub allocations: Vec<CocktailAllocation>,

    /// guests × hours × consumption rate.
    pub total_drinks: f64,

    /// Fallbacks taken while computing `items`.
    pub warnings: Vec<CalculationWarning>,
}

impl ShoppingList {
    /// True when no fallback was needed.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Returns the items, or the warnings as an error if there are any.
    pub fn into_strict(self) -> CoreResult<Vec<CalculationResult>> {
        if self.warnings.is_empty() {
            Ok(self.items)
        } else {
            Err(CoreError::DataQuality(self.warnings))
        }
    }

    /// Finds the entry for an ingredient id.
    pub fn item(&self, ingredient_id: &str) -> Option<&CalculationResult> {
        self.items.iter().find(|i| i.ingredient_id == ingredient_id)
    }

    /// Returns the synthetic ice entry.
    pub fn ice(&self) -> Option<&CalculationResult> {
        self.items
            .iter()
            .find(|i| i.ingredient_id == ICE_RESULT_ID && i.ingredient_name == ICE_RESULT_NAME)
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Computes the shopping list for an event.
///
/// ## Example
/// ```rust
/// use barra_core::{
///     generate_shopping_list, CalculationSettings, EventSnapshot, Ingredient, RecipeItem,
/// };
///
/// let event = EventSnapshot {
///     guest_count: 100,
///     cocktails_selected: vec!["mojito".into()],
/// };
/// let recipes = vec![RecipeItem {
///     cocktail_id: "mojito".into(),
///     ingredient_id: "ron".into(),
///     quantity: 60.0,
///     unit: "ml".into(),
/// }];
/// let ingredients = vec![Ingredient {
///     id: "ron".into(),
///     name: "Ron blanco".into(),
///     category: "licores".into(),
///     package_volume: Some(750.0),
///     measurement_unit: "ml".into(),
///     purchase_unit: "botella 750ml".into(),
///     yield_pieces: None,
/// }];
/// let settings = CalculationSettings {
///     hours: 4.0,
///     consumption_rate: 1.5,
///     safety_margin: 1.1,
///     ..CalculationSettings::default()
/// };
///
/// let list = generate_shopping_list(&event, &recipes, &ingredients, &settings);
///
/// // 600 drinks × 60 ml / 750 ml = 48 bottles, × 1.1 = 52.8 → 53
/// assert_eq!(list.item("ron").unwrap().total_quantity, 53.0);
/// // ceil(100 / 4) = 25 bags
/// assert_eq!(list.ice().unwrap().total_quantity, 25.0);
/// ```
pub fn generate_shopping_list(
    event: &EventSnapshot,
    recipes: &[RecipeItem],
    ingredients: &[Ingredient],
    settings: &CalculationSettings,
) -> ShoppingList {
    let mut warnings = Vec::new();

    let selected = distinct_selection(&event.cocktails_selected);
    let total_drinks = settings.estimated_drinks(event.guest_count);

    debug!(
        guest_count = event.guest_count,
        cocktails = selected.len(),
        total_drinks,
        mode = %settings.distribution_mode,
        "Generating shopping list"
    );

    let allocations = if selected.is_empty() {
        Vec::new()
    } else {
        allocate_drinks(&selected, total_drinks, settings, &mut warnings)
    };

    // First row wins when the catalog repeats an id
    let mut catalog: HashMap<&str, &Ingredient> = HashMap::with_capacity(ingredients.len());
    for ingredient in ingredients {
        if ingredient.id == ICE_RESULT_ID {
            warn!(ingredient_id = %ingredient.id, "Dropping catalog row with reserved id");
            push_unique(
                &mut warnings,
                CalculationWarning::ReservedIngredientId {
                    ingredient_id: ingredient.id.clone(),
                },
            );
            continue;
        }
        catalog.entry(ingredient.id.as_str()).or_insert(ingredient);
    }

    let mut totals: HashMap<&str, (&Ingredient, f64)> = HashMap::new();

    for allocation in &allocations {
        let mut lines = recipes
            .iter()
            .filter(|line| line.cocktail_id == allocation.cocktail_id)
            .peekable();

        if lines.peek().is_none() {
            debug!(cocktail_id = %allocation.cocktail_id, "Cocktail has no recipe lines");
            push_unique(
                &mut warnings,
                CalculationWarning::EmptyRecipe {
                    cocktail_id: allocation.cocktail_id.clone(),
                },
            );
            continue;
        }

        for line in lines {
            let Some(ingredient) = catalog.get(line.ingredient_id.as_str()).copied() else {
                warn!(
                    cocktail_id = %line.cocktail_id,
                    ingredient_id = %line.ingredient_id,
                    "Skipping recipe line with unknown ingredient"
                );
                push_unique(
                    &mut warnings,
                    CalculationWarning::MissingIngredient {
                        cocktail_id: line.cocktail_id.clone(),
                        ingredient_id: line.ingredient_id.clone(),
                    },
                );
                continue;
            };

            let (units, line_warnings) = calculate_purchase_requirement(
                line.quantity,
                &line.unit,
                allocation.drinks,
                ingredient,
            )
            .into_parts();

            for warning in line_warnings {
                push_unique(&mut warnings, warning);
            }

            totals
                .entry(ingredient.id.as_str())
                .or_insert((ingredient, 0.0))
                .1 += units;
        }
    }

    let mut items: Vec<CalculationResult> = totals
        .into_values()
        .map(|(ingredient, total)| finalize_ingredient(ingredient, total, settings.safety_margin))
        .collect();

    if event.guest_count > 0 {
        items.push(ice_result(event.guest_count, settings.extra_ice_bags));
    }

    sort_by_ingredient_name(&mut items);

    if !warnings.is_empty() {
        debug!(count = warnings.len(), "Shopping list generated with warnings");
    }

    ShoppingList {
        items,
        allocations,
        total_drinks,
        warnings,
    }
}

/// Collapses repeated ids, keeping the first occurrence.
fn distinct_selection(cocktails: &[String]) -> Vec<&str> {
    let mut selected: Vec<&str> = Vec::with_capacity(cocktails.len());
    for id in cocktails {
        if !selected.contains(&id.as_str()) {
            selected.push(id.as_str());
        }
    }
    selected
}

fn push_unique(warnings: &mut Vec<CalculationWarning>, warning: CalculationWarning) {
    if !warnings.contains(&warning) {
        warnings.push(warning);
    }
}

// =============================================================================
// Drink Allocation
// =============================================================================

/// Splits `total_drinks` across the selected cocktails.
///
/// ## Rules
/// - explicit percentage → `total × (percent / 100)`
/// - no percentage, [`DistributionMode::Legacy`] → `total / selected`
/// - no percentage, [`DistributionMode::Normalized`] → the unallocated
///   remainder split evenly among the cocktails without a percentage
fn allocate_drinks(
    selected: &[&str],
    total_drinks: f64,
    settings: &CalculationSettings,
    warnings: &mut Vec<CalculationWarning>,
) -> Vec<CocktailAllocation> {
    let mut ignored: Vec<&String> = settings
        .distribution
        .keys()
        .filter(|id| !selected.contains(&id.as_str()))
        .collect();
    ignored.sort();
    for cocktail_id in ignored {
        push_unique(
            warnings,
            CalculationWarning::UnknownDistributionEntry {
                cocktail_id: cocktail_id.clone(),
            },
        );
    }

    let explicit = |id: &str| -> Option<f64> {
        settings
            .distribution
            .get(id)
            .copied()
            .filter(|percent| percent.is_finite())
    };

    let unassigned = selected
        .iter()
        .filter(|&&id| explicit(id).is_none())
        .count();
    let remainder_percent = match settings.distribution_mode {
        DistributionMode::Legacy => 0.0,
        DistributionMode::Normalized => {
            let assigned: f64 = selected.iter().filter_map(|&id| explicit(id)).sum();
            (100.0 - assigned).max(0.0)
        }
    };

    let allocations: Vec<CocktailAllocation> = selected
        .iter()
        .map(|&id| {
            let (percent, drinks) = match explicit(id) {
                Some(percent) => (percent, total_drinks * (percent / 100.0)),
                None => match settings.distribution_mode {
                    DistributionMode::Legacy => {
                        let count = selected.len() as f64;
                        (100.0 / count, total_drinks / count)
                    }
                    DistributionMode::Normalized => {
                        let count = unassigned as f64;
                        (
                            remainder_percent / count,
                            total_drinks * (remainder_percent / 100.0) / count,
                        )
                    }
                },
            };
            CocktailAllocation {
                cocktail_id: id.to_string(),
                percent,
                drinks,
            }
        })
        .collect();

    let total_percent: f64 = allocations.iter().map(|a| a.percent).sum();
    if (total_percent - 100.0).abs() > PERCENT_TOLERANCE {
        warn!(total_percent, "Cocktail distribution does not cover 100% of drinks");
        push_unique(
            warnings,
            CalculationWarning::DistributionNotNormalized { total_percent },
        );
    }

    allocations
}

// =============================================================================
// Rounding
// =============================================================================

/// Rounds a raw purchase quantity to something that can be bought.
///
/// ## Policy
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Sold by weight ("kg" in the purchase unit)                             │
/// │    3.456 → 3.46          partial kilograms are purchasable              │
/// │                                                                         │
/// │  Everything else (bottles, bags, pieces)                                │
/// │    3.1   → 4             always over-provision                          │
/// │    55.00000000000001 → 55 (float noise is absorbed first)               │
/// │    3.0000000004 → 4        real excess still buys another unit          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// ## Example
/// ```rust
/// use barra_core::shopping_list::round_purchase_quantity;
///
/// assert_eq!(round_purchase_quantity(3.456, true), 3.46);
/// assert_eq!(round_purchase_quantity(3.1, false), 4.0);
/// ```
pub fn round_purchase_quantity(raw: f64, sold_by_weight: bool) -> f64 {
    if sold_by_weight {
        (raw * 100.0).round() / 100.0
    } else {
        (raw - raw.abs() * CEILING_TOLERANCE).ceil()
    }
}

fn finalize_ingredient(ingredient: &Ingredient, total: f64, safety_margin: f64) -> CalculationResult {
    let raw = total * safety_margin;
    let quantity = round_purchase_quantity(raw, ingredient.is_sold_by_weight());

    CalculationResult {
        ingredient_id: ingredient.id.clone(),
        ingredient_name: ingredient.name.clone(),
        category: ingredient.category.clone(),
        total_quantity: quantity,
        purchase_unit: ingredient.purchase_unit.clone(),
        details: CalculationResult::format_details(quantity, &ingredient.purchase_unit),
    }
}

// =============================================================================
// Ice
// =============================================================================

/// Bags of ice for an event: one per four guests, plus the manual
/// adjustment. No safety margin.
///
/// Unlike a plain `base + extra`, a negative adjustment larger than the
/// base yields 0 bags, not a negative quantity.
///
/// ## Example
/// ```rust
/// use barra_core::shopping_list::calculate_ice_bags;
///
/// assert_eq!(calculate_ice_bags(37, None), 10);
/// assert_eq!(calculate_ice_bags(37, Some(2)), 12);
/// assert_eq!(calculate_ice_bags(8, Some(-5)), 0);
/// ```
pub fn calculate_ice_bags(guest_count: u32, extra_ice_bags: Option<i32>) -> u32 {
    let base = guest_count.div_ceil(GUESTS_PER_ICE_BAG) as i64;
    let total = base + extra_ice_bags.unwrap_or(0) as i64;
    total.clamp(0, u32::MAX as i64) as u32
}

fn ice_result(guest_count: u32, extra_ice_bags: Option<i32>) -> CalculationResult {
    let bags = calculate_ice_bags(guest_count, extra_ice_bags) as f64;

    CalculationResult {
        ingredient_id: ICE_RESULT_ID.to_string(),
        ingredient_name: ICE_RESULT_NAME.to_string(),
        category: ICE_CATEGORY.to_string(),
        total_quantity: bags,
        purchase_unit: ICE_PURCHASE_UNIT.to_string(),
        details: CalculationResult::format_details(bags, ICE_PURCHASE_UNIT),
    }
}

// =============================================================================
// Sorting
// =============================================================================

/// Sorts results by ingredient name the way a Spanish-speaking reader
/// expects: case and accents ignored first ("Azúcar" next to "azucar"),
/// then the exact name, then the id so the order is total.
pub fn sort_by_ingredient_name(items: &mut [CalculationResult]) {
    items.sort_by(compare_names);
}

fn compare_names(a: &CalculationResult, b: &CalculationResult) -> Ordering {
    collation_key(&a.ingredient_name)
        .cmp(&collation_key(&b.ingredient_name))
        .then_with(|| a.ingredient_name.cmp(&b.ingredient_name))
        .then_with(|| a.ingredient_id.cmp(&b.ingredient_id))
}

/// Lowercased name with Latin diacritics folded to their base letter.
fn collation_key(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' | 'ã' | 'å' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(id: &str, name: &str, volume: f64, purchase_unit: &str) -> Ingredient {
        Ingredient {
            id: id.to_string(),
            name: name.to_string(),
            category: "licores".to_string(),
            package_volume: Some(volume),
            measurement_unit: "ml".to_string(),
            purchase_unit: purchase_unit.to_string(),
            yield_pieces: None,
        }
    }

    fn line(cocktail: &str, ingredient: &str, quantity: f64, unit: &str) -> RecipeItem {
        RecipeItem {
            cocktail_id: cocktail.to_string(),
            ingredient_id: ingredient.to_string(),
            quantity,
            unit: unit.to_string(),
        }
    }

    fn event(guests: u32, cocktails: &[&str]) -> EventSnapshot {
        EventSnapshot {
            guest_count: guests,
            cocktails_selected: cocktails.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn settings(hours: f64, rate: f64, margin: f64) -> CalculationSettings {
        CalculationSettings {
            hours,
            consumption_rate: rate,
            safety_margin: margin,
            ..CalculationSettings::default()
        }
    }

    fn bar_catalog() -> (Vec<RecipeItem>, Vec<Ingredient>) {
        let recipes = vec![
            line("mojito", "ron", 60.0, "ml"),
            line("mojito", "soda", 90.0, "ml"),
            line("mojito", "limon", 1.0, "pieza"),
            line("margarita", "tequila", 1.5, "oz"),
            line("margarita", "triple-sec", 2.0, "cl"),
            line("margarita", "limon", 2.0, "pieza"),
        ];
        let mut limes = ingredient("limon", "Limón", 1000.0, "kg");
        limes.category = "frutas".to_string();
        limes.measurement_unit = "gr".to_string();
        limes.yield_pieces = Some(30);
        let ingredients = vec![
            ingredient("tequila", "Tequila blanco", 750.0, "botella 750ml"),
            ingredient("ron", "Ron blanco", 750.0, "botella 750ml"),
            ingredient("soda", "Agua mineral", 2000.0, "botella 2l"),
            ingredient("triple-sec", "Triple sec", 700.0, "botella 700ml"),
            limes,
        ];
        (recipes, ingredients)
    }

    #[test]
    fn test_ice_only_when_no_cocktails() {
        let (recipes, ingredients) = bar_catalog();
        let mut s = settings(5.0, 1.0, 1.1);
        s.extra_ice_bags = Some(3);

        let list = generate_shopping_list(&event(37, &[]), &recipes, &ingredients, &s);

        assert_eq!(list.items.len(), 1);
        let ice = &list.items[0];
        assert_eq!(ice.ingredient_id, ICE_RESULT_ID);
        assert_eq!(ice.ingredient_name, "Hielo (Bolsa 3kg)");
        assert_eq!(ice.category, "hielo");
        assert_eq!(ice.total_quantity, 13.0);
        assert_eq!(ice.details, "13 bolsa(s)");
        assert!(list.allocations.is_empty());
        assert!(list.is_clean());
    }

    #[test]
    fn test_even_distribution() {
        let (recipes, ingredients) = bar_catalog();
        let list = generate_shopping_list(
            &event(100, &["mojito", "margarita"]),
            &recipes,
            &ingredients,
            &settings(4.0, 1.5, 1.1),
        );

        assert_eq!(list.total_drinks, 600.0);
        assert_eq!(list.allocations.len(), 2);
        assert_eq!(list.allocations[0].cocktail_id, "mojito");
        assert_eq!(list.allocations[0].drinks, 300.0);
        assert_eq!(list.allocations[1].drinks, 300.0);
        assert!(list.is_clean());
    }

    #[test]
    fn test_full_list_quantities() {
        let (recipes, ingredients) = bar_catalog();
        let list = generate_shopping_list(
            &event(100, &["mojito", "margarita"]),
            &recipes,
            &ingredients,
            &settings(4.0, 1.5, 1.1),
        );

        // 5 distinct ingredients + ice
        assert_eq!(list.items.len(), 6);

        // ron: 300 × 60 / 750 = 24, × 1.1 = 26.4 → 27
        assert_eq!(list.item("ron").unwrap().total_quantity, 27.0);
        // soda: 300 × 90 / 2000 = 13.5, × 1.1 = 14.85 → 15
        assert_eq!(list.item("soda").unwrap().total_quantity, 15.0);
        // tequila: 300 × 44.36025 / 750 = 17.7441, × 1.1 = 19.51851 → 20
        assert_eq!(list.item("tequila").unwrap().total_quantity, 20.0);
        // triple sec: 300 × 20 / 700 = 8.571..., × 1.1 = 9.43 → 10
        assert_eq!(list.item("triple-sec").unwrap().total_quantity, 10.0);
        // limes summed across both cocktails: (300 × 1 + 300 × 2) / 30 = 30 kg
        // × 1.1 = 33 kg, kept with two decimals
        let limes = list.item("limon").unwrap();
        assert_eq!(limes.total_quantity, 33.0);
        assert_eq!(limes.details, "33 kg(s)");
        assert_eq!(list.ice().unwrap().total_quantity, 25.0);
    }

    #[test]
    fn test_legacy_distribution_keeps_even_share_of_total() {
        let (recipes, ingredients) = bar_catalog();
        let mut s = settings(4.0, 1.5, 1.0);
        s.distribution_mode = DistributionMode::Legacy;
        s.distribution.insert("mojito".to_string(), 70.0);

        let list = generate_shopping_list(
            &event(100, &["mojito", "margarita"]),
            &recipes,
            &ingredients,
            &s,
        );

        assert!((list.allocations[0].drinks - 600.0 * 0.7).abs() < 1e-9);
        assert_eq!(list.allocations[1].drinks, 300.0);
        assert!(list.warnings.contains(&CalculationWarning::DistributionNotNormalized {
            total_percent: 120.0
        }));
    }

    #[test]
    fn test_normalized_distribution_splits_remainder() {
        let (recipes, ingredients) = bar_catalog();
        let mut s = settings(4.0, 1.5, 1.0);
        s.distribution.insert("mojito".to_string(), 70.0);

        let list = generate_shopping_list(
            &event(100, &["mojito", "margarita"]),
            &recipes,
            &ingredients,
            &s,
        );

        assert!((list.allocations[0].drinks - 420.0).abs() < 1e-9);
        assert!((list.allocations[1].drinks - 180.0).abs() < 1e-9);
        assert!((list.allocations[1].percent - 30.0).abs() < 1e-9);
        assert!(list.is_clean());
    }

    #[test]
    fn test_normalized_over_allocation_is_flagged() {
        let (recipes, ingredients) = bar_catalog();
        let mut s = settings(4.0, 1.5, 1.0);
        s.distribution.insert("mojito".to_string(), 80.0);
        s.distribution.insert("margarita".to_string(), 40.0);

        let list = generate_shopping_list(
            &event(100, &["mojito", "margarita"]),
            &recipes,
            &ingredients,
            &s,
        );

        assert!(matches!(
            list.warnings.as_slice(),
            [CalculationWarning::DistributionNotNormalized { total_percent }]
                if (*total_percent - 120.0).abs() < 1e-9
        ));
    }

    #[test]
    fn test_distribution_for_unselected_cocktail_is_ignored() {
        let (recipes, ingredients) = bar_catalog();
        let mut s = settings(4.0, 1.5, 1.0);
        s.distribution.insert("paloma".to_string(), 50.0);

        let list = generate_shopping_list(&event(100, &["mojito"]), &recipes, &ingredients, &s);

        assert_eq!(list.allocations[0].drinks, 600.0);
        assert_eq!(
            list.warnings,
            vec![CalculationWarning::UnknownDistributionEntry {
                cocktail_id: "paloma".to_string()
            }]
        );
    }

    #[test]
    fn test_rounding_policy() {
        assert_eq!(round_purchase_quantity(3.456, true), 3.46);
        assert_eq!(round_purchase_quantity(3.1, false), 4.0);
        assert_eq!(round_purchase_quantity(3.0, false), 3.0);
        assert_eq!(round_purchase_quantity(0.0, false), 0.0);
        assert_eq!(round_purchase_quantity(50.0 * 1.1, false), 55.0);
    }

    #[test]
    fn test_tiny_real_excess_still_rounds_up() {
        assert_eq!(round_purchase_quantity(3.0000000004, false), 4.0);
        assert_eq!(round_purchase_quantity(48.0 * 1.1, false), 53.0);
    }

    #[test]
    fn test_kg_rounding_through_aggregator() {
        // 1 cocktail, 100 drinks, 34.56 gr each over 1000 gr bags → 3.456 kg
        let mut sugar = ingredient("azucar", "Azúcar", 1000.0, "kg");
        sugar.measurement_unit = "gr".to_string();
        let recipes = vec![line("caipirinha", "azucar", 34.56, "gr")];

        let list = generate_shopping_list(
            &event(100, &["caipirinha"]),
            &recipes,
            &[sugar],
            &settings(1.0, 1.0, 1.0),
        );

        assert_eq!(list.item("azucar").unwrap().total_quantity, 3.46);
    }

    #[test]
    fn test_float_noise_does_not_add_a_bottle() {
        // 500 drinks × 75 ml / 750 ml = 50 bottles, × 1.1 = 55.00000000000001
        let recipes = vec![line("cuba", "ron", 75.0, "ml")];
        let ingredients = vec![ingredient("ron", "Ron", 750.0, "botella 750ml")];

        let list = generate_shopping_list(
            &event(100, &["cuba"]),
            &recipes,
            &ingredients,
            &settings(5.0, 1.0, 1.1),
        );

        assert_eq!(list.item("ron").unwrap().total_quantity, 55.0);
    }

    #[test]
    fn test_missing_ingredient_is_skipped() {
        let (mut recipes, ingredients) = bar_catalog();
        recipes.push(line("mojito", "hierbabuena", 6.0, "pieza"));

        let list = generate_shopping_list(
            &event(100, &["mojito"]),
            &recipes,
            &ingredients,
            &settings(4.0, 1.5, 1.1),
        );

        assert!(list.item("hierbabuena").is_none());
        // ron, soda, limon + ice
        assert_eq!(list.items.len(), 4);
        assert_eq!(
            list.warnings,
            vec![CalculationWarning::MissingIngredient {
                cocktail_id: "mojito".to_string(),
                ingredient_id: "hierbabuena".to_string(),
            }]
        );
    }

    #[test]
    fn test_catalog_row_with_ice_id_is_dropped() {
        let recipes = vec![line("agua-fresca", ICE_RESULT_ID, 250.0, "ml")];
        let ingredients = vec![ingredient(ICE_RESULT_ID, "Agua", 1000.0, "garrafa")];

        let list = generate_shopping_list(
            &event(8, &["agua-fresca"]),
            &recipes,
            &ingredients,
            &settings(5.0, 1.0, 1.1),
        );

        assert_eq!(list.items.len(), 1);
        let ice = list.ice().unwrap();
        assert_eq!(ice.ingredient_name, ICE_RESULT_NAME);
        assert_eq!(ice.total_quantity, 2.0);
        assert_eq!(
            list.warnings,
            vec![
                CalculationWarning::ReservedIngredientId {
                    ingredient_id: ICE_RESULT_ID.to_string(),
                },
                CalculationWarning::MissingIngredient {
                    cocktail_id: "agua-fresca".to_string(),
                    ingredient_id: ICE_RESULT_ID.to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_cocktail_without_recipe_is_reported() {
        let (recipes, ingredients) = bar_catalog();
        let list = generate_shopping_list(
            &event(40, &["mojito", "paloma"]),
            &recipes,
            &ingredients,
            &settings(4.0, 1.0, 1.0),
        );

        assert_eq!(
            list.warnings,
            vec![CalculationWarning::EmptyRecipe {
                cocktail_id: "paloma".to_string()
            }]
        );
        // paloma still takes its share of drinks
        assert_eq!(list.allocations[1].drinks, 80.0);
    }

    #[test]
    fn test_repeated_selection_counts_once() {
        let (recipes, ingredients) = bar_catalog();
        let list = generate_shopping_list(
            &event(100, &["mojito", "mojito"]),
            &recipes,
            &ingredients,
            &settings(4.0, 1.5, 1.0),
        );

        assert_eq!(list.allocations.len(), 1);
        assert_eq!(list.allocations[0].drinks, 600.0);
    }

    #[test]
    fn test_unknown_unit_and_missing_volume_warn_once() {
        let recipes = vec![
            line("shot", "mezcal", 1.0, "caballito"),
            line("doble", "mezcal", 2.0, "caballito"),
        ];
        let mut mezcal = ingredient("mezcal", "Mezcal", 0.0, "botella 750ml");
        mezcal.package_volume = None;

        let list = generate_shopping_list(
            &event(10, &["shot", "doble"]),
            &recipes,
            &[mezcal],
            &settings(1.0, 1.0, 1.0),
        );

        assert_eq!(list.warnings.len(), 2);
        // 5 × 1 + 5 × 2 = 15 "bottles" with divisor and factor 1
        assert_eq!(list.item("mezcal").unwrap().total_quantity, 15.0);
    }

    #[test]
    fn test_no_guests_no_ice() {
        let (recipes, ingredients) = bar_catalog();
        let list = generate_shopping_list(
            &event(0, &["mojito"]),
            &recipes,
            &ingredients,
            &settings(4.0, 1.5, 1.1),
        );

        assert!(list.ice().is_none());
        assert!(list.items.iter().all(|i| i.total_quantity == 0.0));
    }

    #[test]
    fn test_negative_extra_ice_never_below_zero() {
        assert_eq!(calculate_ice_bags(8, Some(-5)), 0);
        assert_eq!(calculate_ice_bags(9, Some(-1)), 2);
        assert_eq!(calculate_ice_bags(1, None), 1);
    }

    #[test]
    fn test_sorted_by_name_ignoring_case_and_accents() {
        let (recipes, ingredients) = bar_catalog();
        let list = generate_shopping_list(
            &event(100, &["margarita", "mojito"]),
            &recipes,
            &ingredients,
            &settings(4.0, 1.5, 1.1),
        );

        let names: Vec<&str> = list.items.iter().map(|i| i.ingredient_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Agua mineral",
                "Hielo (Bolsa 3kg)",
                "Limón",
                "Ron blanco",
                "Tequila blanco",
                "Triple sec",
            ]
        );
    }

    #[test]
    fn test_collation_key_folds_accents() {
        assert_eq!(collation_key("Azúcar Morena"), "azucar morena");
        assert_eq!(collation_key("PIÑA"), "pina");
    }

    #[test]
    fn test_idempotent() {
        let (recipes, ingredients) = bar_catalog();
        let mut s = settings(4.0, 1.5, 1.1);
        s.distribution.insert("margarita".to_string(), 65.0);
        let e = event(83, &["mojito", "margarita"]);

        let first = generate_shopping_list(&e, &recipes, &ingredients, &s);
        let second = generate_shopping_list(&e, &recipes, &ingredients, &s);
        assert_eq!(first, second);
    }

    #[test]
    fn test_into_strict() {
        let (recipes, ingredients) = bar_catalog();
        let clean = generate_shopping_list(
            &event(10, &["mojito"]),
            &recipes,
            &ingredients,
            &settings(1.0, 1.0, 1.0),
        );
        assert!(clean.into_strict().is_ok());

        let dirty = generate_shopping_list(
            &event(10, &["paloma"]),
            &recipes,
            &ingredients,
            &settings(1.0, 1.0, 1.0),
        );
        assert!(matches!(dirty.into_strict(), Err(CoreError::DataQuality(w)) if w.len() == 1));
    }

    #[test]
    fn test_serialized_shape() {
        let (recipes, ingredients) = bar_catalog();
        let list = generate_shopping_list(
            &event(4, &["mojito"]),
            &recipes,
            &ingredients,
            &settings(1.0, 1.0, 1.0),
        );
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["totalDrinks"], 4.0);
        assert_eq!(json["allocations"][0]["cocktailId"], "mojito");
        assert!(json["items"][0]["ingredientName"].is_string());
        assert!(json["items"][0]["totalQuantity"].is_number());
    }
}
