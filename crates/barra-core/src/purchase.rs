//! # Purchase Requirement
//!
//! How many purchase units one recipe line needs for N servings.
//!
//! ## Two Branches
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  A. PIECE YIELD                     │  B. VOLUME / MASS (default)       │
//! │  ──────────────                     │  ─────────────────────────        │
//! │  ingredient.yield_pieces > 0        │  everything else                  │
//! │  AND recipe unit == "pieza"         │                                   │
//! │                                     │                                   │
//! │  1 wedge × 45 drinks = 45 wedges    │  1.5 oz × 300 = 13,310 ml         │
//! │  45 / 30 wedges per kg = 1.5 kg     │  13,310 / 750 ml = 17.75 bottles  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The result stays fractional. Rounding to something purchasable happens
//! once per ingredient in the aggregator, after all lines are summed.

use crate::error::{CalculationWarning, Checked};
use crate::types::Ingredient;
use crate::units::{convert_to_base, PIECE_SYMBOL};

/// Computes the purchase units needed to serve `total_instances` servings
/// of one recipe line.
///
/// ## Fallbacks
/// - unknown `recipe_unit` → factor 1, [`CalculationWarning::UnknownUnit`]
/// - missing, zero, negative or NaN `package_volume` → divisor 1,
///   [`CalculationWarning::MissingPackageVolume`]
///
/// ## Example
/// ```rust
/// use barra_core::purchase::calculate_purchase_requirement;
/// use barra_core::Ingredient;
///
/// let limes = Ingredient {
///     id: "limon".into(),
///     name: "Limón".into(),
///     category: "frutas".into(),
///     package_volume: Some(1000.0),
///     measurement_unit: "gr".into(),
///     purchase_unit: "kg".into(),
///     yield_pieces: Some(30),
/// };
///
/// let kg = calculate_purchase_requirement(1.0, "pieza", 45.0, &limes);
/// assert_eq!(*kg.value(), 1.5);
/// ```
pub fn calculate_purchase_requirement(
    recipe_qty: f64,
    recipe_unit: &str,
    total_instances: f64,
    ingredient: &Ingredient,
) -> Checked<f64> {
    if recipe_unit == PIECE_SYMBOL {
        if let Some(pieces_per_unit) = ingredient.piece_yield() {
            let total_pieces = recipe_qty * total_instances;
            return Checked::clean(total_pieces / pieces_per_unit as f64);
        }
    }

    convert_to_base(recipe_qty, recipe_unit).and_then(|base_per_serving| {
        let total_base = base_per_serving * total_instances;
        match ingredient.usable_package_volume() {
            Some(volume) => Checked::clean(total_base / volume),
            None => Checked::degraded(
                total_base,
                CalculationWarning::MissingPackageVolume {
                    ingredient_id: ingredient.id.clone(),
                },
            ),
        }
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
