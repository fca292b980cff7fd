//! # Error Types
//!
//! Domain-specific error and warning types for barra-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  barra-core (this file)                                                │
//! │  ├── CoreError          - Hard failures (strict mode, lookups)          │
//! │  ├── ValidationError    - Input validation failures                     │
//! │  └── CalculationWarning - Data-quality signals, never fatal             │
//! │                                                                         │
//! │  barra-planner (app)                                                   │
//! │  └── PlannerError       - I/O, config, JSON + everything above          │
//! │                                                                         │
//! │  Flow: CalculationWarning ─(strict)─► CoreError ─► PlannerError        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Warnings vs Errors
//! The shopping list calculation never fails. Catalog problems (a recipe line
//! pointing at a deleted ingredient, a bottle with no volume, a typo in a
//! unit) degrade to a numeric fallback and are reported as a
//! [`CalculationWarning`] next to the result. Callers that would rather stop
//! use [`crate::ShoppingList::into_strict`], which turns the warnings into
//! [`CoreError::DataQuality`].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The calculation completed but relied on fallbacks.
    ///
    /// ## When This Occurs
    /// Only through [`crate::ShoppingList::into_strict`]. The normal path
    /// keeps the warnings attached to the list instead.
    #[error("Shopping list has {} data-quality warning(s)", .0.len())]
    DataQuality(Vec<CalculationWarning>),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Produced by [`crate::validation`] before any calculation runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., NaN where a number was expected).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Value is reserved for an entry the calculator creates itself.
    #[error("{field} '{value}' is reserved")]
    Reserved { field: String, value: String },

    /// Duplicate value (e.g., two catalog rows with the same id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Calculation Warning
// =============================================================================

/// A data-quality problem the calculator worked around.
///
/// ## Serialization
/// Tagged by `kind` so the back-office can render each case:
/// ```json
/// { "kind": "missing_ingredient", "cocktailId": "mojito", "ingredientId": "menta" }
/// ```
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalculationWarning {
    /// A recipe line references an ingredient that is not in the catalog.
    /// The line was skipped.
    #[error("Recipe for {cocktail_id} references unknown ingredient {ingredient_id}")]
    MissingIngredient {
        #[serde(rename = "cocktailId")]
        cocktail_id: String,
        #[serde(rename = "ingredientId")]
        ingredient_id: String,
    },

    /// An ingredient has no usable package volume. Divisor 1 was used.
    #[error("Ingredient {ingredient_id} has no usable package volume")]
    MissingPackageVolume {
        #[serde(rename = "ingredientId")]
        ingredient_id: String,
    },

    /// A recipe unit is not in the conversion table. Factor 1 was used.
    #[error("Unknown unit '{unit}', treated as base units")]
    UnknownUnit { unit: String },

    /// Drinks attributed to cocktails do not add up to the estimate.
    #[error("Cocktail distribution covers {total_percent:.2}% of estimated drinks")]
    DistributionNotNormalized {
        #[serde(rename = "totalPercent")]
        total_percent: f64,
    },

    /// The distribution names a cocktail that was not selected.
    #[error("Distribution entry for unselected cocktail {cocktail_id} was ignored")]
    UnknownDistributionEntry {
        #[serde(rename = "cocktailId")]
        cocktail_id: String,
    },

    /// A selected cocktail has no recipe lines.
    #[error("Cocktail {cocktail_id} has no recipe lines")]
    EmptyRecipe {
        #[serde(rename = "cocktailId")]
        cocktail_id: String,
    },

    /// A catalog row uses the id of the computed ice entry. The row was
    /// dropped from the catalog.
    #[error("Ingredient id {ingredient_id} is reserved for computed ice")]
    ReservedIngredientId {
        #[serde(rename = "ingredientId")]
        ingredient_id: String,
    },
}

// =============================================================================
// Checked Value
// =============================================================================

/// A computed value plus the warnings raised while computing it.
///
/// Replaces silent defaults: the value is always usable, and
/// `warnings` says whether a fallback was involved.
///
/// ## Example
/// ```rust
/// use barra_core::units::convert_to_base;
///
/// let exact = convert_to_base(2.0, "oz");
/// assert!(exact.is_clean());
///
/// let fallback = convert_to_base(2.0, "jigger");
/// assert_eq!(*fallback.value(), 2.0);
/// assert_eq!(fallback.warnings().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Checked<T> {
    value: T,
    warnings: Vec<CalculationWarning>,
}

impl<T> Checked<T> {
    /// A value computed without fallbacks.
    pub fn clean(value: T) -> Self {
        Checked {
            value,
            warnings: Vec::new(),
        }
    }

    /// A value computed with a fallback.
    pub fn degraded(value: T, warning: CalculationWarning) -> Self {
        Checked {
            value,
            warnings: vec![warning],
        }
    }

    /// Returns the computed value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Returns the warnings raised while computing the value.
    pub fn warnings(&self) -> &[CalculationWarning] {
        &self.warnings
    }

    /// True when no fallback was used.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Transforms the value, keeping the warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Checked<U> {
        Checked {
            value: f(self.value),
            warnings: self.warnings,
        }
    }

    /// Chains another checked computation, accumulating warnings.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Checked<U>) -> Checked<U> {
        let mut next = f(self.value);
        let mut warnings = self.warnings;
        warnings.append(&mut next.warnings);
        Checked {
            value: next.value,
            warnings,
        }
    }

    /// Splits into value and warnings.
    pub fn into_parts(self) -> (T, Vec<CalculationWarning>) {
        (self.value, self.warnings)
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
