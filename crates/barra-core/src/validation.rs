//! # Validation Module
//!
//! Input validation for events, settings and the recipe catalog.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  ├── Shape and types of the input document                             │
//! │  └── Negative guest counts rejected by u32                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (planner, before computing)                      │
//! │  ├── Ranges on event and settings                                      │
//! │  └── Catalog consistency (units, volumes, duplicate ids)               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Aggregator                                                   │
//! │  └── Never fails: leftovers become CalculationWarning                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The aggregator does not call into this module. Lenient callers can skip
//! it and read the warnings instead.
//!
//! ## Usage
//! ```rust,no_run
//! use barra_core::validation::{validate_guest_count, validate_settings};
//! use barra_core::CalculationSettings;
//!
//! validate_guest_count(120).unwrap();
//! validate_settings(&CalculationSettings::default()).unwrap();
//! ```

use std::collections::HashSet;

use crate::error::{CoreResult, ValidationError};
use crate::types::{CalculationSettings, EventSnapshot, Ingredient, RecipeItem};
use crate::units::Unit;
use crate::{ICE_RESULT_ID, MAX_CONSUMPTION_RATE, MAX_EVENT_HOURS, MAX_GUEST_COUNT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_ID_LEN: usize = 64;
const MAX_NAME_LEN: usize = 200;
const MIN_SAFETY_MARGIN: f64 = 1.0;
const MAX_SAFETY_MARGIN: f64 = 3.0;
const MAX_EXTRA_ICE_BAGS: i32 = 1000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a catalog identifier (ingredient or cocktail id).
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - Letters, digits, hyphens and underscores only
///
/// ## Example
/// ```rust
/// use barra_core::validation::validate_id;
///
/// assert!(validate_id("ingredient_id", "ron-blanco").is_ok());
/// assert!(validate_id("ingredient_id", "").is_err());
/// assert!(validate_id("ingredient_id", "ron blanco").is_err());
/// ```
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if id.chars().count() > MAX_ID_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_ID_LEN,
        });
    }

    if !id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a display name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

fn finite(field: &str, value: f64) -> ValidationResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a finite number".to_string(),
        })
    }
}

fn within(field: &str, value: f64, min: f64, max: f64) -> ValidationResult<()> {
    if finite(field, value)? < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min,
            max,
        });
    }
    Ok(())
}

/// Validates the guest count of an event.
///
/// ## Rules
/// - At least 1
/// - At most [`MAX_GUEST_COUNT`]
///
/// ## Example
/// ```rust
/// use barra_core::validation::validate_guest_count;
///
/// assert!(validate_guest_count(150).is_ok());
/// assert!(validate_guest_count(0).is_err());
/// ```
pub fn validate_guest_count(guest_count: u32) -> ValidationResult<()> {
    if guest_count == 0 {
        return Err(ValidationError::MustBePositive {
            field: "guest_count".to_string(),
        });
    }

    if guest_count > MAX_GUEST_COUNT {
        return Err(ValidationError::OutOfRange {
            field: "guest_count".to_string(),
            min: 1.0,
            max: MAX_GUEST_COUNT as f64,
        });
    }

    Ok(())
}

/// Validates calculation settings.
///
/// ## Rules
/// ```text
/// ┌──────────────────┬──────────────────────────────────┐
/// │  hours           │  > 0 and ≤ 48                    │
/// │  consumptionRate │  ≥ 0 and ≤ 20                    │
/// │  safetyMargin    │  1.0 ..= 3.0                     │
/// │  distribution    │  each id valid, each % 0 ..= 100 │
/// │  extraIceBags    │  -1000 ..= 1000                  │
/// └──────────────────┴──────────────────────────────────┘
/// ```
pub fn validate_settings(settings: &CalculationSettings) -> ValidationResult<()> {
    if finite("hours", settings.hours)? <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "hours".to_string(),
        });
    }
    within("hours", settings.hours, 0.0, MAX_EVENT_HOURS)?;
    within(
        "consumption_rate",
        settings.consumption_rate,
        0.0,
        MAX_CONSUMPTION_RATE,
    )?;
    within(
        "safety_margin",
        settings.safety_margin,
        MIN_SAFETY_MARGIN,
        MAX_SAFETY_MARGIN,
    )?;

    // Sorted so the first reported problem does not depend on map order
    let mut entries: Vec<(&String, &f64)> = settings.distribution.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    for (cocktail_id, percent) in entries {
        validate_id("distribution", cocktail_id)?;
        within("distribution", *percent, 0.0, 100.0)?;
    }

    if let Some(extra) = settings.extra_ice_bags {
        if !(-MAX_EXTRA_ICE_BAGS..=MAX_EXTRA_ICE_BAGS).contains(&extra) {
            return Err(ValidationError::OutOfRange {
                field: "extra_ice_bags".to_string(),
                min: -MAX_EXTRA_ICE_BAGS as f64,
                max: MAX_EXTRA_ICE_BAGS as f64,
            });
        }
    }

    Ok(())
}

/// Validates an event snapshot: guest count and each selected cocktail id.
pub fn validate_event(event: &EventSnapshot) -> ValidationResult<()> {
    validate_guest_count(event.guest_count)?;
    for cocktail_id in &event.cocktails_selected {
        validate_id("cocktails_selected", cocktail_id)?;
    }
    Ok(())
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates one recipe line.
///
/// ## Rules
/// - Cocktail and ingredient ids valid
/// - Quantity finite and > 0
/// - Unit present in the conversion table
///
/// ## Example
/// ```rust
/// use barra_core::validation::validate_recipe_item;
/// use barra_core::RecipeItem;
///
/// let line = RecipeItem {
///     cocktail_id: "mojito".into(),
///     ingredient_id: "ron".into(),
///     quantity: 2.0,
///     unit: "oz".into(),
/// };
/// assert!(validate_recipe_item(&line).is_ok());
///
/// let typo = RecipeItem { unit: "onzas".into(), ..line };
/// assert!(validate_recipe_item(&typo).is_err());
/// ```
pub fn validate_recipe_item(item: &RecipeItem) -> ValidationResult<()> {
    validate_id("cocktail_id", &item.cocktail_id)?;
    validate_id("ingredient_id", &item.ingredient_id)?;

    if finite("quantity", item.quantity)? <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    item.unit.parse::<Unit>()?;
    Ok(())
}

/// Validates one catalog ingredient.
///
/// ## Rules
/// - Id and name valid, purchase unit present
/// - Id is not the one reserved for computed ice
/// - `yield_pieces`, when given, > 0
/// - `package_volume` > 0, unless the ingredient is bought by piece yield
pub fn validate_ingredient(ingredient: &Ingredient) -> ValidationResult<()> {
    validate_id("id", &ingredient.id)?;
    if ingredient.id == ICE_RESULT_ID {
        return Err(ValidationError::Reserved {
            field: "id".to_string(),
            value: ingredient.id.clone(),
        });
    }
    validate_name("name", &ingredient.name)?;

    if ingredient.purchase_unit.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "purchase_unit".to_string(),
        });
    }

    if ingredient.yield_pieces == Some(0) {
        return Err(ValidationError::MustBePositive {
            field: "yield_pieces".to_string(),
        });
    }

    match ingredient.package_volume {
        Some(volume) => {
            if finite("package_volume", volume)? <= 0.0 {
                return Err(ValidationError::MustBePositive {
                    field: "package_volume".to_string(),
                });
            }
            Ok(())
        }
        None if ingredient.piece_yield().is_none() => Err(ValidationError::Required {
            field: "package_volume".to_string(),
        }),
        None => Ok(()),
    }
}

/// Validates a whole catalog: every ingredient, every recipe line, and no
/// ingredient id used twice.
///
/// Recipe lines may reference ingredients the catalog does not have; the
/// aggregator reports those as warnings.
pub fn validate_catalog(recipes: &[RecipeItem], ingredients: &[Ingredient]) -> ValidationResult<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(ingredients.len());
    for ingredient in ingredients {
        validate_ingredient(ingredient)?;
        if !seen.insert(ingredient.id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "ingredient id".to_string(),
                value: ingredient.id.clone(),
            });
        }
    }

    for item in recipes {
        validate_recipe_item(item)?;
    }

    Ok(())
}

/// Validates everything one calculation reads: the event, the resolved
/// settings and the catalog.
///
/// ## Example
/// ```rust
/// use barra_core::validation::validate_plan;
/// use barra_core::{CalculationSettings, EventSnapshot};
///
/// let event = EventSnapshot { guest_count: 0, cocktails_selected: vec![] };
/// assert!(validate_plan(&event, &CalculationSettings::default(), &[], &[]).is_err());
/// ```
pub fn validate_plan(
    event: &EventSnapshot,
    settings: &CalculationSettings,
    recipes: &[RecipeItem],
    ingredients: &[Ingredient],
) -> CoreResult<()> {
    validate_event(event)?;
    validate_settings(settings)?;
    validate_catalog(recipes, ingredients)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
