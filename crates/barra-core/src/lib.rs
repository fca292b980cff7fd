//! # barra-core: Pure Calculation Logic for Barra
//!
//! This crate turns an event (guests, hours, cocktails) into the list of
//! bottles, kilos and ice bags to buy. It contains no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Barra Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Back-office / website calculator island              │   │
//! │  │    Event form ──► Cocktail picker ──► Shopping list view        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 barra-planner (CLI)                             │   │
//! │  │    config, input loading, validation, rendering                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ barra-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌────────────┐  │   │
//! │  │   │   units   │  │ purchase  │  │ shopping_ │  │ validation │  │   │
//! │  │   │  Unit     │  │ per-line  │  │   list    │  │   rules    │  │   │
//! │  │   │  factors  │  │ units     │  │ aggregate │  │   checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO RANDOMNESS • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Ingredient, RecipeItem, CalculationSettings, ...)
//! - [`units`] - Unit conversion table
//! - [`purchase`] - Purchase units needed for one recipe line
//! - [`shopping_list`] - Event-wide aggregation, rounding and ice
//! - [`error`] - Errors, warnings and the `Checked` value
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: same input, same list, same order
//! 2. **Never fails**: catalog problems become warnings next to the result
//! 3. **Round late**: quantities stay fractional until each ingredient is summed
//!
//! ## Example Usage
//!
//! ```rust
//! use barra_core::{generate_shopping_list, CalculationSettings, EventSnapshot};
//!
//! let event = EventSnapshot {
//!     guest_count: 37,
//!     cocktails_selected: vec![],
//! };
//! let settings = CalculationSettings {
//!     extra_ice_bags: Some(2),
//!     ..CalculationSettings::default()
//! };
//!
//! let list = generate_shopping_list(&event, &[], &[], &settings);
//!
//! // ceil(37 / 4) + 2 = 12 bags, nothing else to buy
//! assert_eq!(list.items.len(), 1);
//! assert_eq!(list.items[0].details, "12 bolsa(s)");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod purchase;
pub mod shopping_list;
pub mod types;
pub mod units;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CalculationWarning, Checked, CoreError, CoreResult, ValidationError};
pub use purchase::calculate_purchase_requirement;
pub use shopping_list::{generate_shopping_list, ShoppingList};
pub use types::*;
pub use units::{convert_to_base, Unit};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Service duration used when an event does not say.
pub const DEFAULT_HOURS: f64 = 5.0;

/// Drinks per guest per hour used when an event does not say.
pub const DEFAULT_CONSUMPTION_RATE: f64 = 1.0;

/// Overhead applied to every ingredient except ice (+10%).
pub const DEFAULT_SAFETY_MARGIN: f64 = 1.1;

/// One 3 kg bag of ice covers this many guests.
pub const GUESTS_PER_ICE_BAG: u32 = 4;

/// Identifier of the synthetic ice entry in every shopping list.
pub const ICE_RESULT_ID: &str = "hielo-calculado";

/// Display name of the ice entry.
pub const ICE_RESULT_NAME: &str = "Hielo (Bolsa 3kg)";

/// Category of the ice entry.
pub const ICE_CATEGORY: &str = "hielo";

/// Purchase unit of the ice entry.
pub const ICE_PURCHASE_UNIT: &str = "bolsa";

/// Largest guest count accepted by validation.
///
/// ## Business Reason
/// Catches typos (an extra zero) before they turn into a truck of ice.
pub const MAX_GUEST_COUNT: u32 = 100_000;

/// Longest service accepted by validation, in hours.
pub const MAX_EVENT_HOURS: f64 = 48.0;

/// Highest consumption rate accepted by validation, in drinks/guest/hour.
pub const MAX_CONSUMPTION_RATE: f64 = 20.0;
