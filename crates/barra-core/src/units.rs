//! # Units Module
//!
//! The bar's unit conversion table.
//!
//! ## Base Scale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  EVERY RECIPE QUANTITY IS CONVERTED TO ONE SCALE BEFORE AGGREGATION     │
//! │                                                                         │
//! │  Liquids:   1 ml  = 1        Solids:   1 gr = 1                         │
//! │             1 cl  = 10                 1 kg = 1000                      │
//! │             1 oz  = 29.5735                                             │
//! │             1 dash = 0.8     (bar measure, approximate)                 │
//! │                                                                         │
//! │  Countable: 1 pieza = 1      (piece-yield ingredients never reach       │
//! │                               this table, see purchase.rs)              │
//! │                                                                         │
//! │  ml and gr share the numeric base: the catalog expresses package        │
//! │  volume in whichever of the two the ingredient is measured in.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use barra_core::units::{convert_to_base, Unit};
//!
//! // 1.5 oz of rum in base units (ml)
//! let ml = convert_to_base(1.5, "oz");
//! assert!((ml.value() - 44.36025).abs() < 1e-9);
//!
//! let unit: Unit = "cl".parse().unwrap();
//! assert_eq!(unit.factor(), 10.0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CalculationWarning, Checked, ValidationError};

/// Symbol of the countable sentinel unit.
pub const PIECE_SYMBOL: &str = "pieza";

// =============================================================================
// Unit
// =============================================================================

/// A unit symbol accepted in recipe lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Milliliter, the liquid base.
    Ml,
    /// US fluid ounce.
    Oz,
    /// Centiliter.
    Cl,
    /// Bitters dash.
    Dash,
    /// Gram, the solid base.
    Gr,
    /// Kilogram.
    Kg,
    /// A discrete piece (wedge, slice, leaf).
    Pieza,
}

impl Unit {
    /// Every unit in the table, in display order.
    pub const ALL: [Unit; 7] = [
        Unit::Ml,
        Unit::Oz,
        Unit::Cl,
        Unit::Dash,
        Unit::Gr,
        Unit::Kg,
        Unit::Pieza,
    ];

    /// The symbol used in recipe rows.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Unit::Ml => "ml",
            Unit::Oz => "oz",
            Unit::Cl => "cl",
            Unit::Dash => "dash",
            Unit::Gr => "gr",
            Unit::Kg => "kg",
            Unit::Pieza => PIECE_SYMBOL,
        }
    }

    /// Multiplier from this unit into the base scale.
    pub const fn factor(&self) -> f64 {
        match self {
            Unit::Ml => 1.0,
            Unit::Oz => 29.5735,
            Unit::Cl => 10.0,
            Unit::Dash => 0.8,
            Unit::Gr => 1.0,
            Unit::Kg => 1000.0,
            Unit::Pieza => 1.0,
        }
    }

    /// True for units that count items instead of measuring them.
    pub const fn is_countable(&self) -> bool {
        matches!(self, Unit::Pieza)
    }

    /// Converts a quantity in this unit into the base scale.
    #[inline]
    pub fn to_base(&self, quantity: f64) -> f64 {
        quantity * self.factor()
    }

    /// Looks a symbol up in the table. Matching is exact.
    pub fn from_symbol(symbol: &str) -> Option<Unit> {
        Unit::ALL.into_iter().find(|u| u.symbol() == symbol)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Unit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::from_symbol(s).ok_or_else(|| ValidationError::NotAllowed {
            field: "unit".to_string(),
            allowed: Unit::ALL.iter().map(|u| u.symbol().to_string()).collect(),
        })
    }
}

// =============================================================================
// Lookups with fallback
// =============================================================================

/// Returns the conversion factor for a symbol.
///
/// Unknown symbols get factor 1 (the quantity is taken as already being in
/// base units) and carry a [`CalculationWarning::UnknownUnit`].
pub fn conversion_factor(symbol: &str) -> Checked<f64> {
    match Unit::from_symbol(symbol) {
        Some(unit) => Checked::clean(unit.factor()),
        None => Checked::degraded(
            1.0,
            CalculationWarning::UnknownUnit {
                unit: symbol.to_string(),
            },
        ),
    }
}

/// Converts `quantity` expressed in `symbol` into the base scale.
///
/// ## Example
/// ```rust
/// use barra_core::units::convert_to_base;
///
/// assert_eq!(*convert_to_base(4.5, "cl").value(), 45.0);
/// assert_eq!(*convert_to_base(2.0, "kg").value(), 2000.0);
///
/// // Passthrough, flagged
/// let unknown = convert_to_base(30.0, "shot");
/// assert_eq!(*unknown.value(), 30.0);
/// assert!(!unknown.is_clean());
/// ```
pub fn convert_to_base(quantity: f64, symbol: &str) -> Checked<f64> {
    conversion_factor(symbol).map(|factor| quantity * factor)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factors_match_table() {
        assert_eq!(*convert_to_base(1.0, "ml").value(), 1.0);
        assert_eq!(*convert_to_base(1.0, "oz").value(), 29.5735);
        assert_eq!(*convert_to_base(1.0, "cl").value(), 10.0);
        assert_eq!(*convert_to_base(1.0, "dash").value(), 0.8);
        assert_eq!(*convert_to_base(1.0, "gr").value(), 1.0);
        assert_eq!(*convert_to_base(1.0, "kg").value(), 1000.0);
        assert_eq!(*convert_to_base(1.0, "pieza").value(), 1.0);
    }

    #[test]
    fn test_unknown_unit_passes_through_with_warning() {
        let converted = convert_to_base(45.0, "jigger");
        assert_eq!(*converted.value(), 45.0);
        assert_eq!(
            converted.warnings(),
            &[CalculationWarning::UnknownUnit {
                unit: "jigger".to_string()
            }]
        );
    }

    #[test]
    fn test_lookup_is_exact() {
        // Same numeric result as ml, but flagged: the table is case-sensitive
        let converted = convert_to_base(10.0, "ML");
        assert_eq!(*converted.value(), 10.0);
        assert!(!converted.is_clean());
    }

    #[test]
    fn test_parse_and_display() {
        for unit in Unit::ALL {
            let parsed: Unit = unit.symbol().parse().unwrap();
            assert_eq!(parsed, unit);
            assert_eq!(parsed.to_string(), unit.symbol());
        }
        assert!("litro".parse::<Unit>().is_err());
    }

    #[test]
    fn test_only_pieza_is_countable() {
        let countable: Vec<Unit> = Unit::ALL.into_iter().filter(Unit::is_countable).collect();
        assert_eq!(countable, vec![Unit::Pieza]);
    }

    #[test]
    fn test_serde_uses_symbols() {
        assert_eq!(serde_json::to_string(&Unit::Dash).unwrap(), "\"dash\"");
        let unit: Unit = serde_json::from_str("\"pieza\"").unwrap();
        assert_eq!(unit, Unit::Pieza);
    }
}
