#![forbid(unsafe_code)]

//! Height Input Validator.
//!
//! Turns the save dialog's free-text height field into a [`HeightSpec`].
//! [`validate_height`] is the only way to obtain a fixed height from user
//! text, so an unvalidated string never reaches the dashboard container.
//!
//! # Accepted Input
//!
//! | Input (after trim) | Result |
//! |--------------------|--------|
//! | `800px`, `50vh`, `12.5%`, `2em`, `1.5rem` | `Fixed(number, unit)` |
//! | `100` (digits only) | `Fixed(100, px)` |
//! | empty | [`InvalidHeight`] |
//! | `12.5` (decimal, no unit) | [`InvalidHeight`] |
//! | `abc`, `12xyz`, `-5px`, `10 px` | [`InvalidHeight`] |

use std::fmt;

use qdash_core::{BareNumber, CssLength, LengthParseError, LengthUnit};

/// Units accepted for a dashboard height.
pub const HEIGHT_UNITS: &[LengthUnit] = &[
    LengthUnit::Px,
    LengthUnit::Vh,
    LengthUnit::Percent,
    LengthUnit::Em,
    LengthUnit::Rem,
];

/// Dashboard viewport height override.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum HeightSpec {
    /// Full viewport minus the top margin.
    #[default]
    Unset,
    /// A literal, validated length.
    Fixed(CssLength),
}

impl HeightSpec {
    /// The fixed length, if one is set.
    #[must_use]
    pub const fn fixed(&self) -> Option<CssLength> {
        match self {
            Self::Unset => None,
            Self::Fixed(length) => Some(*length),
        }
    }

    /// Whether an override is active.
    #[must_use]
    pub const fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }
}

impl fmt::Display for HeightSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => f.write_str("full viewport"),
            Self::Fixed(length) => write!(f, "{length}"),
        }
    }
}

/// A height string the validator rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidHeight {
    input: String,
    reason: LengthParseError,
}

impl InvalidHeight {
    /// The raw text the user entered.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Why the parser rejected it.
    #[must_use]
    pub fn reason(&self) -> &LengthParseError {
        &self.reason
    }

    /// User-facing message listing the accepted units.
    #[must_use]
    pub fn message(&self) -> String {
        let units: Vec<&str> = HEIGHT_UNITS.iter().map(|unit| unit.suffix()).collect();
        format!(
            "Invalid height {:?}. Enter a number followed by one of: {} (e.g. 800px or 50vh).",
            self.input,
            units.join(", ")
        )
    }
}

impl fmt::Display for InvalidHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for InvalidHeight {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.reason)
    }
}

/// Validate a free-text height.
///
/// Pure: no logging, no side effects. The caller decides how to surface a
/// rejection and must keep the dialog open when it gets one.
pub fn validate_height(raw: &str) -> Result<HeightSpec, InvalidHeight> {
    CssLength::parse_with(raw.trim(), HEIGHT_UNITS, BareNumber::Integer(LengthUnit::Px))
        .map(HeightSpec::Fixed)
        .map_err(|reason| InvalidHeight {
            input: raw.to_owned(),
            reason,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(value: f64, unit: LengthUnit) -> HeightSpec {
        HeightSpec::Fixed(CssLength::new(value, unit))
    }

    #[test]
    fn accepts_number_with_unit() {
        assert_eq!(validate_height("800px"), Ok(fixed(800.0, LengthUnit::Px)));
        assert_eq!(validate_height("50vh"), Ok(fixed(50.0, LengthUnit::Vh)));
        assert_eq!(validate_height("75%"), Ok(fixed(75.0, LengthUnit::Percent)));
        assert_eq!(validate_height("2em"), Ok(fixed(2.0, LengthUnit::Em)));
        assert_eq!(validate_height("1.5rem"), Ok(fixed(1.5, LengthUnit::Rem)));
    }

    #[test]
    fn bare_digits_default_to_px() {
        assert_eq!(validate_height("100"), Ok(fixed(100.0, LengthUnit::Px)));
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(validate_height("  600px\n"), Ok(fixed(600.0, LengthUnit::Px)));
    }

    #[test]
    fn rejects_empty_and_blank() {
        for raw in ["", "   ", "\t"] {
            let err = validate_height(raw).unwrap_err();
            assert_eq!(err.reason(), &LengthParseError::Empty, "{raw:?}");
        }
    }

    #[test]
    fn rejects_garbage() {
        for raw in ["abc", "12xyz", "-5px", "10 px", "12.5", "px", "1e3px", "50vw"] {
            assert!(validate_height(raw).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn message_lists_accepted_units() {
        let err = validate_height("abc").unwrap_err();
        assert_eq!(err.input(), "abc");
        let message = err.message();
        assert!(message.contains("px, vh, %, em, rem"), "{message}");
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn height_spec_accessors() {
        assert_eq!(HeightSpec::default(), HeightSpec::Unset);
        assert!(!HeightSpec::Unset.is_fixed());
        assert_eq!(HeightSpec::Unset.fixed(), None);
        let spec = fixed(600.0, LengthUnit::Px);
        assert!(spec.is_fixed());
        assert_eq!(spec.to_string(), "600px");
    }
}
