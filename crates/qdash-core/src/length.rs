#![forbid(unsafe_code)]

//! CSS length values and a strict `<number><unit>` parser.
//!
//! The parser deliberately accepts a very small grammar: an unsigned decimal
//! number immediately followed by one of an allowed set of unit suffixes.
//! Anything else (signs, exponents, inner whitespace, `calc()`) is rejected.
//! Callers trim surrounding whitespace before parsing.
//!
//! A number is only accepted when it prints back exactly as written, up to
//! leading integer zeros and trailing fraction zeros. Digits past what an
//! `f64` can hold are an error rather than a silent rounding.

use std::fmt;

/// Unit suffix of a [`CssLength`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    /// CSS pixels (`px`).
    Px,
    /// Percentage of the viewport height (`vh`).
    Vh,
    /// Percentage of the viewport width (`vw`).
    Vw,
    /// Percentage of the containing block (`%`).
    Percent,
    /// Relative to the element font size (`em`).
    Em,
    /// Relative to the root font size (`rem`).
    Rem,
}

impl LengthUnit {
    /// Every unit the parser knows about.
    pub const ALL: [LengthUnit; 6] = [
        LengthUnit::Px,
        LengthUnit::Vh,
        LengthUnit::Vw,
        LengthUnit::Percent,
        LengthUnit::Em,
        LengthUnit::Rem,
    ];

    /// The CSS suffix for this unit.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Vh => "vh",
            Self::Vw => "vw",
            Self::Percent => "%",
            Self::Em => "em",
            Self::Rem => "rem",
        }
    }

    /// Look up a unit by its exact (case-sensitive) suffix.
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|unit| unit.suffix() == suffix)
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// A normalized CSS length: a finite, non-negative number and a unit.
///
/// Display prints the shortest decimal form of the number followed by the
/// unit suffix, so `600.0 px` prints as `600px` and `1.5 em` as `1.5em`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CssLength {
    value: f64,
    unit: LengthUnit,
}

impl CssLength {
    /// Zero pixels.
    pub const ZERO: Self = Self::px(0.0);

    /// Create a length. Non-finite or negative values are clamped to zero.
    #[must_use]
    pub fn new(value: f64, unit: LengthUnit) -> Self {
        let value = if value.is_finite() && value > 0.0 {
            value
        } else {
            0.0
        };
        Self { value, unit }
    }

    /// Pixel length.
    #[must_use]
    pub const fn px(value: f64) -> Self {
        Self {
            value,
            unit: LengthUnit::Px,
        }
    }

    /// Viewport-height length.
    #[must_use]
    pub const fn vh(value: f64) -> Self {
        Self {
            value,
            unit: LengthUnit::Vh,
        }
    }

    /// Viewport-width length.
    #[must_use]
    pub const fn vw(value: f64) -> Self {
        Self {
            value,
            unit: LengthUnit::Vw,
        }
    }

    /// Percentage length.
    #[must_use]
    pub const fn percent(value: f64) -> Self {
        Self {
            value,
            unit: LengthUnit::Percent,
        }
    }

    /// The numeric part.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.value
    }

    /// The unit.
    #[must_use]
    pub const fn unit(self) -> LengthUnit {
        self.unit
    }

    /// Parse `text` against an allowed unit set.
    ///
    /// `bare` decides what happens to an integer with no unit suffix.
    /// A decimal without a unit is always rejected.
    pub fn parse_with(
        text: &str,
        units: &[LengthUnit],
        bare: BareNumber,
    ) -> Result<Self, LengthParseError> {
        if text.is_empty() {
            return Err(LengthParseError::Empty);
        }

        let split = text
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(text.len());
        let (number, suffix) = text.split_at(split);

        let has_fraction = match number.split_once('.') {
            None => false,
            Some((int, frac)) => {
                if int.is_empty() || frac.is_empty() || frac.contains('.') {
                    return Err(LengthParseError::Malformed(text.to_owned()));
                }
                true
            }
        };
        if number.is_empty() {
            return Err(LengthParseError::Malformed(text.to_owned()));
        }

        let value: f64 = number
            .parse()
            .map_err(|_| LengthParseError::Malformed(text.to_owned()))?;
        if !value.is_finite() {
            return Err(LengthParseError::Malformed(text.to_owned()));
        }
        if normalized_number(number) != value.to_string() {
            return Err(LengthParseError::Imprecise(text.to_owned()));
        }

        if suffix.is_empty() {
            return match bare {
                BareNumber::Integer(unit) if !has_fraction => Ok(Self { value, unit }),
                _ => Err(LengthParseError::MissingUnit(text.to_owned())),
            };
        }

        match LengthUnit::from_suffix(suffix) {
            Some(unit) if units.contains(&unit) => Ok(Self { value, unit }),
            _ => Err(LengthParseError::UnknownUnit {
                unit: suffix.to_owned(),
            }),
        }
    }
}

/// `number` without leading integer zeros or trailing fraction zeros.
fn normalized_number(number: &str) -> String {
    let (int, frac) = number.split_once('.').unwrap_or((number, ""));
    let int = match int.trim_start_matches('0') {
        "" => "0",
        digits => digits,
    };
    match frac.trim_end_matches('0') {
        "" => int.to_owned(),
        frac => format!("{int}.{frac}"),
    }
}

impl fmt::Display for CssLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

/// Policy for a number written without a unit suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BareNumber {
    /// Reject it.
    #[default]
    Reject,
    /// Accept a whole number and assign the given unit.
    Integer(LengthUnit),
}

/// Errors from [`CssLength::parse_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LengthParseError {
    /// Nothing to parse.
    Empty,
    /// The numeric part is not an unsigned decimal.
    Malformed(String),
    /// A number with no unit where one was required.
    MissingUnit(String),
    /// The suffix is not one of the allowed units.
    UnknownUnit { unit: String },
    /// The number has more significant digits than an `f64` keeps.
    Imprecise(String),
}

impl fmt::Display for LengthParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty length"),
            Self::Malformed(text) => write!(f, "malformed length {text:?}"),
            Self::MissingUnit(text) => write!(f, "length {text:?} has no unit"),
            Self::UnknownUnit { unit } => write!(f, "unknown unit {unit:?}"),
            Self::Imprecise(text) => {
                write!(f, "length {text:?} has more digits than can be kept exactly")
            }
        }
    }
}

impl std::error::Error for LengthParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    const HEIGHT_UNITS: &[LengthUnit] = &[
        LengthUnit::Px,
        LengthUnit::Vh,
        LengthUnit::Percent,
        LengthUnit::Em,
        LengthUnit::Rem,
    ];

    fn parse(text: &str) -> Result<CssLength, LengthParseError> {
        CssLength::parse_with(text, HEIGHT_UNITS, BareNumber::Integer(LengthUnit::Px))
    }

    #[test]
    fn parses_every_allowed_unit() {
        assert_eq!(parse("800px"), Ok(CssLength::px(800.0)));
        assert_eq!(parse("50vh"), Ok(CssLength::vh(50.0)));
        assert_eq!(parse("75%"), Ok(CssLength::percent(75.0)));
        assert_eq!(
            parse("1.5em"),
            Ok(CssLength::new(1.5, LengthUnit::Em))
        );
        assert_eq!(parse("2rem"), Ok(CssLength::new(2.0, LengthUnit::Rem)));
    }

    #[test]
    fn bare_integer_gets_default_unit() {
        assert_eq!(parse("100"), Ok(CssLength::px(100.0)));
    }

    #[test]
    fn bare_decimal_is_rejected() {
        assert!(matches!(parse("12.5"), Err(LengthParseError::MissingUnit(_))));
    }

    #[test]
    fn bare_integer_rejected_when_policy_rejects() {
        assert!(matches!(
            CssLength::parse_with("10", HEIGHT_UNITS, BareNumber::Reject),
            Err(LengthParseError::MissingUnit(_))
        ));
    }

    #[test]
    fn unit_outside_allowed_set_is_unknown() {
        assert_eq!(
            parse("10vw"),
            Err(LengthParseError::UnknownUnit { unit: "vw".into() })
        );
        assert_eq!(
            parse("12xyz"),
            Err(LengthParseError::UnknownUnit { unit: "xyz".into() })
        );
    }

    #[test]
    fn malformed_numbers() {
        assert_eq!(parse(""), Err(LengthParseError::Empty));
        assert!(matches!(parse("abc"), Err(LengthParseError::Malformed(_))));
        assert!(matches!(parse(".5px"), Err(LengthParseError::Malformed(_))));
        assert!(matches!(parse("5.px"), Err(LengthParseError::Malformed(_))));
        assert!(matches!(parse("1.2.3px"), Err(LengthParseError::Malformed(_))));
        assert!(matches!(parse("-5px"), Err(LengthParseError::Malformed(_))));
    }

    #[test]
    fn units_are_case_sensitive() {
        assert!(matches!(parse("10PX"), Err(LengthParseError::UnknownUnit { .. })));
    }

    #[test]
    fn inner_whitespace_is_rejected() {
        assert!(matches!(parse("10 px"), Err(LengthParseError::UnknownUnit { .. })));
    }

    #[test]
    fn display_is_normalized() {
        assert_eq!(CssLength::px(600.0).to_string(), "600px");
        assert_eq!(CssLength::new(1.5, LengthUnit::Em).to_string(), "1.5em");
        assert_eq!(parse("007px").unwrap().to_string(), "7px");
        assert_eq!(CssLength::percent(50.0).to_string(), "50%");
    }

    #[test]
    fn digits_beyond_f64_are_rejected() {
        assert_eq!(
            parse("123456789012345678901px"),
            Err(LengthParseError::Imprecise("123456789012345678901px".into()))
        );
        assert!(matches!(
            parse("0.1234567890123456789px"),
            Err(LengthParseError::Imprecise(_))
        ));
        assert!(matches!(
            parse("9007199254740993"),
            Err(LengthParseError::Imprecise(_))
        ));
        assert_eq!(
            parse("1000000000000000000000px").unwrap().to_string(),
            "1000000000000000000000px"
        );
        assert_eq!(parse("0.250em").unwrap().to_string(), "0.25em");
        assert_eq!(parse("000.000px").unwrap().to_string(), "0px");
    }

    #[test]
    fn new_clamps_invalid_values() {
        assert_eq!(CssLength::new(-3.0, LengthUnit::Px), CssLength::ZERO);
        assert_eq!(CssLength::new(f64::NAN, LengthUnit::Px), CssLength::ZERO);
    }
}
