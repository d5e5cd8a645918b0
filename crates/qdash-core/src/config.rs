#![forbid(unsafe_code)]

//! Dashboard margin configuration.
//!
//! Margins arrive as optional strings (from the embedding page, environment
//! variables or command-line flags). Resolution never fails: an unspecified
//! margin takes its documented default and an unparseable one falls back to
//! that default with a warning.
//!
//! | Option | Affects | Default |
//! |--------|---------|---------|
//! | `top_margin` | computed height | `37px` |
//! | `right_margin` | computed width | `0px` |

use std::env;

use crate::length::{BareNumber, CssLength, LengthUnit};

/// Default top margin subtracted from the viewport height.
pub const DEFAULT_TOP_MARGIN: CssLength = CssLength::px(37.0);

/// Default right margin subtracted from the viewport width.
pub const DEFAULT_RIGHT_MARGIN: CssLength = CssLength::px(0.0);

/// Environment variable overriding the top margin.
pub const ENV_TOP_MARGIN: &str = "QDASH_TOP_MARGIN";

/// Environment variable overriding the right margin.
pub const ENV_RIGHT_MARGIN: &str = "QDASH_RIGHT_MARGIN";

const MARGIN_UNITS: &[LengthUnit] = &[
    LengthUnit::Px,
    LengthUnit::Vh,
    LengthUnit::Vw,
    LengthUnit::Percent,
    LengthUnit::Em,
    LengthUnit::Rem,
];

/// Raw, externally supplied margin options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarginConfig {
    /// Top margin, e.g. `"37px"`. `None` uses [`DEFAULT_TOP_MARGIN`].
    pub top_margin: Option<String>,
    /// Right margin, e.g. `"0px"`. `None` uses [`DEFAULT_RIGHT_MARGIN`].
    pub right_margin: Option<String>,
}

impl MarginConfig {
    /// Config with no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the top margin (builder).
    #[must_use]
    pub fn with_top_margin(mut self, margin: impl Into<String>) -> Self {
        self.top_margin = Some(margin.into());
        self
    }

    /// Set the right margin (builder).
    #[must_use]
    pub fn with_right_margin(mut self, margin: impl Into<String>) -> Self {
        self.right_margin = Some(margin.into());
        self
    }

    /// Read overrides from `QDASH_TOP_MARGIN` / `QDASH_RIGHT_MARGIN`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            top_margin: env::var(ENV_TOP_MARGIN).ok(),
            right_margin: env::var(ENV_RIGHT_MARGIN).ok(),
        }
    }

    /// Fill unset fields from `other`.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self {
            top_margin: self.top_margin.or(other.top_margin),
            right_margin: self.right_margin.or(other.right_margin),
        }
    }

    /// Resolve into concrete lengths.
    #[must_use]
    pub fn resolve(&self) -> Margins {
        Margins {
            top: resolve_margin("top_margin", self.top_margin.as_deref(), DEFAULT_TOP_MARGIN),
            right: resolve_margin(
                "right_margin",
                self.right_margin.as_deref(),
                DEFAULT_RIGHT_MARGIN,
            ),
        }
    }
}

fn resolve_margin(option: &'static str, raw: Option<&str>, default: CssLength) -> CssLength {
    let Some(raw) = raw else {
        return default;
    };
    match CssLength::parse_with(raw.trim(), MARGIN_UNITS, BareNumber::Integer(LengthUnit::Px)) {
        Ok(length) => length,
        Err(error) => {
            tracing::warn!(option, value = raw, %error, %default, "invalid margin, using default");
            default
        }
    }
}

/// Resolved margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    /// Subtracted from `100vh` when no fixed height is set.
    pub top: CssLength,
    /// Subtracted from `100vw`.
    pub right: CssLength,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: DEFAULT_TOP_MARGIN,
            right: DEFAULT_RIGHT_MARGIN,
        }
    }
}
