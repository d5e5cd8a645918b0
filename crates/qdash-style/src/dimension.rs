#![forbid(unsafe_code)]

//! Dimension expressions.

use std::fmt;

use qdash_core::length::CssLength;

/// A computed width or height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    /// A literal length, emitted verbatim.
    Length(CssLength),
    /// `calc(<base> - <minus>)`.
    Minus {
        /// The length being reduced (e.g. `100vh`).
        base: CssLength,
        /// The amount removed (e.g. a margin).
        minus: CssLength,
    },
}

impl Dimension {
    /// `calc(base - minus)`.
    #[must_use]
    pub const fn minus(base: CssLength, minus: CssLength) -> Self {
        Self::Minus { base, minus }
    }

    /// The literal length, if this is not a `calc()` expression.
    #[must_use]
    pub const fn as_length(&self) -> Option<CssLength> {
        match self {
            Self::Length(length) => Some(*length),
            Self::Minus { .. } => None,
        }
    }
}

impl From<CssLength> for Dimension {
    fn from(length: CssLength) -> Self {
        Self::Length(length)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length(length) => write!(f, "{length}"),
            Self::Minus { base, minus } => write!(f, "calc({base} - {minus})"),
        }
    }
}
