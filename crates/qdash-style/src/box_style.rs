#![forbid(unsafe_code)]

//! Ordered property maps with override-merge semantics.
//!
//! A [`BoxStyle`] behaves like an object spread: setting a property that is
//! already present replaces its value in place, and merging applies every
//! declaration of the right-hand side in order. Later layers win.
//!
//! # Example
//!
//! ```
//! use qdash_core::length::CssLength;
//! use qdash_style::{BoxStyle, Position, Property};
//!
//! let base = BoxStyle::new()
//!     .with(Property::Position, Position::Relative)
//!     .with(Property::Height, CssLength::px(300.0));
//! let overlay = BoxStyle::new().with(Property::Position, Position::Fixed);
//!
//! let merged = base.merged(&overlay);
//! assert_eq!(merged.to_css(), "position: fixed; height: 300px");
//! ```

use std::fmt;

use qdash_core::length::CssLength;

use crate::dimension::Dimension;

/// Style properties emitted by qdash widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Position,
    Top,
    Left,
    Right,
    Bottom,
    ZIndex,
    Width,
    Height,
    MinWidth,
    MaxWidth,
    Padding,
    Display,
    JustifyContent,
    AlignItems,
    Overflow,
    Border,
    BorderRadius,
    BackgroundColor,
    Color,
    BoxShadow,
    FontFamily,
    FontSize,
    Cursor,
    Transition,
}

impl Property {
    /// CSS property name.
    #[must_use]
    pub const fn css_name(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Top => "top",
            Self::Left => "left",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::ZIndex => "z-index",
            Self::Width => "width",
            Self::Height => "height",
            Self::MinWidth => "min-width",
            Self::MaxWidth => "max-width",
            Self::Padding => "padding",
            Self::Display => "display",
            Self::JustifyContent => "justify-content",
            Self::AlignItems => "align-items",
            Self::Overflow => "overflow",
            Self::Border => "border",
            Self::BorderRadius => "border-radius",
            Self::BackgroundColor => "background-color",
            Self::Color => "color",
            Self::BoxShadow => "box-shadow",
            Self::FontFamily => "font-family",
            Self::FontSize => "font-size",
            Self::Cursor => "cursor",
            Self::Transition => "transition",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_name())
    }
}

/// Positioning scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Relative,
    Absolute,
    Fixed,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Relative => "relative",
            Self::Absolute => "absolute",
            Self::Fixed => "fixed",
        })
    }
}

/// A property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Dimension(Dimension),
    Position(Position),
    Integer(i32),
    /// A fixed keyword or literal such as `flex` or `white`.
    Keyword(&'static str),
    /// Caller-supplied free text.
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dimension(dim) => write!(f, "{dim}"),
            Self::Position(pos) => write!(f, "{pos}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Keyword(kw) => f.write_str(kw),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<Dimension> for Value {
    fn from(dim: Dimension) -> Self {
        Self::Dimension(dim)
    }
}

impl From<CssLength> for Value {
    fn from(length: CssLength) -> Self {
        Self::Dimension(Dimension::Length(length))
    }
}

impl From<Position> for Value {
    fn from(pos: Position) -> Self {
        Self::Position(pos)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Integer(n)
    }
}

impl From<&'static str> for Value {
    fn from(kw: &'static str) -> Self {
        Self::Keyword(kw)
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Ordered declaration list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxStyle {
    declarations: Vec<(Property, Value)>,
}

impl BoxStyle {
    /// Create an empty style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property (builder).
    #[must_use]
    pub fn with(mut self, property: Property, value: impl Into<Value>) -> Self {
        self.set(property, value);
        self
    }

    /// Set a property, replacing an existing value in place.
    pub fn set(&mut self, property: Property, value: impl Into<Value>) {
        let value = value.into();
        match self.declarations.iter_mut().find(|(p, _)| *p == property) {
            Some(slot) => slot.1 = value,
            None => self.declarations.push((property, value)),
        }
    }

    /// Look up a property.
    #[must_use]
    pub fn get(&self, property: Property) -> Option<&Value> {
        self.declarations
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v)
    }

    /// Serialized value of a property, if set.
    #[must_use]
    pub fn css_value(&self, property: Property) -> Option<String> {
        self.get(property).map(ToString::to_string)
    }

    /// Remove a property, returning its value.
    pub fn remove(&mut self, property: Property) -> Option<Value> {
        let index = self.declarations.iter().position(|(p, _)| *p == property)?;
        Some(self.declarations.remove(index).1)
    }

    /// Apply every declaration of `other` on top of `self`.
    pub fn merge(&mut self, other: &BoxStyle) {
        for (property, value) in &other.declarations {
            self.set(*property, value.clone());
        }
    }

    /// Merge into a copy (builder form of [`merge`](Self::merge)).
    #[must_use]
    pub fn merged(mut self, other: &BoxStyle) -> Self {
        self.merge(other);
        self
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether no declarations are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Declarations in order.
    pub fn iter(&self) -> impl Iterator<Item = (Property, &Value)> + '_ {
        self.declarations.iter().map(|(p, v)| (*p, v))
    }

    /// Inline CSS, `"name: value; name: value"`.
    #[must_use]
    pub fn to_css(&self) -> String {
        self.declarations
            .iter()
            .map(|(p, v)| format!("{p}: {v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl fmt::Display for BoxStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_in_place() {
        let style = BoxStyle::new()
            .with(Property::Position, Position::Relative)
            .with(Property::Width, CssLength::percent(100.0))
            .with(Property::Position, Position::Fixed);
        assert_eq!(style.len(), 2);
        assert_eq!(style.to_css(), "position: fixed; width: 100%");
    }

    #[test]
    fn merge_appends_new_properties() {
        let base = BoxStyle::new().with(Property::Position, Position::Relative);
        let top = BoxStyle::new()
            .with(Property::ZIndex, 1000)
            .with(Property::Position, Position::Fixed);
        let merged = base.merged(&top);
        assert_eq!(merged.to_css(), "position: fixed; z-index: 1000");
    }

    #[test]
    fn get_and_remove() {
        let mut style = BoxStyle::new().with(Property::Display, "flex");
        assert_eq!(style.get(Property::Display), Some(&Value::Keyword("flex")));
        assert_eq!(style.css_value(Property::Display).as_deref(), Some("flex"));
        assert_eq!(style.remove(Property::Display), Some(Value::Keyword("flex")));
        assert!(style.is_empty());
        assert_eq!(style.remove(Property::Display), None);
    }

    #[test]
    fn empty_style_serializes_to_empty_string() {
        assert_eq!(BoxStyle::new().to_css(), "");
    }
}
