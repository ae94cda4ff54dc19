//! CSS length values.

use super::CssValue;

/// CSS-like length values with various units.
///
/// # Example
///
/// ```
/// use tessera_style::prelude::*;
///
/// assert_eq!(Length::px(16.0).description(), "16px");
/// assert_eq!(Length::em(1.5).description(), "1.5em");
/// assert_eq!(Length::percent(50.0).description(), "50%");
/// assert_eq!(Length::Zero.description(), "0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Length {
    /// Absolute pixels.
    Px(f32),
    /// Relative to current font size.
    Em(f32),
    /// Relative to root font size.
    Rem(f32),
    /// Percentage of containing block.
    Percent(f32),
    /// Percentage of the viewport width.
    Vw(f32),
    /// Percentage of the viewport height.
    Vh(f32),
    /// Automatic sizing (context-dependent).
    #[default]
    Auto,
    /// Zero length.
    Zero,
}

impl Length {
    /// Create a pixel value.
    pub fn px(value: f32) -> Self {
        Self::Px(value)
    }

    /// Create an em value.
    pub fn em(value: f32) -> Self {
        Self::Em(value)
    }

    /// Create a rem value.
    pub fn rem(value: f32) -> Self {
        Self::Rem(value)
    }

    /// Create a percentage value.
    pub fn percent(value: f32) -> Self {
        Self::Percent(value)
    }

    /// Check if this is an auto value.
    pub fn is_auto(&self) -> bool {
        matches!(self, Length::Auto)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Length::Zero => true,
            Length::Px(v)
            | Length::Em(v)
            | Length::Rem(v)
            | Length::Percent(v)
            | Length::Vw(v)
            | Length::Vh(v) => *v == 0.0,
            Length::Auto => false,
        }
    }
}

impl CssValue for Length {
    fn description(&self) -> String {
        match self {
            Length::Px(v) => format!("{v}px"),
            Length::Em(v) => format!("{v}em"),
            Length::Rem(v) => format!("{v}rem"),
            Length::Percent(v) => format!("{v}%"),
            Length::Vw(v) => format!("{v}vw"),
            Length::Vh(v) => format!("{v}vh"),
            Length::Auto => "auto".to_string(),
            Length::Zero => "0".to_string(),
        }
    }
}

/// Edge values for shorthand properties such as `margin` and `padding`.
///
/// Renders the shortest of the one-, two- or four-value CSS forms.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edges {
    /// Top edge value.
    pub top: Length,
    /// Right edge value.
    pub right: Length,
    /// Bottom edge value.
    pub bottom: Length,
    /// Left edge value.
    pub left: Length,
}

impl Edges {
    /// Create uniform edge values.
    pub fn uniform(value: Length) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Create symmetric edge values (vertical, horizontal).
    pub fn symmetric(vertical: Length, horizontal: Length) -> Self {
        Self {
            top: vertical,
            bottom: vertical,
            left: horizontal,
            right: horizontal,
        }
    }

    /// Create from 4 values (top, right, bottom, left).
    pub fn new(top: Length, right: Length, bottom: Length, left: Length) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

impl CssValue for Edges {
    fn description(&self) -> String {
        if self.top == self.bottom && self.left == self.right {
            if self.top == self.left {
                return self.top.description();
            }
            return format!("{} {}", self.top.description(), self.left.description());
        }
        format!(
            "{} {} {} {}",
            self.top.description(),
            self.right.description(),
            self.bottom.description(),
            self.left.description()
        )
    }
}
