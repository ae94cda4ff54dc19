//! The leaf value contract and the simple value types.
//!
//! Every property value is a [`CssValue`]: something that can describe itself
//! as CSS text. A value may additionally expose an internal reactive hook
//! through [`CssValue::observe`], which lets a rule re-serialize the value
//! when one of its parts changes.
//!
//! # Example
//!
//! ```
//! use tessera_style::prelude::*;
//!
//! assert_eq!(Length::px(16.0).description(), "16px");
//! assert_eq!(Keyword::AUTO.description(), "auto");
//! assert_eq!(Display::InlineBlock.description(), "inline-block");
//! assert_eq!(0.5_f32.description(), "0.5");
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use tessera_core::ConnectionGuard;

/// Callback invoked when a value's internal state changes.
pub type ChangeCallback = Arc<dyn Fn() + Send + Sync>;

/// A value that can be written into a CSS declaration.
pub trait CssValue: Send + Sync + 'static {
    /// The CSS text for this value.
    fn description(&self) -> String;

    /// Register `on_change` with the value's internal reactive parts.
    ///
    /// Plain values have none and return no guards. Composite values (for
    /// example [`crate::types::ReactiveColor`]) call `on_change` whenever one
    /// of their parts changes; dropping the returned guards unregisters it.
    fn observe(&self, _on_change: ChangeCallback) -> Vec<ConnectionGuard> {
        Vec::new()
    }
}

impl CssValue for String {
    fn description(&self) -> String {
        self.clone()
    }
}

impl CssValue for &'static str {
    fn description(&self) -> String {
        (*self).to_string()
    }
}

impl CssValue for Cow<'static, str> {
    fn description(&self) -> String {
        self.to_string()
    }
}

macro_rules! display_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl CssValue for $ty {
                fn description(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

display_value!(i32, i64, u8, u16, u32, u64, usize, f32, f64);

impl<V: CssValue + ?Sized> CssValue for Arc<V> {
    fn description(&self) -> String {
        (**self).description()
    }

    fn observe(&self, on_change: ChangeCallback) -> Vec<ConnectionGuard> {
        (**self).observe(on_change)
    }
}

/// A bare CSS keyword such as `auto` or `inherit`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Keyword(Cow<'static, str>);

impl Keyword {
    /// `auto`
    pub const AUTO: Keyword = Keyword::new("auto");
    /// `none`
    pub const NONE: Keyword = Keyword::new("none");
    /// `inherit`
    pub const INHERIT: Keyword = Keyword::new("inherit");
    /// `initial`
    pub const INITIAL: Keyword = Keyword::new("initial");
    /// `unset`
    pub const UNSET: Keyword = Keyword::new("unset");

    /// A keyword known at compile time.
    pub const fn new(keyword: &'static str) -> Self {
        Self(Cow::Borrowed(keyword))
    }

    /// A keyword built at runtime.
    pub fn custom(keyword: impl Into<String>) -> Self {
        Self(Cow::Owned(keyword.into()))
    }

    /// The keyword text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl CssValue for Keyword {
    fn description(&self) -> String {
        self.0.to_string()
    }
}

/// Values of the `display` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Display {
    /// `none`
    None,
    /// `block`
    #[default]
    Block,
    /// `inline`
    Inline,
    /// `inline-block`
    InlineBlock,
    /// `flex`
    Flex,
    /// `inline-flex`
    InlineFlex,
    /// `grid`
    Grid,
    /// `contents`
    Contents,
}

impl Display {
    /// The CSS keyword for this display mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Display::None => "none",
            Display::Block => "block",
            Display::Inline => "inline",
            Display::InlineBlock => "inline-block",
            Display::Flex => "flex",
            Display::InlineFlex => "inline-flex",
            Display::Grid => "grid",
            Display::Contents => "contents",
        }
    }
}

impl CssValue for Display {
    fn description(&self) -> String {
        self.as_str().to_string()
    }
}

/// Values of the `user-select` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UserSelect {
    /// `auto`
    #[default]
    Auto,
    /// `none`
    None,
    /// `text`
    Text,
    /// `all`
    All,
}

impl CssValue for UserSelect {
    fn description(&self) -> String {
        match self {
            UserSelect::Auto => "auto",
            UserSelect::None => "none",
            UserSelect::Text => "text",
            UserSelect::All => "all",
        }
        .to_string()
    }
}
