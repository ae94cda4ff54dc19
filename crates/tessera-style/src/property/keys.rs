//! Standard property keys.
//!
//! Only a working subset of CSS is catalogued here. Any other property can be
//! declared with [`PropertyKey::new`] or [`PropertyKey::custom`].

use super::{Property, PropertyKey};
use crate::types::{Color, Display, Edges, Keyword, Length, UserSelect};

// === Color ===

/// `color`
pub const COLOR: PropertyKey<Color> = PropertyKey::new("color");
/// `background-color`
pub const BACKGROUND_COLOR: PropertyKey<Color> = PropertyKey::new("background-color");
/// `border-color`
pub const BORDER_COLOR: PropertyKey<Color> = PropertyKey::new("border-color");

// === Box Model ===

/// `display`
pub const DISPLAY: PropertyKey<Display> = PropertyKey::new("display");
/// `width`
pub const WIDTH: PropertyKey<Length> = PropertyKey::new("width");
/// `height`
pub const HEIGHT: PropertyKey<Length> = PropertyKey::new("height");
/// `min-width`
pub const MIN_WIDTH: PropertyKey<Length> = PropertyKey::new("min-width");
/// `max-width`
pub const MAX_WIDTH: PropertyKey<Length> = PropertyKey::new("max-width");
/// `min-height`
pub const MIN_HEIGHT: PropertyKey<Length> = PropertyKey::new("min-height");
/// `max-height`
pub const MAX_HEIGHT: PropertyKey<Length> = PropertyKey::new("max-height");
/// `margin`
pub const MARGIN: PropertyKey<Edges> = PropertyKey::new("margin");
/// `padding`
pub const PADDING: PropertyKey<Edges> = PropertyKey::new("padding");
/// `border-width`
pub const BORDER_WIDTH: PropertyKey<Length> = PropertyKey::new("border-width");
/// `border-radius`
pub const BORDER_RADIUS: PropertyKey<Length> = PropertyKey::new("border-radius");

// === Typography ===

/// `font-size`
pub const FONT_SIZE: PropertyKey<Length> = PropertyKey::new("font-size");
/// `font-weight`
pub const FONT_WEIGHT: PropertyKey<u32> = PropertyKey::new("font-weight");
/// `line-height`
pub const LINE_HEIGHT: PropertyKey<f32> = PropertyKey::new("line-height");

// === Effects ===

/// `opacity`
pub const OPACITY: PropertyKey<f32> = PropertyKey::new("opacity");
/// `z-index`
pub const Z_INDEX: PropertyKey<i32> = PropertyKey::new("z-index");
/// `transform`
pub const TRANSFORM: PropertyKey<String> = PropertyKey::new("transform");
/// `animation-name`
pub const ANIMATION_NAME: PropertyKey<String> = PropertyKey::new("animation-name");

// === Interaction ===

/// `user-select`
pub const USER_SELECT: PropertyKey<UserSelect> = PropertyKey::new("user-select");
/// `cursor`
pub const CURSOR: PropertyKey<Keyword> = PropertyKey::new("cursor");

/// `user-select` with its `-webkit-` fallback.
pub fn user_select(value: UserSelect) -> Property {
    Property::new(&USER_SELECT, value).with_alias("-webkit-user-select")
}
