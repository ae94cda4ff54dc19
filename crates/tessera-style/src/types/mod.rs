//! Property value types.

mod color;
mod length;
mod value;

pub use color::{Color, ReactiveColor};
pub use length::{Edges, Length};
pub use value::{ChangeCallback, CssValue, Display, Keyword, UserSelect};
