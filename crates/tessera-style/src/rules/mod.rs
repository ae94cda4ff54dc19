//! Rules, at-rule blocks and the containers that realize them.

mod block;
mod group;
mod inline;
mod rule;
mod stylesheet;

pub use block::{Keyframes, Media};
pub use group::RulesGroup;
pub use inline::InlineStyle;
pub use rule::Rule;
pub use stylesheet::StyleSheet;
