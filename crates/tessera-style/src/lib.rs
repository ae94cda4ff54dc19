//! Declarative, type-checked CSS rules for Tessera.
//!
//! This crate builds stylesheets from typed values instead of CSS text:
//!
//! - **Properties**: typed keys and values, bound to fixed values or to
//!   reactive [`State`](tessera_core::State)
//! - **Trees**: conditional, nested composition of properties and rules
//! - **Rules**: selector groups with a live-updating declaration map
//! - **Containers**: stylesheets, inline styles and at-rule blocks realized
//!   against an external rule store
//! - **ForEach**: rules generated from a reactive array, updated by diffing
//!
//! The engine only emits CSS. It never parses, validates or cascades it.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tessera_style::prelude::*;
//!
//! let accent = State::new(Color::RED);
//! let compact = false;
//!
//! let sheet = StyleSheet::new(SheetConfig::live()).with_rules(rules![
//!     Rule::new(Pointer::class("button")).properties(properties![
//!         keys::COLOR.bind(accent.clone()),
//!         either(
//!             compact,
//!             keys::PADDING.value(Edges::uniform(Length::px(2.0))),
//!             keys::PADDING.value(Edges::uniform(Length::px(8.0))),
//!         ),
//!     ]),
//!     Keyframes::new("pulse").frame("50%", keys::OPACITY.value(0.5)),
//! ]);
//!
//! let store = Arc::new(MemoryStore::new());
//! sheet.apply(store.clone()).unwrap();
//!
//! accent.set(Color::BLUE);
//! assert_eq!(
//!     store.rule(0).unwrap().declaration("color").as_deref(),
//!     Some("blue")
//! );
//! ```

pub mod config;
pub mod foreach;
pub mod property;
pub mod rules;
pub mod selector;
pub mod target;
pub mod tree;
pub mod types;

mod error;

pub use error::{Error, Result};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::config::{RenderMode, SheetConfig};
    pub use crate::foreach::{diff, Delta, ForEach, RuleGenerator};
    pub use crate::property::{keys, Property, PropertyKey, ValueSource};
    pub use crate::rules::{InlineStyle, Keyframes, Media, Rule, RulesGroup, StyleSheet};
    pub use crate::selector::Pointer;
    pub use crate::target::{
        ElementStyle, MemoryElement, MemoryStore, RuleHandle, RuleStore, StyleTarget,
    };
    pub use crate::tree::{
        either, empty, optional, sequence, Node, PropertiesItem, RuleLeaf, RulesItem,
    };
    pub use crate::types::{
        Color, CssValue, Display, Edges, Keyword, Length, ReactiveColor, UserSelect,
    };
    pub use crate::{properties, rules};
    pub use tessera_core::{ConnectionGuard, State};
}
