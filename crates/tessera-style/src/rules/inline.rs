//! Inline style of one element.

use std::sync::Arc;

use tessera_core::logging::targets;

use super::rule::Rule;
use crate::config::RenderMode;
use crate::error::{Error, Result};
use crate::property::Property;
use crate::selector::Pointer;
use crate::target::ElementStyle;
use crate::tree::PropertiesItem;

/// A property tree bound to an element's inline style.
///
/// In live mode every declaration (and every later change) is written to the
/// element. In the other modes the element is never touched and
/// [`InlineStyle::style_attribute`] renders the current declarations.
///
/// When the element leaves the document, [`InlineStyle::detach`] drops the
/// listeners; [`InlineStyle::apply`] binds the style to the element again
/// once it is back.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tessera_style::prelude::*;
///
/// let element = Arc::new(MemoryElement::new());
/// let width = State::new(Length::px(10.0));
/// let style = InlineStyle::new(element.clone(), RenderMode::Live)
///     .properties(keys::WIDTH.bind(width.clone()));
///
/// width.set(Length::px(12.0));
/// assert_eq!(element.get("width").as_deref(), Some("12px"));
/// assert_eq!(style.style_attribute(), "width:12px");
/// ```
#[derive(Debug, Clone)]
pub struct InlineStyle {
    rule: Rule,
    installed: Vec<Property>,
    mode: RenderMode,
}

impl InlineStyle {
    /// Bind to `element` in the given mode.
    pub fn new(element: Arc<dyn ElementStyle>, mode: RenderMode) -> Self {
        let rule = Rule::with_pointers(std::iter::empty::<Pointer>());
        if mode.is_live() {
            rule.bind_element(element);
        }
        Self {
            rule,
            installed: Vec::new(),
            mode,
        }
    }

    /// Install every property of a tree.
    pub fn properties(mut self, tree: impl Into<PropertiesItem>) -> Self {
        tree.into().for_each_leaf(|property| {
            self.rule.install(property.clone());
            self.installed.push(property.clone());
        });
        self
    }

    /// Bind to `element`, write every current declaration and listen again.
    ///
    /// Used when an element re-enters a live document. Declarations set
    /// directly through [`InlineStyle::set`] are replayed as they are; every
    /// installed property is reinstalled from its source.
    pub fn apply(&self, element: Arc<dyn ElementStyle>) -> Result<()> {
        if !self.mode.is_live() {
            return Err(Error::NotLive { mode: self.mode });
        }
        self.rule.bind_element(element);
        for property in &self.installed {
            self.rule.install(property.clone());
        }
        tracing::debug!(
            target: targets::RULE,
            properties = self.installed.len(),
            "inline style applied"
        );
        Ok(())
    }

    /// Upsert one declaration.
    pub fn set(&self, name: &str, value: &str) {
        self.rule.set(name, value);
    }

    /// Remove one declaration.
    pub fn remove(&self, name: &str) {
        self.rule.remove(name);
    }

    /// The current value of one declaration.
    pub fn value(&self, name: &str) -> Option<String> {
        self.rule.value(name)
    }

    /// The declarations as `style` attribute text (`k:v;k:v`), sorted by name.
    pub fn style_attribute(&self) -> String {
        self.rule
            .declarations()
            .iter()
            .map(|(name, value)| format!("{name}:{value}"))
            .collect::<Vec<_>>()
            .join(";")
    }

    /// The render mode.
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Drop every listener. The element keeps its current inline style.
    pub fn detach(&self) {
        self.rule.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::keys;
    use crate::target::MemoryElement;
    use crate::types::{Display, Length, UserSelect};
    use tessera_core::State;

    #[test]
    fn live_style_writes_element() {
        let element = Arc::new(MemoryElement::new());
        let style = InlineStyle::new(element.clone(), RenderMode::Live)
            .properties(keys::user_select(UserSelect::None));

        assert_eq!(element.get("user-select").as_deref(), Some("none"));
        assert_eq!(element.get("-webkit-user-select").as_deref(), Some("none"));

        style.remove("user-select");
        assert_eq!(element.len(), 1);
    }

    #[test]
    fn reapply_binds_fresh_element() {
        let first = Arc::new(MemoryElement::new());
        let width = State::new(Length::px(1.0));
        let style = InlineStyle::new(first.clone(), RenderMode::Live)
            .properties(keys::WIDTH.bind(width.clone()));
        style.set("cursor", "pointer");

        style.detach();
        width.set(Length::px(2.0));
        assert_eq!(first.get("width").as_deref(), Some("1px"));
        assert_eq!(style.value("width").as_deref(), Some("1px"));

        let second = Arc::new(MemoryElement::new());
        style.apply(second.clone()).expect("Failed to apply inline style");
        assert_eq!(second.get("width").as_deref(), Some("2px"));
        assert_eq!(second.get("cursor").as_deref(), Some("pointer"));

        width.set(Length::px(3.0));
        assert_eq!(second.get("width").as_deref(), Some("3px"));
        assert_eq!(first.get("width").as_deref(), Some("1px"));
        assert_eq!(width.subscriber_count(), 1);
    }

    #[test]
    fn apply_outside_live_mode_is_rejected() {
        let element = Arc::new(MemoryElement::new());
        let style = InlineStyle::new(element.clone(), RenderMode::StaticPreview)
            .properties(keys::DISPLAY.value(Display::Flex));

        assert_eq!(
            style.apply(element.clone()),
            Err(Error::NotLive {
                mode: RenderMode::StaticPreview
            })
        );
        assert!(element.is_empty());
    }

    #[test]
    fn preview_leaves_element_untouched() {
        let element = Arc::new(MemoryElement::new());
        let display = State::new(Display::Block);
        let style = InlineStyle::new(element.clone(), RenderMode::StaticPreview)
            .properties(keys::DISPLAY.bind(display.clone()));

        display.set(Display::Grid);
        assert!(element.is_empty());
        assert_eq!(style.style_attribute(), "display:grid");
    }

    #[test]
    fn optional_none_removes_inline_declaration() {
        let element = Arc::new(MemoryElement::new());
        let opacity = State::new(Some(0.25_f32));
        let _style = InlineStyle::new(element.clone(), RenderMode::Live).properties(
            crate::property::Property::bind_optional(&keys::OPACITY, opacity.clone()),
        );
        assert_eq!(element.get("opacity").as_deref(), Some("0.25"));

        opacity.set(None);
        assert_eq!(element.get("opacity"), None);
    }
}
