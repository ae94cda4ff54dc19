//! Interfaces to the external rule store and element styles.
//!
//! The styling engine never talks to a document directly. The host
//! implements [`RuleStore`] (a stylesheet that rules are appended to),
//! [`RuleHandle`] (one inserted rule) and [`ElementStyle`] (an element's
//! inline style map). [`MemoryStore`] and [`MemoryElement`] are in-memory
//! implementations for static rendering and tests.

mod memory;

use std::fmt;
use std::sync::Arc;

pub use memory::{MemoryElement, MemoryRule, MemoryStore};

/// One rule inside a rule store.
pub trait RuleHandle: Send + Sync {
    /// The rule's selector text.
    fn selector_text(&self) -> String;

    /// Replace the rule's selector text.
    fn set_selector_text(&self, selector: &str);

    /// The rule's full CSS text.
    fn css_text(&self) -> String;

    /// Replace the rule's full CSS text.
    fn set_css_text(&self, css: &str);

    /// Upsert one declaration.
    fn set_property(&self, name: &str, value: &str);

    /// Remove one declaration.
    fn remove_property(&self, name: &str);
}

/// An append-only store of rules, such as a document stylesheet.
///
/// Rules are inserted at the end and fetched back by the returned index.
pub trait RuleStore: Send + Sync {
    /// Append a rule. Returns its index, or `None` if the store rejected it.
    fn insert_rule(&self, css: &str) -> Option<usize>;

    /// The rule at `index`.
    fn rule_at(&self, index: usize) -> Option<Arc<dyn RuleHandle>>;

    /// Flip the store's active bit.
    fn set_disabled(&self, disabled: bool);
}

/// The inline style map of one element.
pub trait ElementStyle: Send + Sync {
    /// Upsert one inline declaration.
    fn set_inline_property(&self, name: &str, value: &str);

    /// Remove one inline declaration.
    fn remove_inline_property(&self, name: &str);
}

/// Where a realized rule sends its declaration changes.
#[derive(Clone)]
pub enum StyleTarget {
    /// A rule inserted into a rule store.
    Rule(Arc<dyn RuleHandle>),
    /// An element's inline style.
    Element(Arc<dyn ElementStyle>),
}

impl StyleTarget {
    /// Upsert one declaration on the target.
    pub fn set_property(&self, name: &str, value: &str) {
        match self {
            StyleTarget::Rule(handle) => handle.set_property(name, value),
            StyleTarget::Element(element) => element.set_inline_property(name, value),
        }
    }

    /// Remove one declaration from the target.
    pub fn remove_property(&self, name: &str) {
        match self {
            StyleTarget::Rule(handle) => handle.remove_property(name),
            StyleTarget::Element(element) => element.remove_inline_property(name),
        }
    }

    /// The rule handle, if this target is a rule.
    pub fn rule_handle(&self) -> Option<&Arc<dyn RuleHandle>> {
        match self {
            StyleTarget::Rule(handle) => Some(handle),
            StyleTarget::Element(_) => None,
        }
    }
}

impl fmt::Debug for StyleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleTarget::Rule(handle) => f
                .debug_tuple("Rule")
                .field(&handle.selector_text())
                .finish(),
            StyleTarget::Element(_) => f.debug_tuple("Element").finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_dispatches_to_rule() {
        let store = MemoryStore::new();
        let index = store.insert_rule(".a{}").unwrap();
        let target = StyleTarget::Rule(store.rule_at(index).unwrap());

        target.set_property("color", "red");
        assert_eq!(store.css_texts(), [".a{color:red}"]);

        target.remove_property("color");
        assert_eq!(store.css_texts(), [".a{}"]);
        assert!(target.rule_handle().is_some());
    }

    #[test]
    fn target_dispatches_to_element() {
        let element = Arc::new(MemoryElement::new());
        let target = StyleTarget::Element(element.clone());

        target.set_property("width", "10px");
        assert_eq!(element.get("width").as_deref(), Some("10px"));

        target.remove_property("width");
        assert_eq!(element.get("width"), None);
        assert!(target.rule_handle().is_none());
    }
}
