//! The rule entity: selectors plus a declaration map.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tessera_core::logging::targets;
use tessera_core::ConnectionGuard;

use crate::error::{Error, Result};
use crate::property::{Property, PropertyKey};
use crate::selector::{join, Pointer};
use crate::target::{ElementStyle, RuleHandle, RuleStore, StyleTarget};
use crate::tree::PropertiesItem;
use crate::types::CssValue;

/// Hook run instead of a direct push when the rule lives inside an at-rule block.
pub(crate) type InvalidateHook = Arc<dyn Fn() + Send + Sync>;

struct RuleState {
    selectors: Vec<Pointer>,
    declarations: HashMap<String, String>,
    target: Option<StyleTarget>,
    listeners: HashMap<String, Vec<ConnectionGuard>>,
    invalidate: Option<InvalidateHook>,
}

/// One selector-to-declarations unit.
///
/// A rule starts unrealized: every mutation only touches its in-memory
/// declaration map. Once realized against a [`RuleStore`] (or bound to an
/// element's inline style) each mutation is also pushed to that target.
///
/// `Rule` is a cheap handle; clones share the same entity. Reactive
/// listeners installed through [`Rule::install`] only hold a weak reference
/// back to the entity, and the entity owns their guards: they are
/// unregistered by [`Rule::detach`] or when the last handle is dropped.
///
/// Declaration order is not guaranteed in [`Rule::render`].
///
/// # Example
///
/// ```
/// use tessera_style::prelude::*;
///
/// let rule = Rule::new(Pointer::class("a"))
///     .pointer(Pointer::class("b"))
///     .property(&keys::COLOR, Color::RED);
///
/// assert_eq!(rule.render(), ".a,.b{color:red}");
/// ```
#[derive(Clone)]
pub struct Rule {
    shared: Arc<Mutex<RuleState>>,
}

impl Rule {
    /// Create a rule for one selector.
    pub fn new(pointer: impl Into<Pointer>) -> Self {
        Self::with_pointers([pointer.into()])
    }

    /// Create a rule for a group of selectors.
    pub fn with_pointers(pointers: impl IntoIterator<Item = Pointer>) -> Self {
        let mut selectors: Vec<Pointer> = Vec::new();
        for pointer in pointers {
            if !selectors.contains(&pointer) {
                selectors.push(pointer);
            }
        }
        Self {
            shared: Arc::new(Mutex::new(RuleState {
                selectors,
                declarations: HashMap::new(),
                target: None,
                listeners: HashMap::new(),
                invalidate: None,
            })),
        }
    }

    /// Add a selector to the group.
    pub fn pointer(self, pointer: impl Into<Pointer>) -> Self {
        self.add_pointer(pointer);
        self
    }

    /// Add a selector, updating the realized rule's selector text.
    ///
    /// Adding a selector that is already present does nothing.
    pub fn add_pointer(&self, pointer: impl Into<Pointer>) {
        let pointer = pointer.into();
        let (handle, selector_text, invalidate) = {
            let mut state = self.shared.lock();
            if state.selectors.contains(&pointer) {
                return;
            }
            state.selectors.push(pointer);
            let handle = state.target.as_ref().and_then(|t| t.rule_handle().cloned());
            (handle, join(&state.selectors), state.invalidate.clone())
        };

        if let Some(invalidate) = invalidate {
            invalidate();
        } else if let Some(handle) = handle {
            handle.set_selector_text(&selector_text);
        }
    }

    /// Set a typed declaration, following any internal hook the value exposes.
    pub fn property<V: CssValue>(self, key: &PropertyKey<V>, value: V) -> Self {
        self.install(Property::new(key, value));
        self
    }

    /// Install every property of a tree, in flatten order.
    pub fn properties(self, tree: impl Into<PropertiesItem>) -> Self {
        tree.into().for_each_leaf(|property| self.install(property.clone()));
        self
    }

    /// Install a property and each of its aliases as declarations.
    ///
    /// The current value is written right away. A listener is then attached
    /// to the property's source so every later change is pushed as a single
    /// upsert (or a removal when the value becomes absent). Installing a
    /// declaration name again replaces the previous listener for that name.
    pub fn install(&self, property: Property) {
        for declaration in property.declarations() {
            let name = declaration.name().to_string();

            let previous = self.shared.lock().listeners.remove(&name);
            drop(previous);

            match declaration.value() {
                Some(value) => self.set(&name, &value),
                None => self.remove(&name),
            }

            let weak: Weak<Mutex<RuleState>> = Arc::downgrade(&self.shared);
            let listener_name = name.clone();
            let guards = declaration.watch(Arc::new(move |value: Option<String>| {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                let rule = Rule { shared };
                match value {
                    Some(value) => rule.set(&listener_name, &value),
                    None => rule.remove(&listener_name),
                }
            }));

            if !guards.is_empty() {
                self.shared.lock().listeners.insert(name, guards);
            }
        }
    }

    /// Upsert one declaration.
    ///
    /// While unrealized only the map changes; the value is sent to the target
    /// on the next realization.
    pub fn set(&self, name: &str, value: &str) {
        let (target, invalidate) = {
            let mut state = self.shared.lock();
            state.declarations.insert(name.to_string(), value.to_string());
            (state.target.clone(), state.invalidate.clone())
        };

        tracing::trace!(target: targets::RULE, name, value, "declaration set");
        if let Some(invalidate) = invalidate {
            invalidate();
        } else if let Some(target) = target {
            target.set_property(name, value);
        }
    }

    /// Remove one declaration. Removing an absent name still notifies a
    /// realized target.
    pub fn remove(&self, name: &str) {
        let (target, invalidate) = {
            let mut state = self.shared.lock();
            state.declarations.remove(name);
            (state.target.clone(), state.invalidate.clone())
        };

        tracing::trace!(target: targets::RULE, name, "declaration removed");
        if let Some(invalidate) = invalidate {
            invalidate();
        } else if let Some(target) = target {
            target.remove_property(name);
        }
    }

    /// Remove every declaration, pushing each removal to the target.
    pub fn clear(&self) {
        let names: Vec<String> = self.shared.lock().declarations.keys().cloned().collect();
        for name in names {
            self.remove(&name);
        }
    }

    /// Render as `sel1,sel2{k1:v1;k2:v2}`.
    pub fn render(&self) -> String {
        let state = self.shared.lock();
        let body = state
            .declarations
            .iter()
            .map(|(name, value)| format!("{name}:{value}"))
            .collect::<Vec<_>>()
            .join(";");
        format!("{}{{{}}}", join(&state.selectors), body)
    }

    /// Insert the rendered rule into `store` and bind to the returned handle.
    ///
    /// Realizing an already realized rule inserts it again; the previous
    /// handle is forgotten.
    pub fn realize(&self, store: &dyn RuleStore) -> Result<()> {
        let css = self.render();
        let index = store
            .insert_rule(&css)
            .ok_or_else(|| Error::insert_rejected(css.as_str()))?;
        let handle = store.rule_at(index).ok_or_else(|| Error::missing_handle(index))?;

        tracing::debug!(target: targets::RULE, index, css = %css, "rule realized");
        self.shared.lock().target = Some(StyleTarget::Rule(handle));
        Ok(())
    }

    /// Bind to an element's inline style and write every current declaration.
    pub fn bind_element(&self, element: Arc<dyn ElementStyle>) {
        let declarations = {
            let mut state = self.shared.lock();
            state.target = Some(StyleTarget::Element(Arc::clone(&element)));
            state.declarations.clone()
        };
        for (name, value) in &declarations {
            element.set_inline_property(name, value);
        }
    }

    /// Drop every reactive listener and forget the target.
    ///
    /// The declarations stay in memory; a detached rule can be realized again.
    pub fn detach(&self) {
        let (listeners, target) = {
            let mut state = self.shared.lock();
            (std::mem::take(&mut state.listeners), state.target.take())
        };
        tracing::trace!(
            target: targets::RULE,
            listeners = listeners.len(),
            realized = target.is_some(),
            "rule detached"
        );
        drop(listeners);
    }

    /// A snapshot of every declaration, sorted by name.
    pub fn declarations(&self) -> Vec<(String, String)> {
        let mut declarations: Vec<_> = self
            .shared
            .lock()
            .declarations
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        declarations.sort();
        declarations
    }

    /// The current value of one declaration.
    pub fn value(&self, name: &str) -> Option<String> {
        self.shared.lock().declarations.get(name).cloned()
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.shared.lock().declarations.len()
    }

    /// Check if the rule has no declarations.
    pub fn is_empty(&self) -> bool {
        self.shared.lock().declarations.is_empty()
    }

    /// The comma-joined selector text.
    pub fn selector_text(&self) -> String {
        join(&self.shared.lock().selectors)
    }

    /// Check if the rule is bound to a target.
    pub fn is_realized(&self) -> bool {
        self.shared.lock().target.is_some()
    }

    /// The realized rule handle, if bound to a rule store.
    pub fn handle(&self) -> Option<Arc<dyn RuleHandle>> {
        self.shared
            .lock()
            .target
            .as_ref()
            .and_then(|target| target.rule_handle().cloned())
    }

    /// Number of declaration names with a live listener.
    pub fn listener_count(&self) -> usize {
        self.shared.lock().listeners.len()
    }

    pub(crate) fn set_invalidate(&self, hook: Option<InvalidateHook>) {
        self.shared.lock().invalidate = hook;
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.lock();
        f.debug_struct("Rule")
            .field("selector", &join(&state.selectors))
            .field("declarations", &state.declarations.len())
            .field("target", &state.target)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::keys;
    use crate::target::{MemoryElement, MemoryStore};
    use crate::types::{Color, Length, ReactiveColor};
    use tessera_core::State;

    #[test]
    fn render_joins_selectors_without_spaces() {
        let rule = Rule::with_pointers([Pointer::class("a"), Pointer::class("b")])
            .property(&keys::COLOR, Color::RED);
        assert_eq!(rule.render(), ".a,.b{color:red}");
    }

    #[test]
    fn empty_rule_keeps_braces() {
        assert_eq!(Rule::new(Pointer::id("main")).render(), "#main{}");
    }

    #[test]
    fn duplicate_pointer_is_ignored() {
        let rule = Rule::new(".a").pointer(".a").pointer(".b");
        assert_eq!(rule.selector_text(), ".a,.b");
    }

    #[test]
    fn upsert_keeps_last_value() {
        let rule = Rule::new(".a")
            .property(&keys::WIDTH, Length::px(1.0))
            .property(&keys::WIDTH, Length::px(2.0));
        assert_eq!(rule.len(), 1);
        assert_eq!(rule.render(), ".a{width:2px}");
    }

    #[test]
    fn unrealized_mutations_are_buffered() {
        let rule = Rule::new(".a");
        rule.set("color", "red");
        assert!(!rule.is_realized());

        let store = MemoryStore::new();
        rule.realize(&store).unwrap();
        assert!(rule.is_realized());
        assert_eq!(store.css_texts(), [".a{color:red}"]);
    }

    #[test]
    fn realized_mutations_reach_handle() {
        let store = MemoryStore::new();
        let rule = Rule::new(".a");
        rule.realize(&store).unwrap();

        rule.set("color", "red");
        assert_eq!(store.rule(0).unwrap().declaration("color").as_deref(), Some("red"));

        rule.remove("color");
        assert_eq!(store.css_texts(), [".a{}"]);
    }

    #[test]
    fn added_pointer_updates_selector_text() {
        let store = MemoryStore::new();
        let rule = Rule::new(".a");
        rule.realize(&store).unwrap();

        rule.add_pointer(".b");
        assert_eq!(store.css_texts(), [".a,.b{}"]);
    }

    #[test]
    fn rejected_insert_is_an_error() {
        let store = MemoryStore::rejecting(|_| true);
        let rule = Rule::new(".a");
        assert_eq!(
            rule.realize(&store),
            Err(Error::insert_rejected(".a{}"))
        );
        assert!(!rule.is_realized());
    }

    #[test]
    fn bound_state_pushes_changes() {
        let store = MemoryStore::new();
        let width = State::new(Length::px(10.0));
        let rule = Rule::new(".a").properties(keys::WIDTH.bind(width.clone()));
        rule.realize(&store).unwrap();

        width.set(Length::px(20.0));
        assert_eq!(store.css_texts(), [".a{width:20px}"]);
        assert_eq!(rule.value("width").as_deref(), Some("20px"));
    }

    #[test]
    fn reinstall_replaces_listener() {
        let first = State::new(Length::px(1.0));
        let second = State::new(Length::px(2.0));
        let rule = Rule::new(".a");

        rule.install(keys::WIDTH.bind(first.clone()));
        rule.install(keys::WIDTH.bind(second.clone()));
        assert_eq!(first.subscriber_count(), 0);
        assert_eq!(second.subscriber_count(), 1);

        first.set(Length::px(5.0));
        assert_eq!(rule.value("width").as_deref(), Some("2px"));
    }

    #[test]
    fn optional_state_removes_declaration() {
        let store = MemoryStore::new();
        let opacity = State::new(Some(0.5_f32));
        let rule = Rule::new(".a");
        rule.install(Property::bind_optional(&keys::OPACITY, opacity.clone()));
        rule.realize(&store).unwrap();

        opacity.set(None);
        assert_eq!(store.css_texts(), [".a{}"]);
        assert_eq!(rule.value("opacity"), None);

        opacity.set(Some(1.0));
        assert_eq!(store.css_texts(), [".a{opacity:1}"]);
    }

    #[test]
    fn reactive_color_reserializes() {
        let store = MemoryStore::new();
        let red = State::new(0);
        let color = ReactiveColor::rgb(red.clone(), State::new(0), State::new(0));
        let rule = Rule::new(".a").properties(keys::COLOR.reactive(color));
        rule.realize(&store).unwrap();

        red.set(255);
        assert_eq!(store.css_texts(), [".a{color:rgba(255,0,0,1)}"]);
    }

    #[test]
    fn detach_unregisters_listeners() {
        let width = State::new(Length::px(1.0));
        let rule = Rule::new(".a").properties(keys::WIDTH.bind(width.clone()));
        assert_eq!(width.subscriber_count(), 1);

        rule.detach();
        assert_eq!(width.subscriber_count(), 0);
        assert_eq!(rule.listener_count(), 0);
    }

    #[test]
    fn dropping_rule_unregisters_listeners() {
        let width = State::new(Length::px(1.0));
        let rule = Rule::new(".a").properties(keys::WIDTH.bind(width.clone()));
        drop(rule);
        assert_eq!(width.subscriber_count(), 0);
    }

    #[test]
    fn element_binding_replays_declarations() {
        let element = Arc::new(MemoryElement::new());
        let rule = Rule::new(".ignored").property(&keys::DISPLAY, crate::types::Display::Flex);
        rule.bind_element(element.clone());
        assert_eq!(element.get("display").as_deref(), Some("flex"));

        rule.set("width", "3px");
        assert_eq!(element.style_attribute(), "display:flex;width:3px");
        assert!(rule.handle().is_none());
    }

    #[test]
    fn clear_removes_from_target() {
        let store = MemoryStore::new();
        let rule = Rule::new(".a")
            .property(&keys::COLOR, Color::RED)
            .property(&keys::WIDTH, Length::px(1.0));
        rule.realize(&store).unwrap();

        rule.clear();
        assert!(rule.is_empty());
        assert_eq!(store.css_texts(), [".a{}"]);
    }
}
