//! Stylesheets: a rules group bound to a store and a render mode.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tessera_core::logging::{span_names, targets};
use tessera_core::{ConnectionGuard, PerfSpan, State};

use super::block::{Keyframes, Media};
use super::group::RulesGroup;
use super::rule::Rule;
use crate::config::{RenderMode, SheetConfig};
use crate::error::{Error, Result};
use crate::target::RuleStore;
use crate::tree::RulesItem;

struct SheetShared {
    store: Mutex<Option<Arc<dyn RuleStore>>>,
    disabled: AtomicBool,
}

impl SheetShared {
    fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::SeqCst);
        let store = self.store.lock().clone();
        tracing::debug!(target: targets::SHEET, disabled, live = store.is_some(), "disabled flag set");
        if let Some(store) = store {
            store.set_disabled(disabled);
        }
    }
}

/// A stylesheet.
///
/// Holds a [`RulesGroup`] and a [`SheetConfig`]. In [`RenderMode::Live`],
/// [`StyleSheet::apply`] inserts every entity into a [`RuleStore`] and keeps
/// them bound for live updates. In [`RenderMode::StaticPreview`] nothing is
/// ever sent to a store; mutations stay in memory and
/// [`StyleSheet::render_css`] returns the current text.
///
/// Applying twice replays every entity from scratch: the sheet does not
/// track what the store already holds, so callers must clear the store first.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tessera_style::prelude::*;
///
/// let store = Arc::new(MemoryStore::new());
/// let sheet = StyleSheet::new(SheetConfig::live())
///     .with_rules(Rule::new(".a").property(&keys::COLOR, Color::RED));
///
/// sheet.apply(store.clone()).unwrap();
/// assert_eq!(store.css_texts(), [".a{color:red}"]);
///
/// sheet.set_disabled(true);
/// assert!(store.is_disabled());
/// ```
pub struct StyleSheet {
    config: SheetConfig,
    group: RulesGroup,
    shared: Arc<SheetShared>,
    disabled_binding: Mutex<Option<ConnectionGuard>>,
}

impl StyleSheet {
    /// Create an empty stylesheet.
    pub fn new(config: SheetConfig) -> Self {
        let disabled = config.disabled;
        Self {
            config,
            group: RulesGroup::new(),
            shared: Arc::new(SheetShared {
                store: Mutex::new(None),
                disabled: AtomicBool::new(disabled),
            }),
            disabled_binding: Mutex::new(None),
        }
    }

    /// Add a rules tree.
    pub fn with_rules(mut self, rules: impl Into<RulesItem>) -> Self {
        self.add_rules(rules);
        self
    }

    /// Flatten a rules tree into the sheet.
    ///
    /// If the sheet was already applied, the new entities are realized right
    /// away and land after the existing ones.
    pub fn add_rules(&mut self, rules: impl Into<RulesItem>) {
        let added = RulesGroup::from_tree(rules);
        let store = self.shared.store.lock().clone();
        if let Some(store) = store {
            added.realize(&store);
        }
        self.group.append(added);
    }

    /// Realize every entity against `store`.
    ///
    /// Returns the number of store rules inserted. Outside live mode nothing
    /// is sent to the store and [`Error::NotLive`] is returned.
    #[tracing::instrument(skip_all, target = "tessera_style::sheet", fields(mode = ?self.config.mode))]
    pub fn apply(&self, store: Arc<dyn RuleStore>) -> Result<usize> {
        if !self.config.mode.is_live() {
            tracing::debug!(target: targets::SHEET, "apply skipped");
            return Err(Error::NotLive {
                mode: self.config.mode,
            });
        }

        let _span = PerfSpan::new(span_names::APPLY);
        *self.shared.store.lock() = Some(Arc::clone(&store));
        let inserted = self.group.realize(&store);
        if self.is_disabled() {
            store.set_disabled(true);
        }
        tracing::debug!(target: targets::SHEET, inserted, "stylesheet applied");
        Ok(inserted)
    }

    /// The current CSS text of every entity.
    pub fn render_css(&self) -> String {
        self.group.render()
    }

    /// Set the disabled flag, forwarding it to the store once applied.
    ///
    /// Realized rules stay in the store; only its active bit flips.
    pub fn set_disabled(&self, disabled: bool) {
        self.shared.set_disabled(disabled);
    }

    /// Follow a boolean state with the disabled flag.
    ///
    /// The current value is applied immediately, then on every change.
    /// Binding again replaces the previous binding.
    pub fn bind_disabled(&self, state: State<bool>) {
        self.set_disabled(state.get());
        let weak: Weak<SheetShared> = Arc::downgrade(&self.shared);
        let guard = state.subscribe(move |_, disabled| {
            if let Some(shared) = weak.upgrade() {
                shared.set_disabled(*disabled);
            }
        });
        let previous = self.disabled_binding.lock().replace(guard);
        drop(previous);
    }

    /// The disabled flag.
    pub fn is_disabled(&self) -> bool {
        self.shared.disabled.load(Ordering::SeqCst)
    }

    /// Delete the rule at `index`.
    ///
    /// Not supported: rules are only ever appended. Logs and does nothing.
    pub fn delete_rule(&self, index: usize) {
        tracing::warn!(target: targets::SHEET, index, "delete_rule is not supported; ignoring");
    }

    /// The flattened group.
    pub fn group(&self) -> &RulesGroup {
        &self.group
    }

    /// Every rule, in document order.
    pub fn rules(&self) -> Vec<Rule> {
        self.group.rules()
    }

    /// Every keyframes block, in document order.
    pub fn keyframes(&self) -> Vec<Keyframes> {
        self.group.keyframes()
    }

    /// Every media block, in document order.
    pub fn media(&self) -> Vec<Media> {
        self.group.media()
    }

    /// The render mode.
    pub fn mode(&self) -> RenderMode {
        self.config.mode
    }

    /// The configuration the sheet was created with.
    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    /// Check if the sheet was applied to a store.
    pub fn is_applied(&self) -> bool {
        self.shared.store.lock().is_some()
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::new(SheetConfig::default())
    }
}

impl fmt::Debug for StyleSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleSheet")
            .field("config", &self.config)
            .field("group", &self.group)
            .field("disabled", &self.is_disabled())
            .finish()
    }
}
