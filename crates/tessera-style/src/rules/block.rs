//! At-rule blocks: `@keyframes` and `@media`.
//!
//! A block is inserted into the store as a single rule. The rules inside it
//! are never bound to handles of their own; when one of them changes after
//! realization, the whole block is re-rendered through
//! [`RuleHandle::set_css_text`].

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tessera_core::logging::targets;

use super::rule::{InvalidateHook, Rule};
use crate::error::{Error, Result};
use crate::selector::Pointer;
use crate::target::{RuleHandle, RuleStore};
use crate::tree::{PropertiesItem, RuleLeaf, RulesItem};

#[derive(Clone)]
enum Child {
    Rule(Rule),
    Text(String),
    Block(Block),
}

impl Child {
    fn render(&self) -> String {
        match self {
            Child::Rule(rule) => rule.render(),
            Child::Text(css) => css.clone(),
            Child::Block(block) => block.render(),
        }
    }
}

struct BlockState {
    prelude: String,
    children: Vec<Child>,
    handle: Option<Arc<dyn RuleHandle>>,
    parent: Option<InvalidateHook>,
}

/// Shared core of [`Keyframes`] and [`Media`].
#[derive(Clone)]
struct Block {
    shared: Arc<Mutex<BlockState>>,
}

impl Block {
    fn new(prelude: String) -> Self {
        Self {
            shared: Arc::new(Mutex::new(BlockState {
                prelude,
                children: Vec::new(),
                handle: None,
                parent: None,
            })),
        }
    }

    fn invalidate_hook(&self) -> InvalidateHook {
        let weak: Weak<Mutex<BlockState>> = Arc::downgrade(&self.shared);
        Arc::new(move || {
            if let Some(shared) = weak.upgrade() {
                Block { shared }.refresh();
            }
        })
    }

    fn push(&self, child: Child) {
        match &child {
            Child::Rule(rule) => rule.set_invalidate(Some(self.invalidate_hook())),
            Child::Block(block) => block.shared.lock().parent = Some(self.invalidate_hook()),
            Child::Text(_) => {}
        }
        self.shared.lock().children.push(child);
        self.refresh();
    }

    fn push_tree(&self, tree: RulesItem) {
        for leaf in tree.into_leaves() {
            match leaf {
                RuleLeaf::Raw(css) => self.push(Child::Text(css)),
                RuleLeaf::Rule(rule) => self.push(Child::Rule(rule)),
                RuleLeaf::Keyframes(block) => self.push(Child::Block(block.0)),
                RuleLeaf::Media(block) => self.push(Child::Block(block.0)),
                RuleLeaf::ForEach(generator) => {
                    tracing::debug!(
                        target: targets::SHEET,
                        count = generator.count(),
                        "repeated rules inside an at-rule block are expanded once"
                    );
                    self.push_tree(generator.all_items());
                }
            }
        }
    }

    fn render(&self) -> String {
        let (prelude, children) = {
            let state = self.shared.lock();
            (state.prelude.clone(), state.children.clone())
        };
        let body: String = children.iter().map(Child::render).collect();
        format!("{prelude}{{{body}}}")
    }

    /// Push the current text to wherever this block is rendered.
    fn refresh(&self) {
        let (handle, parent) = {
            let state = self.shared.lock();
            (state.handle.clone(), state.parent.clone())
        };
        if let Some(handle) = handle {
            let css = self.render();
            tracing::trace!(target: targets::RULE, css = %css, "block re-rendered");
            handle.set_css_text(&css);
        } else if let Some(parent) = parent {
            parent();
        }
    }

    fn realize(&self, store: &dyn RuleStore) -> Result<()> {
        let css = self.render();
        let index = store
            .insert_rule(&css)
            .ok_or_else(|| Error::insert_rejected(css.as_str()))?;
        let handle = store.rule_at(index).ok_or_else(|| Error::missing_handle(index))?;

        tracing::debug!(target: targets::RULE, index, css = %css, "block realized");
        self.shared.lock().handle = Some(handle);
        Ok(())
    }

    fn clear(&self) {
        let children = std::mem::take(&mut self.shared.lock().children);
        for child in &children {
            match child {
                Child::Rule(rule) => {
                    rule.set_invalidate(None);
                    rule.detach();
                }
                Child::Block(block) => block.clear(),
                Child::Text(_) => {}
            }
        }
        self.refresh();
    }

    fn detach(&self) {
        let children = {
            let mut state = self.shared.lock();
            state.handle = None;
            state.children.clone()
        };
        for child in &children {
            match child {
                Child::Rule(rule) => rule.detach(),
                Child::Block(block) => block.detach(),
                Child::Text(_) => {}
            }
        }
    }

    fn rules(&self) -> Vec<Rule> {
        self.shared
            .lock()
            .children
            .iter()
            .filter_map(|child| match child {
                Child::Rule(rule) => Some(rule.clone()),
                _ => None,
            })
            .collect()
    }

    fn is_realized(&self) -> bool {
        self.shared.lock().handle.is_some()
    }

    fn handle(&self) -> Option<Arc<dyn RuleHandle>> {
        self.shared.lock().handle.clone()
    }
}

/// An `@keyframes` block.
///
/// ```
/// use tessera_style::prelude::*;
///
/// let fade = Keyframes::new("fade")
///     .frame("from", keys::OPACITY.value(0.0))
///     .frame("to", keys::OPACITY.value(1.0));
///
/// assert_eq!(fade.render(), "@keyframes fade{from{opacity:0}to{opacity:1}}");
/// ```
#[derive(Clone)]
pub struct Keyframes(Block);

impl Keyframes {
    /// Create an empty keyframes block.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let block = Block::new(format!("@keyframes {name}"));
        Self(block)
    }

    /// Add a frame (`from`, `to`, `50%`) with its declarations.
    pub fn frame(self, selector: impl Into<Pointer>, properties: impl Into<PropertiesItem>) -> Self {
        let rule = Rule::new(selector).properties(properties);
        self.0.push(Child::Rule(rule));
        self
    }

    /// The animation name.
    pub fn name(&self) -> String {
        let prelude = self.0.shared.lock().prelude.clone();
        prelude
            .strip_prefix("@keyframes ")
            .unwrap_or(&prelude)
            .to_string()
    }

    /// The frames in declaration order.
    pub fn frames(&self) -> Vec<Rule> {
        self.0.rules()
    }

    /// Render the whole block.
    pub fn render(&self) -> String {
        self.0.render()
    }

    /// Insert the block into `store` as one rule.
    pub fn realize(&self, store: &dyn RuleStore) -> Result<()> {
        self.0.realize(store)
    }

    /// Remove every frame and re-render the now empty block.
    pub fn clear(&self) {
        self.0.clear();
    }

    /// Forget the handle and drop every frame's listeners.
    pub fn detach(&self) {
        self.0.detach();
    }

    /// Check if the block was inserted into a store.
    pub fn is_realized(&self) -> bool {
        self.0.is_realized()
    }

    /// The block's rule handle.
    pub fn handle(&self) -> Option<Arc<dyn RuleHandle>> {
        self.0.handle()
    }
}

impl fmt::Debug for Keyframes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Keyframes").field(&self.render()).finish()
    }
}

/// An `@media` block wrapping a rules tree.
///
/// ```
/// use tessera_style::prelude::*;
///
/// let print = Media::new("print", Rule::new(".nav").property(&keys::DISPLAY, Display::None));
/// assert_eq!(print.render(), "@media print{.nav{display:none}}");
/// ```
#[derive(Clone)]
pub struct Media(Block);

impl Media {
    /// Create a media block from a query and a rules tree.
    ///
    /// Repeated rules inside the tree are expanded once, at construction.
    pub fn new(query: impl AsRef<str>, rules: impl Into<RulesItem>) -> Self {
        let block = Block::new(format!("@media {}", query.as_ref()));
        block.push_tree(rules.into());
        Self(block)
    }

    /// Append more rules to the block.
    pub fn add(&self, rules: impl Into<RulesItem>) {
        self.0.push_tree(rules.into());
    }

    /// The media query text.
    pub fn query(&self) -> String {
        let prelude = self.0.shared.lock().prelude.clone();
        prelude.strip_prefix("@media ").unwrap_or(&prelude).to_string()
    }

    /// The plain rules directly inside the block.
    pub fn rules(&self) -> Vec<Rule> {
        self.0.rules()
    }

    /// Render the whole block.
    pub fn render(&self) -> String {
        self.0.render()
    }

    /// Insert the block into `store` as one rule.
    pub fn realize(&self, store: &dyn RuleStore) -> Result<()> {
        self.0.realize(store)
    }

    /// Remove every inner rule and re-render the now empty block.
    pub fn clear(&self) {
        self.0.clear();
    }

    /// Forget the handle and drop every inner rule's listeners.
    pub fn detach(&self) {
        self.0.detach();
    }

    /// Check if the block was inserted into a store.
    pub fn is_realized(&self) -> bool {
        self.0.is_realized()
    }

    /// The block's rule handle.
    pub fn handle(&self) -> Option<Arc<dyn RuleHandle>> {
        self.0.handle()
    }
}

impl fmt::Debug for Media {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Media").field(&self.render()).finish()
    }
}
