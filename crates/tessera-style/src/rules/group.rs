//! Ordered groups of rules, at-rule blocks, raw text and generated segments.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tessera_core::logging::targets;
use tessera_core::ConnectionGuard;

use super::block::{Keyframes, Media};
use super::rule::Rule;
use crate::foreach::{Delta, RuleGenerator};
use crate::target::RuleStore;
use crate::tree::{RuleLeaf, RulesItem};

/// One entity of a group, in document order.
#[derive(Clone)]
enum Entry {
    Rule(Rule),
    Keyframes(Keyframes),
    Media(Media),
    Raw(String),
    Generated(Segment),
}

/// A flattened rules tree.
///
/// Every leaf of the tree becomes one entry, kept in document order.
/// Realizing the group submits the entries to a store in that order;
/// a rejected entry is logged and skipped, the rest are still submitted.
///
/// A [`ForEach`](crate::foreach::ForEach) leaf becomes a generated segment
/// holding one nested group per item. The segment follows the array:
/// deleted items have their rules cleared, inserted items are realized
/// (appended to the end of the store), and modified items are cleared and
/// replaced by a freshly realized group.
///
/// # Example
///
/// ```
/// use tessera_style::prelude::*;
///
/// let group = RulesGroup::from_tree(rules![
///     Rule::new(".a").property(&keys::COLOR, Color::RED),
///     "@import url(x.css);",
/// ]);
///
/// assert_eq!(group.render(), ".a{color:red}@import url(x.css);");
/// assert_eq!(group.rules().len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct RulesGroup {
    entries: Vec<Entry>,
}

impl RulesGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten a tree into a new group.
    pub fn from_tree(tree: impl Into<RulesItem>) -> Self {
        let mut group = Self::new();
        group.add(tree);
        group
    }

    /// Flatten a tree and append its leaves.
    pub fn add(&mut self, tree: impl Into<RulesItem>) {
        for leaf in tree.into().into_leaves() {
            let entry = match leaf {
                RuleLeaf::Raw(css) => Entry::Raw(css),
                RuleLeaf::Rule(rule) => Entry::Rule(rule),
                RuleLeaf::Keyframes(block) => Entry::Keyframes(block),
                RuleLeaf::Media(block) => Entry::Media(block),
                RuleLeaf::ForEach(generator) => Entry::Generated(Segment::new(generator)),
            };
            self.entries.push(entry);
        }
    }

    /// Move every entry of `other` to the end of this group.
    pub fn append(&mut self, other: RulesGroup) {
        self.entries.extend(other.entries);
    }

    /// Submit every entry to `store` in document order.
    ///
    /// Returns the number of store rules inserted.
    pub fn realize(&self, store: &Arc<dyn RuleStore>) -> usize {
        let mut inserted = 0;
        for entry in &self.entries {
            let result = match entry {
                Entry::Rule(rule) => rule.realize(store.as_ref()).map(|()| 1),
                Entry::Keyframes(block) => block.realize(store.as_ref()).map(|()| 1),
                Entry::Media(block) => block.realize(store.as_ref()).map(|()| 1),
                Entry::Raw(css) => match store.insert_rule(css) {
                    Some(_) => Ok(1),
                    None => Err(crate::Error::insert_rejected(css.as_str())),
                },
                Entry::Generated(segment) => Ok(segment.realize(store)),
            };
            match result {
                Ok(count) => inserted += count,
                Err(err) => {
                    tracing::warn!(target: targets::SHEET, error = %err, "entity not realized");
                }
            }
        }
        inserted
    }

    /// Render every entry, concatenated in document order.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|entry| match entry {
                Entry::Rule(rule) => rule.render(),
                Entry::Keyframes(block) => block.render(),
                Entry::Media(block) => block.render(),
                Entry::Raw(css) => css.clone(),
                Entry::Generated(segment) => segment.render(),
            })
            .collect()
    }

    /// Clear every rule's declarations and drop every listener.
    ///
    /// Rules already in a store stay there, emptied. Raw text cannot be
    /// cleared and stays as inserted.
    pub fn clear(&self) {
        for entry in &self.entries {
            match entry {
                Entry::Rule(rule) => {
                    rule.clear();
                    rule.detach();
                }
                Entry::Keyframes(block) => {
                    block.clear();
                    block.detach();
                }
                Entry::Media(block) => {
                    block.clear();
                    block.detach();
                }
                Entry::Raw(_) => {}
                Entry::Generated(segment) => segment.clear(),
            }
        }
    }

    /// Every rule, including those of generated segments, in document order.
    pub fn rules(&self) -> Vec<Rule> {
        let mut rules = Vec::new();
        for entry in &self.entries {
            match entry {
                Entry::Rule(rule) => rules.push(rule.clone()),
                Entry::Generated(segment) => {
                    for group in segment.groups() {
                        rules.extend(group.rules());
                    }
                }
                _ => {}
            }
        }
        rules
    }

    /// Every keyframes block, in document order.
    pub fn keyframes(&self) -> Vec<Keyframes> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                Entry::Keyframes(block) => Some(block.clone()),
                _ => None,
            })
            .collect()
    }

    /// Every media block, in document order.
    pub fn media(&self) -> Vec<Media> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                Entry::Media(block) => Some(block.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the group has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for RulesGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RulesGroup")
            .field("entries", &self.entries.len())
            .field("css", &self.render())
            .finish()
    }
}

struct SegmentState {
    generator: Arc<dyn RuleGenerator>,
    groups: Vec<RulesGroup>,
    store: Option<Arc<dyn RuleStore>>,
    guards: Vec<ConnectionGuard>,
}

/// The expansion of one generator, kept in step with its array.
#[derive(Clone)]
struct Segment {
    shared: Arc<Mutex<SegmentState>>,
}

impl Segment {
    fn new(generator: Arc<dyn RuleGenerator>) -> Self {
        let groups = (0..generator.count())
            .map(|index| RulesGroup::from_tree(generator.item_at(index)))
            .collect();
        let segment = Self {
            shared: Arc::new(Mutex::new(SegmentState {
                generator: Arc::clone(&generator),
                groups,
                store: None,
                guards: Vec::new(),
            })),
        };

        let weak: Weak<Mutex<SegmentState>> = Arc::downgrade(&segment.shared);
        let guards = generator.subscribe_to_changes(
            Arc::new(|| tracing::trace!(target: targets::FOREACH, "segment update begins")),
            Arc::new(move |delta: &Delta| {
                if let Some(shared) = weak.upgrade() {
                    Segment { shared }.apply_delta(delta);
                }
            }),
            Arc::new(|| tracing::trace!(target: targets::FOREACH, "segment update ends")),
        );
        segment.shared.lock().guards = guards;
        segment
    }

    fn groups(&self) -> Vec<RulesGroup> {
        self.shared.lock().groups.clone()
    }

    fn realize(&self, store: &Arc<dyn RuleStore>) -> usize {
        let groups = {
            let mut state = self.shared.lock();
            state.store = Some(Arc::clone(store));
            state.groups.clone()
        };
        groups.iter().map(|group| group.realize(store)).sum()
    }

    fn render(&self) -> String {
        self.groups().iter().map(RulesGroup::render).collect()
    }

    fn clear(&self) {
        let (groups, guards) = {
            let mut state = self.shared.lock();
            state.store = None;
            (
                std::mem::take(&mut state.groups),
                std::mem::take(&mut state.guards),
            )
        };
        drop(guards);
        for group in &groups {
            group.clear();
        }
    }

    /// Build the group for one item, realizing it when the segment is live.
    fn build(&self, index: usize) -> RulesGroup {
        let (generator, store) = {
            let state = self.shared.lock();
            (Arc::clone(&state.generator), state.store.clone())
        };
        let group = RulesGroup::from_tree(generator.item_at(index));
        if let Some(store) = store {
            group.realize(&store);
        }
        group
    }

    fn apply_delta(&self, delta: &Delta) {
        tracing::debug!(
            target: targets::FOREACH,
            deletions = ?delta.deletions,
            insertions = ?delta.insertions,
            modifications = ?delta.modifications,
            "applying delta to generated rules"
        );

        for &index in delta.deletions.iter().rev() {
            let removed = {
                let mut state = self.shared.lock();
                (index < state.groups.len()).then(|| state.groups.remove(index))
            };
            if let Some(group) = removed {
                group.clear();
            }
        }

        for &index in &delta.insertions {
            let group = self.build(index);
            let mut state = self.shared.lock();
            let at = index.min(state.groups.len());
            state.groups.insert(at, group);
        }

        for &index in &delta.modifications {
            let group = self.build(index);
            let replaced = {
                let mut state = self.shared.lock();
                state
                    .groups
                    .get_mut(index)
                    .map(|slot| std::mem::replace(slot, group))
            };
            if let Some(old) = replaced {
                old.clear();
            }
        }
    }
}
