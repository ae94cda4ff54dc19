//! Rules generated from a reactive array.
//!
//! A [`ForEach`] maps every item of a `State<Vec<T>>` through a factory into
//! a rules tree. It is not a container itself: containers expand it on demand
//! and follow its changes through [`ForEach::subscribe_to_changes`], which
//! reports each array mutation as a [`Delta`] between the previous and the
//! new snapshot.
//!
//! # Example
//!
//! ```
//! use tessera_style::prelude::*;
//!
//! let widths = State::new(vec![10u32, 20]);
//! let columns = ForEach::new(widths.clone(), |index, width| {
//!     Rule::new(Pointer::class(format!("col-{index}")))
//!         .property(&keys::WIDTH, Length::px(*width as f32))
//!         .into()
//! });
//!
//! assert_eq!(columns.count(), 2);
//! widths.update(|w| w.push(30));
//! assert_eq!(columns.all_items().flatten().len(), 3);
//! ```

mod delta;

use std::fmt;
use std::sync::Arc;

use tessera_core::logging::{span_names, targets};
use tessera_core::{ConnectionGuard, PerfSpan, State};

use crate::tree::{Node, RulesItem};

pub use delta::{diff, Delta};

/// Callback for the begin and end phases of a mutation.
pub type PhaseCallback = Arc<dyn Fn() + Send + Sync>;

/// Callback receiving the changes of one mutation.
pub type DeltaCallback = Arc<dyn Fn(&Delta) + Send + Sync>;

type Factory<T> = Arc<dyn Fn(usize, &T) -> RulesItem + Send + Sync>;

/// Type-erased access to a [`ForEach`], as stored in a rules tree.
pub trait RuleGenerator: Send + Sync {
    /// Current number of items.
    fn count(&self) -> usize;

    /// Expand every item, in index order.
    fn all_items(&self) -> RulesItem;

    /// Expand one item; out of range yields [`Node::None`].
    fn item_at(&self, index: usize) -> RulesItem;

    /// Follow array mutations. Dropping the guards stops the callbacks.
    fn subscribe_to_changes(
        &self,
        on_begin: PhaseCallback,
        on_delta: DeltaCallback,
        on_end: PhaseCallback,
    ) -> Vec<ConnectionGuard>;
}

/// A generator of one rules tree per array item.
pub struct ForEach<T> {
    items: State<Vec<T>>,
    factory: Factory<T>,
}

impl<T> Clone for ForEach<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<T> ForEach<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Generate rules from reactive items.
    pub fn new<F>(items: State<Vec<T>>, factory: F) -> Self
    where
        F: Fn(usize, &T) -> RulesItem + Send + Sync + 'static,
    {
        Self {
            items,
            factory: Arc::new(factory),
        }
    }

    /// Generate rules from a fixed list.
    pub fn from_vec<F>(items: Vec<T>, factory: F) -> Self
    where
        F: Fn(usize, &T) -> RulesItem + Send + Sync + 'static,
    {
        Self::new(State::new(items), factory)
    }

    /// The backing state.
    pub fn items(&self) -> &State<Vec<T>> {
        &self.items
    }

    /// Current number of items.
    pub fn count(&self) -> usize {
        self.items.with(Vec::len)
    }

    /// Expand every item through the factory, in index order.
    pub fn all_items(&self) -> RulesItem {
        let items = self.items.get();
        Node::Nested(
            items
                .iter()
                .enumerate()
                .map(|(index, item)| (self.factory)(index, item))
                .collect(),
        )
    }

    /// Expand the item at `index`, or [`Node::None`] when out of range.
    pub fn item_at(&self, index: usize) -> RulesItem {
        let item = self.items.with(|items| items.get(index).cloned());
        match item {
            Some(item) => (self.factory)(index, &item),
            None => Node::None,
        }
    }

    /// Follow array mutations.
    ///
    /// For every mutation `on_begin` runs first, then `on_delta` once with
    /// the changes (skipped when nothing changed), then `on_end`.
    pub fn subscribe_to_changes<B, D, E>(&self, on_begin: B, on_delta: D, on_end: E) -> Vec<ConnectionGuard>
    where
        B: Fn() + Send + Sync + 'static,
        D: Fn(&Delta) + Send + Sync + 'static,
        E: Fn() + Send + Sync + 'static,
    {
        vec![
            self.items.on_begin(on_begin),
            self.items.subscribe(move |old, new| {
                let _span = PerfSpan::new(span_names::DIFF);
                let delta = diff(old, new);
                tracing::trace!(
                    target: targets::FOREACH,
                    deletions = delta.deletions.len(),
                    insertions = delta.insertions.len(),
                    modifications = delta.modifications.len(),
                    "array diffed"
                );
                if !delta.is_empty() {
                    on_delta(&delta);
                }
            }),
            self.items.on_end(on_end),
        ]
    }

    /// Erase the item type for storage in a rules tree.
    pub fn into_generator(self) -> Arc<dyn RuleGenerator> {
        Arc::new(self)
    }
}

impl ForEach<usize> {
    /// Generate `count` copies of a rule tree, passing each the copy index.
    ///
    /// # Panics
    ///
    /// Panics if `count` is less than 2; a single copy needs no repetition.
    pub fn repeat<F>(count: usize, factory: F) -> Self
    where
        F: Fn(usize) -> RulesItem + Send + Sync + 'static,
    {
        assert!(count >= 2, "ForEach::repeat needs at least 2 copies, got {count}");
        Self::from_vec((0..count).collect(), move |index, _| factory(index))
    }
}

impl<T> RuleGenerator for ForEach<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn count(&self) -> usize {
        ForEach::count(self)
    }

    fn all_items(&self) -> RulesItem {
        ForEach::all_items(self)
    }

    fn item_at(&self, index: usize) -> RulesItem {
        ForEach::item_at(self, index)
    }

    fn subscribe_to_changes(
        &self,
        on_begin: PhaseCallback,
        on_delta: DeltaCallback,
        on_end: PhaseCallback,
    ) -> Vec<ConnectionGuard> {
        ForEach::subscribe_to_changes(
            self,
            move || on_begin(),
            move |delta| on_delta(delta),
            move || on_end(),
        )
    }
}

impl<T> From<ForEach<T>> for RulesItem
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn from(generator: ForEach<T>) -> Self {
        generator.into_generator().into()
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for ForEach<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForEach").field("items", &self.items).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rule;
    use crate::selector::Pointer;
    use crate::tree::RuleLeaf;
    use parking_lot::Mutex;

    fn class_per_item(items: State<Vec<u32>>) -> ForEach<u32> {
        ForEach::new(items, |index, value| {
            Rule::new(Pointer::class(format!("item-{index}-{value}"))).into()
        })
    }

    fn selectors(tree: RulesItem) -> Vec<String> {
        tree.into_leaves()
            .into_iter()
            .filter_map(|leaf| match leaf {
                RuleLeaf::Rule(rule) => Some(rule.selector_text()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn all_items_uses_current_indices() {
        let items = State::new(vec![5, 6]);
        let generator = class_per_item(items.clone());
        assert_eq!(selectors(generator.all_items()), [".item-0-5", ".item-1-6"]);

        items.set(vec![6]);
        assert_eq!(selectors(generator.all_items()), [".item-0-6"]);
    }

    #[test]
    fn item_at_out_of_range_is_none() {
        let generator = class_per_item(State::new(vec![1, 2, 3]));
        assert!(matches!(generator.item_at(5), Node::None));
        assert_eq!(selectors(generator.item_at(2)), [".item-2-3"]);
    }

    #[test]
    fn phases_fire_in_order() {
        let items = State::new(vec![1, 2, 3]);
        let generator = class_per_item(items.clone());
        let log = Arc::new(Mutex::new(Vec::new()));

        let (begin, delta, end) = (log.clone(), log.clone(), log.clone());
        let _guards = generator.subscribe_to_changes(
            move || begin.lock().push("begin".to_string()),
            move |d| delta.lock().push(format!("{:?}/{:?}/{:?}", d.deletions, d.insertions, d.modifications)),
            move || end.lock().push("end".to_string()),
        );

        items.set(vec![1, 3, 4]);
        assert_eq!(*log.lock(), ["begin", "[1]/[2]/[]", "end"]);
    }

    #[test]
    fn unchanged_mutation_skips_delta() {
        let items = State::new(vec![1, 2]);
        let generator = class_per_item(items.clone());
        let deltas = Arc::new(Mutex::new(0));
        let ends = Arc::new(Mutex::new(0));

        let (d, e) = (deltas.clone(), ends.clone());
        let _guards = generator.subscribe_to_changes(|| {}, move |_| *d.lock() += 1, move || *e.lock() += 1);

        items.set(vec![1, 2]);
        assert_eq!(*deltas.lock(), 0);
        assert_eq!(*ends.lock(), 1);
    }

    #[test]
    fn dropping_guards_unsubscribes() {
        let items = State::new(vec![1]);
        let generator = class_per_item(items.clone());
        let guards = generator.subscribe_to_changes(|| {}, |_| {}, || {});
        assert_eq!(items.subscriber_count(), 1);
        drop(guards);
        assert_eq!(items.subscriber_count(), 0);
    }

    #[test]
    fn repeat_passes_copy_index() {
        let repeated = ForEach::repeat(3, |index| Rule::new(Pointer::class(format!("r{index}"))).into());
        assert_eq!(repeated.count(), 3);
        assert_eq!(selectors(repeated.all_items()), [".r0", ".r1", ".r2"]);
    }

    #[test]
    fn debug_lists_items() {
        let generator = class_per_item(State::new(vec![4, 5]));
        let debug = format!("{generator:?}");
        assert!(debug.starts_with("ForEach"), "unexpected debug output: {debug}");
        assert!(debug.contains("[4, 5]"), "unexpected debug output: {debug}");
    }

    #[test]
    #[should_panic(expected = "at least 2")]
    fn repeat_rejects_single_copy() {
        let _ = ForEach::repeat(1, |_| Node::None);
    }
}
