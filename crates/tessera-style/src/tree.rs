//! Declarative trees of properties and rules.
//!
//! Builders produce a [`Node`] tree without touching any store or state.
//! Containers later flatten the tree into an ordered list of leaves:
//! a depth-first, left-to-right walk in which [`Node::None`] contributes
//! nothing. Flattening is associative, so conditionally built pieces compose
//! uniformly:
//!
//! ```
//! use tessera_style::tree::{either, optional, sequence, Node};
//!
//! let compact = true;
//! let tree: Node<&str> = sequence([
//!     Node::leaf("a"),
//!     optional(None::<Node<&str>>),
//!     either(compact, Node::leaf("b"), Node::leaf("c")),
//!     sequence([Node::leaf("d"), Node::None]),
//! ]);
//!
//! assert_eq!(tree.flatten(), vec!["a", "b", "d"]);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::foreach::RuleGenerator;
use crate::property::Property;
use crate::rules::{Keyframes, Media, Rule};

/// A node of a declarative tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<L> {
    /// Contributes nothing.
    None,
    /// A single leaf.
    Leaf(L),
    /// Children flattened in order.
    Nested(Vec<Node<L>>),
}

impl<L> Default for Node<L> {
    fn default() -> Self {
        Node::None
    }
}

impl<L> Node<L> {
    /// Wrap a single leaf.
    pub fn leaf(leaf: impl Into<L>) -> Self {
        Node::Leaf(leaf.into())
    }

    /// Check if this node contributes nothing at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Node::None => true,
            Node::Leaf(_) => false,
            Node::Nested(children) => children.iter().all(Node::is_empty),
        }
    }

    /// Visit every leaf depth-first, left to right.
    pub fn for_each_leaf<F>(&self, mut visit: F)
    where
        F: FnMut(&L),
    {
        self.visit(&mut visit);
    }

    fn visit<F>(&self, visit: &mut F)
    where
        F: FnMut(&L),
    {
        match self {
            Node::None => {}
            Node::Leaf(leaf) => visit(leaf),
            Node::Nested(children) => {
                for child in children {
                    child.visit(visit);
                }
            }
        }
    }

    /// Consume the tree, returning its leaves in order.
    pub fn into_leaves(self) -> Vec<L> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    fn collect_into(self, out: &mut Vec<L>) {
        match self {
            Node::None => {}
            Node::Leaf(leaf) => out.push(leaf),
            Node::Nested(children) => {
                for child in children {
                    child.collect_into(out);
                }
            }
        }
    }
}

impl<L: Clone> Node<L> {
    /// The leaves in order.
    pub fn flatten(&self) -> Vec<L> {
        let mut out = Vec::new();
        self.for_each_leaf(|leaf| out.push(leaf.clone()));
        out
    }
}

/// The empty block.
pub fn empty<L>() -> Node<L> {
    Node::None
}

/// A sequence of children, order preserved.
pub fn sequence<L, I>(children: I) -> Node<L>
where
    I: IntoIterator,
    I::Item: Into<Node<L>>,
{
    Node::Nested(children.into_iter().map(Into::into).collect())
}

/// An `if` without `else`: the child when present, otherwise nothing.
pub fn optional<L>(child: Option<impl Into<Node<L>>>) -> Node<L> {
    match child {
        Some(child) => Node::Nested(vec![child.into()]),
        None => Node::None,
    }
}

/// An `if`/`else`: the taken branch, wrapped as a single-element list.
pub fn either<L>(condition: bool, then: impl Into<Node<L>>, otherwise: impl Into<Node<L>>) -> Node<L> {
    let taken = if condition {
        then.into()
    } else {
        otherwise.into()
    };
    Node::Nested(vec![taken])
}

/// A tree of property declarations.
pub type PropertiesItem = Node<Property>;

impl From<Property> for PropertiesItem {
    fn from(property: Property) -> Self {
        Node::Leaf(property)
    }
}

impl From<Vec<Property>> for PropertiesItem {
    fn from(properties: Vec<Property>) -> Self {
        Node::Nested(properties.into_iter().map(Node::Leaf).collect())
    }
}

/// A leaf of a rules tree.
#[derive(Clone)]
pub enum RuleLeaf {
    /// CSS text inserted verbatim.
    Raw(String),
    /// A selector and its declarations.
    Rule(Rule),
    /// An `@keyframes` block.
    Keyframes(Keyframes),
    /// An `@media` block.
    Media(Media),
    /// A generator of repeated rules.
    ForEach(Arc<dyn RuleGenerator>),
}

impl fmt::Debug for RuleLeaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleLeaf::Raw(css) => f.debug_tuple("Raw").field(css).finish(),
            RuleLeaf::Rule(rule) => f.debug_tuple("Rule").field(rule).finish(),
            RuleLeaf::Keyframes(block) => f.debug_tuple("Keyframes").field(block).finish(),
            RuleLeaf::Media(block) => f.debug_tuple("Media").field(block).finish(),
            RuleLeaf::ForEach(generator) => f
                .debug_struct("ForEach")
                .field("count", &generator.count())
                .finish(),
        }
    }
}

/// A tree of rules.
pub type RulesItem = Node<RuleLeaf>;

impl From<Rule> for RulesItem {
    fn from(rule: Rule) -> Self {
        Node::Leaf(RuleLeaf::Rule(rule))
    }
}

impl From<Keyframes> for RulesItem {
    fn from(block: Keyframes) -> Self {
        Node::Leaf(RuleLeaf::Keyframes(block))
    }
}

impl From<Media> for RulesItem {
    fn from(block: Media) -> Self {
        Node::Leaf(RuleLeaf::Media(block))
    }
}

impl From<Arc<dyn RuleGenerator>> for RulesItem {
    fn from(generator: Arc<dyn RuleGenerator>) -> Self {
        Node::Leaf(RuleLeaf::ForEach(generator))
    }
}

impl From<&str> for RulesItem {
    fn from(css: &str) -> Self {
        Node::Leaf(RuleLeaf::Raw(css.to_string()))
    }
}

impl From<String> for RulesItem {
    fn from(css: String) -> Self {
        Node::Leaf(RuleLeaf::Raw(css))
    }
}

impl From<Vec<Rule>> for RulesItem {
    fn from(rules: Vec<Rule>) -> Self {
        Node::Nested(rules.into_iter().map(RulesItem::from).collect())
    }
}

/// Build a [`PropertiesItem`] sequence from a list of convertible items.
///
/// ```
/// use tessera_style::prelude::*;
///
/// let dense = false;
/// let tree = properties![
///     keys::COLOR.value(Color::RED),
///     optional(dense.then(|| keys::PADDING.value(Edges::uniform(Length::Zero)))),
/// ];
/// assert_eq!(tree.flatten().len(), 1);
/// ```
#[macro_export]
macro_rules! properties {
    ($($item:expr),* $(,)?) => {
        $crate::tree::Node::Nested(vec![
            $(<$crate::tree::PropertiesItem as ::std::convert::From<_>>::from($item)),*
        ])
    };
}

/// Build a [`RulesItem`] sequence from a list of convertible items.
///
/// ```
/// use tessera_style::prelude::*;
///
/// let tree = rules![
///     Rule::new(Pointer::class("a")).property(&keys::COLOR, Color::RED),
///     "@import url(base.css);",
/// ];
/// assert_eq!(tree.flatten().len(), 2);
/// ```
#[macro_export]
macro_rules! rules {
    ($($item:expr),* $(,)?) => {
        $crate::tree::Node::Nested(vec![
            $(<$crate::tree::RulesItem as ::std::convert::From<_>>::from($item)),*
        ])
    };
}
