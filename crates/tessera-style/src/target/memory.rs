//! In-memory rule store and element style.
//!
//! These keep the same text shape the engine emits (`sel{k:v;k:v}`) and only
//! split that shape back apart; they do not parse arbitrary CSS. At-rules are
//! kept as opaque text.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{ElementStyle, RuleHandle, RuleStore};

type Declarations = Vec<(String, String)>;

enum RuleBody {
    Style {
        selector: String,
        declarations: Declarations,
    },
    Opaque(String),
}

impl RuleBody {
    fn from_css(css: &str) -> Self {
        if css.starts_with('@') {
            return RuleBody::Opaque(css.to_string());
        }
        let (Some(open), Some(close)) = (css.find('{'), css.rfind('}')) else {
            return RuleBody::Opaque(css.to_string());
        };
        if close < open {
            return RuleBody::Opaque(css.to_string());
        }

        let declarations = css[open + 1..close]
            .split(';')
            .filter_map(|pair| pair.split_once(':'))
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        RuleBody::Style {
            selector: css[..open].to_string(),
            declarations,
        }
    }

    fn css_text(&self) -> String {
        match self {
            RuleBody::Style {
                selector,
                declarations,
            } => format!("{selector}{{{}}}", render_declarations(declarations, ":", ";")),
            RuleBody::Opaque(css) => css.clone(),
        }
    }
}

fn render_declarations(declarations: &Declarations, colon: &str, separator: &str) -> String {
    declarations
        .iter()
        .map(|(name, value)| format!("{name}{colon}{value}"))
        .collect::<Vec<_>>()
        .join(separator)
}

fn upsert(declarations: &mut Declarations, name: &str, value: &str) {
    match declarations.iter_mut().find(|(existing, _)| existing == name) {
        Some((_, existing)) => *existing = value.to_string(),
        None => declarations.push((name.to_string(), value.to_string())),
    }
}

/// One rule inside a [`MemoryStore`].
pub struct MemoryRule {
    body: Mutex<RuleBody>,
}

impl MemoryRule {
    fn new(css: &str) -> Self {
        Self {
            body: Mutex::new(RuleBody::from_css(css)),
        }
    }

    /// The value of one declaration, if present.
    pub fn declaration(&self, name: &str) -> Option<String> {
        match &*self.body.lock() {
            RuleBody::Style { declarations, .. } => declarations
                .iter()
                .find(|(existing, _)| existing == name)
                .map(|(_, value)| value.clone()),
            RuleBody::Opaque(_) => None,
        }
    }

    /// Number of declarations. Opaque at-rules report zero.
    pub fn declaration_count(&self) -> usize {
        match &*self.body.lock() {
            RuleBody::Style { declarations, .. } => declarations.len(),
            RuleBody::Opaque(_) => 0,
        }
    }
}

impl RuleHandle for MemoryRule {
    fn selector_text(&self) -> String {
        match &*self.body.lock() {
            RuleBody::Style { selector, .. } => selector.clone(),
            RuleBody::Opaque(_) => String::new(),
        }
    }

    fn set_selector_text(&self, new_selector: &str) {
        if let RuleBody::Style { selector, .. } = &mut *self.body.lock() {
            *selector = new_selector.to_string();
        }
    }

    fn css_text(&self) -> String {
        self.body.lock().css_text()
    }

    fn set_css_text(&self, css: &str) {
        *self.body.lock() = RuleBody::from_css(css);
    }

    fn set_property(&self, name: &str, value: &str) {
        if let RuleBody::Style { declarations, .. } = &mut *self.body.lock() {
            upsert(declarations, name, value);
        }
    }

    fn remove_property(&self, name: &str) {
        if let RuleBody::Style { declarations, .. } = &mut *self.body.lock() {
            declarations.retain(|(existing, _)| existing != name);
        }
    }
}

impl fmt::Debug for MemoryRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MemoryRule").field(&self.css_text()).finish()
    }
}

type RejectFn = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// An in-memory [`RuleStore`].
///
/// Records every toggle of the disabled flag so the sequence can be
/// inspected.
///
/// # Example
///
/// ```
/// use tessera_style::target::{MemoryStore, RuleStore};
///
/// let store = MemoryStore::new();
/// let index = store.insert_rule(".a{color:red}").unwrap();
/// let rule = store.rule_at(index).unwrap();
/// rule.set_property("width", "1px");
///
/// assert_eq!(store.css_texts(), [".a{color:red;width:1px}"]);
/// ```
#[derive(Default)]
pub struct MemoryStore {
    rules: Mutex<Vec<Arc<MemoryRule>>>,
    disabled: Mutex<Vec<bool>>,
    reject: Option<RejectFn>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects every rule for which `reject` returns `true`.
    pub fn rejecting<F>(reject: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            reject: Some(Box::new(reject)),
            ..Self::default()
        }
    }

    /// Number of inserted rules.
    pub fn len(&self) -> usize {
        self.rules.lock().len()
    }

    /// Check if the store holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.lock().is_empty()
    }

    /// The concrete rule at `index`.
    pub fn rule(&self, index: usize) -> Option<Arc<MemoryRule>> {
        self.rules.lock().get(index).cloned()
    }

    /// CSS text of every rule, in insertion order.
    pub fn css_texts(&self) -> Vec<String> {
        self.rules.lock().iter().map(|rule| rule.css_text()).collect()
    }

    /// Every value the disabled flag was set to, in order.
    pub fn disabled_history(&self) -> Vec<bool> {
        self.disabled.lock().clone()
    }

    /// The latest disabled flag (`false` if never set).
    pub fn is_disabled(&self) -> bool {
        self.disabled.lock().last().copied().unwrap_or(false)
    }

    /// Remove every rule.
    pub fn clear(&self) {
        self.rules.lock().clear();
    }
}

impl RuleStore for MemoryStore {
    fn insert_rule(&self, css: &str) -> Option<usize> {
        if self.reject.as_ref().is_some_and(|reject| reject(css)) {
            return None;
        }
        let mut rules = self.rules.lock();
        rules.push(Arc::new(MemoryRule::new(css)));
        Some(rules.len() - 1)
    }

    fn rule_at(&self, index: usize) -> Option<Arc<dyn RuleHandle>> {
        self.rule(index).map(|rule| rule as Arc<dyn RuleHandle>)
    }

    fn set_disabled(&self, disabled: bool) {
        self.disabled.lock().push(disabled);
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("rules", &self.css_texts())
            .field("disabled", &self.is_disabled())
            .finish()
    }
}

/// An in-memory [`ElementStyle`].
#[derive(Debug, Default)]
pub struct MemoryElement {
    declarations: Mutex<Declarations>,
}

impl MemoryElement {
    /// Create an element with no inline style.
    pub fn new() -> Self {
        Self::default()
    }

    /// The value of one inline declaration.
    pub fn get(&self, name: &str) -> Option<String> {
        self.declarations
            .lock()
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.clone())
    }

    /// Number of inline declarations.
    pub fn len(&self) -> usize {
        self.declarations.lock().len()
    }

    /// Check if the element has no inline declarations.
    pub fn is_empty(&self) -> bool {
        self.declarations.lock().is_empty()
    }

    /// The `style` attribute text (`k:v;k:v`).
    pub fn style_attribute(&self) -> String {
        render_declarations(&self.declarations.lock(), ":", ";")
    }
}

impl ElementStyle for MemoryElement {
    fn set_inline_property(&self, name: &str, value: &str) {
        upsert(&mut self.declarations.lock(), name, value);
    }

    fn remove_inline_property(&self, name: &str) {
        self.declarations
            .lock()
            .retain(|(existing, _)| existing != name);
    }
}
