//! CSS declarations and the sources that feed them.

use std::fmt;
use std::sync::Arc;

use tessera_core::{ConnectionGuard, State};

use super::PropertyKey;
use crate::types::{Color, CssValue, ReactiveColor};

/// Callback receiving a declaration's new text; `None` removes the declaration.
pub type DeclarationCallback = Arc<dyn Fn(Option<String>) + Send + Sync>;

/// Where a property's value comes from.
///
/// A source reports its current text and, when it can change, notifies a
/// callback with every new text. Sources are shared between a property and
/// its aliases, so one upstream change updates every alias.
pub trait ValueSource: Send + Sync {
    /// The current value text, or `None` when the declaration should be absent.
    fn current(&self) -> Option<String>;

    /// Register `on_change`. Dropping the guards unregisters it.
    fn watch(&self, on_change: DeclarationCallback) -> Vec<ConnectionGuard>;
}

/// A fixed value. Only changes if the value has an internal reactive hook.
struct FixedSource<V>(Arc<V>);

impl<V: CssValue> ValueSource for FixedSource<V> {
    fn current(&self) -> Option<String> {
        Some(self.0.description())
    }

    fn watch(&self, on_change: DeclarationCallback) -> Vec<ConnectionGuard> {
        let value = Arc::clone(&self.0);
        self.0
            .observe(Arc::new(move || on_change(Some(value.description()))))
    }
}

/// A value held in reactive state.
struct StateSource<V>(State<V>);

impl<V: CssValue + Clone> ValueSource for StateSource<V> {
    fn current(&self) -> Option<String> {
        Some(self.0.with(|value| value.description()))
    }

    fn watch(&self, on_change: DeclarationCallback) -> Vec<ConnectionGuard> {
        vec![self
            .0
            .subscribe(move |_, new| on_change(Some(new.description())))]
    }
}

/// An optional value held in reactive state; `None` removes the declaration.
struct OptionalStateSource<V>(State<Option<V>>);

impl<V: CssValue + Clone> ValueSource for OptionalStateSource<V> {
    fn current(&self) -> Option<String> {
        self.0.with(|value| value.as_ref().map(CssValue::description))
    }

    fn watch(&self, on_change: DeclarationCallback) -> Vec<ConnectionGuard> {
        vec![self
            .0
            .subscribe(move |_, new| on_change(new.as_ref().map(CssValue::description)))]
    }
}

/// One CSS declaration (`name: value`), plus optional aliases.
///
/// Aliases are extra declarations that share this property's value source,
/// typically vendor-prefixed fallbacks. Installing a property installs itself
/// and every alias as independent declarations.
///
/// # Example
///
/// ```
/// use tessera_style::prelude::*;
///
/// let property = Property::new(&keys::COLOR, Color::RED);
/// assert_eq!(property.render(), "color: red;");
///
/// let select = Property::new(&keys::USER_SELECT, UserSelect::None)
///     .with_alias("-webkit-user-select");
/// let names: Vec<_> = select.declarations().map(|p| p.name().to_string()).collect();
/// assert_eq!(names, ["user-select", "-webkit-user-select"]);
/// ```
#[derive(Clone)]
pub struct Property {
    name: String,
    source: Arc<dyn ValueSource>,
    suffix: String,
    aliases: Vec<Property>,
}

impl Property {
    /// A property with a fixed value.
    pub fn new<V: CssValue>(key: &PropertyKey<V>, value: V) -> Self {
        Self::from_source(key.name(), Arc::new(FixedSource(Arc::new(value))))
    }

    /// A property that follows reactive state.
    pub fn bind<V: CssValue + Clone>(key: &PropertyKey<V>, state: State<V>) -> Self {
        Self::from_source(key.name(), Arc::new(StateSource(state)))
    }

    /// A property that follows optional reactive state. While the state holds
    /// `None` the declaration is absent.
    pub fn bind_optional<V: CssValue + Clone>(
        key: &PropertyKey<V>,
        state: State<Option<V>>,
    ) -> Self {
        Self::from_source(key.name(), Arc::new(OptionalStateSource(state)))
    }

    /// An untyped property with fixed text.
    pub fn raw(name: impl Into<String>, value: impl Into<String>) -> Self {
        let value: String = value.into();
        Self::from_source(name, Arc::new(FixedSource(Arc::new(value))))
    }

    /// A property fed by a custom source.
    pub fn from_source(name: impl Into<String>, source: Arc<dyn ValueSource>) -> Self {
        Self {
            name: name.into(),
            source,
            suffix: String::new(),
            aliases: Vec::new(),
        }
    }

    /// Append `!important` to the value of this property and its aliases.
    ///
    /// The suffix is appended on every call; calling this twice yields
    /// `!important!important`.
    pub fn important(mut self) -> Self {
        self.suffix.push_str("!important");
        for alias in &mut self.aliases {
            alias.suffix.push_str("!important");
        }
        self
    }

    /// Add an alias declaration that shares this property's value.
    pub fn with_alias(mut self, name: impl Into<String>) -> Self {
        let alias = Self {
            name: name.into(),
            source: Arc::clone(&self.source),
            suffix: self.suffix.clone(),
            aliases: Vec::new(),
        };
        self.aliases.push(alias);
        self
    }

    /// The CSS property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared aliases.
    pub fn aliases(&self) -> &[Property] {
        &self.aliases
    }

    /// This property followed by its aliases.
    pub fn declarations(&self) -> impl Iterator<Item = &Property> {
        std::iter::once(self).chain(self.aliases.iter())
    }

    /// The current value text including any suffix, or `None` when absent.
    pub fn value(&self) -> Option<String> {
        self.source.current().map(|value| self.decorate(value))
    }

    /// Render this declaration alone as `name: value;`.
    ///
    /// Renders an empty string while the value is absent. Aliases are not
    /// included.
    pub fn render(&self) -> String {
        match self.value() {
            Some(value) => format!("{}: {};", self.name, value),
            None => String::new(),
        }
    }

    /// Register a callback that receives every new value text (with suffix).
    pub(crate) fn watch(&self, on_change: DeclarationCallback) -> Vec<ConnectionGuard> {
        let suffix = self.suffix.clone();
        self.source.watch(Arc::new(move |value: Option<String>| {
            on_change(value.map(|value| value + &suffix));
        }))
    }

    fn decorate(&self, value: String) -> String {
        value + &self.suffix
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("value", &self.value())
            .field("aliases", &self.aliases.len())
            .finish()
    }
}

impl<V: CssValue> PropertyKey<V> {
    /// Shorthand for [`Property::new`].
    pub fn value(&self, value: V) -> Property {
        Property::new(self, value)
    }
}

impl<V: CssValue + Clone> PropertyKey<V> {
    /// Shorthand for [`Property::bind`].
    pub fn bind(&self, state: State<V>) -> Property {
        Property::bind(self, state)
    }
}

impl PropertyKey<Color> {
    /// A color property whose channels follow reactive state.
    ///
    /// Any channel change re-serializes the whole color.
    pub fn reactive(&self, color: ReactiveColor) -> Property {
        Property::from_source(self.name(), Arc::new(FixedSource(Arc::new(color))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::keys;
    use crate::types::{Color, Length};
    use parking_lot::Mutex;

    #[test]
    fn render_fixed() {
        let width = Property::new(&keys::WIDTH, Length::px(20.0));
        assert_eq!(width.render(), "width: 20px;");
        assert_eq!(width.value().as_deref(), Some("20px"));
    }

    #[test]
    fn important_appends_suffix_each_call() {
        let once = keys::COLOR.value(Color::RED).important();
        assert_eq!(once.value().as_deref(), Some("red!important"));

        let twice = once.important();
        assert_eq!(twice.value().as_deref(), Some("red!important!important"));
    }

    #[test]
    fn important_reaches_aliases() {
        let property = Property::raw("user-select", "none")
            .with_alias("-webkit-user-select")
            .important();
        let values: Vec<_> = property.declarations().map(|p| p.value()).collect();
        assert_eq!(
            values,
            vec![Some("none!important".to_string()), Some("none!important".to_string())]
        );
    }

    #[test]
    fn bound_property_reports_state_changes() {
        let color = State::new(Color::RED);
        let property = keys::COLOR.bind(color.clone()).important();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = seen.clone();
        let _guards = property.watch(Arc::new(move |value| seen_clone.lock().push(value)));

        color.set(Color::BLUE);
        assert_eq!(*seen.lock(), vec![Some("blue!important".to_string())]);
        assert_eq!(property.value().as_deref(), Some("blue!important"));
    }

    #[test]
    fn optional_state_none_is_absent() {
        let opacity = State::new(None::<f32>);
        let property = Property::bind_optional(&keys::OPACITY, opacity.clone());
        assert_eq!(property.value(), None);
        assert_eq!(property.render(), "");

        opacity.set(Some(0.5));
        assert_eq!(property.render(), "opacity: 0.5;");
    }

    #[test]
    fn aliases_share_the_source() {
        let state = State::new(Length::px(1.0));
        let property = keys::WIDTH.bind(state.clone()).with_alias("inline-size");
        state.set(Length::px(2.0));
        for declaration in property.declarations() {
            assert_eq!(declaration.value().as_deref(), Some("2px"));
        }
    }
}
