//! Typed property keys.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// The name of a CSS property, tagged with the type of value it accepts.
///
/// Keys carry no state; two keys are equal when their names are equal.
///
/// # Example
///
/// ```
/// use tessera_style::prelude::*;
///
/// const ACCENT: PropertyKey<Color> = PropertyKey::new("accent-color");
/// assert_eq!(ACCENT.name(), "accent-color");
///
/// let custom: PropertyKey<Length> = PropertyKey::custom(format!("--gap-{}", 2));
/// assert_eq!(custom.name(), "--gap-2");
/// ```
pub struct PropertyKey<V> {
    name: Cow<'static, str>,
    _value: PhantomData<fn() -> V>,
}

impl<V> PropertyKey<V> {
    /// A key known at compile time.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            _value: PhantomData,
        }
    }

    /// A key built at runtime, e.g. a custom property (`--name`).
    pub fn custom(name: impl Into<String>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            _value: PhantomData,
        }
    }

    /// The CSS property name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<V> Clone for PropertyKey<V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            _value: PhantomData,
        }
    }
}

impl<V> PartialEq for PropertyKey<V> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<V> Eq for PropertyKey<V> {}

impl<V> Hash for PropertyKey<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<V> fmt::Debug for PropertyKey<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropertyKey").field(&self.name).finish()
    }
}
