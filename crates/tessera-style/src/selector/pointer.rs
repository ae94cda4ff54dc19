//! Precomputed selector fragments.

use std::fmt;

/// A precomputed CSS selector such as `.card`, `#main` or `button:hover`.
///
/// Pointers are plain text; nothing here validates or parses selectors.
/// Several pointers on one rule form a group selector (`.a,.b`).
///
/// # Example
///
/// ```
/// use tessera_style::prelude::*;
///
/// let link = Pointer::tag("a").hover();
/// assert_eq!(link.selector(), "a:hover");
///
/// let nested = Pointer::class("card").child(Pointer::tag("p"));
/// assert_eq!(nested.selector(), ".card>p");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pointer {
    selector: String,
}

impl Pointer {
    /// A selector used verbatim.
    pub fn raw(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }

    /// A class selector (`.name`).
    pub fn class(name: impl AsRef<str>) -> Self {
        Self::raw(format!(".{}", name.as_ref()))
    }

    /// An ID selector (`#name`).
    pub fn id(name: impl AsRef<str>) -> Self {
        Self::raw(format!("#{}", name.as_ref()))
    }

    /// A type selector (`div`).
    pub fn tag(name: impl Into<String>) -> Self {
        Self::raw(name)
    }

    /// The universal selector (`*`).
    pub fn universal() -> Self {
        Self::raw("*")
    }

    /// Append a pseudo-class (`:name`).
    pub fn pseudo(mut self, name: &str) -> Self {
        self.selector.push(':');
        self.selector.push_str(name);
        self
    }

    /// Append `:hover`.
    pub fn hover(self) -> Self {
        self.pseudo("hover")
    }

    /// Append `:focus`.
    pub fn focus(self) -> Self {
        self.pseudo("focus")
    }

    /// Combine with a descendant selector (`a b`).
    pub fn descendant(mut self, other: Pointer) -> Self {
        self.selector.push(' ');
        self.selector.push_str(&other.selector);
        self
    }

    /// Combine with a child selector (`a>b`).
    pub fn child(mut self, other: Pointer) -> Self {
        self.selector.push('>');
        self.selector.push_str(&other.selector);
        self
    }

    /// The selector text.
    pub fn selector(&self) -> &str {
        &self.selector
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.selector)
    }
}

impl From<&str> for Pointer {
    fn from(selector: &str) -> Self {
        Self::raw(selector)
    }
}

impl From<String> for Pointer {
    fn from(selector: String) -> Self {
        Self::raw(selector)
    }
}

/// Join pointers into group-selector text.
pub fn join(pointers: &[Pointer]) -> String {
    pointers
        .iter()
        .map(Pointer::selector)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_format_selectors() {
        assert_eq!(Pointer::class("btn").selector(), ".btn");
        assert_eq!(Pointer::id("main").selector(), "#main");
        assert_eq!(Pointer::universal().selector(), "*");
        assert_eq!(Pointer::id("x").focus().to_string(), "#x:focus");
        assert_eq!(
            Pointer::tag("ul").descendant(Pointer::tag("li")).selector(),
            "ul li"
        );
    }

    #[test]
    fn join_uses_commas_without_spaces() {
        let pointers = [Pointer::class("a"), Pointer::class("b")];
        assert_eq!(join(&pointers), ".a,.b");
        assert_eq!(join(&[]), "");
    }
}
