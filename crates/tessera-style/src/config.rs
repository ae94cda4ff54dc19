//! Render mode and stylesheet configuration.

/// Where rule mutations are sent.
///
/// The mode is passed explicitly to every container; nothing reads it from
/// global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderMode {
    /// Rules are inserted into a live rule store and mutated through handles.
    #[default]
    Live,
    /// Rules stay in memory and are rendered to CSS text on demand.
    StaticPreview,
    /// Nothing is rendered; applying a container does nothing.
    None,
}

impl RenderMode {
    /// Whether mutations reach an external rule store.
    pub fn is_live(&self) -> bool {
        matches!(self, RenderMode::Live)
    }
}

/// Configuration for a [`crate::rules::StyleSheet`].
///
/// # Example
///
/// ```
/// use tessera_style::config::{RenderMode, SheetConfig};
///
/// let config = SheetConfig::default()
///     .with_mode(RenderMode::StaticPreview)
///     .with_disabled(true);
///
/// assert_eq!(config.mode, RenderMode::StaticPreview);
/// assert!(config.disabled);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetConfig {
    /// Where mutations go.
    pub mode: RenderMode,
    /// Initial value of the stylesheet's disabled flag.
    pub disabled: bool,
}

impl SheetConfig {
    /// Configuration for a live, enabled stylesheet.
    pub fn live() -> Self {
        Self::default()
    }

    /// Configuration for static preview rendering.
    pub fn preview() -> Self {
        Self::default().with_mode(RenderMode::StaticPreview)
    }

    /// Set the render mode.
    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the initial disabled flag.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_live_and_enabled() {
        let config = SheetConfig::default();
        assert_eq!(config.mode, RenderMode::Live);
        assert!(!config.disabled);
        assert!(config.mode.is_live());
    }

    #[test]
    fn preview_is_not_live() {
        assert!(!SheetConfig::preview().mode.is_live());
        assert!(!RenderMode::None.is_live());
    }
}
