//! Logging facilities for Tessera.
//!
//! Tessera uses the `tracing` crate for instrumentation. To see logs, install
//! a tracing subscriber in your application:
//!
//! ```ignore
//! use tracing_subscriber;
//!
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! Every event is emitted under one of the [`targets`], so output can be
//! filtered per subsystem, e.g. `RUST_LOG=tessera_style::sheet=debug`.

/// Span names used throughout Tessera for tracing.
pub mod span_names {
    /// Stylesheet application span.
    pub const APPLY: &str = "tessera::apply";
    /// Repeated-rule diff span.
    pub const DIFF: &str = "tessera::diff";
}

/// Target names for log filtering.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "tessera_core::signal";
    /// Observable state target.
    pub const STATE: &str = "tessera_core::state";
    /// Rule entity target.
    pub const RULE: &str = "tessera_style::rule";
    /// Stylesheet and rule group target.
    pub const SHEET: &str = "tessera_style::sheet";
    /// Repeated-rule generation and diffing target.
    pub const FOREACH: &str = "tessera_style::foreach";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: "tessera::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_are_namespaced() {
        for target in [
            targets::SIGNAL,
            targets::STATE,
            targets::RULE,
            targets::SHEET,
            targets::FOREACH,
        ] {
            assert!(target.starts_with("tessera_"));
        }
    }

    #[test]
    fn test_perf_span() {
        let _span = PerfSpan::new(span_names::APPLY);
    }
}
