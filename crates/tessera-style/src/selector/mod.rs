//! Selector fragments for rules.

mod pointer;

pub use pointer::{join, Pointer};
