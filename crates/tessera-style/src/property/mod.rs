//! Typed property keys and CSS declarations.

mod declaration;
mod key;
pub mod keys;

pub use declaration::{DeclarationCallback, Property, ValueSource};
pub use key::PropertyKey;
