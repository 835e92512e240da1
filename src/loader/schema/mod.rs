//! Register schema loading helpers (XML walker, import resolver).

pub mod loader;
mod parser;

pub use loader::{SchemaLoader, load};
