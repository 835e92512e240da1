//! Loaders that turn on-disk definitions into runtime structures.

pub mod schema;
