//! Register-schema loader and command-stream decoder for RKNPU-style accelerators.
//!
//! A [`soc::regdb::RegisterDatabase`] is built from XML register schemas by
//! [`loader::schema::SchemaLoader`]. The [`soc::decode`] engine turns raw register values and
//! 64-bit command words into `EMIT(...)` statements, and [`soc::record`] persists and replays
//! decoded commands.

pub mod config;
pub mod loader;
pub mod soc;
