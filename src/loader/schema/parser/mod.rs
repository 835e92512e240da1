//! Tree walker that turns schema XML into [`SchemaDocument`](crate::soc::regdb::SchemaDocument)s.

mod context;
mod elements;
mod literals;

pub(crate) use context::ParserContext;
