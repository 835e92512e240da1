//! Items produced by the schema loader, one document per visited XML file.

use std::path::PathBuf;
use std::sync::Arc;

use super::bitset::BitsetTemplate;
use super::domain::{Domain, EnumDef};
use super::register::Register;

#[derive(Clone, Debug)]
pub enum SchemaItem {
    Domain(Domain),
    Enum(EnumDef),
    Bitset(Arc<BitsetTemplate>),
    Register(Register),
}

/// Items of one schema file, in document order.
#[derive(Clone, Debug)]
pub struct SchemaDocument {
    pub path: PathBuf,
    pub items: Vec<SchemaItem>,
}

impl SchemaDocument {
    pub fn new(path: PathBuf, items: Vec<SchemaItem>) -> Self {
        Self { path, items }
    }

    pub fn registers(&self) -> impl Iterator<Item = &Register> {
        self.items.iter().filter_map(|item| match item {
            SchemaItem::Register(reg) => Some(reg),
            _ => None,
        })
    }
}
