//! Immutable register database built once from the parsed schema documents. It owns the
//! [`RegisterDatabase`] structure plus the entity types the decode engine reads.

pub mod ast;
pub mod bitset;
pub mod domain;
pub mod error;
pub mod register;

pub use ast::{SchemaDocument, SchemaItem};
pub use bitset::{BitsetHandle, BitsetTemplate, Field, FieldType, default_field_name};
pub use domain::{Domain, EnumDef, PrefixMode};
pub use error::{SchemaError, SourceLocation};
pub use register::{RegWidth, Register};

use std::sync::Arc;

use ahash::AHashMap;
use tracing::debug;

/// Name of the enum mapping domain names to command destination values.
pub const TARGET_ENUM: &str = "target";

#[derive(Debug, Default)]
pub struct RegisterDatabase {
    domains: Vec<Domain>,
    enums: AHashMap<String, EnumDef>,
    bitsets: AHashMap<String, Arc<BitsetTemplate>>,
    registers: AHashMap<u32, Register>,
    array_registers: Vec<Register>,
}

impl RegisterDatabase {
    pub fn from_documents(docs: Vec<SchemaDocument>) -> Self {
        let mut db = RegisterDatabase::default();
        for doc in docs {
            for item in doc.items {
                match item {
                    SchemaItem::Domain(domain) => db.domains.push(domain),
                    SchemaItem::Enum(def) => {
                        db.enums.insert(def.name.clone(), def);
                    }
                    SchemaItem::Bitset(template) => {
                        db.bitsets.insert(template.name.clone(), template);
                    }
                    SchemaItem::Register(reg) => db.insert_register(reg),
                }
            }
        }
        db
    }

    fn insert_register(&mut self, reg: Register) {
        if reg.is_array_member() {
            self.array_registers.push(reg);
            return;
        }
        if let Some(previous) = self.registers.insert(reg.offset, reg) {
            debug!(
                offset = previous.offset,
                replaced = %previous.full_name,
                "register offset redefined, keeping the later definition"
            );
        }
    }

    pub fn register(&self, offset: u32) -> Option<&Register> {
        self.registers.get(&offset)
    }

    pub fn registers(&self) -> impl Iterator<Item = &Register> {
        self.registers.values()
    }

    pub fn register_count(&self) -> usize {
        self.registers.len()
    }

    pub fn register_by_name(&self, full_name: &str) -> Option<&Register> {
        self.registers
            .values()
            .find(|reg| reg.full_name.eq_ignore_ascii_case(full_name))
    }

    pub fn array_registers(&self) -> &[Register] {
        &self.array_registers
    }

    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    pub fn enumeration(&self, name: &str) -> Option<&EnumDef> {
        self.enums.get(name)
    }

    pub fn bitset(&self, name: &str) -> Option<&Arc<BitsetTemplate>> {
        self.bitsets.get(name)
    }

    /// Destination value of a domain as listed in the `target` enum.
    pub fn target_value(&self, domain: &str) -> Option<i64> {
        self.enums.get(TARGET_ENUM)?.value_of(domain)
    }
}
