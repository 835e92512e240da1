//! Bitfield and bitset metadata shared by the schema loader and the decode engine.

use std::ops::Deref;
use std::sync::Arc;

use smallvec::SmallVec;

/// Names that cannot be used verbatim as a field identifier.
const RESERVED_FIELD_NAMES: [&str; 3] = ["double", "float", "int"];

/// Decode type attached to a bitfield. Only `Boolean` and `Uint` contribute to symbolic output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldType {
    Boolean,
    Uint,
    /// Any other builtin (`hex`, `fixed`, ...) or an enum name.
    Other(String),
}

impl FieldType {
    pub fn parse(text: &str) -> Self {
        match text {
            "boolean" => FieldType::Boolean,
            "uint" => FieldType::Uint,
            other => FieldType::Other(other.to_string()),
        }
    }
}

/// One contiguous bit range inside a register value. `low` and `high` are inclusive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub low: u32,
    pub high: u32,
    pub shr: u32,
    pub ty: Option<FieldType>,
}

impl Field {
    pub fn new(name: impl Into<String>, low: u32, high: u32, ty: Option<FieldType>) -> Self {
        Self {
            name: name.into(),
            low,
            high,
            shr: 0,
            ty,
        }
    }

    pub fn with_shr(mut self, shr: u32) -> Self {
        self.shr = shr;
        self
    }

    /// Bit count; a field with `low > high` counts as one bit wide.
    pub fn width(&self) -> u32 {
        self.high.saturating_sub(self.low) + 1
    }

    /// Mask covering `width()` bits, right aligned.
    pub fn mask(&self) -> u64 {
        let width = self.width();
        if width >= u64::BITS {
            u64::MAX
        } else {
            (1u64 << width) - 1
        }
    }

    /// Single-bit position, when the field is one bit wide.
    pub fn pos(&self) -> Option<u32> {
        (self.low == self.high).then_some(self.low)
    }
}

/// Name given to a field declared without one, derived from its register's name.
pub fn default_field_name(register_name: &str) -> String {
    let name = register_name.to_lowercase();
    let starts_with_letter = name.chars().next().is_some_and(|c| c.is_alphabetic());
    if RESERVED_FIELD_NAMES.contains(&name.as_str()) || !starts_with_letter {
        format!("_{name}")
    } else {
        name
    }
}

/// Ordered collection of bitfields; order is the decode output order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitsetTemplate {
    pub name: String,
    pub inline: bool,
    pub fields: SmallVec<[Field; 8]>,
}

impl BitsetTemplate {
    pub fn new(name: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.into(),
            inline,
            fields: SmallVec::new(),
        }
    }

    pub fn push_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Bitset attached to a register: either a private copy or a handle onto a named template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BitsetHandle {
    Inline(BitsetTemplate),
    Shared(Arc<BitsetTemplate>),
}

impl BitsetHandle {
    /// Clones inline templates and shares the others.
    pub fn from_template(template: &Arc<BitsetTemplate>) -> Self {
        if template.inline {
            BitsetHandle::Inline(template.as_ref().clone())
        } else {
            BitsetHandle::Shared(Arc::clone(template))
        }
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, BitsetHandle::Shared(_))
    }

    /// Appends a field, detaching from the shared template first so it stays untouched.
    pub fn push_field(&mut self, field: Field) {
        if let BitsetHandle::Shared(shared) = self {
            let mut detached = shared.as_ref().clone();
            detached.inline = true;
            *self = BitsetHandle::Inline(detached);
        }
        if let BitsetHandle::Inline(template) = self {
            template.push_field(field);
        }
    }
}

impl Deref for BitsetHandle {
    type Target = BitsetTemplate;

    fn deref(&self) -> &Self::Target {
        match self {
            BitsetHandle::Inline(template) => template,
            BitsetHandle::Shared(template) => template,
        }
    }
}
