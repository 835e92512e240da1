//! Symbolic decode of a raw register value against the register's bitset.

use std::fmt;

use crate::soc::regdb::{FieldType, Register};

/// Name of the pseudo-field emitted when a value is not broken into fields.
pub const RAW_VALUE: &str = "RAW_VALUE";

/// Bit tested to decide whether a boolean field is set. The standalone decode path has always
/// probed `low` while both EMIT renderers probe `high`; the two only differ for malformed
/// multi-bit booleans and are kept apart on purpose.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitProbe {
    Low,
    High,
}

/// One present field of a decoded value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldToken {
    /// Value shown verbatim: either zero or a register with a single field.
    Raw(u64),
    Flag { name: String },
    Value { name: String, value: u64 },
}

impl FieldToken {
    pub fn name(&self) -> &str {
        match self {
            FieldToken::Raw(_) => RAW_VALUE,
            FieldToken::Flag { name } | FieldToken::Value { name, .. } => name,
        }
    }

    pub fn value(&self) -> u64 {
        match self {
            FieldToken::Raw(value) | FieldToken::Value { value, .. } => *value,
            FieldToken::Flag { .. } => 1,
        }
    }

    /// Formatted value as shown by the structured decode.
    pub fn formatted(&self) -> String {
        match self {
            FieldToken::Raw(value) => format!("0x{value:08x}"),
            FieldToken::Flag { .. } => "ENABLED".to_string(),
            FieldToken::Value { value, .. } => value.to_string(),
        }
    }
}

/// Expression form used in EMIT lines.
impl fmt::Display for FieldToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldToken::Raw(value) => write!(f, "0x{value:08x}"),
            FieldToken::Flag { name } => f.write_str(name),
            FieldToken::Value { name, value } => write!(f, "{name}({value})"),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct BitfieldDecoder {
    probe: BitProbe,
}

impl BitfieldDecoder {
    pub fn new(probe: BitProbe) -> Self {
        Self { probe }
    }

    /// Decoder used for the structured, single-register decode.
    pub fn standalone() -> Self {
        Self::new(BitProbe::Low)
    }

    /// Decoder used when rendering EMIT lines from dumps and command streams.
    pub fn emit() -> Self {
        Self::new(BitProbe::High)
    }

    pub fn probe(&self) -> BitProbe {
        self.probe
    }

    pub fn decode(&self, register: &Register, raw: u64) -> Vec<FieldToken> {
        let bitset = &register.bitset;
        if raw == 0 || bitset.len() == 1 {
            return vec![FieldToken::Raw(raw)];
        }
        let prefix = register.full_name.to_uppercase();
        bitset
            .fields
            .iter()
            .filter_map(|field| {
                let name = || format!("{prefix}_{}", field.name.to_uppercase());
                match field.ty.as_ref()? {
                    FieldType::Boolean => {
                        let bit = match self.probe {
                            BitProbe::Low => field.low,
                            BitProbe::High => field.high,
                        };
                        let set = bit < u64::BITS && raw & (1u64 << bit) != 0;
                        set.then(|| FieldToken::Flag { name: name() })
                    }
                    FieldType::Uint => {
                        let value = raw.checked_shr(field.low).unwrap_or(0) & field.mask();
                        (value != 0).then(|| FieldToken::Value {
                            name: name(),
                            value,
                        })
                    }
                    FieldType::Other(_) => None,
                }
            })
            .collect()
    }

    /// Joins the present tokens with `" | "`. May be empty for a nonzero value whose fields all
    /// decode to zero.
    pub fn expression(&self, register: &Register, raw: u64) -> String {
        self.decode(register, raw)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// `EMIT(REG_<FULL_NAME>, <expr>);`
    pub fn emit_line(&self, register: &Register, raw: u64) -> String {
        format!("EMIT({}, {});", register.symbol(), self.expression(register, raw))
    }
}
