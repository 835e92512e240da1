//! Unpacking of 64-bit command words and rendering of one annotated line per word.

use std::fmt;

use tracing::trace;

use crate::config::DecoderConfig;
use crate::soc::record::Record;
use crate::soc::regdb::RegisterDatabase;

use super::bitfield::BitfieldDecoder;

const OP_ENABLE_BIT: u32 = 55;

/// Block a command word is addressed to. Bit 58 is not a destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Destination {
    Pc,
    Cna,
    Core,
    Dpu,
    DpuRdma,
    Ppu,
    PpuRdma,
    Unresolved,
}

impl Destination {
    /// Priority order: the lowest set destination bit wins.
    const BITS: [(u32, Destination); 7] = [
        (56, Destination::Pc),
        (57, Destination::Cna),
        (59, Destination::Core),
        (60, Destination::Dpu),
        (61, Destination::DpuRdma),
        (62, Destination::Ppu),
        (63, Destination::PpuRdma),
    ];

    pub fn from_word(word: u64) -> Self {
        Self::BITS
            .iter()
            .find(|(bit, _)| (word >> bit) & 1 == 1)
            .map(|(_, dest)| *dest)
            .unwrap_or(Destination::Unresolved)
    }

    pub fn name(self) -> &'static str {
        match self {
            Destination::Pc => "PC",
            Destination::Cna => "CNA",
            Destination::Core => "CORE",
            Destination::Dpu => "DPU",
            Destination::DpuRdma => "DPU_RDMA",
            Destination::Ppu => "PPU",
            Destination::PpuRdma => "PPU_RDMA",
            Destination::Unresolved => "noone",
        }
    }

    /// Value stored in the `target` column of persisted records.
    pub fn target(self) -> u16 {
        match self {
            Destination::Pc => 0x100,
            Destination::Cna => 0x200,
            Destination::Core => 0x800,
            Destination::Dpu => 0x1000,
            Destination::DpuRdma => 0x2000,
            Destination::Ppu => 0x4000,
            Destination::PpuRdma => 0x8000,
            Destination::Unresolved => 0,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fields packed into one command word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandWord {
    pub raw: u64,
    pub destination: Destination,
    pub offset: u16,
    pub value: u32,
    pub op_enable: bool,
}

impl CommandWord {
    pub fn decode(word: u64) -> Self {
        Self {
            raw: word,
            destination: Destination::from_word(word),
            offset: (word & 0xffff) as u16,
            value: ((word >> 16) & 0xffff_ffff) as u32,
            op_enable: (word >> OP_ENABLE_BIT) & 1 == 1,
        }
    }

    pub fn to_record(&self) -> Record {
        Record::from_unsigned(self.offset, self.value, self.destination.target())
    }
}

/// Resolves command words against the register database.
pub struct CommandWordDecoder<'db> {
    db: &'db RegisterDatabase,
    bitfields: BitfieldDecoder,
    emit_column: usize,
}

impl<'db> CommandWordDecoder<'db> {
    pub fn new(db: &'db RegisterDatabase, config: &DecoderConfig) -> Self {
        Self {
            db,
            bitfields: BitfieldDecoder::emit(),
            emit_column: config.emit_column,
        }
    }

    pub fn decode(&self, word: u64) -> CommandWord {
        CommandWord::decode(word)
    }

    /// EMIT line for the word, or `None` when its offset names no known register.
    pub fn emit(&self, cmd: &CommandWord) -> Option<String> {
        let reg = self.db.register(u32::from(cmd.offset))?;
        if let Some(expected) = self.db.target_value(&reg.domain) {
            if expected != i64::from(cmd.destination.target() & 0xfffe) {
                trace!(
                    register = %reg.full_name,
                    destination = %cmd.destination,
                    expected,
                    "destination does not match register domain"
                );
            }
        }
        Some(self.bitfields.emit_line(reg, u64::from(cmd.value)))
    }

    /// `[<addr>] lsb <word> - <DEST>` followed by the aligned EMIT line or `Unknown`.
    pub fn decode_line(&self, address: u64, word: u64) -> String {
        let cmd = CommandWord::decode(word);
        let info = format!("[{address:x}] lsb {word:016x} - {}", cmd.destination);
        match self.emit(&cmd) {
            Some(emit) => {
                let pad = self.emit_column.saturating_sub(info.len()).max(1);
                format!("{info}{:pad$}{emit}", "")
            }
            None => format!("{info} Unknown"),
        }
    }
}
