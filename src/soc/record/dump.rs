//! Replays a persisted record file through the register database.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::soc::decode::BitfieldDecoder;
use crate::soc::regdb::RegisterDatabase;

use super::{Record, RecordCodec, RecordError};

pub struct DumpDecoder<'db> {
    db: &'db RegisterDatabase,
    bitfields: BitfieldDecoder,
}

impl<'db> DumpDecoder<'db> {
    pub fn new(db: &'db RegisterDatabase) -> Self {
        Self {
            db,
            bitfields: BitfieldDecoder::emit(),
        }
    }

    /// Decodes the record file at `path` into one line per record.
    pub fn decode(&self, path: impl AsRef<Path>) -> Result<Vec<String>, RecordError> {
        let records = read_records(path.as_ref())?;
        Ok(records.iter().map(|record| self.render(record)).collect())
    }

    /// Same as [`DumpDecoder::decode`] but writes lines to `out`; returns the line count.
    pub fn write_listing<W: Write>(
        &self,
        path: impl AsRef<Path>,
        out: &mut W,
    ) -> Result<usize, RecordError> {
        let records = read_records(path.as_ref())?;
        for record in &records {
            writeln!(out, "{}", self.render(record))?;
        }
        Ok(records.len())
    }

    /// `EMIT(...)` for a known offset, else `<target> <offset> <value>` in hex. Offsets stored
    /// as negative numbers never match a register.
    pub fn render(&self, record: &Record) -> String {
        let reg = u32::try_from(record.offset)
            .ok()
            .and_then(|offset| self.db.register(offset));
        match reg {
            Some(reg) => self.bitfields.emit_line(reg, u64::from(record.value)),
            None => format!(
                "{} {} {:x}",
                signed_hex(record.target),
                signed_hex(record.offset),
                record.value
            ),
        }
    }
}

fn read_records(path: &Path) -> Result<Vec<Record>, RecordError> {
    let bytes = fs::read(path).map_err(|source| RecordError::File {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), len = bytes.len(), "decoding record dump");
    RecordCodec::decode_bytes(&bytes)
}

fn signed_hex(value: i16) -> String {
    if value < 0 {
        format!("-{:x}", -i32::from(value))
    } else {
        format!("{value:x}")
    }
}
