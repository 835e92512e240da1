//! Persisted command records: 8 bytes, little-endian, `{offset: i16, value: u32, target: i16}`.

pub mod dump;

pub use dump::DumpDecoder;

use std::io::{self, Cursor, Read, Write};
use std::path::PathBuf;

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};

pub const RECORD_BYTES: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to read record file {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("record stream of {len} bytes is not a multiple of 8 ({trailing} trailing bytes)")]
    TrailingBytes { len: usize, trailing: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Record {
    pub offset: i16,
    pub value: u32,
    pub target: i16,
}

impl Record {
    pub fn new(offset: i16, value: u32, target: i16) -> Self {
        Self {
            offset,
            value,
            target,
        }
    }

    /// Builds a record from unsigned fields; values above 32767 become `value - 65536`.
    pub fn from_unsigned(offset: u16, value: u32, target: u16) -> Self {
        Self::new(to_signed(offset), value, to_signed(target))
    }

    pub fn unsigned_offset(&self) -> u16 {
        self.offset as u16
    }

    pub fn unsigned_target(&self) -> u16 {
        self.target as u16
    }
}

fn to_signed(value: u16) -> i16 {
    if value > i16::MAX as u16 {
        (i32::from(value) - 0x1_0000) as i16
    } else {
        value as i16
    }
}

pub struct RecordCodec;

impl RecordCodec {
    pub fn encode(record: &Record) -> [u8; RECORD_BYTES] {
        let mut buf = [0u8; RECORD_BYTES];
        LittleEndian::write_i16(&mut buf[0..2], record.offset);
        LittleEndian::write_u32(&mut buf[2..6], record.value);
        LittleEndian::write_i16(&mut buf[6..8], record.target);
        buf
    }

    pub fn decode(bytes: &[u8; RECORD_BYTES]) -> Record {
        Record::new(
            LittleEndian::read_i16(&bytes[0..2]),
            LittleEndian::read_u32(&bytes[2..6]),
            LittleEndian::read_i16(&bytes[6..8]),
        )
    }

    /// Decodes a whole record stream. A length that is not a multiple of the record size is
    /// rejected rather than truncated.
    pub fn decode_bytes(bytes: &[u8]) -> Result<Vec<Record>, RecordError> {
        let trailing = bytes.len() % RECORD_BYTES;
        if trailing != 0 {
            return Err(RecordError::TrailingBytes {
                len: bytes.len(),
                trailing,
            });
        }
        let mut cursor = Cursor::new(bytes);
        let mut records = Vec::with_capacity(bytes.len() / RECORD_BYTES);
        while (cursor.position() as usize) < bytes.len() {
            let offset = cursor.read_i16::<LittleEndian>()?;
            let value = cursor.read_u32::<LittleEndian>()?;
            let target = cursor.read_i16::<LittleEndian>()?;
            records.push(Record::new(offset, value, target));
        }
        Ok(records)
    }

    pub fn read_all<R: Read>(reader: &mut R) -> Result<Vec<Record>, RecordError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::decode_bytes(&bytes)
    }

    pub fn write_all<'a, W, I>(writer: &mut W, records: I) -> io::Result<usize>
    where
        W: Write,
        I: IntoIterator<Item = &'a Record>,
    {
        let mut count = 0;
        for record in records {
            writer.write_i16::<LittleEndian>(record.offset)?;
            writer.write_u32::<LittleEndian>(record.value)?;
            writer.write_i16::<LittleEndian>(record.target)?;
            count += 1;
        }
        Ok(count)
    }
}
