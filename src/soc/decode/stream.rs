//! Listings over a raw command buffer as captured from the accelerator: the annotated decode
//! listing (which also yields the persisted records) and the plain hex block listing.

use byteorder::{ByteOrder, LittleEndian};
use tracing::warn;

use crate::config::{DEFAULT_BLOCK_BYTES, DecoderConfig};
use crate::soc::record::Record;
use crate::soc::regdb::RegisterDatabase;

use super::command::{CommandWord, CommandWordDecoder};

const WORD_BYTES: usize = 8;

/// Output of one pass over a command buffer.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StreamListing {
    pub lines: Vec<String>,
    pub records: Vec<Record>,
}

pub struct InstructionStream<'db> {
    decoder: CommandWordDecoder<'db>,
    base_address: u64,
}

impl<'db> InstructionStream<'db> {
    pub fn new(db: &'db RegisterDatabase, config: &DecoderConfig) -> Self {
        Self {
            decoder: CommandWordDecoder::new(db, config),
            base_address: config.stream_base_address,
        }
    }

    /// Decodes every nonzero little-endian word of `buffer`. All-zero words are skipped and do
    /// not produce records.
    pub fn decode(&self, buffer: &[u8]) -> StreamListing {
        let mut listing = StreamListing::default();
        let mut chunks = buffer.chunks_exact(WORD_BYTES);
        for (index, chunk) in chunks.by_ref().enumerate() {
            let word = LittleEndian::read_u64(chunk);
            if word == 0 {
                continue;
            }
            let address = self.base_address.wrapping_add((index * WORD_BYTES) as u64);
            listing.lines.push(self.decoder.decode_line(address, word));
            listing.records.push(CommandWord::decode(word).to_record());
        }
        let trailing = chunks.remainder().len();
        if trailing != 0 {
            warn!(trailing, "ignoring partial command word at end of buffer");
        }
        listing
    }
}

/// Rows of `block_bytes` rendered as little-endian 32-bit words. The first all-zero row ends the
/// listing with a summary of the rows left in the buffer; a trailing partial row is dropped.
/// A row size that is zero or not a multiple of 4 falls back to [`DEFAULT_BLOCK_BYTES`].
pub fn hex_listing(buffer: &[u8], config: &DecoderConfig) -> Vec<String> {
    let block = match config.block_bytes {
        bytes if bytes != 0 && bytes % 4 == 0 => bytes,
        bytes => {
            warn!(block_bytes = bytes, "unusable hex row size, using the default");
            DEFAULT_BLOCK_BYTES
        }
    };
    let total_blocks = buffer.len() / block;
    let mut lines = Vec::new();
    for (index, chunk) in buffer.chunks_exact(block).enumerate() {
        let offset = index * block;
        let words: Vec<String> = chunk
            .chunks_exact(4)
            .map(|word| format!("{:08x}", LittleEndian::read_u32(word)))
            .collect();
        lines.push(format!("[{offset:08x}] = {}", words.join(" ")));
        if chunk.iter().all(|byte| *byte == 0) {
            let remaining_blocks = total_blocks - index;
            let remaining_bytes = remaining_blocks * block;
            let last = buffer.len().saturating_sub(1);
            lines.push(format!(
                "... {remaining_blocks} blocks ({remaining_bytes} bytes) from 0x{offset:08x} to 0x{last:08x} are all zeros"
            ));
            break;
        }
    }
    lines
}
