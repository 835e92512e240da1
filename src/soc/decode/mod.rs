//! Decode engine: raw register values and command words to symbolic text.

pub mod bitfield;
pub mod command;
pub mod stream;

pub use bitfield::{BitProbe, BitfieldDecoder, FieldToken, RAW_VALUE};
pub use command::{CommandWord, CommandWordDecoder, Destination};
pub use stream::{InstructionStream, StreamListing, hex_listing};
