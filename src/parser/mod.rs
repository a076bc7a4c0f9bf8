//! Byte-stream to log-line reassembly.
//!
//! Transports deliver raw chunks whose boundaries have nothing to do with line
//! boundaries. [`LineAccumulator`] stitches them back into completed lines.

mod accumulator;

pub use accumulator::LineAccumulator;

/// Decode a raw chunk one byte per character.
///
/// Devices emit ASCII; anything else maps onto Latin-1 instead of failing, so
/// decoding never errors and never depends on chunk boundaries.
pub fn decode_chunk(chunk: &[u8]) -> String {
    chunk.iter().copied().map(char::from).collect()
}
