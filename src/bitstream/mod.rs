//! The bitstream module forms the I/O subsystem for both codecs.
//!
//! Neither codec works in whole bytes. The arithmetic coder emits and consumes one bit at a time, and the
//! LZW transform moves codes whose width grows from 8 up to 23 bits. Both sides therefore go through a
//! BitReader / BitWriter pair that packs bits MSB first into bytes.
//!
//! Each side keeps a 128k buffer against the underlying source or sink so that single-bit traffic does
//! not turn into single-byte system calls. Buffering never changes the bit-level content of the stream.
//!
//! There is no padding convention beyond the last byte: the writer fills the unused low bits of its final
//! byte with zeros, and readers must know from their own state machine when the data is over.
//!
pub mod bitreader;
pub mod bitwriter;

/// Size of the read and write buffers.
pub const BUFFER_SIZE: usize = 128 * 1024;

/// Largest number of bits a single read_bits / write_bits call moves.
pub const MAX_BITS_PER_CALL: u32 = 32;
