//! The lzw_coding module is the dictionary substitution stage.
//!
//! LZW replaces each longest already-seen string with a dictionary code and adds that string plus the
//! following byte as a new entry. The dictionary starts with the 256 single bytes and is rebuilt by the
//! decoder from the codes alone, so nothing but the codes is written.
//!
//! Codes are written at the smallest width that can hold every code assigned so far, starting at 8 bits.
//! After `2^22` codes (by default) both sides start over with a fresh dictionary.
//!

pub mod codec;
pub mod dictionary;

pub use codec::{compress, decompress, LzwConfig, LzwDecoder, LzwEncoder};
