//! Lossless byte stream compression with LZW, an adaptive binary arithmetic coder, or both chained.
//!
//! Version 0.1.0
//!
//! The crate provides:
//! - a bit-granular reader and writer shared by both codecs (`bitstream`),
//! - an order-0 adaptive arithmetic coder (`arithmetic_coding`),
//! - an LZW transform with growing code width and dictionary reset (`lzw_coding`),
//! - a pipeline that runs either codec alone or LZW followed by the arithmetic coder (`compression`).
//!
//! Compressed streams carry no header, magic number or length. The arithmetic coder ends with an
//! end-of-stream symbol; LZW ends where the bytes end.
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> lzbac -9 test.txt`
//!
//! This will compress the file with LZW and then the arithmetic coder and create test.txt.lzw.bac.
//! The input file will be deleted unless -k is given.
//!
pub mod arithmetic_coding;
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod lzw_coding;
pub mod tools;

#[cfg(test)]
mod test_data;

pub use compression::Algorithm;
pub use error::{CodecError, Result};

/// Byte counts of one codec run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub bytes_in: u64,
    pub bytes_out: u64,
}
