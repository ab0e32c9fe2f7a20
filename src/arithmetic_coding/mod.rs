//! The arithmetic_coding module is the entropy coding stage.
//!
//! It is an adaptive order-0 binary arithmetic coder: every byte is coded against a cumulative frequency
//! table that learns from the bytes already seen, and the end of the data is marked by a dedicated
//! sentinel symbol rather than a length field.
//!
//! Encoder and decoder each build their own model from scratch and update it in the same order, so the
//! table is never transmitted.
//!

pub mod coder;
pub mod model;

pub use coder::{compress, decompress, ArithmeticDecoder, ArithmeticEncoder};
pub use model::{FrequencyModel, Probability, EOF_SYMBOL};
