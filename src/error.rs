//! Error types shared by the bit channel, both codecs and the pipeline.
//!
//! End of stream is an ordinary value here, not a panic. Callers that reach the natural end of their
//! input match on `CodecError::EndOfStream` and stop; everyone else propagates it with `?`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    /// Fewer bits were left in the source than the read asked for.
    #[error("unexpected end of bit stream")]
    EndOfStream,

    /// The underlying source or sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The frequency model could not resolve a scaled value. Encoder and decoder are out of step.
    #[error("no symbol for scaled value {scaled} (model total {total})")]
    InvariantViolation { scaled: u32, total: u32 },

    /// A symbol outside the byte values and the end-of-stream sentinel.
    #[error("invalid symbol {0}, symbols run from 0 to 256")]
    InvalidSymbol(u32),

    /// An LZW code that is neither in the dictionary nor the next one to be assigned.
    #[error("invalid LZW code {code}, next unassigned code is {next}")]
    InvalidCode { code: u32, next: u32 },

    /// Bit reads and writes move between 1 and 32 bits at a time.
    #[error("invalid bit count: {0}")]
    InvalidBitCount(u32),

    #[error("configuration error: {0}")]
    Config(String),
}

impl CodecError {
    /// True for the end-of-stream condition, which many loops treat as normal termination.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, CodecError::EndOfStream)
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, CodecError>;
