//! BitWriter: packs bits MSB first and writes them to any sink that supports the write() call.
//!

use std::io::Write;

use log::warn;

use super::{BUFFER_SIZE, MAX_BITS_PER_CALL};
use crate::error::{CodecError, Result};

/// Writes a bitstream for output.
///
/// Full bytes collect in an output buffer that is handed to the sink whenever it reaches 128k. Call
/// close() to write the final partial byte and flush the sink. If the writer is dropped without being
/// closed it still flushes, but any error is only logged.
pub struct BitWriter<W: Write> {
    /// Output buffer of packed bytes not yet handed to the sink.
    output: Vec<u8>,
    /// Private queue to hold bits that are waiting to be put as bytes into the output buffer.
    queue: u64,
    /// Count of valid bits in the queue. Less than 8 between calls.
    q_bits: u32,
    /// Total bits accepted so far, padding excluded.
    bits_written: u64,
    closed: bool,
    /// Handle to the output stream
    writer: W,
}

impl<W: Write> BitWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            output: Vec::with_capacity(BUFFER_SIZE),
            queue: 0,
            q_bits: 0,
            bits_written: 0,
            closed: false,
            writer,
        }
    }

    /// Append the low n bits (1..=32) of value, MSB first.
    pub fn write_bits(&mut self, value: u32, n: u32) -> Result<()> {
        if n == 0 || n > MAX_BITS_PER_CALL {
            return Err(CodecError::InvalidBitCount(n));
        }
        let mask = u64::MAX >> (64 - n);
        self.queue = self.queue << n | (value as u64 & mask);
        self.q_bits += n;
        self.bits_written += n as u64;
        while self.q_bits > 7 {
            self.q_bits -= 8;
            self.output.push((self.queue >> self.q_bits) as u8);
        }
        self.queue &= (1_u64 << self.q_bits) - 1;

        if self.output.len() >= BUFFER_SIZE {
            self.write_buffer()?;
        }
        Ok(())
    }

    /// Append a single bit. Anything other than 0 counts as 1.
    pub fn write_bit(&mut self, bit: u32) -> Result<()> {
        self.write_bits((bit != 0) as u32, 1)
    }

    /// Append 8 bits.
    pub fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.write_bits(byte as u32, 8)
    }

    /// Hand the packed bytes to the sink.
    fn write_buffer(&mut self) -> Result<()> {
        if !self.output.is_empty() {
            self.writer.write_all(&self.output)?;
            self.output.clear();
        }
        Ok(())
    }

    /// Pads the remaining bits (1-7) with 0s in the least significant bits, writes everything to the
    /// sink and flushes it. Safe to call more than once.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        if self.q_bits > 0 {
            self.output.push((self.queue << (8 - self.q_bits)) as u8);
            self.queue = 0;
            self.q_bits = 0;
        }
        // Mark closed first so a failing sink is not retried from drop()
        self.closed = true;
        self.write_buffer()?;
        self.writer.flush()?;
        Ok(())
    }

    /// Bits written by the caller so far (padding not counted).
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Bytes the stream occupies once closed.
    pub fn bytes_written(&self) -> u64 {
        (self.bits_written + 7) / 8
    }
}

impl<W: Write> Drop for BitWriter<W> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("BitWriter dropped with unflushed data: {}", e);
        }
    }
}
