//! Binary arithmetic coder over the adaptive order-0 model.
//!
//! The coder keeps a `[low, high]` interval in 17-bit registers. Each symbol narrows the interval in
//! proportion to its model count, then the interval is renormalized by doubling until it is wider than a
//! quarter of the code space:
//!
//! - E1: the interval sits in the lower half. Emit 0.
//! - E2: the interval sits in the upper half. Emit 1 and move it down by a half.
//! - E3: the interval straddles the midpoint inside the middle half. The next bit is not known yet, so
//!   count a pending bit and move the interval down by a quarter.
//!
//! A pending bit is resolved the next time E1 or E2 emits: the emitted bit is followed by its complement
//! once per pending bit.
//!
//! The decoder replays the same narrowing and renormalization against a 17-bit window of the stream and
//! stops when it resolves the end-of-stream symbol. There is no header or length: the first 17 bits of
//! the output are already part of the code value.

use std::io::{Read, Write};

use log::info;

use super::model::{FrequencyModel, Probability, EOF_SYMBOL, FREQUENCY_BITS};
use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::BitWriter;
use crate::error::{CodecError, Result};
use crate::Summary;

pub const CODE_VALUE_BITS: u32 = 17;
pub const MAX_CODE: u32 = (1 << CODE_VALUE_BITS) - 1;
pub const ONE_FOURTH: u32 = 1 << (CODE_VALUE_BITS - 2);
pub const ONE_HALF: u32 = 2 * ONE_FOURTH;
pub const THREE_FOURTHS: u32 = 3 * ONE_FOURTH;

// range * count must fit the u64 used for the products below, and the registers must fit a u32.
const _: () = assert!(CODE_VALUE_BITS + 1 + FREQUENCY_BITS <= 64);
const _: () = assert!(CODE_VALUE_BITS < 32);

/// Shrink `[low, high]` to the part owned by `prob`.
fn narrow(low: u32, high: u32, prob: Probability) -> (u32, u32) {
    let range = (high - low) as u64 + 1;
    let new_high = low + (range * prob.high as u64 / prob.count as u64) as u32 - 1;
    let new_low = low + (range * prob.low as u64 / prob.count as u64) as u32;
    (new_low, new_high)
}

/// Encodes symbols into a bitstream.
pub struct ArithmeticEncoder<W: Write> {
    low: u32,
    high: u32,
    /// E3 steps whose output bit is not known yet.
    pending_bits: u32,
    model: FrequencyModel,
    output: BitWriter<W>,
}

impl<W: Write> ArithmeticEncoder<W> {
    pub fn new(sink: W) -> Self {
        Self {
            low: 0,
            high: MAX_CODE,
            pending_bits: 0,
            model: FrequencyModel::new(),
            output: BitWriter::new(sink),
        }
    }

    /// Writes `bit`, then its complement once for every pending bit.
    fn emit_bit(&mut self, bit: u32) -> Result<()> {
        self.output.write_bit(bit)?;
        for _ in 0..self.pending_bits {
            self.output.write_bit(bit ^ 1)?;
        }
        self.pending_bits = 0;
        Ok(())
    }

    /// Code one symbol (a byte value, or `EOF_SYMBOL`).
    pub fn encode(&mut self, symbol: u32) -> Result<()> {
        let prob = self.model.probability(symbol)?;
        (self.low, self.high) = narrow(self.low, self.high, prob);
        debug_assert!(self.low <= self.high);

        loop {
            if self.high < ONE_HALF {
                self.emit_bit(0)?;
            } else if self.low >= ONE_HALF {
                self.emit_bit(1)?;
                self.low -= ONE_HALF;
                self.high -= ONE_HALF;
            } else if self.low >= ONE_FOURTH && self.high < THREE_FOURTHS {
                self.pending_bits += 1;
                self.low -= ONE_FOURTH;
                self.high -= ONE_FOURTH;
            } else {
                break;
            }
            self.high = (self.high << 1 | 1) & MAX_CODE;
            self.low = (self.low << 1) & MAX_CODE;
            debug_assert!(self.low <= self.high);
        }
        Ok(())
    }

    pub fn encode_byte(&mut self, byte: u8) -> Result<()> {
        self.encode(byte as u32)
    }

    /// Codes the end-of-stream symbol and the two bits that pin the final interval, then closes the
    /// output. Returns the number of bytes written.
    pub fn finish(mut self) -> Result<u64> {
        self.encode(EOF_SYMBOL)?;
        self.pending_bits += 1;
        let bit = if self.low < ONE_FOURTH { 0 } else { 1 };
        self.emit_bit(bit)?;
        self.output.close()?;
        Ok(self.output.bytes_written())
    }
}

/// Decodes symbols from a bitstream produced by ArithmeticEncoder.
pub struct ArithmeticDecoder<R: Read> {
    low: u32,
    high: u32,
    /// The 17-bit window of the code value.
    value: u32,
    model: FrequencyModel,
    input: BitReader<R>,
    /// Zero bits supplied after the source ran dry.
    phantom_bits: u32,
    finished: bool,
}

impl<R: Read> ArithmeticDecoder<R> {
    /// Creates the decoder and fills the value register with the first 17 bits.
    pub fn new(source: R) -> Result<Self> {
        let mut decoder = Self {
            low: 0,
            high: MAX_CODE,
            value: 0,
            model: FrequencyModel::new(),
            input: BitReader::new(source),
            phantom_bits: 0,
            finished: false,
        };
        for _ in 0..CODE_VALUE_BITS {
            decoder.value = decoder.value << 1 | decoder.next_bit()?;
        }
        Ok(decoder)
    }

    /// Next bit of the code value. Past the end of the source the stream reads as zeros, the same
    /// value the writer pads with. A valid stream never needs a full register of them.
    fn next_bit(&mut self) -> Result<u32> {
        match self.input.read_bit() {
            Err(e) if e.is_end_of_stream() => {
                self.phantom_bits += 1;
                if self.phantom_bits > CODE_VALUE_BITS {
                    return Err(CodecError::EndOfStream);
                }
                Ok(0)
            }
            other => other,
        }
    }

    /// Decode the next byte, or None once the end-of-stream symbol has been reached.
    pub fn decode(&mut self) -> Result<Option<u8>> {
        if self.finished {
            return Ok(None);
        }
        let range = (self.high - self.low) as u64 + 1;
        let total = self.model.total() as u64;
        let scaled = (((self.value - self.low) as u64 + 1) * total - 1) / range;
        let (symbol, prob) = self.model.symbol_for(scaled as u32)?;
        if symbol == EOF_SYMBOL {
            self.finished = true;
            return Ok(None);
        }

        (self.low, self.high) = narrow(self.low, self.high, prob);
        loop {
            if self.high < ONE_HALF {
                // E1: nothing to remove
            } else if self.low >= ONE_HALF {
                self.low -= ONE_HALF;
                self.high -= ONE_HALF;
                self.value -= ONE_HALF;
            } else if self.low >= ONE_FOURTH && self.high < THREE_FOURTHS {
                self.low -= ONE_FOURTH;
                self.high -= ONE_FOURTH;
                self.value -= ONE_FOURTH;
            } else {
                break;
            }
            self.low <<= 1;
            self.high = self.high << 1 | 1;
            self.value = self.value << 1 | self.next_bit()?;
        }
        debug_assert!(self.low <= self.value && self.value <= self.high);
        Ok(Some(symbol as u8))
    }

    pub fn bits_consumed(&self) -> u64 {
        self.input.bits_consumed()
    }
}

/// Compress `source` into `sink` with the arithmetic coder alone.
pub fn compress<R: Read, W: Write>(source: R, sink: W) -> Result<Summary> {
    let mut input = BitReader::new(source);
    let mut encoder = ArithmeticEncoder::new(sink);
    loop {
        match input.read_byte() {
            Ok(byte) => encoder.encode_byte(byte)?,
            Err(e) if e.is_end_of_stream() => break,
            Err(e) => return Err(e),
        }
    }
    let summary = Summary {
        bytes_in: input.bits_consumed() / 8,
        bytes_out: encoder.finish()?,
    };
    info!(
        "Arithmetic coder: {} bytes in, {} bytes out",
        summary.bytes_in, summary.bytes_out
    );
    Ok(summary)
}

/// Decompress an arithmetic coded `source` into `sink`.
pub fn decompress<R: Read, W: Write>(source: R, sink: W) -> Result<Summary> {
    let mut decoder = ArithmeticDecoder::new(source)?;
    let mut output = BitWriter::new(sink);
    while let Some(byte) = decoder.decode()? {
        output.write_byte(byte)?;
    }
    output.close()?;
    let summary = Summary {
        bytes_in: (decoder.bits_consumed() + 7) / 8,
        bytes_out: output.bytes_written(),
    };
    info!(
        "Arithmetic decoder: {} bytes in, {} bytes out",
        summary.bytes_in, summary.bytes_out
    );
    Ok(summary)
}
