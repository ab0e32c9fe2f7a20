//! LZW encoder and decoder with growing code width.
//!
//! Codes start 8 bits wide. The encoder widens by one bit right after it assigns a code that is a power
//! of two; the decoder, which assigns each code one step later, widens just before reading when the
//! code it is about to assign is a power of two. Both land on the same code index, so the width is never
//! written to the stream.
//!
//! When the dictionary reaches its cap the encoder writes its pending match (at the current, widest
//! width) and both sides drop back to the 256 single-byte strings and 8-bit codes.

use std::io::{Read, Write};

use log::{debug, info, trace};

use super::dictionary::{DecodeDictionary, EncodeDictionary};
use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::BitWriter;
use crate::error::{CodecError, Result};
use crate::Summary;

pub const INITIAL_CODE_WIDTH: u32 = 8;
pub const DEFAULT_MAX_CODE_BITS: u32 = 22;

/// LZW settings. Both sides of a stream must agree on them; nothing is stored in the output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LzwConfig {
    /// The dictionary resets once it has assigned code `2^max_code_bits`.
    pub max_code_bits: u32,
}

impl LzwConfig {
    pub fn new(max_code_bits: u32) -> Result<Self> {
        let config = Self { max_code_bits };
        config.validate()?;
        Ok(config)
    }

    /// The widest code is `max_code_bits + 1` bits and must fit a single bit read.
    pub fn validate(&self) -> Result<()> {
        if !(9..=24).contains(&self.max_code_bits) {
            return Err(CodecError::Config(format!(
                "max code bits must be between 9 and 24, got {}",
                self.max_code_bits
            )));
        }
        Ok(())
    }

    /// The code at which the dictionary resets.
    pub fn code_cap(&self) -> u32 {
        1 << self.max_code_bits
    }
}

impl Default for LzwConfig {
    fn default() -> Self {
        Self {
            max_code_bits: DEFAULT_MAX_CODE_BITS,
        }
    }
}

/// Turns bytes into variable width codes.
pub struct LzwEncoder<W: Write> {
    dictionary: EncodeDictionary,
    /// Code of the longest match so far. None before the first byte and right after a reset.
    current: Option<u32>,
    code_width: u32,
    cap: u32,
    bytes_in: u64,
    codes_written: u64,
    resets: u64,
    output: BitWriter<W>,
}

impl<W: Write> LzwEncoder<W> {
    pub fn new(sink: W, config: &LzwConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            dictionary: EncodeDictionary::new(),
            current: None,
            code_width: INITIAL_CODE_WIDTH,
            cap: config.code_cap(),
            bytes_in: 0,
            codes_written: 0,
            resets: 0,
            output: BitWriter::new(sink),
        })
    }

    fn emit(&mut self, code: u32) -> Result<()> {
        self.output.write_bits(code, self.code_width)?;
        self.codes_written += 1;
        Ok(())
    }

    pub fn encode_byte(&mut self, byte: u8) -> Result<()> {
        self.bytes_in += 1;
        match self.current {
            None => self.current = Some(byte as u32),
            Some(code) => match self.dictionary.lookup(code, byte) {
                Some(longer) => self.current = Some(longer),
                None => {
                    self.emit(code)?;
                    let new_code = self.dictionary.insert(code, byte);
                    if new_code.is_power_of_two() {
                        self.code_width += 1;
                        trace!("LZW encoder widened to {} bits at code {}", self.code_width, new_code);
                    }
                    self.current = Some(byte as u32);
                }
            },
        }

        if self.dictionary.max_code() == self.cap {
            if let Some(code) = self.current.take() {
                self.emit(code)?;
            }
            self.dictionary.reset();
            self.code_width = INITIAL_CODE_WIDTH;
            self.resets += 1;
            debug!("LZW encoder dictionary reset after {} input bytes", self.bytes_in);
        }
        Ok(())
    }

    /// Writes the pending match and closes the output. Returns the number of bytes written.
    pub fn finish(mut self) -> Result<u64> {
        if let Some(code) = self.current.take() {
            self.emit(code)?;
        }
        self.output.close()?;
        debug!(
            "LZW encoder wrote {} codes, {} dictionary resets",
            self.codes_written, self.resets
        );
        Ok(self.output.bytes_written())
    }

    pub fn code_width(&self) -> u32 {
        self.code_width
    }

    pub fn max_code(&self) -> u32 {
        self.dictionary.max_code()
    }

    pub fn codes_written(&self) -> u64 {
        self.codes_written
    }

    pub fn reset_count(&self) -> u64 {
        self.resets
    }
}

/// Turns variable width codes back into bytes.
pub struct LzwDecoder<R: Read> {
    dictionary: DecodeDictionary,
    /// The previous code. None before the first read and once the stream is exhausted.
    prev: Option<u32>,
    started: bool,
    code_width: u32,
    cap: u32,
    bytes_out: u64,
    resets: u64,
    input: BitReader<R>,
    /// The string of the latest code.
    scratch: Vec<u8>,
}

impl<R: Read> LzwDecoder<R> {
    pub fn new(source: R, config: &LzwConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            dictionary: DecodeDictionary::new(),
            prev: None,
            started: false,
            code_width: INITIAL_CODE_WIDTH,
            cap: config.code_cap(),
            bytes_out: 0,
            resets: 0,
            input: BitReader::new(source),
            scratch: Vec::new(),
        })
    }

    /// Next code at the current width, or None when the stream has no whole code left.
    fn read_code(&mut self) -> Result<Option<u32>> {
        match self.input.read_bits(self.code_width) {
            Ok(code) => Ok(Some(code)),
            Err(e) if e.is_end_of_stream() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Makes `code` the previous code and returns its string.
    fn accept(&mut self, code: Option<u32>) -> Option<&[u8]> {
        self.prev = code;
        let code = code?;
        self.dictionary.write_string(code, &mut self.scratch);
        self.bytes_out += self.scratch.len() as u64;
        Some(self.scratch.as_slice())
    }

    /// Decodes one code and returns the bytes it stands for, or None at the end of the stream.
    pub fn next_string(&mut self) -> Result<Option<&[u8]>> {
        if !self.started {
            self.started = true;
            let first = self.read_code()?;
            return Ok(self.accept(first));
        }
        let prev = match self.prev {
            Some(prev) => prev,
            None => return Ok(None),
        };

        if self.dictionary.max_code() == self.cap {
            self.dictionary.reset();
            self.code_width = INITIAL_CODE_WIDTH;
            self.resets += 1;
            debug!("LZW decoder dictionary reset after {} output bytes", self.bytes_out);
            let restart = self.read_code()?;
            return Ok(self.accept(restart));
        }

        let next = self.dictionary.max_code() + 1;
        if next.is_power_of_two() {
            self.code_width += 1;
            trace!("LZW decoder widened to {} bits at code {}", self.code_width, next);
        }
        let code = match self.read_code()? {
            Some(code) => code,
            None => return Ok(self.accept(None)),
        };

        // A code one past the table is the string being defined right now: prev's string plus its own
        // first byte.
        let first = if self.dictionary.contains(code) {
            self.dictionary.first_byte(code)
        } else if code == next {
            self.dictionary.first_byte(prev)
        } else {
            return Err(CodecError::InvalidCode { code, next });
        };
        self.dictionary.insert(prev, first);
        Ok(self.accept(Some(code)))
    }

    pub fn code_width(&self) -> u32 {
        self.code_width
    }

    pub fn max_code(&self) -> u32 {
        self.dictionary.max_code()
    }

    pub fn reset_count(&self) -> u64 {
        self.resets
    }

    pub fn bytes_out(&self) -> u64 {
        self.bytes_out
    }

    pub fn bits_consumed(&self) -> u64 {
        self.input.bits_consumed()
    }
}

/// Compress `source` into `sink` with LZW alone.
pub fn compress<R: Read, W: Write>(source: R, sink: W, config: &LzwConfig) -> Result<Summary> {
    let mut input = BitReader::new(source);
    let mut encoder = LzwEncoder::new(sink, config)?;
    loop {
        match input.read_byte() {
            Ok(byte) => encoder.encode_byte(byte)?,
            Err(e) if e.is_end_of_stream() => break,
            Err(e) => return Err(e),
        }
    }
    let max_code = encoder.max_code();
    let summary = Summary {
        bytes_in: input.bits_consumed() / 8,
        bytes_out: encoder.finish()?,
    };
    info!(
        "LZW: {} bytes in, {} bytes out, final max code {}",
        summary.bytes_in, summary.bytes_out, max_code
    );
    Ok(summary)
}

/// Decompress an LZW `source` into `sink`.
pub fn decompress<R: Read, W: Write>(source: R, sink: W, config: &LzwConfig) -> Result<Summary> {
    let mut decoder = LzwDecoder::new(source, config)?;
    let mut output = BitWriter::new(sink);
    while let Some(string) = decoder.next_string()? {
        for &byte in string {
            output.write_byte(byte)?;
        }
    }
    output.close()?;
    let summary = Summary {
        bytes_in: (decoder.bits_consumed() + 7) / 8,
        bytes_out: decoder.bytes_out(),
    };
    info!(
        "LZW decoder: {} bytes in, {} bytes out, final max code {}",
        summary.bytes_in,
        summary.bytes_out,
        decoder.max_code()
    );
    Ok(summary)
}
