//! BitReader: reads a packed, MSB-first bitstream from any I/O source that supports the read() call.
//!

use std::io::{ErrorKind, Read};

use super::{BUFFER_SIZE, MAX_BITS_PER_CALL};
use crate::error::{CodecError, Result};

/// Reads bits from a buffered byte source.
#[derive(Debug)]
pub struct BitReader<R> {
    buffer: Vec<u8>,
    /// Next unread byte in the buffer.
    cursor: usize,
    /// Bits taken from the buffer but not yet handed out. Only the low `q_bits` bits are meaningful.
    queue: u64,
    /// Count of valid bits in the queue. Less than 8 between calls.
    q_bits: u32,
    /// Total bytes pulled from the source so far.
    bytes_read: u64,
    source: R,
}

impl<R: Read> BitReader<R> {
    /// Creates a new BitReader (with a 128k buffer).
    pub fn new(source: R) -> Self {
        Self {
            buffer: Vec::with_capacity(BUFFER_SIZE),
            cursor: 0,
            queue: 0,
            q_bits: 0,
            bytes_read: 0,
            source,
        }
    }

    /// Check (and refill) buffer. Returns Ok(true) if we have data, Ok(false) if the source is exhausted.
    fn have_data(&mut self) -> Result<bool> {
        if self.cursor < self.buffer.len() {
            return Ok(true);
        }
        // Grow back to full size in case the last refill was short
        self.buffer.resize(BUFFER_SIZE, 0);
        loop {
            match self.source.read(&mut self.buffer) {
                Ok(0) => {
                    self.buffer.clear();
                    self.cursor = 0;
                    return Ok(false);
                }
                Ok(size) => {
                    self.buffer.truncate(size);
                    self.cursor = 0;
                    self.bytes_read += size as u64;
                    return Ok(true);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Return the next n bits (1..=32) MSB first.
    ///
    /// Fails with `EndOfStream` if fewer than n bits remain. Nothing is consumed in that case.
    pub fn read_bits(&mut self, n: u32) -> Result<u32> {
        if n == 0 || n > MAX_BITS_PER_CALL {
            return Err(CodecError::InvalidBitCount(n));
        }
        // At most 7 + 32 bits ever sit in the queue, so a u64 holds them.
        while self.q_bits < n {
            if !self.have_data()? {
                return Err(CodecError::EndOfStream);
            }
            self.queue = self.queue << 8 | self.buffer[self.cursor] as u64;
            self.cursor += 1;
            self.q_bits += 8;
        }
        self.q_bits -= n;
        let result = (self.queue >> self.q_bits) as u32 & (u32::MAX >> (32 - n));
        self.queue &= (1_u64 << self.q_bits) - 1;
        Ok(result)
    }

    /// Return a single bit (0 or 1).
    pub fn read_bit(&mut self) -> Result<u32> {
        self.read_bits(1)
    }

    /// Returns the next 8 bits as a byte. This is a convenience function, and calls read_bits(8).
    pub fn read_byte(&mut self) -> Result<u8> {
        self.read_bits(8).map(|byte| byte as u8)
    }

    /// Bits handed out so far.
    pub fn bits_consumed(&self) -> u64 {
        (self.bytes_read - (self.buffer.len() - self.cursor) as u64) * 8 - self.q_bits as u64
    }

    /// Debugging function. Report current position as [bytes.bits] consumed.
    pub fn loc(&self) -> String {
        let bits = self.bits_consumed();
        format!("[{}.{}]", bits / 8, bits % 8)
    }
}

#[cfg(test)]
mod test {
    use super::BitReader;
    use crate::error::CodecError;

    #[test]
    fn basic_test() {
        let x = [0b10000001_u8].as_slice();
        let mut br = BitReader::new(x);
        assert_eq!(br.read_bit().unwrap(), 1);
        for _ in 0..6 {
            assert_eq!(br.read_bit().unwrap(), 0);
        }
        assert_eq!(br.read_bit().unwrap(), 1);
        assert!(br.read_bit().unwrap_err().is_end_of_stream());
    }

    #[test]
    fn read_bits_test() {
        let x = [0b00011011_u8].as_slice();
        let mut br = BitReader::new(x);
        assert_eq!(br.read_bits(5).unwrap(), 3);
        assert_eq!(br.read_bits(1).unwrap(), 0);
        assert_eq!(br.read_bits(2).unwrap(), 3);
    }

    #[test]
    fn across_bytes_test() {
        let x = [0b1010_1010_u8, 0b1100_1100, 0b1111_0000].as_slice();
        let mut br = BitReader::new(x);
        assert_eq!(br.read_bits(3).unwrap(), 0b101);
        assert_eq!(br.read_bits(9).unwrap(), 0b0_1010_1100);
        assert_eq!(br.read_bits(12).unwrap(), 0b1100_1111_0000);
    }

    #[test]
    fn full_width_test() {
        let x = [0xde_u8, 0xad, 0xbe, 0xef, 0x80].as_slice();
        let mut br = BitReader::new(x);
        assert_eq!(br.read_bit().unwrap(), 1);
        assert_eq!(br.read_bits(32).unwrap(), 0xbd5b_7ddf);
        assert_eq!(br.read_bits(7).unwrap(), 0);
    }

    #[test]
    fn short_read_consumes_nothing() {
        let x = [0b1110_0001_u8, 0b0100_0000].as_slice();
        let mut br = BitReader::new(x);
        assert_eq!(br.read_bits(4).unwrap(), 0b1110);
        assert!(br.read_bits(13).unwrap_err().is_end_of_stream());
        assert_eq!(br.read_bits(12).unwrap(), 0b0001_0100_0000);
        assert!(br.read_bit().unwrap_err().is_end_of_stream());
    }

    #[test]
    fn byte_test() {
        let x = "Hello, world!".as_bytes();
        let mut br = BitReader::new(x);
        assert_eq!(br.read_byte().unwrap(), b'H');
        assert_eq!(br.read_byte().unwrap(), b'e');
        assert_eq!(br.read_byte().unwrap(), b'l');
        assert_eq!(br.read_byte().unwrap(), b'l');
    }

    #[test]
    fn loc_test() {
        let x = "Hello, world!".as_bytes();
        let mut br = BitReader::new(x);
        for _ in 0..5 {
            br.read_byte().unwrap();
        }
        br.read_bit().unwrap();
        assert_eq!(br.loc(), "[5.1]");
        assert_eq!(br.bits_consumed(), 41);
    }

    #[test]
    fn bad_count_test() {
        let mut br = BitReader::new([0_u8; 8].as_slice());
        assert!(matches!(br.read_bits(0), Err(CodecError::InvalidBitCount(0))));
        assert!(matches!(br.read_bits(33), Err(CodecError::InvalidBitCount(33))));
    }

    #[test]
    fn refill_test() {
        // More than one buffer load
        let data: Vec<u8> = (0..(super::BUFFER_SIZE * 2 + 17)).map(|i| i as u8).collect();
        let mut br = BitReader::new(data.as_slice());
        for (i, &byte) in data.iter().enumerate() {
            assert_eq!(br.read_byte().unwrap(), byte, "byte {}", i);
        }
        assert!(br.read_byte().unwrap_err().is_end_of_stream());
    }

    #[test]
    fn empty_source_test() {
        let mut br = BitReader::new([0_u8; 0].as_slice());
        assert!(br.read_bit().unwrap_err().is_end_of_stream());
        assert_eq!(br.loc(), "[0.0]");
    }
}
