//! Adaptive order-0 frequency model for the arithmetic coder.
//!
//! The model keeps a cumulative count table over 258 entries: 256 byte values, the end-of-stream symbol,
//! and the closing total. Symbol `s` owns the half-open interval `[cumulative[s], cumulative[s + 1])`.
//! Every symbol starts with a count of one, so the initial table is the ramp `0, 1, 2, ... 257`.
//!
//! After each symbol is coded its count goes up by one. Once the total reaches `MAX_FREQUENCY` the table
//! freezes, which keeps `range * count` inside the coder's integer width.

use log::debug;

use crate::error::{CodecError, Result};

/// Number of codable symbols: every byte value plus the end-of-stream sentinel.
pub const SYMBOL_COUNT: usize = 257;
/// The end-of-stream sentinel.
pub const EOF_SYMBOL: u32 = 256;
pub const FREQUENCY_BITS: u32 = 15;
/// The table stops adapting when its total reaches this value, so the total stays below 2^15.
pub const MAX_FREQUENCY: u32 = (1 << FREQUENCY_BITS) - 1;

/// The interval of one symbol, scaled by the model total at the moment it was coded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Probability {
    pub low: u32,
    pub high: u32,
    pub count: u32,
}

#[derive(Clone, Debug)]
pub struct FrequencyModel {
    cumulative: [u32; SYMBOL_COUNT + 1],
    frozen: bool,
}

impl FrequencyModel {
    /// A fresh model with every symbol at frequency one.
    pub fn new() -> Self {
        let mut cumulative = [0_u32; SYMBOL_COUNT + 1];
        cumulative
            .iter_mut()
            .enumerate()
            .for_each(|(i, c)| *c = i as u32);
        Self {
            cumulative,
            frozen: false,
        }
    }

    /// Restore the initial ramp and let the table adapt again.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Bump the count of `symbol` by one, unless the table is frozen.
    fn update(&mut self, symbol: usize) {
        if self.frozen {
            return;
        }
        self.cumulative[symbol + 1..]
            .iter_mut()
            .for_each(|c| *c += 1);
        if self.cumulative[SYMBOL_COUNT] >= MAX_FREQUENCY {
            debug!("Frequency model frozen at total {}", self.cumulative[SYMBOL_COUNT]);
            self.frozen = true;
        }
    }

    fn interval(&self, symbol: usize) -> Probability {
        Probability {
            low: self.cumulative[symbol],
            high: self.cumulative[symbol + 1],
            count: self.cumulative[SYMBOL_COUNT],
        }
    }

    /// Returns the current interval of `symbol` (0..=256), then updates the table.
    pub fn probability(&mut self, symbol: u32) -> Result<Probability> {
        if symbol > EOF_SYMBOL {
            return Err(CodecError::InvalidSymbol(symbol));
        }
        let symbol = symbol as usize;
        let prob = self.interval(symbol);
        self.update(symbol);
        Ok(prob)
    }

    /// Finds the first symbol whose upper bound exceeds `scaled`, returns it with its interval, then
    /// updates the table.
    pub fn symbol_for(&mut self, scaled: u32) -> Result<(u32, Probability)> {
        let symbol = (0..SYMBOL_COUNT)
            .find(|&i| scaled < self.cumulative[i + 1])
            .ok_or(CodecError::InvariantViolation {
                scaled,
                total: self.total(),
            })?;
        let prob = self.interval(symbol);
        self.update(symbol);
        Ok((symbol as u32, prob))
    }

    /// Total count, the upper bound of the end-of-stream symbol.
    pub fn total(&self) -> u32 {
        self.cumulative[SYMBOL_COUNT]
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    #[cfg(test)]
    pub(crate) fn cumulative(&self) -> &[u32] {
        &self.cumulative
    }
}

impl Default for FrequencyModel {
    fn default() -> Self {
        Self::new()
    }
}
