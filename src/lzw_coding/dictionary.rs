//! The two views of the LZW dictionary.
//!
//! Every string in the dictionary is one byte longer than a string that is already there, so a string is
//! stored as `(prefix code, last byte)`. Codes 0..=255 are the single bytes and are never stored.
//!
//! The encoder needs string → code, which is a hash lookup on the pair. The decoder needs code → string,
//! which is a table indexed by code; strings are rebuilt by walking the prefix chain backwards.

use rustc_hash::FxHashMap;

/// Highest code of the single-byte strings.
pub const INITIAL_MAX_CODE: u32 = 255;

const NO_PREFIX: u32 = u32::MAX;

/// string → code, as used by the encoder.
#[derive(Debug)]
pub struct EncodeDictionary {
    codes: FxHashMap<(u32, u8), u32>,
    max_code: u32,
}

impl EncodeDictionary {
    pub fn new() -> Self {
        Self {
            codes: FxHashMap::default(),
            max_code: INITIAL_MAX_CODE,
        }
    }

    /// Code of the string `prefix` + `byte`, if present.
    pub fn lookup(&self, prefix: u32, byte: u8) -> Option<u32> {
        self.codes.get(&(prefix, byte)).copied()
    }

    /// Adds `prefix` + `byte` under the next free code and returns that code.
    pub fn insert(&mut self, prefix: u32, byte: u8) -> u32 {
        debug_assert!(prefix <= self.max_code);
        self.max_code += 1;
        self.codes.insert((prefix, byte), self.max_code);
        self.max_code
    }

    /// The most recently assigned code.
    pub fn max_code(&self) -> u32 {
        self.max_code
    }

    /// Back to the 256 single-byte strings. The table keeps its allocation.
    pub fn reset(&mut self) {
        self.codes.clear();
        self.max_code = INITIAL_MAX_CODE;
    }
}

impl Default for EncodeDictionary {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    prefix: u32,
    last: u8,
    first: u8,
    len: u32,
}

/// code → string, as used by the decoder.
#[derive(Debug)]
pub struct DecodeDictionary {
    entries: Vec<Entry>,
}

impl DecodeDictionary {
    pub fn new() -> Self {
        let entries = (0..=INITIAL_MAX_CODE)
            .map(|b| Entry {
                prefix: NO_PREFIX,
                last: b as u8,
                first: b as u8,
                len: 1,
            })
            .collect();
        Self { entries }
    }

    pub fn contains(&self, code: u32) -> bool {
        (code as usize) < self.entries.len()
    }

    pub fn max_code(&self) -> u32 {
        self.entries.len() as u32 - 1
    }

    /// First byte of the string for `code`. The code must be present.
    pub fn first_byte(&self, code: u32) -> u8 {
        self.entries[code as usize].first
    }

    /// Adds the string for `prefix` followed by `byte` under the next free code and returns that code.
    pub fn insert(&mut self, prefix: u32, byte: u8) -> u32 {
        let parent = self.entries[prefix as usize];
        self.entries.push(Entry {
            prefix,
            last: byte,
            first: parent.first,
            len: parent.len + 1,
        });
        self.max_code()
    }

    /// Replaces the contents of `buf` with the string for `code`. The code must be present.
    pub fn write_string(&self, code: u32, buf: &mut Vec<u8>) {
        let len = self.entries[code as usize].len as usize;
        buf.clear();
        buf.resize(len, 0);
        let mut code = code;
        for slot in buf.iter_mut().rev() {
            let entry = self.entries[code as usize];
            *slot = entry.last;
            code = entry.prefix;
        }
    }

    /// Back to the 256 single-byte strings.
    pub fn reset(&mut self) {
        self.entries.truncate(INITIAL_MAX_CODE as usize + 1);
    }
}

impl Default for DecodeDictionary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn encode_dictionary_test() {
        let mut dict = EncodeDictionary::new();
        assert_eq!(dict.max_code(), 255);
        assert_eq!(dict.lookup(b'a' as u32, b'b'), None);
        assert_eq!(dict.insert(b'a' as u32, b'b'), 256);
        assert_eq!(dict.insert(256, b'c'), 257);
        assert_eq!(dict.lookup(b'a' as u32, b'b'), Some(256));
        assert_eq!(dict.lookup(256, b'c'), Some(257));
        assert_eq!(dict.max_code(), 257);

        dict.reset();
        assert_eq!(dict.max_code(), 255);
        assert_eq!(dict.lookup(b'a' as u32, b'b'), None);
        assert_eq!(dict.insert(b'x' as u32, b'y'), 256);
    }

    #[test]
    fn decode_dictionary_test() {
        let mut dict = DecodeDictionary::new();
        let mut buf = Vec::new();
        assert!(dict.contains(255));
        assert!(!dict.contains(256));
        dict.write_string(b'q' as u32, &mut buf);
        assert_eq!(buf, b"q");

        assert_eq!(dict.insert(b'a' as u32, b'b'), 256);
        assert_eq!(dict.insert(256, b'c'), 257);
        assert_eq!(dict.insert(257, b'a'), 258);
        dict.write_string(258, &mut buf);
        assert_eq!(buf, b"abca");
        assert_eq!(dict.first_byte(258), b'a');
        assert_eq!(dict.max_code(), 258);

        dict.reset();
        assert_eq!(dict.max_code(), 255);
        assert!(!dict.contains(256));
    }

    #[test]
    fn both_views_agree_test() {
        let mut enc = EncodeDictionary::new();
        let mut dec = DecodeDictionary::new();
        let mut buf = Vec::new();
        let mut prefix = b'h' as u32;
        for &byte in b"ello there" {
            let code = enc.insert(prefix, byte);
            assert_eq!(dec.insert(prefix, byte), code);
            prefix = code;
        }
        dec.write_string(prefix, &mut buf);
        assert_eq!(buf, b"hello there");
        assert_eq!(enc.max_code(), dec.max_code());
    }
}
