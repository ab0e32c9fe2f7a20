use std::{
    fmt::{Display, Formatter},
    path::Path,
    time::{Duration, Instant},
};

use crate::tools::cli::Mode;
use crate::Summary;

/// Wall clock time of one file.
#[derive(Debug)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Uncompressed size over compressed size. Zero when there is no compressed size.
pub fn ratio(uncompressed: u64, compressed: u64) -> f64 {
    if compressed == 0 {
        return 0.0;
    }
    uncompressed as f64 / compressed as f64
}

/// The per file report printed with --list.
pub struct Listing<'a> {
    pub file: &'a Path,
    pub mode: Mode,
    pub elapsed: Duration,
    pub summary: Summary,
}

impl Display for Listing<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Processing {}(sec): {:.3}",
            self.file.display(),
            self.elapsed.as_secs_f64()
        )?;
        writeln!(
            f,
            "Size of file '{}'(bytes): {}",
            self.file.display(),
            self.summary.bytes_in
        )?;
        let (verb, uncompressed, compressed) = match self.mode {
            Mode::Compress => ("compressing", self.summary.bytes_in, self.summary.bytes_out),
            Mode::Decompress | Mode::Test => (
                "decompressing",
                self.summary.bytes_out,
                self.summary.bytes_in,
            ),
        };
        writeln!(f, "After {}(bytes): {}", verb, self.summary.bytes_out)?;
        writeln!(f, "Compression ratio: {:.3}", ratio(uncompressed, compressed))
    }
}
