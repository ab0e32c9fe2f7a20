use std::{
    fmt::{Display, Formatter},
    fs,
    path::{Path, PathBuf},
};

use clap::Parser;
use log::{info, warn, LevelFilter};

use crate::compression::{with_suffix, Algorithm};
use crate::error::{CodecError, Result};
use crate::lzw_coding::codec::DEFAULT_MAX_CODE_BITS;
use crate::lzw_coding::LzwConfig;

/// Verbosity of user information
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Warnings,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    /// -q wins over any number of -v.
    fn from_flags(quiet: bool, verbose: u64) -> Self {
        match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, 0) => Verbosity::Warnings,
            (false, 1) => Verbosity::Info,
            (false, 2) => Verbosity::Debug,
            _ => Verbosity::Trace,
        }
    }

    pub fn level_filter(&self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::Off,
            Verbosity::Warnings => LevelFilter::Warn,
            Verbosity::Info => LevelFilter::Info,
            Verbosity::Debug => LevelFilter::Debug,
            Verbosity::Trace => LevelFilter::Trace,
        }
    }
}

/// Compress, Decompress, Test
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Compress,
    Decompress,
    Test,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Define the two output channels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Output {
    File,
    Stdout,
}
impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    name = "lzbac",
    version,
    about = "File compressor using LZW and an adaptive binary arithmetic coder",
    long_about = "
    Each file is compressed with LZW (default), with the adaptive binary arithmetic coder (-1),
    or with LZW followed by the arithmetic coder (-9). Compressed files get the suffix .lzw, .bac
    or .lzw.bac. Decompression must be told the same algorithm that was used to compress.

    Compressed files carry no header, so nothing is checked on decompression."
)]
pub struct Args {
    /// Files to process (directories too with -r)
    #[clap(required = true)]
    files: Vec<PathBuf>,

    /// Send output to the terminal
    #[clap(short = 'c', long = "stdout")]
    stdout: bool,

    /// Perform decompression on the input files
    #[clap(short = 'd', long = "decompress")]
    decompress: bool,

    /// Keep input files
    #[clap(short = 'k', long = "keep")]
    keep: bool,

    /// Print time, sizes and compression ratio for each file
    #[clap(short = 'l', long = "list")]
    list: bool,

    /// Descend into directories
    #[clap(short = 'r', long = "recursive")]
    recursive: bool,

    /// Test compressed file integrity
    #[clap(short = 't', long = "test")]
    test: bool,

    /// Use the arithmetic coder only
    #[clap(short = '1', long = "arifm", conflicts_with = "all")]
    arifm: bool,

    /// Use LZW followed by the arithmetic coder
    #[clap(short = '9', long = "all")]
    all: bool,

    /// Be verbose (a 2nd -v gives more)
    #[clap(short = 'v', long = "verbose", parse(from_occurrences))]
    verbose: u64,

    /// Suppress all log messages
    #[clap(short = 'q', long = "quiet")]
    quiet: bool,

    /// Widest LZW dictionary code in bits; the dictionary resets after 2^N codes
    #[clap(long = "max-code-bits", default_value_t = DEFAULT_MAX_CODE_BITS)]
    max_code_bits: u32,
}

/// Everything the program needs to know to process its files.
#[derive(Debug)]
pub struct Options {
    /// Names of files (or directories) to read for input
    pub files: Vec<PathBuf>,
    /// Compress/Decompress/Test
    pub op_mode: Mode,
    /// Location where output is sent
    pub output: Output,
    /// Codec pipeline
    pub algorithm: Algorithm,
    /// Don't remove input files after processing
    pub keep_input_files: bool,
    /// Print the size and timing listing
    pub list: bool,
    /// Expand directories to the files below them
    pub recursive: bool,
    /// Verbosity of user information
    pub verbosity: Verbosity,
    /// LZW parameters, must match between compression and decompression
    pub lzw: LzwConfig,
}

impl Options {
    /// Put command line information from CLAP into our internal structure.
    pub fn from_args(args: Args) -> Result<Self> {
        let op_mode = if args.test {
            Mode::Test
        } else if args.decompress {
            Mode::Decompress
        } else {
            Mode::Compress
        };
        let algorithm = match (args.arifm, args.all) {
            (true, true) => {
                return Err(CodecError::Config(
                    "-1 and -9 cannot be used together".to_string(),
                ))
            }
            (true, false) => Algorithm::Bac,
            (false, true) => Algorithm::LzwBac,
            (false, false) => Algorithm::Lzw,
        };
        let lzw = LzwConfig::new(args.max_code_bits)?;

        Ok(Self {
            files: args.files,
            op_mode,
            output: if args.stdout {
                Output::Stdout
            } else {
                Output::File
            },
            algorithm,
            keep_input_files: args.keep,
            list: args.list,
            recursive: args.recursive,
            verbosity: Verbosity::from_flags(args.quiet, args.verbose),
            lzw,
        })
    }

    /// True when the input file should be deleted after it was processed successfully.
    pub fn remove_input(&self) -> bool {
        !self.keep_input_files && self.output == Output::File && self.op_mode != Mode::Test
    }

    /// Name of the file written for `input`.
    /// Compression appends the algorithm's suffix. Decompression strips it, or appends `.res` when the
    /// input does not carry it.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let suffix = format!(".{}", self.algorithm.extension());
        match self.op_mode {
            Mode::Compress => with_suffix(input, &suffix),
            Mode::Decompress | Mode::Test => {
                let name = input.as_os_str().to_string_lossy();
                match name.strip_suffix(suffix.as_str()) {
                    Some(stem) if !stem.is_empty() && !stem.ends_with(std::path::MAIN_SEPARATOR) => {
                        PathBuf::from(stem)
                    }
                    _ => with_suffix(input, ".res"),
                }
            }
        }
    }

    /// The files to process, in command line order, with directories expanded when `recursive` is set.
    /// Directories without `recursive` are skipped with a warning.
    pub fn input_files(&self) -> Vec<PathBuf> {
        let mut found = Vec::new();
        for path in &self.files {
            if path.is_dir() {
                if self.recursive {
                    if let Err(e) = collect_files(path, &mut found) {
                        warn!("Could not read directory {}: {}", path.display(), e);
                    }
                } else {
                    warn!("{} is a directory, skipping it (use -r)", path.display());
                }
            } else {
                // Missing files are reported when they are opened
                found.push(path.clone());
            }
        }
        found
    }
}

/// Depth first, entries sorted by name.
fn collect_files(dir: &Path, found: &mut Vec<PathBuf>) -> std::io::Result<()> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();
    for path in entries {
        if path.is_dir() {
            collect_files(&path, found)?;
        } else if path.is_file() {
            found.push(path);
        }
    }
    Ok(())
}

/// Parse the command line and set the log level.
pub fn options_init() -> Result<Options> {
    let options = Options::from_args(Args::parse())?;
    log::set_max_level(options.verbosity.level_filter());

    info!("---- lzbac {} ----", env!("CARGO_PKG_VERSION"));
    info!("Mode: {}, output: {}", options.op_mode, options.output);
    info!("Algorithm: {}", options.algorithm);
    info!("LZW code width cap: {} bits", options.lzw.max_code_bits);
    Ok(options)
}
