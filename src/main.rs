//Enable more cargo lint tests
#![warn(rust_2018_idioms)]

use std::{
    fs::{self, File},
    io,
    path::Path,
    process::exit,
};

use log::{error, info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use tikv_jemallocator::Jemalloc;

use lzbac::compression::{compress_stream, decompress_stream, with_suffix};
use lzbac::tools::cli::{options_init, Mode, Options, Output};
use lzbac::tools::report::{Listing, Timer};
use lzbac::{Result, Summary};

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

fn main() {
    // Log to stderr so that --stdout output stays clean. The level is set from the command line.
    if let Err(e) = TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Could not start the logger: {}", e);
    }

    let options = match options_init() {
        Ok(options) => options,
        Err(e) => {
            error!("{}", e);
            eprintln!("lzbac: {}", e);
            exit(2);
        }
    };

    let mut failures = 0;
    for file in options.input_files() {
        if let Err(e) = process_file(&options, &file) {
            match options.op_mode {
                Mode::Test => println!("{}: {}", file.display(), e),
                _ => error!("{}: {}", file.display(), e),
            }
            failures += 1;
        }
    }

    info!("Done.\n");
    if failures > 0 {
        exit(1);
    }
}

/// Compress, decompress or test one file according to the options.
fn process_file(options: &Options, input: &Path) -> Result<()> {
    let timer = Timer::start();
    let source = File::open(input)?;
    // Scratch space for the chained pipeline when no output file is written
    let tmp_scratch = with_suffix(input, ".lzw.tmp");

    let summary = match (options.op_mode, options.output) {
        (Mode::Test, _) => {
            decompress_stream(
                options.algorithm,
                &options.lzw,
                source,
                io::sink(),
                &tmp_scratch,
            )?;
            println!("{}: ok", input.display());
            return Ok(());
        }
        (mode, Output::Stdout) => {
            let stdout = io::stdout();
            run(options, mode, source, stdout.lock(), &tmp_scratch)?
        }
        (mode, Output::File) => {
            let output = options.output_path(input);
            let sink = File::create(&output)?;
            match run(options, mode, source, sink, &with_suffix(&output, ".lzw")) {
                Ok(summary) => summary,
                Err(e) => {
                    // Never leave a partial output behind
                    if let Err(rm) = fs::remove_file(&output) {
                        error!("Could not remove {}: {}", output.display(), rm);
                    }
                    return Err(e);
                }
            }
        }
    };

    if options.list {
        let listing = Listing {
            file: input,
            mode: options.op_mode,
            elapsed: timer.elapsed(),
            summary,
        };
        match options.output {
            Output::File => println!("{}", listing),
            Output::Stdout => eprintln!("{}", listing),
        }
    }

    if options.remove_input() {
        fs::remove_file(input)?;
        info!("Removed {}", input.display());
    }
    Ok(())
}

fn run<W: io::Write>(
    options: &Options,
    mode: Mode,
    source: File,
    sink: W,
    scratch: &Path,
) -> Result<Summary> {
    match mode {
        Mode::Decompress | Mode::Test => {
            decompress_stream(options.algorithm, &options.lzw, source, sink, scratch)
        }
        Mode::Compress => compress_stream(options.algorithm, &options.lzw, source, sink, scratch),
    }
}
