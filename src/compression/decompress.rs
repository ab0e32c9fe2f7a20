use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use log::info;

use super::{with_suffix, Algorithm, ScratchFile};
use crate::error::Result;
use crate::lzw_coding::LzwConfig;
use crate::{arithmetic_coding, lzw_coding, Summary};

/// Decompress `source` into `sink`, undoing `compress_stream` with the same algorithm and config.
/// `scratch` names the intermediate file of the chained pipeline.
pub fn decompress_stream<R: Read, W: Write>(
    algorithm: Algorithm,
    config: &LzwConfig,
    source: R,
    sink: W,
    scratch: &Path,
) -> Result<Summary> {
    match algorithm {
        Algorithm::Lzw => lzw_coding::decompress(source, sink, config),
        Algorithm::Bac => arithmetic_coding::decompress(source, sink),
        Algorithm::LzwBac => {
            let (scratch, file) = ScratchFile::create(scratch)?;
            let first = arithmetic_coding::decompress(source, file)?;
            let second = lzw_coding::decompress(File::open(scratch.path())?, sink, config)?;
            info!(
                "LZW+BAC: {} bytes, {} after BAC, {} after LZW",
                first.bytes_in, first.bytes_out, second.bytes_out
            );
            Ok(Summary {
                bytes_in: first.bytes_in,
                bytes_out: second.bytes_out,
            })
        }
    }
}

/// Decompress the file `input` into the file `output`. The chained pipeline uses `<output>.lzw` as its
/// scratch file.
pub fn decompress(
    algorithm: Algorithm,
    config: &LzwConfig,
    input: &Path,
    output: &Path,
) -> Result<Summary> {
    info!(
        "Decompressing {} to {} with {}",
        input.display(),
        output.display(),
        algorithm
    );
    let source = File::open(input)?;
    let sink = File::create(output)?;
    decompress_stream(algorithm, config, source, sink, &with_suffix(output, ".lzw"))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compression::test_files::temp_path;

    #[test]
    fn chained_failure_removes_scratch_test() {
        // An empty file is not a valid arithmetic coded stream
        let scratch = temp_path("failing-chain");
        let mut unpacked = Vec::new();
        let err = decompress_stream(
            Algorithm::LzwBac,
            &LzwConfig::default(),
            [0_u8; 0].as_slice(),
            &mut unpacked,
            &scratch,
        )
        .unwrap_err();
        assert!(err.is_end_of_stream());
        assert!(!scratch.exists());
        assert!(unpacked.is_empty());
    }

    #[test]
    fn empty_lzw_file_test() {
        let input = temp_path("empty.lzw");
        let output = temp_path("empty.res");
        std::fs::write(&input, b"").unwrap();
        let summary = decompress(Algorithm::Lzw, &LzwConfig::default(), &input, &output).unwrap();
        assert_eq!(summary.bytes_out, 0);
        assert_eq!(std::fs::read(&output).unwrap(), b"");
        std::fs::remove_file(&input).unwrap();
        std::fs::remove_file(&output).unwrap();
    }

    #[test]
    fn chained_keeps_existing_lzw_file_test() {
        let config = LzwConfig::default();
        let data = crate::test_data::text_like(5_000, 3);
        let input = temp_path("kept.txt");
        let packed = with_suffix(&input, ".lzw.bac");
        // The same name the chained pipeline would pick for its scratch file on the way back
        let users_lzw = with_suffix(&input, ".lzw");
        let packed_lzw = with_suffix(&packed, ".lzw");
        std::fs::write(&input, &data).unwrap();
        std::fs::write(&users_lzw, b"an LZW archive made earlier").unwrap();
        std::fs::write(&packed_lzw, b"another one").unwrap();

        crate::compression::compress(Algorithm::LzwBac, &config, &input, &packed).unwrap();
        assert_eq!(std::fs::read(&packed_lzw).unwrap(), b"another one");

        std::fs::remove_file(&input).unwrap();
        decompress(Algorithm::LzwBac, &config, &packed, &input).unwrap();
        assert_eq!(std::fs::read(&input).unwrap(), data);
        assert_eq!(std::fs::read(&users_lzw).unwrap(), b"an LZW archive made earlier");

        for path in [&input, &packed, &users_lzw, &packed_lzw] {
            std::fs::remove_file(path).unwrap();
        }
    }
}
