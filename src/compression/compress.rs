use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use log::info;

use super::{with_suffix, Algorithm, ScratchFile};
use crate::error::Result;
use crate::lzw_coding::LzwConfig;
use crate::{arithmetic_coding, lzw_coding, Summary};

/// Compress `source` into `sink`. `scratch` names the intermediate file of the chained pipeline and is
/// not touched by the single-codec pipelines.
pub fn compress_stream<R: Read, W: Write>(
    algorithm: Algorithm,
    config: &LzwConfig,
    source: R,
    sink: W,
    scratch: &Path,
) -> Result<Summary> {
    match algorithm {
        Algorithm::Lzw => lzw_coding::compress(source, sink, config),
        Algorithm::Bac => arithmetic_coding::compress(source, sink),
        Algorithm::LzwBac => {
            let (scratch, file) = ScratchFile::create(scratch)?;
            let first = lzw_coding::compress(source, file, config)?;
            let second = arithmetic_coding::compress(File::open(scratch.path())?, sink)?;
            info!(
                "LZW+BAC: {} bytes, {} after LZW, {} after BAC",
                first.bytes_in, first.bytes_out, second.bytes_out
            );
            Ok(Summary {
                bytes_in: first.bytes_in,
                bytes_out: second.bytes_out,
            })
        }
    }
}

/// Compress the file `input` into the file `output`. The chained pipeline uses `<output>.lzw` as its
/// scratch file.
pub fn compress(
    algorithm: Algorithm,
    config: &LzwConfig,
    input: &Path,
    output: &Path,
) -> Result<Summary> {
    info!(
        "Compressing {} to {} with {}",
        input.display(),
        output.display(),
        algorithm
    );
    let source = File::open(input)?;
    let sink = File::create(output)?;
    compress_stream(algorithm, config, source, sink, &with_suffix(output, ".lzw"))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::arithmetic_coding;
    use crate::compression::decompress::decompress_stream;
    use crate::compression::test_files::temp_path;
    use crate::test_data::{pseudo_random, text_like};

    const ALL: [Algorithm; 3] = [Algorithm::Lzw, Algorithm::Bac, Algorithm::LzwBac];

    fn round_trip(algorithm: Algorithm, data: &[u8], name: &str) {
        let config = LzwConfig::default();
        let scratch = temp_path(name);
        let mut packed = Vec::new();
        let summary = compress_stream(algorithm, &config, data, &mut packed, &scratch).unwrap();
        assert_eq!(summary.bytes_in, data.len() as u64);
        assert_eq!(summary.bytes_out, packed.len() as u64);
        assert!(!scratch.exists());

        let mut unpacked = Vec::new();
        decompress_stream(algorithm, &config, packed.as_slice(), &mut unpacked, &scratch).unwrap();
        assert_eq!(unpacked, data, "{} round trip", algorithm);
        assert!(!scratch.exists());
    }

    #[test]
    fn empty_round_trip_test() {
        for algorithm in ALL {
            round_trip(algorithm, &[], "empty");
        }
    }

    #[test]
    fn single_byte_round_trip_test() {
        for algorithm in ALL {
            round_trip(algorithm, b"x", "single");
        }
    }

    #[test]
    fn repetitive_round_trip_test() {
        for algorithm in ALL {
            round_trip(algorithm, b"AAAAAAAAAA", "repeat10");
            round_trip(algorithm, &vec![b'z'; 70_000], "repeat70k");
        }
    }

    #[test]
    fn cycle_round_trip_test() {
        let data: Vec<u8> = (0..300).map(|i| i as u8).collect();
        for algorithm in ALL {
            round_trip(algorithm, &data, "cycle");
        }
    }

    #[test]
    fn random_round_trip_test() {
        let data = pseudo_random(40_000, 12);
        for algorithm in ALL {
            round_trip(algorithm, &data, "random");
        }
    }

    #[test]
    fn text_round_trip_test() {
        let data = text_like(80_000, 13);
        for algorithm in ALL {
            round_trip(algorithm, &data, "text");
        }
    }

    #[test]
    fn chained_is_lzw_then_bac_test() {
        let config = LzwConfig::default();
        let data = text_like(10_000, 5);

        let mut lzw = Vec::new();
        lzw_coding::compress(data.as_slice(), &mut lzw, &config).unwrap();
        let mut by_hand = Vec::new();
        arithmetic_coding::compress(lzw.as_slice(), &mut by_hand).unwrap();

        let mut chained = Vec::new();
        let scratch = temp_path("chained-by-hand");
        compress_stream(Algorithm::LzwBac, &config, data.as_slice(), &mut chained, &scratch).unwrap();
        assert_eq!(chained, by_hand);

        // And back by hand: BAC first, then LZW
        let mut lzw_again = Vec::new();
        arithmetic_coding::decompress(chained.as_slice(), &mut lzw_again).unwrap();
        assert_eq!(lzw_again, lzw);
        let mut unpacked = Vec::new();
        lzw_coding::decompress(lzw_again.as_slice(), &mut unpacked, &config).unwrap();
        assert_eq!(unpacked, data);
    }

    #[test]
    fn file_round_trip_test() {
        let config = LzwConfig::default();
        let data = text_like(25_000, 6);
        for algorithm in ALL {
            let input = temp_path(&format!("file-{}.txt", algorithm.extension()));
            let packed = with_suffix(&input, &format!(".{}", algorithm.extension()));
            let restored = with_suffix(&input, ".res");
            std::fs::write(&input, &data).unwrap();

            compress(algorithm, &config, &input, &packed).unwrap();
            assert!(!with_suffix(&packed, ".lzw").exists());
            crate::compression::decompress(algorithm, &config, &packed, &restored).unwrap();
            assert_eq!(std::fs::read(&restored).unwrap(), data);

            for path in [&input, &packed, &restored] {
                std::fs::remove_file(path).unwrap();
            }
        }
    }

    #[test]
    fn missing_input_test() {
        let config = LzwConfig::default();
        let input = temp_path("does-not-exist");
        let output = temp_path("does-not-exist.lzw");
        let err = compress(Algorithm::Lzw, &config, &input, &output).unwrap_err();
        assert!(matches!(err, crate::CodecError::Io(_)));
        assert!(!output.exists());
    }
}
