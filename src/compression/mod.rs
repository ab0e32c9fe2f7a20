//! The compression module sequences the codecs.
//!
//! Three pipelines are available:
//! - LZW: dictionary substitution only.
//! - BAC: the adaptive binary arithmetic coder only.
//! - LZW + BAC: LZW first, then the arithmetic coder over the LZW output.
//!
//! Decompression runs the same stages in reverse order.
//!
//! The chained pipeline passes the LZW stream between stages through a scratch file whose path the
//! caller chooses. The file is removed when the stage pair finishes, whether it succeeded or not.
//!

pub mod compress;
pub mod decompress;

use std::{
    ffi::OsString,
    fmt::{Display, Formatter},
    fs::{self, File, OpenOptions},
    io::ErrorKind,
    path::{Path, PathBuf},
};

use log::{trace, warn};

use crate::error::Result;

pub use compress::{compress, compress_stream};
pub use decompress::{decompress, decompress_stream};

/// Which codecs to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    Lzw,
    Bac,
    LzwBac,
}

impl Algorithm {
    /// File name suffix for the compressed output, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Algorithm::Lzw => "lzw",
            Algorithm::Bac => "bac",
            Algorithm::LzwBac => "lzw.bac",
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::Lzw => write!(f, "LZW"),
            Algorithm::Bac => write!(f, "BAC"),
            Algorithm::LzwBac => write!(f, "LZW+BAC"),
        }
    }
}

/// `path` with `suffix` appended to its file name, e.g. `a.txt` + `.lzw` gives `a.txt.lzw`.
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Gives up looking for a free scratch name after this many tries.
const SCRATCH_ATTEMPTS: u32 = 100;

/// Owns the intermediate file of a chained run and deletes it when dropped.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    /// Creates a new empty file at `preferred`. If something already lives there it is left alone and
    /// the file gets a unique name next to it instead.
    pub fn create(preferred: &Path) -> Result<(Self, File)> {
        let mut path = preferred.to_path_buf();
        let mut attempt = 0;
        loop {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    trace!("Scratch file {}", path.display());
                    return Ok((Self { path }, file));
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists && attempt < SCRATCH_ATTEMPTS => {
                    attempt += 1;
                    path = with_suffix(preferred, &format!(".{}.{}", std::process::id(), attempt));
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => trace!("Removed scratch file {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Could not remove {}: {}", self.path.display(), e),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_files {
    use std::path::PathBuf;

    /// A path in the system temp dir that is unique to this process and `name`.
    pub(crate) fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lzbac-test-{}-{}", std::process::id(), name))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compression::test_files::temp_path;
    use std::io::Write;

    #[test]
    fn with_suffix_test() {
        assert_eq!(
            with_suffix(Path::new("dir/a.txt"), ".lzw"),
            PathBuf::from("dir/a.txt.lzw")
        );
        assert_eq!(
            with_suffix(Path::new("a"), ".lzw.bac"),
            PathBuf::from("a.lzw.bac")
        );
    }

    #[test]
    fn extension_test() {
        assert_eq!(Algorithm::Lzw.extension(), "lzw");
        assert_eq!(Algorithm::Bac.extension(), "bac");
        assert_eq!(Algorithm::LzwBac.extension(), "lzw.bac");
        assert_eq!(Algorithm::LzwBac.to_string(), "LZW+BAC");
    }

    #[test]
    fn scratch_file_removed_on_drop() {
        let path = temp_path("scratch-drop");
        {
            let (scratch, mut file) = ScratchFile::create(&path).unwrap();
            assert_eq!(scratch.path(), path.as_path());
            file.write_all(b"intermediate").unwrap();
            assert!(path.exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn scratch_file_leaves_existing_file_alone() {
        let path = temp_path("scratch-taken");
        fs::write(&path, b"somebody else's file").unwrap();
        let other;
        {
            let (scratch, mut file) = ScratchFile::create(&path).unwrap();
            assert_ne!(scratch.path(), path.as_path());
            file.write_all(b"intermediate").unwrap();
            other = scratch.path().to_path_buf();
            assert!(other.exists());
        }
        assert!(!other.exists());
        assert_eq!(fs::read(&path).unwrap(), b"somebody else's file");
        fs::remove_file(&path).unwrap();
    }
}
