//! Access to script sources on disk.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Source access used by the inclusion engine.
pub trait SourceLoader {
    /// Resolve `path` to the canonical absolute form used as a visit key.
    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;

    /// Read the raw lines of a canonical path, without `\n` terminators.
    fn read_lines(&self, path: &Path) -> Result<Vec<Vec<u8>>>;
}

/// Reads sources from the local filesystem.
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        fs::canonicalize(path).with_context(|| format!("resolve {}", path.display()))
    }

    fn read_lines(&self, path: &Path) -> Result<Vec<Vec<u8>>> {
        let contents = fs::read(path).with_context(|| format!("read {}", path.display()))?;
        Ok(split_lines(&contents))
    }
}

/// Split on `\n`, keeping every other byte (including `\r`) in place.
///
/// A trailing newline does not produce an extra empty line.
pub fn split_lines(contents: &[u8]) -> Vec<Vec<u8>> {
    if contents.is_empty() {
        return Vec::new();
    }
    let body = contents.strip_suffix(b"\n").unwrap_or(contents);
    body.split(|&byte| byte == b'\n').map(<[u8]>::to_vec).collect()
}
