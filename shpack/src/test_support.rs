//! Test-only helpers for building script fixtures.

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tempfile::TempDir;

use crate::io::source::{SourceLoader, split_lines};

/// In-memory [`SourceLoader`] keyed by absolute path.
///
/// Canonicalization is lexical (`.` and `..` folded), and fails for paths
/// that were never added.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file at an absolute path.
    pub fn with_file(mut self, path: &str, contents: impl AsRef<[u8]>) -> Self {
        self.files
            .insert(normalize(Path::new(path)), contents.as_ref().to_vec());
        self
    }
}

impl SourceLoader for MemoryLoader {
    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        let normalized = normalize(path);
        if self.files.contains_key(&normalized) {
            Ok(normalized)
        } else {
            Err(anyhow!("no such file {}", path.display()))
        }
    }

    fn read_lines(&self, path: &Path) -> Result<Vec<Vec<u8>>> {
        let contents = self
            .files
            .get(path)
            .ok_or_else(|| anyhow!("no such file {}", path.display()))?;
        Ok(split_lines(contents))
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Temporary directory of scripts, used as the working directory of a compile.
pub struct ScriptDir {
    temp: TempDir,
}

impl ScriptDir {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create tempdir")?;
        Ok(Self { temp })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Write `contents` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, contents: impl AsRef<[u8]>) -> Result<PathBuf> {
        let path = self.temp.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(&path, contents.as_ref()).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    pub fn read(&self, rel: &str) -> Result<String> {
        let path = self.temp.path().join(rel);
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))
    }

    pub fn read_bytes(&self, rel: &str) -> Result<Vec<u8>> {
        let path = self.temp.path().join(rel);
        fs::read(&path).with_context(|| format!("read {}", path.display()))
    }
}

/// Two-line import directive using the namespaced marker.
pub fn import(rel: &str) -> String {
    format!("# shpack:import {rel}\nsource \"$(dirname \"$0\")/{rel}\"\n")
}
