//! Ordered path checks in the style of `test(1)` flags.

use std::fs::{self, File};
#[cfg(not(unix))]
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};

use crate::exit_codes;

/// A single named check against a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    Exists,
    Readable,
    RegularFile,
    Directory,
    NonEmpty,
    Writable,
    Executable,
}

impl Predicate {
    pub fn from_flag(flag: char) -> Option<Self> {
        match flag {
            'e' => Some(Self::Exists),
            'r' => Some(Self::Readable),
            'f' => Some(Self::RegularFile),
            'd' => Some(Self::Directory),
            's' => Some(Self::NonEmpty),
            'w' => Some(Self::Writable),
            'x' => Some(Self::Executable),
            _ => None,
        }
    }

    fn check(self, path: &Path) -> Result<(), PathCheckFailure> {
        let path_buf = || path.to_path_buf();
        let ok = match self {
            Self::Exists => path.exists(),
            Self::Readable => is_readable(path),
            Self::RegularFile => path.is_file(),
            Self::Directory => path.is_dir(),
            Self::NonEmpty => fs::metadata(path).is_ok_and(|meta| meta.len() > 0),
            Self::Writable => is_writable(path),
            Self::Executable => is_executable(path),
        };
        if ok {
            return Ok(());
        }
        Err(match self {
            Self::Exists => PathCheckFailure::Missing(path_buf()),
            Self::Readable => PathCheckFailure::NotReadable(path_buf()),
            Self::RegularFile => PathCheckFailure::NotRegularFile(path_buf()),
            Self::Directory => PathCheckFailure::NotDirectory(path_buf()),
            Self::NonEmpty => PathCheckFailure::Empty(path_buf()),
            Self::Writable => PathCheckFailure::NotWritable(path_buf()),
            Self::Executable => PathCheckFailure::NotExecutable(path_buf()),
        })
    }
}

/// Parse a flag string such as `"er"` into predicates, preserving order.
pub fn parse_predicates(flags: &str) -> Result<Vec<Predicate>> {
    flags
        .chars()
        .map(|flag| {
            Predicate::from_flag(flag)
                .ok_or_else(|| anyhow!("unknown path check '{flag}' in '{flags}'"))
        })
        .collect()
}

/// First failed check for a path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathCheckFailure {
    #[error("no input path given")]
    NoInput,
    #[error("{} does not exist", .0.display())]
    Missing(PathBuf),
    #[error("{} is not readable", .0.display())]
    NotReadable(PathBuf),
    #[error("{} is not a regular file", .0.display())]
    NotRegularFile(PathBuf),
    #[error("{} is not a directory", .0.display())]
    NotDirectory(PathBuf),
    #[error("{} is empty", .0.display())]
    Empty(PathBuf),
    #[error("{} is not writable", .0.display())]
    NotWritable(PathBuf),
    #[error("{} is not executable", .0.display())]
    NotExecutable(PathBuf),
}

impl PathCheckFailure {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoInput => exit_codes::INVALID,
            Self::Missing(_) => exit_codes::NOT_FOUND,
            Self::NotReadable(_) => exit_codes::NOT_READABLE,
            Self::NotRegularFile(_) | Self::NotDirectory(_) => exit_codes::WRONG_KIND,
            Self::Empty(_) => exit_codes::EMPTY,
            Self::NotWritable(_) => exit_codes::NOT_WRITABLE,
            Self::NotExecutable(_) => exit_codes::NOT_EXECUTABLE,
        }
    }
}

/// Run `predicates` against `path` in order, stopping at the first failure.
///
/// An empty path fails with [`PathCheckFailure::NoInput`] before any check runs.
pub fn validate(path: &Path, predicates: &[Predicate]) -> Result<(), PathCheckFailure> {
    if path.as_os_str().is_empty() {
        return Err(PathCheckFailure::NoInput);
    }
    predicates
        .iter()
        .try_for_each(|predicate| predicate.check(path))
}

fn is_readable(path: &Path) -> bool {
    if path.is_dir() {
        return fs::read_dir(path).is_ok();
    }
    File::open(path).is_ok()
}

/// Write permission for the calling process, judged by the kernel against
/// the effective ids.
#[cfg(unix)]
fn is_writable(path: &Path) -> bool {
    has_access(path, rustix::fs::Access::WRITE_OK)
}

#[cfg(not(unix))]
fn is_writable(path: &Path) -> bool {
    if path.is_dir() {
        return fs::metadata(path).is_ok_and(|meta| !meta.permissions().readonly());
    }
    // No truncate/create: opening for write leaves the file untouched.
    OpenOptions::new().write(true).open(path).is_ok()
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    has_access(path, rustix::fs::Access::EXEC_OK)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.exists()
}

#[cfg(unix)]
fn has_access(path: &Path, access: rustix::fs::Access) -> bool {
    use rustix::fs::{AtFlags, CWD, accessat};
    accessat(CWD, path, access, AtFlags::EACCESS).is_ok()
}
