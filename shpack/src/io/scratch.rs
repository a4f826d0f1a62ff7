//! Scratch file holding compiled output until it is committed.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

/// Staging area for one compile.
///
/// The backing temp file is removed when the buffer is dropped, so every exit
/// path of a compile (success, `?` propagation, panic unwind) cleans it up.
/// No signal handler is installed: a process killed by SIGINT or SIGTERM
/// leaves the `.shpack-*.sh` file behind in the temp dir.
pub struct ScratchBuffer {
    writer: BufWriter<NamedTempFile>,
    lines: usize,
}

impl ScratchBuffer {
    pub fn create() -> Result<Self> {
        let file = tempfile::Builder::new()
            .prefix(".shpack-")
            .suffix(".sh")
            .tempfile()
            .context("create scratch file")?;
        Ok(Self {
            writer: BufWriter::new(file),
            lines: 0,
        })
    }

    pub fn path(&self) -> &Path {
        self.writer.get_ref().path()
    }

    pub fn lines_written(&self) -> usize {
        self.lines
    }

    /// Append `line` as raw bytes followed by `\n`.
    pub fn write_line(&mut self, line: &[u8]) -> Result<()> {
        self.writer
            .write_all(line)
            .and_then(|()| self.writer.write_all(b"\n"))
            .context("write scratch file")?;
        self.lines += 1;
        Ok(())
    }

    /// Flush and copy the staged output to `destination`, replacing it.
    ///
    /// The scratch file itself is removed when this returns.
    pub fn commit(self, destination: &Path) -> Result<()> {
        let file = self
            .writer
            .into_inner()
            .map_err(|err| err.into_error())
            .context("flush scratch file")?;
        fs::copy(file.path(), destination)
            .with_context(|| format!("write {}", destination.display()))?;
        Ok(())
    }
}
