//! Compile a root script into one self-contained script.
//!
//! Orchestrates the path checks, the inclusion engine and the scratch buffer:
//! output is staged in a temp file and only copied to the destination once
//! expansion has fully succeeded.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, instrument};

use crate::core::markers::runtime_declaration;
use crate::expand::{DirectiveWarning, expand_root};
use crate::io::config::{ShpackConfig, validate_runtime};
use crate::io::scratch::ScratchBuffer;
use crate::io::source::FsLoader;
use crate::io::validator::{Predicate, validate};

/// A destination that exists and is readable is only replaced with `--force`.
const COLLISION_CHECKS: [Predicate; 2] = [Predicate::Exists, Predicate::Readable];

/// Resolved settings for one compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Output file name; only its final component is used.
    pub output_name: Option<String>,
    pub runtime: String,
    pub force: bool,
    /// Checks the input must pass before expansion starts.
    pub input_checks: Vec<Predicate>,
}

impl CompileOptions {
    /// Options for `input` with every other setting taken from `config`.
    pub fn from_config(input: impl Into<PathBuf>, config: &ShpackConfig) -> Result<Self> {
        Ok(Self {
            input: input.into(),
            output_dir: config.output_dir.clone(),
            output_name: None,
            runtime: config.runtime.clone(),
            force: false,
            input_checks: config.input_predicates()?,
        })
    }
}

/// The destination exists and `--force` was not given.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} already exists (use --force to overwrite)", path.display())]
pub struct DestinationExists {
    pub path: PathBuf,
}

/// Summary of a successful compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileReport {
    pub destination: PathBuf,
    /// Canonical paths inlined, root first.
    pub included: Vec<PathBuf>,
    pub warnings: Vec<DirectiveWarning>,
}

/// Destination path: `output_dir` joined with the output name, or with the
/// input's base name when no name was given.
pub fn resolve_destination(
    output_dir: &Path,
    input: &Path,
    output_name: Option<&str>,
) -> Result<PathBuf> {
    let name = match output_name {
        Some(name) => Path::new(name)
            .file_name()
            .ok_or_else(|| anyhow!("invalid output name '{name}'"))?,
        None => input
            .file_name()
            .ok_or_else(|| anyhow!("input {} has no file name", input.display()))?,
    };
    Ok(output_dir.join(name))
}

/// Compile `options.input` and write the result to its destination.
///
/// Nothing is written to the destination unless the whole expansion
/// succeeds; the scratch file is removed on every exit path.
#[instrument(skip_all, fields(input = %options.input.display()))]
pub fn compile(options: &CompileOptions) -> Result<CompileReport> {
    let mut scratch = ScratchBuffer::create()?;

    validate(&options.input, &options.input_checks)?;
    validate_runtime(&options.runtime)?;
    let destination = resolve_destination(
        &options.output_dir,
        &options.input,
        options.output_name.as_deref(),
    )?;
    if !options.force && validate(&destination, &COLLISION_CHECKS).is_ok() {
        return Err(DestinationExists { path: destination }.into());
    }

    let expansion = expand_root(&FsLoader, &options.input)?;

    scratch.write_line(runtime_declaration(&options.runtime).as_bytes())?;
    for line in &expansion.lines {
        scratch.write_line(line)?;
    }
    debug!(
        scratch = %scratch.path().display(),
        lines = scratch.lines_written(),
        "staged output"
    );

    fs::create_dir_all(&options.output_dir)
        .with_context(|| format!("create {}", options.output_dir.display()))?;
    scratch.commit(&destination)?;
    make_executable(&destination)?;

    info!(
        destination = %destination.display(),
        files = expansion.included.len(),
        warnings = expansion.warnings.len(),
        "compiled"
    );
    Ok(CompileReport {
        destination,
        included: expansion.included,
        warnings: expansion.warnings,
    })
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("chmod {}", path.display()))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
