//! Recursive inclusion engine.
//!
//! Expansion walks a script depth-first. Plain lines are copied, shebang and
//! blank lines dropped, and every import directive is replaced by the
//! expanded content of the file it names, bracketed by boundary comments.
//! A canonical path is recorded in the [`VisitedSet`] before its content is
//! expanded, so a second import of the same file (a diamond or a cycle)
//! collapses into a single placeholder comment.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, instrument, warn};

use crate::core::classifier::{Directive, Entry, LoadStatement, entries};
use crate::core::markers::{already_included, end_boundary, start_boundary};
use crate::core::visited::VisitedSet;
use crate::io::source::SourceLoader;

/// An import annotation that was not followed by a load statement.
///
/// The import is still honoured; this only records that the source looked off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveWarning {
    /// File containing the annotation.
    pub file: PathBuf,
    /// 1-based line of the annotation.
    pub line: usize,
    /// Path named by the annotation.
    pub path: String,
    /// The line found where the load statement was expected, if any.
    pub found: Option<String>,
}

impl fmt::Display for DirectiveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: import of '{}' is not followed by a load statement",
            self.file.display(),
            self.line,
            self.path
        )?;
        match &self.found {
            Some(found) => write!(f, " (found '{found}')"),
            None => write!(f, " (end of file)"),
        }
    }
}

/// Result of expanding a root script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// Flattened output lines as raw bytes, without the runtime declaration.
    pub lines: Vec<Vec<u8>>,
    /// Canonical paths inlined, root first, in first-seen order.
    pub included: Vec<PathBuf>,
    pub warnings: Vec<DirectiveWarning>,
}

/// Per-compile expansion state.
pub struct Expander<'a, L> {
    loader: &'a L,
    visited: VisitedSet,
    warnings: Vec<DirectiveWarning>,
}

impl<'a, L: SourceLoader> Expander<'a, L> {
    pub fn new(loader: &'a L) -> Self {
        Self {
            loader,
            visited: VisitedSet::new(),
            warnings: Vec::new(),
        }
    }

    /// Expand `root` and everything it imports.
    ///
    /// The root itself is marked visited first, so files importing it back
    /// get a placeholder instead of a second copy.
    #[instrument(skip_all, fields(root = %root.display()))]
    pub fn expand_root(mut self, root: &Path) -> Result<Expansion> {
        let root = self.loader.canonicalize(root)?;
        self.visited.insert(&root);
        let lines = self.expand(&root)?;
        debug!(
            files = self.visited.len(),
            lines = lines.len(),
            "expansion complete"
        );
        Ok(Expansion {
            lines,
            included: self.visited.into_paths(),
            warnings: self.warnings,
        })
    }

    /// Expand one canonical file against the current visited set.
    pub fn expand(&mut self, file: &Path) -> Result<Vec<Vec<u8>>> {
        let mut out = Vec::new();
        self.expand_into(file, &mut out)?;
        Ok(out)
    }

    fn expand_into(&mut self, file: &Path, out: &mut Vec<Vec<u8>>) -> Result<()> {
        let lines = self.loader.read_lines(file)?;
        for entry in entries(&lines) {
            match entry {
                Entry::Plain(text) => out.push(text.to_vec()),
                Entry::Import(directive) => self.inline(file, &directive, out)?,
            }
        }
        Ok(())
    }

    fn inline(
        &mut self,
        file: &Path,
        directive: &Directive<'_>,
        out: &mut Vec<Vec<u8>>,
    ) -> Result<()> {
        self.check_load_statement(file, directive);

        let dir = file.parent().unwrap_or_else(|| Path::new("/"));
        let target = self
            .loader
            .canonicalize(&dir.join(directive.path))
            .with_context(|| import_site(file, directive))?;

        if !self.visited.insert(&target) {
            debug!(target = %target.display(), "already included");
            out.push(already_included(directive.path).into_bytes());
            return Ok(());
        }

        debug!(target = %target.display(), "inlining");
        out.push(start_boundary(directive.path).into_bytes());
        self.expand_into(&target, out)
            .with_context(|| import_site(file, directive))?;
        out.push(end_boundary(directive.path).into_bytes());
        Ok(())
    }

    fn check_load_statement(&mut self, file: &Path, directive: &Directive<'_>) {
        let found = match directive.load {
            LoadStatement::Matched => return,
            LoadStatement::Mismatched(line) => Some(String::from_utf8_lossy(line).into_owned()),
            LoadStatement::Missing => None,
        };
        let warning = DirectiveWarning {
            file: file.to_path_buf(),
            line: directive.line,
            path: directive.path.to_string(),
            found,
        };
        warn!("{warning}");
        self.warnings.push(warning);
    }
}

fn import_site(file: &Path, directive: &Directive<'_>) -> String {
    format!(
        "import '{}' at {}:{}",
        directive.path,
        file.display(),
        directive.line
    )
}

/// Expand `root` with a fresh visited set.
pub fn expand_root<L: SourceLoader>(loader: &L, root: &Path) -> Result<Expansion> {
    Expander::new(loader).expand_root(root)
}
