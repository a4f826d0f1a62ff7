//! Deterministic classification of shell source lines.
//!
//! An import directive spans two lines: an annotation comment naming the file
//! to inline, followed by the statement that loads it at runtime.
//!
//! ```bash
//! # shellcheck source=lib/log.sh
//! source "$(dirname "$0")/lib/log.sh"
//!
//! # shpack:import lib/args.sh
//! . ./lib/args.sh
//! ```
//!
//! Lines are raw bytes: only the markers need to be text, everything else is
//! passed through whatever its encoding.

use std::sync::LazyLock;

use regex::bytes::Regex;

/// Annotation syntaxes recognized as the first half of an import directive.
static MARKERS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(?-u)^\s*#\s*shellcheck\s+(?:\S+\s+)*?source=(\S+)")
            .expect("valid shellcheck marker regex"),
        Regex::new(r"(?-u)^\s*#\s*shpack:import\s+(\S+)").expect("valid shpack marker regex"),
    ]
});

const LOAD_PREFIXES: [&[u8]; 2] = [b"source ", b". "];

/// Category of a single source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// `#!` interpreter line; dropped.
    Shebang,
    /// Empty or whitespace-only line; dropped.
    Blank,
    /// Annotation line naming a file to inline.
    ImportDirective(&'a str),
    /// Anything else; copied verbatim.
    Plain(&'a [u8]),
}

/// Classify one line in isolation.
///
/// A marker whose path is not valid UTF-8 is not an import; the line stays
/// plain.
pub fn classify(line: &[u8]) -> LineClass<'_> {
    if line.starts_with(b"#!") {
        return LineClass::Shebang;
    }
    if line.iter().all(u8::is_ascii_whitespace) {
        return LineClass::Blank;
    }
    for marker in MARKERS.iter() {
        let path = marker
            .captures(line)
            .and_then(|captures| captures.get(1))
            .and_then(|m| std::str::from_utf8(m.as_bytes()).ok())
            .map(unquote)
            .filter(|path| !path.is_empty());
        if let Some(path) = path {
            return LineClass::ImportDirective(path);
        }
    }
    LineClass::Plain(line)
}

/// Whether `line` starts with a recognized load statement (`source` or `.`).
pub fn is_load_statement(line: &[u8]) -> bool {
    let trimmed = line.trim_ascii_start();
    LOAD_PREFIXES
        .iter()
        .any(|prefix| trimmed.starts_with(prefix))
}

fn unquote(raw: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = raw
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    raw
}

/// How the line following an import annotation looked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatement<'a> {
    /// Followed by a `source`/`.` statement.
    Matched,
    /// Followed by some other line, which is consumed and discarded.
    Mismatched(&'a [u8]),
    /// The annotation was the last line of the file.
    Missing,
}

/// A recognized import directive with its paired load statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive<'a> {
    /// Path as written in the annotation, relative to the containing file.
    pub path: &'a str,
    /// 1-based line number of the annotation.
    pub line: usize,
    pub load: LoadStatement<'a>,
}

/// A source line after skip filtering and directive pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry<'a> {
    Plain(&'a [u8]),
    Import(Directive<'a>),
}

/// Iterate the entries of a file: skip lines dropped, directives paired with
/// the line after them.
pub fn entries<S: AsRef<[u8]>>(lines: &[S]) -> Entries<'_, S> {
    Entries { lines, next: 0 }
}

/// Iterator returned by [`entries`].
pub struct Entries<'a, S> {
    lines: &'a [S],
    next: usize,
}

impl<'a, S: AsRef<[u8]>> Iterator for Entries<'a, S> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(line) = self.lines.get(self.next) {
            let line_no = self.next + 1;
            self.next += 1;
            match classify(line.as_ref()) {
                LineClass::Shebang | LineClass::Blank => continue,
                LineClass::Plain(text) => return Some(Entry::Plain(text)),
                LineClass::ImportDirective(path) => {
                    let load = match self.lines.get(self.next) {
                        Some(following) => {
                            self.next += 1;
                            let following = following.as_ref();
                            if is_load_statement(following) {
                                LoadStatement::Matched
                            } else {
                                LoadStatement::Mismatched(following)
                            }
                        }
                        None => LoadStatement::Missing,
                    };
                    return Some(Entry::Import(Directive {
                        path,
                        line: line_no,
                        load,
                    }));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> LineClass<'_> {
        LineClass::Plain(text.as_bytes())
    }

    #[test]
    fn classify_skips_shebang_and_blank() {
        assert_eq!(classify(b"#!/usr/bin/env bash"), LineClass::Shebang);
        assert_eq!(classify(b""), LineClass::Blank);
        assert_eq!(classify(b"   \t\r"), LineClass::Blank);
    }

    #[test]
    fn classify_shellcheck_marker() {
        assert_eq!(
            classify(b"# shellcheck source=lib/log.sh"),
            LineClass::ImportDirective("lib/log.sh")
        );
        assert_eq!(
            classify(b"  #shellcheck disable=SC1091 source=\"lib/log.sh\""),
            LineClass::ImportDirective("lib/log.sh")
        );
    }

    #[test]
    fn classify_namespaced_marker() {
        assert_eq!(
            classify(b"# shpack:import ../common/args.sh"),
            LineClass::ImportDirective("../common/args.sh")
        );
        assert_eq!(
            classify(b"# shpack:import 'util.sh'"),
            LineClass::ImportDirective("util.sh")
        );
    }

    #[test]
    fn classify_plain_lines() {
        assert_eq!(classify(b"echo hi"), plain("echo hi"));
        assert_eq!(
            classify(b"# shellcheck disable=SC2086"),
            plain("# shellcheck disable=SC2086")
        );
        assert_eq!(classify(b"  # comment"), plain("  # comment"));
    }

    #[test]
    fn classify_keeps_non_utf8_bytes() {
        let line = b"echo caf\xe9";
        assert_eq!(classify(line), LineClass::Plain(&line[..]));

        let marker = b"# shpack:import caf\xe9.sh";
        assert_eq!(classify(marker), LineClass::Plain(&marker[..]));
    }

    #[test]
    fn load_statement_prefixes() {
        assert!(is_load_statement(b"source lib/log.sh"));
        assert!(is_load_statement(b"  . \"$DIR/lib/log.sh\""));
        assert!(!is_load_statement(b"sourced=1"));
        assert!(!is_load_statement(b"echo source lib/log.sh"));
    }

    #[test]
    fn entries_pair_marker_with_load_statement() {
        let lines = [
            "#!/bin/bash",
            "",
            "# shellcheck source=a.sh",
            "source a.sh",
            "echo done",
        ];
        let collected: Vec<Entry<'_>> = entries(&lines).collect();
        assert_eq!(
            collected,
            vec![
                Entry::Import(Directive {
                    path: "a.sh",
                    line: 3,
                    load: LoadStatement::Matched,
                }),
                Entry::Plain("echo done".as_bytes()),
            ]
        );
    }

    #[test]
    fn entries_discard_mismatched_load_statement() {
        let lines = ["# shpack:import a.sh", "echo not a load", "echo after"];
        let collected: Vec<Entry<'_>> = entries(&lines).collect();
        assert_eq!(
            collected,
            vec![
                Entry::Import(Directive {
                    path: "a.sh",
                    line: 1,
                    load: LoadStatement::Mismatched("echo not a load".as_bytes()),
                }),
                Entry::Plain("echo after".as_bytes()),
            ]
        );
    }

    #[test]
    fn entries_marker_on_last_line_is_missing_load() {
        let lines = ["echo first", "# shellcheck source=tail.sh"];
        let collected: Vec<Entry<'_>> = entries(&lines).collect();
        assert_eq!(
            collected[1],
            Entry::Import(Directive {
                path: "tail.sh",
                line: 2,
                load: LoadStatement::Missing,
            })
        );
    }
}
