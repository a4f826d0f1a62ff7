//! Lines the compiler writes into its output on its own behalf.

use std::path::Path;

const TAG: &str = "# shpack:";

/// Interpreter line that opens every compiled script.
///
/// A bare runtime name goes through `env`; an absolute path is used directly.
pub fn runtime_declaration(runtime: &str) -> String {
    if Path::new(runtime).is_absolute() {
        format!("#!{runtime}")
    } else {
        format!("#!/usr/bin/env {runtime}")
    }
}

/// Opens the inlined content of `rel_path`.
pub fn start_boundary(rel_path: &str) -> String {
    format!("{TAG} START {rel_path}")
}

/// Closes the inlined content of `rel_path`.
pub fn end_boundary(rel_path: &str) -> String {
    format!("{TAG} END {rel_path}")
}

/// Stands in for a file that was inlined earlier in the same compile.
pub fn already_included(rel_path: &str) -> String {
    format!("{TAG} {rel_path} already included")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_uses_env_for_bare_names() {
        assert_eq!(runtime_declaration("bash"), "#!/usr/bin/env bash");
        assert_eq!(runtime_declaration("zsh"), "#!/usr/bin/env zsh");
    }

    #[test]
    fn declaration_uses_absolute_runtime_directly() {
        assert_eq!(runtime_declaration("/bin/sh"), "#!/bin/sh");
    }

    #[test]
    fn boundaries_carry_relative_path() {
        assert_eq!(start_boundary("lib/a.sh"), "# shpack: START lib/a.sh");
        assert_eq!(end_boundary("lib/a.sh"), "# shpack: END lib/a.sh");
        assert_eq!(
            already_included("lib/a.sh"),
            "# shpack: lib/a.sh already included"
        );
    }
}
