//! Compiler configuration read from `shpack.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use super::validator::{Predicate, parse_predicates};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "shpack.toml";

/// Compiler configuration (TOML).
///
/// Missing fields default to the values the CLI uses without a config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ShpackConfig {
    /// Directory compiled scripts are written to.
    pub output_dir: PathBuf,

    /// Runtime named in the compiled script's interpreter line.
    pub runtime: String,

    /// Path checks applied to the input script, as `test(1)`-style flags.
    pub input_checks: String,
}

impl Default for ShpackConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("dist"),
            runtime: "bash".to_string(),
            input_checks: "er".to_string(),
        }
    }
}

impl ShpackConfig {
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(anyhow!("output_dir must not be empty"));
        }
        validate_runtime(&self.runtime)?;
        if self.input_checks.is_empty() {
            return Err(anyhow!("input_checks must not be empty"));
        }
        self.input_predicates()?;
        Ok(())
    }

    pub fn input_predicates(&self) -> Result<Vec<Predicate>> {
        parse_predicates(&self.input_checks).context("parse input_checks")
    }
}

/// A runtime name must be non-empty and free of whitespace.
pub fn validate_runtime(runtime: &str) -> Result<()> {
    if runtime.is_empty() {
        return Err(anyhow!("runtime must not be empty"));
    }
    if runtime.chars().any(char::is_whitespace) {
        return Err(anyhow!("runtime '{runtime}' must not contain whitespace"));
    }
    Ok(())
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ShpackConfig::default()`.
pub fn load_config(path: &Path) -> Result<ShpackConfig> {
    if !path.exists() {
        let cfg = ShpackConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ShpackConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, ShpackConfig::default());
    }

    #[test]
    fn load_partial_file_fills_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("shpack.toml");
        fs::write(&path, "runtime = \"zsh\"\n").expect("write");

        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.runtime, "zsh");
        assert_eq!(cfg.output_dir, PathBuf::from("dist"));
        assert_eq!(
            cfg.input_predicates().expect("predicates"),
            vec![Predicate::Exists, Predicate::Readable]
        );
    }

    #[test]
    fn load_rejects_bad_values() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("shpack.toml");

        fs::write(&path, "runtime = \"ba sh\"\n").expect("write");
        let err = load_config(&path).expect_err("whitespace runtime");
        assert!(format!("{err:#}").contains("must not contain whitespace"));

        fs::write(&path, "input_checks = \"ez\"\n").expect("write");
        let err = load_config(&path).expect_err("unknown check");
        assert!(format!("{err:#}").contains("unknown path check 'z'"));
    }
}
