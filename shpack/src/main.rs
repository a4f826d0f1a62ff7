//! `shpack` command-line entry point.
//!
//! Compiles one script into `<output_dir>/<name>` with every import inlined.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::Parser;
use shpack::compile::{CompileOptions, CompileReport, DestinationExists, compile};
use shpack::exit_codes;
use shpack::io::config::{DEFAULT_CONFIG_FILE, load_config};
use shpack::io::validator::PathCheckFailure;
use shpack::logging;

#[derive(Debug, Parser)]
#[command(
    name = "shpack",
    version,
    about = "Inline sourced shell scripts into one self-contained script"
)]
struct Cli {
    /// Script to compile.
    input: PathBuf,

    /// Overwrite the destination if it already exists.
    #[arg(short, long)]
    force: bool,

    /// Output file name, placed in the output directory (defaults to the input's name).
    #[arg(short, long, value_name = "NAME")]
    output: Option<String>,

    /// Runtime named in the compiled script's interpreter line [default: bash].
    #[arg(short, long, value_name = "NAME")]
    runtime: Option<String>,

    /// Config file [default: shpack.toml, if present].
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() {
    logging::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // `--help`/`--version` render through the same error path.
            let code = if err.use_stderr() {
                exit_codes::INVALID
            } else {
                exit_codes::OK
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    match run(cli) {
        Ok(report) => print_report(&report),
        Err(err) => std::process::exit(report_error(&err)),
    }
}

fn run(cli: Cli) -> Result<CompileReport> {
    let config = match &cli.config {
        Some(path) => {
            if !path.exists() {
                bail!("config file {} not found", path.display());
            }
            load_config(path)?
        }
        None => load_config(Path::new(DEFAULT_CONFIG_FILE))?,
    };

    let mut options = CompileOptions::from_config(&cli.input, &config)?;
    options.force = cli.force;
    options.output_name = cli.output;
    if let Some(runtime) = cli.runtime {
        options.runtime = runtime;
    }
    compile(&options)
}

fn print_report(report: &CompileReport) {
    let input = report
        .included
        .first()
        .map(|path| path.display().to_string())
        .unwrap_or_default();
    println!(
        "compiled {} -> {} ({} files)",
        input,
        report.destination.display(),
        report.included.len()
    );
}

/// Print `err` where its category belongs and return the exit code.
fn report_error(err: &anyhow::Error) -> i32 {
    if let Some(failure) = err.downcast_ref::<PathCheckFailure>() {
        println!("{failure}");
        return failure.exit_code();
    }
    if err.downcast_ref::<DestinationExists>().is_some() {
        eprintln!("{err}");
        return exit_codes::INVALID;
    }
    eprintln!("{err:#}");
    exit_codes::INVALID
}
