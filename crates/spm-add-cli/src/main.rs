//! spm-add CLI
//!
//! Adds a Swift package dependency to a `Package.swift` manifest and wires
//! its products into the first target.

mod commands;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use spm_add_core::{ErrorKind, SpmAddError, init_tracing};

use crate::commands::AddOptions;
use crate::output::OutputFormatter;

#[derive(Parser)]
#[command(name = "spm-add")]
#[command(about = "Add a Swift package dependency to Package.swift")]
#[command(version = spm_add_core::VERSION)]
#[command(
    long_about = "spm-add edits Package.swift in place: it adds a `.package(…)` dependency\n\
and wires the chosen products into the first target, leaving every other\n\
byte of the manifest untouched.\n\
\n\
Examples:\n  \
spm-add johnsundell/Files --from 4.0.0          # Pin a version\n  \
spm-add apple/swift-log --branch main -p Logging # Track a branch\n  \
spm-add owner/repo --package-dump dump.json      # Validate products\n  \
spm-add owner/repo --dry-run --diff              # Preview the change"
)]
struct Cli {
    /// Package to add: `owner/repo` on GitHub or a repository URL
    package: String,

    /// Manifest to edit
    #[arg(long, default_value = "Package.swift")]
    manifest: PathBuf,

    /// Version to depend on (defaults to the latest known version)
    #[arg(long, value_name = "VERSION")]
    from: Option<String>,

    /// Branch to track when no version is known
    #[arg(long, value_name = "NAME")]
    branch: Option<String>,

    /// Product(s) to integrate into the first target
    #[arg(short = 'p', long = "product", value_name = "PRODUCT")]
    products: Vec<String>,

    /// Identifier for the package in the manifest
    #[arg(long, value_name = "ID")]
    name: Option<String>,

    /// Output of `swift package dump-package` for the package
    #[arg(long, value_name = "FILE")]
    package_dump: Option<PathBuf>,

    /// Released version of the package (repeatable)
    #[arg(long = "known-version", value_name = "V")]
    known_versions: Vec<String>,

    /// Print what is known about the package and exit
    #[arg(long)]
    info: bool,

    /// Print the edited manifest instead of writing it
    #[arg(long)]
    dry_run: bool,

    /// Print a unified diff of the change
    #[arg(long)]
    diff: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Configuration file path
    #[arg(short, long, help = "Path to configuration file (.spm-add.toml)")]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output with colors
    Human,
    /// JSON format for programmatic consumption
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let use_colors = !cli.no_color && std::env::var("NO_COLOR").is_err();
    colored::control::set_override(use_colors);

    let log_level = match cli.verbose {
        0 => "spm_add=warn",
        1 => "spm_add=info",
        2 => "spm_add=debug",
        _ => "spm_add=trace",
    };
    unsafe {
        std::env::set_var("RUST_LOG", log_level);
    }
    init_tracing();

    let printer = OutputFormatter::new(cli.format, use_colors);
    let result = if cli.info {
        commands::info_command(&cli.package, cli.package_dump.as_deref(), &cli.known_versions, &printer)
    } else {
        commands::add_command(
            AddOptions {
                package: cli.package,
                manifest: cli.manifest,
                from: cli.from,
                branch: cli.branch,
                products: cli.products,
                name: cli.name,
                package_dump: cli.package_dump,
                known_versions: cli.known_versions,
                dry_run: cli.dry_run,
                diff: cli.diff,
                config: cli.config,
            },
            &printer,
        )
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            printer.print_error(&err);
            exit_code(&err)
        }
    }
}

/// 2 for a manifest that does not parse, 1 for everything else
fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<SpmAddError>().map(SpmAddError::kind) {
        Some(ErrorKind::Parse) => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}
