//! spm-add core
//!
//! Lossless structural editing of Swift package manifests (`Package.swift`).
//! A manifest is parsed into a concrete syntax tree that keeps every byte of
//! the input, edited by replacing single nodes, and printed back. Text that
//! no edit touches comes out exactly as it went in.

pub mod config;
pub mod cst; // Concrete Syntax Tree (lossless, Rowan-based)
pub mod descriptor;
pub mod diagnostics;
pub mod edit;
pub mod error;
pub mod inject;
pub mod resolve;
pub mod result;

pub use config::{ConfigLoader, SpmAddConfig};
pub use cst::{ParseError, ParseErrorKind, SyntaxTree, parse};
pub use descriptor::{DependencyDescriptor, VersionConstraint};
pub use diagnostics::{Diagnostic, DiagnosticKind, Severity};
pub use edit::{FormatOptions, IndentStyle};
pub use error::{ErrorKind, SpmAddError};
pub use inject::{InjectOutcome, Injector, TextOutcome, inject, inject_text};
pub use resolve::{PackageDump, PackageInfo, ProductInfo, ProductKind, select_constraint, select_products};
pub use result::Result;

/// Initialize tracing/logging
///
/// Logs go to stderr so stdout stays free for manifest output.
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("spm_add=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
