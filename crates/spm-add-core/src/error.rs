//! Error types for manifest editing operations

use std::path::PathBuf;
use thiserror::Error;

use crate::cst::ParseError;

/// Main error type for spm-add operations
///
/// Only conditions that abort an operation are errors. Everything the
/// injector can degrade around is reported as a [`crate::Diagnostic`].
#[derive(Debug, Error)]
pub enum SpmAddError {
    /// The manifest text is not a valid instance of the grammar
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No product was requested and the package offers more than one
    #[error(
        "The package {package} contains multiple products.\nChoose which one(s) to integrate into your target with the `-p` flag.\n\nProducts in this package:\n{}\n\nExample:\n\nspm-add <package> -p {}",
        bullet_list(.products),
        first_product(.products)
    )]
    MultipleProducts {
        package: String,
        products: Vec<String>,
    },

    /// A requested product is not provided by the package
    #[error(
        "The product '{product}' is not provided by the package {package}.\n\nValid products:\n{}",
        bullet_list(.products)
    )]
    InvalidProduct {
        product: String,
        package: String,
        products: Vec<String>,
    },

    /// A requested version is not among the package's versions
    #[error(
        "The version '{version}' is not provided by the package {package}.\n\nValid versions:\n{}",
        bullet_list(.versions)
    )]
    InvalidVersion {
        version: String,
        package: String,
        versions: Vec<String>,
    },

    /// Malformed `dump-package` output
    #[error("Invalid package dump: {message}")]
    DumpError { message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

fn first_product(products: &[String]) -> &str {
    products.first().map_or("<product>", String::as_str)
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Config,
    Io,
    Resolution,
    Internal,
}

impl SpmAddError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SpmAddError::Parse(_) => ErrorKind::Parse,
            SpmAddError::ConfigError { .. } => ErrorKind::Config,
            SpmAddError::IoError { .. } => ErrorKind::Io,
            SpmAddError::MultipleProducts { .. }
            | SpmAddError::InvalidProduct { .. }
            | SpmAddError::InvalidVersion { .. }
            | SpmAddError::DumpError { .. } => ErrorKind::Resolution,
            SpmAddError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Whether the user can fix this by changing the input or flags
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Parse | ErrorKind::Config | ErrorKind::Resolution
        )
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create a package dump error
    pub fn dump_error(message: impl Into<String>) -> Self {
        Self::DumpError {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for SpmAddError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiple_products_message_lists_products() {
        let error = SpmAddError::MultipleProducts {
            package: "Files".to_string(),
            products: vec!["Files".to_string(), "FilesKit".to_string()],
        };
        let message = error.to_string();
        assert!(message.contains("The package Files contains multiple products."));
        assert!(message.contains("- Files\n- FilesKit"));
        assert!(message.contains("spm-add <package> -p Files"));
        assert_eq!(error.kind(), ErrorKind::Resolution);
    }

    #[test]
    fn test_invalid_version_message() {
        let error = SpmAddError::InvalidVersion {
            version: "9.9.9".to_string(),
            package: "Files".to_string(),
            versions: vec!["4.0.0".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "The version '9.9.9' is not provided by the package Files.\n\nValid versions:\n- 4.0.0"
        );
        assert!(error.is_recoverable());
    }

    #[test]
    fn test_internal_error_is_not_recoverable() {
        let error = SpmAddError::internal_error("boom");
        assert_eq!(error.kind(), ErrorKind::Internal);
        assert!(!error.is_recoverable());
    }
}
