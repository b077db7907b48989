//! Non-fatal findings reported by the injector
//!
//! Past the parse boundary nothing is an error: every skipped step is
//! described by a diagnostic and the tree stays printable.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// No top-level `Package(…)` binding; nothing was changed
    NoRootPackageFound,
    /// An argument exists with an unexpected shape and was left verbatim
    StructuralMismatch,
    /// The package is already declared and its identifier is reused
    DuplicatePackage,
    /// There is no target to wire products into
    NoTargetsToWire,
    /// None of the anchor arguments for an insertion exist
    MissingAnchor,
    /// The target already depends on the product
    ProductAlreadyWired,
}

impl DiagnosticKind {
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::NoRootPackageFound => "no-root-package-found",
            DiagnosticKind::StructuralMismatch => "structural-mismatch",
            DiagnosticKind::DuplicatePackage => "duplicate-package",
            DiagnosticKind::NoTargetsToWire => "no-targets-to-wire",
            DiagnosticKind::MissingAnchor => "missing-anchor",
            DiagnosticKind::ProductAlreadyWired => "product-already-wired",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::NoRootPackageFound
            | DiagnosticKind::StructuralMismatch
            | DiagnosticKind::MissingAnchor => Severity::Warning,
            DiagnosticKind::DuplicatePackage
            | DiagnosticKind::NoTargetsToWire
            | DiagnosticKind::ProductAlreadyWired => Severity::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            message: message.into(),
        }
    }

    pub fn no_root_package_found() -> Self {
        Self::new(
            DiagnosticKind::NoRootPackageFound,
            "no top-level binding initialized with `Package(…)` was found",
        )
    }

    pub fn structural_mismatch(what: &str, expected: &str) -> Self {
        Self::new(
            DiagnosticKind::StructuralMismatch,
            format!("`{what}` is not {expected}; left unchanged"),
        )
    }

    pub fn duplicate_package(url: &str, identifier: &str) -> Self {
        Self::new(
            DiagnosticKind::DuplicatePackage,
            format!("{url} is already declared as `{identifier}`"),
        )
    }

    pub fn no_targets_to_wire() -> Self {
        Self::new(
            DiagnosticKind::NoTargetsToWire,
            "the package declares no targets; products were not wired",
        )
    }

    pub fn missing_anchor(label: &str, candidates: &[&str]) -> Self {
        let anchors = candidates
            .iter()
            .map(|c| format!("`{c}`"))
            .collect::<Vec<_>>()
            .join(", ");
        Self::new(
            DiagnosticKind::MissingAnchor,
            format!("cannot insert `{label}`: none of {anchors} is present"),
        )
    }

    pub fn product_already_wired(product: &str, package: &str) -> Self {
        Self::new(
            DiagnosticKind::ProductAlreadyWired,
            format!("the first target already depends on {product} from {package}"),
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.kind.code(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_follows_kind() {
        assert_eq!(Diagnostic::no_root_package_found().severity, Severity::Warning);
        assert_eq!(Diagnostic::no_targets_to_wire().severity, Severity::Info);
    }

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::missing_anchor("dependencies", &["name", "platforms"]);
        assert_eq!(
            diagnostic.to_string(),
            "warning[missing-anchor]: cannot insert `dependencies`: none of `name`, `platforms` is present"
        );
    }

    #[test]
    fn test_serializes_kind_in_kebab_case() {
        let json = serde_json::to_string(&Diagnostic::duplicate_package("u", "Files")).unwrap();
        assert!(json.contains("\"kind\":\"duplicate-package\""));
        assert!(json.contains("\"severity\":\"info\""));
    }
}
