//! Fully resolved description of the dependency to add

use std::fmt;

use serde::{Deserialize, Serialize};

/// How the dependency is pinned
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionConstraint {
    /// Rendered as `from: "<version>"`
    Exact(String),
    /// Rendered as `branch: "<name>"`
    Branch(String),
}

impl VersionConstraint {
    /// Argument label used in the package reference
    pub fn label(&self) -> &'static str {
        match self {
            VersionConstraint::Exact(_) => "from",
            VersionConstraint::Branch(_) => "branch",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            VersionConstraint::Exact(version) => version,
            VersionConstraint::Branch(branch) => branch,
        }
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionConstraint::Exact(version) => write!(f, "{version}"),
            VersionConstraint::Branch(branch) => write!(f, "branch: {branch}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyDescriptor {
    identifier: String,
    url: String,
    constraint: VersionConstraint,
    products: Vec<String>,
}

impl DependencyDescriptor {
    pub fn new(
        identifier: impl Into<String>,
        url: impl Into<String>,
        constraint: VersionConstraint,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            url: url.into(),
            constraint,
            products: Vec::new(),
        }
    }

    /// Descriptor for `owner/repo` or a URL, naming the package after the
    /// last path component of its URL
    pub fn from_package(package: &str, constraint: VersionConstraint) -> Self {
        let url = Self::infer_url(package);
        Self::new(identifier_from_url(&url), url, constraint)
    }

    /// Products to wire into the first target, kept unique in first-seen order
    pub fn with_products<I, S>(mut self, products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for product in products {
            let product = product.into();
            if !self.products.contains(&product) {
                self.products.push(product);
            }
        }
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn constraint(&self) -> &VersionConstraint {
        &self.constraint
    }

    pub fn products(&self) -> &[String] {
        &self.products
    }

    /// `https://…` is kept verbatim; `owner/repo` is assumed to live on GitHub
    pub fn infer_url(package: &str) -> String {
        let package = package.trim();
        if package.starts_with("http") || package.starts_with("git@") {
            package.to_string()
        } else {
            format!("https://github.com/{package}")
        }
    }
}

/// Last path component of a repository URL without `.git`
pub fn identifier_from_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    let last = trimmed.rsplit(['/', ':']).next().unwrap_or(trimmed);
    last.strip_suffix(".git").unwrap_or(last).to_string()
}

/// Canonical form used to compare repository URLs
pub fn normalize_url(url: &str) -> String {
    let lowered = url.trim().to_lowercase();
    let trimmed = lowered.trim_end_matches('/');
    trimmed.strip_suffix(".git").unwrap_or(trimmed).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_products_are_unique_and_ordered() {
        let descriptor = DependencyDescriptor::new(
            "Files",
            "https://github.com/x/Files.git",
            VersionConstraint::Exact("0.4.1".into()),
        )
        .with_products(["B", "A", "B"]);
        assert_eq!(descriptor.products(), ["B", "A"]);
    }

    #[test]
    fn test_infer_url() {
        assert_eq!(
            DependencyDescriptor::infer_url("johnsundell/Files"),
            "https://github.com/johnsundell/Files"
        );
        assert_eq!(
            DependencyDescriptor::infer_url("https://example.com/a.git"),
            "https://example.com/a.git"
        );
    }

    #[test]
    fn test_from_package() {
        let descriptor = DependencyDescriptor::from_package(
            "apple/swift-log",
            VersionConstraint::Branch("main".into()),
        );
        assert_eq!(descriptor.identifier(), "swift-log");
        assert_eq!(descriptor.url(), "https://github.com/apple/swift-log");
    }

    #[test]
    fn test_identifier_from_url() {
        assert_eq!(identifier_from_url("https://github.com/x/Files.git"), "Files");
        assert_eq!(identifier_from_url("https://github.com/x/Files/"), "Files");
        assert_eq!(identifier_from_url("git@github.com:x/Files.git"), "Files");
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url(" https://GitHub.com/x/Files.git/ "),
            "https://github.com/x/files"
        );
        assert_eq!(
            normalize_url("https://github.com/x/Files"),
            normalize_url("https://github.com/x/files.git")
        );
    }

    #[test]
    fn test_constraint_rendering() {
        let exact = VersionConstraint::Exact("1.2.3".into());
        let branch = VersionConstraint::Branch("main".into());
        assert_eq!(exact.to_string(), "1.2.3");
        assert_eq!(branch.to_string(), "branch: main");
        assert_eq!(exact.label(), "from");
        assert_eq!(branch.value(), "main");
    }
}
