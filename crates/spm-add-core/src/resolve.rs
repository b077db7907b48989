//! Product and version selection for a package about to be added
//!
//! The package metadata comes from outside: the output of
//! `swift package dump-package` for products, and a list of known release
//! tags for versions. Nothing here touches the network.

use std::cmp::Reverse;
use std::fmt;

use semver::Version;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::descriptor::{identifier_from_url, VersionConstraint};
use crate::error::SpmAddError;
use crate::result::Result;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Library,
    Executable,
    Plugin,
    Other(String),
}

impl From<&str> for ProductKind {
    fn from(kind: &str) -> Self {
        match kind {
            "library" => ProductKind::Library,
            "executable" => ProductKind::Executable,
            "plugin" => ProductKind::Plugin,
            other => ProductKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductKind::Library => f.write_str("library"),
            ProductKind::Executable => f.write_str("executable"),
            ProductKind::Plugin => f.write_str("plugin"),
            ProductKind::Other(kind) => f.write_str(kind),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub name: String,
    pub kind: ProductKind,
}

/// What is known about a remote package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    pub url: String,
    /// Release tags, in no particular order
    pub versions: Vec<String>,
    pub products: Vec<ProductInfo>,
}

impl PackageInfo {
    /// Package known only by URL: named after the repository, no products
    pub fn from_url(url: &str) -> Self {
        Self {
            name: identifier_from_url(url),
            url: url.to_string(),
            versions: Vec::new(),
            products: Vec::new(),
        }
    }

    pub fn from_dump(url: &str, dump: PackageDump, versions: Vec<String>) -> Self {
        Self {
            name: dump.name,
            url: url.to_string(),
            versions,
            products: dump
                .products
                .into_iter()
                .map(|product| ProductInfo {
                    kind: ProductKind::from(product.kind.as_str()),
                    name: product.name,
                })
                .collect(),
        }
    }

    pub fn product_names(&self) -> Vec<String> {
        self.products.iter().map(|p| p.name.clone()).collect()
    }

    /// Highest stable release, else the highest pre-release
    ///
    /// Tags that are not semantic versions only count when no tag is; then
    /// the last one listed wins.
    pub fn latest_version(&self) -> Option<&str> {
        let parsed: Vec<(Version, &str)> = self
            .versions
            .iter()
            .filter_map(|tag| parse_version(tag).map(|version| (version, tag.as_str())))
            .collect();

        parsed
            .iter()
            .filter(|(version, _)| version.pre.is_empty())
            .max_by(|a, b| a.0.cmp(&b.0))
            .or_else(|| parsed.iter().max_by(|a, b| a.0.cmp(&b.0)))
            .map(|(_, tag)| *tag)
            .or_else(|| self.versions.last().map(String::as_str))
    }

    /// Known versions, newest first
    pub fn versions_newest_first(&self) -> Vec<&str> {
        let mut versions: Vec<&str> = self.versions.iter().map(String::as_str).collect();
        versions.reverse();
        versions.sort_by_key(|tag| Reverse(parse_version(tag)));
        versions
    }

    pub fn has_version(&self, version: &str) -> bool {
        let wanted = parse_version(version);
        self.versions
            .iter()
            .any(|tag| tag == version || (wanted.is_some() && parse_version(tag) == wanted))
    }
}

/// Release tags may carry a `v` prefix
fn parse_version(tag: &str) -> Option<Version> {
    let tag = tag.trim();
    Version::parse(tag.strip_prefix('v').unwrap_or(tag)).ok()
}

/// The subset of `swift package dump-package` output that is used
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageDump {
    pub name: String,
    #[serde(default)]
    pub products: Vec<DumpProduct>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DumpProduct {
    pub name: String,
    /// The single key of the `type` object, e.g. `library`
    #[serde(rename = "type", deserialize_with = "single_key")]
    pub kind: String,
}

fn single_key<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let map = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
    map.keys()
        .next()
        .cloned()
        .ok_or_else(|| D::Error::custom("product type has no kind"))
}

impl PackageDump {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| SpmAddError::dump_error(err.to_string()))
    }
}

/// Canonical names of the products to wire
///
/// With no request, a package with a single product gets that product.
/// Requested names match case-insensitively.
pub fn select_products(info: &PackageInfo, requested: &[String]) -> Result<Vec<String>> {
    if requested.is_empty() {
        return match info.products.as_slice() {
            [only] => Ok(vec![only.name.clone()]),
            _ => Err(SpmAddError::MultipleProducts {
                package: info.name.clone(),
                products: info.product_names(),
            }),
        };
    }

    requested
        .iter()
        .map(|wanted| {
            info.products
                .iter()
                .find(|product| product.name.eq_ignore_ascii_case(wanted))
                .map(|product| product.name.clone())
                .ok_or_else(|| SpmAddError::InvalidProduct {
                    product: wanted.clone(),
                    package: info.name.clone(),
                    products: info.product_names(),
                })
        })
        .collect()
}

/// Pin to `version`, else the latest known version, else `branch`
pub fn select_constraint(
    info: &PackageInfo,
    version: Option<&str>,
    branch: &str,
) -> Result<VersionConstraint> {
    match (version, info.latest_version()) {
        (Some(version), _) if info.versions.is_empty() || info.has_version(version) => {
            Ok(VersionConstraint::Exact(version.to_string()))
        }
        (Some(version), _) => Err(SpmAddError::InvalidVersion {
            version: version.to_string(),
            package: info.name.clone(),
            versions: info.versions.clone(),
        }),
        (None, Some(latest)) => Ok(VersionConstraint::Exact(latest.to_string())),
        (None, None) => Ok(VersionConstraint::Branch(branch.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = r#"{
        "name": "Files",
        "products": [
            {"name": "Files", "type": {"library": ["automatic"]}, "targets": ["Files"]},
            {"name": "files-cli", "type": {"executable": null}, "targets": ["CLI"]}
        ],
        "targets": []
    }"#;

    fn info() -> PackageInfo {
        PackageInfo::from_dump(
            "https://github.com/x/Files.git",
            PackageDump::from_json(DUMP).unwrap(),
            vec!["1.0.0".into(), "1.1.0".into()],
        )
    }

    #[test]
    fn test_dump_parsing() {
        let info = info();
        assert_eq!(info.name, "Files");
        assert_eq!(info.products[0].kind, ProductKind::Library);
        assert_eq!(info.products[1].kind, ProductKind::Executable);
    }

    #[test]
    fn test_malformed_dump() {
        let err = PackageDump::from_json(r#"{"name": "x", "products": [{"name": "a", "type": {}}]}"#)
            .unwrap_err();
        assert!(matches!(err, SpmAddError::DumpError { .. }));
    }

    #[test]
    fn test_select_products_is_case_insensitive() {
        let selected = select_products(&info(), &["files".into()]).unwrap();
        assert_eq!(selected, ["Files"]);
    }

    #[test]
    fn test_select_products_rejects_unknown() {
        let err = select_products(&info(), &["Nope".into()]).unwrap_err();
        assert!(err.to_string().contains("Valid products:\n- Files\n- files-cli"));
    }

    #[test]
    fn test_select_products_needs_choice_among_many() {
        let err = select_products(&info(), &[]).unwrap_err();
        assert!(matches!(err, SpmAddError::MultipleProducts { .. }));
        assert!(err.to_string().contains("spm-add <package> -p Files"));

        let mut single = info();
        single.products.truncate(1);
        assert_eq!(select_products(&single, &[]).unwrap(), ["Files"]);
    }

    #[test]
    fn test_select_constraint() {
        let info = info();
        assert_eq!(
            select_constraint(&info, None, "main").unwrap(),
            VersionConstraint::Exact("1.1.0".into())
        );
        assert_eq!(
            select_constraint(&info, Some("1.0.0"), "main").unwrap(),
            VersionConstraint::Exact("1.0.0".into())
        );
        assert!(matches!(
            select_constraint(&info, Some("9.9.9"), "main"),
            Err(SpmAddError::InvalidVersion { .. })
        ));

        let unknown = PackageInfo::from_url("https://github.com/x/Files.git");
        assert_eq!(
            select_constraint(&unknown, None, "develop").unwrap(),
            VersionConstraint::Branch("develop".into())
        );
        assert_eq!(
            select_constraint(&unknown, Some("2.0.0"), "main").unwrap(),
            VersionConstraint::Exact("2.0.0".into())
        );
    }

    #[test]
    fn test_latest_version_follows_semver() {
        let mut info = PackageInfo::from_url("https://github.com/x/Files.git");
        info.versions = vec!["1.10.0".into(), "v2.0.0".into(), "1.9.0".into(), "3.0.0-beta.1".into()];
        assert_eq!(info.latest_version(), Some("v2.0.0"));
        assert_eq!(
            info.versions_newest_first(),
            ["3.0.0-beta.1", "v2.0.0", "1.10.0", "1.9.0"]
        );
        assert!(info.has_version("2.0.0"));
        assert!(!info.has_version("2.0"));

        info.versions = vec!["nightly".into(), "4.0.0-rc.1".into()];
        assert_eq!(info.latest_version(), Some("4.0.0-rc.1"));

        info.versions = vec!["alpha".into(), "beta".into()];
        assert_eq!(info.latest_version(), Some("beta"));
    }
}
