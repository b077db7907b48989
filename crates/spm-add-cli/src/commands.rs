//! CLI command implementations

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use spm_add_core::{
    ConfigLoader, DependencyDescriptor, Injector, PackageDump, PackageInfo, SpmAddError,
    select_constraint, select_products,
};
use tracing::{debug, info};

use crate::output::{AddReport, OutputFormatter};

/// Everything `spm-add <package>` was asked to do
#[derive(Debug, Clone)]
pub struct AddOptions {
    pub package: String,
    pub manifest: PathBuf,
    pub from: Option<String>,
    pub branch: Option<String>,
    pub products: Vec<String>,
    pub name: Option<String>,
    pub package_dump: Option<PathBuf>,
    pub known_versions: Vec<String>,
    pub dry_run: bool,
    pub diff: bool,
    pub config: Option<PathBuf>,
}

/// Assemble what is known about the package from its URL and the optional
/// dump file
pub fn load_package_info(
    package: &str,
    dump: Option<&Path>,
    versions: &[String],
) -> anyhow::Result<PackageInfo> {
    let url = DependencyDescriptor::infer_url(package);
    let Some(path) = dump else {
        debug!(url = %url, "no package dump, products are not validated");
        let mut info = PackageInfo::from_url(&url);
        info.versions = versions.to_vec();
        return Ok(info);
    };

    let json = fs::read_to_string(path)
        .map_err(|e| SpmAddError::io_error(path, e))
        .with_context(|| format!("Failed to read package dump {}", path.display()))?;
    let dump = PackageDump::from_json(&json)?;
    Ok(PackageInfo::from_dump(&url, dump, versions.to_vec()))
}

/// `--info`: print the package summary
pub fn info_command(
    package: &str,
    dump: Option<&Path>,
    versions: &[String],
    printer: &OutputFormatter,
) -> anyhow::Result<()> {
    let info = load_package_info(package, dump, versions)?;
    printer.print_info(&info)
}

/// Add the package to the manifest and wire its products
pub fn add_command(options: AddOptions, printer: &OutputFormatter) -> anyhow::Result<()> {
    let manifest = &options.manifest;
    debug!("Adding {} to {}", options.package, manifest.display());

    let source = fs::read_to_string(manifest)
        .map_err(|e| SpmAddError::io_error(manifest, e))
        .with_context(|| format!("Failed to read manifest {}", manifest.display()))?;

    let start_dir = match manifest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let config = ConfigLoader::load(options.config.as_deref(), start_dir)?;

    let info = load_package_info(
        &options.package,
        options.package_dump.as_deref(),
        &options.known_versions,
    )?;
    let products = if info.products.is_empty() {
        options.products.clone()
    } else {
        select_products(&info, &options.products)?
    };
    let branch = options.branch.as_deref().unwrap_or(config.branch());
    let constraint = select_constraint(&info, options.from.as_deref(), branch)?;

    let identifier = options.name.clone().unwrap_or_else(|| info.name.clone());
    let descriptor =
        DependencyDescriptor::new(identifier, info.url.clone(), constraint).with_products(products);

    let injector = config
        .indent_style()
        .map_or_else(Injector::new, Injector::with_indent);
    let outcome = injector
        .inject_text(&source, &descriptor)
        .with_context(|| format!("Failed to edit {}", manifest.display()))?;

    let (added, removed) = OutputFormatter::diff_stats(&source, &outcome.text);
    debug!(added, removed, changed = outcome.changed, "manifest edited");

    let written = outcome.changed && !options.dry_run;
    if written {
        fs::write(manifest, &outcome.text)
            .map_err(|e| SpmAddError::io_error(manifest, e))
            .with_context(|| format!("Failed to write manifest {}", manifest.display()))?;
        info!("Wrote {}", manifest.display());
    }

    printer.print_report(&AddReport {
        descriptor: &descriptor,
        manifest,
        original: &source,
        outcome: &outcome,
        written,
        dry_run: options.dry_run,
        diff: options.diff,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_package_info_without_dump() {
        let info = load_package_info("johnsundell/Files", None, &["1.0.0".into()]).unwrap();
        assert_eq!(info.name, "Files");
        assert_eq!(info.url, "https://github.com/johnsundell/Files");
        assert!(info.products.is_empty());
        assert_eq!(info.versions, ["1.0.0"]);
    }

    #[test]
    fn test_package_info_from_dump() {
        let temp_dir = TempDir::new().unwrap();
        let dump = temp_dir.path().join("dump.json");
        fs::write(
            &dump,
            r#"{"name": "swift-log", "products": [{"name": "Logging", "type": {"library": ["automatic"]}}]}"#,
        )
        .unwrap();

        let info = load_package_info("https://github.com/apple/swift-log.git", Some(&dump), &[]).unwrap();
        assert_eq!(info.name, "swift-log");
        assert_eq!(info.products.len(), 1);
    }

    #[test]
    fn test_missing_dump_is_an_error() {
        let err = load_package_info("a/b", Some(Path::new("/nonexistent/dump.json")), &[]).unwrap_err();
        assert!(err.to_string().contains("Failed to read package dump"));
    }
}
