//! Output formatting and reporting

use std::path::Path;

use colored::*;
use serde::Serialize;
use similar::{ChangeTag, TextDiff};
use spm_add_core::{DependencyDescriptor, Diagnostic, PackageInfo, Severity, TextOutcome};

use crate::OutputFormat;

/// Everything worth reporting about one `spm-add` run
pub struct AddReport<'a> {
    pub descriptor: &'a DependencyDescriptor,
    pub manifest: &'a Path,
    pub original: &'a str,
    pub outcome: &'a TextOutcome,
    pub written: bool,
    pub dry_run: bool,
    pub diff: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    package: &'a str,
    url: &'a str,
    constraint: String,
    products: &'a [String],
    manifest: String,
    changed: bool,
    written: bool,
    diagnostics: &'a [Diagnostic],
    #[serde(skip_serializing_if = "Option::is_none")]
    contents: Option<&'a str>,
}

/// Output formatter for different formats
pub struct OutputFormatter {
    format: OutputFormat,
    use_colors: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, use_colors: bool) -> Self {
        Self { format, use_colors }
    }

    pub fn print_report(&self, report: &AddReport<'_>) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Human => {
                self.print_human_report(report);
                Ok(())
            }
            OutputFormat::Json => self.print_json_report(report),
        }
    }

    fn print_human_report(&self, report: &AddReport<'_>) {
        for diagnostic in &report.outcome.diagnostics {
            eprintln!("{}", self.render_diagnostic(diagnostic));
        }

        if report.diff {
            print!("{}", self.render_diff(report.original, &report.outcome.text, report.manifest));
        }
        if report.dry_run && !report.diff {
            print!("{}", report.outcome.text);
        }

        let descriptor = report.descriptor;
        if report.outcome.changed {
            println!(
                "{} {} ({}) from {}",
                "Added".green().bold(),
                descriptor.identifier().bold(),
                descriptor.constraint(),
                descriptor.url()
            );
        } else {
            println!(
                "{} is already up to date in {}",
                descriptor.identifier().bold(),
                report.manifest.display()
            );
        }
    }

    fn print_json_report(&self, report: &AddReport<'_>) -> anyhow::Result<()> {
        let json = JsonReport {
            package: report.descriptor.identifier(),
            url: report.descriptor.url(),
            constraint: report.descriptor.constraint().to_string(),
            products: report.descriptor.products(),
            manifest: report.manifest.display().to_string(),
            changed: report.outcome.changed,
            written: report.written,
            diagnostics: &report.outcome.diagnostics,
            contents: report.dry_run.then_some(report.outcome.text.as_str()),
        };
        println!("{}", serde_json::to_string_pretty(&json)?);
        Ok(())
    }

    /// `--info` summary
    pub fn print_info(&self, info: &PackageInfo) -> anyhow::Result<()> {
        if self.format == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(info)?);
            return Ok(());
        }

        let products = info
            .products
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let versions = info.versions_newest_first().join(", ");

        println!();
        println!("{} {}", "    Name:".bright_black(), info.name.bright_blue());
        println!("{} {}", "     URL:".bright_black(), info.url.white());
        println!("{} {}", "Products:".bright_black(), products);
        println!("{} {}", "Versions:".bright_black(), versions);
        println!();
        Ok(())
    }

    pub fn print_error(&self, err: &anyhow::Error) {
        eprintln!("{} {:#}", "error:".red().bold(), err);
    }

    fn render_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let label = match diagnostic.severity {
            Severity::Warning => "warning".yellow().bold(),
            Severity::Info => "info".blue().bold(),
        };
        format!(
            "{}[{}]: {}",
            label,
            diagnostic.kind.code().dimmed(),
            diagnostic.message
        )
    }

    /// Unified diff between the original and edited manifest
    fn render_diff(&self, original: &str, modified: &str, path: &Path) -> String {
        let name = path.display().to_string();
        let diff = TextDiff::from_lines(original, modified);
        let unified = diff
            .unified_diff()
            .context_radius(3)
            .header(&format!("a/{name}"), &format!("b/{name}"))
            .to_string();
        if !self.use_colors {
            return unified;
        }

        let mut output = String::new();
        for line in unified.split_inclusive('\n') {
            let colored = if line.starts_with("+++") || line.starts_with("---") {
                line.bold().to_string()
            } else if line.starts_with("@@") {
                line.cyan().to_string()
            } else if line.starts_with('+') {
                line.green().to_string()
            } else if line.starts_with('-') {
                line.red().to_string()
            } else {
                line.to_string()
            };
            output.push_str(&colored);
        }
        output
    }

    /// Number of added and removed lines, for logging
    pub fn diff_stats(original: &str, modified: &str) -> (usize, usize) {
        TextDiff::from_lines(original, modified)
            .iter_all_changes()
            .fold((0, 0), |(added, removed), change| match change.tag() {
                ChangeTag::Insert => (added + 1, removed),
                ChangeTag::Delete => (added, removed + 1),
                ChangeTag::Equal => (added, removed),
            })
    }
}
