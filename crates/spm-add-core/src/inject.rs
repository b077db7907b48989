//! Dependency injection into the root `Package(…)` call
//!
//! The injector adds a `.package(…)` reference to the package's
//! `dependencies` array and wires the requested products into the first
//! target. Each step applies at most one [`TreeEdit`] and re-locates the
//! nodes it needs in the new tree, so a step either fully applies or leaves
//! the tree as it was.
//!
//! ```
//! use spm_add_core::{inject_text, DependencyDescriptor, VersionConstraint};
//!
//! let manifest = "let package = Package(\n    name: \"Demo\",\n    targets: [\n        .target(name: \"Demo\")\n    ]\n)\n";
//! let descriptor = DependencyDescriptor::new(
//!     "Files",
//!     "https://github.com/JohnSundell/Files.git",
//!     VersionConstraint::Exact("4.0.0".into()),
//! )
//! .with_products(["Files"]);
//!
//! let outcome = inject_text(manifest, &descriptor).unwrap();
//! assert!(outcome.changed);
//! assert!(outcome.text.contains(".product(name: \"Files\", package: \"Files\")"));
//! ```

use serde::Serialize;
use tracing::{debug, info};

use crate::cst::ast::{ArrayExpr, CallExpr, Expr};
use crate::cst::{ManifestSyntaxKind, SyntaxTree};
use crate::descriptor::{identifier_from_url, normalize_url, DependencyDescriptor};
use crate::diagnostics::Diagnostic;
use crate::edit::{make, ArgumentEditor, ArrayEditor, FormatOptions, IndentStyle, TreeEdit};
use crate::error::SpmAddError;
use crate::result::Result;

/// Result of injecting into a tree
#[derive(Debug, Clone)]
pub struct InjectOutcome {
    pub tree: SyntaxTree,
    /// Whether any edit was applied
    pub changed: bool,
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of injecting into manifest text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextOutcome {
    pub text: String,
    pub changed: bool,
    pub diagnostics: Vec<Diagnostic>,
}

/// Dependency injector
///
/// Without an explicit indent style, the style is detected from each
/// manifest.
#[derive(Debug, Clone, Copy, Default)]
pub struct Injector {
    indent: Option<IndentStyle>,
}

impl Injector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent(indent: IndentStyle) -> Self {
        Self {
            indent: Some(indent),
        }
    }

    pub fn inject(&self, tree: &SyntaxTree, descriptor: &DependencyDescriptor) -> Result<InjectOutcome> {
        let text = tree.print();
        let detected = FormatOptions::detect(&text);
        let options = match self.indent {
            Some(indent) => detected.with_indent(indent),
            None => detected,
        };
        Session {
            tree: tree.clone(),
            options,
            descriptor,
            changed: false,
            diagnostics: Vec::new(),
        }
        .run()
    }

    /// Parse, inject and print
    ///
    /// A [`crate::ParseError`] is returned unchanged as
    /// [`SpmAddError::Parse`].
    pub fn inject_text(&self, text: &str, descriptor: &DependencyDescriptor) -> Result<TextOutcome> {
        let tree = SyntaxTree::parse(text)?;
        let outcome = self.inject(&tree, descriptor)?;
        Ok(TextOutcome {
            text: outcome.tree.print(),
            changed: outcome.changed,
            diagnostics: outcome.diagnostics,
        })
    }
}

/// Inject with the detected indent style
pub fn inject(tree: &SyntaxTree, descriptor: &DependencyDescriptor) -> Result<InjectOutcome> {
    Injector::new().inject(tree, descriptor)
}

/// Parse, inject and print with the detected indent style
pub fn inject_text(text: &str, descriptor: &DependencyDescriptor) -> Result<TextOutcome> {
    Injector::new().inject_text(text, descriptor)
}

/// What the package dependency step left behind for target wiring
enum PackageStep {
    /// Declared (or already present) under this identifier
    Declared(String),
    /// `dependencies` has another shape; it may still declare the package
    Unknown,
    /// Nowhere to declare it
    Skipped,
}

struct Session<'d> {
    tree: SyntaxTree,
    options: FormatOptions,
    descriptor: &'d DependencyDescriptor,
    changed: bool,
    diagnostics: Vec<Diagnostic>,
}

impl Session<'_> {
    fn run(mut self) -> Result<InjectOutcome> {
        if self.package_call().is_none() {
            debug!("no root package call");
            self.diagnostics.push(Diagnostic::no_root_package_found());
            return Ok(self.finish());
        }

        let identifier = match self.add_package()? {
            PackageStep::Declared(identifier) => identifier,
            PackageStep::Unknown => self.descriptor.identifier().to_string(),
            PackageStep::Skipped => return Ok(self.finish()),
        };
        self.wire_products(&identifier)?;
        Ok(self.finish())
    }

    fn finish(self) -> InjectOutcome {
        debug!(
            changed = self.changed,
            diagnostics = self.diagnostics.len(),
            "injection finished"
        );
        InjectOutcome {
            tree: self.tree,
            changed: self.changed,
            diagnostics: self.diagnostics,
        }
    }

    fn apply(&mut self, edit: TreeEdit) {
        if edit.is_noop() {
            return;
        }
        self.tree = edit.apply();
        self.changed = true;
    }

    fn package_call(&self) -> Option<CallExpr> {
        self.tree.source_file()?.package_call()
    }

    fn package_dependencies(&self) -> Option<ArrayExpr> {
        argument_array(&self.package_call()?, "dependencies")
    }

    fn targets(&self) -> Option<Expr> {
        self.package_call()?.argument("targets")?.value()
    }

    fn first_target(&self) -> Option<CallExpr> {
        self.targets()?.as_array()?.elements().next()?.expr()?.as_call()
    }

    fn add_package(&mut self) -> Result<PackageStep> {
        let call = relocate(self.package_call(), "the package call")?;
        let arguments = ArgumentEditor::new(&call, self.options);
        match arguments.find("dependencies") {
            Some(_) if !arguments.has_argument_of_shape("dependencies", ManifestSyntaxKind::ArrayExpr) => {
                debug!("package dependencies are not an array literal");
                self.diagnostics
                    .push(Diagnostic::structural_mismatch("dependencies", "an array literal"));
                return Ok(PackageStep::Unknown);
            }
            Some(_) => {}
            None => {
                debug!("adding an empty dependencies argument");
                let inserted = arguments.insert_after_first_of(
                    &["name", "platforms"],
                    "dependencies",
                    make::empty_array()?,
                    arguments.is_multiline(),
                );
                match inserted {
                    Ok(edit) => self.apply(edit),
                    Err(diagnostic) => {
                        self.diagnostics.push(diagnostic);
                        return Ok(PackageStep::Skipped);
                    }
                }
            }
        }

        let array = relocate(self.package_dependencies(), "the package dependencies")?;
        if let Some(existing) = declared_identifier(&array, self.descriptor.url()) {
            debug!(identifier = %existing, "package is already declared");
            self.diagnostics
                .push(Diagnostic::duplicate_package(self.descriptor.url(), &existing));
            return Ok(PackageStep::Declared(existing));
        }

        let editor = ArrayEditor::new(&array, self.options);
        let reference = make::package_reference(self.descriptor)?;
        let edit = if array.is_empty() && editor.is_inline() && !editor.has_comments() {
            editor.reformat_to_multiline(editor.base_level(), vec![reference])
        } else {
            editor.append_element(reference, editor.element_indent_level())
        };
        self.apply(edit);
        info!(
            package = self.descriptor.identifier(),
            url = self.descriptor.url(),
            "added package dependency"
        );
        Ok(PackageStep::Declared(self.descriptor.identifier().to_string()))
    }

    fn wire_products(&mut self, package: &str) -> Result<()> {
        let Some(targets) = self.targets() else {
            self.diagnostics.push(Diagnostic::no_targets_to_wire());
            return Ok(());
        };
        let Some(targets) = targets.as_array() else {
            self.diagnostics
                .push(Diagnostic::structural_mismatch("targets", "an array literal"));
            return Ok(());
        };
        if targets.is_empty() {
            self.diagnostics.push(Diagnostic::no_targets_to_wire());
            return Ok(());
        }
        let Some(target) = self.first_target() else {
            self.diagnostics
                .push(Diagnostic::structural_mismatch("the first target", "a target call"));
            return Ok(());
        };

        let mut pending = Vec::new();
        for product in self.descriptor.products() {
            let wired = argument_array(&target, "dependencies")
                .is_some_and(|array| contains_product(&array, product, package));
            if wired {
                debug!(product = %product, "product is already wired");
                self.diagnostics
                    .push(Diagnostic::product_already_wired(product, package));
            } else {
                pending.push(make::product_reference(product, package)?);
            }
        }
        if pending.is_empty() {
            return Ok(());
        }
        let count = pending.len();

        let arguments = ArgumentEditor::new(&target, self.options);
        match arguments.find("dependencies") {
            Some(_) if !arguments.has_argument_of_shape("dependencies", ManifestSyntaxKind::ArrayExpr) => {
                self.diagnostics.push(Diagnostic::structural_mismatch(
                    "dependencies of the first target",
                    "an array literal",
                ));
                return Ok(());
            }
            Some(_) => {}
            None => {
                debug!("adding an empty dependencies argument to the first target");
                let inserted = arguments.insert_after_first_of(
                    &["name"],
                    "dependencies",
                    make::empty_array()?,
                    arguments.is_multiline(),
                );
                match inserted {
                    Ok(edit) => self.apply(edit),
                    Err(diagnostic) => {
                        self.diagnostics.push(diagnostic);
                        return Ok(());
                    }
                }
            }
        }

        let target = relocate(self.first_target(), "the first target")?;
        let array = relocate(argument_array(&target, "dependencies"), "the target dependencies")?;
        let editor = ArrayEditor::new(&array, self.options);
        if editor.is_inline() && !editor.has_comments() {
            let mut exprs = editor.expressions();
            exprs.extend(pending);
            self.apply(editor.reformat_to_multiline(editor.base_level(), exprs));
        } else {
            let level = editor.element_indent_level();
            for reference in pending {
                let target = relocate(self.first_target(), "the first target")?;
                let array = relocate(argument_array(&target, "dependencies"), "the target dependencies")?;
                self.apply(ArrayEditor::new(&array, self.options).append_element(reference, level));
            }
        }
        info!(package, products = count, "wired products into the first target");
        Ok(())
    }
}

fn relocate<T>(node: Option<T>, what: &str) -> Result<T> {
    node.ok_or_else(|| SpmAddError::internal_error(format!("lost track of {what} after an edit")))
}

fn argument_array(call: &CallExpr, label: &str) -> Option<ArrayExpr> {
    call.argument(label)?.value()?.as_array()
}

/// `.name(…)` calls, with their argument list
fn member_call(expr: &Expr, name: &str) -> Option<CallExpr> {
    let call = expr.as_call()?;
    let member = call.callee()?.as_member_access()?;
    (member.base().is_none() && member.name().as_deref() == Some(name)).then_some(call)
}

fn string_argument(call: &CallExpr, label: &str) -> Option<String> {
    call.argument(label)?.value()?.as_string_literal()?.value()
}

/// Identifier of an existing `.package(…)` whose URL matches `url`
fn declared_identifier(array: &ArrayExpr, url: &str) -> Option<String> {
    let wanted = normalize_url(url);
    array
        .elements()
        .filter_map(|element| element.expr())
        .filter_map(|expr| member_call(&expr, "package"))
        .find_map(|call| {
            let existing = string_argument(&call, "url")?;
            (normalize_url(&existing) == wanted).then(|| {
                string_argument(&call, "name").unwrap_or_else(|| identifier_from_url(&existing))
            })
        })
}

/// Whether `array` holds `.product(name: product, package: package)`
fn contains_product(array: &ArrayExpr, product: &str, package: &str) -> bool {
    ArrayEditor::new(array, FormatOptions::default()).contains_element_matching(|expr| {
        member_call(expr, "product").is_some_and(|call| {
            string_argument(&call, "name").as_deref() == Some(product)
                && string_argument(&call, "package").as_deref() == Some(package)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::VersionConstraint;
    use crate::diagnostics::DiagnosticKind;

    fn files() -> DependencyDescriptor {
        DependencyDescriptor::new(
            "Files",
            "https://github.com/x/Files.git",
            VersionConstraint::Exact("0.4.1".into()),
        )
        .with_products(["Files"])
    }

    fn kinds(outcome: &TextOutcome) -> Vec<DiagnosticKind> {
        outcome.diagnostics.iter().map(|d| d.kind).collect()
    }

    #[test]
    fn test_missing_root_is_a_noop() {
        let source = "let other = Target(name: \"x\")\n";
        let outcome = inject_text(source, &files()).unwrap();
        assert!(!outcome.changed);
        assert_eq!(outcome.text, source);
        assert_eq!(kinds(&outcome), [DiagnosticKind::NoRootPackageFound]);
    }

    #[test]
    fn test_qualified_package_call_is_not_the_root() {
        let source = "let package = Foo.Package(name: \"Demo\")\n";
        let outcome = inject_text(source, &files()).unwrap();
        assert!(!outcome.changed);
        assert_eq!(outcome.text, source);
        assert_eq!(kinds(&outcome), [DiagnosticKind::NoRootPackageFound]);
    }

    #[test]
    fn test_adds_package_without_targets() {
        let outcome = inject_text("let package = Package(name: \"Demo\")", &files()).unwrap();
        assert!(outcome.changed);
        assert_eq!(
            outcome.text,
            "let package = Package(name: \"Demo\", dependencies: [\n    .package(name: \"Files\", url: \"https://github.com/x/Files.git\", from: \"0.4.1\")\n])"
        );
        assert_eq!(kinds(&outcome), [DiagnosticKind::NoTargetsToWire]);
    }

    #[test]
    fn test_dependencies_of_another_shape_are_left_alone() {
        let source = "let package = Package(\n    name: \"Demo\",\n    dependencies: deps,\n    targets: [\n        .target(name: \"Demo\")\n    ]\n)";
        let outcome = inject_text(source, &files()).unwrap();
        assert!(outcome.text.contains("dependencies: deps,"));
        assert!(outcome
            .text
            .contains(".target(name: \"Demo\", dependencies: [\n            .product(name: \"Files\", package: \"Files\")\n        ])"));
        assert_eq!(kinds(&outcome), [DiagnosticKind::StructuralMismatch]);
    }

    #[test]
    fn test_missing_anchor_skips_everything() {
        let source = "let package = Package(targets: [])";
        let outcome = inject_text(source, &files()).unwrap();
        assert!(!outcome.changed);
        assert_eq!(outcome.text, source);
        assert_eq!(kinds(&outcome), [DiagnosticKind::MissingAnchor]);
    }

    #[test]
    fn test_first_target_must_be_a_call() {
        let source = "let package = Package(name: \"Demo\", dependencies: [], targets: [demoTarget])";
        let outcome = inject_text(source, &files()).unwrap();
        assert!(outcome.changed);
        assert!(outcome.text.ends_with("targets: [demoTarget])"));
        assert_eq!(kinds(&outcome), [DiagnosticKind::StructuralMismatch]);
    }

    #[test]
    fn test_duplicate_url_is_normalized() {
        let source = "let package = Package(\n    name: \"Demo\",\n    dependencies: [\n        .package(url: \"https://GitHub.com/x/Files/\", from: \"0.1.0\"),\n    ]\n)";
        let outcome = inject_text(source, &files()).unwrap();
        assert!(!outcome.changed);
        assert_eq!(
            kinds(&outcome),
            [DiagnosticKind::DuplicatePackage, DiagnosticKind::NoTargetsToWire]
        );
    }

    #[test]
    fn test_explicit_indent_style_wins() {
        let injector = Injector::with_indent(IndentStyle::spaces(2));
        let outcome = injector
            .inject_text("let package = Package(\n    name: \"Demo\"\n)", &files())
            .unwrap();
        assert!(outcome
            .text
            .contains("  dependencies: [\n    .package(name: \"Files\""));
    }

    #[test]
    fn test_parse_errors_are_propagated() {
        let err = inject_text("let package = Package(name: \"Demo\"", &files()).unwrap_err();
        assert!(matches!(err, SpmAddError::Parse(_)));
    }
}
