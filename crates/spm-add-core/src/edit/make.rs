//! Constructors for new syntax nodes
//!
//! Snippets are rendered as text and run through the expression parser, so
//! a synthesized node has exactly the shape of a parsed one.

use rowan::GreenNode;

use crate::cst::parse_expression;
use crate::descriptor::DependencyDescriptor;
use crate::error::SpmAddError;
use crate::result::Result;

/// Quote and escape `value` as a string literal
pub fn string_literal(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => literal.push_str("\\\\"),
            '"' => literal.push_str("\\\""),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            other => literal.push(other),
        }
    }
    literal.push('"');
    literal
}

/// Parse a generated expression snippet
pub fn expression(source: &str) -> Result<GreenNode> {
    parse_expression(source).map_err(|err| {
        SpmAddError::internal_error(format!("generated invalid syntax `{source}`: {err}"))
    })
}

/// `.package(name: "<id>", url: "<url>", from: "<v>")`, or `branch:` for
/// branch references
pub fn package_reference(descriptor: &DependencyDescriptor) -> Result<GreenNode> {
    let constraint = descriptor.constraint();
    expression(&format!(
        ".package(name: {}, url: {}, {}: {})",
        string_literal(descriptor.identifier()),
        string_literal(descriptor.url()),
        constraint.label(),
        string_literal(constraint.value()),
    ))
}

/// `.product(name: "<product>", package: "<package>")`
pub fn product_reference(product: &str, package: &str) -> Result<GreenNode> {
    expression(&format!(
        ".product(name: {}, package: {})",
        string_literal(product),
        string_literal(package),
    ))
}

/// `[]`
pub fn empty_array() -> Result<GreenNode> {
    expression("[]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::print_green;
    use crate::descriptor::VersionConstraint;

    #[test]
    fn test_package_reference_exact() {
        let descriptor = DependencyDescriptor::new(
            "Files",
            "https://github.com/x/Files.git",
            VersionConstraint::Exact("0.4.1".into()),
        );
        let node = package_reference(&descriptor).unwrap();
        assert_eq!(
            print_green(&node),
            r#".package(name: "Files", url: "https://github.com/x/Files.git", from: "0.4.1")"#
        );
    }

    #[test]
    fn test_package_reference_branch() {
        let descriptor = DependencyDescriptor::new(
            "swift-log",
            "https://github.com/apple/swift-log",
            VersionConstraint::Branch("main".into()),
        );
        let node = package_reference(&descriptor).unwrap();
        assert!(print_green(&node).ends_with(r#"branch: "main")"#));
    }

    #[test]
    fn test_product_reference() {
        let node = product_reference("Files", "Files").unwrap();
        assert_eq!(print_green(&node), r#".product(name: "Files", package: "Files")"#);
    }

    #[test]
    fn test_string_literal_escapes() {
        assert_eq!(string_literal(r#"a"b\c"#), r#""a\"b\\c""#);
        let node = expression(&string_literal("x\"\n")).unwrap();
        assert_eq!(print_green(&node), r#""x\"\n""#);
    }
}
