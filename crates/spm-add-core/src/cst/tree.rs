//! Immutable syntax tree value

use std::fmt;

use rowan::GreenNode;

use super::ast::{AstNode, SourceFile};
use super::parser::{ParseError, parse};
use super::printer::print_green;
use super::ManifestSyntaxNode;

/// A parsed manifest
///
/// Wraps the green root, which is immutable, thread-safe and cheap to clone.
/// Edits never mutate a tree: they produce a new `SyntaxTree` sharing every
/// untouched subtree with the old one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyntaxTree {
    green: GreenNode,
}

impl SyntaxTree {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        parse(text)
    }

    pub(crate) fn from_green(green: GreenNode) -> Self {
        Self { green }
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// Fresh red view of the tree
    pub fn syntax(&self) -> ManifestSyntaxNode {
        ManifestSyntaxNode::new_root(self.green.clone())
    }

    pub fn source_file(&self) -> Option<SourceFile> {
        SourceFile::cast(self.syntax())
    }

    /// Reproduce the text, including any synthesized trivia
    pub fn print(&self) -> String {
        print_green(&self.green)
    }
}

impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.print())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_tree_is_thread_safe_value() {
        assert_send_sync::<SyntaxTree>();
    }

    #[test]
    fn test_display_matches_print() {
        let tree = SyntaxTree::parse("let package = Package(name: \"x\")\n").unwrap();
        assert_eq!(tree.to_string(), tree.print());
        assert!(tree.source_file().is_some());
    }
}
