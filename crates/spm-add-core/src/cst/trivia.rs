//! Trivia handling for the manifest CST
//!
//! Trivia tokens are stored as siblings in the tree. This module projects
//! them onto the significant tokens they surround:
//!
//! - **Trailing trivia**: after a token, up to but excluding the first newline
//! - **Leading trivia**: everything before a token that is not the trailing
//!   trivia of the previous significant token
//!
//! It also synthesizes trivia for new nodes.

use rowan::{GreenToken, NodeOrToken};

use super::parser::GreenElement;
use super::{ManifestSyntaxKind, ManifestSyntaxToken};

/// One whitespace, newline or comment token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriviaPiece {
    pub kind: ManifestSyntaxKind,
    pub text: String,
}

impl TriviaPiece {
    pub fn new(kind: ManifestSyntaxKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn is_newline(&self) -> bool {
        self.kind == ManifestSyntaxKind::Newline
    }

    pub fn is_comment(&self) -> bool {
        self.kind.is_comment()
    }
}

/// An ordered run of trivia
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trivia {
    pieces: Vec<TriviaPiece>,
}

impl Trivia {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single space
    pub fn space() -> Self {
        let mut trivia = Self::new();
        trivia.push(TriviaPiece::new(ManifestSyntaxKind::Whitespace, " "));
        trivia
    }

    /// A line break followed by `indent`
    pub fn newline_and_indent(newline: &str, indent: &str) -> Self {
        let mut trivia = Self::new();
        trivia.push(TriviaPiece::new(ManifestSyntaxKind::Newline, newline));
        if !indent.is_empty() {
            trivia.push(TriviaPiece::new(ManifestSyntaxKind::Whitespace, indent));
        }
        trivia
    }

    pub fn push(&mut self, piece: TriviaPiece) {
        self.pieces.push(piece);
    }

    pub fn pieces(&self) -> &[TriviaPiece] {
        &self.pieces
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn contains_newline(&self) -> bool {
        self.pieces
            .iter()
            .any(|p| p.is_newline() || (p.is_comment() && p.text.contains('\n')))
    }

    pub fn has_comments(&self) -> bool {
        self.pieces.iter().any(TriviaPiece::is_comment)
    }

    pub fn ends_with_line_comment(&self) -> bool {
        self.pieces
            .last()
            .is_some_and(|p| p.kind == ManifestSyntaxKind::LineComment)
    }

    pub fn text(&self) -> String {
        self.pieces.iter().map(|p| p.text.as_str()).collect()
    }

    /// Green tokens for splicing into a tree
    pub fn to_green(&self) -> Vec<GreenElement> {
        self.pieces
            .iter()
            .map(|p| NodeOrToken::Token(GreenToken::new(p.kind.into(), &p.text)))
            .collect()
    }
}

impl FromIterator<TriviaPiece> for Trivia {
    fn from_iter<I: IntoIterator<Item = TriviaPiece>>(iter: I) -> Self {
        Self {
            pieces: iter.into_iter().collect(),
        }
    }
}

fn piece(token: &ManifestSyntaxToken) -> TriviaPiece {
    TriviaPiece::new(token.kind(), token.text())
}

/// Trivia after `token` up to (excluding) the first newline
pub fn trailing_trivia(token: &ManifestSyntaxToken) -> Trivia {
    std::iter::successors(token.next_token(), |t| t.next_token())
        .take_while(|t| t.kind().is_trivia() && t.kind() != ManifestSyntaxKind::Newline)
        .map(|t| piece(&t))
        .collect()
}

/// Trivia before `token` that is not trailing trivia of the previous
/// significant token
pub fn leading_trivia(token: &ManifestSyntaxToken) -> Trivia {
    let mut before: Vec<ManifestSyntaxToken> =
        std::iter::successors(token.prev_token(), |t| t.prev_token())
            .take_while(|t| t.kind().is_trivia())
            .collect();
    before.reverse();

    let at_file_start = before
        .first()
        .map_or_else(|| token.prev_token(), |t| t.prev_token())
        .is_none();
    let start = if at_file_start {
        0
    } else {
        before
            .iter()
            .position(|t| t.kind() == ManifestSyntaxKind::Newline)
            .unwrap_or(before.len())
    };

    before[start..].iter().map(piece).collect()
}

/// Whitespace prefix of the line that holds `token`
pub fn line_indentation(token: &ManifestSyntaxToken) -> String {
    let mut segments = Vec::new();
    let mut current = token.prev_token();
    while let Some(tok) = current {
        let text = tok.text();
        if let Some(newline) = text.rfind(['\n', '\r']) {
            segments.push(text[newline + 1..].to_string());
            break;
        }
        segments.push(text.to_string());
        current = tok.prev_token();
    }
    segments.reverse();

    segments
        .concat()
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}

/// Whether a newline separates `token` from the previous significant token
pub fn starts_line(token: &ManifestSyntaxToken) -> bool {
    std::iter::successors(token.prev_token(), |t| t.prev_token())
        .take_while(|t| t.kind().is_trivia())
        .any(|t| t.kind() == ManifestSyntaxKind::Newline || t.text().contains('\n'))
}

/// The line break style used by a document (`\r\n` if its first line break is one)
pub fn detect_line_ending(text: &str) -> &'static str {
    match text.find('\n') {
        Some(index) if index > 0 && text.as_bytes()[index - 1] == b'\r' => "\r\n",
        _ => "\n",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::SyntaxTree;

    fn token(tree: &SyntaxTree, text: &str) -> ManifestSyntaxToken {
        tree.syntax()
            .descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.text() == text)
            .unwrap()
    }

    const SOURCE: &str = "let x = [\n    a, // first\n    /* lead */ b\n]";

    #[test]
    fn test_trailing_trivia_stops_at_newline() {
        let tree = SyntaxTree::parse(SOURCE).unwrap();
        let comma = token(&tree, ",");
        let trailing = trailing_trivia(&comma);
        assert_eq!(trailing.text(), " // first");
        assert!(trailing.ends_with_line_comment());
        assert!(!trailing.contains_newline());
    }

    #[test]
    fn test_leading_trivia_starts_at_newline() {
        let tree = SyntaxTree::parse(SOURCE).unwrap();
        let b = token(&tree, "b");
        let leading = leading_trivia(&b);
        assert_eq!(leading.text(), "\n    /* lead */ ");
        assert!(leading.has_comments());
        assert!(starts_line(&b));
    }

    #[test]
    fn test_leading_trivia_at_file_start() {
        let tree = SyntaxTree::parse("  // header\nlet x = 1").unwrap();
        let let_kw = token(&tree, "let");
        assert_eq!(leading_trivia(&let_kw).text(), "  // header\n");
    }

    #[test]
    fn test_line_indentation() {
        let tree = SyntaxTree::parse(SOURCE).unwrap();
        assert_eq!(line_indentation(&token(&tree, "b")), "    ");
        assert_eq!(line_indentation(&token(&tree, "let")), "");
        assert_eq!(line_indentation(&token(&tree, "]")), "");
        assert!(!starts_line(&token(&tree, "x")));
    }

    #[test]
    fn test_synthesized_trivia() {
        let trivia = Trivia::newline_and_indent("\n", "\t");
        assert_eq!(trivia.text(), "\n\t");
        assert_eq!(trivia.to_green().len(), 2);
        assert!(Trivia::newline_and_indent("\n", "").pieces().len() == 1);
        assert_eq!(Trivia::space().text(), " ");
    }

    #[test]
    fn test_detect_line_ending() {
        assert_eq!(detect_line_ending("a\r\nb"), "\r\n");
        assert_eq!(detect_line_ending("a\nb"), "\n");
        assert_eq!(detect_line_ending("abc"), "\n");
    }
}
