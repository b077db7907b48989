//! Green-level helpers shared by argument lists and array literals
//!
//! Both are a delimiter token, a mix of trivia tokens and element nodes, and a
//! closing delimiter. Each element node ends with its separator, if any.

use rowan::{GreenNode, GreenNodeData, GreenToken, Language, NodeOrToken};

use crate::cst::trivia::Trivia;
use crate::cst::{GreenElement, ManifestLanguage, ManifestSyntaxKind, ManifestSyntaxNode};

pub(crate) fn kind_of(element: &GreenElement) -> ManifestSyntaxKind {
    let raw = match element {
        NodeOrToken::Node(node) => node.kind(),
        NodeOrToken::Token(token) => token.kind(),
    };
    ManifestLanguage::kind_from_raw(raw)
}

/// Owned copies of a green node's children (shared, not deep-cloned)
pub(crate) fn owned_children(node: &GreenNodeData) -> Vec<GreenElement> {
    node.children()
        .map(|child| match child {
            NodeOrToken::Node(node) => NodeOrToken::Node(node.to_owned()),
            NodeOrToken::Token(token) => NodeOrToken::Token(token.to_owned()),
        })
        .collect()
}

pub(crate) fn green_children(node: &ManifestSyntaxNode) -> Vec<GreenElement> {
    owned_children(&node.green())
}

pub(crate) fn token(kind: ManifestSyntaxKind, text: &str) -> GreenElement {
    NodeOrToken::Token(GreenToken::new(kind.into(), text))
}

pub(crate) fn node(kind: ManifestSyntaxKind, children: Vec<GreenElement>) -> GreenNode {
    GreenNode::new(kind.into(), children)
}

/// Indices of the element nodes among `children`
pub(crate) fn element_indices(children: &[GreenElement], element_kind: ManifestSyntaxKind) -> Vec<usize> {
    children
        .iter()
        .enumerate()
        .filter(|(_, child)| kind_of(child) == element_kind)
        .map(|(index, _)| index)
        .collect()
}

pub(crate) fn has_separator(element: &GreenNodeData) -> bool {
    element.children().last().is_some_and(|child| {
        child
            .as_token()
            .is_some_and(|t| ManifestLanguage::kind_from_raw(t.kind()) == ManifestSyntaxKind::Comma)
    })
}

/// The element with a trailing `,`, or unchanged if it already has one
pub(crate) fn with_separator(element: &GreenNodeData) -> GreenNode {
    if has_separator(element) {
        return element.to_owned();
    }
    let mut children = owned_children(element);
    children.push(token(ManifestSyntaxKind::Comma, ","));
    GreenNode::new(element.kind(), children)
}

/// Make sure the element at `index` ends with a separator
pub(crate) fn separate_element(children: &mut [GreenElement], index: usize) -> bool {
    let Some(NodeOrToken::Node(element)) = children.get(index) else {
        return false;
    };
    if has_separator(element) {
        return false;
    }
    let separated = with_separator(element);
    children[index] = NodeOrToken::Node(separated);
    true
}

/// Index just past the trivia that trails the child at `anchor` on its line
pub(crate) fn end_of_trailing_trivia(children: &[GreenElement], anchor: usize) -> usize {
    let mut end = anchor + 1;
    while let Some(child) = children.get(end) {
        let kind = kind_of(child);
        if !kind.is_trivia() || kind == ManifestSyntaxKind::Newline {
            break;
        }
        end += 1;
    }
    end
}

/// Whether the trivia trailing the child at `anchor` ends in a line comment
pub(crate) fn trailing_line_comment(children: &[GreenElement], anchor: usize) -> bool {
    let end = end_of_trailing_trivia(children, anchor);
    children
        .get(anchor + 1..end)
        .is_some_and(|trailing| direct_trivia(trailing).ends_with_line_comment())
}

/// Insert `leading` trivia and `element` after the child at `anchor`
///
/// When the new element starts its own line, the anchor's same-line trivia
/// (e.g. a `// comment`) stays attached to the anchor.
pub(crate) fn insert_after(
    children: &mut Vec<GreenElement>,
    anchor: usize,
    leading: &Trivia,
    element: GreenNode,
) -> usize {
    let at = if leading.contains_newline() {
        end_of_trailing_trivia(children, anchor)
    } else {
        anchor + 1
    };
    let mut inserted = leading.to_green();
    inserted.push(NodeOrToken::Node(element));
    let count = inserted.len();
    children.splice(at..at, inserted);
    at + count - 1
}

/// Trivia tokens that sit directly in the list (not inside elements)
pub(crate) fn direct_trivia(children: &[GreenElement]) -> Trivia {
    children
        .iter()
        .filter_map(|child| child.as_token())
        .filter(|t| ManifestLanguage::kind_from_raw(t.kind()).is_trivia())
        .map(|t| {
            crate::cst::trivia::TriviaPiece::new(ManifestLanguage::kind_from_raw(t.kind()), t.text())
        })
        .collect()
}
