//! Append and reflow elements of an array literal

use rowan::{GreenNode, NodeOrToken};

use super::indent::FormatOptions;
use super::list::{self, green_children};
use super::TreeEdit;
use crate::cst::ast::{ArrayExpr, AstNode, Expr};
use crate::cst::trivia::{starts_line, Trivia};
use crate::cst::{GreenElement, ManifestSyntaxKind};

/// Array element editor for one array literal
pub struct ArrayEditor<'a> {
    array: &'a ArrayExpr,
    options: FormatOptions,
}

impl<'a> ArrayEditor<'a> {
    pub fn new(array: &'a ArrayExpr, options: FormatOptions) -> Self {
        Self { array, options }
    }

    /// Children of the array with the last element separated, and that
    /// element's index
    fn separated_children(&self) -> (Vec<GreenElement>, Option<usize>) {
        let mut children = green_children(self.array.syntax());
        let last = list::element_indices(&children, ManifestSyntaxKind::ArrayElement)
            .last()
            .copied();
        if let Some(index) = last {
            list::separate_element(&mut children, index);
        }
        (children, last)
    }

    /// Give the last element a `,` unless it has one or the array is empty
    pub fn ensure_trailing_separator_on_last_element(&self) -> TreeEdit {
        let (children, _) = self.separated_children();
        TreeEdit::new(
            self.array.syntax().clone(),
            list::node(ManifestSyntaxKind::ArrayExpr, children),
        )
    }

    /// Append `expr` on a new line at `indent_level`, leaving the existing
    /// elements as they are
    pub fn append_element(&self, expr: GreenNode, indent_level: usize) -> TreeEdit {
        let (mut children, last) = self.separated_children();
        let anchor = last.unwrap_or_else(|| {
            // Comments in an empty array stay above the new element.
            children
                .iter()
                .rposition(|child| list::kind_of(child).is_comment())
                .unwrap_or(0)
        });
        let leading = Trivia::newline_and_indent(
            self.options.line_ending,
            &self.options.indent.render(indent_level),
        );
        list::insert_after(
            &mut children,
            anchor,
            &leading,
            list::node(ManifestSyntaxKind::ArrayElement, vec![NodeOrToken::Node(expr)]),
        );
        TreeEdit::new(
            self.array.syntax().clone(),
            list::node(ManifestSyntaxKind::ArrayExpr, children),
        )
    }

    /// Rewrite the array one element per line
    ///
    /// Elements sit at `base_level + 1` and the closing bracket at
    /// `base_level`. Every element but the last is separated.
    pub fn reformat_to_multiline(&self, base_level: usize, exprs: Vec<GreenNode>) -> TreeEdit {
        let newline = self.options.line_ending;
        let element_indent = Trivia::newline_and_indent(newline, &self.options.indent.render(base_level + 1));
        let closing_indent = Trivia::newline_and_indent(newline, &self.options.indent.render(base_level));

        let count = exprs.len();
        let mut children = vec![list::token(ManifestSyntaxKind::LBracket, "[")];
        for (index, expr) in exprs.into_iter().enumerate() {
            children.extend(element_indent.to_green());
            let mut element = vec![NodeOrToken::Node(expr)];
            if index + 1 < count {
                element.push(list::token(ManifestSyntaxKind::Comma, ","));
            }
            children.push(NodeOrToken::Node(list::node(ManifestSyntaxKind::ArrayElement, element)));
        }
        children.extend(closing_indent.to_green());
        children.push(list::token(ManifestSyntaxKind::RBracket, "]"));

        TreeEdit::new(
            self.array.syntax().clone(),
            list::node(ManifestSyntaxKind::ArrayExpr, children),
        )
    }

    pub fn contains_element_matching(&self, predicate: impl Fn(&Expr) -> bool) -> bool {
        self.array
            .elements()
            .filter_map(|element| element.expr())
            .any(|expr| predicate(&expr))
    }

    /// Green nodes of the element expressions, in order
    pub fn expressions(&self) -> Vec<GreenNode> {
        self.array
            .elements()
            .filter_map(|element| element.expr())
            .map(|expr| expr.syntax().green().into_owned())
            .collect()
    }

    /// No line break between the brackets outside of elements
    pub fn is_inline(&self) -> bool {
        !self.direct_trivia().contains_newline()
    }

    /// Whether reflowing would lose a comment
    pub fn has_comments(&self) -> bool {
        self.direct_trivia().has_comments()
            || self.array.elements().any(|element| {
                element
                    .syntax()
                    .children_with_tokens()
                    .filter_map(|child| child.into_token())
                    .any(|token| token.kind().is_comment())
            })
    }

    /// Level of the line holding `[`
    pub fn base_level(&self) -> usize {
        self.array
            .l_bracket_token()
            .map_or(0, |token| self.options.indent.line_level(&token))
    }

    /// Level new elements should use to line up with the existing ones
    pub fn element_indent_level(&self) -> usize {
        self.array
            .elements()
            .last()
            .and_then(|element| element.syntax().first_token())
            .filter(starts_line)
            .map_or_else(
                || self.base_level() + 1,
                |token| self.options.indent.line_level(&token),
            )
    }

    fn direct_trivia(&self) -> Trivia {
        list::direct_trivia(&green_children(self.array.syntax()))
    }
}
