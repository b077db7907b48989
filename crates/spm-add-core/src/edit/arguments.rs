//! Locate, insert and replace labeled arguments of a call expression

use rowan::{GreenNode, NodeOrToken};

use super::indent::FormatOptions;
use super::list::{self, green_children};
use super::TreeEdit;
use crate::cst::ast::{Argument, AstNode, CallExpr};
use crate::cst::trivia::Trivia;
use crate::cst::ManifestSyntaxKind;
use crate::diagnostics::Diagnostic;

/// Argument accessor for one call expression
pub struct ArgumentEditor<'a> {
    call: &'a CallExpr,
    options: FormatOptions,
}

impl<'a> ArgumentEditor<'a> {
    pub fn new(call: &'a CallExpr, options: FormatOptions) -> Self {
        Self { call, options }
    }

    /// First argument whose label matches exactly, with its position
    pub fn find(&self, label: &str) -> Option<(usize, Argument)> {
        self.call
            .arguments()
            .enumerate()
            .find(|(_, argument)| argument.label().as_deref() == Some(label))
    }

    pub fn has_argument_of_shape(&self, label: &str, kind: ManifestSyntaxKind) -> bool {
        self.find(label)
            .and_then(|(_, argument)| argument.value())
            .is_some_and(|value| value.kind() == kind)
    }

    /// Whether the argument list already spans several lines
    pub fn is_multiline(&self) -> bool {
        self.call
            .argument_list()
            .is_some_and(|list| list::direct_trivia(&green_children(list.syntax())).contains_newline())
    }

    /// Insert `label: value` right after the first present argument among
    /// `candidates`
    ///
    /// On its own line, the new argument is indented one level past the line
    /// that opens the call. The previous argument gains a separator, and the
    /// new one gets a separator unless it is last.
    pub fn insert_after_first_of(
        &self,
        candidates: &[&str],
        label: &str,
        value: GreenNode,
        on_own_line: bool,
    ) -> Result<TreeEdit, Diagnostic> {
        let missing = || Diagnostic::missing_anchor(label, candidates);
        let list = self.call.argument_list().ok_or_else(missing)?;
        let (position, anchor) = candidates
            .iter()
            .find_map(|candidate| self.find(candidate))
            .ok_or_else(missing)?;
        let is_last = position + 1 == self.call.arguments().count();

        let mut children = green_children(list.syntax());
        let anchor_index = anchor.syntax().index();
        list::separate_element(&mut children, anchor_index);

        let own_line = on_own_line || list::trailing_line_comment(&children, anchor_index);
        let leading = if own_line {
            Trivia::newline_and_indent(
                self.options.line_ending,
                &self.options.indent.render(self.call_level() + 1),
            )
        } else {
            Trivia::space()
        };

        let mut argument = vec![
            list::token(
                ManifestSyntaxKind::from_keyword(label).unwrap_or(ManifestSyntaxKind::Ident),
                label,
            ),
            list::token(ManifestSyntaxKind::Colon, ":"),
            list::token(ManifestSyntaxKind::Whitespace, " "),
            NodeOrToken::Node(value),
        ];
        if !is_last {
            argument.push(list::token(ManifestSyntaxKind::Comma, ","));
        }

        list::insert_after(
            &mut children,
            anchor_index,
            &leading,
            list::node(ManifestSyntaxKind::Argument, argument),
        );
        tracing::trace!(label, own_line, "inserted argument");
        Ok(TreeEdit::new(
            list.syntax().clone(),
            list::node(ManifestSyntaxKind::ArgumentList, children),
        ))
    }

    /// Swap the value of an existing argument, keeping its label, trivia and
    /// separator
    pub fn replace(&self, label: &str, value: GreenNode) -> Option<TreeEdit> {
        let (_, argument) = self.find(label)?;
        let old = argument.value()?;
        Some(TreeEdit::new(old.syntax().clone(), value))
    }

    fn call_level(&self) -> usize {
        self.call
            .syntax()
            .first_token()
            .map_or(0, |token| self.options.indent.line_level(&token))
    }
}
