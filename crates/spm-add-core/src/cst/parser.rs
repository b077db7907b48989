//! Recursive-descent parser for Swift package manifests
//!
//! The parser builds Rowan green nodes bottom-up, which makes backtracking a
//! matter of resetting the token position. Declarations the structured
//! grammar cannot express fall back to opaque `Statement` nodes, so the only
//! hard failures are lexer errors and unbalanced delimiters.
//!
//! Trivia in front of a node is attached to the enclosing node, never to the
//! node itself. A list element therefore spans exactly from its first
//! significant token to its separator.

use std::ops::Range;

use rowan::{GreenNode, GreenToken, NodeOrToken};

use super::lexer::{CstToken, LexerError, lex_with_trivia};
use super::{ManifestSyntaxKind, SyntaxTree};

/// Owned green child (node or token)
pub type GreenElement = NodeOrToken<GreenNode, GreenToken>;

/// Deepest expression nesting the structured grammar accepts
pub const MAX_NESTING_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    /// 1-based line
    pub line: usize,
    /// 1-based column, counted in characters
    pub column: usize,
    pub offset: usize,
    pub length: usize,
    pub span: Range<usize>,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    Lexer,
    UnbalancedDelimiter,
    InvalidExpression,
    NestingTooDeep,
}

impl ParseError {
    fn from_span(source: &str, message: String, span: Range<usize>, kind: ParseErrorKind) -> Self {
        let (line, column) = offset_to_line_col(source, span.start);
        let length = span.end.saturating_sub(span.start);
        Self {
            message,
            line,
            column,
            offset: span.start,
            length,
            span,
            kind,
        }
    }

    fn from_lexer(source: &str, error: &LexerError) -> Self {
        Self::from_span(
            source,
            error.message.clone(),
            error.span.clone(),
            ParseErrorKind::Lexer,
        )
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at line {}, column {}", self.message, self.line, self.column)
    }
}

impl std::error::Error for ParseError {}

fn offset_to_line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1usize;
    let mut column = 1usize;

    for (index, ch) in source.char_indices() {
        if index >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    (line, column)
}

/// Parse manifest source into a lossless syntax tree
pub fn parse(source: &str) -> Result<SyntaxTree, ParseError> {
    let (tokens, errors) = lex_with_trivia(source);
    if let Some(error) = errors.first() {
        return Err(ParseError::from_lexer(source, error));
    }

    let mut parser = Parser::new(source, &tokens);
    let green = parser.parse_source_file()?;
    tracing::trace!(tokens = tokens.len(), "parsed manifest");
    Ok(SyntaxTree::from_green(green))
}

/// Parse a standalone expression such as `.product(name: "A", package: "B")`
///
/// Used to synthesize nodes that have exactly the shape of parsed ones.
pub fn parse_expression(source: &str) -> Result<GreenNode, ParseError> {
    let (tokens, errors) = lex_with_trivia(source);
    if let Some(error) = errors.first() {
        return Err(ParseError::from_lexer(source, error));
    }

    let mut parser = Parser::new(source, &tokens);
    let invalid = || {
        ParseError::from_span(
            source,
            format!("'{source}' is not a single expression"),
            0..source.len(),
            ParseErrorKind::InvalidExpression,
        )
    };
    let expr = parser.parse_expr();
    if let Some(error) = parser.nesting_error() {
        return Err(error);
    }
    match expr {
        Some(expr) if parser.current() == ManifestSyntaxKind::Eof => Ok(expr),
        _ => Err(invalid()),
    }
}

/// Token stream parser
struct Parser<'a> {
    source: &'a str,
    tokens: &'a [CstToken],
    pos: usize,
    depth: usize,
    /// Token at which nesting first exceeded [`MAX_NESTING_DEPTH`]
    too_deep: Option<usize>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, tokens: &'a [CstToken]) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            depth: 0,
            too_deep: None,
        }
    }

    // ------------------------------------------------------------------
    // Token cursor
    // ------------------------------------------------------------------

    fn current(&self) -> ManifestSyntaxKind {
        self.tokens
            .get(self.pos)
            .map_or(ManifestSyntaxKind::Eof, |t| t.kind)
    }

    /// The `n`th significant token from the cursor and whether a newline
    /// appears in the trivia before it
    fn peek_nth(&self, n: usize) -> (ManifestSyntaxKind, bool) {
        let mut remaining = n;
        let mut newline = false;
        for token in &self.tokens[self.pos.min(self.tokens.len())..] {
            if token.kind.is_trivia() {
                newline |= token.kind == ManifestSyntaxKind::Newline
                    || (token.kind == ManifestSyntaxKind::BlockComment && token.text.contains('\n'));
                continue;
            }
            if remaining == 0 {
                return (token.kind, newline);
            }
            remaining -= 1;
            newline = false;
        }
        (ManifestSyntaxKind::Eof, newline)
    }

    fn peek(&self) -> (ManifestSyntaxKind, bool) {
        self.peek_nth(0)
    }

    fn at_trivia(&self) -> bool {
        self.current().is_trivia()
    }

    fn eat_trivia(&mut self, out: &mut Vec<GreenElement>) {
        while self.at_trivia() {
            self.bump(out);
        }
    }

    fn bump(&mut self, out: &mut Vec<GreenElement>) {
        if let Some(token) = self.tokens.get(self.pos)
            && token.kind != ManifestSyntaxKind::Eof
        {
            out.push(NodeOrToken::Token(GreenToken::new(
                token.kind.into(),
                &token.text,
            )));
            self.pos += 1;
        }
    }

    /// Bump the current token if it has the expected kind
    fn expect(&mut self, kind: ManifestSyntaxKind, out: &mut Vec<GreenElement>) -> Option<()> {
        (self.current() == kind).then(|| self.bump(out))
    }

    /// Eat trivia then bump the next token if it has the expected kind
    fn expect_after_trivia(
        &mut self,
        kind: ManifestSyntaxKind,
        out: &mut Vec<GreenElement>,
    ) -> Option<()> {
        if self.peek().0 != kind {
            return None;
        }
        self.eat_trivia(out);
        self.expect(kind, out)
    }

    fn error_at(&self, index: usize, message: String, kind: ParseErrorKind) -> ParseError {
        let span = self
            .tokens
            .get(index)
            .map_or(self.source.len()..self.source.len(), |t| t.span.clone());
        ParseError::from_span(self.source, message, span, kind)
    }

    fn nesting_error(&mut self) -> Option<ParseError> {
        let index = self.too_deep.take()?;
        Some(self.error_at(
            index,
            format!("Expression nested deeper than {MAX_NESTING_DEPTH} levels"),
            ParseErrorKind::NestingTooDeep,
        ))
    }

    fn at_statement_end(&self) -> bool {
        match self.peek() {
            (ManifestSyntaxKind::Eof | ManifestSyntaxKind::Semicolon, _) => true,
            (_, newline) => newline,
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn parse_source_file(&mut self) -> Result<GreenNode, ParseError> {
        let mut children = Vec::new();
        loop {
            self.eat_trivia(&mut children);
            match self.current() {
                ManifestSyntaxKind::Eof => break,
                ManifestSyntaxKind::Semicolon => self.bump(&mut children),
                ManifestSyntaxKind::ImportKw | ManifestSyntaxKind::LetKw | ManifestSyntaxKind::VarKw => {
                    self.parse_declaration(&mut children)?
                }
                _ => self.parse_opaque_statement(&mut children)?,
            }
        }
        Ok(GreenNode::new(ManifestSyntaxKind::SourceFile.into(), children))
    }

    /// Try the structured grammar first and fall back to an opaque statement
    fn parse_declaration(&mut self, out: &mut Vec<GreenElement>) -> Result<(), ParseError> {
        let checkpoint = self.pos;
        let parsed = match self.current() {
            ManifestSyntaxKind::ImportKw => self.parse_import_decl(),
            _ => self.parse_variable_decl(),
        };
        match parsed {
            Some(node) => {
                out.push(NodeOrToken::Node(node));
                Ok(())
            }
            None => {
                if let Some(error) = self.nesting_error() {
                    return Err(error);
                }
                self.pos = checkpoint;
                self.parse_opaque_statement(out)
            }
        }
    }

    fn parse_import_decl(&mut self) -> Option<GreenNode> {
        let mut children = Vec::new();
        self.expect(ManifestSyntaxKind::ImportKw, &mut children)?;
        self.expect_after_trivia(ManifestSyntaxKind::Ident, &mut children)?;
        while self.peek() == (ManifestSyntaxKind::Dot, false) {
            self.eat_trivia(&mut children);
            self.bump(&mut children);
            self.expect_after_trivia(ManifestSyntaxKind::Ident, &mut children)?;
        }
        self.finish_statement(&mut children)?;
        Some(GreenNode::new(ManifestSyntaxKind::ImportDecl.into(), children))
    }

    /// `let|var name [: Type] = expr [;]`
    fn parse_variable_decl(&mut self) -> Option<GreenNode> {
        let mut children = Vec::new();
        self.bump(&mut children);
        self.expect_after_trivia(ManifestSyntaxKind::Ident, &mut children)?;

        if self.peek().0 == ManifestSyntaxKind::Colon {
            self.eat_trivia(&mut children);
            let annotation = self.parse_type_annotation()?;
            children.push(NodeOrToken::Node(annotation));
        }

        self.expect_after_trivia(ManifestSyntaxKind::Equals, &mut children)?;
        self.eat_trivia(&mut children);
        let initializer = self.parse_expr()?;
        children.push(NodeOrToken::Node(initializer));

        self.finish_statement(&mut children)?;
        Some(GreenNode::new(ManifestSyntaxKind::VariableDecl.into(), children))
    }

    /// `: Type` up to (not including) the `=` of the declaration
    fn parse_type_annotation(&mut self) -> Option<GreenNode> {
        let mut children = Vec::new();
        self.expect(ManifestSyntaxKind::Colon, &mut children)?;
        let mut depth = 0usize;
        loop {
            let (next, _) = self.peek();
            match next {
                ManifestSyntaxKind::Eof => return None,
                ManifestSyntaxKind::Equals if depth == 0 => break,
                kind if kind.is_opening_delimiter() => depth += 1,
                kind if kind.is_closing_delimiter() => depth = depth.checked_sub(1)?,
                _ => {}
            }
            self.eat_trivia(&mut children);
            self.bump(&mut children);
        }
        Some(GreenNode::new(ManifestSyntaxKind::TypeAnnotation.into(), children))
    }

    /// Require the end of a statement, absorbing an optional `;`
    fn finish_statement(&mut self, children: &mut Vec<GreenElement>) -> Option<()> {
        if !self.at_statement_end() {
            return None;
        }
        if self.peek().0 == ManifestSyntaxKind::Semicolon {
            self.eat_trivia(children);
            self.bump(children);
        }
        Some(())
    }

    /// Consume a balanced run of tokens forming one statement
    ///
    /// The statement ends at a `;` or before a newline that is not followed
    /// or preceded by a continuation token, outside of any delimiters.
    fn parse_opaque_statement(&mut self, out: &mut Vec<GreenElement>) -> Result<(), ParseError> {
        let mut children = Vec::new();
        let mut open: Vec<(ManifestSyntaxKind, usize)> = Vec::new();

        loop {
            let kind = self.current();
            match kind {
                ManifestSyntaxKind::Eof => {
                    if let Some(&(_, index)) = open.last() {
                        let text = &self.tokens[index].text;
                        return Err(self.error_at(
                            index,
                            format!("Unclosed delimiter '{text}'"),
                            ParseErrorKind::UnbalancedDelimiter,
                        ));
                    }
                    break;
                }
                kind if kind.is_opening_delimiter() => {
                    if let Some(closing) = kind.closing_delimiter() {
                        open.push((closing, self.pos));
                    }
                    self.bump(&mut children);
                }
                kind if kind.is_closing_delimiter() => match open.pop() {
                    Some((expected, _)) if expected == kind => self.bump(&mut children),
                    Some((_, index)) => {
                        let found = &self.tokens[self.pos].text;
                        let opened = &self.tokens[index].text;
                        return Err(self.error_at(
                            self.pos,
                            format!("Mismatched delimiter '{found}' closing '{opened}'"),
                            ParseErrorKind::UnbalancedDelimiter,
                        ));
                    }
                    None => {
                        let found = &self.tokens[self.pos].text;
                        return Err(self.error_at(
                            self.pos,
                            format!("Unexpected closing delimiter '{found}'"),
                            ParseErrorKind::UnbalancedDelimiter,
                        ));
                    }
                },
                ManifestSyntaxKind::Semicolon if open.is_empty() => {
                    self.bump(&mut children);
                    break;
                }
                _ => self.bump(&mut children),
            }

            if open.is_empty() && self.opaque_statement_ends(kind) {
                break;
            }
            self.eat_trivia(&mut children);
        }

        out.push(NodeOrToken::Node(GreenNode::new(
            ManifestSyntaxKind::Statement.into(),
            children,
        )));
        Ok(())
    }

    fn opaque_statement_ends(&self, last: ManifestSyntaxKind) -> bool {
        let (next, newline) = self.peek();
        if next == ManifestSyntaxKind::Eof {
            return true;
        }
        let last_continues = matches!(
            last,
            ManifestSyntaxKind::Operator
                | ManifestSyntaxKind::Equals
                | ManifestSyntaxKind::Comma
                | ManifestSyntaxKind::Colon
                | ManifestSyntaxKind::Dot
                | ManifestSyntaxKind::At
        );
        let next_continues = matches!(
            next,
            ManifestSyntaxKind::Dot | ManifestSyntaxKind::Operator | ManifestSyntaxKind::Equals
        );
        newline && !last_continues && !next_continues
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    /// Binary operator chains, including `a ? b : c`
    fn parse_expr(&mut self) -> Option<GreenNode> {
        let first = self.parse_postfix_expr()?;
        if !self.at_binary_operator(false) {
            return Some(first);
        }

        let mut children = vec![NodeOrToken::Node(first)];
        let mut pending_ternary = 0usize;
        while self.at_binary_operator(pending_ternary > 0) {
            self.eat_trivia(&mut children);
            let operator = &self.tokens[self.pos];
            if operator.kind == ManifestSyntaxKind::Colon {
                pending_ternary -= 1;
            } else if operator.text == "?" {
                pending_ternary += 1;
            }
            self.bump(&mut children);
            self.eat_trivia(&mut children);
            let operand = self.parse_postfix_expr()?;
            children.push(NodeOrToken::Node(operand));
        }
        if pending_ternary > 0 {
            return None;
        }
        Some(GreenNode::new(ManifestSyntaxKind::SequenceExpr.into(), children))
    }

    fn at_binary_operator(&self, colon_allowed: bool) -> bool {
        match self.peek().0 {
            ManifestSyntaxKind::Operator => true,
            ManifestSyntaxKind::Colon => colon_allowed,
            _ => false,
        }
    }

    /// Every nested expression passes through here, so this bounds the
    /// recursion depth
    fn parse_postfix_expr(&mut self) -> Option<GreenNode> {
        if self.depth >= MAX_NESTING_DEPTH {
            self.too_deep.get_or_insert(self.pos);
            return None;
        }
        self.depth += 1;
        let expr = self.parse_postfix_chain();
        self.depth -= 1;
        expr
    }

    /// Member accesses, calls, subscripts and trailing closures
    fn parse_postfix_chain(&mut self) -> Option<GreenNode> {
        let mut expr = self.parse_primary_expr()?;
        loop {
            let (next, newline) = self.peek();
            let kind = match next {
                ManifestSyntaxKind::Dot => ManifestSyntaxKind::MemberAccessExpr,
                ManifestSyntaxKind::LParen if !newline => ManifestSyntaxKind::CallExpr,
                ManifestSyntaxKind::LBracket if !newline => ManifestSyntaxKind::SubscriptExpr,
                ManifestSyntaxKind::LBrace if !newline => ManifestSyntaxKind::CallExpr,
                _ => break,
            };

            let mut children = vec![NodeOrToken::Node(expr)];
            self.eat_trivia(&mut children);
            match next {
                ManifestSyntaxKind::Dot => {
                    self.bump(&mut children);
                    self.expect_member_name(&mut children)?;
                }
                ManifestSyntaxKind::LParen => {
                    let arguments = self.parse_delimited_list(
                        ManifestSyntaxKind::ArgumentList,
                        ManifestSyntaxKind::RParen,
                        ManifestSyntaxKind::Argument,
                    )?;
                    children.push(NodeOrToken::Node(arguments));
                    if self.peek() == (ManifestSyntaxKind::LBrace, false) {
                        self.eat_trivia(&mut children);
                        children.push(NodeOrToken::Node(self.parse_closure_expr()?));
                    }
                }
                ManifestSyntaxKind::LBracket => {
                    let arguments = self.parse_delimited_list(
                        ManifestSyntaxKind::ArgumentList,
                        ManifestSyntaxKind::RBracket,
                        ManifestSyntaxKind::Argument,
                    )?;
                    children.push(NodeOrToken::Node(arguments));
                }
                _ => children.push(NodeOrToken::Node(self.parse_closure_expr()?)),
            }
            expr = GreenNode::new(kind.into(), children);
        }
        Some(expr)
    }

    fn parse_primary_expr(&mut self) -> Option<GreenNode> {
        let mut children = Vec::new();
        let kind = match self.current() {
            ManifestSyntaxKind::Ident => {
                self.bump(&mut children);
                ManifestSyntaxKind::IdentifierExpr
            }
            ManifestSyntaxKind::StringLit => {
                self.bump(&mut children);
                ManifestSyntaxKind::StringLiteralExpr
            }
            ManifestSyntaxKind::NumberLit => {
                self.bump(&mut children);
                ManifestSyntaxKind::NumberLiteralExpr
            }
            ManifestSyntaxKind::TrueKw | ManifestSyntaxKind::FalseKw => {
                self.bump(&mut children);
                ManifestSyntaxKind::BooleanLiteralExpr
            }
            ManifestSyntaxKind::NilKw => {
                self.bump(&mut children);
                ManifestSyntaxKind::NilLiteralExpr
            }
            // Implicit member expression: `.target(…)`, `.v5`
            ManifestSyntaxKind::Dot => {
                self.bump(&mut children);
                self.expect_member_name(&mut children)?;
                ManifestSyntaxKind::MemberAccessExpr
            }
            ManifestSyntaxKind::LBracket => {
                return self.parse_delimited_list(
                    ManifestSyntaxKind::ArrayExpr,
                    ManifestSyntaxKind::RBracket,
                    ManifestSyntaxKind::ArrayElement,
                );
            }
            ManifestSyntaxKind::LParen => {
                let elements = self.parse_delimited_list(
                    ManifestSyntaxKind::ArgumentList,
                    ManifestSyntaxKind::RParen,
                    ManifestSyntaxKind::Argument,
                )?;
                children.push(NodeOrToken::Node(elements));
                ManifestSyntaxKind::TupleExpr
            }
            ManifestSyntaxKind::LBrace => return self.parse_closure_expr(),
            ManifestSyntaxKind::Operator => {
                self.bump(&mut children);
                if self.at_trivia() {
                    return None;
                }
                children.push(NodeOrToken::Node(self.parse_postfix_expr()?));
                ManifestSyntaxKind::PrefixExpr
            }
            _ => return None,
        };
        Some(GreenNode::new(kind.into(), children))
    }

    fn expect_member_name(&mut self, children: &mut Vec<GreenElement>) -> Option<()> {
        match self.current() {
            kind if kind.is_name_like() || kind == ManifestSyntaxKind::NumberLit => {
                self.bump(children);
                Some(())
            }
            _ => None,
        }
    }

    /// A comma-separated list between an opening delimiter at the cursor and
    /// `close`, e.g. argument lists and array literals
    fn parse_delimited_list(
        &mut self,
        list_kind: ManifestSyntaxKind,
        close: ManifestSyntaxKind,
        element_kind: ManifestSyntaxKind,
    ) -> Option<GreenNode> {
        let mut children = Vec::new();
        self.bump(&mut children);

        loop {
            self.eat_trivia(&mut children);
            if self.current() == close {
                self.bump(&mut children);
                break;
            }
            let (element, separated) = self.parse_list_element(element_kind)?;
            children.push(NodeOrToken::Node(element));
            if !separated {
                self.eat_trivia(&mut children);
                self.expect(close, &mut children)?;
                break;
            }
        }

        Some(GreenNode::new(list_kind.into(), children))
    }

    /// `[label:] expr [,]`, the label only for arguments
    fn parse_list_element(&mut self, element_kind: ManifestSyntaxKind) -> Option<(GreenNode, bool)> {
        let mut children = Vec::new();

        if element_kind == ManifestSyntaxKind::Argument
            && self.current().is_name_like()
            && self.peek_nth(1).0 == ManifestSyntaxKind::Colon
        {
            self.bump(&mut children);
            self.expect_after_trivia(ManifestSyntaxKind::Colon, &mut children)?;
            self.eat_trivia(&mut children);
        }

        let value = self.parse_expr()?;
        children.push(NodeOrToken::Node(value));

        let separated = self.peek().0 == ManifestSyntaxKind::Comma;
        if separated {
            self.eat_trivia(&mut children);
            self.bump(&mut children);
        }

        Some((GreenNode::new(element_kind.into(), children), separated))
    }

    /// `{ … }` with balanced contents kept verbatim
    fn parse_closure_expr(&mut self) -> Option<GreenNode> {
        let mut children = Vec::new();
        let mut open = Vec::new();
        loop {
            let kind = self.current();
            match kind {
                ManifestSyntaxKind::Eof => return None,
                kind if kind.is_opening_delimiter() => open.extend(kind.closing_delimiter()),
                kind if kind.is_closing_delimiter() => {
                    if open.pop() != Some(kind) {
                        return None;
                    }
                }
                _ => {}
            }
            self.bump(&mut children);
            if open.is_empty() {
                break;
            }
        }
        Some(GreenNode::new(ManifestSyntaxKind::ClosureExpr.into(), children))
    }
}
