//! Typed AST layer over the CST
//!
//! Thin wrappers over syntax nodes. Each wrapper's `cast()` checks the node
//! kind, so a view only exists for a node of the right shape.
//!
//! # Example
//!
//! ```
//! use spm_add_core::cst::SyntaxTree;
//!
//! let tree = SyntaxTree::parse("let package = Package(name: \"Demo\")").unwrap();
//! let call = tree.source_file().unwrap().package_call().unwrap();
//!
//! assert_eq!(call.called_name().as_deref(), Some("Package"));
//! let name = call.argument("name").unwrap();
//! assert_eq!(name.value().unwrap().as_string_literal().unwrap().value().as_deref(), Some("Demo"));
//! ```

use super::{ManifestSyntaxKind, ManifestSyntaxNode, ManifestSyntaxToken};

/// Helper trait for casting CST nodes to typed wrappers
pub trait AstNode: Sized {
    fn can_cast(kind: ManifestSyntaxKind) -> bool;
    fn cast(node: ManifestSyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &ManifestSyntaxNode;
}

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident, $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            syntax: ManifestSyntaxNode,
        }

        impl AstNode for $name {
            fn can_cast(kind: ManifestSyntaxKind) -> bool {
                kind == ManifestSyntaxKind::$kind
            }

            fn cast(node: ManifestSyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self { syntax: node })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &ManifestSyntaxNode {
                &self.syntax
            }
        }
    };
}

/// First child node that casts to `N`
fn child<N: AstNode>(parent: &ManifestSyntaxNode) -> Option<N> {
    parent.children().find_map(N::cast)
}

/// First direct token of a specific kind
fn token_of_kind(parent: &ManifestSyntaxNode, kind: ManifestSyntaxKind) -> Option<ManifestSyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

/// Last direct token of a specific kind
fn last_token_of_kind(
    parent: &ManifestSyntaxNode,
    kind: ManifestSyntaxKind,
) -> Option<ManifestSyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| t.kind() == kind)
        .last()
}

// ============================================================================
// Declarations
// ============================================================================

ast_node!(
    /// Root of every manifest tree
    SourceFile,
    SourceFile
);

impl SourceFile {
    pub fn variable_decls(&self) -> impl Iterator<Item = VariableDecl> {
        self.syntax.children().filter_map(VariableDecl::cast)
    }

    /// The top-level binding initialized with a `Package(…)` call
    pub fn package_decl(&self) -> Option<VariableDecl> {
        self.variable_decls().find(|decl| {
            let callee = decl
                .initializer()
                .and_then(|expr| expr.as_call())
                .and_then(|call| call.callee());
            matches!(callee, Some(Expr::Identifier(ident)) if ident.name().as_deref() == Some("Package"))
        })
    }

    pub fn package_call(&self) -> Option<CallExpr> {
        self.package_decl()?.initializer()?.as_call()
    }
}

ast_node!(
    /// `let name = expr` or `var name = expr`
    VariableDecl,
    VariableDecl
);

impl VariableDecl {
    pub fn name(&self) -> Option<String> {
        token_of_kind(&self.syntax, ManifestSyntaxKind::Ident).map(|t| t.text().to_string())
    }

    pub fn initializer(&self) -> Option<Expr> {
        self.syntax
            .children()
            .filter(|n| n.kind() != ManifestSyntaxKind::TypeAnnotation)
            .find_map(Expr::cast)
    }
}

// ============================================================================
// Expressions
// ============================================================================

/// Tagged view over expression nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Call(CallExpr),
    Array(ArrayExpr),
    MemberAccess(MemberAccessExpr),
    Identifier(IdentifierExpr),
    StringLiteral(StringLiteralExpr),
    /// Any other expression shape, kept as a raw node
    Other(ManifestSyntaxNode),
}

impl Expr {
    pub fn can_cast(kind: ManifestSyntaxKind) -> bool {
        matches!(
            kind,
            ManifestSyntaxKind::CallExpr
                | ManifestSyntaxKind::ArrayExpr
                | ManifestSyntaxKind::MemberAccessExpr
                | ManifestSyntaxKind::IdentifierExpr
                | ManifestSyntaxKind::StringLiteralExpr
                | ManifestSyntaxKind::NumberLiteralExpr
                | ManifestSyntaxKind::BooleanLiteralExpr
                | ManifestSyntaxKind::NilLiteralExpr
                | ManifestSyntaxKind::TupleExpr
                | ManifestSyntaxKind::ClosureExpr
                | ManifestSyntaxKind::SubscriptExpr
                | ManifestSyntaxKind::PrefixExpr
                | ManifestSyntaxKind::SequenceExpr
        )
    }

    pub fn cast(node: ManifestSyntaxNode) -> Option<Self> {
        let expr = match node.kind() {
            ManifestSyntaxKind::CallExpr => Self::Call(CallExpr { syntax: node }),
            ManifestSyntaxKind::ArrayExpr => Self::Array(ArrayExpr { syntax: node }),
            ManifestSyntaxKind::MemberAccessExpr => {
                Self::MemberAccess(MemberAccessExpr { syntax: node })
            }
            ManifestSyntaxKind::IdentifierExpr => Self::Identifier(IdentifierExpr { syntax: node }),
            ManifestSyntaxKind::StringLiteralExpr => {
                Self::StringLiteral(StringLiteralExpr { syntax: node })
            }
            kind if Self::can_cast(kind) => Self::Other(node),
            _ => return None,
        };
        Some(expr)
    }

    pub fn syntax(&self) -> &ManifestSyntaxNode {
        match self {
            Self::Call(it) => it.syntax(),
            Self::Array(it) => it.syntax(),
            Self::MemberAccess(it) => it.syntax(),
            Self::Identifier(it) => it.syntax(),
            Self::StringLiteral(it) => it.syntax(),
            Self::Other(node) => node,
        }
    }

    pub fn kind(&self) -> ManifestSyntaxKind {
        self.syntax().kind()
    }

    pub fn as_call(&self) -> Option<CallExpr> {
        match self {
            Self::Call(call) => Some(call.clone()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<ArrayExpr> {
        match self {
            Self::Array(array) => Some(array.clone()),
            _ => None,
        }
    }

    pub fn as_member_access(&self) -> Option<MemberAccessExpr> {
        match self {
            Self::MemberAccess(member) => Some(member.clone()),
            _ => None,
        }
    }

    pub fn as_string_literal(&self) -> Option<StringLiteralExpr> {
        match self {
            Self::StringLiteral(literal) => Some(literal.clone()),
            _ => None,
        }
    }
}

ast_node!(
    /// `callee(arguments…)`, optionally with a trailing closure
    CallExpr,
    CallExpr
);

impl CallExpr {
    pub fn callee(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    /// Name of the called function: `Package` for `Package(…)`, `target`
    /// for `.target(…)`
    pub fn called_name(&self) -> Option<String> {
        match self.callee()? {
            Expr::Identifier(ident) => ident.name(),
            Expr::MemberAccess(member) => member.name(),
            _ => None,
        }
    }

    pub fn argument_list(&self) -> Option<ArgumentList> {
        child(&self.syntax)
    }

    pub fn arguments(&self) -> impl Iterator<Item = Argument> {
        self.argument_list()
            .into_iter()
            .flat_map(|list| list.arguments().collect::<Vec<_>>())
    }

    /// First argument carrying `label`
    pub fn argument(&self, label: &str) -> Option<Argument> {
        self.arguments()
            .find(|argument| argument.label().as_deref() == Some(label))
    }
}

ast_node!(
    /// `( argument, … )`, also used for subscripts and tuples
    ArgumentList,
    ArgumentList
);

impl ArgumentList {
    pub fn arguments(&self) -> impl Iterator<Item = Argument> {
        self.syntax.children().filter_map(Argument::cast)
    }
}

ast_node!(
    /// `[label:] value [,]`
    Argument,
    Argument
);

impl Argument {
    pub fn label_token(&self) -> Option<ManifestSyntaxToken> {
        self.colon_token()?;
        self.syntax.first_token()
    }

    pub fn label(&self) -> Option<String> {
        self.label_token().map(|t| t.text().to_string())
    }

    pub fn colon_token(&self) -> Option<ManifestSyntaxToken> {
        token_of_kind(&self.syntax, ManifestSyntaxKind::Colon)
    }

    pub fn value(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    pub fn comma_token(&self) -> Option<ManifestSyntaxToken> {
        last_token_of_kind(&self.syntax, ManifestSyntaxKind::Comma)
    }
}

ast_node!(
    /// `[ element, … ]`
    ArrayExpr,
    ArrayExpr
);

impl ArrayExpr {
    pub fn elements(&self) -> impl Iterator<Item = ArrayElement> {
        self.syntax.children().filter_map(ArrayElement::cast)
    }

    pub fn is_empty(&self) -> bool {
        self.elements().next().is_none()
    }

    pub fn l_bracket_token(&self) -> Option<ManifestSyntaxToken> {
        token_of_kind(&self.syntax, ManifestSyntaxKind::LBracket)
    }
}

ast_node!(ArrayElement, ArrayElement);

impl ArrayElement {
    pub fn expr(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    pub fn comma_token(&self) -> Option<ManifestSyntaxToken> {
        last_token_of_kind(&self.syntax, ManifestSyntaxKind::Comma)
    }
}

ast_node!(
    /// `base.name` or the implicit `.name`
    MemberAccessExpr,
    MemberAccessExpr
);

impl MemberAccessExpr {
    pub fn base(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    pub fn name(&self) -> Option<String> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .skip_while(|t| t.kind() != ManifestSyntaxKind::Dot)
            .find(|t| t.kind().is_name_like() || t.kind() == ManifestSyntaxKind::NumberLit)
            .map(|t| t.text().to_string())
    }
}

ast_node!(IdentifierExpr, IdentifierExpr);

impl IdentifierExpr {
    pub fn name(&self) -> Option<String> {
        token_of_kind(&self.syntax, ManifestSyntaxKind::Ident).map(|t| t.text().to_string())
    }
}

ast_node!(StringLiteralExpr, StringLiteralExpr);

impl StringLiteralExpr {
    pub fn token(&self) -> Option<ManifestSyntaxToken> {
        token_of_kind(&self.syntax, ManifestSyntaxKind::StringLit)
    }

    /// Decoded content of a single-line literal without interpolation
    pub fn value(&self) -> Option<String> {
        let token = self.token()?;
        decode_string_literal(token.text())
    }
}

fn decode_string_literal(text: &str) -> Option<String> {
    let hashes = text.len() - text.trim_start_matches('#').len();
    let body = text.get(hashes..text.len().checked_sub(hashes)?)?;
    if body.starts_with("\"\"\"") || body.len() < 2 {
        return None;
    }
    let inner = body.strip_prefix('"')?.strip_suffix('"')?;
    if hashes > 0 {
        return (!inner.contains(&format!("\\{}(", "#".repeat(hashes)))).then(|| inner.to_string());
    }

    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            value.push(ch);
            continue;
        }
        match chars.next()? {
            'n' => value.push('\n'),
            't' => value.push('\t'),
            'r' => value.push('\r'),
            '0' => value.push('\0'),
            '(' => return None,
            other => value.push(other),
        }
    }
    Some(value)
}
