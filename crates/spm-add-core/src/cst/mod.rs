//! Concrete Syntax Tree (CST) for Swift package manifests
//!
//! This module implements a lossless syntax tree using the Rowan library.
//! The CST preserves all source information including whitespace, comments,
//! and formatting, so that `SyntaxTree::parse(source)?.print() == source`.
//!
//! ## Architecture
//!
//! The CST uses Rowan's green/red tree pattern:
//!
//! - **Green Tree**: Immutable, position-independent storage
//!   - Stores actual source text with trivia (whitespace, comments)
//!   - Cheap to clone (uses Arc internally) and `Send + Sync`
//!   - Edits replace a subtree and rebuild only its ancestors; every other
//!     subtree is shared between the old and the new tree
//!
//! - **Red Tree**: Dynamically constructed view with parent pointers
//!   - Created on-demand for traversal
//!   - Backs the typed views in [`ast`]
//!
//! ## Grammar
//!
//! Only the shapes a manifest needs are parsed structurally: imports,
//! `let`/`var` bindings, calls with labeled arguments, arrays, member access
//! and literals. Anything else is kept as an opaque `Statement` node and
//! printed back untouched.

mod language;
mod lexer;
mod parser;
mod printer;
mod syntax_kind;
mod tree;

pub mod ast;
pub mod trivia;

pub use language::{ManifestLanguage, ManifestSyntaxElement, ManifestSyntaxNode, ManifestSyntaxToken};
pub use lexer::{CstLexResult, CstSpan, CstToken, LexerError, lex_with_trivia};
pub use parser::{GreenElement, ParseError, ParseErrorKind, parse, parse_expression};
pub use printer::print_green;
pub use syntax_kind::ManifestSyntaxKind;
pub use tree::SyntaxTree;
