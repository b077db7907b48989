//! Rowan language implementation for Swift package manifests
//!
//! Connects `ManifestSyntaxKind` to Rowan's generic CST infrastructure.

use rowan::Language;

use super::ManifestSyntaxKind;

/// Zero-sized marker type implementing `rowan::Language` for manifests
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ManifestLanguage;

impl Language for ManifestLanguage {
    type Kind = ManifestSyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        match raw.0 {
            // Trivia
            0 => ManifestSyntaxKind::Whitespace,
            1 => ManifestSyntaxKind::Newline,
            2 => ManifestSyntaxKind::LineComment,
            3 => ManifestSyntaxKind::BlockComment,

            // Keywords
            10 => ManifestSyntaxKind::LetKw,
            11 => ManifestSyntaxKind::VarKw,
            12 => ManifestSyntaxKind::ImportKw,
            13 => ManifestSyntaxKind::TrueKw,
            14 => ManifestSyntaxKind::FalseKw,
            15 => ManifestSyntaxKind::NilKw,

            // Literals & identifiers
            30 => ManifestSyntaxKind::Ident,
            31 => ManifestSyntaxKind::StringLit,
            32 => ManifestSyntaxKind::NumberLit,

            // Punctuation
            40 => ManifestSyntaxKind::LParen,
            41 => ManifestSyntaxKind::RParen,
            42 => ManifestSyntaxKind::LBracket,
            43 => ManifestSyntaxKind::RBracket,
            44 => ManifestSyntaxKind::LBrace,
            45 => ManifestSyntaxKind::RBrace,
            46 => ManifestSyntaxKind::Comma,
            47 => ManifestSyntaxKind::Colon,
            48 => ManifestSyntaxKind::Semicolon,
            49 => ManifestSyntaxKind::Dot,
            50 => ManifestSyntaxKind::Equals,
            51 => ManifestSyntaxKind::Operator,
            52 => ManifestSyntaxKind::Pound,
            53 => ManifestSyntaxKind::At,
            54 => ManifestSyntaxKind::Backslash,

            // Nodes
            100 => ManifestSyntaxKind::SourceFile,
            101 => ManifestSyntaxKind::ImportDecl,
            102 => ManifestSyntaxKind::VariableDecl,
            103 => ManifestSyntaxKind::TypeAnnotation,
            104 => ManifestSyntaxKind::Statement,
            105 => ManifestSyntaxKind::IdentifierExpr,
            106 => ManifestSyntaxKind::MemberAccessExpr,
            107 => ManifestSyntaxKind::CallExpr,
            108 => ManifestSyntaxKind::ArgumentList,
            109 => ManifestSyntaxKind::Argument,
            110 => ManifestSyntaxKind::ArrayExpr,
            111 => ManifestSyntaxKind::ArrayElement,
            112 => ManifestSyntaxKind::TupleExpr,
            113 => ManifestSyntaxKind::StringLiteralExpr,
            114 => ManifestSyntaxKind::NumberLiteralExpr,
            115 => ManifestSyntaxKind::BooleanLiteralExpr,
            116 => ManifestSyntaxKind::NilLiteralExpr,
            117 => ManifestSyntaxKind::ClosureExpr,
            118 => ManifestSyntaxKind::SubscriptExpr,
            119 => ManifestSyntaxKind::PrefixExpr,
            120 => ManifestSyntaxKind::SequenceExpr,

            901 => ManifestSyntaxKind::Eof,
            _ => ManifestSyntaxKind::Unknown,
        }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type ManifestSyntaxNode = rowan::SyntaxNode<ManifestLanguage>;
pub type ManifestSyntaxToken = rowan::SyntaxToken<ManifestLanguage>;
pub type ManifestSyntaxElement = rowan::SyntaxElement<ManifestLanguage>;
