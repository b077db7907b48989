//! Syntax kinds for manifest tokens and nodes
//!
//! Every token and node in the CST carries one of these kinds. Numeric values
//! are grouped by category and are what Rowan stores in the green tree.

/// Kind of a token or node in the manifest CST
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum ManifestSyntaxKind {
    // Trivia (0-9)
    Whitespace = 0,
    Newline = 1,
    LineComment = 2,
    BlockComment = 3,

    // Keywords (10-29)
    LetKw = 10,
    VarKw = 11,
    ImportKw = 12,
    TrueKw = 13,
    FalseKw = 14,
    NilKw = 15,

    // Literals & identifiers (30-39)
    Ident = 30,
    StringLit = 31,
    NumberLit = 32,

    // Punctuation (40-69)
    LParen = 40,
    RParen = 41,
    LBracket = 42,
    RBracket = 43,
    LBrace = 44,
    RBrace = 45,
    Comma = 46,
    Colon = 47,
    Semicolon = 48,
    Dot = 49,
    Equals = 50,
    Operator = 51,
    Pound = 52,
    At = 53,
    Backslash = 54,

    // Nodes (100-149)
    SourceFile = 100,
    ImportDecl = 101,
    VariableDecl = 102,
    TypeAnnotation = 103,
    Statement = 104,
    IdentifierExpr = 105,
    MemberAccessExpr = 106,
    CallExpr = 107,
    ArgumentList = 108,
    Argument = 109,
    ArrayExpr = 110,
    ArrayElement = 111,
    TupleExpr = 112,
    StringLiteralExpr = 113,
    NumberLiteralExpr = 114,
    BooleanLiteralExpr = 115,
    NilLiteralExpr = 116,
    ClosureExpr = 117,
    SubscriptExpr = 118,
    PrefixExpr = 119,
    SequenceExpr = 120,

    // Special
    Unknown = 900,
    Eof = 901,
}

impl ManifestSyntaxKind {
    /// Whitespace, newlines and comments
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace | Self::Newline | Self::LineComment | Self::BlockComment
        )
    }

    pub fn is_comment(self) -> bool {
        matches!(self, Self::LineComment | Self::BlockComment)
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            Self::LetKw | Self::VarKw | Self::ImportKw | Self::TrueKw | Self::FalseKw | Self::NilKw
        )
    }

    /// Tokens that may serve as an argument label or member name
    pub fn is_name_like(self) -> bool {
        self == Self::Ident || self.is_keyword()
    }

    pub fn is_opening_delimiter(self) -> bool {
        matches!(self, Self::LParen | Self::LBracket | Self::LBrace)
    }

    pub fn is_closing_delimiter(self) -> bool {
        matches!(self, Self::RParen | Self::RBracket | Self::RBrace)
    }

    /// The closing delimiter matching an opening one
    pub fn closing_delimiter(self) -> Option<Self> {
        match self {
            Self::LParen => Some(Self::RParen),
            Self::LBracket => Some(Self::RBracket),
            Self::LBrace => Some(Self::RBrace),
            _ => None,
        }
    }

    pub fn is_node(self) -> bool {
        (100..150).contains(&(self as u16))
    }

    /// Keyword kind for an identifier-shaped word
    pub fn from_keyword(text: &str) -> Option<Self> {
        match text {
            "let" => Some(Self::LetKw),
            "var" => Some(Self::VarKw),
            "import" => Some(Self::ImportKw),
            "true" => Some(Self::TrueKw),
            "false" => Some(Self::FalseKw),
            "nil" => Some(Self::NilKw),
            _ => None,
        }
    }
}

impl From<ManifestSyntaxKind> for rowan::SyntaxKind {
    fn from(kind: ManifestSyntaxKind) -> Self {
        Self(kind as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trivia_classification() {
        assert!(ManifestSyntaxKind::Whitespace.is_trivia());
        assert!(ManifestSyntaxKind::Newline.is_trivia());
        assert!(ManifestSyntaxKind::BlockComment.is_comment());
        assert!(!ManifestSyntaxKind::Ident.is_trivia());
        assert!(!ManifestSyntaxKind::Comma.is_trivia());
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(
            ManifestSyntaxKind::LBracket.closing_delimiter(),
            Some(ManifestSyntaxKind::RBracket)
        );
        assert_eq!(ManifestSyntaxKind::Comma.closing_delimiter(), None);
        assert!(ManifestSyntaxKind::RBrace.is_closing_delimiter());
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            ManifestSyntaxKind::from_keyword("let"),
            Some(ManifestSyntaxKind::LetKw)
        );
        assert_eq!(ManifestSyntaxKind::from_keyword("Package"), None);
        assert!(ManifestSyntaxKind::NilKw.is_name_like());
        assert!(ManifestSyntaxKind::CallExpr.is_node());
        assert!(!ManifestSyntaxKind::Ident.is_node());
    }
}
