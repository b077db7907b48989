//! CST-aware lexer that preserves all trivia (whitespace, comments)
//!
//! Every byte of the input ends up in exactly one token, so concatenating the
//! token texts reproduces the source. Strings (including multi-line, raw and
//! interpolated ones) are kept as single tokens.

use crate::cst::ManifestSyntaxKind;
use std::ops::Range;

/// Simple span representing a range in the source
pub type CstSpan = Range<usize>;

/// A lexer error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerError {
    pub message: String,
    pub span: CstSpan,
}

impl LexerError {
    pub fn new(message: impl Into<String>, span: CstSpan) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// A token with its syntax kind and span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstToken {
    pub kind: ManifestSyntaxKind,
    pub text: String,
    pub span: CstSpan,
}

impl CstToken {
    pub fn new(kind: ManifestSyntaxKind, text: impl Into<String>, span: CstSpan) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

/// Result returned by the CST lexer
pub type CstLexResult = (Vec<CstToken>, Vec<LexerError>);

/// Lex input preserving ALL trivia for CST construction
///
/// The returned token list always ends with an empty `Eof` token.
pub fn lex_with_trivia(input: &str) -> CstLexResult {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut i = 0usize;

    while let Some((current, size)) = next_char(input, i) {
        let start = i;
        let rest = &input[i..];

        let (kind, end) = match current {
            ' ' | '\t' | '\u{000B}' | '\u{000C}' => (
                ManifestSyntaxKind::Whitespace,
                scan_while(input, i, |c| matches!(c, ' ' | '\t' | '\u{000B}' | '\u{000C}')),
            ),
            '\n' => (ManifestSyntaxKind::Newline, i + 1),
            '\r' => {
                let end = if rest.starts_with("\r\n") { i + 2 } else { i + 1 };
                (ManifestSyntaxKind::Newline, end)
            }
            '/' if rest.starts_with("//") => (
                ManifestSyntaxKind::LineComment,
                scan_while(input, i, |c| c != '\n' && c != '\r'),
            ),
            '/' if rest.starts_with("/*") => {
                let (end, error) = lex_block_comment(input, i);
                errors.extend(error);
                (ManifestSyntaxKind::BlockComment, end)
            }
            '"' => {
                let (end, error) = lex_string(input, i);
                errors.extend(error);
                (ManifestSyntaxKind::StringLit, end)
            }
            '#' if is_raw_string_start(rest) => {
                let (end, error) = lex_string(input, i);
                errors.extend(error);
                (ManifestSyntaxKind::StringLit, end)
            }
            '#' => (ManifestSyntaxKind::Pound, i + size),
            '`' => match rest[1..].find(|c| c == '`' || c == '\n') {
                Some(offset) if rest[1 + offset..].starts_with('`') => {
                    (ManifestSyntaxKind::Ident, i + offset + 2)
                }
                _ => {
                    errors.push(LexerError::new("Unterminated escaped identifier", span(i, i + 1)));
                    (ManifestSyntaxKind::Unknown, i + 1)
                }
            },
            '$' => (ManifestSyntaxKind::Ident, scan_while(input, i + 1, is_ident_continue)),
            c if c.is_ascii_digit() => (ManifestSyntaxKind::NumberLit, lex_number(input, i)),
            c if is_ident_start(c) => {
                let end = scan_while(input, i, is_ident_continue);
                let kind = ManifestSyntaxKind::from_keyword(&input[i..end])
                    .unwrap_or(ManifestSyntaxKind::Ident);
                (kind, end)
            }
            '(' => (ManifestSyntaxKind::LParen, i + 1),
            ')' => (ManifestSyntaxKind::RParen, i + 1),
            '[' => (ManifestSyntaxKind::LBracket, i + 1),
            ']' => (ManifestSyntaxKind::RBracket, i + 1),
            '{' => (ManifestSyntaxKind::LBrace, i + 1),
            '}' => (ManifestSyntaxKind::RBrace, i + 1),
            ',' => (ManifestSyntaxKind::Comma, i + 1),
            ':' => (ManifestSyntaxKind::Colon, i + 1),
            ';' => (ManifestSyntaxKind::Semicolon, i + 1),
            '@' => (ManifestSyntaxKind::At, i + 1),
            '\\' => (ManifestSyntaxKind::Backslash, i + 1),
            '.' if rest.starts_with("..") => {
                // Range operators `...` and `..<`
                let mut end = scan_while(input, i, |c| c == '.');
                if input[end..].starts_with('<') {
                    end += 1;
                }
                (ManifestSyntaxKind::Operator, end)
            }
            '.' => (ManifestSyntaxKind::Dot, i + 1),
            c if is_operator_char(c) => {
                let end = lex_operator(input, i);
                let kind = if &input[i..end] == "=" {
                    ManifestSyntaxKind::Equals
                } else {
                    ManifestSyntaxKind::Operator
                };
                (kind, end)
            }
            other => {
                errors.push(LexerError::new(
                    format!("Unexpected character '{}'", other.escape_default()),
                    span(i, i + size),
                ));
                (ManifestSyntaxKind::Unknown, i + size)
            }
        };

        tokens.push(CstToken::new(kind, &input[start..end], span(start, end)));
        i = end;
    }

    tokens.push(CstToken::new(ManifestSyntaxKind::Eof, "", span(input.len(), input.len())));
    (tokens, errors)
}

/// Lex a (possibly nested) block comment starting at `/*`
fn lex_block_comment(input: &str, start: usize) -> (usize, Option<LexerError>) {
    let mut depth = 0usize;
    let mut i = start;
    while i < input.len() {
        let rest = &input[i..];
        if rest.starts_with("/*") {
            depth += 1;
            i += 2;
        } else if rest.starts_with("*/") {
            depth -= 1;
            i += 2;
            if depth == 0 {
                return (i, None);
            }
        } else {
            i += next_char(input, i).map_or(1, |(_, size)| size);
        }
    }
    (
        input.len(),
        Some(LexerError::new("Unterminated block comment", span(start, input.len()))),
    )
}

fn is_raw_string_start(rest: &str) -> bool {
    rest.trim_start_matches('#').starts_with('"')
}

/// Lex a string literal starting at its first `#` or `"`
///
/// Handles `"…"`, `"""…"""`, raw delimiters (`#"…"#`), escapes and `\( … )`
/// interpolation segments, which may themselves contain strings.
fn lex_string(input: &str, start: usize) -> (usize, Option<LexerError>) {
    let hashes = input[start..].len() - input[start..].trim_start_matches('#').len();
    let quote_start = start + hashes;
    let multiline = input[quote_start..].starts_with("\"\"\"");
    let quotes = if multiline { "\"\"\"" } else { "\"" };
    let closing = format!("{}{}", quotes, "#".repeat(hashes));
    let escape = format!("\\{}", "#".repeat(hashes));

    let mut i = quote_start + quotes.len();
    while i < input.len() {
        let rest = &input[i..];
        if rest.starts_with(closing.as_str()) {
            return (i + closing.len(), None);
        }
        if rest.starts_with(escape.as_str()) {
            let after = i + escape.len();
            if input[after..].starts_with('(') {
                match skip_interpolation(input, after) {
                    Ok(end) => i = end,
                    Err(error) => return (input.len(), Some(error)),
                }
            } else {
                i = after + next_char(input, after).map_or(0, |(_, size)| size);
            }
            continue;
        }
        let Some((ch, size)) = next_char(input, i) else {
            break;
        };
        if !multiline && (ch == '\n' || ch == '\r') {
            return (
                i,
                Some(LexerError::new("Unterminated string literal", span(start, i))),
            );
        }
        i += size;
    }

    (
        input.len(),
        Some(LexerError::new("Unterminated string literal", span(start, input.len()))),
    )
}

/// Skip a `( … )` interpolation segment, returning the offset after `)`
fn skip_interpolation(input: &str, open: usize) -> Result<usize, LexerError> {
    let mut depth = 0usize;
    let mut i = open;
    while let Some((ch, size)) = next_char(input, i) {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i + 1);
                }
            }
            '"' | '#' if is_raw_string_start(&input[i..]) => {
                let (end, error) = lex_string(input, i);
                if let Some(error) = error {
                    return Err(error);
                }
                i = end;
                continue;
            }
            _ => {}
        }
        i += size;
    }
    Err(LexerError::new(
        "Unterminated string interpolation",
        span(open, input.len()),
    ))
}

fn lex_number(input: &str, start: usize) -> usize {
    let mut end = scan_while(input, start, is_ident_continue);
    loop {
        let rest = &input[end..];
        let mut chars = rest.chars();
        if chars.next() == Some('.') && chars.next().is_some_and(|c| c.is_ascii_digit()) {
            end = scan_while(input, end + 1, is_ident_continue);
        } else {
            return end;
        }
    }
}

fn lex_operator(input: &str, start: usize) -> usize {
    let mut i = start;
    while let Some((ch, size)) = next_char(input, i) {
        let rest = &input[i..];
        if !is_operator_char(ch) || (i > start && (rest.starts_with("//") || rest.starts_with("/*")))
        {
            break;
        }
        i += size;
    }
    i
}

fn is_operator_char(ch: char) -> bool {
    matches!(
        ch,
        '/' | '=' | '-' | '+' | '!' | '*' | '%' | '<' | '>' | '&' | '|' | '^' | '~' | '?'
    )
}

fn is_ident_start(ch: char) -> bool {
    ch == '_' || ch.is_alphabetic()
}

fn is_ident_continue(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

fn scan_while(input: &str, start: usize, predicate: impl Fn(char) -> bool) -> usize {
    input[start..]
        .char_indices()
        .find(|(_, c)| !predicate(*c))
        .map_or(input.len(), |(offset, _)| start + offset)
}

/// Get the next character and its UTF-8 length
fn next_char(input: &str, pos: usize) -> Option<(char, usize)> {
    input[pos..].chars().next().map(|c| (c, c.len_utf8()))
}

/// Create a span from start to end
fn span(start: usize, end: usize) -> CstSpan {
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;
    use ManifestSyntaxKind as K;

    fn kinds(input: &str) -> Vec<ManifestSyntaxKind> {
        let (tokens, errors) = lex_with_trivia(input);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    fn reconstruct(input: &str) -> String {
        let (tokens, _) = lex_with_trivia(input);
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_preserves_whitespace() {
        let (tokens, _) = lex_with_trivia("let  package");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].kind, K::LetKw);
        assert_eq!(tokens[1].kind, K::Whitespace);
        assert_eq!(tokens[1].text, "  ");
        assert_eq!(tokens[2].kind, K::Ident);
        assert_eq!(tokens[3].kind, K::Eof);
    }

    #[test]
    fn test_newline_variants() {
        assert_eq!(
            kinds("a\r\nb\rc\n"),
            vec![K::Ident, K::Newline, K::Ident, K::Newline, K::Ident, K::Newline, K::Eof]
        );
    }

    #[test]
    fn test_call_expression_tokens() {
        assert_eq!(
            kinds(".package(url: \"x\")"),
            vec![
                K::Dot,
                K::Ident,
                K::LParen,
                K::Ident,
                K::Colon,
                K::Whitespace,
                K::StringLit,
                K::RParen,
                K::Eof
            ]
        );
    }

    #[test]
    fn test_comments() {
        let (tokens, errors) = lex_with_trivia("// swift-tools-version:5.5\n/* a /* nested */ b */x");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, K::LineComment);
        assert_eq!(tokens[0].text, "// swift-tools-version:5.5");
        assert_eq!(tokens[2].kind, K::BlockComment);
        assert_eq!(tokens[2].text, "/* a /* nested */ b */");
        assert_eq!(tokens[3].kind, K::Ident);
    }

    #[test]
    fn test_string_with_interpolation_is_single_token() {
        let (tokens, errors) = lex_with_trivia(r#""a \(f("b)")) c" x"#);
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, K::StringLit);
        assert_eq!(tokens[0].text, r#""a \(f("b)")) c""#);
    }

    #[test]
    fn test_raw_and_multiline_strings() {
        let (tokens, errors) = lex_with_trivia("#\"a \"quoted\" b\"# \"\"\"\nline \"one\"\n\"\"\"");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].text, "#\"a \"quoted\" b\"#");
        assert_eq!(tokens[2].kind, K::StringLit);
        assert_eq!(tokens[2].text, "\"\"\"\nline \"one\"\n\"\"\"");
    }

    #[test]
    fn test_escaped_quote_stays_in_string() {
        let (tokens, errors) = lex_with_trivia(r#""say \"hi\"""#);
        assert!(errors.is_empty());
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_unterminated_string_reports_error() {
        let (tokens, errors) = lex_with_trivia("\"abc\nlet x");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Unterminated string literal");
        assert_eq!(tokens[0].text, "\"abc");
    }

    #[test]
    fn test_unterminated_block_comment_reports_error() {
        let (_, errors) = lex_with_trivia("/* open");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span, 0..7);
    }

    #[test]
    fn test_operators_and_equals() {
        assert_eq!(
            kinds("a = b ?? c"),
            vec![
                K::Ident,
                K::Whitespace,
                K::Equals,
                K::Whitespace,
                K::Ident,
                K::Whitespace,
                K::Operator,
                K::Whitespace,
                K::Ident,
                K::Eof
            ]
        );
        assert_eq!(kinds("a == b")[2], K::Operator);
        assert_eq!(kinds("0..<5"), vec![K::NumberLit, K::Operator, K::NumberLit, K::Eof]);
    }

    #[test]
    fn test_numbers() {
        let (tokens, _) = lex_with_trivia("5.5 1_000 x.0");
        assert_eq!(tokens[0].text, "5.5");
        assert_eq!(tokens[2].text, "1_000");
        assert_eq!(tokens[5].kind, K::Dot);
        assert_eq!(tokens[6].kind, K::NumberLit);
    }

    #[test]
    fn test_unknown_character() {
        let (tokens, errors) = lex_with_trivia("a ¶ b");
        assert_eq!(errors.len(), 1);
        assert_eq!(tokens[2].kind, K::Unknown);
        assert_eq!(reconstruct("a ¶ b"), "a ¶ b");
    }

    #[test]
    fn test_lossless_reconstruction() {
        let input = "// swift-tools-version:5.7\nimport PackageDescription\n\nlet package = Package(\n\tname: \"Demo\", // trailing\n)\r\n";
        assert_eq!(reconstruct(input), input);
    }
}
