use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved words. `true` and `false` are keywords too; the parser lowers
/// them to the numbers 1 and 0.
pub const KEYWORDS: &[&str] = &[
    "let", "print", "if", "else", "while", "for", "to", "step", "func", "return", "len", "true",
    "false",
];

/// A single token from the source code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The type of token
    pub kind: TokenKind,
    /// Token text. For string literals this is the unescaped contents
    /// without the surrounding quotes.
    pub lexeme: String,
    /// Line number where token starts (1-indexed)
    pub line: usize,
    /// Column number where token starts (1-indexed)
    pub column: usize,
}

impl Token {
    /// Creates a new token with the given properties
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, column: usize) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }

    /// True if this is the keyword `word`
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.lexeme == word
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Token({}, '{}', {}, {})",
            self.kind, self.lexeme, self.line, self.column
        )
    }
}

/// All token types in Ember
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// `[A-Za-z_][A-Za-z0-9_]*` that is not a keyword
    Identifier,
    /// One of [`KEYWORDS`]
    Keyword,
    /// Digits without a decimal point
    Number,
    /// Digits with exactly one decimal point
    Decimal,
    /// Double-quoted string literal
    String,
    /// `+ - * / == != < > <= >= && || !`
    Operator,

    // Punctuation
    /// Left parenthesis (
    LeftParen,
    /// Right parenthesis )
    RightParen,
    /// Left bracket [
    LeftBracket,
    /// Right bracket ]
    RightBracket,
    /// Left brace {
    LeftBrace,
    /// Right brace }
    RightBrace,
    /// Comma delimiter
    Comma,
    /// Statement terminator
    Semicolon,

    /// Single `=`
    Assign,
    /// `#...` line, kept verbatim and otherwise ignored
    Header,
    /// End of input marker
    Eof,
    /// Any character the scanner does not recognize
    Unknown,
}

impl TokenKind {
    /// Classify a scanned word as keyword or identifier
    pub fn for_word(word: &str) -> TokenKind {
        if KEYWORDS.contains(&word) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Keyword => "keyword",
            TokenKind::Number => "number",
            TokenKind::Decimal => "decimal",
            TokenKind::String => "string",
            TokenKind::Operator => "operator",
            TokenKind::LeftParen => "`(`",
            TokenKind::RightParen => "`)`",
            TokenKind::LeftBracket => "`[`",
            TokenKind::RightBracket => "`]`",
            TokenKind::LeftBrace => "`{`",
            TokenKind::RightBrace => "`}`",
            TokenKind::Comma => "`,`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Assign => "`=`",
            TokenKind::Header => "header",
            TokenKind::Eof => "end of file",
            TokenKind::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}
