use super::token::{Token, TokenKind};

/// Scanner for Ember source text
///
/// Scanning never fails: characters that start no token become
/// [`TokenKind::Unknown`] tokens and are left for the parser to skip.
pub struct Scanner {
    /// Source code as character vector
    source: Vec<char>,
    /// Current position in source
    current: usize,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column number (1-indexed)
    column: usize,
}

impl Scanner {
    /// Creates a new scanner from source code
    pub fn new(source: &str) -> Self {
        Scanner {
            source: source.chars().collect(),
            current: 0,
            line: 1,
            column: 1,
        }
    }

    /// Scans all tokens. The result always ends with exactly one
    /// [`TokenKind::Eof`] token.
    pub fn scan_tokens(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        tracing::trace!(count = tokens.len(), "scanned tokens");
        tokens
    }

    fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();
            let (line, column) = (self.line, self.column);

            let c = match self.peek() {
                Some(c) => c,
                None => return Token::new(TokenKind::Eof, "", line, column),
            };

            // `//` comments run to end of line and produce nothing
            if c == '/' && self.peek_next() == Some('/') {
                self.skip_line_comment();
                continue;
            }

            let (kind, lexeme) = match c {
                '#' => (TokenKind::Header, self.take_line()),
                c if c.is_ascii_alphabetic() || c == '_' => {
                    let word = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
                    (TokenKind::for_word(&word), word)
                }
                c if c.is_ascii_digit() => self.scan_number(),
                '"' => (TokenKind::String, self.scan_string()),
                '=' => self.one_or_two('=', TokenKind::Assign, TokenKind::Operator),
                '!' => self.one_or_two('=', TokenKind::Operator, TokenKind::Operator),
                '<' => self.one_or_two('=', TokenKind::Operator, TokenKind::Operator),
                '>' => self.one_or_two('=', TokenKind::Operator, TokenKind::Operator),
                '&' => self.one_or_two('&', TokenKind::Unknown, TokenKind::Operator),
                '|' => self.one_or_two('|', TokenKind::Unknown, TokenKind::Operator),
                '+' | '-' | '*' | '/' => self.single(TokenKind::Operator),
                '(' => self.single(TokenKind::LeftParen),
                ')' => self.single(TokenKind::RightParen),
                '[' => self.single(TokenKind::LeftBracket),
                ']' => self.single(TokenKind::RightBracket),
                '{' => self.single(TokenKind::LeftBrace),
                '}' => self.single(TokenKind::RightBrace),
                ',' => self.single(TokenKind::Comma),
                ';' => self.single(TokenKind::Semicolon),
                _ => self.single(TokenKind::Unknown),
            };

            return Token::new(kind, lexeme, line, column);
        }
    }

    /// Digits with at most one decimal point. A second point ends the
    /// literal and is left unconsumed, so `1.2.3` scans as `1.2` then `.`.
    fn scan_number(&mut self) -> (TokenKind, String) {
        let mut text = String::new();
        let mut is_decimal = false;
        while let Some(c) = self.peek() {
            if c == '.' {
                if is_decimal {
                    break;
                }
                is_decimal = true;
            } else if !c.is_ascii_digit() {
                break;
            }
            text.push(c);
            self.advance();
        }

        let kind = if is_decimal {
            TokenKind::Decimal
        } else {
            TokenKind::Number
        };
        (kind, text)
    }

    /// A backslash copies the next character through untranslated:
    /// `"a\"b"` is `a"b` and `"\n"` is just `n`. An unterminated string
    /// runs to end of input.
    fn scan_string(&mut self) -> String {
        self.advance(); // Opening "
        let mut value = String::new();

        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }
            self.advance();
            if c == '\\' {
                if let Some(escaped) = self.advance() {
                    value.push(escaped);
                }
            } else {
                value.push(c);
            }
        }

        self.advance(); // Closing "
        value
    }

    /// Emits the two-character form `c` + `second` when it follows,
    /// otherwise the single character.
    fn one_or_two(
        &mut self,
        second: char,
        single_kind: TokenKind,
        double_kind: TokenKind,
    ) -> (TokenKind, String) {
        let mut text = String::new();
        if let Some(c) = self.advance() {
            text.push(c);
        }
        if self.peek() == Some(second) {
            self.advance();
            text.push(second);
            (double_kind, text)
        } else {
            (single_kind, text)
        }
    }

    fn single(&mut self, kind: TokenKind) -> (TokenKind, String) {
        let text = self.advance().map(String::from).unwrap_or_default();
        (kind, text)
    }

    fn skip_whitespace(&mut self) {
        // Same set as C's isspace
        self.take_while(|c| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c'));
    }

    fn skip_line_comment(&mut self) {
        self.take_while(|c| c != '\n');
    }

    fn take_line(&mut self) -> String {
        self.take_while(|c| c != '\n')
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            text.push(c);
            self.advance();
        }
        text
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.current).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.source.get(self.current + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.current += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }
}
