//! SQL Tokenizer implementation.

use super::{Location, Span, Token, TokenKind};
use crate::dialect::Dialect;

/// A lexer that tokenizes SQL input for one dialect.
///
/// The lexer never fails: input it cannot recognise becomes a
/// [`TokenKind::Error`] token carrying the offending text.
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The dialect deciding keywords and operator spellings.
    dialect: &'a dyn Dialect,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
    /// Line/column of the current position.
    line: usize,
    column: usize,
    /// Line/column of the start of the current token.
    start_location: Location,
    /// Kind of the previously produced token.
    previous: Option<TokenKind>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub fn new(input: &'a str, dialect: &'a dyn Dialect) -> Self {
        Self {
            input,
            dialect,
            pos: 0,
            start: 0,
            line: 1,
            column: 0,
            start_location: Location::default(),
            previous: None,
        }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            self.advance();
        }
    }

    /// Skips whitespace and comments.
    ///
    /// Returns false if an unterminated block comment swallowed the rest of the input.
    fn skip_whitespace_and_comments(&mut self) -> bool {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }

            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                self.mark_start();
                self.advance_by(2);
                loop {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            break;
                        }
                        None => return false,
                        _ => {}
                    }
                }
                continue;
            }

            return true;
        }
    }

    fn mark_start(&mut self) {
        self.start = self.pos;
        self.start_location = Location::new(self.line, self.column);
    }

    /// Creates a span from start to current position.
    const fn make_span(&self) -> Span {
        Span::new(self.start, self.pos)
    }

    /// Creates a token with the current span.
    fn make_token(&mut self, kind: TokenKind) -> Token {
        self.previous = Some(kind);
        Token::new(
            kind,
            &self.input[self.start..self.pos],
            self.make_span(),
            self.start_location,
        )
    }

    /// Scans an identifier or keyword.
    fn scan_identifier(&mut self) -> Token {
        while self.peek().is_some_and(is_identifier_char) {
            self.advance();
        }

        let text = &self.input[self.start..self.pos];
        match self.dialect.keyword(text) {
            Some(keyword) => self.make_token(TokenKind::Keyword(keyword)),
            None => self.make_token(TokenKind::Identifier),
        }
    }

    /// Scans a quoted token (string, quoted or back-quoted identifier).
    ///
    /// A doubled quote character escapes itself.
    fn scan_quoted(&mut self, quote: char, kind: TokenKind) -> Token {
        self.advance();
        loop {
            match self.advance() {
                Some(c) if c == quote => {
                    if self.peek() == Some(quote) {
                        self.advance();
                    } else {
                        return self.make_token(kind);
                    }
                }
                Some(_) => {}
                None => return self.make_token(TokenKind::Error),
            }
        }
    }

    /// Scans a number literal or a digit-leading identifier, whichever is longer.
    ///
    /// Ties go to the number.
    fn scan_number(&mut self) -> Token {
        let rest = &self.input[self.start..];
        let (number_len, number_kind) = numeric_literal_len(rest);
        let identifier_len = digit_identifier_len(rest);

        if identifier_len > number_len {
            self.advance_by(identifier_len);
            self.make_token(TokenKind::DigitIdentifier)
        } else {
            self.advance_by(number_len);
            self.make_token(number_kind)
        }
    }

    /// Scans the next token.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        if !self.skip_whitespace_and_comments() {
            return self.make_token(TokenKind::Error);
        }
        self.mark_start();

        let Some(c) = self.peek() else {
            return self.make_token(TokenKind::Eof);
        };

        match c {
            '\'' => return self.scan_quoted('\'', TokenKind::String),
            '"' => return self.scan_quoted('"', TokenKind::QuotedIdentifier),
            '`' => return self.scan_quoted('`', TokenKind::BackquotedIdentifier),
            'X' | 'x' if self.peek_next() == Some('\'') => {
                self.advance();
                return self.scan_quoted('\'', TokenKind::BinaryLiteral);
            }
            c if c.is_ascii_digit() => return self.scan_number(),
            '.' if self.peek_next().is_some_and(|c| c.is_ascii_digit())
                && !self.previous.is_some_and(|kind| kind.ends_operand()) =>
            {
                return self.scan_number();
            }
            c if c.is_ascii_alphabetic() || c == '_' => return self.scan_identifier(),
            _ => {}
        }

        self.advance();
        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ';' => TokenKind::Semicolon,
            '?' => TokenKind::Question,
            '+' => TokenKind::Plus,
            '*' => TokenKind::Asterisk,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '-' => {
                if self.peek() == Some('>') {
                    self.advance();
                    TokenKind::Arrow
                } else {
                    TokenKind::Minus
                }
            }
            '=' => {
                if self.peek() == Some('=') && self.dialect.supports_double_equals() {
                    self.advance();
                }
                TokenKind::Eq
            }
            '<' => match self.peek() {
                Some('=') => {
                    self.advance();
                    TokenKind::Lte
                }
                Some('>') => {
                    self.advance();
                    TokenKind::Neq
                }
                _ => TokenKind::Lt,
            },
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::Gte
                } else {
                    TokenKind::Gt
                }
            }
            '!' if self.peek() == Some('=') => {
                self.advance();
                TokenKind::Neq
            }
            '|' if self.peek() == Some('|') => {
                self.advance();
                TokenKind::Concat
            }
            _ => TokenKind::Error,
        };
        self.make_token(kind)
    }

    /// Tokenizes the entire input, including the trailing EOF token.
    #[must_use]
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}

const fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '@' | ':')
}

fn count_digits(bytes: &[u8], from: usize) -> usize {
    bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Length and kind of the longest numeric literal at the start of `text`.
fn numeric_literal_len(text: &str) -> (usize, TokenKind) {
    let bytes = text.as_bytes();
    let mut len = count_digits(bytes, 0);
    let mut kind = TokenKind::Integer;

    if bytes.get(len) == Some(&b'.') {
        let fraction = count_digits(bytes, len + 1);
        if len == 0 && fraction == 0 {
            return (0, kind);
        }
        len += 1 + fraction;
        kind = TokenKind::Decimal;
    }

    if matches!(bytes.get(len), Some(b'e' | b'E')) {
        let mut exponent = len + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let digits = count_digits(bytes, exponent);
        if digits > 0 {
            len = exponent + digits;
            kind = TokenKind::Double;
        }
    }

    (len, kind)
}

/// Length of a digit-leading identifier at the start of `text`, or 0.
fn digit_identifier_len(text: &str) -> usize {
    if !text.starts_with(|c: char| c.is_ascii_digit()) {
        return 0;
    }
    let len = text.chars().take_while(|c| is_identifier_char(*c)).count();
    if len >= 2 {
        len
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{HiveDialect, StandardDialect};
    use crate::lexer::Keyword;

    fn kinds(input: &str, dialect: &dyn Dialect) -> Vec<TokenKind> {
        Lexer::new(input, dialect)
            .tokenize()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let tokens = Lexer::new("select Foo from bar", &StandardDialect).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::Select));
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].text, "Foo");
        assert_eq!(tokens[2].kind, TokenKind::Keyword(Keyword::From));
        assert_eq!(tokens[2].text, "from");
        assert_eq!(tokens[4].kind, TokenKind::Eof);
    }

    #[test]
    fn test_hive_only_keywords() {
        assert_eq!(
            kinds("sort", &StandardDialect),
            vec![TokenKind::Identifier, TokenKind::Eof]
        );
        assert_eq!(
            kinds("sort", &HiveDialect),
            vec![TokenKind::Keyword(Keyword::Sort), TokenKind::Eof]
        );
    }

    #[test]
    fn test_double_equals() {
        assert_eq!(
            kinds("a == 1", &HiveDialect),
            vec![
                TokenKind::Identifier,
                TokenKind::Eq,
                TokenKind::Integer,
                TokenKind::Eof
            ]
        );
        assert_eq!(
            kinds("a == 1", &StandardDialect),
            vec![
                TokenKind::Identifier,
                TokenKind::Eq,
                TokenKind::Eq,
                TokenKind::Integer,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("1 1.5 .5 1e3 1.5E-2", &StandardDialect),
            vec![
                TokenKind::Integer,
                TokenKind::Decimal,
                TokenKind::Decimal,
                TokenKind::Double,
                TokenKind::Double,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_digit_identifier_longest_match() {
        let tokens = Lexer::new("tmp.20171014_tmpdata", &StandardDialect).tokenize();
        assert_eq!(tokens[1].kind, TokenKind::Dot);
        assert_eq!(tokens[2].kind, TokenKind::DigitIdentifier);
        assert_eq!(tokens[2].text, "20171014_tmpdata");
    }

    #[test]
    fn test_dot_after_identifier_is_dereference() {
        assert_eq!(
            kinds("a.5", &StandardDialect),
            vec![
                TokenKind::Identifier,
                TokenKind::Dot,
                TokenKind::Integer,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_identifier_symbols_are_lexed() {
        let tokens = Lexer::new("a@b c:d", &StandardDialect).tokenize();
        assert_eq!(tokens[0].text, "a@b");
        assert_eq!(tokens[1].text, "c:d");
    }

    #[test]
    fn test_quoted_tokens() {
        let tokens = Lexer::new(r#"'it''s' "a""b" `c` X'CAFE'"#, &StandardDialect).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text, "'it''s'");
        assert_eq!(tokens[1].kind, TokenKind::QuotedIdentifier);
        assert_eq!(tokens[2].kind, TokenKind::BackquotedIdentifier);
        assert_eq!(tokens[3].kind, TokenKind::BinaryLiteral);
        assert_eq!(tokens[3].text, "X'CAFE'");
    }

    #[test]
    fn test_locations() {
        let tokens = Lexer::new("SELECT a\n  FROM t", &StandardDialect).tokenize();
        assert_eq!(tokens[0].location, Location::new(1, 0));
        assert_eq!(tokens[1].location, Location::new(1, 7));
        assert_eq!(tokens[2].location, Location::new(2, 2));
        assert_eq!(tokens[3].location, Location::new(2, 7));
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("a -- note\n/* block */ b", &StandardDialect),
            vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn test_unrecognized_input_becomes_error_token() {
        let tokens = Lexer::new("a # b", &StandardDialect).tokenize();
        assert_eq!(tokens[1].kind, TokenKind::Error);
        assert_eq!(tokens[1].text, "#");

        let tokens = Lexer::new("'open", &StandardDialect).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(tokens[0].text, "'open");
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("<> != <= >= || -> %", &StandardDialect),
            vec![
                TokenKind::Neq,
                TokenKind::Neq,
                TokenKind::Lte,
                TokenKind::Gte,
                TokenKind::Concat,
                TokenKind::Arrow,
                TokenKind::Percent,
                TokenKind::Eof
            ]
        );
    }
}
