//! Lazily filled, replayable token buffer.

use super::{Lexer, Token, TokenKind};

/// A token stream over a [`Lexer`].
///
/// Tokens are produced on demand and kept, so the stream can be rewound with
/// [`TokenStream::reset`] or [`TokenStream::seek`] without lexing again. Once the
/// end of input is reached, every further lookahead yields the EOF token.
pub struct TokenStream<'a> {
    lexer: Lexer<'a>,
    tokens: Vec<Token>,
    pos: usize,
    exhausted: bool,
}

impl<'a> TokenStream<'a> {
    /// Creates a new stream reading from `lexer`.
    #[must_use]
    pub const fn new(lexer: Lexer<'a>) -> Self {
        Self {
            lexer,
            tokens: Vec::new(),
            pos: 0,
            exhausted: false,
        }
    }

    /// Makes sure the buffer holds the token at absolute index `index` (or EOF).
    fn fill(&mut self, index: usize) {
        while !self.exhausted && self.tokens.len() <= index {
            let token = self.lexer.next_token();
            self.exhausted = token.kind == TokenKind::Eof;
            self.tokens.push(token);
        }
    }

    /// Returns the token at absolute index `index`, clamped to EOF.
    pub fn get(&mut self, index: usize) -> &Token {
        self.fill(index);
        let last = self.tokens.len() - 1;
        &self.tokens[index.min(last)]
    }

    /// Returns the `k`-th token of lookahead; `lt(1)` is the current token.
    pub fn lt(&mut self, k: usize) -> &Token {
        debug_assert!(k >= 1, "lookahead is 1-based");
        self.get(self.pos + k - 1)
    }

    /// Returns the kind of the `k`-th lookahead token.
    pub fn la(&mut self, k: usize) -> TokenKind {
        self.lt(k).kind
    }

    /// Consumes and returns the current token. EOF is never consumed past.
    pub fn consume(&mut self) -> Token {
        let token = self.lt(1).clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    /// Returns the absolute index of the current token.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.pos
    }

    /// Moves the cursor to an absolute index previously returned by [`Self::index`].
    pub fn seek(&mut self, index: usize) {
        self.pos = index;
    }

    /// Rewinds to the first token. Buffered tokens are kept.
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// Returns the number of tokens lexed so far.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.tokens.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::StandardDialect;
    use crate::lexer::Keyword;

    #[test]
    fn test_lookahead_is_lazy() {
        let mut stream = TokenStream::new(Lexer::new("SELECT a FROM t", &StandardDialect));
        assert_eq!(stream.buffered(), 0);
        assert_eq!(stream.la(1), TokenKind::Keyword(Keyword::Select));
        assert_eq!(stream.buffered(), 1);
        assert_eq!(stream.la(3), TokenKind::Keyword(Keyword::From));
        assert_eq!(stream.buffered(), 3);
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut stream = TokenStream::new(Lexer::new("a", &StandardDialect));
        assert_eq!(stream.consume().kind, TokenKind::Identifier);
        assert_eq!(stream.consume().kind, TokenKind::Eof);
        assert_eq!(stream.consume().kind, TokenKind::Eof);
        assert_eq!(stream.la(5), TokenKind::Eof);
    }

    #[test]
    fn test_reset_replays_without_relexing() {
        let mut stream = TokenStream::new(Lexer::new("a b c", &StandardDialect));
        while stream.consume().kind != TokenKind::Eof {}
        let buffered = stream.buffered();
        stream.reset();
        assert_eq!(stream.index(), 0);
        assert_eq!(stream.lt(1).text, "a");
        assert_eq!(stream.buffered(), buffered);
    }

    #[test]
    fn test_seek() {
        let mut stream = TokenStream::new(Lexer::new("a b c", &StandardDialect));
        stream.consume();
        let mark = stream.index();
        stream.consume();
        stream.seek(mark);
        assert_eq!(stream.lt(1).text, "b");
    }
}
