//! SQL Lexer/Tokenizer
//!
//! A hand-written, dialect-aware lexer and a replayable token stream over it.
//! Keywords are matched case-insensitively while every token keeps its original
//! text and its line/column position.

mod span;
mod stream;
mod token;
mod tokenizer;

pub use span::{Location, Span};
pub use stream::TokenStream;
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::Lexer;
