//! Error types.

use std::fmt;

use crate::lexer::Location;

/// Category of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// The lexer could not recognise part of the input.
    Lex,
    /// The token sequence does not match the grammar.
    Syntax,
    /// An identifier violates the dialect's identifier rules.
    IdentifierRule,
    /// The input nests deeper than the configured limit.
    InputTooLarge,
    /// The AST builder rejected a well-formed construct.
    Semantic,
}

/// A user-facing parse failure.
///
/// Renders as `line L:C: message` where `C` is the 1-based column; the stored
/// [`ParseError::column`] is 0-based.
#[derive(Debug)]
pub struct ParseError {
    kind: ParseErrorKind,
    message: String,
    location: Option<Location>,
    cause: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl ParseError {
    /// Creates an error at `location`.
    #[must_use]
    pub fn new(kind: ParseErrorKind, message: impl Into<String>, location: Location) -> Self {
        Self {
            kind,
            message: message.into(),
            location: Some(location),
            cause: None,
        }
    }

    /// Creates an error without a source position.
    #[must_use]
    pub fn without_location(kind: ParseErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: None,
            cause: None,
        }
    }

    /// Creates a syntax error.
    #[must_use]
    pub fn syntax(message: impl Into<String>, location: Location) -> Self {
        Self::new(ParseErrorKind::Syntax, message, location)
    }

    /// Creates a semantic error raised while building the AST.
    #[must_use]
    pub fn semantic(message: impl Into<String>, location: Location) -> Self {
        Self::new(ParseErrorKind::Semantic, message, location)
    }

    /// Creates the error reported when nesting exceeds the configured limit.
    #[must_use]
    pub fn input_too_large(target: &str) -> Self {
        Self::without_location(
            ParseErrorKind::InputTooLarge,
            format!("{target} is too large (stack overflow while parsing)"),
        )
    }

    /// Attaches the underlying error.
    #[must_use]
    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// The error category.
    #[must_use]
    pub const fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    /// The message without the position prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The position of the offending token, if any.
    #[must_use]
    pub const fn location(&self) -> Option<Location> {
        self.location
    }

    /// 1-based line of the offending token.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        self.location.map(|l| l.line)
    }

    /// 0-based column of the offending token.
    #[must_use]
    pub fn column(&self) -> Option<usize> {
        self.location.map(|l| l.column)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(location) => write!(
                f,
                "line {}:{}: {}",
                location.line,
                location.column_number(),
                self.message
            ),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

/// Errors returned by [`crate::SqlParser`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// An internal consistency check failed. This is a bug, not bad input.
    #[error("internal parser error: {0}")]
    InvariantViolation(String),
}

impl Error {
    /// Returns the parse error, if this is one.
    #[must_use]
    pub const fn as_parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Parse(err) => Some(err),
            Self::InvariantViolation(_) => None,
        }
    }
}

/// Result alias for parser operations.
pub type Result<T> = std::result::Result<T, Error>;
