//! Syntax error translation.
//!
//! While parsing, every failed token check records what would have been
//! acceptable at the current position into an [`ExpectationSink`]. Only the
//! furthest position is kept, so when the parse fails the sink holds the full
//! expected set for the offending token. The [`ErrorTranslator`] renders each
//! expectation (basic: grammar vocabulary, enhanced: dialect labels) and turns
//! the offending token into a positioned [`ParseError`].

use std::collections::BTreeSet;

use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Token, TokenKind};
use crate::tree::Rule;

/// Label table consulted by the enhanced error handler.
#[derive(Debug)]
pub struct ErrorLabels {
    /// Rules replaced by a single label when entered at the error position.
    pub(crate) rules: &'static [(Rule, &'static str)],
    /// Tokens displayed with a label instead of their vocabulary name.
    pub(crate) tokens: &'static [(TokenKind, &'static str)],
    /// Rules whose tokens are left out of the expected set.
    pub(crate) ignored: &'static [Rule],
}

impl ErrorLabels {
    /// Label for `rule`, if it is special.
    #[must_use]
    pub fn rule_label(&self, rule: Rule) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|(candidate, _)| *candidate == rule)
            .map(|(_, label)| *label)
    }

    /// Label for `kind`, if it is special.
    #[must_use]
    pub fn token_label(&self, kind: TokenKind) -> Option<&'static str> {
        self.tokens
            .iter()
            .find(|(candidate, _)| *candidate == kind)
            .map(|(_, label)| *label)
    }

    /// Whether `rule` is ignored.
    #[must_use]
    pub fn is_ignored(&self, rule: Rule) -> bool {
        self.ignored.contains(&rule)
    }
}

/// Expected items at the furthest position reached by the parse.
#[derive(Debug, Default)]
pub(crate) struct ExpectationSink {
    position: Option<usize>,
    expected: BTreeSet<String>,
}

impl ExpectationSink {
    /// Records `item` as acceptable at token index `position`.
    ///
    /// Positions behind the furthest one are ignored; a further position
    /// discards what was collected so far.
    pub(crate) fn record(&mut self, position: usize, item: Option<String>) {
        match self.position {
            Some(furthest) if position < furthest => return,
            Some(furthest) if position == furthest => {}
            _ => {
                self.position = Some(position);
                self.expected.clear();
            }
        }
        if let Some(item) = item {
            self.expected.insert(item);
        }
    }

    pub(crate) const fn position(&self) -> Option<usize> {
        self.position
    }

    pub(crate) const fn expected(&self) -> &BTreeSet<String> {
        &self.expected
    }
}

/// Turns parser failures into [`ParseError`]s.
#[derive(Debug, Clone, Copy)]
pub struct ErrorTranslator {
    labels: &'static ErrorLabels,
    enhanced: bool,
}

impl ErrorTranslator {
    /// Creates a translator using `labels` when `enhanced` is set.
    #[must_use]
    pub const fn new(labels: &'static ErrorLabels, enhanced: bool) -> Self {
        Self { labels, enhanced }
    }

    /// Whether the enhanced handler is active.
    #[must_use]
    pub const fn is_enhanced(&self) -> bool {
        self.enhanced
    }

    /// Describes an expected token.
    ///
    /// `rules` lists the rules entered at the error position, outermost
    /// first. Returns `None` when the token is hidden by an ignored rule.
    #[must_use]
    pub fn describe(&self, kind: TokenKind, rules: &[Rule]) -> Option<String> {
        if !self.enhanced {
            return Some(kind.display_name());
        }
        for rule in rules {
            if let Some(label) = self.labels.rule_label(*rule) {
                return Some(label.to_string());
            }
            if self.labels.is_ignored(*rule) {
                return None;
            }
        }
        Some(
            self.labels
                .token_label(kind)
                .map_or_else(|| kind.display_name(), str::to_string),
        )
    }

    /// Builds the error for `offending` given the expected set at its position.
    #[must_use]
    pub fn syntax_error(&self, offending: &Token, expected: &BTreeSet<String>) -> ParseError {
        if offending.kind == TokenKind::Error {
            return ParseError::new(
                ParseErrorKind::Lex,
                format!("token recognition error at: '{}'", offending.text),
                offending.location,
            );
        }

        let found = offending.error_text();
        let items = expected.iter().map(String::as_str).collect::<Vec<_>>();
        let message = if self.enhanced {
            if items.is_empty() {
                format!("mismatched input '{found}'")
            } else {
                format!("mismatched input '{found}'. Expecting: {}", items.join(", "))
            }
        } else {
            match items.as_slice() {
                [] => format!("mismatched input '{found}'"),
                [single] => format!("mismatched input '{found}' expecting {single}"),
                _ => format!("mismatched input '{found}' expecting {{{}}}", items.join(", ")),
            }
        };
        ParseError::syntax(message, offending.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{Dialect, StandardDialect};
    use crate::lexer::{Keyword, Location, Span};

    fn token(kind: TokenKind, text: &str, column: usize) -> Token {
        Token::new(kind, text, Span::new(column, column + text.len()), Location::new(1, column))
    }

    fn expected(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_sink_keeps_furthest_position() {
        let mut sink = ExpectationSink::default();
        sink.record(2, Some("'FROM'".to_string()));
        sink.record(1, Some("','".to_string()));
        sink.record(2, Some("<EOF>".to_string()));
        assert_eq!(sink.position(), Some(2));
        assert_eq!(sink.expected(), &expected(&["'FROM'", "<EOF>"]));

        sink.record(3, None);
        assert_eq!(sink.position(), Some(3));
        assert!(sink.expected().is_empty());
    }

    #[test]
    fn test_basic_describe_uses_vocabulary() {
        let translator = ErrorTranslator::new(StandardDialect.error_labels(), false);
        assert_eq!(
            translator.describe(TokenKind::Identifier, &[Rule::Identifier]),
            Some("IDENTIFIER".to_string())
        );
        assert_eq!(
            translator.describe(TokenKind::Integer, &[]),
            Some("INTEGER_VALUE".to_string())
        );
    }

    #[test]
    fn test_enhanced_describe_uses_labels() {
        let translator = ErrorTranslator::new(StandardDialect.error_labels(), true);
        assert_eq!(
            translator.describe(TokenKind::Identifier, &[Rule::Expression, Rule::Identifier]),
            Some("<expression>".to_string())
        );
        assert_eq!(
            translator.describe(TokenKind::Integer, &[]),
            Some("<integer>".to_string())
        );
        assert_eq!(
            translator.describe(TokenKind::Keyword(Keyword::Limit), &[Rule::NonReserved]),
            None
        );
        assert_eq!(
            translator.describe(TokenKind::Keyword(Keyword::Where), &[]),
            Some("'WHERE'".to_string())
        );
    }

    #[test]
    fn test_basic_message_format() {
        let translator = ErrorTranslator::new(StandardDialect.error_labels(), false);
        let offending = token(TokenKind::Keyword(Keyword::From), "from", 16);
        let err = translator.syntax_error(&offending, &expected(&["','", "<EOF>"]));
        assert_eq!(err.kind(), ParseErrorKind::Syntax);
        assert_eq!(
            err.to_string(),
            "line 1:17: mismatched input 'from' expecting {',', <EOF>}"
        );

        let err = translator.syntax_error(&offending, &expected(&["<EOF>"]));
        assert_eq!(err.message(), "mismatched input 'from' expecting <EOF>");
    }

    #[test]
    fn test_enhanced_message_format() {
        let translator = ErrorTranslator::new(StandardDialect.error_labels(), true);
        let offending = token(TokenKind::Eof, "", 8);
        let err = translator.syntax_error(&offending, &expected(&["<expression>"]));
        assert_eq!(err.message(), "mismatched input '<EOF>'. Expecting: <expression>");
    }

    #[test]
    fn test_error_token_is_lex_error() {
        let translator = ErrorTranslator::new(StandardDialect.error_labels(), true);
        let offending = token(TokenKind::Error, "#", 9);
        let err = translator.syntax_error(&offending, &BTreeSet::new());
        assert_eq!(err.kind(), ParseErrorKind::Lex);
        assert_eq!(err.message(), "token recognition error at: '#'");
        assert_eq!(err.column(), Some(9));
    }
}
