//! Standard (Presto-style) SQL dialect.

use super::{Dialect, DialectKind};
use crate::diagnostics::ErrorLabels;
use crate::lexer::TokenKind;
use crate::tree::Rule;

static STANDARD_LABELS: ErrorLabels = ErrorLabels {
    rules: &[
        (Rule::Expression, "<expression>"),
        (Rule::BooleanExpression, "<expression>"),
        (Rule::ValueExpression, "<expression>"),
        (Rule::PrimaryExpression, "<expression>"),
        (Rule::Identifier, "<identifier>"),
        (Rule::String, "<string>"),
        (Rule::Query, "<query>"),
        (Rule::Type, "<type>"),
    ],
    tokens: &[(TokenKind::Integer, "<integer>")],
    ignored: &[Rule::NonReserved],
};

/// The standard SQL dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardDialect;

impl StandardDialect {
    /// Creates the standard dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for StandardDialect {
    fn name(&self) -> &'static str {
        "standard"
    }

    fn kind(&self) -> DialectKind {
        DialectKind::Standard
    }

    fn error_labels(&self) -> &'static ErrorLabels {
        &STANDARD_LABELS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Keyword;

    #[test]
    fn test_standard_dialect() {
        let dialect = StandardDialect::new();
        assert_eq!(dialect.name(), "standard");
        assert_eq!(dialect.kind(), DialectKind::Standard);
        assert!(!dialect.supports_double_equals());
        assert!(!dialect.allows_backquoted_identifiers());
        assert!(!dialect.allows_digit_identifiers());
        assert!(dialect.requires_join_criteria());
        assert!(dialect.supports_unnest());
    }

    #[test]
    fn test_hive_keywords_are_plain_identifiers() {
        let dialect = StandardDialect::new();
        assert_eq!(dialect.keyword("select"), Some(Keyword::Select));
        assert_eq!(dialect.keyword("rlike"), None);
        assert!(!dialect.non_reserved_keywords().contains(&Keyword::Sort));
        assert!(dialect.non_reserved_keywords().contains(&Keyword::Limit));
    }

    #[test]
    fn test_labels() {
        let labels = StandardDialect.error_labels();
        assert_eq!(labels.rule_label(Rule::BooleanExpression), Some("<expression>"));
        assert_eq!(labels.token_label(TokenKind::Integer), Some("<integer>"));
        assert!(labels.is_ignored(Rule::NonReserved));
    }
}
