//! Hive SQL dialect.

use super::{Dialect, DialectKind};
use crate::diagnostics::ErrorLabels;
use crate::lexer::{Keyword, TokenKind};
use crate::tree::Rule;

static HIVE_LABELS: ErrorLabels = ErrorLabels {
    rules: &[
        (Rule::Expression, "<expression>"),
        (Rule::BooleanExpression, "<expression>"),
        (Rule::ValueExpression, "<expression>"),
        (Rule::PrimaryExpression, "<expression>"),
        (Rule::Identifier, "<identifier>"),
        (Rule::String, "<string>"),
        (Rule::Query, "<query>"),
        (Rule::Type, "<type>"),
        (Rule::LateralView, "<lateral view>"),
    ],
    tokens: &[(TokenKind::Integer, "<integer>")],
    ignored: &[Rule::NonReserved],
};

/// The Hive SQL dialect.
///
/// Accepts back-quoted and digit-leading identifiers, `==`, `RLIKE`/`REGEXP`,
/// `LATERAL VIEW` and joins without criteria. The AST builder then rejects the
/// Hive constructs it has no equivalent for.
#[derive(Debug, Default, Clone, Copy)]
pub struct HiveDialect;

impl HiveDialect {
    /// Creates the Hive dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for HiveDialect {
    fn name(&self) -> &'static str {
        "hive"
    }

    fn kind(&self) -> DialectKind {
        DialectKind::Hive
    }

    fn keyword(&self, word: &str) -> Option<Keyword> {
        Keyword::from_str(word)
    }

    fn error_labels(&self) -> &'static ErrorLabels {
        &HIVE_LABELS
    }

    fn supports_double_equals(&self) -> bool {
        true
    }

    fn supports_lateral_view(&self) -> bool {
        true
    }

    fn supports_hive_query_clauses(&self) -> bool {
        true
    }

    fn supports_regexp_predicates(&self) -> bool {
        true
    }

    fn supports_insert_overwrite(&self) -> bool {
        true
    }

    fn requires_join_criteria(&self) -> bool {
        false
    }

    fn allows_backquoted_identifiers(&self) -> bool {
        true
    }

    fn allows_digit_identifiers(&self) -> bool {
        true
    }

    fn supports_unnest(&self) -> bool {
        false
    }

    fn requires_subquery_alias(&self) -> bool {
        true
    }

    fn supports_direct_udtf_calls(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hive_dialect() {
        let dialect = HiveDialect::new();
        assert_eq!(dialect.name(), "hive");
        assert_eq!(dialect.kind(), DialectKind::Hive);
        assert!(dialect.supports_double_equals());
        assert!(dialect.allows_backquoted_identifiers());
        assert!(dialect.allows_digit_identifiers());
        assert!(!dialect.requires_join_criteria());
        assert!(!dialect.supports_unnest());
    }

    #[test]
    fn test_hive_keywords() {
        let dialect = HiveDialect::new();
        assert_eq!(dialect.keyword("RLIKE"), Some(Keyword::Rlike));
        assert!(dialect.non_reserved_keywords().contains(&Keyword::Sort));
    }

    #[test]
    fn test_hive_labels_cover_hive_rules() {
        let labels = HiveDialect.error_labels();
        assert_eq!(labels.rule_label(Rule::LateralView), Some("<lateral view>"));
        assert_eq!(labels.rule_label(Rule::Identifier), Some("<identifier>"));
    }
}
