//! SQL dialect support.
//!
//! The two supported dialects differ in keywords, a handful of grammar
//! productions, identifier rules, error labels and AST-builder restrictions.
//! Each [`Dialect`] implementation bundles those capabilities; the
//! [`DialectKind`] enum picks one.

mod hive;
mod standard;

pub use hive::HiveDialect;
pub use standard::StandardDialect;

use serde::{Deserialize, Serialize};

use crate::diagnostics::ErrorLabels;
use crate::lexer::Keyword;

/// The closed set of supported dialects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialectKind {
    /// Presto-style standard SQL.
    #[default]
    Standard,
    /// Hive-flavoured SQL.
    Hive,
}

impl DialectKind {
    /// Returns the dialect name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Hive => "hive",
        }
    }
}

/// Trait for SQL dialect-specific behavior.
///
/// Every method has the standard dialect's answer as its default.
pub trait Dialect: Send + Sync + std::fmt::Debug {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns which dialect this is.
    fn kind(&self) -> DialectKind;

    /// Looks up a keyword, case-insensitively.
    fn keyword(&self, word: &str) -> Option<Keyword> {
        Keyword::from_str(word).filter(|keyword| !keyword.is_hive_only())
    }

    /// Keywords usable as unquoted identifiers in this dialect.
    fn non_reserved_keywords(&self) -> Vec<Keyword> {
        Keyword::ALL
            .iter()
            .copied()
            .filter(|keyword| !keyword.is_reserved())
            .filter(|keyword| self.keyword(keyword.as_str()).is_some())
            .collect()
    }

    /// Label table used by the enhanced error handler.
    fn error_labels(&self) -> &'static ErrorLabels;

    /// Whether `==` is an equality operator.
    fn supports_double_equals(&self) -> bool {
        false
    }

    /// Whether `LATERAL VIEW udtf(...)` is accepted after a relation.
    fn supports_lateral_view(&self) -> bool {
        false
    }

    /// Whether `SORT BY`, `DISTRIBUTE BY` and `CLUSTER BY` are parsed.
    fn supports_hive_query_clauses(&self) -> bool {
        false
    }

    /// Whether `RLIKE` and `REGEXP` predicates are parsed.
    fn supports_regexp_predicates(&self) -> bool {
        false
    }

    /// Whether `INSERT OVERWRITE TABLE` is parsed.
    fn supports_insert_overwrite(&self) -> bool {
        false
    }

    /// Whether non-cross joins must carry `ON` or `USING` syntactically.
    fn requires_join_criteria(&self) -> bool {
        true
    }

    /// Whether back-quoted identifiers are accepted.
    fn allows_backquoted_identifiers(&self) -> bool {
        false
    }

    /// Whether identifiers may start with a digit.
    fn allows_digit_identifiers(&self) -> bool {
        false
    }

    /// Whether `UNNEST` relations are accepted by the AST builder.
    fn supports_unnest(&self) -> bool {
        true
    }

    /// Whether subquery relations must be aliased.
    fn requires_subquery_alias(&self) -> bool {
        false
    }

    /// Whether table-generating functions may be called as plain select items.
    fn supports_direct_udtf_calls(&self) -> bool {
        true
    }
}
