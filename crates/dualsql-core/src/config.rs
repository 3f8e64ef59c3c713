//! Parser configuration and per-call parsing options.
//!
//! [`SqlParserOptions`] is fixed when a [`crate::SqlParser`] is built and shared
//! read-only by every parse. [`ParsingOptions`] travels with each call.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::dialect::DialectKind;

/// Default limit on nested grammar rules before a parse is abandoned.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 600;

/// Accepted range for [`SqlParserOptions::max_nesting_depth`].
///
/// The upper bound keeps parsing and AST building within a 2 MiB thread stack.
pub const NESTING_DEPTH_RANGE: std::ops::RangeInclusive<usize> = 8..=1_000;

/// Errors raised while validating a parser configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Nesting depth outside [`NESTING_DEPTH_RANGE`].
    #[error("max_nesting_depth must be between {min} and {max}, got {value}")]
    InvalidNestingDepth {
        /// The rejected value.
        value: usize,
        /// Smallest accepted value.
        min: usize,
        /// Largest accepted value.
        max: usize,
    },
}

/// Punctuation that may be allowed inside unquoted identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierSymbol {
    /// `:`
    Colon,
    /// `@`
    AtSign,
}

impl IdentifierSymbol {
    /// Every symbol the lexer accepts inside identifiers.
    pub const ALL: [Self; 2] = [Self::Colon, Self::AtSign];

    /// Returns the character for this symbol.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Colon => ':',
            Self::AtSign => '@',
        }
    }
}

/// Immutable configuration of a [`crate::SqlParser`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SqlParserOptions {
    allowed_identifier_symbols: BTreeSet<IdentifierSymbol>,
    enhanced_error_handler: bool,
    max_nesting_depth: usize,
}

impl Default for SqlParserOptions {
    fn default() -> Self {
        Self {
            allowed_identifier_symbols: BTreeSet::new(),
            enhanced_error_handler: false,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl SqlParserOptions {
    /// Creates the default configuration: no extra identifier symbols, basic errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allows `symbol` inside unquoted identifiers.
    #[must_use]
    pub fn allow_identifier_symbol(mut self, symbol: IdentifierSymbol) -> Self {
        self.allowed_identifier_symbols.insert(symbol);
        self
    }

    /// Allows every symbol in `symbols`.
    #[must_use]
    pub fn allow_identifier_symbols(
        mut self,
        symbols: impl IntoIterator<Item = IdentifierSymbol>,
    ) -> Self {
        self.allowed_identifier_symbols.extend(symbols);
        self
    }

    /// Switches between enhanced and basic syntax error messages.
    #[must_use]
    pub const fn use_enhanced_error_handler(mut self, enabled: bool) -> Self {
        self.enhanced_error_handler = enabled;
        self
    }

    /// Sets the nesting limit.
    ///
    /// The limit applies both to the grammar rule frames open during a parse
    /// and to the height of the resulting parse tree. A parenthesized
    /// expression costs about four frames per level, so the default of 600
    /// allows roughly 150 levels of parentheses. Each operator in a
    /// left-associative chain (`a + b + ...`, `OR`, `UNION`, joins) adds one
    /// level of tree height.
    #[must_use]
    pub const fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Symbols allowed inside unquoted identifiers.
    #[must_use]
    pub const fn allowed_identifier_symbols(&self) -> &BTreeSet<IdentifierSymbol> {
        &self.allowed_identifier_symbols
    }

    /// Returns true if `symbol` is allowed inside unquoted identifiers.
    #[must_use]
    pub fn is_allowed(&self, symbol: IdentifierSymbol) -> bool {
        self.allowed_identifier_symbols.contains(&symbol)
    }

    /// Whether enhanced syntax error messages are enabled.
    #[must_use]
    pub const fn is_enhanced_error_handler_enabled(&self) -> bool {
        self.enhanced_error_handler
    }

    /// Nesting limit in grammar rule frames.
    #[must_use]
    pub const fn max_nesting_depth(&self) -> usize {
        self.max_nesting_depth
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNestingDepth`] when the nesting limit is
    /// outside [`NESTING_DEPTH_RANGE`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if NESTING_DEPTH_RANGE.contains(&self.max_nesting_depth) {
            Ok(())
        } else {
            Err(ConfigError::InvalidNestingDepth {
                value: self.max_nesting_depth,
                min: *NESTING_DEPTH_RANGE.start(),
                max: *NESTING_DEPTH_RANGE.end(),
            })
        }
    }
}

/// How the AST builder treats `DECIMAL_VALUE` literals such as `1.5`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecimalLiteralTreatment {
    /// Build a double literal.
    AsDouble,
    /// Build an exact decimal literal.
    AsDecimal,
    /// Fail with a semantic error.
    #[default]
    Reject,
}

/// Per-call options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ParsingOptions {
    /// Parse with the Hive dialect instead of the standard one.
    pub use_hive_dialect: bool,
    /// Treatment of decimal literals.
    pub decimal_literal_treatment: DecimalLiteralTreatment,
}

impl ParsingOptions {
    /// Options for the standard dialect.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            use_hive_dialect: false,
            decimal_literal_treatment: DecimalLiteralTreatment::Reject,
        }
    }

    /// Options for the Hive dialect.
    #[must_use]
    pub const fn hive() -> Self {
        Self {
            use_hive_dialect: true,
            decimal_literal_treatment: DecimalLiteralTreatment::Reject,
        }
    }

    /// Sets the decimal literal treatment.
    #[must_use]
    pub const fn with_decimal_literal_treatment(mut self, treatment: DecimalLiteralTreatment) -> Self {
        self.decimal_literal_treatment = treatment;
        self
    }

    /// The dialect these options select.
    #[must_use]
    pub const fn dialect(&self) -> DialectKind {
        if self.use_hive_dialect {
            DialectKind::Hive
        } else {
            DialectKind::Standard
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SqlParserOptions::new();
        assert!(options.allowed_identifier_symbols().is_empty());
        assert!(!options.is_enhanced_error_handler_enabled());
        assert_eq!(options.max_nesting_depth(), DEFAULT_MAX_NESTING_DEPTH);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let options = SqlParserOptions::new()
            .allow_identifier_symbol(IdentifierSymbol::Colon)
            .use_enhanced_error_handler(true);
        assert!(options.is_allowed(IdentifierSymbol::Colon));
        assert!(!options.is_allowed(IdentifierSymbol::AtSign));
        assert!(options.is_enhanced_error_handler_enabled());
    }

    #[test]
    fn test_invalid_nesting_depth() {
        let err = SqlParserOptions::new()
            .with_max_nesting_depth(0)
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNestingDepth {
                value: 0,
                min: 8,
                max: 1_000
            }
        );
    }

    #[test]
    fn test_nesting_depth_upper_bound() {
        assert!(SqlParserOptions::new()
            .with_max_nesting_depth(*NESTING_DEPTH_RANGE.end())
            .validate()
            .is_ok());
        let err = SqlParserOptions::new()
            .with_max_nesting_depth(100_000)
            .validate()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "max_nesting_depth must be between 8 and 1000, got 100000"
        );
    }

    #[test]
    fn test_parsing_options_dialect() {
        assert_eq!(ParsingOptions::default().dialect(), DialectKind::Standard);
        assert_eq!(ParsingOptions::hive().dialect(), DialectKind::Hive);
        assert_eq!(
            ParsingOptions::default().decimal_literal_treatment,
            DecimalLiteralTreatment::Reject
        );
    }

    #[test]
    fn test_options_from_json() {
        let options: SqlParserOptions = serde_json::from_str(
            r#"{"allowed_identifier_symbols": ["at_sign"], "enhanced_error_handler": true}"#,
        )
        .unwrap();
        assert!(options.is_allowed(IdentifierSymbol::AtSign));
        assert!(options.is_enhanced_error_handler_enabled());
        assert_eq!(options.max_nesting_depth(), DEFAULT_MAX_NESTING_DEPTH);

        let json = serde_json::to_string(&options).unwrap();
        let back: SqlParserOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, options);
    }

    #[test]
    fn test_identifier_symbol_chars() {
        assert_eq!(IdentifierSymbol::Colon.symbol(), ':');
        assert_eq!(IdentifierSymbol::AtSign.symbol(), '@');
    }
}
