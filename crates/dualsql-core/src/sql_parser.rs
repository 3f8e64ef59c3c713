//! The public parser facade.

use tracing::debug;

use crate::ast::{Expr, PathSpecification, Statement};
use crate::astbuilder::AstBuilder;
use crate::config::{ConfigError, ParsingOptions, SqlParserOptions};
use crate::dialect::{Dialect, DialectKind, HiveDialect, StandardDialect};
use crate::error::Result;
use crate::parser::{EntryPoint, ParseDriver, ParsedTree, PredictionMode};

/// Parses SQL text in either dialect into AST nodes.
///
/// A parser holds only immutable configuration, so one instance can be shared
/// across threads and used for any number of concurrent parses.
///
/// # Example
///
/// ```rust
/// use dualsql_core::{ParsingOptions, SqlParser, Statement};
///
/// let parser = SqlParser::new();
/// let statement = parser
///     .create_statement("SELECT a FROM t WHERE b = 1", &ParsingOptions::standard())
///     .unwrap();
/// assert!(matches!(statement, Statement::Query(_)));
///
/// let hive = parser
///     .create_statement("SELECT `a` FROM t WHERE b == 1", &ParsingOptions::hive())
///     .unwrap();
/// assert!(matches!(hive, Statement::Query(_)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SqlParser {
    options: SqlParserOptions,
    standard: StandardDialect,
    hive: HiveDialect,
}

impl SqlParser {
    /// Creates a parser with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with the given options.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the options are out of range.
    pub fn with_options(options: SqlParserOptions) -> std::result::Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self {
            options,
            standard: StandardDialect::new(),
            hive: HiveDialect::new(),
        })
    }

    /// The options this parser was built with.
    #[must_use]
    pub const fn options(&self) -> &SqlParserOptions {
        &self.options
    }

    /// Returns the dialect implementation for `kind`.
    #[must_use]
    pub fn dialect(&self, kind: DialectKind) -> &dyn Dialect {
        match kind {
            DialectKind::Standard => &self.standard,
            DialectKind::Hive => &self.hive,
        }
    }

    /// Parses one SQL statement.
    ///
    /// # Errors
    ///
    /// Returns a syntax, identifier-rule, input-too-large or semantic
    /// [`crate::ParseError`], or an invariant violation if the parse tree is
    /// malformed.
    pub fn create_statement(&self, sql: &str, parsing_options: &ParsingOptions) -> Result<Statement> {
        let dialect = self.dialect(parsing_options.dialect());
        let parsed = self.parse_tree(sql, EntryPoint::Statement, parsing_options)?;
        AstBuilder::new(&parsed.tree, dialect, parsing_options).build_statement()
    }

    /// Parses one standalone expression.
    ///
    /// # Errors
    ///
    /// Same as [`SqlParser::create_statement`].
    pub fn create_expression(&self, sql: &str, parsing_options: &ParsingOptions) -> Result<Expr> {
        let dialect = self.dialect(parsing_options.dialect());
        let parsed = self.parse_tree(sql, EntryPoint::Expression, parsing_options)?;
        AstBuilder::new(&parsed.tree, dialect, parsing_options).build_expression()
    }

    /// Parses a comma-separated path specification such as `hive.tmp, other`.
    ///
    /// Paths always use the standard dialect.
    ///
    /// # Errors
    ///
    /// Same as [`SqlParser::create_statement`].
    pub fn create_path_specification(&self, sql: &str) -> Result<PathSpecification> {
        let parsing_options = ParsingOptions::standard();
        let parsed = self.parse_tree(sql, EntryPoint::PathSpecification, &parsing_options)?;
        AstBuilder::new(&parsed.tree, &self.standard, &parsing_options).build_path_specification()
    }

    /// Parses `sql` from `entry` and returns the checked parse tree without
    /// building an AST.
    ///
    /// # Errors
    ///
    /// Returns the syntax, identifier-rule or input-too-large error.
    pub fn parse_tree(
        &self,
        sql: &str,
        entry: EntryPoint,
        parsing_options: &ParsingOptions,
    ) -> Result<ParsedTree> {
        let dialect = self.dialect(parsing_options.dialect());
        debug!(
            dialect = dialect.name(),
            entry = entry.target(),
            len = sql.len(),
            "parsing"
        );
        let parsed = ParseDriver::new(dialect, &self.options)
            .parse(sql, entry)
            .inspect_err(|err| debug!(error = %err, "parse failed"))?;
        debug!(mode = parsed.mode.name(), nodes = parsed.tree.len(), "parsed");
        Ok(parsed)
    }

    /// Like [`SqlParser::parse_tree`] but with a single prediction tier.
    ///
    /// An SLL ambiguity becomes a syntax error instead of an LL retry.
    ///
    /// # Errors
    ///
    /// Same as [`SqlParser::parse_tree`].
    pub fn parse_tree_with_mode(
        &self,
        sql: &str,
        entry: EntryPoint,
        parsing_options: &ParsingOptions,
        mode: PredictionMode,
    ) -> Result<ParsedTree> {
        let dialect = self.dialect(parsing_options.dialect());
        ParseDriver::new(dialect, &self.options).parse_with_mode(sql, entry, mode)
    }
}
