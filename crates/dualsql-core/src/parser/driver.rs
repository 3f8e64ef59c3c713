//! Two-tier parse driver.
//!
//! A parse first runs with [`PredictionMode::Sll`]. If a decision is ambiguous
//! inside the lookahead window the attempt is cancelled, the token stream is
//! rewound and the parse restarts with [`PredictionMode::Ll`]. Syntax errors from
//! the fast tier are final: the exhaustive tier would report the same error.

use tracing::{debug, trace};

use super::engine::{Interrupt, Parser};
use super::prediction::{Decision, PredictionMode};
use crate::config::SqlParserOptions;
use crate::dialect::Dialect;
use crate::error::{Error, ParseError, Result};
use crate::lexer::{Lexer, TokenStream};
use crate::tree::ParseTree;

/// Which start rule to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    /// `singleStatement`
    Statement,
    /// `standaloneExpression`
    Expression,
    /// `standalonePathSpecification`
    PathSpecification,
}

impl EntryPoint {
    /// The name used in "too large" errors.
    #[must_use]
    pub const fn target(self) -> &'static str {
        match self {
            Self::Statement => "statement",
            Self::Expression => "expression",
            Self::PathSpecification => "path specification",
        }
    }
}

/// A checked parse tree and the tier that produced it.
#[derive(Debug, Clone)]
pub struct ParsedTree {
    /// The parse tree, rooted at the entry rule.
    pub tree: ParseTree,
    /// The prediction mode of the successful attempt.
    pub mode: PredictionMode,
}

/// Outcome of one failed attempt.
#[derive(Debug)]
pub(crate) enum AttemptError {
    /// SLL prediction could not decide; retry with LL.
    Ambiguous {
        decision: Decision,
        token_index: usize,
    },
    /// The input is rejected.
    Failed(Error),
}

/// Runs the grammar over SQL text for one dialect and configuration.
#[derive(Debug, Clone, Copy)]
pub struct ParseDriver<'a> {
    dialect: &'a dyn Dialect,
    options: &'a SqlParserOptions,
}

impl<'a> ParseDriver<'a> {
    /// Creates a driver.
    #[must_use]
    pub const fn new(dialect: &'a dyn Dialect, options: &'a SqlParserOptions) -> Self {
        Self { dialect, options }
    }

    /// Parses `sql` from `entry`, falling back from SLL to LL on ambiguity.
    ///
    /// # Errors
    ///
    /// Returns the translated syntax error, an identifier-rule error from the
    /// post-processor, or an input-too-large error when nesting exceeds the
    /// configured depth.
    pub fn parse(&self, sql: &'a str, entry: EntryPoint) -> Result<ParsedTree> {
        let tokens = TokenStream::new(Lexer::new(sql, self.dialect));
        let (outcome, mut tokens) = self.attempt(tokens, entry, PredictionMode::Sll);
        match outcome {
            Ok(tree) => Ok(ParsedTree {
                tree,
                mode: PredictionMode::Sll,
            }),
            Err(AttemptError::Ambiguous {
                decision,
                token_index,
            }) => {
                debug!(
                    decision = decision.name(),
                    token_index,
                    buffered = tokens.buffered(),
                    "SLL prediction ambiguous, retrying with LL"
                );
                tokens.reset();
                self.finish(tokens, entry, PredictionMode::Ll)
            }
            Err(AttemptError::Failed(err)) => Err(err),
        }
    }

    /// Parses `sql` with a single prediction tier and no fallback.
    ///
    /// An SLL ambiguity is reported as a syntax error at the token where it
    /// occurred.
    ///
    /// # Errors
    ///
    /// Same as [`ParseDriver::parse`].
    pub fn parse_with_mode(
        &self,
        sql: &'a str,
        entry: EntryPoint,
        mode: PredictionMode,
    ) -> Result<ParsedTree> {
        let tokens = TokenStream::new(Lexer::new(sql, self.dialect));
        self.finish(tokens, entry, mode)
    }

    fn finish(
        &self,
        tokens: TokenStream<'a>,
        entry: EntryPoint,
        mode: PredictionMode,
    ) -> Result<ParsedTree> {
        let (outcome, mut tokens) = self.attempt(tokens, entry, mode);
        match outcome {
            Ok(tree) => Ok(ParsedTree { tree, mode }),
            Err(AttemptError::Failed(err)) => Err(err),
            Err(AttemptError::Ambiguous {
                decision,
                token_index,
            }) => {
                let token = tokens.get(token_index);
                Err(ParseError::syntax(
                    format!(
                        "ambiguous input at '{}' ({})",
                        token.error_text(),
                        decision.name()
                    ),
                    token.location,
                )
                .into())
            }
        }
    }

    fn attempt(
        &self,
        tokens: TokenStream<'a>,
        entry: EntryPoint,
        mode: PredictionMode,
    ) -> (std::result::Result<ParseTree, AttemptError>, TokenStream<'a>) {
        trace!(mode = mode.name(), entry = entry.target(), "parse attempt");
        let mut parser = Parser::new(tokens, self.dialect, mode, self.options);
        let result = match entry {
            EntryPoint::Statement => parser.single_statement(),
            EntryPoint::Expression => parser.standalone_expression(),
            EntryPoint::PathSpecification => parser.standalone_path_specification(),
        };
        let outcome = match result {
            Ok(root) => Ok(root),
            Err(Interrupt::Cancelled { decision, position }) => Err(AttemptError::Ambiguous {
                decision,
                token_index: position,
            }),
            Err(Interrupt::Mismatch) => Err(AttemptError::Failed(parser.syntax_error().into())),
            Err(Interrupt::TooDeep) => Err(AttemptError::Failed(
                ParseError::input_too_large(entry.target()).into(),
            )),
            Err(Interrupt::Fatal(err)) => Err(AttemptError::Failed(*err)),
        };
        let (tokens, mut tree) = parser.into_parts();
        let outcome = outcome.map(|root| {
            tree.set_root(root);
            tree
        });
        (outcome, tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{HiveDialect, StandardDialect};
    use crate::error::ParseErrorKind;

    fn parse(sql: &str, entry: EntryPoint) -> Result<ParsedTree> {
        let options = SqlParserOptions::default();
        ParseDriver::new(&StandardDialect, &options).parse(sql, entry)
    }

    #[test]
    fn test_unambiguous_input_stays_in_sll() {
        let parsed = parse("SELECT a FROM t", EntryPoint::Statement).unwrap();
        assert_eq!(parsed.mode, PredictionMode::Sll);
    }

    #[test]
    fn test_ambiguity_retries_with_ll() {
        let parsed = parse("SELECT a.b.c.* FROM t", EntryPoint::Statement).unwrap();
        assert_eq!(parsed.mode, PredictionMode::Ll);

        let options = SqlParserOptions::default();
        let ll = ParseDriver::new(&StandardDialect, &options)
            .parse_with_mode("SELECT a.b.c.* FROM t", EntryPoint::Statement, PredictionMode::Ll)
            .unwrap();
        assert_eq!(parsed.tree, ll.tree);
    }

    #[test]
    fn test_sll_only_reports_ambiguity() {
        let options = SqlParserOptions::default();
        let err = ParseDriver::new(&StandardDialect, &options)
            .parse_with_mode("(x, y) -> x", EntryPoint::Expression, PredictionMode::Sll)
            .unwrap_err();
        let err = err.as_parse_error().unwrap();
        assert_eq!(err.kind(), ParseErrorKind::Syntax);
        assert!(err.message().starts_with("ambiguous input at '('"));
    }

    #[test]
    fn test_syntax_error_is_not_retried() {
        let err = parse("SELECT FROM", EntryPoint::Statement).unwrap_err();
        assert_eq!(err.as_parse_error().unwrap().kind(), ParseErrorKind::Syntax);
    }

    #[test]
    fn test_depth_guard() {
        let options = SqlParserOptions::default().with_max_nesting_depth(16);
        let err = ParseDriver::new(&HiveDialect, &options)
            .parse("((((((((1))))))))", EntryPoint::Expression)
            .unwrap_err();
        let err = err.as_parse_error().unwrap();
        assert_eq!(err.kind(), ParseErrorKind::InputTooLarge);
        assert_eq!(err.location(), None);
        assert_eq!(
            err.to_string(),
            "expression is too large (stack overflow while parsing)"
        );
    }

    #[test]
    fn test_depth_guard_counts_operator_chains() {
        let options = SqlParserOptions::default().with_max_nesting_depth(16);
        let driver = ParseDriver::new(&StandardDialect, &options);
        assert!(driver.parse("1 + 2 + 3", EntryPoint::Expression).is_ok());

        let sql = vec!["1"; 40].join(" + ");
        let err = driver.parse(&sql, EntryPoint::Expression).unwrap_err();
        assert_eq!(
            err.as_parse_error().map(ParseError::kind),
            Some(ParseErrorKind::InputTooLarge)
        );
    }

    #[test]
    fn test_tree_height_stays_within_limit() {
        let parsed = parse(&vec!["a"; 300].join(" OR "), EntryPoint::Expression).unwrap();
        let root = parsed.tree.root().unwrap();
        let height = parsed.tree.height(root);
        assert!(height > 300);
        assert!(height <= SqlParserOptions::default().max_nesting_depth());
    }
}
