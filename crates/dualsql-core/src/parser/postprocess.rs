//! Rule-exit hooks that validate identifiers and rewrite non-reserved keywords.
//!
//! The hooks run on every rule exit of the real parse. Speculative parses never
//! reach them, so a rejected identifier is reported once, at the position the
//! committed parse reached it.

use crate::config::{IdentifierSymbol, SqlParserOptions};
use crate::dialect::Dialect;
use crate::error::{Error, ParseError, ParseErrorKind};
use crate::lexer::{Token, TokenKind};
use crate::tree::{NodeId, ParseTree, Rule};

/// Identifier and keyword post-processor.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PostProcessor<'a> {
    dialect: &'a dyn Dialect,
    options: &'a SqlParserOptions,
}

impl<'a> PostProcessor<'a> {
    pub(crate) fn new(dialect: &'a dyn Dialect, options: &'a SqlParserOptions) -> Self {
        Self { dialect, options }
    }

    /// Runs the exit hooks for the rule node `id`.
    ///
    /// # Errors
    ///
    /// Returns an identifier-rule [`ParseError`] for rejected identifiers and
    /// [`Error::InvariantViolation`] for a malformed `nonReserved` node.
    pub(crate) fn exit_rule(&self, tree: &mut ParseTree, id: NodeId) -> Result<(), Error> {
        let Some(rule) = tree.rule(id) else {
            return Ok(());
        };

        if rule == Rule::NonReserved {
            return check_non_reserved(tree, id);
        }
        replace_non_reserved(tree, id)?;

        match rule {
            Rule::UnquotedIdentifier => self.check_unquoted(tree, id),
            Rule::QuotedIdentifier => check_not_empty(tree, id),
            Rule::BackQuotedIdentifier => {
                if self.dialect.allows_backquoted_identifiers() {
                    check_not_empty(tree, id)
                } else {
                    Err(identifier_error(
                        tree,
                        id,
                        "backquoted identifiers are not supported; use double quotes to quote identifiers",
                    ))
                }
            }
            Rule::DigitIdentifier if !self.dialect.allows_digit_identifiers() => {
                Err(identifier_error(
                    tree,
                    id,
                    "identifiers must not start with a digit; surround the identifier with double quotes",
                ))
            }
            _ => Ok(()),
        }
    }

    fn check_unquoted(&self, tree: &ParseTree, id: NodeId) -> Result<(), Error> {
        let Some(token) = tree.first_token(id) else {
            return Ok(());
        };
        for symbol in IdentifierSymbol::ALL {
            if !self.options.is_allowed(symbol) && token.text.contains(symbol.symbol()) {
                return Err(identifier_error(
                    tree,
                    id,
                    &format!("identifiers must not contain '{}'", symbol.symbol()),
                ));
            }
        }
        Ok(())
    }
}

/// A `nonReserved` node may only wrap tokens.
fn check_non_reserved(tree: &ParseTree, id: NodeId) -> Result<(), Error> {
    for child in tree.children(id) {
        if let Some(nested) = tree.rule(*child) {
            return Err(Error::InvariantViolation(format!(
                "nonReserved can only contain tokens. Found nested rule: {nested}"
            )));
        }
    }
    Ok(())
}

/// Replaces every `nonReserved` child of `id` with an identifier token of the
/// same text and position.
fn replace_non_reserved(tree: &mut ParseTree, id: NodeId) -> Result<(), Error> {
    for slot in 0..tree.children(id).len() {
        let child = tree.children(id)[slot];
        if tree.rule(child) != Some(Rule::NonReserved) {
            continue;
        }
        check_non_reserved(tree, child)?;
        let Some(keyword) = tree.first_token(child) else {
            return Err(Error::InvariantViolation(
                "nonReserved node without a token".to_string(),
            ));
        };
        let identifier = Token::new(
            TokenKind::Identifier,
            keyword.text.clone(),
            keyword.span,
            keyword.location,
        );
        let replacement = tree.push_terminal(identifier);
        tree.replace_child(id, slot, replacement);
    }
    Ok(())
}

/// Rejects `""` (and Hive's empty back-quoted identifier).
fn check_not_empty(tree: &ParseTree, id: NodeId) -> Result<(), Error> {
    match tree.first_token(id) {
        Some(token) if token.text.len() == 2 => Err(identifier_error(
            tree,
            id,
            "Zero-length delimited identifier not allowed",
        )),
        _ => Ok(()),
    }
}

fn identifier_error(tree: &ParseTree, id: NodeId, message: &str) -> Error {
    let location = tree
        .first_token(id)
        .map(|token| token.location)
        .unwrap_or_default();
    ParseError::new(ParseErrorKind::IdentifierRule, message, location).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{HiveDialect, StandardDialect};
    use crate::lexer::{Keyword, Location, Span};

    fn token(kind: TokenKind, text: &str, column: usize) -> Token {
        Token::new(
            kind,
            text,
            Span::new(column, column + text.len()),
            Location::new(1, column),
        )
    }

    fn single(tree: &mut ParseTree, rule: Rule, kind: TokenKind, text: &str) -> NodeId {
        let terminal = tree.push_terminal(token(kind, text, 7));
        tree.push_rule(rule, vec![terminal])
    }

    #[test]
    fn test_non_reserved_is_rewritten_to_identifier() {
        let options = SqlParserOptions::default();
        let post = PostProcessor::new(&StandardDialect, &options);
        let mut tree = ParseTree::new();
        let keyword = tree.push_terminal(token(TokenKind::Keyword(Keyword::Day), "day", 3));
        let non_reserved = tree.push_rule(Rule::NonReserved, vec![keyword]);
        post.exit_rule(&mut tree, non_reserved).unwrap();
        let identifier = tree.push_rule(Rule::UnquotedIdentifier, vec![non_reserved]);
        post.exit_rule(&mut tree, identifier).unwrap();

        let child = tree.children(identifier)[0];
        let rewritten = tree.token(child).unwrap();
        assert_eq!(rewritten.kind, TokenKind::Identifier);
        assert_eq!(rewritten.text, "day");
        assert_eq!(rewritten.location, Location::new(1, 3));
        assert_eq!(tree.render(identifier), "(unquotedIdentifier day)");
    }

    #[test]
    fn test_non_reserved_with_nested_rule_is_invariant_violation() {
        let options = SqlParserOptions::default();
        let post = PostProcessor::new(&StandardDialect, &options);
        let mut tree = ParseTree::new();
        let inner = single(&mut tree, Rule::UnquotedIdentifier, TokenKind::Identifier, "x");
        let non_reserved = tree.push_rule(Rule::NonReserved, vec![inner]);
        let err = post.exit_rule(&mut tree, non_reserved).unwrap_err();
        assert_eq!(
            err.to_string(),
            "internal parser error: nonReserved can only contain tokens. Found nested rule: unquotedIdentifier"
        );
    }

    #[test]
    fn test_empty_quoted_identifier() {
        let options = SqlParserOptions::default();
        let post = PostProcessor::new(&StandardDialect, &options);
        let mut tree = ParseTree::new();
        let id = single(&mut tree, Rule::QuotedIdentifier, TokenKind::QuotedIdentifier, "\"\"");
        let err = post.exit_rule(&mut tree, id).unwrap_err();
        let err = err.as_parse_error().unwrap();
        assert_eq!(err.kind(), ParseErrorKind::IdentifierRule);
        assert_eq!(err.message(), "Zero-length delimited identifier not allowed");
        assert_eq!(err.column(), Some(7));
    }

    #[test]
    fn test_symbols_follow_options() {
        let mut tree = ParseTree::new();
        let id = single(&mut tree, Rule::UnquotedIdentifier, TokenKind::Identifier, "a@b");

        let strict = SqlParserOptions::default();
        let err = PostProcessor::new(&StandardDialect, &strict)
            .exit_rule(&mut tree, id)
            .unwrap_err();
        assert_eq!(
            err.as_parse_error().unwrap().message(),
            "identifiers must not contain '@'"
        );

        let relaxed = SqlParserOptions::default().allow_identifier_symbol(IdentifierSymbol::AtSign);
        assert!(PostProcessor::new(&StandardDialect, &relaxed)
            .exit_rule(&mut tree, id)
            .is_ok());
    }

    #[test]
    fn test_backquoted_depends_on_dialect() {
        let options = SqlParserOptions::default();
        let mut tree = ParseTree::new();
        let id = single(&mut tree, Rule::BackQuotedIdentifier, TokenKind::BackquotedIdentifier, "`a`");
        assert!(PostProcessor::new(&StandardDialect, &options)
            .exit_rule(&mut tree, id)
            .is_err());
        assert!(PostProcessor::new(&HiveDialect, &options)
            .exit_rule(&mut tree, id)
            .is_ok());

        let empty = single(&mut tree, Rule::BackQuotedIdentifier, TokenKind::BackquotedIdentifier, "``");
        let err = PostProcessor::new(&HiveDialect, &options)
            .exit_rule(&mut tree, empty)
            .unwrap_err();
        assert_eq!(
            err.as_parse_error().unwrap().message(),
            "Zero-length delimited identifier not allowed"
        );
    }

    #[test]
    fn test_digit_identifier_depends_on_dialect() {
        let options = SqlParserOptions::default();
        let mut tree = ParseTree::new();
        let id = single(&mut tree, Rule::DigitIdentifier, TokenKind::DigitIdentifier, "1x");
        let err = PostProcessor::new(&StandardDialect, &options)
            .exit_rule(&mut tree, id)
            .unwrap_err();
        assert_eq!(
            err.as_parse_error().unwrap().message(),
            "identifiers must not start with a digit; surround the identifier with double quotes"
        );
        assert!(PostProcessor::new(&HiveDialect, &options)
            .exit_rule(&mut tree, id)
            .is_ok());
    }
}
