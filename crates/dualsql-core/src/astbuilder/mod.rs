//! Lowers a checked parse tree into the typed AST.
//!
//! The builder is shared by both dialects. Dialect differences are limited to
//! the restrictions it enforces (see [`Dialect`]) and the `LATERAL VIEW`
//! rewrite, which only Hive trees contain.

mod expression;
mod statement;

use crate::ast::{Expr, PathSpecification, Statement};
use crate::config::{DecimalLiteralTreatment, ParsingOptions};
use crate::dialect::Dialect;
use crate::error::{Error, ParseError, Result};
use crate::lexer::{Keyword, Location, Token, TokenKind};
use crate::tree::{NodeId, ParseTree, Rule};

/// Builds AST nodes from one parse tree.
pub(crate) struct AstBuilder<'a> {
    tree: &'a ParseTree,
    dialect: &'a dyn Dialect,
    decimal_literal_treatment: DecimalLiteralTreatment,
    parameter_position: usize,
}

impl<'a> AstBuilder<'a> {
    pub(crate) fn new(tree: &'a ParseTree, dialect: &'a dyn Dialect, options: &ParsingOptions) -> Self {
        Self {
            tree,
            dialect,
            decimal_literal_treatment: options.decimal_literal_treatment,
            parameter_position: 0,
        }
    }

    /// Builds the statement under a `singleStatement` root.
    pub(crate) fn build_statement(&mut self) -> Result<Statement> {
        let id = self.entry()?;
        self.statement(id)
    }

    /// Builds the expression under a `standaloneExpression` root.
    pub(crate) fn build_expression(&mut self) -> Result<Expr> {
        let id = self.entry()?;
        self.expr(id)
    }

    /// Builds the path under a `standalonePathSpecification` root.
    pub(crate) fn build_path_specification(&mut self) -> Result<PathSpecification> {
        let id = self.entry()?;
        self.path_specification(id)
    }

    fn entry(&self) -> Result<NodeId> {
        let root = self
            .tree
            .root()
            .ok_or_else(|| Error::InvariantViolation("parse tree has no root".to_string()))?;
        self.first_rule(root)
    }

    // Tree access

    fn rule(&self, id: NodeId) -> Option<Rule> {
        self.tree.rule(id)
    }

    /// Rule children of `id`, in order.
    fn rules(&self, id: NodeId) -> Vec<NodeId> {
        self.tree
            .children(id)
            .iter()
            .copied()
            .filter(|child| self.tree.rule(*child).is_some())
            .collect()
    }

    fn first_rule(&self, id: NodeId) -> Result<NodeId> {
        self.rules(id)
            .first()
            .copied()
            .ok_or_else(|| self.malformed(id))
    }

    /// The `index`-th rule child of `id`.
    fn nth_rule(&self, id: NodeId, index: usize) -> Result<NodeId> {
        self.rules(id)
            .get(index)
            .copied()
            .ok_or_else(|| self.malformed(id))
    }

    fn child(&self, id: NodeId, rule: Rule) -> Option<NodeId> {
        self.tree
            .children(id)
            .iter()
            .copied()
            .find(|child| self.tree.rule(*child) == Some(rule))
    }

    fn required_child(&self, id: NodeId, rule: Rule) -> Result<NodeId> {
        self.child(id, rule).ok_or_else(|| self.malformed(id))
    }

    /// Identifier children of `id`, in order.
    fn identifier_children(&self, id: NodeId) -> Vec<NodeId> {
        self.tree
            .children(id)
            .iter()
            .copied()
            .filter(|child| self.tree.rule(*child).is_some_and(is_identifier_rule))
            .collect()
    }

    /// Terminal tokens directly under `id`.
    fn tokens(&self, id: NodeId) -> impl Iterator<Item = &'a Token> + 'a {
        let tree = self.tree;
        tree.children(id)
            .iter()
            .filter_map(move |child| tree.token(*child))
    }

    fn has_keyword(&self, id: NodeId, keyword: Keyword) -> bool {
        self.tokens(id)
            .any(|token| token.kind == TokenKind::Keyword(keyword))
    }

    fn first_token(&self, id: NodeId) -> Result<&'a Token> {
        self.tree
            .first_token(id)
            .ok_or_else(|| self.malformed(id))
    }

    fn location(&self, id: NodeId) -> Location {
        self.tree
            .first_token(id)
            .map(|token| token.location)
            .unwrap_or_default()
    }

    // Errors

    fn semantic(&self, id: NodeId, message: impl Into<String>) -> Error {
        ParseError::semantic(message, self.location(id)).into()
    }

    fn malformed(&self, id: NodeId) -> Error {
        let what = self
            .rule(id)
            .map_or_else(|| "terminal".to_string(), |rule| rule.name().to_string());
        Error::InvariantViolation(format!("unexpected parse tree shape at {what}"))
    }
}

const fn is_identifier_rule(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::UnquotedIdentifier
            | Rule::QuotedIdentifier
            | Rule::BackQuotedIdentifier
            | Rule::DigitIdentifier
    )
}
