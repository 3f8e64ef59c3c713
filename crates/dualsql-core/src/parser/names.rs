//! Identifiers, names, strings, types and path specifications.

use super::engine::{PResult, Parser};
use crate::lexer::{Keyword, TokenKind};
use crate::tree::{NodeId, Rule};

impl Parser<'_> {
    /// Parses one identifier into the production matching its spelling.
    ///
    /// Non-reserved keywords are wrapped in a `nonReserved` node which the
    /// post-processor later rewrites into a plain identifier token.
    pub(crate) fn identifier(&mut self) -> PResult<NodeId> {
        self.within(Rule::Identifier, |p| {
            let mut children = Vec::new();
            let rule = match p.la(1) {
                TokenKind::Identifier => Rule::UnquotedIdentifier,
                TokenKind::QuotedIdentifier => Rule::QuotedIdentifier,
                TokenKind::BackquotedIdentifier => Rule::BackQuotedIdentifier,
                TokenKind::DigitIdentifier => Rule::DigitIdentifier,
                TokenKind::Keyword(keyword) if !keyword.is_reserved() => {
                    children.push(p.non_reserved()?);
                    return p.node(Rule::UnquotedIdentifier, children);
                }
                _ => {
                    p.expected_identifier();
                    return Err(p.mismatch());
                }
            };
            p.bump(&mut children);
            p.node(rule, children)
        })
    }

    fn non_reserved(&mut self) -> PResult<NodeId> {
        self.within(Rule::NonReserved, |p| {
            let mut children = Vec::new();
            p.bump(&mut children);
            p.node(Rule::NonReserved, children)
        })
    }

    /// `identifier (. identifier)*`
    pub(crate) fn qualified_name(&mut self) -> PResult<NodeId> {
        self.within(Rule::QualifiedName, |p| {
            let mut children = vec![p.identifier()?];
            while p.at(TokenKind::Dot) && Self::is_identifier_start(p.la(2)) {
                p.bump(&mut children);
                children.push(p.identifier()?);
            }
            p.node(Rule::QualifiedName, children)
        })
    }

    /// A string literal.
    pub(crate) fn string(&mut self) -> PResult<NodeId> {
        self.within(Rule::String, |p| {
            let mut children = Vec::new();
            p.expect(TokenKind::String, &mut children)?;
            p.node(Rule::BasicStringLiteral, children)
        })
    }

    /// Parses a type: `ARRAY<t>`, `MAP<k, v>`, `ROW(name t, ...)` or a named
    /// type with optional parameters.
    pub(crate) fn data_type(&mut self) -> PResult<NodeId> {
        self.within(Rule::Type, |p| {
            let mut children = Vec::new();
            let rule = match (p.la(1), p.la(2)) {
                (TokenKind::Keyword(Keyword::Array), TokenKind::Lt) => {
                    p.bump(&mut children);
                    p.bump(&mut children);
                    children.push(p.data_type()?);
                    p.expect(TokenKind::Gt, &mut children)?;
                    Rule::ArrayType
                }
                (TokenKind::Keyword(Keyword::Map), TokenKind::Lt) => {
                    p.bump(&mut children);
                    p.bump(&mut children);
                    children.push(p.data_type()?);
                    p.expect(TokenKind::Comma, &mut children)?;
                    children.push(p.data_type()?);
                    p.expect(TokenKind::Gt, &mut children)?;
                    Rule::MapType
                }
                (TokenKind::Keyword(Keyword::Row), TokenKind::LeftParen) => {
                    p.bump(&mut children);
                    p.bump(&mut children);
                    loop {
                        children.push(p.identifier()?);
                        children.push(p.data_type()?);
                        if !p.eat(TokenKind::Comma, &mut children) {
                            break;
                        }
                    }
                    p.expect(TokenKind::RightParen, &mut children)?;
                    Rule::RowType
                }
                _ => {
                    children.push(p.identifier()?);
                    if p.eat(TokenKind::LeftParen, &mut children) {
                        loop {
                            if !p.eat(TokenKind::Integer, &mut children) {
                                children.push(p.data_type()?);
                            }
                            if !p.eat(TokenKind::Comma, &mut children) {
                                break;
                            }
                        }
                        p.expect(TokenKind::RightParen, &mut children)?;
                    }
                    Rule::GenericType
                }
            };
            p.node(rule, children)
        })
    }

    /// `pathElement (, pathElement)*`
    pub(crate) fn path_specification(&mut self) -> PResult<NodeId> {
        self.within(Rule::PathSpecification, |p| {
            let mut children = vec![p.path_element()?];
            while p.eat(TokenKind::Comma, &mut children) {
                children.push(p.path_element()?);
            }
            p.node(Rule::PathSpecification, children)
        })
    }

    /// `identifier . identifier` or `identifier`
    fn path_element(&mut self) -> PResult<NodeId> {
        self.within(Rule::PathElement, |p| {
            let mut children = vec![p.identifier()?];
            let rule = if p.eat(TokenKind::Dot, &mut children) {
                children.push(p.identifier()?);
                Rule::QualifiedArgument
            } else {
                Rule::UnqualifiedArgument
            };
            p.node(rule, children)
        })
    }
}
