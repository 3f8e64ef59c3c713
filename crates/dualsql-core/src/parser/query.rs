//! Query and relation productions.

use super::engine::{PResult, Parser};
use super::prediction::Decision;
use crate::lexer::{Keyword, TokenKind};
use crate::tree::{NodeId, Rule};

const JOIN_START: [Keyword; 5] = [
    Keyword::Join,
    Keyword::Inner,
    Keyword::Left,
    Keyword::Right,
    Keyword::Full,
];

impl Parser<'_> {
    /// `query: with? queryNoWith`
    pub(crate) fn query(&mut self) -> PResult<NodeId> {
        self.within(Rule::Query, |p| {
            let mut children = Vec::new();
            if p.check_keyword(Keyword::With) {
                children.push(p.with_clause()?);
            }
            children.push(p.query_no_with()?);
            p.node(Rule::Query, children)
        })
    }

    fn with_clause(&mut self) -> PResult<NodeId> {
        let mut children = Vec::new();
        self.expect_keyword(Keyword::With, &mut children)?;
        self.eat_keyword(Keyword::Recursive, &mut children);
        children.push(self.named_query()?);
        while self.eat(TokenKind::Comma, &mut children) {
            children.push(self.named_query()?);
        }
        self.node(Rule::With, children)
    }

    /// `identifier columnAliases? AS ( query )`
    fn named_query(&mut self) -> PResult<NodeId> {
        let mut children = vec![self.identifier()?];
        if self.check(TokenKind::LeftParen) {
            children.push(self.column_aliases()?);
        }
        self.expect_keyword(Keyword::As, &mut children)?;
        self.expect(TokenKind::LeftParen, &mut children)?;
        children.push(self.query()?);
        self.expect(TokenKind::RightParen, &mut children)?;
        self.node(Rule::NamedQuery, children)
    }

    /// `queryTerm orderBy? (sortBy | distributeBy | clusterBy)* limitClause?`
    fn query_no_with(&mut self) -> PResult<NodeId> {
        let mut children = vec![self.query_term()?];
        if self.check_keyword(Keyword::Order) {
            children.push(self.order_by()?);
        }
        if self.dialect().supports_hive_query_clauses() {
            loop {
                let clause = if self.check_keyword(Keyword::Sort) {
                    Rule::SortBy
                } else if self.check_keyword(Keyword::Distribute) {
                    Rule::DistributeBy
                } else if self.check_keyword(Keyword::Cluster) {
                    Rule::ClusterBy
                } else {
                    break;
                };
                children.push(self.hive_by_clause(clause)?);
            }
        }
        if self.check_keyword(Keyword::Limit) {
            children.push(self.limit_clause()?);
        }
        self.node(Rule::QueryNoWith, children)
    }

    pub(crate) fn order_by(&mut self) -> PResult<NodeId> {
        let mut children = Vec::new();
        self.expect_keyword(Keyword::Order, &mut children)?;
        self.expect_keyword(Keyword::By, &mut children)?;
        self.sort_items(&mut children)?;
        self.node(Rule::OrderBy, children)
    }

    fn sort_items(&mut self, children: &mut Vec<NodeId>) -> PResult<()> {
        children.push(self.sort_item()?);
        while self.eat(TokenKind::Comma, children) {
            children.push(self.sort_item()?);
        }
        Ok(())
    }

    /// `expression (ASC | DESC)? (NULLS (FIRST | LAST))?`
    fn sort_item(&mut self) -> PResult<NodeId> {
        let mut children = vec![self.expression()?];
        if !self.eat_keyword(Keyword::Asc, &mut children) {
            self.eat_keyword(Keyword::Desc, &mut children);
        }
        if self.eat_keyword(Keyword::Nulls, &mut children) {
            self.expect_one_of(&[Keyword::First, Keyword::Last], &mut children)?;
        }
        self.node(Rule::SortItem, children)
    }

    /// `SORT BY sortItem, ...`, `DISTRIBUTE BY expression, ...` or
    /// `CLUSTER BY expression, ...`
    fn hive_by_clause(&mut self, clause: Rule) -> PResult<NodeId> {
        let mut children = Vec::new();
        self.bump(&mut children);
        self.expect_keyword(Keyword::By, &mut children)?;
        if clause == Rule::SortBy {
            self.sort_items(&mut children)?;
        } else {
            self.expression_list(&mut children)?;
        }
        self.node(clause, children)
    }

    /// `LIMIT (INTEGER_VALUE | ALL)`
    fn limit_clause(&mut self) -> PResult<NodeId> {
        let mut children = Vec::new();
        self.expect_keyword(Keyword::Limit, &mut children)?;
        if !self.eat(TokenKind::Integer, &mut children) {
            self.expect_keyword(Keyword::All, &mut children)?;
        }
        self.node(Rule::LimitClause, children)
    }

    /// Set operations; `INTERSECT` binds tighter than `UNION` and `EXCEPT`.
    fn query_term(&mut self) -> PResult<NodeId> {
        self.within(Rule::QueryTerm, |p| {
            let mut left = p.intersect_term()?;
            loop {
                let mut children = vec![left];
                if !(p.eat_keyword(Keyword::Union, &mut children)
                    || p.eat_keyword(Keyword::Except, &mut children))
                {
                    return Ok(left);
                }
                p.set_quantifier(&mut children);
                children.push(p.intersect_term()?);
                left = p.node(Rule::SetOperation, children)?;
            }
        })
    }

    fn intersect_term(&mut self) -> PResult<NodeId> {
        let mut left = self.query_primary()?;
        loop {
            let mut children = vec![left];
            if !self.eat_keyword(Keyword::Intersect, &mut children) {
                return Ok(left);
            }
            self.set_quantifier(&mut children);
            children.push(self.query_primary()?);
            left = self.node(Rule::SetOperation, children)?;
        }
    }

    pub(crate) fn set_quantifier(&mut self, children: &mut Vec<NodeId>) {
        if !self.eat_keyword(Keyword::Distinct, children) {
            self.eat_keyword(Keyword::All, children);
        }
    }

    fn query_primary(&mut self) -> PResult<NodeId> {
        self.within(Rule::QueryPrimary, |p| {
            let mut children = Vec::new();
            let rule = match p.la(1) {
                TokenKind::Keyword(Keyword::Select) => return p.query_specification(),
                TokenKind::Keyword(Keyword::Table) => {
                    p.bump(&mut children);
                    children.push(p.qualified_name()?);
                    Rule::Table
                }
                TokenKind::Keyword(Keyword::Values) => {
                    p.bump(&mut children);
                    p.expression_list(&mut children)?;
                    Rule::InlineTable
                }
                TokenKind::LeftParen => {
                    p.bump(&mut children);
                    children.push(p.query_no_with()?);
                    p.expect(TokenKind::RightParen, &mut children)?;
                    Rule::Subquery
                }
                _ => {
                    for keyword in [Keyword::Select, Keyword::Table, Keyword::Values] {
                        p.expected(TokenKind::Keyword(keyword));
                    }
                    p.expected(TokenKind::LeftParen);
                    return Err(p.mismatch());
                }
            };
            p.node(rule, children)
        })
    }

    /// `SELECT setQuantifier? selectItem, ... fromClause? whereClause? groupBy? havingClause?`
    fn query_specification(&mut self) -> PResult<NodeId> {
        let mut children = Vec::new();
        self.expect_keyword(Keyword::Select, &mut children)?;
        self.set_quantifier(&mut children);
        children.push(self.select_item()?);
        while self.eat(TokenKind::Comma, &mut children) {
            children.push(self.select_item()?);
        }
        if self.check_keyword(Keyword::From) {
            children.push(self.from_clause()?);
        }
        if self.check_keyword(Keyword::Where) {
            children.push(self.where_clause()?);
        }
        if self.check_keyword(Keyword::Group) {
            children.push(self.group_by()?);
        }
        if self.check_keyword(Keyword::Having) {
            let mut having = Vec::new();
            self.bump(&mut having);
            having.push(self.boolean_expression()?);
            children.push(self.node(Rule::HavingClause, having)?);
        }
        self.node(Rule::QuerySpecification, children)
    }

    fn select_item(&mut self) -> PResult<NodeId> {
        self.within(Rule::SelectItem, |p| {
            let mut children = Vec::new();
            let rule = p.decide(Decision::SelectItem, &mut children)?;
            p.node(rule, children)
        })
    }

    /// `*`
    pub(crate) fn select_all(&mut self, children: &mut Vec<NodeId>) -> PResult<Rule> {
        self.expect(TokenKind::Asterisk, children)?;
        Ok(Rule::SelectAll)
    }

    /// `qualifiedName . *`
    pub(crate) fn select_all_qualified(&mut self, children: &mut Vec<NodeId>) -> PResult<Rule> {
        children.push(self.qualified_name()?);
        self.expect(TokenKind::Dot, children)?;
        self.expect(TokenKind::Asterisk, children)?;
        Ok(Rule::SelectAll)
    }

    /// `expression (AS? identifier)?`
    pub(crate) fn select_single(&mut self, children: &mut Vec<NodeId>) -> PResult<Rule> {
        children.push(self.expression()?);
        self.alias(children)?;
        Ok(Rule::SelectSingle)
    }

    /// Parses an optional `AS? identifier` alias. Returns whether one was found.
    fn alias(&mut self, children: &mut Vec<NodeId>) -> PResult<bool> {
        if self.eat_keyword(Keyword::As, children) {
            children.push(self.identifier()?);
            return Ok(true);
        }
        if self.at_implicit_alias() {
            children.push(self.identifier()?);
            return Ok(true);
        }
        Ok(false)
    }

    /// Whether the current token starts an alias written without `AS`.
    ///
    /// Non-reserved keywords that open a following clause are not aliases.
    fn at_implicit_alias(&mut self) -> bool {
        let current = self.la(1);
        if !Self::is_identifier_start(current) {
            self.expected_identifier();
            return false;
        }
        let next = self.la(2);
        let opens_clause = match current {
            TokenKind::Keyword(Keyword::Limit) => {
                matches!(next, TokenKind::Integer | TokenKind::Keyword(Keyword::All))
            }
            TokenKind::Keyword(Keyword::Sort | Keyword::Distribute | Keyword::Cluster) => {
                next == TokenKind::Keyword(Keyword::By)
            }
            TokenKind::Keyword(Keyword::Lateral) => {
                matches!(next, TokenKind::Keyword(Keyword::View) | TokenKind::LeftParen)
            }
            _ => false,
        };
        !opens_clause
    }

    fn from_clause(&mut self) -> PResult<NodeId> {
        let mut children = Vec::new();
        self.expect_keyword(Keyword::From, &mut children)?;
        children.push(self.relation()?);
        while self.eat(TokenKind::Comma, &mut children) {
            children.push(self.relation()?);
        }
        self.node(Rule::FromClause, children)
    }

    pub(crate) fn where_clause(&mut self) -> PResult<NodeId> {
        let mut children = Vec::new();
        self.expect_keyword(Keyword::Where, &mut children)?;
        children.push(self.boolean_expression()?);
        self.node(Rule::WhereClause, children)
    }

    fn group_by(&mut self) -> PResult<NodeId> {
        let mut children = Vec::new();
        self.expect_keyword(Keyword::Group, &mut children)?;
        self.expect_keyword(Keyword::By, &mut children)?;
        self.set_quantifier(&mut children);
        self.expression_list(&mut children)?;
        self.node(Rule::GroupBy, children)
    }

    /// `expression (, expression)*`
    pub(crate) fn expression_list(&mut self, children: &mut Vec<NodeId>) -> PResult<()> {
        children.push(self.expression()?);
        while self.eat(TokenKind::Comma, children) {
            children.push(self.expression()?);
        }
        Ok(())
    }

    // Relations

    pub(crate) fn relation(&mut self) -> PResult<NodeId> {
        self.within(Rule::Relation, |p| {
            let mut left = p.sampled_relation()?;
            loop {
                let mut children = vec![left];
                if p.eat_keyword(Keyword::Cross, &mut children) {
                    p.expect_keyword(Keyword::Join, &mut children)?;
                    children.push(p.sampled_relation()?);
                } else if p.eat_keyword(Keyword::Natural, &mut children) {
                    p.join_type(&mut children);
                    p.expect_keyword(Keyword::Join, &mut children)?;
                    children.push(p.sampled_relation()?);
                } else if p.at_join() {
                    p.join_type(&mut children);
                    p.expect_keyword(Keyword::Join, &mut children)?;
                    children.push(p.sampled_relation()?);
                    if p.check_keyword(Keyword::On) || p.check_keyword(Keyword::Using) {
                        children.push(p.join_criteria()?);
                    } else if p.dialect().requires_join_criteria() {
                        return Err(p.mismatch());
                    }
                } else {
                    return Ok(left);
                }
                left = p.node(Rule::JoinRelation, children)?;
            }
        })
    }

    fn at_join(&mut self) -> bool {
        JOIN_START.iter().any(|keyword| self.check_keyword(*keyword))
    }

    /// `INNER? | (LEFT | RIGHT | FULL) OUTER?`
    fn join_type(&mut self, children: &mut Vec<NodeId>) {
        if self.eat_keyword(Keyword::Inner, children) {
            return;
        }
        if self.eat_keyword(Keyword::Left, children)
            || self.eat_keyword(Keyword::Right, children)
            || self.eat_keyword(Keyword::Full, children)
        {
            self.eat_keyword(Keyword::Outer, children);
        }
    }

    /// `ON booleanExpression | USING ( identifier, ... )`
    fn join_criteria(&mut self) -> PResult<NodeId> {
        let mut children = Vec::new();
        if self.eat_keyword(Keyword::On, &mut children) {
            children.push(self.boolean_expression()?);
        } else {
            self.expect_keyword(Keyword::Using, &mut children)?;
            self.expect(TokenKind::LeftParen, &mut children)?;
            children.push(self.identifier()?);
            while self.eat(TokenKind::Comma, &mut children) {
                children.push(self.identifier()?);
            }
            self.expect(TokenKind::RightParen, &mut children)?;
        }
        self.node(Rule::JoinCriteria, children)
    }

    /// An aliased relation followed by any Hive `LATERAL VIEW` clauses.
    fn sampled_relation(&mut self) -> PResult<NodeId> {
        let mut relation = self.aliased_relation()?;
        if self.dialect().supports_lateral_view() {
            while self.at_lateral_view() {
                let view = self.lateral_view()?;
                relation = self.node(Rule::LateralViewRelation, vec![relation, view])?;
            }
        }
        Ok(relation)
    }

    fn at_lateral_view(&mut self) -> bool {
        if self.at_keyword(Keyword::Lateral) && self.la(2) == TokenKind::Keyword(Keyword::View) {
            return true;
        }
        self.expected_via(TokenKind::Keyword(Keyword::Lateral), &[Rule::LateralView]);
        false
    }

    /// `LATERAL VIEW OUTER? qualifiedName ( expressions? ) identifier (AS identifier, ...)?`
    fn lateral_view(&mut self) -> PResult<NodeId> {
        self.within(Rule::LateralView, |p| {
            let mut children = Vec::new();
            p.expect_keyword(Keyword::Lateral, &mut children)?;
            p.expect_keyword(Keyword::View, &mut children)?;
            p.eat_keyword(Keyword::Outer, &mut children);
            children.push(p.qualified_name()?);
            p.expect(TokenKind::LeftParen, &mut children)?;
            if !p.check(TokenKind::RightParen) {
                p.expression_list(&mut children)?;
            }
            p.expect(TokenKind::RightParen, &mut children)?;
            children.push(p.identifier()?);
            if p.eat_keyword(Keyword::As, &mut children) {
                children.push(p.identifier()?);
                while p.eat(TokenKind::Comma, &mut children) {
                    children.push(p.identifier()?);
                }
            }
            p.node(Rule::LateralView, children)
        })
    }

    fn aliased_relation(&mut self) -> PResult<NodeId> {
        self.within(Rule::AliasedRelation, |p| {
            let primary = p.relation_primary()?;
            let mut children = vec![primary];
            if !p.alias(&mut children)? {
                return Ok(primary);
            }
            if p.check(TokenKind::LeftParen) {
                children.push(p.column_aliases()?);
            }
            p.node(Rule::AliasedRelation, children)
        })
    }

    /// `( identifier, ... )`
    pub(crate) fn column_aliases(&mut self) -> PResult<NodeId> {
        let mut children = Vec::new();
        self.expect(TokenKind::LeftParen, &mut children)?;
        children.push(self.identifier()?);
        while self.eat(TokenKind::Comma, &mut children) {
            children.push(self.identifier()?);
        }
        self.expect(TokenKind::RightParen, &mut children)?;
        self.node(Rule::ColumnAliases, children)
    }

    fn relation_primary(&mut self) -> PResult<NodeId> {
        self.within(Rule::RelationPrimary, |p| {
            let mut children = Vec::new();
            let rule = match p.la(1) {
                TokenKind::Keyword(Keyword::Unnest) => p.unnest(&mut children)?,
                TokenKind::Keyword(Keyword::Lateral) if p.la(2) == TokenKind::LeftParen => {
                    p.bump(&mut children);
                    p.parenthesized_query(&mut children)?;
                    Rule::Lateral
                }
                TokenKind::LeftParen => p.decide(Decision::RelationParen, &mut children)?,
                _ => {
                    if !p.at_identifier() {
                        p.expected(TokenKind::LeftParen);
                        p.expected(TokenKind::Keyword(Keyword::Unnest));
                        p.expected(TokenKind::Keyword(Keyword::Lateral));
                    }
                    children.push(p.qualified_name()?);
                    Rule::TableName
                }
            };
            p.node(rule, children)
        })
    }

    /// `UNNEST ( expression, ... ) (WITH ORDINALITY)?`
    fn unnest(&mut self, children: &mut Vec<NodeId>) -> PResult<Rule> {
        self.expect_keyword(Keyword::Unnest, children)?;
        self.expect(TokenKind::LeftParen, children)?;
        self.expression_list(children)?;
        self.expect(TokenKind::RightParen, children)?;
        if self.at_keyword(Keyword::With) && self.la(2) == TokenKind::Keyword(Keyword::Ordinality) {
            self.bump(children);
            self.bump(children);
        }
        Ok(Rule::Unnest)
    }

    /// `( query )`
    pub(crate) fn parenthesized_query(&mut self, children: &mut Vec<NodeId>) -> PResult<()> {
        self.expect(TokenKind::LeftParen, children)?;
        children.push(self.query()?);
        self.expect(TokenKind::RightParen, children)
    }

    pub(crate) fn subquery_relation(&mut self, children: &mut Vec<NodeId>) -> PResult<Rule> {
        self.parenthesized_query(children)?;
        Ok(Rule::SubqueryRelation)
    }

    pub(crate) fn parenthesized_relation(&mut self, children: &mut Vec<NodeId>) -> PResult<Rule> {
        self.expect(TokenKind::LeftParen, children)?;
        children.push(self.relation()?);
        self.expect(TokenKind::RightParen, children)?;
        Ok(Rule::ParenthesizedRelation)
    }
}
