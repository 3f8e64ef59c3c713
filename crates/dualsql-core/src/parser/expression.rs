//! Expression productions.
//!
//! Boolean structure (`OR`, `AND`, `NOT`, predicates) is parsed by recursive
//! descent; arithmetic and concatenation use binding powers from
//! [`super::pratt`].

use super::engine::{PResult, Parser};
use super::pratt::{
    infix_binding_power, prefix_binding_power, COMPARISON_OPERATORS, INFIX_OPERATORS,
};
use super::prediction::Decision;
use crate::lexer::{Keyword, TokenKind};
use crate::tree::{NodeId, Rule};

const INTERVAL_FIELDS: [Keyword; 6] = [
    Keyword::Year,
    Keyword::Month,
    Keyword::Day,
    Keyword::Hour,
    Keyword::Minute,
    Keyword::Second,
];

const PRIMARY_START: [TokenKind; 21] = [
    TokenKind::Keyword(Keyword::Null),
    TokenKind::Keyword(Keyword::True),
    TokenKind::Keyword(Keyword::False),
    TokenKind::Integer,
    TokenKind::Decimal,
    TokenKind::Double,
    TokenKind::String,
    TokenKind::BinaryLiteral,
    TokenKind::Question,
    TokenKind::Keyword(Keyword::Interval),
    TokenKind::Keyword(Keyword::Case),
    TokenKind::Keyword(Keyword::Cast),
    TokenKind::Keyword(Keyword::Exists),
    TokenKind::Keyword(Keyword::Array),
    TokenKind::Keyword(Keyword::Row),
    TokenKind::Keyword(Keyword::CurrentDate),
    TokenKind::Keyword(Keyword::CurrentTime),
    TokenKind::Keyword(Keyword::CurrentTimestamp),
    TokenKind::Keyword(Keyword::Localtime),
    TokenKind::Keyword(Keyword::Localtimestamp),
    TokenKind::LeftParen,
];

impl Parser<'_> {
    pub(crate) fn expression(&mut self) -> PResult<NodeId> {
        self.within(Rule::Expression, Self::boolean_expression)
    }

    pub(crate) fn boolean_expression(&mut self) -> PResult<NodeId> {
        self.within(Rule::BooleanExpression, |p| {
            let mut left = p.and_expression()?;
            loop {
                let mut children = vec![left];
                if !p.eat_keyword(Keyword::Or, &mut children) {
                    return Ok(left);
                }
                children.push(p.and_expression()?);
                left = p.node(Rule::LogicalBinary, children)?;
            }
        })
    }

    fn and_expression(&mut self) -> PResult<NodeId> {
        let mut left = self.not_expression()?;
        loop {
            let mut children = vec![left];
            if !self.eat_keyword(Keyword::And, &mut children) {
                return Ok(left);
            }
            children.push(self.not_expression()?);
            left = self.node(Rule::LogicalBinary, children)?;
        }
    }

    fn not_expression(&mut self) -> PResult<NodeId> {
        if !self.check_keyword(Keyword::Not) {
            return self.predicated();
        }
        self.within(Rule::LogicalNot, |p| {
            let mut children = Vec::new();
            p.bump(&mut children);
            children.push(p.not_expression()?);
            p.node(Rule::LogicalNot, children)
        })
    }

    fn predicated(&mut self) -> PResult<NodeId> {
        self.within(Rule::Predicated, |p| {
            let value = p.value_expression()?;
            p.predicate(value)
        })
    }

    /// Parses an optional predicate applied to `value`.
    fn predicate(&mut self, value: NodeId) -> PResult<NodeId> {
        let mut children = vec![value];
        if COMPARISON_OPERATORS.contains(&self.la(1)) {
            self.bump(&mut children);
            if matches!(
                self.la(1),
                TokenKind::Keyword(Keyword::All | Keyword::Some | Keyword::Any)
            ) && self.la(2) == TokenKind::LeftParen
            {
                self.bump(&mut children);
                self.parenthesized_query(&mut children)?;
                return self.node(Rule::QuantifiedComparison, children);
            }
            children.push(self.value_expression()?);
            return self.node(Rule::Comparison, children);
        }
        for kind in COMPARISON_OPERATORS {
            self.expected(kind);
        }

        let negated = self.at_keyword(Keyword::Not)
            && matches!(
                self.la(2),
                TokenKind::Keyword(
                    Keyword::Between | Keyword::In | Keyword::Like | Keyword::Rlike | Keyword::Regexp
                )
            );
        if negated {
            self.bump(&mut children);
        }

        let rule = match self.la(1) {
            TokenKind::Keyword(Keyword::Between) => {
                self.bump(&mut children);
                children.push(self.value_expression()?);
                self.expect_keyword(Keyword::And, &mut children)?;
                children.push(self.value_expression()?);
                Rule::Between
            }
            TokenKind::Keyword(Keyword::In) => {
                self.bump(&mut children);
                self.decide(Decision::InPredicate, &mut children)?
            }
            TokenKind::Keyword(Keyword::Like) => {
                self.bump(&mut children);
                children.push(self.value_expression()?);
                if self.eat_keyword(Keyword::Escape, &mut children) {
                    children.push(self.value_expression()?);
                }
                Rule::Like
            }
            TokenKind::Keyword(Keyword::Rlike | Keyword::Regexp) => {
                self.bump(&mut children);
                children.push(self.value_expression()?);
                Rule::RegexpLike
            }
            TokenKind::Keyword(Keyword::Is) => {
                self.bump(&mut children);
                self.eat_keyword(Keyword::Not, &mut children);
                if self.eat_keyword(Keyword::Null, &mut children) {
                    Rule::NullPredicate
                } else {
                    self.expect_keyword(Keyword::Distinct, &mut children)?;
                    self.expect_keyword(Keyword::From, &mut children)?;
                    children.push(self.value_expression()?);
                    Rule::DistinctFrom
                }
            }
            _ => {
                for keyword in [Keyword::Between, Keyword::In, Keyword::Like, Keyword::Is, Keyword::Not] {
                    self.expected(TokenKind::Keyword(keyword));
                }
                if self.dialect().supports_regexp_predicates() {
                    self.expected(TokenKind::Keyword(Keyword::Rlike));
                    self.expected(TokenKind::Keyword(Keyword::Regexp));
                }
                return Ok(value);
            }
        };
        self.node(rule, children)
    }

    /// `IN ( query )`
    pub(crate) fn in_subquery(&mut self, children: &mut Vec<NodeId>) -> PResult<Rule> {
        self.parenthesized_query(children)?;
        Ok(Rule::InSubquery)
    }

    /// `IN ( expression, ... )`
    pub(crate) fn in_list(&mut self, children: &mut Vec<NodeId>) -> PResult<Rule> {
        self.expect(TokenKind::LeftParen, children)?;
        self.expression_list(children)?;
        self.expect(TokenKind::RightParen, children)?;
        Ok(Rule::InList)
    }

    // Value expressions

    pub(crate) fn value_expression(&mut self) -> PResult<NodeId> {
        self.within(Rule::ValueExpression, |p| p.value_expression_bp(0))
    }

    fn value_expression_bp(&mut self, min_bp: u8) -> PResult<NodeId> {
        let mut left = match prefix_binding_power(self.la(1)) {
            Some(bp) => self.within(Rule::ArithmeticUnary, |p| {
                let mut children = Vec::new();
                p.bump(&mut children);
                children.push(p.value_expression_bp(bp)?);
                p.node(Rule::ArithmeticUnary, children)
            })?,
            None => self.primary_expression()?,
        };

        loop {
            let kind = self.la(1);
            let Some((l_bp, r_bp)) = infix_binding_power(kind) else {
                for operator in INFIX_OPERATORS {
                    self.expected(operator);
                }
                break;
            };
            if l_bp < min_bp {
                break;
            }
            let mut children = vec![left];
            self.bump(&mut children);
            children.push(self.value_expression_bp(r_bp)?);
            let rule = if kind == TokenKind::Concat {
                Rule::Concatenation
            } else {
                Rule::ArithmeticBinary
            };
            left = self.node(rule, children)?;
        }

        Ok(left)
    }

    // Primary expressions

    fn primary_expression(&mut self) -> PResult<NodeId> {
        self.within(Rule::PrimaryExpression, |p| {
            let mut base = p.primary_base()?;
            loop {
                let mut children = vec![base];
                if p.check(TokenKind::Dot) {
                    p.bump(&mut children);
                    children.push(p.identifier()?);
                    base = p.node(Rule::Dereference, children)?;
                } else if p.check(TokenKind::LeftBracket) {
                    p.bump(&mut children);
                    children.push(p.value_expression()?);
                    p.expect(TokenKind::RightBracket, &mut children)?;
                    base = p.node(Rule::Subscript, children)?;
                } else {
                    return Ok(base);
                }
            }
        })
    }

    fn primary_base(&mut self) -> PResult<NodeId> {
        let mut children = Vec::new();
        let rule = match self.la(1) {
            TokenKind::Keyword(Keyword::Null) => {
                self.bump(&mut children);
                Rule::NullLiteral
            }
            TokenKind::Keyword(Keyword::True | Keyword::False) => {
                self.bump(&mut children);
                Rule::BooleanLiteral
            }
            TokenKind::Integer | TokenKind::Decimal | TokenKind::Double => {
                self.bump(&mut children);
                Rule::NumericLiteral
            }
            TokenKind::String => return self.string(),
            TokenKind::BinaryLiteral => {
                self.bump(&mut children);
                Rule::BinaryLiteral
            }
            TokenKind::Question => {
                self.bump(&mut children);
                Rule::Parameter
            }
            TokenKind::Keyword(Keyword::Interval)
                if matches!(self.la(2), TokenKind::String | TokenKind::Plus | TokenKind::Minus) =>
            {
                self.interval(&mut children)?
            }
            TokenKind::Keyword(Keyword::Case) => self.case_expression(&mut children)?,
            TokenKind::Keyword(Keyword::Cast | Keyword::TryCast)
                if self.la(2) == TokenKind::LeftParen =>
            {
                self.cast(&mut children)?
            }
            TokenKind::Keyword(Keyword::Exists) => {
                self.bump(&mut children);
                self.parenthesized_query(&mut children)?;
                Rule::Exists
            }
            TokenKind::Keyword(Keyword::Array) if self.la(2) == TokenKind::LeftBracket => {
                self.array_constructor(&mut children)?
            }
            TokenKind::Keyword(Keyword::Row) if self.la(2) == TokenKind::LeftParen => {
                self.bump(&mut children);
                self.expect(TokenKind::LeftParen, &mut children)?;
                self.expression_list(&mut children)?;
                self.expect(TokenKind::RightParen, &mut children)?;
                Rule::RowConstructor
            }
            TokenKind::Keyword(
                Keyword::CurrentDate
                | Keyword::CurrentTime
                | Keyword::CurrentTimestamp
                | Keyword::Localtime
                | Keyword::Localtimestamp,
            ) => {
                self.bump(&mut children);
                if self.at(TokenKind::LeftParen) && self.la(2) == TokenKind::Integer {
                    self.bump(&mut children);
                    self.bump(&mut children);
                    self.expect(TokenKind::RightParen, &mut children)?;
                }
                Rule::SpecialDateTimeFunction
            }
            TokenKind::LeftParen => self.decide(Decision::PrimaryParen, &mut children)?,
            kind if Self::is_identifier_start(kind) => {
                self.decide(Decision::PrimaryIdentifier, &mut children)?
            }
            _ => {
                for kind in PRIMARY_START {
                    self.expected(kind);
                }
                self.expected(TokenKind::Plus);
                self.expected(TokenKind::Minus);
                self.expected_identifier();
                return Err(self.mismatch());
            }
        };
        self.node(rule, children)
    }

    /// `INTERVAL (+ | -)? string field (TO field)?`
    fn interval(&mut self, children: &mut Vec<NodeId>) -> PResult<Rule> {
        self.expect_keyword(Keyword::Interval, children)?;
        if matches!(self.la(1), TokenKind::Plus | TokenKind::Minus) {
            self.bump(children);
        }
        children.push(self.string()?);
        self.expect_one_of(&INTERVAL_FIELDS, children)?;
        if self.eat_keyword(Keyword::To, children) {
            self.expect_one_of(&INTERVAL_FIELDS, children)?;
        }
        Ok(Rule::IntervalLiteral)
    }

    fn case_expression(&mut self, children: &mut Vec<NodeId>) -> PResult<Rule> {
        self.expect_keyword(Keyword::Case, children)?;
        let rule = if self.check_keyword(Keyword::When) {
            Rule::SearchedCase
        } else {
            children.push(self.expression()?);
            Rule::SimpleCase
        };
        loop {
            children.push(self.when_clause()?);
            if !self.check_keyword(Keyword::When) {
                break;
            }
        }
        if self.eat_keyword(Keyword::Else, children) {
            children.push(self.expression()?);
        }
        self.expect_keyword(Keyword::End, children)?;
        Ok(rule)
    }

    fn when_clause(&mut self) -> PResult<NodeId> {
        let mut children = Vec::new();
        self.expect_keyword(Keyword::When, &mut children)?;
        children.push(self.expression()?);
        self.expect_keyword(Keyword::Then, &mut children)?;
        children.push(self.expression()?);
        self.node(Rule::WhenClause, children)
    }

    /// `(CAST | TRY_CAST) ( expression AS type )`
    fn cast(&mut self, children: &mut Vec<NodeId>) -> PResult<Rule> {
        self.bump(children);
        self.expect(TokenKind::LeftParen, children)?;
        children.push(self.expression()?);
        self.expect_keyword(Keyword::As, children)?;
        children.push(self.data_type()?);
        self.expect(TokenKind::RightParen, children)?;
        Ok(Rule::Cast)
    }

    /// `ARRAY [ (expression, ...)? ]`
    fn array_constructor(&mut self, children: &mut Vec<NodeId>) -> PResult<Rule> {
        self.expect_keyword(Keyword::Array, children)?;
        self.expect(TokenKind::LeftBracket, children)?;
        if !self.check(TokenKind::RightBracket) {
            self.expression_list(children)?;
        }
        self.expect(TokenKind::RightBracket, children)?;
        Ok(Rule::ArrayConstructor)
    }

    // Alternatives of `Decision::PrimaryParen`

    /// `( (identifier, ...)? ) -> expression`
    pub(crate) fn parenthesized_lambda(&mut self, children: &mut Vec<NodeId>) -> PResult<Rule> {
        self.expect(TokenKind::LeftParen, children)?;
        if !self.check(TokenKind::RightParen) {
            children.push(self.identifier()?);
            while self.eat(TokenKind::Comma, children) {
                children.push(self.identifier()?);
            }
        }
        self.expect(TokenKind::RightParen, children)?;
        self.expect(TokenKind::Arrow, children)?;
        children.push(self.expression()?);
        Ok(Rule::Lambda)
    }

    pub(crate) fn subquery_expression(&mut self, children: &mut Vec<NodeId>) -> PResult<Rule> {
        self.parenthesized_query(children)?;
        Ok(Rule::SubqueryExpression)
    }

    /// `( expression )`, or a row constructor `( expression, expression, ... )`
    pub(crate) fn parenthesized_expression(
        &mut self,
        children: &mut Vec<NodeId>,
    ) -> PResult<Rule> {
        self.expect(TokenKind::LeftParen, children)?;
        children.push(self.expression()?);
        let mut rule = Rule::ParenthesizedExpression;
        while self.eat(TokenKind::Comma, children) {
            children.push(self.expression()?);
            rule = Rule::RowConstructor;
        }
        self.expect(TokenKind::RightParen, children)?;
        Ok(rule)
    }

    // Alternatives of `Decision::PrimaryIdentifier`

    /// `identifier -> expression`
    pub(crate) fn single_parameter_lambda(
        &mut self,
        children: &mut Vec<NodeId>,
    ) -> PResult<Rule> {
        children.push(self.identifier()?);
        self.expect(TokenKind::Arrow, children)?;
        children.push(self.expression()?);
        Ok(Rule::Lambda)
    }

    /// `identifier string`, e.g. `DATE '2020-01-01'`
    pub(crate) fn type_constructor(&mut self, children: &mut Vec<NodeId>) -> PResult<Rule> {
        children.push(self.identifier()?);
        children.push(self.string()?);
        Ok(Rule::TypeConstructor)
    }

    /// `qualifiedName ( (* | setQuantifier? expression, ... orderBy?)? ) filter? over?`
    pub(crate) fn function_call(&mut self, children: &mut Vec<NodeId>) -> PResult<Rule> {
        children.push(self.qualified_name()?);
        self.expect(TokenKind::LeftParen, children)?;
        if !self.eat(TokenKind::Asterisk, children) && !self.check(TokenKind::RightParen) {
            if !self.eat_keyword(Keyword::Distinct, children)
                && self.at_keyword(Keyword::All)
                && !matches!(self.la(2), TokenKind::RightParen | TokenKind::Comma)
            {
                self.bump(children);
            }
            self.expression_list(children)?;
            if self.check_keyword(Keyword::Order) {
                children.push(self.order_by()?);
            }
        }
        self.expect(TokenKind::RightParen, children)?;
        if self.at_keyword(Keyword::Filter) && self.la(2) == TokenKind::LeftParen {
            children.push(self.filter()?);
        }
        if self.at_keyword(Keyword::Over) && self.la(2) == TokenKind::LeftParen {
            children.push(self.over()?);
        }
        Ok(Rule::FunctionCall)
    }

    pub(crate) fn column_reference(&mut self, children: &mut Vec<NodeId>) -> PResult<Rule> {
        children.push(self.identifier()?);
        Ok(Rule::ColumnReference)
    }

    /// `FILTER ( WHERE booleanExpression )`
    fn filter(&mut self) -> PResult<NodeId> {
        let mut children = Vec::new();
        self.expect_keyword(Keyword::Filter, &mut children)?;
        self.expect(TokenKind::LeftParen, &mut children)?;
        self.expect_keyword(Keyword::Where, &mut children)?;
        children.push(self.boolean_expression()?);
        self.expect(TokenKind::RightParen, &mut children)?;
        self.node(Rule::Filter, children)
    }

    /// `OVER ( (PARTITION BY expression, ...)? orderBy? windowFrame? )`
    fn over(&mut self) -> PResult<NodeId> {
        let mut children = Vec::new();
        self.expect_keyword(Keyword::Over, &mut children)?;
        self.expect(TokenKind::LeftParen, &mut children)?;
        if self.eat_keyword(Keyword::Partition, &mut children) {
            self.expect_keyword(Keyword::By, &mut children)?;
            self.expression_list(&mut children)?;
        }
        if self.check_keyword(Keyword::Order) {
            children.push(self.order_by()?);
        }
        if self.check_keyword(Keyword::Range) || self.check_keyword(Keyword::Rows) {
            children.push(self.window_frame()?);
        }
        self.expect(TokenKind::RightParen, &mut children)?;
        self.node(Rule::Over, children)
    }

    fn window_frame(&mut self) -> PResult<NodeId> {
        let mut children = Vec::new();
        self.bump(&mut children);
        if self.eat_keyword(Keyword::Between, &mut children) {
            children.push(self.frame_bound()?);
            self.expect_keyword(Keyword::And, &mut children)?;
        }
        children.push(self.frame_bound()?);
        self.node(Rule::WindowFrame, children)
    }

    /// `UNBOUNDED (PRECEDING | FOLLOWING) | CURRENT ROW | expression (PRECEDING | FOLLOWING)`
    fn frame_bound(&mut self) -> PResult<NodeId> {
        let mut children = Vec::new();
        if self.at_keyword(Keyword::Current) && self.la(2) == TokenKind::Keyword(Keyword::Row) {
            self.bump(&mut children);
            self.bump(&mut children);
        } else {
            let unbounded = self.at_keyword(Keyword::Unbounded)
                && matches!(
                    self.la(2),
                    TokenKind::Keyword(Keyword::Preceding | Keyword::Following)
                );
            if unbounded {
                self.bump(&mut children);
            } else {
                children.push(self.expression()?);
            }
            self.expect_one_of(&[Keyword::Preceding, Keyword::Following], &mut children)?;
        }
        self.node(Rule::FrameBound, children)
    }
}
