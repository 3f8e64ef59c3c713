//! Expressions, literals, names and types.

use super::AstBuilder;
use crate::ast::{
    CurrentTimeFunction, DataType, Expr, FrameBound, FrameUnit, FunctionCall, Identifier,
    IntervalField, Literal, LogicalOp, PathElement, PathSpecification, QualifiedName, Quantifier,
    RowField, TypeParameter, UnaryOp, WhenClause, Window, WindowFrame,
};
use crate::config::DecimalLiteralTreatment;
use crate::error::{ParseError, Result};
use crate::lexer::{Keyword, Token, TokenKind};
use crate::parser::pratt::{token_to_arithmetic_op, token_to_comparison_op};
use crate::tree::{NodeId, Rule};

impl AstBuilder<'_> {
    pub(super) fn exprs(&mut self, ids: &[NodeId]) -> Result<Vec<Expr>> {
        ids.iter().map(|id| self.expr(*id)).collect()
    }

    fn boxed(&mut self, id: NodeId) -> Result<Box<Expr>> {
        self.expr(id).map(Box::new)
    }

    /// Builds the `index`-th rule child of `id`.
    fn operand(&mut self, id: NodeId, index: usize) -> Result<Box<Expr>> {
        let child = self.nth_rule(id, index)?;
        self.boxed(child)
    }

    /// The first operator token of a binary node.
    fn operator(&self, id: NodeId) -> Result<&Token> {
        self.tokens(id).next().ok_or_else(|| self.malformed(id))
    }

    /// Builds the expression rooted at `id`.
    ///
    /// Each group of rules is lowered by its own function so that a long
    /// operator chain recurses through small frames only.
    pub(super) fn expr(&mut self, id: NodeId) -> Result<Expr> {
        let Some(rule) = self.rule(id) else {
            return Err(self.malformed(id));
        };
        match rule {
            Rule::LogicalBinary | Rule::LogicalNot => self.logical(id, rule),
            Rule::Comparison
            | Rule::QuantifiedComparison
            | Rule::Between
            | Rule::InList
            | Rule::InSubquery
            | Rule::Like
            | Rule::RegexpLike
            | Rule::NullPredicate
            | Rule::DistinctFrom => self.predicate(id, rule),
            Rule::ArithmeticBinary
            | Rule::ArithmeticUnary
            | Rule::Concatenation
            | Rule::Dereference
            | Rule::Subscript => self.value(id, rule),
            Rule::NullLiteral
            | Rule::BooleanLiteral
            | Rule::NumericLiteral
            | Rule::BasicStringLiteral
            | Rule::BinaryLiteral
            | Rule::IntervalLiteral
            | Rule::TypeConstructor
            | Rule::Parameter => self.literal(id, rule),
            _ => self.primary(id, rule),
        }
    }

    fn logical(&mut self, id: NodeId, rule: Rule) -> Result<Expr> {
        if rule == Rule::LogicalNot {
            return Ok(Expr::Not(self.operand(id, 0)?));
        }
        let op = if self.has_keyword(id, Keyword::And) {
            LogicalOp::And
        } else {
            LogicalOp::Or
        };
        Ok(Expr::Logical {
            op,
            left: self.operand(id, 0)?,
            right: self.operand(id, 1)?,
        })
    }

    fn predicate(&mut self, id: NodeId, rule: Rule) -> Result<Expr> {
        let expr = match rule {
            Rule::Comparison => {
                let kind = self.operator(id)?.kind;
                let op = token_to_comparison_op(kind).ok_or_else(|| self.malformed(id))?;
                Expr::Comparison {
                    op,
                    left: self.operand(id, 0)?,
                    right: self.operand(id, 1)?,
                }
            }
            Rule::QuantifiedComparison => {
                let mut tokens = self.tokens(id);
                let op = tokens.next().and_then(|token| token_to_comparison_op(token.kind));
                let quantifier = match tokens.next().map(|token| token.kind) {
                    Some(TokenKind::Keyword(Keyword::All)) => Some(Quantifier::All),
                    Some(TokenKind::Keyword(Keyword::Some)) => Some(Quantifier::Some),
                    Some(TokenKind::Keyword(Keyword::Any)) => Some(Quantifier::Any),
                    _ => None,
                };
                let (Some(op), Some(quantifier)) = (op, quantifier) else {
                    return Err(self.malformed(id));
                };
                let query = self.required_child(id, Rule::Query)?;
                Expr::QuantifiedComparison {
                    op,
                    quantifier,
                    value: self.operand(id, 0)?,
                    subquery: Box::new(self.query(query)?),
                }
            }
            Rule::Between => {
                let between = Expr::Between {
                    value: self.operand(id, 0)?,
                    min: self.operand(id, 1)?,
                    max: self.operand(id, 2)?,
                };
                self.negatable(id, between)
            }
            Rule::InList => {
                let rules = self.rules(id);
                let (value, list) = rules.split_first().ok_or_else(|| self.malformed(id))?;
                let value = self.boxed(*value)?;
                let list = self.exprs(list)?;
                self.negatable(id, Expr::InList { value, list })
            }
            Rule::InSubquery => {
                let query = self.required_child(id, Rule::Query)?;
                let value = self.operand(id, 0)?;
                let subquery = Box::new(self.query(query)?);
                self.negatable(id, Expr::InSubquery { value, subquery })
            }
            Rule::Like => {
                let escape = match self.rules(id).get(2) {
                    Some(escape) => Some(self.boxed(*escape)?),
                    None => None,
                };
                let like = Expr::Like {
                    value: self.operand(id, 0)?,
                    pattern: self.operand(id, 1)?,
                    escape,
                };
                self.negatable(id, like)
            }
            Rule::RegexpLike => {
                let args = vec![*self.operand(id, 0)?, *self.operand(id, 1)?];
                let call = Expr::FunctionCall(FunctionCall::new("regexp_like", args));
                self.negatable(id, call)
            }
            Rule::NullPredicate => {
                let value = self.operand(id, 0)?;
                if self.has_keyword(id, Keyword::Not) {
                    Expr::IsNotNull(value)
                } else {
                    Expr::IsNull(value)
                }
            }
            Rule::DistinctFrom => {
                let distinct = Expr::IsDistinctFrom {
                    left: self.operand(id, 0)?,
                    right: self.operand(id, 1)?,
                };
                self.negatable(id, distinct)
            }
            _ => return Err(self.malformed(id)),
        };
        Ok(expr)
    }

    fn value(&mut self, id: NodeId, rule: Rule) -> Result<Expr> {
        match rule {
            Rule::ArithmeticBinary => {
                let kind = self.operator(id)?.kind;
                let op = token_to_arithmetic_op(kind).ok_or_else(|| self.malformed(id))?;
                Ok(Expr::Arithmetic {
                    op,
                    left: self.operand(id, 0)?,
                    right: self.operand(id, 1)?,
                })
            }
            Rule::ArithmeticUnary => {
                let op = match self.operator(id)?.kind {
                    TokenKind::Minus => UnaryOp::Minus,
                    _ => UnaryOp::Plus,
                };
                Ok(Expr::Unary {
                    op,
                    operand: self.operand(id, 0)?,
                })
            }
            Rule::Concatenation => {
                let args = vec![*self.operand(id, 0)?, *self.operand(id, 1)?];
                Ok(Expr::FunctionCall(FunctionCall::new("concat", args)))
            }
            Rule::Dereference => {
                let field = self.nth_rule(id, 1)?;
                Ok(Expr::Dereference {
                    base: self.operand(id, 0)?,
                    field: self.identifier(field)?,
                })
            }
            Rule::Subscript => Ok(Expr::Subscript {
                base: self.operand(id, 0)?,
                index: self.operand(id, 1)?,
            }),
            _ => Err(self.malformed(id)),
        }
    }

    fn literal(&mut self, id: NodeId, rule: Rule) -> Result<Expr> {
        let literal = match rule {
            Rule::NullLiteral => Literal::Null,
            Rule::BooleanLiteral => return Ok(Expr::boolean(self.has_keyword(id, Keyword::True))),
            Rule::NumericLiteral => self.numeric_literal(id)?,
            Rule::BasicStringLiteral => Literal::String(self.string_value(id)?),
            Rule::BinaryLiteral => self.binary_literal(id)?,
            Rule::IntervalLiteral => self.interval_literal(id)?,
            Rule::TypeConstructor => {
                let type_name = self.identifier(self.nth_rule(id, 0)?)?.value;
                let value = self.string_value(self.nth_rule(id, 1)?)?;
                Literal::Generic { type_name, value }
            }
            Rule::Parameter => {
                let position = self.parameter_position;
                self.parameter_position += 1;
                return Ok(Expr::Parameter(position));
            }
            _ => return Err(self.malformed(id)),
        };
        Ok(Expr::Literal(literal))
    }

    fn primary(&mut self, id: NodeId, rule: Rule) -> Result<Expr> {
        let expr = match rule {
            Rule::ColumnReference => Expr::Identifier(self.identifier(self.first_rule(id)?)?),
            Rule::ParenthesizedExpression => self.expr(self.first_rule(id)?)?,
            Rule::RowConstructor => Expr::Row(self.exprs(&self.rules(id))?),
            Rule::ArrayConstructor => Expr::Array(self.exprs(&self.rules(id))?),
            Rule::SubqueryExpression => {
                let query = self.required_child(id, Rule::Query)?;
                Expr::Subquery(Box::new(self.query(query)?))
            }
            Rule::Exists => {
                let query = self.required_child(id, Rule::Query)?;
                Expr::Exists(Box::new(self.query(query)?))
            }
            Rule::Lambda => {
                let params = self.identifiers(id)?;
                let body = self
                    .rules(id)
                    .last()
                    .copied()
                    .ok_or_else(|| self.malformed(id))?;
                Expr::Lambda {
                    params,
                    body: self.boxed(body)?,
                }
            }
            Rule::SimpleCase | Rule::SearchedCase => self.case(id, rule)?,
            Rule::Cast => {
                let safe = self
                    .tokens(id)
                    .next()
                    .is_some_and(|token| token.kind == TokenKind::Keyword(Keyword::TryCast));
                let data_type = self.data_type(self.nth_rule(id, 1)?)?;
                Expr::Cast {
                    expr: self.operand(id, 0)?,
                    data_type,
                    safe,
                }
            }
            Rule::SpecialDateTimeFunction => self.special_date_time(id)?,
            Rule::FunctionCall => Expr::FunctionCall(self.function_call(id)?),
            _ => return Err(self.malformed(id)),
        };
        Ok(expr)
    }

    /// Wraps `expr` in `NOT` when the predicate node carries `NOT`.
    fn negatable(&self, id: NodeId, expr: Expr) -> Expr {
        if self.has_keyword(id, Keyword::Not) {
            expr.negate()
        } else {
            expr
        }
    }

    fn case(&mut self, id: NodeId, rule: Rule) -> Result<Expr> {
        let mut operand = None;
        let mut when_clauses = Vec::new();
        let mut default = None;
        for child in self.rules(id) {
            if self.rule(child) == Some(Rule::WhenClause) {
                when_clauses.push(WhenClause {
                    operand: *self.operand(child, 0)?,
                    result: *self.operand(child, 1)?,
                });
            } else if when_clauses.is_empty() {
                operand = Some(self.boxed(child)?);
            } else {
                default = Some(self.boxed(child)?);
            }
        }
        if rule == Rule::SearchedCase {
            return Ok(Expr::SearchedCase {
                when_clauses,
                default,
            });
        }
        Ok(Expr::SimpleCase {
            operand: operand.ok_or_else(|| self.malformed(id))?,
            when_clauses,
            default,
        })
    }

    fn special_date_time(&self, id: NodeId) -> Result<Expr> {
        let mut tokens = self.tokens(id);
        let function = match tokens.next().map(|token| token.kind) {
            Some(TokenKind::Keyword(Keyword::CurrentDate)) => CurrentTimeFunction::Date,
            Some(TokenKind::Keyword(Keyword::CurrentTime)) => CurrentTimeFunction::Time,
            Some(TokenKind::Keyword(Keyword::CurrentTimestamp)) => CurrentTimeFunction::Timestamp,
            Some(TokenKind::Keyword(Keyword::Localtime)) => CurrentTimeFunction::LocalTime,
            Some(TokenKind::Keyword(Keyword::Localtimestamp)) => {
                CurrentTimeFunction::LocalTimestamp
            }
            _ => return Err(self.malformed(id)),
        };
        let precision = match tokens.find(|token| token.kind == TokenKind::Integer) {
            Some(token) => Some(parse_number(token)?),
            None => None,
        };
        Ok(Expr::CurrentTime {
            function,
            precision,
        })
    }

    fn function_call(&mut self, id: NodeId) -> Result<FunctionCall> {
        let mut call = FunctionCall {
            name: self.qualified_name(self.required_child(id, Rule::QualifiedName)?)?,
            args: Vec::new(),
            distinct: self.has_keyword(id, Keyword::Distinct),
            order_by: Vec::new(),
            filter: None,
            window: None,
        };
        for child in self.rules(id).into_iter().skip(1) {
            match self.rule(child) {
                Some(Rule::OrderBy) => call.order_by = self.sort_items(child)?,
                Some(Rule::Filter) => call.filter = Some(self.operand(child, 0)?),
                Some(Rule::Over) => call.window = Some(self.window(child)?),
                _ => call.args.push(self.expr(child)?),
            }
        }
        Ok(call)
    }

    fn window(&mut self, id: NodeId) -> Result<Window> {
        let mut window = Window {
            partition_by: Vec::new(),
            order_by: Vec::new(),
            frame: None,
        };
        for child in self.rules(id) {
            match self.rule(child) {
                Some(Rule::OrderBy) => window.order_by = self.sort_items(child)?,
                Some(Rule::WindowFrame) => window.frame = Some(self.window_frame(child)?),
                _ => window.partition_by.push(self.expr(child)?),
            }
        }
        Ok(window)
    }

    fn window_frame(&mut self, id: NodeId) -> Result<WindowFrame> {
        let unit = if self.has_keyword(id, Keyword::Rows) {
            FrameUnit::Rows
        } else {
            FrameUnit::Range
        };
        let mut bounds = self.rules(id).into_iter();
        let start = bounds.next().ok_or_else(|| self.malformed(id))?;
        let start = self.frame_bound(start)?;
        let end = match bounds.next() {
            Some(end) => Some(self.frame_bound(end)?),
            None => None,
        };
        Ok(WindowFrame { unit, start, end })
    }

    fn frame_bound(&mut self, id: NodeId) -> Result<FrameBound> {
        if self.has_keyword(id, Keyword::Current) {
            return Ok(FrameBound::CurrentRow);
        }
        let following = self.has_keyword(id, Keyword::Following);
        if self.has_keyword(id, Keyword::Unbounded) {
            return Ok(if following {
                FrameBound::UnboundedFollowing
            } else {
                FrameBound::UnboundedPreceding
            });
        }
        let offset = self.operand(id, 0)?;
        Ok(if following {
            FrameBound::Following(offset)
        } else {
            FrameBound::Preceding(offset)
        })
    }

    // Literals

    fn numeric_literal(&self, id: NodeId) -> Result<Literal> {
        let token = self.first_token(id)?;
        match token.kind {
            TokenKind::Integer => token.text.parse().map(Literal::Long).map_err(|err| {
                ParseError::semantic(format!("Invalid numeric literal: {}", token.text), token.location)
                    .with_cause(err)
                    .into()
            }),
            TokenKind::Decimal => match self.decimal_literal_treatment {
                DecimalLiteralTreatment::AsDouble => parse_double(token).map(Literal::Double),
                DecimalLiteralTreatment::AsDecimal => Ok(Literal::Decimal(token.text.clone())),
                DecimalLiteralTreatment::Reject => Err(ParseError::semantic(
                    format!("Unexpected decimal literal: {}", token.text),
                    token.location,
                )
                .into()),
            },
            TokenKind::Double => parse_double(token).map(Literal::Double),
            _ => Err(self.malformed(id)),
        }
    }

    fn binary_literal(&self, id: NodeId) -> Result<Literal> {
        let token = self.first_token(id)?;
        let digits: String = token
            .text
            .get(2..token.text.len().saturating_sub(1))
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(self.semantic(id, "Binary literal can only contain hexadecimal digits"));
        }
        if digits.len() % 2 != 0 {
            return Err(self.semantic(id, "Binary literal must contain an even number of digits"));
        }
        let bytes = digits
            .as_bytes()
            .chunks(2)
            .map(|pair| {
                std::str::from_utf8(pair)
                    .ok()
                    .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                    .ok_or_else(|| self.malformed(id))
            })
            .collect::<Result<_>>()?;
        Ok(Literal::Binary(bytes))
    }

    /// `INTERVAL [+|-] 'value' field [TO field]`
    fn interval_literal(&self, id: NodeId) -> Result<Literal> {
        let negative = self.tokens(id).any(|token| token.kind == TokenKind::Minus);
        let value = self.string_value(self.required_child(id, Rule::BasicStringLiteral)?)?;
        let mut fields = self.tokens(id).filter_map(|token| match token.kind {
            TokenKind::Keyword(keyword) => interval_field(keyword),
            _ => None,
        });
        let start = fields.next().ok_or_else(|| self.malformed(id))?;
        Ok(Literal::Interval {
            value,
            negative,
            start,
            end: fields.next(),
        })
    }

    /// The unquoted value of a string literal node.
    pub(super) fn string_value(&self, id: NodeId) -> Result<String> {
        let token = self.first_token(id)?;
        Ok(unquote(&token.text, '\''))
    }

    // Names

    pub(super) fn identifier(&self, id: NodeId) -> Result<Identifier> {
        let token = self.first_token(id)?;
        let (value, delimited) = match self.rule(id) {
            Some(Rule::QuotedIdentifier) => (unquote(&token.text, '"'), true),
            Some(Rule::BackQuotedIdentifier) => (unquote(&token.text, '`'), true),
            Some(Rule::UnquotedIdentifier | Rule::DigitIdentifier) => (token.text.clone(), false),
            _ => return Err(self.malformed(id)),
        };
        Ok(Identifier {
            value,
            delimited,
            location: token.location,
        })
    }

    /// Identifier children of `id`, in order.
    pub(super) fn identifiers(&self, id: NodeId) -> Result<Vec<Identifier>> {
        self.identifier_children(id)
            .into_iter()
            .map(|child| self.identifier(child))
            .collect()
    }

    pub(super) fn qualified_name(&self, id: NodeId) -> Result<QualifiedName> {
        Ok(QualifiedName {
            parts: self.identifiers(id)?,
        })
    }

    // Types

    fn data_type(&self, id: NodeId) -> Result<DataType> {
        match self.rule(id) {
            Some(Rule::ArrayType) => Ok(DataType::Array(Box::new(
                self.data_type(self.first_rule(id)?)?,
            ))),
            Some(Rule::MapType) => Ok(DataType::Map(
                Box::new(self.data_type(self.nth_rule(id, 0)?)?),
                Box::new(self.data_type(self.nth_rule(id, 1)?)?),
            )),
            Some(Rule::RowType) => {
                let rules = self.rules(id);
                rules
                    .chunks(2)
                    .map(|pair| match pair {
                        [name, data_type] => Ok(RowField {
                            name: self.identifier(*name)?,
                            data_type: self.data_type(*data_type)?,
                        }),
                        _ => Err(self.malformed(id)),
                    })
                    .collect::<Result<_>>()
                    .map(DataType::Row)
            }
            Some(Rule::GenericType) => {
                let children = self.tree.children(id);
                let (name, rest) = children.split_first().ok_or_else(|| self.malformed(id))?;
                let mut parameters = Vec::new();
                for child in rest {
                    if self.rule(*child).is_some() {
                        parameters.push(TypeParameter::Type(self.data_type(*child)?));
                    } else if let Some(token) = self
                        .tree
                        .token(*child)
                        .filter(|token| token.kind == TokenKind::Integer)
                    {
                        parameters.push(TypeParameter::Integer(parse_number(token)?));
                    }
                }
                Ok(DataType::Named {
                    name: self.identifier(*name)?.value,
                    parameters,
                })
            }
            _ => Err(self.malformed(id)),
        }
    }

    // Path specification

    pub(super) fn path_specification(&self, id: NodeId) -> Result<PathSpecification> {
        let elements = self
            .rules(id)
            .into_iter()
            .map(|element| {
                let mut parts = self.identifiers(element)?;
                let schema = parts.pop().ok_or_else(|| self.malformed(element))?;
                Ok(PathElement {
                    catalog: parts.pop(),
                    schema,
                })
            })
            .collect::<Result<_>>()?;
        Ok(PathSpecification { elements })
    }
}

const fn interval_field(keyword: Keyword) -> Option<IntervalField> {
    match keyword {
        Keyword::Year => Some(IntervalField::Year),
        Keyword::Month => Some(IntervalField::Month),
        Keyword::Day => Some(IntervalField::Day),
        Keyword::Hour => Some(IntervalField::Hour),
        Keyword::Minute => Some(IntervalField::Minute),
        Keyword::Second => Some(IntervalField::Second),
        _ => None,
    }
}

/// Strips the surrounding `quote` characters and collapses doubled quotes.
fn unquote(text: &str, quote: char) -> String {
    let inner = text
        .strip_prefix(quote)
        .and_then(|rest| rest.strip_suffix(quote))
        .unwrap_or(text);
    let doubled: String = [quote, quote].iter().collect();
    inner.replace(&doubled, &quote.to_string())
}

fn parse_double(token: &Token) -> Result<f64> {
    token.text.parse().map_err(|err| {
        ParseError::semantic(format!("Invalid numeric literal: {}", token.text), token.location)
            .with_cause(err)
            .into()
    })
}

fn parse_number<T>(token: &Token) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    token.text.parse().map_err(|err| {
        ParseError::semantic(format!("Invalid numeric literal: {}", token.text), token.location)
            .with_cause(err)
            .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ArithmeticOp, ComparisonOp};
    use crate::config::ParsingOptions;
    use crate::error::ParseErrorKind;
    use crate::SqlParser;

    fn expr(sql: &str) -> Expr {
        SqlParser::new()
            .create_expression(sql, &ParsingOptions::standard())
            .unwrap()
    }

    fn expr_with(sql: &str, options: &ParsingOptions) -> crate::Result<Expr> {
        SqlParser::new().create_expression(sql, options)
    }

    #[test]
    fn test_arithmetic_precedence() {
        assert_eq!(
            expr("1 + 2 * 3"),
            Expr::long(1).arithmetic(
                ArithmeticOp::Add,
                Expr::long(2).arithmetic(ArithmeticOp::Mul, Expr::long(3))
            )
        );
        assert_eq!(
            expr("-a * b"),
            Expr::Unary {
                op: UnaryOp::Minus,
                operand: Box::new(Expr::identifier("a")),
            }
            .arithmetic(ArithmeticOp::Mul, Expr::identifier("b"))
        );
    }

    #[test]
    fn test_boolean_structure() {
        assert_eq!(
            expr("a = 1 OR NOT b AND c"),
            Expr::identifier("a")
                .compare(ComparisonOp::Eq, Expr::long(1))
                .or(Expr::identifier("b").negate().and(Expr::identifier("c")))
        );
    }

    #[test]
    fn test_negated_predicates() {
        assert!(matches!(expr("a NOT BETWEEN 1 AND 2"), Expr::Not(inner) if matches!(*inner, Expr::Between { .. })));
        assert!(matches!(expr("a NOT IN (1, 2)"), Expr::Not(inner) if matches!(*inner, Expr::InList { ref list, .. } if list.len() == 2)));
        assert!(matches!(expr("a NOT LIKE 'x%' ESCAPE '\\'"), Expr::Not(inner) if matches!(*inner, Expr::Like { escape: Some(_), .. })));
        assert!(matches!(expr("a IS NOT NULL"), Expr::IsNotNull(_)));
        assert!(matches!(expr("a IS NULL"), Expr::IsNull(_)));
        assert!(matches!(expr("a IS NOT DISTINCT FROM b"), Expr::Not(inner) if matches!(*inner, Expr::IsDistinctFrom { .. })));
    }

    #[test]
    fn test_subquery_predicates() {
        assert!(matches!(expr("a IN (SELECT b FROM t)"), Expr::InSubquery { .. }));
        assert!(matches!(
            expr("a > ALL (SELECT b FROM t)"),
            Expr::QuantifiedComparison {
                op: ComparisonOp::Gt,
                quantifier: Quantifier::All,
                ..
            }
        ));
        assert!(matches!(expr("EXISTS (SELECT 1)"), Expr::Exists(_)));
        assert!(matches!(expr("(SELECT 1)"), Expr::Subquery(_)));
    }

    #[test]
    fn test_literals() {
        assert_eq!(expr("NULL"), Expr::Literal(Literal::Null));
        assert_eq!(expr("'it''s'"), Expr::string("it's"));
        assert_eq!(expr("X'CA FE'"), Expr::Literal(Literal::Binary(vec![0xCA, 0xFE])));
        assert_eq!(expr("1E3"), Expr::Literal(Literal::Double(1000.0)));
        assert_eq!(
            expr("DATE '2020-01-01'"),
            Expr::Literal(Literal::Generic {
                type_name: "DATE".to_string(),
                value: "2020-01-01".to_string(),
            })
        );
        assert_eq!(
            expr("INTERVAL -'1-2' YEAR TO MONTH"),
            Expr::Literal(Literal::Interval {
                value: "1-2".to_string(),
                negative: true,
                start: IntervalField::Year,
                end: Some(IntervalField::Month),
            })
        );
    }

    #[test]
    fn test_decimal_literal_treatment() {
        let err = expr_with("1.5", &ParsingOptions::standard()).unwrap_err();
        assert_eq!(err.as_parse_error().map(ParseError::kind), Some(ParseErrorKind::Semantic));
        assert_eq!(err.to_string(), "line 1:1: Unexpected decimal literal: 1.5");

        let options = ParsingOptions::standard()
            .with_decimal_literal_treatment(DecimalLiteralTreatment::AsDouble);
        assert_eq!(expr_with("1.5", &options).unwrap(), Expr::Literal(Literal::Double(1.5)));

        let options = ParsingOptions::standard()
            .with_decimal_literal_treatment(DecimalLiteralTreatment::AsDecimal);
        assert_eq!(
            expr_with("1.50", &options).unwrap(),
            Expr::Literal(Literal::Decimal("1.50".to_string()))
        );
    }

    #[test]
    fn test_invalid_literals() {
        let err = expr_with("99999999999999999999", &ParsingOptions::standard()).unwrap_err();
        assert!(err.to_string().contains("Invalid numeric literal"));
        assert!(std::error::Error::source(&err).is_some());

        let err = expr_with("X'ABC'", &ParsingOptions::standard()).unwrap_err();
        assert!(err.to_string().contains("even number of digits"));
        let err = expr_with("X'GG'", &ParsingOptions::standard()).unwrap_err();
        assert!(err.to_string().contains("hexadecimal digits"));
    }

    #[test]
    fn test_parameters_are_numbered_in_order() {
        assert_eq!(
            expr("? + ?"),
            Expr::Parameter(0).arithmetic(ArithmeticOp::Add, Expr::Parameter(1))
        );
    }

    #[test]
    fn test_identifiers_and_dereference() {
        assert_eq!(
            expr("\"a\"\"b\".c"),
            Expr::Dereference {
                base: Box::new(Expr::Identifier(Identifier::delimited("a\"b"))),
                field: Identifier::new("c"),
            }
        );
        assert!(matches!(expr("arr[1]"), Expr::Subscript { .. }));
    }

    #[test]
    fn test_concat_and_regexp_become_calls() {
        let Expr::FunctionCall(call) = expr("a || b") else {
            panic!("expected call");
        };
        assert_eq!(call.name, QualifiedName::of(["concat"]));
        assert_eq!(call.args.len(), 2);

        let regexp = SqlParser::new()
            .create_expression("a NOT RLIKE '^x'", &ParsingOptions::hive())
            .unwrap();
        assert!(matches!(regexp, Expr::Not(inner) if matches!(*inner, Expr::FunctionCall(ref call) if call.name == QualifiedName::of(["regexp_like"]))));
    }

    #[test]
    fn test_function_call_parts() {
        let Expr::FunctionCall(call) = expr(
            "sum(DISTINCT x ORDER BY y) FILTER (WHERE x > 0) \
             OVER (PARTITION BY g ORDER BY y ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW)",
        ) else {
            panic!("expected call");
        };
        assert!(call.distinct);
        assert_eq!(call.args, vec![Expr::identifier("x")]);
        assert_eq!(call.order_by.len(), 1);
        assert!(call.filter.is_some());
        let window = call.window.unwrap();
        assert_eq!(window.partition_by, vec![Expr::identifier("g")]);
        let frame = window.frame.unwrap();
        assert_eq!(frame.unit, FrameUnit::Rows);
        assert_eq!(frame.start, FrameBound::UnboundedPreceding);
        assert_eq!(frame.end, Some(FrameBound::CurrentRow));

        let Expr::FunctionCall(count) = expr("count(*)") else {
            panic!("expected call");
        };
        assert!(count.args.is_empty());
    }

    #[test]
    fn test_lambdas() {
        assert_eq!(
            expr("x -> x + 1"),
            Expr::Lambda {
                params: vec![Identifier::new("x")],
                body: Box::new(Expr::identifier("x").arithmetic(ArithmeticOp::Add, Expr::long(1))),
            }
        );
        let Expr::Lambda { params, .. } = expr("(x, y) -> x + y") else {
            panic!("expected lambda");
        };
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_case_and_cast() {
        let Expr::SimpleCase {
            when_clauses,
            default,
            ..
        } = expr("CASE a WHEN 1 THEN 'one' ELSE 'many' END")
        else {
            panic!("expected simple case");
        };
        assert_eq!(when_clauses.len(), 1);
        assert_eq!(default, Some(Box::new(Expr::string("many"))));

        assert!(matches!(
            expr("CASE WHEN a THEN 1 END"),
            Expr::SearchedCase { default: None, .. }
        ));

        assert_eq!(
            expr("TRY_CAST(a AS decimal(10, 2))"),
            Expr::Cast {
                expr: Box::new(Expr::identifier("a")),
                data_type: DataType::Named {
                    name: "decimal".to_string(),
                    parameters: vec![TypeParameter::Integer(10), TypeParameter::Integer(2)],
                },
                safe: true,
            }
        );
        let Expr::Cast { data_type, .. } = expr("CAST(m AS MAP<varchar, ARRAY<int>>)") else {
            panic!("expected cast");
        };
        assert_eq!(data_type.to_sql(), "MAP<varchar, ARRAY<int>>");
    }

    #[test]
    fn test_rows_arrays_and_time() {
        assert_eq!(expr("(1, 2)"), Expr::Row(vec![Expr::long(1), Expr::long(2)]));
        assert_eq!(expr("ROW(1)"), Expr::Row(vec![Expr::long(1)]));
        assert_eq!(expr("ARRAY[]"), Expr::Array(Vec::new()));
        assert_eq!(
            expr("CURRENT_TIMESTAMP(3)"),
            Expr::CurrentTime {
                function: CurrentTimeFunction::Timestamp,
                precision: Some(3),
            }
        );
        assert_eq!(
            expr("current_date"),
            Expr::CurrentTime {
                function: CurrentTimeFunction::Date,
                precision: None,
            }
        );
    }

    #[test]
    fn test_non_reserved_keyword_as_identifier() {
        assert_eq!(expr("day + 1"), Expr::identifier("day").arithmetic(ArithmeticOp::Add, Expr::long(1)));
    }

    #[test]
    fn test_path_specification() {
        let path = SqlParser::new().create_path_specification("hive.tmp, other").unwrap();
        assert_eq!(
            path.elements,
            vec![
                PathElement {
                    catalog: Some(Identifier::new("hive")),
                    schema: Identifier::new("tmp"),
                },
                PathElement {
                    catalog: None,
                    schema: Identifier::new("other"),
                },
            ]
        );
    }
}
