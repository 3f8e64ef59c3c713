//! Expression AST types.

use std::fmt;

use super::statement::{Query, SortItem};
use super::types::DataType;
use crate::lexer::Location;

/// An identifier as written, with quotes removed.
#[derive(Debug, Clone)]
pub struct Identifier {
    /// The identifier text. Quotes are stripped and doubled quotes unescaped.
    pub value: String,
    /// Whether the identifier was quoted.
    pub delimited: bool,
    /// Where the identifier starts.
    pub location: Location,
}

impl Identifier {
    /// Creates an unquoted identifier without a source position.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            delimited: false,
            location: Location::default(),
        }
    }

    /// Creates a quoted identifier without a source position.
    #[must_use]
    pub fn delimited(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            delimited: true,
            location: Location::default(),
        }
    }
}

/// Identifiers compare by value and quoting; positions are ignored.
impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.delimited == other.delimited
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.delimited {
            write!(f, "\"{}\"", self.value.replace('"', "\"\""))
        } else {
            f.write_str(&self.value)
        }
    }
}

/// A dotted name such as `catalog.schema.table`.
#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedName {
    /// The name parts, outermost first.
    pub parts: Vec<Identifier>,
}

impl QualifiedName {
    /// Creates a name from unquoted parts.
    #[must_use]
    pub fn of<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parts: parts.into_iter().map(Identifier::new).collect(),
        }
    }

    /// The last part, e.g. the table of `schema.table`.
    #[must_use]
    pub fn suffix(&self) -> Option<&Identifier> {
        self.parts.last()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// NULL literal.
    Null,
    /// Boolean literal.
    Boolean(bool),
    /// 64-bit integer literal.
    Long(i64),
    /// Floating point literal.
    Double(f64),
    /// Exact decimal literal, kept as written.
    Decimal(String),
    /// String literal.
    String(String),
    /// Binary literal.
    Binary(Vec<u8>),
    /// Typed literal such as `DATE '2020-01-01'`.
    Generic {
        /// The type name.
        type_name: String,
        /// The literal text.
        value: String,
    },
    /// Interval literal such as `INTERVAL '3' DAY`.
    Interval {
        /// The interval text.
        value: String,
        /// Whether the interval is negated.
        negative: bool,
        /// Leading field.
        start: IntervalField,
        /// Trailing field for ranges like `YEAR TO MONTH`.
        end: Option<IntervalField>,
    },
}

/// Interval fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalField {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl ArithmeticOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl ComparisonOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
        }
    }
}

/// Logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

/// Unary sign operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `+`
    Plus,
    /// `-`
    Minus,
}

/// Quantifier of a quantified comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    All,
    Some,
    Any,
}

/// The special date/time functions that take no parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentTimeFunction {
    Date,
    Time,
    Timestamp,
    LocalTime,
    LocalTimestamp,
}

/// A function call.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// The function name.
    pub name: QualifiedName,
    /// The arguments. Empty for `f()` and `count(*)`.
    pub args: Vec<Expr>,
    /// Whether DISTINCT was specified.
    pub distinct: bool,
    /// `ORDER BY` inside the argument list.
    pub order_by: Vec<SortItem>,
    /// `FILTER (WHERE ...)`.
    pub filter: Option<Box<Expr>>,
    /// `OVER (...)`.
    pub window: Option<Window>,
}

impl FunctionCall {
    /// Creates a plain call `name(args)`.
    #[must_use]
    pub fn new(name: &str, args: Vec<Expr>) -> Self {
        Self {
            name: QualifiedName::of([name]),
            args,
            distinct: false,
            order_by: Vec::new(),
            filter: None,
            window: None,
        }
    }
}

/// A window specification.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub partition_by: Vec<Expr>,
    pub order_by: Vec<SortItem>,
    pub frame: Option<WindowFrame>,
}

/// Window frame units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameUnit {
    Range,
    Rows,
}

/// A window frame.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowFrame {
    pub unit: FrameUnit,
    pub start: FrameBound,
    pub end: Option<FrameBound>,
}

/// One end of a window frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameBound {
    UnboundedPreceding,
    Preceding(Box<Expr>),
    CurrentRow,
    Following(Box<Expr>),
    UnboundedFollowing,
}

/// A `WHEN ... THEN ...` arm of a CASE expression.
#[derive(Debug, Clone, PartialEq)]
pub struct WhenClause {
    pub operand: Expr,
    pub result: Expr,
}

/// An SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// A bare identifier, usually a column.
    Identifier(Identifier),

    /// Field access `base.field`.
    Dereference {
        base: Box<Expr>,
        field: Identifier,
    },

    /// Subscript `base[index]`.
    Subscript {
        base: Box<Expr>,
        index: Box<Expr>,
    },

    /// A `?` placeholder, numbered from 0 in source order.
    Parameter(usize),

    /// Arithmetic expression.
    Arithmetic {
        op: ArithmeticOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Unary sign.
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    /// Comparison.
    Comparison {
        op: ComparisonOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// `value op ALL|SOME|ANY (query)`.
    QuantifiedComparison {
        op: ComparisonOp,
        quantifier: Quantifier,
        value: Box<Expr>,
        subquery: Box<Query>,
    },

    /// AND / OR.
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Logical NOT. Negated predicates (`NOT IN`, `IS NOT NULL` excepted) are
    /// represented by wrapping the predicate.
    Not(Box<Expr>),

    /// `value BETWEEN min AND max`.
    Between {
        value: Box<Expr>,
        min: Box<Expr>,
        max: Box<Expr>,
    },

    /// `value IN (list)`.
    InList {
        value: Box<Expr>,
        list: Vec<Expr>,
    },

    /// `value IN (query)`.
    InSubquery {
        value: Box<Expr>,
        subquery: Box<Query>,
    },

    /// `value LIKE pattern [ESCAPE escape]`.
    Like {
        value: Box<Expr>,
        pattern: Box<Expr>,
        escape: Option<Box<Expr>>,
    },

    /// `value IS NULL`.
    IsNull(Box<Expr>),

    /// `value IS NOT NULL`.
    IsNotNull(Box<Expr>),

    /// `left IS DISTINCT FROM right`.
    IsDistinctFrom {
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// A function call.
    FunctionCall(FunctionCall),

    /// `x -> body` or `(x, y) -> body`.
    Lambda {
        params: Vec<Identifier>,
        body: Box<Expr>,
    },

    /// Scalar subquery.
    Subquery(Box<Query>),

    /// `EXISTS (query)`.
    Exists(Box<Query>),

    /// `CASE operand WHEN ... END`.
    SimpleCase {
        operand: Box<Expr>,
        when_clauses: Vec<WhenClause>,
        default: Option<Box<Expr>>,
    },

    /// `CASE WHEN ... END`.
    SearchedCase {
        when_clauses: Vec<WhenClause>,
        default: Option<Box<Expr>>,
    },

    /// `CAST(expr AS type)`; `safe` for `TRY_CAST`.
    Cast {
        expr: Box<Expr>,
        data_type: DataType,
        safe: bool,
    },

    /// `(a, b)` or `ROW(a, b)`.
    Row(Vec<Expr>),

    /// `ARRAY[a, b]`.
    Array(Vec<Expr>),

    /// `CURRENT_DATE`, `CURRENT_TIMESTAMP(3)`, ...
    CurrentTime {
        function: CurrentTimeFunction,
        precision: Option<u32>,
    },
}

impl Expr {
    /// Creates an unquoted identifier reference.
    #[must_use]
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::Identifier(Identifier::new(name))
    }

    /// Creates a 64-bit integer literal.
    #[must_use]
    pub const fn long(value: i64) -> Self {
        Self::Literal(Literal::Long(value))
    }

    /// Creates a string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::String(value.into()))
    }

    /// Creates a boolean literal.
    #[must_use]
    pub const fn boolean(value: bool) -> Self {
        Self::Literal(Literal::Boolean(value))
    }

    /// Creates an arithmetic expression.
    #[must_use]
    pub fn arithmetic(self, op: ArithmeticOp, right: Self) -> Self {
        Self::Arithmetic {
            op,
            left: Box::new(self),
            right: Box::new(right),
        }
    }

    /// Creates a comparison.
    #[must_use]
    pub fn compare(self, op: ComparisonOp, right: Self) -> Self {
        Self::Comparison {
            op,
            left: Box::new(self),
            right: Box::new(right),
        }
    }

    /// Creates an AND expression.
    #[must_use]
    pub fn and(self, right: Self) -> Self {
        Self::Logical {
            op: LogicalOp::And,
            left: Box::new(self),
            right: Box::new(right),
        }
    }

    /// Creates an OR expression.
    #[must_use]
    pub fn or(self, right: Self) -> Self {
        Self::Logical {
            op: LogicalOp::Or,
            left: Box::new(self),
            right: Box::new(right),
        }
    }

    /// Wraps the expression in NOT.
    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_equality_ignores_location() {
        let mut located = Identifier::new("a");
        located.location = Location::new(3, 9);
        assert_eq!(located, Identifier::new("a"));
        assert_ne!(Identifier::new("a"), Identifier::delimited("a"));
    }

    #[test]
    fn test_qualified_name_display() {
        let mut name = QualifiedName::of(["hive", "tmp"]);
        name.parts.push(Identifier::delimited("a\"b"));
        assert_eq!(name.to_string(), "hive.tmp.\"a\"\"b\"");
        assert_eq!(name.suffix().map(|p| p.value.as_str()), Some("a\"b"));
    }

    #[test]
    fn test_expr_chaining() {
        let expr = Expr::identifier("age")
            .compare(ComparisonOp::Gt, Expr::long(18))
            .and(Expr::identifier("status").compare(ComparisonOp::Eq, Expr::string("active")));

        assert!(matches!(
            expr,
            Expr::Logical {
                op: LogicalOp::And,
                ..
            }
        ));
    }

    #[test]
    fn test_operator_spelling() {
        assert_eq!(ArithmeticOp::Mod.as_str(), "%");
        assert_eq!(ComparisonOp::NotEq.as_str(), "<>");
    }
}
