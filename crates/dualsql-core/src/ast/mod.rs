//! Abstract Syntax Tree (AST) types for SQL statements.

mod expression;
mod statement;
mod types;

pub use expression::{
    ArithmeticOp, ComparisonOp, CurrentTimeFunction, Expr, FrameBound, FrameUnit, FunctionCall,
    Identifier, IntervalField, Literal, LogicalOp, QualifiedName, Quantifier, UnaryOp, WhenClause,
    Window, WindowFrame,
};
pub use statement::{
    GroupBy, JoinCriteria, JoinType, Limit, NullOrdering, OrderDirection, PathElement,
    PathSpecification, Query, QueryBody, QuerySpecification, Relation, SelectItem, SetOperator,
    SortItem, Statement, With, WithQuery,
};
pub use types::{DataType, RowField, TypeParameter};
