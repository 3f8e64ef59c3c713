//! SQL statement AST types.

use super::expression::{Expr, Identifier, QualifiedName};

/// Order direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Ascending order (default).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl OrderDirection {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Null ordering for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullOrdering {
    /// NULLs come first.
    First,
    /// NULLs come last.
    Last,
}

impl NullOrdering {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::First => "NULLS FIRST",
            Self::Last => "NULLS LAST",
        }
    }
}

/// An ORDER BY entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SortItem {
    /// The expression to order by.
    pub expr: Expr,
    /// The direction (ASC or DESC).
    pub direction: OrderDirection,
    /// Null ordering (optional).
    pub nulls: Option<NullOrdering>,
}

/// LIMIT value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// `LIMIT n`
    Count(u64),
    /// `LIMIT ALL`
    All,
}

/// A complete query: optional WITH, a body, ORDER BY and LIMIT.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub with: Option<With>,
    pub body: QueryBody,
    pub order_by: Vec<SortItem>,
    pub limit: Option<Limit>,
}

impl Query {
    /// Wraps a query body with no WITH, ORDER BY or LIMIT.
    #[must_use]
    pub const fn simple(body: QueryBody) -> Self {
        Self {
            with: None,
            body,
            order_by: Vec::new(),
            limit: None,
        }
    }
}

/// `WITH [RECURSIVE] name AS (query), ...`
#[derive(Debug, Clone, PartialEq)]
pub struct With {
    pub recursive: bool,
    pub queries: Vec<WithQuery>,
}

/// One named query of a WITH clause.
#[derive(Debug, Clone, PartialEq)]
pub struct WithQuery {
    pub name: Identifier,
    pub column_names: Vec<Identifier>,
    pub query: Box<Query>,
}

/// Set operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    Union,
    Intersect,
    Except,
}

/// The body of a query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryBody {
    /// `SELECT ...`
    Specification(Box<QuerySpecification>),
    /// `left UNION|INTERSECT|EXCEPT [ALL|DISTINCT] right`. `distinct` is true
    /// unless `ALL` was given.
    SetOperation {
        op: SetOperator,
        distinct: bool,
        left: Box<QueryBody>,
        right: Box<QueryBody>,
    },
    /// `TABLE name`
    Table(QualifiedName),
    /// `VALUES row, ...`
    Values(Vec<Expr>),
    /// A parenthesised query.
    Query(Box<Query>),
}

/// A `SELECT` block.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpecification {
    pub distinct: bool,
    pub select: Vec<SelectItem>,
    pub from: Option<Relation>,
    pub where_clause: Option<Expr>,
    pub group_by: Option<GroupBy>,
    pub having: Option<Expr>,
}

/// `GROUP BY [DISTINCT|ALL] expr, ...`
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBy {
    pub distinct: bool,
    pub expressions: Vec<Expr>,
}

/// An item of the select list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    /// `*` or `prefix.*`
    All { prefix: Option<QualifiedName> },
    /// `expr [AS alias]`
    Single {
        expr: Expr,
        alias: Option<Identifier>,
    },
}

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// `CROSS JOIN`
    Cross,
    /// `[INNER] JOIN`
    Inner,
    /// `LEFT [OUTER] JOIN`
    Left,
    /// `RIGHT [OUTER] JOIN`
    Right,
    /// `FULL [OUTER] JOIN`
    Full,
    /// `FROM a, b`
    Implicit,
}

impl JoinType {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
            Self::Cross => "CROSS JOIN",
            Self::Implicit => ",",
        }
    }
}

/// How the two sides of a join are matched.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinCriteria {
    On(Expr),
    Using(Vec<Identifier>),
    Natural,
}

/// A relation in a FROM clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Relation {
    /// A table name.
    Table(QualifiedName),
    /// `relation [AS] alias [(columns)]`
    Aliased {
        relation: Box<Relation>,
        alias: Identifier,
        column_names: Vec<Identifier>,
    },
    /// `(query)`
    Subquery(Box<Query>),
    /// Two relations joined.
    Join {
        join_type: JoinType,
        left: Box<Relation>,
        right: Box<Relation>,
        criteria: Option<JoinCriteria>,
    },
    /// `UNNEST(expr, ...) [WITH ORDINALITY]`
    Unnest {
        expressions: Vec<Expr>,
        with_ordinality: bool,
    },
    /// `LATERAL (query)`
    Lateral(Box<Query>),
}

/// Top-level statements.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A query.
    Query(Box<Query>),
    /// `USE [catalog.]schema`
    Use {
        catalog: Option<Identifier>,
        schema: Identifier,
    },
    /// `SET SESSION name = value`
    SetSession { name: QualifiedName, value: Expr },
    /// `RESET SESSION name`
    ResetSession { name: QualifiedName },
    /// `SHOW TABLES [FROM schema] [LIKE pattern]`
    ShowTables {
        schema: Option<QualifiedName>,
        like_pattern: Option<String>,
    },
    /// `SHOW SCHEMAS [FROM catalog] [LIKE pattern]`
    ShowSchemas {
        catalog: Option<Identifier>,
        like_pattern: Option<String>,
    },
    /// `SHOW CATALOGS [LIKE pattern]`
    ShowCatalogs { like_pattern: Option<String> },
    /// `SHOW COLUMNS FROM table`, `DESCRIBE table`
    ShowColumns { table: QualifiedName },
    /// `EXPLAIN [ANALYZE] statement`
    Explain {
        analyze: bool,
        statement: Box<Statement>,
    },
    /// `CREATE TABLE [IF NOT EXISTS] name [(columns)] AS query`
    CreateTableAsSelect {
        name: QualifiedName,
        not_exists: bool,
        column_aliases: Vec<Identifier>,
        query: Box<Query>,
    },
    /// `DROP TABLE [IF EXISTS] name`
    DropTable { name: QualifiedName, exists: bool },
    /// `INSERT INTO target [(columns)] query`; `overwrite` for Hive's
    /// `INSERT OVERWRITE TABLE`.
    Insert {
        target: QualifiedName,
        columns: Vec<Identifier>,
        query: Box<Query>,
        overwrite: bool,
    },
    /// `DELETE FROM table [WHERE expr]`
    Delete {
        table: QualifiedName,
        where_clause: Option<Expr>,
    },
}

/// One element of a path specification.
#[derive(Debug, Clone, PartialEq)]
pub struct PathElement {
    pub catalog: Option<Identifier>,
    pub schema: Identifier,
}

/// `element, element, ...` as used by `SET PATH`.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSpecification {
    pub elements: Vec<PathElement>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_query_has_no_clauses() {
        let query = Query::simple(QueryBody::Table(QualifiedName::of(["t"])));
        assert!(query.with.is_none());
        assert!(query.order_by.is_empty());
        assert_eq!(query.limit, None);
    }

    #[test]
    fn test_spelling() {
        assert_eq!(OrderDirection::default().as_str(), "ASC");
        assert_eq!(NullOrdering::Last.as_str(), "NULLS LAST");
        assert_eq!(JoinType::Left.as_str(), "LEFT JOIN");
    }
}
