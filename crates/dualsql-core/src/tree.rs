//! Arena-backed concrete parse tree.
//!
//! Every node lives in a single `Vec` owned by [`ParseTree`] and is addressed by
//! a [`NodeId`]. Rule nodes hold the ordered ids of their children, terminal
//! nodes hold the token they matched. Rewrites allocate a new node and swap it
//! into the parent's child slot; the old node simply becomes unreachable.

use std::fmt::Write as _;

use crate::lexer::Token;

macro_rules! rules {
    ($($variant:ident => $name:literal,)*) => {
        /// Grammar productions.
        ///
        /// Some variants only appear as rule frames on the parser's stack
        /// (for example [`Rule::BooleanExpression`]); the others label nodes.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Rule {
            $(
                #[doc = concat!("`", $name, "`")]
                $variant,
            )*
        }

        impl Rule {
            /// Returns the production name as written in the grammar.
            #[must_use]
            pub const fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }
        }
    };
}

rules! {
    SingleStatement => "singleStatement",
    StandaloneExpression => "standaloneExpression",
    StandalonePathSpecification => "standalonePathSpecification",
    Statement => "statement",
    StatementDefault => "statementDefault",
    Use => "use",
    SetSession => "setSession",
    ResetSession => "resetSession",
    ShowTables => "showTables",
    ShowSchemas => "showSchemas",
    ShowCatalogs => "showCatalogs",
    ShowColumns => "showColumns",
    Explain => "explain",
    CreateTableAsSelect => "createTableAsSelect",
    DropTable => "dropTable",
    InsertInto => "insertInto",
    Delete => "delete",
    Query => "query",
    With => "with",
    NamedQuery => "namedQuery",
    QueryNoWith => "queryNoWith",
    QueryTerm => "queryTerm",
    QueryPrimary => "queryPrimary",
    SetOperation => "setOperation",
    QuerySpecification => "querySpecification",
    Table => "table",
    InlineTable => "inlineTable",
    Subquery => "subquery",
    SelectItem => "selectItem",
    SelectSingle => "selectSingle",
    SelectAll => "selectAll",
    FromClause => "fromClause",
    WhereClause => "whereClause",
    GroupBy => "groupBy",
    HavingClause => "havingClause",
    OrderBy => "orderBy",
    SortItem => "sortItem",
    LimitClause => "limitClause",
    SortBy => "sortBy",
    DistributeBy => "distributeBy",
    ClusterBy => "clusterBy",
    Relation => "relation",
    JoinRelation => "joinRelation",
    JoinCriteria => "joinCriteria",
    AliasedRelation => "aliasedRelation",
    ColumnAliases => "columnAliases",
    RelationPrimary => "relationPrimary",
    TableName => "tableName",
    SubqueryRelation => "subqueryRelation",
    ParenthesizedRelation => "parenthesizedRelation",
    Unnest => "unnest",
    Lateral => "lateral",
    LateralView => "lateralView",
    LateralViewRelation => "lateralViewRelation",
    Expression => "expression",
    BooleanExpression => "booleanExpression",
    LogicalBinary => "logicalBinary",
    LogicalNot => "logicalNot",
    Predicated => "predicated",
    Comparison => "comparison",
    QuantifiedComparison => "quantifiedComparison",
    Between => "between",
    InList => "inList",
    InSubquery => "inSubquery",
    Like => "like",
    RegexpLike => "regexpLike",
    NullPredicate => "nullPredicate",
    DistinctFrom => "distinctFrom",
    ValueExpression => "valueExpression",
    ArithmeticBinary => "arithmeticBinary",
    ArithmeticUnary => "arithmeticUnary",
    Concatenation => "concatenation",
    PrimaryExpression => "primaryExpression",
    NullLiteral => "nullLiteral",
    BooleanLiteral => "booleanLiteral",
    NumericLiteral => "numericLiteral",
    BinaryLiteral => "binaryLiteral",
    IntervalLiteral => "intervalLiteral",
    TypeConstructor => "typeConstructor",
    Parameter => "parameter",
    RowConstructor => "rowConstructor",
    ParenthesizedExpression => "parenthesizedExpression",
    FunctionCall => "functionCall",
    Filter => "filter",
    Over => "over",
    WindowFrame => "windowFrame",
    FrameBound => "frameBound",
    Lambda => "lambda",
    SubqueryExpression => "subqueryExpression",
    Exists => "exists",
    SimpleCase => "simpleCase",
    SearchedCase => "searchedCase",
    WhenClause => "whenClause",
    Cast => "cast",
    ArrayConstructor => "arrayConstructor",
    Subscript => "subscript",
    ColumnReference => "columnReference",
    Dereference => "dereference",
    SpecialDateTimeFunction => "specialDateTimeFunction",
    String => "string",
    BasicStringLiteral => "basicStringLiteral",
    Type => "type",
    ArrayType => "arrayType",
    MapType => "mapType",
    RowType => "rowType",
    GenericType => "genericType",
    QualifiedName => "qualifiedName",
    Identifier => "identifier",
    UnquotedIdentifier => "unquotedIdentifier",
    QuotedIdentifier => "quotedIdentifier",
    BackQuotedIdentifier => "backQuotedIdentifier",
    DigitIdentifier => "digitIdentifier",
    NonReserved => "nonReserved",
    PathSpecification => "pathSpecification",
    PathElement => "pathElement",
    QualifiedArgument => "qualifiedArgument",
    UnqualifiedArgument => "unqualifiedArgument",
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Index of a node inside a [`ParseTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Creates a node id from a raw arena index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// An interior node produced by a grammar rule.
    Rule(Rule),
    /// A leaf holding a matched token.
    Terminal(Token),
}

/// A parse tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Rule or terminal.
    pub kind: NodeKind,
    /// Ordered children; always empty for terminals.
    pub children: Vec<NodeId>,
    /// Height of the subtree rooted here; terminals have height 1.
    pub height: usize,
}

/// A concrete parse tree stored in an arena.
#[derive(Debug, Clone, Default)]
pub struct ParseTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl ParseTree {
    /// Creates an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Number of allocated nodes, reachable or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no node has been allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drops every node allocated at or after `len`.
    pub fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Allocates a terminal node.
    pub fn push_terminal(&mut self, token: Token) -> NodeId {
        self.push(Node {
            kind: NodeKind::Terminal(token),
            children: Vec::new(),
            height: 1,
        })
    }

    /// Allocates a rule node over already allocated children.
    pub fn push_rule(&mut self, rule: Rule, children: Vec<NodeId>) -> NodeId {
        let height = 1 + children
            .iter()
            .map(|child| self.height(*child))
            .max()
            .unwrap_or(0);
        self.push(Node {
            kind: NodeKind::Rule(rule),
            children,
            height,
        })
    }

    /// Marks `id` as the root.
    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    /// Returns the root, if parsing completed.
    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns the node for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not allocated by this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Returns the rule of a rule node.
    #[must_use]
    pub fn rule(&self, id: NodeId) -> Option<Rule> {
        match self.node(id).kind {
            NodeKind::Rule(rule) => Some(rule),
            NodeKind::Terminal(_) => None,
        }
    }

    /// Returns the token of a terminal node.
    #[must_use]
    pub fn token(&self, id: NodeId) -> Option<&Token> {
        match &self.node(id).kind {
            NodeKind::Terminal(token) => Some(token),
            NodeKind::Rule(_) => None,
        }
    }

    /// Returns the height of the subtree at `id`.
    #[must_use]
    pub fn height(&self, id: NodeId) -> usize {
        self.node(id).height
    }

    /// Returns the children of `id`.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Swaps the child at `slot` of `parent` for `replacement`, returning the old child.
    pub fn replace_child(&mut self, parent: NodeId, slot: usize, replacement: NodeId) -> NodeId {
        std::mem::replace(&mut self.nodes[parent.index()].children[slot], replacement)
    }

    /// Returns the first token covered by `id`.
    #[must_use]
    pub fn first_token(&self, id: NodeId) -> Option<&Token> {
        let mut current = id;
        loop {
            match &self.node(current).kind {
                NodeKind::Terminal(token) => return Some(token),
                NodeKind::Rule(_) => current = *self.children(current).first()?,
            }
        }
    }

    /// Renders the subtree at `id` as an s-expression, e.g. `(identifier a)`.
    #[must_use]
    pub fn render(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.render_into(id, &mut out);
        out
    }

    fn render_into(&self, id: NodeId, out: &mut String) {
        match &self.node(id).kind {
            NodeKind::Terminal(token) => out.push_str(token.error_text()),
            NodeKind::Rule(rule) => {
                let _ = write!(out, "({rule}");
                for child in self.children(id) {
                    out.push(' ');
                    self.render_into(*child, out);
                }
                out.push(')');
            }
        }
    }

    /// Compares the subtree at `id` with the subtree at `other_id` of `other`.
    ///
    /// Arena positions are ignored; rule labels, token kinds, text and
    /// locations are compared.
    #[must_use]
    pub fn same_subtree(&self, id: NodeId, other: &Self, other_id: NodeId) -> bool {
        let left = self.node(id);
        let right = other.node(other_id);
        left.kind == right.kind
            && left.children.len() == right.children.len()
            && left
                .children
                .iter()
                .zip(&right.children)
                .all(|(a, b)| self.same_subtree(*a, other, *b))
    }
}

impl PartialEq for ParseTree {
    fn eq(&self, other: &Self) -> bool {
        match (self.root, other.root) {
            (Some(a), Some(b)) => self.same_subtree(a, other, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for ParseTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.root {
            Some(root) => f.write_str(&self.render(root)),
            None => f.write_str("()"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{Location, Span, TokenKind};

    fn token(kind: TokenKind, text: &str) -> Token {
        Token::new(kind, text, Span::new(0, text.len()), Location::default())
    }

    #[test]
    fn test_build_and_render() {
        let mut tree = ParseTree::new();
        let a = tree.push_terminal(token(TokenKind::Identifier, "a"));
        let ident = tree.push_rule(Rule::UnquotedIdentifier, vec![a]);
        tree.set_root(ident);

        assert_eq!(tree.rule(ident), Some(Rule::UnquotedIdentifier));
        assert_eq!(tree.token(a).map(|t| t.text.as_str()), Some("a"));
        assert_eq!(tree.to_string(), "(unquotedIdentifier a)");
        assert_eq!(tree.first_token(ident).map(|t| t.kind), Some(TokenKind::Identifier));
    }

    #[test]
    fn test_height_follows_deepest_child() {
        let mut tree = ParseTree::new();
        let a = tree.push_terminal(token(TokenKind::Identifier, "a"));
        let b = tree.push_terminal(token(TokenKind::Identifier, "b"));
        let column = tree.push_rule(Rule::ColumnReference, vec![a]);
        let sum = tree.push_rule(Rule::ArithmeticBinary, vec![column, b]);
        let empty = tree.push_rule(Rule::RowConstructor, Vec::new());

        assert_eq!(tree.height(a), 1);
        assert_eq!(tree.height(column), 2);
        assert_eq!(tree.height(sum), 3);
        assert_eq!(tree.height(empty), 1);
    }

    #[test]
    fn test_replace_child() {
        let mut tree = ParseTree::new();
        let old = tree.push_terminal(token(TokenKind::Identifier, "old"));
        let parent = tree.push_rule(Rule::UnquotedIdentifier, vec![old]);
        let new = tree.push_terminal(token(TokenKind::Identifier, "new"));

        assert_eq!(tree.replace_child(parent, 0, new), old);
        assert_eq!(tree.children(parent), &[new]);
        assert_eq!(tree.render(parent), "(unquotedIdentifier new)");
    }

    #[test]
    fn test_structural_equality_ignores_arena_layout() {
        let mut left = ParseTree::new();
        let a = left.push_terminal(token(TokenKind::Identifier, "a"));
        let root = left.push_rule(Rule::ColumnReference, vec![a]);
        left.set_root(root);

        let mut right = ParseTree::new();
        right.push_terminal(token(TokenKind::Identifier, "garbage"));
        let a = right.push_terminal(token(TokenKind::Identifier, "a"));
        let root = right.push_rule(Rule::ColumnReference, vec![a]);
        right.set_root(root);

        assert_eq!(left, right);
    }

    #[test]
    fn test_truncate() {
        let mut tree = ParseTree::new();
        tree.push_terminal(token(TokenKind::Identifier, "a"));
        let mark = tree.len();
        tree.push_terminal(token(TokenKind::Identifier, "b"));
        tree.truncate(mark);
        assert_eq!(tree.len(), 1);
    }
}
