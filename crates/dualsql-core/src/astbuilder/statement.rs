//! Statements, queries and relations.

use super::AstBuilder;
use crate::ast::{
    Expr, GroupBy, Identifier, JoinCriteria, JoinType, Limit, NullOrdering, OrderDirection,
    QualifiedName, Query, QueryBody, QuerySpecification, Relation, SelectItem, SetOperator,
    SortItem, Statement, With, WithQuery,
};
use crate::error::{ParseError, Result};
use crate::lexer::{Keyword, TokenKind};
use crate::tree::{NodeId, Rule};

/// Table-generating functions Hive only accepts through `LATERAL VIEW`.
const HIVE_UDTFS: [&str; 6] = [
    "explode",
    "posexplode",
    "inline",
    "stack",
    "json_tuple",
    "parse_url_tuple",
];

impl AstBuilder<'_> {
    pub(super) fn statement(&mut self, id: NodeId) -> Result<Statement> {
        match self.rule(id) {
            Some(Rule::StatementDefault) => {
                let query = self.first_rule(id)?;
                Ok(Statement::Query(Box::new(self.query(query)?)))
            }
            Some(Rule::Use) => {
                let mut parts = self.identifiers(id)?;
                let schema = parts.pop().ok_or_else(|| self.malformed(id))?;
                Ok(Statement::Use {
                    catalog: parts.pop(),
                    schema,
                })
            }
            Some(Rule::SetSession) => Ok(Statement::SetSession {
                name: self.qualified_name(self.required_child(id, Rule::QualifiedName)?)?,
                value: self.expr(self.nth_rule(id, 1)?)?,
            }),
            Some(Rule::ResetSession) => Ok(Statement::ResetSession {
                name: self.qualified_name(self.required_child(id, Rule::QualifiedName)?)?,
            }),
            Some(Rule::ShowTables) => Ok(Statement::ShowTables {
                schema: self.optional_name(id)?,
                like_pattern: self.like_pattern(id)?,
            }),
            Some(Rule::ShowSchemas) => Ok(Statement::ShowSchemas {
                catalog: self.identifiers(id)?.into_iter().next(),
                like_pattern: self.like_pattern(id)?,
            }),
            Some(Rule::ShowCatalogs) => Ok(Statement::ShowCatalogs {
                like_pattern: self.like_pattern(id)?,
            }),
            Some(Rule::ShowColumns) => Ok(Statement::ShowColumns {
                table: self.qualified_name(self.required_child(id, Rule::QualifiedName)?)?,
            }),
            Some(Rule::Explain) => Ok(Statement::Explain {
                analyze: self.has_keyword(id, Keyword::Analyze),
                statement: Box::new(self.statement(self.first_rule(id)?)?),
            }),
            Some(Rule::CreateTableAsSelect) => Ok(Statement::CreateTableAsSelect {
                name: self.qualified_name(self.required_child(id, Rule::QualifiedName)?)?,
                not_exists: self.has_keyword(id, Keyword::Not),
                column_aliases: self.column_aliases(id)?,
                query: Box::new(self.query(self.required_child(id, Rule::Query)?)?),
            }),
            Some(Rule::DropTable) => Ok(Statement::DropTable {
                name: self.qualified_name(self.required_child(id, Rule::QualifiedName)?)?,
                exists: self.has_keyword(id, Keyword::Exists),
            }),
            Some(Rule::InsertInto) => Ok(Statement::Insert {
                target: self.qualified_name(self.required_child(id, Rule::QualifiedName)?)?,
                columns: self.column_aliases(id)?,
                query: Box::new(self.query(self.required_child(id, Rule::Query)?)?),
                overwrite: self.has_keyword(id, Keyword::Overwrite),
            }),
            Some(Rule::Delete) => Ok(Statement::Delete {
                table: self.qualified_name(self.required_child(id, Rule::QualifiedName)?)?,
                where_clause: self.optional_clause(id, Rule::WhereClause)?,
            }),
            _ => Err(self.malformed(id)),
        }
    }

    fn like_pattern(&self, id: NodeId) -> Result<Option<String>> {
        self.child(id, Rule::BasicStringLiteral)
            .map(|string| self.string_value(string))
            .transpose()
    }

    fn optional_name(&self, id: NodeId) -> Result<Option<QualifiedName>> {
        self.child(id, Rule::QualifiedName)
            .map(|name| self.qualified_name(name))
            .transpose()
    }

    /// Identifiers of the `columnAliases` child of `id`, if any.
    fn column_aliases(&self, id: NodeId) -> Result<Vec<Identifier>> {
        self.child(id, Rule::ColumnAliases)
            .map_or_else(|| Ok(Vec::new()), |aliases| self.identifiers(aliases))
    }

    /// Builds the single expression of an optional clause such as `WHERE`.
    fn optional_clause(&mut self, id: NodeId, clause: Rule) -> Result<Option<Expr>> {
        match self.child(id, clause) {
            Some(clause) => {
                let expr = self.first_rule(clause)?;
                Ok(Some(self.expr(expr)?))
            }
            None => Ok(None),
        }
    }

    // Queries

    pub(super) fn query(&mut self, id: NodeId) -> Result<Query> {
        let with = match self.child(id, Rule::With) {
            Some(with) => Some(self.with(with)?),
            None => None,
        };
        let mut query = self.query_no_with(self.required_child(id, Rule::QueryNoWith)?)?;
        query.with = with;
        Ok(query)
    }

    fn with(&mut self, id: NodeId) -> Result<With> {
        let queries = self
            .rules(id)
            .into_iter()
            .map(|named| {
                let name = self.identifier(self.first_rule(named)?)?;
                Ok(WithQuery {
                    name,
                    column_names: self.column_aliases(named)?,
                    query: Box::new(self.query(self.required_child(named, Rule::Query)?)?),
                })
            })
            .collect::<Result<_>>()?;
        Ok(With {
            recursive: self.has_keyword(id, Keyword::Recursive),
            queries,
        })
    }

    fn query_no_with(&mut self, id: NodeId) -> Result<Query> {
        let mut rules = self.rules(id).into_iter();
        let term = rules.next().ok_or_else(|| self.malformed(id))?;
        let body = self.query_body(term)?;

        let mut query = Query::simple(body);
        for clause in rules {
            match self.rule(clause) {
                Some(Rule::OrderBy) => query.order_by = self.sort_items(clause)?,
                Some(Rule::LimitClause) => query.limit = Some(self.limit(clause)?),
                Some(Rule::SortBy) => return Err(self.semantic(clause, "Don't support sort by")),
                Some(Rule::DistributeBy) => {
                    return Err(self.semantic(clause, "Don't support distribute by"));
                }
                Some(Rule::ClusterBy) => {
                    return Err(self.semantic(clause, "Don't support cluster by"));
                }
                _ => return Err(self.malformed(clause)),
            }
        }
        Ok(query)
    }

    pub(super) fn sort_items(&mut self, id: NodeId) -> Result<Vec<SortItem>> {
        self.rules(id)
            .into_iter()
            .map(|item| self.sort_item(item))
            .collect()
    }

    fn sort_item(&mut self, id: NodeId) -> Result<SortItem> {
        let direction = if self.has_keyword(id, Keyword::Desc) {
            OrderDirection::Desc
        } else {
            OrderDirection::Asc
        };
        let nulls = if self.has_keyword(id, Keyword::First) {
            Some(NullOrdering::First)
        } else if self.has_keyword(id, Keyword::Last) {
            Some(NullOrdering::Last)
        } else {
            None
        };
        Ok(SortItem {
            expr: self.expr(self.first_rule(id)?)?,
            direction,
            nulls,
        })
    }

    fn limit(&self, id: NodeId) -> Result<Limit> {
        let Some(count) = self.tokens(id).find(|token| token.kind == TokenKind::Integer) else {
            return Ok(Limit::All);
        };
        count.text.parse().map(Limit::Count).map_err(|err| {
            ParseError::semantic(
                format!("Invalid numeric literal: {}", count.text),
                count.location,
            )
            .with_cause(err)
            .into()
        })
    }

    fn query_body(&mut self, id: NodeId) -> Result<QueryBody> {
        match self.rule(id) {
            Some(Rule::QuerySpecification) => Ok(QueryBody::Specification(Box::new(
                self.query_specification(id)?,
            ))),
            Some(Rule::SetOperation) => {
                let op = if self.has_keyword(id, Keyword::Union) {
                    SetOperator::Union
                } else if self.has_keyword(id, Keyword::Intersect) {
                    SetOperator::Intersect
                } else {
                    SetOperator::Except
                };
                Ok(QueryBody::SetOperation {
                    op,
                    distinct: !self.has_keyword(id, Keyword::All),
                    left: Box::new(self.query_body(self.nth_rule(id, 0)?)?),
                    right: Box::new(self.query_body(self.nth_rule(id, 1)?)?),
                })
            }
            Some(Rule::Table) => Ok(QueryBody::Table(
                self.qualified_name(self.required_child(id, Rule::QualifiedName)?)?,
            )),
            Some(Rule::InlineTable) => Ok(QueryBody::Values(self.exprs(&self.rules(id))?)),
            Some(Rule::Subquery) => {
                let inner = self.required_child(id, Rule::QueryNoWith)?;
                Ok(QueryBody::Query(Box::new(self.query_no_with(inner)?)))
            }
            _ => Err(self.malformed(id)),
        }
    }

    fn query_specification(&mut self, id: NodeId) -> Result<QuerySpecification> {
        let mut spec = QuerySpecification {
            distinct: self.has_keyword(id, Keyword::Distinct),
            select: Vec::new(),
            from: None,
            where_clause: None,
            group_by: None,
            having: None,
        };
        for clause in self.rules(id) {
            match self.rule(clause) {
                Some(Rule::SelectAll | Rule::SelectSingle) => {
                    spec.select.push(self.select_item(clause)?);
                }
                Some(Rule::FromClause) => spec.from = Some(self.from_clause(clause)?),
                Some(Rule::WhereClause) => {
                    spec.where_clause = Some(self.expr(self.first_rule(clause)?)?);
                }
                Some(Rule::GroupBy) => {
                    spec.group_by = Some(GroupBy {
                        distinct: self.has_keyword(clause, Keyword::Distinct),
                        expressions: self.exprs(&self.rules(clause))?,
                    });
                }
                Some(Rule::HavingClause) => {
                    spec.having = Some(self.expr(self.first_rule(clause)?)?);
                }
                _ => return Err(self.malformed(clause)),
            }
        }
        Ok(spec)
    }

    fn select_item(&mut self, id: NodeId) -> Result<SelectItem> {
        if self.rule(id) == Some(Rule::SelectAll) {
            return Ok(SelectItem::All {
                prefix: self.optional_name(id)?,
            });
        }
        let expr_node = self.first_rule(id)?;
        if !self.dialect.supports_direct_udtf_calls() {
            self.check_udtf_call(expr_node)?;
        }
        Ok(SelectItem::Single {
            expr: self.expr(expr_node)?,
            alias: self.identifiers(id)?.into_iter().next(),
        })
    }

    fn check_udtf_call(&self, id: NodeId) -> Result<()> {
        if self.rule(id) != Some(Rule::FunctionCall) {
            return Ok(());
        }
        let name = self.qualified_name(self.required_child(id, Rule::QualifiedName)?)?;
        let is_udtf = name.parts.len() == 1
            && name.suffix().is_some_and(|part| {
                HIVE_UDTFS
                    .iter()
                    .any(|udtf| part.value.eq_ignore_ascii_case(udtf))
            });
        if is_udtf {
            return Err(self.semantic(
                id,
                "Don't Support call UDTF directly, please try lateral view syntax instead.",
            ));
        }
        Ok(())
    }

    /// `FROM a, b, c` becomes a left-deep chain of implicit joins.
    fn from_clause(&mut self, id: NodeId) -> Result<Relation> {
        let mut relations = self.rules(id).into_iter();
        let first = relations.next().ok_or_else(|| self.malformed(id))?;
        let mut from = self.relation(first)?;
        for next in relations {
            from = Relation::Join {
                join_type: JoinType::Implicit,
                left: Box::new(from),
                right: Box::new(self.relation(next)?),
                criteria: None,
            };
        }
        Ok(from)
    }

    // Relations

    fn relation(&mut self, id: NodeId) -> Result<Relation> {
        match self.rule(id) {
            Some(Rule::JoinRelation) => self.join(id),
            Some(Rule::LateralViewRelation) => self.lateral_view(id),
            Some(Rule::AliasedRelation) => {
                let primary = self.first_rule(id)?;
                let relation = if self.rule(primary) == Some(Rule::SubqueryRelation) {
                    self.subquery_relation(primary)?
                } else {
                    self.relation(primary)?
                };
                let mut identifiers = self.identifiers(id)?.into_iter();
                Ok(Relation::Aliased {
                    relation: Box::new(relation),
                    alias: identifiers.next().ok_or_else(|| self.malformed(id))?,
                    column_names: self.column_aliases(id)?,
                })
            }
            Some(Rule::SubqueryRelation) => {
                if self.dialect.requires_subquery_alias() {
                    return Err(self.semantic(id, "Missing table alias"));
                }
                self.subquery_relation(id)
            }
            Some(Rule::TableName) => Ok(Relation::Table(
                self.qualified_name(self.required_child(id, Rule::QualifiedName)?)?,
            )),
            Some(Rule::ParenthesizedRelation) => self.relation(self.first_rule(id)?),
            Some(Rule::Unnest) => {
                if !self.dialect.supports_unnest() {
                    return Err(self.semantic(id, "Don't support unnest"));
                }
                Ok(Relation::Unnest {
                    expressions: self.exprs(&self.rules(id))?,
                    with_ordinality: self.has_keyword(id, Keyword::Ordinality),
                })
            }
            Some(Rule::Lateral) => {
                let query = self.required_child(id, Rule::Query)?;
                Ok(Relation::Lateral(Box::new(self.query(query)?)))
            }
            _ => Err(self.malformed(id)),
        }
    }

    fn subquery_relation(&mut self, id: NodeId) -> Result<Relation> {
        let query = self.required_child(id, Rule::Query)?;
        Ok(Relation::Subquery(Box::new(self.query(query)?)))
    }

    fn join(&mut self, id: NodeId) -> Result<Relation> {
        let join_type = if self.has_keyword(id, Keyword::Cross) {
            JoinType::Cross
        } else if self.has_keyword(id, Keyword::Left) {
            JoinType::Left
        } else if self.has_keyword(id, Keyword::Right) {
            JoinType::Right
        } else if self.has_keyword(id, Keyword::Full) {
            JoinType::Full
        } else {
            JoinType::Inner
        };

        let criteria = if self.has_keyword(id, Keyword::Natural) {
            Some(JoinCriteria::Natural)
        } else if let Some(criteria) = self.child(id, Rule::JoinCriteria) {
            Some(self.join_criteria(criteria)?)
        } else if join_type == JoinType::Cross {
            None
        } else {
            return Err(self.semantic(id, "Missing join criteria"));
        };

        let left = self.nth_rule(id, 0)?;
        let right = self.nth_rule(id, 1)?;
        Ok(Relation::Join {
            join_type,
            left: Box::new(self.relation(left)?),
            right: Box::new(self.relation(right)?),
            criteria,
        })
    }

    fn join_criteria(&mut self, id: NodeId) -> Result<JoinCriteria> {
        if self.has_keyword(id, Keyword::Using) {
            return Ok(JoinCriteria::Using(self.identifiers(id)?));
        }
        Ok(JoinCriteria::On(self.expr(self.first_rule(id)?)?))
    }

    /// Rewrites `rel LATERAL VIEW [OUTER] explode(e) t AS c` into
    /// `rel CROSS JOIN UNNEST(e) AS t (c)`.
    ///
    /// `OUTER` keeps rows with empty arrays, which maps to `LEFT JOIN ... ON TRUE`.
    /// `posexplode` maps to `UNNEST ... WITH ORDINALITY`, whose ordinality column
    /// comes last, so the leading position alias is moved to the end.
    fn lateral_view(&mut self, id: NodeId) -> Result<Relation> {
        let left = self.relation(self.nth_rule(id, 0)?)?;
        let view = self.required_child(id, Rule::LateralView)?;

        let function = self.qualified_name(self.required_child(view, Rule::QualifiedName)?)?;
        let name = function
            .suffix()
            .map(|part| part.value.to_ascii_lowercase())
            .unwrap_or_default();
        let with_ordinality = match name.as_str() {
            "explode" if function.parts.len() == 1 => false,
            "posexplode" if function.parts.len() == 1 => true,
            _ => {
                return Err(self.semantic(
                    view,
                    format!("Don't support lateral view function {function}"),
                ));
            }
        };

        let arguments: Vec<NodeId> = self
            .rules(view)
            .into_iter()
            .skip(1)
            .filter(|child| !self.rule(*child).is_some_and(super::is_identifier_rule))
            .collect();
        let expressions = self.exprs(&arguments)?;

        let mut names = self.identifiers(view)?.into_iter();
        let alias = names.next().ok_or_else(|| self.malformed(view))?;
        let mut column_names: Vec<Identifier> = names.collect();
        if with_ordinality && !column_names.is_empty() {
            column_names.rotate_left(1);
        }

        let outer = self.has_keyword(view, Keyword::Outer);
        Ok(Relation::Join {
            join_type: if outer { JoinType::Left } else { JoinType::Cross },
            left: Box::new(left),
            right: Box::new(Relation::Aliased {
                relation: Box::new(Relation::Unnest {
                    expressions,
                    with_ordinality,
                }),
                alias,
                column_names,
            }),
            criteria: outer.then_some(JoinCriteria::On(Expr::boolean(true))),
        })
    }
}
