//! Entry points and statement productions.

use super::engine::{PResult, Parser};
use crate::lexer::{Keyword, TokenKind};
use crate::tree::{NodeId, Rule};

const STATEMENT_KEYWORDS: [Keyword; 11] = [
    Keyword::Use,
    Keyword::Set,
    Keyword::Reset,
    Keyword::Show,
    Keyword::Describe,
    Keyword::Desc,
    Keyword::Explain,
    Keyword::Create,
    Keyword::Drop,
    Keyword::Insert,
    Keyword::Delete,
];

const QUERY_START: [TokenKind; 5] = [
    TokenKind::Keyword(Keyword::Select),
    TokenKind::Keyword(Keyword::With),
    TokenKind::Keyword(Keyword::Values),
    TokenKind::Keyword(Keyword::Table),
    TokenKind::LeftParen,
];

impl Parser<'_> {
    /// `singleStatement: statement EOF`
    pub(crate) fn single_statement(&mut self) -> PResult<NodeId> {
        self.within(Rule::SingleStatement, |p| {
            let mut children = vec![p.statement()?];
            p.expect(TokenKind::Eof, &mut children)?;
            p.node(Rule::SingleStatement, children)
        })
    }

    /// `standaloneExpression: expression EOF`
    pub(crate) fn standalone_expression(&mut self) -> PResult<NodeId> {
        self.within(Rule::StandaloneExpression, |p| {
            let mut children = vec![p.expression()?];
            p.expect(TokenKind::Eof, &mut children)?;
            p.node(Rule::StandaloneExpression, children)
        })
    }

    /// `standalonePathSpecification: pathSpecification EOF`
    pub(crate) fn standalone_path_specification(&mut self) -> PResult<NodeId> {
        self.within(Rule::StandalonePathSpecification, |p| {
            let mut children = vec![p.path_specification()?];
            p.expect(TokenKind::Eof, &mut children)?;
            p.node(Rule::StandalonePathSpecification, children)
        })
    }

    fn statement(&mut self) -> PResult<NodeId> {
        self.within(Rule::Statement, |p| {
            let mut children = Vec::new();
            let rule = match p.la(1) {
                kind if QUERY_START.contains(&kind) => {
                    children.push(p.query()?);
                    Rule::StatementDefault
                }
                TokenKind::Keyword(Keyword::Use) => p.use_statement(&mut children)?,
                TokenKind::Keyword(Keyword::Set) => p.set_session(&mut children)?,
                TokenKind::Keyword(Keyword::Reset) => p.reset_session(&mut children)?,
                TokenKind::Keyword(Keyword::Show) => p.show(&mut children)?,
                TokenKind::Keyword(Keyword::Describe | Keyword::Desc) => {
                    p.bump(&mut children);
                    children.push(p.qualified_name()?);
                    Rule::ShowColumns
                }
                TokenKind::Keyword(Keyword::Explain) => {
                    p.bump(&mut children);
                    p.eat_keyword(Keyword::Analyze, &mut children);
                    children.push(p.statement()?);
                    Rule::Explain
                }
                TokenKind::Keyword(Keyword::Create) => p.create_table_as_select(&mut children)?,
                TokenKind::Keyword(Keyword::Drop) => p.drop_table(&mut children)?,
                TokenKind::Keyword(Keyword::Insert) => p.insert_into(&mut children)?,
                TokenKind::Keyword(Keyword::Delete) => p.delete(&mut children)?,
                _ => {
                    for kind in QUERY_START {
                        p.expected_via(kind, &[Rule::Query]);
                    }
                    for keyword in STATEMENT_KEYWORDS {
                        p.expected(TokenKind::Keyword(keyword));
                    }
                    return Err(p.mismatch());
                }
            };
            p.node(rule, children)
        })
    }

    /// `USE schema | USE catalog.schema`
    fn use_statement(&mut self, children: &mut Vec<NodeId>) -> PResult<Rule> {
        self.expect_keyword(Keyword::Use, children)?;
        children.push(self.identifier()?);
        if self.eat(TokenKind::Dot, children) {
            children.push(self.identifier()?);
        }
        Ok(Rule::Use)
    }

    /// `SET SESSION qualifiedName = expression`
    fn set_session(&mut self, children: &mut Vec<NodeId>) -> PResult<Rule> {
        self.expect_keyword(Keyword::Set, children)?;
        self.expect_keyword(Keyword::Session, children)?;
        children.push(self.qualified_name()?);
        self.expect(TokenKind::Eq, children)?;
        children.push(self.expression()?);
        Ok(Rule::SetSession)
    }

    /// `RESET SESSION qualifiedName`
    fn reset_session(&mut self, children: &mut Vec<NodeId>) -> PResult<Rule> {
        self.expect_keyword(Keyword::Reset, children)?;
        self.expect_keyword(Keyword::Session, children)?;
        children.push(self.qualified_name()?);
        Ok(Rule::ResetSession)
    }

    fn show(&mut self, children: &mut Vec<NodeId>) -> PResult<Rule> {
        self.expect_keyword(Keyword::Show, children)?;
        if self.eat_keyword(Keyword::Tables, children) {
            if self.eat_keyword(Keyword::From, children) || self.eat_keyword(Keyword::In, children) {
                children.push(self.qualified_name()?);
            }
            self.like_pattern(children)?;
            Ok(Rule::ShowTables)
        } else if self.eat_keyword(Keyword::Schemas, children) {
            if self.eat_keyword(Keyword::From, children) || self.eat_keyword(Keyword::In, children) {
                children.push(self.identifier()?);
            }
            self.like_pattern(children)?;
            Ok(Rule::ShowSchemas)
        } else if self.eat_keyword(Keyword::Catalogs, children) {
            self.like_pattern(children)?;
            Ok(Rule::ShowCatalogs)
        } else if self.eat_keyword(Keyword::Columns, children) {
            self.expect_one_of(&[Keyword::From, Keyword::In], children)?;
            children.push(self.qualified_name()?);
            Ok(Rule::ShowColumns)
        } else {
            Err(self.mismatch())
        }
    }

    fn like_pattern(&mut self, children: &mut Vec<NodeId>) -> PResult<()> {
        if self.eat_keyword(Keyword::Like, children) {
            children.push(self.string()?);
        }
        Ok(())
    }

    /// `CREATE TABLE [IF NOT EXISTS] qualifiedName [columnAliases] AS query`
    fn create_table_as_select(&mut self, children: &mut Vec<NodeId>) -> PResult<Rule> {
        self.expect_keyword(Keyword::Create, children)?;
        self.expect_keyword(Keyword::Table, children)?;
        if self.eat_keyword(Keyword::If, children) {
            self.expect_keyword(Keyword::Not, children)?;
            self.expect_keyword(Keyword::Exists, children)?;
        }
        children.push(self.qualified_name()?);
        if self.check(TokenKind::LeftParen) {
            children.push(self.column_aliases()?);
        }
        self.expect_keyword(Keyword::As, children)?;
        children.push(self.query()?);
        Ok(Rule::CreateTableAsSelect)
    }

    /// `DROP TABLE [IF EXISTS] qualifiedName`
    fn drop_table(&mut self, children: &mut Vec<NodeId>) -> PResult<Rule> {
        self.expect_keyword(Keyword::Drop, children)?;
        self.expect_keyword(Keyword::Table, children)?;
        if self.eat_keyword(Keyword::If, children) {
            self.expect_keyword(Keyword::Exists, children)?;
        }
        children.push(self.qualified_name()?);
        Ok(Rule::DropTable)
    }

    /// `INSERT INTO qualifiedName [columnAliases] query`
    ///
    /// Hive also accepts `INSERT INTO TABLE` and `INSERT OVERWRITE TABLE`.
    fn insert_into(&mut self, children: &mut Vec<NodeId>) -> PResult<Rule> {
        self.expect_keyword(Keyword::Insert, children)?;
        let hive = self.dialect().supports_insert_overwrite();
        if hive && self.eat_keyword(Keyword::Overwrite, children) {
            self.expect_keyword(Keyword::Table, children)?;
        } else {
            self.expect_keyword(Keyword::Into, children)?;
            if hive {
                self.eat_keyword(Keyword::Table, children);
            }
        }
        children.push(self.qualified_name()?);
        if self.at(TokenKind::LeftParen) && Self::is_identifier_start(self.la(2)) {
            children.push(self.column_aliases()?);
        }
        children.push(self.query()?);
        Ok(Rule::InsertInto)
    }

    /// `DELETE FROM qualifiedName [WHERE booleanExpression]`
    fn delete(&mut self, children: &mut Vec<NodeId>) -> PResult<Rule> {
        self.expect_keyword(Keyword::Delete, children)?;
        self.expect_keyword(Keyword::From, children)?;
        children.push(self.qualified_name()?);
        if self.check_keyword(Keyword::Where) {
            children.push(self.where_clause()?);
        }
        Ok(Rule::Delete)
    }
}
