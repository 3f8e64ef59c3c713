#![allow(dead_code)]

use dualsql_core::ast::{Query, QueryBody, QuerySpecification};
use dualsql_core::{
    Error, Expr, ParseError, ParsingOptions, SqlParser, SqlParserOptions, Statement,
};

pub fn enhanced_parser() -> SqlParser {
    SqlParser::with_options(SqlParserOptions::new().use_enhanced_error_handler(true))
        .expect("valid options")
}

pub fn parse_with(parser: &SqlParser, sql: &str, options: &ParsingOptions) -> Statement {
    parser
        .create_statement(sql, options)
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse(sql: &str) -> Statement {
    parse_with(&SqlParser::new(), sql, &ParsingOptions::standard())
}

pub fn parse_hive(sql: &str) -> Statement {
    parse_with(&SqlParser::new(), sql, &ParsingOptions::hive())
}

pub fn parse_expr(sql: &str) -> Expr {
    SqlParser::new()
        .create_expression(sql, &ParsingOptions::standard())
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse_err_with(parser: &SqlParser, sql: &str, options: &ParsingOptions) -> ParseError {
    match parser.create_statement(sql, options) {
        Ok(statement) => panic!("Expected parse error for: {sql}\nGot: {statement:?}"),
        Err(Error::Parse(err)) => err,
        Err(other) => panic!("Expected a parse error for: {sql}\nGot: {other:?}"),
    }
}

pub fn parse_err(sql: &str) -> ParseError {
    parse_err_with(&SqlParser::new(), sql, &ParsingOptions::standard())
}

pub fn parse_hive_err(sql: &str) -> ParseError {
    parse_err_with(&enhanced_parser(), sql, &ParsingOptions::hive())
}

pub fn parse_query(sql: &str) -> Query {
    match parse(sql) {
        Statement::Query(q) => *q,
        other => panic!("Expected a query, got {other:?}"),
    }
}

pub fn parse_hive_query(sql: &str) -> Query {
    match parse_hive(sql) {
        Statement::Query(q) => *q,
        other => panic!("Expected a query, got {other:?}"),
    }
}

pub fn specification(query: &Query) -> &QuerySpecification {
    match &query.body {
        QueryBody::Specification(spec) => spec,
        other => panic!("Expected a SELECT body, got {other:?}"),
    }
}
