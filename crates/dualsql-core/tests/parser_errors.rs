//! Tests for parser error cases.

mod common;
use common::*;

use dualsql_core::{
    Error, IdentifierSymbol, ParseErrorKind, ParsingOptions, SqlParser, SqlParserOptions,
};

const TOO_LARGE: &str = "statement is too large (stack overflow while parsing)";

fn chain(term: &str, separator: &str, count: usize) -> String {
    vec![term; count].join(separator)
}

fn expression_err(parser: &SqlParser, sql: &str) -> dualsql_core::ParseError {
    match parser.create_expression(sql, &ParsingOptions::standard()) {
        Err(Error::Parse(err)) => err,
        other => panic!("Expected a parse error, got {other:?}"),
    }
}

#[test]
fn error_empty_input() {
    let err = parse_err("");
    assert_eq!(err.kind(), ParseErrorKind::Syntax);
    assert!(err.message().contains("'<EOF>'"), "{err}");
}

#[test]
fn error_incomplete_select() {
    let _ = parse_err("SELECT");
}

#[test]
fn error_missing_from_table() {
    let _ = parse_err("SELECT * FROM");
}

#[test]
fn error_unclosed_paren() {
    let _ = parse_err("SELECT (1 + 2");
}

#[test]
fn error_basic_format_lists_expected_tokens() {
    let err = parse_err("SELECT a from b from c");
    let text = err.to_string();
    assert!(
        text.starts_with("line 1:17: mismatched input 'from' expecting "),
        "{text}"
    );
    assert_eq!(err.column(), Some(16));
}

#[test]
fn error_enhanced_format_uses_rule_labels() {
    let err = parse_err_with(
        &enhanced_parser(),
        "SELECT * FROM t WHERE",
        &ParsingOptions::standard(),
    );
    assert!(
        err.message().starts_with("mismatched input '<EOF>'. Expecting: "),
        "{err}"
    );
    assert!(err.message().contains("<expression>"), "{err}");
}

#[test]
fn error_join_without_criteria_is_syntax_error_in_standard() {
    assert_eq!(
        parse_err("SELECT * FROM a JOIN b").kind(),
        ParseErrorKind::Syntax
    );
}

#[test]
fn error_unrecognized_character() {
    let err = parse_err("SELECT # FROM t");
    assert_eq!(err.kind(), ParseErrorKind::Lex);
    assert_eq!(err.to_string(), "line 1:8: token recognition error at: '#'");
}

#[test]
fn error_multiline_location() {
    let err = parse_err("SELECT a\nFROM t\nWHERE");
    assert_eq!(err.line(), Some(3));
}

#[test]
fn error_digit_identifier_in_standard() {
    let err = parse_err("SELECT * FROM tmp.20171014_tmpdata");
    assert_eq!(err.kind(), ParseErrorKind::IdentifierRule);
    assert_eq!(
        err.message(),
        "identifiers must not start with a digit; surround the identifier with double quotes"
    );
    assert_eq!(err.to_string().split(": ").next(), Some("line 1:19"));
}

#[test]
fn error_backquoted_identifier_in_standard() {
    let err = parse_err("SELECT `a` FROM t");
    assert_eq!(err.kind(), ParseErrorKind::IdentifierRule);
    assert_eq!(
        err.message(),
        "backquoted identifiers are not supported; use double quotes to quote identifiers"
    );
}

#[test]
fn error_empty_delimited_identifier() {
    let err = parse_err(r#"SELECT "" FROM t"#);
    assert_eq!(err.message(), "Zero-length delimited identifier not allowed");
}

#[test]
fn error_identifier_symbols_follow_options() {
    let err = parse_err("SELECT a FROM x@y");
    assert_eq!(err.message(), "identifiers must not contain '@'");

    let err = parse_err("SELECT a FROM x:y");
    assert_eq!(err.message(), "identifiers must not contain ':'");

    let parser = SqlParser::with_options(
        SqlParserOptions::new()
            .allow_identifier_symbols([IdentifierSymbol::AtSign, IdentifierSymbol::Colon]),
    )
    .unwrap();
    let _ = parse_with(&parser, "SELECT a FROM x@y", &ParsingOptions::standard());
    let _ = parse_with(&parser, "SELECT a FROM x:y", &ParsingOptions::standard());
}

#[test]
fn error_deeply_nested_parentheses() {
    let depth = 2_000;
    let sql = format!("SELECT {}1{}", "(".repeat(depth), ")".repeat(depth));
    let err = parse_err(&sql);
    assert_eq!(err.kind(), ParseErrorKind::InputTooLarge);
    assert_eq!(err.to_string(), TOO_LARGE);
}

#[test]
fn error_long_not_chain() {
    let sql = format!("SELECT {}x FROM t", "NOT ".repeat(2_000));
    let err = parse_err(&sql);
    assert_eq!(err.kind(), ParseErrorKind::InputTooLarge);
    assert_eq!(err.message(), TOO_LARGE);
}

#[test]
fn error_nesting_limit_is_configurable() {
    let sql = format!("SELECT {}1{}", "(".repeat(40), ")".repeat(40));
    let _ = parse(&sql);

    let parser =
        SqlParser::with_options(SqlParserOptions::new().with_max_nesting_depth(50)).unwrap();
    let err = parse_err_with(&parser, &sql, &ParsingOptions::standard());
    assert_eq!(err.kind(), ParseErrorKind::InputTooLarge);
}

#[test]
fn error_expression_too_large_names_expression() {
    let sql = format!("{}1{}", "(".repeat(2_000), ")".repeat(2_000));
    match SqlParser::new().create_expression(&sql, &ParsingOptions::standard()) {
        Err(Error::Parse(err)) => {
            assert_eq!(
                err.message(),
                "expression is too large (stack overflow while parsing)"
            );
        }
        other => panic!("Expected an input-too-large error, got {other:?}"),
    }
}

#[test]
fn error_long_arithmetic_chain() {
    let err = expression_err(&SqlParser::new(), &chain("1", " + ", 5_000));
    assert_eq!(err.kind(), ParseErrorKind::InputTooLarge);
    assert_eq!(
        err.message(),
        "expression is too large (stack overflow while parsing)"
    );
    assert_eq!(err.line(), None);
}

#[test]
fn error_long_or_chain() {
    let sql = format!("SELECT * FROM t WHERE {}", chain("a = 1", " OR ", 2_000));
    let err = parse_err(&sql);
    assert_eq!(err.kind(), ParseErrorKind::InputTooLarge);
    assert_eq!(err.message(), TOO_LARGE);
}

#[test]
fn error_long_concatenation_chain() {
    let sql = format!("SELECT {} FROM t", chain("'a'", " || ", 2_000));
    assert_eq!(parse_err(&sql).kind(), ParseErrorKind::InputTooLarge);
}

#[test]
fn error_long_union_chain() {
    let err = parse_err(&chain("SELECT 1", " UNION ALL ", 2_000));
    assert_eq!(err.kind(), ParseErrorKind::InputTooLarge);
    assert_eq!(err.message(), TOO_LARGE);
}

#[test]
fn error_long_join_chain() {
    let joins: String = (1..2_000).map(|i| format!(" JOIN t{i} ON true")).collect();
    let err = parse_err(&format!("SELECT * FROM t0{joins}"));
    assert_eq!(err.kind(), ParseErrorKind::InputTooLarge);
}

#[test]
fn error_long_chain_in_hive() {
    let sql = format!("SELECT * FROM t WHERE {}", chain("a == 1", " AND ", 2_000));
    assert_eq!(parse_hive_err(&sql).kind(), ParseErrorKind::InputTooLarge);
}

#[test]
fn error_largest_nesting_limit_still_reports_too_large() {
    let depth = *dualsql_core::config::NESTING_DEPTH_RANGE.end();
    let parser =
        SqlParser::with_options(SqlParserOptions::new().with_max_nesting_depth(depth)).unwrap();

    let nested = format!("{}1{}", "(".repeat(20_000), ")".repeat(20_000));
    assert_eq!(
        expression_err(&parser, &nested).kind(),
        ParseErrorKind::InputTooLarge
    );
    assert_eq!(
        expression_err(&parser, &chain("1", " + ", 20_000)).kind(),
        ParseErrorKind::InputTooLarge
    );
}

#[test]
fn error_nesting_limit_above_range_is_rejected() {
    let options = SqlParserOptions::new().with_max_nesting_depth(100_000);
    assert!(SqlParser::with_options(options).is_err());
}

#[test]
fn error_semantic_errors_carry_location() {
    let err = parse_err("SELECT 99999999999999999999");
    assert_eq!(err.kind(), ParseErrorKind::Semantic);
    assert!(err.message().starts_with("Invalid numeric literal"), "{err}");
    assert_eq!(err.column(), Some(7));
}
