//! Tests for adaptive prediction and dialect isolation.

mod common;
use common::*;

use dualsql_core::{EntryPoint, ParsingOptions, PredictionMode, SqlParser};

fn tree_with(sql: &str, entry: EntryPoint, mode: Option<PredictionMode>) -> dualsql_core::ParsedTree {
    let parser = SqlParser::new();
    let options = ParsingOptions::standard();
    match mode {
        Some(mode) => parser.parse_tree_with_mode(sql, entry, &options, mode),
        None => parser.parse_tree(sql, entry, &options),
    }
    .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

#[test]
fn simple_statements_parse_in_sll() {
    for sql in [
        "SELECT 1",
        "SELECT a, b FROM t WHERE a > 1 ORDER BY b LIMIT 10",
        "SELECT * FROM a JOIN b ON a.id = b.id",
        "SELECT x FROM t WHERE x IN (SELECT y FROM s)",
    ] {
        let parsed = tree_with(sql, EntryPoint::Statement, None);
        assert_eq!(parsed.mode, PredictionMode::Sll, "{sql}");
    }
}

#[test]
fn long_qualified_star_falls_back_to_ll() {
    let sql = "SELECT a.b.c.* FROM t";
    let parsed = tree_with(sql, EntryPoint::Statement, None);
    assert_eq!(parsed.mode, PredictionMode::Ll);
    assert_eq!(parsed.tree, tree_with(sql, EntryPoint::Statement, Some(PredictionMode::Ll)).tree);
}

#[test]
fn multi_parameter_lambda_falls_back_to_ll() {
    let sql = "transform(arr, (x, y) -> x + y)";
    let parsed = tree_with(sql, EntryPoint::Expression, None);
    assert_eq!(parsed.mode, PredictionMode::Ll);
}

#[test]
fn sll_only_reports_ambiguity_as_syntax_error() {
    let err = SqlParser::new()
        .parse_tree_with_mode(
            "SELECT a.b.c.* FROM t",
            EntryPoint::Statement,
            &ParsingOptions::standard(),
            PredictionMode::Sll,
        )
        .unwrap_err();
    assert!(err.to_string().contains("ambiguous input"), "{err}");
}

#[test]
fn sll_and_ll_build_the_same_tree() {
    for sql in [
        "SELECT a, count(*) FROM t GROUP BY a HAVING count(*) > 1",
        "SELECT CASE WHEN a THEN 1 ELSE 2 END FROM t",
        "WITH x AS (SELECT 1) SELECT * FROM x UNION ALL SELECT 2",
        "SELECT * FROM (SELECT a FROM t) s LEFT JOIN u USING (a)",
    ] {
        let sll = tree_with(sql, EntryPoint::Statement, Some(PredictionMode::Sll));
        let ll = tree_with(sql, EntryPoint::Statement, Some(PredictionMode::Ll));
        assert_eq!(sll.tree, ll.tree, "{sql}");
    }
}

#[test]
fn parsing_is_deterministic() {
    let sql = "SELECT a.b.c.*, (x, y) -> x FROM t WHERE z BETWEEN 1 AND 2";
    let first = parse(sql);
    for _ in 0..5 {
        assert_eq!(parse(sql), first);
    }
}

#[test]
fn nested_parentheses_pick_the_right_alternative() {
    let _ = parse_expr("((1 + 2)) * 3");
    let _ = parse_expr("((SELECT 1)) + 1");
    let _ = parse("SELECT * FROM ((SELECT a FROM t)) s");
}

#[test]
fn hive_syntax_is_rejected_in_standard() {
    let _ = parse_hive("SELECT `a` FROM t WHERE b == 1");
    let _ = parse_err("SELECT `a` FROM t");
    let _ = parse_err("SELECT a FROM t WHERE b == 1");
    let _ = parse_err("SELECT a FROM t WHERE b RLIKE 'x'");
}

#[test]
fn standard_syntax_differs_in_hive() {
    let _ = parse("SELECT * FROM (SELECT a FROM t)");
    let _ = parse("SELECT * FROM t CROSS JOIN UNNEST(arr) AS u");
    let _ = parse_hive_err("SELECT * FROM (SELECT a FROM t)");
}

#[test]
fn path_specification_uses_standard_dialect() {
    let path = SqlParser::new()
        .create_path_specification("hive.tmp, other")
        .unwrap();
    assert_eq!(path.elements.len(), 2);
    assert_eq!(path.elements[0].catalog.as_ref().map(|c| c.value.as_str()), Some("hive"));
    assert!(SqlParser::new().create_path_specification("`tmp`").is_err());
}
