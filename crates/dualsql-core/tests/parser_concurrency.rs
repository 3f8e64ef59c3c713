//! Tests for sharing one parser across threads.

mod common;

use std::thread;

use dualsql_core::{ParseErrorKind, ParsingOptions, SqlParser, Statement};

#[test]
fn parser_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SqlParser>();
}

#[test]
fn concurrent_parses_are_independent() {
    let parser = common::enhanced_parser();
    let inputs = [
        ("SELECT a FROM t WHERE b = 1", ParsingOptions::standard(), true),
        ("SELECT `a` FROM t WHERE b == 1", ParsingOptions::hive(), true),
        ("SELECT a.b.c.* FROM t", ParsingOptions::standard(), true),
        ("SELECT a from b from c", ParsingOptions::hive(), false),
        ("SELECT `a` FROM t", ParsingOptions::standard(), false),
    ];

    thread::scope(|scope| {
        for worker in 0..4 {
            let parser = &parser;
            let inputs = &inputs;
            scope.spawn(move || {
                for round in 0..25 {
                    let (sql, options, ok) = &inputs[(worker + round) % inputs.len()];
                    match parser.create_statement(sql, options) {
                        Ok(statement) => {
                            assert!(*ok, "{sql} should fail");
                            assert!(matches!(statement, Statement::Query(_)));
                        }
                        Err(err) => {
                            assert!(!*ok, "{sql}: {err}");
                            let kind = err.as_parse_error().map(|e| e.kind());
                            assert!(matches!(
                                kind,
                                Some(ParseErrorKind::Syntax | ParseErrorKind::IdentifierRule)
                            ));
                        }
                    }
                }
            });
        }
    });
}

#[test]
fn concurrent_results_match_sequential_results() {
    let parser = SqlParser::new();
    let sql = "SELECT x, count(*) FROM t GROUP BY x ORDER BY 2 DESC";
    let expected = parser
        .create_statement(sql, &ParsingOptions::standard())
        .unwrap();

    let results: Vec<Statement> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| parser.create_statement(sql, &ParsingOptions::standard())))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect()
    });

    for result in results {
        assert_eq!(result, expected);
    }
}
