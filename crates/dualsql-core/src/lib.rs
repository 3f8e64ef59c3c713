//! # dualsql-core
//!
//! An adaptive SQL parser for two dialects: Presto-style standard SQL and
//! Hive-flavoured SQL.
//!
//! This crate provides:
//! - A dialect-aware lexer that keeps every token's text and position
//! - A recursive descent parser with two-tier (SLL, then LL) adaptive
//!   prediction and a configurable nesting limit
//! - Identifier rule checks that run as each rule completes
//! - Basic and enhanced (rule-labelled) syntax error messages
//! - A typed AST built from the checked parse tree
//!
//! ## Parsing
//!
//! ```rust
//! use dualsql_core::{ParsingOptions, SqlParser};
//!
//! let parser = SqlParser::new();
//! let expr = parser
//!     .create_expression("price * (1 + tax)", &ParsingOptions::standard())
//!     .unwrap();
//! println!("{expr:?}");
//! ```
//!
//! ## Errors
//!
//! Errors render as `line L:C: message` with a 1-based column:
//!
//! ```rust
//! use dualsql_core::{ParsingOptions, SqlParser, SqlParserOptions};
//!
//! let options = SqlParserOptions::new().use_enhanced_error_handler(true);
//! let err = SqlParser::with_options(options)
//!     .unwrap()
//!     .create_statement("SELECT a from b from c", &ParsingOptions::hive())
//!     .unwrap_err();
//! assert!(err.to_string().starts_with("line 1:17: mismatched input 'from'. "));
//! ```

pub mod ast;
mod astbuilder;
pub mod config;
pub mod diagnostics;
pub mod dialect;
pub mod error;
pub mod lexer;
pub mod parser;
mod sql_parser;
pub mod tree;

pub use ast::{Expr, PathSpecification, Statement};
pub use config::{
    ConfigError, DecimalLiteralTreatment, IdentifierSymbol, ParsingOptions, SqlParserOptions,
};
pub use dialect::{Dialect, DialectKind, HiveDialect, StandardDialect};
pub use error::{Error, ParseError, ParseErrorKind, Result};
pub use parser::{EntryPoint, ParsedTree, PredictionMode};
pub use sql_parser::SqlParser;
pub use tree::ParseTree;
