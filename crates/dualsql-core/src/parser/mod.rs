//! SQL parser.
//!
//! A hand-written recursive descent parser that builds a [`crate::tree::ParseTree`].
//! Ambiguous grammar decisions go through adaptive prediction; [`ParseDriver`]
//! runs the fast tier first and falls back to the exhaustive one.

mod driver;
mod engine;
mod expression;
mod names;
mod postprocess;
pub mod pratt;
mod prediction;
mod query;
mod statement;

pub use driver::{EntryPoint, ParseDriver, ParsedTree};
pub use prediction::{Decision, PredictionMode, SLL_LOOKAHEAD};
