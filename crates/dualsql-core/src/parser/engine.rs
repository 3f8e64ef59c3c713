//! Parser state shared by every grammar rule.
//!
//! Grammar functions run inside rule frames ([`Parser::within`]), consume
//! tokens into child lists and allocate nodes with [`Parser::node`]. Failed
//! token checks record expectations for the error translator. Prediction
//! decisions may parse alternatives speculatively; while speculating nothing is
//! recorded and no post-processing hook runs.

use std::collections::HashMap;

use super::postprocess::PostProcessor;
use super::prediction::{Decision, PredictionMode, Speculation};
use crate::config::SqlParserOptions;
use crate::diagnostics::{ErrorTranslator, ExpectationSink};
use crate::dialect::Dialect;
use crate::error::{Error, ParseError};
use crate::lexer::{Keyword, TokenKind, TokenStream};
use crate::tree::{NodeId, ParseTree, Rule};

/// Why a grammar function stopped.
#[derive(Debug)]
pub(crate) enum Interrupt {
    /// A token did not match; details are in the expectation sink.
    Mismatch,
    /// The fast tier found several viable alternatives.
    Cancelled {
        decision: Decision,
        position: usize,
    },
    /// Rule nesting or tree height exceeded the configured limit.
    TooDeep,
    /// A post-processing hook rejected the input.
    Fatal(Box<Error>),
}

pub(crate) type PResult<T> = Result<T, Interrupt>;

#[derive(Debug, Clone, Copy)]
struct Frame {
    rule: Rule,
    start: usize,
}

const IDENTIFIER_TOKENS: [TokenKind; 4] = [
    TokenKind::Identifier,
    TokenKind::QuotedIdentifier,
    TokenKind::BackquotedIdentifier,
    TokenKind::DigitIdentifier,
];

/// Recursive-descent parser over a [`TokenStream`].
pub(crate) struct Parser<'a> {
    tokens: TokenStream<'a>,
    tree: ParseTree,
    dialect: &'a dyn Dialect,
    mode: PredictionMode,
    post: PostProcessor<'a>,
    translator: ErrorTranslator,
    sink: ExpectationSink,
    frames: Vec<Frame>,
    max_depth: usize,
    speculation: usize,
    furthest_failure: usize,
    memo: HashMap<(Decision, usize, usize), Speculation>,
    non_reserved: Vec<Keyword>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(
        tokens: TokenStream<'a>,
        dialect: &'a dyn Dialect,
        mode: PredictionMode,
        options: &'a SqlParserOptions,
    ) -> Self {
        Self {
            tokens,
            tree: ParseTree::new(),
            dialect,
            mode,
            post: PostProcessor::new(dialect, options),
            translator: ErrorTranslator::new(
                dialect.error_labels(),
                options.is_enhanced_error_handler_enabled(),
            ),
            sink: ExpectationSink::default(),
            frames: Vec::new(),
            max_depth: options.max_nesting_depth(),
            speculation: 0,
            furthest_failure: 0,
            memo: HashMap::new(),
            non_reserved: dialect.non_reserved_keywords(),
        }
    }

    /// Returns the token stream, for a retry, and the arena built so far.
    pub(crate) fn into_parts(self) -> (TokenStream<'a>, ParseTree) {
        (self.tokens, self.tree)
    }

    pub(crate) const fn dialect(&self) -> &'a dyn Dialect {
        self.dialect
    }

    pub(crate) const fn mode(&self) -> PredictionMode {
        self.mode
    }

    /// Translates the furthest recorded failure into a user-facing error.
    pub(crate) fn syntax_error(&mut self) -> ParseError {
        let position = self.sink.position().unwrap_or_else(|| self.tokens.index());
        let offending = self.tokens.get(position).clone();
        self.translator.syntax_error(&offending, self.sink.expected())
    }

    // Rule frames and nodes

    /// Runs `body` inside a frame for `rule`.
    ///
    /// Frames drive the nesting limit and the enhanced error labels.
    pub(crate) fn within<T>(
        &mut self,
        rule: Rule,
        body: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        if self.frames.len() >= self.max_depth {
            return Err(Interrupt::TooDeep);
        }
        let start = self.tokens.index();
        self.frames.push(Frame { rule, start });
        let result = body(self);
        self.frames.pop();
        result
    }

    /// Allocates a rule node and runs the exit hooks on it.
    ///
    /// Operator loops nest nodes without entering frames, so the height of
    /// every node is held to the same limit as the frame stack.
    pub(crate) fn node(&mut self, rule: Rule, children: Vec<NodeId>) -> PResult<NodeId> {
        let id = self.tree.push_rule(rule, children);
        if self.tree.height(id) > self.max_depth {
            return Err(Interrupt::TooDeep);
        }
        if self.speculation == 0 {
            self.post
                .exit_rule(&mut self.tree, id)
                .map_err(|err| Interrupt::Fatal(Box::new(err)))?;
        }
        Ok(id)
    }

    /// Runs a decision and parses the chosen alternative into `children`.
    pub(crate) fn decide(
        &mut self,
        decision: Decision,
        children: &mut Vec<NodeId>,
    ) -> PResult<Rule> {
        let alternative = self.predict(decision)?;
        self.alternative(decision, alternative, children)
    }

    // Tokens

    pub(crate) fn la(&mut self, k: usize) -> TokenKind {
        self.tokens.la(k)
    }

    pub(crate) fn index(&self) -> usize {
        self.tokens.index()
    }

    /// Checks the current token without recording anything.
    pub(crate) fn at(&mut self, kind: TokenKind) -> bool {
        self.la(1) == kind
    }

    pub(crate) fn at_keyword(&mut self, keyword: Keyword) -> bool {
        self.at(TokenKind::Keyword(keyword))
    }

    /// Checks the current token, recording `kind` as expected if it differs.
    pub(crate) fn check(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            true
        } else {
            self.expected(kind);
            false
        }
    }

    pub(crate) fn check_keyword(&mut self, keyword: Keyword) -> bool {
        self.check(TokenKind::Keyword(keyword))
    }

    /// Consumes the current token into a terminal node.
    pub(crate) fn bump(&mut self, children: &mut Vec<NodeId>) {
        let token = self.tokens.consume();
        children.push(self.tree.push_terminal(token));
    }

    pub(crate) fn eat(&mut self, kind: TokenKind, children: &mut Vec<NodeId>) -> bool {
        if self.check(kind) {
            self.bump(children);
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_keyword(&mut self, keyword: Keyword, children: &mut Vec<NodeId>) -> bool {
        self.eat(TokenKind::Keyword(keyword), children)
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, children: &mut Vec<NodeId>) -> PResult<()> {
        if self.eat(kind, children) {
            Ok(())
        } else {
            Err(self.mismatch())
        }
    }

    pub(crate) fn expect_keyword(
        &mut self,
        keyword: Keyword,
        children: &mut Vec<NodeId>,
    ) -> PResult<()> {
        self.expect(TokenKind::Keyword(keyword), children)
    }

    /// Consumes whichever of `keywords` is current, or fails.
    pub(crate) fn expect_one_of(
        &mut self,
        keywords: &[Keyword],
        children: &mut Vec<NodeId>,
    ) -> PResult<()> {
        for keyword in keywords {
            if self.eat_keyword(*keyword, children) {
                return Ok(());
            }
        }
        Err(self.mismatch())
    }

    /// Signals a syntax failure at the current token.
    pub(crate) fn mismatch(&mut self) -> Interrupt {
        self.furthest_failure = self.furthest_failure.max(self.tokens.index());
        Interrupt::Mismatch
    }

    /// Returns true if `kind` can start an identifier.
    pub(crate) const fn is_identifier_start(kind: TokenKind) -> bool {
        match kind {
            TokenKind::Keyword(keyword) => !keyword.is_reserved(),
            other => other.is_identifier_like(),
        }
    }

    pub(crate) fn at_identifier(&mut self) -> bool {
        Self::is_identifier_start(self.la(1))
    }

    // Expectations

    /// Records `kind` as acceptable at the current position.
    pub(crate) fn expected(&mut self, kind: TokenKind) {
        self.expected_via(kind, &[]);
    }

    /// Records `kind` as reached through `rules`, which are about to be entered.
    pub(crate) fn expected_via(&mut self, kind: TokenKind, rules: &[Rule]) {
        if self.speculation > 0 {
            return;
        }
        let position = self.tokens.index();
        if self.sink.position().is_some_and(|furthest| position < furthest) {
            return;
        }
        let mut chain = self
            .frames
            .iter()
            .filter(|frame| frame.start == position)
            .map(|frame| frame.rule)
            .collect::<Vec<_>>();
        chain.extend_from_slice(rules);
        let item = self.translator.describe(kind, &chain);
        self.sink.record(position, item);
    }

    /// Records every token that can start an identifier.
    pub(crate) fn expected_identifier(&mut self) {
        for kind in IDENTIFIER_TOKENS {
            self.expected_via(kind, &[Rule::Identifier]);
        }
        for i in 0..self.non_reserved.len() {
            let keyword = self.non_reserved[i];
            self.expected_via(
                TokenKind::Keyword(keyword),
                &[Rule::Identifier, Rule::NonReserved],
            );
        }
    }

    // Speculation

    /// Parses an alternative without committing to it.
    ///
    /// The token cursor and the arena are restored afterwards. Results are
    /// memoised per decision, position and alternative.
    pub(crate) fn speculate(
        &mut self,
        decision: Decision,
        alternative: usize,
    ) -> PResult<Speculation> {
        let start = self.tokens.index();
        if let Some(result) = self.memo.get(&(decision, start, alternative)) {
            return Ok(*result);
        }

        let arena = self.tree.len();
        let saved_furthest = self.furthest_failure;
        self.furthest_failure = start;
        self.speculation += 1;
        let mut scratch = Vec::new();
        let outcome = self.alternative(decision, alternative, &mut scratch);
        self.speculation -= 1;
        let reached = self.furthest_failure;
        self.furthest_failure = saved_furthest.max(reached);
        self.tokens.seek(start);
        self.tree.truncate(arena);

        let result = match outcome {
            Ok(_) => Speculation::Matched,
            Err(Interrupt::Mismatch) => Speculation::Failed { reached },
            Err(other) => return Err(other),
        };
        self.memo.insert((decision, start, alternative), result);
        Ok(result)
    }
}
