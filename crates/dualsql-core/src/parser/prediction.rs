//! Adaptive prediction at grammar decision points.
//!
//! Every decision lists its alternatives in priority order. A bounded
//! lookahead predicate classifies each alternative from the next
//! [`SLL_LOOKAHEAD`] tokens:
//!
//! * [`Viability::Viable`]: the window commits to this alternative.
//! * [`Viability::Possible`]: the window is consistent with it but does not decide.
//! * [`Viability::NotViable`]: the window rules it out.
//!
//! In [`PredictionMode::Sll`] the parser commits only when the first surviving
//! alternative is viable or is the only survivor, and cancels the attempt
//! otherwise. In [`PredictionMode::Ll`] possible alternatives are parsed
//! speculatively in order and the first full match wins.

use super::engine::{Interrupt, PResult, Parser};
use crate::lexer::{Keyword, TokenKind};
use crate::tree::{NodeId, Rule};

/// Tokens of lookahead available to the predicates.
pub const SLL_LOOKAHEAD: usize = 4;

/// Prediction strategy for one parse attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredictionMode {
    /// Fast bounded-lookahead prediction that gives up on ambiguity.
    Sll,
    /// Exhaustive prediction that resolves ambiguity by speculative parsing.
    Ll,
}

impl PredictionMode {
    /// Returns the mode name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sll => "SLL",
            Self::Ll => "LL",
        }
    }
}

/// Grammar decision points that need prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// `(` in a primary expression: lambda, scalar subquery or parenthesised/row.
    PrimaryParen,
    /// Identifier in a primary expression: lambda, typed literal, call or column.
    PrimaryIdentifier,
    /// `(` in a relation: subquery or parenthesised relation.
    RelationParen,
    /// Select item: `*`, `name.*` or expression.
    SelectItem,
    /// `IN (`: subquery or value list.
    InPredicate,
}

impl Decision {
    /// Returns the decision name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PrimaryParen => "primaryExpression(paren)",
            Self::PrimaryIdentifier => "primaryExpression(identifier)",
            Self::RelationParen => "relationPrimary(paren)",
            Self::SelectItem => "selectItem",
            Self::InPredicate => "inPredicate",
        }
    }

    const fn alternatives(self) -> usize {
        match self {
            Self::PrimaryParen | Self::SelectItem => 3,
            Self::PrimaryIdentifier => 4,
            Self::RelationParen | Self::InPredicate => 2,
        }
    }

    /// The most general alternative, used when nothing matches.
    const fn fallback(self) -> usize {
        self.alternatives() - 1
    }
}

/// What the lookahead window says about one alternative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Viability {
    Viable,
    Possible,
    NotViable,
}

/// Result of a speculative parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Speculation {
    Matched,
    Failed { reached: usize },
}

const fn is_query_start(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Keyword(Keyword::Select | Keyword::With | Keyword::Values | Keyword::Table)
    )
}

impl Parser<'_> {
    /// Chooses an alternative for `decision` at the current token.
    pub(crate) fn predict(&mut self, decision: Decision) -> PResult<usize> {
        match self.mode() {
            PredictionMode::Sll => self.predict_sll(decision),
            PredictionMode::Ll => self.predict_ll(decision),
        }
    }

    fn predict_sll(&mut self, decision: Decision) -> PResult<usize> {
        let mut possible = None;
        for alternative in 0..decision.alternatives() {
            match self.lookahead(decision, alternative) {
                Viability::NotViable => {}
                Viability::Viable | Viability::Possible if possible.is_some() => {
                    return Err(Interrupt::Cancelled {
                        decision,
                        position: self.index(),
                    });
                }
                Viability::Viable => return Ok(alternative),
                Viability::Possible => possible = Some(alternative),
            }
        }
        Ok(possible.unwrap_or_else(|| decision.fallback()))
    }

    fn predict_ll(&mut self, decision: Decision) -> PResult<usize> {
        let mut best: Option<(usize, usize)> = None;
        for alternative in 0..decision.alternatives() {
            match self.lookahead(decision, alternative) {
                Viability::NotViable => {}
                Viability::Viable => return Ok(alternative),
                Viability::Possible => match self.speculate(decision, alternative)? {
                    Speculation::Matched => return Ok(alternative),
                    Speculation::Failed { reached } => {
                        if !matches!(best, Some((furthest, _)) if furthest >= reached) {
                            best = Some((reached, alternative));
                        }
                    }
                },
            }
        }
        Ok(best.map_or_else(|| decision.fallback(), |(_, alternative)| alternative))
    }

    /// Parses alternative `alternative` of `decision` into `children`.
    pub(crate) fn alternative(
        &mut self,
        decision: Decision,
        alternative: usize,
        children: &mut Vec<NodeId>,
    ) -> PResult<Rule> {
        match (decision, alternative) {
            (Decision::PrimaryParen, 0) => self.parenthesized_lambda(children),
            (Decision::PrimaryParen, 1) => self.subquery_expression(children),
            (Decision::PrimaryParen, _) => self.parenthesized_expression(children),
            (Decision::PrimaryIdentifier, 0) => self.single_parameter_lambda(children),
            (Decision::PrimaryIdentifier, 1) => self.type_constructor(children),
            (Decision::PrimaryIdentifier, 2) => self.function_call(children),
            (Decision::PrimaryIdentifier, _) => self.column_reference(children),
            (Decision::RelationParen, 0) => self.subquery_relation(children),
            (Decision::RelationParen, _) => self.parenthesized_relation(children),
            (Decision::SelectItem, 0) => self.select_all(children),
            (Decision::SelectItem, 1) => self.select_all_qualified(children),
            (Decision::SelectItem, _) => self.select_single(children),
            (Decision::InPredicate, 0) => self.in_subquery(children),
            (Decision::InPredicate, _) => self.in_list(children),
        }
    }

    fn lookahead(&mut self, decision: Decision, alternative: usize) -> Viability {
        if alternative == decision.fallback() {
            return Viability::Viable;
        }
        match (decision, alternative) {
            (Decision::PrimaryParen, 0) => self.lookahead_parenthesized_lambda(),
            (Decision::PrimaryParen | Decision::RelationParen | Decision::InPredicate, _) => {
                self.lookahead_parenthesized_query()
            }
            (Decision::PrimaryIdentifier, 0) => self.lookahead_kind(2, TokenKind::Arrow),
            (Decision::PrimaryIdentifier, 1) => self.lookahead_kind(2, TokenKind::String),
            (Decision::PrimaryIdentifier, _) => self.lookahead_function_call(),
            (Decision::SelectItem, 0) => self.lookahead_kind(1, TokenKind::Asterisk),
            (Decision::SelectItem, _) => self.lookahead_qualified_all(),
        }
    }

    fn lookahead_kind(&mut self, k: usize, kind: TokenKind) -> Viability {
        if self.la(k) == kind {
            Viability::Viable
        } else {
            Viability::NotViable
        }
    }

    /// `( (ident (, ident)*)? ) ->`
    fn lookahead_parenthesized_lambda(&mut self) -> Viability {
        let mut k = 2;
        if self.la(k) == TokenKind::RightParen {
            return self.lookahead_arrow(k + 1);
        }
        loop {
            if k > SLL_LOOKAHEAD {
                return Viability::Possible;
            }
            if !Self::is_identifier_start(self.la(k)) {
                return Viability::NotViable;
            }
            k += 1;
            if k > SLL_LOOKAHEAD {
                return Viability::Possible;
            }
            match self.la(k) {
                TokenKind::Comma => k += 1,
                TokenKind::RightParen => return self.lookahead_arrow(k + 1),
                _ => return Viability::NotViable,
            }
        }
    }

    fn lookahead_arrow(&mut self, k: usize) -> Viability {
        if k > SLL_LOOKAHEAD {
            Viability::Possible
        } else if self.la(k) == TokenKind::Arrow {
            Viability::Viable
        } else {
            Viability::NotViable
        }
    }

    /// `(+ query-start`: viable right after the first parenthesis, possible deeper.
    fn lookahead_parenthesized_query(&mut self) -> Viability {
        let mut k = 2;
        while k <= SLL_LOOKAHEAD && self.la(k) == TokenKind::LeftParen {
            k += 1;
        }
        if k > SLL_LOOKAHEAD {
            return Viability::Possible;
        }
        if !is_query_start(self.la(k)) {
            Viability::NotViable
        } else if k == 2 {
            Viability::Viable
        } else {
            Viability::Possible
        }
    }

    /// `ident (. ident)* (`
    fn lookahead_function_call(&mut self) -> Viability {
        let mut k = 2;
        loop {
            if k > SLL_LOOKAHEAD {
                return Viability::Possible;
            }
            match self.la(k) {
                TokenKind::LeftParen => return Viability::Viable,
                TokenKind::Dot => {}
                _ => return Viability::NotViable,
            }
            k += 1;
            if k > SLL_LOOKAHEAD {
                return Viability::Possible;
            }
            if !Self::is_identifier_start(self.la(k)) {
                return Viability::NotViable;
            }
            k += 1;
        }
    }

    /// `ident (. ident)* . *`
    fn lookahead_qualified_all(&mut self) -> Viability {
        if !Self::is_identifier_start(self.la(1)) {
            return Viability::NotViable;
        }
        let mut k = 1;
        loop {
            k += 1;
            if k > SLL_LOOKAHEAD {
                return Viability::Possible;
            }
            if self.la(k) != TokenKind::Dot {
                return Viability::NotViable;
            }
            k += 1;
            if k > SLL_LOOKAHEAD {
                return Viability::Possible;
            }
            match self.la(k) {
                TokenKind::Asterisk => return Viability::Viable,
                kind if Self::is_identifier_start(kind) => {}
                _ => return Viability::NotViable,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_is_last_alternative() {
        assert_eq!(Decision::PrimaryIdentifier.fallback(), 3);
        assert_eq!(Decision::SelectItem.fallback(), 2);
        assert_eq!(Decision::InPredicate.fallback(), 1);
    }

    #[test]
    fn test_query_start() {
        assert!(is_query_start(TokenKind::Keyword(Keyword::Select)));
        assert!(is_query_start(TokenKind::Keyword(Keyword::Values)));
        assert!(!is_query_start(TokenKind::Identifier));
    }
}
