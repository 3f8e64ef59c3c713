//! Operator precedence for value expressions.

use crate::ast::{ArithmeticOp, ComparisonOp, UnaryOp};
use crate::lexer::TokenKind;

/// Operators that continue a value expression, recorded when none follows.
pub(crate) const INFIX_OPERATORS: [TokenKind; 6] = [
    TokenKind::Concat,
    TokenKind::Plus,
    TokenKind::Minus,
    TokenKind::Asterisk,
    TokenKind::Slash,
    TokenKind::Percent,
];

/// Comparison operators accepted after a value expression.
pub(crate) const COMPARISON_OPERATORS: [TokenKind; 6] = [
    TokenKind::Eq,
    TokenKind::Neq,
    TokenKind::Lt,
    TokenKind::Lte,
    TokenKind::Gt,
    TokenKind::Gte,
];

/// Returns the binding power of a prefix operator.
///
/// Unary sign binds tighter than any infix operator, so `-a * b` is
/// `(-a) * b`.
#[must_use]
pub const fn prefix_binding_power(kind: TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Plus | TokenKind::Minus => Some(7),
        _ => None,
    }
}

/// Returns the infix binding power for a token.
///
/// Returns `(left_bp, right_bp)` where:
/// - Higher binding power = binds tighter
/// - Left associative: left_bp < right_bp
///
/// Returns `None` if the token is not an infix operator.
#[must_use]
pub const fn infix_binding_power(kind: TokenKind) -> Option<(u8, u8)> {
    match kind {
        // String concatenation (lowest precedence)
        TokenKind::Concat => Some((1, 2)),

        // Additive
        TokenKind::Plus | TokenKind::Minus => Some((3, 4)),

        // Multiplicative
        TokenKind::Asterisk | TokenKind::Slash | TokenKind::Percent => Some((5, 6)),

        _ => None,
    }
}

/// Converts a token to an arithmetic operator.
#[must_use]
pub const fn token_to_arithmetic_op(kind: TokenKind) -> Option<ArithmeticOp> {
    match kind {
        TokenKind::Plus => Some(ArithmeticOp::Add),
        TokenKind::Minus => Some(ArithmeticOp::Sub),
        TokenKind::Asterisk => Some(ArithmeticOp::Mul),
        TokenKind::Slash => Some(ArithmeticOp::Div),
        TokenKind::Percent => Some(ArithmeticOp::Mod),
        _ => None,
    }
}

/// Converts a token to a comparison operator.
#[must_use]
pub const fn token_to_comparison_op(kind: TokenKind) -> Option<ComparisonOp> {
    match kind {
        TokenKind::Eq => Some(ComparisonOp::Eq),
        TokenKind::Neq => Some(ComparisonOp::NotEq),
        TokenKind::Lt => Some(ComparisonOp::Lt),
        TokenKind::Lte => Some(ComparisonOp::LtEq),
        TokenKind::Gt => Some(ComparisonOp::Gt),
        TokenKind::Gte => Some(ComparisonOp::GtEq),
        _ => None,
    }
}

/// Converts a token to a unary operator.
#[must_use]
pub const fn token_to_unary_op(kind: TokenKind) -> Option<UnaryOp> {
    match kind {
        TokenKind::Plus => Some(UnaryOp::Plus),
        TokenKind::Minus => Some(UnaryOp::Minus),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_power_ordering() {
        let concat = infix_binding_power(TokenKind::Concat).map(|(l, _)| l);
        let add = infix_binding_power(TokenKind::Plus).map(|(l, _)| l);
        let mul = infix_binding_power(TokenKind::Asterisk).map(|(l, _)| l);
        assert!(concat < add);
        assert!(add < mul);
        assert!(prefix_binding_power(TokenKind::Minus) > mul);
    }

    #[test]
    fn test_non_operators() {
        assert_eq!(infix_binding_power(TokenKind::Comma), None);
        assert_eq!(prefix_binding_power(TokenKind::Asterisk), None);
        assert_eq!(token_to_comparison_op(TokenKind::Plus), None);
    }

    #[test]
    fn test_token_conversions() {
        assert_eq!(token_to_arithmetic_op(TokenKind::Percent), Some(ArithmeticOp::Mod));
        assert_eq!(token_to_comparison_op(TokenKind::Neq), Some(ComparisonOp::NotEq));
        assert_eq!(token_to_unary_op(TokenKind::Minus), Some(UnaryOp::Minus));
    }
}
