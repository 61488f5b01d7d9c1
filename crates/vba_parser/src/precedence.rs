//! Operator binding powers for binary and unary operators.

use vba_syntax::SyntaxKind;

/// Binding power levels, lowest to highest. Every binary operator is
/// left-associative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum OperatorPrecedence {
    Lowest = 0,
    Or = 1,
    Xor = 2,
    And = 3,
    Comparison = 4,
    Concatenation = 5,
    Additive = 6,
    Multiplicative = 7,
    Power = 8,
    Unary = 9,
}

/// Binding power of a binary operator. Keyword operators must already be
/// resolved to their keyword kind.
pub fn get_binary_operator_precedence(kind: SyntaxKind) -> Option<OperatorPrecedence> {
    Some(match kind {
        SyntaxKind::OrKeyword => OperatorPrecedence::Or,
        SyntaxKind::XorKeyword => OperatorPrecedence::Xor,
        SyntaxKind::AndKeyword => OperatorPrecedence::And,
        SyntaxKind::EqualsToken
        | SyntaxKind::LessThanGreaterThanToken
        | SyntaxKind::LessThanToken
        | SyntaxKind::LessThanEqualsToken
        | SyntaxKind::GreaterThanToken
        | SyntaxKind::GreaterThanEqualsToken
        | SyntaxKind::LikeKeyword
        | SyntaxKind::IsKeyword => OperatorPrecedence::Comparison,
        SyntaxKind::AmpersandToken => OperatorPrecedence::Concatenation,
        SyntaxKind::PlusToken | SyntaxKind::MinusToken => OperatorPrecedence::Additive,
        SyntaxKind::AsteriskToken
        | SyntaxKind::SlashToken
        | SyntaxKind::BackslashToken
        | SyntaxKind::ModKeyword => OperatorPrecedence::Multiplicative,
        SyntaxKind::CaretToken => OperatorPrecedence::Power,
        _ => return None,
    })
}

pub fn is_unary_operator(kind: SyntaxKind) -> bool {
    matches!(kind, SyntaxKind::MinusToken | SyntaxKind::PlusToken | SyntaxKind::NotKeyword)
}

/// Operators that can only appear between two operands. After a statement
/// target they continue an expression rather than start a bare argument,
/// unlike `+` and `-` (`Foo -1` calls `Foo` with `-1`).
pub fn is_infix_only_operator(kind: SyntaxKind) -> bool {
    get_binary_operator_precedence(kind).is_some()
        && !matches!(kind, SyntaxKind::PlusToken | SyntaxKind::MinusToken | SyntaxKind::EqualsToken)
}

/// Keyword operators recognised in operator position.
pub const KEYWORD_OPERATORS: &[SyntaxKind] = &[
    SyntaxKind::OrKeyword,
    SyntaxKind::XorKeyword,
    SyntaxKind::AndKeyword,
    SyntaxKind::LikeKeyword,
    SyntaxKind::IsKeyword,
    SyntaxKind::ModKeyword,
];
