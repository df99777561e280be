//! Operator kinds, with their surface spellings.

use std::fmt;

/// Prefix operators (`expr7` level): right-associative, recursive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    /// `!` — logical not, yields 0 or 1.
    Not,
    /// `-` — numeric negation.
    Minus,
    /// `+` — numeric identity (still coerces to a number).
    Plus,
}

/// Infix operators other than comparisons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Multiply,
    Divide,
    Modulo,
    Add,
    Subtract,
    /// `.` / `..` — string concatenation.
    Concat,
    /// `&&` — logical and over number-coerced operands.
    And,
    /// `||` — logical or over number-coerced operands.
    Or,
}

/// Comparison operators (`expr4` level).
///
/// Each may be suffixed `#` (force case-sensitive) or `?` (force
/// case-insensitive) in the surface syntax; that flag lives on the
/// `Comparison` AST node, not here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComparisonOp {
    Equal,
    NotEqual,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    /// `=~` — regex match.
    Matches,
    /// `!~` — regex non-match.
    NotMatches,
    /// `is` — same type and, for containers, same identity.
    Is,
    /// `isnot` — negation of `is`.
    IsNot,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnaryOp::Not => "!",
            UnaryOp::Minus => "-",
            UnaryOp::Plus => "+",
        })
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Concat => "..",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        })
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComparisonOp::Equal => "==",
            ComparisonOp::NotEqual => "!=",
            ComparisonOp::Greater => ">",
            ComparisonOp::GreaterOrEqual => ">=",
            ComparisonOp::Less => "<",
            ComparisonOp::LessOrEqual => "<=",
            ComparisonOp::Matches => "=~",
            ComparisonOp::NotMatches => "!~",
            ComparisonOp::Is => "is",
            ComparisonOp::IsNot => "isnot",
        })
    }
}
