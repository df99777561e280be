//! The expression node sum type.

use crate::ops::{BinaryOp, ComparisonOp, UnaryOp};

/// Variable namespace prefix (`g:name`, `v:true`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Namespace {
    /// `b:` — buffer-local.
    Buffer,
    /// `w:` — window-local.
    Window,
    /// `t:` — tabpage-local.
    Tabpage,
    /// `g:` — global.
    Global,
    /// `l:` — function-local.
    Local,
    /// `s:` — script-local.
    Script,
    /// `a:` — function argument.
    Argument,
    /// `v:` — Vim-defined.
    Vim,
}

impl Namespace {
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'b' => Namespace::Buffer,
            'w' => Namespace::Window,
            't' => Namespace::Tabpage,
            'g' => Namespace::Global,
            'l' => Namespace::Local,
            's' => Namespace::Script,
            'a' => Namespace::Argument,
            'v' => Namespace::Vim,
            _ => return None,
        })
    }

    pub fn as_char(self) -> char {
        match self {
            Namespace::Buffer => 'b',
            Namespace::Window => 'w',
            Namespace::Tabpage => 't',
            Namespace::Global => 'g',
            Namespace::Local => 'l',
            Namespace::Script => 's',
            Namespace::Argument => 'a',
            Namespace::Vim => 'v',
        }
    }
}

/// Scope prefix of an `&option` reference (`&g:`, `&l:`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionScope {
    Global,
    Local,
}

/// A parsed Vimscript expression.
///
/// One variant per literal kind plus one per operator/access form. Containers
/// own their children by `Box`/`Vec`; the tree is immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Number(i64),
    Float(f64),
    String(String),
    Blob(Vec<u8>),
    List(Vec<Expression>),
    /// Dictionary literal entries in source order. Keys are expressions in
    /// the `{}` form and pre-built strings in the `#{}` form; either way
    /// they are stringified at evaluation time.
    Dictionary(Vec<(Expression, Expression)>),
    Option {
        scope: Option<OptionScope>,
        name: String,
    },
    Variable {
        namespace: Option<Namespace>,
        name: String,
    },
    EnvVariable {
        name: String,
    },
    Register {
        name: char,
    },
    FunctionCall {
        func: String,
        args: Vec<Expression>,
    },
    Lambda {
        params: Vec<String>,
        body: Box<Expression>,
    },
    Index {
        expression: Box<Expression>,
        index: Box<Expression>,
    },
    Slice {
        expression: Box<Expression>,
        start: Option<Box<Expression>>,
        end: Option<Box<Expression>>,
    },
    /// Dot access: `dict.key`.
    Entry {
        expression: Box<Expression>,
        entry_name: String,
    },
    /// Calling the result of an expression: `Fn(args)`.
    FuncrefCall {
        expression: Box<Expression>,
        args: Vec<Expression>,
    },
    /// Method-call sugar: `expr->name(args)` is `name(expr, args)`.
    MethodCall {
        expression: Box<Expression>,
        method_name: String,
        args: Vec<Expression>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    Comparison {
        op: ComparisonOp,
        /// `Some(true)` for a `#` suffix, `Some(false)` for `?`, `None` to
        /// fall back to the 'ignorecase' setting.
        match_case: Option<bool>,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    Ternary {
        condition: Box<Expression>,
        then: Box<Expression>,
        otherwise: Box<Expression>,
    },
}

impl Expression {
    /// Build a binary node without the `Box` noise at call sites.
    pub fn binary(lhs: Expression, op: BinaryOp, rhs: Expression) -> Self {
        Expression::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expression) -> Self {
        Expression::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn comparison(
        lhs: Expression,
        op: ComparisonOp,
        match_case: Option<bool>,
        rhs: Expression,
    ) -> Self {
        Expression::Comparison {
            op,
            match_case,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn func_call(func: &str, args: Vec<Expression>) -> Self {
        Expression::FunctionCall {
            func: func.to_string(),
            args,
        }
    }

    pub fn variable(name: &str) -> Self {
        Expression::Variable {
            namespace: None,
            name: name.to_string(),
        }
    }

    pub fn str(value: &str) -> Self {
        Expression::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_round_trips_through_char() {
        for c in ['b', 'w', 't', 'g', 'l', 's', 'a', 'v'] {
            let ns = Namespace::from_char(c).unwrap();
            assert_eq!(ns.as_char(), c);
        }
        assert_eq!(Namespace::from_char('x'), None);
    }

    #[test]
    fn builders_box_children() {
        let expr = Expression::binary(
            Expression::Number(1),
            BinaryOp::Add,
            Expression::Number(2),
        );
        match expr {
            Expression::Binary { op, lhs, rhs } => {
                assert_eq!(op, BinaryOp::Add);
                assert_eq!(*lhs, Expression::Number(1));
                assert_eq!(*rhs, Expression::Number(2));
            }
            other => panic!("unexpected node: {other:?}"),
        }
    }
}
