//! Precedence climbing: ternary at the top, unary at the bottom.
//!
//! Each level parses its operands from the level below and loops over its
//! own operators, building left-associative trees. Comparison is the one
//! non-associative level: `a == b == c` does not parse.

use vex_error::VimResult;
use vex_ir::{BinaryOp, ComparisonOp, Expression, UnaryOp};

use crate::{is_ident, ExprParser};

/// Comparison operators, longest token first so `>=` never lexes as `>`.
const COMPARISONS: &[(&str, ComparisonOp)] = &[
    ("==", ComparisonOp::Equal),
    ("!=", ComparisonOp::NotEqual),
    (">=", ComparisonOp::GreaterOrEqual),
    ("<=", ComparisonOp::LessOrEqual),
    ("=~", ComparisonOp::Matches),
    ("!~", ComparisonOp::NotMatches),
    (">", ComparisonOp::Greater),
    ("<", ComparisonOp::Less),
    ("isnot", ComparisonOp::IsNot),
    ("is", ComparisonOp::Is),
];

const ADDITIVE: &[(&str, BinaryOp)] = &[
    ("+", BinaryOp::Add),
    ("-", BinaryOp::Subtract),
    ("..", BinaryOp::Concat),
    (".", BinaryOp::Concat),
];

const MULTIPLICATIVE: &[(&str, BinaryOp)] = &[
    ("*", BinaryOp::Multiply),
    ("/", BinaryOp::Divide),
    ("%", BinaryOp::Modulo),
];

impl ExprParser<'_> {
    /// `cond ? then : else`, right-associative in both arms.
    pub(crate) fn ternary(&mut self) -> VimResult<Option<Expression>> {
        let Some(condition) = self.logical_or()? else {
            return Ok(None);
        };
        let snap = self.cur;
        self.cur.skip_whitespace();
        if self.cur.eat(b'?') {
            self.cur.skip_whitespace();
            if let Some(then) = self.ternary()? {
                self.cur.skip_whitespace();
                if self.cur.eat(b':') {
                    self.cur.skip_whitespace();
                    if let Some(otherwise) = self.ternary()? {
                        return Ok(Some(Expression::Ternary {
                            condition: Box::new(condition),
                            then: Box::new(then),
                            otherwise: Box::new(otherwise),
                        }));
                    }
                }
            }
        }
        self.cur = snap;
        Ok(Some(condition))
    }

    fn logical_or(&mut self) -> VimResult<Option<Expression>> {
        let Some(mut lhs) = self.logical_and()? else {
            return Ok(None);
        };
        loop {
            let snap = self.cur;
            self.cur.skip_whitespace();
            if self.cur.eat_str("||") {
                self.cur.skip_whitespace();
                if let Some(rhs) = self.logical_and()? {
                    lhs = Expression::binary(lhs, BinaryOp::Or, rhs);
                    continue;
                }
            }
            self.cur = snap;
            return Ok(Some(lhs));
        }
    }

    fn logical_and(&mut self) -> VimResult<Option<Expression>> {
        let Some(mut lhs) = self.comparison()? else {
            return Ok(None);
        };
        loop {
            let snap = self.cur;
            self.cur.skip_whitespace();
            if self.cur.eat_str("&&") {
                self.cur.skip_whitespace();
                if let Some(rhs) = self.comparison()? {
                    lhs = Expression::binary(lhs, BinaryOp::And, rhs);
                    continue;
                }
            }
            self.cur = snap;
            return Ok(Some(lhs));
        }
    }

    /// At most one comparison, with an optional `#` (exact case) or `?`
    /// (ignore case) suffix on the operator.
    fn comparison(&mut self) -> VimResult<Option<Expression>> {
        let Some(lhs) = self.additive()? else {
            return Ok(None);
        };
        let snap = self.cur;
        self.cur.skip_whitespace();
        for (token, op) in COMPARISONS {
            let before = self.cur;
            if !self.cur.eat_str(token) {
                continue;
            }
            // `is`/`isnot` are words; `island` is a variable, not an operator.
            if matches!(op, ComparisonOp::Is | ComparisonOp::IsNot) && is_ident(self.cur.current())
            {
                self.cur = before;
                continue;
            }
            let match_case = if self.cur.eat(b'#') {
                Some(true)
            } else if self.cur.eat(b'?') {
                Some(false)
            } else {
                None
            };
            self.cur.skip_whitespace();
            if let Some(rhs) = self.additive()? {
                return Ok(Some(Expression::comparison(lhs, *op, match_case, rhs)));
            }
            break;
        }
        self.cur = snap;
        Ok(Some(lhs))
    }

    /// `+`, `-`, and string concatenation (`.` or `..`).
    fn additive(&mut self) -> VimResult<Option<Expression>> {
        self.binary_level(ADDITIVE, Self::multiplicative)
    }

    fn multiplicative(&mut self) -> VimResult<Option<Expression>> {
        self.binary_level(MULTIPLICATIVE, Self::unary)
    }

    fn binary_level(
        &mut self,
        ops: &[(&str, BinaryOp)],
        mut next: impl FnMut(&mut Self) -> VimResult<Option<Expression>>,
    ) -> VimResult<Option<Expression>> {
        let Some(mut lhs) = next(self)? else {
            return Ok(None);
        };
        'outer: loop {
            let snap = self.cur;
            self.cur.skip_whitespace();
            for (token, op) in ops {
                let before = self.cur;
                if !self.cur.eat_str(token) {
                    continue;
                }
                self.cur.skip_whitespace();
                if let Some(rhs) = next(self)? {
                    lhs = Expression::binary(lhs, *op, rhs);
                    continue 'outer;
                }
                self.cur = before;
            }
            self.cur = snap;
            return Ok(Some(lhs));
        }
    }

    /// `!`, unary `-`, unary `+`. Right-nested: `!-x` negates then nots.
    pub(crate) fn unary(&mut self) -> VimResult<Option<Expression>> {
        let op = match self.cur.current() {
            b'!' => UnaryOp::Not,
            b'-' => UnaryOp::Minus,
            b'+' => UnaryOp::Plus,
            _ => return self.postfix(),
        };
        let snap = self.cur;
        self.cur.advance();
        self.cur.skip_whitespace();
        match self.unary()? {
            Some(operand) => Ok(Some(Expression::unary(op, operand))),
            None => {
                self.cur = snap;
                Ok(None)
            }
        }
    }
}
