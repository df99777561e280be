//! Postfix trailers: indexing, slicing, entry access, calls.
//!
//! Trailers attach directly to the preceding expression with no whitespace,
//! which is what separates `a.b` (entry access) from `a . b` (concatenation).

use vex_error::VimResult;
use vex_ir::Expression;

use crate::{is_ident, is_ident_start, ExprParser};

impl ExprParser<'_> {
    pub(crate) fn postfix(&mut self) -> VimResult<Option<Expression>> {
        let Some(mut expr) = self.primary()? else {
            return Ok(None);
        };
        loop {
            let snap = self.cur;
            match self.cur.current() {
                b'[' => match self.index_or_slice(expr)? {
                    Ok(indexed) => expr = indexed,
                    Err(original) => {
                        expr = original;
                        self.cur = snap;
                        break;
                    }
                },
                b'.' if is_ident(self.cur.peek()) => {
                    self.cur.advance();
                    let entry_name = self.cur.take_while(is_ident).to_string();
                    expr = Expression::Entry {
                        expression: Box::new(expr),
                        entry_name,
                    };
                }
                b'(' => match self.call_args()? {
                    Some(args) => {
                        expr = Expression::FuncrefCall {
                            expression: Box::new(expr),
                            args,
                        };
                    }
                    None => break,
                },
                b'-' if self.cur.peek() == b'>' => {
                    self.cur.advance_n(2);
                    if !is_ident_start(self.cur.current()) {
                        self.cur = snap;
                        break;
                    }
                    let method_name = self.cur.take_while(is_ident).to_string();
                    match self.call_args()? {
                        Some(args) => {
                            expr = Expression::MethodCall {
                                expression: Box::new(expr),
                                method_name,
                                args,
                            };
                        }
                        None => {
                            self.cur = snap;
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
        Ok(Some(expr))
    }

    /// After a `[`: either `[index]` or `[start? : end?]`. On failure the
    /// ownership of the base expression flows back out so the caller can
    /// restore it.
    #[allow(clippy::result_large_err)]
    fn index_or_slice(&mut self, expr: Expression) -> VimResult<Result<Expression, Expression>> {
        let snap = self.cur;
        self.cur.advance();
        self.cur.skip_whitespace();

        let start = if self.cur.current() == b':' {
            None
        } else {
            match self.ternary()? {
                Some(e) => Some(e),
                None => {
                    self.cur = snap;
                    return Ok(Err(expr));
                }
            }
        };
        self.cur.skip_whitespace();

        if self.cur.eat(b':') {
            self.cur.skip_whitespace();
            let end = if self.cur.current() == b']' {
                None
            } else {
                match self.ternary()? {
                    Some(e) => Some(e),
                    None => {
                        self.cur = snap;
                        return Ok(Err(expr));
                    }
                }
            };
            self.cur.skip_whitespace();
            if !self.cur.eat(b']') {
                self.cur = snap;
                return Ok(Err(expr));
            }
            return Ok(Ok(Expression::Slice {
                expression: Box::new(expr),
                start: start.map(Box::new),
                end: end.map(Box::new),
            }));
        }

        if self.cur.eat(b']') {
            if let Some(index) = start {
                return Ok(Ok(Expression::Index {
                    expression: Box::new(expr),
                    index: Box::new(index),
                }));
            }
        }
        self.cur = snap;
        Ok(Err(expr))
    }

    /// A parenthesized, comma-separated argument list. `None` restores the
    /// cursor when the parens do not form one.
    pub(crate) fn call_args(&mut self) -> VimResult<Option<Vec<Expression>>> {
        let snap = self.cur;
        if !self.cur.eat(b'(') {
            return Ok(None);
        }
        self.cur.skip_whitespace();
        let mut args = Vec::new();
        if self.cur.eat(b')') {
            return Ok(Some(args));
        }
        loop {
            match self.ternary()? {
                Some(arg) => args.push(arg),
                None => {
                    self.cur = snap;
                    return Ok(None);
                }
            }
            self.cur.skip_whitespace();
            if self.cur.eat(b',') {
                self.cur.skip_whitespace();
                continue;
            }
            if self.cur.eat(b')') {
                return Ok(Some(args));
            }
            self.cur = snap;
            return Ok(None);
        }
    }
}
