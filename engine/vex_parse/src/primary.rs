//! Primary expressions: literals, containers, variables, calls, lambdas.

use vex_error::VimResult;
use vex_ir::{Expression, Namespace, OptionScope};

use crate::{is_ident, is_ident_start, ExprParser};

impl ExprParser<'_> {
    /// Alternatives in fixed order. A function call is tried before a plain
    /// variable so `abs(x)` does not stop at the variable `abs`; a capital
    /// first letter skips the call form entirely, so `F(x)` parses as the
    /// funcref variable `F` applied to `x`.
    pub(crate) fn primary(&mut self) -> VimResult<Option<Expression>> {
        if let Some(blob) = self.blob_literal()? {
            return Ok(Some(blob));
        }
        if let Some(float) = self.float_literal() {
            return Ok(Some(float));
        }
        if let Some(number) = self.number_literal() {
            return Ok(Some(number));
        }
        if let Some(string) = self.quoted_string()? {
            return Ok(Some(string));
        }
        if let Some(string) = self.literal_string()? {
            return Ok(Some(string));
        }
        if let Some(list) = self.list_literal()? {
            return Ok(Some(list));
        }
        if let Some(dict) = self.literal_key_dictionary()? {
            return Ok(Some(dict));
        }
        if self.cur.current() == b'{' {
            if let Some(dict) = self.dictionary()? {
                return Ok(Some(dict));
            }
            return self.lambda();
        }
        if let Some(option) = self.option_ref() {
            return Ok(Some(option));
        }
        if let Some(nested) = self.nested()? {
            return Ok(Some(nested));
        }
        if let Some(expr) = self.callable_or_variable()? {
            return Ok(Some(expr));
        }
        if let Some(env) = self.env_variable() {
            return Ok(Some(env));
        }
        Ok(self.register())
    }

    fn list_literal(&mut self) -> VimResult<Option<Expression>> {
        let snap = self.cur;
        if !self.cur.eat(b'[') {
            return Ok(None);
        }
        self.cur.skip_whitespace();
        let mut items = Vec::new();
        if self.cur.eat(b']') {
            return Ok(Some(Expression::List(items)));
        }
        loop {
            match self.ternary()? {
                Some(item) => items.push(item),
                None => {
                    self.cur = snap;
                    return Ok(None);
                }
            }
            self.cur.skip_whitespace();
            if self.cur.eat(b',') {
                self.cur.skip_whitespace();
                // trailing comma
                if self.cur.eat(b']') {
                    return Ok(Some(Expression::List(items)));
                }
                continue;
            }
            if self.cur.eat(b']') {
                return Ok(Some(Expression::List(items)));
            }
            self.cur = snap;
            return Ok(None);
        }
    }

    /// `{expr: expr, ...}`. Keys are arbitrary expressions, stringified at
    /// evaluation time. Fails softly so `{x -> x}` can retry as a lambda.
    fn dictionary(&mut self) -> VimResult<Option<Expression>> {
        let snap = self.cur;
        if !self.cur.eat(b'{') {
            return Ok(None);
        }
        self.cur.skip_whitespace();
        let mut items = Vec::new();
        if self.cur.eat(b'}') {
            return Ok(Some(Expression::Dictionary(items)));
        }
        loop {
            let Some(key) = self.ternary()? else {
                self.cur = snap;
                return Ok(None);
            };
            self.cur.skip_whitespace();
            if !self.cur.eat(b':') {
                self.cur = snap;
                return Ok(None);
            }
            self.cur.skip_whitespace();
            let Some(value) = self.ternary()? else {
                self.cur = snap;
                return Ok(None);
            };
            items.push((key, value));
            self.cur.skip_whitespace();
            if self.cur.eat(b',') {
                self.cur.skip_whitespace();
                if self.cur.eat(b'}') {
                    return Ok(Some(Expression::Dictionary(items)));
                }
                continue;
            }
            if self.cur.eat(b'}') {
                return Ok(Some(Expression::Dictionary(items)));
            }
            self.cur = snap;
            return Ok(None);
        }
    }

    /// `#{key: expr, ...}` with bare-word keys (letters, digits, `_`, `-`).
    fn literal_key_dictionary(&mut self) -> VimResult<Option<Expression>> {
        let snap = self.cur;
        if self.cur.current() != b'#' || self.cur.peek() != b'{' {
            return Ok(None);
        }
        self.cur.advance_n(2);
        self.cur.skip_whitespace();
        let mut items = Vec::new();
        if self.cur.eat(b'}') {
            return Ok(Some(Expression::Dictionary(items)));
        }
        loop {
            let key = self
                .cur
                .take_while(|b| is_ident(b) || b == b'-')
                .to_string();
            if key.is_empty() {
                self.cur = snap;
                return Ok(None);
            }
            self.cur.skip_whitespace();
            if !self.cur.eat(b':') {
                self.cur = snap;
                return Ok(None);
            }
            self.cur.skip_whitespace();
            let Some(value) = self.ternary()? else {
                self.cur = snap;
                return Ok(None);
            };
            items.push((Expression::String(key), value));
            self.cur.skip_whitespace();
            if self.cur.eat(b',') {
                self.cur.skip_whitespace();
                if self.cur.eat(b'}') {
                    return Ok(Some(Expression::Dictionary(items)));
                }
                continue;
            }
            if self.cur.eat(b'}') {
                return Ok(Some(Expression::Dictionary(items)));
            }
            self.cur = snap;
            return Ok(None);
        }
    }

    /// `{params -> body}`. Tried only after the dictionary form fails.
    fn lambda(&mut self) -> VimResult<Option<Expression>> {
        let snap = self.cur;
        if !self.cur.eat(b'{') {
            return Ok(None);
        }
        self.cur.skip_whitespace();
        let mut params = Vec::new();
        if is_ident_start(self.cur.current()) {
            loop {
                params.push(self.cur.take_while(is_ident).to_string());
                self.cur.skip_whitespace();
                if self.cur.eat(b',') {
                    self.cur.skip_whitespace();
                    continue;
                }
                break;
            }
        }
        if !self.cur.eat_str("->") {
            self.cur = snap;
            return Ok(None);
        }
        self.cur.skip_whitespace();
        let Some(body) = self.ternary()? else {
            self.cur = snap;
            return Ok(None);
        };
        self.cur.skip_whitespace();
        if !self.cur.eat(b'}') {
            self.cur = snap;
            return Ok(None);
        }
        Ok(Some(Expression::Lambda {
            params,
            body: Box::new(body),
        }))
    }

    /// `&name`, `&g:name`, `&l:name`.
    fn option_ref(&mut self) -> Option<Expression> {
        let snap = self.cur;
        if !self.cur.eat(b'&') {
            return None;
        }
        let scope = match (self.cur.current(), self.cur.peek()) {
            (b'g', b':') => {
                self.cur.advance_n(2);
                Some(OptionScope::Global)
            }
            (b'l', b':') => {
                self.cur.advance_n(2);
                Some(OptionScope::Local)
            }
            _ => None,
        };
        let name = self.cur.take_while(|b| b.is_ascii_lowercase()).to_string();
        if name.is_empty() {
            self.cur = snap;
            return None;
        }
        Some(Expression::Option { scope, name })
    }

    fn nested(&mut self) -> VimResult<Option<Expression>> {
        let snap = self.cur;
        if !self.cur.eat(b'(') {
            return Ok(None);
        }
        self.cur.skip_whitespace();
        if let Some(inner) = self.ternary()? {
            self.cur.skip_whitespace();
            if self.cur.eat(b')') {
                return Ok(Some(inner));
            }
        }
        self.cur = snap;
        Ok(None)
    }

    fn callable_or_variable(&mut self) -> VimResult<Option<Expression>> {
        let snap = self.cur;

        // Built-in function names are lowercase; try `name(args)` first.
        let func = self
            .cur
            .take_while(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
        if !func.is_empty() {
            let func = func.to_string();
            self.cur.skip_whitespace();
            if self.cur.current() == b'(' {
                if let Some(args) = self.call_args()? {
                    return Ok(Some(Expression::FunctionCall { func, args }));
                }
            }
            self.cur = snap;
        }

        // `ns:name` or a bare name.
        let namespace = match (
            Namespace::from_char(self.cur.current() as char),
            self.cur.peek(),
        ) {
            (Some(ns), b':') if is_ident_start(self.cur.rest().as_bytes().get(2).copied().unwrap_or(0)) => {
                self.cur.advance_n(2);
                Some(ns)
            }
            _ => None,
        };
        if !is_ident_start(self.cur.current()) {
            self.cur = snap;
            return Ok(None);
        }
        let name = self.cur.take_while(is_ident).to_string();
        Ok(Some(Expression::Variable { namespace, name }))
    }

    /// `$NAME`.
    fn env_variable(&mut self) -> Option<Expression> {
        let snap = self.cur;
        if !self.cur.eat(b'$') {
            return None;
        }
        let name = self.cur.take_while(is_ident).to_string();
        if name.is_empty() {
            self.cur = snap;
            return None;
        }
        Some(Expression::EnvVariable { name })
    }

    /// `@r` for any single register character.
    fn register(&mut self) -> Option<Expression> {
        let snap = self.cur;
        if !self.cur.eat(b'@') {
            return None;
        }
        match self.cur.take_char() {
            Some(name) => Some(Expression::Register { name }),
            None => {
                self.cur = snap;
                None
            }
        }
    }
}
