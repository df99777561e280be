//! Literal tokens: numbers, floats, strings, blobs.

use vex_error::{VimError, VimResult};
use vex_ir::{numeric, Expression};

use crate::ExprParser;

impl ExprParser<'_> {
    /// `0z` followed by hex pairs: `0zAB12`. An odd digit count is a hard
    /// error (E973); `0z` with no digits at all is not a blob.
    pub(crate) fn blob_literal(&mut self) -> VimResult<Option<Expression>> {
        let snap = self.cur;
        if self.cur.current() != b'0' || self.cur.peek() | 0x20 != b'z' {
            return Ok(None);
        }
        self.cur.advance_n(2);
        let hex = self.cur.take_while(|b| b.is_ascii_hexdigit());
        if hex.is_empty() {
            self.cur = snap;
            return Ok(None);
        }
        if hex.len() % 2 != 0 {
            return Err(VimError::BlobLiteralShouldHaveAnEvenNumberOfHexCharacters);
        }
        let bytes = hex
            .as_bytes()
            .chunks_exact(2)
            .map(|pair| {
                let hi = hex_digit(pair[0]);
                let lo = hex_digit(pair[1]);
                hi << 4 | lo
            })
            .collect();
        Ok(Some(Expression::Blob(bytes)))
    }

    /// `digits.digits` with an optional exponent. Tried before [`Self::number_literal`]
    /// so `1.5` is a float rather than `1` with trailing input.
    pub(crate) fn float_literal(&mut self) -> Option<Expression> {
        let (value, len) = numeric::parse_float_prefix(self.cur.rest())?;
        self.cur.advance_n(len);
        Some(Expression::Float(value))
    }

    pub(crate) fn number_literal(&mut self) -> Option<Expression> {
        let (value, len) = numeric::parse_number_prefix(self.cur.rest())?;
        self.cur.advance_n(len);
        Some(Expression::Number(value))
    }

    /// A double-quoted string with backslash escapes. `\n`, `\t`, `\\`, and
    /// `\"` translate; any other escaped character keeps its backslash.
    pub(crate) fn quoted_string(&mut self) -> VimResult<Option<Expression>> {
        let snap = self.cur;
        if !self.cur.eat(b'"') {
            return Ok(None);
        }
        let mut out = String::new();
        loop {
            match self.cur.take_char() {
                None => return Err(VimError::MissingQuote(snap.rest().to_string())),
                Some('"') => return Ok(Some(Expression::String(out))),
                Some('\\') => match self.cur.take_char() {
                    None => return Err(VimError::MissingQuote(snap.rest().to_string())),
                    Some('\\') => out.push('\\'),
                    Some('"') => out.push('"'),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                },
                Some(c) => out.push(c),
            }
        }
    }

    /// A single-quoted string. The only escape is `''` for a literal quote.
    pub(crate) fn literal_string(&mut self) -> VimResult<Option<Expression>> {
        let snap = self.cur;
        if !self.cur.eat(b'\'') {
            return Ok(None);
        }
        let mut out = String::new();
        loop {
            match self.cur.take_char() {
                None => return Err(VimError::MissingQuote(snap.rest().to_string())),
                Some('\'') => {
                    if self.cur.eat(b'\'') {
                        out.push('\'');
                    } else {
                        return Ok(Some(Expression::String(out)));
                    }
                }
                Some(c) => out.push(c),
            }
        }
    }
}

fn hex_digit(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}
