//! Recursive-descent parser for Vimscript expressions.
//!
//! Nine precedence levels, from ternary at the top down to postfix trailers
//! and primaries. Backtracking uses [`Copy`] cursor snapshots; alternatives
//! fail softly with `Ok(None)` and only malformed literals (odd blob digits,
//! unterminated strings) abort the parse with a hard error.

use tracing::trace;
use vex_error::{VimError, VimResult};
use vex_ir::Expression;

mod cursor;
mod literals;
mod operators;
mod postfix;
mod primary;

use cursor::Cursor;


/// Parse a complete expression. Surrounding whitespace is ignored; anything
/// left over after the expression is E488.
pub fn parse(input: &str) -> VimResult<Expression> {
    let mut parser = ExprParser {
        cur: Cursor::new(input),
    };
    parser.cur.skip_whitespace();
    let Some(expr) = parser.ternary()? else {
        return Err(VimError::InvalidExpression(input.to_string()));
    };
    parser.cur.skip_whitespace();
    if !parser.cur.is_eof() {
        return Err(VimError::TrailingCharacters(parser.cur.rest().to_string()));
    }
    trace!(input, "parsed expression");
    Ok(expr)
}

pub(crate) struct ExprParser<'a> {
    pub(crate) cur: Cursor<'a>,
}

#[inline]
pub(crate) fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

#[inline]
pub(crate) fn is_ident(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
