//! Byte cursor over the expression source.
//!
//! The cursor is [`Copy`], enabling cheap snapshots for backtracking: take a
//! copy before trying an alternative, and assign it back to undo. Reads past
//! the end return `0x00`, so lookahead never needs a bounds check.

/// A position in the source text.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str) -> Self {
        Cursor { src, pos: 0 }
    }

    /// The byte at the current position, or `0x00` at EOF.
    #[inline]
    pub fn current(&self) -> u8 {
        self.src.as_bytes().get(self.pos).copied().unwrap_or(0)
    }

    /// The byte one past the current position, or `0x00`.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.src.as_bytes().get(self.pos + 1).copied().unwrap_or(0)
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    #[inline]
    pub fn advance(&mut self) {
        self.pos += 1;
    }

    #[inline]
    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    /// Everything from the current position to the end.
    #[inline]
    pub fn rest(&self) -> &'a str {
        &self.src[self.pos.min(self.src.len())..]
    }

    /// Consume `b` if it is the current byte.
    #[inline]
    pub fn eat(&mut self, b: u8) -> bool {
        if self.current() == b {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume `s` if the source continues with it.
    #[inline]
    pub fn eat_str(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    /// Skip spaces and tabs.
    pub fn skip_whitespace(&mut self) {
        while matches!(self.current(), b' ' | b'\t') {
            self.pos += 1;
        }
    }

    /// Consume the longest run of bytes matching `pred`; may be empty.
    pub fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while !self.is_eof() && pred(self.current()) {
            self.pos += 1;
        }
        &self.src[start..self.pos]
    }

    /// Consume and return the full character at the current position.
    /// Handles multi-byte UTF-8 (register names, string contents).
    pub fn take_char(&mut self) -> Option<char> {
        let c = self.rest().chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }
}
