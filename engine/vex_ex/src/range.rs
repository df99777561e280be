//! Line ranges: `{address}[,;{address}]`.

use std::fmt;

use tracing::trace;
use vex_error::{VimError, VimResult};
use vex_host::{EditorConfig, EditorContext, Position, Span};

use crate::address::{Address, LineSpecifier, Side};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Separator {
    Comma,
    /// `;` resolves the left address first and moves the cursor there, so
    /// the right address counts from it.
    Semicolon,
}

/// The 0-based inclusive line range an Ex command operates on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedRange {
    pub start: u32,
    pub end: u32,
}

#[derive(Clone, Debug)]
pub struct LineRange {
    pub start: Address,
    pub separator: Option<Separator>,
    pub end: Option<Address>,
}

impl LineRange {
    pub fn new(start: Address, separator: Option<Separator>, end: Option<Address>) -> Self {
        LineRange {
            start,
            separator,
            end,
        }
    }

    /// Parse a range from the front of `input`. A leading separator implies
    /// the current line as start; `Ok(None)` when no range is present.
    pub fn parse<'a>(
        input: &'a str,
        config: &EditorConfig,
    ) -> VimResult<Option<(LineRange, &'a str)>> {
        let (start, rest) = match Address::parse(input, config)? {
            Some((start, rest)) => (start, rest),
            None => (
                Address::new(LineSpecifier::CurrentLine, 0),
                input,
            ),
        };
        let had_start = rest.len() != input.len();
        let rest = rest.trim_start_matches([' ', '\t']);

        let (separator, rest) = match rest.chars().next() {
            Some(',') => (Some(Separator::Comma), &rest[1..]),
            Some(';') => (Some(Separator::Semicolon), &rest[1..]),
            _ if had_start => return Ok(Some((LineRange::new(start, None, None), rest))),
            _ => return Ok(None),
        };
        let rest = rest.trim_start_matches([' ', '\t']);

        let (end, rest) = match Address::parse(rest, config)? {
            Some((end, rest)) => (Some(end), rest),
            None => (None, rest),
        };
        Ok(Some((LineRange::new(start, separator, end), rest)))
    }

    /// Resolve to concrete lines. An `%` or `*` end specifier short-circuits
    /// to the whole file or the last visual selection; otherwise both sides
    /// resolve left-to-right, the cursor moves on `;`, and a backwards range
    /// is silently reversed.
    pub fn resolve(&self, ctx: &mut dyn EditorContext) -> VimResult<ResolvedRange> {
        let end = self.end.as_ref().unwrap_or(&self.start);

        match end.specifier {
            LineSpecifier::EntireFile => {
                return Ok(ResolvedRange {
                    start: 0,
                    end: ctx.line_count().saturating_sub(1),
                });
            }
            LineSpecifier::LastVisualRange => {
                let selection = ctx.last_visual_selection().ok_or(VimError::MarkNotSet)?;
                return Ok(ResolvedRange {
                    start: selection.start.line,
                    end: selection.end.line,
                });
            }
            _ => {}
        }

        let left = self.start.resolve(ctx, Side::Left)?;
        if self.separator == Some(Separator::Semicolon) {
            ctx.set_cursor_position(Position {
                line: left.max(0) as u32,
                character: 0,
            });
        }
        let right = end.resolve(ctx, Side::Right)?;

        let resolved = if left > right {
            // reversed; Vim would ask for confirmation, we just swap
            ResolvedRange {
                start: end.resolve(ctx, Side::Left)?.max(0) as u32,
                end: self.start.resolve(ctx, Side::Right)?.max(0) as u32,
            }
        } else {
            ResolvedRange {
                start: left.max(0) as u32,
                end: right.max(0) as u32,
            }
        };
        trace!(range = %self, ?resolved, "resolved line range");
        Ok(resolved)
    }

    /// Resolve, then widen to character positions: start of the first line
    /// through the end of the last.
    pub fn resolve_to_span(&self, ctx: &mut dyn EditorContext) -> VimResult<Span> {
        let ResolvedRange { start, end } = self.resolve(ctx)?;
        let end_character = ctx.line_at(end).chars().count() as u32;
        Ok(Span {
            start: Position {
                line: start,
                character: 0,
            },
            end: Position {
                line: end,
                character: end_character,
            },
        })
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)?;
        match self.separator {
            Some(Separator::Comma) => write!(f, ",")?,
            Some(Separator::Semicolon) => write!(f, ";")?,
            None => {}
        }
        if let Some(end) = &self.end {
            write!(f, "{end}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vex_host::{ScratchBuffer, SearchState, SearchDirection};

    fn parse(input: &str) -> (LineRange, &str) {
        LineRange::parse(input, &EditorConfig::default())
            .unwrap()
            .unwrap()
    }

    fn buffer() -> ScratchBuffer {
        ScratchBuffer::from_text("one\ntwo\nthree\nfour\nfive")
    }

    #[test]
    fn full_file_range() {
        let (range, rest) = parse("%d");
        assert_eq!(rest, "d");
        let mut buf = buffer();
        assert_eq!(
            range.resolve(&mut buf),
            Ok(ResolvedRange { start: 0, end: 4 })
        );
    }

    #[test]
    fn explicit_numbers() {
        let (range, _) = parse("2,4");
        let mut buf = buffer();
        assert_eq!(
            range.resolve(&mut buf),
            Ok(ResolvedRange { start: 1, end: 3 })
        );
    }

    #[test]
    fn missing_end_uses_start() {
        let (range, _) = parse("3");
        let mut buf = buffer();
        assert_eq!(
            range.resolve(&mut buf),
            Ok(ResolvedRange { start: 2, end: 2 })
        );
    }

    #[test]
    fn leading_separator_implies_current_line() {
        let (range, _) = parse(",$");
        let mut buf = buffer().with_cursor(1, 0);
        assert_eq!(
            range.resolve(&mut buf),
            Ok(ResolvedRange { start: 1, end: 4 })
        );
    }

    #[test]
    fn semicolon_moves_the_cursor_between_addresses() {
        let mut buf = buffer().with_cursor(0, 0);
        let (range, _) = parse(".+2;.+1");
        assert_eq!(
            range.resolve(&mut buf),
            Ok(ResolvedRange { start: 2, end: 3 })
        );

        // with a comma the second address still counts from the old cursor
        let mut buf = buffer().with_cursor(0, 0);
        let (range, _) = parse(".+2,.+1");
        assert_eq!(
            range.resolve(&mut buf),
            Ok(ResolvedRange { start: 1, end: 2 })
        );
    }

    #[test]
    fn reversed_range_is_swapped() {
        let (range, _) = parse("4,2");
        let mut buf = buffer();
        assert_eq!(
            range.resolve(&mut buf),
            Ok(ResolvedRange { start: 1, end: 3 })
        );
    }

    #[test]
    fn visual_range_specifiers() {
        let (range, _) = parse("'<,'>");
        let mut buf = buffer().with_visual_selection(
            Position {
                line: 1,
                character: 0,
            },
            Position {
                line: 3,
                character: 2,
            },
        );
        assert_eq!(
            range.resolve(&mut buf),
            Ok(ResolvedRange { start: 1, end: 3 })
        );

        let (range, _) = parse("*");
        assert_eq!(
            range.resolve(&mut buf),
            Ok(ResolvedRange { start: 1, end: 3 })
        );
    }

    #[test]
    fn pattern_addresses_search_from_cursor() {
        let mut buf = ScratchBuffer::from_text("alpha\nbeta\ngamma\nbeta\n").with_cursor(0, 0);
        let (range, _) = parse("/beta/,/beta/");
        assert_eq!(
            range.resolve(&mut buf),
            Ok(ResolvedRange { start: 1, end: 1 })
        );
    }

    #[test]
    fn last_search_pattern_address() {
        let mut buf = ScratchBuffer::from_text("a\nneedle\nb\n")
            .with_cursor(0, 0)
            .with_search_state(SearchState {
                pattern_string: String::from("needle"),
                direction: SearchDirection::Forward,
            });
        let (range, _) = parse("\\/");
        assert_eq!(
            range.resolve(&mut buf),
            Ok(ResolvedRange { start: 1, end: 1 })
        );

        let mut bare = ScratchBuffer::from_text("a\n");
        let (range, _) = parse("\\/");
        assert_eq!(
            range.resolve(&mut bare),
            Err(VimError::NoPreviousRegularExpression)
        );
    }

    #[test]
    fn display_round_trips() {
        for text in ["%", "2,4", ".,$", "'<,'>", ".+2;.+1"] {
            let (range, rest) = parse(text);
            assert_eq!(rest, "");
            assert_eq!(range.to_string(), *text);
        }
    }
}
