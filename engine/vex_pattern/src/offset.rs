//! Search offsets: the `e+1` in `/pattern/e+1`.

use vex_error::{VimError, VimResult};
use vex_host::{EditorConfig, EditorContext, Position, SearchDirection, Span};
use vex_ir::numeric;

use crate::{parse_search_string, Pattern};

/// Where the cursor lands relative to a match. See `:help search-offset`.
#[derive(Clone, Debug)]
pub enum SearchOffset {
    /// `+n`/`-n`: n lines below/above the end of the match, column 0.
    /// `Lines(0)` is the no-op offset.
    Lines(i64),
    /// `s`/`b` forms: n characters from the start of the match.
    CharsFromStart(i64),
    /// `e` forms: n characters from the end of the match.
    CharsFromEnd(i64),
    /// `;/pat` and `;?pat`: chain into another search from the match.
    Pattern {
        direction: SearchDirection,
        pattern: Box<Pattern>,
        offset: Option<Box<SearchOffset>>,
    },
}

impl SearchOffset {
    /// Parse an offset from the front of `input`. `Ok((None, input))` when
    /// no offset is present.
    pub fn parse<'a>(
        input: &'a str,
        config: &EditorConfig,
    ) -> VimResult<(Option<SearchOffset>, &'a str)> {
        if let Some(tail) = input.strip_prefix(";/") {
            return Self::parse_chained(tail, SearchDirection::Forward, config);
        }
        if let Some(tail) = input.strip_prefix(";?") {
            return Self::parse_chained(tail, SearchDirection::Backward, config);
        }

        let mut rest = input;
        let type_char = match rest.chars().next() {
            Some(c @ ('e' | 's' | 'b')) => {
                rest = &rest[1..];
                Some(c)
            }
            _ => None,
        };

        let sign = match rest.chars().next() {
            Some('+') => {
                rest = &rest[1..];
                Some(1)
            }
            Some('-') => {
                rest = &rest[1..];
                Some(-1)
            }
            _ => None,
        };

        let delta = match (sign, numeric::parse_number_prefix(rest)) {
            (Some(sign), Some((n, len))) => {
                rest = &rest[len..];
                sign * n
            }
            (Some(sign), None) => sign,
            (None, Some((n, len))) if rest.starts_with(|c: char| c.is_ascii_digit()) => {
                rest = &rest[len..];
                n
            }
            (None, _) => {
                if type_char.is_none() {
                    return Ok((None, input));
                }
                0
            }
        };

        let offset = match type_char {
            None => SearchOffset::Lines(delta),
            Some('e') => SearchOffset::CharsFromEnd(delta),
            Some(_) => SearchOffset::CharsFromStart(delta),
        };
        Ok((Some(offset), rest))
    }

    fn parse_chained<'a>(
        input: &'a str,
        direction: SearchDirection,
        config: &EditorConfig,
    ) -> VimResult<(Option<SearchOffset>, &'a str)> {
        let (search, rest) = parse_search_string(input, direction, false, config)?;
        Ok((
            Some(SearchOffset::Pattern {
                direction,
                pattern: Box::new(search.pattern),
                offset: search.offset.map(Box::new),
            }),
            rest,
        ))
    }

    /// The cursor position this offset selects for a given match.
    pub fn apply(&self, ctx: &dyn EditorContext, matched: Span) -> VimResult<Position> {
        match self {
            SearchOffset::Lines(0) => Ok(matched.start),
            SearchOffset::Lines(delta) => {
                let line = i64::from(matched.end.line) + delta;
                let line = line.clamp(0, i64::from(ctx.line_count().saturating_sub(1)));
                Ok(Position {
                    line: line as u32,
                    character: 0,
                })
            }
            SearchOffset::CharsFromStart(delta) => {
                Ok(offset_position(ctx, matched.start, *delta))
            }
            SearchOffset::CharsFromEnd(delta) => Ok(offset_position(ctx, matched.end, delta - 1)),
            SearchOffset::Pattern {
                direction,
                pattern,
                offset,
            } => {
                let span = match direction {
                    SearchDirection::Forward => pattern.next_match(ctx, matched.start),
                    SearchDirection::Backward => pattern.prev_match(ctx, matched.start),
                };
                let Some(span) = span else {
                    return Err(VimError::PatternNotFound(pattern.pattern_string.clone()));
                };
                match offset {
                    Some(offset) => offset.apply(ctx, span),
                    None => Ok(span.start),
                }
            }
        }
    }
}

/// Move `delta` characters through line breaks, clamped to the document.
fn offset_position(ctx: &dyn EditorContext, pos: Position, delta: i64) -> Position {
    let base = ctx.offset_at(pos) as i64;
    let target = (base + delta).max(0) as usize;
    ctx.position_at(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vex_host::ScratchBuffer;

    fn parse(input: &str) -> (Option<SearchOffset>, &str) {
        SearchOffset::parse(input, &EditorConfig::default()).unwrap()
    }

    #[test]
    fn line_offsets() {
        assert!(matches!(parse("+2"), (Some(SearchOffset::Lines(2)), "")));
        assert!(matches!(parse("-1"), (Some(SearchOffset::Lines(-1)), "")));
        assert!(matches!(parse("3"), (Some(SearchOffset::Lines(3)), "")));
        assert!(matches!(parse("+"), (Some(SearchOffset::Lines(1)), "")));
        assert!(matches!(parse("-"), (Some(SearchOffset::Lines(-1)), "")));
    }

    #[test]
    fn character_offsets() {
        assert!(matches!(
            parse("e"),
            (Some(SearchOffset::CharsFromEnd(0)), "")
        ));
        assert!(matches!(
            parse("e-2"),
            (Some(SearchOffset::CharsFromEnd(-2)), "")
        ));
        assert!(matches!(
            parse("s+3"),
            (Some(SearchOffset::CharsFromStart(3)), "")
        ));
        assert!(matches!(
            parse("b2"),
            (Some(SearchOffset::CharsFromStart(2)), "")
        ));
    }

    #[test]
    fn absent_offset_leaves_input_alone() {
        let (offset, rest) = parse(",$d");
        assert!(offset.is_none());
        assert_eq!(rest, ",$d");
    }

    #[test]
    fn chained_search_offset() {
        let (offset, rest) = parse(";/bar");
        match offset {
            Some(SearchOffset::Pattern {
                direction, pattern, ..
            }) => {
                assert_eq!(direction, SearchDirection::Forward);
                assert_eq!(pattern.pattern_string, "bar");
            }
            other => panic!("unexpected offset: {other:?}"),
        }
        assert_eq!(rest, "");
    }

    #[test]
    fn line_offset_lands_on_column_zero() {
        let buf = ScratchBuffer::from_text("one\ntwo\nthree\n");
        let matched = Span {
            start: Position {
                line: 0,
                character: 1,
            },
            end: Position {
                line: 0,
                character: 3,
            },
        };
        let pos = SearchOffset::Lines(1).apply(&buf, matched).unwrap();
        assert_eq!((pos.line, pos.character), (1, 0));
    }

    #[test]
    fn end_offset_is_inclusive() {
        let buf = ScratchBuffer::from_text("abcdef\n");
        let matched = Span {
            start: Position {
                line: 0,
                character: 1,
            },
            end: Position {
                line: 0,
                character: 4,
            },
        };
        // `e` puts the cursor on the last matched character
        let pos = SearchOffset::CharsFromEnd(0).apply(&buf, matched).unwrap();
        assert_eq!((pos.line, pos.character), (0, 3));
    }
}
