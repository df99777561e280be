//! Running a pattern over a document.

use tracing::trace;
use vex_host::{EditorContext, Position, Span};

use crate::Pattern;

/// Upper bound on matches collected by [`Pattern::all_matches`]. Keeps a
/// pathological pattern (or an empty one) from scanning forever; results
/// past the cap are silently dropped, exactly as if the search had been
/// cut short.
pub const MAX_SEARCH_RANGES: usize = 1000;

/// One match: where it is, plus capture groups for replacement text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternMatch {
    pub span: Span,
    /// Group 0 is the whole match; unmatched groups are `None`.
    pub groups: Vec<Option<String>>,
}

/// What part of the document [`Pattern::all_matches`] walks.
#[derive(Clone, Copy, Debug)]
pub enum MatchScope {
    /// Ring order: matches at or after this position first, then the ones
    /// before it (wrapscan).
    FromPosition(Position),
    /// Restrict to an inclusive line range, starting at its first line.
    Lines { start: u32, end: u32 },
}

impl Pattern {
    /// The first match strictly after `from`, without wrapping.
    pub fn next_match(&self, ctx: &dyn EditorContext, from: Position) -> Option<Span> {
        if self.empty_branch {
            let offset = ctx.offset_at(from) + 1;
            let pos = ctx.position_at(offset);
            return Some(Span {
                start: pos,
                end: pos,
            });
        }
        let haystack = ctx.document_text();
        let start = ceil_char_boundary(&haystack, ctx.offset_at(from) + 1);
        if start > haystack.len() {
            return None;
        }
        self.regex.find_at(&haystack, start).map(|m| Span {
            start: ctx.position_at(m.start()),
            end: ctx.position_at(m.end()),
        })
    }

    /// The last match starting strictly before `from`, without wrapping.
    pub fn prev_match(&self, ctx: &dyn EditorContext, from: Position) -> Option<Span> {
        if self.empty_branch {
            let offset = ctx.offset_at(from).saturating_sub(1);
            let pos = ctx.position_at(offset);
            return Some(Span {
                start: pos,
                end: pos,
            });
        }
        let haystack = ctx.document_text();
        let limit = ctx.offset_at(from);
        let mut found = None;
        let mut at = 0;
        while let Some(m) = self.regex.find_at(&haystack, at) {
            if m.start() >= limit {
                break;
            }
            found = Some(Span {
                start: ctx.position_at(m.start()),
                end: ctx.position_at(m.end()),
            });
            at = ceil_char_boundary(&haystack, if m.is_empty() { m.end() + 1 } else { m.end() });
            if at > haystack.len() {
                break;
            }
        }
        found
    }

    /// Every match in the document, in document order. Scoped to a position,
    /// the scan starts there and wraps around the end (wrapscan), so the cap
    /// favors matches near the start point; the wrapped-around matches are
    /// spliced back in front to restore document order.
    ///
    /// With a `\%V` pattern and a previous visual selection, only that
    /// selection is searched.
    pub fn all_matches(&self, ctx: &dyn EditorContext, scope: MatchScope) -> Vec<PatternMatch> {
        if self.empty_branch {
            // matches every position; collapse to one whole-document range
            let end = ctx.position_at(usize::MAX);
            return vec![PatternMatch {
                span: Span {
                    start: Position {
                        line: 0,
                        character: 0,
                    },
                    end,
                },
                groups: vec![],
            }];
        }

        let (from_position, line_range) = match scope {
            MatchScope::FromPosition(pos) => (pos, None),
            MatchScope::Lines { start, end } => (
                Position {
                    line: start,
                    character: 0,
                },
                Some((start, end)),
            ),
        };

        let selection = if self.in_selection {
            ctx.last_visual_selection()
        } else {
            None
        };
        let full_text = ctx.document_text();
        let (haystack, search_offset): (&str, usize) = match selection {
            Some(sel) => {
                let lo = ctx.offset_at(sel.start);
                let hi = ctx.offset_at(sel.end);
                (&full_text[lo..hi], lo)
            }
            None => (full_text.as_str(), 0),
        };
        let start_offset = ctx
            .offset_at(from_position)
            .saturating_sub(search_offset)
            .min(haystack.len());

        let mut before_wrapping = Vec::new();
        let mut after_wrapping = Vec::new();
        let mut wrapped_over = false;
        let mut at = ceil_char_boundary(haystack, start_offset);
        loop {
            let found = if at <= haystack.len() {
                self.regex.captures_at(haystack, at)
            } else {
                None
            };
            let Some(caps) = found else {
                if wrapped_over {
                    break;
                }
                at = 0;
                wrapped_over = true;
                continue;
            };
            let Some(whole) = caps.get(0) else {
                break;
            };
            if wrapped_over && whole.start() >= start_offset {
                // back to the first match
                break;
            }

            let span = Span {
                start: ctx.position_at(search_offset + whole.start()),
                end: ctx.position_at(search_offset + whole.end()),
            };
            if let Some((first, last)) = line_range {
                if selection.is_none() && (span.start.line < first || span.end.line > last) {
                    break;
                }
            }

            let groups = caps
                .iter()
                .map(|g| g.map(|m| m.as_str().to_string()))
                .collect();
            let bucket = if wrapped_over {
                &mut after_wrapping
            } else {
                &mut before_wrapping
            };
            bucket.push(PatternMatch { span, groups });

            if before_wrapping.len() + after_wrapping.len() >= MAX_SEARCH_RANGES {
                trace!(pattern = %self.pattern_string, "match cap reached");
                break;
            }

            // nudge past zero-length matches so the scan can't stall
            at = ceil_char_boundary(
                haystack,
                if whole.start() == whole.end() {
                    whole.end() + 1
                } else {
                    whole.end()
                },
            );
        }

        after_wrapping.extend(before_wrapping);
        after_wrapping
    }
}

/// Round `i` up to the next char boundary, saturating past the end.
fn ceil_char_boundary(s: &str, mut i: usize) -> usize {
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PatternParseOptions;
    use pretty_assertions::assert_eq;
    use vex_host::{EditorConfig, ScratchBuffer, SearchDirection};

    fn pattern(text: &str) -> Pattern {
        let (pattern, _) = Pattern::parse(
            text,
            PatternParseOptions::search(SearchDirection::Forward),
            &EditorConfig::default(),
        )
        .unwrap();
        pattern
    }

    fn spans(matches: &[PatternMatch]) -> Vec<(u32, u32)> {
        matches
            .iter()
            .map(|m| (m.span.start.line, m.span.start.character))
            .collect()
    }

    #[test]
    fn all_matches_wraps_and_restores_document_order() {
        let buf = ScratchBuffer::from_text("xa\nxb\nxc\n");
        let matches = pattern("x").all_matches(
            &buf,
            MatchScope::FromPosition(Position {
                line: 1,
                character: 0,
            }),
        );
        assert_eq!(spans(&matches), vec![(0, 0), (1, 0), (2, 0)]);
    }

    #[test]
    fn next_match_skips_the_current_position() {
        let buf = ScratchBuffer::from_text("foo foo foo");
        let span = pattern("foo")
            .next_match(
                &buf,
                Position {
                    line: 0,
                    character: 0,
                },
            )
            .unwrap();
        assert_eq!(span.start.character, 4);
    }

    #[test]
    fn prev_match_finds_the_last_before_cursor() {
        let buf = ScratchBuffer::from_text("foo foo foo");
        let span = pattern("foo")
            .prev_match(
                &buf,
                Position {
                    line: 0,
                    character: 8,
                },
            )
            .unwrap();
        assert_eq!(span.start.character, 4);
    }

    #[test]
    fn line_scope_stops_outside_the_range() {
        let buf = ScratchBuffer::from_text("x1\nx2\nx3\nx4\n");
        let matches = pattern("x").all_matches(&buf, MatchScope::Lines { start: 1, end: 2 });
        assert_eq!(spans(&matches), vec![(1, 0), (2, 0)]);
    }

    #[test]
    fn zero_length_matches_do_not_stall() {
        let buf = ScratchBuffer::from_text("ab");
        let matches = pattern("x*").all_matches(
            &buf,
            MatchScope::FromPosition(Position {
                line: 0,
                character: 0,
            }),
        );
        assert!(!matches.is_empty());
        assert!(matches.len() <= MAX_SEARCH_RANGES);
    }

    #[test]
    fn match_cap_is_enforced() {
        let text = "y".repeat(5000);
        let buf = ScratchBuffer::from_text(&text);
        let matches = pattern("y").all_matches(
            &buf,
            MatchScope::FromPosition(Position {
                line: 0,
                character: 0,
            }),
        );
        assert_eq!(matches.len(), MAX_SEARCH_RANGES);
    }

    #[test]
    fn case_insensitive_when_configured() {
        let buf = ScratchBuffer::from_text("Foo foo");
        let (pattern, _) = Pattern::parse(
            "foo",
            PatternParseOptions::search(SearchDirection::Forward),
            &EditorConfig {
                ignorecase: true,
                smartcase: false,
                hlsearch: false,
            },
        )
        .unwrap();
        let matches = pattern.all_matches(
            &buf,
            MatchScope::FromPosition(Position {
                line: 0,
                character: 0,
            }),
        );
        assert_eq!(matches.len(), 2);
    }
}
