//! A single Ex address: line specifier plus accumulated offsets.

use std::fmt;

use vex_error::{VimError, VimResult};
use vex_host::{EditorConfig, EditorContext, SearchDirection};
use vex_pattern::{Pattern, PatternParseOptions};

/// The base of an address, before offsets. See `:help {address}`.
#[derive(Clone, Debug)]
pub enum LineSpecifier {
    /// `{number}` — 1-based; 0 addresses the line before the first.
    Number(i64),
    /// `.`
    CurrentLine,
    /// `$`
    LastLine,
    /// `%` — only meaningful as the whole range.
    EntireFile,
    /// `*` — the last visual selection.
    LastVisualRange,
    /// `'m`
    Mark(char),
    /// `/{pattern}[/]`
    PatternNext(Pattern),
    /// `?{pattern}[?]`
    PatternPrev(Pattern),
    /// `\/`
    LastSearchPatternNext,
    /// `\?`
    LastSearchPatternPrev,
    /// `\&`
    LastSubstitutePatternNext,
}

/// Which bound of the range an address resolves for. Only `*` cares: its
/// left side is the selection start, its right side the selection end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Clone, Debug)]
pub struct Address {
    pub specifier: LineSpecifier,
    /// Sum of trailing `+n`/`-n`/`n` offsets.
    pub offset: i64,
}

impl Address {
    pub fn new(specifier: LineSpecifier, offset: i64) -> Self {
        Address { specifier, offset }
    }

    /// Parse an address from the front of `input`. A bare offset (`+2`)
    /// counts from the current line; `Ok(None)` if no address is present.
    pub fn parse<'a>(
        input: &'a str,
        config: &EditorConfig,
    ) -> VimResult<Option<(Address, &'a str)>> {
        if let Some((specifier, rest)) = parse_specifier(input, config)? {
            let rest = rest.trim_start_matches([' ', '\t']);
            let (offset, rest) = parse_offset(rest).unwrap_or((0, rest));
            return Ok(Some((Address { specifier, offset }, rest)));
        }
        // no specifier: an offset alone is relative to the cursor
        match parse_offset(input) {
            Some((offset, rest)) => Ok(Some((
                Address {
                    specifier: LineSpecifier::CurrentLine,
                    offset,
                },
                rest,
            ))),
            None => Ok(None),
        }
    }

    /// The 0-based line this address names. `bounds_check` additionally
    /// rejects lines outside the document (E16); turn it off where line 0
    /// is meaningful (`:move 0` and friends).
    pub fn resolve_with(
        &self,
        ctx: &dyn EditorContext,
        side: Side,
        bounds_check: bool,
    ) -> VimResult<i64> {
        let line: i64 = match &self.specifier {
            LineSpecifier::Number(num) => {
                if bounds_check && *num == 0 {
                    0
                } else {
                    num - 1
                }
            }
            LineSpecifier::CurrentLine => i64::from(ctx.cursor_position().line),
            LineSpecifier::LastLine | LineSpecifier::EntireFile => {
                i64::from(ctx.line_count().saturating_sub(1))
            }
            LineSpecifier::LastVisualRange => {
                let selection = ctx.last_visual_selection().ok_or(VimError::MarkNotSet)?;
                i64::from(match side {
                    Side::Left => selection.start.line,
                    Side::Right => selection.end.line,
                })
            }
            // '< and '> are the visual selection bounds, not stored marks.
            LineSpecifier::Mark(name @ ('<' | '>')) => {
                let selection = ctx.last_visual_selection().ok_or(VimError::MarkNotSet)?;
                i64::from(if *name == '<' {
                    selection.start.line
                } else {
                    selection.end.line
                })
            }
            LineSpecifier::Mark(name) => {
                let mark = ctx.get_mark(*name).ok_or(VimError::MarkNotSet)?;
                if !mark.in_current_document {
                    return Err(VimError::MarkNotSet);
                }
                i64::from(mark.position.line)
            }
            LineSpecifier::PatternNext(pattern) => {
                let matched = pattern
                    .next_match(ctx, ctx.cursor_position())
                    .ok_or_else(|| VimError::PatternNotFound(pattern.pattern_string.clone()))?;
                i64::from(matched.start.line)
            }
            LineSpecifier::PatternPrev(pattern) => {
                let matched = pattern
                    .prev_match(ctx, ctx.cursor_position())
                    .ok_or_else(|| VimError::PatternNotFound(pattern.pattern_string.clone()))?;
                i64::from(matched.start.line)
            }
            LineSpecifier::LastSearchPatternNext => {
                i64::from(self.last_search_line(ctx, SearchDirection::Forward)?)
            }
            LineSpecifier::LastSearchPatternPrev => {
                i64::from(self.last_search_line(ctx, SearchDirection::Backward)?)
            }
            LineSpecifier::LastSubstitutePatternNext => {
                let state = ctx
                    .substitute_state()
                    .ok_or(VimError::NoPreviousSubstituteRegularExpression)?;
                let pattern_string = state
                    .search_pattern
                    .ok_or(VimError::NoPreviousSubstituteRegularExpression)?;
                let (pattern, _) = Pattern::parse(
                    &pattern_string,
                    PatternParseOptions::search(SearchDirection::Forward),
                    &ctx.config(),
                )?;
                let matched = pattern
                    .next_match(ctx, ctx.cursor_position())
                    .ok_or(VimError::PatternNotFound(pattern_string))?;
                i64::from(matched.start.line)
            }
        };

        let result = line + self.offset;
        if bounds_check && (result < 0 || result > i64::from(ctx.line_count())) {
            return Err(VimError::InvalidRange);
        }
        Ok(result)
    }

    pub fn resolve(&self, ctx: &dyn EditorContext, side: Side) -> VimResult<i64> {
        self.resolve_with(ctx, side, true)
    }

    fn last_search_line(
        &self,
        ctx: &dyn EditorContext,
        direction: SearchDirection,
    ) -> VimResult<u32> {
        let state = ctx
            .search_state()
            .ok_or(VimError::NoPreviousRegularExpression)?;
        let (pattern, _) = Pattern::parse(
            &state.pattern_string,
            PatternParseOptions::search(direction),
            &ctx.config(),
        )?;
        let matched = match direction {
            SearchDirection::Forward => pattern.next_match(ctx, ctx.cursor_position()),
            SearchDirection::Backward => pattern.prev_match(ctx, ctx.cursor_position()),
        };
        matched
            .map(|m| m.start.line)
            .ok_or(VimError::PatternNotFound(state.pattern_string))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.specifier {
            LineSpecifier::Number(num) => write!(f, "{num}")?,
            LineSpecifier::CurrentLine => write!(f, ".")?,
            LineSpecifier::LastLine => write!(f, "$")?,
            LineSpecifier::EntireFile => write!(f, "%")?,
            LineSpecifier::LastVisualRange => write!(f, "*")?,
            LineSpecifier::Mark(mark) => write!(f, "'{mark}")?,
            LineSpecifier::PatternNext(pattern) => write!(f, "/{}/", pattern.pattern_string)?,
            LineSpecifier::PatternPrev(pattern) => write!(f, "?{}?", pattern.pattern_string)?,
            LineSpecifier::LastSearchPatternNext => write!(f, "\\/")?,
            LineSpecifier::LastSearchPatternPrev => write!(f, "\\?")?,
            LineSpecifier::LastSubstitutePatternNext => write!(f, "\\&")?,
        }
        match self.offset {
            0 => Ok(()),
            n if n > 0 => write!(f, "+{n}"),
            n => write!(f, "{n}"),
        }
    }
}

fn parse_specifier<'a>(
    input: &'a str,
    config: &EditorConfig,
) -> VimResult<Option<(LineSpecifier, &'a str)>> {
    let mut chars = input.chars();
    let Some(first) = chars.next() else {
        return Ok(None);
    };
    let specifier = match first {
        // unsigned here: a leading `-` is an offset from the cursor
        '0'..='9' => {
            let (num, rest) = parse_digits(input).unwrap_or((0, input));
            return Ok(Some((LineSpecifier::Number(num), rest)));
        }
        '.' => LineSpecifier::CurrentLine,
        '$' => LineSpecifier::LastLine,
        '%' => LineSpecifier::EntireFile,
        '*' => LineSpecifier::LastVisualRange,
        '\'' => match chars.next() {
            Some(mark) => {
                return Ok(Some((
                    LineSpecifier::Mark(mark),
                    &input[1 + mark.len_utf8()..],
                )));
            }
            None => return Ok(None),
        },
        '/' => {
            let (pattern, rest) = Pattern::parse(
                &input[1..],
                PatternParseOptions::search(SearchDirection::Forward),
                config,
            )?;
            return Ok(Some((LineSpecifier::PatternNext(pattern), rest)));
        }
        '?' => {
            let (pattern, rest) = Pattern::parse(
                &input[1..],
                PatternParseOptions::search(SearchDirection::Backward),
                config,
            )?;
            return Ok(Some((LineSpecifier::PatternPrev(pattern), rest)));
        }
        '\\' => match chars.next() {
            Some('/') => LineSpecifier::LastSearchPatternNext,
            Some('?') => LineSpecifier::LastSearchPatternPrev,
            Some('&') => LineSpecifier::LastSubstitutePatternNext,
            _ => return Ok(None),
        },
        _ => return Ok(None),
    };
    let len = match first {
        '\\' => 2,
        c => c.len_utf8(),
    };
    Ok(Some((specifier, &input[len..])))
}

/// One or more `+n` / `-n` / `n` atoms, whitespace-separated, summed.
fn parse_offset(input: &str) -> Option<(i64, &str)> {
    let mut total = 0i64;
    let mut rest = input;
    let mut any = false;
    loop {
        let atom = match rest.chars().next() {
            Some('+') => {
                let tail = &rest[1..];
                match parse_digits(tail) {
                    Some((n, after)) => {
                        rest = after;
                        n
                    }
                    None => {
                        rest = tail;
                        1
                    }
                }
            }
            Some('-') => {
                let tail = &rest[1..];
                match parse_digits(tail) {
                    Some((n, after)) => {
                        rest = after;
                        -n
                    }
                    None => {
                        rest = tail;
                        -1
                    }
                }
            }
            Some(c) if c.is_ascii_digit() => {
                let (n, after) = parse_digits(rest)?;
                rest = after;
                n
            }
            _ => break,
        };
        total += atom;
        any = true;
        rest = rest.trim_start_matches([' ', '\t']);
    }
    any.then_some((total, rest))
}

/// Address numbers are always decimal; `:012` is line twelve.
fn parse_digits(input: &str) -> Option<(i64, &str)> {
    let len = input.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }
    let value = input[..len].parse::<i64>().unwrap_or(i64::MAX);
    Some((value, &input[len..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vex_host::{Position, ScratchBuffer};

    fn parse(input: &str) -> (Address, &str) {
        Address::parse(input, &EditorConfig::default())
            .unwrap()
            .unwrap()
    }

    #[test]
    fn specifier_forms() {
        assert!(matches!(
            parse("5").0.specifier,
            LineSpecifier::Number(5)
        ));
        assert!(matches!(parse(".").0.specifier, LineSpecifier::CurrentLine));
        assert!(matches!(parse("$").0.specifier, LineSpecifier::LastLine));
        assert!(matches!(parse("'a").0.specifier, LineSpecifier::Mark('a')));
        assert!(matches!(
            parse("\\&").0.specifier,
            LineSpecifier::LastSubstitutePatternNext
        ));
    }

    #[test]
    fn offsets_accumulate() {
        let (addr, rest) = parse(".+2-1+");
        assert_eq!(addr.offset, 2);
        assert_eq!(rest, "");
    }

    #[test]
    fn bare_offset_is_relative_to_cursor() {
        let (addr, _) = parse("+3");
        assert!(matches!(addr.specifier, LineSpecifier::CurrentLine));
        assert_eq!(addr.offset, 3);
        let (addr, _) = parse("-2");
        assert_eq!(addr.offset, -2);
    }

    #[test]
    fn pattern_address_stops_at_delimiter() {
        let (addr, rest) = parse("/foo/+1,$d");
        assert!(matches!(addr.specifier, LineSpecifier::PatternNext(_)));
        assert_eq!(addr.offset, 1);
        assert_eq!(rest, ",$d");
    }

    #[test]
    fn resolve_number_is_one_based() {
        let buf = ScratchBuffer::from_text("a\nb\nc\n");
        let (addr, _) = parse("2");
        assert_eq!(addr.resolve(&buf, Side::Left), Ok(1));
    }

    #[test]
    fn resolve_out_of_bounds_is_invalid_range() {
        let buf = ScratchBuffer::from_text("a\nb\n");
        let (addr, _) = parse("99");
        assert_eq!(addr.resolve(&buf, Side::Left), Err(VimError::InvalidRange));
    }

    #[test]
    fn resolve_mark_requires_it_set() {
        let buf = ScratchBuffer::from_text("a\nb\n").with_mark(
            'm',
            Position {
                line: 1,
                character: 0,
            },
        );
        let (addr, _) = parse("'m");
        assert_eq!(addr.resolve(&buf, Side::Left), Ok(1));
        let (addr, _) = parse("'z");
        assert_eq!(addr.resolve(&buf, Side::Left), Err(VimError::MarkNotSet));
    }

    #[test]
    fn foreign_file_mark_is_not_set() {
        let buf = ScratchBuffer::from_text("a\n").with_foreign_mark('A', Position::new(0, 0));
        let (addr, _) = parse("'A");
        assert_eq!(addr.resolve(&buf, Side::Left), Err(VimError::MarkNotSet));
    }

    #[test]
    fn display_round_trips() {
        for text in ["5", ".", "$", "%", "*", "'m", "\\/", "\\?", "\\&", ".+2"] {
            let (addr, rest) = parse(text);
            assert_eq!(rest, "");
            assert_eq!(addr.to_string(), *text);
        }
    }
}
