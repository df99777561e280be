//! Search patterns for the vex engine.
//!
//! Vim pattern syntax is translated to the host regex engine at parse time;
//! matching walks the whole document with wraparound and a hard cap on the
//! number of collected matches.

mod offset;
mod pattern;
mod search;

pub use offset::SearchOffset;
pub use pattern::{Pattern, PatternParseOptions};
pub use search::{MatchScope, PatternMatch, MAX_SEARCH_RANGES};

use vex_error::VimResult;
use vex_host::{EditorConfig, SearchDirection};

/// A search string: pattern plus optional offset, as typed after `/` or `?`.
#[derive(Clone, Debug)]
pub struct SearchString {
    pub pattern: Pattern,
    pub offset: Option<SearchOffset>,
}

/// Parse `pattern[/offset]` from the front of `input`, returning what is
/// left over. The delimiter is implied by the direction.
pub fn parse_search_string<'a>(
    input: &'a str,
    direction: SearchDirection,
    ignore_smartcase: bool,
    config: &EditorConfig,
) -> VimResult<(SearchString, &'a str)> {
    let opts = PatternParseOptions {
        direction,
        delimiter: None,
        ignore_smartcase,
    };
    let (pattern, rest) = Pattern::parse(input, opts, config)?;
    let (offset, rest) = SearchOffset::parse(rest, config)?;
    Ok((SearchString { pattern, offset }, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pattern_with_offset_and_leftover() {
        let (search, rest) = parse_search_string(
            "foo/e+2 bar",
            SearchDirection::Forward,
            false,
            &EditorConfig::default(),
        )
        .unwrap();
        assert_eq!(search.pattern.pattern_string, "foo");
        assert!(matches!(search.offset, Some(SearchOffset::CharsFromEnd(2))));
        assert_eq!(rest, " bar");
    }

    #[test]
    fn unclosed_pattern_consumes_everything() {
        let (search, rest) = parse_search_string(
            "foo",
            SearchDirection::Backward,
            false,
            &EditorConfig::default(),
        )
        .unwrap();
        assert!(!search.pattern.closed);
        assert!(search.offset.is_none());
        assert_eq!(rest, "");
    }
}
