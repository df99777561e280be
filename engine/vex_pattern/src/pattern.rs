//! Pattern parsing: Vim regex syntax translated to the host regex engine.
//!
//! The translation is best-effort: atoms with a direct equivalent are
//! rewritten (`\<` and `\>` to `\b`, `\n` to `\r?\n`), case atoms (`\c`,
//! `\C`) and `\%V` are pulled out as flags, and everything else passes
//! through. A pattern that still fails to compile is retried with every
//! metacharacter escaped, so a malformed pattern degrades to a literal
//! search instead of an error.

use regex::Regex;
use tracing::debug;
use vex_error::{VimError, VimResult};
use vex_host::{EditorConfig, SearchDirection};

/// `^` and `$` must not match in the middle of a `\r\n` pair; CRLF mode
/// (`R`) takes care of that. Multi-line mode is always on because the
/// haystack is the whole document.
const BASE_FLAGS: &str = "mR";

/// A compiled search pattern.
#[derive(Clone, Debug)]
pub struct Pattern {
    /// The translated pattern text, without delimiters or offset.
    pub pattern_string: String,
    pub direction: SearchDirection,
    pub(crate) regex: Regex,
    /// Resolved case sensitivity after `\c`/`\C`, smartcase, 'ignorecase'.
    pub ignorecase: bool,
    /// `\%V`: restrict matches to the last visual selection.
    pub in_selection: bool,
    /// Whether a closing delimiter was present.
    pub closed: bool,
    /// A leading or trailing `|` makes the pattern match everywhere.
    pub(crate) empty_branch: bool,
}

/// How to parse a pattern string.
#[derive(Clone, Copy, Debug)]
pub struct PatternParseOptions {
    pub direction: SearchDirection,
    /// Delimiter ending the pattern. Defaults to `/` for forward searches
    /// and `?` for backward ones.
    pub delimiter: Option<char>,
    /// `:substitute` and friends ignore 'smartcase'.
    pub ignore_smartcase: bool,
}

impl PatternParseOptions {
    pub fn search(direction: SearchDirection) -> Self {
        PatternParseOptions {
            direction,
            delimiter: None,
            ignore_smartcase: false,
        }
    }

    pub fn delimited(direction: SearchDirection, delimiter: char) -> Self {
        PatternParseOptions {
            direction,
            delimiter: Some(delimiter),
            ignore_smartcase: false,
        }
    }
}

impl Pattern {
    /// Parse a pattern from the front of `input`, stopping at an unescaped
    /// delimiter or the end. Returns the pattern and the unconsumed rest
    /// (search offset, separator, ...).
    pub fn parse<'a>(
        input: &'a str,
        opts: PatternParseOptions,
        config: &EditorConfig,
    ) -> VimResult<(Pattern, &'a str)> {
        let delimiter = opts.delimiter.unwrap_or(match opts.direction {
            SearchDirection::Forward => '/',
            SearchDirection::Backward => '?',
        });

        let mut translated = String::new();
        let mut case_override: Option<bool> = None;
        let mut in_selection = false;
        let mut empty_branch = false;
        let mut closed = false;

        let mut rest = input;
        if let Some(tail) = rest.strip_prefix('|') {
            // a leading | has an empty branch before it
            empty_branch = true;
            translated.push('|');
            rest = tail;
        }

        while let Some(c) = rest.chars().next() {
            if c == delimiter {
                closed = true;
                rest = &rest[delimiter.len_utf8()..];
                break;
            }
            match c {
                '\\' => {
                    if let Some(tail) = rest.strip_prefix("\\%V") {
                        in_selection = true;
                        rest = tail;
                        continue;
                    }
                    rest = &rest[1..];
                    match rest.chars().next() {
                        None => translated.push_str("\\\\"),
                        Some(escaped) => {
                            rest = &rest[escaped.len_utf8()..];
                            if escaped == delimiter {
                                // literal; `?` as a backward delimiter would
                                // otherwise become a quantifier
                                translated.push_str(&regex::escape(&delimiter.to_string()));
                            } else {
                                match escaped {
                                    'c' => case_override = Some(true),
                                    'C' => {
                                        case_override.get_or_insert(false);
                                    }
                                    '<' | '>' => translated.push_str("\\b"),
                                    'n' => translated.push_str("\\r?\\n"),
                                    other => {
                                        translated.push('\\');
                                        translated.push(other);
                                    }
                                }
                            }
                        }
                    }
                }
                '|' if rest.len() == 1 => {
                    // trailing | has an empty branch after it
                    empty_branch = true;
                    translated.push('|');
                    rest = "";
                }
                '[' => {
                    // inside a class the delimiter needs no escape and ^/$
                    // keep their literal-ish meaning
                    match scan_char_class(rest) {
                        Some((class, tail)) => {
                            translated.push_str(&class);
                            rest = tail;
                        }
                        None => {
                            translated.push('[');
                            rest = &rest[1..];
                        }
                    }
                }
                _ => {
                    translated.push(c);
                    rest = &rest[c.len_utf8()..];
                }
            }
        }

        let ignorecase = resolve_ignorecase(&translated, case_override, opts, config);
        let regex = compile(&translated, ignorecase)?;
        Ok((
            Pattern {
                pattern_string: translated,
                direction: opts.direction,
                regex,
                ignorecase,
                in_selection,
                closed,
                empty_branch,
            },
            rest,
        ))
    }

    /// Whether the pattern matches anywhere in `text`. Used by the `=~`
    /// operator, which tests a string rather than a document.
    #[inline]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Consume a `[...]` class, translating inner escapes. `None` if the class
/// never closes.
fn scan_char_class(input: &str) -> Option<(String, &str)> {
    debug_assert!(input.starts_with('['));
    let mut out = String::from("[");
    let mut rest = &input[1..];
    loop {
        let c = rest.chars().next()?;
        match c {
            ']' => {
                out.push(']');
                return Some((out, &rest[1..]));
            }
            '\\' => {
                rest = &rest[1..];
                match rest.chars().next() {
                    None => out.push_str("\\\\"),
                    Some(escaped) => {
                        out.push('\\');
                        out.push(escaped);
                        rest = &rest[escaped.len_utf8()..];
                    }
                }
            }
            _ => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
}

/// `\c`/`\C` beat smartcase, smartcase beats 'ignorecase'.
fn resolve_ignorecase(
    pattern: &str,
    case_override: Option<bool>,
    opts: PatternParseOptions,
    config: &EditorConfig,
) -> bool {
    if let Some(forced) = case_override {
        return forced;
    }
    if config.smartcase && !opts.ignore_smartcase && pattern.bytes().any(|b| b.is_ascii_uppercase())
    {
        return false;
    }
    config.ignorecase
}

fn compile(pattern: &str, ignorecase: bool) -> VimResult<Regex> {
    let flags = if ignorecase {
        format!("(?i{BASE_FLAGS})")
    } else {
        format!("(?{BASE_FLAGS})")
    };
    match Regex::new(&format!("{flags}{pattern}")) {
        Ok(regex) => Ok(regex),
        Err(err) => {
            // fall back to a literal search
            debug!(pattern, %err, "pattern failed to compile, escaping");
            Regex::new(&format!("{flags}{}", regex::escape(pattern)))
                .map_err(|_| VimError::InvalidExpression(pattern.to_string()))
        }
    }
}
