//! Editor capability surface consumed by the rest of the engine.
//!
//! The interpreter never touches a real text buffer, window, or register file
//! directly. Everything it needs from the host editor flows through the
//! [`EditorContext`] trait: cursor, document text, marks, registers, the last
//! visual selection, and remembered search/substitute state. The host
//! integration layer implements the trait once; the engine stays testable
//! against [`ScratchBuffer`], the in-memory implementation shipped here.

mod scratch;

pub use scratch::ScratchBuffer;

/// A zero-based (line, character) position in a document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Position { line, character }
    }
}

/// A half-structured span between two positions, `start <= end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    /// True when the span covers no characters.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Direction of a search, used by patterns and address resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchDirection {
    Forward,
    Backward,
}

/// A named mark position.
///
/// File (uppercase) marks may live in another document; the resolver treats
/// those as unset for range purposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mark {
    pub position: Position,
    /// False when this is a file mark pointing into a different document.
    pub in_current_document: bool,
}

/// Remembered state of the most recent search (`/`, `?`, `n`, ...).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchState {
    pub pattern_string: String,
    pub direction: SearchDirection,
}

/// Remembered state of the most recent `:substitute`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubstituteState {
    pub search_pattern: Option<String>,
}

/// Host-side options the engine reads but never writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditorConfig {
    /// 'ignorecase' — searches ignore case unless overridden.
    pub ignorecase: bool,
    /// 'smartcase' — an uppercase letter in the pattern restores sensitivity.
    pub smartcase: bool,
    /// 'hlsearch' — exposed to Vimscript as `v:hlsearch`.
    pub hlsearch: bool,
}

/// Everything the engine may ask of the host editor.
///
/// Implementations must be internally consistent: `offset_at` and
/// `position_at` are inverses over valid positions, and `document_text`
/// agrees with `line_at`/`line_count`.
pub trait EditorContext {
    fn cursor_position(&self) -> Position;
    /// Used by `;`-separated ranges, which resolve their right side relative
    /// to the left side's line.
    fn set_cursor_position(&mut self, pos: Position);

    fn document_text(&self) -> String;
    fn line_at(&self, line: u32) -> String;
    fn line_count(&self) -> u32;
    fn offset_at(&self, pos: Position) -> usize;
    fn position_at(&self, offset: usize) -> Position;

    fn get_mark(&self, name: char) -> Option<Mark>;
    fn get_register(&self, name: char) -> Option<String>;
    fn set_register(&mut self, name: char, text: &str);
    fn last_visual_selection(&self) -> Option<Span>;

    fn search_state(&self) -> Option<SearchState>;
    fn substitute_state(&self) -> Option<SubstituteState>;

    fn config(&self) -> EditorConfig;
}
