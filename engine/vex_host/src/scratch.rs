//! In-memory [`EditorContext`] used by tests across the workspace.

use rustc_hash::FxHashMap;

use crate::{
    EditorConfig, EditorContext, Mark, Position, SearchState, Span, SubstituteState,
};

/// A simple line-based buffer with cursor, marks, registers, and remembered
/// search state. Lines are joined with `\n`; there is no trailing newline.
#[derive(Clone, Debug, Default)]
pub struct ScratchBuffer {
    lines: Vec<String>,
    cursor: Position,
    marks: FxHashMap<char, Mark>,
    registers: FxHashMap<char, String>,
    last_visual: Option<Span>,
    search: Option<SearchState>,
    substitute: Option<SubstituteState>,
    config: EditorConfig,
}

impl ScratchBuffer {
    /// Build a buffer from text, splitting on `\n`.
    pub fn from_text(text: &str) -> Self {
        ScratchBuffer {
            lines: text.split('\n').map(str::to_string).collect(),
            ..ScratchBuffer::default()
        }
    }

    pub fn with_cursor(mut self, line: u32, character: u32) -> Self {
        self.cursor = Position::new(line, character);
        self
    }

    pub fn with_mark(mut self, name: char, position: Position) -> Self {
        self.marks.insert(
            name,
            Mark {
                position,
                in_current_document: true,
            },
        );
        self
    }

    pub fn with_foreign_mark(mut self, name: char, position: Position) -> Self {
        self.marks.insert(
            name,
            Mark {
                position,
                in_current_document: false,
            },
        );
        self
    }

    pub fn with_visual_selection(mut self, start: Position, end: Position) -> Self {
        self.last_visual = Some(Span::new(start, end));
        self
    }

    pub fn with_search_state(mut self, state: SearchState) -> Self {
        self.search = Some(state);
        self
    }

    pub fn with_substitute_state(mut self, state: SubstituteState) -> Self {
        self.substitute = Some(state);
        self
    }

    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }
}

impl EditorContext for ScratchBuffer {
    fn cursor_position(&self) -> Position {
        self.cursor
    }

    fn set_cursor_position(&mut self, pos: Position) {
        self.cursor = pos;
    }

    fn document_text(&self) -> String {
        self.lines.join("\n")
    }

    fn line_at(&self, line: u32) -> String {
        self.lines.get(line as usize).cloned().unwrap_or_default()
    }

    fn line_count(&self) -> u32 {
        self.lines.len() as u32
    }

    fn offset_at(&self, pos: Position) -> usize {
        let line = (pos.line as usize).min(self.lines.len().saturating_sub(1));
        let before: usize = self.lines[..line].iter().map(|l| l.len() + 1).sum();
        before + (pos.character as usize).min(self.lines[line].len())
    }

    fn position_at(&self, offset: usize) -> Position {
        let mut remaining = offset;
        for (idx, line) in self.lines.iter().enumerate() {
            if remaining <= line.len() {
                return Position::new(idx as u32, remaining as u32);
            }
            remaining -= line.len() + 1;
        }
        // Past the end: clamp to the last character of the last line.
        let last = self.lines.len().saturating_sub(1);
        Position::new(last as u32, self.lines.get(last).map_or(0, |l| l.len()) as u32)
    }

    fn get_mark(&self, name: char) -> Option<Mark> {
        self.marks.get(&name).copied()
    }

    fn get_register(&self, name: char) -> Option<String> {
        self.registers.get(&name).cloned()
    }

    fn set_register(&mut self, name: char, text: &str) {
        self.registers.insert(name, text.to_string());
    }

    fn last_visual_selection(&self) -> Option<Span> {
        self.last_visual
    }

    fn search_state(&self) -> Option<SearchState> {
        self.search.clone()
    }

    fn substitute_state(&self) -> Option<SubstituteState> {
        self.substitute.clone()
    }

    fn config(&self) -> EditorConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn offset_and_position_are_inverses() {
        let buf = ScratchBuffer::from_text("one\ntwo\nthree");
        for (line, character, offset) in [(0, 0, 0), (0, 3, 3), (1, 0, 4), (2, 4, 12)] {
            let pos = Position::new(line, character);
            assert_eq!(buf.offset_at(pos), offset);
            assert_eq!(buf.position_at(offset), pos);
        }
    }

    #[test]
    fn position_past_end_clamps() {
        let buf = ScratchBuffer::from_text("ab\ncd");
        assert_eq!(buf.position_at(100), Position::new(1, 2));
    }

    #[test]
    fn line_access() {
        let buf = ScratchBuffer::from_text("alpha\nbeta");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(1), "beta");
        assert_eq!(buf.line_at(9), "");
    }

    #[test]
    fn registers_round_trip() {
        let mut buf = ScratchBuffer::from_text("");
        buf.set_register('a', "yanked");
        assert_eq!(buf.get_register('a').as_deref(), Some("yanked"));
        assert_eq!(buf.get_register('b'), None);
    }
}
