// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

const SCROLL_PAGE: u16 = 10;

/// Transient text typed into the editor; only exists while editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    text: String,
    cursor: usize,
}

impl EditBuffer {
    pub fn seeded(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            cursor: text.chars().count(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert(&mut self, ch: char) {
        let at = self.byte_offset(self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.text.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.char_len() {
            return;
        }
        let at = self.byte_offset(self.cursor);
        self.text.remove(at);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// The value written on commit: surrounding whitespace and newlines
    /// are dropped.
    pub fn committed_value(&self) -> String {
        self.text.trim().to_owned()
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.text
            .char_indices()
            .nth(chars)
            .map_or(self.text.len(), |(offset, _)| offset)
    }
}

/// The cell captured when a modal opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalSession {
    pub row: usize,
    pub column: usize,
    pub field: Option<String>,
    pub text: String,
    pub scroll: u16,
    pub edit: Option<EditBuffer>,
}

impl ModalSession {
    pub fn view(row: usize, column: usize, field: Option<String>, text: String) -> Self {
        Self {
            row,
            column,
            field,
            text,
            scroll: 0,
            edit: None,
        }
    }

    pub fn edit(row: usize, column: usize, field: Option<String>, text: String) -> Self {
        let edit = Some(EditBuffer::seeded(&text));
        Self {
            edit,
            ..Self::view(row, column, field, text)
        }
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let max = self.text.lines().count().saturating_sub(1);
        let max = u16::try_from(max).unwrap_or(u16::MAX);
        let next = i32::from(self.scroll) + delta;
        self.scroll = u16::try_from(next.max(0)).unwrap_or(u16::MAX).min(max);
    }

    pub fn scroll_page(&mut self, down: bool) {
        let delta = i32::from(SCROLL_PAGE);
        self.scroll_by(if down { delta } else { -delta });
    }
}

#[cfg(test)]
mod tests {
    use super::{EditBuffer, ModalSession};

    #[test]
    fn seeded_buffer_places_cursor_at_end() {
        let buffer = EditBuffer::seeded("héllo");
        assert_eq!(buffer.cursor(), 5);
        assert_eq!(buffer.text(), "héllo");
    }

    #[test]
    fn editing_respects_multibyte_cursor() {
        let mut buffer = EditBuffer::seeded("héllo");
        buffer.move_home();
        buffer.move_right();
        buffer.move_right();
        buffer.backspace();
        assert_eq!(buffer.text(), "hllo");
        buffer.insert('e');
        assert_eq!(buffer.text(), "hello");
        buffer.delete();
        assert_eq!(buffer.text(), "helo");
        buffer.move_end();
        buffer.delete();
        assert_eq!(buffer.text(), "helo");
    }

    #[test]
    fn committed_value_trims_whitespace_and_newlines() {
        let buffer = EditBuffer::seeded("\n  Paris \n\n");
        assert_eq!(buffer.committed_value(), "Paris");
    }

    #[test]
    fn scroll_is_bounded_by_line_count() {
        let mut session = ModalSession::view(0, 0, None, "a\nb\nc".to_owned());
        session.scroll_by(-3);
        assert_eq!(session.scroll, 0);
        session.scroll_page(true);
        assert_eq!(session.scroll, 2);
        session.scroll_by(-1);
        assert_eq!(session.scroll, 1);
    }

    #[test]
    fn edit_session_seeds_buffer_from_cell_text() {
        let session = ModalSession::edit(1, 1, Some("city".to_owned()), "London".to_owned());
        assert_eq!(session.edit.as_ref().map(EditBuffer::text), Some("London"));
        assert_eq!(session.scroll, 0);
    }
}
