//! Single-line edit buffer shared by text and numeric inputs.
//!
//! The cursor is a character index, so multi-byte text never splits.

/// Text being edited plus cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    text: String,
    /// Cursor position in characters, `0..=char_count`.
    cursor: usize,
}

impl EditBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contents and puts the cursor at the end.
    pub fn load(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        self.cursor = self.char_count();
    }

    /// Returns the contents.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the cursor position in characters.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the number of characters.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Inserts a character at the cursor. Refused when `max_chars` is reached.
    pub fn insert(&mut self, c: char, max_chars: Option<usize>) -> bool {
        if max_chars.is_some_and(|max| self.char_count() >= max) {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
        true
    }

    /// Deletes the character before the cursor.
    pub fn delete_backward(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let at = self.byte_index(self.cursor - 1);
        self.text.remove(at);
        self.cursor -= 1;
        true
    }

    /// Deletes the character after the cursor.
    pub fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.char_count() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        true
    }

    /// Moves the cursor one character left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Moves the cursor one character right.
    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    /// Moves the cursor to the start.
    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }

    /// Moves the cursor to the end.
    pub fn move_to_end(&mut self) {
        self.cursor = self.char_count();
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_at_cursor() {
        let mut buffer = EditBuffer::new();
        buffer.load("hllo");
        buffer.move_to_start();
        buffer.move_right();
        assert!(buffer.insert('e', None));
        assert_eq!(buffer.text(), "hello");
        assert_eq!(buffer.cursor(), 2);
    }

    #[test]
    fn test_multibyte_editing() {
        let mut buffer = EditBuffer::new();
        buffer.load("añb");
        buffer.move_left();
        assert!(buffer.delete_backward());
        assert_eq!(buffer.text(), "ab");
        assert!(buffer.delete_forward());
        assert_eq!(buffer.text(), "a");
    }

    #[test]
    fn test_max_chars() {
        let mut buffer = EditBuffer::new();
        assert!(buffer.insert('a', Some(2)));
        assert!(buffer.insert('b', Some(2)));
        assert!(!buffer.insert('c', Some(2)));
        assert_eq!(buffer.text(), "ab");
    }

    #[test]
    fn test_boundaries() {
        let mut buffer = EditBuffer::new();
        assert!(!buffer.delete_backward());
        assert!(!buffer.delete_forward());
        buffer.move_left();
        assert_eq!(buffer.cursor(), 0);
    }
}
