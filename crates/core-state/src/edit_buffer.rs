//! Single-line edit buffer: code points plus a cursor.
//!
//! Invariant: `cursor <= chars.len()` after every operation. Offsets are in
//! code points, never bytes. Kill helpers return the removed span so the
//! caller can hand it to the kill ring; they never touch the ring themselves.

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    chars: Vec<char>,
    cursor: usize,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer holding `text` with the cursor at the end.
    pub fn from_text(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let cursor = chars.len();
        Self { chars, cursor }
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn at_end(&self) -> bool {
        self.cursor == self.chars.len()
    }

    pub fn set_cursor(&mut self, pos: usize) {
        self.cursor = pos.min(self.chars.len());
    }

    /// Text before the cursor.
    pub fn before_cursor(&self) -> String {
        self.chars[..self.cursor].iter().collect()
    }

    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }

    /// Replace the whole content; cursor moves to the end.
    pub fn set_text(&mut self, text: &str) {
        self.chars = text.chars().collect();
        self.cursor = self.chars.len();
    }

    pub fn insert_char(&mut self, c: char) {
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, s: &str) {
        let tail = self.chars.split_off(self.cursor);
        self.chars.extend(s.chars());
        self.cursor = self.chars.len();
        self.chars.extend(tail);
    }

    pub fn delete_backward(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.chars.remove(self.cursor);
        true
    }

    pub fn delete_forward(&mut self) -> bool {
        if self.at_end() {
            return false;
        }
        self.chars.remove(self.cursor);
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.at_end() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn move_home(&mut self) -> bool {
        let moved = self.cursor != 0;
        self.cursor = 0;
        moved
    }

    pub fn move_end(&mut self) -> bool {
        let moved = !self.at_end();
        self.cursor = self.chars.len();
        moved
    }

    /// Start of the word at or before the cursor (alphanumeric words).
    fn word_start_left(&self) -> usize {
        let mut pos = self.cursor;
        while pos > 0 && !is_word_char(self.chars[pos - 1]) {
            pos -= 1;
        }
        while pos > 0 && is_word_char(self.chars[pos - 1]) {
            pos -= 1;
        }
        pos
    }

    /// End of the word at or after the cursor (alphanumeric words).
    fn word_end_right(&self) -> usize {
        let len = self.chars.len();
        let mut pos = self.cursor;
        while pos < len && !is_word_char(self.chars[pos]) {
            pos += 1;
        }
        while pos < len && is_word_char(self.chars[pos]) {
            pos += 1;
        }
        pos
    }

    pub fn word_left(&mut self) -> bool {
        let target = self.word_start_left();
        let moved = target != self.cursor;
        self.cursor = target;
        moved
    }

    pub fn word_right(&mut self) -> bool {
        let target = self.word_end_right();
        let moved = target != self.cursor;
        self.cursor = target;
        moved
    }

    /// Remove `[start, end)` and return it. The cursor is placed at `start`.
    pub fn remove_range(&mut self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        let start = start.min(end);
        let removed: String = self.chars.drain(start..end).collect();
        self.cursor = start;
        removed
    }

    /// Replace `[start, end)` with `text`; the cursor lands after the insertion.
    pub fn replace_range(&mut self, start: usize, end: usize, text: &str) {
        self.remove_range(start, end);
        self.insert_str(text);
    }

    /// Ctrl-K: cursor to end of line.
    pub fn kill_to_end(&mut self) -> String {
        let end = self.chars.len();
        self.remove_range(self.cursor, end)
    }

    /// Ctrl-U: the whole line.
    pub fn kill_line(&mut self) -> String {
        let end = self.chars.len();
        self.remove_range(0, end)
    }

    /// Ctrl-W: whitespace-delimited word before the cursor, including the
    /// whitespace between it and the cursor.
    pub fn kill_word_backward(&mut self) -> String {
        let mut start = self.cursor;
        while start > 0 && self.chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !self.chars[start - 1].is_whitespace() {
            start -= 1;
        }
        self.remove_range(start, self.cursor)
    }

    /// Alt-Backspace: alphanumeric word before the cursor.
    pub fn kill_alnum_word_backward(&mut self) -> String {
        let start = self.word_start_left();
        self.remove_range(start, self.cursor)
    }

    /// Alt-D: from the cursor to the end of the next word.
    pub fn kill_word_forward(&mut self) -> String {
        let end = self.word_end_right();
        self.remove_range(self.cursor, end)
    }

    /// Ctrl-T: swap the characters around the cursor (the last two at end of line).
    pub fn transpose(&mut self) -> bool {
        let len = self.chars.len();
        if len < 2 || self.cursor == 0 {
            return false;
        }
        let right = if self.cursor == len { len - 1 } else { self.cursor };
        self.chars.swap(right - 1, right);
        self.cursor = (right + 1).min(len);
        true
    }
}
