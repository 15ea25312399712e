/// Single-line editable buffer with a byte-offset cursor kept on a char
/// boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    buffer: String,
    cursor: usize,
}

impl TextField {
    /// Start editing `initial` with the cursor at the end.
    pub fn new(initial: impl Into<String>) -> Self {
        let buffer = initial.into();
        let cursor = buffer.len();
        Self { buffer, cursor }
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert(&mut self, ch: char) {
        self.buffer.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    /// Delete the char before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.prev_boundary();
            self.buffer.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    /// Delete the char under the cursor.
    pub fn delete_forward(&mut self) {
        let next = self.next_boundary();
        self.buffer.drain(self.cursor..next);
    }

    pub fn left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    pub fn right(&mut self) {
        self.cursor = self.next_boundary();
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.buffer.len();
    }

    fn prev_boundary(&self) -> usize {
        self.buffer[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.cursor
            + self.buffer[self.cursor..]
                .chars()
                .next()
                .map(|c| c.len_utf8())
                .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_multibyte_text() {
        let mut field = TextField::new("Vítima");
        field.left();
        field.left();
        field.left();
        field.left();
        field.backspace(); // removes 'í'
        assert_eq!(field.as_str(), "Vtima");
        field.insert('é');
        assert_eq!(field.as_str(), "Vétima");
        field.home();
        field.delete_forward();
        assert_eq!(field.as_str(), "étima");
        field.end();
        field.right();
        assert_eq!(field.cursor(), field.as_str().len());
    }

    #[test]
    fn backspace_at_start_is_noop() {
        let mut field = TextField::new("");
        field.backspace();
        field.delete_forward();
        assert_eq!(field.as_str(), "");
    }
}
