//! Character cursor for traversing source code.
//!
//! Tracks byte position and 1-based line/column as the tokenizer pulls
//! characters one at a time.

pub struct Cursor<'a> {
    source: &'a str,
    position: usize,
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    #[inline]
    pub fn current_char(&self) -> char {
        self.peek_char(0)
    }

    #[inline]
    pub fn peek_char(&self, offset: usize) -> char {
        self.source[self.position..]
            .chars()
            .nth(offset)
            .unwrap_or('\0')
    }

    /// Advances past the current character, returning it (or `'\0'` at EOF).
    pub fn advance(&mut self) -> char {
        if self.is_at_end() {
            return '\0';
        }
        let c = self.current_char();
        self.position += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_through_ascii() {
        let mut c = Cursor::new("ab");
        assert_eq!(c.current_char(), 'a');
        c.advance();
        assert_eq!(c.current_char(), 'b');
        c.advance();
        assert!(c.is_at_end());
    }

    #[test]
    fn tracks_line_and_column() {
        let mut c = Cursor::new("ab\ncd");
        c.advance();
        c.advance();
        assert_eq!((c.line(), c.column()), (1, 3));
        c.advance(); // '\n'
        assert_eq!((c.line(), c.column()), (2, 1));
    }

    #[test]
    fn handles_utf8() {
        let mut c = Cursor::new("αβ");
        assert_eq!(c.current_char(), 'α');
        c.advance();
        assert_eq!(c.current_char(), 'β');
    }
}
