use std::path::{Path, PathBuf};

use wlc_util::Position;

use crate::cursor::Cursor;
use crate::error::LexError;

/// Character classes `is_ascii_alphanumeric` covers identifiers and the
/// leading run of an int literal; the parser disambiguates the two by
/// checking whether the first character is a digit (§4.1, §4.5).
fn is_alnum(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// Characters that build a relational/logical operator run: `< = > | & !`.
fn is_rel_op(c: char) -> bool {
    matches!(c, '<' | '=' | '>' | '|' | '&' | '!')
}

/// Single-character arithmetic operators: `+ - / % *`.
fn is_arith_op(c: char) -> bool {
    matches!(c, '+' | '-' | '/' | '%' | '*')
}

/// Single-character punctuation, including the array/indirection/argument
/// forms `[ ] , @ ^` alongside `( ) :`.
fn is_punct(c: char) -> bool {
    matches!(c, '(' | ')' | ':' | '[' | ']' | ',' | '@' | '^')
}

fn is_string_delim(c: char) -> bool {
    matches!(c, '`' | '"' | '\'')
}

/// Pull-based tokenizer: `advance()` scans exactly one token on demand: the
/// parser drives it, and there is no explicit token list (§4.1).
pub struct Tokenizer<'a> {
    file: PathBuf,
    cursor: Cursor<'a>,

    current_token: String,
    token_start_line: u32,
    token_start_column: u32,

    preceded_by_newline: bool,
    end_of_file: bool,
    tab_level: u32,

    /// The logical line currently being accumulated (raw characters, not
    /// including the terminating `\n`).
    current_line: String,
    /// The most recently completed logical line — used for the `;<source-line>`
    /// comment the emitter attaches after each statement (§6).
    last_line: String,
}

impl<'a> Tokenizer<'a> {
    pub fn new(file: impl Into<PathBuf>, source: &'a str) -> Result<Self, LexError> {
        let mut t = Self {
            file: file.into(),
            cursor: Cursor::new(source),
            current_token: String::new(),
            token_start_line: 1,
            token_start_column: 1,
            preceded_by_newline: false,
            end_of_file: false,
            tab_level: 0,
            current_line: String::new(),
            last_line: String::new(),
        };
        t.advance()?;
        Ok(t)
    }

    pub fn current_token(&self) -> &str {
        &self.current_token
    }

    pub fn preceded_by_newline(&self) -> bool {
        self.preceded_by_newline
    }

    pub fn end_of_file(&self) -> bool {
        self.end_of_file
    }

    pub fn tab_level(&self) -> u32 {
        self.tab_level
    }

    pub fn last_line(&self) -> &str {
        &self.last_line
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Position of the *start* of the current token — used to anchor
    /// diagnostics at the token that actually triggered a failure.
    pub fn position(&self) -> Position {
        Position::new(self.file.clone(), self.token_start_line, self.token_start_column)
    }

    fn raw_advance(&mut self) -> char {
        let c = self.cursor.advance();
        if c == '\n' {
            self.last_line = std::mem::take(&mut self.current_line);
        } else if c != '\0' {
            self.current_line.push(c);
        }
        c
    }

    /// Scans exactly one token, per the class list of §4.1, and stores it as
    /// `current_token`. Comments are discarded and scanning restarts.
    pub fn advance(&mut self) -> Result<(), LexError> {
        loop {
            self.preceded_by_newline = false;
            self.skip_whitespace();

            self.token_start_line = self.cursor.line();
            self.token_start_column = self.cursor.column();
            self.current_token.clear();

            if self.cursor.is_at_end() {
                self.end_of_file = true;
                self.preceded_by_newline = true;
                return Ok(());
            }

            let c = self.cursor.current_char();

            if is_alnum(c) {
                while is_alnum(self.cursor.current_char()) {
                    self.current_token.push(self.raw_advance());
                }
                return Ok(());
            }

            if is_rel_op(c) {
                while is_rel_op(self.cursor.current_char()) {
                    self.current_token.push(self.raw_advance());
                }
                return Ok(());
            }

            if is_arith_op(c) {
                self.current_token.push(self.raw_advance());
                return Ok(());
            }

            if is_punct(c) {
                self.current_token.push(self.raw_advance());
                return Ok(());
            }

            if is_string_delim(c) {
                return self.scan_string(c);
            }

            if c == '#' {
                while self.cursor.current_char() != '\n' && !self.cursor.is_at_end() {
                    self.raw_advance();
                }
                continue;
            }

            let pos = self.position();
            return Err(LexError::UnexpectedChar(pos, c));
        }
    }

    fn scan_string(&mut self, delim: char) -> Result<(), LexError> {
        self.current_token.push(self.raw_advance()); // opening delimiter
        loop {
            if self.cursor.is_at_end() {
                return Err(LexError::UnterminatedString(self.position()));
            }
            let c = self.raw_advance();
            self.current_token.push(c);
            if c == delim {
                return Ok(());
            }
        }
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.cursor.current_char() {
                '\n' => {
                    self.preceded_by_newline = true;
                    self.tab_level = 0;
                    self.raw_advance();
                }
                '\t' => {
                    self.tab_level += 1;
                    self.raw_advance();
                }
                ' ' => {
                    self.raw_advance();
                }
                _ => return,
            }
        }
    }

    pub fn peek(&self, s: &str) -> bool {
        self.current_token == s
    }

    pub fn accept(&mut self, s: &str) -> Result<bool, LexError> {
        if self.peek(s) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Accepts `s`, or succeeds anyway because the current token is preceded
    /// by a newline (statements are terminated by `;` *or* a newline, §4.1).
    pub fn accept_or_newline(&mut self, s: &str) -> Result<bool, LexError> {
        if self.peek(s) {
            self.advance()?;
            return Ok(true);
        }
        Ok(self.preceded_by_newline)
    }

    pub fn expect(&mut self, s: &str) -> Result<(), crate::error::ExpectError> {
        if self.accept(s).map_err(crate::error::ExpectError::Lex)? {
            Ok(())
        } else {
            Err(crate::error::ExpectError::Mismatch {
                position: self.position(),
                expected: s.to_string(),
                found: self.current_token.clone(),
            })
        }
    }

    /// `;` or a newline terminates a statement (§4.1, §4.4).
    pub fn expect_end(&mut self) -> Result<(), crate::error::ExpectError> {
        if self
            .accept_or_newline(";")
            .map_err(crate::error::ExpectError::Lex)?
        {
            Ok(())
        } else {
            Err(crate::error::ExpectError::Mismatch {
                position: self.position(),
                expected: "';' or newline".to_string(),
                found: self.current_token.clone(),
            })
        }
    }
}
