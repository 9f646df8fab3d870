use crate::error::CompileError;
use crate::parser::{ExprValue, Parser};

impl Parser<'_> {
    /// `int_literal` (§4.5, §9): a leading `-` without a following digit
    /// is a syntax error rather than the source's silent `0`.
    pub(crate) fn int_literal(&mut self) -> Result<Option<ExprValue>, CompileError> {
        let negative = self.tokenizer.accept("-")?;
        let token = self.tokenizer.current_token();
        let starts_with_digit = token.chars().next().is_some_and(|c| c.is_ascii_digit());

        if !starts_with_digit {
            return if negative {
                Err(self.fail("expected integer literal after '-'"))
            } else {
                Ok(None)
            };
        }

        let mut value: i64 = 0;
        for c in token.chars() {
            let digit = c
                .to_digit(10)
                .ok_or_else(|| self.fail(format!("invalid digit '{c}' in integer literal")))?;
            value = value * 10 + digit as i64;
        }
        if negative {
            value = -value;
        }

        self.emitter.push(format!("mov eax,{value}"));
        self.tokenizer.advance()?;
        Ok(Some(ExprValue::plain()))
    }

    /// A positive integer literal used for an array size (§4.4). Fatal if
    /// the current token isn't one.
    pub(crate) fn positive_int_literal(&mut self) -> Result<u32, CompileError> {
        let token = self.tokenizer.current_token();
        let starts_with_digit = token.chars().next().is_some_and(|c| c.is_ascii_digit());
        if !starts_with_digit {
            return Err(self.fail("expected a positive integer literal inside an array declaration"));
        }
        let value: u32 = token
            .parse()
            .map_err(|_| self.fail("array size literal is too large"))?;
        self.tokenizer.advance()?;
        Ok(value)
    }

    /// `string_literal` (§4.1e, §4.5): any of the three lexical string
    /// delimiters opens a literal. Emits the inline `call $+L; db "…",0;
    /// pop eax` trampoline and leaves the string's address in `eax`.
    pub(crate) fn string_literal(&mut self) -> Result<Option<ExprValue>, CompileError> {
        let token = self.tokenizer.current_token();
        let delim = token.chars().next();
        let is_string = matches!(delim, Some('"') | Some('`') | Some('\''));
        if !is_string {
            return Ok(None);
        }

        let (db_operand, length) = self.process_string(token)?;
        self.emitter
            .push(format!("call $ + {}", length + 1 + wlc_util::WORD_SIZE as usize));
        self.emitter.push(format!("db {db_operand}"));
        self.emitter.push("pop eax");
        self.tokenizer.advance()?;
        Ok(Some(ExprValue::plain()))
    }

    /// Builds the FASM `db` operand for a string token (delimiters
    /// included), processing the `\\` and `\n` escapes; any other escape
    /// is fatal (§4.5). Returns the operand text and the number of output
    /// bytes (excluding the trailing null terminator).
    fn process_string(&self, token: &str) -> Result<(String, usize), CompileError> {
        let chars: Vec<char> = token.chars().collect();
        let inner = &chars[1..chars.len() - 1];

        let mut out = String::from("\"");
        let mut quote_open = true;
        let mut length = 0usize;
        let mut i = 0;

        while i < inner.len() {
            let c = inner[i];
            if c == '\\' {
                let next = inner.get(i + 1).copied().ok_or_else(|| {
                    self.fail("unterminated escape sequence in string literal")
                })?;
                match next {
                    '\\' => {
                        if !quote_open {
                            out.push_str(", \"");
                            quote_open = true;
                        }
                        out.push('\\');
                    }
                    'n' => {
                        if quote_open {
                            out.push('"');
                            quote_open = false;
                        }
                        out.push_str(", 0ah");
                    }
                    other => {
                        return Err(self.fail(format!("unrecognized string escape character '{other}'")))
                    }
                }
                i += 1;
            } else {
                if !quote_open {
                    out.push_str(", \"");
                    quote_open = true;
                }
                out.push(c);
            }
            i += 1;
            length += 1;
        }

        if quote_open {
            out.push('"');
        }
        out.push_str(", 0");

        Ok((out, length))
    }
}
