use wlc_gen::LabelPurpose;
use wlc_sym::{ScopeKind, Symbol};
use wlc_util::WORD_SIZE;

use crate::error::CompileError;
use crate::parser::Parser;

impl<'a> Parser<'a> {
    /// Dispatches to whichever statement production matches the current
    /// token, per §4.4, then emits the `;<source-line>` comment §6
    /// requires immediately after every statement's code.
    pub(crate) fn statement(&mut self) -> Result<(), CompileError> {
        self.statement_kind()?;
        let source_line = self.tokenizer.last_line().to_string();
        self.emitter.push_source_comment(source_line.trim_end());
        Ok(())
    }

    fn statement_kind(&mut self) -> Result<(), CompileError> {
        if self.tokenizer.accept(":")? {
            return self.block_statement();
        }
        if self.variable_declaration()? {
            return Ok(());
        }
        if self.if_statement()? {
            return Ok(());
        }
        if self.while_statement()? {
            return Ok(());
        }
        if self.repeat_statement()? {
            return Ok(());
        }
        if self.for_statement()? {
            return Ok(());
        }
        if self.tokenizer.accept("return")? {
            let mut value = self.expression()?;
            self.promote(&mut value);
            self.fix_stack(0);
            self.emitter.push("ret");
            self.tokenizer.expect_end()?;
            return Ok(());
        }

        self.expression()?;
        self.tokenizer.expect_end()?;
        Ok(())
    }

    /// `Block (':')` (§4.4): a fresh `Inner` scope whose statements run
    /// as long as their `tab_level` stays at or above the block's own
    /// starting level.
    fn block_statement(&mut self) -> Result<(), CompileError> {
        self.tokenizer.expect_end()?;
        let saved_stack_position = self.stack_position;
        let start_tab_level = self.tokenizer.tab_level();
        {
            let mut scope = self.enter_scope(ScopeKind::Inner);
            while start_tab_level <= scope.tokenizer.tab_level() && !scope.tokenizer.end_of_file() {
                scope.statement()?;
            }
        }
        self.fix_stack(saved_stack_position);
        Ok(())
    }

    /// `If` (§4.4): `'if' expression statement [ 'else' statement ]`.
    fn if_statement(&mut self) -> Result<bool, CompileError> {
        if !self.tokenizer.accept("if")? {
            return Ok(false);
        }
        let mut condition = self.expression()?;
        self.promote(&mut condition);

        let else_label = self.next_label(LabelPurpose::Else);
        let end_if_label = self.next_label(LabelPurpose::EndIf);

        self.emitter.push("test eax,eax");
        self.emitter.push(format!("jz {else_label}"));
        self.statement()?;
        self.emitter.push(format!("jmp {end_if_label}"));
        self.emitter.push_label(&else_label);
        if self.tokenizer.accept("else")? {
            self.statement()?;
        }
        self.emitter.push_label(&end_if_label);
        Ok(true)
    }

    /// `While` (§4.4): `'while' expression statement`.
    fn while_statement(&mut self) -> Result<bool, CompileError> {
        if !self.tokenizer.accept("while")? {
            return Ok(false);
        }
        let start_label = self.next_label(LabelPurpose::WhileStart);
        let end_label = self.next_label(LabelPurpose::WhileEnd);

        self.emitter.push_label(&start_label);
        let mut condition = self.expression()?;
        self.promote(&mut condition);
        self.emitter.push("test eax,eax");
        self.emitter.push(format!("jz {end_label}"));
        self.statement()?;
        self.emitter.push(format!("jmp {start_label}"));
        self.emitter.push_label(&end_label);
        Ok(true)
    }

    /// `Repeat` (§4.4): `'repeat' statement 'until' expression`.
    fn repeat_statement(&mut self) -> Result<bool, CompileError> {
        if !self.tokenizer.accept("repeat")? {
            return Ok(false);
        }
        let start_label = self.next_label(LabelPurpose::RepeatStart);
        self.emitter.push_label(&start_label);
        self.statement()?;
        if !self.tokenizer.accept("until")? {
            return Err(self.fail("expected matching 'until' for 'repeat' statement"));
        }
        let mut condition = self.expression()?;
        self.promote(&mut condition);
        self.emitter.push("test eax,eax");
        self.emitter.push(format!("jz {start_label}"));
        Ok(true)
    }

    /// `For` (§4.4): stack layout relative to the iterator's declaration
    /// position is `[iter, end, step]`. The declaration pushes `iter`
    /// (starting at its initializer, conventionally `0`); the first
    /// `range(...)` expression lands in what becomes the `end` slot
    /// unless a second argument arrives, in which case that first value
    /// is moved into `iter` and the new value becomes `end`.
    fn for_statement(&mut self) -> Result<bool, CompileError> {
        if !self.tokenizer.accept("for")? {
            return Ok(false);
        }
        let iterator_position = self.stack_position;
        if !self.variable_declaration()? {
            return Err(self.fail("expected a variable declaration inside a 'for' loop"));
        }
        self.tokenizer.expect("in")?;
        self.tokenizer.expect("range")?;
        self.tokenizer.expect("(")?;

        let mut first = self.expression()?;
        self.binary1(&mut first); // lands in the `end` slot, word offset 1
        self.emitter.push("push 1"); // step slot, word offset 0; default step of 1
        self.stack_position += WORD_SIZE as i64;

        if self.tokenizer.accept(",")? {
            let mut second = self.expression()?;
            self.promote(&mut second);
            let end_off = self.stack_position - iterator_position - WORD_SIZE as i64 * 2;
            let iter_off = self.stack_position - iterator_position - WORD_SIZE as i64;
            self.emitter.push(format!("mov ebx,[esp+{end_off}]"));
            self.emitter.push(format!("mov [esp+{iter_off}],ebx"));
            self.emitter.push(format!("mov [esp+{end_off}],eax"));
        }
        if self.tokenizer.accept(",")? {
            let mut third = self.expression()?;
            self.promote(&mut third);
            let step_off = self.stack_position - iterator_position - WORD_SIZE as i64 * 3;
            self.emitter.push(format!("mov [esp+{step_off}],eax"));
        }
        self.tokenizer.expect(")")?;

        let start_label = self.next_label(LabelPurpose::ForStart);
        let end_label = self.next_label(LabelPurpose::ForEnd);

        self.emitter.push_label(&start_label);
        let iter_off = self.stack_position - iterator_position - WORD_SIZE as i64;
        let end_off = self.stack_position - iterator_position - WORD_SIZE as i64 * 2;
        let step_off = self.stack_position - iterator_position - WORD_SIZE as i64 * 3;
        self.emitter.push(format!("mov eax,[esp+{iter_off}]"));
        self.emitter.push(format!("mov ebx,[esp+{end_off}]"));
        self.emitter.push("cmp eax,ebx");
        self.emitter.push(format!("je {end_label}"));
        self.statement()?;
        self.emitter.push(format!("mov eax,[esp+{step_off}]"));
        self.emitter.push(format!("add [esp+{iter_off}],eax"));
        self.emitter.push(format!("jmp {start_label}"));
        self.emitter.push_label(&end_label);
        self.fix_stack(iterator_position);
        Ok(true)
    }

    /// `Variable declaration` (§4.4):
    /// `type [ '*'… ] [ '[' INT ']' ] identifier [ '=' expression ] END`.
    /// Returns `false` without consuming anything if the current token
    /// doesn't name a `Type`.
    pub(crate) fn variable_declaration(&mut self) -> Result<bool, CompileError> {
        let token = self.tokenizer.current_token().to_string();
        let variable_type = match self.symbols.lookup(&token) {
            Some(Symbol::Type(t)) => t.clone(),
            _ => return Ok(false),
        };
        self.tokenizer.advance()?;

        let mut pointer_level = 0u32;
        while self.tokenizer.accept("*")? {
            pointer_level += 1;
        }

        let mut array_count = 0u32;
        if self.tokenizer.accept("[")? {
            array_count = self.positive_int_literal()?;
            if !self.tokenizer.accept("]")? {
                return Err(self.fail("missing closing ']' in array variable declaration"));
            }
        }

        let name = self.tokenizer.current_token().to_string();
        if self.symbols.lookup(&name).is_some() {
            return Err(self.fail(format!("variable '{name}' was previously declared")));
        }
        self.tokenizer.advance()?;

        if self.tokenizer.accept("=")? {
            if variable_type.size != WORD_SIZE {
                return Err(self.fail(
                    "a variable declaration with an initializer requires a word-sized type",
                ));
            }
            let mut value = self.expression()?;
            self.binary1(&mut value);
            self.tokenizer.expect_end()?;
        } else {
            let total_size = variable_type.size * array_count.max(1);
            let mut pushed = 0u32;
            while pushed < total_size {
                self.emitter.push("push 0");
                self.stack_position += WORD_SIZE as i64;
                pushed += WORD_SIZE;
            }
            self.tokenizer.expect_end()?;
        }

        self.declare_local(
            name,
            variable_type,
            pointer_level,
            array_count,
            self.stack_position as u32,
        )?;
        Ok(true)
    }
}
