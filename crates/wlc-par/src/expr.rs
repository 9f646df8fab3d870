use wlc_sym::Symbol;
use wlc_util::WORD_SIZE;

use crate::error::CompileError;
use crate::parser::{ExprValue, Parser, PrimaryRef};

impl<'a> Parser<'a> {
    /// `expression := assignment` (§4.5).
    pub(crate) fn expression(&mut self) -> Result<ExprValue, CompileError> {
        self.assignment_expression()
    }

    /// `assignment := equality [ '=' expression ]`, right-associative
    /// (§4.5).
    pub(crate) fn assignment_expression(&mut self) -> Result<ExprValue, CompileError> {
        let mut value = self.equality_expression()?;
        if !self.tokenizer.accept("=")? {
            return Ok(value);
        }

        match value.reference.take() {
            Some(PrimaryRef::ArrayElement { element_size }) => {
                // The address is already in `eax`; suppress the pending
                // dereference postfix left behind so `binary1` pushes the
                // address itself rather than loading through it (§4.5).
                value.pending_deref = 0;
                self.binary1(&mut value);
                let mut rhs = self.expression()?;
                self.binary2_pop(&mut rhs);
                self.store_sized(element_size, "ebx");
            }
            Some(PrimaryRef::Variable(variable)) => {
                let deref_count = value.pending_deref;
                let mut rhs = self.expression()?;
                self.promote(&mut rhs);
                self.assign_to_identifier(&variable, deref_count);
            }
            Some(PrimaryRef::Function(name)) => {
                return Err(self.fail(format!("'{name}' is a Function, not assignable")));
            }
            None => {
                return Err(self.fail("left-hand side of '=' is not assignable"));
            }
        }
        Ok(ExprValue::plain())
    }

    /// `equality := relational { ('==' | '!=') relational }` (§4.5, §9:
    /// left-folded rather than the source's non-looping pair of `if`s).
    pub(crate) fn equality_expression(&mut self) -> Result<ExprValue, CompileError> {
        let mut value = self.relational_expression()?;
        loop {
            if self.tokenizer.accept("==")? {
                value = self.relational_sub("sete", value, Parser::relational_expression)?;
            } else if self.tokenizer.accept("!=")? {
                value = self.relational_sub("setne", value, Parser::relational_expression)?;
            } else {
                return Ok(value);
            }
        }
    }

    /// `relational := additive { ('<' | '<=' | '>' | '>=') additive }`
    /// (§4.5, §9: left-folded).
    pub(crate) fn relational_expression(&mut self) -> Result<ExprValue, CompileError> {
        let mut value = self.additive_expression()?;
        loop {
            if self.tokenizer.accept("<")? {
                value = self.relational_sub("setl", value, Parser::additive_expression)?;
            } else if self.tokenizer.accept("<=")? {
                value = self.relational_sub("setle", value, Parser::additive_expression)?;
            } else if self.tokenizer.accept(">")? {
                value = self.relational_sub("setg", value, Parser::additive_expression)?;
            } else if self.tokenizer.accept(">=")? {
                value = self.relational_sub("setge", value, Parser::additive_expression)?;
            } else {
                return Ok(value);
            }
        }
    }

    /// Shared by equality and relational operators: evaluates `left` then
    /// `target_rule`'s operand, compares, and yields 0/1 in `eax` (§4.5).
    fn relational_sub(
        &mut self,
        set_op: &str,
        mut left: ExprValue,
        target_rule: fn(&mut Self) -> Result<ExprValue, CompileError>,
    ) -> Result<ExprValue, CompileError> {
        self.binary1(&mut left);
        let mut right = target_rule(self)?;
        self.binary2_pop(&mut right);
        self.emitter.push("cmp ebx,eax");
        self.emitter.push(format!("{set_op} al"));
        self.emitter.push("movzx eax,al");
        Ok(ExprValue::plain())
    }

    /// `additive := multiplicative { ('+' | '-') multiplicative }` (§4.5).
    pub(crate) fn additive_expression(&mut self) -> Result<ExprValue, CompileError> {
        let mut value = self.multiplicative_expression()?;
        loop {
            if self.tokenizer.accept("+")? {
                self.binary1(&mut value);
                let mut rhs = self.multiplicative_expression()?;
                self.binary2_pop(&mut rhs);
                self.emitter.push("add eax,ebx");
                value = ExprValue::plain();
            } else if self.tokenizer.accept("-")? {
                self.binary1(&mut value);
                let mut rhs = self.multiplicative_expression()?;
                self.binary2_pop(&mut rhs);
                self.emitter.push("sub ebx,eax");
                self.emitter.push("mov eax,ebx");
                value = ExprValue::plain();
            } else {
                return Ok(value);
            }
        }
    }

    /// `multiplicative := unary { ('*' | '/' | '%') unary }` (§4.5). `/`
    /// and `%` promote their right operand before use like every other
    /// binary form (§4.6) rather than skipping it.
    pub(crate) fn multiplicative_expression(&mut self) -> Result<ExprValue, CompileError> {
        let mut value = self.unary_expression()?;
        loop {
            if self.tokenizer.accept("*")? {
                self.binary1(&mut value);
                let mut rhs = self.unary_expression()?;
                self.binary2_pop(&mut rhs);
                self.emitter.push("imul eax,ebx");
                value = ExprValue::plain();
            } else if self.tokenizer.accept("/")? {
                self.binary1(&mut value);
                let mut rhs = self.unary_expression()?;
                self.promote(&mut rhs);
                self.emitter.push("mov ebx,eax");
                self.emitter.push("pop eax");
                self.emitter.push("xor edx,edx");
                self.emitter.push("idiv ebx");
                self.stack_position -= WORD_SIZE as i64;
                value = ExprValue::plain();
            } else if self.tokenizer.accept("%")? {
                self.binary1(&mut value);
                let mut rhs = self.unary_expression()?;
                self.promote(&mut rhs);
                self.emitter.push("mov ebx,eax");
                self.emitter.push("pop eax");
                self.emitter.push("xor edx,edx");
                self.emitter.push("idiv ebx");
                self.emitter.push("mov eax,edx");
                self.stack_position -= WORD_SIZE as i64;
                value = ExprValue::plain();
            } else {
                return Ok(value);
            }
        }
    }

    /// `unary := [ '&' ] { '@' } [ '!' ] postfix` (§4.5).
    pub(crate) fn unary_expression(&mut self) -> Result<ExprValue, CompileError> {
        let address_of = self.tokenizer.accept("&")?;
        let mut deref_count = 0u32;
        while self.tokenizer.accept("@")? {
            deref_count += 1;
        }
        let negate = self.tokenizer.accept("!")?;

        let mut value = self.postfix_expression(address_of)?;
        value.pending_deref += deref_count;

        if negate {
            self.promote(&mut value);
            self.emitter.push("not eax");
            value = ExprValue::plain();
        }
        Ok(value)
    }

    /// `postfix := primary { '(' args? ')' | '[' expression ']' }` (§4.5).
    pub(crate) fn postfix_expression(&mut self, address_of: bool) -> Result<ExprValue, CompileError> {
        let mut value = self.primary_expression(address_of)?;

        if self.tokenizer.accept("(")? {
            let callee = match value.reference.take() {
                Some(PrimaryRef::Function(name)) => name,
                _ => return Err(self.fail("expression is not callable")),
            };
            let saved_stack_position = self.stack_position;
            if !self.tokenizer.accept(")")? {
                loop {
                    let mut arg = self.expression()?;
                    self.binary1(&mut arg);
                    if !self.tokenizer.accept(",")? {
                        break;
                    }
                }
                self.tokenizer.expect(")")?;
            }
            self.emitter.push(format!("call {callee}"));
            self.fix_stack(saved_stack_position);
            return Ok(ExprValue::plain());
        }

        if self.tokenizer.accept("[")? {
            let variable = match &value.reference {
                Some(PrimaryRef::Variable(v)) => v.clone(),
                _ => return Err(self.fail("expression is not indexable")),
            };
            self.binary1(&mut value);
            let mut index = self.expression()?;
            self.promote(&mut index);
            let element_size = variable.element_size();
            if !matches!(element_size, 1 | 2 | 4) {
                return Err(self.fail(format!(
                    "array element size {element_size} is not 1, 2, or 4 bytes"
                )));
            }
            if element_size > 1 {
                let shift = element_size.trailing_zeros();
                self.emitter.push(format!("shl eax,{shift}"));
            }
            self.binary2_pop(&mut index);
            self.emitter.push("add eax,ebx");
            if !self.tokenizer.accept("]")? {
                return Err(self.fail("expected closing ']' for index expression"));
            }
            return Ok(ExprValue {
                pending_deref: 1,
                reference: Some(PrimaryRef::ArrayElement { element_size }),
            });
        }

        Ok(value)
    }

    /// `primary := int-literal | string-literal | identifier | '(' expression ')'`
    /// (§4.5).
    pub(crate) fn primary_expression(&mut self, address_of: bool) -> Result<ExprValue, CompileError> {
        if let Some(value) = self.int_literal()? {
            return Ok(value);
        }
        if let Some(value) = self.string_literal()? {
            return Ok(value);
        }

        let token = self.tokenizer.current_token().to_string();
        if let Some(symbol) = self.symbols.lookup(&token) {
            let value = match symbol {
                Symbol::Variable(variable) => {
                    let variable = variable.clone();
                    self.code_for_identifier(&variable, address_of);
                    ExprValue {
                        pending_deref: 0,
                        reference: Some(PrimaryRef::Variable(variable)),
                    }
                }
                Symbol::Function(function) => ExprValue {
                    pending_deref: 0,
                    reference: Some(PrimaryRef::Function(function.name.clone())),
                },
                Symbol::Type(_) => {
                    return Err(self.fail(format!("'{token}' is a Type, not a value")));
                }
            };
            self.tokenizer.advance()?;
            return Ok(value);
        }

        if self.tokenizer.accept("(")? {
            let value = self.expression()?;
            self.tokenizer.expect(")")?;
            return Ok(value);
        }

        Err(self.fail(format!("could not parse a primary expression at \"{token}\"")))
    }
}
