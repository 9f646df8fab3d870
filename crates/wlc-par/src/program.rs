use std::rc::Rc;

use wlc_sym::{ScopeKind, Symbol, VariableInfo, VariableKind};
use wlc_util::WORD_SIZE;

use crate::error::CompileError;
use crate::parser::Parser;

impl<'a> Parser<'a> {
    /// `module` (§4.3): pushes the `Module` scope, then parses functions
    /// until end of file. There is no import or top-level variable
    /// grammar (§4.3 Non-goals).
    pub(crate) fn module(&mut self) -> Result<(), CompileError> {
        tracing::debug!(file = %self.tokenizer.file().display(), "parsing module");
        self.tokenizer.advance()?;
        let mut scope = self.enter_scope(ScopeKind::Module);
        while !scope.tokenizer.end_of_file() {
            scope.function()?;
        }
        Ok(())
    }

    /// `function` (§4.3): `type identifier '(' (type identifier ','?)* ')' statement`.
    /// The argument list is parsed against the enclosing scope and the
    /// function is declared there *before* its body is parsed, so a
    /// function can call itself; the arguments are then re-declared as
    /// `Variable`s inside the single `Function` scope the body parses in.
    fn function(&mut self) -> Result<(), CompileError> {
        let return_type = self.expect_type_name()?;
        let name = self.tokenizer.current_token().to_string();
        self.tokenizer.advance()?;

        if !self.tokenizer.accept("(")? {
            return Err(self.fail(format!(
                "expected '(' to begin the argument list of function '{name}'"
            )));
        }

        // Argument list (§4.3): `type identifier` pairs separated by `,`.
        let mut parsed_args = Vec::new();
        loop {
            if self.tokenizer.accept(")")? {
                break;
            }
            let arg_type = self.expect_type_name()?;
            let arg_name = self.tokenizer.current_token().to_string();
            self.tokenizer.advance()?;
            parsed_args.push((arg_name, arg_type));
            self.tokenizer.accept(",")?;
        }

        tracing::trace!(function = %name, args = parsed_args.len(), "parsed function signature");
        self.emitter.push_label(&name);

        let scope_id = self.symbols.next_scope_id();
        let args: Vec<Rc<VariableInfo>> = parsed_args
            .into_iter()
            .enumerate()
            .map(|(i, (arg_name, arg_type))| {
                Rc::new(VariableInfo {
                    name: arg_name,
                    variable_type: arg_type,
                    kind: VariableKind::Argument,
                    pointer_level: 0,
                    array_count: 0,
                    stack_position: i as u32 * WORD_SIZE,
                })
            })
            .collect();

        self.symbols.declare(
            Symbol::Function(Rc::new(wlc_sym::FunctionInfo {
                name: name.clone(),
                return_type,
                start_address: 0,
                args: args.clone(),
                scope: scope_id,
            })),
            self.tokenizer.position(),
        )?;

        let mut scope = self.enter_scope(ScopeKind::Function);
        for arg in &args {
            let position = scope.position();
            scope
                .symbols
                .declare(Symbol::Variable(arg.clone()), position)?;
        }
        scope.statement()
    }
}
