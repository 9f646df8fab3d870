use std::rc::Rc;

use wlc_gen::{CodeEmitter, LabelPurpose};
use wlc_lex::Tokenizer;
use wlc_sym::{Symbol, SymbolTable, VariableInfo, VariableKind};
use wlc_util::{Position, WORD_SIZE};

use crate::error::CompileError;
use crate::types::{define_base_types, define_linux_syscall};

/// What a primary expression resolved to, if it hasn't yet been consumed
/// by an operator (§9 design note: this replaces the source's
/// `current_identifier` / `array_assignment` mutable flags with an
/// explicit value threaded through the expression productions).
#[derive(Debug, Clone)]
pub(crate) enum PrimaryRef {
    /// A plain variable reference. Combined with the carrying
    /// [`ExprValue::pending_deref`], this also covers `@x`, `@@x`, ...
    Variable(Rc<VariableInfo>),
    /// A callable name, consumed by a following `(` in postfix position.
    Function(String),
    /// An array element whose address postfix indexing already computed;
    /// the address is still live in `eax` (not yet pushed).
    ArrayElement { element_size: u32 },
}

/// The value an expression production hands back up the ladder (§9).
/// `pending_deref > 0` models the source's `pointer_dereference` counter:
/// the value in `eax` is actually a pointer that must be read through
/// once more before any binary operator or return may consume it (§4.6).
#[derive(Debug, Clone, Default)]
pub(crate) struct ExprValue {
    pub pending_deref: u32,
    pub reference: Option<PrimaryRef>,
}

impl ExprValue {
    /// A value with no outstanding dereference and no live reference —
    /// what every binary operator's result becomes.
    pub fn plain() -> Self {
        Self::default()
    }
}

/// Parses W source directly into FASM assembly, one production at a time.
/// Holds the tokenizer, symbol table, code emitter, and the running
/// `stack_position` the codegen patterns of §4 depend on.
pub struct Parser<'a> {
    pub(crate) tokenizer: Tokenizer<'a>,
    pub(crate) symbols: SymbolTable,
    pub(crate) emitter: CodeEmitter,
    /// Current offset, in bytes, from the function's stack frame base —
    /// shadows the real `esp` so every push/pop is accounted for without
    /// having to track genuine `esp` at compile time (§3, §5).
    pub(crate) stack_position: i64,
}

impl<'a> Parser<'a> {
    pub fn new(file: impl Into<std::path::PathBuf>, source: &'a str) -> Result<Self, CompileError> {
        let tokenizer = Tokenizer::new(file, source)?;
        let mut symbols = SymbolTable::new();
        define_base_types(&mut symbols);
        define_linux_syscall(&mut symbols);
        Ok(Self {
            tokenizer,
            symbols,
            emitter: CodeEmitter::new(),
            stack_position: 0,
        })
    }

    /// Parses the whole module and returns the finished assembly text
    /// (§4.3, §6). Consumes the parser: there is nothing left to reuse it
    /// for once a module has been compiled.
    pub fn compile(mut self) -> Result<String, CompileError> {
        self.module()?;
        Ok(self.emitter.finish())
    }

    pub(crate) fn position(&self) -> Position {
        self.tokenizer.position()
    }

    pub(crate) fn fail(&self, message: impl Into<String>) -> CompileError {
        CompileError::syntax(self.position(), message)
    }

    /// Resolves the current token as a type name, consuming it. Fatal if
    /// the name is undefined or names something other than a `Type`
    /// (§4.3).
    pub(crate) fn expect_type_name(&mut self) -> Result<Rc<wlc_sym::TypeInfo>, CompileError> {
        let name = self.tokenizer.current_token().to_string();
        let symbol = self
            .symbols
            .lookup_or_err(&name, self.position())
            .map_err(CompileError::from)?;
        let type_info = symbol.as_type().cloned().ok_or_else(|| {
            CompileError::semantic(
                self.position(),
                format!(
                    "'{name}' is a {}, expected a Type",
                    symbol.kind_name()
                ),
            )
        })?;
        self.tokenizer.advance()?;
        Ok(type_info)
    }

    /// `binary1` (§4.5): pushes the value currently in `eax` after
    /// resolving any pending dereference, so the *next* evaluated
    /// subexpression can use `eax` freely.
    pub(crate) fn binary1(&mut self, value: &mut ExprValue) {
        self.promote(value);
        self.emitter.push("push eax");
        self.stack_position += WORD_SIZE as i64;
    }

    /// `binary2_pop` (§4.5): resolves a pending dereference on the
    /// right-hand value, then restores the left-hand value pushed by
    /// `binary1` into `ebx`.
    pub(crate) fn binary2_pop(&mut self, value: &mut ExprValue) {
        self.promote(value);
        self.emitter.push("pop ebx");
        self.stack_position -= WORD_SIZE as i64;
    }

    /// `promote` (§4.6): collapses a pending dereference into an actual
    /// load the moment the value is about to be consumed.
    pub(crate) fn promote(&mut self, value: &mut ExprValue) {
        if value.pending_deref > 0 {
            self.emitter.push("mov eax,[eax]");
            value.pending_deref = 0;
        }
        // A value that has been operated on is no longer a storable
        // reference (§9: removes the source's reliance on a stale
        // `current_identifier` surviving past an operator).
        value.reference = None;
    }

    /// Emits `add esp,K` to return the stack to `target`, iff it is
    /// currently above it (§4.4 "fix_stack").
    pub(crate) fn fix_stack(&mut self, target: i64) {
        if self.stack_position > target {
            self.emitter.push(format!("add esp,{}", self.stack_position - target));
            self.stack_position = target;
        }
    }

    pub(crate) fn next_label(&mut self, purpose: LabelPurpose) -> String {
        self.emitter.next_label(purpose)
    }

    /// Stack offset, relative to `esp` at the current instant, where
    /// `identifier`'s value lives (§4.5 "identifier_stack_position").
    pub(crate) fn identifier_stack_position(&self, variable: &VariableInfo) -> i64 {
        match variable.kind {
            VariableKind::Local => self.stack_position - variable.stack_position as i64,
            // Arguments sit above the return address pushed by `call`.
            VariableKind::Argument => {
                self.stack_position + variable.stack_position as i64 + WORD_SIZE as i64
            }
            VariableKind::Global => {
                unreachable!("no module-level variable declaration exists in the grammar")
            }
        }
    }

    /// Stores `eax` into `identifier`'s slot, following `deref_count`
    /// pointer hops first if nonzero (§4.5 "assign_to_identifier").
    pub(crate) fn assign_to_identifier(&mut self, variable: &VariableInfo, deref_count: u32) {
        let offset = self.identifier_stack_position(variable);
        if deref_count > 0 {
            self.emitter.push(format!("mov ebx,[esp+{offset}]"));
            for _ in 0..deref_count - 1 {
                self.emitter.push("mov ebx,[ebx]");
            }
            self.store_sized(variable.element_size(), "ebx");
        } else {
            self.emitter.push(format!("mov [esp+{offset}],eax"));
        }
    }

    /// Emits `mov [<addr_reg>],al|ax|eax` sized to `size` bytes (§4.5).
    pub(crate) fn store_sized(&mut self, size: u32, addr_reg: &str) {
        let reg = match size {
            1 => "al",
            2 => "ax",
            4 => "eax",
            other => unreachable!("variable element size {other} is not 1, 2, or 4 bytes"),
        };
        self.emitter.push(format!("mov [{addr_reg}],{reg}"));
    }

    /// Loads a `Variable`'s value (or its address, for `&x` / arrays) into
    /// `eax` (§4.5 "code_for_identifier").
    pub(crate) fn code_for_identifier(&mut self, variable: &VariableInfo, address_of: bool) {
        let offset = self.identifier_stack_position(variable);
        if address_of || variable.array_count > 0 {
            self.emitter.push(format!("lea eax,[esp+{offset}]"));
        } else {
            self.emitter.push(format!("mov eax,[esp+{offset}]"));
        }
    }

    /// Declares a `Symbol::Variable` of kind `Local` for the token the
    /// cursor currently sits on, pushing its record into the innermost
    /// scope. Does not emit any code — callers push storage themselves.
    pub(crate) fn declare_local(
        &mut self,
        name: String,
        variable_type: Rc<wlc_sym::TypeInfo>,
        pointer_level: u32,
        array_count: u32,
        stack_position: u32,
    ) -> Result<Rc<VariableInfo>, CompileError> {
        let variable = Rc::new(VariableInfo {
            name,
            variable_type,
            kind: VariableKind::Local,
            pointer_level,
            array_count,
            stack_position,
        });
        self.symbols
            .declare(Symbol::Variable(variable.clone()), self.position())?;
        Ok(variable)
    }

    /// Pushes a scope and returns a guard over the *whole parser* rather
    /// than just the symbol table, so productions parsed while the scope
    /// is open can keep calling ordinary `&mut self` methods (§5, §9:
    /// still RAII-guarded — an early `?` return still pops the scope).
    pub(crate) fn enter_scope(&mut self, kind: wlc_sym::ScopeKind) -> ParserScope<'_, 'a> {
        self.symbols.push_scope(kind);
        ParserScope { parser: self }
    }
}

pub(crate) struct ParserScope<'p, 'a> {
    parser: &'p mut Parser<'a>,
}

impl<'a> std::ops::Deref for ParserScope<'_, 'a> {
    type Target = Parser<'a>;
    fn deref(&self) -> &Parser<'a> {
        self.parser
    }
}

impl<'a> std::ops::DerefMut for ParserScope<'_, 'a> {
    fn deref_mut(&mut self) -> &mut Parser<'a> {
        self.parser
    }
}

impl Drop for ParserScope<'_, '_> {
    fn drop(&mut self) {
        self.parser.symbols.pop_scope();
    }
}
