use std::collections::HashMap;

use wlc_util::Position;

use crate::error::SymError;
use crate::symbol::Symbol;

/// What a scope was pushed for (§3, §4.2) — tracked so diagnostics and
/// future lookups can distinguish "no enclosing function" from "empty
/// block", though only `Function` and `Inner` are ever pushed by the
/// parser; `Global` and `Module` are the two scopes present before any
/// source is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Module,
    Function,
    Inner,
}

#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    bindings: HashMap<String, Symbol>,
}

/// A stack of scopes, searched innermost-to-outermost on lookup (§3, §4.2).
/// Declaring a name that resolves in *any* live scope — not just the
/// innermost — is rejected, matching the original's `lookup()`-before-insert
/// guard.
pub struct SymbolTable {
    scopes: Vec<Scope>,
    next_scope_id: u32,
}

impl SymbolTable {
    /// A fresh table holding just the `Global` scope predeclared base
    /// types and builtins are declared into; the parser pushes the
    /// `Module` scope itself once it starts reading a module (§4.2, §4.3).
    pub fn new() -> Self {
        Self {
            scopes: vec![
                Scope {
                    kind: ScopeKind::Global,
                    bindings: HashMap::new(),
                },
            ],
            next_scope_id: 0,
        }
    }

    /// Pushes a new scope and returns a guard that pops it on drop — even
    /// if the caller bails out early via `?` while parsing the scope's
    /// body. Mirrors the "RAII/defer-guarded frames" the data model calls
    /// for so a scope can never leak on an error path.
    pub fn enter(&mut self, kind: ScopeKind) -> ScopeGuard<'_> {
        self.push_scope(kind);
        ScopeGuard { table: self }
    }

    /// Pushes a scope without returning a guard. Paired with
    /// [`SymbolTable::pop_scope`] by callers (such as the parser) that
    /// need their own RAII wrapper spanning more than just the table —
    /// e.g. one that also carries the tokenizer and code emitter so scope
    /// lifetime tracks a whole production, not just table access.
    pub fn push_scope(&mut self, kind: ScopeKind) {
        self.scopes.push(Scope {
            kind,
            bindings: HashMap::new(),
        });
    }

    /// Pops the innermost scope. Panics if called with no scope beyond
    /// `Global`, which would indicate a caller popped one frame too many.
    pub fn pop_scope(&mut self) {
        assert!(
            self.scopes.len() > 1,
            "popped the Global scope — a caller's push/pop frames are unbalanced"
        );
        self.scopes.pop();
    }

    /// Allocates a fresh [`crate::symbol::ScopeId`] to stamp onto a
    /// `Symbol::Function` being built, distinct from the `Scope` frames
    /// above — the id outlives the frame, which is gone by the time the
    /// function's own declaration is visible to callers.
    pub fn next_scope_id(&mut self) -> crate::symbol::ScopeId {
        let id = crate::symbol::ScopeId(self.next_scope_id);
        self.next_scope_id += 1;
        id
    }

    fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Declares `symbol` in the innermost scope. Fails if the name already
    /// resolves in *any* live scope (§3 invariant).
    pub fn declare(&mut self, symbol: Symbol, position: Position) -> Result<(), SymError> {
        let name = symbol.name().to_string();
        if self.lookup(&name).is_some() {
            return Err(SymError::AlreadyDeclared { position, name });
        }
        self.scopes
            .last_mut()
            .expect("symbol table always has at least the Global scope")
            .bindings
            .insert(name, symbol);
        Ok(())
    }

    /// Resolves `name` starting at the innermost scope and working
    /// outward to `Global` (§3, §4.2).
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.bindings.get(name))
    }

    pub fn lookup_or_err(&self, name: &str, position: Position) -> Result<&Symbol, SymError> {
        self.lookup(name).ok_or_else(|| SymError::Undefined {
            position,
            name: name.to_string(),
        })
    }

    /// True if the innermost live scope was pushed for a function body —
    /// used to reject `return` outside a function and to decide whether a
    /// nested block is still inside one (§4.4).
    pub fn in_function(&self) -> bool {
        self.scopes
            .iter()
            .rev()
            .any(|s| matches!(s.kind, ScopeKind::Function))
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Pops its scope when dropped. Holds `&mut SymbolTable` so the table
/// can't be used except through the guard while a scope is open.
pub struct ScopeGuard<'a> {
    table: &'a mut SymbolTable,
}

impl ScopeGuard<'_> {
    pub fn table(&mut self) -> &mut SymbolTable {
        self.table
    }

    pub fn depth(&self) -> usize {
        self.table.depth()
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.table.pop_scope();
    }
}
