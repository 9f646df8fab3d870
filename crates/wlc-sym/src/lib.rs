//! The symbol table: a stack of scopes mapping names to [`Symbol`] entries,
//! resolved innermost-to-outermost (§3, §4.2). Declaring a name that already
//! resolves anywhere on the stack — not just in the innermost scope — is
//! rejected, so a function can't shadow a sibling local the way C permits.

mod error;
mod scope;
mod symbol;

pub use error::SymError;
pub use scope::{ScopeGuard, ScopeKind, SymbolTable};
pub use symbol::{FunctionInfo, ScopeId, Symbol, TypeInfo, VariableInfo, VariableKind};

#[cfg(test)]
mod tests {
    use super::*;
    use wlc_util::Position;

    fn pos() -> Position {
        Position::new("test.w", 1, 1)
    }

    fn int_type() -> std::rc::Rc<TypeInfo> {
        TypeInfo::new("int", 4, true)
    }

    fn var(name: &str, kind: VariableKind, stack_position: u32) -> Symbol {
        Symbol::Variable(std::rc::Rc::new(VariableInfo {
            name: name.to_string(),
            variable_type: int_type(),
            kind,
            pointer_level: 0,
            array_count: 0,
            stack_position,
        }))
    }

    #[test]
    fn lookup_crosses_global_and_module_scopes() {
        let mut table = SymbolTable::new();
        table
            .declare(Symbol::Type(int_type()), pos())
            .expect("declares into Module, the innermost scope at construction");
        assert!(table.lookup("int").is_some());
    }

    #[test]
    fn inner_scope_shadows_nothing_and_sees_outer_names() {
        let mut table = SymbolTable::new();
        table.declare(Symbol::Type(int_type()), pos()).unwrap();

        let mut guard = table.enter(ScopeKind::Function);
        guard
            .table()
            .declare(var("x", VariableKind::Local, 4), pos())
            .unwrap();
        assert!(guard.table().lookup("x").is_some());
        assert!(guard.table().lookup("int").is_some(), "outer scopes stay visible");
    }

    #[test]
    fn scope_is_popped_when_guard_drops() {
        let mut table = SymbolTable::new();
        {
            let mut guard = table.enter(ScopeKind::Inner);
            guard
                .table()
                .declare(var("x", VariableKind::Local, 4), pos())
                .unwrap();
            assert!(guard.table().lookup("x").is_some());
        }
        assert!(
            table.lookup("x").is_none(),
            "inner scope's bindings must not survive past the guard"
        );
    }

    #[test]
    fn redeclaring_a_name_visible_in_an_outer_scope_is_rejected() {
        let mut table = SymbolTable::new();
        table
            .declare(var("x", VariableKind::Local, 4), pos())
            .unwrap();

        let mut guard = table.enter(ScopeKind::Inner);
        let err = guard
            .table()
            .declare(var("x", VariableKind::Local, 8), pos())
            .unwrap_err();
        assert!(matches!(err, SymError::AlreadyDeclared { name, .. } if name == "x"));
    }

    #[test]
    fn redeclaring_within_the_same_scope_is_rejected() {
        let mut table = SymbolTable::new();
        table
            .declare(var("x", VariableKind::Local, 4), pos())
            .unwrap();
        let err = table
            .declare(var("x", VariableKind::Local, 8), pos())
            .unwrap_err();
        assert!(matches!(err, SymError::AlreadyDeclared { .. }));
    }

    #[test]
    fn undefined_lookup_reports_the_missing_name() {
        let table = SymbolTable::new();
        let err = table.lookup_or_err("missing", pos()).unwrap_err();
        assert!(matches!(err, SymError::Undefined { name, .. } if name == "missing"));
    }

    #[test]
    fn in_function_is_true_only_inside_a_function_scope() {
        let mut table = SymbolTable::new();
        assert!(!table.in_function());
        let mut guard = table.enter(ScopeKind::Function);
        assert!(guard.table().in_function());
        {
            let mut nested = guard.table().enter(ScopeKind::Inner);
            assert!(
                nested.table().in_function(),
                "a block nested inside a function body is still in that function"
            );
        }
    }

    #[test]
    fn scope_ids_are_distinct() {
        let mut table = SymbolTable::new();
        let a = table.next_scope_id();
        let b = table.next_scope_id();
        assert_ne!(a, b);
    }
}
