use wlc_util::{Position, WORD_SIZE};
use wlc_sym::{Symbol, SymbolTable, TypeInfo};

/// Declares the predeclared base types and the `syscall4` builtin into the
/// table's `Module` scope (§4.3). Called once before any source is parsed.
pub fn define_base_types(symbols: &mut SymbolTable) {
    let at_start = Position::new("<builtin>", 0, 0);
    let declare_type = |symbols: &mut SymbolTable, name: &str, size: u32, signed: bool| {
        symbols
            .declare(Symbol::Type(TypeInfo::new(name, size, signed)), at_start.clone())
            .expect("base type names are distinct and declared before any source runs");
    };

    declare_type(symbols, "void", 0, false);

    declare_type(symbols, "char", 1, true);
    declare_type(symbols, "byte", 1, false);

    declare_type(symbols, "int", WORD_SIZE, true);
    declare_type(symbols, "int8", 1, true);
    declare_type(symbols, "int16", 2, true);
    declare_type(symbols, "int32", 4, true);
    declare_type(symbols, "int64", 8, true);

    declare_type(symbols, "uint", WORD_SIZE, false);
    declare_type(symbols, "uint8", 1, false);
    declare_type(symbols, "uint16", 2, false);
    declare_type(symbols, "uint32", 4, false);
    declare_type(symbols, "uint64", 8, false);
}

/// Declares the `syscall4` trampoline (§2, §6) so it is callable like any
/// other function; its body is emitted directly by the code emitter's
/// fixed prologue rather than parsed from source.
pub fn define_linux_syscall(symbols: &mut SymbolTable) {
    let at_start = Position::new("<builtin>", 0, 0);
    let int_type = symbols
        .lookup("int")
        .and_then(Symbol::as_type)
        .expect("int was just declared by define_base_types")
        .clone();
    let scope = symbols.next_scope_id();
    symbols
        .declare(
            Symbol::Function(std::rc::Rc::new(wlc_sym::FunctionInfo {
                name: "syscall4".to_string(),
                return_type: int_type,
                start_address: 0,
                args: Vec::new(),
                scope,
            })),
            at_start,
        )
        .expect("'syscall4' is declared exactly once, before any source runs");
}
