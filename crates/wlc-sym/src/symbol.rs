use std::rc::Rc;

use wlc_util::WORD_SIZE;

/// A predeclared base type (§3): `void, char, byte, int, int8..int64,
/// uint, uint8..uint64`. Shared by `Rc` since many variables reference the
/// same handful of type objects.
#[derive(Debug, PartialEq, Eq)]
pub struct TypeInfo {
    pub name: String,
    pub size: u32,
    pub signed: bool,
}

impl TypeInfo {
    pub fn new(name: impl Into<String>, size: u32, signed: bool) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            size,
            signed,
        })
    }
}

/// Opaque handle to a scope pushed for a function body. Assigned when the
/// scope is created; never resolved back to the (by-then-dropped) scope —
/// it exists purely so `Symbol::Function` can carry the "owned scope
/// reference" attribute the data model names (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

/// Where a variable's storage lives relative to the current stack frame
/// (§3, §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// Below the return address; freed by an `add esp,K` on block exit.
    Local,
    /// Above the return address, at a fixed positive offset (§4.3).
    Argument,
    /// No module-level variable declaration exists in the grammar (§4.3);
    /// modeled for completeness of the tagged union, unreachable from the
    /// parser.
    Global,
}

#[derive(Debug)]
pub struct FunctionInfo {
    pub name: String,
    pub return_type: Rc<TypeInfo>,
    pub start_address: u32,
    pub args: Vec<Rc<VariableInfo>>,
    pub scope: ScopeId,
}

#[derive(Debug)]
pub struct VariableInfo {
    pub name: String,
    pub variable_type: Rc<TypeInfo>,
    pub kind: VariableKind,
    pub pointer_level: u32,
    pub array_count: u32,
    /// Assigned at declaration time, immutable thereafter (§3 invariant).
    /// For a `Local`, the value of `stack_position` right after the
    /// variable's storage was pushed. For an `Argument`, `index * word_size`
    /// in argument-local coordinates (§4.3).
    pub stack_position: u32,
}

impl VariableInfo {
    /// Total bytes of storage this variable occupies, rounded up to whole
    /// words the way uninitialized declarations push one word at a time
    /// (§4.4).
    pub fn storage_size(&self) -> u32 {
        let elements = self.array_count.max(1);
        let bytes = elements * self.variable_type.size;
        bytes.div_ceil(WORD_SIZE) * WORD_SIZE
    }

    /// Size in bytes of a single element access (`a[i]` or a bare scalar):
    /// 1, 2 or 4. Array indexing requires this to be one of those three
    /// (§4.5, §7).
    pub fn element_size(&self) -> u32 {
        if self.pointer_level > 0 {
            WORD_SIZE
        } else {
            self.variable_type.size
        }
    }
}

/// A tagged symbol-table entry (§3): `Type`, `Function`, or `Variable`. Each
/// variant only carries the attributes meaningful for that kind, instead of
/// the dynamic source's single `Symbol` record with a `symbol_type` string
/// tag and fields that are `None`/unused for other kinds.
#[derive(Debug)]
pub enum Symbol {
    Type(Rc<TypeInfo>),
    Function(Rc<FunctionInfo>),
    Variable(Rc<VariableInfo>),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Type(t) => &t.name,
            Symbol::Function(f) => &f.name,
            Symbol::Variable(v) => &v.name,
        }
    }

    /// Human-readable kind name, used in "expected a Type, found a
    /// Function"-style diagnostics (§7).
    pub fn kind_name(&self) -> &'static str {
        match self {
            Symbol::Type(_) => "Type",
            Symbol::Function(_) => "Function",
            Symbol::Variable(_) => "Variable",
        }
    }

    pub fn as_type(&self) -> Option<&Rc<TypeInfo>> {
        match self {
            Symbol::Type(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Rc<FunctionInfo>> {
        match self {
            Symbol::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&Rc<VariableInfo>> {
        match self {
            Symbol::Variable(v) => Some(v),
            _ => None,
        }
    }
}
