use thiserror::Error;
use wlc_util::Position;

/// Symbol-table failures (§3, §7 "Semantic"). Each variant carries the
/// position of the reference that triggered it, not the original
/// declaration — the single fatal diagnostic always points at what the
/// compiler was looking at when it gave up.
#[derive(Debug, Error)]
pub enum SymError {
    #[error("{position}: '{name}' is already declared in this scope")]
    AlreadyDeclared { position: Position, name: String },

    #[error("{position}: '{name}' is undefined")]
    Undefined { position: Position, name: String },

    #[error("{position}: '{name}' is a {found}, expected a {expected}")]
    WrongKind {
        position: Position,
        name: String,
        expected: &'static str,
        found: &'static str,
    },
}
