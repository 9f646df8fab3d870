use thiserror::Error;
use wlc_util::Position;

/// The single fatal diagnostic a compile run can produce (§7). Every
/// failure reachable from parsing — lexical, syntactic, or semantic — is
/// funneled into this one type so the driver has exactly one place to
/// render the two-line `file:line:column` + message report.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] wlc_lex::LexError),

    #[error(transparent)]
    Expect(#[from] wlc_lex::ExpectError),

    #[error(transparent)]
    Sym(#[from] wlc_sym::SymError),

    #[error("{position}: {message}")]
    Syntax { position: Position, message: String },

    #[error("{position}: {message}")]
    Semantic { position: Position, message: String },
}

impl CompileError {
    pub fn syntax(position: Position, message: impl Into<String>) -> Self {
        CompileError::Syntax {
            position,
            message: message.into(),
        }
    }

    pub fn semantic(position: Position, message: impl Into<String>) -> Self {
        CompileError::Semantic {
            position,
            message: message.into(),
        }
    }

    pub fn position(&self) -> &Position {
        match self {
            CompileError::Lex(e) => e.position(),
            CompileError::Expect(e) => e.position(),
            CompileError::Sym(e) => match e {
                wlc_sym::SymError::AlreadyDeclared { position, .. } => position,
                wlc_sym::SymError::Undefined { position, .. } => position,
                wlc_sym::SymError::WrongKind { position, .. } => position,
            },
            CompileError::Syntax { position, .. } => position,
            CompileError::Semantic { position, .. } => position,
        }
    }

    /// The diagnostic text alone, with no `file:line:col` prefix — the
    /// driver prints the position on its own line (§6).
    pub fn message(&self) -> String {
        let full = self.to_string();
        let prefix = format!("{}: ", self.position());
        full.strip_prefix(&prefix).unwrap_or(&full).to_string()
    }
}
