use thiserror::Error;
use wlc_util::Position;

/// Lex-level failures (§7: all fatal, reported with file/line/column).
#[derive(Debug, Error)]
pub enum LexError {
    #[error("{0}: unterminated string literal")]
    UnterminatedString(Position),

    #[error("{0}: unexpected character '{1}'")]
    UnexpectedChar(Position, char),
}

impl LexError {
    pub fn position(&self) -> &Position {
        match self {
            LexError::UnterminatedString(p) => p,
            LexError::UnexpectedChar(p, _) => p,
        }
    }
}

/// Failure of a `Tokenizer::expect`/`expect_end` call (§4.1, §7 "Syntax").
#[derive(Debug, Error)]
pub enum ExpectError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("{position}: \"{expected}\" expected, found \"{found}\"")]
    Mismatch {
        position: Position,
        expected: String,
        found: String,
    },
}

impl ExpectError {
    pub fn position(&self) -> &Position {
        match self {
            ExpectError::Lex(e) => e.position(),
            ExpectError::Mismatch { position, .. } => position,
        }
    }
}
