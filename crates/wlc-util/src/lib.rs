//! Shared position/diagnostic types used across the `wlc` pipeline.
//!
//! Every crate in the pipeline (lexer, symbol table, emitter, parser, driver)
//! reports failures anchored to a [`Position`] so the driver can render the
//! single fatal diagnostic the compiler ever produces in one place.

mod position;

pub use position::Position;

/// Word size of the target platform, in bytes. Fixed for this compiler: a
/// 32-bit target means `int`/`uint` and pointers are all 4 bytes.
pub const WORD_SIZE: u32 = 4;
