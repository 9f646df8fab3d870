//! The code emitter: an append-only buffer of FASM assembly lines plus the
//! monotone label counters the parser draws fresh labels from (§4.4, §6).
//! Nothing here ever rewrites a line already pushed — the parser emits
//! code the instant it recognizes a construct, so there is no separate
//! assembly/optimization pass to revisit earlier output.

mod emitter;

pub use emitter::{CodeEmitter, LabelPurpose};
