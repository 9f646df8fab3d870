use std::collections::HashMap;

/// The fixed program prologue (§6): ELF header, `syscall4` trampoline
/// reading its four arguments off the stack, and `_main` which calls
/// `main` and exits via `int 0x80` with the return value in `eax`.
const PROLOGUE: &[&str] = &[
    "format ELF executable 3",
    "entry _main",
    "",
    "syscall4:",
    "mov eax,[esp+16]",
    "mov ebx,[esp+12]",
    "mov ecx,[esp+8]",
    "mov edx,[esp+4]",
    "int 0x80",
    "ret",
    "",
    "_main:",
    "call main",
    "mov ebx,eax",
    "mov eax,1",
    "int 0x80",
    "",
];

/// The handful of constructs that need a pair (or singleton) of fresh
/// labels (§4.4). Each purpose has its own monotone counter, so an `if`
/// inside a `while` doesn't collide with the loop's own labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelPurpose {
    Else,
    EndIf,
    WhileStart,
    WhileEnd,
    RepeatStart,
    ForStart,
    ForEnd,
}

impl LabelPurpose {
    fn prefix(self) -> &'static str {
        match self {
            LabelPurpose::Else => "else",
            LabelPurpose::EndIf => "end_if",
            LabelPurpose::WhileStart => "while_start",
            LabelPurpose::WhileEnd => "while_end",
            LabelPurpose::RepeatStart => "repeat_start",
            LabelPurpose::ForStart => "for_start",
            LabelPurpose::ForEnd => "for_end",
        }
    }
}

/// Append-only assembly buffer plus the label counters. Lines are pushed
/// in emission order and never revisited.
pub struct CodeEmitter {
    lines: Vec<String>,
    label_counters: HashMap<LabelPurpose, u32>,
}

impl CodeEmitter {
    pub fn new() -> Self {
        let mut emitter = Self {
            lines: Vec::new(),
            label_counters: HashMap::new(),
        };
        emitter.lines.extend(PROLOGUE.iter().map(|s| s.to_string()));
        emitter
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn push_label(&mut self, label: &str) {
        self.lines.push(format!("{label}:"));
    }

    /// Emits the `;<source-line>` comment that follows every statement's
    /// code (§6), taken verbatim from the line the statement started on.
    pub fn push_source_comment(&mut self, source_line: &str) {
        self.lines.push(format!(";{source_line}"));
    }

    /// Allocates and returns a fresh label of the given purpose, e.g.
    /// `while_start_1`, `while_start_2`, ... Distinct purposes never share
    /// a counter, so nesting the same construct is always label-safe.
    pub fn next_label(&mut self, purpose: LabelPurpose) -> String {
        let counter = self.label_counters.entry(purpose).or_insert(0);
        *counter += 1;
        format!("{}_{}", purpose.prefix(), counter)
    }

    /// Renders the buffer as the final `.asm` file contents, one
    /// instruction/label/comment per line.
    pub fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    /// The buffer's lines in emission order, for callers (and tests) that
    /// need to inspect output without consuming the emitter via
    /// [`CodeEmitter::finish`].
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Default for CodeEmitter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prologue_is_present_from_construction() {
        let emitter = CodeEmitter::new();
        assert_eq!(emitter.lines()[0], "format ELF executable 3");
        assert!(emitter.lines().iter().any(|l| l == "entry _main"));
        assert!(emitter.lines().iter().any(|l| l == "_main:"));
        assert!(emitter.lines().iter().any(|l| l == "syscall4:"));
    }

    #[test]
    fn labels_of_the_same_purpose_are_fresh_and_monotone() {
        let mut emitter = CodeEmitter::new();
        assert_eq!(emitter.next_label(LabelPurpose::WhileStart), "while_start_1");
        assert_eq!(emitter.next_label(LabelPurpose::WhileStart), "while_start_2");
    }

    #[test]
    fn labels_of_different_purposes_do_not_share_counters() {
        let mut emitter = CodeEmitter::new();
        assert_eq!(emitter.next_label(LabelPurpose::Else), "else_1");
        assert_eq!(emitter.next_label(LabelPurpose::EndIf), "end_if_1");
        assert_eq!(emitter.next_label(LabelPurpose::Else), "else_2");
    }

    #[test]
    fn finish_joins_lines_with_a_trailing_newline() {
        let mut emitter = CodeEmitter::new();
        emitter.push("main:");
        emitter.push("ret");
        let out = emitter.finish();
        assert!(out.ends_with("ret\n"));
    }
}
