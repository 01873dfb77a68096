#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tsfix_domain::{Dispatcher, FixInput, split_lines};

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    code: &'a str,
    message: &'a str,
    content: &'a str,
    line: u8,
    column: u8,
}

fuzz_target!(|input: Input<'_>| {
    let lines = split_lines(input.content);
    if lines.is_empty() {
        return;
    }
    let line = (input.line as usize % lines.len()) + 1;
    let fix = FixInput {
        lines: &lines,
        line: line as u32,
        column: u32::from(input.column).max(1),
        target: lines[line - 1],
        message: input.message,
    };

    // Every fixer must tolerate arbitrary text, and its outcome must apply cleanly.
    let outcome = Dispatcher::builtin().attempt(input.code, &fix);
    let _ = tsfix_edit::apply_outcome(input.content, line - 1, &outcome);
});
