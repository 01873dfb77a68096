//! Dispatcher behavior against in-memory and on-disk sources.

use camino::Utf8PathBuf;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tsfix_domain::{
    Dispatcher, FixInput, FsSourceView, InMemorySourceView, Proposal, builtin_fixer_metas,
    split_lines,
};
use tsfix_types::diagnostic::Diagnostic;
use tsfix_types::fix::FixOutcome;

fn diag(path: &str, line: u32, code: &str, message: &str) -> Diagnostic {
    Diagnostic {
        file_path: Utf8PathBuf::from(path),
        line,
        column: 1,
        code: code.to_string(),
        message: message.to_string(),
        raw: String::new(),
    }
}

fn change(p: Proposal) -> tsfix_domain::LineChange {
    match p {
        Proposal::Change(c) => c,
        other => panic!("expected change, got {other:?}"),
    }
}

fn reason(p: Proposal) -> String {
    match p {
        Proposal::Unfixable { reason, .. } => reason,
        other => panic!("expected unfixable, got {other:?}"),
    }
}

#[test]
fn unused_import_sole_specifier_deletes_line() {
    let src = InMemorySourceView::new().with_file(
        "/p/a.ts",
        "import { Foo } from 'x'\nexport const a = 1\n",
    );
    let d = diag("/p/a.ts", 1, "6133", "'Foo' is declared but its value is never read.");
    let c = change(Dispatcher::builtin().propose(&src, &d, 1).expect("propose"));
    assert_eq!(c.line_index, 0);
    assert_eq!(c.original_line, "import { Foo } from 'x'");
    assert_eq!(c.outcome, FixOutcome::DeleteLine);
}

#[test]
fn unused_import_keeps_remaining_specifier() {
    let src = InMemorySourceView::new().with_file("/p/a.ts", "import { Foo, Bar } from 'x'\n");
    let d = diag("/p/a.ts", 1, "6133", "'Foo' is declared but its value is never read.");
    let c = change(Dispatcher::builtin().propose(&src, &d, 1).expect("propose"));
    assert_eq!(
        c.outcome,
        FixOutcome::ReplaceLine("import { Bar } from 'x'".to_string())
    );
}

#[test]
fn unused_import_in_the_middle_is_removed() {
    let src = InMemorySourceView::new()
        .with_file("/p/a.ts", "import { A, Foo, B } from 'x'\n")
        .with_file("/p/b.ts", "import type { A, Foo, B } from 'x'\n");
    let msg = "'Foo' is declared but its value is never read.";

    let c = change(
        Dispatcher::builtin()
            .propose(&src, &diag("/p/a.ts", 1, "6133", msg), 1)
            .expect("propose"),
    );
    assert_eq!(
        c.outcome,
        FixOutcome::ReplaceLine("import { A, B } from 'x'".to_string())
    );

    let c = change(
        Dispatcher::builtin()
            .propose(&src, &diag("/p/b.ts", 1, "6133", msg), 1)
            .expect("propose"),
    );
    assert_eq!(
        c.outcome,
        FixOutcome::ReplaceLine("import type { A, B } from 'x'".to_string())
    );
}

#[test]
fn missing_file_and_out_of_range_line() {
    let src = InMemorySourceView::new().with_file("/p/a.ts", "one\ntwo");
    let dispatcher = Dispatcher::builtin();

    let d = diag("/p/missing.ts", 1, "6133", "'a' is declared but its value is never read.");
    assert_eq!(
        reason(dispatcher.propose(&src, &d, 1).expect("propose")),
        "file does not exist"
    );

    let d = diag("/p/a.ts", 3, "6133", "'a' is declared but its value is never read.");
    assert_eq!(
        reason(dispatcher.propose(&src, &d, 3).expect("propose")),
        "line out of range"
    );
    assert_eq!(
        reason(dispatcher.propose(&src, &d, 0).expect("propose")),
        "line out of range"
    );
}

#[test]
fn type_mismatch_is_never_fixed() {
    let src = InMemorySourceView::new().with_file("/p/a.ts", "const n: number = 'x'");
    let d = diag(
        "/p/a.ts",
        1,
        "2322",
        "Type 'string' is not assignable to type 'number'.",
    );
    let p = Dispatcher::builtin().propose(&src, &d, 1).expect("propose");
    match p {
        Proposal::Unfixable {
            reason,
            original_line,
        } => {
            assert!(reason.contains("manual review"));
            assert_eq!(original_line.as_deref(), Some("const n: number = 'x'"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn unknown_code_falls_back_to_unused_heuristic() {
    let src = InMemorySourceView::new().with_file("/p/a.ts", "import { A, B } from './m'");
    let d = diag("/p/a.ts", 1, "9999", "'B' is defined but never used");
    let c = change(Dispatcher::builtin().propose(&src, &d, 1).expect("propose"));
    assert_eq!(
        c.outcome,
        FixOutcome::ReplaceLine("import { A } from './m'".to_string())
    );

    let d = diag("/p/a.ts", 1, "9999", "Something the checker says");
    assert_eq!(
        reason(Dispatcher::builtin().propose(&src, &d, 1).expect("propose")),
        "unsupported error type or cannot auto-fix"
    );
}

#[test]
fn crlf_lines_keep_their_carriage_return() {
    let src = InMemorySourceView::new().with_file("/p/a.ts", "let x = 1\r\nlet y = 2\r\n");
    let d = diag("/p/a.ts", 1, "6133", "'x' is declared but its value is never read.");
    let c = change(Dispatcher::builtin().propose(&src, &d, 1).expect("propose"));
    assert_eq!(
        c.outcome,
        FixOutcome::ReplaceLine("// let x = 1\r".to_string())
    );
}

#[test]
fn reads_from_disk() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
    let file = root.join("util.ts");
    std::fs::write(&file, "export function f(a, unused) {}\n").expect("write");

    let d = Diagnostic {
        file_path: file.clone(),
        line: 1,
        column: 22,
        code: "6133".into(),
        message: "'unused' is declared but its value is never read.".into(),
        raw: String::new(),
    };
    let c = change(Dispatcher::builtin().propose(&FsSourceView, &d, 1).expect("propose"));
    assert_eq!(
        c.outcome,
        FixOutcome::ReplaceLine("export function f(a, _unused) {}".to_string())
    );
}

#[test]
fn every_registered_code_has_exactly_one_fixer() {
    let dispatcher = Dispatcher::builtin();
    for meta in builtin_fixer_metas() {
        for code in meta.codes {
            let fixer = dispatcher.fixer_for(code).expect("registered");
            assert_eq!(fixer.meta().key, meta.key, "code {code}");
        }
    }
}

proptest! {
    #[test]
    fn dispatch_never_panics(line in "[ -~]{0,60}", msg in "[ -~]{0,60}", code in "[0-9]{4}") {
        let lines = [line.as_str()];
        let input = FixInput { lines: &lines, line: 1, column: 1, target: &line, message: &msg };
        let _ = Dispatcher::builtin().attempt(&code, &input);
    }

    #[test]
    fn split_lines_rejoins_losslessly(content in "[a-z\\r\\n ]{0,80}") {
        prop_assert_eq!(split_lines(&content).join("\n"), content);
    }
}
