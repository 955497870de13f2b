//! Hygiene: source-level budgets for patterns that crash or hide errors.
//!
//! Scans `src/` (sibling `*_test.rs` files excluded) and fails when a
//! pattern appears more often than its budget allows. Budgets only go down.
#![allow(clippy::absurd_extreme_comparisons)]

use std::fs;
use std::path::Path;

struct SourceFile {
    path: String,
    content: String,
}

struct Budget {
    pattern: &'static str,
    max: usize,
}

// Panics.
const UNWRAP: Budget = Budget { pattern: ".unwrap()", max: 0 };
const EXPECT: Budget = Budget { pattern: ".expect(", max: 0 };
const PANIC: Budget = Budget { pattern: "panic!(", max: 0 };
const UNREACHABLE: Budget = Budget { pattern: "unreachable!(", max: 0 };
const TODO: Budget = Budget { pattern: "todo!(", max: 0 };
const UNIMPLEMENTED: Budget = Budget { pattern: "unimplemented!(", max: 0 };

// Silent loss.
const SILENT_DISCARD: Budget = Budget { pattern: "let _ =", max: 0 };
const DOT_OK: Budget = Budget { pattern: ".ok()", max: 0 };

// Structure.
const ALLOW_DEAD_CODE: Budget = Budget { pattern: "#[allow(dead_code)]", max: 0 };

fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if !path_str.ends_with(".rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

fn assert_within(budget: &Budget) {
    let files = source_files();
    assert!(!files.is_empty(), "no sources found under src/");

    let hits: Vec<(String, usize)> = files
        .iter()
        .map(|f| (f.path.clone(), f.content.lines().filter(|l| l.contains(budget.pattern)).count()))
        .filter(|(_, n)| *n > 0)
        .collect();
    let count: usize = hits.iter().map(|(_, n)| n).sum();
    let listing = hits.iter().map(|(p, n)| format!("  {p}: {n}")).collect::<Vec<_>>().join("\n");
    assert!(
        count <= budget.max,
        "{} budget exceeded: found {count}, max {}.\n{listing}",
        budget.pattern,
        budget.max
    );
}

#[test]
fn unwrap_budget() {
    assert_within(&UNWRAP);
}

#[test]
fn expect_budget() {
    assert_within(&EXPECT);
}

#[test]
fn panic_budget() {
    assert_within(&PANIC);
}

#[test]
fn unreachable_budget() {
    assert_within(&UNREACHABLE);
}

#[test]
fn todo_budget() {
    assert_within(&TODO);
}

#[test]
fn unimplemented_budget() {
    assert_within(&UNIMPLEMENTED);
}

#[test]
fn silent_discard_budget() {
    assert_within(&SILENT_DISCARD);
}

#[test]
fn dot_ok_budget() {
    assert_within(&DOT_OK);
}

#[test]
fn allow_dead_code_budget() {
    assert_within(&ALLOW_DEAD_CODE);
}
