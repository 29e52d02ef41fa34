// tests/aggregation.rs
#![allow(clippy::unwrap_used)]

use codesense_core::orchestrator::analyze;
use codesense_core::patterns::{aggregate, detect, PatternKind};
use codesense_core::syntax::{build, BuildOptions};

fn detect_source(source: &str) -> Vec<codesense_core::patterns::CodePattern> {
    let program = build(source, &BuildOptions::default()).unwrap();
    detect(&program)
}

#[test]
fn same_shape_functions_merge() {
    let source = "\
function add(a: number, b: number): number { return a + b; }
function mul(x: number, y: number): number { return x * y; }
function neg(x: number): number { return -x; }
";
    let patterns = analyze(source, &BuildOptions::default()).unwrap();
    let functions: Vec<_> = patterns
        .iter()
        .filter(|p| p.kind() == PatternKind::Function)
        .collect();
    assert_eq!(functions.len(), 2);

    assert_eq!(functions[0].name, "add");
    assert_eq!(functions[0].occurrence_count, 2);
    assert_eq!(functions[0].locations.len(), 2);
    assert_eq!(functions[0].locations[0].start.line, 1);
    assert_eq!(functions[0].locations[1].start.line, 2);

    assert_eq!(functions[1].name, "neg");
    assert_eq!(functions[1].occurrence_count, 1);
}

#[test]
fn pairwise_merge_concatenates_locations() {
    let raw = detect_source("let a = 1;\nlet b = 2;");
    assert_eq!(raw.len(), 2);
    let merged = aggregate(raw.clone());
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].occurrence_count, 2);
    let expected: Vec<_> = raw.iter().flat_map(|p| p.locations.clone()).collect();
    assert_eq!(merged[0].locations, expected);
}

#[test]
fn different_kinds_never_merge() {
    let source = "\
interface Point { x: number; y: number; }
class Shape { area() { return 0; } }
const origin = { x: 0, y: 0 };
";
    let patterns = analyze(source, &BuildOptions::default()).unwrap();
    let kinds: Vec<PatternKind> = patterns.iter().map(|p| p.kind()).collect();
    assert!(kinds.contains(&PatternKind::Interface));
    assert!(kinds.contains(&PatternKind::Class));
    assert!(kinds.contains(&PatternKind::Variable));
    assert!(patterns.iter().all(|p| p.occurrence_count == 1));
}

#[test]
fn aggregating_twice_changes_nothing() {
    let source = "let a = 1;\nlet b = 2;\nconst c = 'x';\nconst d = 'y';";
    let once = aggregate(detect_source(source));
    let twice = aggregate(once.clone());
    assert_eq!(once, twice);
}

#[test]
fn counts_add_up_across_corpora() {
    let first = analyze("let a = 1;\nlet b = 2;", &BuildOptions::default()).unwrap();
    let second = analyze("let c = 3;", &BuildOptions::default()).unwrap();
    let merged = aggregate(first.into_iter().chain(second));
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].occurrence_count, 3);
    assert_eq!(merged[0].locations.len(), 3);
}

#[test]
fn reassigned_and_untouched_lets_stay_apart() {
    let patterns = analyze(
        "let counter = 0;\ncounter++;\nlet MAX_RETRIES = 3;",
        &BuildOptions::default(),
    )
    .unwrap();
    let names: Vec<&str> = patterns.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["counter", "MAX_RETRIES"]);
    assert!(patterns.iter().all(|p| p.occurrence_count == 1));
    assert!(patterns[0].as_variable().unwrap().is_reassigned);
    assert!(!patterns[1].as_variable().unwrap().is_reassigned);
}
