// tests/corpus.rs
#![allow(clippy::unwrap_used)]

use codesense_core::config::CorpusConfig;
use codesense_core::corpus;
use codesense_core::orchestrator::{orchestrate, SuggestOptions};
use codesense_core::patterns::PatternKind;
use codesense_core::suggest::SuggestionKind;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "src/users.ts",
        "export async function getUser(id: string): Promise<User> { return load(id); }\n",
    );
    write(root, "src/math.js", "function twice(n) { return n * 2; }\n");
    write(root, "src/view.tsx", "const view = () => <div>hi</div>;\n");
    write(root, "src/broken.ts", "function (\n");
    write(root, "node_modules/lib/index.js", "function hidden(a, b) { return a; }\n");
    write(root, "README.md", "# not code\n");
    dir
}

#[test]
fn discovery_filters_and_sorts() {
    let dir = fixture();
    let files = corpus::discover(dir.path(), &CorpusConfig::default());
    let names: Vec<String> = files
        .iter()
        .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(
        names,
        vec!["src/broken.ts", "src/math.js", "src/users.ts", "src/view.tsx"]
    );
}

#[test]
fn collect_skips_unparsable_files() {
    let dir = fixture();
    let patterns = corpus::collect(dir.path(), &CorpusConfig::default());
    let functions: Vec<&str> = patterns
        .iter()
        .filter(|p| p.kind() == PatternKind::Function)
        .map(|p| p.name.as_str())
        .collect();
    assert!(functions.contains(&"getUser"));
    assert!(functions.contains(&"twice"));
    assert!(!functions.contains(&"hidden"));
}

#[test]
fn collection_is_deterministic() {
    let dir = fixture();
    let a = corpus::collect(dir.path(), &CorpusConfig::default());
    let b = corpus::collect(dir.path(), &CorpusConfig::default());
    assert_eq!(a, b);
}

#[test]
fn saved_corpus_drives_completion() {
    let dir = fixture();
    let patterns = corpus::collect(dir.path(), &CorpusConfig::default());
    let saved = dir.path().join("corpus.json");
    fs::write(&saved, corpus::to_json(&patterns).unwrap()).unwrap();

    let options = SuggestOptions {
        max_suggestions: usize::MAX,
        min_confidence: 0.0,
        existing_patterns: corpus::load_patterns(&saved).unwrap(),
        ..SuggestOptions::default()
    };
    let out = orchestrate("async function getUserById(id: string) { return id; }", &options).unwrap();
    assert!(out
        .iter()
        .any(|s| s.kind == SuggestionKind::FunctionCompletion && s.content.contains("Promise<User>")));
}

#[test]
fn loading_garbage_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("corpus.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(corpus::load_patterns(&path).is_err());
}

#[test]
fn react_components_in_plain_js_are_collected() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "src/App.js",
        "function App(props) { return <div className=\"app\">{props.title}</div>; }\n",
    );
    let patterns = corpus::collect(dir.path(), &CorpusConfig::default());
    assert!(patterns
        .iter()
        .any(|p| p.kind() == PatternKind::Function && p.name == "App"));
}
