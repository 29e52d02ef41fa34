// src/corpus.rs
//! Collects a pattern corpus from a directory tree.
//!
//! This is a caller-side helper: the suggestion pipeline itself never touches
//! the filesystem, it only receives the corpus this module produces.

use crate::config::CorpusConfig;
use crate::error::{CodesenseError, Result};
use crate::patterns::{aggregate, detect, CodePattern};
use crate::syntax::{build, BuildOptions, Dialect, GrammarFeature};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Walks `root`, detects the patterns of every source file and aggregates
/// them into one corpus. Files that cannot be read or parsed are skipped.
#[must_use]
pub fn collect(root: &Path, config: &CorpusConfig) -> Vec<CodePattern> {
    let files = discover(root, config);
    tracing::debug!(root = %root.display(), files = files.len(), "collecting corpus");

    let per_file: Vec<Vec<CodePattern>> = files.par_iter().filter_map(|p| analyze_file(p)).collect();
    let analyzed = per_file.len();
    let patterns = aggregate(per_file.into_iter().flatten());

    tracing::debug!(
        analyzed,
        skipped = files.len() - analyzed,
        patterns = patterns.len(),
        "corpus collected"
    );
    patterns
}

/// Source files under `root` matching the configured extensions, sorted by
/// path. Excluded directory names are pruned without being entered.
#[must_use]
pub fn discover(root: &Path, config: &CorpusConfig) -> Vec<PathBuf> {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0 || !is_excluded(&e.file_name().to_string_lossy(), config)
        });

    let mut paths = Vec::new();
    let mut errors = 0usize;
    for item in walker {
        match item {
            Ok(entry) => {
                if entry.file_type().is_file() && has_extension(entry.path(), config) {
                    paths.push(entry.into_path());
                }
            }
            Err(_) => errors += 1,
        }
    }
    if errors > 0 {
        tracing::warn!(errors, "some entries could not be read during the walk");
    }
    paths.sort();
    paths
}

fn is_excluded(name: &str, config: &CorpusConfig) -> bool {
    config.exclude.iter().any(|x| x == name)
}

fn has_extension(path: &Path, config: &CorpusConfig) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| config.extensions.iter().any(|x| x == ext))
}

/// Build options for one file: dialect from the extension, JSX for the
/// `.tsx`/`.jsx` flavours and for plain `.js`, where React components
/// commonly live. Unknown extensions fall back to inference.
#[must_use]
pub fn options_for(path: &Path) -> BuildOptions {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let mut options = BuildOptions::default();
    if let Some(dialect) = Dialect::from_ext(ext) {
        options = options.with_dialect(dialect);
    }
    if matches!(ext, "tsx" | "jsx" | "js") {
        options = options.with_feature(GrammarFeature::Jsx);
    }
    options
}

fn analyze_file(path: &Path) -> Option<Vec<CodePattern>> {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
            return None;
        }
    };
    match build(&source, &options_for(path)) {
        Ok(program) => Some(detect(&program)),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping file");
            None
        }
    }
}

/// Reads a corpus previously written by [`to_json`].
///
/// # Errors
/// Returns `CodesenseError::Io` if the file cannot be read and
/// `CodesenseError::Json` if it is not a pattern list.
pub fn load_patterns(path: &Path) -> Result<Vec<CodePattern>> {
    let content = fs::read_to_string(path).map_err(|source| CodesenseError::Io {
        source,
        path: path.to_path_buf(),
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// Serializes a corpus as pretty JSON.
///
/// # Errors
/// Returns `CodesenseError::Json` if serialization fails.
pub fn to_json(patterns: &[CodePattern]) -> Result<String> {
    Ok(serde_json::to_string_pretty(patterns)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn dialect_follows_extension() {
        let ts = options_for(Path::new("a/b.ts"));
        assert_eq!(ts.dialect, Some(Dialect::Typed));
        assert!(!ts.has_feature(GrammarFeature::Jsx));

        let jsx = options_for(Path::new("view.jsx"));
        assert_eq!(jsx.dialect, Some(Dialect::Untyped));
        assert!(jsx.has_feature(GrammarFeature::Jsx));

        let js = options_for(Path::new("src/App.js"));
        assert_eq!(js.dialect, Some(Dialect::Untyped));
        assert!(js.has_feature(GrammarFeature::Jsx));
        assert!(!options_for(Path::new("lib.mjs")).has_feature(GrammarFeature::Jsx));

        assert_eq!(options_for(Path::new("script")).dialect, None);
    }

    #[test]
    fn extension_filter() {
        let config = CorpusConfig::default();
        assert!(has_extension(Path::new("x.mjs"), &config));
        assert!(!has_extension(Path::new("x.rs"), &config));
        assert!(!has_extension(Path::new("Makefile"), &config));
    }

    #[test]
    fn json_keeps_patterns() {
        let source = "function add(a: number, b: number): number { return a + b; }";
        let program = build(source, &BuildOptions::default()).unwrap();
        let patterns = aggregate(detect(&program));
        let json = to_json(&patterns).unwrap();
        let back: Vec<CodePattern> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, patterns);
        assert!(json.contains("\"kind\""));
    }
}
