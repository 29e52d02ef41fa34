// src/orchestrator.rs
//! The suggestion pipeline: build, detect, aggregate, generate, rank.

use crate::error::ParseError;
use crate::patterns::types::{ApiCallShape, CodePattern, FunctionShape};
use crate::patterns::{aggregate, detect};
use crate::suggest::guards::{expectation, failure_condition, is_identifier};
use crate::suggest::{default_generators, CodeSuggestion, SuggestionKind};
use crate::syntax::{build, BuildOptions};
use crate::typing::TypeExpr;
use std::fmt::Write;

pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.5;

/// Options for one pipeline run.
#[derive(Debug, Clone)]
pub struct SuggestOptions {
    pub max_suggestions: usize,
    pub min_confidence: f64,
    /// Source of previously written code, detected as extra corpus.
    pub existing_code: Option<String>,
    /// Caller-maintained corpus. Read only.
    pub existing_patterns: Vec<CodePattern>,
    pub build: BuildOptions,
}

impl Default for SuggestOptions {
    fn default() -> Self {
        Self {
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            existing_code: None,
            existing_patterns: Vec::new(),
            build: BuildOptions::default(),
        }
    }
}

/// Parses, detects and aggregates the patterns of one source text.
///
/// # Errors
/// Returns [`ParseError`] if the text cannot be parsed.
pub fn analyze(source: &str, options: &BuildOptions) -> Result<Vec<CodePattern>, ParseError> {
    let program = build(source, options)?;
    Ok(aggregate(detect(&program)))
}

/// Runs every generator over `source` and returns the ranked suggestions.
///
/// The result is sorted by descending confidence; ties keep generator
/// order, then detection order. Every element has a confidence of at least
/// `min_confidence` and there are at most `max_suggestions`.
///
/// # Errors
/// Returns [`ParseError`] if `source` or `existing_code` cannot be parsed.
pub fn orchestrate(source: &str, options: &SuggestOptions) -> Result<Vec<CodeSuggestion>, ParseError> {
    let patterns = analyze(source, &options.build)?;

    let mut corpus = options.existing_patterns.clone();
    if let Some(existing) = &options.existing_code {
        corpus.extend(analyze(existing, &options.build)?);
    }
    tracing::debug!(
        patterns = patterns.len(),
        corpus = corpus.len(),
        "running generators"
    );

    let mut suggestions = Vec::new();
    for generator in default_generators() {
        let produced = generator.generate(&patterns, &corpus);
        tracing::trace!(generator = generator.name(), count = produced.len(), "generated");
        suggestions.extend(produced);
    }
    suggestions.extend(ad_hoc_rules(&patterns));

    let ranked = rank(suggestions, options.min_confidence, options.max_suggestions);
    tracing::debug!(returned = ranked.len(), "ranked suggestions");
    Ok(ranked)
}

/// Filters by confidence, sorts descending (stable) and truncates.
#[must_use]
pub fn rank(
    suggestions: Vec<CodeSuggestion>,
    min_confidence: f64,
    max_suggestions: usize,
) -> Vec<CodeSuggestion> {
    let total = suggestions.len();
    let mut kept: Vec<CodeSuggestion> = suggestions
        .into_iter()
        .filter(|s| s.confidence >= min_confidence)
        .collect();
    tracing::trace!(total, kept = kept.len(), min_confidence, "filtered suggestions");

    kept.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    kept.truncate(max_suggestions);
    kept
}

/// Kind-specific rules outside the four generators: a combined guard block
/// for unvalidated functions and response checks for every API call.
fn ad_hoc_rules(patterns: &[CodePattern]) -> Vec<CodeSuggestion> {
    let mut out = Vec::new();
    for pattern in patterns {
        if let Some(f) = pattern.as_function() {
            if !f.has_parameter_validation {
                out.extend(guard_block(&pattern.name, f));
            }
        }
        if let Some(api) = pattern.as_api_call() {
            out.push(api_error_handling(&pattern.name, api));
        }
    }
    out
}

fn guard_block(name: &str, f: &FunctionShape) -> Option<CodeSuggestion> {
    let params: Vec<_> = f
        .parameters
        .iter()
        .filter(|p| is_identifier(&p.name))
        .collect();
    if params.is_empty() {
        return None;
    }
    let mut content = String::new();
    for p in &params {
        let ty = TypeExpr::parse(&p.type_name);
        let _ = writeln!(
            content,
            "if ({}) throw new TypeError(\"{name}: '{}' must be {}\");",
            failure_condition(&p.name, &ty),
            p.name,
            expectation(&ty)
        );
    }
    Some(CodeSuggestion::new(
        SuggestionKind::InputValidation,
        content.trim_end(),
        0.8,
        name,
        format!("Validate every parameter at the top of '{name}'"),
    ))
}

fn api_error_handling(name: &str, api: &ApiCallShape) -> CodeSuggestion {
    let confidence = if api.has_error_handling { 0.6 } else { 0.85 };
    let call = if api.is_async {
        format!("await {}(/* request */)", api.client)
    } else {
        format!("{}(/* request */)", api.client)
    };
    let content = format!(
        "try {{\n  const response = {call};\n  if (!response.ok) {{\n    \
         throw new Error(`{name} request failed with status ${{response.status}}`);\n  }}\n  \
         return response;\n}} catch (error) {{\n  \
         console.error('{name} request failed:', error);\n  throw error;\n}}"
    );
    let description = if api.has_error_handling {
        format!("Check the response status of the {} call in '{name}'", api.client)
    } else {
        format!("Handle network failures of the {} call in '{name}'", api.client)
    };
    CodeSuggestion::new(SuggestionKind::ErrorHandling, content, confidence, name, description)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn suggestion(confidence: f64, tag: &str) -> CodeSuggestion {
        CodeSuggestion::new(SuggestionKind::Documentation, tag, confidence, tag, "")
    }

    #[test]
    fn rank_filters_sorts_and_truncates() {
        let ranked = rank(
            vec![
                suggestion(0.7, "a"),
                suggestion(0.9, "b"),
                suggestion(0.4, "c"),
                suggestion(0.9, "d"),
                suggestion(0.8, "e"),
            ],
            0.5,
            3,
        );
        let tags: Vec<&str> = ranked.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(tags, vec!["b", "d", "e"]);
    }

    #[test]
    fn api_calls_get_response_checks() {
        let source = "async function loadUser(id) { const res = await fetch('/u/' + id); return res.json(); }";
        let options = SuggestOptions {
            max_suggestions: 50,
            ..SuggestOptions::default()
        };
        let out = orchestrate(source, &options).unwrap();
        let api = out
            .iter()
            .find(|s| s.content.contains("response.ok"))
            .unwrap();
        assert!((api.confidence - 0.85).abs() < 1e-9);
        assert!(api.content.contains("await fetch(/* request */)"));
    }

    #[test]
    fn guard_block_covers_all_parameters() {
        let source = "function add(a: number, b: number): number { return a + b; }";
        let options = SuggestOptions {
            max_suggestions: 50,
            ..SuggestOptions::default()
        };
        let out = orchestrate(source, &options).unwrap();
        let block = out
            .iter()
            .find(|s| s.context.description.starts_with("Validate every parameter"))
            .unwrap();
        assert!(block.content.contains("add: 'a' must be number"));
        assert!(block.content.contains("add: 'b' must be number"));
    }

    #[test]
    fn parse_errors_propagate() {
        let err = orchestrate("function (", &SuggestOptions::default()).unwrap_err();
        assert!(err.to_string().starts_with("could not analyze this code"));
    }

    #[test]
    fn existing_code_must_parse_too() {
        let options = SuggestOptions {
            existing_code: Some("let = ;".into()),
            ..SuggestOptions::default()
        };
        assert!(orchestrate("let x = 1;", &options).is_err());
    }

    #[test]
    fn source_error_is_reported_before_existing_code() {
        let options = SuggestOptions {
            existing_code: Some("\n\n\nlet = ;".into()),
            ..SuggestOptions::default()
        };
        let err = orchestrate("function (", &options).unwrap_err();
        assert_eq!(err.line, 1);
    }
}
