// src/suggest/function.rs
//! Function completion suggestions.

use super::guards::{guard_confidence, is_identifier, parameter_guard};
use super::similarity::function_similarity;
use super::types::{CodeSuggestion, SuggestionKind};
use super::variable::humanize;
use super::SuggestionGenerator;
use crate::patterns::types::{is_explicit_type, CodePattern, FunctionShape, Parameter};
use std::fmt::Write;

/// Minimum similarity for a completion from the corpus.
const SIMILARITY_THRESHOLD: f64 = 0.5;

/// Completes functions that are missing documentation, validation, error
/// handling or types.
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionGenerator;

impl FunctionGenerator {
    fn completions(name: &str, f: &FunctionShape, existing: &[CodePattern]) -> Vec<CodeSuggestion> {
        existing
            .iter()
            .filter_map(|other| {
                let shape = other.as_function()?;
                let score = function_similarity(name, f, &other.name, shape);
                (score > SIMILARITY_THRESHOLD).then(|| {
                    CodeSuggestion::new(
                        SuggestionKind::FunctionCompletion,
                        completed_signature(name, f, shape),
                        score,
                        name,
                        format!(
                            "'{name}' resembles '{}' (similarity {score:.2}); complete it the same way",
                            other.name
                        ),
                    )
                })
            })
            .collect()
    }

    fn parameter_guards(name: &str, f: &FunctionShape) -> Vec<CodeSuggestion> {
        f.parameters
            .iter()
            .filter(|p| is_identifier(&p.name))
            .map(|p| {
                CodeSuggestion::new(
                    SuggestionKind::ParameterGuard,
                    parameter_guard(&p.name, &p.type_name),
                    guard_confidence(&p.type_name),
                    name,
                    format!("Validate parameter '{}' of '{name}'", p.name),
                )
            })
            .collect()
    }

    fn error_handling(name: &str) -> CodeSuggestion {
        CodeSuggestion::new(
            SuggestionKind::ErrorHandling,
            format!(
                "try {{\n  // body of {name}\n}} catch (error) {{\n  \
                 console.error('{name} failed:', error);\n  throw error;\n}}"
            ),
            0.8,
            name,
            format!("Wrap the body of '{name}' in try/catch"),
        )
    }
}

impl SuggestionGenerator for FunctionGenerator {
    fn name(&self) -> &'static str {
        "function"
    }

    fn generate(&self, detected: &[CodePattern], existing: &[CodePattern]) -> Vec<CodeSuggestion> {
        let mut out = Vec::new();
        for pattern in detected {
            let Some(f) = pattern.as_function() else {
                continue;
            };
            if f.is_complete() {
                continue;
            }
            let name = pattern.name.as_str();

            out.extend(Self::completions(name, f, existing));
            if !f.has_documentation {
                out.push(CodeSuggestion::new(
                    SuggestionKind::Documentation,
                    doc_block(name, f),
                    0.9,
                    name,
                    format!("Document '{name}' with its parameters and return value"),
                ));
            }
            if !f.has_parameter_validation {
                out.extend(Self::parameter_guards(name, f));
            }
            if !f.has_error_handling {
                out.push(Self::error_handling(name));
            }
        }
        out
    }
}

/// JSDoc block for a function.
#[must_use]
pub fn doc_block(name: &str, f: &FunctionShape) -> String {
    let mut out = format!("/**\n * {}.\n", humanize(name));
    for p in &f.parameters {
        let _ = writeln!(out, " * @param {{{}}} {}", p.type_name, p.name);
    }
    if let Some(ret) = &f.return_type {
        let _ = writeln!(out, " * @returns {{{ret}}}");
    }
    out.push_str(" */");
    out
}

/// Signature of `f` with missing types taken from `model`.
fn completed_signature(name: &str, f: &FunctionShape, model: &FunctionShape) -> String {
    let params: Vec<String> = f
        .parameters
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let type_name = pick_type(p, model.parameters.get(i));
            format!("{}: {type_name}", p.name)
        })
        .collect();
    let return_type = f
        .return_type
        .as_deref()
        .filter(|t| is_explicit_type(t))
        .or(model.return_type.as_deref())
        .unwrap_or("void");
    let prefix = if f.is_async || model.is_async {
        "async "
    } else {
        ""
    };
    format!(
        "{prefix}function {name}({}): {return_type} {{\n  // ...\n}}",
        params.join(", ")
    )
}

fn pick_type<'a>(own: &'a Parameter, model: Option<&'a Parameter>) -> &'a str {
    if own.is_typed() {
        return &own.type_name;
    }
    model
        .filter(|m| m.is_typed())
        .map_or(own.type_name.as_str(), |m| m.type_name.as_str())
}
