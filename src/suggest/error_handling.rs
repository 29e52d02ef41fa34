// src/suggest/error_handling.rs
use super::guards::{is_identifier, parameter_guard, pascal_case};
use super::types::{CodeSuggestion, SuggestionKind};
use super::SuggestionGenerator;
use crate::patterns::types::{CodePattern, FunctionShape};

/// Suggests try/catch wrappers, input guards and custom error types for
/// functions and methods.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorHandlingGenerator;

impl ErrorHandlingGenerator {
    fn rethrow_wrapper(name: &str) -> CodeSuggestion {
        CodeSuggestion::new(
            SuggestionKind::ErrorHandling,
            format!(
                "try {{\n  // body of {name}\n}} catch (error) {{\n  \
                 const reason = error instanceof Error ? error.message : String(error);\n  \
                 throw new Error(`{name} failed: ${{reason}}`, {{ cause: error }});\n}}"
            ),
            0.9,
            name,
            format!("Catch failures in '{name}' and rethrow them with context"),
        )
    }

    fn input_guards(name: &str, f: &FunctionShape) -> Vec<CodeSuggestion> {
        f.parameters
            .iter()
            .filter(|p| is_identifier(&p.name))
            .map(|p| {
                CodeSuggestion::new(
                    SuggestionKind::InputValidation,
                    parameter_guard(&p.name, &p.type_name),
                    0.8,
                    name,
                    format!("Reject invalid '{}' before '{name}' does any work", p.name),
                )
            })
            .collect()
    }

    fn custom_error(name: &str) -> CodeSuggestion {
        let error = format!("{}Error", pascal_case(name));
        CodeSuggestion::new(
            SuggestionKind::CustomErrorType,
            format!(
                "class {error} extends Error {{\n  \
                 constructor(message, options) {{\n    \
                 super(message, options);\n    \
                 this.name = '{error}';\n  }}\n}}\n\n\
                 // usage\n\
                 throw new {error}('{name} failed', {{ cause: error }});"
            ),
            0.7,
            name,
            format!("Give '{name}' its own error type so callers can tell its failures apart"),
        )
    }

    fn async_wrapper(name: &str, f: &FunctionShape) -> CodeSuggestion {
        let args = f
            .parameters
            .iter()
            .filter(|p| is_identifier(&p.name))
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let call = if f.is_method {
            format!("this.{name}({args})")
        } else {
            format!("{name}({args})")
        };
        CodeSuggestion::new(
            SuggestionKind::AsyncErrorHandling,
            format!(
                "async function {name}Safely({args}) {{\n  try {{\n    return await {call};\n  \
                 }} catch (error) {{\n    console.error('{name} failed:', error);\n    \
                 throw error;\n  }}\n}}"
            ),
            0.85,
            name,
            format!("Handle rejected promises from '{name}'"),
        )
    }
}

impl SuggestionGenerator for ErrorHandlingGenerator {
    fn name(&self) -> &'static str {
        "error_handling"
    }

    fn generate(&self, detected: &[CodePattern], _existing: &[CodePattern]) -> Vec<CodeSuggestion> {
        let mut out = Vec::new();
        for pattern in detected {
            let Some(f) = pattern.as_function() else {
                continue;
            };
            let name = pattern.name.as_str();
            if !f.has_error_handling {
                out.push(Self::rethrow_wrapper(name));
            }
            if !f.has_parameter_validation {
                out.extend(Self::input_guards(name, f));
            }
            if !f.has_custom_error {
                out.push(Self::custom_error(name));
            }
            if f.is_async && !f.has_error_handling && !f.has_promise_catch {
                out.push(Self::async_wrapper(name, f));
            }
        }
        out
    }
}
