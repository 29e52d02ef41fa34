// src/suggest/types.rs
//! Suggestion types shared by the generators.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a suggestion proposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    /// Fill in a function from a similar one in the corpus.
    FunctionCompletion,
    Documentation,
    /// Per-parameter guard proposed while completing a function.
    ParameterGuard,
    TypeGuard,
    ReturnValidation,
    Assertion,
    Schema,
    /// Required-field guard for an interface.
    FieldGuard,
    ErrorHandling,
    InputValidation,
    CustomErrorType,
    AsyncErrorHandling,
    ConstantConversion,
    TypeAnnotation,
    DefaultValue,
    /// Convention borrowed from a similar variable in the corpus.
    SimilarVariable,
}

impl SuggestionKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FunctionCompletion => "function_completion",
            Self::Documentation => "documentation",
            Self::ParameterGuard => "parameter_guard",
            Self::TypeGuard => "type_guard",
            Self::ReturnValidation => "return_validation",
            Self::Assertion => "assertion",
            Self::Schema => "schema",
            Self::FieldGuard => "field_guard",
            Self::ErrorHandling => "error_handling",
            Self::InputValidation => "input_validation",
            Self::CustomErrorType => "custom_error_type",
            Self::AsyncErrorHandling => "async_error_handling",
            Self::ConstantConversion => "constant_conversion",
            Self::TypeAnnotation => "type_annotation",
            Self::DefaultValue => "default_value",
            Self::SimilarVariable => "similar_variable",
        }
    }
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a suggestion came from and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionContext {
    /// Name of the pattern the suggestion was generated for.
    pub source_pattern: String,
    pub description: String,
}

/// A ready-to-insert code fragment with a rationale and a confidence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeSuggestion {
    pub kind: SuggestionKind,
    pub content: String,
    pub confidence: f64,
    pub context: SuggestionContext,
}

impl CodeSuggestion {
    /// Creates a suggestion. Confidence is clamped into `[0, 1]`.
    #[must_use]
    pub fn new(
        kind: SuggestionKind,
        content: impl Into<String>,
        confidence: f64,
        source_pattern: &str,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            content: content.into(),
            confidence: confidence.clamp(0.0, 1.0),
            context: SuggestionContext {
                source_pattern: source_pattern.to_string(),
                description: description.into(),
            },
        }
    }
}
