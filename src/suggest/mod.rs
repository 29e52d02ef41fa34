// src/suggest/mod.rs
//! Suggestion generators.
//!
//! Each generator reads detected patterns plus a read-only corpus of
//! existing patterns and returns candidate suggestions. Generators never
//! fail; nothing applicable means an empty list.

pub mod error_handling;
pub mod function;
pub mod guards;
pub mod schema;
pub mod similarity;
pub mod types;
pub mod validation;
pub mod variable;

use crate::patterns::types::CodePattern;

pub use error_handling::ErrorHandlingGenerator;
pub use function::FunctionGenerator;
pub use schema::SchemaIdiom;
pub use types::{CodeSuggestion, SuggestionContext, SuggestionKind};
pub use validation::ValidationGenerator;
pub use variable::VariableGenerator;

/// A source of suggestions for one concern.
pub trait SuggestionGenerator {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Suggestions for `detected`, using `existing` as the similarity corpus.
    fn generate(&self, detected: &[CodePattern], existing: &[CodePattern]) -> Vec<CodeSuggestion>;
}

/// The four generators in the order their output is concatenated.
#[must_use]
pub fn default_generators() -> Vec<Box<dyn SuggestionGenerator>> {
    vec![
        Box::new(FunctionGenerator),
        Box::new(VariableGenerator),
        Box::new(ValidationGenerator),
        Box::new(ErrorHandlingGenerator),
    ]
}
