// src/suggest/variable.rs
//! Variable naming and typing suggestions.

use super::similarity::{name_tokens, variable_similarity};
use super::types::{CodeSuggestion, SuggestionKind};
use super::SuggestionGenerator;
use crate::patterns::types::{CodePattern, VariableShape};
use crate::syntax::node::DeclarationKind;
use crate::typing::TypeExpr;

const CONSTANT_PREFIXES: &[&str] = &["max_", "min_", "default_", "config_"];

const BOOLEAN_STARTS: &[&str] = &["is", "has", "should", "can", "will"];
const BOOLEAN_WORDS: &[&str] = &["flag", "enabled", "visible"];
const NUMBER_WORDS: &[&str] = &["count", "index", "length", "size", "amount", "total"];
const STRING_WORDS: &[&str] = &[
    "name",
    "title",
    "description",
    "label",
    "message",
    "text",
    "email",
    "phone",
    "address",
];
const ARRAY_WORDS: &[&str] = &["list", "array", "collection", "items"];
const DATE_WORDS: &[&str] = &["date", "time", "timestamp"];
const OBJECT_WORDS: &[&str] = &["options", "config", "settings", "props", "params"];

/// Minimum similarity for a convention suggestion.
const SIMILARITY_THRESHOLD: f64 = 0.5;

/// Type implied by a variable name, first matching rule wins.
#[must_use]
pub fn infer_type_from_name(name: &str) -> Option<&'static str> {
    let lower = name.to_ascii_lowercase();
    let first = name_tokens(name).into_iter().next().unwrap_or_default();
    let contains_any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if BOOLEAN_STARTS.contains(&first.as_str()) || contains_any(BOOLEAN_WORDS) {
        Some("boolean")
    } else if contains_any(NUMBER_WORDS) {
        Some("number")
    } else if contains_any(STRING_WORDS) {
        Some("string")
    } else if lower.ends_with('s') || contains_any(ARRAY_WORDS) {
        Some("any[]")
    } else if contains_any(DATE_WORDS) {
        Some("Date")
    } else if contains_any(OBJECT_WORDS) {
        Some("object")
    } else {
        None
    }
}

/// Declared type, else the literal initializer's type, else the name's.
#[must_use]
pub fn effective_type(name: &str, shape: &VariableShape) -> Option<String> {
    shape
        .declared_type
        .as_ref()
        .map(|t| t.trim().to_string())
        .or_else(|| shape.literal.as_ref().map(|l| l.kind.type_name().to_string()))
        .or_else(|| infer_type_from_name(name).map(str::to_string))
}

/// Zero value for a type, when one is known.
#[must_use]
pub fn default_value(type_name: &str) -> Option<&'static str> {
    match TypeExpr::parse(type_name) {
        TypeExpr::String => Some("''"),
        TypeExpr::Number => Some("0"),
        TypeExpr::Boolean => Some("false"),
        TypeExpr::Object | TypeExpr::Record | TypeExpr::ObjectLiteral => Some("{}"),
        TypeExpr::Array(_) => Some("[]"),
        TypeExpr::Date => Some("new Date()"),
        _ => None,
    }
}

/// `MAX_USER_COUNT` -> `Max user count`
#[must_use]
pub fn humanize(name: &str) -> String {
    let words = name_tokens(name).join(" ");
    let mut chars = words.chars();
    chars.next().map_or_else(
        || name.to_string(),
        |first| first.to_uppercase().chain(chars).collect(),
    )
}

fn is_constant_name(name: &str) -> bool {
    name.chars().any(char::is_alphabetic) && !name.chars().any(char::is_lowercase)
}

fn has_constant_prefix(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    CONSTANT_PREFIXES.iter().any(|p| lower.starts_with(p))
}

fn annotation(type_name: Option<&str>) -> String {
    type_name.map_or_else(String::new, |t| format!(": {t}"))
}

/// Suggests `const`, type annotations, doc blocks, defaults and corpus
/// conventions for variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariableGenerator;

impl VariableGenerator {
    fn constant_conversion(name: &str, v: &VariableShape) -> Option<CodeSuggestion> {
        if v.mutability == DeclarationKind::Const || v.is_reassigned || v.is_mutated {
            return None;
        }
        if !v.has_initializer {
            return None;
        }
        let named_constant = is_constant_name(name) || has_constant_prefix(name);
        if !named_constant && v.literal.is_none() {
            return None;
        }
        let value = v
            .literal
            .as_ref()
            .map_or("/* current initializer */", |l| l.raw.as_str());
        let content = format!(
            "const {name}{} = {value};",
            annotation(v.declared_type.as_deref())
        );
        let (confidence, reason) = if named_constant {
            (0.9, "is named like a constant")
        } else {
            (0.8, "is initialized with a literal")
        };
        Some(CodeSuggestion::new(
            SuggestionKind::ConstantConversion,
            content,
            confidence,
            name,
            format!(
                "'{name}' is never reassigned and {reason}; declare it with const instead of {}",
                v.mutability.keyword()
            ),
        ))
    }

    fn type_annotation(name: &str, v: &VariableShape) -> Option<CodeSuggestion> {
        if v.declared_type.is_some() {
            return None;
        }
        let (type_name, confidence, source) = match &v.literal {
            Some(lit) => (lit.kind.type_name(), 0.8, "its initializer"),
            None => (infer_type_from_name(name)?, 0.7, "its name"),
        };
        let init = v
            .literal
            .as_ref()
            .map_or_else(String::new, |l| format!(" = {}", l.raw));
        Some(CodeSuggestion::new(
            SuggestionKind::TypeAnnotation,
            format!("{} {name}: {type_name}{init};", v.mutability.keyword()),
            confidence,
            name,
            format!("Annotate '{name}' as {type_name}, inferred from {source}"),
        ))
    }

    fn documentation(name: &str, v: &VariableShape) -> Option<CodeSuggestion> {
        if v.has_documentation {
            return None;
        }
        let type_name = effective_type(name, v).unwrap_or_else(|| "*".to_string());
        Some(CodeSuggestion::new(
            SuggestionKind::Documentation,
            format!("/**\n * {}.\n * @type {{{type_name}}}\n */", humanize(name)),
            0.9,
            name,
            format!("Document '{name}'"),
        ))
    }

    fn default_value(name: &str, v: &VariableShape) -> Option<CodeSuggestion> {
        if v.has_initializer {
            return None;
        }
        let type_name = effective_type(name, v)?;
        let value = default_value(&type_name)?;
        Some(CodeSuggestion::new(
            SuggestionKind::DefaultValue,
            format!("{} {name}: {type_name} = {value};", v.mutability.keyword()),
            0.7,
            name,
            format!("Initialize '{name}' with a default {type_name} value"),
        ))
    }

    fn similar(name: &str, v: &VariableShape, existing: &[CodePattern]) -> Vec<CodeSuggestion> {
        existing
            .iter()
            .filter_map(|other| {
                let shape = other.as_variable()?;
                let score = variable_similarity(name, v, &other.name, shape);
                if score <= SIMILARITY_THRESHOLD {
                    return None;
                }
                let type_name = shape
                    .declared_type
                    .clone()
                    .or_else(|| effective_type(&other.name, shape));
                let init = v
                    .literal
                    .as_ref()
                    .map_or_else(String::new, |l| format!(" = {}", l.raw));
                Some(CodeSuggestion::new(
                    SuggestionKind::SimilarVariable,
                    format!(
                        "{} {name}{}{init};",
                        shape.mutability.keyword(),
                        annotation(type_name.as_deref())
                    ),
                    score,
                    name,
                    format!(
                        "Follow the conventions of '{}' (similarity {score:.2})",
                        other.name
                    ),
                ))
            })
            .collect()
    }
}

impl SuggestionGenerator for VariableGenerator {
    fn name(&self) -> &'static str {
        "variable"
    }

    fn generate(&self, detected: &[CodePattern], existing: &[CodePattern]) -> Vec<CodeSuggestion> {
        let mut out = Vec::new();
        for pattern in detected {
            let Some(v) = pattern.as_variable() else {
                continue;
            };
            let name = pattern.name.as_str();
            out.extend(Self::constant_conversion(name, v));
            out.extend(Self::type_annotation(name, v));
            out.extend(Self::documentation(name, v));
            out.extend(Self::default_value(name, v));
            out.extend(Self::similar(name, v, existing));
        }
        out
    }
}
