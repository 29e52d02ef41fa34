// src/suggest/validation.rs
//! Validation suggestions: type guards, return checks, assertions, schemas
//! and interface field guards.

use super::guards::{
    expectation, failure_condition, is_identifier, parameter_assertion, parameter_guard,
    pascal_case,
};
use super::schema::SchemaIdiom;
use super::types::{CodeSuggestion, SuggestionKind};
use super::SuggestionGenerator;
use crate::patterns::types::{CodePattern, FunctionShape, InterfaceShape};
use crate::typing::TypeExpr;
use std::fmt::Write;

const SCHEMA_NAME_WORDS: &[&str] = &["validate", "check", "verify", "parse", "transform"];

/// True when a declarative schema fits the function: a parameter of
/// object, array, union, intersection or `any` type, or a validating name.
#[must_use]
pub fn is_schema_eligible(name: &str, f: &FunctionShape) -> bool {
    let lower = name.to_ascii_lowercase();
    f.parameters
        .iter()
        .any(|p| TypeExpr::parse(&p.type_name).is_schema_candidate())
        || SCHEMA_NAME_WORDS.iter().any(|w| lower.contains(w))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationGenerator;

impl ValidationGenerator {
    fn for_function(name: &str, f: &FunctionShape, out: &mut Vec<CodeSuggestion>) {
        if f.has_parameter_validation && f.has_return_validation && f.has_assertions {
            return;
        }

        let params: Vec<_> = f
            .parameters
            .iter()
            .filter(|p| is_identifier(&p.name))
            .collect();

        if !f.has_parameter_validation {
            for p in &params {
                out.push(CodeSuggestion::new(
                    SuggestionKind::TypeGuard,
                    parameter_guard(&p.name, &p.type_name),
                    0.9,
                    name,
                    format!(
                        "Guard parameter '{}' of '{name}' against non-{} values",
                        p.name,
                        expectation(&TypeExpr::parse(&p.type_name))
                    ),
                ));
            }
        }

        if !f.has_return_validation {
            if let Some(wrapper) = return_wrapper(name, f) {
                out.push(wrapper);
            }
        }

        if !f.has_assertions {
            for p in &params {
                out.push(CodeSuggestion::new(
                    SuggestionKind::Assertion,
                    parameter_assertion(&p.name, &p.type_name),
                    0.7,
                    name,
                    format!("Assert the type of '{}' at runtime", p.name),
                ));
            }
        }

        if !f.has_parameter_validation && !params.is_empty() && is_schema_eligible(name, f) {
            for idiom in SchemaIdiom::ALL {
                out.push(CodeSuggestion::new(
                    SuggestionKind::Schema,
                    idiom.render(name, &f.parameters),
                    0.85,
                    name,
                    format!("Describe the inputs of '{name}' as a {} schema", idiom.label()),
                ));
            }
        }
    }

    fn for_interface(name: &str, iface: &InterfaceShape, out: &mut Vec<CodeSuggestion>) {
        let value = camel_case(name);
        for field in iface.fields.iter().filter(|f| is_identifier(&f.name)) {
            let access = format!("{value}.{}", field.name);
            let ty = TypeExpr::parse(&field.type_name);
            let condition = if field.optional {
                format!("{access} !== undefined && ({})", failure_condition(&access, &ty))
            } else {
                format!("!('{}' in {value}) || {}", field.name, failure_condition(&access, &ty))
            };
            out.push(CodeSuggestion::new(
                SuggestionKind::FieldGuard,
                format!(
                    "if ({condition}) {{\n  throw new TypeError(\"Invalid field '{}' on {name}: expected {}\");\n}}",
                    field.name,
                    expectation(&ty)
                ),
                0.85,
                name,
                format!("Check field '{}' of {name}", field.name),
            ));
        }
    }
}

impl SuggestionGenerator for ValidationGenerator {
    fn name(&self) -> &'static str {
        "validation"
    }

    fn generate(&self, detected: &[CodePattern], _existing: &[CodePattern]) -> Vec<CodeSuggestion> {
        let mut out = Vec::new();
        for pattern in detected {
            if let Some(f) = pattern.as_function() {
                Self::for_function(&pattern.name, f, &mut out);
            } else if let Some(iface) = pattern.as_interface() {
                Self::for_interface(&pattern.name, iface, &mut out);
            }
        }
        out
    }
}

/// Wrapper checking a function's result against its declared return type.
fn return_wrapper(name: &str, f: &FunctionShape) -> Option<CodeSuggestion> {
    let declared = f.return_type.as_deref()?;
    let (ty, is_async) = match TypeExpr::parse(declared) {
        TypeExpr::Void | TypeExpr::Undefined => return None,
        TypeExpr::Promise(inner) if matches!(*inner, TypeExpr::Void | TypeExpr::Undefined) => {
            return None
        }
        TypeExpr::Promise(inner) => (*inner, true),
        other => (other, false),
    };

    let wrapper = format!("validate{}Result", pascal_case(name));
    let mut content = String::new();
    if is_async {
        let _ = writeln!(content, "async function {wrapper}(pending) {{");
        let _ = writeln!(content, "  const result = await pending;");
    } else {
        let _ = writeln!(content, "function {wrapper}(result) {{");
    }
    let _ = writeln!(content, "  if ({}) {{", failure_condition("result", &ty));
    let _ = writeln!(
        content,
        "    throw new TypeError(\"Invalid return value from '{name}': expected {}\");",
        expectation(&ty)
    );
    content.push_str("  }\n  return result;\n}");

    Some(CodeSuggestion::new(
        SuggestionKind::ReturnValidation,
        content,
        0.8,
        name,
        format!(
            "Check that '{name}' returns {} before handing the value on",
            ty.describe()
        ),
    ))
}

fn camel_case(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(
        || "value".to_string(),
        |first| first.to_lowercase().chain(chars).collect(),
    )
}
