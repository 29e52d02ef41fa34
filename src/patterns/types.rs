// src/patterns/types.rs
//! Core types for detected code patterns.
//!
//! A [`CodePattern`] pairs a name and its source locations with a
//! kind-specific [`PatternStructure`]. The structure decides which pattern
//! instances are "the same shape" through [`PatternStructure::canonical_key`].

use crate::syntax::node::{DeclarationKind, LiteralKind, SourceLocation};
use serde::{Deserialize, Serialize};

/// The kind of detected pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Function,
    Variable,
    Class,
    Interface,
    ApiCall,
    Validation,
    ErrorHandling,
}

impl PatternKind {
    /// Returns a human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Variable => "variable",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::ApiCall => "api call",
            Self::Validation => "validation",
            Self::ErrorHandling => "error handling",
        }
    }
}

/// A function parameter as seen by the generators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    /// Annotated type, `"any"` when unannotated.
    #[serde(rename = "type")]
    pub type_name: String,
}

impl Parameter {
    #[must_use]
    pub fn new(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
        }
    }

    /// True when the parameter carries a real annotation.
    #[must_use]
    pub fn is_typed(&self) -> bool {
        is_explicit_type(&self.type_name)
    }
}

/// True for a present, non-`any` type.
#[must_use]
pub fn is_explicit_type(type_name: &str) -> bool {
    let t = type_name.trim();
    !t.is_empty() && t != "any"
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionShape {
    pub parameters: Vec<Parameter>,
    pub return_type: Option<String>,
    pub has_documentation: bool,
    pub has_parameter_validation: bool,
    pub has_return_validation: bool,
    pub has_assertions: bool,
    pub has_error_handling: bool,
    pub is_async: bool,
    #[serde(default)]
    pub is_method: bool,
    /// Throws an error type other than the built-in ones.
    #[serde(default)]
    pub has_custom_error: bool,
    /// Handles rejections with `.catch(...)`.
    #[serde(default)]
    pub has_promise_catch: bool,
}

impl FunctionShape {
    /// All four quality flags set, every parameter and the return type explicit.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.has_documentation
            && self.has_parameter_validation
            && self.has_return_validation
            && self.has_assertions
            && self.parameters.iter().all(Parameter::is_typed)
            && self.return_type.as_deref().is_some_and(is_explicit_type)
    }
}

/// Literal initializer of a variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LiteralInit {
    pub kind: LiteralKind,
    pub raw: String,
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableShape {
    pub declared_type: Option<String>,
    pub mutability: DeclarationKind,
    pub has_initializer: bool,
    pub literal: Option<LiteralInit>,
    pub has_documentation: bool,
    pub is_reassigned: bool,
    pub is_mutated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassShape {
    pub has_constructor: bool,
    pub method_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldShape {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceShape {
    pub fields: Vec<FieldShape>,
}

impl InterfaceShape {
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn has_id_field(&self) -> bool {
        self.fields.iter().any(|f| f.name == "id")
    }
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCallShape {
    /// Network primitive invoked, e.g. `fetch` or `axios.get`.
    pub client: String,
    pub is_async: bool,
    pub has_error_handling: bool,
    pub has_input_validation: bool,
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationShape {
    pub guard_count: usize,
    pub throws: bool,
    /// Classified only because a parameter has a structured type.
    #[serde(default)]
    pub from_parameter_type: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorHandlingShape {
    pub logs: bool,
    pub rethrows: bool,
}

/// Kind-specific attributes of a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatternStructure {
    Function(FunctionShape),
    Variable(VariableShape),
    Class(ClassShape),
    Interface(InterfaceShape),
    ApiCall(ApiCallShape),
    Validation(ValidationShape),
    ErrorHandling(ErrorHandlingShape),
}

/// Projection of a structure used to merge equivalent instances.
/// Names and locations never take part.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CanonicalKey {
    Function {
        return_type: Option<String>,
        parameter_count: usize,
    },
    /// Every flag the variable suggestions branch on takes part.
    Variable {
        declared_type: Option<String>,
        mutability: DeclarationKind,
        literal: Option<LiteralKind>,
        has_initializer: bool,
        has_documentation: bool,
        is_reassigned: bool,
        is_mutated: bool,
    },
    Class {
        has_constructor: bool,
        method_count: usize,
    },
    Interface {
        field_count: usize,
        has_id_field: bool,
    },
    ApiCall {
        client: String,
        is_async: bool,
        has_error_handling: bool,
        has_input_validation: bool,
    },
    Validation {
        guard_count: usize,
        throws: bool,
    },
    ErrorHandling {
        logs: bool,
        rethrows: bool,
    },
}

impl PatternStructure {
    #[must_use]
    pub fn kind(&self) -> PatternKind {
        match self {
            Self::Function(_) => PatternKind::Function,
            Self::Variable(_) => PatternKind::Variable,
            Self::Class(_) => PatternKind::Class,
            Self::Interface(_) => PatternKind::Interface,
            Self::ApiCall(_) => PatternKind::ApiCall,
            Self::Validation(_) => PatternKind::Validation,
            Self::ErrorHandling(_) => PatternKind::ErrorHandling,
        }
    }

    #[must_use]
    pub fn canonical_key(&self) -> CanonicalKey {
        match self {
            Self::Function(f) => CanonicalKey::Function {
                return_type: f.return_type.clone(),
                parameter_count: f.parameters.len(),
            },
            Self::Variable(v) => CanonicalKey::Variable {
                declared_type: v.declared_type.clone(),
                mutability: v.mutability,
                literal: v.literal.as_ref().map(|l| l.kind),
                has_initializer: v.has_initializer,
                has_documentation: v.has_documentation,
                is_reassigned: v.is_reassigned,
                is_mutated: v.is_mutated,
            },
            Self::Class(c) => CanonicalKey::Class {
                has_constructor: c.has_constructor,
                method_count: c.method_count,
            },
            Self::Interface(i) => CanonicalKey::Interface {
                field_count: i.field_count(),
                has_id_field: i.has_id_field(),
            },
            Self::ApiCall(a) => CanonicalKey::ApiCall {
                client: a.client.clone(),
                is_async: a.is_async,
                has_error_handling: a.has_error_handling,
                has_input_validation: a.has_input_validation,
            },
            Self::Validation(v) => CanonicalKey::Validation {
                guard_count: v.guard_count,
                throws: v.throws,
            },
            Self::ErrorHandling(e) => CanonicalKey::ErrorHandling {
                logs: e.logs,
                rethrows: e.rethrows,
            },
        }
    }
}

/// A classified, named, located structural unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodePattern {
    pub name: String,
    pub occurrence_count: usize,
    pub structure: PatternStructure,
    pub locations: Vec<SourceLocation>,
}

impl CodePattern {
    /// A single raw detection.
    #[must_use]
    pub fn new(name: impl Into<String>, structure: PatternStructure, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            occurrence_count: 1,
            structure,
            locations: vec![location],
        }
    }

    #[must_use]
    pub fn kind(&self) -> PatternKind {
        self.structure.kind()
    }

    #[must_use]
    pub fn as_function(&self) -> Option<&FunctionShape> {
        match &self.structure {
            PatternStructure::Function(f) => Some(f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_variable(&self) -> Option<&VariableShape> {
        match &self.structure {
            PatternStructure::Variable(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_interface(&self) -> Option<&InterfaceShape> {
        match &self.structure {
            PatternStructure::Interface(i) => Some(i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_api_call(&self) -> Option<&ApiCallShape> {
        match &self.structure {
            PatternStructure::ApiCall(a) => Some(a),
            _ => None,
        }
    }

    /// First location, used as the pattern's anchor in reports.
    #[must_use]
    pub fn first_location(&self) -> Option<&SourceLocation> {
        self.locations.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_shape() -> FunctionShape {
        FunctionShape {
            parameters: vec![Parameter::new("id", "string")],
            return_type: Some("User".into()),
            has_documentation: true,
            has_parameter_validation: true,
            has_return_validation: true,
            has_assertions: true,
            ..FunctionShape::default()
        }
    }

    #[test]
    fn complete_requires_explicit_types() {
        assert!(complete_shape().is_complete());

        let mut untyped = complete_shape();
        untyped.parameters[0].type_name = "any".into();
        assert!(!untyped.is_complete());

        let mut no_return = complete_shape();
        no_return.return_type = None;
        assert!(!no_return.is_complete());
    }

    #[test]
    fn function_key_ignores_names_and_flags() {
        let a = PatternStructure::Function(complete_shape());
        let mut other = complete_shape();
        other.parameters[0].name = "userId".into();
        other.has_documentation = false;
        let b = PatternStructure::Function(other);
        assert_eq!(a.canonical_key(), b.canonical_key());
    }

    #[test]
    fn variable_key_tracks_suggestion_flags() {
        let base = VariableShape {
            declared_type: None,
            mutability: DeclarationKind::Let,
            has_initializer: true,
            literal: Some(LiteralInit {
                kind: LiteralKind::Number,
                raw: "0".into(),
            }),
            has_documentation: false,
            is_reassigned: false,
            is_mutated: false,
        };
        let key = PatternStructure::Variable(base.clone()).canonical_key();

        let mut other_raw = base.clone();
        other_raw.literal = Some(LiteralInit {
            kind: LiteralKind::Number,
            raw: "3".into(),
        });
        assert_eq!(PatternStructure::Variable(other_raw).canonical_key(), key);

        let flips: [fn(&mut VariableShape); 4] = [
            |v| v.is_reassigned = true,
            |v| v.is_mutated = true,
            |v| v.has_documentation = true,
            |v| v.has_initializer = false,
        ];
        for flip in flips {
            let mut changed = base.clone();
            flip(&mut changed);
            assert_ne!(PatternStructure::Variable(changed).canonical_key(), key);
        }
    }

    #[test]
    fn structure_serializes_with_kind_tag() {
        let s = PatternStructure::ErrorHandling(ErrorHandlingShape {
            logs: true,
            rethrows: false,
        });
        let json = serde_json::to_string(&s).unwrap_or_default();
        assert!(json.contains("\"kind\":\"error_handling\""));
        let back: PatternStructure = serde_json::from_str(&json).unwrap_or(s.clone());
        assert_eq!(back, s);
    }
}
