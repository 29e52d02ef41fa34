// src/suggest/guards.rs
//! Type-to-check mapping shared by every generator that renders guards.
//!
//! | Type            | Failing condition                                        |
//! |-----------------|----------------------------------------------------------|
//! | string          | `typeof x !== 'string'`                                  |
//! | number          | `typeof x !== 'number'`                                  |
//! | boolean         | `typeof x !== 'boolean'`                                 |
//! | object / record | `typeof x !== 'object' \|\| x === null \|\| Array.isArray(x)` |
//! | entity (`User`) | object check plus `'id' in x` and `'name' in x`          |
//! | built-in class  | `!(x instanceof Map)`                                    |
//! | `T[]`           | `!Array.isArray(x)` plus an element check when `T` is known |
//! | `A \| B`        | negated disjunction of the branch checks                 |
//! | unknown / any   | `x === null \|\| x === undefined`                        |

use crate::typing::TypeExpr;

/// Condition that holds when `expr` satisfies `ty`.
#[must_use]
pub fn valid_condition(expr: &str, ty: &TypeExpr) -> String {
    match ty {
        TypeExpr::String => format!("typeof {expr} === 'string'"),
        TypeExpr::Number => format!("typeof {expr} === 'number'"),
        TypeExpr::Boolean => format!("typeof {expr} === 'boolean'"),
        TypeExpr::Function => format!("typeof {expr} === 'function'"),
        TypeExpr::Object
        | TypeExpr::Record
        | TypeExpr::ObjectLiteral
        | TypeExpr::Intersection(_) => {
            format!("typeof {expr} === 'object' && {expr} !== null && !Array.isArray({expr})")
        }
        TypeExpr::Entity(_) => format!(
            "typeof {expr} === 'object' && {expr} !== null && !Array.isArray({expr}) \
             && 'id' in {expr} && 'name' in {expr}"
        ),
        TypeExpr::Array(inner) => match element_check(inner) {
            Some(check) => format!("Array.isArray({expr}) && {expr}.every({check})"),
            None => format!("Array.isArray({expr})"),
        },
        TypeExpr::Union(branches) => branches
            .iter()
            .map(|b| parenthesize(&valid_condition(expr, b)))
            .collect::<Vec<_>>()
            .join(" || "),
        TypeExpr::Date => format!("{expr} instanceof Date"),
        TypeExpr::Instance(name) => format!("{expr} instanceof {name}"),
        TypeExpr::Promise(_) => format!("{expr} instanceof Promise"),
        TypeExpr::Null => format!("{expr} === null"),
        TypeExpr::Undefined | TypeExpr::Void => format!("{expr} === undefined"),
        TypeExpr::Any | TypeExpr::Unknown | TypeExpr::Other(_) => {
            format!("{expr} !== null && {expr} !== undefined")
        }
    }
}

/// Condition that holds when `expr` does not satisfy `ty`.
#[must_use]
pub fn failure_condition(expr: &str, ty: &TypeExpr) -> String {
    match ty {
        TypeExpr::String => format!("typeof {expr} !== 'string'"),
        TypeExpr::Number => format!("typeof {expr} !== 'number'"),
        TypeExpr::Boolean => format!("typeof {expr} !== 'boolean'"),
        TypeExpr::Function => format!("typeof {expr} !== 'function'"),
        TypeExpr::Object
        | TypeExpr::Record
        | TypeExpr::ObjectLiteral
        | TypeExpr::Intersection(_) => {
            format!("typeof {expr} !== 'object' || {expr} === null || Array.isArray({expr})")
        }
        TypeExpr::Entity(_) => format!(
            "typeof {expr} !== 'object' || {expr} === null || Array.isArray({expr}) \
             || !('id' in {expr}) || !('name' in {expr})"
        ),
        TypeExpr::Array(inner) => match element_check(inner) {
            Some(check) => format!("!Array.isArray({expr}) || !{expr}.every({check})"),
            None => format!("!Array.isArray({expr})"),
        },
        TypeExpr::Date => format!("!({expr} instanceof Date)"),
        TypeExpr::Any | TypeExpr::Unknown | TypeExpr::Other(_) => {
            format!("{expr} === null || {expr} === undefined")
        }
        _ => format!("!({})", valid_condition(expr, ty)),
    }
}

/// Arrow function checking one array element, when the element type is known.
fn element_check(inner: &TypeExpr) -> Option<String> {
    if matches!(
        inner,
        TypeExpr::Any | TypeExpr::Unknown | TypeExpr::Other(_)
    ) {
        return None;
    }
    Some(format!("(item) => {}", valid_condition("item", inner)))
}

fn parenthesize(condition: &str) -> String {
    if condition.contains("&&") || condition.contains("||") {
        format!("({condition})")
    } else {
        condition.to_string()
    }
}

/// What a failed check expected, for error messages.
#[must_use]
pub fn expectation(ty: &TypeExpr) -> String {
    match ty {
        TypeExpr::Any | TypeExpr::Unknown | TypeExpr::Other(_) => "a value".to_string(),
        other => other.describe(),
    }
}

/// `if (...) { throw new TypeError(...) }` for one parameter.
#[must_use]
pub fn parameter_guard(param: &str, type_name: &str) -> String {
    let ty = TypeExpr::parse(type_name);
    format!(
        "if ({}) {{\n  throw new TypeError(\"Invalid parameter '{param}': expected {}\");\n}}",
        failure_condition(param, &ty),
        expectation(&ty)
    )
}

/// `console.assert(...)` for one parameter.
#[must_use]
pub fn parameter_assertion(param: &str, type_name: &str) -> String {
    let ty = TypeExpr::parse(type_name);
    format!(
        "console.assert({}, \"'{param}' must be {}\");",
        valid_condition(param, &ty),
        expectation(&ty)
    )
}

/// Confidence of a per-parameter guard: primitives are certain, structured
/// checks less so, bare presence checks least.
#[must_use]
pub fn guard_confidence(type_name: &str) -> f64 {
    let ty = TypeExpr::parse(type_name);
    match ty {
        TypeExpr::Any | TypeExpr::Unknown | TypeExpr::Other(_) => 0.7,
        ref t if t.is_structured() => 0.8,
        _ => 0.9,
    }
}

/// True for a plain identifier that can be referenced in generated code.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// `calculateTotal` -> `CalculateTotal`.
#[must_use]
pub fn pascal_case(name: &str) -> String {
    let mut chars = name.trim_matches(|c: char| !c.is_alphanumeric()).chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.filter(|c| c.is_alphanumeric() || *c == '_')).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_guards() {
        let guard = parameter_guard("name", "string");
        assert!(guard.contains("typeof name !== 'string'"));
        assert!(guard.contains("Invalid parameter 'name': expected string"));
        assert!(parameter_guard("age", "Number").contains("typeof age !== 'number'"));
    }

    #[test]
    fn entity_guard_checks_required_subfields() {
        let guard = parameter_guard("user", "User");
        assert!(guard.contains("Array.isArray(user)"));
        assert!(guard.contains("!('id' in user)"));
        assert!(guard.contains("!('name' in user)"));
        assert!(!parameter_guard("opts", "object").contains("'id'"));
    }

    #[test]
    fn builtin_class_guard_uses_instanceof() {
        let cond = failure_condition("cache", &TypeExpr::parse("Map<string, User>"));
        assert_eq!(cond, "!(cache instanceof Map)");
        let guard = parameter_guard("el", "HTMLElement");
        assert!(guard.contains("!(el instanceof HTMLElement)"));
        assert!(!guard.contains("'id' in"));
        assert!(guard.contains("expected HTMLElement"));
        assert!(parameter_guard("opts", "Partial<User>").contains("typeof opts !== 'object'"));
        assert!((guard_confidence("Map<string, User>") - 0.9).abs() < 1e-9);
    }

    #[test]
    fn array_guard_checks_elements_when_known() {
        let typed = failure_condition("roles", &TypeExpr::parse("string[]"));
        assert_eq!(
            typed,
            "!Array.isArray(roles) || !roles.every((item) => typeof item === 'string')"
        );
        let untyped = failure_condition("rows", &TypeExpr::parse("any[]"));
        assert_eq!(untyped, "!Array.isArray(rows)");
    }

    #[test]
    fn union_guard_is_negated_disjunction() {
        let cond = failure_condition("id", &TypeExpr::parse("string | number"));
        assert_eq!(cond, "!(typeof id === 'string' || typeof id === 'number')");
    }

    #[test]
    fn unknown_type_gets_presence_check() {
        let guard = parameter_guard("x", "any");
        assert!(guard.contains("x === null || x === undefined"));
        assert!(guard.contains("expected a value"));
    }

    #[test]
    fn assertion_uses_positive_condition() {
        assert_eq!(
            parameter_assertion("age", "number"),
            "console.assert(typeof age === 'number', \"'age' must be number\");"
        );
    }

    #[test]
    fn confidence_by_type() {
        assert!((guard_confidence("string") - 0.9).abs() < 1e-9);
        assert!((guard_confidence("User") - 0.8).abs() < 1e-9);
        assert!((guard_confidence("any") - 0.7).abs() < 1e-9);
    }

    #[test]
    fn names() {
        assert!(is_identifier("userId"));
        assert!(!is_identifier("{ id }"));
        assert_eq!(pascal_case("calculateTotal"), "CalculateTotal");
    }
}
