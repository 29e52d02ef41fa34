// src/suggest/similarity.rs
//! Similarity between new patterns and corpus patterns.
//!
//! The weights are fixed policy: scores stay in `[0, 1]` and only the
//! thresholds in the generators depend on their exact values.

use super::variable::effective_type;
use crate::patterns::types::{FunctionShape, Parameter, VariableShape};
use std::collections::BTreeSet;

const RETURN_WEIGHT: f64 = 0.25;
const PARAMS_WEIGHT: f64 = 0.50;
const NAME_WEIGHT: f64 = 0.25;

const PARAM_TYPE_WEIGHT: f64 = 0.7;
const PARAM_NAME_WEIGHT: f64 = 0.3;

const DECLARED_TYPE_SCORE: f64 = 0.5;
const INFERRED_TYPE_SCORE: f64 = 0.3;
const MUTABILITY_SCORE: f64 = 0.2;
const DOCUMENTATION_SCORE: f64 = 0.1;
const INITIALIZER_SCORE: f64 = 0.1;
const PREFIX_BONUS: f64 = 0.1;

const SEMANTIC_PREFIXES: &[&str] = &["is", "has", "get", "set", "total", "count", "min", "max"];

/// Weighted similarity of two functions.
#[must_use]
pub fn function_similarity(
    a_name: &str,
    a: &FunctionShape,
    b_name: &str,
    b: &FunctionShape,
) -> f64 {
    let same_return = match (&a.return_type, &b.return_type) {
        (Some(x), Some(y)) => x.trim() == y.trim(),
        (None, None) => true,
        _ => false,
    };
    let score = RETURN_WEIGHT * f64::from(u8::from(same_return))
        + PARAMS_WEIGHT * parameter_similarity(&a.parameters, &b.parameters)
        + NAME_WEIGHT * name_token_overlap(a_name, b_name);
    score.clamp(0.0, 1.0)
}

/// Position-wise parameter comparison, normalized by the longer list.
#[must_use]
pub fn parameter_similarity(a: &[Parameter], b: &[Parameter]) -> f64 {
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 1.0;
    }
    let sum: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| {
            let same_type = x.type_name.trim().eq_ignore_ascii_case(y.type_name.trim());
            PARAM_TYPE_WEIGHT * f64::from(u8::from(same_type))
                + PARAM_NAME_WEIGHT * f64::from(u8::from(x.name == y.name))
        })
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let longest = longest as f64;
    sum / longest
}

/// Splits an identifier on case changes and non-alphanumeric characters.
///
/// `getUserByID` -> `["get", "user", "by", "id"]`
#[must_use]
pub fn name_tokens(name: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = name.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            flush(&mut current, &mut tokens);
            continue;
        }
        let prev = i.checked_sub(1).map(|p| chars[p]);
        let next = chars.get(i + 1).copied();
        let boundary = c.is_uppercase()
            && prev.is_some_and(|p| {
                p.is_lowercase()
                    || p.is_ascii_digit()
                    || (p.is_uppercase() && next.is_some_and(char::is_lowercase))
            });
        if boundary {
            flush(&mut current, &mut tokens);
        }
        current.extend(c.to_lowercase());
    }
    flush(&mut current, &mut tokens);
    tokens
}

fn flush(current: &mut String, tokens: &mut Vec<String>) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}

/// Shared distinct tokens over the larger distinct token count.
#[must_use]
pub fn name_token_overlap(a: &str, b: &str) -> f64 {
    let a: BTreeSet<String> = name_tokens(a).into_iter().collect();
    let b: BTreeSet<String> = name_tokens(b).into_iter().collect();
    let largest = a.len().max(b.len());
    if largest == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio = a.intersection(&b).count() as f64 / largest as f64;
    ratio
}

/// Additive similarity of two variables.
#[must_use]
pub fn variable_similarity(
    a_name: &str,
    a: &VariableShape,
    b_name: &str,
    b: &VariableShape,
) -> f64 {
    let mut score = 0.0;

    match (&a.declared_type, &b.declared_type) {
        (Some(x), Some(y)) if x.trim() == y.trim() => score += DECLARED_TYPE_SCORE,
        _ => {
            let inferred_a = effective_type(a_name, a);
            if inferred_a.is_some() && inferred_a == effective_type(b_name, b) {
                score += INFERRED_TYPE_SCORE;
            }
        }
    }
    if a.mutability == b.mutability {
        score += MUTABILITY_SCORE;
    }
    if a.has_documentation == b.has_documentation {
        score += DOCUMENTATION_SCORE;
    }
    if a.has_initializer == b.has_initializer {
        score += INITIALIZER_SCORE;
    }
    if shared_prefix(a_name, b_name).is_some() {
        score += PREFIX_BONUS;
    }
    f64::min(score, 1.0)
}

/// Semantic prefix both names start with, if any.
#[must_use]
pub fn shared_prefix(a: &str, b: &str) -> Option<&'static str> {
    let a = a.to_ascii_lowercase();
    let b = b.to_ascii_lowercase();
    SEMANTIC_PREFIXES
        .iter()
        .find(|p| a.starts_with(*p) && b.starts_with(*p))
        .copied()
}
