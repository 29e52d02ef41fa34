// src/patterns/tracking.rs
//! Name-based reassignment and mutation tracking.
//!
//! Tracking is not scope-aware: a write to `count` anywhere in the program
//! marks every variable named `count`.

use super::scan::{walk, Visit};
use crate::syntax::node::{Expr, Program};
use std::collections::HashSet;

const MUTATING_METHODS: &[&str] = &[
    "push",
    "pop",
    "shift",
    "unshift",
    "splice",
    "sort",
    "reverse",
    "fill",
    "copyWithin",
    "set",
    "add",
    "delete",
    "clear",
];

/// Names written to after declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationFacts {
    pub reassigned: HashSet<String>,
    pub mutated: HashSet<String>,
}

impl MutationFacts {
    /// Collects facts over the whole program, nested functions included.
    #[must_use]
    pub fn collect(program: &Program) -> Self {
        let mut facts = Self::default();
        walk(&program.body, true, &mut |visit| {
            if let Visit::Expr(expr) = visit {
                facts.observe(expr);
            }
        });
        facts
    }

    /// Adds externally tracked facts. Flags are OR-ed.
    pub fn merge(&mut self, other: &Self) {
        self.reassigned.extend(other.reassigned.iter().cloned());
        self.mutated.extend(other.mutated.iter().cloned());
    }

    /// `(is_reassigned, is_mutated)` for a variable name.
    #[must_use]
    pub fn flags(&self, name: &str) -> (bool, bool) {
        (self.reassigned.contains(name), self.mutated.contains(name))
    }

    fn observe(&mut self, expr: &Expr) {
        match expr {
            Expr::Assign { target, .. } | Expr::Update { target, .. } => self.write_to(target),
            Expr::Call { callee, .. } => {
                if let Expr::Member { object, property } = callee.as_ref() {
                    if MUTATING_METHODS.contains(&property.as_str()) {
                        self.mark_mutated(object);
                    }
                }
            }
            _ => {}
        }
    }

    fn write_to(&mut self, target: &Expr) {
        match target {
            Expr::Identifier(name) => {
                self.reassigned.insert(name.clone());
            }
            Expr::Member { object, .. } => self.mark_mutated(object),
            // Destructuring assignment: every bound name is reassigned.
            Expr::Other(items) => {
                for name in items.iter().flat_map(Expr::identifiers) {
                    self.reassigned.insert(name.to_string());
                }
            }
            _ => {}
        }
    }

    fn mark_mutated(&mut self, object: &Expr) {
        if let Some(root) = object.root_identifier() {
            if root != "this" {
                self.mutated.insert(root.to_string());
            }
        }
    }
}
