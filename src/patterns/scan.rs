// src/patterns/scan.rs
//! Body scanning: facts about a function body that the classifiers need.

use crate::syntax::node::{Expr, NodeKind, SyntaxNode};

/// Either side of the tree during a walk.
#[derive(Debug, Clone, Copy)]
pub enum Visit<'a> {
    Stmt(&'a SyntaxNode),
    Expr(&'a Expr),
}

/// Pre-order walk over statements and their expressions.
///
/// With `enter_functions` false the walk reports nested functions and
/// classes but does not descend into them.
pub fn walk<'a>(nodes: &'a [SyntaxNode], enter_functions: bool, f: &mut dyn FnMut(Visit<'a>)) {
    for node in nodes {
        walk_node(node, enter_functions, f);
    }
}

fn walk_node<'a>(node: &'a SyntaxNode, enter: bool, f: &mut dyn FnMut(Visit<'a>)) {
    f(Visit::Stmt(node));
    if !enter && matches!(node.kind, NodeKind::Function(_) | NodeKind::Class(_)) {
        return;
    }
    for expr in node.own_expressions() {
        walk_expr(expr, enter, f);
    }
    for child in node.child_statements() {
        walk_node(child, enter, f);
    }
}

fn walk_expr<'a>(expr: &'a Expr, enter: bool, f: &mut dyn FnMut(Visit<'a>)) {
    f(Visit::Expr(expr));
    if let Expr::Function(node) = expr {
        if enter {
            walk_node(node, enter, f);
        }
        return;
    }
    for child in expr.children() {
        walk_expr(child, enter, f);
    }
}

const BUILTIN_ERRORS: &[&str] = &[
    "Error",
    "TypeError",
    "RangeError",
    "SyntaxError",
    "ReferenceError",
    "EvalError",
    "URIError",
    "AggregateError",
];

const RETURN_CHECK_WORDS: &[&str] = &[
    "validate", "parse", "check", "verify", "assert", "sanitize", "transform", "normalize",
    "ensure",
];

const HTTP_VERBS: &[&str] = &["get", "post", "put", "patch", "delete", "request", "head"];

const HTTP_HOLDERS: &[&str] = &["http", "https", "httpclient", "$http", "api", "apiclient", "client"];

const LOG_ROOTS: &[&str] = &["console", "logger", "log", "winston", "pino"];

/// What a function body does, ignoring nested functions.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyFacts {
    /// Identifiers tested by each guard clause, in order.
    pub guards: Vec<Vec<String>>,
    pub has_conditional: bool,
    pub has_try: bool,
    pub throws: bool,
    pub validates_return: bool,
    pub has_assertions: bool,
    pub has_promise_catch: bool,
    pub has_custom_error: bool,
    pub logs: bool,
    /// First network primitive invoked.
    pub network_client: Option<String>,
}

impl BodyFacts {
    #[must_use]
    pub fn scan(body: &[SyntaxNode]) -> Self {
        let mut facts = Self::default();
        walk(body, false, &mut |visit| match visit {
            Visit::Stmt(node) => facts.observe_stmt(node),
            Visit::Expr(expr) => facts.observe_expr(expr),
        });
        facts
    }

    /// True when every parameter binding is tested by some guard.
    #[must_use]
    pub fn guards_cover(&self, bindings: &[Vec<&str>]) -> bool {
        bindings.iter().all(|names| {
            names.is_empty()
                || self
                    .guards
                    .iter()
                    .any(|g| g.iter().any(|id| names.contains(&id.as_str())))
        })
    }

    fn observe_stmt(&mut self, node: &SyntaxNode) {
        match &node.kind {
            NodeKind::If(stmt) => {
                self.has_conditional = true;
                if stmt.is_guard() {
                    self.guards
                        .push(stmt.test.identifiers().into_iter().map(String::from).collect());
                }
            }
            NodeKind::Try(_) => self.has_try = true,
            NodeKind::Throw(expr) => {
                self.throws = true;
                if let Expr::New { callee, .. } = expr {
                    let name = callee.path();
                    let last = last_segment(&name);
                    if last.ends_with("Error") && !BUILTIN_ERRORS.contains(&last) {
                        self.has_custom_error = true;
                    }
                }
            }
            NodeKind::Return(Some(expr)) => {
                if is_return_check(expr) {
                    self.validates_return = true;
                }
            }
            _ => {}
        }
    }

    fn observe_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Call { callee, .. } => {
                let path = callee.path();
                if is_assertion(&path) {
                    self.has_assertions = true;
                }
                if last_segment(&path) == "catch" {
                    self.has_promise_catch = true;
                }
                if is_logging(&path) {
                    self.logs = true;
                }
                if self.network_client.is_none() && is_network_call(&path) {
                    self.network_client = Some(path);
                }
            }
            Expr::New { callee, .. } => {
                if self.network_client.is_none() && callee.path() == "XMLHttpRequest" {
                    self.network_client = Some("XMLHttpRequest".to_string());
                }
            }
            _ => {}
        }
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

fn is_return_check(expr: &Expr) -> bool {
    match expr {
        Expr::Await(inner) => is_return_check(inner),
        Expr::Call { callee, .. } => {
            let path = callee.path();
            let last = last_segment(&path).to_ascii_lowercase();
            RETURN_CHECK_WORDS.iter().any(|w| last.contains(w))
        }
        _ => false,
    }
}

fn is_assertion(path: &str) -> bool {
    let last = last_segment(path);
    matches!(path, "assert" | "console.assert" | "invariant" | "expect")
        || path.starts_with("assert.")
        || last.starts_with("assert")
}

fn is_logging(path: &str) -> bool {
    let root = path.split('.').next().unwrap_or(path);
    LOG_ROOTS.contains(&root) || path.split('.').any(|seg| seg == "logger")
}

/// Network-fetch primitives: fetch, axios, node http, HTTP client wrappers.
pub(crate) fn is_network_call(path: &str) -> bool {
    let segments: Vec<&str> = path.split('.').collect();
    let root = segments.first().copied().unwrap_or("");
    let last = segments.last().copied().unwrap_or("");

    if matches!(
        path,
        "fetch" | "window.fetch" | "globalThis.fetch" | "$.ajax" | "jQuery.ajax"
    ) {
        return true;
    }
    if matches!(root, "axios" | "ky" | "got" | "superagent") {
        return true;
    }
    segments.len() > 1
        && HTTP_VERBS.contains(&last)
        && segments[..segments.len() - 1]
            .iter()
            .any(|s| HTTP_HOLDERS.contains(&s.to_ascii_lowercase().as_str()))
}
