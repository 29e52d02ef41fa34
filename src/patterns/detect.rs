// src/patterns/detect.rs
//! Classifies syntax nodes into code patterns.
//!
//! Every node is offered to every classifier, so one function can come out
//! as a Function, an ApiCall and a Validation pattern at once. The walk is
//! depth-first and pre-order, which makes the output order reproducible.

use super::scan::BodyFacts;
use super::tracking::MutationFacts;
use super::types::{
    ApiCallShape, ClassShape, CodePattern, ErrorHandlingShape, FieldShape, FunctionShape,
    InterfaceShape, LiteralInit, Parameter, PatternStructure, ValidationShape, VariableShape,
};
use crate::syntax::node::{
    Class, Expr, Function, Interface, LiteralKind, NodeKind, Program, SyntaxNode, TryStatement,
    VariableDeclaration,
};
use crate::typing::TypeExpr;

/// Name given to error handling found outside any function.
pub const MODULE_SCOPE: &str = "<module>";

/// Detects patterns in a program with mutation facts computed from the
/// program itself.
#[must_use]
pub fn detect(program: &Program) -> Vec<CodePattern> {
    PatternDetector::new().detect(program)
}

/// Pattern detector with optional caller-supplied mutation facts.
#[derive(Debug, Clone, Default)]
pub struct PatternDetector {
    external: MutationFacts,
}

impl PatternDetector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds reassignment/mutation facts tracked by the caller. They are
    /// OR-ed with the facts found in the program.
    #[must_use]
    pub fn with_mutation_facts(mut self, facts: MutationFacts) -> Self {
        self.external = facts;
        self
    }

    /// Returns one pattern per raw detection, each with an occurrence count of 1.
    #[must_use]
    pub fn detect(&self, program: &Program) -> Vec<CodePattern> {
        let mut facts = MutationFacts::collect(program);
        facts.merge(&self.external);

        let mut visitor = Visitor {
            facts: &facts,
            enclosing: Vec::new(),
            out: Vec::new(),
        };
        for node in &program.body {
            visitor.visit_node(node);
        }

        tracing::debug!(
            nodes = program.body.len(),
            patterns = visitor.out.len(),
            "detected patterns"
        );
        visitor.out
    }
}

struct Visitor<'f> {
    facts: &'f MutationFacts,
    /// Names of the functions enclosing the current node.
    enclosing: Vec<String>,
    out: Vec<CodePattern>,
}

impl Visitor<'_> {
    fn visit_node(&mut self, node: &SyntaxNode) {
        self.classify(node);

        let func = node.as_function();
        if let Some(f) = func {
            self.enclosing.push(display_name(f.name.as_deref(), node));
        }
        for expr in node.own_expressions() {
            self.visit_expr(expr);
        }
        for child in node.child_statements() {
            self.visit_node(child);
        }
        if func.is_some() {
            self.enclosing.pop();
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        if let Expr::Function(node) = expr {
            self.visit_node(node);
            return;
        }
        for child in expr.children() {
            self.visit_expr(child);
        }
    }

    fn classify(&mut self, node: &SyntaxNode) {
        match &node.kind {
            NodeKind::Function(f) => self.classify_function(node, f),
            NodeKind::Variable(decl) => self.classify_variable(node, decl),
            NodeKind::Class(class) => self.classify_class(node, class),
            NodeKind::Interface(iface) => self.classify_interface(node, iface),
            NodeKind::Try(stmt) => self.classify_try(node, stmt),
            _ => {}
        }
    }

    fn classify_function(&mut self, node: &SyntaxNode, f: &Function) {
        let body = BodyFacts::scan(&f.body);
        let parameters: Vec<Parameter> = f
            .params
            .iter()
            .map(|p| Parameter::new(&p.name, p.type_annotation.as_deref().unwrap_or("any")))
            .collect();
        let bindings: Vec<Vec<&str>> = f.params.iter().map(|p| p.bindings()).collect();
        let name = display_name(f.name.as_deref(), node);

        if f.name.is_some() {
            let shape = FunctionShape {
                parameters: parameters.clone(),
                return_type: f.return_type.clone(),
                has_documentation: node.doc.is_some(),
                has_parameter_validation: body.guards_cover(&bindings),
                has_return_validation: body.validates_return,
                has_assertions: body.has_assertions,
                has_error_handling: body.has_try,
                is_async: f.is_async,
                is_method: f.is_method,
                has_custom_error: body.has_custom_error,
                has_promise_catch: body.has_promise_catch,
            };
            self.push(&name, PatternStructure::Function(shape), node);
        }

        if let Some(client) = &body.network_client {
            let shape = ApiCallShape {
                client: client.clone(),
                is_async: f.is_async,
                has_error_handling: body.has_try || body.has_promise_catch,
                has_input_validation: body.has_conditional,
                parameters: parameters.clone(),
            };
            self.push(&name, PatternStructure::ApiCall(shape), node);
        }

        // A structured parameter type alone is enough to tag the function as
        // validation. This over-tags plain business functions.
        let structured_param = parameters
            .iter()
            .any(|p| TypeExpr::parse(&p.type_name).is_structured());
        if !body.guards.is_empty() {
            let shape = ValidationShape {
                guard_count: body.guards.len(),
                throws: true,
                from_parameter_type: false,
            };
            self.push(&name, PatternStructure::Validation(shape), node);
        } else if structured_param {
            let shape = ValidationShape {
                guard_count: 0,
                throws: false,
                from_parameter_type: true,
            };
            self.push(&name, PatternStructure::Validation(shape), node);
        }
    }

    fn classify_variable(&mut self, node: &SyntaxNode, decl: &VariableDeclaration) {
        let [declarator] = decl.declarators.as_slice() else {
            return;
        };
        if !declarator.is_identifier || matches!(declarator.init, Some(Expr::Function(_))) {
            return;
        }

        let literal = match &declarator.init {
            Some(Expr::Literal(lit)) if is_descriptor_kind(lit.kind) => Some(LiteralInit {
                kind: lit.kind,
                raw: lit.raw.clone(),
            }),
            _ => None,
        };
        let (is_reassigned, is_mutated) = self.facts.flags(&declarator.name);

        let shape = VariableShape {
            declared_type: declarator.type_annotation.clone(),
            mutability: decl.kind,
            has_initializer: declarator.init.is_some(),
            literal,
            has_documentation: node.doc.is_some(),
            is_reassigned,
            is_mutated,
        };
        self.push(&declarator.name, PatternStructure::Variable(shape), node);
    }

    fn classify_class(&mut self, node: &SyntaxNode, class: &Class) {
        let methods: Vec<&Function> = class
            .members
            .iter()
            .filter_map(SyntaxNode::as_function)
            .collect();
        let shape = ClassShape {
            has_constructor: methods
                .iter()
                .any(|m| m.name.as_deref() == Some("constructor")),
            method_count: methods.len(),
        };
        let name = class.name.as_deref().unwrap_or("<anonymous class>");
        self.push(name, PatternStructure::Class(shape), node);
    }

    fn classify_interface(&mut self, node: &SyntaxNode, iface: &Interface) {
        let fields = iface
            .fields
            .iter()
            .map(|f| FieldShape {
                name: f.name.clone(),
                type_name: f.type_annotation.clone().unwrap_or_else(|| "any".into()),
                optional: f.optional,
            })
            .collect();
        self.push(
            &iface.name,
            PatternStructure::Interface(InterfaceShape { fields }),
            node,
        );
    }

    fn classify_try(&mut self, node: &SyntaxNode, stmt: &TryStatement) {
        let Some(handler) = &stmt.handler else {
            return;
        };
        let catch = BodyFacts::scan(&handler.body);
        if !catch.logs && !catch.throws {
            return;
        }
        let shape = ErrorHandlingShape {
            logs: catch.logs,
            rethrows: catch.throws,
        };
        let name = self
            .enclosing
            .last()
            .cloned()
            .unwrap_or_else(|| MODULE_SCOPE.to_string());
        self.push(&name, PatternStructure::ErrorHandling(shape), node);
    }

    fn push(&mut self, name: &str, structure: PatternStructure, node: &SyntaxNode) {
        self.out
            .push(CodePattern::new(name, structure, node.location));
    }
}

fn display_name(name: Option<&str>, node: &SyntaxNode) -> String {
    name.map_or_else(
        || {
            format!(
                "<anonymous@{}:{}>",
                node.location.start.line, node.location.start.column
            )
        },
        str::to_string,
    )
}

fn is_descriptor_kind(kind: LiteralKind) -> bool {
    matches!(
        kind,
        LiteralKind::String
            | LiteralKind::Number
            | LiteralKind::Boolean
            | LiteralKind::Object
            | LiteralKind::Array
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::patterns::types::PatternKind;
    use crate::syntax::node::DeclarationKind;
    use crate::syntax::{build, BuildOptions, Dialect};

    fn patterns(src: &str) -> Vec<CodePattern> {
        let options = BuildOptions::default().with_dialect(Dialect::Typed);
        detect(&build(src, &options).unwrap())
    }

    fn kinds(found: &[CodePattern]) -> Vec<(PatternKind, &str)> {
        found.iter().map(|p| (p.kind(), p.name.as_str())).collect()
    }

    #[test]
    fn function_extracts_parameters_and_flags() {
        let found = patterns(
            "/** Greets. */\n\
             function greet(name: string, times): string {\n\
               if (!name) throw new Error('name');\n\
               if (times < 0) throw new Error('times');\n\
               return format(name);\n\
             }",
        );
        let f = found[0].as_function().unwrap();
        assert_eq!(found[0].name, "greet");
        assert_eq!(f.parameters[1], Parameter::new("times", "any"));
        assert_eq!(f.return_type.as_deref(), Some("string"));
        assert!(f.has_documentation);
        assert!(f.has_parameter_validation);
        assert!(!f.has_return_validation);
        assert!(!f.has_error_handling);
    }

    #[test]
    fn partial_guards_do_not_count_as_parameter_validation() {
        let found = patterns("function f(a: string, b: number) { if (!a) throw new Error('a'); }");
        assert!(!found[0].as_function().unwrap().has_parameter_validation);
        assert_eq!(found[1].kind(), PatternKind::Validation);
    }

    #[test]
    fn one_function_can_match_several_kinds() {
        let found = patterns(
            "async function loadUser(id: string) {\n\
               if (!id) throw new Error('id');\n\
               const res = await fetch('/users/' + id);\n\
               return res.json();\n\
             }",
        );
        let found_kinds: Vec<PatternKind> = found.iter().map(CodePattern::kind).collect();
        assert_eq!(
            found_kinds,
            vec![
                PatternKind::Function,
                PatternKind::ApiCall,
                PatternKind::Validation,
                PatternKind::Variable
            ]
        );
        let api = found[1].as_api_call().unwrap();
        assert_eq!(api.client, "fetch");
        assert!(api.is_async);
        assert!(api.has_input_validation);
        assert!(!api.has_error_handling);
    }

    #[test]
    fn structured_parameter_tags_validation_heuristically() {
        // Known heuristic: no guard at all, yet tagged as validation.
        let found = patterns("function save(user: User) { store.put(user); }");
        let validation = found
            .iter()
            .find(|p| p.kind() == PatternKind::Validation)
            .unwrap();
        let PatternStructure::Validation(shape) = &validation.structure else {
            panic!("expected validation");
        };
        assert!(shape.from_parameter_type);
        assert_eq!(shape.guard_count, 0);
    }

    #[test]
    fn variable_with_literal_and_tracking() {
        let found = patterns("let MAX_USER_COUNT = 100;\nlet counter: number = 0;\ncounter += 1;");
        let max = found[0].as_variable().unwrap();
        assert_eq!(max.mutability, DeclarationKind::Let);
        assert_eq!(max.literal.as_ref().unwrap().raw, "100");
        assert!(!max.is_reassigned);

        let counter = found[1].as_variable().unwrap();
        assert_eq!(counter.declared_type.as_deref(), Some("number"));
        assert!(counter.is_reassigned);
    }

    #[test]
    fn external_facts_are_ored() {
        let program = build("const items = [];", &BuildOptions::default()).unwrap();
        let mut facts = MutationFacts::default();
        facts.mutated.insert("items".into());
        let found = PatternDetector::new().with_mutation_facts(facts).detect(&program);
        assert!(found[0].as_variable().unwrap().is_mutated);
    }

    #[test]
    fn arrow_bound_to_variable_is_named_function() {
        let found = patterns("const fetchUser = async (id: string) => api.get('/u/' + id);");
        assert_eq!(
            kinds(&found),
            vec![
                (PatternKind::Function, "fetchUser"),
                (PatternKind::ApiCall, "fetchUser")
            ]
        );
    }

    #[test]
    fn multi_binding_declarations_are_skipped() {
        assert!(patterns("let a = 1, b = 2;").is_empty());
        assert!(patterns("const { a, b } = obj;").is_empty());
    }

    #[test]
    fn class_and_interface_shapes() {
        let found = patterns(
            "interface User { id: number; name: string }\n\
             class Repo { constructor() {} find() {} save() {} }",
        );
        let iface = found[0].as_interface().unwrap();
        assert_eq!(iface.field_count(), 2);
        assert!(iface.has_id_field());

        let PatternStructure::Class(class) = &found[1].structure else {
            panic!("expected class");
        };
        assert!(class.has_constructor);
        assert_eq!(class.method_count, 3);
        // Methods follow their class in pre-order.
        assert_eq!(found[2].name, "constructor");
        assert_eq!(found[3].name, "find");
    }

    #[test]
    fn error_handling_named_after_enclosing_function() {
        let found = patterns(
            "function run() { try { work(); } catch (e) { console.error(e); throw e; } }\n\
             try { boot(); } catch (e) { logger.warn(e); }\n\
             try { quiet(); } catch (e) {}",
        );
        let handlers: Vec<&CodePattern> = found
            .iter()
            .filter(|p| p.kind() == PatternKind::ErrorHandling)
            .collect();
        assert_eq!(handlers.len(), 2);
        assert_eq!(handlers[0].name, "run");
        assert_eq!(
            handlers[0].structure,
            PatternStructure::ErrorHandling(ErrorHandlingShape {
                logs: true,
                rethrows: true
            })
        );
        assert_eq!(handlers[1].name, MODULE_SCOPE);
    }
}
