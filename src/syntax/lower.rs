// src/syntax/lower.rs
//! Lowers a concrete tree-sitter tree into the normalized [`Program`] form.

use super::node::{
    CatchClause, Class, ClassField, DeclarationKind, Declarator, Expr, Function, IfStatement,
    Interface, InterfaceField, Literal, LiteralKind, NodeKind, Param, SourceLocation, SyntaxNode,
    TryStatement, VariableDeclaration,
};
use tree_sitter::Node;

/// Statement kinds that carry no structure worth keeping.
const SKIPPED_STATEMENTS: &[&str] = &[
    "comment",
    "empty_statement",
    "debugger_statement",
    "break_statement",
    "continue_statement",
    "function_signature",
    "enum_declaration",
    "decorator",
    "hash_bang_line",
    "index_signature",
    "method_signature",
    "abstract_method_signature",
    "property_signature",
    "call_signature",
    "construct_signature",
];

/// Type-level nodes that never contain runtime expressions.
const TYPE_NODES: &[&str] = &[
    "type_annotation",
    "type_arguments",
    "type_parameters",
    "type_parameter",
    "accessibility_modifier",
    "override_modifier",
    "decorator",
    "comment",
];

pub struct Lowerer<'a> {
    source: &'a [u8],
}

impl<'a> Lowerer<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            source: source.as_bytes(),
        }
    }

    /// Lowers every top-level statement of a `program` node.
    #[must_use]
    pub fn lower_program(&self, root: Node) -> Vec<SyntaxNode> {
        self.lower_statements(root)
    }

    fn text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source).unwrap_or("")
    }

    fn field_text(&self, node: Node, field: &str) -> Option<String> {
        node.child_by_field_name(field)
            .map(|n| self.text(n).to_string())
    }

    fn lower_statements(&self, parent: Node) -> Vec<SyntaxNode> {
        let mut cursor = parent.walk();
        parent
            .named_children(&mut cursor)
            .filter_map(|child| self.lower_statement(child))
            .collect()
    }

    /// Statements of a block, or the single statement if it is not a block.
    fn lower_body(&self, node: Option<Node>) -> Vec<SyntaxNode> {
        let Some(node) = node else {
            return Vec::new();
        };
        match node.kind() {
            "statement_block" | "class_body" | "switch_body" => self.lower_statements(node),
            "else_clause" | "finally_clause" => {
                let mut cursor = node.walk();
                let inner = node.named_children(&mut cursor).next();
                self.lower_body(inner)
            }
            _ => self.lower_statement(node).into_iter().collect(),
        }
    }

    fn lower_statement(&self, node: Node) -> Option<SyntaxNode> {
        let kind = node.kind();
        if SKIPPED_STATEMENTS.contains(&kind) {
            return None;
        }

        let lowered = match kind {
            "export_statement" => return self.lower_export(node),
            "function_declaration" | "generator_function_declaration" | "method_definition" => {
                NodeKind::Function(self.lower_function(node, None))
            }
            "lexical_declaration" | "variable_declaration" => {
                NodeKind::Variable(self.lower_variable(node))
            }
            "class_declaration" | "abstract_class_declaration" | "class" => {
                NodeKind::Class(self.lower_class(node))
            }
            "interface_declaration" => NodeKind::Interface(self.lower_interface(node)),
            "type_alias_declaration" => NodeKind::Interface(self.lower_type_alias(node)?),
            "public_field_definition" | "field_definition" => NodeKind::Field(ClassField {
                name: self.field_text(node, "name").unwrap_or_default(),
                type_annotation: self.type_text(node.child_by_field_name("type")),
                value: node
                    .child_by_field_name("value")
                    .map(|v| self.lower_expr(v)),
            }),
            "if_statement" => NodeKind::If(IfStatement {
                test: node
                    .child_by_field_name("condition")
                    .map_or(Expr::Other(Vec::new()), |c| self.lower_expr(c)),
                consequent: self.lower_body(node.child_by_field_name("consequence")),
                alternate: self.lower_body(node.child_by_field_name("alternative")),
            }),
            "try_statement" => NodeKind::Try(self.lower_try(node)),
            "throw_statement" => NodeKind::Throw(self.first_expr(node)),
            "return_statement" => NodeKind::Return(self.first_named(node).map(|n| self.lower_expr(n))),
            "statement_block" => NodeKind::Block(self.lower_statements(node)),
            "expression_statement" => NodeKind::Expression(self.first_expr(node)),
            "import_statement" => NodeKind::Import {
                source: self
                    .field_text(node, "source")
                    .map(|s| s.trim_matches(|c| c == '\'' || c == '"').to_string())
                    .unwrap_or_default(),
            },
            k if is_statement_kind(k) => NodeKind::Compound(self.lower_mixed(node)),
            _ => NodeKind::Expression(self.lower_expr(node)),
        };

        let mut out = SyntaxNode::new(lowered, self.location(node));
        attach_doc(&mut out, self.leading_doc(node));
        Some(out)
    }

    fn lower_export(&self, node: Node) -> Option<SyntaxNode> {
        let inner = node
            .child_by_field_name("declaration")
            .or_else(|| node.child_by_field_name("value"))?;
        let mut lowered = self.lower_statement(inner)?;
        if lowered.doc.is_none() {
            attach_doc(&mut lowered, self.leading_doc(node));
        }
        Some(lowered)
    }

    /// Children of loops, switches and similar: statements stay statements,
    /// header expressions become expression statements.
    fn lower_mixed(&self, node: Node) -> Vec<SyntaxNode> {
        let mut cursor = node.walk();
        let mut out = Vec::new();
        for child in node.named_children(&mut cursor) {
            if TYPE_NODES.contains(&child.kind()) {
                continue;
            }
            if child.kind() == "statement_block" || child.kind() == "switch_body" {
                out.extend(self.lower_statements(child));
            } else if let Some(stmt) = self.lower_statement(child) {
                out.push(stmt);
            }
        }
        out
    }

    fn lower_function(&self, node: Node, bound_name: Option<&str>) -> Function {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .or_else(|| bound_name.map(str::to_string));

        let params = if let Some(params) = node.child_by_field_name("parameters") {
            self.lower_params(params)
        } else if let Some(single) = node.child_by_field_name("parameter") {
            vec![Param {
                name: self.text(single).to_string(),
                type_annotation: None,
                optional: false,
                has_default: false,
            }]
        } else {
            Vec::new()
        };

        let body = match node.child_by_field_name("body") {
            Some(b) if b.kind() == "statement_block" => self.lower_statements(b),
            // Expression-bodied arrow: `(x) => x * 2`
            Some(b) => vec![SyntaxNode::new(
                NodeKind::Return(Some(self.lower_expr(b))),
                self.location(b),
            )],
            None => Vec::new(),
        };

        Function {
            name,
            params,
            return_type: self.type_text(node.child_by_field_name("return_type")),
            is_async: self.has_token(node, "async"),
            is_method: node.kind() == "method_definition",
            body,
        }
    }

    fn lower_params(&self, params: Node) -> Vec<Param> {
        let mut cursor = params.walk();
        params
            .named_children(&mut cursor)
            .filter(|p| !TYPE_NODES.contains(&p.kind()))
            .map(|p| match p.kind() {
                "required_parameter" | "optional_parameter" => Param {
                    name: p
                        .child_by_field_name("pattern")
                        .map_or_else(|| self.text(p).to_string(), |n| self.text(n).to_string()),
                    type_annotation: self.type_text(p.child_by_field_name("type")),
                    optional: p.kind() == "optional_parameter",
                    has_default: p.child_by_field_name("value").is_some(),
                },
                "assignment_pattern" => Param {
                    name: self.field_text(p, "left").unwrap_or_default(),
                    type_annotation: None,
                    optional: false,
                    has_default: true,
                },
                _ => Param {
                    name: self.text(p).to_string(),
                    type_annotation: None,
                    optional: false,
                    has_default: false,
                },
            })
            .collect()
    }

    fn lower_variable(&self, node: Node) -> VariableDeclaration {
        let kind = match node.child(0).map(|n| self.text(n)) {
            Some("const") => DeclarationKind::Const,
            Some("let") => DeclarationKind::Let,
            _ => DeclarationKind::Var,
        };

        let mut cursor = node.walk();
        let declarators = node
            .named_children(&mut cursor)
            .filter(|d| d.kind() == "variable_declarator")
            .map(|d| {
                let name_node = d.child_by_field_name("name");
                let name = name_node.map(|n| self.text(n).to_string()).unwrap_or_default();
                let init = d.child_by_field_name("value").map(|v| {
                    if is_function_kind(v.kind()) {
                        self.lower_function_expr(v, Some(&name))
                    } else {
                        self.lower_expr(v)
                    }
                });
                Declarator {
                    is_identifier: name_node.is_some_and(|n| n.kind() == "identifier"),
                    name,
                    type_annotation: self.type_text(d.child_by_field_name("type")),
                    init,
                }
            })
            .collect();

        VariableDeclaration { kind, declarators }
    }

    fn lower_class(&self, node: Node) -> Class {
        let mut cursor = node.walk();
        let superclass = node
            .children(&mut cursor)
            .find(|c| c.kind() == "class_heritage")
            .and_then(|heritage| {
                let mut inner = heritage.walk();
                let found = heritage
                    .named_children(&mut inner)
                    .find(|c| c.kind() == "extends_clause");
                found
            })
            .and_then(|ext| {
                ext.child_by_field_name("value")
                    .or_else(|| ext.named_child(0))
                    .map(|v| self.text(v).to_string())
            });

        Class {
            name: self.field_text(node, "name"),
            superclass,
            members: self.lower_body(node.child_by_field_name("body")),
        }
    }

    fn lower_interface(&self, node: Node) -> Interface {
        Interface {
            name: self.field_text(node, "name").unwrap_or_default(),
            fields: node
                .child_by_field_name("body")
                .map(|b| self.lower_fields(b))
                .unwrap_or_default(),
            is_type_alias: false,
        }
    }

    /// Only object-shaped aliases become interface nodes.
    fn lower_type_alias(&self, node: Node) -> Option<Interface> {
        let value = node.child_by_field_name("value")?;
        if value.kind() != "object_type" {
            return None;
        }
        Some(Interface {
            name: self.field_text(node, "name").unwrap_or_default(),
            fields: self.lower_fields(value),
            is_type_alias: true,
        })
    }

    fn lower_fields(&self, body: Node) -> Vec<InterfaceField> {
        let mut cursor = body.walk();
        body.named_children(&mut cursor)
            .filter(|c| c.kind() == "property_signature")
            .map(|c| InterfaceField {
                name: self.field_text(c, "name").unwrap_or_default(),
                type_annotation: self.type_text(c.child_by_field_name("type")),
                optional: self.has_token(c, "?"),
            })
            .collect()
    }

    fn lower_try(&self, node: Node) -> TryStatement {
        let handler = node.child_by_field_name("handler").map(|h| CatchClause {
            param: self.field_text(h, "parameter"),
            body: self.lower_body(h.child_by_field_name("body")),
        });
        TryStatement {
            block: self.lower_body(node.child_by_field_name("body")),
            handler,
            finalizer: self.lower_body(node.child_by_field_name("finalizer")),
        }
    }

    fn first_named<'t>(&self, node: Node<'t>) -> Option<Node<'t>> {
        let mut cursor = node.walk();
        let found = node
            .named_children(&mut cursor)
            .find(|c| !TYPE_NODES.contains(&c.kind()));
        found
    }

    fn first_expr(&self, node: Node) -> Expr {
        self.first_named(node)
            .map_or(Expr::Other(Vec::new()), |n| self.lower_expr(n))
    }

    fn lower_function_expr(&self, node: Node, bound_name: Option<&str>) -> Expr {
        let mut lowered = SyntaxNode::new(
            NodeKind::Function(self.lower_function(node, bound_name)),
            self.location(node),
        );
        lowered.doc = self.leading_doc(node);
        Expr::Function(Box::new(lowered))
    }

    fn lower_expr(&self, node: Node) -> Expr {
        match node.kind() {
            "identifier" | "this" | "super" | "property_identifier"
            | "shorthand_property_identifier" | "undefined" | "private_property_identifier" => {
                Expr::Identifier(self.text(node).to_string())
            }
            "string" => self.literal(node, LiteralKind::String, Vec::new()),
            "template_string" => {
                let parts = self.lower_expr_children(node);
                self.literal(node, LiteralKind::String, parts)
            }
            "number" => self.literal(node, LiteralKind::Number, Vec::new()),
            "true" | "false" => self.literal(node, LiteralKind::Boolean, Vec::new()),
            "null" => self.literal(node, LiteralKind::Null, Vec::new()),
            "regex" => self.literal(node, LiteralKind::RegExp, Vec::new()),
            "object" => {
                let members = self.lower_object_members(node);
                self.literal(node, LiteralKind::Object, members)
            }
            "array" => {
                let items = self.lower_expr_children(node);
                self.literal(node, LiteralKind::Array, items)
            }
            "member_expression" => Expr::Member {
                object: Box::new(self.field_expr(node, "object")),
                property: self.field_text(node, "property").unwrap_or_default(),
            },
            "subscript_expression" => Expr::Member {
                object: Box::new(self.field_expr(node, "object")),
                property: "[]".to_string(),
            },
            "call_expression" => Expr::Call {
                callee: Box::new(self.field_expr(node, "function")),
                arguments: self.lower_arguments(node.child_by_field_name("arguments")),
            },
            "new_expression" => Expr::New {
                callee: Box::new(self.field_expr(node, "constructor")),
                arguments: self.lower_arguments(node.child_by_field_name("arguments")),
            },
            "await_expression" => Expr::Await(Box::new(self.first_expr(node))),
            "assignment_expression" | "augmented_assignment_expression" => Expr::Assign {
                target: Box::new(self.field_expr(node, "left")),
                operator: self
                    .field_text(node, "operator")
                    .unwrap_or_else(|| "=".to_string()),
                value: Box::new(self.field_expr(node, "right")),
            },
            "update_expression" => Expr::Update {
                operator: self
                    .field_text(node, "operator")
                    .unwrap_or_else(|| self.operator_token(node)),
                target: Box::new(self.field_expr(node, "argument")),
            },
            "binary_expression" | "unary_expression" => Expr::Operation {
                operator: self
                    .field_text(node, "operator")
                    .unwrap_or_else(|| self.operator_token(node)),
                operands: self.lower_expr_children(node),
            },
            "ternary_expression" => Expr::Operation {
                operator: "?:".to_string(),
                operands: self.lower_expr_children(node),
            },
            "parenthesized_expression" | "as_expression" | "satisfies_expression"
            | "non_null_expression" | "type_assertion" | "spread_element"
            | "yield_expression" => self.first_expr(node),
            k if is_function_kind(k) => self.lower_function_expr(node, None),
            "class" => Expr::Other(Vec::new()),
            _ => Expr::Other(self.lower_expr_children(node)),
        }
    }

    fn field_expr(&self, node: Node, field: &str) -> Expr {
        node.child_by_field_name(field)
            .map_or(Expr::Other(Vec::new()), |n| self.lower_expr(n))
    }

    fn lower_expr_children(&self, node: Node) -> Vec<Expr> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|c| !TYPE_NODES.contains(&c.kind()))
            .map(|c| self.lower_expr(c))
            .collect()
    }

    fn lower_arguments(&self, args: Option<Node>) -> Vec<Expr> {
        args.map(|a| self.lower_expr_children(a)).unwrap_or_default()
    }

    fn lower_object_members(&self, node: Node) -> Vec<Expr> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|c| c.kind() != "comment")
            .map(|member| match member.kind() {
                "pair" => {
                    let key = self.field_text(member, "key");
                    match member.child_by_field_name("value") {
                        Some(v) if is_function_kind(v.kind()) => {
                            self.lower_function_expr(v, key.as_deref())
                        }
                        Some(v) => self.lower_expr(v),
                        None => Expr::Other(Vec::new()),
                    }
                }
                "method_definition" => {
                    let mut lowered = SyntaxNode::new(
                        NodeKind::Function(self.lower_function(member, None)),
                        self.location(member),
                    );
                    lowered.doc = self.leading_doc(member);
                    Expr::Function(Box::new(lowered))
                }
                _ => self.lower_expr(member),
            })
            .collect()
    }

    fn literal(&self, node: Node, kind: LiteralKind, elements: Vec<Expr>) -> Expr {
        Expr::Literal(Literal {
            kind,
            raw: self.text(node).to_string(),
            elements,
        })
    }

    /// Text of an annotation without the leading `:`.
    fn type_text(&self, node: Option<Node>) -> Option<String> {
        let node = node?;
        let text = self.text(node).trim();
        let text = text.strip_prefix(':').unwrap_or(text).trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    fn has_token(&self, node: Node, token: &str) -> bool {
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .any(|c| !c.is_named() && self.text(c) == token);
        found
    }

    fn operator_token(&self, node: Node) -> String {
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .find(|c| !c.is_named())
            .map(|c| self.text(c).to_string())
            .unwrap_or_default();
        found
    }

    /// `/** ... */` comment directly above `node`, skipping decorators.
    fn leading_doc(&self, node: Node) -> Option<String> {
        let mut anchor = node;
        let mut prev = node.prev_named_sibling();
        while let Some(p) = prev {
            if p.kind() != "decorator" {
                break;
            }
            anchor = p;
            prev = p.prev_named_sibling();
        }
        let comment = prev?;
        if comment.kind() != "comment" {
            return None;
        }
        let text = self.text(comment);
        let adjacent = comment.end_position().row + 1 >= anchor.start_position().row;
        (text.starts_with("/**") && adjacent).then(|| text.to_string())
    }

    fn location(&self, node: Node) -> SourceLocation {
        let start = node.start_position();
        let end = node.end_position();
        SourceLocation::new((start.row + 1, start.column), (end.row + 1, end.column))
    }
}

/// Sets the doc block of a statement. A declaration's doc also documents
/// functions bound by it (`const f = () => {}`).
fn attach_doc(node: &mut SyntaxNode, doc: Option<String>) {
    if doc.is_none() {
        return;
    }
    if let NodeKind::Variable(decl) = &mut node.kind {
        for declarator in &mut decl.declarators {
            if let Some(Expr::Function(func)) = &mut declarator.init {
                if func.doc.is_none() {
                    func.doc.clone_from(&doc);
                }
            }
        }
    }
    node.doc = doc;
}

fn is_function_kind(kind: &str) -> bool {
    matches!(
        kind,
        "arrow_function" | "function" | "function_expression" | "generator_function"
    )
}

fn is_statement_kind(kind: &str) -> bool {
    kind.ends_with("_statement")
        || matches!(
            kind,
            "switch_case"
                | "switch_default"
                | "module"
                | "internal_module"
                | "ambient_declaration"
                | "class_static_block"
        )
}
