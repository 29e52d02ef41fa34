// src/syntax/builder.rs
use super::dialect::{BuildOptions, Dialect, GrammarFeature, ModuleMode};
use super::lower::Lowerer;
use super::node::{Program, SourceLocation};
use crate::error::ParseError;
use tree_sitter::{Node, Parser};

/// Deepest concrete tree accepted for lowering.
pub const MAX_NESTING_DEPTH: usize = 200;

/// Node kinds only the typed dialect may contain.
const TYPE_ONLY_KINDS: &[&str] = &[
    "type_annotation",
    "interface_declaration",
    "type_alias_declaration",
    "type_arguments",
    "type_parameters",
    "as_expression",
    "satisfies_expression",
    "non_null_expression",
    "enum_declaration",
    "abstract_class_declaration",
    "accessibility_modifier",
    "implements_clause",
];

/// Parses `source` into a normalized [`Program`].
///
/// The dialect comes from `options` or, when absent, is inferred from the
/// text and the parsed tree.
///
/// # Errors
/// Returns [`ParseError`] when the text has syntax errors, nests deeper than
/// [`MAX_NESTING_DEPTH`], uses type syntax
/// under an explicitly untyped dialect, uses `import`/`export` in script
/// mode, or uses decorators without the decorators feature.
pub fn build(source: &str, options: &BuildOptions) -> Result<Program, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(options.grammar())
        .map_err(|e| ParseError::new(format!("grammar unavailable: {e:?}"), 0, 0))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseError::new("parser produced no tree", 0, 0))?;
    let root = tree.root_node();
    let bytes = source.as_bytes();

    if let Some(bad) = first_error(root) {
        return Err(describe_error(bad, bytes));
    }
    if let Some(deep) = too_deep(root) {
        return Err(at(
            deep,
            format!("nesting too deep: more than {MAX_NESTING_DEPTH} levels"),
        ));
    }

    let dialect = match options.dialect {
        Some(Dialect::Untyped) => {
            if let Some(typed) = find_kind(root, TYPE_ONLY_KINDS) {
                return Err(at(
                    typed,
                    "type annotations require the typed dialect".to_string(),
                ));
            }
            Dialect::Untyped
        }
        Some(Dialect::Typed) => Dialect::Typed,
        None => {
            if Dialect::infer(source) == Dialect::Typed
                || find_kind(root, TYPE_ONLY_KINDS).is_some()
            {
                Dialect::Typed
            } else {
                Dialect::Untyped
            }
        }
    };
    tracing::trace!(?dialect, explicit = options.dialect.is_some(), "resolved dialect");

    if options.module_mode == ModuleMode::Script {
        if let Some(decl) = find_kind(root, &["import_statement", "export_statement"]) {
            return Err(at(
                decl,
                "'import' and 'export' may appear only in module mode".to_string(),
            ));
        }
    }

    if !options.has_feature(GrammarFeature::Decorators) {
        if let Some(decorator) = find_kind(root, &["decorator"]) {
            return Err(at(
                decorator,
                "decorators are not enabled; add the 'decorators' grammar feature".to_string(),
            ));
        }
    }

    let body = Lowerer::new(source).lower_program(root);
    let start = root.start_position();
    let end = root.end_position();

    Ok(Program {
        dialect,
        module_mode: options.module_mode,
        body,
        location: SourceLocation::new((start.row + 1, start.column), (end.row + 1, end.column)),
    })
}

enum Step {
    Found,
    Descend,
    Skip,
}

/// Pre-order search that keeps its own stack in a [`tree_sitter::TreeCursor`],
/// so arbitrarily deep trees cannot exhaust the call stack.
fn search<'t>(root: Node<'t>, mut step: impl FnMut(Node<'t>, usize) -> Step) -> Option<Node<'t>> {
    let mut cursor = root.walk();
    let mut depth = 0;
    loop {
        let node = cursor.node();
        match step(node, depth) {
            Step::Found => return Some(node),
            Step::Descend if cursor.goto_first_child() => {
                depth += 1;
                continue;
            }
            Step::Descend | Step::Skip => {}
        }
        while !cursor.goto_next_sibling() {
            if depth == 0 || !cursor.goto_parent() {
                return None;
            }
            depth -= 1;
        }
    }
}

/// First ERROR or MISSING node in document order.
fn first_error(root: Node) -> Option<Node> {
    search(root, |node, _| {
        if node.is_error() || node.is_missing() {
            Step::Found
        } else if node.has_error() {
            Step::Descend
        } else {
            Step::Skip
        }
    })
}

fn find_kind<'t>(root: Node<'t>, kinds: &[&str]) -> Option<Node<'t>> {
    search(root, |node, _| {
        if kinds.contains(&node.kind()) {
            Step::Found
        } else {
            Step::Descend
        }
    })
}

/// First node nested deeper than [`MAX_NESTING_DEPTH`].
fn too_deep(root: Node) -> Option<Node> {
    search(root, |_, depth| {
        if depth > MAX_NESTING_DEPTH {
            Step::Found
        } else {
            Step::Descend
        }
    })
}

fn describe_error(node: Node, source: &[u8]) -> ParseError {
    if node.is_missing() {
        return at(node, format!("Missing '{}'", node.kind()));
    }
    let text = node.utf8_text(source).unwrap_or("").trim();
    let token: String = text.split_whitespace().next().unwrap_or("").chars().take(20).collect();
    if token.is_empty() {
        at(node, "Unexpected end of input".to_string())
    } else {
        at(node, format!("Unexpected token '{token}'"))
    }
}

fn at(node: Node, message: String) -> ParseError {
    let pos = node.start_position();
    ParseError::new(message, pos.row + 1, pos.column)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::syntax::node::{DeclarationKind, Expr, LiteralKind, NodeKind};

    fn typed() -> BuildOptions {
        BuildOptions::default().with_dialect(Dialect::Typed)
    }

    #[test]
    fn builds_function_with_params_and_return_type() {
        let program = build(
            "/** Adds. */\nfunction add(a: number, b?: number): number { return a + (b ?? 0); }",
            &typed(),
        )
        .unwrap();
        assert_eq!(program.body.len(), 1);
        let node = &program.body[0];
        assert!(node.doc.as_deref().unwrap().starts_with("/**"));
        let func = node.as_function().unwrap();
        assert_eq!(func.name.as_deref(), Some("add"));
        assert_eq!(func.params.len(), 2);
        assert_eq!(func.params[0].type_annotation.as_deref(), Some("number"));
        assert!(func.params[1].optional);
        assert_eq!(func.return_type.as_deref(), Some("number"));
        assert_eq!(node.location.start.line, 2);
    }

    #[test]
    fn lowers_variable_kind_and_literal() {
        let program = build("let MAX_USER_COUNT = 100;", &typed()).unwrap();
        let NodeKind::Variable(decl) = &program.body[0].kind else {
            panic!("expected variable");
        };
        assert_eq!(decl.kind, DeclarationKind::Let);
        let Some(Expr::Literal(lit)) = &decl.declarators[0].init else {
            panic!("expected literal");
        };
        assert_eq!(lit.kind, LiteralKind::Number);
        assert_eq!(lit.raw, "100");
    }

    #[test]
    fn exported_arrow_function_keeps_name_and_doc() {
        let program = build(
            "/** Loads. */\nexport const load = async (id: string) => fetch(id);",
            &typed(),
        )
        .unwrap();
        let NodeKind::Variable(decl) = &program.body[0].kind else {
            panic!("expected variable");
        };
        let Some(Expr::Function(func)) = &decl.declarators[0].init else {
            panic!("expected function");
        };
        assert!(func.doc.is_some());
        let f = func.as_function().unwrap();
        assert_eq!(f.name.as_deref(), Some("load"));
        assert!(f.is_async);
    }

    #[test]
    fn syntax_error_is_parse_error() {
        let err = build("function broken( {", &typed()).unwrap_err();
        assert!(err.line >= 1);
        assert!(!err.message.is_empty());
    }

    #[test]
    fn untyped_dialect_rejects_annotations() {
        let options = BuildOptions::default().with_dialect(Dialect::Untyped);
        let err = build("function f(a: string) {}", &options).unwrap_err();
        assert!(err.message.contains("typed dialect"));
    }

    #[test]
    fn inferred_dialect() {
        let program = build("function f(a, b) { return a + b; }", &BuildOptions::default()).unwrap();
        assert_eq!(program.dialect, Dialect::Untyped);
        let program = build("const n: number = 1;", &BuildOptions::default()).unwrap();
        assert_eq!(program.dialect, Dialect::Typed);
    }

    #[test]
    fn script_mode_rejects_imports() {
        let options = BuildOptions::default().with_module_mode(ModuleMode::Script);
        let err = build("import x from 'y';", &options).unwrap_err();
        assert!(err.message.contains("module mode"));
        assert!(build("import x from 'y';", &BuildOptions::default()).is_ok());
    }

    #[test]
    fn builds_interface_fields() {
        let program = build("interface User { id: number; name?: string }", &typed()).unwrap();
        let NodeKind::Interface(iface) = &program.body[0].kind else {
            panic!("expected interface");
        };
        assert_eq!(iface.name, "User");
        assert_eq!(iface.fields.len(), 2);
        assert!(iface.fields[1].optional);
    }

    #[test]
    fn decorators_require_feature() {
        let src = "@sealed\nclass Greeter { greet() { return 1; } }";
        let err = build(src, &typed()).unwrap_err();
        assert!(err.message.contains("decorators"));
        assert_eq!(err.line, 1);

        let options = typed().with_feature(GrammarFeature::Decorators);
        let program = build(src, &options).unwrap();
        assert_eq!(program.body.len(), 1);
    }

    fn nested_arrays(depth: usize) -> String {
        format!("const deep = {}0{};", "[".repeat(depth), "]".repeat(depth))
    }

    #[test]
    fn deep_nesting_is_a_parse_error() {
        let err = build(&nested_arrays(1000), &typed()).unwrap_err();
        assert!(err.message.contains("nesting too deep"));
        assert_eq!(err.line, 1);
    }

    #[test]
    fn moderate_nesting_still_builds() {
        let program = build(&nested_arrays(50), &typed()).unwrap();
        assert_eq!(program.body.len(), 1);
    }

    #[test]
    fn search_finds_nodes_in_document_order() {
        let mut parser = Parser::new();
        parser.set_language(typed().grammar()).unwrap();
        let tree = parser.parse("let a = 1;\nimport x from 'y';\nexport {};", None).unwrap();
        let found = find_kind(tree.root_node(), &["export_statement", "import_statement"]).unwrap();
        assert_eq!(found.kind(), "import_statement");
        assert!(find_kind(tree.root_node(), &["decorator"]).is_none());
        assert!(first_error(tree.root_node()).is_none());
    }

    #[test]
    fn build_is_deterministic() {
        let src = "class A { constructor() {} run(x: number) { if (!x) throw new Error('x'); } }";
        assert_eq!(build(src, &typed()).unwrap(), build(src, &typed()).unwrap());
    }
}
