// src/syntax/node.rs
//! Normalized syntax tree.
//!
//! The builder lowers the concrete tree-sitter tree into these types. Only the
//! structure the pattern detector cares about survives: declarations, control
//! flow that can carry guards or error handling, and expressions down to the
//! level of calls, assignments and literals.

use serde::{Deserialize, Serialize};

use super::dialect::{Dialect, ModuleMode};

/// A point in the source text. Lines are 1-based, columns 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Span of source text an entity was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceLocation {
    pub start: Position,
    pub end: Position,
}

impl SourceLocation {
    #[must_use]
    pub fn new(start: (usize, usize), end: (usize, usize)) -> Self {
        Self {
            start: Position {
                line: start.0,
                column: start.1,
            },
            end: Position {
                line: end.0,
                column: end.1,
            },
        }
    }
}

/// Root of a built tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub dialect: Dialect,
    pub module_mode: ModuleMode,
    pub body: Vec<SyntaxNode>,
    pub location: SourceLocation,
}

/// A statement-level node with its location and leading doc block.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub location: SourceLocation,
    /// Text of a `/** ... */` block immediately preceding the node.
    pub doc: Option<String>,
}

impl SyntaxNode {
    #[must_use]
    pub fn new(kind: NodeKind, location: SourceLocation) -> Self {
        Self {
            kind,
            location,
            doc: None,
        }
    }

    /// Returns the function payload if this node is a function.
    #[must_use]
    pub fn as_function(&self) -> Option<&Function> {
        match &self.kind {
            NodeKind::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Direct statement children, in source order.
    ///
    /// Functions nested inside expressions are yielded through
    /// [`Expr::Function`] and are not listed here.
    #[must_use]
    pub fn child_statements(&self) -> Vec<&SyntaxNode> {
        match &self.kind {
            NodeKind::Function(f) => f.body.iter().collect(),
            NodeKind::Class(c) => c.members.iter().collect(),
            NodeKind::If(s) => s.consequent.iter().chain(&s.alternate).collect(),
            NodeKind::Try(t) => {
                let mut out: Vec<&SyntaxNode> = t.block.iter().collect();
                if let Some(handler) = &t.handler {
                    out.extend(&handler.body);
                }
                out.extend(&t.finalizer);
                out
            }
            NodeKind::Block(stmts) | NodeKind::Compound(stmts) => stmts.iter().collect(),
            NodeKind::Variable(_)
            | NodeKind::Interface(_)
            | NodeKind::Field(_)
            | NodeKind::Throw(_)
            | NodeKind::Return(_)
            | NodeKind::Expression(_)
            | NodeKind::Import { .. } => Vec::new(),
        }
    }

    /// Expressions held directly by this node (not by nested statements).
    #[must_use]
    pub fn own_expressions(&self) -> Vec<&Expr> {
        match &self.kind {
            NodeKind::Variable(v) => v
                .declarators
                .iter()
                .filter_map(|d| d.init.as_ref())
                .collect(),
            NodeKind::Field(f) => f.value.iter().collect(),
            NodeKind::If(s) => vec![&s.test],
            NodeKind::Throw(e) | NodeKind::Expression(e) => vec![e],
            NodeKind::Return(e) => e.iter().collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Function(Function),
    Variable(VariableDeclaration),
    Class(Class),
    Interface(Interface),
    /// Class property declaration.
    Field(ClassField),
    If(IfStatement),
    Try(TryStatement),
    Throw(Expr),
    Return(Option<Expr>),
    Block(Vec<SyntaxNode>),
    Expression(Expr),
    /// Loops, switch and labeled statements, flattened to their bodies.
    Compound(Vec<SyntaxNode>),
    Import { source: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Option<String>,
    pub params: Vec<Param>,
    pub return_type: Option<String>,
    pub is_async: bool,
    pub is_method: bool,
    pub body: Vec<SyntaxNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Binding text; destructuring patterns keep their source text.
    pub name: String,
    pub type_annotation: Option<String>,
    pub optional: bool,
    pub has_default: bool,
}

impl Param {
    /// Identifiers bound by this parameter.
    #[must_use]
    pub fn bindings(&self) -> Vec<&str> {
        self.name
            .split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Const,
    Let,
    Var,
}

impl DeclarationKind {
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Const => "const",
            Self::Let => "let",
            Self::Var => "var",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub kind: DeclarationKind,
    pub declarators: Vec<Declarator>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub name: String,
    /// False for destructuring patterns.
    pub is_identifier: bool,
    pub type_annotation: Option<String>,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: Option<String>,
    pub superclass: Option<String>,
    pub members: Vec<SyntaxNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassField {
    pub name: String,
    pub type_annotation: Option<String>,
    pub value: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    pub name: String,
    pub fields: Vec<InterfaceField>,
    /// Declared with `type X = { ... }` rather than `interface`.
    pub is_type_alias: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceField {
    pub name: String,
    pub type_annotation: Option<String>,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub test: Expr,
    pub consequent: Vec<SyntaxNode>,
    pub alternate: Vec<SyntaxNode>,
}

impl IfStatement {
    /// A guard clause: no else branch and a consequent that is a single throw.
    #[must_use]
    pub fn is_guard(&self) -> bool {
        self.alternate.is_empty()
            && matches!(
                self.consequent.as_slice(),
                [SyntaxNode {
                    kind: NodeKind::Throw(_),
                    ..
                }]
            )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryStatement {
    pub block: Vec<SyntaxNode>,
    pub handler: Option<CatchClause>,
    pub finalizer: Vec<SyntaxNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub param: Option<String>,
    pub body: Vec<SyntaxNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralKind {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Null,
    RegExp,
}

impl LiteralKind {
    /// Type name used in annotations and doc blocks.
    #[must_use]
    pub fn type_name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "any[]",
            Self::Null => "null",
            Self::RegExp => "RegExp",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub raw: String,
    /// Nested expressions of object and array literals.
    pub elements: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Identifier(String),
    Literal(Literal),
    Member {
        object: Box<Expr>,
        property: String,
    },
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    New {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    Await(Box<Expr>),
    Assign {
        target: Box<Expr>,
        operator: String,
        value: Box<Expr>,
    },
    Update {
        operator: String,
        target: Box<Expr>,
    },
    /// Unary, binary, logical and conditional expressions.
    Operation {
        operator: String,
        operands: Vec<Expr>,
    },
    /// Function or arrow expression; the node kind is always `Function`.
    Function(Box<SyntaxNode>),
    Other(Vec<Expr>),
}

impl Expr {
    /// Dotted access path, e.g. `axios.get` or `this.http.post`.
    ///
    /// Segments that are not plain identifiers render as `?`.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Identifier(name) => name.clone(),
            Self::Member { object, property } => format!("{}.{property}", object.path()),
            _ => "?".to_string(),
        }
    }

    /// Identifier at the root of a member chain.
    #[must_use]
    pub fn root_identifier(&self) -> Option<&str> {
        match self {
            Self::Identifier(name) => Some(name),
            Self::Member { object, .. } => object.root_identifier(),
            _ => None,
        }
    }

    /// Direct sub-expressions.
    #[must_use]
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Self::Identifier(_) | Self::Function(_) => Vec::new(),
            Self::Literal(lit) => lit.elements.iter().collect(),
            Self::Member { object, .. } => vec![object.as_ref()],
            Self::Call { callee, arguments } | Self::New { callee, arguments } => {
                std::iter::once(callee.as_ref()).chain(arguments).collect()
            }
            Self::Await(inner) => vec![inner.as_ref()],
            Self::Assign { target, value, .. } => vec![target.as_ref(), value.as_ref()],
            Self::Update { target, .. } => vec![target.as_ref()],
            Self::Operation { operands, .. } => operands.iter().collect(),
            Self::Other(items) => items.iter().collect(),
        }
    }

    /// Every identifier referenced in this expression, excluding nested functions.
    #[must_use]
    pub fn identifiers(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_identifiers(self, &mut out);
        out
    }
}

fn collect_identifiers<'a>(expr: &'a Expr, out: &mut Vec<&'a str>) {
    if let Expr::Identifier(name) = expr {
        out.push(name);
    }
    for child in expr.children() {
        collect_identifiers(child, out);
    }
}
