// src/syntax/mod.rs
//! Tree builder: source text to normalized syntax tree.

pub mod builder;
pub mod dialect;
pub mod lower;
pub mod node;

pub use builder::build;
pub use dialect::{BuildOptions, Dialect, GrammarFeature, ModuleMode};
pub use node::{
    DeclarationKind, Expr, Function, LiteralKind, NodeKind, Param, Position, Program,
    SourceLocation, SyntaxNode,
};
