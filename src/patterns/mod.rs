// src/patterns/mod.rs
//! Pattern detection and aggregation.

pub mod aggregate;
pub mod detect;
pub mod scan;
pub mod tracking;
pub mod types;

pub use aggregate::aggregate;
pub use detect::{detect, PatternDetector, MODULE_SCOPE};
pub use tracking::MutationFacts;
pub use types::{
    ApiCallShape, ClassShape, CodePattern, ErrorHandlingShape, FieldShape, FunctionShape,
    InterfaceShape, LiteralInit, Parameter, PatternKind, PatternStructure, ValidationShape,
    VariableShape,
};
