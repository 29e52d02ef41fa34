//! Static analysis of TypeScript and JavaScript source that detects code
//! patterns and proposes confidence-ranked improvements.
//!
//! The pipeline is [`syntax::build`] → [`patterns::detect`] →
//! [`patterns::aggregate`] → the [`suggest`] generators →
//! [`orchestrator::rank`]. [`orchestrator::orchestrate`] runs all of it.

pub mod config;
pub mod corpus;
pub mod error;
pub mod orchestrator;
pub mod patterns;
pub mod report;
pub mod suggest;
pub mod syntax;
pub mod typing;

pub use error::{CodesenseError, ParseError, Result};
pub use orchestrator::{analyze, orchestrate, SuggestOptions};
