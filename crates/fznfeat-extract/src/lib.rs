//! Feature extraction for FlatZinc constraint models.
//!
//! The pipeline, left to right:
//!
//! ```text
//! source -> lexer -> parser -> engine events -> finalise -> FeatureMap
//!                                 |                 |
//!                          symbol table        graph analysis
//! ```
//!
//! - [`lexer`] - Logos-based tokenizer over the FlatZinc grammar subset
//! - [`parser`] - recursive descent, drives the engine event by event
//! - [`engine`] - symbol table, accumulator updates, finalisation
//! - [`graph`] - variable/constraint graph metrics under wall-clock budgets
//! - [`render`] - csv / dict / pp output of the finished row
//!
//! # Example
//!
//! ```
//! use fznfeat_core::Variant;
//! use fznfeat_extract::{FeatureExtractor, extract_model};
//!
//! let mut engine = FeatureExtractor::new(Variant::Full);
//! extract_model("var 1..9: x; solve satisfy;", &mut engine).expect("valid model");
//! let extraction = engine.finalise();
//! assert_eq!(extraction.features.get("v_num_vars"), 1.0);
//! ```

pub mod engine;
pub mod graph;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod stats;

#[cfg(test)]
mod graph_tests;

pub use engine::{Extraction, FeatureExtractor, SolveGoal};
pub use graph::GraphOutcome;
pub use parser::{ParseError, extract_model};
pub use render::{OutputFormat, render};
