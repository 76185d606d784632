//! scoutsheet-core: form schema parsing, column derivation and equation scoring.
//!
//! A form configuration defines the fields a scouting form collects and the
//! formulas used to score each team. This crate turns that configuration into
//! an immutable [`schema::Schema`] plus [`equation::Equation`]s, and scores
//! team records against them.

mod binding;
pub mod columns;
pub mod config;
pub mod engine;
pub mod equation;
pub mod error;
pub mod expr;
pub mod field;
pub mod report;
pub mod schema;
pub mod team;

pub use error::ScoutError;
