// src/scoring/mod.rs
//! Heuristic compatibility scoring of a candidate against a job description

pub mod scorer;
pub mod vocabulary;

pub use scorer::CompatibilityScorer;
pub use vocabulary::Vocabulary;
