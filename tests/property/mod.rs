//! Property-based tests for sampling fairness and template parsing

mod fairness;
mod templates;
