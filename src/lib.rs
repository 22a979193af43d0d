//! Flockfill: Fair Phrase Sampling for Personalized Letters
//!
//! Composes one letter per roster row from a letter skeleton, project
//! metadata, and categorized phrase pools. Phrases are drawn so that within
//! each mutex group no phrase is used more than once beyond any other.

pub mod binder;
pub mod cli;
pub mod compose;
pub mod config;
pub mod content;
pub mod error;
pub mod fetcher;
pub mod genre;
pub mod logging;
pub mod parser;
pub mod project;
pub mod roster;
