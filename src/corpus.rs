//! Frequency, vocabulary and confusion stores backing the language model.
//!
//! These are the line-oriented resources a correction engine is built from:
//! n-gram counts, the list of valid words, and how often one character span
//! is typed in place of another. All of them are loaded once and only read
//! afterwards.

pub mod confusion;
pub mod ngram;
pub mod vocabulary;

pub use confusion::*;
pub use ngram::*;
pub use vocabulary::*;
