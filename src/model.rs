//! Smoothed n-gram language model.
//!
//! Unigram and bigram probabilities are estimated with Good-Turing
//! discounting over frequency-of-frequency tables derived from an
//! [`NGramTable`](crate::corpus::NGramTable).

pub mod frequency;
pub mod language_model;
pub mod smoothing;

pub use frequency::*;
pub use language_model::*;
pub use smoothing::*;
