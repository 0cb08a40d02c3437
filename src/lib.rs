//! # Spellgram
//!
//! Context-aware spelling correction for Rust.
//!
//! ## Features
//!
//! - Unigram/bigram language model with Good-Turing smoothing
//! - Edit-distance-1 candidates weighted by a confusion table
//! - Sentence-level search that changes at most two words
//! - Line-oriented loaders for counts, vocabulary and confusion data
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use spellgram::prelude::*;
//!
//! let mut ngrams = NGramTable::new();
//! for (ngram, count) in [("<s>", 2), ("</s>", 2), ("the", 1), ("<s> the", 1), ("the </s>", 1)] {
//!     ngrams.insert(ngram, count).unwrap();
//! }
//! let vocabulary: Vocabulary = ["<s>", "</s>", "the"].into_iter().collect();
//! let mut confusion = ConfusionMatrix::new();
//! confusion.insert("eh", "he", 10);
//!
//! let model = Arc::new(LanguageModel::new(ngrams, vocabulary));
//! let corrector = SentenceCorrector::new(model, Arc::new(confusion));
//! assert_eq!(corrector.correct_phrase("teh").unwrap(), "the");
//! ```

pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod model;
pub mod spelling;

pub mod prelude {
    pub use crate::config::SpellgramConfig;
    pub use crate::corpus::{ConfusionCounts, ConfusionMatrix, NGramTable, Vocabulary};
    pub use crate::error::{Result, SpellgramError};
    pub use crate::model::{LanguageModel, SmoothingConfig};
    pub use crate::spelling::{
        CandidateConfig, Correction, CorrectorConfig, EditCandidateGenerator, PhraseCorrection,
        SentenceCorrector,
    };
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
