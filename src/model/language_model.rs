//! Unigram and bigram probabilities over a loaded corpus.

use std::collections::HashSet;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::corpus::{Arity, NGRAM_SEPARATOR, NGramTable, Vocabulary};
use crate::error::{Result, SpellgramError};
use crate::model::frequency::FrequencyOfFrequency;
use crate::model::smoothing::GoodTuring;

/// Configuration for Good-Turing smoothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// When set to `f`, an unseen bigram gets the smoothed count `N1 / N0`
    /// with `N0 = max(1, (V^2 - distinct bigrams) / f)`, V being the
    /// vocabulary size. `1.0` shares the held-out mass evenly between all
    /// unseen word pairs. When unset, every unseen bigram gets the whole `N1`.
    pub unseen_bigram_fraction: Option<f64>,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        SmoothingConfig {
            unseen_bigram_fraction: Some(1.0),
        }
    }
}

impl SmoothingConfig {
    /// Check that the configured values are usable.
    pub fn validate(&self) -> Result<()> {
        if let Some(fraction) = self.unseen_bigram_fraction
            && !(fraction.is_finite() && fraction > 0.0)
        {
            return Err(SpellgramError::invalid_config(format!(
                "unseen_bigram_fraction must be a positive number, got {fraction}"
            )));
        }
        Ok(())
    }
}

/// Summary of a loaded model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelStats {
    /// Number of valid words.
    pub vocabulary_size: usize,
    /// Distinct unigrams with a count.
    pub distinct_unigrams: u64,
    /// Distinct bigrams with a count.
    pub distinct_bigrams: u64,
    /// Sum of all unigram counts.
    pub unigram_mass: u64,
    /// Sum of all bigram counts.
    pub bigram_mass: u64,
    /// Highest unigram count.
    pub max_unigram_count: u32,
    /// Highest bigram count.
    pub max_bigram_count: u32,
}

/// N-gram language model with Good-Turing smoothing.
///
/// Read-only once built; share it behind an `Arc` across correction requests.
#[derive(Debug, Clone)]
pub struct LanguageModel {
    ngrams: NGramTable,
    vocabulary: Vocabulary,
    unigrams: GoodTuring,
    bigrams: GoodTuring,
    unigram_total: f64,
    config: SmoothingConfig,
}

impl LanguageModel {
    /// Build a model with the default smoothing configuration.
    pub fn new(ngrams: NGramTable, vocabulary: Vocabulary) -> Self {
        Self::build(ngrams, vocabulary, SmoothingConfig::default())
    }

    /// Build a model with a custom smoothing configuration.
    pub fn with_config(
        ngrams: NGramTable,
        vocabulary: Vocabulary,
        config: SmoothingConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(ngrams, vocabulary, config))
    }

    /// Load the frequency and vocabulary files and build a model.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        counts_path: P,
        vocabulary_path: Q,
        config: SmoothingConfig,
    ) -> Result<Self> {
        let ngrams = NGramTable::load_from_file(counts_path)?;
        let vocabulary = Vocabulary::load_from_file(vocabulary_path)?;
        Self::with_config(ngrams, vocabulary, config)
    }

    fn build(ngrams: NGramTable, vocabulary: Vocabulary, config: SmoothingConfig) -> Self {
        let unigram_classes = FrequencyOfFrequency::from_counts(ngrams.counts_of(Arity::Unigram));
        let bigram_classes = FrequencyOfFrequency::from_counts(ngrams.counts_of(Arity::Bigram));

        // Unseen vocabulary words share the held-out mass N1.
        let unseen_words = vocabulary
            .iter()
            .filter(|word| ngrams.count(word) == 0)
            .count();
        let unseen_word_count = unigram_classes.singletons() as f64 / unseen_words.max(1) as f64;
        let unigrams = GoodTuring::with_unseen_count(unigram_classes, unseen_word_count);
        let unigram_total = unigram_normalizer(&unigrams, ngrams.unigram_mass(), unseen_words > 0);
        let bigrams = match config.unseen_bigram_fraction {
            Some(fraction) => {
                let vocabulary_size = vocabulary.len() as f64;
                let possible = vocabulary_size * vocabulary_size;
                let unseen = ((possible - bigram_classes.distinct() as f64) / fraction).max(1.0);
                let unseen_count = bigram_classes.singletons() as f64 / unseen;
                GoodTuring::with_unseen_count(bigram_classes, unseen_count)
            }
            None => GoodTuring::new(bigram_classes),
        };

        let model = LanguageModel {
            ngrams,
            vocabulary,
            unigrams,
            bigrams,
            unigram_total,
            config,
        };

        info!(
            "Built language model: {} words, {} unigram classes, {} bigram classes",
            model.vocabulary.len(),
            model.unigrams.classes().len(),
            model.bigrams.classes().len()
        );
        debug!(
            "Unseen smoothed counts: unigram {}, bigram {}; unigram normalizer {}",
            model.unigrams.unseen_count(),
            model.bigrams.unseen_count(),
            model.unigram_total
        );

        model
    }

    /// Stored count for an n-gram key, 0 if absent.
    ///
    /// Whitespace in the key is normalized the way the count table stores it.
    pub fn ngram_count(&self, key: &str) -> Result<u32> {
        let words: Vec<&str> = key.split_whitespace().collect();
        if words.is_empty() {
            return Err(SpellgramError::invalid_argument("n-gram must be non-empty"));
        }
        Ok(self.ngrams.count(&words.join(NGRAM_SEPARATOR)))
    }

    /// Check whether a word is in the vocabulary.
    pub fn in_vocabulary(&self, word: &str) -> bool {
        self.vocabulary.contains(word)
    }

    /// The subset of `words` that are in the vocabulary.
    pub fn in_vocabulary_set(&self, words: &HashSet<String>) -> HashSet<String> {
        self.vocabulary.intersection(words.iter().map(String::as_str))
    }

    /// Smoothed prior probability of a word, 0 for words outside the vocabulary.
    ///
    /// The smoothed count is divided by the unigram mass, or by the total
    /// smoothed mass when Good-Turing gives out more than was observed, so the
    /// vocabulary never sums above one.
    pub fn word_probability(&self, word: &str) -> f64 {
        if !self.in_vocabulary(word) {
            return 0.0;
        }

        let count = self.ngrams.count(word);
        let smoothed = self.unigrams.smoothed_count(count);
        ratio(smoothed, self.unigram_total)
    }

    /// Smoothed probability that `next` follows `previous`.
    ///
    /// Both words must be in the vocabulary. The result is the smoothed
    /// bigram count over the smoothed count of `previous`, 0 when that count
    /// is 0.
    pub fn conditional_probability(&self, next: &str, previous: &str) -> f64 {
        if !self.in_vocabulary(next) || !self.in_vocabulary(previous) {
            return 0.0;
        }

        let previous_count = self.unigrams.smoothed_count(self.ngrams.count(previous));
        let pair_count = self
            .bigrams
            .smoothed_count(self.ngrams.bigram_count(previous, next));
        ratio(pair_count, previous_count)
    }

    /// Unigram Good-Turing estimator.
    pub fn unigram_smoothing(&self) -> &GoodTuring {
        &self.unigrams
    }

    /// Bigram Good-Turing estimator.
    pub fn bigram_smoothing(&self) -> &GoodTuring {
        &self.bigrams
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn ngrams(&self) -> &NGramTable {
        &self.ngrams
    }

    pub fn config(&self) -> &SmoothingConfig {
        &self.config
    }

    /// Get statistics about the model.
    pub fn stats(&self) -> ModelStats {
        ModelStats {
            vocabulary_size: self.vocabulary.len(),
            distinct_unigrams: self.unigrams.classes().distinct(),
            distinct_bigrams: self.bigrams.classes().distinct(),
            unigram_mass: self.ngrams.unigram_mass(),
            bigram_mass: self.ngrams.bigram_mass(),
            max_unigram_count: self.unigrams.classes().max_count().unwrap_or(0),
            max_bigram_count: self.bigrams.classes().max_count().unwrap_or(0),
        }
    }
}

/// Larger of the observed unigram mass and the smoothed mass handed out to
/// seen words plus, when some vocabulary word is unseen, the held-out mass.
fn unigram_normalizer(unigrams: &GoodTuring, mass: u64, has_unseen: bool) -> f64 {
    let seen: f64 = unigrams
        .classes()
        .iter()
        .map(|(count, words)| words as f64 * unigrams.smoothed_count(count))
        .sum();
    let held_out = if has_unseen {
        unigrams.classes().singletons() as f64
    } else {
        0.0
    };
    (seen + held_out).max(mass as f64)
}

/// `numerator / denominator` clamped to `[0, 1]`; 0 for an empty denominator.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator <= 0.0 || !numerator.is_finite() {
        return 0.0;
    }
    (numerator / denominator).clamp(0.0, 1.0)
}
