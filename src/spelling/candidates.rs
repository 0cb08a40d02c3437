//! Edit-distance-1 candidate generation with noisy-channel weights.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::corpus::ConfusionCounts;
use crate::error::{Result, SpellgramError};
use crate::model::LanguageModel;

/// Letters tried for insertions and substitutions by default.
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz'";

/// Stands in for the left neighbour of the first character of a word.
pub const NO_CONTEXT: char = ' ';

/// Weight of keeping a known word, on the scale of raw confusion counts.
pub const DEFAULT_IDENTITY_WEIGHT: f64 = 250.0;

/// The single-character edit that turns a typed word into a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    /// A character the typist dropped is put back.
    Insertion,
    /// A character the typist added is removed.
    Deletion,
    /// Two adjacent characters are swapped back.
    Transposition,
    /// A mistyped character is replaced.
    Substitution,
}

/// One raw edit of a typed word, before any vocabulary filtering.
///
/// `observed` and `intended` are the confusion-table key: the span as typed
/// and the span the candidate assumes was meant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub kind: EditKind,
    pub position: usize,
    pub candidate: String,
    pub observed: String,
    pub intended: String,
}

/// A proposed fix for a single word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    /// The word as typed.
    pub original: String,
    /// The proposed word.
    pub corrected: String,
    /// Channel weight of the edit, or the prior of the word itself.
    pub weight: f64,
    /// The edit that produced the proposal, `None` for the word itself.
    pub edit: Option<EditKind>,
}

impl Correction {
    /// Create a correction produced by an edit.
    pub fn new(original: &str, corrected: String, weight: f64, edit: EditKind) -> Self {
        Correction {
            original: original.to_string(),
            corrected,
            weight,
            edit: Some(edit),
        }
    }

    /// The typed word kept as is.
    pub fn identity(word: &str, weight: f64) -> Self {
        Correction {
            original: word.to_string(),
            corrected: word.to_string(),
            weight,
            edit: None,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.edit.is_none()
    }
}

/// How raw confusion counts become channel weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChannelNormalization {
    /// Use the raw confusion count.
    #[default]
    Raw,
    /// Divide the count by every confusion recorded for the same observed span.
    ObservedSpan,
}

/// Configuration for candidate generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateConfig {
    /// Characters tried for insertions and substitutions.
    pub alphabet: String,
    /// Left-context symbol for edits at the start of a word.
    pub no_context: char,
    /// Channel weight normalization.
    pub normalization: ChannelNormalization,
    /// Fixed weight for keeping a known word. Uses the word prior when unset,
    /// which only suits normalized channel weights: a prior is always below
    /// one while every observed raw count is at least one.
    pub identity_weight: Option<f64>,
}

impl Default for CandidateConfig {
    fn default() -> Self {
        CandidateConfig {
            alphabet: DEFAULT_ALPHABET.to_string(),
            no_context: NO_CONTEXT,
            normalization: ChannelNormalization::Raw,
            identity_weight: Some(DEFAULT_IDENTITY_WEIGHT),
        }
    }
}

impl CandidateConfig {
    /// Check that the configured values are usable.
    pub fn validate(&self) -> Result<()> {
        if self.alphabet.is_empty() {
            return Err(SpellgramError::invalid_config("alphabet must not be empty"));
        }
        if let Some(weight) = self.identity_weight
            && !(weight.is_finite() && weight > 0.0)
        {
            return Err(SpellgramError::invalid_config(format!(
                "identity_weight must be a positive number, got {weight}"
            )));
        }
        Ok(())
    }
}

/// Proposes vocabulary words one edit away from a typed word.
#[derive(Debug, Clone)]
pub struct EditCandidateGenerator {
    model: Arc<LanguageModel>,
    confusion: Arc<dyn ConfusionCounts>,
    alphabet: Vec<char>,
    config: CandidateConfig,
}

impl EditCandidateGenerator {
    /// Create a generator with the default alphabet and raw channel weights.
    pub fn new(model: Arc<LanguageModel>, confusion: Arc<dyn ConfusionCounts>) -> Self {
        let config = CandidateConfig::default();
        EditCandidateGenerator {
            model,
            confusion,
            alphabet: config.alphabet.chars().collect(),
            config,
        }
    }

    /// Create a generator with a custom configuration.
    pub fn with_config(
        model: Arc<LanguageModel>,
        confusion: Arc<dyn ConfusionCounts>,
        config: CandidateConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(EditCandidateGenerator {
            model,
            confusion,
            alphabet: config.alphabet.chars().collect(),
            config,
        })
    }

    pub fn config(&self) -> &CandidateConfig {
        &self.config
    }

    pub fn model(&self) -> &Arc<LanguageModel> {
        &self.model
    }

    /// All vocabulary words one edit away from `word`, plus `word` itself when
    /// it is known, keyed by the proposed word.
    ///
    /// Zero-weight proposals are kept; callers decide whether to prune them.
    pub fn candidates(&self, word: &str) -> Result<BTreeMap<String, Correction>> {
        if word.trim().is_empty() {
            return Err(SpellgramError::invalid_argument("word must be non-empty"));
        }
        Ok(self.collect_candidates(word))
    }

    pub(crate) fn collect_candidates(&self, word: &str) -> BTreeMap<String, Correction> {
        let mut found: BTreeMap<String, Correction> = BTreeMap::new();

        for edit in self.edits(word) {
            if !self.model.in_vocabulary(&edit.candidate) {
                continue;
            }

            let weight = self.channel_weight(&edit);
            match found.entry(edit.candidate) {
                Entry::Vacant(entry) => {
                    let corrected = entry.key().clone();
                    entry.insert(Correction::new(word, corrected, weight, edit.kind));
                }
                Entry::Occupied(mut entry) => {
                    // Several edits can reach the same word; keep the likeliest.
                    if weight > entry.get().weight {
                        let corrected = entry.key().clone();
                        entry.insert(Correction::new(word, corrected, weight, edit.kind));
                    }
                }
            }
        }

        if self.model.in_vocabulary(word) {
            let weight = self
                .config
                .identity_weight
                .unwrap_or_else(|| self.model.word_probability(word));
            found.insert(word.to_string(), Correction::identity(word, weight));
        }

        trace!("{} candidates for '{word}'", found.len());
        found
    }

    /// Every string one insertion, deletion, transposition or substitution
    /// away from `word`, unfiltered and with duplicates.
    pub fn edits(&self, word: &str) -> Vec<Edit> {
        let chars: Vec<char> = word.chars().collect();
        let len = chars.len();
        let letters = self.alphabet.len();
        let mut edits = Vec::with_capacity((2 * len + 1) * letters + 2 * len);

        // Insertions
        for i in 0..=len {
            let context = self.left_context(&chars, i);
            for &letter in &self.alphabet {
                edits.push(Edit {
                    kind: EditKind::Insertion,
                    position: i,
                    candidate: splice(&chars[..i], &[letter], &chars[i..]),
                    observed: context.to_string(),
                    intended: [context, letter].iter().collect(),
                });
            }
        }

        // Deletions
        for i in 0..len {
            let context = self.left_context(&chars, i);
            edits.push(Edit {
                kind: EditKind::Deletion,
                position: i,
                candidate: splice(&chars[..i], &[], &chars[i + 1..]),
                observed: [context, chars[i]].iter().collect(),
                intended: context.to_string(),
            });
        }

        // Transpositions
        for i in 0..len.saturating_sub(1) {
            let swapped = [chars[i + 1], chars[i]];
            edits.push(Edit {
                kind: EditKind::Transposition,
                position: i,
                candidate: splice(&chars[..i], &swapped, &chars[i + 2..]),
                observed: chars[i..i + 2].iter().collect(),
                intended: swapped.iter().collect(),
            });
        }

        // Substitutions
        for i in 0..len {
            for &letter in &self.alphabet {
                edits.push(Edit {
                    kind: EditKind::Substitution,
                    position: i,
                    candidate: splice(&chars[..i], &[letter], &chars[i + 1..]),
                    observed: chars[i].to_string(),
                    intended: letter.to_string(),
                });
            }
        }

        edits
    }

    /// Channel weight of an edit from the confusion table.
    pub fn channel_weight(&self, edit: &Edit) -> f64 {
        let count = f64::from(self.confusion.confusion_count(&edit.observed, &edit.intended));
        match self.config.normalization {
            ChannelNormalization::Raw => count,
            ChannelNormalization::ObservedSpan => {
                let total = self.confusion.observed_total(&edit.observed);
                if total == 0 { 0.0 } else { count / total as f64 }
            }
        }
    }

    fn left_context(&self, chars: &[char], position: usize) -> char {
        if position == 0 {
            self.config.no_context
        } else {
            chars[position - 1]
        }
    }
}

fn splice(head: &[char], middle: &[char], tail: &[char]) -> String {
    head.iter().chain(middle).chain(tail).collect()
}
