//! Sentence-level spelling corrector.

use std::sync::Arc;

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::corpus::ConfusionCounts;
use crate::error::{Result, SpellgramError};
use crate::model::LanguageModel;
use crate::spelling::candidates::{CandidateConfig, EditCandidateGenerator};

/// Score of a search branch that cannot produce a sentence.
pub const UNREACHABLE: f64 = f64::NEG_INFINITY;

/// Configuration for the sentence corrector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectorConfig {
    /// Maximum number of words changed in one sentence.
    pub max_corrections: usize,
    /// Vocabulary token that starts every sentence.
    pub start_token: String,
    /// Vocabulary token that ends every sentence.
    pub end_token: String,
}

impl Default for CorrectorConfig {
    fn default() -> Self {
        CorrectorConfig {
            max_corrections: 2,
            start_token: "<s>".to_string(),
            end_token: "</s>".to_string(),
        }
    }
}

impl CorrectorConfig {
    /// Check that the configured values are usable.
    pub fn validate(&self) -> Result<()> {
        for (name, token) in [("start_token", &self.start_token), ("end_token", &self.end_token)] {
            if token.is_empty() || token.contains(char::is_whitespace) {
                return Err(SpellgramError::invalid_config(format!(
                    "{name} must be a single non-empty word, got '{token}'"
                )));
            }
        }
        Ok(())
    }
}

/// A sentence with its log-probability.
#[derive(Debug, Clone, PartialEq)]
pub struct SentenceProbabilityPair {
    sentence: String,
    log_probability: f64,
}

impl SentenceProbabilityPair {
    pub fn new(sentence: String, log_probability: f64) -> Self {
        SentenceProbabilityPair {
            sentence,
            log_probability,
        }
    }

    /// The sentinel result of a branch with no valid completion.
    pub fn unreachable() -> Self {
        SentenceProbabilityPair::new(String::new(), UNREACHABLE)
    }

    pub fn sentence(&self) -> &str {
        &self.sentence
    }

    pub fn log_probability(&self) -> f64 {
        self.log_probability
    }

    pub fn is_reachable(&self) -> bool {
        self.log_probability > UNREACHABLE
    }
}

/// Result of correcting one phrase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseCorrection {
    /// Phrase as given.
    pub original: String,
    /// Best correction, or the original phrase if none could be scored.
    pub corrected: String,
    /// Log-probability of the corrected sentence, `None` if unreachable.
    pub log_probability: Option<f64>,
    /// Number of words that differ from the input.
    pub corrections: usize,
}

impl PhraseCorrection {
    /// Check if any word was changed.
    pub fn is_changed(&self) -> bool {
        self.corrections > 0
    }
}

/// One viable choice for the word at a search position.
struct Step {
    word: String,
    score: f64,
    corrections: usize,
}

/// A search position whose choices are still being explored.
///
/// `depth` is the length of the decided path when the position was reached.
struct Frame {
    position: usize,
    depth: usize,
    log_probability: f64,
    steps: std::vec::IntoIter<Step>,
}

/// Depth-first search state for one sentence.
///
/// Positions waiting for exploration live on an explicit stack, so the depth
/// of the search never depends on the call stack. Leaves are scored in the
/// order a recursive descent would reach them.
struct Search<'s, 'w> {
    corrector: &'s SentenceCorrector,
    words: &'w [&'w str],
    path: Vec<String>,
    frames: Vec<Frame>,
    best: SentenceProbabilityPair,
}

impl<'s, 'w> Search<'s, 'w> {
    fn new(corrector: &'s SentenceCorrector, words: &'w [&'w str]) -> Self {
        Search {
            corrector,
            words,
            path: Vec::with_capacity(words.len()),
            frames: Vec::new(),
            best: SentenceProbabilityPair::unreachable(),
        }
    }

    fn run(mut self) -> SentenceProbabilityPair {
        self.expand(0, 0.0, 0);

        while let Some(frame) = self.frames.last_mut() {
            let Some(step) = frame.steps.next() else {
                self.frames.pop();
                continue;
            };
            let position = frame.position + 1;
            let log_probability = frame.log_probability + step.score;

            self.path.truncate(frame.depth);
            self.path.push(step.word);
            self.expand(position, log_probability, step.corrections);
        }

        self.best
    }

    /// The last decided word, or the start token.
    fn previous(&self) -> &str {
        self.path
            .last()
            .map_or(self.corrector.config.start_token.as_str(), String::as_str)
    }

    /// Queue the choices for `words[position]`, or close the sentence when
    /// nothing is left to decide.
    fn expand(&mut self, position: usize, log_probability: f64, corrections: usize) {
        let corrector = self.corrector;
        if position == self.words.len() || corrections >= corrector.config.max_corrections {
            self.complete_verbatim(position, log_probability);
            return;
        }

        let original = self.words[position];
        let previous = self.previous();
        let steps: Vec<Step> = corrector
            .generator
            .collect_candidates(original)
            .into_values()
            // ln(0) is undefined; unobserved edits cannot be scored.
            .filter(|candidate| candidate.weight > 0.0)
            .filter_map(|candidate| {
                let transition = corrector.log_transition(&candidate.corrected, previous)?;
                Some(Step {
                    score: candidate.weight.ln() + transition,
                    corrections: corrections + usize::from(candidate.corrected != original),
                    word: candidate.corrected,
                })
            })
            .collect();

        if !steps.is_empty() {
            self.frames.push(Frame {
                position,
                depth: self.path.len(),
                log_probability,
                steps: steps.into_iter(),
            });
        }
    }

    /// Append the rest of the phrase unchanged and close the sentence.
    fn complete_verbatim(&mut self, position: usize, log_probability: f64) {
        let corrector = self.corrector;
        let words = self.words;
        let remaining = &words[position..];
        let end = corrector.config.end_token.as_str();
        let mut log_probability = log_probability;
        let mut previous = self.previous();

        for &word in remaining.iter().chain(std::iter::once(&end)) {
            match corrector.log_transition(word, previous) {
                Some(transition) => log_probability += transition,
                None => return,
            }
            previous = word;
        }

        if log_probability > self.best.log_probability {
            let sentence = self
                .path
                .iter()
                .map(String::as_str)
                .chain(remaining.iter().copied())
                .collect::<Vec<_>>()
                .join(" ");
            self.best = SentenceProbabilityPair::new(sentence, log_probability);
        }
    }
}

/// Corrects whole sentences by searching over per-word edit candidates.
///
/// Every word may be kept or replaced by one of its candidates; a sentence is
/// scored by summing, per word, the log channel weight and the log bigram
/// probability of the word given its predecessor, plus the transition to the
/// end token. At most `max_corrections` words are changed.
#[derive(Debug, Clone)]
pub struct SentenceCorrector {
    model: Arc<LanguageModel>,
    generator: EditCandidateGenerator,
    config: CorrectorConfig,
}

impl SentenceCorrector {
    /// Create a corrector with default configuration.
    pub fn new(model: Arc<LanguageModel>, confusion: Arc<dyn ConfusionCounts>) -> Self {
        let generator = EditCandidateGenerator::new(Arc::clone(&model), confusion);
        let config = CorrectorConfig::default();
        warn_missing_tokens(&model, &config);

        SentenceCorrector {
            model,
            generator,
            config,
        }
    }

    /// Create a corrector with custom candidate and search configuration.
    pub fn with_config(
        model: Arc<LanguageModel>,
        confusion: Arc<dyn ConfusionCounts>,
        candidate_config: CandidateConfig,
        config: CorrectorConfig,
    ) -> Result<Self> {
        config.validate()?;
        let generator =
            EditCandidateGenerator::with_config(Arc::clone(&model), confusion, candidate_config)?;
        warn_missing_tokens(&model, &config);

        Ok(SentenceCorrector {
            model,
            generator,
            config,
        })
    }

    pub fn config(&self) -> &CorrectorConfig {
        &self.config
    }

    pub fn generator(&self) -> &EditCandidateGenerator {
        &self.generator
    }

    pub fn model(&self) -> &Arc<LanguageModel> {
        &self.model
    }

    /// Return the most probable correction of a phrase.
    ///
    /// The phrase is split on whitespace. If no correction can be scored, the
    /// phrase is returned unchanged.
    pub fn correct_phrase(&self, phrase: &str) -> Result<String> {
        Ok(self.correct(phrase)?.corrected)
    }

    /// Correct a phrase and report its score and the number of changed words.
    pub fn correct(&self, phrase: &str) -> Result<PhraseCorrection> {
        if phrase.trim().is_empty() {
            return Err(SpellgramError::invalid_argument("phrase must be non-empty"));
        }

        let words: Vec<&str> = phrase.split_whitespace().collect();
        let best = self.best_sentence(&words);

        if !best.is_reachable() {
            debug!("No reachable correction for '{phrase}', keeping input");
            return Ok(PhraseCorrection {
                original: phrase.to_string(),
                corrected: phrase.to_string(),
                log_probability: None,
                corrections: 0,
            });
        }

        let corrections = best
            .sentence()
            .split(' ')
            .zip(&words)
            .filter(|(corrected, original)| corrected != *original)
            .count();

        debug!(
            "Corrected '{phrase}' to '{}' ({corrections} changes, log p = {})",
            best.sentence(),
            best.log_probability()
        );

        Ok(PhraseCorrection {
            original: phrase.to_string(),
            corrected: best.sentence,
            log_probability: Some(best.log_probability),
            corrections,
        })
    }

    /// Correct several phrases in parallel.
    pub fn correct_phrases(&self, phrases: &[&str]) -> Vec<Result<PhraseCorrection>> {
        phrases.par_iter().map(|phrase| self.correct(phrase)).collect()
    }

    /// Highest-scoring completion of `words` after the start token.
    ///
    /// Ties go to the completion found first.
    pub fn best_sentence(&self, words: &[&str]) -> SentenceProbabilityPair {
        Search::new(self, words).run()
    }

    /// `ln P(next | previous)`, or `None` when the transition is impossible.
    fn log_transition(&self, next: &str, previous: &str) -> Option<f64> {
        let probability = self.model.conditional_probability(next, previous);
        (probability > 0.0).then(|| probability.ln())
    }
}

fn warn_missing_tokens(model: &LanguageModel, config: &CorrectorConfig) {
    for token in [&config.start_token, &config.end_token] {
        if !model.in_vocabulary(token) {
            log::warn!("Sentence token '{token}' is not in the vocabulary; no sentence can be scored");
        }
    }
}
