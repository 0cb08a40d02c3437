//! Command implementations for the Spellgram CLI.

use std::io::{self, BufRead};
use std::sync::Arc;
use std::time::Instant;

use log::info;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::SpellgramConfig;
use crate::corpus::{ConfusionCounts, ConfusionMatrix};
use crate::error::{Result, SpellgramError};
use crate::model::LanguageModel;
use crate::spelling::SentenceCorrector;

/// Execute a CLI command.
pub fn execute_command(args: SpellgramArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => SpellgramConfig::from_json_file(path)?,
        None => SpellgramConfig::default(),
    };

    let model = Arc::new(LanguageModel::load(
        &args.counts,
        &args.vocabulary,
        config.smoothing.clone(),
    )?);

    match &args.command {
        Command::Correct(correct_args) => {
            let corrector = build_corrector(&args, &config, model)?;
            correct_phrases(correct_args, &corrector, &args)
        }
        Command::Candidates(candidates_args) => {
            let corrector = build_corrector(&args, &config, model)?;
            list_candidates(candidates_args, &corrector, &args)
        }
        Command::Probability(probability_args) => {
            show_probability(probability_args, &model, &args)
        }
        Command::Stats => output_result("Language model statistics", &model.stats(), &args),
    }
}

/// Load the confusion table, if any, and build the corrector.
fn build_corrector(
    args: &SpellgramArgs,
    config: &SpellgramConfig,
    model: Arc<LanguageModel>,
) -> Result<SentenceCorrector> {
    let confusion: Arc<dyn ConfusionCounts> = match &args.confusion {
        Some(path) => Arc::new(ConfusionMatrix::load_from_file(path)?),
        None => {
            info!("No confusion file given; only known words can be kept");
            Arc::new(ConfusionMatrix::new())
        }
    };
    config.build_corrector(model, confusion)
}

/// Correct phrases from the arguments or from stdin.
fn correct_phrases(
    args: &CorrectArgs,
    corrector: &SentenceCorrector,
    cli_args: &SpellgramArgs,
) -> Result<()> {
    let phrases = if args.phrases.is_empty() {
        read_stdin_phrases()?
    } else {
        args.phrases.clone()
    };

    if phrases.is_empty() {
        return Err(SpellgramError::invalid_argument("no phrases to correct"));
    }

    let start_time = Instant::now();
    let phrases: Vec<&str> = phrases.iter().map(String::as_str).collect();
    let mut corrections = corrector
        .correct_phrases(&phrases)
        .into_iter()
        .collect::<Result<Vec<_>>>()?;

    if args.changed_only {
        corrections.retain(|correction| correction.is_changed());
    }

    output_result(
        "Corrections",
        &CorrectionResults {
            corrections,
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

/// Non-blank stdin lines.
fn read_stdin_phrases() -> Result<Vec<String>> {
    let mut phrases = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        if !line.trim().is_empty() {
            phrases.push(line);
        }
    }
    Ok(phrases)
}

/// List the candidates of a word, best first.
fn list_candidates(
    args: &CandidatesArgs,
    corrector: &SentenceCorrector,
    cli_args: &SpellgramArgs,
) -> Result<()> {
    let mut candidates: Vec<_> = corrector
        .generator()
        .candidates(&args.word)?
        .into_values()
        .filter(|candidate| args.include_zero || candidate.weight > 0.0)
        .collect();
    candidates.sort_by(|a, b| b.weight.total_cmp(&a.weight));

    output_result(
        "Candidates",
        &CandidateList {
            word: args.word.clone(),
            in_vocabulary: corrector.model().in_vocabulary(&args.word),
            candidates,
        },
        cli_args,
    )
}

/// Show the prior or conditional probability of a word.
fn show_probability(
    args: &ProbabilityArgs,
    model: &LanguageModel,
    cli_args: &SpellgramArgs,
) -> Result<()> {
    let result = match &args.previous {
        Some(previous) => ProbabilityResult {
            word: args.word.clone(),
            previous: Some(previous.clone()),
            count: model.ngram_count(&format!("{previous} {}", args.word))?,
            probability: model.conditional_probability(&args.word, previous),
        },
        None => ProbabilityResult {
            word: args.word.clone(),
            previous: None,
            count: model.ngram_count(&args.word)?,
            probability: model.word_probability(&args.word),
        },
    };

    output_result("Probability", &result, cli_args)
}
