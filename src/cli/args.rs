//! Command line argument parsing for the Spellgram CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Spellgram - context-aware spelling correction
#[derive(Parser, Debug, Clone)]
#[command(name = "spellgram")]
#[command(about = "Context-aware spelling correction with an n-gram language model")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Spellgram Contributors")]
#[command(long_about = None)]
pub struct SpellgramArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// N-gram count file, one "<count> <n-gram>" per line
    #[arg(long, value_name = "COUNTS_FILE", env = "SPELLGRAM_COUNTS")]
    pub counts: PathBuf,

    /// Vocabulary file, one word per line
    #[arg(long, value_name = "VOCABULARY_FILE", env = "SPELLGRAM_VOCABULARY")]
    pub vocabulary: PathBuf,

    /// Confusion file, one "<observed>|<intended> <count>" per line
    #[arg(long, value_name = "CONFUSION_FILE", env = "SPELLGRAM_CONFUSION")]
    pub confusion: Option<PathBuf>,

    /// Engine configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SpellgramArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Correct phrases given as arguments, or read one per line from stdin
    Correct(CorrectArgs),

    /// List the correction candidates of a single word
    Candidates(CandidatesArgs),

    /// Show smoothed word or bigram probabilities
    Probability(ProbabilityArgs),

    /// Show language model statistics
    Stats,
}

/// Arguments for correcting phrases
#[derive(Parser, Debug, Clone)]
pub struct CorrectArgs {
    /// Phrases to correct; stdin is read when none are given
    #[arg(value_name = "PHRASE")]
    pub phrases: Vec<String>,

    /// Only print phrases that were changed
    #[arg(long)]
    pub changed_only: bool,
}

/// Arguments for listing candidates
#[derive(Parser, Debug, Clone)]
pub struct CandidatesArgs {
    /// Word to generate candidates for
    #[arg(value_name = "WORD")]
    pub word: String,

    /// Also list candidates whose edit was never observed
    #[arg(long)]
    pub include_zero: bool,
}

/// Arguments for probability lookups
#[derive(Parser, Debug, Clone)]
pub struct ProbabilityArgs {
    /// Word to score
    #[arg(value_name = "WORD")]
    pub word: String,

    /// Score the word given this previous word
    #[arg(short, long, value_name = "PREVIOUS")]
    pub previous: Option<String>,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    const DATA: [&str; 5] = [
        "spellgram",
        "--counts",
        "counts.txt",
        "--vocabulary",
        "vocabulary.txt",
    ];

    fn parse(extra: &[&str]) -> SpellgramArgs {
        SpellgramArgs::try_parse_from(DATA.iter().chain(extra)).unwrap()
    }

    #[test]
    fn test_correct_command() {
        let args = parse(&["--confusion", "confusion.txt", "correct", "teh cat", "a dgo"]);

        assert_eq!(args.counts, PathBuf::from("counts.txt"));
        assert_eq!(args.confusion, Some(PathBuf::from("confusion.txt")));
        if let Command::Correct(correct_args) = args.command {
            assert_eq!(correct_args.phrases, vec!["teh cat", "a dgo"]);
            assert!(!correct_args.changed_only);
        } else {
            panic!("Expected Correct command");
        }
    }

    #[test]
    fn test_candidates_command() {
        let args = parse(&["candidates", "teh", "--include-zero"]);

        if let Command::Candidates(candidates_args) = args.command {
            assert_eq!(candidates_args.word, "teh");
            assert!(candidates_args.include_zero);
        } else {
            panic!("Expected Candidates command");
        }
    }

    #[test]
    fn test_probability_command() {
        let args = parse(&["probability", "cat", "--previous", "the"]);

        if let Command::Probability(probability_args) = args.command {
            assert_eq!(probability_args.word, "cat");
            assert_eq!(probability_args.previous.as_deref(), Some("the"));
        } else {
            panic!("Expected Probability command");
        }
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(parse(&["stats"]).verbosity(), 1);
        assert_eq!(parse(&["-vv", "stats"]).verbosity(), 2);
        assert_eq!(parse(&["--quiet", "stats"]).verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args = parse(&["--format", "json", "stats"]);
        assert!(matches!(args.output_format, OutputFormat::Json));
        assert!(matches!(args.command, Command::Stats));
    }

    #[test]
    fn test_missing_data_files() {
        assert!(SpellgramArgs::try_parse_from(["spellgram", "stats"]).is_err());
    }
}
