//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, SpellgramArgs};
use crate::error::Result;
use crate::spelling::{Correction, PhraseCorrection};

/// Result structure for phrase correction.
#[derive(Debug, Serialize, Deserialize)]
pub struct CorrectionResults {
    pub corrections: Vec<PhraseCorrection>,
    pub duration_ms: u64,
}

/// Result structure for candidate listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct CandidateList {
    pub word: String,
    pub in_vocabulary: bool,
    pub candidates: Vec<Correction>,
}

/// Result structure for probability lookups.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProbabilityResult {
    pub word: String,
    pub previous: Option<String>,
    pub count: u32,
    pub probability: f64,
}

/// Output a result in the requested format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &SpellgramArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &SpellgramArgs) -> Result<()> {
    if args.verbosity() > 1 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;

    match std::any::type_name::<T>() {
        name if name.ends_with("CorrectionResults") => output_corrections_human(&value, args),
        name if name.ends_with("CandidateList") => output_candidates_human(&value),
        _ => output_generic_human(&value),
    }
}

/// Output corrected phrases, one per line.
fn output_corrections_human(value: &serde_json::Value, args: &SpellgramArgs) -> Result<()> {
    if let Some(corrections) = value.get("corrections").and_then(|c| c.as_array()) {
        for correction in corrections {
            let corrected = correction
                .get("corrected")
                .and_then(|c| c.as_str())
                .unwrap_or_default();
            println!("{corrected}");

            if args.verbosity() > 1 {
                let changes = correction
                    .get("corrections")
                    .and_then(|c| c.as_u64())
                    .unwrap_or(0);
                match correction.get("log_probability").and_then(|p| p.as_f64()) {
                    Some(score) => println!("  ({changes} changes, log p = {score:.4})"),
                    None => println!("  (no scorable correction)"),
                }
            }
        }
    }

    if args.verbosity() > 1
        && let Some(duration) = value.get("duration_ms").and_then(|d| d.as_u64())
    {
        println!();
        println!("Correction time: {duration}ms");
    }
    Ok(())
}

/// Output candidates as an aligned table.
fn output_candidates_human(value: &serde_json::Value) -> Result<()> {
    let word = value.get("word").and_then(|w| w.as_str()).unwrap_or_default();
    println!("Candidates for '{word}':");
    println!("─────────────────────");

    if let Some(candidates) = value.get("candidates").and_then(|c| c.as_array()) {
        for candidate in candidates {
            let corrected = candidate
                .get("corrected")
                .and_then(|c| c.as_str())
                .unwrap_or_default();
            let weight = candidate
                .get("weight")
                .and_then(|w| w.as_f64())
                .unwrap_or(0.0);
            let edit = candidate
                .get("edit")
                .and_then(|e| e.as_str())
                .unwrap_or("identity");
            println!("{corrected:<20} {edit:<14} {weight}");
        }
        if candidates.is_empty() {
            println!("(none)");
        }
    }
    Ok(())
}

/// Output generic data in human format.
fn output_generic_human(value: &serde_json::Value) -> Result<()> {
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                println!("{key}: {}", format_value(val));
            }
        }
        _ => println!("{}", format_value(value)),
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &SpellgramArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

/// Format a JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}
