//! Engine-wide configuration.
//!
//! Groups the smoothing, candidate and search settings so they can be kept
//! in one JSON file. Missing sections and fields take their defaults.
//!
//! ```
//! use spellgram::config::SpellgramConfig;
//!
//! let config = SpellgramConfig::from_json_str(r#"{ "corrector": { "max_corrections": 1 } }"#)
//!     .unwrap();
//! assert_eq!(config.corrector.max_corrections, 1);
//! assert_eq!(config.corrector.start_token, "<s>");
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::corpus::ConfusionCounts;
use crate::error::Result;
use crate::model::{LanguageModel, SmoothingConfig};
use crate::spelling::{CandidateConfig, CorrectorConfig, SentenceCorrector};

/// Configuration for every component of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SpellgramConfig {
    pub smoothing: SmoothingConfig,
    pub candidates: CandidateConfig,
    pub corrector: CorrectorConfig,
}

impl SpellgramConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SpellgramConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.smoothing.validate()?;
        self.candidates.validate()?;
        self.corrector.validate()
    }

    /// Build a corrector over an already loaded model.
    pub fn build_corrector(
        &self,
        model: Arc<LanguageModel>,
        confusion: Arc<dyn ConfusionCounts>,
    ) -> Result<SentenceCorrector> {
        SentenceCorrector::with_config(
            model,
            confusion,
            self.candidates.clone(),
            self.corrector.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::error::SpellgramError;
    use crate::spelling::ChannelNormalization;

    #[test]
    fn test_defaults_from_empty_json() {
        let config = SpellgramConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SpellgramConfig::default());
        assert_eq!(config.corrector.max_corrections, 2);
        assert_eq!(config.candidates.normalization, ChannelNormalization::Raw);
        assert_eq!(
            config.candidates.identity_weight,
            Some(crate::spelling::DEFAULT_IDENTITY_WEIGHT)
        );
        assert_eq!(config.smoothing.unseen_bigram_fraction, Some(1.0));
    }

    #[test]
    fn test_partial_sections() {
        let json = r#"{
            "smoothing": { "unseen_bigram_fraction": 500.0 },
            "candidates": { "normalization": "observed_span", "identity_weight": null },
            "corrector": { "end_token": "EoS" }
        }"#;
        let config = SpellgramConfig::from_json_str(json).unwrap();

        assert_eq!(config.smoothing.unseen_bigram_fraction, Some(500.0));
        assert_eq!(
            config.candidates.normalization,
            ChannelNormalization::ObservedSpan
        );
        assert_eq!(config.candidates.identity_weight, None);
        assert_eq!(config.candidates.alphabet, crate::spelling::DEFAULT_ALPHABET);
        assert_eq!(config.corrector.end_token, "EoS");
        assert_eq!(config.corrector.start_token, "<s>");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = SpellgramConfig::from_json_str(r#"{ "candidates": { "alphabet": "" } }"#)
            .unwrap_err();
        assert!(matches!(err, SpellgramError::InvalidConfig(_)));

        let err = SpellgramConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, SpellgramError::Json(_)));
    }

    #[test]
    fn test_from_json_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, r#"{{ "corrector": {{ "max_corrections": 3 }} }}"#).unwrap();
        temp_file.flush().unwrap();

        let config = SpellgramConfig::from_json_file(temp_file.path()).unwrap();
        assert_eq!(config.corrector.max_corrections, 3);
    }
}
