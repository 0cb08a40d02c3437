//! Confusion counts: how often an intended character span was typed as another.

use std::fmt::Debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ahash::AHashMap;
use log::info;

use crate::error::{Result, SpellgramError};

/// Lookup of observed edit frequencies.
///
/// Spans are one or two characters long; a leading space stands for the
/// start of a word.
pub trait ConfusionCounts: Send + Sync + Debug {
    /// How often `intended` was observed as `observed`. Absent entries are 0.
    fn confusion_count(&self, observed: &str, intended: &str) -> u32;

    /// Sum of all counts recorded for `observed`.
    fn observed_total(&self, observed: &str) -> u64;
}

/// In-memory confusion table.
#[derive(Debug, Clone, Default)]
pub struct ConfusionMatrix {
    counts: AHashMap<String, AHashMap<String, u32>>,
    totals: AHashMap<String, u64>,
}

impl ConfusionMatrix {
    /// Create a new empty matrix.
    pub fn new() -> Self {
        ConfusionMatrix::default()
    }

    /// Record `count` more occurrences of `intended` typed as `observed`.
    pub fn insert(&mut self, observed: &str, intended: &str, count: u32) {
        let entry = self
            .counts
            .entry(observed.to_string())
            .or_default()
            .entry(intended.to_string())
            .or_insert(0);
        *entry = entry.saturating_add(count);
        *self.totals.entry(observed.to_string()).or_insert(0) += u64::from(count);
    }

    /// Parse lines of the form `<observed>|<intended> <count>`.
    ///
    /// The count is separated by the last space on the line, so spans may
    /// themselves contain the space that marks a word start (`" a|  12"` maps
    /// `" a"` to `" "`).
    pub fn from_reader<R: BufRead>(reader: R, source: &str) -> Result<Self> {
        let mut matrix = ConfusionMatrix::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let line_number = index + 1;
            let line = line.trim_end();
            let (spans, count) = line.rsplit_once(' ').ok_or_else(|| {
                SpellgramError::malformed_line(source, line_number, "missing count")
            })?;
            let count: u32 = count.parse().map_err(|_| {
                SpellgramError::malformed_line(
                    source,
                    line_number,
                    format!("invalid count '{count}'"),
                )
            })?;
            let (observed, intended) = spans.split_once('|').ok_or_else(|| {
                SpellgramError::malformed_line(source, line_number, "expected 'observed|intended'")
            })?;
            if observed.is_empty() || intended.is_empty() {
                return Err(SpellgramError::malformed_line(
                    source,
                    line_number,
                    "empty character span",
                ));
            }

            matrix.insert(observed, intended, count);
        }

        Ok(matrix)
    }

    /// Load a confusion file from disk.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let matrix = Self::from_reader(reader, &path.display().to_string())?;
        info!("Loaded {} confusion entries from {}", matrix.len(), path.display());
        Ok(matrix)
    }

    /// Number of distinct (observed, intended) pairs.
    pub fn len(&self) -> usize {
        self.counts.values().map(|row| row.len()).sum()
    }

    /// Whether no pair has been recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl ConfusionCounts for ConfusionMatrix {
    fn confusion_count(&self, observed: &str, intended: &str) -> u32 {
        self.counts
            .get(observed)
            .and_then(|row| row.get(intended))
            .copied()
            .unwrap_or(0)
    }

    fn observed_total(&self, observed: &str) -> u64 {
        self.totals.get(observed).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_lookup() {
        let mut matrix = ConfusionMatrix::new();
        matrix.insert("eh", "he", 40);
        matrix.insert("e", "a", 7);
        matrix.insert("e", "i", 3);
        matrix.insert("e", "a", 1);

        assert_eq!(matrix.confusion_count("eh", "he"), 40);
        assert_eq!(matrix.confusion_count("e", "a"), 8);
        assert_eq!(matrix.confusion_count("he", "eh"), 0);
        assert_eq!(matrix.observed_total("e"), 11);
        assert_eq!(matrix.observed_total("x"), 0);
        assert_eq!(matrix.len(), 3);
    }

    #[test]
    fn test_parse_spans_with_word_start() {
        let data = "eh|he 40\n a|  12\n|x 3\n";
        let err = ConfusionMatrix::from_reader(Cursor::new(data), "confusion").unwrap_err();
        assert!(matches!(err, SpellgramError::MalformedData(_)));

        let data = "eh|he 40\n a|  12\n\nt|r 5\r\n";
        let matrix = ConfusionMatrix::from_reader(Cursor::new(data), "confusion").unwrap();
        assert_eq!(matrix.confusion_count("eh", "he"), 40);
        assert_eq!(matrix.confusion_count(" a", " "), 12);
        assert_eq!(matrix.confusion_count("t", "r"), 5);
    }

    #[test]
    fn test_invalid_count() {
        let err = ConfusionMatrix::from_reader(Cursor::new("a|e many\n"), "confusion").unwrap_err();
        match err {
            SpellgramError::MalformedData(msg) => assert!(msg.contains("confusion:1")),
            other => panic!("Expected MalformedData, got {other:?}"),
        }
    }
}
