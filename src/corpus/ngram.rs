//! N-gram count table loaded from a `<count> <n-gram>` frequency file.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ahash::AHashMap;
use log::{debug, info};

use crate::error::{Result, SpellgramError};

/// Separator between the words of a bigram key.
pub const NGRAM_SEPARATOR: &str = " ";

/// Number of words in an n-gram key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Unigram,
    Bigram,
}

impl Arity {
    /// Classify a normalized key by its word count.
    pub fn of(key: &str) -> Self {
        if key.contains(NGRAM_SEPARATOR) {
            Arity::Bigram
        } else {
            Arity::Unigram
        }
    }
}

/// Occurrence counts for unigrams and bigrams.
///
/// Every stored key has a count of at least one; absent keys count as zero.
/// Bigram keys are the two words joined by [`NGRAM_SEPARATOR`].
#[derive(Debug, Clone, Default)]
pub struct NGramTable {
    counts: AHashMap<String, u32>,
    unigram_mass: u64,
    bigram_mass: u64,
}

impl NGramTable {
    /// Create a new empty table.
    pub fn new() -> Self {
        NGramTable::default()
    }

    /// Add `count` occurrences of an n-gram.
    ///
    /// Whitespace inside the n-gram is normalized to single separators.
    /// Repeated n-grams accumulate and zero counts are ignored. N-grams of
    /// more than two words are skipped.
    pub fn insert(&mut self, ngram: &str, count: u32) -> Result<()> {
        let words: Vec<&str> = ngram.split_whitespace().collect();
        let arity = match words.len() {
            0 => return Err(SpellgramError::invalid_argument("n-gram must be non-empty")),
            1 => Arity::Unigram,
            2 => Arity::Bigram,
            n => {
                debug!("Skipping {n}-gram '{ngram}'");
                return Ok(());
            }
        };

        if count == 0 {
            return Ok(());
        }

        let key = words.join(NGRAM_SEPARATOR);
        let entry = self.counts.entry(key).or_insert(0);
        *entry = entry.saturating_add(count);

        match arity {
            Arity::Unigram => self.unigram_mass += u64::from(count),
            Arity::Bigram => self.bigram_mass += u64::from(count),
        }

        Ok(())
    }

    /// Parse a frequency source, one `<count> <space-separated n-gram>` per line.
    ///
    /// Blank lines are skipped. A line whose count prefix is not a valid
    /// non-negative integer, or which has no n-gram after it, aborts the load
    /// with [`SpellgramError::MalformedData`].
    pub fn from_reader<R: BufRead>(reader: R, source: &str) -> Result<Self> {
        let mut table = NGramTable::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let line_number = index + 1;
            let (count, ngram) = line.split_once(char::is_whitespace).ok_or_else(|| {
                SpellgramError::malformed_line(source, line_number, "missing n-gram after count")
            })?;

            let count: u32 = count.parse().map_err(|_| {
                SpellgramError::malformed_line(
                    source,
                    line_number,
                    format!("invalid count '{count}'"),
                )
            })?;

            let ngram = ngram.trim();
            if ngram.is_empty() {
                return Err(SpellgramError::malformed_line(
                    source,
                    line_number,
                    "missing n-gram after count",
                ));
            }

            table.insert(ngram, count)?;
        }

        Ok(table)
    }

    /// Load a frequency file from disk.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let table = Self::from_reader(reader, &path.display().to_string())?;

        info!(
            "Loaded {} n-grams from {} (unigram mass {}, bigram mass {})",
            table.len(),
            path.display(),
            table.unigram_mass,
            table.bigram_mass
        );

        Ok(table)
    }

    /// Stored count for a normalized key, 0 if absent.
    pub fn count(&self, key: &str) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Stored count for the bigram `first second`.
    pub fn bigram_count(&self, first: &str, second: &str) -> u32 {
        self.count(&format!("{first}{NGRAM_SEPARATOR}{second}"))
    }

    /// Sum of all unigram counts.
    pub fn unigram_mass(&self) -> u64 {
        self.unigram_mass
    }

    /// Sum of all bigram counts.
    pub fn bigram_mass(&self) -> u64 {
        self.bigram_mass
    }

    /// Counts of every stored n-gram of the given arity.
    pub fn counts_of(&self, arity: Arity) -> impl Iterator<Item = u32> + '_ {
        self.counts
            .iter()
            .filter(move |(key, _)| Arity::of(key) == arity)
            .map(|(_, &count)| count)
    }

    /// Number of distinct n-grams of the given arity.
    pub fn distinct(&self, arity: Arity) -> usize {
        self.counts_of(arity).count()
    }

    /// Iterate over all stored n-grams and their counts.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(key, &count)| (key.as_str(), count))
    }

    /// Number of distinct n-grams of any arity.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether the table holds no n-grams.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
