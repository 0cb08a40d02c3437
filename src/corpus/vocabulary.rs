//! Set of valid words.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ahash::AHashSet;
use log::info;

use crate::error::Result;

/// The words a correction may produce.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: AHashSet<String>,
}

impl Vocabulary {
    /// Create a new empty vocabulary.
    pub fn new() -> Self {
        Vocabulary::default()
    }

    /// Add a word. Surrounding whitespace is trimmed and blank words ignored.
    pub fn insert(&mut self, word: &str) {
        let word = word.trim();
        if !word.is_empty() {
            self.words.insert(word.to_string());
        }
    }

    /// Read one word per line.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut vocabulary = Vocabulary::new();
        for line in reader.lines() {
            vocabulary.insert(&line?);
        }
        Ok(vocabulary)
    }

    /// Load a word list from disk.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let vocabulary = Self::from_reader(BufReader::new(File::open(path)?))?;
        info!("Loaded {} words from {}", vocabulary.len(), path.display());
        Ok(vocabulary)
    }

    /// Check whether a word is valid.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// The subset of `words` that are in the vocabulary.
    pub fn intersection<'a, I>(&self, words: I) -> HashSet<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        words
            .into_iter()
            .filter(|word| self.contains(word))
            .map(str::to_string)
            .collect()
    }

    /// Iterate over all words.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut vocabulary = Vocabulary::new();
        for word in iter {
            vocabulary.insert(word.as_ref());
        }
        vocabulary
    }
}
