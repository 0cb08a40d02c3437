use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::{Builder, TempDir};

use spellgram::config::SpellgramConfig;
use spellgram::corpus::ConfusionMatrix;
use spellgram::error::SpellgramError;
use spellgram::model::{LanguageModel, SmoothingConfig};
use spellgram::spelling::{EditCandidateGenerator, SentenceCorrector};

const COUNTS: &str = "\
6 <s>
6 </s>
8 the
3 cat
2 sat
2 on
1 mat
1 hat
1 dog
1 ran
1 a
5 <s> the
3 the cat
2 cat sat
2 sat </s>
1 the mat
1 sat on
1 on the
1 mat </s>
1 the dog
1 dog ran
1 ran </s>
1 <s> a
1 a cat
";

const VOCABULARY: &str = "<s>\n</s>\nthe\ncat\nsat\non\nmat\nhat\ndog\nran\na\n";

const CONFUSION: &str = "\
d|c 5
d|m 5
d|h 5
eh|he 50
ta|at 40
q|a 30
";

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn fixture() -> (TempDir, SentenceCorrector) {
    let dir = Builder::new().prefix("test_correction").tempdir().unwrap();
    let counts = write(dir.path(), "counts.txt", COUNTS);
    let vocabulary = write(dir.path(), "vocabulary.txt", VOCABULARY);
    let confusion = write(dir.path(), "confusion.txt", CONFUSION);

    let config = SpellgramConfig::default();
    let model = Arc::new(
        LanguageModel::load(&counts, &vocabulary, config.smoothing.clone()).unwrap(),
    );
    let confusion = Arc::new(ConfusionMatrix::load_from_file(&confusion).unwrap());
    let corrector = config.build_corrector(model, confusion).unwrap();

    (dir, corrector)
}

#[test]
fn test_known_sentence_kept() {
    let (_dir, corrector) = fixture();

    let result = corrector.correct("the cat sat").unwrap();
    assert_eq!(result.corrected, "the cat sat");
    assert_eq!(result.corrections, 0);
    assert!(result.log_probability.is_some());
    assert!(!result.is_changed());
}

#[test]
fn test_known_sentence_kept_with_dense_confusion() {
    let (_dir, corrector) = fixture();

    // Every single-letter substitution has been observed at least once.
    let mut confusion = ConfusionMatrix::new();
    let alphabet = "abcdefghijklmnopqrstuvwxyz";
    for (i, observed) in alphabet.chars().enumerate() {
        for (j, intended) in alphabet.chars().enumerate() {
            if i != j {
                let count = 1 + ((i * j) % 20) as u32;
                confusion.insert(&observed.to_string(), &intended.to_string(), count);
            }
        }
    }
    let corrector = SentenceCorrector::new(Arc::clone(corrector.model()), Arc::new(confusion));

    assert!(corrector.generator().candidates("cat").unwrap()["hat"].weight >= 1.0);
    let result = corrector.correct("the cat sat").unwrap();
    assert_eq!(result.corrected, "the cat sat");
    assert_eq!(result.corrections, 0);
}

#[test]
fn test_long_phrase_on_spawned_thread() {
    let (_dir, corrector) = fixture();
    let corrector = Arc::new(corrector);
    let phrase = vec!["the cat sat"; 2_000].join(" ");

    let result = {
        let corrector = Arc::clone(&corrector);
        let phrase = phrase.clone();
        std::thread::spawn(move || corrector.correct(&phrase).unwrap())
            .join()
            .unwrap()
    };

    assert_eq!(result.corrected, phrase);
    assert_eq!(result.corrections, 0);
}

#[test]
fn test_context_picks_candidate() {
    let (_dir, corrector) = fixture();

    // "cat", "mat" and "hat" share the same channel weight; the bigrams
    // around them decide.
    let candidates = corrector.generator().candidates("dat").unwrap();
    for word in ["cat", "mat", "hat"] {
        assert_eq!(candidates[word].weight, 5.0);
    }

    let result = corrector.correct("the dat sat").unwrap();
    assert_eq!(result.corrected, "the cat sat");
    assert_eq!(result.corrections, 1);
}

#[test]
fn test_two_corrections() {
    let (_dir, corrector) = fixture();

    let result = corrector.correct("teh cta sat").unwrap();
    assert_eq!(result.corrected, "the cat sat");
    assert_eq!(result.corrections, 2);
}

#[test]
fn test_correction_budget_respected() {
    let (_dir, corrector) = fixture();
    let model = Arc::clone(corrector.model());

    // Each word is one edit away from "the cat sat" but only two may change.
    let phrase = "teh cta sqt";
    let result = corrector.correct(phrase).unwrap();

    let changed = result
        .corrected
        .split(' ')
        .zip(phrase.split(' '))
        .filter(|(corrected, original)| corrected != original)
        .count();
    assert!(changed <= 2);
    assert!(
        result
            .corrected
            .split(' ')
            .any(|word| !model.in_vocabulary(word))
    );
    assert_eq!(result.log_probability, None);
}

#[test]
fn test_unknown_sentence_returned_unchanged() {
    let (_dir, corrector) = fixture();

    let result = corrector.correct("zzz qqq").unwrap();
    assert_eq!(result.corrected, "zzz qqq");
    assert_eq!(result.corrections, 0);
}

#[test]
fn test_batch_correction() {
    let (_dir, corrector) = fixture();

    let results = corrector.correct_phrases(&["the dat sat", "teh cta sat", "  "]);
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().corrected, "the cat sat");
    assert_eq!(results[1].as_ref().unwrap().corrected, "the cat sat");
    assert!(matches!(
        results[2],
        Err(SpellgramError::InvalidArgument(_))
    ));
}

#[test]
fn test_shared_corrector_across_threads() {
    let (_dir, corrector) = fixture();
    let corrector = Arc::new(corrector);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let corrector = Arc::clone(&corrector);
            std::thread::spawn(move || corrector.correct_phrase("teh cta sat").unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), "the cat sat");
    }
}

#[test]
fn test_raw_edit_count() {
    let (_dir, corrector) = fixture();

    // 5 insertion points, 4 deletions, 3 transpositions and 4 substitution
    // points over a 27-symbol alphabet.
    let edits = corrector.generator().edits("word");
    assert_eq!(edits.len(), 5 * 27 + 4 + 3 + 4 * 27);
}

#[test]
fn test_generator_without_confusion_keeps_known_words() {
    let (_dir, corrector) = fixture();
    let generator = EditCandidateGenerator::new(
        Arc::clone(corrector.model()),
        Arc::new(ConfusionMatrix::new()),
    );

    let candidates = generator.candidates("cat").unwrap();
    assert!(candidates["cat"].is_identity());
    assert!(
        candidates
            .values()
            .filter(|candidate| !candidate.is_identity())
            .all(|candidate| candidate.weight == 0.0)
    );
}

#[test]
fn test_undivided_unseen_bigrams() {
    let dir = Builder::new().prefix("test_unseen").tempdir().unwrap();
    let counts = write(dir.path(), "counts.txt", COUNTS);
    let vocabulary = write(dir.path(), "vocabulary.txt", VOCABULARY);

    let shared = LanguageModel::load(&counts, &vocabulary, SmoothingConfig::default()).unwrap();
    let undivided = LanguageModel::load(
        &counts,
        &vocabulary,
        SmoothingConfig {
            unseen_bigram_fraction: None,
        },
    )
    .unwrap();

    // N1 = 9 bigrams seen once, 121 - 13 pairs never seen.
    assert!((shared.bigram_smoothing().unseen_count() - 9.0 / 108.0).abs() < 1e-12);
    assert_eq!(undivided.bigram_smoothing().unseen_count(), 9.0);
    assert!(
        shared.conditional_probability("hat", "the") < undivided.conditional_probability("hat", "the")
    );
}
