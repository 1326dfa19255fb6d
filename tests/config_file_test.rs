//! Loading configuration and phrase corpora from disk.

use std::io::Write;
use strictly_fortune::{CorpusError, GameConfig, IgnoredChars, PhraseSource};
use tempfile::NamedTempFile;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

#[test]
fn config_file_overrides_defaults() {
    let file = write_temp(
        r#"
round_cap = 5
phrase_bonus = 250
prize_denominations = [10, 20]
min_players = 3

[pacing]
intermission_ms = 0
"#,
    );

    let config = GameConfig::from_file(file.path()).unwrap();

    assert_eq!(*config.round_cap(), 5);
    assert_eq!(*config.phrase_bonus(), 250);
    assert_eq!(config.prize_denominations(), &vec![10, 20]);
    assert_eq!(*config.min_players(), 3);
    assert_eq!(*config.max_players(), 8);
    assert_eq!(*config.pacing().intermission_ms(), 0);
    assert_eq!(*config.pacing().suspense_ms(), 1200);
    assert_eq!(config.wheel().unwrap().denominations(), &[10, 20]);
}

#[test]
fn missing_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = GameConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(err.message.starts_with("Failed to read config file"));
}

#[test]
fn malformed_config_is_an_error() {
    let file = write_temp("round_cap = \"many\"");
    let err = GameConfig::from_file(file.path()).unwrap_err();
    assert!(err.message.starts_with("Failed to parse config"));
}

#[test]
fn configured_corpus_is_loaded_with_categories() {
    let corpus = write_temp(
        "# animals and places\n\
         Animal | Cat\n\
         \n\
         Place | Rock-a-bye Bay\n\
         No category here\n",
    );
    let config = GameConfig::default().with_phrases_path(corpus.path());

    let phrases = config.load_phrases().unwrap();

    assert_eq!(phrases.len(), 3);
    let cat = &phrases.phrases()[0];
    assert_eq!(cat.text(), "Cat");
    assert_eq!(cat.category(), Some("Animal"));
    assert_eq!(phrases.phrases()[1].scoreable_len(), 11);
    assert_eq!(phrases.phrases()[2].category(), None);
}

#[test]
fn corpus_with_unguessable_character_reports_line() {
    let corpus = write_temp("Animal | Cat\nMath | 2 + 2\n");
    let err = PhraseSource::from_file(corpus.path(), &IgnoredChars::default()).unwrap_err();
    assert_eq!(
        err,
        CorpusError::Unguessable {
            line: 2,
            text: "2 + 2".into(),
            character: '2',
        }
    );
}

#[test]
fn missing_corpus_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = GameConfig::default().with_phrases_path(dir.path().join("phrases.txt"));
    assert!(matches!(config.load_phrases(), Err(CorpusError::Io { .. })));
}

#[test]
fn builtin_corpus_loads_without_a_path() {
    let phrases = GameConfig::default().load_phrases().unwrap();
    assert!(!phrases.is_empty());
    assert!(phrases.phrases().iter().all(|p| p.category().is_some()));
}
