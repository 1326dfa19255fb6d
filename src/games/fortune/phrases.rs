//! Phrase corpus and normalization.
//!
//! A corpus file holds one phrase per line. Blank lines and lines starting
//! with `#` are skipped; a line of the form `category | text` attaches a
//! category that is announced when the round starts.

use super::rng::GameRng;
use super::types::{IgnoredChars, fold};
use derive_more::{Display, Error};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Phrases used when no corpus file is configured.
pub const DEFAULT_CORPUS: &str = "\
# category | phrase
Phrase | A penny for your thoughts
Phrase | Break a leg
Phrase | Once in a blue moon
Phrase | The early bird catches the worm
Place | Grand Canyon
Place | Rocky Mountains
Thing | Rubber duck
Thing | Grandfather clock
Person | Sherlock Holmes
Event | Surprise birthday party
";

/// Errors raised while loading a corpus.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum CorpusError {
    /// The corpus contains no phrases.
    #[display("Phrase corpus is empty")]
    Empty,

    /// A phrase has no letters to guess.
    #[display("Phrase on line {} has no letters: {:?}", line, text)]
    NoLetters {
        /// 1-based source line.
        line: usize,
        /// Offending phrase.
        text: String,
    },

    /// A phrase contains a character that can neither be guessed nor is ignored.
    #[display("Phrase on line {} contains unguessable character {:?}: {:?}", line, character, text)]
    Unguessable {
        /// 1-based source line.
        line: usize,
        /// Offending phrase.
        text: String,
        /// The character that could never be revealed.
        character: char,
    },

    /// The corpus file could not be read.
    #[display("Failed to read phrase file: {}", message)]
    Io {
        /// Underlying I/O error message.
        message: String,
    },
}

/// A phrase selected for a round. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrase {
    text: Arc<str>,
    normalized: Arc<[char]>,
    category: Option<Arc<str>>,
    scoreable_len: usize,
}

impl Phrase {
    /// Builds a phrase, deriving its normalized form and scoreable length.
    pub fn new(text: &str, category: Option<&str>, ignored: &IgnoredChars) -> Self {
        let normalized: Arc<[char]> = text.chars().map(fold).collect();
        let scoreable_len = normalized.iter().filter(|c| !ignored.contains(**c)).count();
        Self {
            text: text.into(),
            normalized,
            category: category.map(Arc::from),
            scoreable_len,
        }
    }

    /// Original text as written in the corpus.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Case-folded characters, aligned one-to-one with [`Phrase::text`].
    pub fn normalized(&self) -> &[char] {
        &self.normalized
    }

    /// Optional category announced with the round.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Number of characters that must be revealed by letter guesses.
    pub fn scoreable_len(&self) -> usize {
        self.scoreable_len
    }

    /// Counts occurrences of an already case-folded character.
    pub fn occurrences(&self, c: char) -> usize {
        self.normalized.iter().filter(|n| **n == c).count()
    }
}

/// The loaded corpus of candidate phrases.
#[derive(Debug, Clone)]
pub struct PhraseSource {
    phrases: Vec<Phrase>,
}

impl PhraseSource {
    /// Builds a corpus from `(category, text)` entries.
    ///
    /// Every phrase must contain at least one letter, and every other
    /// character must be in the ignored set.
    pub fn new<'a>(
        entries: impl IntoIterator<Item = (Option<&'a str>, &'a str)>,
        ignored: &IgnoredChars,
    ) -> Result<Self, CorpusError> {
        let numbered = entries
            .into_iter()
            .enumerate()
            .map(|(idx, (category, text))| (idx + 1, category, text));
        Self::build(numbered, ignored)
    }

    /// Parses corpus text (see the module docs for the format).
    #[instrument(skip_all)]
    pub fn parse(source: &str, ignored: &IgnoredChars) -> Result<Self, CorpusError> {
        let entries = source.lines().enumerate().filter_map(|(idx, line)| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            Some(match line.split_once('|') {
                Some((category, text)) => (idx + 1, Some(category.trim()), text.trim()),
                None => (idx + 1, None, line),
            })
        });
        Self::build(entries, ignored)
    }

    /// Loads and parses a corpus file.
    #[instrument(skip(ignored), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>, ignored: &IgnoredChars) -> Result<Self, CorpusError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| CorpusError::Io {
                message: e.to_string(),
            })?;
        let source = Self::parse(&content, ignored)?;
        info!(phrases = source.len(), "Phrase corpus loaded");
        Ok(source)
    }

    /// The built-in corpus.
    pub fn builtin(ignored: &IgnoredChars) -> Result<Self, CorpusError> {
        Self::parse(DEFAULT_CORPUS, ignored)
    }

    fn build<'a>(
        entries: impl Iterator<Item = (usize, Option<&'a str>, &'a str)>,
        ignored: &IgnoredChars,
    ) -> Result<Self, CorpusError> {
        let mut phrases = Vec::new();
        for (line, category, text) in entries {
            if let Some(character) = text
                .chars()
                .find(|c| !c.is_alphabetic() && !ignored.contains(*c))
            {
                return Err(CorpusError::Unguessable {
                    line,
                    text: text.to_string(),
                    character,
                });
            }
            if !text.chars().any(char::is_alphabetic) {
                return Err(CorpusError::NoLetters {
                    line,
                    text: text.to_string(),
                });
            }
            phrases.push(Phrase::new(text, category.filter(|c| !c.is_empty()), ignored));
        }

        if phrases.is_empty() {
            return Err(CorpusError::Empty);
        }
        Ok(Self { phrases })
    }

    /// Number of phrases in the corpus.
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// Always false; an empty corpus cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// All phrases, in corpus order.
    pub fn phrases(&self) -> &[Phrase] {
        &self.phrases
    }

    /// Draws a phrase uniformly at random.
    #[instrument(skip_all)]
    pub fn draw(&self, rng: &mut GameRng) -> Phrase {
        let phrase = self.phrases[rng.index(self.phrases.len())].clone();
        debug!(category = ?phrase.category(), len = phrase.scoreable_len(), "Phrase drawn");
        phrase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoreable_length_skips_ignored_characters() {
        let phrase = Phrase::new("Rock 'n' Roll", None, &IgnoredChars::default());
        assert_eq!(phrase.scoreable_len(), 9);
        assert_eq!(phrase.occurrences('r'), 2);
        assert_eq!(phrase.occurrences('o'), 2);
    }

    #[test]
    fn parse_reads_categories_and_skips_comments() {
        let corpus = PhraseSource::parse(
            "# heading\n\nPlace | Grand Canyon\nBreak a leg\n",
            &IgnoredChars::default(),
        )
        .unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.phrases()[0].category(), Some("Place"));
        assert_eq!(corpus.phrases()[0].text(), "Grand Canyon");
        assert_eq!(corpus.phrases()[1].category(), None);
    }

    #[test]
    fn empty_corpus_rejected() {
        let err = PhraseSource::parse("# nothing\n", &IgnoredChars::default()).unwrap_err();
        assert_eq!(err, CorpusError::Empty);
    }

    #[test]
    fn unguessable_character_rejected_with_line() {
        let err = PhraseSource::parse("fine\nwhat?\n", &IgnoredChars::default()).unwrap_err();
        assert_eq!(
            err,
            CorpusError::Unguessable {
                line: 2,
                text: "what?".to_string(),
                character: '?',
            }
        );
    }

    #[test]
    fn punctuation_only_phrase_rejected() {
        let err = PhraseSource::new([(None, "- -")], &IgnoredChars::default()).unwrap_err();
        assert!(matches!(err, CorpusError::NoLetters { line: 1, .. }));
    }

    #[test]
    fn builtin_corpus_is_valid() {
        let corpus = PhraseSource::builtin(&IgnoredChars::default()).unwrap();
        assert!(corpus.len() >= 10);
    }

    #[test]
    fn draw_returns_corpus_member() {
        let corpus = PhraseSource::builtin(&IgnoredChars::default()).unwrap();
        let mut rng = GameRng::new(3);
        for _ in 0..50 {
            let phrase = corpus.draw(&mut rng);
            assert!(corpus.phrases().contains(&phrase));
        }
    }
}
