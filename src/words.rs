use crate::api::{ApiError, WordBackend};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

pub type WordId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word
{
    pub id: WordId,
    pub english: String,
    pub meaning: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewWord
{
    pub english: String,
    pub meaning: String,
}

impl NewWord
{
    /// Both fields are required; surrounding whitespace is dropped.
    pub fn new(english: &str, meaning: &str) -> Result<Self, String>
    {
        let english = english.trim();
        let meaning = meaning.trim();
        if english.is_empty() {
            return Err("English word is required".to_string());
        }
        if meaning.is_empty() {
            return Err("Meaning is required".to_string());
        }
        Ok(Self {
            english: english.to_string(),
            meaning: meaning.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState
{
    Pending,
    Loaded,
    Failed,
    /// The backend rejected the access token.
    Unauthorized,
}

/// The user's word list as last fetched from the backend, with local edits
/// mirrored on top.
pub struct WordSource
{
    words: Vec<Word>,
    state: FetchState,
}

impl WordSource
{
    pub fn new() -> Self
    {
        Self {
            words: Vec::new(),
            state: FetchState::Pending,
        }
    }

    /// Replaces the collection with the backend's list. On failure the
    /// collection is left empty and the error is only logged. Entries with an
    /// empty English form can never be typed and are dropped.
    pub fn load(&mut self, backend: &dyn WordBackend) -> FetchState
    {
        match backend.list_words() {
            Ok(mut words) => {
                let before = words.len();
                words.retain(|word| !word.english.is_empty());
                if words.len() != before {
                    warn!(skipped = before - words.len(), "ignoring words without an English form");
                }
                info!(count = words.len(), "word list loaded");
                self.words = words;
                self.state = FetchState::Loaded;
            }
            Err(ApiError::Unauthorized) => {
                warn!("word list request was not authorized");
                self.words.clear();
                self.state = FetchState::Unauthorized;
            }
            Err(err) => {
                error!(error = %err, "failed to fetch words");
                self.words.clear();
                self.state = FetchState::Failed;
            }
        }
        self.state
    }

    pub fn state(&self) -> FetchState
    {
        self.state
    }

    pub fn words(&self) -> &[Word]
    {
        &self.words
    }

    pub fn len(&self) -> usize
    {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.words.is_empty()
    }

    pub fn contains(&self, id: WordId) -> bool
    {
        self.words.iter().any(|word| word.id == id)
    }

    /// Uniform choice over the current collection.
    pub fn pick_random(&self, rng: &mut impl Rng) -> Option<&Word>
    {
        self.words.choose(rng)
    }

    pub fn push(&mut self, word: Word)
    {
        self.words.push(word);
    }

    /// Drops the word locally; returns whether it was present.
    pub fn remove(&mut self, id: WordId) -> bool
    {
        let before = self.words.len();
        self.words.retain(|word| word.id != id);
        before != self.words.len()
    }
}

impl Default for WordSource
{
    fn default() -> Self
    {
        Self::new()
    }
}


#[cfg(test)]
mod tests
{
    use super::testing::{FakeBackend, word};
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn sample() -> Vec<Word>
    {
        vec![
            word(1, "apple", "사과"),
            word(2, "river", "강"),
            word(3, "window", "창문"),
        ]
    }

    #[test]
    fn load_replaces_collection()
    {
        let backend = FakeBackend::with_words(sample());
        let mut source = WordSource::new();
        assert_eq!(source.state(), FetchState::Pending);
        assert_eq!(source.load(&backend), FetchState::Loaded);
        assert_eq!(source.len(), 3);
    }

    #[test]
    fn failed_load_leaves_collection_empty()
    {
        let mut source = WordSource::new();
        source.push(word(9, "stale", "오래된"));
        assert_eq!(source.load(&FakeBackend::failing()), FetchState::Failed);
        assert!(source.is_empty());
    }

    #[test]
    fn pick_random_on_empty_is_none()
    {
        let source = WordSource::new();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(source.pick_random(&mut rng).is_none());
    }

    #[test]
    fn pick_random_stays_inside_collection_and_covers_it()
    {
        let mut source = WordSource::new();
        source.load(&FakeBackend::with_words(sample()));
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let picked = source.pick_random(&mut rng).unwrap();
            assert!(source.contains(picked.id));
            seen.insert(picked.id);
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn removed_word_is_never_picked()
    {
        let mut source = WordSource::new();
        source.load(&FakeBackend::with_words(sample()));
        assert!(source.remove(2));
        assert!(!source.remove(2));
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            assert_ne!(source.pick_random(&mut rng).unwrap().id, 2);
        }
    }

    #[test]
    fn rejected_token_is_reported_separately_from_outage()
    {
        let mut source = WordSource::new();
        assert_eq!(source.load(&FakeBackend::expired()), FetchState::Unauthorized);
        assert!(source.is_empty());
    }

    #[test]
    fn words_without_english_form_are_skipped()
    {
        let backend = FakeBackend::with_words(vec![word(1, "", "빈"), word(2, "tree", "나무")]);
        let mut source = WordSource::new();
        source.load(&backend);
        assert_eq!(source.len(), 1);
        assert!(!source.contains(1));
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            assert_eq!(source.pick_random(&mut rng).unwrap().id, 2);
        }
    }

    #[test]
    fn new_word_requires_both_fields()
    {
        assert!(NewWord::new("  ", "뜻").is_err());
        assert!(NewWord::new("apple", "").is_err());
        let ok = NewWord::new(" apple ", " 사과 ").unwrap();
        assert_eq!(ok.english, "apple");
        assert_eq!(ok.meaning, "사과");
    }

    #[test]
    fn word_json_uses_backend_field_names()
    {
        let parsed: Vec<Word> =
            serde_json::from_str(r#"[{"id":5,"english":"tree","meaning":"나무"}]"#).unwrap();
        assert_eq!(parsed, vec![word(5, "tree", "나무")]);
    }
}
