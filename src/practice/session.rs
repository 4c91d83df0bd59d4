use crate::api::WordBackend;
use crate::practice::evaluator::{Evaluator, Key, Outcome};
use crate::practice::timer::AdvanceTimer;
use crate::words::{FetchState, Word, WordSource};
use rand::Rng;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub const ADVANCE_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState
{
    /// Fetch succeeded but the list has no words.
    Empty,
    /// Fetch failed; the list is empty.
    Failed,
    /// The backend rejected the stored access token.
    Unauthorized,
    Active,
}

/// State of one visit to the practice view.
pub struct PracticeSession
{
    source: WordSource,
    active: Option<Word>,
    evaluator: Evaluator,
    completed: u32,
    advance: Option<AdvanceTimer>,
    closed: bool,
}

impl PracticeSession
{
    pub fn new() -> Self
    {
        Self {
            source: WordSource::new(),
            active: None,
            evaluator: Evaluator::new(),
            completed: 0,
            advance: None,
            closed: false,
        }
    }

    /// Fetches the word list and arms the first word if there is one.
    pub fn start(&mut self, backend: &dyn WordBackend, rng: &mut impl Rng) -> SessionState
    {
        self.source.load(backend);
        self.select_next(rng);
        self.state()
    }

    pub fn state(&self) -> SessionState
    {
        match (self.source.state(), &self.active) {
            (_, Some(_)) => SessionState::Active,
            (FetchState::Failed, None) => SessionState::Failed,
            (FetchState::Unauthorized, None) => SessionState::Unauthorized,
            _ => SessionState::Empty,
        }
    }

    pub fn active_word(&self) -> Option<&Word>
    {
        self.active.as_ref()
    }

    pub fn evaluator(&self) -> &Evaluator
    {
        &self.evaluator
    }

    pub fn completed(&self) -> u32
    {
        self.completed
    }

    pub fn words(&self) -> &WordSource
    {
        &self.source
    }

    pub fn advance_pending(&self) -> bool
    {
        self.advance.as_ref().is_some_and(AdvanceTimer::is_active)
    }

    pub fn handle_key(&mut self, key: Key, now: Instant) -> Outcome
    {
        if self.closed || self.active.is_none() {
            return Outcome::Ignored;
        }

        let outcome = self.evaluator.press(key);
        if outcome == Outcome::Completed {
            self.completed += 1;
            info!(completed = self.completed, "word completed");
            let timer = AdvanceTimer::start(now, ADVANCE_DELAY);
            if let Some(mut previous) = self.advance.replace(timer) {
                previous.cancel();
            }
        }
        outcome
    }

    /// Picks the next word once the advance delay has elapsed. Returns true
    /// when a new word was selected.
    pub fn tick(&mut self, now: Instant, rng: &mut impl Rng) -> bool
    {
        if self.closed {
            return false;
        }
        let fired = self
            .advance
            .as_mut()
            .is_some_and(|timer| timer.fire_if_due(now));
        if !fired {
            return false;
        }
        self.advance = None;
        self.select_next(rng)
    }

    /// Cancels the pending advance; the session accepts no further changes.
    pub fn shutdown(&mut self)
    {
        if let Some(timer) = self.advance.as_mut() {
            timer.cancel();
        }
        self.advance = None;
        self.closed = true;
        debug!(completed = self.completed, "practice session closed");
    }

    fn select_next(&mut self, rng: &mut impl Rng) -> bool
    {
        if let Some(timer) = self.advance.as_mut() {
            timer.cancel();
        }
        self.advance = None;

        if self.source.is_empty() {
            self.active = None;
            self.evaluator.disarm();
            return false;
        }

        let Some(word) = self.source.pick_random(rng).cloned() else {
            return false;
        };
        debug_assert!(self.source.contains(word.id));
        debug!(id = word.id, "next word selected");
        self.evaluator.arm(&word.english);
        self.active = Some(word);
        true
    }
}

impl Default for PracticeSession
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl Drop for PracticeSession
{
    fn drop(&mut self)
    {
        if !self.closed {
            self.shutdown();
        }
    }
}
