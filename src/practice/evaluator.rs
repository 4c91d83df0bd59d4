/// A keystroke as the evaluator sees it. Anything that is not a single
/// printable character or backspace arrives as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key
{
    Char(char),
    Backspace,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase
{
    Idle,
    Typing,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome
{
    Ignored,
    Updated,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphState
{
    Matched,
    Mismatched,
    Current,
    Pending,
}

/// Tracks what has been typed against one target word.
pub struct Evaluator
{
    target: Vec<char>,
    buffer: Vec<char>,
    phase: Phase,
}

impl Evaluator
{
    pub fn new() -> Self
    {
        Self {
            target: Vec::new(),
            buffer: Vec::new(),
            phase: Phase::Idle,
        }
    }

    pub fn arm(&mut self, target: &str)
    {
        self.target = target.chars().collect();
        self.buffer.clear();
        self.phase = Phase::Typing;
    }

    pub fn disarm(&mut self)
    {
        self.target.clear();
        self.buffer.clear();
        self.phase = Phase::Idle;
    }

    pub fn phase(&self) -> Phase
    {
        self.phase
    }

    pub fn typed(&self) -> String
    {
        self.buffer.iter().collect()
    }

    pub fn expected_char(&self) -> Option<char>
    {
        if self.phase != Phase::Typing {
            return None;
        }
        self.target.get(self.buffer.len()).copied()
    }

    pub fn press(&mut self, key: Key) -> Outcome
    {
        if self.phase != Phase::Typing {
            return Outcome::Ignored;
        }

        match key {
            Key::Backspace => {
                if self.buffer.pop().is_none() {
                    return Outcome::Ignored;
                }
            }
            Key::Char(ch) => {
                // A keystroke that matches ignoring case takes the target's casing.
                let pushed = match self.target.get(self.buffer.len()) {
                    Some(&expected) if chars_match(expected, ch) => expected,
                    _ => ch,
                };
                self.buffer.push(pushed);
            }
            Key::Other => return Outcome::Ignored,
        }

        if self.is_match() {
            self.phase = Phase::Complete;
            Outcome::Completed
        } else {
            Outcome::Updated
        }
    }

    fn is_match(&self) -> bool
    {
        self.buffer.len() == self.target.len()
            && self
                .buffer
                .iter()
                .zip(&self.target)
                .all(|(&typed, &expected)| chars_match(expected, typed))
    }

    /// Per-position state of the target word for the current buffer.
    pub fn glyphs(&self) -> Vec<(char, GlyphState)>
    {
        let cursor = self.buffer.len();
        self.target
            .iter()
            .enumerate()
            .map(|(index, &expected)| {
                let state = match self.buffer.get(index) {
                    Some(&typed) if chars_match(expected, typed) => GlyphState::Matched,
                    Some(_) => GlyphState::Mismatched,
                    None if index == cursor => GlyphState::Current,
                    None => GlyphState::Pending,
                };
                (expected, state)
            })
            .collect()
    }
}

impl Default for Evaluator
{
    fn default() -> Self
    {
        Self::new()
    }
}

fn chars_match(a: char, b: char) -> bool
{
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn type_str(evaluator: &mut Evaluator, text: &str) -> Vec<Outcome>
    {
        text.chars().map(|ch| evaluator.press(Key::Char(ch))).collect()
    }

    #[test]
    fn starts_idle_and_ignores_keys()
    {
        let mut evaluator = Evaluator::new();
        assert_eq!(evaluator.phase(), Phase::Idle);
        assert_eq!(evaluator.press(Key::Char('a')), Outcome::Ignored);
        assert_eq!(evaluator.typed(), "");
    }

    #[test]
    fn exact_typing_completes_in_any_case()
    {
        for attempt in ["apple", "APPLE", "aPpLe", "Apple"] {
            let mut evaluator = Evaluator::new();
            evaluator.arm("Apple");
            let outcomes = type_str(&mut evaluator, attempt);
            assert_eq!(outcomes.last(), Some(&Outcome::Completed), "typed {attempt}");
            assert_eq!(
                outcomes.iter().filter(|o| **o == Outcome::Completed).count(),
                1
            );
            assert_eq!(evaluator.phase(), Phase::Complete);
        }
    }

    #[test]
    fn ligature_and_sharp_s_words_complete()
    {
        for target in ["ﬁne", "straße"] {
            let mut evaluator = Evaluator::new();
            evaluator.arm(target);
            let outcomes = type_str(&mut evaluator, target);
            assert_eq!(outcomes.last(), Some(&Outcome::Completed), "typed {target}");
        }
    }

    #[test]
    fn correct_keystrokes_take_target_casing()
    {
        let mut evaluator = Evaluator::new();
        evaluator.arm("Apple");
        type_str(&mut evaluator, "ap");
        assert_eq!(evaluator.typed(), "Ap");
    }

    #[test]
    fn wrong_key_is_stored_verbatim()
    {
        let mut evaluator = Evaluator::new();
        evaluator.arm("Apple");
        let outcomes = type_str(&mut evaluator, "apX");
        assert_eq!(outcomes, vec![Outcome::Updated; 3]);
        assert_eq!(evaluator.typed().chars().nth(2), Some('X'));
        assert_eq!(evaluator.phase(), Phase::Typing);
        assert_eq!(evaluator.glyphs()[2], ('p', GlyphState::Mismatched));
    }

    #[test]
    fn correcting_a_mistake_still_completes()
    {
        let mut evaluator = Evaluator::new();
        evaluator.arm("Apple");
        type_str(&mut evaluator, "apX");
        assert_eq!(evaluator.press(Key::Backspace), Outcome::Updated);
        let outcomes = type_str(&mut evaluator, "ple");
        assert_eq!(outcomes.last(), Some(&Outcome::Completed));
    }

    #[test]
    fn buffer_may_grow_past_target()
    {
        let mut evaluator = Evaluator::new();
        evaluator.arm("ox");
        type_str(&mut evaluator, "oqxx");
        assert_eq!(evaluator.typed(), "oqxx");
        assert_eq!(evaluator.phase(), Phase::Typing);
        assert_eq!(evaluator.expected_char(), None);
    }

    #[test]
    fn backspace_on_empty_buffer_is_noop()
    {
        let mut evaluator = Evaluator::new();
        evaluator.arm("tree");
        assert_eq!(evaluator.press(Key::Backspace), Outcome::Ignored);
        assert_eq!(evaluator.typed(), "");
        assert_eq!(evaluator.phase(), Phase::Typing);
    }

    #[test]
    fn other_keys_are_ignored()
    {
        let mut evaluator = Evaluator::new();
        evaluator.arm("tree");
        assert_eq!(evaluator.press(Key::Other), Outcome::Ignored);
        assert_eq!(evaluator.typed(), "");
    }

    #[test]
    fn keys_after_completion_are_ignored()
    {
        let mut evaluator = Evaluator::new();
        evaluator.arm("go");
        type_str(&mut evaluator, "go");
        assert_eq!(evaluator.press(Key::Char('o')), Outcome::Ignored);
        assert_eq!(evaluator.press(Key::Backspace), Outcome::Ignored);
        assert_eq!(evaluator.typed(), "go");
    }

    #[test]
    fn glyphs_follow_cursor_after_every_mutation()
    {
        let mut evaluator = Evaluator::new();
        evaluator.arm("cat");
        assert_eq!(
            evaluator.glyphs(),
            vec![
                ('c', GlyphState::Current),
                ('a', GlyphState::Pending),
                ('t', GlyphState::Pending),
            ]
        );

        evaluator.press(Key::Char('c'));
        evaluator.press(Key::Char('o'));
        assert_eq!(
            evaluator.glyphs(),
            vec![
                ('c', GlyphState::Matched),
                ('a', GlyphState::Mismatched),
                ('t', GlyphState::Current),
            ]
        );
        assert_eq!(evaluator.expected_char(), Some('t'));

        evaluator.press(Key::Backspace);
        assert_eq!(evaluator.glyphs()[1], ('a', GlyphState::Current));
        assert_eq!(evaluator.glyphs()[2], ('t', GlyphState::Pending));
    }

    #[test]
    fn arm_resets_buffer()
    {
        let mut evaluator = Evaluator::new();
        evaluator.arm("sun");
        type_str(&mut evaluator, "su");
        evaluator.arm("moon");
        assert_eq!(evaluator.typed(), "");
        assert_eq!(evaluator.phase(), Phase::Typing);
        evaluator.disarm();
        assert_eq!(evaluator.phase(), Phase::Idle);
        assert!(evaluator.glyphs().is_empty());
    }
}
