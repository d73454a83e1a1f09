//! The hero-tagline typewriter: types a phrase character by character,
//! holds it, deletes it, and moves on to the next phrase, forever.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use vitrine_protocol::SharedStr;

/// Whether the engine is currently adding or removing characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Typing,
    Deleting,
}

/// Tick periods in milliseconds. All four must be non-zero.
///
/// `hold_ms` is the pause with the full phrase on screen before deletion
/// starts; `rest_ms` is the pause on the empty string before the next
/// phrase starts typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TypewriterTiming {
    pub type_ms: u64,
    pub delete_ms: u64,
    pub hold_ms: u64,
    pub rest_ms: u64,
}

impl Default for TypewriterTiming {
    fn default() -> Self {
        Self {
            type_ms: 100,
            delete_ms: 50,
            hold_ms: 2000,
            rest_ms: 500,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypewriterError {
    #[error("phrase list is empty")]
    EmptyPhrases,
    #[error("typewriter tick periods must be non-zero")]
    ZeroTiming,
}

/// The result of one tick: what the target element should now show, and
/// how long to wait before the next tick.
///
/// The delay varies with state; the variable period is what makes the
/// effect read as typing rather than a metronome.
#[derive(Debug, Clone)]
pub struct Step {
    pub text: SharedStr,
    pub delay: Duration,
}

/// Cycles through a fixed phrase list, one character mutation per tick.
///
/// The engine is pull-based: it has no timer and no sink of its own.
/// Call [`advance`](Typewriter::advance) when the previous step's delay
/// has elapsed (the [`Stage`](crate::stage::Stage) driver does this) and
/// hand the returned text to whatever displays it.
#[derive(Debug, Clone)]
pub struct Typewriter {
    phrases: Vec<SharedStr>,
    /// Chars of the current phrase, cached so ticks never re-scan UTF-8.
    chars: Vec<char>,
    phrase: usize,
    cursor: usize,
    phase: Phase,
    rendered: String,
    timing: TypewriterTiming,
}

impl Typewriter {
    /// Build an engine over `phrases`, failing fast on an empty list or a
    /// zero tick period. A single-phrase list is valid: the engine types
    /// and deletes that phrase forever.
    pub fn new(
        phrases: Vec<SharedStr>,
        timing: TypewriterTiming,
    ) -> Result<Self, TypewriterError> {
        if phrases.is_empty() {
            return Err(TypewriterError::EmptyPhrases);
        }
        if timing.type_ms == 0 || timing.delete_ms == 0 || timing.hold_ms == 0 || timing.rest_ms == 0
        {
            return Err(TypewriterError::ZeroTiming);
        }
        let chars = phrases[0].chars().collect();
        Ok(Self {
            phrases,
            chars,
            phrase: 0,
            cursor: 0,
            phase: Phase::Typing,
            rendered: String::new(),
            timing,
        })
    }

    /// Convenience constructor with the default timing.
    pub fn with_default_timing(phrases: Vec<SharedStr>) -> Result<Self, TypewriterError> {
        Self::new(phrases, TypewriterTiming::default())
    }

    /// Perform exactly one character mutation and return the new text plus
    /// the delay before the next tick.
    ///
    /// At the end of a phrase the returned delay is the hold: the phase
    /// switches to `Deleting` but no character is removed until the hold
    /// elapses, so the full phrase stays on screen for the whole pause.
    /// Symmetrically, reaching the empty string switches back to `Typing`,
    /// advances to the next phrase, and returns the rest delay.
    pub fn advance(&mut self) -> Step {
        let delay_ms = match self.phase {
            Phase::Typing => {
                if let Some(&c) = self.chars.get(self.cursor) {
                    self.rendered.push(c);
                    self.cursor += 1;
                }
                if self.cursor >= self.chars.len() {
                    // Phrase complete: hold it, then start deleting.
                    self.phase = Phase::Deleting;
                    self.timing.hold_ms
                } else {
                    self.timing.type_ms
                }
            }
            Phase::Deleting => {
                if self.cursor > 0 {
                    self.rendered.pop();
                    self.cursor -= 1;
                }
                if self.cursor == 0 {
                    self.phase = Phase::Typing;
                    self.phrase = (self.phrase + 1) % self.phrases.len();
                    self.chars = self.phrases[self.phrase].chars().collect();
                    debug!(phrase = self.phrase, "typewriter cycled to next phrase");
                    self.timing.rest_ms
                } else {
                    self.timing.delete_ms
                }
            }
        };
        Step {
            text: SharedStr::from(self.rendered.as_str()),
            delay: Duration::from_millis(delay_ms),
        }
    }

    /// The text currently on screen.
    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Index of the phrase currently being typed or deleted.
    pub fn phrase_index(&self) -> usize {
        self.phrase
    }

    /// Typed character count, always within `0..=phrase_len`.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn phrase_count(&self) -> usize {
        self.phrases.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phrases(items: &[&str]) -> Vec<SharedStr> {
        items.iter().map(|s| SharedStr::from(*s)).collect()
    }

    fn quick() -> TypewriterTiming {
        TypewriterTiming {
            type_ms: 1,
            delete_ms: 2,
            hold_ms: 30,
            rest_ms: 10,
        }
    }

    #[test]
    fn empty_phrase_list_rejected() {
        let err = Typewriter::new(Vec::new(), TypewriterTiming::default());
        assert_eq!(err.err(), Some(TypewriterError::EmptyPhrases));
    }

    #[test]
    fn zero_period_rejected() {
        let timing = TypewriterTiming {
            hold_ms: 0,
            ..TypewriterTiming::default()
        };
        let err = Typewriter::new(phrases(&["a"]), timing);
        assert_eq!(err.err(), Some(TypewriterError::ZeroTiming));
    }

    #[test]
    fn hi_yo_full_cycle() {
        let mut tw = Typewriter::new(phrases(&["Hi", "Yo"]), quick()).expect("valid phrases");

        // Type "Hi" in two ticks; the second returns the hold delay.
        assert_eq!(tw.advance().text, "H");
        let end = tw.advance();
        assert_eq!(end.text, "Hi");
        assert_eq!(end.delay, Duration::from_millis(30));
        assert_eq!(tw.phase(), Phase::Deleting);

        // Two deleting ticks bring it back to empty; the second returns
        // the rest delay and moves to the next phrase.
        assert_eq!(tw.advance().text, "H");
        let empty = tw.advance();
        assert_eq!(empty.text, "");
        assert_eq!(empty.delay, Duration::from_millis(10));
        assert_eq!(tw.phrase_index(), 1);

        // Next typing phase produces "Y" then "Yo".
        assert_eq!(tw.advance().text, "Y");
        assert_eq!(tw.advance().text, "Yo");
    }

    #[test]
    fn mid_phrase_delays() {
        let mut tw = Typewriter::new(phrases(&["abc"]), quick()).expect("valid phrases");
        assert_eq!(tw.advance().delay, Duration::from_millis(1)); // "a"
        assert_eq!(tw.advance().delay, Duration::from_millis(1)); // "ab"
        assert_eq!(tw.advance().delay, Duration::from_millis(30)); // "abc" + hold
        assert_eq!(tw.advance().delay, Duration::from_millis(2)); // "ab"
        assert_eq!(tw.advance().delay, Duration::from_millis(2)); // "a"
        assert_eq!(tw.advance().delay, Duration::from_millis(10)); // "" + rest
    }

    #[test]
    fn single_phrase_loops_forever() {
        let mut tw = Typewriter::new(phrases(&["loop"]), quick()).expect("valid phrases");
        // Two full cycles: 4 typing + 4 deleting ticks each.
        for _ in 0..2 {
            for _ in 0..8 {
                tw.advance();
            }
            assert_eq!(tw.rendered(), "");
            assert_eq!(tw.phrase_index(), 0);
            assert_eq!(tw.phase(), Phase::Typing);
        }
    }

    #[test]
    fn cursor_never_escapes_bounds() {
        let mut tw =
            Typewriter::new(phrases(&["Résumé ✨", "", "data-driven"]), quick()).expect("valid phrases");
        for _ in 0..10_000 {
            tw.advance();
            let len = tw.rendered().chars().count();
            assert_eq!(len, tw.cursor());
            assert!(tw.cursor() <= 11, "cursor {} out of range", tw.cursor());
        }
    }

    #[test]
    fn unicode_phrase_renders_prefixes() {
        let mut tw = Typewriter::new(phrases(&["héllo"]), quick()).expect("valid phrases");
        assert_eq!(tw.advance().text, "h");
        assert_eq!(tw.advance().text, "hé");
        assert_eq!(tw.advance().text, "hél");
    }

    #[test]
    fn empty_phrase_passes_through_in_two_ticks() {
        let mut tw = Typewriter::new(phrases(&["", "Ok"]), quick()).expect("valid phrases");
        // Nothing to type: one hold tick, one rest tick, then phrase 1.
        let hold = tw.advance();
        assert_eq!(hold.text, "");
        assert_eq!(hold.delay, Duration::from_millis(30));
        let rest = tw.advance();
        assert_eq!(rest.text, "");
        assert_eq!(rest.delay, Duration::from_millis(10));
        assert_eq!(tw.phrase_index(), 1);
        assert_eq!(tw.advance().text, "O");
    }

    #[test]
    fn timing_deserializes_with_defaults() {
        let t: TypewriterTiming = serde_json::from_str(r#"{"hold_ms": 1500}"#).expect("valid json");
        assert_eq!(t.hold_ms, 1500);
        assert_eq!(t.type_ms, 100);
        assert_eq!(t.delete_ms, 50);
        assert_eq!(t.rest_ms, 500);
    }
}
