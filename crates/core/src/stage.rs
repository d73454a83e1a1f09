use std::time::Instant;

use vitrine_protocol::{SharedStr, StageCommand};

use crate::ramp::LoadingRamp;
use crate::typewriter::Typewriter;

struct TypewriterSlot {
    target: SharedStr,
    engine: Typewriter,
    due: Instant,
}

struct RampSlot {
    engine: LoadingRamp,
    /// Host-supplied step source; the page feeds random increments,
    /// tests feed fixed ones.
    step: Box<dyn FnMut() -> f64>,
    due: Instant,
}

/// Owns the timer-driven engines and turns a host's event loop into their
/// ticks.
///
/// Hosts call [`poll`](Stage::poll) once per loop iteration with the
/// current instant; the stage runs every engine whose deadline has passed
/// (catching up one mutation per elapsed period after a stall) and
/// returns the accumulated commands. [`next_due`](Stage::next_due) tells
/// the host how long it may block waiting for input.
///
/// [`stop`](Stage::stop) is the teardown guarantee: it drops every
/// pending deadline, and a stopped stage emits nothing ever again no
/// matter how often it is polled.
pub struct Stage {
    typewriter: Option<TypewriterSlot>,
    ramp: Option<RampSlot>,
    running: bool,
}

impl Stage {
    pub fn new() -> Self {
        Self {
            typewriter: None,
            ramp: None,
            running: true,
        }
    }

    /// Install the typewriter, first tick due immediately. `target` names
    /// the element that receives the rendered text.
    pub fn set_typewriter(
        &mut self,
        target: impl Into<SharedStr>,
        engine: Typewriter,
        now: Instant,
    ) {
        self.typewriter = Some(TypewriterSlot {
            target: target.into(),
            engine,
            due: now,
        });
    }

    /// Install the loading ramp with its step source, first tick due
    /// immediately.
    pub fn set_ramp(
        &mut self,
        engine: LoadingRamp,
        step: impl FnMut() -> f64 + 'static,
        now: Instant,
    ) {
        self.ramp = Some(RampSlot {
            engine,
            step: Box::new(step),
            due: now,
        });
    }

    /// Run every due engine and return the commands to apply. Stopped
    /// stages return nothing, even when deadlines have long passed.
    pub fn poll(&mut self, now: Instant) -> Vec<StageCommand> {
        if !self.running {
            return Vec::new();
        }
        let mut commands = Vec::new();

        if let Some(slot) = &mut self.ramp {
            while slot.due <= now && !slot.engine.is_finished() {
                let step = (slot.step)();
                commands.extend(slot.engine.advance(step));
                slot.due += slot.engine.tick();
            }
        }
        if self.ramp.as_ref().is_some_and(|s| s.engine.is_finished()) {
            self.ramp = None;
        }

        if let Some(slot) = &mut self.typewriter {
            while slot.due <= now {
                let step = slot.engine.advance();
                commands.push(StageCommand::SetText {
                    target: slot.target.clone(),
                    text: step.text,
                });
                slot.due += step.delay;
            }
        }

        commands
    }

    /// Earliest pending deadline, for sizing the host's input-poll
    /// timeout. `None` when nothing is scheduled (or after `stop`).
    pub fn next_due(&self) -> Option<Instant> {
        if !self.running {
            return None;
        }
        let ramp = self.ramp.as_ref().map(|s| s.due);
        let tw = self.typewriter.as_ref().map(|s| s.due);
        match (ramp, tw) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Cancel everything. Pending deadlines are dropped and no command is
    /// ever emitted again.
    pub fn stop(&mut self) {
        self.running = false;
        self.typewriter = None;
        self.ramp = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::typewriter::TypewriterTiming;

    fn typewriter(text: &str) -> Typewriter {
        let timing = TypewriterTiming {
            type_ms: 10,
            delete_ms: 5,
            hold_ms: 1000,
            rest_ms: 100,
        };
        Typewriter::new(vec![SharedStr::from(text)], timing).expect("valid phrases")
    }

    fn texts(commands: &[StageCommand]) -> Vec<String> {
        commands
            .iter()
            .filter_map(|c| match c {
                StageCommand::SetText { text, .. } => Some(text.to_string()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn first_poll_ticks_immediately() {
        let t0 = Instant::now();
        let mut stage = Stage::new();
        stage.set_typewriter("tagline", typewriter("abcd"), t0);
        let cmds = stage.poll(t0);
        assert_eq!(texts(&cmds), ["a"]);
        assert_eq!(stage.next_due(), Some(t0 + Duration::from_millis(10)));
    }

    #[test]
    fn stalled_host_catches_up_one_tick_per_period() {
        let t0 = Instant::now();
        let mut stage = Stage::new();
        stage.set_typewriter("tagline", typewriter("abcd"), t0);
        stage.poll(t0);
        // 35 ms later three more periods have elapsed.
        let cmds = stage.poll(t0 + Duration::from_millis(35));
        assert_eq!(texts(&cmds), ["ab", "abc", "abcd"]);
        // The completed phrase holds: next deadline is a full hold away.
        assert_eq!(
            stage.next_due(),
            Some(t0 + Duration::from_millis(30) + Duration::from_millis(1000))
        );
    }

    #[test]
    fn idle_polls_emit_nothing() {
        let t0 = Instant::now();
        let mut stage = Stage::new();
        stage.set_typewriter("tagline", typewriter("abcd"), t0);
        stage.poll(t0);
        assert!(stage.poll(t0 + Duration::from_millis(3)).is_empty());
    }

    #[test]
    fn stopped_stage_is_silent_even_when_due() {
        let t0 = Instant::now();
        let mut stage = Stage::new();
        stage.set_typewriter("tagline", typewriter("abcd"), t0);
        stage.poll(t0);
        stage.stop();
        assert!(!stage.is_running());
        assert!(stage.poll(t0 + Duration::from_secs(60)).is_empty());
        assert_eq!(stage.next_due(), None);
    }

    #[test]
    fn ramp_runs_to_completion_then_unregisters() {
        let t0 = Instant::now();
        let mut stage = Stage::new();
        stage.set_ramp(
            LoadingRamp::new("progress-bar", "loading-screen"),
            || 50.0,
            t0,
        );
        let first = stage.poll(t0);
        assert_eq!(first.len(), 1);

        let second = stage.poll(t0 + Duration::from_millis(100));
        // Fill to 100% plus the fade-out.
        assert_eq!(second.len(), 2);

        // Finished ramp no longer schedules anything.
        assert_eq!(stage.next_due(), None);
        assert!(stage.poll(t0 + Duration::from_millis(300)).is_empty());
    }

    #[test]
    fn ramp_and_typewriter_interleave() {
        let t0 = Instant::now();
        let mut stage = Stage::new();
        stage.set_ramp(LoadingRamp::new("bar", "screen"), || 100.0, t0);
        stage.set_typewriter("tagline", typewriter("hi"), t0);
        let cmds = stage.poll(t0);
        // One ramp fill + fade, then the first keystroke.
        assert_eq!(cmds.len(), 3);
        assert_eq!(texts(&cmds), ["h"]);
    }
}
