use std::time::Duration;

use tracing::debug;
use vitrine_protocol::{EffectToken, SharedStr, StageCommand};

/// Simulated loading progress: a bar that fills in uneven steps until it
/// hits 100%, then fades the loading screen out.
///
/// Step sizes are injected by the caller on each tick (the page host
/// feeds random increments for the organic stutter, tests feed fixed
/// ones), so the ramp itself stays deterministic. Progress is clamped
/// and monotonic, and the ramp is terminal: once finished it emits
/// nothing more.
#[derive(Debug, Clone)]
pub struct LoadingRamp {
    bar: SharedStr,
    screen: SharedStr,
    progress: f64,
    finished: bool,
    tick: Duration,
    linger_ms: f64,
}

impl LoadingRamp {
    /// `bar` receives the fill fraction; `screen` receives the final
    /// fade-out. Ticks every 100 ms, fade lingers 500 ms.
    pub fn new(bar: impl Into<SharedStr>, screen: impl Into<SharedStr>) -> Self {
        Self {
            bar: bar.into(),
            screen: screen.into(),
            progress: 0.0,
            finished: false,
            tick: Duration::from_millis(100),
            linger_ms: 500.0,
        }
    }

    pub fn with_timing(mut self, tick: Duration, linger_ms: f64) -> Self {
        self.tick = tick;
        self.linger_ms = linger_ms;
        self
    }

    /// Advance by one tick of `step` percentage points (negative steps are
    /// ignored). Emits the new fill fraction, plus the fade-out command on
    /// the tick that reaches 100%.
    pub fn advance(&mut self, step: f64) -> Vec<StageCommand> {
        if self.finished {
            return Vec::new();
        }
        self.progress = (self.progress + step.max(0.0)).min(100.0);
        let mut commands = vec![StageCommand::SetFraction {
            target: self.bar.clone(),
            fraction: self.progress / 100.0,
        }];
        if self.progress >= 100.0 {
            self.finished = true;
            debug!("loading ramp complete");
            commands.push(StageCommand::ApplyEffect {
                target: self.screen.clone(),
                effect: EffectToken::FadeOut,
                delay_ms: self.linger_ms,
            });
        }
        commands
    }

    /// Delay between ticks while filling.
    pub fn tick(&self) -> Duration {
        self.tick
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
