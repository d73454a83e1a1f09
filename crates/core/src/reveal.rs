use tracing::debug;
use vitrine_protocol::{EffectToken, SharedStr, StageCommand};

/// Minimum visible fraction that counts as "in view" when none is given.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// One element registration: which element, which effect to play when it
/// first scrolls into view, and an optional stagger delay so grouped
/// elements cascade instead of appearing at once.
#[derive(Debug, Clone)]
pub struct Watcher {
    target: SharedStr,
    effect: EffectToken,
    delay_ms: f64,
    revealed: bool,
}

impl Watcher {
    pub fn target(&self) -> &SharedStr {
        &self.target
    }

    pub fn effect(&self) -> EffectToken {
        self.effect
    }

    /// Whether this element has already played its reveal. Monotonic:
    /// never reset, even by `sweep` calls where the element has scrolled
    /// back out of view.
    pub fn revealed(&self) -> bool {
        self.revealed
    }
}

/// Watches a set of elements and plays each one's reveal effect exactly
/// once, the first time it is sufficiently inside the viewport.
///
/// The dispatcher never measures anything itself. Pull hosts call
/// [`sweep`](RevealDispatcher::sweep) on scroll/resize with a measurement
/// closure; push hosts (an intersection-observer style source) call
/// [`notify_visible`](RevealDispatcher::notify_visible) per element.
/// Both paths share the same one-shot semantics, and evaluation order
/// across watchers carries no meaning.
#[derive(Debug)]
pub struct RevealDispatcher {
    watchers: Vec<Watcher>,
    threshold: f64,
    active: bool,
}

impl RevealDispatcher {
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_THRESHOLD)
    }

    /// `threshold` is clamped into `0..=1`.
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            watchers: Vec::new(),
            threshold: threshold.clamp(0.0, 1.0),
            active: true,
        }
    }

    /// Register an element. Duplicate targets are allowed and reveal
    /// independently.
    pub fn watch(&mut self, target: impl Into<SharedStr>, effect: EffectToken) {
        self.watch_staggered(target, effect, 0.0);
    }

    /// Register an element whose effect starts `delay_ms` after it is
    /// revealed (staggered group entrances).
    pub fn watch_staggered(
        &mut self,
        target: impl Into<SharedStr>,
        effect: EffectToken,
        delay_ms: f64,
    ) {
        self.watchers.push(Watcher {
            target: target.into(),
            effect,
            delay_ms,
            revealed: false,
        });
    }

    /// Visit every unrevealed watcher, ask the host how much of it is
    /// visible, and reveal those at or above the threshold.
    ///
    /// `visible_fraction` returns `None` when the element cannot be
    /// measured (no longer present); that counts as not visible, not as
    /// an error. A closure that panics propagates to the caller.
    pub fn sweep<F>(&mut self, mut visible_fraction: F) -> Vec<StageCommand>
    where
        F: FnMut(&str) -> Option<f64>,
    {
        if !self.active {
            return Vec::new();
        }
        let threshold = self.threshold;
        let mut commands = Vec::new();
        for watcher in self.watchers.iter_mut().filter(|w| !w.revealed) {
            let Some(fraction) = visible_fraction(&watcher.target) else {
                continue;
            };
            if fraction >= threshold {
                watcher.revealed = true;
                debug!(target = %watcher.target, "revealed");
                commands.push(StageCommand::ApplyEffect {
                    target: watcher.target.clone(),
                    effect: watcher.effect,
                    delay_ms: watcher.delay_ms,
                });
            }
        }
        commands
    }

    /// Push-based entry point: the host observed `target` entering the
    /// viewport. Returns the reveal command the first time, `None` ever
    /// after (and `None` for unknown targets).
    pub fn notify_visible(&mut self, target: &str) -> Option<StageCommand> {
        if !self.active {
            return None;
        }
        let watcher = self
            .watchers
            .iter_mut()
            .find(|w| !w.revealed && w.target == target)?;
        watcher.revealed = true;
        debug!(target = %watcher.target, "revealed (push)");
        Some(StageCommand::ApplyEffect {
            target: watcher.target.clone(),
            effect: watcher.effect,
            delay_ms: watcher.delay_ms,
        })
    }

    /// Whether the named element has revealed. False for unknown targets.
    pub fn revealed(&self, target: &str) -> bool {
        self.watchers
            .iter()
            .any(|w| w.revealed && w.target == target)
    }

    /// Count of watchers still waiting to reveal.
    pub fn pending(&self) -> usize {
        self.watchers.iter().filter(|w| !w.revealed).count()
    }

    /// True once every watcher has revealed; the dispatcher is inert
    /// from then on.
    pub fn is_settled(&self) -> bool {
        self.pending() == 0
    }

    pub fn watchers(&self) -> &[Watcher] {
        &self.watchers
    }

    /// Tear down: subsequent sweeps and notifications emit nothing.
    pub fn stop(&mut self) {
        self.active = false;
    }
}

impl Default for RevealDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
