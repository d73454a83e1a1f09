use tracing::debug;
use vitrine_protocol::{Bounds, SharedStr, StageCommand, Viewport};

/// Tracks which page section the user is currently reading and keeps the
/// matching navigation entry highlighted.
///
/// The probe point is the viewport's vertical midpoint: the section the
/// middle of the screen falls in wins. Commands are emitted only when the
/// active section changes: one `SetActive { active: false }` for the
/// outgoing entry, one `SetActive { active: true }` for the incoming.
/// When the probe falls between sections the previous highlight is kept.
#[derive(Debug, Default)]
pub struct SectionSpy {
    sections: Vec<(SharedStr, Bounds)>,
    active: Option<usize>,
}

impl SectionSpy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a section in page order.
    pub fn add_section(&mut self, id: impl Into<SharedStr>, bounds: Bounds) {
        self.sections.push((id.into(), bounds));
    }

    /// Update a section's measured bounds (after a resize). Returns false
    /// when the id is unknown.
    pub fn set_bounds(&mut self, id: &str, bounds: Bounds) -> bool {
        match self.sections.iter_mut().find(|(sid, _)| sid == id) {
            Some((_, b)) => {
                *b = bounds;
                true
            }
            None => false,
        }
    }

    /// Re-evaluate against the current viewport, emitting highlight
    /// changes if the probed section differs from the active one.
    pub fn update(&mut self, viewport: &Viewport) -> Vec<StageCommand> {
        let probe = viewport.midpoint();
        let hit = self
            .sections
            .iter()
            .position(|(_, bounds)| bounds.contains(probe));
        let Some(index) = hit else {
            return Vec::new();
        };
        if Some(index) == self.active {
            return Vec::new();
        }

        let mut commands = Vec::with_capacity(2);
        if let Some(previous) = self.active {
            commands.push(StageCommand::SetActive {
                target: self.sections[previous].0.clone(),
                active: false,
            });
        }
        commands.push(StageCommand::SetActive {
            target: self.sections[index].0.clone(),
            active: true,
        });
        debug!(section = %self.sections[index].0, "active section changed");
        self.active = Some(index);
        commands
    }

    /// Id of the currently highlighted section, if any.
    pub fn active(&self) -> Option<&SharedStr> {
        self.active.map(|i| &self.sections[i].0)
    }
}
