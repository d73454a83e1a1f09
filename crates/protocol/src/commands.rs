use serde::{Deserialize, Serialize};

use crate::effect::EffectToken;
use crate::shared_str::SharedStr;

/// A single, stateless instruction for the host's rendering surface.
///
/// The core engines emit `Vec<StageCommand>` as they tick. Hosts consume
/// the list sequentially; each command names its target element and
/// carries all the data it needs, so applying one never requires engine
/// state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageCommand {
    /// Replace the text content of the target element.
    SetText { target: SharedStr, text: SharedStr },

    /// Trigger a named visual effect on the target element, optionally
    /// after a delay (used for staggered reveals).
    ApplyEffect {
        target: SharedStr,
        effect: EffectToken,
        delay_ms: f64,
    },

    /// Set a normalized 0..=1 fill fraction on the target (progress bars,
    /// skill levels).
    SetFraction { target: SharedStr, fraction: f64 },

    /// Mark the target as the active one within its group (navigation
    /// highlight). Exactly one `active: true` follows each
    /// `active: false` for the outgoing target.
    SetActive { target: SharedStr, active: bool },
}

impl StageCommand {
    /// The element this command addresses.
    pub fn target(&self) -> &SharedStr {
        match self {
            StageCommand::SetText { target, .. }
            | StageCommand::ApplyEffect { target, .. }
            | StageCommand::SetFraction { target, .. }
            | StageCommand::SetActive { target, .. } => target,
        }
    }
}
