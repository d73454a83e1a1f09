use serde::{Deserialize, Serialize};

/// Semantic effect names resolved by each host's styling layer.
///
/// The core never describes concrete styling: a terminal host maps these
/// to color/modifier changes, a browser host to CSS animation classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectToken {
    /// Element rises into place while fading in.
    FadeInUp,
    /// Element slides in from the left edge.
    SlideInLeft,
    /// Element's fill grows from zero to its set fraction.
    GrowWidth,
    /// Element fades out and is removed from flow.
    FadeOut,
}
