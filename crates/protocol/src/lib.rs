pub mod commands;
pub mod effect;
pub mod shared_str;
pub mod types;

pub use commands::StageCommand;
pub use effect::EffectToken;
pub use shared_str::SharedStr;
pub use types::{Bounds, Viewport};
