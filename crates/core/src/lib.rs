//! Motion engines for a scrolling portfolio page.
//!
//! Every engine here is a plain state machine that emits stage commands,
//! stateless instructions a host rendering surface applies:
//!
//! ```text
//!   Typewriter ─┐
//!   RevealDispatcher ├─▶ StageCommand[] ──▶ host renderer (terminal,
//!   LoadingRamp ├        (SetText,           browser via WASM, tests)
//!   SectionSpy ─┘         ApplyEffect…)
//! ```
//!
//! The engines never touch a rendering surface and never own a thread:
//! timer-driven ones ([`Typewriter`], [`LoadingRamp`]) are scheduled by a
//! [`Stage`] the host polls from its event loop, event-driven ones
//! ([`RevealDispatcher`], [`SectionSpy`]) are fed scroll/visibility data
//! as it arrives. This keeps every transition unit-testable with a
//! synthetic clock.

pub mod debounce;
pub mod ramp;
pub mod reveal;
pub mod spy;
pub mod stage;
pub mod typewriter;

pub use debounce::Debounce;
pub use ramp::LoadingRamp;
pub use reveal::{RevealDispatcher, Watcher};
pub use spy::SectionSpy;
pub use stage::Stage;
pub use typewriter::{Phase, Typewriter, TypewriterError, TypewriterTiming};
