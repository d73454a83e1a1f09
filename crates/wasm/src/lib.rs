use std::sync::Mutex;

use serde::Deserialize;
use vitrine_core::typewriter::TypewriterTiming;
use vitrine_core::{RevealDispatcher, Typewriter};
use vitrine_protocol::{EffectToken, SharedStr};
use wasm_bindgen::prelude::*;

static TYPEWRITERS: Mutex<Vec<Typewriter>> = Mutex::new(Vec::new());
static DISPATCHERS: Mutex<Vec<RevealDispatcher>> = Mutex::new(Vec::new());

#[derive(Deserialize)]
struct TypewriterConfig {
    phrases: Vec<String>,
    #[serde(default)]
    timing: TypewriterTiming,
}

#[derive(Deserialize)]
struct DispatcherConfig {
    #[serde(default = "default_threshold")]
    threshold: f64,
    watchers: Vec<WatcherConfig>,
}

#[derive(Deserialize)]
struct WatcherConfig {
    target: String,
    effect: EffectToken,
    #[serde(default)]
    delay_ms: f64,
}

fn default_threshold() -> f64 {
    vitrine_core::reveal::DEFAULT_THRESHOLD
}

/// Build a typewriter from a JSON config
/// (`{"phrases": [...], "timing": {...}}`). Returns a handle for later
/// calls.
#[wasm_bindgen]
pub fn create_typewriter(config: &str) -> Result<usize, JsError> {
    let config: TypewriterConfig =
        serde_json::from_str(config).map_err(|e| JsError::new(&e.to_string()))?;
    let phrases = config
        .phrases
        .iter()
        .map(|s| SharedStr::from(s.as_str()))
        .collect();
    let engine = Typewriter::new(phrases, config.timing)
        .map_err(|e| JsError::new(&e.to_string()))?;
    let mut typewriters = TYPEWRITERS.lock().unwrap();
    let handle = typewriters.len();
    typewriters.push(engine);
    Ok(handle)
}

/// Tick the typewriter once. Returns `{"text": "...", "delay_ms": n}`;
/// the host sets the text and schedules the next call after `delay_ms`.
#[wasm_bindgen]
pub fn typewriter_advance(handle: usize) -> Result<String, JsError> {
    let mut typewriters = TYPEWRITERS.lock().unwrap();
    let engine = typewriters
        .get_mut(handle)
        .ok_or_else(|| JsError::new("invalid typewriter handle"))?;
    let step = engine.advance();
    let json = serde_json::json!({
        "text": step.text,
        "delay_ms": step.delay.as_millis() as u64,
    });
    serde_json::to_string(&json).map_err(|e| JsError::new(&e.to_string()))
}

/// Build a reveal dispatcher from a JSON config
/// (`{"threshold": 0.1, "watchers": [{"target": "...", "effect":
/// "FadeInUp", "delay_ms": 0}]}`). Returns a handle.
#[wasm_bindgen]
pub fn create_dispatcher(config: &str) -> Result<usize, JsError> {
    let config: DispatcherConfig =
        serde_json::from_str(config).map_err(|e| JsError::new(&e.to_string()))?;
    let mut dispatcher = RevealDispatcher::with_threshold(config.threshold);
    for watcher in config.watchers {
        dispatcher.watch_staggered(watcher.target, watcher.effect, watcher.delay_ms);
    }
    let mut dispatchers = DISPATCHERS.lock().unwrap();
    let handle = dispatchers.len();
    dispatchers.push(dispatcher);
    Ok(handle)
}

/// Push-based reveal: the host's IntersectionObserver saw `target` enter
/// the viewport. Returns the commands to apply as JSON (empty array when
/// already revealed).
#[wasm_bindgen]
pub fn dispatcher_notify_visible(handle: usize, target: &str) -> Result<String, JsError> {
    let mut dispatchers = DISPATCHERS.lock().unwrap();
    let dispatcher = dispatchers
        .get_mut(handle)
        .ok_or_else(|| JsError::new("invalid dispatcher handle"))?;
    let commands: Vec<_> = dispatcher.notify_visible(target).into_iter().collect();
    serde_json::to_string(&commands).map_err(|e| JsError::new(&e.to_string()))
}

/// Pull-based reveal sweep: the host measured visible fractions
/// (`{"about-title": 0.4, ...}`); elements missing from the map count as
/// unmeasurable. Returns the commands to apply as JSON.
#[wasm_bindgen]
pub fn dispatcher_sweep(handle: usize, fractions: &str) -> Result<String, JsError> {
    let fractions: std::collections::HashMap<String, f64> =
        serde_json::from_str(fractions).map_err(|e| JsError::new(&e.to_string()))?;
    let mut dispatchers = DISPATCHERS.lock().unwrap();
    let dispatcher = dispatchers
        .get_mut(handle)
        .ok_or_else(|| JsError::new("invalid dispatcher handle"))?;
    let commands = dispatcher.sweep(|target| fractions.get(target).copied());
    serde_json::to_string(&commands).map_err(|e| JsError::new(&e.to_string()))
}

/// Number of watchers still waiting to reveal.
#[wasm_bindgen]
pub fn dispatcher_pending(handle: usize) -> Result<usize, JsError> {
    let dispatchers = DISPATCHERS.lock().unwrap();
    let dispatcher = dispatchers
        .get(handle)
        .ok_or_else(|| JsError::new("invalid dispatcher handle"))?;
    Ok(dispatcher.pending())
}

/// Tear the dispatcher down: all later notifications and sweeps emit
/// nothing.
#[wasm_bindgen]
pub fn dispatcher_stop(handle: usize) -> Result<(), JsError> {
    let mut dispatchers = DISPATCHERS.lock().unwrap();
    let dispatcher = dispatchers
        .get_mut(handle)
        .ok_or_else(|| JsError::new("invalid dispatcher handle"))?;
    dispatcher.stop();
    Ok(())
}
