//! Integration test: drive a whole simulated portfolio page (loading
//! ramp, hero typewriter, reveal-on-scroll sections, and the navigation
//! spy) through one synthetic-clock session and verify the command flow.

use std::time::{Duration, Instant};

use vitrine_core::typewriter::TypewriterTiming;
use vitrine_core::{LoadingRamp, RevealDispatcher, SectionSpy, Stage, Typewriter};
use vitrine_protocol::{Bounds, EffectToken, SharedStr, StageCommand, Viewport};

const VIEW_HEIGHT: f64 = 800.0;

fn page_sections() -> Vec<(&'static str, Bounds)> {
    vec![
        ("hero", Bounds::new(0.0, 900.0)),
        ("about", Bounds::new(900.0, 700.0)),
        ("skills", Bounds::new(1600.0, 700.0)),
        ("contact", Bounds::new(2300.0, 700.0)),
    ]
}

#[test]
fn full_page_session() {
    let t0 = Instant::now();
    let sections = page_sections();

    // Timer-driven engines under the stage driver.
    let mut stage = Stage::new();
    stage.set_ramp(LoadingRamp::new("progress-bar", "loading-screen"), || 34.0, t0);

    let timing = TypewriterTiming {
        type_ms: 50,
        delete_ms: 25,
        hold_ms: 1000,
        rest_ms: 250,
    };
    let phrases = vec![
        SharedStr::from("Building scalable web applications"),
        SharedStr::from("Creating data-driven insights"),
    ];
    let typewriter = Typewriter::new(phrases, timing).expect("valid phrases");

    // Event-driven engines fed by scroll position.
    let mut reveals = RevealDispatcher::new();
    for (id, _) in &sections {
        reveals.watch(format!("{id}-title"), EffectToken::FadeInUp);
    }
    reveals.watch_staggered("skill-python", EffectToken::GrowWidth, 0.0);
    reveals.watch_staggered("skill-rust", EffectToken::GrowWidth, 200.0);

    let mut spy = SectionSpy::new();
    for (id, bounds) in &sections {
        spy.add_section(format!("nav-{id}"), *bounds);
    }

    // --- Loading: three 34% steps reach 100 and fade the screen. ---
    let mut loading_cmds = Vec::new();
    for ms in [0, 100, 200] {
        loading_cmds.extend(stage.poll(t0 + Duration::from_millis(ms)));
    }
    let fades: Vec<_> = loading_cmds
        .iter()
        .filter(|c| matches!(c, StageCommand::ApplyEffect { effect: EffectToken::FadeOut, .. }))
        .collect();
    assert_eq!(fades.len(), 1, "loading screen fades exactly once");
    println!("loading: {} commands, faded after 3 ticks", loading_cmds.len());

    // The page starts the typewriter once the loading screen is gone.
    let t_typed = t0 + Duration::from_millis(200);
    stage.set_typewriter("hero-tagline", typewriter, t_typed);

    // --- At rest on the hero: hero reveals, nav highlights hero. ---
    // Element bounds for this simulated page: titles sit at the top of
    // their section, skill bars inside "skills".
    let element_bounds = |target: &str| -> Option<Bounds> {
        match target {
            "hero-title" => Some(Bounds::new(50.0, 60.0)),
            "about-title" => Some(Bounds::new(950.0, 60.0)),
            "skills-title" => Some(Bounds::new(1650.0, 60.0)),
            "contact-title" => Some(Bounds::new(2350.0, 60.0)),
            "skill-python" => Some(Bounds::new(1750.0, 30.0)),
            "skill-rust" => Some(Bounds::new(1800.0, 30.0)),
            _ => None,
        }
    };

    let mut viewport = Viewport::new(0.0, VIEW_HEIGHT);
    let first_sweep =
        reveals.sweep(|t| element_bounds(t).map(|b| b.visible_fraction(&viewport)));
    assert_eq!(first_sweep.len(), 1, "only the hero title is on screen");
    assert_eq!(first_sweep[0].target(), "hero-title");

    let nav = spy.update(&viewport);
    assert_eq!(nav.len(), 1);
    assert_eq!(nav[0].target(), "nav-hero");

    // --- Typewriter types the first phrase one keystroke per period. ---
    let phrase = "Building scalable web applications";
    let mut now = t_typed;
    let mut last_text = String::new();
    for _ in 0..phrase.chars().count() {
        for cmd in stage.poll(now) {
            if let StageCommand::SetText { text, .. } = cmd {
                last_text = text.to_string();
            }
        }
        now += Duration::from_millis(50);
    }
    assert_eq!(last_text, phrase, "full phrase typed before the hold");

    // --- Scroll to the skills section: staggered bars + title reveal. ---
    viewport = Viewport::new(1500.0, VIEW_HEIGHT);
    let skills_sweep =
        reveals.sweep(|t| element_bounds(t).map(|b| b.visible_fraction(&viewport)));
    let targets: Vec<&str> = skills_sweep.iter().map(|c| c.target().as_str()).collect();
    assert!(targets.contains(&"skills-title"));
    assert!(targets.contains(&"skill-python"));
    assert!(targets.contains(&"skill-rust"));

    let nav = spy.update(&viewport);
    assert_eq!(nav.len(), 2, "hero deactivates, skills activates");
    assert_eq!(nav[1].target(), "nav-skills");

    // --- Scrolling back up never un-reveals anything. ---
    viewport = Viewport::new(0.0, VIEW_HEIGHT);
    let back_up = reveals.sweep(|t| element_bounds(t).map(|b| b.visible_fraction(&viewport)));
    let unrevealed: Vec<&str> = back_up.iter().map(|c| c.target().as_str()).collect();
    assert!(!unrevealed.contains(&"skills-title"));
    assert!(reveals.revealed("skills-title"));

    // --- Teardown: nothing fires after stop, even when long overdue. ---
    stage.stop();
    reveals.stop();
    assert!(stage.poll(now + Duration::from_secs(30)).is_empty());
    assert!(reveals.sweep(|_| Some(1.0)).is_empty());

    println!(
        "session complete: {} watchers revealed, active section {:?}",
        6 - reveals.pending(),
        spy.active().map(SharedStr::as_str),
    );
}
