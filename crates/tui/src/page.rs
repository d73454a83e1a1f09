use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Deserialize;
use vitrine_core::typewriter::TypewriterTiming;
use vitrine_protocol::{Bounds, EffectToken, StageCommand};

/// Page manifest: what the portfolio says, loaded from JSON or built in.
#[derive(Debug, Clone, Deserialize)]
pub struct PageSpec {
    pub name: String,
    pub headline: String,
    /// Taglines the hero typewriter cycles through.
    pub phrases: Vec<String>,
    #[serde(default)]
    pub timing: TypewriterTiming,
    pub sections: Vec<SectionSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionSpec {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub lines: Vec<String>,
    #[serde(default)]
    pub skills: Vec<SkillSpec>,
    /// Timeline sections slide each line in individually instead of
    /// revealing the body as one block.
    #[serde(default)]
    pub timeline: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkillSpec {
    pub name: String,
    /// Proficiency in `0..=1`, drawn as the bar's final width.
    pub level: f64,
}

impl PageSpec {
    pub fn load(path: &Path) -> Result<Self> {
        let data =
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_slice(&data).with_context(|| format!("parsing {}", path.display()))
    }

    /// Built-in demo page, used when no manifest path is given.
    pub fn sample() -> Self {
        Self {
            name: "Sam Rivera".into(),
            headline: "Full-stack engineer".into(),
            phrases: vec![
                "Crafting intelligent solutions with Python".into(),
                "Building scalable web applications".into(),
                "Implementing machine learning algorithms".into(),
                "Creating data-driven insights".into(),
            ],
            timing: TypewriterTiming::default(),
            sections: vec![
                SectionSpec {
                    id: "about".into(),
                    title: "About".into(),
                    lines: vec![
                        "Engineer with a soft spot for fast feedback loops,".into(),
                        "boring infrastructure, and interfaces that feel alive.".into(),
                    ],
                    skills: Vec::new(),
                    timeline: false,
                },
                SectionSpec {
                    id: "skills".into(),
                    title: "Skills".into(),
                    lines: Vec::new(),
                    skills: vec![
                        SkillSpec { name: "Python".into(), level: 0.9 },
                        SkillSpec { name: "Rust".into(), level: 0.8 },
                        SkillSpec { name: "TypeScript".into(), level: 0.75 },
                        SkillSpec { name: "SQL".into(), level: 0.7 },
                    ],
                    timeline: false,
                },
                SectionSpec {
                    id: "experience".into(),
                    title: "Experience".into(),
                    lines: vec![
                        "2024 ·  Senior engineer, data platform".into(),
                        "2021 ·  Backend engineer, payments".into(),
                        "2019 ·  Junior developer, agency work".into(),
                    ],
                    skills: Vec::new(),
                    timeline: true,
                },
                SectionSpec {
                    id: "contact".into(),
                    title: "Contact".into(),
                    lines: vec!["sam@example.dev  ·  github.com/samrivera".into()],
                    skills: Vec::new(),
                    timeline: false,
                },
            ],
        }
    }
}

/// One revealable element placed on the page: its target id, where it
/// sits (in row units), and the effect it plays when first seen.
#[derive(Debug, Clone)]
pub struct ElementSpec {
    pub target: String,
    pub bounds: Bounds,
    pub effect: EffectToken,
    pub delay_ms: f64,
}

/// A section placed on the page, rows measured from the top.
#[derive(Debug, Clone)]
pub struct SectionLayout {
    pub spec: SectionSpec,
    pub bounds: Bounds,
    pub elements: Vec<ElementSpec>,
}

const HERO_ROWS: f64 = 9.0;
const SECTION_PADDING: f64 = 3.0;
const STAGGER_MS: f64 = 150.0;

/// Place every section one after another and derive the revealable
/// elements: a title per section, then either a body block, timeline
/// lines sliding in one by one, or skill bars growing with a stagger.
pub fn layout(spec: &PageSpec) -> (f64, Vec<SectionLayout>) {
    let mut top = HERO_ROWS;
    let mut sections = Vec::with_capacity(spec.sections.len());

    for section in &spec.sections {
        let content_rows = section.lines.len() + section.skills.len();
        let height = SECTION_PADDING + 1.0 + content_rows as f64;
        let mut elements = vec![ElementSpec {
            target: format!("{}-title", section.id),
            bounds: Bounds::new(top + 1.0, 1.0),
            effect: EffectToken::FadeInUp,
            delay_ms: 0.0,
        }];

        let content_top = top + 3.0;
        if section.timeline {
            for (i, _) in section.lines.iter().enumerate() {
                elements.push(ElementSpec {
                    target: format!("{}-item-{i}", section.id),
                    bounds: Bounds::new(content_top + i as f64, 1.0),
                    effect: EffectToken::SlideInLeft,
                    delay_ms: i as f64 * STAGGER_MS,
                });
            }
        } else if !section.lines.is_empty() {
            elements.push(ElementSpec {
                target: format!("{}-body", section.id),
                bounds: Bounds::new(content_top, section.lines.len() as f64),
                effect: EffectToken::FadeInUp,
                delay_ms: STAGGER_MS,
            });
        }
        for i in 0..section.skills.len() {
            elements.push(ElementSpec {
                target: format!("{}-skill-{i}", section.id),
                bounds: Bounds::new(content_top + section.lines.len() as f64 + i as f64, 1.0),
                effect: EffectToken::GrowWidth,
                delay_ms: i as f64 * STAGGER_MS,
            });
        }

        sections.push(SectionLayout {
            spec: section.clone(),
            bounds: Bounds::new(top, height),
            elements,
        });
        top += height;
    }

    (top, sections)
}

/// An effect in flight on some element: when it was triggered and how
/// long to wait before it starts playing (the reveal stagger).
#[derive(Debug, Clone, Copy)]
pub struct Playback {
    pub effect: EffectToken,
    pub started: Instant,
    pub delay_ms: f64,
}

impl Playback {
    /// Animation progress in `0..=1` for a playback of `duration_ms`,
    /// zero while the stagger delay has not elapsed yet.
    pub fn progress(&self, now: Instant, duration_ms: f64) -> f64 {
        let elapsed_ms = now.duration_since(self.started).as_secs_f64() * 1000.0;
        ((elapsed_ms - self.delay_ms) / duration_ms).clamp(0.0, 1.0)
    }
}

/// The applied side of the command stream: everything the renderer needs
/// to draw a frame, and nothing the engines need back.
#[derive(Debug, Default)]
pub struct PageModel {
    texts: HashMap<String, String>,
    fractions: HashMap<String, f64>,
    effects: HashMap<String, Playback>,
    active_nav: Option<String>,
}

impl PageModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, command: StageCommand, now: Instant) {
        match command {
            StageCommand::SetText { target, text } => {
                self.texts.insert(target.to_string(), text.to_string());
            }
            StageCommand::SetFraction { target, fraction } => {
                self.fractions.insert(target.to_string(), fraction);
            }
            StageCommand::ApplyEffect {
                target,
                effect,
                delay_ms,
            } => {
                self.effects.entry(target.to_string()).or_insert(Playback {
                    effect,
                    started: now,
                    delay_ms,
                });
            }
            StageCommand::SetActive { target, active } => {
                if active {
                    self.active_nav = Some(target.to_string());
                }
            }
        }
    }

    pub fn text(&self, target: &str) -> &str {
        self.texts.get(target).map_or("", String::as_str)
    }

    pub fn fraction(&self, target: &str) -> f64 {
        self.fractions.get(target).copied().unwrap_or(0.0)
    }

    pub fn playback(&self, target: &str) -> Option<Playback> {
        self.effects.get(target).copied()
    }

    pub fn active_nav(&self) -> Option<&str> {
        self.active_nav.as_deref()
    }
}
