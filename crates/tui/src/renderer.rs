use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::Rng;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
};
use tracing::info;
use vitrine_core::{Debounce, LoadingRamp, RevealDispatcher, SectionSpy, Stage, Typewriter};
use vitrine_protocol::{EffectToken, SharedStr, Viewport};

use crate::page::{self, PageModel, PageSpec, SectionLayout};

const SCROLL_STEP: f64 = 3.0;
/// How long entrance effects play on this host, in milliseconds.
const EFFECT_MS: f64 = 600.0;
/// Skill bars take two seconds to grow to their final width.
const BAR_GROW_MS: f64 = 2000.0;
const FADE_MS: f64 = 400.0;
const SLIDE_COLS: f64 = 12.0;

pub fn run(spec: &PageSpec) -> Result<()> {
    let phrases: Vec<SharedStr> = spec
        .phrases
        .iter()
        .map(|s| SharedStr::from(s.as_str()))
        .collect();
    // Fail fast on a bad manifest before touching the terminal.
    let mut pending_typewriter = Some(Typewriter::new(phrases, spec.timing)?);

    let (total_rows, sections) = page::layout(spec);
    info!(sections = sections.len(), rows = total_rows, "page laid out");

    let start = Instant::now();
    let mut stage = Stage::new();
    let mut rng = rand::thread_rng();
    stage.set_ramp(
        LoadingRamp::new("progress-bar", "loading-screen"),
        move || rng.gen_range(0.0..15.0),
        start,
    );

    let mut reveals = RevealDispatcher::new();
    let mut spy = SectionSpy::new();
    for section in &sections {
        for element in &section.elements {
            reveals.watch_staggered(
                element.target.as_str(),
                element.effect,
                element.delay_ms,
            );
        }
        spy.add_section(format!("nav-{}", section.spec.id), section.bounds);
    }

    let mut model = PageModel::new();
    let mut resize = Debounce::new(Duration::from_millis(200));
    let mut scroll_y: f64 = 0.0;
    let mut loading_done = false;

    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;

    loop {
        let now = Instant::now();
        for command in stage.poll(now) {
            model.apply(command, now);
        }

        // The hero animations start once the loading screen has faded.
        if !loading_done
            && model
                .playback("loading-screen")
                .is_some_and(|p| p.progress(now, FADE_MS) >= 1.0)
        {
            loading_done = true;
            if let Some(engine) = pending_typewriter.take() {
                stage.set_typewriter("hero-tagline", engine, now);
            }
        }

        let term_size = terminal.size()?;
        let view_rows = f64::from(term_size.height.saturating_sub(2));
        let max_scroll = (total_rows - view_rows).max(0.0);

        if resize.fire(now) {
            // Terminal rows changed: keep the window inside the page.
            scroll_y = scroll_y.min(max_scroll);
        }

        if loading_done {
            let viewport = Viewport::new(scroll_y, view_rows);
            for command in reveals.sweep(|target| {
                element_bounds(&sections, target).map(|b| b.visible_fraction(&viewport))
            }) {
                model.apply(command, now);
            }
            for command in spy.update(&viewport) {
                model.apply(command, now);
            }
        }

        terminal.draw(|frame| {
            let area = frame.area();
            let buf = frame.buffer_mut();
            if loading_done {
                draw_page(buf, area, spec, &sections, &model, scroll_y, now);
            } else {
                draw_loading(buf, area, &model, now);
            }
        })?;

        // Wake up for the next engine deadline, capped so in-flight
        // entrance effects keep animating smoothly.
        let timeout = stage
            .next_due()
            .map_or(Duration::from_millis(50), |due| {
                due.saturating_duration_since(now)
            })
            .min(Duration::from_millis(50));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Up => scroll_y = (scroll_y - SCROLL_STEP).max(0.0),
                    KeyCode::Down => scroll_y = (scroll_y + SCROLL_STEP).min(max_scroll),
                    KeyCode::PageUp => scroll_y = (scroll_y - view_rows).max(0.0),
                    KeyCode::PageDown => scroll_y = (scroll_y + view_rows).min(max_scroll),
                    KeyCode::Home => scroll_y = 0.0,
                    KeyCode::End => scroll_y = max_scroll,
                    _ => {}
                },
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollDown => {
                        scroll_y = (scroll_y + SCROLL_STEP).min(max_scroll);
                    }
                    MouseEventKind::ScrollUp => scroll_y = (scroll_y - SCROLL_STEP).max(0.0),
                    _ => {}
                },
                Event::Resize(_, _) => resize.poke(now),
                _ => {}
            }
        }
    }

    stage.stop();
    reveals.stop();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

/// Page-row bounds for a revealable element, `None` for unknown targets.
fn element_bounds(
    sections: &[SectionLayout],
    target: &str,
) -> Option<vitrine_protocol::Bounds> {
    sections
        .iter()
        .flat_map(|s| s.elements.iter())
        .find(|e| e.target == target)
        .map(|e| e.bounds)
}

fn draw_loading(buf: &mut Buffer, area: Rect, model: &PageModel, now: Instant) {
    let fade = model
        .playback("loading-screen")
        .map_or(0.0, |p| p.progress(now, FADE_MS));
    let style = if fade > 0.0 {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };

    let cy = area.height / 2;
    draw_str(buf, area, area.width.saturating_sub(12) / 2, cy.saturating_sub(1), "loading page", style);

    let bar_width = area.width.saturating_sub(4).min(40) as usize;
    let filled = (model.fraction("progress-bar") * bar_width as f64).round() as usize;
    let bar: String = "█".repeat(filled) + &"░".repeat(bar_width.saturating_sub(filled));
    draw_str(
        buf,
        area,
        area.width.saturating_sub(bar_width as u16) / 2,
        cy + 1,
        &bar,
        style.fg(Color::Cyan),
    );
}

fn draw_page(
    buf: &mut Buffer,
    area: Rect,
    spec: &PageSpec,
    sections: &[SectionLayout],
    model: &PageModel,
    scroll_y: f64,
    now: Instant,
) {
    // Header: one nav tab per section, the spy's pick highlighted.
    let mut x = 1u16;
    for section in sections {
        let label = format!(" {} ", section.spec.title);
        let is_active = model.active_nav() == Some(format!("nav-{}", section.spec.id).as_str());
        let style = if is_active {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray).bg(Color::DarkGray)
        };
        draw_str(buf, area, x, 0, &label, style);
        x = x.saturating_add(label.chars().count() as u16 + 1);
    }

    // Footer: key hints.
    let footer = " ↑↓/PgUp/PgDn scroll | Home/End jump | q quit ";
    draw_str(
        buf,
        area,
        0,
        area.height.saturating_sub(1),
        footer,
        Style::default().fg(Color::White).bg(Color::DarkGray),
    );

    let content = Rect::new(0, 1, area.width, area.height.saturating_sub(2));

    // Hero block sits above the first section and is always revealed.
    put_row(buf, content, scroll_y, 2.0, 4, &spec.name, Style::default().fg(Color::White).add_modifier(Modifier::BOLD));
    put_row(buf, content, scroll_y, 4.0, 4, &spec.headline, Style::default().fg(Color::Gray));
    let tagline = format!("{}▌", model.text("hero-tagline"));
    put_row(buf, content, scroll_y, 6.0, 4, &tagline, Style::default().fg(Color::Cyan));

    for section in sections {
        draw_section(buf, content, section, model, scroll_y, now);
    }
}

fn draw_section(
    buf: &mut Buffer,
    content: Rect,
    section: &SectionLayout,
    model: &PageModel,
    scroll_y: f64,
    now: Instant,
) {
    for element in &section.elements {
        let Some(playback) = model.playback(&element.target) else {
            continue; // not revealed yet: stays blank
        };
        let progress = playback.progress(now, effect_duration(playback.effect));
        let row = element.bounds.top;

        match playback.effect {
            EffectToken::FadeInUp => {
                let entering = progress < 1.0;
                if element.target.ends_with("-title") {
                    let style = if entering {
                        Style::default().fg(Color::DarkGray)
                    } else {
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                    };
                    put_row(buf, content, scroll_y, row, 2, &section.spec.title, style);
                    let rule = "─".repeat(section.spec.title.chars().count() + 2);
                    put_row(buf, content, scroll_y, row + 1.0, 2, &rule, Style::default().fg(Color::DarkGray));
                } else {
                    let style = if entering {
                        Style::default().fg(Color::DarkGray)
                    } else {
                        Style::default().fg(Color::White)
                    };
                    for (i, line) in section.spec.lines.iter().enumerate() {
                        put_row(buf, content, scroll_y, row + i as f64, 4, line, style);
                    }
                }
            }
            EffectToken::SlideInLeft => {
                let item_index = element
                    .target
                    .rsplit('-')
                    .next()
                    .and_then(|i| i.parse::<usize>().ok());
                if let Some(i) = item_index
                    && let Some(line) = section.spec.lines.get(i)
                {
                    let offset = ((1.0 - progress) * SLIDE_COLS) as u16;
                    let text = format!("▸ {line}");
                    put_row(buf, content, scroll_y, row, 4 + offset, &text, Style::default().fg(Color::White));
                }
            }
            EffectToken::GrowWidth => {
                let skill_index = element
                    .target
                    .rsplit('-')
                    .next()
                    .and_then(|i| i.parse::<usize>().ok());
                if let Some(i) = skill_index
                    && let Some(skill) = section.spec.skills.get(i)
                {
                    let track = 24usize;
                    let filled =
                        (skill.level * progress * track as f64).round() as usize;
                    let bar: String =
                        "█".repeat(filled) + &"░".repeat(track.saturating_sub(filled));
                    let label = format!("{:<12} {bar} {:>3.0}%", skill.name, skill.level * 100.0);
                    put_row(buf, content, scroll_y, row, 4, &label, Style::default().fg(Color::Green));
                }
            }
            EffectToken::FadeOut => {}
        }
    }
}

fn effect_duration(effect: EffectToken) -> f64 {
    match effect {
        EffectToken::GrowWidth => BAR_GROW_MS,
        EffectToken::FadeOut => FADE_MS,
        EffectToken::FadeInUp | EffectToken::SlideInLeft => EFFECT_MS,
    }
}

/// Draw `text` at a page row, translating through the scroll offset and
/// clipping to the content area.
fn put_row(
    buf: &mut Buffer,
    content: Rect,
    scroll_y: f64,
    page_row: f64,
    x: u16,
    text: &str,
    style: Style,
) {
    let screen_row = page_row - scroll_y;
    if screen_row < 0.0 || screen_row >= f64::from(content.height) {
        return;
    }
    draw_str(buf, content, x, screen_row as u16, text, style);
}

/// Write a string into the buffer at an area-relative position, clipped
/// to the area's right edge.
fn draw_str(buf: &mut Buffer, area: Rect, x: u16, y: u16, text: &str, style: Style) {
    if y >= area.height {
        return;
    }
    let mut col = area.x + x;
    let row = area.y + y;
    for ch in text.chars() {
        if col >= area.x + area.width {
            break;
        }
        buf[(col, row)].set_char(ch).set_style(style);
        col += 1;
    }
}
