//! Offline driver for the measurement engine.
//!
//! A screenshot stands in for the display: the pointer is moved through the requested positions,
//! the loop measures at each, and the resulting overlay can be written out as a PNG.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use image::{RgbaImage, imageops};
use mt_app::Measurement;
use mt_capture::{CaptureMode, ImageScreen};
use mt_host::{FrameStats, InputEvent, MeasureLoop, input_channel};
use mt_settings::Settings;
use mt_skia::{LabelFont, PixmapBackend};
use serde::Serialize;

pub mod cli;

pub use cli::{Cli, PointerStep};

/// One measurement as reported to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementReport {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
    pub label: String,
    pub locked: bool,
    pub degenerate: bool,
}

impl MeasurementReport {
    fn new(m: &Measurement, locked: bool, settings: &Settings) -> Self {
        Self {
            left: m.bounds.left,
            top: m.bounds.top,
            width: m.width(),
            height: m.height(),
            label: settings
                .units
                .format_label(m.width(), m.height(), m.axes, settings.dpi),
            locked,
            degenerate: m.is_degenerate(),
        }
    }
}

/// Result of a measuring session.
#[derive(Debug)]
pub struct Session {
    /// Locked measurements first, then the live one.
    pub measurements: Vec<MeasurementReport>,
    /// Measurements committed by lock actions, in order.
    pub committed: Vec<Measurement>,
    pub stats: FrameStats,
    /// Final overlay, straight-alpha RGBA at screenshot size.
    pub overlay: RgbaImage,
}

/// Resolve settings from an explicit file or the per-user default.
pub fn load_settings(path: Option<&Path>, frozen: bool) -> Result<Settings> {
    let mut settings = match path {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load(),
    };
    if frozen {
        settings.capture_mode = CaptureMode::Frozen;
    }
    Ok(settings)
}

/// Font for label text: the configured file, else a system face.
///
/// Returns `None` when neither loads; labels then keep their boxes but carry no text.
pub fn label_font(settings: &Settings) -> Option<LabelFont> {
    if let Some(path) = &settings.style.font_path {
        match LabelFont::from_file(path) {
            Ok(font) => return Some(font),
            Err(e) => log::warn!("{e}, falling back to a system font"),
        }
    }
    let font = LabelFont::system();
    if font.is_none() {
        log::warn!("no usable system font, labels will be drawn without text");
    }
    font
}

/// Measure `screenshot` at each pointer step.
pub fn measure(
    screenshot: RgbaImage,
    steps: &[PointerStep],
    frames_per_point: u32,
    settings: Settings,
) -> Result<Session> {
    let (width, height) = screenshot.dimensions();
    let mut target = PixmapBackend::new(width, height)?;
    if let Some(font) = label_font(&settings) {
        target = target.with_font(font);
    }
    let screen = ImageScreen::new(screenshot);
    let settings = Arc::new(settings);

    let (input, queue) = input_channel();
    let (commit_tx, commit_rx) = crossbeam_channel::unbounded();
    let mut engine = MeasureLoop::new(Arc::clone(&settings), screen, target, queue)
        .with_commit_sink(commit_tx);

    input.send(InputEvent::Activate);
    for step in steps {
        input.pointer_moved(step.x, step.y);
        for _ in 0..frames_per_point.max(1) {
            let outcome = engine.tick();
            log::debug!("({}, {}): {outcome:?}", step.x, step.y);
        }
        if step.lock {
            // Applied at the start of the next tick.
            input.send(InputEvent::Lock);
            engine.tick();
        }
    }

    let snapshot = engine.snapshot();
    engine.render_now()?;

    let measurements = snapshot
        .measurements()
        .map(|(m, is_live)| MeasurementReport::new(m, !is_live, &settings))
        .collect();

    let overlay = RgbaImage::from_raw(width, height, engine.target().to_rgba_bytes())
        .context("overlay buffer does not match the screenshot size")?;

    Ok(Session {
        measurements,
        committed: commit_rx.try_iter().collect(),
        stats: engine.stats(),
        overlay,
    })
}

/// Screenshot with the overlay blended on top.
pub fn composite(screenshot: &RgbaImage, overlay: &RgbaImage) -> RgbaImage {
    let mut out = screenshot.clone();
    imageops::overlay(&mut out, overlay, 0, 0);
    out
}

/// Run the command line flow.
pub fn run(cli: &Cli) -> Result<Session> {
    let settings = load_settings(cli.settings.as_deref(), cli.frozen)?;
    let screenshot = image::open(&cli.screenshot)
        .with_context(|| format!("failed to open screenshot {}", cli.screenshot.display()))?
        .to_rgba8();

    let session = measure(
        screenshot.clone(),
        &cli.points,
        cli.frames_per_point,
        settings,
    )?;
    log::info!("{}", session.stats);

    if let Some(output) = &cli.output {
        let image = if cli.overlay_only {
            session.overlay.clone()
        } else {
            composite(&screenshot, &session.overlay)
        };
        image
            .save(output)
            .with_context(|| format!("failed to write {}", output.display()))?;
    }

    Ok(session)
}
