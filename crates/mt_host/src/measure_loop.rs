use std::fmt::Display;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::Sender;
use log::{debug, info};
use mt_app::{Action, CursorSample, Effect, MeasureModel, Measurement, MeasurementSnapshot, PointI32};
use mt_capture::{ScreenSampler, ScreenSource};
use mt_detect::EdgeDetector;
use mt_settings::Settings;
use mt_ui::{OverlayStyle, build_measurement_overlay_render_list};

use crate::frame_clock::{Clock, FrameClock, SystemClock};
use crate::input::{InputEvent, InputQueue};
use crate::stats::FrameStats;
use crate::{FrameTarget, HostError};

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not measuring, or no pointer position yet.
    Idle,
    Rendered,
    /// The display could not be read; the previous frame stays on screen.
    CaptureSkipped,
    /// Capture and detection used up the frame budget; this frame is dropped.
    RenderSkipped,
    RenderFailed,
}

/// Capture → detect → reduce → render loop.
pub struct MeasureLoop<S: ScreenSource, T: FrameTarget, C: Clock = SystemClock> {
    settings: Arc<Settings>,
    model: MeasureModel,
    sampler: ScreenSampler<S>,
    detector: EdgeDetector,
    style: OverlayStyle,
    target: T,
    frames: FrameClock<C>,
    input: InputQueue,
    commits: Option<Sender<Measurement>>,
    pointer: Option<PointI32>,
    shutdown: bool,
    stats: FrameStats,
}

impl<S: ScreenSource, T: FrameTarget> MeasureLoop<S, T, SystemClock>
where
    T::Error: Display,
{
    pub fn new(settings: Arc<Settings>, source: S, target: T, input: InputQueue) -> Self {
        Self::with_clock(settings, source, target, input, SystemClock::new())
    }
}

impl<S: ScreenSource, T: FrameTarget, C: Clock> MeasureLoop<S, T, C>
where
    T::Error: Display,
{
    pub fn with_clock(
        settings: Arc<Settings>,
        source: S,
        target: T,
        input: InputQueue,
        clock: C,
    ) -> Self {
        let detection = &settings.detection;
        let detector = EdgeDetector::new(
            detection.strategy,
            detection.tolerance(),
            detection.reference,
            detection.axes,
        );

        Self {
            model: MeasureModel::with_multi_measurement(settings.multi_measurement),
            sampler: ScreenSampler::new(source, settings.capture_mode),
            detector,
            style: OverlayStyle::from_settings(&settings),
            target,
            frames: FrameClock::with_clock(settings.frame_duration(), clock),
            input,
            commits: None,
            pointer: None,
            shutdown: false,
            stats: FrameStats::default(),
            settings,
        }
    }

    /// Forward every committed measurement to `sink`.
    pub fn with_commit_sink(mut self, sink: Sender<Measurement>) -> Self {
        self.commits = Some(sink);
        self
    }

    pub fn model(&self) -> &MeasureModel {
        &self.model
    }

    pub fn snapshot(&self) -> MeasurementSnapshot {
        self.model.snapshot()
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn sampler(&self) -> &ScreenSampler<S> {
        &self.sampler
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown
    }

    /// Run one frame. Input is applied only here, at the start of the tick.
    pub fn tick(&mut self) -> TickOutcome {
        let started = self.frames.clock().now();
        for event in self.input.drain() {
            self.handle_event(event);
        }
        self.stats.ticks += 1;

        if !self.model.is_active() {
            return TickOutcome::Idle;
        }
        let Some(pointer) = self.pointer else {
            return TickOutcome::Idle;
        };

        match self.sample(pointer) {
            Ok(Some(measurement)) => {
                self.apply(Action::DetectionUpdated { measurement });
            }
            Ok(None) => self.apply(Action::DetectionLost),
            Err(e) => {
                debug!("capture skipped: {e}");
                self.stats.capture_failures += 1;
                return TickOutcome::CaptureSkipped;
            }
        }

        let spent = self.frames.clock().now().saturating_sub(started);
        if spent > self.frames.frame_duration() {
            debug!("capture and detection took {spent:?}, dropping this frame");
            self.stats.dropped_renders += 1;
            return TickOutcome::RenderSkipped;
        }

        match self.render_now() {
            Ok(()) => {
                self.stats.rendered += 1;
                TickOutcome::Rendered
            }
            Err(e) => {
                debug!("{e}");
                self.stats.render_failures += 1;
                TickOutcome::RenderFailed
            }
        }
    }

    /// Tick at the configured frame rate until `stop` is set or a shutdown event arrives.
    ///
    /// The capture handle is released before returning.
    pub fn run(&mut self, stop: &AtomicBool) -> FrameStats {
        info!(
            "measurement loop running at {} Hz",
            self.settings.target_frame_rate
        );
        self.frames.reset();

        while !stop.load(Ordering::Acquire) {
            let missed = self.frames.wait_for_next_tick();
            self.stats.missed_deadlines += u64::from(missed);

            self.tick();
            if self.shutdown {
                break;
            }
        }

        if self.model.is_active() {
            self.apply(Action::Deactivate);
        }
        self.sampler.stop();
        info!("measurement loop stopped: {}", self.stats);
        self.stats
    }

    /// Draw the current snapshot into the target.
    pub fn render_now(&mut self) -> Result<(), HostError> {
        let (width, height) = self.target.size();
        let snapshot = self.model.snapshot();

        self.target.begin_frame();
        if let Some(mut list) = build_measurement_overlay_render_list(
            &snapshot,
            (width as i32, height as i32),
            &self.style,
            &self.target,
        ) {
            list.execute(&mut self.target)
                .map_err(|e| HostError::Render(e.to_string()))?;
        }
        self.target
            .end_frame()
            .map_err(|e| HostError::Render(e.to_string()))
    }

    fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMoved { x, y } => self.pointer = Some(PointI32::new(x, y)),
            InputEvent::Activate => self.apply(Action::Activate),
            InputEvent::Deactivate => self.apply(Action::Deactivate),
            InputEvent::Lock => self.apply(Action::Lock),
            InputEvent::Reset => self.apply(Action::Reset),
            InputEvent::ToggleMultiMeasurement => self.apply(Action::ToggleMultiMeasurement),
            InputEvent::SetMultiMeasurement(enabled) => {
                self.apply(Action::SetMultiMeasurement { enabled })
            }
            InputEvent::Shutdown => {
                self.apply(Action::Deactivate);
                self.shutdown = true;
            }
        }
    }

    fn apply(&mut self, action: Action) {
        let effects = self.model.reduce(action);
        for effect in effects {
            self.execute(effect);
        }
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::StartCapture => {
                info!("measurement activated");
                if let Err(e) = self.sampler.start() {
                    // Retried before the next capture.
                    debug!("screen capture not started: {e}");
                }
            }
            Effect::StopCapture => {
                self.sampler.stop();
                info!("measurement deactivated: {}", self.stats);
            }
            Effect::MeasurementCommitted(m) => {
                self.stats.committed += 1;
                info!(
                    "measurement locked: {}x{} at ({}, {})",
                    m.width(),
                    m.height(),
                    m.bounds.left,
                    m.bounds.top
                );
                if let Some(sink) = &self.commits
                    && sink.send(m).is_err()
                {
                    debug!("commit receiver dropped");
                    self.commits = None;
                }
            }
            Effect::ClearOverlay => {
                self.target.begin_frame();
                if let Err(e) = self.target.end_frame() {
                    debug!("clearing overlay failed: {e}");
                }
            }
        }
    }

    /// Capture around the offset-adjusted pointer (kept on screen) and detect the surface under
    /// it.
    fn sample(&mut self, pointer: PointI32) -> Result<Option<Measurement>, HostError> {
        if !self.sampler.is_started() {
            self.sampler.start()?;
        }

        let offset = self.settings.cursor_offset_for(self.sampler.mode());
        let mut sample = CursorSample::new(pointer, offset).sample_point();
        // Near the right and bottom edges the offset pushes the sample off screen.
        if let Some(screen) = self.sampler.screen_bounds()
            && !screen.is_empty()
        {
            sample = screen.clamp_point(sample);
        }
        let radius = self.settings.sample_radius;
        let region = self.sampler.capture(sample, (radius, radius))?;

        Ok(self.detector.measure(
            &region.pixels,
            region.origin,
            sample,
            self.settings.detection.min_size,
        ))
    }
}
