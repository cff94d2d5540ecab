pub mod geometry;
pub mod measurement;

pub use geometry::{BoundingBox, PointI32};
pub use measurement::{
    CursorSample, DEGENERATE_MIN_SIZE, MeasureAxes, Measurement, MeasurementQuality,
};

/// High-level measurement phase.
///
/// `Locked` still tracks: the next detection after a lock starts a new live measurement, shown
/// alongside the locked set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Tracking,
    Locked,
}

/// Input actions (pure).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Tool activation.
    Activate,
    /// Tool deactivation. Clears every measurement.
    Deactivate,
    /// Explicit user reset. Clears every measurement and returns to idle; a later activation
    /// starts a fresh session.
    Reset,
    /// Freeze the live measurement into the locked set.
    Lock,
    ToggleMultiMeasurement,
    SetMultiMeasurement { enabled: bool },
    /// Latest detector result for this frame.
    DetectionUpdated { measurement: Measurement },
    /// The detector found nothing under the pointer this frame.
    DetectionLost,
}

/// Effects requested by the core (executed by the host).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Acquire the screen capture handle.
    StartCapture,
    /// Release the screen capture handle.
    StopCapture,
    /// A measurement was locked; external collaborators may consume it.
    MeasurementCommitted(Measurement),
    /// Nothing is left to draw; the host should present an empty overlay.
    ClearOverlay,
}

/// Boxes owned by one activation of the tool.
#[derive(Debug, Default, Clone)]
struct MeasurementSession {
    locked: Vec<Measurement>,
    live: Option<Measurement>,
}

/// Read-only per-frame view of the model, handed to the overlay renderer.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MeasurementSnapshot {
    pub phase: Phase,
    pub live: Option<Measurement>,
    pub locked: Vec<Measurement>,
}

impl MeasurementSnapshot {
    pub fn is_empty(&self) -> bool {
        self.live.is_none() && self.locked.is_empty()
    }

    /// Locked measurements first, then the live one.
    ///
    /// A live measurement covering the same pixels as a locked one is left out; the locked entry
    /// already shows it.
    pub fn measurements(&self) -> impl Iterator<Item = (&Measurement, bool)> {
        let live = self
            .live
            .as_ref()
            .filter(|live| !self.locked.iter().any(|m| m.bounds == live.bounds));
        self.locked
            .iter()
            .map(|m| (m, false))
            .chain(live.map(|m| (m, true)))
    }
}

/// Measurement state machine.
///
/// Invalid transitions (locking with no live measurement, detections while idle, activating
/// twice) are no-ops and produce no effects.
#[derive(Debug)]
pub struct MeasureModel {
    session: Option<MeasurementSession>,
    multi_measurement: bool,
}

impl Default for MeasureModel {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasureModel {
    pub fn new() -> Self {
        Self {
            session: None,
            multi_measurement: true,
        }
    }

    pub fn with_multi_measurement(enabled: bool) -> Self {
        Self {
            session: None,
            multi_measurement: enabled,
        }
    }

    pub fn phase(&self) -> Phase {
        match &self.session {
            None => Phase::Idle,
            Some(s) if s.locked.is_empty() => Phase::Tracking,
            Some(_) => Phase::Locked,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn multi_measurement(&self) -> bool {
        self.multi_measurement
    }

    pub fn live(&self) -> Option<&Measurement> {
        self.session.as_ref().and_then(|s| s.live.as_ref())
    }

    pub fn locked(&self) -> &[Measurement] {
        self.session
            .as_ref()
            .map(|s| s.locked.as_slice())
            .unwrap_or(&[])
    }

    pub fn snapshot(&self) -> MeasurementSnapshot {
        MeasurementSnapshot {
            phase: self.phase(),
            live: self.live().copied(),
            locked: self.locked().to_vec(),
        }
    }

    pub fn reduce(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Activate => {
                if self.session.is_some() {
                    return Vec::new();
                }
                self.session = Some(MeasurementSession::default());
                vec![Effect::StartCapture]
            }

            Action::Deactivate => {
                if self.session.take().is_none() {
                    return Vec::new();
                }
                vec![Effect::StopCapture, Effect::ClearOverlay]
            }

            Action::Reset => {
                if self.session.take().is_none() {
                    return Vec::new();
                }
                // Idle never holds a capture handle.
                vec![Effect::StopCapture, Effect::ClearOverlay]
            }

            Action::Lock => {
                let multi = self.multi_measurement;
                let Some(session) = self.session.as_mut() else {
                    return Vec::new();
                };
                // The next detection starts a new live measurement.
                let Some(live) = session.live.take() else {
                    return Vec::new();
                };

                if !multi {
                    session.locked.clear();
                }
                session.locked.push(live);
                vec![Effect::MeasurementCommitted(live)]
            }

            Action::ToggleMultiMeasurement => {
                self.multi_measurement = !self.multi_measurement;
                Vec::new()
            }

            Action::SetMultiMeasurement { enabled } => {
                self.multi_measurement = enabled;
                Vec::new()
            }

            Action::DetectionUpdated { measurement } => {
                if let Some(session) = self.session.as_mut() {
                    session.live = Some(measurement);
                }
                Vec::new()
            }

            Action::DetectionLost => {
                if let Some(session) = self.session.as_mut() {
                    session.live = None;
                }
                Vec::new()
            }
        }
    }
}
