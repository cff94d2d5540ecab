use std::fmt;

/// Counters accumulated by the measurement loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub ticks: u64,
    pub rendered: u64,
    /// Ticks skipped because the display could not be read.
    pub capture_failures: u64,
    /// Renders dropped because capture and detection used up the frame budget.
    pub dropped_renders: u64,
    pub render_failures: u64,
    /// Deadlines the frame clock skipped after overruns.
    pub missed_deadlines: u64,
    pub committed: u64,
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ticks, {} rendered, {} capture failures, {} dropped, {} render failures, \
             {} missed deadlines, {} committed",
            self.ticks,
            self.rendered,
            self.capture_failures,
            self.dropped_renders,
            self.render_failures,
            self.missed_deadlines,
            self.committed
        )
    }
}
