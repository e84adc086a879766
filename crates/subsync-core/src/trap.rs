//! One-shot practice brake.

use tracing::{debug, warn};

/// Stops playback at a precise end time despite clock jitter.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SegmentTrap {
    end_time: Option<f64>,
}

impl SegmentTrap {
    /// Non-finite end times are refused and leave the trap unchanged.
    pub fn arm(&mut self, end_time: f64) {
        if !end_time.is_finite() {
            warn!(end_time, "Refusing to arm segment trap");
            return;
        }
        debug!(end_time, "Arming segment trap");
        self.end_time = Some(end_time);
    }

    pub fn disarm(&mut self) {
        if self.end_time.take().is_some() {
            debug!("Segment trap disarmed");
        }
    }

    pub fn is_armed(&self) -> bool {
        self.end_time.is_some()
    }

    pub fn end_time(&self) -> Option<f64> {
        self.end_time
    }

    /// True once `t` is within `epsilon` of the end, or past it.
    pub fn should_fire(&self, t: f64, epsilon: f64) -> bool {
        match self.end_time {
            Some(end) => t >= end - epsilon,
            None => false,
        }
    }
}
