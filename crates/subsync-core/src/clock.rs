//! Media clock port.
//!
//! The engine never owns real media; it drives whatever implements
//! `MediaClock` and reacts to the edge events the host forwards.

use anyhow::{Result, bail};

/// Edge events a host forwards from its media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    Ended,
    SeekCompleted,
}

pub trait MediaClock {
    /// Current position in seconds.
    fn current_time(&self) -> f64;
    /// Total length in seconds; non-finite while unknown.
    fn duration(&self) -> f64;
    fn is_paused(&self) -> bool;
    /// Start or resume playback. May be rejected by the host.
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    fn seek(&mut self, t: f64);
    fn playback_rate(&self) -> f32;
    fn set_playback_rate(&mut self, rate: f32);
    fn muted(&self) -> bool;
    fn set_muted(&mut self, muted: bool);
}

/// Clamp a seek target into `[0, duration]`. Non-finite targets map to 0 and
/// an unknown duration only bounds from below.
pub fn clamp_seek(t: f64, duration: f64) -> f64 {
    if !t.is_finite() {
        return 0.0;
    }
    let t = t.max(0.0);
    if duration.is_finite() && duration >= 0.0 {
        t.min(duration)
    } else {
        t
    }
}

/// Deterministic clock driven by explicit `advance` calls.
///
/// Used by tests and by the host binary when no audio file is given, in which
/// case the host advances it by wall-clock time every frame.
#[derive(Debug, Clone)]
pub struct ManualClock {
    time: f64,
    duration: f64,
    paused: bool,
    rate: f32,
    muted: bool,
    reject_play: bool,
    play_calls: usize,
    pause_calls: usize,
    seeks: Vec<f64>,
}

impl ManualClock {
    pub fn new(duration: f64) -> Self {
        Self {
            time: 0.0,
            duration,
            paused: true,
            rate: 1.0,
            muted: false,
            reject_play: false,
            play_calls: 0,
            pause_calls: 0,
            seeks: Vec::new(),
        }
    }

    /// Make subsequent `play` calls fail, like a blocked autoplay.
    pub fn reject_play(&mut self, reject: bool) {
        self.reject_play = reject;
    }

    /// Move time forward by `dt` seconds scaled by the playback rate.
    /// Returns `Ended` once, when the clock reaches the media end.
    pub fn advance(&mut self, dt: f64) -> Option<ClockEvent> {
        if self.paused || !dt.is_finite() || dt <= 0.0 {
            return None;
        }
        self.time += dt * f64::from(self.rate);
        if self.duration.is_finite() && self.time >= self.duration {
            self.time = self.duration;
            self.paused = true;
            return Some(ClockEvent::Ended);
        }
        None
    }

    /// Jump the position without recording a seek, e.g. to model jitter.
    pub fn set_time(&mut self, t: f64) {
        self.time = t;
    }

    pub fn play_calls(&self) -> usize {
        self.play_calls
    }

    pub fn pause_calls(&self) -> usize {
        self.pause_calls
    }

    /// Every seek target received, after clamping.
    pub fn seeks(&self) -> &[f64] {
        &self.seeks
    }
}

impl MediaClock for ManualClock {
    fn current_time(&self) -> f64 {
        self.time
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn play(&mut self) -> Result<()> {
        self.play_calls += 1;
        if self.reject_play {
            bail!("playback was rejected by the media host");
        }
        if self.duration.is_finite() && self.time >= self.duration {
            self.time = 0.0;
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.pause_calls += 1;
        self.paused = true;
    }

    fn seek(&mut self, t: f64) {
        let target = clamp_seek(t, self.duration);
        self.seeks.push(target);
        self.time = target;
    }

    fn playback_rate(&self) -> f32 {
        self.rate
    }

    fn set_playback_rate(&mut self, rate: f32) {
        self.rate = rate;
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_seek_bounds_targets() {
        assert_eq!(clamp_seek(-3.0, 60.0), 0.0);
        assert_eq!(clamp_seek(75.0, 60.0), 60.0);
        assert_eq!(clamp_seek(12.5, 60.0), 12.5);
        assert_eq!(clamp_seek(f64::NAN, 60.0), 0.0);
        assert_eq!(clamp_seek(f64::INFINITY, 60.0), 0.0);
        assert_eq!(clamp_seek(75.0, f64::NAN), 75.0);
    }

    #[test]
    fn manual_clock_only_advances_while_playing() {
        let mut clock = ManualClock::new(10.0);
        assert_eq!(clock.advance(1.0), None);
        assert_eq!(clock.current_time(), 0.0);

        clock.play().unwrap();
        clock.set_playback_rate(2.0);
        clock.advance(1.5);
        assert!((clock.current_time() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn manual_clock_reports_end_once() {
        let mut clock = ManualClock::new(2.0);
        clock.play().unwrap();
        assert_eq!(clock.advance(5.0), Some(ClockEvent::Ended));
        assert!(clock.is_paused());
        assert_eq!(clock.current_time(), 2.0);
        assert_eq!(clock.advance(1.0), None);
    }

    #[test]
    fn rejected_play_leaves_clock_paused() {
        let mut clock = ManualClock::new(10.0);
        clock.reject_play(true);
        assert!(clock.play().is_err());
        assert!(clock.is_paused());
        assert_eq!(clock.play_calls(), 1);
    }

    #[test]
    fn seeks_are_clamped_and_recorded() {
        let mut clock = ManualClock::new(10.0);
        clock.seek(-1.0);
        clock.seek(4.0);
        clock.seek(40.0);
        assert_eq!(clock.seeks(), &[0.0, 4.0, 10.0]);
        assert_eq!(clock.current_time(), 10.0);
    }
}
