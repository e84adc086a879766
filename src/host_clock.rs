use crate::audio_clock::RodioClock;
use anyhow::Result;
use std::time::Duration;
use subsync_core::clock::{ClockEvent, ManualClock, MediaClock};

/// Whichever clock the host is running: real audio, or a silent clock
/// advanced by wall time when no audio file was given.
pub enum HostClock {
    Audio(RodioClock),
    Silent(ManualClock),
}

impl HostClock {
    /// Advance by `elapsed` where needed and collect edge events.
    pub fn poll(&mut self, elapsed: Duration) -> Vec<ClockEvent> {
        match self {
            HostClock::Audio(clock) => clock.poll_events(),
            HostClock::Silent(clock) => clock.advance(elapsed.as_secs_f64()).into_iter().collect(),
        }
    }

    fn inner(&self) -> &dyn MediaClock {
        match self {
            HostClock::Audio(clock) => clock,
            HostClock::Silent(clock) => clock,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn MediaClock {
        match self {
            HostClock::Audio(clock) => clock,
            HostClock::Silent(clock) => clock,
        }
    }
}

impl MediaClock for HostClock {
    fn current_time(&self) -> f64 {
        self.inner().current_time()
    }

    fn duration(&self) -> f64 {
        self.inner().duration()
    }

    fn is_paused(&self) -> bool {
        self.inner().is_paused()
    }

    fn play(&mut self) -> Result<()> {
        self.inner_mut().play()
    }

    fn pause(&mut self) {
        self.inner_mut().pause()
    }

    fn seek(&mut self, t: f64) {
        self.inner_mut().seek(t)
    }

    fn playback_rate(&self) -> f32 {
        self.inner().playback_rate()
    }

    fn set_playback_rate(&mut self, rate: f32) {
        self.inner_mut().set_playback_rate(rate)
    }

    fn muted(&self) -> bool {
        self.inner().muted()
    }

    fn set_muted(&mut self, muted: bool) {
        self.inner_mut().set_muted(muted)
    }
}
