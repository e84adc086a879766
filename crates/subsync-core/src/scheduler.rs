//! Per-frame orchestration.
//!
//! While playback runs, every frame evaluates, in this order: the segment
//! trap, the active interval, the highlight transition and the sentence loop.
//! The trap short-circuits everything after it. Each tick requests the next
//! frame before returning, so the only way out of the loop is `stop`.

use crate::clock::MediaClock;
use crate::config::TimingConfig;
use crate::frame::{FrameId, FrameRequester};
use crate::locator;
use crate::loop_controller::{self, LoopDecision};
use crate::render::{HighlightRenderer, RenderTarget};
use crate::state::{DebounceKind, SchedulerState};
use crate::subtitle::SubtitleTrack;
use std::time::Instant;
use tracing::{debug, info, trace};

/// What a tick did to playback, for the owner's "is playing" flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// The segment trap paused the clock.
    Stopped,
    /// The loop controller paused the clock after its last repeat.
    Halted,
}

#[derive(Debug)]
pub struct FrameScheduler<F> {
    frames: F,
    pending: Option<FrameId>,
    state: SchedulerState,
    timing: TimingConfig,
    ticks: u64,
}

impl<F: FrameRequester> FrameScheduler<F> {
    pub fn new(frames: F, state: SchedulerState, timing: TimingConfig) -> Self {
        Self {
            frames,
            pending: None,
            state,
            timing,
            ticks: 0,
        }
    }

    /// Schedule the first frame. Returns false if already running.
    pub fn start(&mut self) -> bool {
        if self.pending.is_some() {
            trace!("Frame scheduler already running");
            return false;
        }
        self.pending = Some(self.frames.request_frame());
        debug!("Frame scheduler started");
        true
    }

    /// Cancel the pending frame. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(id) = self.pending.take() {
            self.frames.cancel_frame(id);
            debug!(ticks = self.ticks, "Frame scheduler stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Run one frame. A stopped scheduler ignores stray ticks.
    pub fn tick<C, R>(
        &mut self,
        now: Instant,
        clock: Option<&mut C>,
        track: &SubtitleTrack,
        renderer: &mut HighlightRenderer<R>,
    ) -> TickOutcome
    where
        C: MediaClock + ?Sized,
        R: RenderTarget,
    {
        if self.pending.take().is_none() {
            return TickOutcome::Continue;
        }
        self.ticks += 1;
        let outcome = match clock {
            Some(clock) => self.evaluate(now, clock, track, renderer),
            None => TickOutcome::Continue,
        };
        self.pending = Some(self.frames.request_frame());
        outcome
    }

    fn evaluate<C, R>(
        &mut self,
        now: Instant,
        clock: &mut C,
        track: &SubtitleTrack,
        renderer: &mut HighlightRenderer<R>,
    ) -> TickOutcome
    where
        C: MediaClock + ?Sized,
        R: RenderTarget,
    {
        self.state.release_expired(now);
        let t = clock.current_time();

        if self.state.trap.should_fire(t, self.timing.trap_epsilon_secs) {
            info!(
                time = t,
                end_time = ?self.state.trap.end_time(),
                "Segment end reached; pausing"
            );
            clock.pause();
            self.state.trap.disarm();
            return TickOutcome::Stopped;
        }

        let active = locator::locate(track.intervals(), t);
        let active_id = active.map(|interval| &interval.id);
        if active_id != self.state.last_highlighted_id.as_ref() {
            debug!(
                from = ?self.state.last_highlighted_id.as_ref().map(|id| id.as_str()),
                to = ?active_id.map(|id| id.as_str()),
                time = t,
                "Active subtitle changed"
            );
            self.state.last_highlighted_id = active_id.cloned();
            renderer.apply_active(active_id);
            self.state.current_repeat_count = 0;
        }

        let Some(interval) = active else {
            return TickOutcome::Continue;
        };
        if !self.state.policy.sentence_loop_active()
            || self.state.is_debouncing()
            || self.state.trap.is_armed()
            || clock.is_paused()
        {
            return TickOutcome::Continue;
        }
        match loop_controller::run(&mut self.state, clock, interval, t, now, &self.timing) {
            LoopDecision::Halt => TickOutcome::Halted,
            _ => TickOutcome::Continue,
        }
    }

    /// Early release of a rewind debounce once the clock confirms the seek.
    pub fn on_seek_completed(&mut self) {
        if self.timing.release_debounce_on_seeked
            && self.state.debounce_kind() == Some(DebounceKind::Rewind)
        {
            trace!("Seek completed; releasing rewind debounce early");
            self.state.release_debounce();
        }
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SchedulerState {
        &mut self.state
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    pub fn frames(&self) -> &F {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut F {
        &mut self.frames
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }
}
