//! Mutable per-session scheduler state.

use crate::policy::PlaybackPolicy;
use crate::subtitle::SubtitleId;
use crate::trap::SegmentTrap;
use std::time::{Duration, Instant};
use tracing::trace;

/// Why the loop controller is currently held off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceKind {
    /// A rewind seek is assumed to be in flight.
    Rewind,
    /// The loop budget was just exhausted; hold until the tail has passed.
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SeekDebounce {
    kind: DebounceKind,
    release_at: Instant,
}

#[derive(Debug, Clone, Default)]
pub struct SchedulerState {
    pub last_highlighted_id: Option<SubtitleId>,
    pub current_repeat_count: u32,
    pub trap: SegmentTrap,
    pub policy: PlaybackPolicy,
    debounce: Option<SeekDebounce>,
}

impl SchedulerState {
    pub fn new(policy: PlaybackPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn arm_debounce(&mut self, kind: DebounceKind, now: Instant, delay: Duration) {
        self.debounce = Some(SeekDebounce {
            kind,
            release_at: now + delay,
        });
    }

    /// Drop an expired debounce. Returns true if one was released.
    pub fn release_expired(&mut self, now: Instant) -> bool {
        match self.debounce {
            Some(debounce) if now >= debounce.release_at => {
                trace!(kind = ?debounce.kind, "Seek debounce released");
                self.debounce = None;
                true
            }
            _ => false,
        }
    }

    pub fn release_debounce(&mut self) {
        self.debounce = None;
    }

    pub fn is_debouncing(&self) -> bool {
        self.debounce.is_some()
    }

    pub fn debounce_kind(&self) -> Option<DebounceKind> {
        self.debounce.map(|d| d.kind)
    }

    /// Forget loop progress, e.g. after a user jump.
    pub fn reset_loop(&mut self) {
        self.current_repeat_count = 0;
        self.debounce = None;
    }

    /// Forget everything tied to the playback position. The policy stays.
    pub fn reset_position(&mut self) {
        self.last_highlighted_id = None;
        self.trap.disarm();
        self.reset_loop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debounce_releases_only_after_deadline() {
        let mut state = SchedulerState::default();
        let start = Instant::now();
        state.arm_debounce(DebounceKind::Rewind, start, Duration::from_millis(300));

        assert!(!state.release_expired(start + Duration::from_millis(299)));
        assert_eq!(state.debounce_kind(), Some(DebounceKind::Rewind));
        assert!(state.release_expired(start + Duration::from_millis(300)));
        assert!(!state.is_debouncing());
    }

    #[test]
    fn reset_position_keeps_policy() {
        let mut state = SchedulerState::new(PlaybackPolicy {
            loop_count: 4,
            ..PlaybackPolicy::default()
        });
        state.last_highlighted_id = Some(SubtitleId::from("a"));
        state.current_repeat_count = 3;
        state.trap.arm(5.0);
        state.arm_debounce(DebounceKind::Hold, Instant::now(), Duration::from_millis(500));

        state.reset_position();

        assert_eq!(state.last_highlighted_id, None);
        assert_eq!(state.current_repeat_count, 0);
        assert!(!state.trap.is_armed());
        assert!(!state.is_debouncing());
        assert_eq!(state.policy.loop_count, 4);
    }
}
