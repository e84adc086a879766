//! Sentence-repeat loop controller.
//!
//! Near the end of the active sentence it decides whether to rewind to the
//! sentence start, hand over to the next sentence, or pause playback.

use crate::clock::MediaClock;
use crate::config::TimingConfig;
use crate::policy::PlaybackPolicy;
use crate::state::{DebounceKind, SchedulerState};
use crate::subtitle::SubtitleInterval;
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoopDecision {
    /// Not close enough to the sentence end.
    Idle,
    /// Seek back to `to` for another play.
    Rewind { to: f64 },
    /// Budget exhausted, continue into the next sentence.
    Advance,
    /// Budget exhausted, pause playback.
    Halt,
}

/// Pure decision for the current tick.
pub fn decide(
    interval: &SubtitleInterval,
    t: f64,
    repeat_count: u32,
    policy: &PlaybackPolicy,
    guard_secs: f64,
) -> LoopDecision {
    if t < interval.end_time - guard_secs {
        return LoopDecision::Idle;
    }
    let has_budget = match policy.max_repeats() {
        None => true,
        Some(max) => repeat_count.saturating_add(1) < max,
    };
    if has_budget {
        LoopDecision::Rewind {
            to: interval.start_time,
        }
    } else if policy.auto_advance {
        LoopDecision::Advance
    } else {
        LoopDecision::Halt
    }
}

/// Decide and apply the side effects on state and clock.
pub fn run<C: MediaClock + ?Sized>(
    state: &mut SchedulerState,
    clock: &mut C,
    interval: &SubtitleInterval,
    t: f64,
    now: Instant,
    timing: &TimingConfig,
) -> LoopDecision {
    let decision = decide(
        interval,
        t,
        state.current_repeat_count,
        &state.policy,
        timing.loop_guard_secs,
    );
    match decision {
        LoopDecision::Idle => {}
        LoopDecision::Rewind { to } => {
            state.arm_debounce(DebounceKind::Rewind, now, timing.rewind_debounce);
            state.current_repeat_count += 1;
            debug!(
                id = %interval.id,
                repeat = state.current_repeat_count,
                to,
                "Rewinding sentence"
            );
            clock.seek(to);
        }
        LoopDecision::Advance | LoopDecision::Halt => {
            state.arm_debounce(DebounceKind::Hold, now, timing.halt_debounce);
            state.current_repeat_count = 0;
            if decision == LoopDecision::Halt {
                debug!(id = %interval.id, "Loop budget exhausted; pausing");
                clock.pause();
            } else {
                debug!(id = %interval.id, "Loop budget exhausted; advancing");
            }
        }
    }
    decision
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::time::Duration;

    fn sentence() -> SubtitleInterval {
        SubtitleInterval::new(1u64, 4.0, 8.0, "Loop me", "")
    }

    fn policy(loop_count: u32, auto_advance: bool) -> PlaybackPolicy {
        PlaybackPolicy {
            loop_count,
            auto_advance,
            ..PlaybackPolicy::default()
        }
    }

    #[test]
    fn idle_before_guard_window() {
        let decision = decide(&sentence(), 7.8, 0, &policy(2, true), 0.15);
        assert_eq!(decision, LoopDecision::Idle);
    }

    #[test]
    fn rewinds_until_budget_is_spent() {
        let p = policy(3, false);
        assert_eq!(
            decide(&sentence(), 7.9, 0, &p, 0.15),
            LoopDecision::Rewind { to: 4.0 }
        );
        assert_eq!(
            decide(&sentence(), 7.9, 1, &p, 0.15),
            LoopDecision::Rewind { to: 4.0 }
        );
        assert_eq!(decide(&sentence(), 7.9, 2, &p, 0.15), LoopDecision::Halt);
        assert_eq!(
            decide(&sentence(), 7.9, 2, &policy(3, true), 0.15),
            LoopDecision::Advance
        );
    }

    #[test]
    fn single_play_never_rewinds() {
        assert_eq!(
            decide(&sentence(), 7.9, 0, &policy(1, true), 0.15),
            LoopDecision::Advance
        );
    }

    #[test]
    fn zero_count_always_rewinds() {
        let p = policy(0, false);
        for repeat in [0, 1, 50, u32::MAX - 1] {
            assert_eq!(
                decide(&sentence(), 7.95, repeat, &p, 0.15),
                LoopDecision::Rewind { to: 4.0 }
            );
        }
    }

    #[test]
    fn run_applies_rewind_and_halt_effects() {
        let timing = TimingConfig::default();
        let mut state = SchedulerState::new(policy(2, false));
        let mut clock = ManualClock::new(20.0);
        let now = Instant::now();

        let first = run(&mut state, &mut clock, &sentence(), 7.9, now, &timing);
        assert_eq!(first, LoopDecision::Rewind { to: 4.0 });
        assert_eq!(state.current_repeat_count, 1);
        assert_eq!(state.debounce_kind(), Some(DebounceKind::Rewind));
        assert_eq!(clock.seeks(), &[4.0]);

        let later = now + Duration::from_millis(300);
        state.release_expired(later);
        let second = run(&mut state, &mut clock, &sentence(), 7.9, later, &timing);
        assert_eq!(second, LoopDecision::Halt);
        assert_eq!(state.current_repeat_count, 0);
        assert_eq!(state.debounce_kind(), Some(DebounceKind::Hold));
        assert_eq!(clock.pause_calls(), 1);
    }
}
