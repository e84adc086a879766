//! User-facing playback session.
//!
//! `Player` owns the media clock, the subtitle track, the highlight renderer
//! and the frame scheduler, and is the only place UI commands enter the
//! engine. The scheduler runs exactly while `is_playing` is set.

use crate::clock::{ClockEvent, MediaClock, clamp_seek};
use crate::config::EngineConfig;
use crate::frame::{FrameLoop, FrameRequester};
use crate::policy::{ClipLoopMode, PlaybackPolicy, PolicyPatch, PracticeMode};
use crate::render::{HighlightRenderer, RenderTarget};
use crate::scheduler::{FrameScheduler, TickOutcome};
use crate::state::SchedulerState;
use crate::subtitle::{SubtitleId, SubtitleTrack};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, warn};
use ts_rs::TS;

pub const MIN_PLAYBACK_RATE: f32 = 0.5;
pub const MAX_PLAYBACK_RATE: f32 = 2.0;
/// Rates offered by the speed menu.
pub const PLAYBACK_RATE_OPTIONS: [f32; 6] = [0.5, 0.75, 1.0, 1.25, 1.5, 2.0];

/// Entry points used by practice widgets (shadowing, recording).
pub trait PracticeHooks {
    /// Play `[start, end)` once and stop at `end`.
    fn request_segment_playback(&mut self, start: f64, end: f64);
    /// Stop playback, e.g. before the microphone opens.
    fn request_pause(&mut self);
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct PlayerSnapshot {
    pub has_clock: bool,
    pub is_playing: bool,
    pub current_time: f64,
    pub duration: Option<f64>,
    pub playback_rate: f32,
    pub muted: bool,
    pub subtitle_count: usize,
    pub active_id: Option<SubtitleId>,
    pub active_index: Option<usize>,
    pub active_lines: Vec<String>,
    pub repeat_count: u32,
    pub trap_end_time: Option<f64>,
    pub debouncing: bool,
    pub policy: PlaybackPolicy,
}

#[derive(Debug, Clone)]
pub enum PlayerCommand {
    GetSnapshot,
    Play,
    Pause,
    TogglePlayPause,
    Seek { time: f64 },
    JumpTo { time: f64 },
    PlaySegment { start: f64, end: f64 },
    PauseSegment,
    Reset,
    SetPolicy { policy: PlaybackPolicy },
    ApplyPolicy { patch: PolicyPatch },
    SetPlaybackRate { rate: f32 },
    SetMuted { muted: bool },
    ToggleMute,
    Clock { event: ClockEvent },
}

impl PlayerCommand {
    pub fn action(&self) -> &'static str {
        match self {
            Self::GetSnapshot => "player_get_snapshot",
            Self::Play => "player_play",
            Self::Pause => "player_pause",
            Self::TogglePlayPause => "player_toggle_play_pause",
            Self::Seek { .. } => "player_seek",
            Self::JumpTo { .. } => "player_jump_to",
            Self::PlaySegment { .. } => "player_play_segment",
            Self::PauseSegment => "player_pause_segment",
            Self::Reset => "player_reset",
            Self::SetPolicy { .. } => "player_set_policy",
            Self::ApplyPolicy { .. } => "player_apply_policy",
            Self::SetPlaybackRate { .. } => "player_set_playback_rate",
            Self::SetMuted { .. } => "player_set_muted",
            Self::ToggleMute => "player_toggle_mute",
            Self::Clock { event } => match event {
                ClockEvent::Ended => "player_clock_ended",
                ClockEvent::SeekCompleted => "player_clock_seek_completed",
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlayerEvent {
    pub action: &'static str,
    pub snapshot: PlayerSnapshot,
}

#[derive(Debug)]
pub struct Player<C, R, F> {
    clock: Option<C>,
    track: SubtitleTrack,
    renderer: HighlightRenderer<R>,
    scheduler: FrameScheduler<F>,
    is_playing: bool,
    playback_rate: f32,
    muted: bool,
}

impl<C, R, F> Player<C, R, F>
where
    C: MediaClock,
    R: RenderTarget,
    F: FrameRequester,
{
    pub fn new(track: SubtitleTrack, target: R, frames: F, config: &EngineConfig) -> Self {
        let state = SchedulerState::new(config.policy());
        Self {
            clock: None,
            track,
            renderer: HighlightRenderer::new(target),
            scheduler: FrameScheduler::new(frames, state, config.timing()),
            is_playing: false,
            playback_rate: clamp_rate(config.playback_rate),
            muted: config.muted,
        }
    }

    /// Attach a media clock, returning the previous one. The clock picks up
    /// the current rate and mute settings.
    pub fn attach_clock(&mut self, mut clock: C) -> Option<C> {
        clock.set_playback_rate(self.playback_rate);
        clock.set_muted(self.muted);
        let previous = self.detach_clock();
        info!(duration = clock.duration(), "Media clock attached");
        self.clock = Some(clock);
        previous
    }

    pub fn detach_clock(&mut self) -> Option<C> {
        let clock = self.clock.take()?;
        self.set_playing(false);
        self.scheduler.state_mut().trap.disarm();
        debug!("Media clock detached");
        Some(clock)
    }

    pub fn play(&mut self) {
        let Some(clock) = self.clock.as_mut() else {
            debug!("Play ignored: no media clock");
            return;
        };
        match clock.play() {
            Ok(()) => {
                info!(time = clock.current_time(), "Playback started");
                self.set_playing(true);
            }
            Err(err) => {
                warn!("Playback rejected: {err:#}");
                self.set_playing(false);
            }
        }
    }

    /// Pause from any source. Always disarms the segment trap.
    pub fn pause(&mut self) {
        self.scheduler.state_mut().trap.disarm();
        if let Some(clock) = self.clock.as_mut() {
            clock.pause();
            info!(time = clock.current_time(), "Playback paused");
        }
        self.set_playing(false);
    }

    pub fn toggle_play_pause(&mut self) {
        if self.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// User seek, e.g. dragging the progress bar.
    pub fn seek(&mut self, time: f64) {
        self.scheduler.state_mut().trap.disarm();
        let Some(clock) = self.clock.as_mut() else {
            return;
        };
        let target = clamp_seek(time, clock.duration());
        debug!(requested = time, target, "Seeking");
        clock.seek(target);
    }

    /// Click on a subtitle timestamp: jump there and play.
    pub fn jump_to(&mut self, time: f64) {
        self.scheduler.state_mut().trap.disarm();
        let Some(clock) = self.clock.as_mut() else {
            return;
        };
        self.scheduler.state_mut().reset_loop();
        let target = clamp_seek(time.max(0.0), clock.duration());
        info!(target, "Jumping to timestamp");
        clock.seek(target);
        self.play();
    }

    pub fn reset(&mut self) {
        info!("Resetting playback");
        self.set_playing(false);
        if let Some(clock) = self.clock.as_mut() {
            clock.pause();
            clock.seek(0.0);
        }
        let state = self.scheduler.state_mut();
        state.reset_position();
        state.policy.practice_mode = PracticeMode::None;
        self.renderer.clear();
    }

    pub fn set_policy(&mut self, policy: PlaybackPolicy) {
        debug!(?policy, "Replacing playback policy");
        self.scheduler.state_mut().policy = policy;
    }

    pub fn apply_policy_patch(&mut self, patch: PolicyPatch) {
        debug!(?patch, "Applying playback policy patch");
        self.scheduler.state_mut().policy.apply_patch(patch);
    }

    pub fn set_playback_rate(&mut self, rate: f32) {
        if !rate.is_finite() {
            warn!(rate, "Ignoring non-finite playback rate");
            return;
        }
        self.playback_rate = clamp_rate(rate);
        if let Some(clock) = self.clock.as_mut() {
            clock.set_playback_rate(self.playback_rate);
        }
        debug!(rate = self.playback_rate, "Playback rate set");
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if let Some(clock) = self.clock.as_mut() {
            clock.set_muted(muted);
        }
    }

    /// React to an edge event from the media host.
    pub fn handle_event(&mut self, event: ClockEvent) {
        match event {
            ClockEvent::Ended => self.on_ended(),
            ClockEvent::SeekCompleted => self.scheduler.on_seek_completed(),
        }
    }

    fn on_ended(&mut self) {
        self.scheduler.stop();
        self.scheduler.state_mut().trap.disarm();
        let loop_clip = self.scheduler.state().policy.clip_loop_mode == ClipLoopMode::LoopWholeClip;
        let Some(clock) = self.clock.as_mut().filter(|_| loop_clip) else {
            info!("Reached end of media");
            self.set_playing(false);
            return;
        };
        info!("Reached end of media; looping clip");
        clock.seek(0.0);
        self.scheduler.state_mut().reset_loop();
        self.play();
    }

    /// Run one scheduler frame and fold its outcome into `is_playing`.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        let outcome =
            self.scheduler
                .tick(now, self.clock.as_mut(), &self.track, &mut self.renderer);
        if outcome != TickOutcome::Continue {
            self.set_playing(false);
        }
        outcome
    }

    fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing;
        if playing {
            self.scheduler.start();
        } else {
            self.scheduler.stop();
        }
    }

    pub fn apply_command(&mut self, command: PlayerCommand) -> PlayerEvent {
        let action = command.action();
        match command {
            PlayerCommand::GetSnapshot => {}
            PlayerCommand::Play => self.play(),
            PlayerCommand::Pause => self.pause(),
            PlayerCommand::TogglePlayPause => self.toggle_play_pause(),
            PlayerCommand::Seek { time } => self.seek(time),
            PlayerCommand::JumpTo { time } => self.jump_to(time),
            PlayerCommand::PlaySegment { start, end } => self.request_segment_playback(start, end),
            PlayerCommand::PauseSegment => self.request_pause(),
            PlayerCommand::Reset => self.reset(),
            PlayerCommand::SetPolicy { policy } => self.set_policy(policy),
            PlayerCommand::ApplyPolicy { patch } => self.apply_policy_patch(patch),
            PlayerCommand::SetPlaybackRate { rate } => self.set_playback_rate(rate),
            PlayerCommand::SetMuted { muted } => self.set_muted(muted),
            PlayerCommand::ToggleMute => self.set_muted(!self.muted),
            PlayerCommand::Clock { event } => self.handle_event(event),
        }
        PlayerEvent {
            action,
            snapshot: self.snapshot(),
        }
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        let state = self.scheduler.state();
        let active_index = state.last_highlighted_id.as_ref().and_then(|id| {
            self.track
                .intervals()
                .iter()
                .position(|interval| &interval.id == id)
        });
        let active_lines = active_index
            .and_then(|idx| self.track.intervals().get(idx))
            .map(|interval| {
                interval.display_lines(
                    state.policy.subtitle_display_mode,
                    state.policy.practice_mode,
                )
            })
            .unwrap_or_default();
        PlayerSnapshot {
            has_clock: self.clock.is_some(),
            is_playing: self.is_playing,
            current_time: self.current_time(),
            duration: self
                .clock
                .as_ref()
                .map(|clock| clock.duration())
                .filter(|d| d.is_finite()),
            playback_rate: self.playback_rate,
            muted: self.muted,
            subtitle_count: self.track.len(),
            active_id: state.last_highlighted_id.clone(),
            active_index,
            active_lines,
            repeat_count: state.current_repeat_count,
            trap_end_time: state.trap.end_time(),
            debouncing: state.is_debouncing(),
            policy: state.policy,
        }
    }

    pub fn current_time(&self) -> f64 {
        self.clock
            .as_ref()
            .map(|clock| clock.current_time())
            .unwrap_or(0.0)
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn policy(&self) -> &PlaybackPolicy {
        &self.scheduler.state().policy
    }

    pub fn track(&self) -> &SubtitleTrack {
        &self.track
    }

    pub fn clock(&self) -> Option<&C> {
        self.clock.as_ref()
    }

    pub fn clock_mut(&mut self) -> Option<&mut C> {
        self.clock.as_mut()
    }

    pub fn renderer(&self) -> &HighlightRenderer<R> {
        &self.renderer
    }

    pub fn scheduler(&self) -> &FrameScheduler<F> {
        &self.scheduler
    }
}

impl<C, R> Player<C, R, FrameLoop>
where
    C: MediaClock,
    R: RenderTarget,
{
    /// Host pump: tick if a frame is due.
    pub fn pump(&mut self, now: Instant) -> Option<TickOutcome> {
        self.scheduler.frames_mut().take_due()?;
        Some(self.tick(now))
    }
}

impl<C, R, F> PracticeHooks for Player<C, R, F>
where
    C: MediaClock,
    R: RenderTarget,
    F: FrameRequester,
{
    fn request_segment_playback(&mut self, start: f64, end: f64) {
        let Some(clock) = self.clock.as_mut() else {
            debug!("Segment playback ignored: no media clock");
            return;
        };
        if !start.is_finite() || !end.is_finite() {
            warn!(start, end, "Segment playback ignored: non-finite bounds");
            return;
        }
        info!(start, end, "Playing single segment");
        let target = clamp_seek(start, clock.duration());
        self.scheduler.state_mut().trap.arm(end);
        clock.seek(target);
        match clock.play() {
            Ok(()) => self.set_playing(true),
            Err(err) => {
                warn!("Segment playback rejected: {err:#}");
                self.scheduler.state_mut().trap.disarm();
                self.set_playing(false);
            }
        }
    }

    fn request_pause(&mut self) {
        self.pause();
    }
}

fn clamp_rate(rate: f32) -> f32 {
    if rate.is_finite() {
        rate.clamp(MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::policy::SentenceMode;
    use crate::render::RowTable;
    use crate::subtitle::SubtitleInterval;
    use std::time::Duration;

    type TestPlayer = Player<ManualClock, RowTable, FrameLoop>;

    const FRAME: Duration = Duration::from_millis(16);

    fn build_test_player(ranges: &[(f64, f64)], duration: f64) -> TestPlayer {
        let track = SubtitleTrack::new(
            ranges
                .iter()
                .enumerate()
                .map(|(idx, (start, end))| {
                    SubtitleInterval::new(
                        idx as u64,
                        *start,
                        *end,
                        format!("Line {{{{w|w{idx}|{idx}}}}}"),
                        format!("第{idx}行"),
                    )
                })
                .collect(),
        )
        .unwrap();
        let target = RowTable::from_track(&track);
        let mut player = Player::new(track, target, FrameLoop::new(), &EngineConfig::default());
        player.attach_clock(ManualClock::new(duration));
        player
    }

    /// Advance the clock one frame and pump. Forwards an end event like a
    /// host would.
    fn run_frames(player: &mut TestPlayer, now: &mut Instant, frames: usize) {
        for _ in 0..frames {
            *now += FRAME;
            let ended = player
                .clock_mut()
                .and_then(|clock| clock.advance(FRAME.as_secs_f64()));
            player.pump(*now);
            if let Some(event) = ended {
                player.handle_event(event);
            }
        }
    }

    #[test]
    fn commands_without_clock_are_safe() {
        let mut player = build_test_player(&[(0.0, 2.0)], 10.0);
        player.detach_clock();

        player.play();
        player.seek(3.0);
        player.jump_to(1.0);
        player.request_segment_playback(0.0, 1.0);
        player.reset();

        let snapshot = player.snapshot();
        assert!(!snapshot.has_clock);
        assert!(!snapshot.is_playing);
        assert_eq!(snapshot.trap_end_time, None);
        assert_eq!(player.tick(Instant::now()), TickOutcome::Continue);
    }

    #[test]
    fn play_starts_scheduler_and_pause_stops_it() {
        let mut player = build_test_player(&[(0.0, 2.0)], 10.0);
        player.play();
        assert!(player.is_playing());
        assert!(player.scheduler().is_running());

        player.pause();
        assert!(!player.is_playing());
        assert!(!player.scheduler().is_running());
        assert!(player.clock().unwrap().is_paused());
    }

    #[test]
    fn rejected_autoplay_clears_playing_flag() {
        let mut player = build_test_player(&[(0.0, 2.0)], 10.0);
        player.clock_mut().unwrap().reject_play(true);

        player.toggle_play_pause();

        assert!(!player.is_playing());
        assert!(!player.scheduler().is_running());
        assert_eq!(player.clock().unwrap().play_calls(), 1);
    }

    #[test]
    fn seek_clamps_and_disarms_trap() {
        let mut player = build_test_player(&[(0.0, 2.0)], 10.0);
        player.request_segment_playback(0.0, 2.0);
        assert!(player.snapshot().trap_end_time.is_some());

        player.seek(25.0);
        assert_eq!(player.current_time(), 10.0);
        assert_eq!(player.snapshot().trap_end_time, None);

        player.seek(-4.0);
        assert_eq!(player.current_time(), 0.0);
    }

    #[test]
    fn segment_playback_stops_at_segment_end() {
        let mut player = build_test_player(&[(0.0, 2.0), (2.0, 4.0), (4.0, 6.0)], 10.0);
        let mut now = Instant::now();

        player.request_segment_playback(2.0, 4.0);
        assert!(player.is_playing());
        assert_eq!(player.clock().unwrap().seeks(), &[2.0]);

        run_frames(&mut player, &mut now, 300);

        let clock = player.clock().unwrap();
        assert!(clock.is_paused());
        assert_eq!(clock.pause_calls(), 1);
        assert!(clock.current_time() > 3.94 && clock.current_time() < 4.0);
        assert!(!player.is_playing());
        assert!(!player.scheduler().is_running());
        assert_eq!(player.snapshot().trap_end_time, None);
        assert_eq!(player.snapshot().active_id, Some(SubtitleId::from(1u64)));
    }

    #[test]
    fn rejected_segment_playback_disarms_trap() {
        let mut player = build_test_player(&[(0.0, 2.0)], 10.0);
        player.clock_mut().unwrap().reject_play(true);

        player.request_segment_playback(0.5, 1.5);

        assert_eq!(player.snapshot().trap_end_time, None);
        assert!(!player.is_playing());
    }

    #[test]
    fn non_finite_segment_bounds_are_ignored() {
        let mut player = build_test_player(&[(0.0, 2.0)], 10.0);

        player.request_segment_playback(0.0, f64::NAN);
        player.request_segment_playback(f64::INFINITY, 2.0);

        assert_eq!(player.snapshot().trap_end_time, None);
        assert!(!player.is_playing());
        assert!(player.clock().unwrap().seeks().is_empty());
        assert_eq!(player.clock().unwrap().play_calls(), 0);
    }

    #[test]
    fn end_of_media_disarms_trap_past_duration() {
        let mut player = build_test_player(&[(0.0, 2.0), (2.0, 4.0), (4.0, 6.3)], 6.2);
        let mut now = Instant::now();

        player.request_segment_playback(4.0, 6.3);
        run_frames(&mut player, &mut now, 160);

        assert!(!player.is_playing());
        assert_eq!(player.current_time(), 6.2);
        assert_eq!(player.snapshot().trap_end_time, None);

        player.apply_policy_patch(PolicyPatch {
            sentence_mode: Some(SentenceMode::LoopSentence),
            loop_count: Some(3),
            ..PolicyPatch::default()
        });
        player.play();
        run_frames(&mut player, &mut now, 120);

        assert!(player.is_playing());
        assert_eq!(player.clock().unwrap().seeks(), &[4.0, 0.0]);
        assert_eq!(player.snapshot().repeat_count, 1);
    }

    #[test]
    fn request_pause_disarms_trap() {
        let mut player = build_test_player(&[(0.0, 2.0)], 10.0);
        player.request_segment_playback(0.0, 2.0);
        player.request_pause();
        assert_eq!(player.snapshot().trap_end_time, None);
        assert!(player.clock().unwrap().is_paused());
    }

    #[test]
    fn jump_to_resets_loop_progress_and_plays() {
        let mut player = build_test_player(&[(0.0, 2.0), (2.0, 4.0)], 10.0);
        player.apply_policy_patch(PolicyPatch {
            sentence_mode: Some(SentenceMode::LoopSentence),
            loop_count: Some(0),
            ..PolicyPatch::default()
        });
        let mut now = Instant::now();
        player.jump_to(1.9);
        run_frames(&mut player, &mut now, 2);
        assert_eq!(player.snapshot().repeat_count, 1);
        assert!(player.snapshot().debouncing);

        player.jump_to(-3.0);

        let snapshot = player.snapshot();
        assert_eq!(snapshot.repeat_count, 0);
        assert!(!snapshot.debouncing);
        assert!(snapshot.is_playing);
        assert_eq!(player.current_time(), 0.0);
    }

    #[test]
    fn halted_loop_clears_playing_flag() {
        let mut player = build_test_player(&[(0.0, 2.0), (2.0, 4.0)], 10.0);
        player.apply_policy_patch(PolicyPatch {
            sentence_mode: Some(SentenceMode::LoopSentence),
            loop_count: Some(1),
            auto_advance: Some(false),
            ..PolicyPatch::default()
        });
        let mut now = Instant::now();
        player.play();
        run_frames(&mut player, &mut now, 200);

        assert!(!player.is_playing());
        assert!(player.clock().unwrap().is_paused());
        assert!(player.current_time() < 2.0);
    }

    #[test]
    fn end_of_media_stops_in_single_mode() {
        let mut player = build_test_player(&[(0.0, 1.0)], 1.5);
        let mut now = Instant::now();
        player.play();
        run_frames(&mut player, &mut now, 150);

        assert!(!player.is_playing());
        assert!(!player.scheduler().is_running());
        assert_eq!(player.current_time(), 1.5);
    }

    #[test]
    fn end_of_media_restarts_when_looping_clip() {
        let mut player = build_test_player(&[(0.0, 1.0)], 1.5);
        player.apply_policy_patch(PolicyPatch {
            clip_loop_mode: Some(ClipLoopMode::LoopWholeClip),
            ..PolicyPatch::default()
        });
        let mut now = Instant::now();
        player.play();
        run_frames(&mut player, &mut now, 100);

        assert!(player.is_playing());
        assert!(player.scheduler().is_running());
        assert_eq!(player.clock().unwrap().seeks(), &[0.0]);
        assert!(player.current_time() < 1.5);
    }

    #[test]
    fn reset_clears_markers_and_practice_mode() {
        let mut player = build_test_player(&[(0.0, 2.0), (2.0, 4.0)], 10.0);
        player.apply_policy_patch(PolicyPatch {
            practice_mode: Some(PracticeMode::Shadowing),
            ..PolicyPatch::default()
        });
        let mut now = Instant::now();
        player.play();
        run_frames(&mut player, &mut now, 10);
        assert_eq!(player.renderer().target().active_count(), 1);

        player.reset();

        assert_eq!(player.renderer().target().active_count(), 0);
        let snapshot = player.snapshot();
        assert_eq!(snapshot.active_id, None);
        assert_eq!(snapshot.current_time, 0.0);
        assert!(!snapshot.is_playing);
        assert_eq!(snapshot.policy.practice_mode, PracticeMode::None);
    }

    #[test]
    fn playback_rate_is_clamped_and_forwarded() {
        let mut player = build_test_player(&[(0.0, 2.0)], 10.0);
        player.set_playback_rate(3.0);
        assert_eq!(player.clock().unwrap().playback_rate(), MAX_PLAYBACK_RATE);
        player.set_playback_rate(0.1);
        assert_eq!(player.snapshot().playback_rate, MIN_PLAYBACK_RATE);
        player.set_playback_rate(f32::NAN);
        assert_eq!(player.snapshot().playback_rate, MIN_PLAYBACK_RATE);
    }

    #[test]
    fn attached_clock_inherits_rate_and_mute() {
        let mut player = build_test_player(&[(0.0, 2.0)], 10.0);
        player.set_playback_rate(1.5);
        player.set_muted(true);

        let previous = player.attach_clock(ManualClock::new(20.0));

        assert!(previous.is_some());
        let clock = player.clock().unwrap();
        assert_eq!(clock.playback_rate(), 1.5);
        assert!(clock.muted());
    }

    #[test]
    fn command_dispatch_reports_action_and_snapshot() {
        let mut player = build_test_player(&[(0.0, 2.0), (2.0, 4.0)], 10.0);

        let event = player.apply_command(PlayerCommand::Play);
        assert_eq!(event.action, "player_play");
        assert!(event.snapshot.is_playing);

        let event = player.apply_command(PlayerCommand::ToggleMute);
        assert_eq!(event.action, "player_toggle_mute");
        assert!(event.snapshot.muted);

        let event = player.apply_command(PlayerCommand::Clock {
            event: ClockEvent::Ended,
        });
        assert_eq!(event.action, "player_clock_ended");
        assert!(!event.snapshot.is_playing);

        let event = player.apply_command(PlayerCommand::PlaySegment {
            start: 2.0,
            end: 4.0,
        });
        assert_eq!(event.action, "player_play_segment");
        assert_eq!(event.snapshot.trap_end_time, Some(4.0));
    }

    #[test]
    fn snapshot_lines_follow_display_and_practice_modes() {
        let mut player = build_test_player(&[(0.0, 2.0)], 10.0);
        let mut now = Instant::now();
        player.play();
        run_frames(&mut player, &mut now, 1);
        assert_eq!(
            player.snapshot().active_lines,
            vec!["Line 0".to_string(), "第0行".to_string()]
        );

        player.apply_policy_patch(PolicyPatch {
            practice_mode: Some(PracticeMode::FillBlank),
            subtitle_display_mode: Some(crate::policy::SubtitleDisplayMode::EnglishOnly),
            ..PolicyPatch::default()
        });
        assert_eq!(player.snapshot().active_lines, vec!["Line _".to_string()]);
    }

    #[test]
    fn snapshot_serializes_for_frontends() {
        let player = build_test_player(&[(0.0, 2.0)], 10.0);
        let json = serde_json::to_value(player.snapshot()).unwrap();
        assert_eq!(json["subtitle_count"], 1);
        assert_eq!(json["policy"]["sentence_mode"], "continuous");
        assert_eq!(json["duration"], 10.0);
    }
}
