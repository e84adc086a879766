use crate::policy::{ClipLoopMode, PlaybackPolicy, PracticeMode, SentenceMode, SubtitleDisplayMode};
use serde::Deserialize;
use std::time::Duration;

/// High-level engine configuration; deserializable from TOML.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct EngineConfig {
    #[serde(default = "crate::config::defaults::default_subtitle_display_mode")]
    pub subtitle_display_mode: SubtitleDisplayMode,
    #[serde(default = "crate::config::defaults::default_clip_loop_mode")]
    pub clip_loop_mode: ClipLoopMode,
    #[serde(default = "crate::config::defaults::default_sentence_mode")]
    pub sentence_mode: SentenceMode,
    #[serde(default = "crate::config::defaults::default_loop_count")]
    pub loop_count: u32,
    #[serde(default = "crate::config::defaults::default_auto_advance")]
    pub auto_advance: bool,
    #[serde(default = "crate::config::defaults::default_practice_mode")]
    pub practice_mode: PracticeMode,
    #[serde(default = "crate::config::defaults::default_playback_rate")]
    pub playback_rate: f32,
    #[serde(default = "crate::config::defaults::default_muted")]
    pub muted: bool,
    #[serde(default = "crate::config::defaults::default_trap_epsilon_secs")]
    pub trap_epsilon_secs: f64,
    #[serde(default = "crate::config::defaults::default_loop_guard_secs")]
    pub loop_guard_secs: f64,
    #[serde(default = "crate::config::defaults::default_rewind_debounce_ms")]
    pub rewind_debounce_ms: u64,
    #[serde(default = "crate::config::defaults::default_halt_debounce_ms")]
    pub halt_debounce_ms: u64,
    #[serde(default = "crate::config::defaults::default_release_debounce_on_seeked")]
    pub release_debounce_on_seeked: bool,
    #[serde(default = "crate::config::defaults::default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            subtitle_display_mode: crate::config::defaults::default_subtitle_display_mode(),
            clip_loop_mode: crate::config::defaults::default_clip_loop_mode(),
            sentence_mode: crate::config::defaults::default_sentence_mode(),
            loop_count: crate::config::defaults::default_loop_count(),
            auto_advance: crate::config::defaults::default_auto_advance(),
            practice_mode: crate::config::defaults::default_practice_mode(),
            playback_rate: crate::config::defaults::default_playback_rate(),
            muted: crate::config::defaults::default_muted(),
            trap_epsilon_secs: crate::config::defaults::default_trap_epsilon_secs(),
            loop_guard_secs: crate::config::defaults::default_loop_guard_secs(),
            rewind_debounce_ms: crate::config::defaults::default_rewind_debounce_ms(),
            halt_debounce_ms: crate::config::defaults::default_halt_debounce_ms(),
            release_debounce_on_seeked:
                crate::config::defaults::default_release_debounce_on_seeked(),
            frame_interval_ms: crate::config::defaults::default_frame_interval_ms(),
            log_level: crate::config::defaults::default_log_level(),
        }
    }
}

impl EngineConfig {
    /// Initial policy for a new playback session.
    pub fn policy(&self) -> PlaybackPolicy {
        PlaybackPolicy {
            subtitle_display_mode: self.subtitle_display_mode,
            clip_loop_mode: self.clip_loop_mode,
            sentence_mode: self.sentence_mode,
            loop_count: self.loop_count,
            auto_advance: self.auto_advance,
            practice_mode: self.practice_mode,
        }
    }

    pub fn timing(&self) -> TimingConfig {
        let sanitize = |secs: f64, fallback: f64| {
            if secs.is_finite() && secs >= 0.0 {
                secs
            } else {
                fallback
            }
        };
        TimingConfig {
            trap_epsilon_secs: sanitize(
                self.trap_epsilon_secs,
                crate::config::defaults::default_trap_epsilon_secs(),
            ),
            loop_guard_secs: sanitize(
                self.loop_guard_secs,
                crate::config::defaults::default_loop_guard_secs(),
            ),
            rewind_debounce: Duration::from_millis(self.rewind_debounce_ms),
            halt_debounce: Duration::from_millis(self.halt_debounce_ms),
            release_debounce_on_seeked: self.release_debounce_on_seeked,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

/// Guard windows used by the per-frame logic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingConfig {
    /// How early the segment trap may fire ahead of its end time.
    pub trap_epsilon_secs: f64,
    /// Distance from a sentence end at which the loop controller triggers.
    pub loop_guard_secs: f64,
    pub rewind_debounce: Duration,
    pub halt_debounce: Duration,
    /// Let a clock seek-completed event release a rewind debounce early.
    pub release_debounce_on_seeked: bool,
}

impl Default for TimingConfig {
    fn default() -> Self {
        EngineConfig::default().timing()
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Default, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
