use super::defaults;
use super::models::{EngineConfig, LogLevel};
use crate::policy::{ClipLoopMode, PracticeMode, SentenceMode, SubtitleDisplayMode};
use serde::Deserialize;

/// On-disk layout of `config.toml`, grouped into tables.
#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    playback: PlaybackTable,
    #[serde(default)]
    timing: TimingTable,
    #[serde(default)]
    logging: LoggingTable,
}

impl From<ConfigTables> for EngineConfig {
    fn from(tables: ConfigTables) -> Self {
        EngineConfig {
            subtitle_display_mode: tables.playback.subtitle_display_mode,
            clip_loop_mode: tables.playback.clip_loop_mode,
            sentence_mode: tables.playback.sentence_mode,
            loop_count: tables.playback.loop_count,
            auto_advance: tables.playback.auto_advance,
            practice_mode: tables.playback.practice_mode,
            playback_rate: tables.playback.playback_rate,
            muted: tables.playback.muted,
            trap_epsilon_secs: tables.timing.trap_epsilon_secs,
            loop_guard_secs: tables.timing.loop_guard_secs,
            rewind_debounce_ms: tables.timing.rewind_debounce_ms,
            halt_debounce_ms: tables.timing.halt_debounce_ms,
            release_debounce_on_seeked: tables.timing.release_debounce_on_seeked,
            frame_interval_ms: tables.timing.frame_interval_ms,
            log_level: tables.logging.log_level,
        }
    }
}

impl From<&EngineConfig> for ConfigTables {
    fn from(config: &EngineConfig) -> Self {
        ConfigTables {
            playback: PlaybackTable {
                subtitle_display_mode: config.subtitle_display_mode,
                clip_loop_mode: config.clip_loop_mode,
                sentence_mode: config.sentence_mode,
                loop_count: config.loop_count,
                auto_advance: config.auto_advance,
                practice_mode: config.practice_mode,
                playback_rate: config.playback_rate,
                muted: config.muted,
            },
            timing: TimingTable {
                trap_epsilon_secs: config.trap_epsilon_secs,
                loop_guard_secs: config.loop_guard_secs,
                rewind_debounce_ms: config.rewind_debounce_ms,
                halt_debounce_ms: config.halt_debounce_ms,
                release_debounce_on_seeked: config.release_debounce_on_seeked,
                frame_interval_ms: config.frame_interval_ms,
            },
            logging: LoggingTable {
                log_level: config.log_level,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct PlaybackTable {
    #[serde(default = "defaults::default_subtitle_display_mode")]
    subtitle_display_mode: SubtitleDisplayMode,
    #[serde(default = "defaults::default_clip_loop_mode")]
    clip_loop_mode: ClipLoopMode,
    #[serde(default = "defaults::default_sentence_mode")]
    sentence_mode: SentenceMode,
    #[serde(default = "defaults::default_loop_count")]
    loop_count: u32,
    #[serde(default = "defaults::default_auto_advance")]
    auto_advance: bool,
    #[serde(default = "defaults::default_practice_mode")]
    practice_mode: PracticeMode,
    #[serde(default = "defaults::default_playback_rate")]
    playback_rate: f32,
    #[serde(default = "defaults::default_muted")]
    muted: bool,
}

impl Default for PlaybackTable {
    fn default() -> Self {
        PlaybackTable {
            subtitle_display_mode: defaults::default_subtitle_display_mode(),
            clip_loop_mode: defaults::default_clip_loop_mode(),
            sentence_mode: defaults::default_sentence_mode(),
            loop_count: defaults::default_loop_count(),
            auto_advance: defaults::default_auto_advance(),
            practice_mode: defaults::default_practice_mode(),
            playback_rate: defaults::default_playback_rate(),
            muted: defaults::default_muted(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct TimingTable {
    #[serde(default = "defaults::default_trap_epsilon_secs")]
    trap_epsilon_secs: f64,
    #[serde(default = "defaults::default_loop_guard_secs")]
    loop_guard_secs: f64,
    #[serde(default = "defaults::default_rewind_debounce_ms")]
    rewind_debounce_ms: u64,
    #[serde(default = "defaults::default_halt_debounce_ms")]
    halt_debounce_ms: u64,
    #[serde(default = "defaults::default_release_debounce_on_seeked")]
    release_debounce_on_seeked: bool,
    #[serde(default = "defaults::default_frame_interval_ms")]
    frame_interval_ms: u64,
}

impl Default for TimingTable {
    fn default() -> Self {
        TimingTable {
            trap_epsilon_secs: defaults::default_trap_epsilon_secs(),
            loop_guard_secs: defaults::default_loop_guard_secs(),
            rewind_debounce_ms: defaults::default_rewind_debounce_ms(),
            halt_debounce_ms: defaults::default_halt_debounce_ms(),
            release_debounce_on_seeked: defaults::default_release_debounce_on_seeked(),
            frame_interval_ms: defaults::default_frame_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingTable {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingTable {
    fn default() -> Self {
        LoggingTable {
            log_level: defaults::default_log_level(),
        }
    }
}
