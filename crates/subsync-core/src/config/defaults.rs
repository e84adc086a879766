use super::models::LogLevel;
use crate::policy::{ClipLoopMode, PracticeMode, SentenceMode, SubtitleDisplayMode};

pub(crate) fn default_subtitle_display_mode() -> SubtitleDisplayMode {
    SubtitleDisplayMode::Bilingual
}

pub(crate) fn default_clip_loop_mode() -> ClipLoopMode {
    ClipLoopMode::Single
}

pub(crate) fn default_sentence_mode() -> SentenceMode {
    SentenceMode::Continuous
}

pub(crate) fn default_loop_count() -> u32 {
    2
}

pub(crate) fn default_auto_advance() -> bool {
    true
}

pub(crate) fn default_practice_mode() -> PracticeMode {
    PracticeMode::None
}

pub(crate) fn default_playback_rate() -> f32 {
    1.0
}

pub(crate) fn default_muted() -> bool {
    false
}

pub(crate) fn default_trap_epsilon_secs() -> f64 {
    0.05
}

pub(crate) fn default_loop_guard_secs() -> f64 {
    0.15
}

pub(crate) fn default_rewind_debounce_ms() -> u64 {
    300
}

pub(crate) fn default_halt_debounce_ms() -> u64 {
    500
}

pub(crate) fn default_release_debounce_on_seeked() -> bool {
    false
}

pub(crate) fn default_frame_interval_ms() -> u64 {
    16
}

pub(crate) fn default_log_level() -> LogLevel {
    LogLevel::Debug
}
