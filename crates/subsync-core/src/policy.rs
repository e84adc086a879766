//! User-configurable playback policy.
//!
//! The policy is only ever mutated from outside the engine (toolbar toggles,
//! config defaults). The frame scheduler reads the live copy held in
//! `SchedulerState` on every tick.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Which text variants a subtitle row shows.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum SubtitleDisplayMode {
    #[default]
    Bilingual,
    EnglishOnly,
    ForeignOnly,
}

impl std::fmt::Display for SubtitleDisplayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SubtitleDisplayMode::Bilingual => "Bilingual",
            SubtitleDisplayMode::EnglishOnly => "English only",
            SubtitleDisplayMode::ForeignOnly => "Foreign only",
        };
        write!(f, "{}", label)
    }
}

/// What happens when the media reaches its end.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum ClipLoopMode {
    #[default]
    Single,
    LoopWholeClip,
}

impl std::fmt::Display for ClipLoopMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ClipLoopMode::Single => "Play once",
            ClipLoopMode::LoopWholeClip => "Loop clip",
        };
        write!(f, "{}", label)
    }
}

/// Whether the active sentence is replayed before moving on.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum SentenceMode {
    #[default]
    Continuous,
    LoopSentence,
}

impl std::fmt::Display for SentenceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SentenceMode::Continuous => "Continuous",
            SentenceMode::LoopSentence => "Loop sentence",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum PracticeMode {
    #[default]
    None,
    Shadowing,
    FillBlank,
}

impl std::fmt::Display for PracticeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PracticeMode::None => "None",
            PracticeMode::Shadowing => "Shadowing",
            PracticeMode::FillBlank => "Fill in the blank",
        };
        write!(f, "{}", label)
    }
}

/// Loop counts offered by the toolbar; `0` means repeat forever.
pub const LOOP_COUNT_OPTIONS: [u32; 6] = [1, 2, 3, 4, 5, 0];

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, TS)]
#[ts(export)]
pub struct PlaybackPolicy {
    pub subtitle_display_mode: SubtitleDisplayMode,
    pub clip_loop_mode: ClipLoopMode,
    pub sentence_mode: SentenceMode,
    /// Total plays of a looped sentence, `0` for unbounded.
    pub loop_count: u32,
    pub auto_advance: bool,
    pub practice_mode: PracticeMode,
}

impl Default for PlaybackPolicy {
    fn default() -> Self {
        Self {
            subtitle_display_mode: SubtitleDisplayMode::default(),
            clip_loop_mode: ClipLoopMode::default(),
            sentence_mode: SentenceMode::default(),
            loop_count: 2,
            auto_advance: true,
            practice_mode: PracticeMode::default(),
        }
    }
}

impl PlaybackPolicy {
    pub fn sentence_loop_active(&self) -> bool {
        matches!(self.sentence_mode, SentenceMode::LoopSentence)
    }

    /// Upper bound on plays of one sentence; `None` when unbounded.
    pub fn max_repeats(&self) -> Option<u32> {
        (self.loop_count > 0).then_some(self.loop_count)
    }

    pub fn apply_patch(&mut self, patch: PolicyPatch) {
        if let Some(mode) = patch.subtitle_display_mode {
            self.subtitle_display_mode = mode;
        }
        if let Some(mode) = patch.clip_loop_mode {
            self.clip_loop_mode = mode;
        }
        if let Some(mode) = patch.sentence_mode {
            self.sentence_mode = mode;
        }
        if let Some(count) = patch.loop_count {
            self.loop_count = count;
        }
        if let Some(auto_advance) = patch.auto_advance {
            self.auto_advance = auto_advance;
        }
        if let Some(mode) = patch.practice_mode {
            self.practice_mode = mode;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, TS)]
#[ts(export)]
pub struct PolicyPatch {
    #[ts(optional)]
    pub subtitle_display_mode: Option<SubtitleDisplayMode>,
    #[ts(optional)]
    pub clip_loop_mode: Option<ClipLoopMode>,
    #[ts(optional)]
    pub sentence_mode: Option<SentenceMode>,
    #[ts(optional)]
    pub loop_count: Option<u32>,
    #[ts(optional)]
    pub auto_advance: Option<bool>,
    #[ts(optional)]
    pub practice_mode: Option<PracticeMode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_loop_count_is_unbounded() {
        let policy = PlaybackPolicy {
            loop_count: 0,
            ..PlaybackPolicy::default()
        };
        assert_eq!(policy.max_repeats(), None);
    }

    #[test]
    fn patch_only_touches_provided_fields() {
        let mut policy = PlaybackPolicy::default();
        policy.apply_patch(PolicyPatch {
            sentence_mode: Some(SentenceMode::LoopSentence),
            loop_count: Some(4),
            ..PolicyPatch::default()
        });

        assert!(policy.sentence_loop_active());
        assert_eq!(policy.max_repeats(), Some(4));
        assert!(policy.auto_advance);
        assert_eq!(policy.practice_mode, PracticeMode::None);
    }

    #[test]
    fn modes_deserialize_from_kebab_case() {
        let mode: SubtitleDisplayMode = serde_json::from_str("\"foreign-only\"").unwrap();
        assert_eq!(mode, SubtitleDisplayMode::ForeignOnly);
        let mode: ClipLoopMode = serde_json::from_str("\"loop-whole-clip\"").unwrap();
        assert_eq!(mode, ClipLoopMode::LoopWholeClip);
    }
}
