//! Timed subtitle data model.
//!
//! A `SubtitleTrack` is the validated, immutable interval list for one
//! playback session: sorted by start time, non-overlapping, gaps allowed.
//! Tokens are derived once per subtitle here and never recomputed per frame.

use crate::policy::{PracticeMode, SubtitleDisplayMode};
use crate::tokens::{self, Token, TokenKind};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use ts_rs::TS;

/// Stable subtitle identifier. Numeric ids from the loader are kept as their
/// decimal string so render targets can compare them directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(from = "RawId", into = "String")]
#[ts(export)]
pub struct SubtitleId(String);

impl SubtitleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubtitleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubtitleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for SubtitleId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<SubtitleId> for String {
    fn from(id: SubtitleId) -> Self {
        id.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl From<RawId> for SubtitleId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        }
    }
}

/// Old-style highlight entry: a literal word plus its dictionary details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickableWord {
    pub word: String,
    #[serde(default)]
    pub phonetic: String,
    #[serde(default)]
    pub pos: String,
    #[serde(default)]
    pub meaning_cn: String,
    #[serde(default)]
    pub meaning_en: String,
    #[serde(default)]
    pub example_en: String,
    #[serde(default)]
    pub example_cn: String,
    #[serde(default)]
    pub highlight_type: TokenKind,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSubtitle {
    id: SubtitleId,
    #[serde(alias = "start_time")]
    start_time: f64,
    #[serde(alias = "end_time")]
    end_time: f64,
    #[serde(default, alias = "time_label")]
    time_label: Option<String>,
    #[serde(default, alias = "en")]
    english: String,
    #[serde(default, alias = "chinese", alias = "zh")]
    translation: String,
    #[serde(default)]
    tokens: Option<Vec<Token>>,
    #[serde(default, alias = "clickable_words")]
    clickable_words: Vec<ClickableWord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TrackFile {
    Bare(Vec<RawSubtitle>),
    Wrapped { subtitles: Vec<RawSubtitle> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleInterval {
    pub id: SubtitleId,
    pub start_time: f64,
    pub end_time: f64,
    pub time_label: Option<String>,
    pub english: String,
    pub translation: String,
    pub clickable_words: Vec<ClickableWord>,
    tokens: Vec<Token>,
}

impl SubtitleInterval {
    pub fn new(
        id: impl Into<SubtitleId>,
        start_time: f64,
        end_time: f64,
        english: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        let english = english.into();
        let tokens = tokens::parse(&english);
        Self {
            id: id.into(),
            start_time,
            end_time,
            time_label: None,
            english,
            translation: translation.into(),
            clickable_words: Vec::new(),
            tokens,
        }
    }

    fn from_raw(raw: RawSubtitle) -> Self {
        let tokens = match raw.tokens {
            Some(tokens) if !tokens.is_empty() => tokens,
            _ if !raw.clickable_words.is_empty() => tokens::legacy_tokens(
                &raw.english,
                raw.clickable_words
                    .iter()
                    .map(|cw| (cw.word.as_str(), cw.highlight_type)),
            ),
            _ => tokens::parse(&raw.english),
        };
        Self {
            id: raw.id,
            start_time: raw.start_time,
            end_time: raw.end_time,
            time_label: raw.time_label,
            english: raw.english,
            translation: raw.translation,
            clickable_words: raw.clickable_words,
            tokens,
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.start_time && t < self.end_time
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// `m:ss` label derived from the start time unless the loader supplied one.
    pub fn label(&self) -> String {
        if let Some(label) = &self.time_label {
            return label.clone();
        }
        let total = self.start_time.max(0.0).floor() as u64;
        format!("{}:{:02}", total / 60, total % 60)
    }

    /// Lines to render for this row under the given modes.
    pub fn display_lines(&self, mode: SubtitleDisplayMode, practice: PracticeMode) -> Vec<String> {
        let english = match practice {
            PracticeMode::FillBlank => tokens::cloze_text(&self.tokens),
            _ => tokens::display_text(&self.tokens),
        };
        let mut lines = Vec::with_capacity(2);
        match mode {
            SubtitleDisplayMode::Bilingual => {
                lines.push(english);
                if !self.translation.is_empty() {
                    lines.push(self.translation.clone());
                }
            }
            SubtitleDisplayMode::EnglishOnly => lines.push(english),
            SubtitleDisplayMode::ForeignOnly => lines.push(self.translation.clone()),
        }
        lines
    }
}

/// Validated interval list for one playback session.
#[derive(Debug, Clone, Default)]
pub struct SubtitleTrack {
    intervals: Vec<SubtitleInterval>,
}

impl SubtitleTrack {
    pub fn new(intervals: Vec<SubtitleInterval>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(intervals.len());
        for (idx, interval) in intervals.iter().enumerate() {
            if !interval.start_time.is_finite() || !interval.end_time.is_finite() {
                bail!("subtitle {} has a non-finite time range", interval.id);
            }
            if interval.start_time >= interval.end_time {
                bail!(
                    "subtitle {} ends ({}) before it starts ({})",
                    interval.id,
                    interval.end_time,
                    interval.start_time
                );
            }
            if !seen.insert(interval.id.clone()) {
                bail!("duplicate subtitle id {}", interval.id);
            }
            if let Some(prev) = idx.checked_sub(1).and_then(|p| intervals.get(p)) {
                if interval.start_time < prev.start_time {
                    bail!("subtitle {} is out of order", interval.id);
                }
                if interval.start_time < prev.end_time {
                    bail!("subtitle {} overlaps subtitle {}", interval.id, prev.id);
                }
            }
        }
        Ok(Self { intervals })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: TrackFile = serde_json::from_str(json).context("Parsing subtitle JSON")?;
        let raw = match file {
            TrackFile::Bare(items) => items,
            TrackFile::Wrapped { subtitles } => subtitles,
        };
        Self::new(raw.into_iter().map(SubtitleInterval::from_raw).collect())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Reading subtitles from {}", path.display()))?;
        Self::from_json_str(&data)
            .with_context(|| format!("Loading subtitles from {}", path.display()))
    }

    pub fn intervals(&self) -> &[SubtitleInterval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn get(&self, id: &SubtitleId) -> Option<&SubtitleInterval> {
        self.intervals.iter().find(|interval| &interval.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &SubtitleId> {
        self.intervals.iter().map(|interval| &interval.id)
    }
}
