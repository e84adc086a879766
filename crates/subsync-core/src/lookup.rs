//! Vocabulary lookup collaborator.
//!
//! The engine only turns a highlighted token into `(kind, ref_id)`; what that
//! resolves to is up to a `LookupTable`. `Glossary` is the in-memory table
//! loaded from a JSON file next to the subtitles. A missing record is not an
//! error, callers simply show nothing.

use crate::subtitle::{ClickableWord, SubtitleTrack};
use crate::tokens::{Token, TokenKind};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, trace};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExampleSentence {
    pub en: String,
    #[serde(default, alias = "zh")]
    pub translation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct WordEntry {
    #[serde(default)]
    #[ts(optional)]
    pub id: Option<String>,
    pub word: String,
    #[serde(default)]
    pub phonetic: String,
    #[serde(default)]
    pub pos: String,
    #[serde(default, alias = "meaningZh")]
    pub meaning: String,
    #[serde(default)]
    pub meaning_en: String,
    #[serde(default)]
    pub examples: Vec<ExampleSentence>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PhraseEntry {
    #[serde(default)]
    #[ts(optional)]
    pub id: Option<String>,
    pub phrase: String,
    #[serde(default)]
    pub pos: String,
    #[serde(default, alias = "meaningZh")]
    pub meaning: String,
    #[serde(default)]
    pub meaning_en: String,
    #[serde(default)]
    pub examples: Vec<ExampleSentence>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ExpressionEntry {
    #[serde(default)]
    #[ts(optional)]
    pub id: Option<String>,
    pub expression: String,
    #[serde(default)]
    pub analysis: String,
    #[serde(default)]
    pub usage: String,
    #[serde(default)]
    pub similar: String,
    #[serde(default)]
    #[ts(optional)]
    pub example: Option<ExampleSentence>,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(tag = "kind", rename_all = "lowercase")]
#[ts(export)]
pub enum LookupRecord {
    Word(WordEntry),
    Phrase(PhraseEntry),
    Expression(ExpressionEntry),
}

impl LookupRecord {
    pub fn kind(&self) -> TokenKind {
        match self {
            LookupRecord::Word(_) => TokenKind::Word,
            LookupRecord::Phrase(_) => TokenKind::Phrase,
            LookupRecord::Expression(_) => TokenKind::Expression,
        }
    }

    pub fn headword(&self) -> &str {
        match self {
            LookupRecord::Word(entry) => &entry.word,
            LookupRecord::Phrase(entry) => &entry.phrase,
            LookupRecord::Expression(entry) => &entry.expression,
        }
    }

    /// One-line gloss for compact displays.
    pub fn summary(&self) -> String {
        match self {
            LookupRecord::Word(entry) => {
                let mut line = entry.word.clone();
                if !entry.phonetic.is_empty() {
                    line.push_str(&format!(" {}", entry.phonetic));
                }
                if !entry.pos.is_empty() {
                    line.push_str(&format!(" {}", entry.pos));
                }
                format!("{line}: {}", first_non_empty(&entry.meaning, &entry.meaning_en))
            }
            LookupRecord::Phrase(entry) => format!(
                "{}: {}",
                entry.phrase,
                first_non_empty(&entry.meaning, &entry.meaning_en)
            ),
            LookupRecord::Expression(entry) => format!(
                "{}: {}",
                entry.expression,
                first_non_empty(&entry.usage, &entry.analysis)
            ),
        }
    }
}

fn first_non_empty<'a>(a: &'a str, b: &'a str) -> &'a str {
    if a.is_empty() { b } else { a }
}

pub trait LookupTable {
    fn resolve(&self, kind: TokenKind, ref_id: &str) -> Option<LookupRecord>;

    /// Resolve a token; plain tokens never resolve.
    fn resolve_token(&self, token: &Token) -> Option<LookupRecord> {
        let highlight = token.highlight.as_ref()?;
        self.resolve(highlight.kind, &highlight.ref_id)
    }
}

#[derive(Debug, Default, Deserialize)]
struct GlossaryFile {
    #[serde(default)]
    words: Vec<WordEntry>,
    #[serde(default)]
    phrases: Vec<PhraseEntry>,
    #[serde(default)]
    expressions: Vec<ExpressionEntry>,
}

/// In-memory lookup table keyed by kind and reference id.
///
/// Every entry is reachable by its explicit `id` and by its lowercased
/// headword, which is what the clickable-word renderer emits as ref id.
#[derive(Debug, Clone, Default)]
pub struct Glossary {
    records: Vec<LookupRecord>,
    index: HashMap<(TokenKind, String), usize>,
}

impl Glossary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: GlossaryFile = serde_json::from_str(json).context("Parsing glossary JSON")?;
        let mut glossary = Self::new();
        for entry in file.words {
            glossary.insert(LookupRecord::Word(entry));
        }
        for entry in file.phrases {
            glossary.insert(LookupRecord::Phrase(entry));
        }
        for entry in file.expressions {
            glossary.insert(LookupRecord::Expression(entry));
        }
        Ok(glossary)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Reading glossary from {}", path.display()))?;
        let glossary = Self::from_json_str(&data)
            .with_context(|| format!("Loading glossary from {}", path.display()))?;
        debug!(path = %path.display(), entries = glossary.len(), "Loaded glossary");
        Ok(glossary)
    }

    pub fn insert(&mut self, record: LookupRecord) {
        let kind = record.kind();
        let idx = self.records.len();
        let explicit_id = match &record {
            LookupRecord::Word(entry) => entry.id.clone(),
            LookupRecord::Phrase(entry) => entry.id.clone(),
            LookupRecord::Expression(entry) => entry.id.clone(),
        };
        if let Some(id) = explicit_id {
            self.index.insert((kind, id), idx);
        }
        self.index
            .entry((kind, record.headword().to_lowercase()))
            .or_insert(idx);
        self.records.push(record);
    }

    /// Add records carried inline by subtitles that only have a clickable
    /// word list. Existing entries win.
    pub fn extend_from_track(&mut self, track: &SubtitleTrack) {
        for interval in track.intervals() {
            for word in &interval.clickable_words {
                let key = (word.highlight_type, word.word.to_lowercase());
                if self.index.contains_key(&key) {
                    continue;
                }
                trace!(word = %word.word, "Adding inline glossary entry");
                self.insert(record_from_clickable(word));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn record_from_clickable(word: &ClickableWord) -> LookupRecord {
    let example = (!word.example_en.is_empty()).then(|| ExampleSentence {
        en: word.example_en.clone(),
        translation: word.example_cn.clone(),
    });
    match word.highlight_type {
        TokenKind::Word => LookupRecord::Word(WordEntry {
            id: None,
            word: word.word.clone(),
            phonetic: word.phonetic.clone(),
            pos: word.pos.clone(),
            meaning: word.meaning_cn.clone(),
            meaning_en: word.meaning_en.clone(),
            examples: example.into_iter().collect(),
        }),
        TokenKind::Phrase => LookupRecord::Phrase(PhraseEntry {
            id: None,
            phrase: word.word.clone(),
            pos: word.pos.clone(),
            meaning: word.meaning_cn.clone(),
            meaning_en: word.meaning_en.clone(),
            examples: example.into_iter().collect(),
        }),
        TokenKind::Expression => LookupRecord::Expression(ExpressionEntry {
            id: None,
            expression: word.word.clone(),
            analysis: word.meaning_en.clone(),
            usage: word.meaning_cn.clone(),
            similar: String::new(),
            example,
            timestamp: String::new(),
        }),
    }
}

impl LookupTable for Glossary {
    fn resolve(&self, kind: TokenKind, ref_id: &str) -> Option<LookupRecord> {
        let idx = self
            .index
            .get(&(kind, ref_id.to_string()))
            .or_else(|| self.index.get(&(kind, ref_id.to_lowercase())))?;
        self.records.get(*idx).cloned()
    }
}
