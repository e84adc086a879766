use crate::lookup::{ExampleSentence, ExpressionEntry, LookupRecord, PhraseEntry, WordEntry};
use crate::player::PlayerSnapshot;
use crate::policy::{
    ClipLoopMode, PlaybackPolicy, PolicyPatch, PracticeMode, SentenceMode, SubtitleDisplayMode,
};
use crate::subtitle::SubtitleId;
use crate::tokens::{Highlight, Token, TokenKind};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use ts_rs::TS;

const INDEX_CONTENT: &str = r#"export type { PlayerSnapshot } from "./PlayerSnapshot";
export type { PlaybackPolicy } from "./PlaybackPolicy";
export type { PolicyPatch } from "./PolicyPatch";
export type { SubtitleDisplayMode } from "./SubtitleDisplayMode";
export type { ClipLoopMode } from "./ClipLoopMode";
export type { SentenceMode } from "./SentenceMode";
export type { PracticeMode } from "./PracticeMode";
export type { SubtitleId } from "./SubtitleId";
export type { Token } from "./Token";
export type { Highlight } from "./Highlight";
export type { TokenKind } from "./TokenKind";
export type { LookupRecord } from "./LookupRecord";
export type { WordEntry } from "./WordEntry";
export type { PhraseEntry } from "./PhraseEntry";
export type { ExpressionEntry } from "./ExpressionEntry";
export type { ExampleSentence } from "./ExampleSentence";
"#;

fn export_single_type<T: TS + 'static>(out_dir: &Path) -> Result<()> {
    T::export_all_to(out_dir).with_context(|| format!("Exporting {}", T::name()))
}

/// Write TypeScript definitions for every frontend-facing type, replacing any
/// previously generated `.ts` files in `out_dir`.
pub fn export_ts_bindings(out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir).with_context(|| format!("Creating {}", out_dir.display()))?;

    for entry in fs::read_dir(out_dir).with_context(|| format!("Listing {}", out_dir.display()))? {
        let path = entry.context("Reading output directory entry")?.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("ts") {
            fs::remove_file(&path).with_context(|| format!("Removing {}", path.display()))?;
        }
    }

    export_single_type::<PlayerSnapshot>(out_dir)?;
    export_single_type::<PlaybackPolicy>(out_dir)?;
    export_single_type::<PolicyPatch>(out_dir)?;
    export_single_type::<SubtitleDisplayMode>(out_dir)?;
    export_single_type::<ClipLoopMode>(out_dir)?;
    export_single_type::<SentenceMode>(out_dir)?;
    export_single_type::<PracticeMode>(out_dir)?;
    export_single_type::<SubtitleId>(out_dir)?;
    export_single_type::<Token>(out_dir)?;
    export_single_type::<Highlight>(out_dir)?;
    export_single_type::<TokenKind>(out_dir)?;
    export_single_type::<LookupRecord>(out_dir)?;
    export_single_type::<WordEntry>(out_dir)?;
    export_single_type::<PhraseEntry>(out_dir)?;
    export_single_type::<ExpressionEntry>(out_dir)?;
    export_single_type::<ExampleSentence>(out_dir)?;

    let index_path = out_dir.join("index.ts");
    fs::write(&index_path, INDEX_CONTENT)
        .with_context(|| format!("Writing {}", index_path.display()))?;
    Ok(())
}
