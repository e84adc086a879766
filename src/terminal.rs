//! Terminal render target.
//!
//! Rows are "rendered" once up front; marking a row active prints it with its
//! glossary entries, which is the terminal's version of scrolling to it.

use std::collections::HashSet;
use subsync_core::lookup::{Glossary, LookupTable};
use subsync_core::policy::PlaybackPolicy;
use subsync_core::render::RenderTarget;
use subsync_core::subtitle::{SubtitleId, SubtitleTrack};

struct Row {
    id: SubtitleId,
    label: String,
    lines: Vec<String>,
    glosses: Vec<String>,
}

pub struct TerminalRows {
    rows: Vec<Row>,
    active: HashSet<SubtitleId>,
}

impl TerminalRows {
    pub fn new(track: &SubtitleTrack, policy: &PlaybackPolicy, glossary: &Glossary) -> Self {
        let rows = track
            .intervals()
            .iter()
            .map(|interval| {
                let glosses = interval
                    .tokens()
                    .iter()
                    .filter_map(|token| glossary.resolve_token(token))
                    .map(|record| record.summary())
                    .collect();
                Row {
                    id: interval.id.clone(),
                    label: interval.label(),
                    lines: interval
                        .display_lines(policy.subtitle_display_mode, policy.practice_mode),
                    glosses,
                }
            })
            .collect();
        Self {
            rows,
            active: HashSet::new(),
        }
    }
}

impl RenderTarget for TerminalRows {
    fn row_ids(&self) -> Vec<SubtitleId> {
        self.rows.iter().map(|row| row.id.clone()).collect()
    }

    fn set_active(&mut self, id: &SubtitleId, active: bool) {
        if active {
            self.active.insert(id.clone());
        } else {
            self.active.remove(id);
        }
    }

    fn scroll_into_view(&mut self, id: &SubtitleId) {
        let Some(row) = self.rows.iter().find(|row| &row.id == id) else {
            return;
        };
        let marker = if self.active.contains(id) { ">" } else { " " };
        println!();
        for (idx, line) in row.lines.iter().enumerate() {
            if idx == 0 {
                println!("{marker} [{}] {line}", row.label);
            } else {
                println!("  {:width$} {line}", "", width = row.label.len() + 2);
            }
        }
        for gloss in &row.glosses {
            println!("    * {gloss}");
        }
    }
}
