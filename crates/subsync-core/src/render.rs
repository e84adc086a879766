//! Highlight rendering.
//!
//! Highlighting mutates markers on already-rendered rows instead of
//! rebuilding them, so the per-frame path only touches the rows whose state
//! actually changes.

use crate::subtitle::{SubtitleId, SubtitleTrack};
use std::collections::HashSet;
use tracing::trace;

/// Narrow view onto whatever displays subtitle rows.
pub trait RenderTarget {
    fn row_ids(&self) -> Vec<SubtitleId>;
    fn set_active(&mut self, id: &SubtitleId, active: bool);
    /// Bring the row to the vertical center of the viewport.
    fn scroll_into_view(&mut self, id: &SubtitleId);
}

#[derive(Debug)]
pub struct HighlightRenderer<R> {
    target: R,
    active: Option<SubtitleId>,
    applies: usize,
    scrolls: usize,
}

impl<R: RenderTarget> HighlightRenderer<R> {
    pub fn new(target: R) -> Self {
        Self {
            target,
            active: None,
            applies: 0,
            scrolls: 0,
        }
    }

    /// Mark exactly the row matching `id` active and every other row inactive.
    pub fn apply_active(&mut self, id: Option<&SubtitleId>) {
        self.applies += 1;
        let mut found = false;
        for row in self.target.row_ids() {
            let is_match = id == Some(&row);
            found |= is_match;
            self.target.set_active(&row, is_match);
        }
        self.active = id.cloned();
        if let Some(id) = id.filter(|_| found) {
            trace!(id = %id, "Scrolling active row into view");
            self.target.scroll_into_view(id);
            self.scrolls += 1;
        }
    }

    /// Remove every active marker.
    pub fn clear(&mut self) {
        for row in self.target.row_ids() {
            self.target.set_active(&row, false);
        }
        self.active = None;
    }

    pub fn active(&self) -> Option<&SubtitleId> {
        self.active.as_ref()
    }

    pub fn apply_count(&self) -> usize {
        self.applies
    }

    pub fn scroll_count(&self) -> usize {
        self.scrolls
    }

    pub fn target(&self) -> &R {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut R {
        &mut self.target
    }
}

/// In-memory render target recording marker state and scroll requests.
#[derive(Debug, Clone, Default)]
pub struct RowTable {
    rows: Vec<SubtitleId>,
    active: HashSet<SubtitleId>,
    scroll_requests: Vec<SubtitleId>,
}

impl RowTable {
    pub fn new(rows: Vec<SubtitleId>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn from_track(track: &SubtitleTrack) -> Self {
        Self::new(track.ids().cloned().collect())
    }

    pub fn is_active(&self, id: &SubtitleId) -> bool {
        self.active.contains(id)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn scroll_requests(&self) -> &[SubtitleId] {
        &self.scroll_requests
    }
}

impl RenderTarget for RowTable {
    fn row_ids(&self) -> Vec<SubtitleId> {
        self.rows.clone()
    }

    fn set_active(&mut self, id: &SubtitleId, active: bool) {
        if active {
            self.active.insert(id.clone());
        } else {
            self.active.remove(id);
        }
    }

    fn scroll_into_view(&mut self, id: &SubtitleId) {
        self.scroll_requests.push(id.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> HighlightRenderer<RowTable> {
        HighlightRenderer::new(RowTable::new(
            ["a", "b", "c"].into_iter().map(SubtitleId::from).collect(),
        ))
    }

    #[test]
    fn exactly_one_row_is_active() {
        let mut renderer = renderer();
        let b = SubtitleId::from("b");
        let c = SubtitleId::from("c");

        renderer.apply_active(Some(&b));
        renderer.apply_active(Some(&c));

        let rows = renderer.target();
        assert!(!rows.is_active(&b));
        assert!(rows.is_active(&c));
        assert_eq!(rows.active_count(), 1);
        assert_eq!(rows.scroll_requests(), &[b, c]);
        assert_eq!(renderer.apply_count(), 2);
    }

    #[test]
    fn gap_clears_markers_without_scrolling() {
        let mut renderer = renderer();
        renderer.apply_active(Some(&SubtitleId::from("a")));
        renderer.apply_active(None);

        assert_eq!(renderer.target().active_count(), 0);
        assert_eq!(renderer.scroll_count(), 1);
        assert_eq!(renderer.active(), None);
    }

    #[test]
    fn unknown_row_is_not_scrolled() {
        let mut renderer = renderer();
        renderer.apply_active(Some(&SubtitleId::from("zzz")));
        assert_eq!(renderer.scroll_count(), 0);
        assert_eq!(renderer.target().active_count(), 0);
    }

    #[test]
    fn clear_removes_all_markers() {
        let mut renderer = renderer();
        renderer.apply_active(Some(&SubtitleId::from("a")));
        renderer.clear();
        assert_eq!(renderer.target().active_count(), 0);
        assert_eq!(renderer.active(), None);
    }
}
