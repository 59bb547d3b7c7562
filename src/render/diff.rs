//! View diff protocol: what the host must update after an engine step

use crate::layout::PageInfo;
use crate::view::{Migration, MigrationCause, ViewMode};
use serde::Serialize;

/// A single change for the host
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ViewPatch {
    /// The page list was recomputed and differs from the previous one
    PagesChanged {
        total_pages: usize,
        /// Pages that did not exist before
        added: Vec<usize>,
        /// Pages that no longer exist
        removed: Vec<usize>,
        /// Existing pages whose offsets moved
        moved: Vec<usize>,
    },
    /// The live surface moved to another page
    ActivePageChanged {
        from: usize,
        to: usize,
        cause: MigrationCause,
    },
    /// The page shown in the status indicator changed
    CurrentPageChanged { page: usize },
    /// Apply this scroll offset to the container
    ScrollTo { offset: f32 },
    /// Place the caret at a point once the live surface is on `page`
    PlaceCaret {
        page: usize,
        x: f32,
        y: f32,
        document_y: f32,
    },
    Mount { pages: Vec<usize> },
    Unmount { pages: Vec<usize> },
    /// The mirror snapshot HTML changed
    MirrorRefreshed { version: u64 },
    ModeChanged { mode: ViewMode },
    /// Zoom or the effective pages per row changed
    GridChanged { zoom: f32, pages_per_row: usize },
}

impl From<Migration> for ViewPatch {
    fn from(migration: Migration) -> Self {
        ViewPatch::ActivePageChanged {
            from: migration.from,
            to: migration.to,
            cause: migration.cause,
        }
    }
}

/// Patches produced by one engine step
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewDiff {
    pub version: u64,
    pub patches: Vec<ViewPatch>,
}

impl ViewDiff {
    pub fn new(version: u64) -> Self {
        Self {
            version,
            patches: Vec::new(),
        }
    }

    pub fn add_patch(&mut self, patch: ViewPatch) {
        self.patches.push(patch);
    }

    pub fn has_patches(&self) -> bool {
        !self.patches.is_empty()
    }

    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }
}

/// Compares successive page lists
#[derive(Debug, Clone, Default)]
pub struct PageDiffer {
    previous: Vec<PageInfo>,
}

impl PageDiffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous(&self) -> &[PageInfo] {
        &self.previous
    }

    /// Record `current` and describe how it differs from the last list.
    /// Returns `None` when nothing changed.
    pub fn update(&mut self, current: &[PageInfo]) -> Option<ViewPatch> {
        if self.previous.as_slice() == current {
            return None;
        }

        let prev_len = self.previous.len();
        let curr_len = current.len();
        let added = (prev_len..curr_len).collect();
        let removed = (curr_len..prev_len).collect();
        let moved = current
            .iter()
            .zip(&self.previous)
            .filter(|(curr, prev)| curr != prev)
            .map(|(curr, _)| curr.index)
            .collect();

        self.previous = current.to_vec();
        Some(ViewPatch::PagesChanged {
            total_pages: curr_len,
            added,
            removed,
            moved,
        })
    }

    pub fn clear(&mut self) {
        self.previous.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_uniform_pages;

    #[test]
    fn test_view_diff() {
        let mut diff = ViewDiff::new(1);
        assert!(!diff.has_patches());

        diff.add_patch(ViewPatch::CurrentPageChanged { page: 2 });
        diff.add_patch(ViewPatch::ScrollTo { offset: 10.0 });

        assert_eq!(diff.version, 1);
        assert_eq!(diff.patch_count(), 2);
    }

    #[test]
    fn test_page_differ() {
        let mut differ = PageDiffer::new();
        let three = compute_uniform_pages(2500.0, 1000.0);
        match differ.update(&three) {
            Some(ViewPatch::PagesChanged { total_pages, added, .. }) => {
                assert_eq!(total_pages, 3);
                assert_eq!(added, vec![0, 1, 2]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(differ.update(&three).is_none());

        let two = compute_uniform_pages(1800.0, 1000.0);
        match differ.update(&two) {
            Some(ViewPatch::PagesChanged { removed, moved, .. }) => {
                assert_eq!(removed, vec![2]);
                assert_eq!(moved, vec![1]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_patch_json() {
        let patch = ViewPatch::PlaceCaret {
            page: 1,
            x: 2.0,
            y: 3.0,
            document_y: 900.0,
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"type":"placeCaret","page":1,"x":2.0,"y":3.0,"documentY":900.0}"#);
    }
}
