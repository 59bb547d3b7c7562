//! Viewport visibility: which pages are mounted

use crate::Rect;
use rustc_hash::{FxHashMap, FxHashSet};

/// Pre-load distance above and below the viewport
pub const PRELOAD_MARGIN: f32 = 200.0;

/// Pages that entered or left the mounted set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityChange {
    pub mounted: Vec<usize>,
    pub unmounted: Vec<usize>,
}

impl VisibilityChange {
    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty() && self.unmounted.is_empty()
    }
}

/// Tracks observed page frames against the scroll viewport.
///
/// A page is mounted when it intersects the viewport (grown by the pre-load
/// margin) or lies within `overscan` pages of one that does. When nothing
/// intersects, the previous set is kept.
#[derive(Debug, Clone)]
pub struct VisibilityTracker {
    overscan: usize,
    margin: f32,
    total_pages: usize,
    /// Frame bounds in scroll-container coordinates
    observed: FxHashMap<usize, Rect>,
    viewport: Option<(f32, f32)>,
    intersecting: FxHashSet<usize>,
    mounted: FxHashSet<usize>,
}

impl VisibilityTracker {
    pub fn new(overscan: usize) -> Self {
        let mut mounted = FxHashSet::default();
        mounted.insert(0);
        Self {
            overscan,
            margin: PRELOAD_MARGIN,
            total_pages: 1,
            observed: FxHashMap::default(),
            viewport: None,
            intersecting: FxHashSet::default(),
            mounted,
        }
    }

    pub fn overscan(&self) -> usize {
        self.overscan
    }

    pub fn set_overscan(&mut self, overscan: usize) -> VisibilityChange {
        self.overscan = overscan;
        self.refresh()
    }

    /// Register or move a page frame
    pub fn observe(&mut self, page: usize, bounds: Rect) {
        self.observed.insert(page, bounds);
    }

    pub fn unobserve(&mut self, page: usize) {
        self.observed.remove(&page);
    }

    /// Follow a new page count, forgetting pages that no longer exist
    pub fn set_total_pages(&mut self, total_pages: usize) -> VisibilityChange {
        self.total_pages = total_pages.max(1);
        let total = self.total_pages;
        self.observed.retain(|page, _| *page < total);
        self.refresh()
    }

    /// Viewport moved or resized
    pub fn update_viewport(&mut self, scroll_top: f32, height: f32) -> VisibilityChange {
        if scroll_top.is_finite() && height.is_finite() {
            self.viewport = Some((scroll_top, height.max(0.0)));
        }
        self.refresh()
    }

    /// Recompute the mounted set from the current frames and viewport
    pub fn refresh(&mut self) -> VisibilityChange {
        let Some((top, height)) = self.viewport else {
            return self.drop_out_of_range();
        };
        let lo = top - self.margin;
        let hi = top + height + self.margin;

        self.intersecting = self
            .observed
            .iter()
            .filter(|(page, rect)| {
                **page < self.total_pages && rect.y < hi && rect.y + rect.height > lo
            })
            .map(|(page, _)| *page)
            .collect();

        if self.intersecting.is_empty() {
            return self.drop_out_of_range();
        }

        let last = self.total_pages - 1;
        let mut next = FxHashSet::default();
        for &page in &self.intersecting {
            let first = page.saturating_sub(self.overscan);
            let end = page.saturating_add(self.overscan).min(last);
            next.extend(first..=end);
        }
        self.replace_mounted(next)
    }

    fn drop_out_of_range(&mut self) -> VisibilityChange {
        let total = self.total_pages;
        let mut next: FxHashSet<usize> = self.mounted.iter().copied().filter(|p| *p < total).collect();
        if next.is_empty() {
            next.insert(0);
        }
        self.replace_mounted(next)
    }

    fn replace_mounted(&mut self, next: FxHashSet<usize>) -> VisibilityChange {
        let mut change = VisibilityChange {
            mounted: next.difference(&self.mounted).copied().collect(),
            unmounted: self.mounted.difference(&next).copied().collect(),
        };
        change.mounted.sort_unstable();
        change.unmounted.sort_unstable();
        self.mounted = next;
        change
    }

    /// Whether a page is mounted (visible or overscanned)
    pub fn is_visible(&self, page: usize) -> bool {
        self.mounted.contains(&page)
    }

    /// Whether a page actually intersects the pre-load area
    pub fn is_intersecting(&self, page: usize) -> bool {
        self.intersecting.contains(&page)
    }

    /// Mounted pages in ascending order
    pub fn mounted(&self) -> Vec<usize> {
        let mut pages: Vec<_> = self.mounted.iter().copied().collect();
        pages.sort_unstable();
        pages
    }

    /// Back to the initial state: only the first page mounted
    pub fn reset(&mut self) {
        self.observed.clear();
        self.intersecting.clear();
        self.viewport = None;
        self.mounted.clear();
        self.mounted.insert(0);
    }
}
