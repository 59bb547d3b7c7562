//! Active page tracking: which page hosts the live editing surface

use crate::layout::{page_at_offset, LayoutMeasurer, PageInfo};
use crate::view::ViewMode;
use crate::Point;
use log::{debug, trace};
use serde::Serialize;

/// Why the surface moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MigrationCause {
    /// The caret crossed a page boundary
    Caret,
    /// The user clicked an inactive page
    Click,
    /// User scrolling settled on another page
    Scroll,
    /// The page count shrank below the active page
    Clamp,
}

/// A completed hand-off of the editing surface between two pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Migration {
    pub from: usize,
    pub to: usize,
    pub cause: MigrationCause,
}

/// Host command issued after a click migrated the surface: place the caret
/// at this point once the live surface is mounted on `page`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaretPlacement {
    pub page: usize,
    /// Click position relative to the page's content region
    pub point: Point,
    /// Same position in the flowing document
    pub document_point: Point,
}

/// Page holding a caret at `caret_top` pixels into the flowing content.
///
/// Continuous mode slices the content uniformly, so the page is the caret
/// offset divided by the usable height. Other modes locate the enclosing
/// page record.
pub fn caret_page(caret_top: f32, pages: &[PageInfo], mode: ViewMode, usable_height: f32) -> usize {
    let last = pages.len().saturating_sub(1);
    if !caret_top.is_finite() {
        return 0;
    }
    if mode.breaks_on_blocks() {
        return page_at_offset(pages, caret_top);
    }
    if usable_height <= 0.0 || !usable_height.is_finite() || caret_top <= 0.0 {
        return 0;
    }
    ((caret_top / usable_height).floor() as usize).min(last)
}

/// Owner of the active page index.
///
/// Exactly one page is active at any time; every change goes through
/// [`ActivePageTracker::activate`], which replaces the index in one step.
#[derive(Debug, Clone)]
pub struct ActivePageTracker {
    active: usize,
    total_pages: usize,
}

impl Default for ActivePageTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivePageTracker {
    pub fn new() -> Self {
        Self {
            active: 0,
            total_pages: 1,
        }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn is_active(&self, page: usize) -> bool {
        page == self.active
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Follow a new page count, pulling the active page back into range
    pub fn set_total_pages(&mut self, total_pages: usize) -> Option<Migration> {
        self.total_pages = total_pages.max(1);
        if self.active >= self.total_pages {
            return self.activate(self.total_pages - 1, MigrationCause::Clamp);
        }
        None
    }

    /// Move the surface to `page` (clamped). Returns `None` if it is already there.
    pub fn activate(&mut self, page: usize, cause: MigrationCause) -> Option<Migration> {
        let to = page.min(self.total_pages - 1);
        if to == self.active {
            return None;
        }
        let migration = Migration {
            from: self.active,
            to,
            cause,
        };
        self.active = to;
        debug!("active page: {} -> {} ({:?})", migration.from, to, cause);
        Some(migration)
    }

    /// Caret moved to a known offset in the flowing content
    pub fn on_caret_offset(
        &mut self,
        caret_top: f32,
        pages: &[PageInfo],
        mode: ViewMode,
        usable_height: f32,
    ) -> Option<Migration> {
        let page = caret_page(caret_top, pages, mode, usable_height);
        self.activate(page, MigrationCause::Caret)
    }

    /// Selection changed on the live surface. A failed coordinate lookup
    /// skips this update; the next selection change resolves it.
    pub fn on_selection_change<M>(
        &mut self,
        measurer: &M,
        caret_pos: usize,
        pages: &[PageInfo],
        mode: ViewMode,
        usable_height: f32,
    ) -> Option<Migration>
    where
        M: LayoutMeasurer + ?Sized,
    {
        match measurer.coords_at(caret_pos) {
            Ok(coords) => self.on_caret_offset(coords.top, pages, mode, usable_height),
            Err(err) => {
                trace!("active page: caret lookup skipped: {err}");
                None
            }
        }
    }

    /// Click on a page frame. Clicking the active page is handled by the
    /// live surface itself; clicking another page migrates first and then
    /// asks the host to place the caret.
    pub fn on_page_click(
        &mut self,
        page: usize,
        point: Point,
        pages: &[PageInfo],
    ) -> Option<(Migration, CaretPlacement)> {
        if page >= self.total_pages {
            return None;
        }
        let migration = self.activate(page, MigrationCause::Click)?;
        let start = pages.get(page).map(|p| p.start_offset).unwrap_or(0.0);
        let placement = CaretPlacement {
            page,
            point,
            document_point: Point {
                x: point.x,
                y: start + point.y,
            },
        };
        Some((migration, placement))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{BlockKind, Document};
    use crate::layout::{compute_pages, compute_uniform_pages, measure_blocks, SyntheticMeasurer};

    fn paged(heights: &[f32], usable: f32) -> (SyntheticMeasurer, Vec<PageInfo>) {
        let doc = Document::with_blocks("t", heights.iter().map(|_| BlockKind::paragraph("x")));
        let measurer = SyntheticMeasurer::new(heights.to_vec());
        let blocks = measure_blocks(&measurer, &doc).unwrap();
        let pages = compute_pages(&blocks, &doc.manual_breaks(), usable);
        (measurer, pages)
    }

    #[test]
    fn test_caret_page_continuous_divides() {
        let pages = compute_uniform_pages(2500.0, 1000.0);
        assert_eq!(caret_page(0.0, &pages, ViewMode::Continuous, 1000.0), 0);
        assert_eq!(caret_page(999.0, &pages, ViewMode::Continuous, 1000.0), 0);
        assert_eq!(caret_page(1000.0, &pages, ViewMode::Continuous, 1000.0), 1);
        // Clamped to the last page
        assert_eq!(caret_page(9000.0, &pages, ViewMode::Continuous, 1000.0), 2);
        assert_eq!(caret_page(500.0, &pages, ViewMode::Continuous, 0.0), 0);
    }

    #[test]
    fn test_caret_page_uses_page_records() {
        let (_, pages) = paged(&[400.0, 400.0, 400.0], 1000.0);
        assert_eq!(caret_page(850.0, &pages, ViewMode::Page, 1000.0), 1);
        assert_eq!(caret_page(799.0, &pages, ViewMode::Page, 1000.0), 0);
    }

    #[test]
    fn test_selection_migrates_once() {
        let (measurer, pages) = paged(&[400.0, 400.0, 400.0], 1000.0);
        let mut tracker = ActivePageTracker::new();
        tracker.set_total_pages(pages.len());

        let migration = tracker
            .on_selection_change(&measurer, 2, &pages, ViewMode::Page, 1000.0)
            .unwrap();
        assert_eq!((migration.from, migration.to), (0, 1));
        assert_eq!(migration.cause, MigrationCause::Caret);
        // Same page again: no migration
        assert!(tracker
            .on_selection_change(&measurer, 2, &pages, ViewMode::Page, 1000.0)
            .is_none());
    }

    #[test]
    fn test_failed_lookup_is_skipped() {
        let (measurer, pages) = paged(&[400.0, 400.0, 400.0], 1000.0);
        let mut tracker = ActivePageTracker::new();
        tracker.set_total_pages(pages.len());
        assert!(tracker
            .on_selection_change(&measurer, 99, &pages, ViewMode::Page, 1000.0)
            .is_none());
        assert_eq!(tracker.active(), 0);
    }

    #[test]
    fn test_click_migrates_then_places_caret() {
        let (_, pages) = paged(&[400.0, 400.0, 400.0], 1000.0);
        let mut tracker = ActivePageTracker::new();
        tracker.set_total_pages(pages.len());

        let (migration, placement) = tracker
            .on_page_click(1, Point { x: 10.0, y: 20.0 }, &pages)
            .unwrap();
        assert_eq!(migration.to, 1);
        assert!(tracker.is_active(1));
        assert_eq!(placement.document_point.y, 820.0);

        // Clicking the active page leaves it to the surface
        assert!(tracker.on_page_click(1, Point::default(), &pages).is_none());
        // Out of range clicks are ignored
        assert!(tracker.on_page_click(7, Point::default(), &pages).is_none());
    }

    #[test]
    fn test_shrinking_page_count_clamps() {
        let mut tracker = ActivePageTracker::new();
        tracker.set_total_pages(5);
        tracker.activate(4, MigrationCause::Click);
        let migration = tracker.set_total_pages(2).unwrap();
        assert_eq!(migration.cause, MigrationCause::Clamp);
        assert_eq!(tracker.active(), 1);
        tracker.set_total_pages(0);
        assert_eq!(tracker.total_pages(), 1);
        assert_eq!(tracker.active(), 0);
    }

    #[test]
    fn test_exactly_one_active() {
        let mut tracker = ActivePageTracker::new();
        tracker.set_total_pages(4);
        for target in [3, 0, 2, 9] {
            tracker.activate(target, MigrationCause::Caret);
            let active: Vec<_> = (0..4).filter(|&p| tracker.is_active(p)).collect();
            assert_eq!(active.len(), 1);
        }
        assert_eq!(tracker.active(), 3);
    }
}
