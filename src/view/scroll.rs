//! Scroll synchronisation between the scroll container and page numbers
//!
//! Programmatic scrolls run as an explicit state machine advanced by
//! animation-frame ticks. While a programmatic scroll is animating or
//! settling, scroll events never trigger active-page migration.

use crate::layout::RowMetrics;
use crate::view::schedule::Debouncer;
use log::{debug, trace};

/// Quiet period after an animation ends before user scrolling is trusted again
pub const SETTLE_MS: f64 = 50.0;

// Tolerance when locating a page from flowing offsets
const OFFSET_EPSILON: f32 = 1e-3;

/// Geometry of the scrolled content
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollLayout {
    /// Page frames laid out in rows
    Grid(RowMetrics),
    /// A single flowing surface; page starts are offsets into it
    Flow { starts: Vec<f32>, content_height: f32 },
}

impl ScrollLayout {
    /// Scroll offset that brings a page to the top of the viewport
    pub fn offset_for_page(&self, page: usize) -> f32 {
        match self {
            ScrollLayout::Grid(metrics) => metrics.offset_for_page(page),
            ScrollLayout::Flow { starts, .. } => starts.get(page).copied().unwrap_or(0.0),
        }
    }

    /// Page at the top of the viewport, clamped to `[0, total_pages - 1]`
    pub fn page_at_offset(&self, offset: f32, total_pages: usize) -> usize {
        let last = total_pages.saturating_sub(1);
        match self {
            ScrollLayout::Grid(metrics) => metrics.page_at_offset(offset, total_pages),
            ScrollLayout::Flow { starts, .. } => {
                if !offset.is_finite() {
                    return 0;
                }
                starts
                    .partition_point(|s| *s <= offset + OFFSET_EPSILON)
                    .saturating_sub(1)
                    .min(last)
            }
        }
    }

    /// Page nearest the vertical centre of the viewport
    pub fn page_at_center(&self, offset: f32, viewport_height: f32, total_pages: usize) -> usize {
        let center = offset + viewport_height.max(0.0) / 2.0;
        match self {
            ScrollLayout::Grid(metrics) => {
                let page = metrics.row_at_offset(center) * metrics.pages_per_row;
                page.min(total_pages.saturating_sub(1))
            }
            ScrollLayout::Flow { .. } => self.page_at_offset(center, total_pages),
        }
    }

    pub fn content_height(&self, total_pages: usize) -> f32 {
        match self {
            ScrollLayout::Grid(metrics) => metrics.content_height(total_pages),
            ScrollLayout::Flow { content_height, .. } => *content_height,
        }
    }
}

/// Programmatic scroll state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollState {
    Idle,
    Animating {
        from: f32,
        target: f32,
        target_page: usize,
        start_time: f64,
        duration: f64,
    },
    Settling {
        since: f64,
        target_page: usize,
    },
}

/// Result of one animation-frame tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollStep {
    /// Offset the host must apply to the scroll container
    pub scroll_to: Option<f32>,
    /// The displayed current page changed
    pub current_page_changed: bool,
    /// User scrolling settled; this page should become active
    pub activate: Option<usize>,
}

/// Ease-in-out cubic over `t` in `[0, 1]`
pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[derive(Debug, Clone)]
pub struct ScrollSynchronizer {
    layout: ScrollLayout,
    total_pages: usize,
    offset: f32,
    viewport_height: f32,
    current_page: usize,
    state: ScrollState,
    duration_ms: f64,
    idle: Debouncer,
}

impl ScrollSynchronizer {
    pub fn new(layout: ScrollLayout, duration_ms: f64, idle_ms: f64) -> Self {
        Self {
            layout,
            total_pages: 1,
            offset: 0.0,
            viewport_height: 0.0,
            current_page: 0,
            state: ScrollState::Idle,
            duration_ms: if duration_ms.is_finite() { duration_ms.max(0.0) } else { 0.0 },
            idle: Debouncer::new(idle_ms),
        }
    }

    pub fn layout(&self) -> &ScrollLayout {
        &self.layout
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Whether a programmatic scroll is in progress
    pub fn is_auto_scrolling(&self) -> bool {
        !matches!(self.state, ScrollState::Idle)
    }

    pub fn set_duration(&mut self, duration_ms: f64) {
        self.duration_ms = if duration_ms.is_finite() { duration_ms.max(0.0) } else { 0.0 };
    }

    pub fn set_idle_delay(&mut self, idle_ms: f64) {
        self.idle.set_delay(idle_ms);
    }

    /// Replace the geometry after pagination, zoom or pages-per-row changed.
    /// A running animation is retargeted at its page's new offset.
    pub fn set_layout(&mut self, layout: ScrollLayout, total_pages: usize) {
        self.layout = layout;
        self.total_pages = total_pages.max(1);
        self.current_page = self.current_page.min(self.total_pages - 1);

        match self.state {
            ScrollState::Animating {
                from,
                target_page,
                start_time,
                duration,
                ..
            } => {
                let target_page = target_page.min(self.total_pages - 1);
                let target = self.clamp_offset(self.layout.offset_for_page(target_page));
                self.state = ScrollState::Animating {
                    from,
                    target,
                    target_page,
                    start_time,
                    duration,
                };
            }
            ScrollState::Settling { since, target_page } => {
                self.state = ScrollState::Settling {
                    since,
                    target_page: target_page.min(self.total_pages - 1),
                };
            }
            ScrollState::Idle => {}
        }
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = if height.is_finite() { height.max(0.0) } else { 0.0 };
    }

    /// Largest reachable scroll offset
    pub fn max_scroll(&self) -> f32 {
        (self.layout.content_height(self.total_pages) - self.viewport_height).max(0.0)
    }

    fn clamp_offset(&self, offset: f32) -> f32 {
        if offset.is_finite() {
            offset.clamp(0.0, self.max_scroll())
        } else {
            0.0
        }
    }

    /// Start an animated scroll to the top of `page`'s row. Out-of-range
    /// pages are clamped. Returns the page actually targeted.
    pub fn scroll_to_page(&mut self, page: usize, now: f64) -> usize {
        let target_page = page.min(self.total_pages - 1);
        let target = self.clamp_offset(self.layout.offset_for_page(target_page));
        self.idle.cancel();
        self.state = ScrollState::Animating {
            from: self.offset,
            target,
            target_page,
            start_time: now,
            duration: self.duration_ms,
        };
        debug!(
            "scroll: to page {} (offset {:.1} -> {:.1})",
            target_page, self.offset, target
        );
        target_page
    }

    /// Advance the animation and the idle timer
    pub fn tick(&mut self, now: f64) -> ScrollStep {
        let before = self.current_page;
        let mut step = ScrollStep::default();

        match self.state {
            ScrollState::Animating {
                from,
                target,
                target_page,
                start_time,
                duration,
            } => {
                let t = if duration <= 0.0 {
                    1.0
                } else {
                    ((now - start_time) / duration).clamp(0.0, 1.0)
                };
                if t >= 1.0 {
                    self.offset = target;
                    self.current_page = target_page;
                    self.state = ScrollState::Settling {
                        since: now,
                        target_page,
                    };
                } else {
                    let eased = ease_in_out_cubic(t) as f32;
                    self.offset = from + (target - from) * eased;
                    self.current_page = self.layout.page_at_offset(self.offset, self.total_pages);
                }
                step.scroll_to = Some(self.offset);
            }
            ScrollState::Settling { since, target_page } => {
                if now - since >= SETTLE_MS {
                    self.current_page = target_page;
                    self.state = ScrollState::Idle;
                    trace!("scroll: settled on page {}", target_page);
                }
            }
            ScrollState::Idle => {
                if self.idle.fire_if_due(now) {
                    let page = self.layout.page_at_center(
                        self.offset,
                        self.viewport_height,
                        self.total_pages,
                    );
                    step.activate = Some(page);
                }
            }
        }

        step.current_page_changed = before != self.current_page;
        step
    }

    /// Scroll event from the container. Returns true if the displayed
    /// current page changed. Events caused by a programmatic scroll only
    /// record the offset.
    pub fn on_scroll(&mut self, offset: f32, now: f64) -> bool {
        self.offset = if offset.is_finite() { offset.max(0.0) } else { 0.0 };
        if self.is_auto_scrolling() {
            return false;
        }

        let before = self.current_page;
        self.current_page = self.layout.page_at_offset(self.offset, self.total_pages);
        self.idle.arm(now);
        before != self.current_page
    }

    /// User input during a programmatic scroll cancels it
    pub fn interrupt(&mut self) {
        if self.is_auto_scrolling() {
            trace!("scroll: animation interrupted at {:.1}", self.offset);
            self.state = ScrollState::Idle;
            self.current_page = self.layout.page_at_offset(self.offset, self.total_pages);
        }
    }

    /// Drop the animation and the idle timer
    pub fn cancel(&mut self) {
        self.state = ScrollState::Idle;
        self.idle.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PageDimensions;

    const A4: PageDimensions = PageDimensions::new(794.0, 1123.0);

    fn grid(per_row: usize, total: usize) -> ScrollSynchronizer {
        let mut sync = ScrollSynchronizer::new(
            ScrollLayout::Grid(RowMetrics::new(A4, 1.0, per_row)),
            300.0,
            200.0,
        );
        sync.set_layout(ScrollLayout::Grid(RowMetrics::new(A4, 1.0, per_row)), total);
        sync.set_viewport_height(900.0);
        sync
    }

    fn run_to_idle(sync: &mut ScrollSynchronizer, start: f64) -> f64 {
        let mut now = start;
        while sync.is_auto_scrolling() {
            now += 16.0;
            sync.tick(now);
        }
        now
    }

    #[test]
    fn test_easing_endpoints() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_navigation_round_trip() {
        let mut sync = grid(1, 10);
        for page in [3, 0, 9, 5] {
            let target = sync.scroll_to_page(page, 1000.0 * page as f64);
            assert_eq!(target, page);
            run_to_idle(&mut sync, 1000.0 * page as f64);
            assert_eq!(sync.current_page(), page);
        }
    }

    #[test]
    fn test_target_clamped() {
        let mut sync = grid(1, 4);
        assert_eq!(sync.scroll_to_page(usize::MAX, 0.0), 3);
        run_to_idle(&mut sync, 0.0);
        assert_eq!(sync.current_page(), 3);
        assert!(sync.offset() <= sync.max_scroll());
    }

    #[test]
    fn test_row_aware_target() {
        let mut sync = grid(2, 10);
        sync.scroll_to_page(5, 0.0);
        match sync.state() {
            ScrollState::Animating { target, .. } => {
                assert_eq!(target, RowMetrics::new(A4, 1.0, 2).offset_for_page(4));
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn test_auto_scroll_events_do_not_arm_idle() {
        let mut sync = grid(1, 10);
        sync.scroll_to_page(4, 0.0);
        let step = sync.tick(100.0);
        let offset = step.scroll_to.unwrap();
        assert!(!sync.on_scroll(offset, 100.0));
        let now = run_to_idle(&mut sync, 100.0);
        // Nothing to activate after the programmatic scroll
        assert_eq!(sync.tick(now + 1000.0).activate, None);
    }

    #[test]
    fn test_user_scroll_settles_on_center_page() {
        let mut sync = grid(1, 10);
        let metrics = RowMetrics::new(A4, 1.0, 1);
        let offset = metrics.offset_for_page(2) + 900.0;
        assert!(sync.on_scroll(offset, 0.0));
        assert_eq!(sync.current_page(), 2);

        assert_eq!(sync.tick(150.0).activate, None);
        // Viewport centre is 450px further down, inside page 3's row
        assert_eq!(sync.tick(250.0).activate, Some(3));
        assert_eq!(sync.tick(500.0).activate, None);
    }

    #[test]
    fn test_interrupt() {
        let mut sync = grid(1, 10);
        sync.scroll_to_page(6, 0.0);
        sync.tick(100.0);
        sync.interrupt();
        assert_eq!(sync.state(), ScrollState::Idle);
        assert!(sync.current_page() < 6);
    }

    #[test]
    fn test_flow_layout() {
        let layout = ScrollLayout::Flow {
            starts: vec![0.0, 800.0, 1600.0],
            content_height: 2000.0,
        };
        assert_eq!(layout.page_at_offset(0.0, 3), 0);
        assert_eq!(layout.page_at_offset(800.0, 3), 1);
        assert_eq!(layout.page_at_offset(5000.0, 3), 2);
        assert_eq!(layout.page_at_center(1200.0, 900.0, 3), 2);
    }

    #[test]
    fn test_relayout_retargets_animation() {
        let mut sync = grid(1, 10);
        sync.scroll_to_page(8, 0.0);
        sync.set_layout(ScrollLayout::Grid(RowMetrics::new(A4, 1.0, 1)), 3);
        let now = run_to_idle(&mut sync, 0.0);
        assert!(now > 0.0);
        assert_eq!(sync.current_page(), 2);
    }
}
