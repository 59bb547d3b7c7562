//! Page-View: pagination and virtual page rendering for a single live
//! editing surface
//!
//! This crate provides the page view engine with:
//! - Block-level page break computation with manual breaks
//! - One active page hosting the live surface, static mirrors elsewhere
//! - Viewport virtualisation with overscan
//! - Animated, feedback-safe scroll synchronisation
//! - Header/footer variable resolution

pub mod document;
pub mod error;
pub mod layout;
pub mod render;
pub mod settings;
pub mod template;
pub mod view;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::WasmPageView;

// Re-export primary types
pub use document::{Block, BlockId, BlockKind, Document, UpdateOrigin};
pub use error::{ContentError, MeasureError, SettingsError};
pub use layout::{
    compute_pages, BlockHeight, BlockRange, CaretCoords, LayoutMeasurer, PageDimensions, PageInfo,
    PagesPerRow, SyntheticMeasurer,
};
pub use render::{FrameList, PageFrame, ViewDiff, ViewPatch};
pub use settings::PageSettings;
pub use template::resolve;
pub use view::{MigrationCause, ViewMode};

use chrono::NaiveDate;
use layout::{compute_pages_in, compute_uniform_pages, measure_blocks, RowMetrics};
use log::{debug, trace};
use render::{build_frames, FrameInputs, MirrorRenderer, PageDiffer};
use serde::Serialize;
use template::VariableContext;
use view::{
    ActivePageTracker, Debouncer, FrameQueue, FrameTask, ScrollLayout, ScrollSynchronizer,
    VisibilityChange, VisibilityTracker,
};

/// Page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Page rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

/// Status bar values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewStatus {
    /// 1-based
    pub current_page: usize,
    pub total_pages: usize,
    pub zoom: f32,
    pub pages_per_row: PagesPerRow,
    /// Columns actually used
    pub effective_pages_per_row: usize,
    pub view_mode: ViewMode,
}

/// The page view engine combining all components.
///
/// The host forwards surface and container events, calls
/// [`PageView::on_animation_frame`] once per frame, and applies the returned
/// [`ViewDiff`].
pub struct PageView {
    settings: PageSettings,
    document: Document,
    pages: Vec<PageInfo>,
    /// Height of the flowing content at the last measurement
    flow_height: f32,
    active: ActivePageTracker,
    scroll: ScrollSynchronizer,
    visibility: VisibilityTracker,
    mirror: MirrorRenderer,
    differ: PageDiffer,
    recompute: Debouncer,
    frame_queue: FrameQueue,
    container_width: f32,
    effective_per_row: usize,
    caret_pos: Option<usize>,
    /// Fixed date for `{{date.format}}`; today when unset
    date: Option<NaiveDate>,
    outbox: ViewDiff,
}

impl PageView {
    /// Create a page view over an empty document
    pub fn new(settings: PageSettings) -> Self {
        Self::with_document(settings, Document::default())
    }

    pub fn with_document(settings: PageSettings, document: Document) -> Self {
        let metrics = RowMetrics::new(settings.page_dimensions(), settings.zoom, 1);
        let mut view = Self {
            pages: compute_uniform_pages(0.0, settings.usable_height()),
            flow_height: 0.0,
            active: ActivePageTracker::new(),
            scroll: ScrollSynchronizer::new(
                ScrollLayout::Grid(metrics),
                settings.scroll_animation_ms,
                settings.scroll_idle_ms,
            ),
            visibility: VisibilityTracker::new(settings.overscan),
            mirror: MirrorRenderer::new(),
            differ: PageDiffer::new(),
            recompute: Debouncer::new(settings.recompute_debounce_ms),
            frame_queue: FrameQueue::new(),
            container_width: 0.0,
            effective_per_row: 1,
            caret_pos: None,
            date: None,
            outbox: ViewDiff::default(),
            settings,
            document,
        };
        view.differ.update(&view.pages);
        view.relayout();
        view.request_full_refresh();
        view
    }

    pub fn settings(&self) -> &PageSettings {
        &self.settings
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access for the host's content sync. Call
    /// [`PageView::on_content_changed`] afterwards.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn pages(&self) -> &[PageInfo] {
        &self.pages
    }

    /// 0-based page shown in the status indicator
    pub fn current_page(&self) -> usize {
        self.scroll.current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }

    /// Page hosting the live editing surface
    pub fn active_page(&self) -> usize {
        self.active.active()
    }

    pub fn is_editable(&self, page: usize) -> bool {
        self.active.is_active(page)
    }

    pub fn is_auto_scrolling(&self) -> bool {
        self.scroll.is_auto_scrolling()
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll.offset()
    }

    pub fn mirror_html(&self) -> &str {
        self.mirror.html()
    }

    pub fn mounted_pages(&self) -> Vec<usize> {
        self.visibility.mounted()
    }

    pub fn status(&self) -> ViewStatus {
        ViewStatus {
            current_page: self.current_page() + 1,
            total_pages: self.total_pages(),
            zoom: self.settings.zoom,
            pages_per_row: self.settings.pages_per_row,
            effective_pages_per_row: self.effective_per_row,
            view_mode: self.settings.view_mode,
        }
    }

    /// Pin the date used by `{{date.format}}`
    pub fn set_date(&mut self, date: Option<NaiveDate>) {
        self.date = date;
    }

    fn variables(&self) -> VariableContext<'_> {
        let ctx = VariableContext::new(1, self.total_pages(), self.document.title())
            .with_number(self.document.number());
        match self.date {
            Some(date) => ctx.with_date(date),
            None => ctx,
        }
    }

    fn request_full_refresh(&mut self) {
        self.frame_queue.request(FrameTask::Measure);
        self.frame_queue.request(FrameTask::Mirror);
        self.frame_queue.request(FrameTask::Visibility);
    }

    // ---- settings ----

    /// Replace the page settings; pages are recomputed on the next frame.
    /// Invalid settings are rejected and the current ones kept.
    pub fn update_settings(&mut self, mut settings: PageSettings) -> Result<(), SettingsError> {
        settings.validate()?;
        settings.normalize();
        let mode_changed = settings.view_mode != self.settings.view_mode;
        self.scroll.set_duration(settings.scroll_animation_ms);
        self.scroll.set_idle_delay(settings.scroll_idle_ms);
        self.recompute.set_delay(settings.recompute_debounce_ms);
        let overscan = settings.overscan;
        self.settings = settings;
        if mode_changed {
            self.outbox.add_patch(ViewPatch::ModeChanged {
                mode: self.settings.view_mode,
            });
        }
        let change = self.visibility.set_overscan(overscan);
        self.push_visibility(change);
        self.relayout();
        self.frame_queue.request(FrameTask::Measure);
        self.frame_queue.request(FrameTask::Visibility);
        Ok(())
    }

    pub fn zoom(&self) -> f32 {
        self.settings.zoom
    }

    /// Set the zoom factor (clamped). Only the grid changes; content
    /// heights are unscaled.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.settings.set_zoom(zoom);
        self.relayout();
        self.frame_queue.request(FrameTask::Visibility);
    }

    pub fn pages_per_row(&self) -> PagesPerRow {
        self.settings.pages_per_row
    }

    pub fn effective_pages_per_row(&self) -> usize {
        self.effective_per_row
    }

    pub fn set_pages_per_row(&mut self, pages_per_row: PagesPerRow) {
        self.settings.pages_per_row = pages_per_row;
        self.relayout();
        self.frame_queue.request(FrameTask::Visibility);
    }

    pub fn view_mode(&self) -> ViewMode {
        self.settings.view_mode
    }

    /// Select a view mode. Pages are recomputed from scratch for the new
    /// mode on the next frame.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if mode == self.settings.view_mode {
            return;
        }
        debug!("view mode: {} -> {}", self.settings.view_mode.name(), mode.name());
        self.settings.view_mode = mode;
        self.scroll.cancel();
        self.outbox.add_patch(ViewPatch::ModeChanged { mode });
        self.relayout();
        self.request_full_refresh();
    }

    /// Cycle `scroll → continuous → page → scroll`
    pub fn toggle_view_mode(&mut self) -> ViewMode {
        let next = self.settings.view_mode.next();
        self.set_view_mode(next);
        next
    }

    // ---- surface events ----

    /// The content tree changed. Edits typed into the live surface are
    /// debounced; external updates are picked up on the next frame.
    pub fn on_content_changed(&mut self, now: f64) {
        match self.document.last_origin() {
            UpdateOrigin::Surface => self.recompute.arm(now),
            UpdateOrigin::External => {
                self.recompute.cancel();
                self.frame_queue.request(FrameTask::Measure);
                self.frame_queue.request(FrameTask::Mirror);
            }
        }
    }

    /// Replace the whole content programmatically
    pub fn replace_content(&mut self, blocks: Vec<Block>, now: f64) {
        self.document.replace_blocks(blocks, UpdateOrigin::External);
        self.on_content_changed(now);
    }

    /// Caret moved on the live surface
    pub fn on_selection_change<M>(&mut self, measurer: &M, caret_pos: usize, now: f64) -> ViewDiff
    where
        M: LayoutMeasurer + ?Sized,
    {
        self.caret_pos = Some(caret_pos);
        self.follow_caret(measurer, now);
        self.drain()
    }

    fn follow_caret<M>(&mut self, measurer: &M, now: f64)
    where
        M: LayoutMeasurer + ?Sized,
    {
        let Some(pos) = self.caret_pos else {
            return;
        };
        let migration = self.active.on_selection_change(
            measurer,
            pos,
            &self.pages,
            self.settings.view_mode,
            self.settings.usable_height(),
        );
        if let Some(migration) = migration {
            self.outbox.add_patch(migration.into());
            if self.settings.view_mode.is_paginated() {
                self.scroll.scroll_to_page(migration.to, now);
            }
        }
    }

    /// Click inside a page frame at a point relative to its content region.
    /// An inactive page takes the surface first, then the caret is placed.
    pub fn on_page_click(&mut self, page: usize, x: f32, y: f32) -> ViewDiff {
        if let Some((migration, placement)) =
            self.active.on_page_click(page, Point { x, y }, &self.pages)
        {
            self.outbox.add_patch(migration.into());
            self.outbox.add_patch(ViewPatch::PlaceCaret {
                page: placement.page,
                x: placement.point.x,
                y: placement.point.y,
                document_y: placement.document_point.y,
            });
        }
        self.drain()
    }

    // ---- container events ----

    /// Scroll event from the container
    pub fn on_scroll(&mut self, offset: f32, now: f64) -> ViewDiff {
        if self.scroll.on_scroll(offset, now) {
            self.outbox.add_patch(ViewPatch::CurrentPageChanged {
                page: self.scroll.current_page(),
            });
        }
        self.frame_queue.request(FrameTask::Visibility);
        self.drain()
    }

    /// Wheel, touch or keyboard scrolling by the user: cancels a running
    /// programmatic scroll
    pub fn on_user_scroll_input(&mut self) {
        self.scroll.interrupt();
    }

    /// Container resized
    pub fn on_resize(&mut self, container_width: f32, viewport_height: f32) {
        self.container_width = if container_width.is_finite() { container_width.max(0.0) } else { 0.0 };
        self.scroll.set_viewport_height(viewport_height);
        self.relayout();
        self.frame_queue.request(FrameTask::Measure);
        self.frame_queue.request(FrameTask::Visibility);
    }

    /// Register a page frame's bounds reported by the host
    pub fn observe_page(&mut self, page: usize, bounds: Rect) {
        self.visibility.observe(page, bounds);
        self.frame_queue.request(FrameTask::Visibility);
    }

    pub fn unobserve_page(&mut self, page: usize) {
        self.visibility.unobserve(page);
        self.frame_queue.request(FrameTask::Visibility);
    }

    pub fn is_visible(&self, page: usize) -> bool {
        self.visibility.is_visible(page)
    }

    // ---- commands ----

    /// Scroll to a page; out-of-range values are clamped. Returns the page
    /// actually targeted.
    pub fn navigate_to_page(&mut self, page: i64, now: f64) -> usize {
        let last = self.total_pages().saturating_sub(1);
        let page = page.clamp(0, last as i64) as usize;
        self.scroll.scroll_to_page(page, now)
    }

    // ---- lifecycle ----

    /// A new editing surface instance replaced the old one
    pub fn attach_surface(&mut self) {
        self.cancel_pending();
        self.request_full_refresh();
    }

    /// The view is being discarded: drop every pending timer and frame task
    pub fn teardown(&mut self) {
        self.cancel_pending();
        self.mirror.clear();
        self.visibility.reset();
    }

    fn cancel_pending(&mut self) {
        self.recompute.cancel();
        self.frame_queue.cancel_all();
        self.scroll.cancel();
        self.outbox.patches.clear();
    }

    // ---- frame loop ----

    /// Run deferred work for the animation frame at `now`
    pub fn on_animation_frame<M>(&mut self, now: f64, measurer: &M) -> ViewDiff
    where
        M: LayoutMeasurer + ?Sized,
    {
        if self.recompute.fire_if_due(now) {
            self.frame_queue.request(FrameTask::Measure);
            self.frame_queue.request(FrameTask::Mirror);
        }

        for task in self.frame_queue.take() {
            match task {
                FrameTask::Measure => {
                    if self.recompute_pages(measurer) {
                        self.frame_queue.request(FrameTask::Caret);
                        self.frame_queue.request(FrameTask::Visibility);
                    }
                }
                FrameTask::Mirror => {
                    self.mirror.request_refresh();
                    if self.mirror.on_frame(&self.document, now) {
                        self.outbox.add_patch(ViewPatch::MirrorRefreshed {
                            version: self.document.version(),
                        });
                    } else if self.mirror.is_dirty() {
                        // Already refreshed at this timestamp
                        self.frame_queue.request(FrameTask::Mirror);
                    }
                }
                FrameTask::Caret => self.follow_caret(measurer, now),
                FrameTask::Visibility => {
                    let change = self
                        .visibility
                        .update_viewport(self.scroll.offset(), self.scroll.viewport_height());
                    self.push_visibility(change);
                }
            }
        }

        // Tasks queued while running this frame belong to the next one, except
        // the follow-ups of a successful recompute
        for task in self.frame_queue.take() {
            match task {
                FrameTask::Caret => self.follow_caret(measurer, now),
                FrameTask::Visibility => {
                    let change = self
                        .visibility
                        .update_viewport(self.scroll.offset(), self.scroll.viewport_height());
                    self.push_visibility(change);
                }
                other => self.frame_queue.request(other),
            }
        }

        let step = self.scroll.tick(now);
        if let Some(offset) = step.scroll_to {
            self.outbox.add_patch(ViewPatch::ScrollTo { offset });
            self.frame_queue.request(FrameTask::Visibility);
        }
        if step.current_page_changed {
            self.outbox.add_patch(ViewPatch::CurrentPageChanged {
                page: self.scroll.current_page(),
            });
        }
        if let Some(page) = step.activate {
            if self.settings.view_mode.is_paginated() {
                if let Some(migration) = self.active.activate(page, MigrationCause::Scroll) {
                    self.outbox.add_patch(migration.into());
                }
            }
        }

        self.drain()
    }

    /// Re-measure and recompute pages. Returns false when the measurement
    /// failed; the work is retried on the next frame.
    fn recompute_pages<M>(&mut self, measurer: &M) -> bool
    where
        M: LayoutMeasurer + ?Sized,
    {
        let blocks = match measure_blocks(measurer, &self.document) {
            Ok(blocks) => blocks,
            Err(err) => {
                trace!("pages: measurement skipped: {err}");
                self.frame_queue.request(FrameTask::Measure);
                return false;
            }
        };

        let last_bottom = blocks.last().map(|b| b.bottom()).unwrap_or(0.0);
        let content_height = measurer.content_height();
        self.flow_height = if content_height.is_finite() {
            content_height.max(last_bottom)
        } else {
            last_bottom
        };

        let usable = self.settings.usable_height();
        self.pages = if self.settings.view_mode.breaks_on_blocks() {
            compute_pages_in(&blocks, &self.document.manual_breaks(), usable, self.flow_height)
        } else {
            compute_uniform_pages(self.flow_height, usable)
        };

        if let Some(patch) = self.differ.update(&self.pages) {
            debug!(
                "pages: {} page(s), usable height {:.1}, content height {:.1}",
                self.pages.len(),
                usable,
                self.flow_height
            );
            self.outbox.add_patch(patch);
        }
        if let Some(migration) = self.active.set_total_pages(self.pages.len()) {
            self.outbox.add_patch(migration.into());
        }
        self.relayout();
        true
    }

    /// Push the current pages, zoom and container width into the scroll
    /// and visibility trackers
    fn relayout(&mut self) {
        let dims = self.settings.page_dimensions();
        let zoom = self.settings.zoom;
        let per_row = if self.settings.view_mode.allows_grid() {
            self.settings
                .pages_per_row
                .effective(dims.width, zoom, self.container_width)
        } else {
            1
        };
        let metrics = RowMetrics::new(dims, zoom, per_row);
        let total = self.pages.len();

        let layout = if self.settings.view_mode.is_paginated() {
            ScrollLayout::Grid(metrics)
        } else {
            ScrollLayout::Flow {
                starts: self.pages.iter().map(|p| p.start_offset * zoom).collect(),
                content_height: self.flow_height * zoom,
            }
        };
        let grid_changed = per_row != self.effective_per_row
            || matches!(self.scroll.layout(), ScrollLayout::Grid(old) if old.page_width != metrics.page_width);
        self.scroll.set_layout(layout, total);
        if grid_changed {
            self.outbox.add_patch(ViewPatch::GridChanged {
                zoom,
                pages_per_row: per_row,
            });
        }
        self.effective_per_row = per_row;

        let change = self.visibility.set_total_pages(total);
        self.push_visibility(change);
        if self.settings.view_mode.is_paginated() {
            for page in 0..total {
                self.visibility.observe(page, metrics.page_slot(page));
            }
        }
    }

    fn push_visibility(&mut self, change: VisibilityChange) {
        if change.is_empty() {
            return;
        }
        if !change.mounted.is_empty() {
            self.outbox.add_patch(ViewPatch::Mount { pages: change.mounted });
        }
        if !change.unmounted.is_empty() {
            self.outbox.add_patch(ViewPatch::Unmount {
                pages: change.unmounted,
            });
        }
    }

    fn drain(&mut self) -> ViewDiff {
        let mut diff = std::mem::take(&mut self.outbox);
        diff.version = self.document.version();
        diff
    }

    /// Describe every page for rendering
    pub fn frames(&self) -> FrameList {
        let dims = self.settings.page_dimensions();
        let inputs = FrameInputs {
            settings: &self.settings,
            pages: &self.pages,
            active: self.active.active(),
            metrics: RowMetrics::new(dims, self.settings.zoom, self.effective_per_row),
            variables: self.variables(),
            flow_height: self.flow_height,
        };
        build_frames(&inputs, self.document.version(), |page| {
            self.visibility.is_visible(page)
        })
    }
}
