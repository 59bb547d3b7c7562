//! Page break computation
//!
//! The flowing document is partitioned into contiguous, non-overlapping
//! vertical slices. Blocks are the atomic unit: a block is never split, a
//! block taller than the usable height overflows its page instead.

use crate::document::BlockId;
use crate::layout::measure::BlockHeight;
use rustc_hash::FxHashSet;
use serde::Serialize;

/// Layout information for a page
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Page index (0-based)
    pub index: usize,
    /// Offset of the first pixel of the page in the flowing content
    pub start_offset: f32,
    /// Offset one past the last pixel of the page
    pub end_offset: f32,
    /// Page was closed by a manual break marker
    pub has_manual_break: bool,
}

impl PageInfo {
    fn new(index: usize, start_offset: f32, end_offset: f32, has_manual_break: bool) -> Self {
        Self {
            index,
            start_offset,
            end_offset,
            has_manual_break,
        }
    }

    /// Height of content on this page
    pub fn height(&self) -> f32 {
        self.end_offset - self.start_offset
    }

    /// Check if a content offset falls on this page
    pub fn contains_offset(&self, offset: f32) -> bool {
        offset >= self.start_offset && offset < self.end_offset
    }
}

fn sanitize(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

fn single_page(total_height: f32) -> Vec<PageInfo> {
    vec![PageInfo::new(0, 0.0, total_height, false)]
}

/// Compute pages from measured blocks. The total content height is the
/// bottom of the last block.
pub fn compute_pages(
    blocks: &[BlockHeight],
    manual_breaks: &FxHashSet<BlockId>,
    usable_height: f32,
) -> Vec<PageInfo> {
    compute_pages_in(blocks, manual_breaks, usable_height, 0.0)
}

/// Compute pages from measured blocks inside content of `content_height`
/// pixels (the surface's scroll height, which may exceed the last block's
/// bottom edge).
pub fn compute_pages_in(
    blocks: &[BlockHeight],
    manual_breaks: &FxHashSet<BlockId>,
    usable_height: f32,
    content_height: f32,
) -> Vec<PageInfo> {
    let last_bottom = blocks.last().map(|b| sanitize(b.bottom())).unwrap_or(0.0);
    let total_height = sanitize(content_height).max(last_bottom);

    if blocks.is_empty() || !usable_height.is_finite() || usable_height <= 0.0 {
        return single_page(total_height);
    }

    let mut pages = Vec::new();
    let mut page_start = 0.0f32;
    let mut accumulated = 0.0f32;

    for block in blocks {
        let height = sanitize(block.height);
        // Never move backwards, even if the surface reports overlapping blocks
        let top = sanitize(block.top).max(page_start);

        if manual_breaks.contains(&block.id) {
            let end = (top + height).min(total_height);
            pages.push(PageInfo::new(pages.len(), page_start, end, true));
            page_start = end;
            accumulated = 0.0;
            continue;
        }

        if accumulated + height > usable_height && accumulated > 0.0 {
            pages.push(PageInfo::new(pages.len(), page_start, top, false));
            page_start = top;
            accumulated = height;
        } else {
            accumulated += height;
        }
    }

    pages.push(PageInfo::new(pages.len(), page_start, total_height, false));
    pages
}

/// Slice `content_height` into uniform pages of `usable_height`, ignoring
/// block boundaries. Used by the continuous view.
pub fn compute_uniform_pages(content_height: f32, usable_height: f32) -> Vec<PageInfo> {
    let total_height = sanitize(content_height);
    if total_height <= 0.0 || !usable_height.is_finite() || usable_height <= 0.0 {
        return single_page(total_height);
    }

    let count = ((total_height / usable_height).ceil() as usize).max(1);
    (0..count)
        .map(|i| {
            let start = i as f32 * usable_height;
            let end = if i + 1 == count {
                total_height
            } else {
                (start + usable_height).min(total_height)
            };
            PageInfo::new(i, start, end, false)
        })
        .collect()
}

/// Index of the page holding a content offset, clamped to the page range
pub fn page_at_offset(pages: &[PageInfo], offset: f32) -> usize {
    if pages.is_empty() {
        return 0;
    }
    pages
        .partition_point(|p| p.end_offset <= offset)
        .min(pages.len() - 1)
}

/// Total content height covered by the pages
pub fn covered_height(pages: &[PageInfo]) -> f32 {
    pages.last().map(|p| p.end_offset).unwrap_or(0.0)
}
