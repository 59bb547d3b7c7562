//! Page grid: pages per row and page slot geometry in the scroll container

use crate::layout::dimensions::PageDimensions;
use crate::Rect;
use serde::{Deserialize, Serialize};

/// Gap between pages, horizontally and vertically
pub const PAGE_GAP: f32 = 40.0;

/// Padding above the first row
pub const GRID_PADDING_TOP: f32 = 32.0;

/// Padding below the last row
pub const GRID_PADDING_BOTTOM: f32 = 64.0;

/// Horizontal padding of the scroll container
pub const CONTAINER_PADDING: f32 = 64.0;

const BREAKPOINT_TWO_PAGES: f32 = 1400.0;
const BREAKPOINT_THREE_PAGES: f32 = 2000.0;

// Tolerance when inverting row offsets
const ROW_EPSILON: f32 = 1e-3;

/// Pages-per-row setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "PagesPerRowRepr", into = "PagesPerRowRepr")]
pub enum PagesPerRow {
    #[default]
    One,
    Two,
    Three,
    /// Pick from the container width
    Auto,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PagesPerRowRepr {
    Count(u8),
    Keyword(String),
}

impl TryFrom<PagesPerRowRepr> for PagesPerRow {
    type Error = String;

    fn try_from(repr: PagesPerRowRepr) -> Result<Self, Self::Error> {
        match repr {
            PagesPerRowRepr::Count(1) => Ok(PagesPerRow::One),
            PagesPerRowRepr::Count(2) => Ok(PagesPerRow::Two),
            PagesPerRowRepr::Count(3) => Ok(PagesPerRow::Three),
            PagesPerRowRepr::Keyword(k) if k == "auto" => Ok(PagesPerRow::Auto),
            PagesPerRowRepr::Count(n) => Err(format!("unsupported pages per row: {n}")),
            PagesPerRowRepr::Keyword(k) => Err(format!("unsupported pages per row: {k}")),
        }
    }
}

impl From<PagesPerRow> for PagesPerRowRepr {
    fn from(value: PagesPerRow) -> Self {
        match value {
            PagesPerRow::One => PagesPerRowRepr::Count(1),
            PagesPerRow::Two => PagesPerRowRepr::Count(2),
            PagesPerRow::Three => PagesPerRowRepr::Count(3),
            PagesPerRow::Auto => PagesPerRowRepr::Keyword("auto".into()),
        }
    }
}

impl PagesPerRow {
    /// Parse the binding-layer encoding: 1, 2, 3, or 0 for auto
    pub fn from_count(count: u32) -> Option<Self> {
        match count {
            0 => Some(PagesPerRow::Auto),
            1 => Some(PagesPerRow::One),
            2 => Some(PagesPerRow::Two),
            3 => Some(PagesPerRow::Three),
            _ => None,
        }
    }

    /// Inverse of [`PagesPerRow::from_count`]
    pub fn as_count(&self) -> u32 {
        match self {
            PagesPerRow::Auto => 0,
            PagesPerRow::One => 1,
            PagesPerRow::Two => 2,
            PagesPerRow::Three => 3,
        }
    }

    /// Number of columns actually used in a container of the given width.
    ///
    /// Explicit settings degrade to what physically fits; `Auto` also
    /// requires the container to pass the width breakpoints.
    pub fn effective(&self, page_width: f32, zoom: f32, container_width: f32) -> usize {
        let scaled = page_width * zoom;
        let available = container_width - CONTAINER_PADDING;
        let fits_two = available >= scaled * 2.0 + PAGE_GAP;
        let fits_three = available >= scaled * 3.0 + PAGE_GAP * 2.0;

        match self {
            PagesPerRow::One => 1,
            PagesPerRow::Two => {
                if fits_two {
                    2
                } else {
                    1
                }
            }
            PagesPerRow::Three => {
                if fits_three {
                    3
                } else if fits_two {
                    2
                } else {
                    1
                }
            }
            PagesPerRow::Auto => {
                if container_width >= BREAKPOINT_THREE_PAGES && fits_three {
                    3
                } else if container_width >= BREAKPOINT_TWO_PAGES && fits_two {
                    2
                } else {
                    1
                }
            }
        }
    }
}

/// Row geometry of the page grid inside the scroll container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowMetrics {
    pub pages_per_row: usize,
    /// Scaled page size
    pub page_width: f32,
    pub page_height: f32,
    /// Scaled page height plus the vertical gap
    pub row_height: f32,
}

impl RowMetrics {
    pub fn new(page: PageDimensions, zoom: f32, pages_per_row: usize) -> Self {
        let page_height = page.height * zoom;
        Self {
            pages_per_row: pages_per_row.max(1),
            page_width: page.width * zoom,
            page_height,
            row_height: page_height + PAGE_GAP,
        }
    }

    /// Row holding a page
    pub fn row_of(&self, page_index: usize) -> usize {
        page_index / self.pages_per_row
    }

    /// Scroll offset of the top of a row
    pub fn row_top(&self, row: usize) -> f32 {
        GRID_PADDING_TOP + row as f32 * self.row_height
    }

    /// Scroll offset that brings a page's row to the top of the viewport
    pub fn offset_for_page(&self, page_index: usize) -> f32 {
        self.row_top(self.row_of(page_index))
    }

    /// Row at the top of the viewport for a scroll offset
    pub fn row_at_offset(&self, offset: f32) -> usize {
        if self.row_height <= 0.0 || !offset.is_finite() {
            return 0;
        }
        let row = (offset - GRID_PADDING_TOP) / self.row_height + ROW_EPSILON;
        if row <= 0.0 {
            0
        } else {
            row.floor() as usize
        }
    }

    /// First page of the row at a scroll offset, clamped to the page range
    pub fn page_at_offset(&self, offset: f32, total_pages: usize) -> usize {
        let page = self.row_at_offset(offset) * self.pages_per_row;
        page.min(total_pages.saturating_sub(1))
    }

    pub fn row_count(&self, total_pages: usize) -> usize {
        total_pages.max(1).div_ceil(self.pages_per_row)
    }

    /// Height of the scrollable grid content
    pub fn content_height(&self, total_pages: usize) -> f32 {
        GRID_PADDING_TOP + self.row_count(total_pages) as f32 * self.row_height - PAGE_GAP
            + GRID_PADDING_BOTTOM
    }

    /// Page frame rectangle in grid coordinates (x from the grid's left edge)
    pub fn page_slot(&self, page_index: usize) -> Rect {
        let column = page_index % self.pages_per_row;
        Rect::new(
            column as f32 * (self.page_width + PAGE_GAP),
            self.offset_for_page(page_index),
            self.page_width,
            self.page_height,
        )
    }
}
