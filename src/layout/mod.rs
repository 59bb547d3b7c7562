//! Layout: measurement, page dimensions, page breaks and the page grid

pub mod dimensions;
pub mod grid;
mod measure;
mod pagination;

pub use dimensions::{MarginPreset, Margins, Orientation, PageDimensions, PageFormat, PageGeometry};
pub use grid::{PagesPerRow, RowMetrics};
pub use measure::{
    measure_blocks, BlockHeight, BlockRange, CaretCoords, LayoutMeasurer, SyntheticMeasurer,
};
pub use pagination::{
    compute_pages, compute_pages_in, compute_uniform_pages, covered_height, page_at_offset,
    PageInfo,
};
