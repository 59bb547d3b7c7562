//! Measurement interface over the rendered editing surface

use crate::document::{BlockId, Document};
use crate::error::MeasureError;

/// Half-open range of block indices in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub start: usize,
    pub end: usize,
}

impl BlockRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Range covering the single block at `index`
    pub fn single(index: usize) -> Self {
        Self { start: index, end: index + 1 }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Caret rectangle in document coordinates (pixels from the top of the
/// full, unpaginated content)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CaretCoords {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
}

/// Measured height of one block, in document order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockHeight {
    pub id: BlockId,
    /// Offset of the block's top edge from the top of the content
    pub top: f32,
    pub height: f32,
}

impl BlockHeight {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Adapter over the editing surface's native measurement API.
///
/// Implementations may fail at document edges while the surface is being
/// edited; callers treat any error as "cannot determine this frame".
pub trait LayoutMeasurer {
    /// Pixel height of a range of blocks
    fn height_of(&self, range: BlockRange) -> Result<f32, MeasureError>;

    /// Caret rectangle for a caret position
    fn coords_at(&self, pos: usize) -> Result<CaretCoords, MeasureError>;

    /// Total scroll height of the rendered content
    fn content_height(&self) -> f32;
}

/// Measure every block of `document`, accumulating top offsets.
pub fn measure_blocks<M>(measurer: &M, document: &Document) -> Result<Vec<BlockHeight>, MeasureError>
where
    M: LayoutMeasurer + ?Sized,
{
    let mut top = 0.0f32;
    let mut heights = Vec::with_capacity(document.len());

    for (index, block) in document.blocks().iter().enumerate() {
        let height = measurer.height_of(BlockRange::single(index))?;
        if !height.is_finite() {
            return Err(MeasureError::NonFinite);
        }
        let height = height.max(0.0);
        heights.push(BlockHeight {
            id: block.id,
            top,
            height,
        });
        top += height;
    }

    Ok(heights)
}

/// Measurer backed by fixed per-block heights.
///
/// Caret position `i` sits at the top of block `i`; position `len` sits at
/// the bottom of the last block.
#[derive(Debug, Clone, Default)]
pub struct SyntheticMeasurer {
    heights: Vec<f32>,
    caret_height: f32,
}

impl SyntheticMeasurer {
    pub fn new(heights: Vec<f32>) -> Self {
        Self {
            heights,
            caret_height: 18.0,
        }
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn set_heights(&mut self, heights: Vec<f32>) {
        self.heights = heights;
    }

    fn top_of(&self, index: usize) -> f32 {
        self.heights[..index].iter().sum()
    }
}

impl LayoutMeasurer for SyntheticMeasurer {
    fn height_of(&self, range: BlockRange) -> Result<f32, MeasureError> {
        if range.end > self.heights.len() || range.start > range.end {
            return Err(MeasureError::BadRange {
                start: range.start,
                end: range.end,
                len: self.heights.len(),
            });
        }
        Ok(self.heights[range.start..range.end].iter().sum())
    }

    fn coords_at(&self, pos: usize) -> Result<CaretCoords, MeasureError> {
        if pos > self.heights.len() {
            return Err(MeasureError::OutOfRange {
                pos,
                size: self.heights.len(),
            });
        }
        let top = self.top_of(pos);
        Ok(CaretCoords {
            top,
            left: 0.0,
            bottom: top + self.caret_height,
        })
    }

    fn content_height(&self) -> f32 {
        self.heights.iter().sum()
    }
}
