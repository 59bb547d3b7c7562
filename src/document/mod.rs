//! Document model: an ordered sequence of block nodes plus a version counter

mod block;
mod inline;

pub use block::{Block, BlockId, BlockKind, ListItem, ListStyle, TableCell, TableRow, TextAlign};
pub use inline::{Inline, Mark};

use crate::error::ContentError;
use rustc_hash::{FxHashSet, FxHasher};
use std::hash::{Hash, Hasher};

/// Where a content update came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateOrigin {
    /// Typed into the live editing surface
    #[default]
    Surface,
    /// Set programmatically (file load, template insertion, undo from outside)
    External,
}

/// The main document structure
#[derive(Debug, Clone)]
pub struct Document {
    title: String,
    /// Case number shown by `{{document.numero}}`
    number: Option<String>,
    blocks: Vec<Block>,
    /// Monotonic version counter
    version: u64,
    last_origin: UpdateOrigin,
    next_block_id: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new("")
    }
}

impl Document {
    /// Create a new empty document
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            number: None,
            blocks: Vec::new(),
            version: 0,
            last_origin: UpdateOrigin::Surface,
            next_block_id: 0,
        }
    }

    /// Create a document from a list of block kinds, assigning fresh ids
    pub fn with_blocks(title: impl Into<String>, kinds: impl IntoIterator<Item = BlockKind>) -> Self {
        let mut doc = Self::new(title);
        for kind in kinds {
            let id = doc.allocate_id();
            doc.blocks.push(Block::new(id, kind));
        }
        doc
    }

    fn allocate_id(&mut self) -> BlockId {
        let id = BlockId(self.next_block_id);
        self.next_block_id = self.next_block_id.saturating_add(1);
        id
    }

    fn bump(&mut self, origin: UpdateOrigin) {
        self.version += 1;
        self.last_origin = origin;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    pub fn set_number(&mut self, number: Option<String>) {
        self.number = number;
    }

    /// Current version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Origin of the most recent content change
    pub fn last_origin(&self) -> UpdateOrigin {
        self.last_origin
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Look up a block by id
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Index of a block in document order
    pub fn index_of(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    /// Append a block typed into the live surface
    pub fn push_block(&mut self, kind: BlockKind) -> BlockId {
        let id = self.allocate_id();
        self.blocks.push(Block::new(id, kind));
        self.bump(UpdateOrigin::Surface);
        id
    }

    /// Insert a block at `index` (clamped to the end)
    pub fn insert_block(&mut self, index: usize, kind: BlockKind) -> BlockId {
        let id = self.allocate_id();
        let index = index.min(self.blocks.len());
        self.blocks.insert(index, Block::new(id, kind));
        self.bump(UpdateOrigin::Surface);
        id
    }

    /// Replace the kind of an existing block
    pub fn update_block(&mut self, id: BlockId, kind: BlockKind) -> bool {
        match self.blocks.iter_mut().find(|b| b.id == id) {
            Some(block) => {
                block.kind = kind;
                self.bump(UpdateOrigin::Surface);
                true
            }
            None => false,
        }
    }

    /// Remove a block, returning it if present
    pub fn remove_block(&mut self, id: BlockId) -> Option<Block> {
        let index = self.index_of(id)?;
        let block = self.blocks.remove(index);
        self.bump(UpdateOrigin::Surface);
        Some(block)
    }

    /// Replace the whole content tree.
    ///
    /// Ids already present in `blocks` are kept; the id allocator moves past
    /// the largest one. Host ids should not exceed [`BlockId::MAX`].
    pub fn replace_blocks(&mut self, blocks: Vec<Block>, origin: UpdateOrigin) {
        if let Some(max) = blocks.iter().map(|b| b.id.0).max() {
            self.next_block_id = self.next_block_id.max(max.saturating_add(1));
        }
        self.blocks = blocks;
        self.bump(origin);
    }

    /// Decode a JSON array of blocks sent by the host
    pub fn parse_blocks(json: &str) -> Result<Vec<Block>, ContentError> {
        let blocks: Vec<Block> = serde_json::from_str(json)?;
        if let Some(block) = blocks.iter().find(|b| b.id > BlockId::MAX) {
            return Err(ContentError::IdOutOfRange(block.id.0));
        }
        Ok(blocks)
    }

    /// Ids of every manual page break marker
    pub fn manual_breaks(&self) -> FxHashSet<BlockId> {
        self.blocks
            .iter()
            .filter(|b| b.kind.is_page_break())
            .map(|b| b.id)
            .collect()
    }

    /// Hash of the content tree, used to detect real content changes
    pub fn content_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.blocks.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_with_largest_id() {
        let blocks = vec![Block::new(BlockId(u64::MAX), BlockKind::paragraph("x"))];
        let mut doc = Document::new("");
        doc.replace_blocks(blocks, UpdateOrigin::External);
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.version(), 1);
    }

    #[test]
    fn test_parse_blocks_rejects_reserved_id() {
        let blocks = Document::parse_blocks(r#"[{"id":7,"type":"pageBreak"},{"id":8,"type":"paragraph"}]"#).unwrap();
        assert!(blocks[0].kind.is_page_break());

        let err = Document::parse_blocks(r#"[{"id":18446744073709551615,"type":"paragraph"}]"#).unwrap_err();
        assert!(matches!(err, ContentError::IdOutOfRange(u64::MAX)));
        assert!(Document::parse_blocks("[{").is_err());
    }

    #[test]
    fn test_new_document() {
        let doc = Document::new("Conclusions");
        assert_eq!(doc.title(), "Conclusions");
        assert!(doc.is_empty());
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn test_version_is_monotonic() {
        let mut doc = Document::new("Brief");
        let a = doc.push_block(BlockKind::paragraph("un"));
        let v1 = doc.version();
        doc.update_block(a, BlockKind::paragraph("deux"));
        let v2 = doc.version();
        doc.remove_block(a);
        assert!(v1 < v2 && v2 < doc.version());
        assert_eq!(doc.last_origin(), UpdateOrigin::Surface);
    }

    #[test]
    fn test_replace_blocks_is_external() {
        let mut doc = Document::new("Brief");
        doc.replace_blocks(
            vec![Block::new(BlockId(41), BlockKind::PageBreak)],
            UpdateOrigin::External,
        );
        assert_eq!(doc.last_origin(), UpdateOrigin::External);

        // Allocator moves past imported ids
        let id = doc.push_block(BlockKind::paragraph("x"));
        assert_eq!(id, BlockId(42));
    }

    #[test]
    fn test_manual_breaks() {
        let doc = Document::with_blocks(
            "Brief",
            [
                BlockKind::paragraph("a"),
                BlockKind::PageBreak,
                BlockKind::paragraph("b"),
            ],
        );
        let breaks = doc.manual_breaks();
        assert_eq!(breaks.len(), 1);
        assert!(breaks.contains(&BlockId(1)));
    }

    #[test]
    fn test_content_hash_tracks_content() {
        let mut doc = Document::with_blocks("Brief", [BlockKind::paragraph("a")]);
        let before = doc.content_hash();
        assert_eq!(before, doc.content_hash());

        doc.update_block(BlockId(0), BlockKind::paragraph("b"));
        assert_ne!(before, doc.content_hash());
    }
}
