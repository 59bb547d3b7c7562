//! Block-level nodes of the content tree

use serde::{Deserialize, Serialize};

use super::inline::Inline;

/// Unique identifier for a block, stable across edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct BlockId(pub u64);

impl BlockId {
    /// Largest id a host may assign; the value above it is left to the allocator
    pub const MAX: BlockId = BlockId(u64::MAX - 1);
}

/// Horizontal alignment of a text block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn as_css(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
    }
}

/// Marker style of a list block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "camelCase")]
pub enum ListStyle {
    Bullet,
    Ordered { start: u32 },
    Task,
}

/// One item of a list block
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ListItem {
    /// Checkbox state, only meaningful for task lists
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub content: Vec<Inline>,
}

/// A table cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TableCell {
    #[serde(default)]
    pub header: bool,
    #[serde(default)]
    pub content: Vec<Inline>,
}

/// A table row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

/// The kind of block element.
///
/// Blocks are the atomic unit of pagination: a block is never split across
/// pages, whatever its kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BlockKind {
    /// Regular paragraph
    Paragraph {
        #[serde(default)]
        align: TextAlign,
        #[serde(default)]
        content: Vec<Inline>,
    },
    /// Heading with level (1-6)
    Heading {
        level: u8,
        #[serde(default)]
        align: TextAlign,
        #[serde(default)]
        content: Vec<Inline>,
    },
    /// Bullet, ordered or task list, paginated as a whole
    List { style: ListStyle, items: Vec<ListItem> },
    Blockquote {
        #[serde(default)]
        content: Vec<Inline>,
    },
    CodeBlock {
        #[serde(default)]
        language: Option<String>,
        text: String,
    },
    HorizontalRule,
    Table { rows: Vec<TableRow> },
    Image {
        src: String,
        #[serde(default)]
        alt: String,
        #[serde(default)]
        title: Option<String>,
    },
    /// Manual page break marker
    PageBreak,
}

impl Default for BlockKind {
    fn default() -> Self {
        BlockKind::Paragraph {
            align: TextAlign::Left,
            content: Vec::new(),
        }
    }
}

impl BlockKind {
    /// Create a left-aligned paragraph from plain text
    pub fn paragraph(text: &str) -> Self {
        BlockKind::Paragraph {
            align: TextAlign::Left,
            content: Inline::plain_runs(text),
        }
    }

    /// Create a heading, clamping the level into 1-6
    pub fn heading(level: u8, text: &str) -> Self {
        BlockKind::Heading {
            level: level.clamp(1, 6),
            align: TextAlign::Left,
            content: Inline::plain_runs(text),
        }
    }

    /// Check if this is a manual page break marker
    pub fn is_page_break(&self) -> bool {
        matches!(self, BlockKind::PageBreak)
    }

    /// Check if this is a heading
    pub fn is_heading(&self) -> bool {
        matches!(self, BlockKind::Heading { .. })
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            BlockKind::Paragraph { .. } => "paragraph",
            BlockKind::Heading { .. } => "heading",
            BlockKind::List { .. } => "list",
            BlockKind::Blockquote { .. } => "blockquote",
            BlockKind::CodeBlock { .. } => "code-block",
            BlockKind::HorizontalRule => "horizontal-rule",
            BlockKind::Table { .. } => "table",
            BlockKind::Image { .. } => "image",
            BlockKind::PageBreak => "page-break",
        }
    }
}

/// A top-level block of the document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    #[serde(flatten)]
    pub kind: BlockKind,
}

impl Block {
    pub fn new(id: BlockId, kind: BlockKind) -> Self {
        Self { id, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_kind() {
        let para = BlockKind::paragraph("Attendu que");
        assert!(!para.is_heading());
        assert!(!para.is_page_break());

        assert!(BlockKind::heading(1, "PAR CES MOTIFS").is_heading());
        assert!(BlockKind::PageBreak.is_page_break());
    }

    #[test]
    fn test_heading_level_clamped() {
        match BlockKind::heading(9, "x") {
            BlockKind::Heading { level, .. } => assert_eq!(level, 6),
            other => panic!("unexpected {other:?}"),
        }
        match BlockKind::heading(0, "x") {
            BlockKind::Heading { level, .. } => assert_eq!(level, 1),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_block_json_shape() {
        let block = Block::new(BlockId(3), BlockKind::PageBreak);
        let json = serde_json::to_string(&block).unwrap();
        assert_eq!(json, r#"{"id":3,"type":"pageBreak"}"#);

        let parsed: Block =
            serde_json::from_str(r#"{"id":4,"type":"heading","level":2}"#).unwrap();
        assert_eq!(parsed.id, BlockId(4));
        assert!(parsed.kind.is_heading());
    }
}
