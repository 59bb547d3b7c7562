//! Read-only page mirrors
//!
//! Every inactive page shows the same static snapshot of the whole document,
//! shifted up by the page's start offset inside a fixed-height clip. The
//! active page uses the same clip around the live surface.

use crate::document::Document;
use crate::layout::{PageGeometry, PageInfo};
use crate::render::html::render_document;
use log::trace;
use serde::Serialize;

/// What fills a page's content clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ClipSource {
    /// The live editing surface
    Live,
    /// The static snapshot
    Mirror,
}

/// Clipping of the flowing content for one page
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentClip {
    /// Vertical shift of the full content inside the clip (`-start_offset`)
    pub offset_y: f32,
    /// Height of the overflow-hidden viewport: the usable content height
    pub viewport_height: f32,
    /// Height of this page's own content, at most `viewport_height`
    pub visible_height: f32,
    pub width: f32,
    pub source: ClipSource,
}

impl ContentClip {
    pub fn for_page(page: &PageInfo, geometry: &PageGeometry, source: ClipSource) -> Self {
        let viewport_height = geometry.usable_height().max(0.0);
        Self {
            offset_y: -page.start_offset,
            viewport_height,
            visible_height: page.height().clamp(0.0, viewport_height),
            width: geometry.content_width().max(0.0),
            source,
        }
    }
}

/// A rendered snapshot of the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorSnapshot {
    pub html: String,
    pub content_hash: u64,
    /// Document version the snapshot was last checked against
    pub version: u64,
}

/// Keeps the snapshot in step with the document.
///
/// Refreshes are requested on content change and performed on the next
/// animation frame, at most once per frame. A refresh whose content hash
/// matches the current snapshot does not re-render.
#[derive(Debug, Clone, Default)]
pub struct MirrorRenderer {
    snapshot: Option<MirrorSnapshot>,
    dirty: bool,
    last_frame: Option<f64>,
    renders: u64,
}

impl MirrorRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Option<&MirrorSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn html(&self) -> &str {
        self.snapshot.as_ref().map(|s| s.html.as_str()).unwrap_or("")
    }

    /// Number of snapshots actually rendered
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn request_refresh(&mut self) {
        self.dirty = true;
    }

    /// Run a pending refresh for the frame at `now`. Returns true if the
    /// snapshot HTML changed.
    pub fn on_frame(&mut self, document: &Document, now: f64) -> bool {
        if !self.dirty || self.last_frame == Some(now) {
            return false;
        }
        self.dirty = false;
        self.last_frame = Some(now);

        let content_hash = document.content_hash();
        if let Some(snapshot) = self.snapshot.as_mut() {
            if snapshot.content_hash == content_hash {
                snapshot.version = document.version();
                trace!("mirror: content unchanged at version {}", document.version());
                return false;
            }
        }

        self.snapshot = Some(MirrorSnapshot {
            html: render_document(document),
            content_hash,
            version: document.version(),
        });
        self.renders += 1;
        trace!("mirror: snapshot rendered for version {}", document.version());
        true
    }

    /// Forget the snapshot and any pending refresh
    pub fn clear(&mut self) {
        self.snapshot = None;
        self.dirty = false;
        self.last_frame = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::BlockKind;
    use crate::layout::{Margins, PageDimensions};

    #[test]
    fn test_refresh_only_on_real_change() {
        let mut doc = Document::with_blocks("t", [BlockKind::paragraph("un")]);
        let mut mirror = MirrorRenderer::new();

        mirror.request_refresh();
        assert!(mirror.on_frame(&doc, 16.0));
        assert_eq!(mirror.render_count(), 1);

        // Title changes do not touch the content tree
        doc.set_title("autre");
        mirror.request_refresh();
        assert!(!mirror.on_frame(&doc, 32.0));
        assert_eq!(mirror.render_count(), 1);

        doc.push_block(BlockKind::paragraph("deux"));
        mirror.request_refresh();
        assert!(mirror.on_frame(&doc, 48.0));
        assert!(mirror.html().contains("deux"));
        assert_eq!(mirror.snapshot().unwrap().version, doc.version());
    }

    #[test]
    fn test_at_most_once_per_frame() {
        let mut doc = Document::with_blocks("t", [BlockKind::paragraph("a")]);
        let mut mirror = MirrorRenderer::new();
        mirror.request_refresh();
        assert!(mirror.on_frame(&doc, 16.0));

        doc.push_block(BlockKind::paragraph("b"));
        mirror.request_refresh();
        assert!(!mirror.on_frame(&doc, 16.0));
        // Still pending for the next frame
        assert!(mirror.is_dirty());
        assert!(mirror.on_frame(&doc, 33.0));
    }

    #[test]
    fn test_no_refresh_without_request() {
        let doc = Document::with_blocks("t", [BlockKind::paragraph("a")]);
        let mut mirror = MirrorRenderer::new();
        assert!(!mirror.on_frame(&doc, 16.0));
        assert_eq!(mirror.html(), "");
    }

    #[test]
    fn test_clip_offsets() {
        let geometry = PageGeometry::new(PageDimensions::new(794.0, 1123.0), Margins::uniform(95.0), 0.0, 40.0);
        let page = PageInfo {
            index: 1,
            start_offset: 800.0,
            end_offset: 1200.0,
            has_manual_break: false,
        };
        let clip = ContentClip::for_page(&page, &geometry, ClipSource::Mirror);
        assert_eq!(clip.offset_y, -800.0);
        assert_eq!(clip.viewport_height, 893.0);
        assert_eq!(clip.visible_height, 400.0);
        assert_eq!(clip.width, 604.0);
    }
}
