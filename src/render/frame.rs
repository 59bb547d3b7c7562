//! Frame list: render-ready description of every page

use crate::layout::{PageGeometry, PageInfo, RowMetrics};
use crate::render::mirror::{ClipSource, ContentClip};
use crate::settings::{HeaderFooterContent, PageSettings};
use crate::template::{resolve_content, ResolvedZones, VariableContext};
use crate::view::ViewMode;
use crate::Rect;
use serde::Serialize;

/// A header or footer band with resolved text
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionFrame {
    /// Position inside the page, unscaled
    pub rect: Rect,
    pub zones: ResolvedZones,
}

/// A page that is mounted and fully described
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MountedPage {
    pub index: usize,
    /// 1-based number shown to the user
    pub number: usize,
    /// Slot in the scroll container, scaled by zoom
    pub bounds: Rect,
    pub zoom: f32,
    pub header: Option<RegionFrame>,
    /// Clipped content region, position inside the page, unscaled
    pub content_rect: Rect,
    pub content: ContentClip,
    pub footer: Option<RegionFrame>,
    pub active: bool,
    /// First page carries the letterhead overlay
    pub letterhead: bool,
    pub has_manual_break: bool,
}

/// One entry of the frame list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PageFrame {
    Mounted(MountedPage),
    /// Fixed-size empty box preserving the scroll height
    Placeholder { index: usize, bounds: Rect },
}

impl PageFrame {
    pub fn index(&self) -> usize {
        match self {
            PageFrame::Mounted(page) => page.index,
            PageFrame::Placeholder { index, .. } => *index,
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            PageFrame::Mounted(page) => page.bounds,
            PageFrame::Placeholder { bounds, .. } => *bounds,
        }
    }

    pub fn is_mounted(&self) -> bool {
        matches!(self, PageFrame::Mounted(_))
    }

    pub fn as_mounted(&self) -> Option<&MountedPage> {
        match self {
            PageFrame::Mounted(page) => Some(page),
            PageFrame::Placeholder { .. } => None,
        }
    }
}

/// Page boundary preview on the flowing surface in scroll mode
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakIndicator {
    /// Index of the page starting at this boundary
    pub page: usize,
    /// Offset in the flowing content
    pub offset: f32,
    pub label: String,
    /// Footer of the previous page
    pub footer: Option<ResolvedZones>,
    /// Header of the next page
    pub header: Option<ResolvedZones>,
    pub footer_height: f32,
    pub header_height: f32,
}

/// Everything the host needs to draw the page view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameList {
    pub version: u64,
    pub mode: ViewMode,
    pub frames: Vec<PageFrame>,
    pub breaks: Vec<BreakIndicator>,
    /// Scrollable height of the container content
    pub content_height: f32,
}

impl FrameList {
    pub fn mounted(&self) -> impl Iterator<Item = &MountedPage> {
        self.frames.iter().filter_map(PageFrame::as_mounted)
    }

    pub fn frame(&self, index: usize) -> Option<&PageFrame> {
        self.frames.get(index)
    }
}

/// Inputs shared by every frame of one build
pub struct FrameInputs<'a> {
    pub settings: &'a PageSettings,
    pub pages: &'a [PageInfo],
    pub active: usize,
    pub metrics: RowMetrics,
    pub variables: VariableContext<'a>,
    /// Height of the flowing surface in scroll mode
    pub flow_height: f32,
}

fn region(
    content: Option<&HeaderFooterContent>,
    rect: Rect,
    ctx: &VariableContext<'_>,
) -> Option<RegionFrame> {
    content.map(|content| RegionFrame {
        rect,
        zones: resolve_content(content, ctx),
    })
}

fn mounted_page(inputs: &FrameInputs<'_>, geometry: &PageGeometry, page: &PageInfo) -> MountedPage {
    let settings = inputs.settings;
    let number = page.index + 1;
    let ctx = inputs.variables.for_page(number);
    let active = page.index == inputs.active;
    let source = if active { ClipSource::Live } else { ClipSource::Mirror };

    MountedPage {
        index: page.index,
        number,
        bounds: inputs.metrics.page_slot(page.index),
        zoom: settings.zoom,
        header: region(settings.header_for_page(number), geometry.header_rect(), &ctx),
        content_rect: geometry.content_rect(),
        content: ContentClip::for_page(page, geometry, source),
        footer: region(settings.footer_for_page(number), geometry.footer_rect(), &ctx),
        active,
        letterhead: page.index == 0,
        has_manual_break: page.has_manual_break,
    }
}

/// Boundary previews for the flowing surface; empty unless enabled
pub fn build_break_indicators(inputs: &FrameInputs<'_>) -> Vec<BreakIndicator> {
    let settings = inputs.settings;
    if !settings.show_scroll_page_breaks {
        return Vec::new();
    }
    let previews = settings.scroll_page_break_style.preview_heights();

    inputs
        .pages
        .iter()
        .skip(1)
        .map(|page| {
            let number = page.index + 1;
            let (footer, header, footer_height, header_height) = match previews {
                Some((footer_height, header_height)) => {
                    let prev = inputs.variables.for_page(number - 1);
                    let next = inputs.variables.for_page(number);
                    (
                        settings.footer_for_page(number - 1).map(|c| resolve_content(c, &prev)),
                        settings.header_for_page(number).map(|c| resolve_content(c, &next)),
                        footer_height,
                        header_height,
                    )
                }
                None => (None, None, 0.0, 0.0),
            };
            BreakIndicator {
                page: page.index,
                offset: page.start_offset,
                label: format!("Page {number}"),
                footer,
                header,
                footer_height,
                header_height,
            }
        })
        .collect()
}

/// Build the frame list. `is_mounted` decides which pages get a full frame;
/// the rest become placeholders.
pub fn build_frames<F>(inputs: &FrameInputs<'_>, version: u64, is_mounted: F) -> FrameList
where
    F: Fn(usize) -> bool,
{
    let mode = inputs.settings.view_mode;
    if !mode.is_paginated() {
        return FrameList {
            version,
            mode,
            frames: Vec::new(),
            breaks: build_break_indicators(inputs),
            content_height: inputs.flow_height,
        };
    }

    let geometry = inputs.settings.geometry();
    let frames = inputs
        .pages
        .iter()
        .map(|page| {
            // The active page is always mounted: it hosts the live surface
            if page.index == inputs.active || is_mounted(page.index) {
                PageFrame::Mounted(mounted_page(inputs, &geometry, page))
            } else {
                PageFrame::Placeholder {
                    index: page.index,
                    bounds: inputs.metrics.page_slot(page.index),
                }
            }
        })
        .collect();

    FrameList {
        version,
        mode,
        frames,
        breaks: Vec::new(),
        content_height: inputs.metrics.content_height(inputs.pages.len()),
    }
}
