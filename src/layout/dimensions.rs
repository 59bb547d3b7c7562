//! Page formats, margins and the usable content area

use crate::Rect;
use serde::{Deserialize, Serialize};

/// Page size in pixels at 96 DPI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageDimensions {
    pub width: f32,
    pub height: f32,
}

impl PageDimensions {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Apply orientation; landscape swaps width and height
    pub fn oriented(self, orientation: Orientation) -> Self {
        match orientation {
            Orientation::Portrait => self,
            Orientation::Landscape => Self {
                width: self.height,
                height: self.width,
            },
        }
    }
}

/// Standard paper formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PageFormat {
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    /// Uses the custom size from the settings
    #[serde(rename = "custom")]
    Custom,
}

impl PageFormat {
    /// Portrait size of a standard format; `None` for [`PageFormat::Custom`]
    pub fn dimensions(&self) -> Option<PageDimensions> {
        match self {
            PageFormat::A4 => Some(PageDimensions::new(794.0, 1123.0)),
            PageFormat::A5 => Some(PageDimensions::new(559.0, 794.0)),
            PageFormat::Letter => Some(PageDimensions::new(816.0, 1056.0)),
            PageFormat::Legal => Some(PageDimensions::new(816.0, 1344.0)),
            PageFormat::Custom => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PageFormat::A4 => "A4 (210 × 297 mm)",
            PageFormat::A5 => "A5 (148 × 210 mm)",
            PageFormat::Letter => "Letter (8.5 × 11 in)",
            PageFormat::Legal => "Legal (8.5 × 14 in)",
            PageFormat::Custom => "Personnalisé",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Page margins in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for Margins {
    fn default() -> Self {
        MarginPreset::Normal.margins()
    }
}

impl Margins {
    pub const fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }
}

/// Named margin sets offered by the page setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarginPreset {
    /// 1.5 cm
    Etroit,
    /// 2.5 cm
    Normal,
    /// 3.5 cm
    Large,
    /// Wider binding margin on the left
    Juridique,
}

impl MarginPreset {
    pub fn margins(&self) -> Margins {
        match self {
            MarginPreset::Etroit => Margins::uniform(57.0),
            MarginPreset::Normal => Margins::uniform(95.0),
            MarginPreset::Large => Margins::uniform(133.0),
            MarginPreset::Juridique => Margins {
                top: 95.0,
                right: 76.0,
                bottom: 95.0,
                left: 114.0,
            },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MarginPreset::Etroit => "Étroit (1.5 cm)",
            MarginPreset::Normal => "Normal (2.5 cm)",
            MarginPreset::Large => "Large (3.5 cm)",
            MarginPreset::Juridique => "Juridique (gauche élargie)",
        }
    }
}

/// Resolved page geometry: size, margins and the header/footer space
/// actually reserved on every page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page: PageDimensions,
    pub margins: Margins,
    /// Zero when the header is disabled
    pub header_height: f32,
    /// Zero when the footer is disabled
    pub footer_height: f32,
}

impl PageGeometry {
    pub fn new(page: PageDimensions, margins: Margins, header_height: f32, footer_height: f32) -> Self {
        Self {
            page,
            margins,
            header_height: header_height.max(0.0),
            footer_height: footer_height.max(0.0),
        }
    }

    /// Width between the left and right margins
    pub fn content_width(&self) -> f32 {
        self.page.width - self.margins.horizontal()
    }

    /// Height between the top and bottom margins
    pub fn content_height(&self) -> f32 {
        self.page.height - self.margins.vertical()
    }

    /// Height available for blocks: content height minus header and footer.
    /// May be zero or negative for degenerate settings; the page break
    /// calculator falls back to a single page in that case.
    pub fn usable_height(&self) -> f32 {
        self.content_height() - self.header_height - self.footer_height
    }

    /// Header region in page coordinates
    pub fn header_rect(&self) -> Rect {
        Rect::new(
            self.margins.left,
            self.margins.top,
            self.content_width(),
            self.header_height,
        )
    }

    /// Clipped content region in page coordinates
    pub fn content_rect(&self) -> Rect {
        Rect::new(
            self.margins.left,
            self.margins.top + self.header_height,
            self.content_width(),
            self.usable_height().max(0.0),
        )
    }

    /// Footer region in page coordinates
    pub fn footer_rect(&self) -> Rect {
        let content = self.content_rect();
        Rect::new(
            self.margins.left,
            content.y + content.height,
            self.content_width(),
            self.footer_height,
        )
    }
}
