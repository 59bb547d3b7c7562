//! Page settings passed explicitly into the engine

mod header_footer;

pub use header_footer::{FirstPageSettings, HeaderFooterContent, Region};

use crate::error::SettingsError;
use crate::layout::{MarginPreset, Margins, Orientation, PageDimensions, PageFormat, PageGeometry, PagesPerRow};
use crate::view::ViewMode;
use log::{info, warn};
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 2.0;

/// How page boundaries are previewed in scroll mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScrollPageBreakStyle {
    /// A labelled rule
    Line,
    /// Rule with small footer/header previews
    #[default]
    Compact,
    /// Rule with full-size footer/header previews
    Full,
}

impl ScrollPageBreakStyle {
    /// Heights of the (footer, header) previews around a break
    pub fn preview_heights(&self) -> Option<(f32, f32)> {
        match self {
            ScrollPageBreakStyle::Line => None,
            ScrollPageBreakStyle::Compact => Some((24.0, 24.0)),
            ScrollPageBreakStyle::Full => Some((40.0, 50.0)),
        }
    }
}

/// Complete page setup, as persisted by the application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageSettings {
    pub view_mode: ViewMode,
    pub page_format: PageFormat,
    pub orientation: Orientation,
    /// Used when `page_format` is custom
    pub custom_size: PageDimensions,
    pub margins: Margins,
    #[serde(deserialize_with = "header_footer::header_region")]
    pub header: Region,
    #[serde(deserialize_with = "header_footer::footer_region")]
    pub footer: Region,
    pub first_page: FirstPageSettings,
    pub zoom: f32,
    pub pages_per_row: PagesPerRow,
    pub show_scroll_page_breaks: bool,
    pub scroll_page_break_style: ScrollPageBreakStyle,
    /// Pages kept mounted on each side of the visible ones
    pub overscan: usize,
    /// Duration of animated scrolls
    pub scroll_animation_ms: f64,
    /// Delay between the last edit and page recomputation
    pub recompute_debounce_ms: f64,
    /// Delay after the last user scroll before the centred page is activated
    pub scroll_idle_ms: f64,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Scroll,
            page_format: PageFormat::A4,
            orientation: Orientation::Portrait,
            custom_size: PageDimensions::new(794.0, 1123.0),
            margins: Margins::default(),
            header: Region::header(),
            footer: Region::footer(),
            first_page: FirstPageSettings::default(),
            zoom: 1.0,
            pages_per_row: PagesPerRow::One,
            show_scroll_page_breaks: false,
            scroll_page_break_style: ScrollPageBreakStyle::Compact,
            overscan: 1,
            scroll_animation_ms: 300.0,
            recompute_debounce_ms: 100.0,
            scroll_idle_ms: 200.0,
        }
    }
}

impl PageSettings {
    /// Load persisted settings, clamping out-of-range values
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: PageSettings = serde_json::from_str(json)?;
        settings.validate()?;
        settings.normalize();
        info!(
            "settings: loaded format={:?} orientation={:?} mode={} zoom={} pages_per_row={:?}",
            settings.page_format,
            settings.orientation,
            settings.view_mode.name(),
            settings.zoom,
            settings.pages_per_row,
        );
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reject values that cannot be clamped into something meaningful
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.page_format == PageFormat::Custom {
            let PageDimensions { width, height } = self.custom_size;
            if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
                return Err(SettingsError::InvalidPageSize { width, height });
            }
        }
        let sides = [
            ("top", self.margins.top),
            ("right", self.margins.right),
            ("bottom", self.margins.bottom),
            ("left", self.margins.left),
        ];
        for (side, value) in sides {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::InvalidMargin { side, value });
            }
        }
        Ok(())
    }

    /// Clamp zoom and region heights into their ranges
    pub fn normalize(&mut self) {
        let zoom = clamp_zoom(self.zoom);
        if zoom != self.zoom {
            warn!("settings: zoom {} clamped to {}", self.zoom, zoom);
            self.zoom = zoom;
        }
        self.header.set_height(self.header.height);
        self.footer.set_height(self.footer.height);
    }

    /// Page size after format and orientation
    pub fn page_dimensions(&self) -> PageDimensions {
        self.page_format
            .dimensions()
            .unwrap_or(self.custom_size)
            .oriented(self.orientation)
    }

    /// Resolved geometry used by the page break calculator and page frames
    pub fn geometry(&self) -> PageGeometry {
        PageGeometry::new(
            self.page_dimensions(),
            self.margins,
            self.header.reserved_height(),
            self.footer.reserved_height(),
        )
    }

    /// Usable content height of a page
    pub fn usable_height(&self) -> f32 {
        self.geometry().usable_height()
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = clamp_zoom(zoom);
    }

    pub fn apply_margin_preset(&mut self, preset: MarginPreset) {
        self.margins = preset.margins();
    }

    /// Header content for a 1-based page number, `None` if no header is drawn
    pub fn header_for_page(&self, page_number: usize) -> Option<&HeaderFooterContent> {
        if page_number == 1 && self.first_page.different_first_page {
            return self
                .first_page
                .header_enabled
                .then_some(&self.first_page.header_content);
        }
        self.header.enabled.then_some(&self.header.content)
    }

    /// Footer content for a 1-based page number, `None` if no footer is drawn
    pub fn footer_for_page(&self, page_number: usize) -> Option<&HeaderFooterContent> {
        if page_number == 1 && self.first_page.different_first_page {
            return self
                .first_page
                .footer_enabled
                .then_some(&self.first_page.footer_content);
        }
        self.footer.enabled.then_some(&self.footer.content)
    }
}

fn clamp_zoom(zoom: f32) -> f32 {
    if zoom.is_finite() {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = PageSettings::default();
        assert_eq!(settings.page_dimensions(), PageDimensions::new(794.0, 1123.0));
        // 1123 - 95 - 95 - 40 (footer only)
        assert_eq!(settings.usable_height(), 893.0);
        assert_eq!(settings.view_mode, ViewMode::Scroll);
    }

    #[test]
    fn test_json_round_trip_and_partial_input() {
        let json = r#"{"pageFormat":"Letter","orientation":"landscape","zoom":5,"pagesPerRow":"auto"}"#;
        let settings = PageSettings::from_json(json).unwrap();
        assert_eq!(settings.page_dimensions(), PageDimensions::new(1056.0, 816.0));
        assert_eq!(settings.zoom, MAX_ZOOM);
        assert_eq!(settings.pages_per_row, PagesPerRow::Auto);
        // Missing fields come from the defaults
        assert!(settings.footer.enabled);

        let back = PageSettings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_custom_size() {
        let mut settings = PageSettings {
            page_format: PageFormat::Custom,
            custom_size: PageDimensions::new(600.0, 900.0),
            ..PageSettings::default()
        };
        assert_eq!(settings.page_dimensions().height, 900.0);

        settings.custom_size = PageDimensions::new(0.0, 900.0);
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidPageSize { .. })
        ));
    }

    #[test]
    fn test_negative_margin_rejected() {
        let json = r#"{"margins":{"top":-1,"right":0,"bottom":0,"left":0}}"#;
        assert!(matches!(
            PageSettings::from_json(json),
            Err(SettingsError::InvalidMargin { side: "top", .. })
        ));
    }

    #[test]
    fn test_header_enabled_reduces_usable_height() {
        let mut settings = PageSettings::default();
        let before = settings.usable_height();
        settings.header.enabled = true;
        assert_eq!(settings.usable_height(), before - 50.0);
    }

    #[test]
    fn test_first_page_override() {
        let mut settings = PageSettings::default();
        settings.first_page.different_first_page = true;
        settings.first_page.footer_enabled = true;
        settings.first_page.footer_content = HeaderFooterContent::new("", "Cabinet", "");

        assert_eq!(settings.footer_for_page(1).unwrap().center, "Cabinet");
        assert_eq!(
            settings.footer_for_page(2).unwrap().center,
            "Page {{page.current}} / {{page.total}}"
        );
        // First page header is off unless enabled in the override
        settings.header.enabled = true;
        assert!(settings.header_for_page(1).is_none());
        assert!(settings.header_for_page(2).is_some());
    }

    #[test]
    fn test_partial_regions_keep_their_own_defaults() {
        let settings = PageSettings::from_json(r#"{"footer":{"enabled":true},"header":{"enabled":true}}"#).unwrap();
        assert_eq!(settings.footer.height, 40.0);
        assert_eq!(settings.footer.content.center, "Page {{page.current}} / {{page.total}}");
        assert_eq!(settings.header.height, 50.0);
        assert!(settings.header.content.center.is_empty());

        let settings = PageSettings::from_json(r#"{"footer":{"height":60}}"#).unwrap();
        assert!(settings.footer.enabled);
        assert_eq!(settings.footer.reserved_height(), 60.0);
    }

    #[test]
    fn test_zoom_setter_clamps() {
        let mut settings = PageSettings::default();
        settings.set_zoom(0.1);
        assert_eq!(settings.zoom, MIN_ZOOM);
        settings.set_zoom(f32::INFINITY);
        assert_eq!(settings.zoom, 1.0);
    }
}
