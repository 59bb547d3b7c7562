//! Header and footer configuration

use serde::{Deserialize, Deserializer, Serialize};

pub const MIN_REGION_HEIGHT: f32 = 20.0;
pub const MAX_REGION_HEIGHT: f32 = 150.0;

/// Template strings for the three zones of a header or footer
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderFooterContent {
    pub left: String,
    pub center: String,
    pub right: String,
}

impl HeaderFooterContent {
    pub fn new(left: impl Into<String>, center: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            center: center.into(),
            right: right.into(),
        }
    }
}

/// A header or footer band shared by all pages.
///
/// Persisted records may be partial; missing fields take the defaults of
/// the region they describe (see [`header_region`] and [`footer_region`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub enabled: bool,
    pub height: f32,
    pub content: HeaderFooterContent,
}

impl Region {
    pub fn header() -> Self {
        Self {
            enabled: false,
            height: 50.0,
            content: HeaderFooterContent::default(),
        }
    }

    pub fn footer() -> Self {
        Self {
            enabled: true,
            height: 40.0,
            content: HeaderFooterContent::new("", "Page {{page.current}} / {{page.total}}", ""),
        }
    }

    /// Height reserved on the page; zero when disabled
    pub fn reserved_height(&self) -> f32 {
        if self.enabled {
            self.height
        } else {
            0.0
        }
    }

    pub fn set_height(&mut self, height: f32) {
        self.height = clamp_region_height(height);
    }
}

/// Persisted form of a [`Region`] with every field optional
#[derive(Deserialize)]
struct RegionRecord {
    enabled: Option<bool>,
    height: Option<f32>,
    content: Option<HeaderFooterContent>,
}

impl RegionRecord {
    fn over(self, base: Region) -> Region {
        Region {
            enabled: self.enabled.unwrap_or(base.enabled),
            height: self.height.unwrap_or(base.height),
            content: self.content.unwrap_or(base.content),
        }
    }
}

pub(crate) fn header_region<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Region, D::Error> {
    RegionRecord::deserialize(deserializer).map(|record| record.over(Region::header()))
}

pub(crate) fn footer_region<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Region, D::Error> {
    RegionRecord::deserialize(deserializer).map(|record| record.over(Region::footer()))
}

/// Override record for page 1
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FirstPageSettings {
    pub different_first_page: bool,
    pub header_enabled: bool,
    pub header_content: HeaderFooterContent,
    pub footer_enabled: bool,
    pub footer_content: HeaderFooterContent,
}

pub(crate) fn clamp_region_height(height: f32) -> f32 {
    if height.is_finite() {
        height.clamp(MIN_REGION_HEIGHT, MAX_REGION_HEIGHT)
    } else {
        MIN_REGION_HEIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_footer_numbers_pages() {
        let footer = Region::footer();
        assert!(footer.enabled);
        assert_eq!(footer.content.center, "Page {{page.current}} / {{page.total}}");
        assert_eq!(footer.reserved_height(), 40.0);
    }

    #[test]
    fn test_disabled_region_reserves_nothing() {
        assert_eq!(Region::header().reserved_height(), 0.0);
    }

    #[test]
    fn test_height_clamped() {
        let mut region = Region::header();
        region.set_height(500.0);
        assert_eq!(region.height, MAX_REGION_HEIGHT);
        region.set_height(1.0);
        assert_eq!(region.height, MIN_REGION_HEIGHT);
        region.set_height(f32::NAN);
        assert_eq!(region.height, MIN_REGION_HEIGHT);
    }
}
