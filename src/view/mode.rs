//! View mode selection

use serde::{Deserialize, Serialize};

/// How the document is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
    /// Single flowing surface, no page frames
    #[default]
    Scroll,
    /// Stacked sheets, one column, one editable page following the caret
    Continuous,
    /// Grid of discrete page frames, optionally several per row
    Page,
}

impl ViewMode {
    /// Next mode in the toggle cycle `scroll → continuous → page → scroll`
    pub fn next(self) -> Self {
        match self {
            ViewMode::Scroll => ViewMode::Continuous,
            ViewMode::Continuous => ViewMode::Page,
            ViewMode::Page => ViewMode::Scroll,
        }
    }

    /// Whether the view shows page frames
    pub fn is_paginated(&self) -> bool {
        !matches!(self, ViewMode::Scroll)
    }

    /// Whether page boundaries follow block boundaries (as opposed to
    /// uniform slices of the usable height)
    pub fn breaks_on_blocks(&self) -> bool {
        match self {
            ViewMode::Scroll | ViewMode::Page => true,
            ViewMode::Continuous => false,
        }
    }

    /// Whether several pages may share a row
    pub fn allows_grid(&self) -> bool {
        matches!(self, ViewMode::Page)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ViewMode::Scroll => "scroll",
            ViewMode::Continuous => "continuous",
            ViewMode::Page => "page",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "scroll" => Some(ViewMode::Scroll),
            "continuous" => Some(ViewMode::Continuous),
            "page" => Some(ViewMode::Page),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle() {
        let mut mode = ViewMode::Scroll;
        mode = mode.next();
        assert_eq!(mode, ViewMode::Continuous);
        mode = mode.next();
        assert_eq!(mode, ViewMode::Page);
        assert_eq!(mode.next(), ViewMode::Scroll);
    }

    #[test]
    fn test_names_round_trip() {
        for mode in [ViewMode::Scroll, ViewMode::Continuous, ViewMode::Page] {
            assert_eq!(ViewMode::from_name(mode.name()), Some(mode));
        }
        assert_eq!(ViewMode::from_name("grid"), None);
    }

    #[test]
    fn test_only_page_mode_uses_grid() {
        assert!(ViewMode::Page.allows_grid());
        assert!(!ViewMode::Continuous.allows_grid());
        assert!(!ViewMode::Scroll.is_paginated());
    }
}
