//! Error types for measurement and settings

use thiserror::Error;

/// Failure reported by a [`LayoutMeasurer`](crate::layout::LayoutMeasurer).
///
/// These are expected at document edges during rapid edits. The engine
/// skips the current frame when it sees one and never surfaces it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    #[error("position {pos} is outside the document (size {size})")]
    OutOfRange { pos: usize, size: usize },

    #[error("block range {start}..{end} is outside the document ({len} blocks)")]
    BadRange { start: usize, end: usize, len: usize },

    #[error("editing surface is not rendered yet")]
    NotRendered,

    #[error("measurement produced a non-finite value")]
    NonFinite,
}

/// Content tree sent by the host that cannot be accepted
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("content JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("block id {0} is out of range")]
    IdOutOfRange(u64),
}

/// Failure while loading or validating [`PageSettings`](crate::settings::PageSettings).
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("settings JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid custom page size {width}x{height}")]
    InvalidPageSize { width: f32, height: f32 },

    #[error("invalid margin '{side}': {value}")]
    InvalidMargin { side: &'static str, value: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_error_display() {
        let err = MeasureError::OutOfRange { pos: 12, size: 10 };
        assert_eq!(err.to_string(), "position 12 is outside the document (size 10)");
    }

    #[test]
    fn test_settings_error_from_json() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: SettingsError = json_err.into();
        assert!(err.to_string().starts_with("settings JSON error"));
    }
}
