//! View state: mode, active page, scrolling, visibility and scheduling

pub mod active;
mod mode;
pub mod schedule;
pub mod scroll;
pub mod visibility;

pub use active::{caret_page, ActivePageTracker, CaretPlacement, Migration, MigrationCause};
pub use mode::ViewMode;
pub use schedule::{Debouncer, FrameQueue, FrameTask};
pub use scroll::{ScrollLayout, ScrollState, ScrollStep, ScrollSynchronizer};
pub use visibility::{VisibilityChange, VisibilityTracker};
