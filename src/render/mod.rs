//! Render output: static mirror, page frames and the view diff protocol

mod diff;
mod frame;
pub mod html;
mod mirror;

pub use diff::{PageDiffer, ViewDiff, ViewPatch};
pub use frame::{
    build_break_indicators, build_frames, BreakIndicator, FrameInputs, FrameList, MountedPage,
    PageFrame, RegionFrame,
};
pub use mirror::{ClipSource, ContentClip, MirrorRenderer, MirrorSnapshot};
