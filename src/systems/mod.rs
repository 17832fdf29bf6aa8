//! Application systems
//!
//! Frame-loop pieces kept out of main.rs for testability.

mod playback;

pub use playback::{FrameResult, PlaybackSystem};
