//! Tick scheduling.
//!
//! A [`FrameLoop`] plays the role of a display refresh callback: it invokes
//! one synchronous tick per interval and stops as soon as its
//! [`CancelHandle`] fires.

mod cancel;
mod frame_loop;

pub use cancel::CancelHandle;
pub use frame_loop::{FrameLoop, FrameTick, LoopHandle};
