//! Renderer seam.
//!
//! Ambient renderers (starfield, eyes, warp field) are swappable backends.
//! They see only this read-only frame snapshot.

use serde::{Deserialize, Serialize};

use crate::pointer::PointerPosition;
use crate::progress::EyesMood;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameView {
    pub frame_ms: u64,
    pub pointer: PointerPosition,
    pub mood: EyesMood,
    pub devtools_open: bool,
    pub screen_shake: bool,
}

impl FrameView {
    /// Where the eyes look, each axis in `[-1, 1]`. Straight ahead while
    /// the devtools are open.
    pub fn gaze(&self) -> (f64, f64) {
        if self.devtools_open {
            return (0.0, 0.0);
        }
        (
            (self.pointer.x - 0.5) * 2.0,
            (self.pointer.y - 0.5) * 2.0,
        )
    }
}

pub trait Renderer {
    fn render(&mut self, frame: &FrameView);
}
