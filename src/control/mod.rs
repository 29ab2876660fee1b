//! Numeric core behind the player's touch controls.
//!
//! Everything here computes target values only. Applying them to the window
//! brightness, the audio stream or the player is the host's job.

pub mod gesture;
pub mod speed;

pub use gesture::{
    apply_seek, brightness_delta, classify_axis, double_tap_seek, is_left_half, seek_delta,
    volume_delta, volume_percent, DragAxis, DragGesture, DragStep, GestureAxis,
};
pub use speed::{next_speed, SpeedOverride};

/// A pointer position in viewport units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Size of the touch surface, in the same unit as [`Point`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// True for a finite, strictly positive extent.
pub(crate) fn usable_extent(extent: f32) -> bool {
    extent.is_finite() && extent > 0.0
}
