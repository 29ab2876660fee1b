use super::{usable_extent, Point, Viewport};
use crate::timestamp::TimeMs;

/// Displacement below which a drag is not yet assigned to an axis.
pub const DEFAULT_DEAD_ZONE: f32 = 20.0;

/// Brightness never goes fully dark; 0 would read as "off".
pub const MIN_BRIGHTNESS: f32 = 0.01;
pub const MAX_BRIGHTNESS: f32 = 1.0;

/// One quarter of the screen width seeks this many seconds.
const SEEK_SECONDS_PER_QUARTER_WIDTH: f64 = 10.0;

/// Dominant direction of a drag, before the screen half is considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragAxis {
    None,
    Horizontal,
    Vertical,
}

/// What a drag controls. Fixed for the rest of the gesture once it leaves `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureAxis {
    None,
    /// Horizontal drag anywhere.
    Seek,
    /// Vertical drag that started on the left half.
    Brightness,
    /// Vertical drag that started on the right half.
    Volume,
}

impl GestureAxis {
    pub fn resolve(axis: DragAxis, started_left: bool) -> Self {
        match axis {
            DragAxis::None => GestureAxis::None,
            DragAxis::Horizontal => GestureAxis::Seek,
            DragAxis::Vertical if started_left => GestureAxis::Brightness,
            DragAxis::Vertical => GestureAxis::Volume,
        }
    }
}

pub fn classify_axis(current: Point, start: Point, dead_zone: f32) -> DragAxis {
    let dx = (current.x - start.x).abs();
    let dy = (current.y - start.y).abs();

    if dx > dy && dx > dead_zone {
        DragAxis::Horizontal
    } else if dy > dx && dy > dead_zone {
        DragAxis::Vertical
    } else {
        DragAxis::None
    }
}

pub fn is_left_half(x: f32, screen_width: f32) -> bool {
    x < screen_width / 2.0
}

/// New brightness after a vertical drag of `drag_dy`.
///
/// Upward drags (negative `drag_dy`) brighten; a third of the screen height
/// spans the full range.
pub fn brightness_delta(current: f32, drag_dy: f32, screen_height: f32) -> f32 {
    if !usable_extent(screen_height) || !drag_dy.is_finite() {
        return current.clamp(MIN_BRIGHTNESS, MAX_BRIGHTNESS);
    }
    let delta = -drag_dy / (screen_height / 3.0);
    (current + delta).clamp(MIN_BRIGHTNESS, MAX_BRIGHTNESS)
}

/// New volume step after a vertical drag, on a `0..=max_index` scale.
pub fn volume_delta(current_index: u32, drag_dy: f32, screen_height: f32, max_index: u32) -> u32 {
    if !usable_extent(screen_height) || !drag_dy.is_finite() {
        return current_index.min(max_index);
    }
    let steps = -f64::from(drag_dy) / (f64::from(screen_height) / 3.0) * f64::from(max_index);
    (f64::from(current_index) + steps)
        .round()
        .clamp(0.0, f64::from(max_index)) as u32
}

/// Volume step as a percentage of the maximum.
pub fn volume_percent(index: u32, max_index: u32) -> u8 {
    if max_index == 0 {
        return 0;
    }
    (u64::from(index.min(max_index)) * 100 / u64::from(max_index)) as u8
}

/// Seek offset in milliseconds for a horizontal drag of `drag_dx`.
pub fn seek_delta(drag_dx: f32, screen_width: f32) -> i64 {
    if !usable_extent(screen_width) || !drag_dx.is_finite() {
        return 0;
    }
    let seconds = f64::from(drag_dx) / (f64::from(screen_width) / 4.0) * SEEK_SECONDS_PER_QUARTER_WIDTH;
    (seconds * 1000.0).round() as i64
}

/// Apply a seek offset to the position captured at gesture start.
pub fn apply_seek(start_position: TimeMs, delta_ms: i64, duration: TimeMs) -> TimeMs {
    start_position.saturating_add_signed(delta_ms).min(duration)
}

/// Double tap: back by `step_ms` on the left half, forward on the right.
pub fn double_tap_seek(
    x: f32,
    screen_width: f32,
    position: TimeMs,
    duration: TimeMs,
    step_ms: TimeMs,
) -> TimeMs {
    if is_left_half(x, screen_width) {
        position.saturating_sub(step_ms).min(duration)
    } else {
        position.saturating_add(step_ms).min(duration)
    }
}

/// Movement reported for one pointer event of an ongoing drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragStep {
    pub axis: GestureAxis,
    /// Horizontal movement since the previous event.
    pub dx: f32,
    /// Vertical movement since the previous event.
    pub dy: f32,
}

/// State of one drag interaction, from pointer down to pointer up.
#[derive(Debug, Clone)]
pub struct DragGesture {
    start: Point,
    last: Point,
    started_left: bool,
    dead_zone: f32,
    axis: GestureAxis,
}

impl DragGesture {
    pub fn begin(start: Point, viewport: Viewport, dead_zone: f32) -> Self {
        Self {
            start,
            last: start,
            started_left: is_left_half(start.x, viewport.width),
            dead_zone,
            axis: GestureAxis::None,
        }
    }

    pub fn axis(&self) -> GestureAxis {
        self.axis
    }

    pub fn start(&self) -> Point {
        self.start
    }

    /// Feed the pointer's current position.
    ///
    /// The axis is classified on the first update that leaves the dead zone
    /// and then stays fixed.
    pub fn update(&mut self, current: Point) -> DragStep {
        let step = DragStep {
            axis: GestureAxis::None,
            dx: current.x - self.last.x,
            dy: current.y - self.last.y,
        };
        self.last = current;

        self.axis = match self.axis {
            GestureAxis::None => GestureAxis::resolve(
                classify_axis(current, self.start, self.dead_zone),
                self.started_left,
            ),
            frozen @ (GestureAxis::Seek | GestureAxis::Brightness | GestureAxis::Volume) => frozen,
        };

        DragStep {
            axis: self.axis,
            ..step
        }
    }

    /// Total displacement from the start point.
    pub fn displacement(&self) -> (f32, f32) {
        (self.last.x - self.start.x, self.last.y - self.start.y)
    }

    /// Seek offset for the whole drag so far, or 0 when this is not a seek.
    pub fn seek_offset(&self, viewport: Viewport) -> i64 {
        match self.axis {
            GestureAxis::Seek => seek_delta(self.displacement().0, viewport.width),
            GestureAxis::None | GestureAxis::Brightness | GestureAxis::Volume => 0,
        }
    }
}
