use crate::settings::SwipeThresholds;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Navigation step for a completed touch, or `None` when the gesture reads
/// as a scroll. Leftward swipes go forward in time.
pub fn classify_swipe(start: Point, end: Point, limits: SwipeThresholds) -> Option<i32> {
    let dx = end.x - start.x;
    let dy = (end.y - start.y).abs();
    if dy > limits.max_vertical {
        return None;
    }
    if dx.abs() < limits.min_horizontal {
        return None;
    }
    if dx > 0.0 {
        Some(-1)
    } else {
        Some(1)
    }
}

/// Whether a touch in progress is horizontal enough that the shell should
/// prevent the page from scrolling.
pub fn suppresses_scroll(start: Point, current: Point) -> bool {
    let dx = (current.x - start.x).abs();
    let dy = (current.y - start.y).abs();
    dx > dy && dx > 10.0
}
