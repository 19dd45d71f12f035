use crate::geometry::Point;
use strum::{Display as StrumDisplay, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive)]
pub enum TouchPhase {
    Down,
    Move,
    Up,
    Other,
}

impl TouchPhase {
    /// Only down and move samples drive the controls; anything else just
    /// ends tracking.
    pub fn is_tracking(&self) -> bool {
        matches!(self, Self::Down | Self::Move)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub position: Point,
    pub phase: TouchPhase,
}

impl TouchEvent {
    pub fn new(x: f64, y: f64, phase: TouchPhase) -> Self {
        Self {
            position: Point::new(x, y),
            phase,
        }
    }
}
