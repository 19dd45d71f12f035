pub mod error;
pub mod geometry;
pub mod knob;
pub mod screen;
pub mod seekbar;
pub mod state;
pub mod touch;

pub use error::GeometryError;
pub use geometry::{Degrees, Point, Size};
pub use knob::{KnobController, KnobUpdate};
pub use screen::Screen;
pub use seekbar::{BarRect, SeekBarController, SeekUpdate};
pub use state::{SubscriptionId, VolumeSnapshot, VolumeState};
pub use touch::{TouchEvent, TouchPhase};

pub const FULL_TURN: f64 = 360.0;
