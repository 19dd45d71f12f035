use crate::FULL_TURN;
use crate::geometry::Degrees;
use crate::error::GeometryError;
use crate::knob::{self, DEFAULT_LIMITING_ANGLE, KnobUpdate};
use crate::seekbar::SeekUpdate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeSnapshot {
    pub volume: f64,
    pub rotation: Degrees,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn Fn(&VolumeSnapshot)>;

/// The one volume/rotation pair both controls render from. Writes go through
/// `apply_knob`/`apply_seek`; observers are called synchronously after both
/// values are stored.
pub struct VolumeState {
    limiting_angle: f64,
    volume: f64,
    rotation: f64,
    observers: Vec<(SubscriptionId, Observer)>,
    next_id: u64,
}

impl Default for VolumeState {
    fn default() -> Self {
        Self::with_limit(DEFAULT_LIMITING_ANGLE)
    }
}

impl fmt::Debug for VolumeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VolumeState")
            .field("limiting_angle", &self.limiting_angle)
            .field("volume", &self.volume)
            .field("rotation", &self.rotation)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl VolumeState {
    pub fn new(limiting_angle: f64) -> Result<Self, GeometryError> {
        knob::check_limiting_angle(limiting_angle).map(Self::with_limit)
    }

    fn with_limit(limiting_angle: f64) -> Self {
        Self {
            limiting_angle,
            volume: 0.0,
            rotation: limiting_angle,
            observers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn rotation(&self) -> Degrees {
        Degrees::new(self.rotation)
    }

    pub fn limiting_angle(&self) -> f64 {
        self.limiting_angle
    }

    pub fn snapshot(&self) -> VolumeSnapshot {
        VolumeSnapshot {
            volume: self.volume,
            rotation: self.rotation(),
        }
    }

    pub fn subscribe(&mut self, observer: impl Fn(&VolumeSnapshot) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn apply_knob(&mut self, update: KnobUpdate) -> VolumeSnapshot {
        self.set(update.percentage, *update.angle)
    }

    /// The seek bar reports angles from 0, so the dead-zone offset is added
    /// back before storing.
    pub fn apply_seek(&mut self, update: SeekUpdate) -> VolumeSnapshot {
        self.set(update.percent, *update.angle + self.limiting_angle)
    }

    fn set(&mut self, volume: f64, rotation: f64) -> VolumeSnapshot {
        let previous = self.snapshot();
        self.volume = volume.clamp(0.0, 1.0);
        self.rotation = rotation.clamp(self.limiting_angle, FULL_TURN - self.limiting_angle);

        let snapshot = self.snapshot();
        // unchanged values do not trigger a redraw
        if snapshot != previous {
            self.observers
                .iter()
                .for_each(|(_, observer)| observer(&snapshot));
        }
        snapshot
    }
}
