use crate::error::GeometryError;
use crate::geometry::Degrees;
use crate::knob::KnobController;
use crate::seekbar::{self, SeekBarController};
use crate::state::{SubscriptionId, VolumeSnapshot, VolumeState};
use crate::touch::TouchEvent;

/// Knob and seek bar sharing one [`VolumeState`].
#[derive(Debug)]
pub struct Screen {
    knob: KnobController,
    seek: SeekBarController,
    state: VolumeState,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            knob: KnobController::default(),
            seek: SeekBarController::default(),
            state: VolumeState::default(),
        }
    }
}

impl Screen {
    pub fn new(limiting_angle: f64, bars_count: usize) -> Result<Self, GeometryError> {
        let knob = KnobController::new(limiting_angle)?;
        // keep the seek bar's angle scale in step with the knob's usable arc
        let seek = SeekBarController::new(bars_count)?.with_sweep(knob.sweep());
        let state = VolumeState::new(limiting_angle)?;
        Ok(Self { knob, seek, state })
    }

    pub fn knob(&self) -> &KnobController {
        &self.knob
    }

    pub fn knob_mut(&mut self) -> &mut KnobController {
        &mut self.knob
    }

    pub fn seek(&self) -> &SeekBarController {
        &self.seek
    }

    pub fn seek_mut(&mut self) -> &mut SeekBarController {
        &mut self.seek
    }

    pub fn subscribe(&mut self, observer: impl Fn(&VolumeSnapshot) + 'static) -> SubscriptionId {
        self.state.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }

    pub fn knob_touch(&mut self, event: TouchEvent) -> Option<VolumeSnapshot> {
        let update = self.knob.handle(event)?;
        Some(self.state.apply_knob(update))
    }

    pub fn seek_touch(&mut self, event: TouchEvent) -> Option<VolumeSnapshot> {
        let update = self.seek.handle(event)?;
        Some(self.state.apply_seek(update))
    }

    pub fn snapshot(&self) -> VolumeSnapshot {
        self.state.snapshot()
    }

    pub fn volume(&self) -> f64 {
        self.state.volume()
    }

    pub fn rotation(&self) -> Degrees {
        self.state.rotation()
    }

    pub fn active_bars(&self) -> usize {
        seekbar::active_bars(self.state.volume(), self.seek.bars_count())
    }

    pub fn is_bar_active(&self, index: usize) -> bool {
        seekbar::is_bar_active(index, self.active_bars())
    }
}
