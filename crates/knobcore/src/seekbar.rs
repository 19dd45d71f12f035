use crate::error::GeometryError;
use crate::geometry::Degrees;
use crate::touch::TouchEvent;

/// Angle range the seek bar reports over its full width.
pub const SEEK_SWEEP: f64 = 310.0;
pub const DEFAULT_BARS_COUNT: usize = 26;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekUpdate {
    pub angle: Degrees,
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone)]
pub struct SeekBarController {
    bars_count: usize,
    sweep: f64,
    track_width: Option<f64>,
}

impl Default for SeekBarController {
    fn default() -> Self {
        Self {
            bars_count: DEFAULT_BARS_COUNT,
            sweep: SEEK_SWEEP,
            track_width: None,
        }
    }
}

impl SeekBarController {
    pub fn new(bars_count: usize) -> Result<Self, GeometryError> {
        if bars_count == 0 {
            return Err(GeometryError::NoBars);
        }
        Ok(Self {
            bars_count,
            ..Self::default()
        })
    }

    pub fn with_sweep(mut self, sweep: f64) -> Self {
        self.sweep = sweep;
        self
    }

    pub fn bars_count(&self) -> usize {
        self.bars_count
    }

    pub fn sweep(&self) -> f64 {
        self.sweep
    }

    pub fn track_width(&self) -> Option<f64> {
        self.track_width
    }

    /// Fixes the track width from the first usable layout; later resizes are
    /// ignored.
    pub fn measure(&mut self, track_width: f64) -> bool {
        if let Some(width) = self.track_width {
            log::debug!("Seek bar already measured at {width}px, ignoring {track_width}px");
            return false;
        }
        if !track_width.is_finite() || track_width <= 0.0 {
            log::debug!("Ignoring degenerate seek bar width {track_width}");
            return false;
        }
        self.track_width = Some(track_width);
        true
    }

    /// Half of every slot is the bar, the other half the gap.
    pub fn bar_width(&self) -> Option<f64> {
        self.track_width
            .map(|width| width / (2.0 * self.bars_count as f64))
    }

    pub fn bar_rect(&self, index: usize, height: f64) -> Option<BarRect> {
        let bar_width = self.bar_width()?;
        Some(BarRect {
            x: index as f64 * bar_width * 2.0 + bar_width / 2.0,
            y: 0.0,
            width: bar_width,
            height,
        })
    }

    pub fn map(&self, x: f64) -> Option<SeekUpdate> {
        let Some(width) = self.track_width else {
            log::debug!("Seek sample at x={x} before layout, discarding");
            return None;
        };
        if !(0.0..=width).contains(&x) {
            return None;
        }

        let percent = x / width;
        Some(SeekUpdate {
            angle: Degrees::new(percent * self.sweep),
            percent,
        })
    }

    pub fn handle(&self, event: TouchEvent) -> Option<SeekUpdate> {
        event
            .phase
            .is_tracking()
            .then(|| self.map(event.position.x))
            .flatten()
    }
}

pub fn active_bars(volume: f64, bars_count: usize) -> usize {
    (bars_count as f64 * volume).round().max(0.0) as usize
}

/// Inclusive on purpose: the bar at `active_bars` itself is lit as well.
pub fn is_bar_active(index: usize, active_bars: usize) -> bool {
    index <= active_bars
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::touch::TouchPhase;

    fn seek(width: f64) -> SeekBarController {
        let mut seek = SeekBarController::default();
        seek.measure(width);
        seek
    }

    #[test]
    fn test_zero_bars_rejected() {
        assert_eq!(SeekBarController::new(0).unwrap_err(), GeometryError::NoBars);
        assert_eq!(SeekBarController::new(10).unwrap().bars_count(), 10);
    }

    #[test]
    fn test_half_track() {
        let update = seek(300.0).map(150.0).unwrap();
        assert_eq!(update.percent, 0.5);
        assert_eq!(*update.angle, 155.0);
    }

    #[test]
    fn test_percent_is_linear() {
        let seek = seek(300.0);
        for x in [0.0, 1.0, 42.5, 299.0, 300.0] {
            let update = seek.map(x).unwrap();
            assert_eq!(update.percent, x / 300.0);
            assert_eq!(*update.angle, x / 300.0 * SEEK_SWEEP);
        }
    }

    #[test]
    fn test_outside_track_ignored() {
        let seek = seek(300.0);
        assert_eq!(seek.map(-0.5), None);
        assert_eq!(seek.map(300.5), None);
        assert_eq!(SeekBarController::default().map(10.0), None);
    }

    #[test]
    fn test_up_does_not_update() {
        let seek = seek(300.0);
        assert!(seek.handle(TouchEvent::new(30.0, 5.0, TouchPhase::Down)).is_some());
        assert!(seek.handle(TouchEvent::new(30.0, 5.0, TouchPhase::Up)).is_none());
    }

    #[test]
    fn test_measure_is_fixed() {
        let mut seek = SeekBarController::default();
        assert!(!seek.measure(0.0));
        assert!(seek.measure(520.0));
        assert!(!seek.measure(800.0));
        assert_eq!(seek.bar_width(), Some(10.0));

        let rect = seek.bar_rect(3, 30.0).unwrap();
        assert_eq!(rect.x, 65.0);
        assert_eq!(rect.width, 10.0);
        assert_eq!(rect.height, 30.0);
    }

    #[test]
    fn test_half_volume_lights_fourteen_bars() {
        let active = active_bars(0.5, 26);
        assert_eq!(active, 13);

        let lit: Vec<usize> = (0..26).filter(|&i| is_bar_active(i, active)).collect();
        assert_eq!(lit, (0..=13).collect::<Vec<_>>());
    }

    #[test]
    fn test_bar_rule_for_all_volumes() {
        for n in [1, 7, 26] {
            for step in 0..=20 {
                let v = step as f64 / 20.0;
                let active = active_bars(v, n);
                assert_eq!(active, (n as f64 * v).round() as usize);
                for i in 0..n {
                    assert_eq!(is_bar_active(i, active), i <= active);
                }
            }
        }
    }
}
