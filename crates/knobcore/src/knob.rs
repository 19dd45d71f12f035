use crate::FULL_TURN;
use crate::error::GeometryError;
use crate::geometry::{self, Degrees, Point, Size};
use crate::touch::TouchEvent;

pub const DEFAULT_LIMITING_ANGLE: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnobUpdate {
    pub percentage: f64,
    pub angle: Degrees,
}

/// Maps touches over a round knob to a rotation and a percentage, ignoring a
/// dead zone of `limiting_angle` degrees on both sides of the top.
#[derive(Debug, Clone)]
pub struct KnobController {
    limiting_angle: f64,
    center: Option<Point>,
}

impl Default for KnobController {
    fn default() -> Self {
        Self {
            limiting_angle: DEFAULT_LIMITING_ANGLE,
            center: None,
        }
    }
}

/// Dead zone half width must leave a usable arc; NaN is rejected too.
pub fn check_limiting_angle(limiting_angle: f64) -> Result<f64, GeometryError> {
    if (0.0..180.0).contains(&limiting_angle) {
        Ok(limiting_angle)
    } else {
        Err(GeometryError::InvalidLimitingAngle(limiting_angle))
    }
}

impl KnobController {
    pub fn new(limiting_angle: f64) -> Result<Self, GeometryError> {
        let limiting_angle = check_limiting_angle(limiting_angle)?;
        Ok(Self {
            limiting_angle,
            center: None,
        })
    }

    pub fn limiting_angle(&self) -> f64 {
        self.limiting_angle
    }

    /// Usable arc between the two edges of the dead zone.
    pub fn sweep(&self) -> f64 {
        FULL_TURN - 2.0 * self.limiting_angle
    }

    pub fn center(&self) -> Option<Point> {
        self.center
    }

    /// Must be called before any gesture is handled; samples that arrive
    /// earlier are discarded.
    pub fn set_center(&mut self, center: Point) {
        self.center = Some(center);
    }

    /// Takes the centre from the first layout only. Returns whether the
    /// measurement was accepted.
    pub fn measure(&mut self, size: Size) -> bool {
        if let Some(center) = self.center {
            log::debug!("Knob already measured at {:?}, ignoring {:?}", center, size);
            return false;
        }
        let usable = |v: f64| v.is_finite() && v > 0.0;
        if !usable(size.width) || !usable(size.height) {
            log::debug!("Ignoring degenerate knob size {:?}", size);
            return false;
        }
        self.set_center(size.center());
        true
    }

    /// Folds a raw touch angle into `(limiting_angle, 360 - limiting_angle)`.
    /// `None` inside the dead zone, boundaries included.
    pub fn fold(&self, angle: Degrees) -> Option<Degrees> {
        let (angle, limit) = (*angle, self.limiting_angle);
        if (-limit..=limit).contains(&angle) {
            return None;
        }

        let folded = if (-180.0..limit).contains(&angle) {
            angle + FULL_TURN
        } else {
            angle
        };
        Some(Degrees::new(folded))
    }

    pub fn percentage_of(&self, folded: Degrees) -> f64 {
        (*folded - self.limiting_angle) / self.sweep()
    }

    pub fn map(&self, touch: Point) -> Option<KnobUpdate> {
        let Some(center) = self.center else {
            log::debug!("Knob sample at {:?} before layout, discarding", touch);
            return None;
        };

        let raw = geometry::touch_angle(touch, center);
        let Some(angle) = self.fold(raw) else {
            log::trace!("Knob sample in dead zone ({raw}°)");
            return None;
        };

        Some(KnobUpdate {
            percentage: self.percentage_of(angle),
            angle,
        })
    }

    pub fn handle(&self, event: TouchEvent) -> Option<KnobUpdate> {
        event
            .phase
            .is_tracking()
            .then(|| self.map(event.position))
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point_at;
    use crate::touch::TouchPhase;

    const CENTER: Point = Point { x: 60.0, y: 60.0 };

    fn knob() -> KnobController {
        let mut knob = KnobController::default();
        knob.set_center(CENTER);
        knob
    }

    fn touch(angle: f64) -> Point {
        point_at(CENTER, angle, 40.0)
    }

    #[test]
    fn test_rejects_invalid_limiting_angle() {
        for angle in [-1.0, 180.0, 400.0, f64::NAN] {
            assert!(KnobController::new(angle).is_err(), "{angle} accepted");
        }
        assert!(KnobController::new(0.0).is_ok());
        assert_eq!(KnobController::new(25.0).unwrap().sweep(), 310.0);
    }

    #[test]
    fn test_quarter_past_dead_zone() {
        let update = knob().map(touch(115.0)).unwrap();
        assert!((*update.angle - 115.0).abs() < 1e-9);
        assert!((update.percentage - 90.0 / 310.0).abs() < 1e-9);
        assert!((update.percentage - 0.290).abs() < 1e-3);
    }

    #[test]
    fn test_left_half_is_folded() {
        let update = knob().map(touch(-90.0)).unwrap();
        assert!((*update.angle - 270.0).abs() < 1e-9);
        assert!((update.percentage - 245.0 / 310.0).abs() < 1e-9);
    }

    #[test]
    fn test_dead_zone_ignored() {
        let knob = knob();
        for angle in [-25.0, -10.0, 0.0, 10.0, 25.0] {
            assert_eq!(knob.fold(Degrees::new(angle)), None, "{angle} folded");
        }
        assert_eq!(knob.map(touch(10.0)), None);
        assert_eq!(knob.map(touch(-20.0)), None);
    }

    #[test]
    fn test_percentage_is_bounded_and_monotonic() {
        let knob = knob();
        let mut last = -1.0;
        // walk clockwise from just past the right edge of the dead zone
        // to just before the left edge
        for step in 1..3100 {
            let angle = 25.0 + step as f64 * 0.1;
            let raw = if angle > 180.0 { angle - 360.0 } else { angle };
            let Some(update) = knob.map(touch(raw)) else {
                continue;
            };
            assert!((0.0..=1.0).contains(&update.percentage));
            assert!(update.percentage >= last - 1e-12);
            last = update.percentage;
        }
        assert!(last > 0.99);
    }

    #[test]
    fn test_fold_round_trip() {
        let knob = knob();
        for raw in [-179.0, -120.0, -26.0, 26.0, 90.0, 180.0] {
            let update = knob.map(touch(raw)).unwrap();
            let refolded = knob.fold(update.angle).unwrap();
            assert!((knob.percentage_of(refolded) - update.percentage).abs() < 1e-12);
        }
    }

    #[test]
    fn test_unmeasured_knob_discards_samples() {
        let knob = KnobController::default();
        assert_eq!(knob.map(Point::new(100.0, 60.0)), None);
    }

    #[test]
    fn test_measure_only_once() {
        let mut knob = KnobController::default();
        assert!(knob.measure(Size::new(120.0, 120.0)));
        assert!(!knob.measure(Size::new(300.0, 300.0)));
        assert_eq!(knob.center(), Some(CENTER));
    }

    #[test]
    fn test_measure_ignores_degenerate_size() {
        let mut knob = KnobController::default();
        assert!(!knob.measure(Size::new(0.0, 0.0)));
        assert!(!knob.measure(Size::new(120.0, f64::NAN)));
        assert!(!knob.measure(Size::new(-10.0, 120.0)));
        assert_eq!(knob.center(), None);

        assert!(knob.measure(Size::new(120.0, 120.0)));
        assert_eq!(knob.center(), Some(CENTER));

        // 3 o'clock reads as a quarter turn once the real size is in
        let update = knob.map(Point::new(110.0, 60.0)).unwrap();
        assert!((*update.angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_only_down_and_move_update() {
        let knob = knob();
        let p = touch(115.0);
        assert!(knob.handle(TouchEvent::new(p.x, p.y, TouchPhase::Down)).is_some());
        assert!(knob.handle(TouchEvent::new(p.x, p.y, TouchPhase::Move)).is_some());
        assert!(knob.handle(TouchEvent::new(p.x, p.y, TouchPhase::Up)).is_none());
        assert!(knob.handle(TouchEvent::new(p.x, p.y, TouchPhase::Other)).is_none());
    }
}
