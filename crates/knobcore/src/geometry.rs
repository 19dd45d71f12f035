use derive_more::{Deref, Display, From, Into};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Angle in degrees, measured clockwise from "up".
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Display, Deref, From, Into)]
pub struct Degrees(f64);

impl Degrees {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn to_radians(self) -> f64 {
        self.0.to_radians()
    }
}

/// Angle of the vector from `center` to `touch`, in `(-180, 180]`.
/// 0° points up and values grow clockwise (screen y grows downwards).
pub fn touch_angle(touch: Point, center: Point) -> Degrees {
    Degrees(-(center.x - touch.x).atan2(center.y - touch.y).to_degrees())
}

#[cfg(test)]
pub(crate) fn point_at(center: Point, angle: f64, radius: f64) -> Point {
    let rad = angle.to_radians();
    Point::new(center.x + radius * rad.sin(), center.y - radius * rad.cos())
}
