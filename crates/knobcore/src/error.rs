use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    #[error("limiting angle must be within [0, 180) degrees, got {0}")]
    InvalidLimitingAngle(f64),
    #[error("seek bar needs at least one bar")]
    NoBars,
}
