pub mod geometry;
pub mod reading;
pub mod sweep;

pub use geometry::{degree_to_radian, Point};
pub use reading::Reading;
pub use sweep::MeasurementTable;

/// Number of one-degree readings in a sweep.
pub const N_ANGLES: usize = 360;
/// Closest range the sensor reports reliably, in millimeters.
pub const MIN_RANGE: u16 = 120;
/// Farthest range the sensor reports reliably, in millimeters.
pub const MAX_RANGE: u16 = 3500;
/// Raw distance stored for an angle that has not received a return yet.
pub const NO_RETURN_DISTANCE: u16 = 0;
