use crate::geometry::{project, Point};
use crate::{MAX_RANGE, MIN_RANGE, NO_RETURN_DISTANCE};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Decoded measurement for one integer-degree angle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reading {
    /// Angle in degrees, `0..360`.
    pub angle: u16,
    /// Raw distance as reported by the sensor.
    pub distance: u16,
    /// Return strength of the laser pulse.
    pub intensity: u16,
}

impl Reading {
    pub const fn new(angle: u16, distance: u16, intensity: u16) -> Reading {
        Reading {
            angle,
            distance,
            intensity,
        }
    }

    /// Placeholder for an angle no sweep has supplied data for.
    pub const fn no_return(angle: u16) -> Reading {
        Reading::new(angle, NO_RETURN_DISTANCE, 0)
    }

    /// Distance in millimeters, or `None` when it falls outside the
    /// sensor's reliable range `[MIN_RANGE, MAX_RANGE]`.
    pub fn range_mm(&self) -> Option<f64> {
        if (MIN_RANGE..=MAX_RANGE).contains(&self.distance) {
            Some(self.distance as f64)
        } else {
            None
        }
    }

    /// Cartesian position of the return, if it is in range.
    pub fn point(&self) -> Option<Point> {
        self.range_mm().map(|r| project(self.angle as f64, r))
    }
}
