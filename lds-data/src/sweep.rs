use crate::geometry::Point;
use crate::reading::Reading;
use crate::N_ANGLES;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Struct to hold one full revolution of readings, indexed by degree.
///
/// Every angle always holds a reading. Angles that no sweep has supplied
/// data for hold [`Reading::no_return`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "TableFields")
)]
pub struct MeasurementTable {
    readings: Vec<Reading>,
    /// Motor speed reported by the most recently decoded block.
    pub motor_speed: u16,
}

impl MeasurementTable {
    pub fn new() -> MeasurementTable {
        MeasurementTable {
            readings: (0..N_ANGLES as u16).map(Reading::no_return).collect(),
            motor_speed: 0,
        }
    }

    /// Table where every angle carries the same distance and intensity.
    pub fn filled(distance: u16, intensity: u16) -> MeasurementTable {
        MeasurementTable {
            readings: (0..N_ANGLES as u16)
                .map(|angle| Reading::new(angle, distance, intensity))
                .collect(),
            motor_speed: 0,
        }
    }

    /// Table from one reading per degree, in angle order. `None` unless there
    /// are exactly 360 readings and each sits at the index of its angle.
    pub fn from_readings(readings: Vec<Reading>, motor_speed: u16) -> Option<MeasurementTable> {
        if readings.len() != N_ANGLES {
            return None;
        }
        if readings
            .iter()
            .enumerate()
            .any(|(i, r)| r.angle as usize != i)
        {
            return None;
        }
        Some(MeasurementTable {
            readings,
            motor_speed,
        })
    }

    /// Reading at `angle` degrees, `None` when `angle >= 360`.
    pub fn reading_at(&self, angle: usize) -> Option<Reading> {
        self.readings.get(angle).copied()
    }

    /// Overwrites the entry at `reading.angle`. Returns `false` and leaves the
    /// table untouched when the angle is out of range.
    pub fn set(&mut self, reading: Reading) -> bool {
        match self.readings.get_mut(reading.angle as usize) {
            Some(slot) => {
                *slot = reading;
                true
            }
            None => false,
        }
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.readings.iter()
    }

    /// In-range returns as `(angle, point)`, so callers can keep them indexed
    /// by angle when some degrees are missing.
    pub fn angle_points(&self) -> Vec<(u16, Point)> {
        self.readings
            .iter()
            .filter_map(|r| r.point().map(|p| (r.angle, p)))
            .collect()
    }

    /// In-range returns projected onto the sensor plane.
    pub fn points(&self) -> Vec<Point> {
        self.readings.iter().filter_map(Reading::point).collect()
    }
}

impl Default for MeasurementTable {
    fn default() -> Self {
        MeasurementTable::new()
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct TableFields {
    readings: Vec<Reading>,
    motor_speed: u16,
}

#[cfg(feature = "serde")]
impl TryFrom<TableFields> for MeasurementTable {
    type Error = String;

    fn try_from(fields: TableFields) -> Result<Self, Self::Error> {
        let n_readings = fields.readings.len();
        MeasurementTable::from_readings(fields.readings, fields.motor_speed).ok_or_else(|| {
            format!(
                "expected {} readings in angle order, got {} readings",
                N_ANGLES, n_readings
            )
        })
    }
}
