#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A return projected onto the sensor plane, in millimeters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

pub fn degree_to_radian(degree: f64) -> f64 {
    degree * std::f64::consts::PI / 180.
}

pub(crate) fn project(angle_degree: f64, range: f64) -> Point {
    let theta = degree_to_radian(angle_degree);
    Point {
        x: range * theta.cos(),
        y: range * theta.sin(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degree_to_radian() {
        assert!((degree_to_radian(180.) - std::f64::consts::PI).abs() < 1e-12);
        assert_eq!(degree_to_radian(0.), 0.);
    }

    #[test]
    fn test_project() {
        let p = project(0., 500.);
        assert!((p.x - 500.).abs() < 1e-9);
        assert!(p.y.abs() < 1e-9);

        let p = project(180., 500.);
        assert!((p.x + 500.).abs() < 1e-9);
        assert!(p.y.abs() < 1e-9);
    }
}
