//! Local curvature estimation
//!
//! The turn at an interior sample point is measured between the incoming displacement
//! `v1 = p1 - p0` and the outgoing displacement `v2 = p2 - p1`, both in degree space.
//! Magnitude and side are two independent computations: [`turn_angle`] uses the
//! arccosine of the normalized dot product, [`turn_direction`] the sign of the cross
//! product.

use crate::{PolylineSample, utils};
use geo::{Coord, Point};

/// Side a turn bends towards, seen from the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unsigned turn angle and side at one sample point
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Curvature {
    /// Angle between the incoming and outgoing displacement, in `[0, 180]` degrees
    pub angle_deg: f64,
    pub direction: Direction,
}

impl Curvature {
    /// Angle truncated towards zero, the unit of every pacenote
    #[inline]
    pub fn truncated_angle(&self) -> i32 {
        self.angle_deg as i32
    }

    /// Whether the angle carries no turn information (straight or zero-length leg)
    #[inline]
    pub fn is_straight(&self) -> bool {
        self.angle_deg <= 0.0
    }
}

/// Unsigned angle between two displacement vectors in degrees
///
/// Returns a value in `[0, 180]`, and exactly 0 when either vector has zero length.
#[inline]
pub fn turn_angle(v1: Coord<f64>, v2: Coord<f64>) -> f64 {
    let n1 = utils::norm(v1);
    let n2 = utils::norm(v2);
    if n1 == 0.0 || n2 == 0.0 {
        return 0.0;
    }
    let cos = (utils::dot(v1, v2) / (n1 * n2)).clamp(-1.0, 1.0);
    let angle = cos.acos().to_degrees();
    if angle.is_nan() { 0.0 } else { angle }
}

/// Side of the turn from `v1` to `v2`: left when the cross product is positive
#[inline]
pub fn turn_direction(v1: Coord<f64>, v2: Coord<f64>) -> Direction {
    if utils::cross(v1, v2) > 0.0 {
        Direction::Left
    } else {
        Direction::Right
    }
}

/// Curvature at `p1` for the consecutive points `p0, p1, p2`
#[inline]
pub fn curvature(p0: Point<f64>, p1: Point<f64>, p2: Point<f64>) -> Curvature {
    let v1 = utils::displacement(p0, p1);
    let v2 = utils::displacement(p1, p2);
    Curvature {
        angle_deg: turn_angle(v1, v2),
        direction: turn_direction(v1, v2),
    }
}

/// Curvature at an interior sample index, `None` at either end of the sample
#[inline]
pub fn curvature_at(sample: &PolylineSample, index: usize) -> Option<Curvature> {
    if index == 0 {
        return None;
    }
    Some(curvature(
        sample.get(index - 1)?,
        sample.get(index)?,
        sample.get(index + 1)?,
    ))
}

/// Curvature at every interior point, `len(sample) - 2` values for indices `1..len-1`
pub fn curvature_profile(sample: &PolylineSample) -> Vec<Curvature> {
    sample
        .points()
        .windows(3)
        .map(|w| curvature(w[0], w[1], w[2]))
        .collect()
}
