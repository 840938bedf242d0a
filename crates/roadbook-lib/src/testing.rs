//! Test helpers for building synthetic routes

use geo::Point;

/// Degree-space scale used by [`walk`]; close to a degree of arc near the equator
pub const METERS_PER_DEGREE: f64 = 111_195.0;

/// Build a route by walking from `start` (lon, lat) with an initial heading
///
/// Headings are mathematical angles in degrees (0 = east, 90 = north). Each step first
/// turns by its angle (positive = left, negative = right) then advances its length in
/// meters. Steps are laid out in degree space, so the angle between consecutive
/// displacement vectors equals the requested turn up to rounding.
pub fn walk(start: (f64, f64), heading_deg: f64, steps: &[(f64, f64)]) -> Vec<Point<f64>> {
    let mut points = vec![Point::new(start.0, start.1)];
    let mut heading = heading_deg;
    let mut current = points[0];

    for &(turn, length) in steps {
        heading += turn;
        let step = length / METERS_PER_DEGREE;
        let (sin, cos) = heading.to_radians().sin_cos();
        current = Point::new(current.x() + step * cos, current.y() + step * sin);
        points.push(current);
    }

    points
}

/// `count` straight steps of `length` meters
pub fn straight(count: usize, length: f64) -> Vec<(f64, f64)> {
    vec![(0.0, length); count]
}
