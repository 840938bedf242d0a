//! Utility functions for geodesic measurements and planar vector math
//!
//! Points follow the routing service convention: `x` is longitude and `y` is latitude,
//! both in decimal degrees. Geodesic helpers convert explicitly; the planar helpers work
//! directly in degree space, where only the direction of a displacement matters.

use geo::{Coord, Distance, Geodesic, Point};

/// Valid latitude range in degrees
pub const MAX_LATITUDE: f64 = 90.0;

/// Valid longitude range in degrees
pub const MAX_LONGITUDE: f64 = 180.0;

/// Geodesic (WGS84 ellipsoid) distance between two `(lon, lat)` points in meters
#[inline]
pub fn geodesic_distance(p1: Point<f64>, p2: Point<f64>) -> f64 {
    if p1 == p2 {
        return 0.0;
    }
    Geodesic.distance(p1, p2)
}

/// Total geodesic length of a point sequence in meters
pub fn path_length(points: &[Point<f64>]) -> f64 {
    points
        .windows(2)
        .map(|pair| geodesic_distance(pair[0], pair[1]))
        .sum()
}

/// Planar displacement `p1 - p0` in degree space
#[inline(always)]
pub fn displacement(p0: Point<f64>, p1: Point<f64>) -> Coord<f64> {
    p1.0 - p0.0
}

/// Dot product of two planar vectors
#[inline(always)]
pub fn dot(v1: Coord<f64>, v2: Coord<f64>) -> f64 {
    v1.x * v2.x + v1.y * v2.y
}

/// Z component of the 2-D cross product `v1 × v2`
#[inline(always)]
pub fn cross(v1: Coord<f64>, v2: Coord<f64>) -> f64 {
    v1.x * v2.y - v1.y * v2.x
}

/// Euclidean norm of a planar vector
#[inline(always)]
pub fn norm(v: Coord<f64>) -> f64 {
    v.x.hypot(v.y)
}

/// Linear interpolation along the straight `(lon, lat)` chord between two points
#[inline]
pub fn lerp(p0: Point<f64>, p1: Point<f64>, t: f64) -> Point<f64> {
    Point::from(p0.0 + (p1.0 - p0.0) * t)
}

/// Check that a point has finite coordinates inside the WGS84 range
#[inline]
pub fn is_valid_lon_lat(point: &Point<f64>) -> bool {
    let lon = point.x();
    let lat = point.y();
    lon.is_finite()
        && lat.is_finite()
        && (-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&lon)
        && (-MAX_LATITUDE..=MAX_LATITUDE).contains(&lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geodesic_distance_one_degree_latitude() {
        // One degree of latitude at the equator on WGS84
        let d = geodesic_distance(Point::new(0.0, 0.0), Point::new(0.0, 1.0));
        assert!((d - 110_574.0).abs() < 1.0);
    }

    #[test]
    fn test_geodesic_distance_same_point() {
        let p = Point::new(1.6, 49.06);
        assert_eq!(geodesic_distance(p, p), 0.0);
    }

    #[test]
    fn test_path_length_sums_segments() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.001),
            Point::new(0.0, 0.002),
        ];
        let total = path_length(&points);
        let direct = geodesic_distance(points[0], points[2]);
        assert!((total - direct).abs() < 1e-6);
        assert_eq!(path_length(&points[..1]), 0.0);
    }

    #[test]
    fn test_vector_products() {
        let east = Coord { x: 1.0, y: 0.0 };
        let north = Coord { x: 0.0, y: 1.0 };
        assert_eq!(dot(east, north), 0.0);
        assert_eq!(cross(east, north), 1.0);
        assert_eq!(cross(north, east), -1.0);
        assert!((norm(Coord { x: 3.0, y: 4.0 }) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        let p0 = Point::new(1.0, 2.0);
        let p1 = Point::new(3.0, 6.0);
        assert_eq!(lerp(p0, p1, 0.0), p0);
        assert_eq!(lerp(p0, p1, 1.0), p1);
        assert_eq!(lerp(p0, p1, 0.5), Point::new(2.0, 4.0));
    }

    #[test]
    fn test_is_valid_lon_lat() {
        assert!(is_valid_lon_lat(&Point::new(1.6, 49.06)));
        assert!(is_valid_lon_lat(&Point::new(-180.0, 90.0)));
        assert!(!is_valid_lon_lat(&Point::new(181.0, 0.0)));
        assert!(!is_valid_lon_lat(&Point::new(0.0, -90.5)));
        assert!(!is_valid_lon_lat(&Point::new(f64::NAN, 0.0)));
    }
}
