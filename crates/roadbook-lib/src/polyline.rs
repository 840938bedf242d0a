//! Route polyline intake
//!
//! This module provides the `Polyline` struct, the validated input of the analysis
//! engine, with its precomputed geodesic length.

use crate::{RoadbookError, Result, utils};
use geo::Point;

/// An ordered driving route as `(lon, lat)` points, as delivered by a routing service
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polyline {
    /// Route vertices, `x` = longitude, `y` = latitude
    points: Vec<Point<f64>>,
    /// Cached total geodesic length in meters (computed once during construction)
    cached_total_distance: f64,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Polyline {
    /// Create a polyline from `(lon, lat)` points
    ///
    /// # Returns
    /// The polyline, or an error if it has fewer than 2 points or any point is
    /// outside the WGS84 coordinate range
    pub fn new(points: Vec<Point<f64>>) -> Result<Self> {
        if points.len() < 2 {
            return Err(RoadbookError::TooFewPoints {
                count: points.len(),
            });
        }

        if let Some((index, point)) = points
            .iter()
            .enumerate()
            .find(|(_, p)| !utils::is_valid_lon_lat(p))
        {
            return Err(RoadbookError::InvalidGeometry(format!(
                "point {index} is not a valid (lon, lat) pair: ({}, {})",
                point.x(),
                point.y()
            )));
        }

        let cached_total_distance = utils::path_length(&points);

        Ok(Self {
            points,
            cached_total_distance,
        })
    }

    /// Create a polyline from raw `(lon, lat)` pairs, the native order of GeoJSON
    pub fn from_lon_lat(coordinates: &[(f64, f64)]) -> Result<Self> {
        Self::new(
            coordinates
                .iter()
                .map(|&(lon, lat)| Point::new(lon, lat))
                .collect(),
        )
    }

    /// Create a polyline from GPX data
    ///
    /// Track segment points are concatenated in document order. Documents without
    /// tracks fall back to their route points.
    pub fn from_gpx(gpx_data: &gpx::Gpx) -> Result<Self> {
        let mut points: Vec<Point<f64>> = gpx_data
            .tracks
            .iter()
            .flat_map(|track| &track.segments)
            .flat_map(|segment| &segment.points)
            .map(|waypoint| waypoint.point())
            .collect();

        if points.is_empty() {
            points = gpx_data
                .routes
                .iter()
                .flat_map(|route| &route.points)
                .map(|waypoint| waypoint.point())
                .collect();
        }

        if points.is_empty() {
            return Err(RoadbookError::EmptyRoute);
        }

        Self::new(points)
    }

    /// Read and parse a GPX document
    pub fn read_gpx<R: std::io::Read>(reader: R) -> Result<Self> {
        let gpx_data = gpx::read(reader)?;
        Self::from_gpx(&gpx_data)
    }

    /// Access the route vertices
    #[inline]
    pub fn points(&self) -> &[Point<f64>] {
        &self.points
    }

    /// Number of vertices (always at least 2)
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false, a polyline holds at least 2 points
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total geodesic length in meters
    ///
    /// This is O(1) as the value is cached during construction.
    #[inline]
    pub fn total_distance(&self) -> f64 {
        self.cached_total_distance
    }
}
