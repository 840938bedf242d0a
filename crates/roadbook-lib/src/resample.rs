//! Polyline resampling at a controlled arc-length spacing
//!
//! Routing services return polylines whose vertex density follows the road geometry
//! database, not the road itself: long straights have two vertices, towns have dozens.
//! Every downstream stage indexes into the resampled [`PolylineSample`], so its spacing
//! directly controls what a single curvature step means.

use crate::{Polyline, RoadbookError, Result, utils};
use geo::Point;

/// Relative slack when deciding whether a segment already fits the target spacing.
/// Equal chord subdivisions differ from equal geodesic subdivisions by a few parts
/// per million, which must not trigger another split on a second pass.
const SPACING_TOLERANCE: f64 = 1e-6;

/// The resampled route, immutable once produced
///
/// Indices into this sequence are the coordinate system of every later stage.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolylineSample {
    points: Vec<Point<f64>>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl PolylineSample {
    /// Use an already evenly spaced sequence as a sample
    ///
    /// Fails when fewer than 2 points are given or two consecutive points coincide.
    pub fn from_points(points: Vec<Point<f64>>) -> Result<Self> {
        if points.len() < 2 {
            return Err(RoadbookError::TooFewPoints {
                count: points.len(),
            });
        }
        if let Some(index) = points.windows(2).position(|pair| pair[0] == pair[1]) {
            return Err(RoadbookError::InvalidGeometry(format!(
                "sample points {index} and {} coincide",
                index + 1
            )));
        }
        Ok(Self { points })
    }

    /// Access the sample points
    #[inline]
    pub fn points(&self) -> &[Point<f64>] {
        &self.points
    }

    /// Get a sample point by index
    #[inline]
    pub fn get(&self, index: usize) -> Option<Point<f64>> {
        self.points.get(index).copied()
    }

    /// Number of sample points (always at least 2)
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false, a sample holds at least 2 points
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Geodesic length of the segment `index -> index + 1` in meters
    #[inline]
    pub fn segment_length(&self, index: usize) -> f64 {
        match (self.get(index), self.get(index + 1)) {
            (Some(p0), Some(p1)) => utils::geodesic_distance(p0, p1),
            _ => 0.0,
        }
    }

    /// Geodesic length of the sample between two indices (inclusive) in meters
    pub fn span_length(&self, start: usize, end: usize) -> f64 {
        let end = end.min(self.points.len().saturating_sub(1));
        if start >= end {
            return 0.0;
        }
        utils::path_length(&self.points[start..=end])
    }

    /// Total geodesic length in meters
    pub fn total_distance(&self) -> f64 {
        utils::path_length(&self.points)
    }
}

/// Resample a polyline so consecutive points are at most `spacing_m` meters apart
///
/// Segments no longer than the spacing keep their original vertices. Longer segments are
/// split into `ceil(length / spacing)` equal intervals along the straight `(lon, lat)`
/// chord. Shared vertices are emitted once, and coincident input points are collapsed.
///
/// # Errors
/// `InvalidConfig` when the spacing is not a positive finite number.
pub fn resample(polyline: &Polyline, spacing_m: f64) -> Result<PolylineSample> {
    #[cfg(feature = "profiling")]
    profiling::scope!("resample");

    if !spacing_m.is_finite() || spacing_m <= 0.0 {
        return Err(RoadbookError::InvalidConfig {
            field: "spacing_m",
            reason: format!("must be a positive number of meters, got {spacing_m}"),
        });
    }

    let input = polyline.points();
    let mut points: Vec<Point<f64>> = Vec::with_capacity(input.len());
    let mut collapsed = 0usize;

    let mut push = |points: &mut Vec<Point<f64>>, point: Point<f64>| {
        if points.last() == Some(&point) {
            collapsed += 1;
        } else {
            points.push(point);
        }
    };

    for pair in input.windows(2) {
        let (p0, p1) = (pair[0], pair[1]);
        let segment_length = utils::geodesic_distance(p0, p1);

        if segment_length <= spacing_m * (1.0 + SPACING_TOLERANCE) {
            push(&mut points, p0);
        } else {
            let intervals = (segment_length / spacing_m).ceil().max(2.0) as usize;
            for k in 0..intervals {
                let t = k as f64 / intervals as f64;
                push(&mut points, utils::lerp(p0, p1, t));
            }
        }
    }

    if let Some(&last) = input.last() {
        push(&mut points, last);
    }

    if collapsed > 0 {
        tracing::warn!("Collapsed {} coincident route points", collapsed);
    }

    if points.len() < 2 {
        // Every input point is at the same location
        let Some(&endpoint) = points.first() else {
            return Err(RoadbookError::TooFewPoints { count: 0 });
        };
        tracing::warn!(
            "Route collapses to a single location ({}, {}), duplicating endpoint",
            endpoint.y(),
            endpoint.x()
        );
        points.push(endpoint);
    }

    tracing::debug!(
        "Resampled {} route points into {} sample points at {} m",
        input.len(),
        points.len(),
        spacing_m
    );

    Ok(PolylineSample { points })
}
