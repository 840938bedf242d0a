//! Roadbook Library - Route Curvature Analysis for Rally Pacenotes
//!
//! This library turns the raw polyline returned by a road-routing service into a rally
//! roadbook: an ordered list of turn annotations (direction, severity 6..2 or hairpin,
//! cumulative angle) that a co-driver can read out.
//!
//! # Architecture
//!
//! The engine is a batch pipeline, each stage consuming the full output of the previous one:
//!
//! - **[`Polyline`]**: Validated input route in `(lon, lat)` order
//! - **[`resample`]**: Re-spaces the polyline at a target arc length into a [`PolylineSample`]
//! - **[`curvature`]**: Local turn angle and direction at every interior sample point
//! - **[`TurnSegmenter`]**: Groups consistent curvature into [`Turn`] spans
//! - **[`Boundaries`]**: Maps a cumulative angle to a [`Pacenote`] severity
//! - **[`RoadbookAnalyzer`]**: Runs the pipeline and assembles the [`Roadbook`]
//!
//! # Example
//!
//! ```ignore
//! let polyline = Polyline::from_lon_lat(&coordinates)?;
//! let analyzer = RoadbookAnalyzer::new(Config::default())?;
//! for line in analyzer.analyze(&polyline)?.lines() {
//!     println!("{line}");
//! }
//! ```

mod classify;
mod config;
pub mod curvature;
mod local;
mod polyline;
pub mod resample;
mod roadbook;
mod segmenter;
pub mod utils;

#[cfg(test)]
mod testing;

// Public API exports
pub use classify::{Boundaries, Pacenote, Severity};
pub use config::{AnalysisMode, Config, JitterTolerance, RoadbookLayout, TurnAnchor};
pub use curvature::{Curvature, Direction};
pub use polyline::Polyline;
pub use resample::PolylineSample;
pub use roadbook::{
    ColoredSpan, EntryKind, PacenoteEntry, PointTrace, Roadbook, RoadbookAnalyzer, RoadbookInfo,
};
pub use segmenter::{Rejection, Turn, TurnSegmenter};

/// Error types for the analysis engine
#[derive(Debug, thiserror::Error)]
pub enum RoadbookError {
    #[error("GPX parsing error: {0}")]
    GpxParse(#[from] gpx::errors::GpxError),

    #[error("Polyline needs at least 2 points, got {count}")]
    TooFewPoints { count: usize },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid configuration for `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Invalid classification boundaries: {0}")]
    InvalidBoundaries(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Empty route")]
    EmptyRoute,
}

pub type Result<T> = std::result::Result<T, RoadbookError>;
