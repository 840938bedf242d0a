//! Engine configuration
//!
//! All thresholds of the pipeline live here as data. Two presets capture the two tunings
//! in use: [`Config::classic`] reads every consistent bend at a fine spacing, and
//! [`Config::distance_aware`] (the default) adds the span-length cap, the curvature
//! density filter and jitter tolerance, and reports the start and end of each turn.

use crate::{Boundaries, RoadbookError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which scan produces the roadbook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AnalysisMode {
    /// Group contiguous same-direction curvature into turns
    #[default]
    Grouped,
    /// Classify each interior point from its own local angle
    Local,
}

/// Which sample index a turn starts at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TurnAnchor {
    /// The point before the first turning point (`i - 1`)
    #[default]
    Entry,
    /// The first turning point itself (`i`)
    Apex,
}

/// How turns are written into the roadbook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RoadbookLayout {
    /// A single entry at the start of each turn
    Representative,
    /// A "Start" and an "End" entry per turn, both carrying the turn length
    #[default]
    StartEnd,
}

/// Absorb small opposite-direction steps inside a turn instead of ending it
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JitterTolerance {
    /// Maximum difference in degrees between the flipped step and the previous step
    pub tolerance_deg: f64,
    /// Fraction of the flipped step's angle added to the turn, in `[0, 1]`
    pub weight: f64,
}

impl Default for JitterTolerance {
    fn default() -> Self {
        Self {
            tolerance_deg: 10.0,
            weight: 0.7,
        }
    }
}

/// Configuration for the roadbook analyzer
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Target distance between resampled points in meters.
    /// Default: 50
    pub spacing_m: f64,
    /// Grouped turn detection or independent per-point classification.
    /// Default: grouped
    pub mode: AnalysisMode,
    /// Local angles below this never start a turn (degrees).
    /// Default: 5
    pub noise_floor_deg: f64,
    /// Minimum angle of each step extending a turn (degrees).
    /// Default: 10
    pub min_step_angle_deg: f64,
    /// Minimum cumulative angle for a turn to be reported (degrees).
    /// In local mode, the minimum local angle of a reported point.
    /// Default: 20
    pub min_total_angle_deg: f64,
    /// Stop extending a turn once its length would exceed this (meters).
    /// Default: 150
    pub max_turn_length_m: Option<f64>,
    /// Minimum curvature density of a turn in degrees per 10 m.
    /// Rejects long shallow bends whose total angle only adds up because of their length.
    /// Default: 1.0
    pub min_density_deg_per_10m: Option<f64>,
    /// Tolerant extension across direction flips caused by jitter.
    /// Default: 10° at 70% weight
    pub jitter: Option<JitterTolerance>,
    /// Start index of a turn relative to its first turning point.
    /// Default: entry
    pub turn_anchor: TurnAnchor,
    /// Classification table.
    /// Default: strict
    pub boundaries: Boundaries,
    /// Roadbook entries per turn.
    /// Default: start/end
    pub layout: RoadbookLayout,
    /// Local mode: consecutive points with the same label whose angles differ by less
    /// than this are reported once (degrees).
    /// Default: 5
    pub local_dedup_deg: f64,
    /// Keep the per-point classification trace alongside the roadbook.
    /// Default: false
    pub record_trace: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::distance_aware()
    }
}

impl Config {
    /// Fine spacing, every consistent bend reported once at its apex
    pub fn classic() -> Self {
        Self {
            spacing_m: 20.0,
            mode: AnalysisMode::Grouped,
            noise_floor_deg: 0.0,
            min_step_angle_deg: 10.0,
            min_total_angle_deg: 20.0,
            max_turn_length_m: None,
            min_density_deg_per_10m: None,
            jitter: None,
            turn_anchor: TurnAnchor::Apex,
            boundaries: Boundaries::lenient(),
            layout: RoadbookLayout::Representative,
            local_dedup_deg: 5.0,
            record_trace: true,
        }
    }

    /// Coarse spacing with length cap, density filter and jitter tolerance
    pub fn distance_aware() -> Self {
        Self {
            spacing_m: 50.0,
            mode: AnalysisMode::Grouped,
            noise_floor_deg: 5.0,
            min_step_angle_deg: 10.0,
            min_total_angle_deg: 20.0,
            max_turn_length_m: Some(150.0),
            min_density_deg_per_10m: Some(1.0),
            jitter: Some(JitterTolerance::default()),
            turn_anchor: TurnAnchor::Entry,
            boundaries: Boundaries::strict(),
            layout: RoadbookLayout::StartEnd,
            local_dedup_deg: 5.0,
            record_trace: false,
        }
    }

    /// Same configuration in local classification mode
    pub fn local(mut self) -> Self {
        self.mode = AnalysisMode::Local;
        self
    }

    /// Check every field, so a bad configuration fails before any scan
    pub fn validate(&self) -> Result<()> {
        positive("spacing_m", self.spacing_m)?;
        non_negative("noise_floor_deg", self.noise_floor_deg)?;
        non_negative("min_step_angle_deg", self.min_step_angle_deg)?;
        non_negative("min_total_angle_deg", self.min_total_angle_deg)?;
        non_negative("local_dedup_deg", self.local_dedup_deg)?;

        if let Some(max_length) = self.max_turn_length_m {
            positive("max_turn_length_m", max_length)?;
        }
        if let Some(density) = self.min_density_deg_per_10m {
            non_negative("min_density_deg_per_10m", density)?;
        }
        if let Some(jitter) = &self.jitter {
            non_negative("jitter.tolerance_deg", jitter.tolerance_deg)?;
            if !(0.0..=1.0).contains(&jitter.weight) {
                return Err(RoadbookError::InvalidConfig {
                    field: "jitter.weight",
                    reason: format!("must lie in [0, 1], got {}", jitter.weight),
                });
            }
        }

        // Tables built without `Boundaries::new` (e.g. deserialized) are checked here
        Boundaries::new(self.boundaries.thresholds())?;

        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RoadbookError::InvalidConfig {
            field,
            reason: format!("must be a positive number, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RoadbookError::InvalidConfig {
            field,
            reason: format!("must be zero or positive, got {value}"),
        })
    }
}
