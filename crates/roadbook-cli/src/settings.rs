use clap::{Parser, ValueEnum};
use roadbook_lib::{AnalysisMode, Boundaries, Config, JitterTolerance, RoadbookLayout, TurnAnchor};
use std::path::PathBuf;

use crate::error::CliError;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Roadbook - Rally pacenotes from a GPX track or a GeoJSON directions response
pub struct Settings {
    /// Route file to analyze
    #[clap(value_name = "FILE")]
    pub input: PathBuf,

    /// Input format (inferred from the file extension when omitted)
    #[clap(short, long, value_enum)]
    pub format: Option<InputFormat>,

    /// Base tuning, every option below overrides one of its values
    #[clap(short, long, value_enum, default_value = "distance-aware")]
    pub preset: Preset,

    /// Grouped turn detection or per-point classification
    #[clap(short, long, value_enum)]
    pub mode: Option<Mode>,

    /// Resampling distance between points in meters
    #[clap(short, long)]
    pub spacing: Option<f64>,

    /// Local angles below this never start a turn (degrees)
    #[clap(long)]
    pub noise_floor: Option<f64>,

    /// Minimum angle of each step extending a turn (degrees)
    #[clap(long)]
    pub min_step: Option<f64>,

    /// Minimum cumulative angle of a reported turn (degrees)
    #[clap(long)]
    pub min_total: Option<f64>,

    /// Maximum turn length in meters
    #[clap(long, conflicts_with = "no_length_cap")]
    pub max_turn_length: Option<f64>,

    /// Disable the turn length cap
    #[clap(long, default_value = "false")]
    pub no_length_cap: bool,

    /// Minimum curvature density in degrees per 10 m
    #[clap(long, conflicts_with = "no_density_filter")]
    pub min_density: Option<f64>,

    /// Disable the curvature density filter
    #[clap(long, default_value = "false")]
    pub no_density_filter: bool,

    /// Largest angle difference of an absorbed direction flip (degrees)
    #[clap(long, conflicts_with = "no_jitter")]
    pub jitter_tolerance: Option<f64>,

    /// Weight of an absorbed direction flip (0-1)
    #[clap(long, conflicts_with = "no_jitter")]
    pub jitter_weight: Option<f64>,

    /// End turns at every direction flip
    #[clap(long, default_value = "false")]
    pub no_jitter: bool,

    /// Classification table
    #[clap(short, long, value_enum, conflicts_with = "thresholds")]
    pub boundaries: Option<BoundarySet>,

    /// Custom classification table: five ascending thresholds, e.g. 30,60,90,120,150
    #[clap(long, value_delimiter = ',')]
    pub thresholds: Option<Vec<i32>>,

    /// Start index of a turn
    #[clap(long, value_enum)]
    pub anchor: Option<Anchor>,

    /// Entries written per turn
    #[clap(short, long, value_enum)]
    pub layout: Option<Layout>,

    /// Local mode: same-label points closer than this in angle are reported once (degrees)
    #[clap(long)]
    pub dedup: Option<f64>,

    /// Also print the classification of every sample point
    #[clap(short, long, default_value = "false")]
    pub trace: bool,

    /// Print the roadbook as JSON
    #[clap(long, default_value = "false")]
    pub json: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[clap(short, long, default_value = "false")]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Gpx,
    Geojson,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Classic,
    DistanceAware,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Grouped,
    Local,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundarySet {
    Lenient,
    Strict,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Entry,
    Apex,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Representative,
    StartEnd,
}

impl Settings {
    /// Engine configuration: the preset with every given override applied
    pub fn config(&self) -> Result<Config, CliError> {
        let mut config = match self.preset {
            Preset::Classic => Config::classic(),
            Preset::DistanceAware => Config::distance_aware(),
        };

        if let Some(mode) = self.mode {
            config.mode = match mode {
                Mode::Grouped => AnalysisMode::Grouped,
                Mode::Local => AnalysisMode::Local,
            };
        }
        if let Some(spacing) = self.spacing {
            config.spacing_m = spacing;
        }
        if let Some(noise_floor) = self.noise_floor {
            config.noise_floor_deg = noise_floor;
        }
        if let Some(min_step) = self.min_step {
            config.min_step_angle_deg = min_step;
        }
        if let Some(min_total) = self.min_total {
            config.min_total_angle_deg = min_total;
        }

        if self.no_length_cap {
            config.max_turn_length_m = None;
        } else if let Some(max_length) = self.max_turn_length {
            config.max_turn_length_m = Some(max_length);
        }

        if self.no_density_filter {
            config.min_density_deg_per_10m = None;
        } else if let Some(density) = self.min_density {
            config.min_density_deg_per_10m = Some(density);
        }

        if self.no_jitter {
            config.jitter = None;
        } else if self.jitter_tolerance.is_some() || self.jitter_weight.is_some() {
            let base = config.jitter.unwrap_or_default();
            config.jitter = Some(JitterTolerance {
                tolerance_deg: self.jitter_tolerance.unwrap_or(base.tolerance_deg),
                weight: self.jitter_weight.unwrap_or(base.weight),
            });
        }

        if let Some(set) = self.boundaries {
            config.boundaries = match set {
                BoundarySet::Lenient => Boundaries::lenient(),
                BoundarySet::Strict => Boundaries::strict(),
            };
        }
        if let Some(thresholds) = &self.thresholds {
            let thresholds: [i32; 5] = thresholds.as_slice().try_into().map_err(|_| {
                CliError::Usage(format!(
                    "--thresholds takes exactly 5 values, got {}",
                    thresholds.len()
                ))
            })?;
            config.boundaries = Boundaries::new(thresholds)?;
        }

        if let Some(anchor) = self.anchor {
            config.turn_anchor = match anchor {
                Anchor::Entry => TurnAnchor::Entry,
                Anchor::Apex => TurnAnchor::Apex,
            };
        }
        if let Some(layout) = self.layout {
            config.layout = match layout {
                Layout::Representative => RoadbookLayout::Representative,
                Layout::StartEnd => RoadbookLayout::StartEnd,
            };
        }
        if let Some(dedup) = self.dedup {
            config.local_dedup_deg = dedup;
        }
        config.record_trace = self.trace;

        Ok(config)
    }
}
