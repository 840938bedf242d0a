//! RoadbookAnalyzer - Top-level pipeline from route polyline to roadbook
//!
//! This module wires the stages together (resample, curvature, segmentation or local
//! classification, classification) and assembles the ordered roadbook handed to the
//! console and map collaborators.

use crate::curvature::Curvature;
use crate::local::{LocalClassifier, LocalNote};
use crate::resample::resample;
use crate::{
    AnalysisMode, Config, Pacenote, Polyline, PolylineSample, Result, RoadbookLayout, Severity,
    Turn, TurnSegmenter,
};

use geo::Point;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What a roadbook entry marks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EntryKind {
    /// Single representative point of a turn
    Turn,
    /// First point of a turn
    TurnStart,
    /// Last point of a turn
    TurnEnd,
    /// A point classified on its own (local mode)
    Point,
}

/// One annotated position of the roadbook
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PacenoteEntry {
    /// Index into the resampled sample
    pub index: usize,
    /// Position in (lon, lat)
    pub position: Point<f64>,
    pub kind: EntryKind,
    pub note: Pacenote,
    /// Angle of the turn (or point) truncated to whole degrees
    pub angle_deg: i32,
    /// Length of the turn in meters, for turn entries
    pub arc_length_m: Option<f64>,
}

impl PacenoteEntry {
    /// Text read out by the co-driver, e.g. `Start left 4`
    pub fn label(&self) -> String {
        match self.kind {
            EntryKind::TurnStart => format!("Start {}", self.note),
            EntryKind::TurnEnd => format!("End {}", self.note),
            EntryKind::Turn | EntryKind::Point => self.note.label(),
        }
    }

    #[inline]
    pub fn severity(&self) -> Severity {
        self.note.severity
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.position.y()
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.position.x()
    }
}

impl std::fmt::Display for PacenoteEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.6}, {:.6} : {} ({}°)",
            self.lat(),
            self.lon(),
            self.label(),
            self.angle_deg
        )
    }
}

/// Local classification of one interior sample point, kept for diagnostics
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointTrace {
    pub index: usize,
    pub position: Point<f64>,
    pub curvature: Curvature,
    pub note: Pacenote,
}

impl PointTrace {
    #[inline]
    pub fn angle_deg(&self) -> i32 {
        self.curvature.truncated_angle()
    }
}

impl std::fmt::Display for PointTrace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.6}, {:.6} : {} ({}°)",
            self.position.y(),
            self.position.x(),
            self.note,
            self.angle_deg()
        )
    }
}

/// Stretch of the sample to draw in the colour of its severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColoredSpan {
    pub start_index: usize,
    /// Inclusive
    pub end_index: usize,
    pub severity: Severity,
}

impl ColoredSpan {
    #[inline]
    pub fn color(&self) -> &'static str {
        self.severity.color()
    }
}

/// Summary of an analyzed route
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoadbookInfo {
    /// Number of resampled points
    pub sample_points: usize,
    /// Route length in meters
    pub total_distance_m: f64,
    /// Number of grouped turns (0 in local mode)
    pub turn_count: usize,
    /// Number of roadbook entries
    pub entry_count: usize,
    /// Number of reported hairpins
    pub hairpin_count: usize,
}

/// Result of analyzing one route
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Roadbook {
    sample: PolylineSample,
    turns: Vec<Turn>,
    entries: Vec<PacenoteEntry>,
    trace: Vec<PointTrace>,
    spans: Vec<ColoredSpan>,
}

impl Roadbook {
    /// The resampled route every index refers to
    pub fn sample(&self) -> &PolylineSample {
        &self.sample
    }

    /// Accepted turns in route order (empty in local mode)
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Roadbook entries in route order
    pub fn entries(&self) -> &[PacenoteEntry] {
        &self.entries
    }

    /// Per-point classification, empty unless recorded
    pub fn trace(&self) -> &[PointTrace] {
        &self.trace
    }

    /// One coloured span per reported turn or point
    pub fn spans(&self) -> &[ColoredSpan] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Console lines, one per entry
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    /// Console lines of the per-point trace
    pub fn trace_lines(&self) -> Vec<String> {
        self.trace.iter().map(ToString::to_string).collect()
    }

    pub fn info(&self) -> RoadbookInfo {
        RoadbookInfo {
            sample_points: self.sample.len(),
            total_distance_m: self.sample.total_distance(),
            turn_count: self.turns.len(),
            entry_count: self.entries.len(),
            hairpin_count: self
                .spans
                .iter()
                .filter(|span| span.severity.is_hairpin())
                .count(),
        }
    }
}

impl std::fmt::Display for Roadbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Runs the analysis pipeline with a fixed configuration
#[derive(Debug, Clone)]
pub struct RoadbookAnalyzer {
    config: Config,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl RoadbookAnalyzer {
    /// Create an analyzer, rejecting an invalid configuration up front
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resample a route and build its roadbook
    pub fn analyze(&self, polyline: &Polyline) -> Result<Roadbook> {
        #[cfg(feature = "profiling")]
        profiling::scope!("analyzer::analyze");

        let sample = resample(polyline, self.config.spacing_m)?;
        Ok(self.analyze_sample(sample))
    }

    /// Build the roadbook of an already resampled route
    pub fn analyze_sample(&self, sample: PolylineSample) -> Roadbook {
        let local = LocalClassifier {
            boundaries: self.config.boundaries,
            min_angle_deg: self.config.min_total_angle_deg,
            dedup_deg: self.config.local_dedup_deg,
        };

        let (turns, entries, spans) = match self.config.mode {
            AnalysisMode::Grouped => {
                let turns = TurnSegmenter::new(&self.config).segment(&sample);
                let (entries, spans) = self.build_grouped(&sample, &turns);
                (turns, entries, spans)
            }
            AnalysisMode::Local => {
                let (entries, spans) = build_local(&sample, &local.scan(&sample));
                (Vec::new(), entries, spans)
            }
        };

        let trace = if self.config.record_trace {
            local
                .trace(&sample)
                .into_iter()
                .filter_map(|point| {
                    Some(PointTrace {
                        index: point.index,
                        position: sample.get(point.index)?,
                        curvature: point.curvature,
                        note: point.note,
                    })
                })
                .collect()
        } else {
            Vec::new()
        };

        tracing::debug!(
            "Roadbook: {} entries from {} turns over {} sample points",
            entries.len(),
            turns.len(),
            sample.len()
        );

        Roadbook {
            sample,
            turns,
            entries,
            trace,
            spans,
        }
    }

    fn build_grouped(
        &self,
        sample: &PolylineSample,
        turns: &[Turn],
    ) -> (Vec<PacenoteEntry>, Vec<ColoredSpan>) {
        #[cfg(feature = "profiling")]
        profiling::scope!("analyzer::build_grouped");

        let mut entries = Vec::with_capacity(turns.len() * 2);
        let mut spans = Vec::with_capacity(turns.len());

        for turn in turns {
            let angle_deg = turn.truncated_angle();
            let note = self.config.boundaries.classify(turn.direction, angle_deg);
            let entry = |index: usize, kind: EntryKind| {
                Some(PacenoteEntry {
                    index,
                    position: sample.get(index)?,
                    kind,
                    note,
                    angle_deg,
                    arc_length_m: Some(turn.arc_length_m),
                })
            };

            match self.config.layout {
                RoadbookLayout::Representative => {
                    entries.extend(entry(turn.start_index, EntryKind::Turn));
                }
                RoadbookLayout::StartEnd => {
                    entries.extend(entry(turn.start_index, EntryKind::TurnStart));
                    entries.extend(entry(turn.end_index, EntryKind::TurnEnd));
                }
            }

            spans.push(ColoredSpan {
                start_index: turn.start_index,
                end_index: turn.end_index,
                severity: note.severity,
            });
        }

        (entries, spans)
    }
}

/// Entries and spans of the points kept by the local scan
fn build_local(
    sample: &PolylineSample,
    points: &[LocalNote],
) -> (Vec<PacenoteEntry>, Vec<ColoredSpan>) {
    let last = sample.len().saturating_sub(1);
    points
        .iter()
        .filter_map(|point| {
            let entry = PacenoteEntry {
                index: point.index,
                position: sample.get(point.index)?,
                kind: EntryKind::Point,
                note: point.note,
                angle_deg: point.angle(),
                arc_length_m: None,
            };
            let span = ColoredSpan {
                start_index: point.index.saturating_sub(1),
                end_index: (point.index + 1).min(last),
                severity: point.note.severity,
            };
            Some((entry, span))
        })
        .unzip()
}
