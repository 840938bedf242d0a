//! Local classification mode
//!
//! Each interior sample point is classified from its own angle, no grouping. Consecutive
//! significant points that read the same and barely differ in angle are reported once.
//! The "last significant point" is explicit fold state threaded through the scan.

use crate::curvature::{Curvature, curvature_profile};
use crate::{Boundaries, Pacenote, PolylineSample};

/// A classified interior point
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LocalNote {
    pub index: usize,
    pub curvature: Curvature,
    pub note: Pacenote,
}

impl LocalNote {
    pub fn angle(&self) -> i32 {
        self.curvature.truncated_angle()
    }
}

/// Thresholds of the local scan
#[derive(Debug, Clone, Copy)]
pub(crate) struct LocalClassifier {
    pub boundaries: Boundaries,
    /// Minimum truncated angle of a reported point
    pub min_angle_deg: f64,
    /// Same-label points closer than this in angle are suppressed
    pub dedup_deg: f64,
}

/// Last significant point seen: its label and truncated angle
type DedupState = Option<(Pacenote, i32)>;

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl LocalClassifier {
    /// Every interior point with its local classification, in route order
    pub fn trace(&self, sample: &PolylineSample) -> Vec<LocalNote> {
        curvature_profile(sample)
            .into_iter()
            .enumerate()
            .map(|(offset, curvature)| LocalNote {
                index: offset + 1,
                curvature,
                note: self
                    .boundaries
                    .classify(curvature.direction, curvature.truncated_angle()),
            })
            .collect()
    }

    /// Significant points that survive deduplication
    pub fn scan(&self, sample: &PolylineSample) -> Vec<LocalNote> {
        #[cfg(feature = "profiling")]
        profiling::scope!("local::scan");

        let (_, kept) = self.trace(sample).into_iter().fold(
            (DedupState::None, Vec::new()),
            |(state, mut kept), point| {
                let (state, keep) = self.step(state, &point);
                if keep {
                    kept.push(point);
                }
                (state, kept)
            },
        );

        tracing::debug!(
            "Local scan kept {} of {} interior points",
            kept.len(),
            sample.len().saturating_sub(2)
        );
        kept
    }

    /// Advance the dedup state by one point, returning the new state and whether to keep it
    fn step(&self, state: DedupState, point: &LocalNote) -> (DedupState, bool) {
        let angle = point.angle();
        if (angle as f64) < self.min_angle_deg {
            return (None, false);
        }

        let duplicate = state.is_some_and(|(note, last_angle)| {
            note == point.note && ((angle - last_angle).abs() as f64) < self.dedup_deg
        });
        if duplicate {
            tracing::trace!("Point {} repeats {}", point.index, point.note);
        }

        (Some((point.note, angle)), !duplicate)
    }
}
