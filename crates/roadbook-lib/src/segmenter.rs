//! Turn segmentation
//!
//! A real corner is rasterized into many small-angle steps, so no single local angle says
//! how tight it is. The segmenter scans the sample once, starts a candidate at every point
//! whose angle clears the noise floor, extends it over consecutive steps turning the same
//! way, and keeps the candidate only when its cumulative angle and its curvature density
//! are both large enough.
//!
//! The scan is sequential: after an accepted turn the cursor resumes at its last point, so
//! a turn in the other direction can start right where the previous one stopped, but no
//! step is counted by two turns.

use crate::curvature::{Curvature, curvature_at};
use crate::{Config, Direction, JitterTolerance, PolylineSample, TurnAnchor};

/// A contiguous span of consistent curvature, read by the driver as one corner
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Turn {
    /// First sample index of the span
    pub start_index: usize,
    /// Last sample index of the span (the point where extension stopped)
    pub end_index: usize,
    pub direction: Direction,
    /// Sum of the step angles in degrees, absorbed jitter counted at its weight
    pub cumulative_angle_deg: f64,
    /// Geodesic length of the sample from `start_index` to `end_index`
    pub arc_length_m: f64,
    /// Distance walked from the first turning point to `end_index`
    ///
    /// The length cap and the density filter apply to this distance. A capped turn overshoots
    /// the cap by at most the leg on which it stopped.
    pub extension_m: f64,
}

impl Turn {
    /// Cumulative angle truncated towards zero
    #[inline]
    pub fn truncated_angle(&self) -> i32 {
        self.cumulative_angle_deg as i32
    }

    /// Degrees of turn per 10 m walked while extending, `None` when nothing was walked
    pub fn density_deg_per_10m(&self) -> Option<f64> {
        (self.extension_m > 0.0).then(|| self.cumulative_angle_deg / (self.extension_m / 10.0))
    }
}

/// Why a candidate turn was discarded
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    /// Cumulative angle below the minimum total angle
    TotalAngle { angle_deg: f64, min_deg: f64 },
    /// Too little turn for its length
    Density { density: f64, min_density: f64 },
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TotalAngle { angle_deg, min_deg } => {
                write!(f, "total angle {angle_deg:.1}° < {min_deg}°")
            }
            Self::Density {
                density,
                min_density,
            } => write!(f, "density {density:.2}°/10m < {min_density}°/10m"),
        }
    }
}

/// Groups the curvature of a sample into turns
#[derive(Debug, Clone)]
pub struct TurnSegmenter {
    noise_floor_deg: f64,
    min_step_angle_deg: f64,
    min_total_angle_deg: f64,
    max_turn_length_m: Option<f64>,
    min_density_deg_per_10m: Option<f64>,
    jitter: Option<JitterTolerance>,
    turn_anchor: TurnAnchor,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl TurnSegmenter {
    /// Take the segmentation thresholds from a configuration
    ///
    /// The configuration is expected to be validated already.
    pub fn new(config: &Config) -> Self {
        Self {
            noise_floor_deg: config.noise_floor_deg,
            min_step_angle_deg: config.min_step_angle_deg,
            min_total_angle_deg: config.min_total_angle_deg,
            max_turn_length_m: config.max_turn_length_m,
            min_density_deg_per_10m: config.min_density_deg_per_10m,
            jitter: config.jitter,
            turn_anchor: config.turn_anchor,
        }
    }

    /// Scan a sample and return its turns in route order
    pub fn segment(&self, sample: &PolylineSample) -> Vec<Turn> {
        #[cfg(feature = "profiling")]
        profiling::scope!("segmenter::segment");

        let mut turns: Vec<Turn> = Vec::new();
        let mut i = 1;

        while i + 1 < sample.len() {
            let Some(entry) = curvature_at(sample, i) else {
                break;
            };

            if entry.is_straight() || entry.angle_deg < self.noise_floor_deg {
                i += 1;
                continue;
            }

            let previous_end = turns.last().map(|turn| turn.end_index);
            let candidate = self.extend(sample, i, entry, previous_end);
            match self.check(&candidate) {
                Ok(()) => {
                    tracing::debug!(
                        "Turn {} {:.1}° over {:.0} m, points {}..={}",
                        candidate.direction,
                        candidate.cumulative_angle_deg,
                        candidate.arc_length_m,
                        candidate.start_index,
                        candidate.end_index
                    );
                    i = candidate.end_index.max(i + 1);
                    turns.push(candidate);
                }
                Err(rejection) => {
                    tracing::trace!("Candidate at point {} rejected: {}", i, rejection);
                    i += 1;
                }
            }
        }

        tracing::debug!(
            "Segmented {} sample points into {} turns",
            sample.len(),
            turns.len()
        );
        turns
    }

    /// The unfiltered candidate turn whose first turning point is `index`
    ///
    /// Returns `None` at either end of the sample.
    pub fn candidate_at(&self, sample: &PolylineSample, index: usize) -> Option<Turn> {
        let entry = curvature_at(sample, index)?;
        Some(self.extend(sample, index, entry, None))
    }

    /// Apply the acceptance filters to a candidate
    pub fn check(&self, turn: &Turn) -> Result<(), Rejection> {
        if turn.cumulative_angle_deg < self.min_total_angle_deg {
            return Err(Rejection::TotalAngle {
                angle_deg: turn.cumulative_angle_deg,
                min_deg: self.min_total_angle_deg,
            });
        }

        if let (Some(min_density), Some(density)) =
            (self.min_density_deg_per_10m, turn.density_deg_per_10m())
        {
            if density < min_density {
                return Err(Rejection::Density {
                    density,
                    min_density,
                });
            }
        }

        Ok(())
    }

    /// Grow a turn from its first turning point `i` for as long as the steps agree
    ///
    /// The start never moves before `previous_end`, the last point of the previous turn.
    fn extend(
        &self,
        sample: &PolylineSample,
        i: usize,
        entry: Curvature,
        previous_end: Option<usize>,
    ) -> Turn {
        let anchor = match self.turn_anchor {
            TurnAnchor::Entry => i - 1,
            TurnAnchor::Apex => i,
        };
        let start_index = previous_end.map_or(anchor, |end| anchor.max(end));

        let mut cumulative = entry.angle_deg;
        let mut previous_step = entry.angle_deg;
        let mut walked = 0.0;
        let mut j = i + 1;

        while j + 1 < sample.len() {
            walked += sample.segment_length(j - 1);
            if self.max_turn_length_m.is_some_and(|max_length| walked > max_length) {
                break;
            }

            let Some(step) = curvature_at(sample, j) else {
                break;
            };
            if step.angle_deg < self.min_step_angle_deg {
                break;
            }

            if step.direction == entry.direction {
                cumulative += step.angle_deg;
            } else if let Some(jitter) = self
                .jitter
                .filter(|jitter| (step.angle_deg - previous_step).abs() < jitter.tolerance_deg)
            {
                cumulative += step.angle_deg * jitter.weight;
            } else {
                break;
            }

            previous_step = step.angle_deg;
            j += 1;
        }

        Turn {
            start_index,
            end_index: j,
            direction: entry.direction,
            cumulative_angle_deg: cumulative,
            arc_length_m: sample.span_length(start_index, j),
            extension_m: sample.span_length(i, j),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{straight, walk};
    use crate::{Boundaries, Polyline, Severity, resample::resample};

    fn sample_from(steps: &[(f64, f64)]) -> PolylineSample {
        PolylineSample::from_points(walk((0.0, 0.0), 90.0, steps)).unwrap()
    }

    #[test]
    fn test_straight_line_has_no_turns() {
        let polyline = Polyline::from_lon_lat(&[(0.0, 0.0), (0.0, 0.00899)]).unwrap();
        let sample = resample(&polyline, 50.0).unwrap();
        assert_eq!(sample.len(), 21);

        for config in [Config::classic(), Config::distance_aware()] {
            assert!(TurnSegmenter::new(&config).segment(&sample).is_empty());
        }
    }

    #[test]
    fn test_hairpin_over_four_steps() {
        // 170° to the right in four 42.5° steps, 10 m apart
        let mut steps = vec![(0.0, 10.0)];
        steps.extend([(-42.5, 10.0); 4]);
        let sample = sample_from(&steps);

        let turns = TurnSegmenter::new(&Config::default()).segment(&sample);
        assert_eq!(turns.len(), 1);

        let turn = turns[0];
        assert_eq!(turn.direction, Direction::Right);
        assert!((turn.cumulative_angle_deg - 170.0).abs() < 1e-6);
        assert_eq!(turn.start_index, 0);
        assert_eq!(turn.end_index, 5);
        assert!(turn.arc_length_m > 45.0 && turn.arc_length_m < 55.0);
        assert!(turn.extension_m > 35.0 && turn.extension_m < 45.0);

        let note = Boundaries::lenient().classify(turn.direction, turn.truncated_angle());
        assert_eq!(note.severity, Severity::Hairpin);
        assert_eq!(note.label(), "hairpin right | 1");
    }

    #[test]
    fn test_long_gentle_bend_rejected_by_density() {
        // 25° left spread over 300 m
        let mut steps = vec![(0.0, 50.0)];
        steps.extend([(12.5, 150.0), (12.5, 150.0)]);
        steps.push((0.0, 50.0));
        let sample = sample_from(&steps);

        let config = Config {
            max_turn_length_m: None,
            ..Config::default()
        };
        let segmenter = TurnSegmenter::new(&config);
        let candidate = segmenter.candidate_at(&sample, 1).unwrap();
        assert!((candidate.cumulative_angle_deg - 25.0).abs() < 1e-6);
        assert!(candidate.cumulative_angle_deg >= config.min_total_angle_deg);
        assert!(candidate.extension_m > 295.0 && candidate.extension_m < 305.0);
        assert!(candidate.arc_length_m > 345.0 && candidate.arc_length_m < 355.0);
        assert!(matches!(
            segmenter.check(&candidate),
            Err(Rejection::Density { .. })
        ));
        assert!(segmenter.segment(&sample).is_empty());

        // Without the density filter the same bend is a turn
        let permissive = TurnSegmenter::new(&Config {
            min_density_deg_per_10m: None,
            ..config
        });
        assert_eq!(permissive.segment(&sample).len(), 1);
    }

    #[test]
    fn test_noise_floor_skips_small_angles() {
        let mut steps = straight(2, 20.0);
        steps.extend([(3.0, 20.0), (3.0, 20.0), (3.0, 20.0)]);
        steps.extend(straight(2, 20.0));
        let sample = sample_from(&steps);

        assert!(TurnSegmenter::new(&Config::default()).segment(&sample).is_empty());
    }

    #[test]
    fn test_below_min_total_angle_is_rejected() {
        let mut steps = straight(2, 20.0);
        steps.push((15.0, 20.0));
        steps.extend(straight(2, 20.0));
        let sample = sample_from(&steps);

        let segmenter = TurnSegmenter::new(&Config::default());
        let candidate = segmenter.candidate_at(&sample, 2).unwrap();
        assert!(matches!(
            segmenter.check(&candidate),
            Err(Rejection::TotalAngle { .. })
        ));
        assert!(segmenter.segment(&sample).is_empty());
    }

    #[test]
    fn test_length_cap_stops_extension() {
        // A long steady left curve: 15° every 20 m
        let mut steps = straight(2, 20.0);
        steps.extend([(15.0, 20.0); 20]);
        let sample = sample_from(&steps);

        let config = Config::default();
        let turns = TurnSegmenter::new(&config).segment(&sample);
        assert!(turns.len() > 1, "curve should be split into several turns");
        for turn in &turns {
            // The leg that crossed the cap is the last one walked
            assert!(turn.extension_m <= 150.0 + 21.0);
            assert_eq!(turn.direction, Direction::Left);
        }

        let uncapped = TurnSegmenter::new(&Config {
            max_turn_length_m: None,
            ..config
        })
        .segment(&sample);
        assert_eq!(uncapped.len(), 1);
    }

    #[test]
    fn test_direction_flip_ends_turn_without_jitter() {
        let mut steps = straight(2, 20.0);
        steps.extend([(20.0, 20.0), (20.0, 20.0), (-20.0, 20.0), (-20.0, 20.0)]);
        steps.extend(straight(2, 20.0));
        let sample = sample_from(&steps);

        let config = Config {
            jitter: None,
            ..Config::classic()
        };
        let turns = TurnSegmenter::new(&config).segment(&sample);
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].direction, Direction::Left);
        assert_eq!(turns[1].direction, Direction::Right);
        assert!((turns[0].cumulative_angle_deg - 40.0).abs() < 1e-6);
        assert!((turns[1].cumulative_angle_deg - 40.0).abs() < 1e-6);
        assert!(turns[0].end_index <= turns[1].start_index);
    }

    #[test]
    fn test_back_to_back_turns_share_boundary_point() {
        let mut steps = straight(2, 20.0);
        steps.extend([(20.0, 20.0), (20.0, 20.0), (-20.0, 20.0), (-20.0, 20.0)]);
        steps.extend(straight(2, 20.0));
        let sample = sample_from(&steps);

        let config = Config {
            jitter: None,
            ..Config::default()
        };
        let turns = TurnSegmenter::new(&config).segment(&sample);
        assert_eq!(turns.len(), 2);
        assert_eq!((turns[0].start_index, turns[0].end_index), (1, 4));
        // The entry anchor of the second turn is clamped to the end of the first
        assert_eq!((turns[1].start_index, turns[1].end_index), (4, 6));
        assert!((turns[1].cumulative_angle_deg - 40.0).abs() < 1e-6);
    }

    #[test]
    fn test_cap_counts_from_first_turning_point() {
        // 160° to the right in four 40° steps, 45 m apart: 135 m from the first turning
        // point to the last, so the 150 m cap is only crossed on the exit leg
        let mut steps = straight(2, 45.0);
        steps.extend([(-40.0, 45.0); 4]);
        steps.extend(straight(2, 45.0));
        let sample = sample_from(&steps);

        let config = Config::default();
        let turns = TurnSegmenter::new(&config).segment(&sample);
        assert_eq!(turns.len(), 1);

        let turn = turns[0];
        assert_eq!(turn.direction, Direction::Right);
        assert!((turn.cumulative_angle_deg - 160.0).abs() < 1e-6);
        assert_eq!((turn.start_index, turn.end_index), (1, 6));
        assert!(turn.extension_m > 175.0 && turn.extension_m < 185.0);
        assert_eq!(
            config.boundaries.classify(turn.direction, turn.truncated_angle()).label(),
            "right 2"
        );
    }

    #[test]
    fn test_jitter_is_absorbed() {
        // Left turn with one flipped step of similar magnitude in the middle
        let mut steps = straight(2, 20.0);
        steps.extend([(30.0, 20.0), (30.0, 20.0), (-25.0, 20.0), (30.0, 20.0)]);
        steps.extend(straight(2, 20.0));
        let sample = sample_from(&steps);

        let tolerant = TurnSegmenter::new(&Config::default()).segment(&sample);
        assert_eq!(tolerant.len(), 1);
        assert_eq!(tolerant[0].direction, Direction::Left);
        let expected = 30.0 + 30.0 + 25.0 * 0.7 + 30.0;
        assert!((tolerant[0].cumulative_angle_deg - expected).abs() < 1e-6);

        let strict = TurnSegmenter::new(&Config {
            jitter: None,
            ..Config::default()
        })
        .segment(&sample);
        assert!(strict.len() > 1);
    }

    #[test]
    fn test_jitter_tolerance_limit() {
        // Flipped step far from the previous one ends the turn
        let mut steps = straight(2, 20.0);
        steps.extend([(30.0, 20.0), (30.0, 20.0), (-12.0, 20.0)]);
        steps.extend(straight(2, 20.0));
        let sample = sample_from(&steps);

        let segmenter = TurnSegmenter::new(&Config::default());
        let candidate = segmenter.candidate_at(&sample, 2).unwrap();
        assert!((candidate.cumulative_angle_deg - 60.0).abs() < 1e-6);
        assert_eq!(candidate.end_index, 4);
    }

    #[test]
    fn test_anchor_selects_start_index() {
        let mut steps = straight(2, 20.0);
        steps.extend([(30.0, 20.0), (30.0, 20.0)]);
        steps.extend(straight(2, 20.0));
        let sample = sample_from(&steps);

        let entry = TurnSegmenter::new(&Config::default()).segment(&sample);
        let apex = TurnSegmenter::new(&Config {
            turn_anchor: TurnAnchor::Apex,
            ..Config::default()
        })
        .segment(&sample);

        assert_eq!(entry.len(), 1);
        assert_eq!(apex.len(), 1);
        assert_eq!(entry[0].start_index, 1);
        assert_eq!(apex[0].start_index, 2);
        assert_eq!(entry[0].end_index, apex[0].end_index);
        assert!(entry[0].arc_length_m > apex[0].arc_length_m);
    }

    #[test]
    fn test_turns_advance_and_respect_threshold() {
        // Winding road: alternating bends separated by short straights
        let mut steps = straight(2, 20.0);
        for k in 0..8 {
            let side = if k % 2 == 0 { 1.0 } else { -1.0 };
            let per_step = 15.0 + 10.0 * k as f64;
            steps.extend([(side * per_step, 20.0); 3]);
            steps.extend(straight(3, 20.0));
        }
        let sample = sample_from(&steps);

        for config in [Config::classic(), Config::distance_aware()] {
            let turns = TurnSegmenter::new(&config).segment(&sample);
            assert!(!turns.is_empty());
            for turn in &turns {
                assert!(turn.cumulative_angle_deg >= config.min_total_angle_deg);
                assert!(turn.start_index <= turn.end_index);
                assert!(turn.end_index < sample.len());
            }
            for pair in turns.windows(2) {
                assert!(pair[1].start_index > pair[0].start_index);
                assert!(pair[0].end_index <= pair[1].start_index);
            }
        }
    }

    #[test]
    fn test_two_point_sample() {
        let sample = sample_from(&[(0.0, 20.0)]);
        let segmenter = TurnSegmenter::new(&Config::default());
        assert!(segmenter.segment(&sample).is_empty());
        assert!(segmenter.candidate_at(&sample, 1).is_none());
    }
}
