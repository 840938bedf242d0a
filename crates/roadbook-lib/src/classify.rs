//! Pacenote classification of turn angles
//!
//! A turn's cumulative angle is truncated to whole degrees and compared against an
//! ascending table of five thresholds. Angles below the first threshold are the
//! gentlest "6" and angles at or above the last one are hairpins.

use crate::{Direction, RoadbookError, Result};

/// Pacenote severity, from the gentlest bend to the hairpin
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Severity {
    Six,
    Five,
    Four,
    Three,
    Two,
    Hairpin,
}

impl Severity {
    /// All severities in increasing order
    pub const ALL: [Severity; 6] = [
        Self::Six,
        Self::Five,
        Self::Four,
        Self::Three,
        Self::Two,
        Self::Hairpin,
    ];

    /// Rally scale number: 6 for the gentlest bend down to 1 for a hairpin
    pub fn number(&self) -> u8 {
        match self {
            Self::Six => 6,
            Self::Five => 5,
            Self::Four => 4,
            Self::Three => 3,
            Self::Two => 2,
            Self::Hairpin => 1,
        }
    }

    pub fn is_hairpin(&self) -> bool {
        matches!(self, Self::Hairpin)
    }

    /// Marker and polyline colour for map rendering
    pub fn color(&self) -> &'static str {
        match self {
            Self::Six => "lightgreen",
            Self::Five => "green",
            Self::Four => "orange",
            Self::Three => "darkorange",
            Self::Two => "red",
            Self::Hairpin => "#800000",
        }
    }
}

/// A classified turn: which way and how tight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pacenote {
    pub direction: Direction,
    pub severity: Severity,
}

impl Pacenote {
    /// Co-driver label, e.g. `left 4` or `hairpin right | 1`
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Pacenote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.severity.is_hairpin() {
            write!(f, "hairpin {} | {}", self.direction, self.severity.number())
        } else {
            write!(f, "{} {}", self.direction, self.severity.number())
        }
    }
}

/// Upper bounds (exclusive) of severities 6, 5, 4, 3 and 2, in whole degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Boundaries {
    thresholds: [i32; 5],
}

impl Boundaries {
    /// Build a custom table
    ///
    /// Thresholds must be strictly ascending and lie in `(0, 180]`.
    pub fn new(thresholds: [i32; 5]) -> Result<Self> {
        if thresholds[0] <= 0 || thresholds[4] > 180 {
            return Err(RoadbookError::InvalidBoundaries(format!(
                "thresholds must lie in (0, 180], got {thresholds:?}"
            )));
        }
        if thresholds.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(RoadbookError::InvalidBoundaries(format!(
                "thresholds must be strictly ascending, got {thresholds:?}"
            )));
        }
        Ok(Self { thresholds })
    }

    /// 30 / 60 / 90 / 120 / 150
    pub const fn lenient() -> Self {
        Self {
            thresholds: [30, 60, 90, 120, 150],
        }
    }

    /// 45 / 75 / 105 / 135 / 165
    pub const fn strict() -> Self {
        Self {
            thresholds: [45, 75, 105, 135, 165],
        }
    }

    pub fn thresholds(&self) -> [i32; 5] {
        self.thresholds
    }

    /// Severity of a truncated angle
    pub fn severity(&self, angle_deg: i32) -> Severity {
        self.thresholds
            .iter()
            .position(|&limit| angle_deg < limit)
            .map_or(Severity::Hairpin, |bucket| Severity::ALL[bucket])
    }

    /// Classify a turn from its side and truncated angle
    pub fn classify(&self, direction: Direction, angle_deg: i32) -> Pacenote {
        Pacenote {
            direction,
            severity: self.severity(angle_deg),
        }
    }
}

impl Default for Boundaries {
    fn default() -> Self {
        Self::lenient()
    }
}
