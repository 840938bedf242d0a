//! Roadbook printing: console lines or JSON

use roadbook_lib::{Roadbook, RoadbookInfo, Severity, Turn};
use serde::Serialize;
use std::io::Write;

use crate::error::CliError;

/// JSON document printed with `--json`
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub info: RoadbookInfo,
    pub entries: Vec<ReportEntry>,
    pub turns: &'a [Turn],
    pub spans: Vec<ReportSpan>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<ReportEntry>,
}

/// One marker for the map collaborator
#[derive(Debug, Serialize)]
pub struct ReportEntry {
    pub index: usize,
    pub lat: f64,
    pub lon: f64,
    pub label: String,
    pub angle_deg: i32,
    pub severity: Severity,
    pub color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arc_length_m: Option<f64>,
}

/// One coloured stretch of the resampled route
#[derive(Debug, Serialize)]
pub struct ReportSpan {
    pub start_index: usize,
    pub end_index: usize,
    pub color: &'static str,
    /// (lon, lat) positions of the stretch
    pub coordinates: Vec<[f64; 2]>,
}

impl<'a> Report<'a> {
    pub fn new(roadbook: &'a Roadbook) -> Self {
        let points = roadbook.sample().points();
        Self {
            info: roadbook.info(),
            entries: roadbook
                .entries()
                .iter()
                .map(|entry| ReportEntry {
                    index: entry.index,
                    lat: entry.lat(),
                    lon: entry.lon(),
                    label: entry.label(),
                    angle_deg: entry.angle_deg,
                    severity: entry.severity(),
                    color: entry.severity().color(),
                    arc_length_m: entry.arc_length_m,
                })
                .collect(),
            turns: roadbook.turns(),
            spans: roadbook
                .spans()
                .iter()
                .map(|span| ReportSpan {
                    start_index: span.start_index,
                    end_index: span.end_index,
                    color: span.color(),
                    coordinates: points
                        .get(span.start_index..=span.end_index)
                        .unwrap_or_default()
                        .iter()
                        .map(|p| [p.x(), p.y()])
                        .collect(),
                })
                .collect(),
            trace: roadbook
                .trace()
                .iter()
                .map(|point| ReportEntry {
                    index: point.index,
                    lat: point.position.y(),
                    lon: point.position.x(),
                    label: point.note.label(),
                    angle_deg: point.angle_deg(),
                    severity: point.note.severity,
                    color: point.note.severity.color(),
                    arc_length_m: None,
                })
                .collect(),
        }
    }
}

/// Write the roadbook lines, followed by the point trace when one was recorded
pub fn write_lines<W: Write>(out: &mut W, roadbook: &Roadbook) -> Result<(), CliError> {
    for line in roadbook.lines() {
        writeln!(out, "{line}")?;
    }
    if !roadbook.trace().is_empty() {
        writeln!(out)?;
        for line in roadbook.trace_lines() {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}

pub fn write_json<W: Write>(out: &mut W, roadbook: &Roadbook) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, &Report::new(roadbook))?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadbook_lib::{Config, Polyline, RoadbookAnalyzer};

    /// North, west, then north again: a left corner followed by a right one
    fn roadbook(config: Config) -> Roadbook {
        let polyline = Polyline::from_lon_lat(&[
            (0.0, 0.0),
            (0.0, 0.0009),
            (-0.0009, 0.0009),
            (-0.0009, 0.0018),
        ])
        .unwrap();
        RoadbookAnalyzer::new(config)
            .unwrap()
            .analyze(&polyline)
            .unwrap()
    }

    #[test]
    fn test_lines_output() {
        let roadbook = roadbook(Config::default());
        let mut out = Vec::new();
        write_lines(&mut out, &roadbook).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), roadbook.entries().len());
        for (line, entry) in text.lines().zip(roadbook.entries()) {
            assert_eq!(line, entry.to_string());
            assert!(line.contains(" : "));
        }
    }

    #[test]
    fn test_trace_follows_roadbook() {
        let roadbook = roadbook(Config::classic());
        let mut out = Vec::new();
        write_lines(&mut out, &roadbook).unwrap();

        let text = String::from_utf8(out).unwrap();
        let expected = roadbook.entries().len() + 1 + roadbook.trace().len();
        assert_eq!(text.lines().count(), expected);
    }

    #[test]
    fn test_json_report() {
        let roadbook = roadbook(Config::default());
        let mut out = Vec::new();
        write_json(&mut out, &roadbook).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let entries = value["entries"].as_array().unwrap();
        assert_eq!(entries.len(), roadbook.entries().len());
        assert_eq!(
            value["info"]["entry_count"].as_u64().unwrap() as usize,
            roadbook.entries().len()
        );
        assert!(value.get("trace").is_none());
        for (json, entry) in entries.iter().zip(roadbook.entries()) {
            assert_eq!(json["label"], entry.label());
            assert_eq!(json["color"], entry.severity().color());
        }
    }
}
