//! Route loading from GPX and GeoJSON files

use roadbook_lib::Polyline;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::CliError;
use crate::settings::InputFormat;

/// Load the route polyline from a file
pub fn load(path: &Path, format: Option<InputFormat>) -> Result<Polyline, CliError> {
    let format = match format {
        Some(format) => format,
        None => infer_format(path)?,
    };
    let read_error = |source| CliError::Read {
        path: path.to_path_buf(),
        source,
    };

    let polyline = match format {
        InputFormat::Gpx => {
            let file = File::open(path).map_err(read_error)?;
            Polyline::read_gpx(BufReader::new(file))?
        }
        InputFormat::Geojson => {
            let text = std::fs::read_to_string(path).map_err(read_error)?;
            parse_geojson(&text)?
        }
    };

    tracing::info!(
        "Loaded {} route points ({:.0} m) from {}",
        polyline.len(),
        polyline.total_distance(),
        path.display()
    );
    Ok(polyline)
}

fn infer_format(path: &Path) -> Result<InputFormat, CliError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("gpx") => Ok(InputFormat::Gpx),
        Some("geojson" | "json") => Ok(InputFormat::Geojson),
        _ => Err(CliError::UnknownFormat(path.to_path_buf())),
    }
}

/// Parse the first LineString of a GeoJSON document
///
/// Accepts a bare LineString geometry, a Feature, a FeatureCollection (as returned by
/// directions services) or an OSRM-style response with `routes[].geometry`.
pub fn parse_geojson(text: &str) -> Result<Polyline, CliError> {
    let document: Value = serde_json::from_str(text)?;
    let geometry = find_line_string(&document)
        .ok_or_else(|| CliError::GeoJson("no LineString geometry found".to_string()))?;

    let coordinates = geometry
        .get("coordinates")
        .and_then(Value::as_array)
        .ok_or_else(|| CliError::GeoJson("LineString without coordinates".to_string()))?;

    let pairs = coordinates
        .iter()
        .enumerate()
        .map(|(index, position)| {
            let lon = position.get(0).and_then(Value::as_f64);
            let lat = position.get(1).and_then(Value::as_f64);
            lon.zip(lat).ok_or_else(|| {
                CliError::GeoJson(format!("position {index} is not a [lon, lat] pair"))
            })
        })
        .collect::<Result<Vec<(f64, f64)>, CliError>>()?;

    Ok(Polyline::from_lon_lat(&pairs)?)
}

fn find_line_string(value: &Value) -> Option<&Value> {
    match value.get("type").and_then(Value::as_str) {
        Some("LineString") => Some(value),
        Some("Feature") => value.get("geometry").and_then(find_line_string),
        Some("FeatureCollection") => value
            .get("features")?
            .as_array()?
            .iter()
            .find_map(find_line_string),
        _ => value
            .get("routes")?
            .as_array()?
            .iter()
            .find_map(|route| route.get("geometry").and_then(find_line_string)),
    }
}
