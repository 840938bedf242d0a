use roadbook_lib::RoadbookError;
use std::path::PathBuf;

/// Error types for the command line tool
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Roadbook(#[from] RoadbookError),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write output: {0}")]
    Write(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported GeoJSON: {0}")]
    GeoJson(String),

    #[error("Cannot infer the format of {}, pass --format", .0.display())]
    UnknownFormat(PathBuf),

    #[error("{0}")]
    Usage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CliError::UnknownFormat(PathBuf::from("route.txt"));
        assert_eq!(
            err.to_string(),
            "Cannot infer the format of route.txt, pass --format"
        );

        let err = CliError::from(RoadbookError::EmptyRoute);
        assert_eq!(err.to_string(), "Empty route");
    }
}
