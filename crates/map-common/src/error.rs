//! Error types for climate-maps.

use thiserror::Error;

/// Result type alias using MapError.
pub type MapResult<T> = Result<T, MapError>;

/// Primary error type for map rendering and data access.
#[derive(Debug, Error)]
pub enum MapError {
    // === Input Errors ===
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid value range: min ({min}) must be less than max ({max})")]
    InvalidRange { min: f64, max: f64 },

    #[error("Missing data: {0}")]
    MissingData(String),

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("Image encoding failed: {0}")]
    Encode(String),

    // === Infrastructure Errors ===
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MapError {
    /// Short machine-readable kind, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            MapError::InvalidInput(_) => "invalid_input",
            MapError::InvalidRange { .. } => "invalid_range",
            MapError::MissingData(_) => "missing_data",
            MapError::Render(_) => "render",
            MapError::Encode(_) => "encode",
            MapError::Config(_) => "config",
            MapError::Io(_) => "io",
        }
    }

    /// Whether the error comes from the caller's data or options rather than
    /// from the environment.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            MapError::InvalidInput(_) | MapError::InvalidRange { .. } | MapError::MissingData(_)
        )
    }
}

impl From<serde_json::Error> for MapError {
    fn from(err: serde_json::Error) -> Self {
        MapError::InvalidInput(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(MapError::InvalidInput("x".into()).kind(), "invalid_input");
        assert_eq!(MapError::InvalidRange { min: 10.0, max: 5.0 }.kind(), "invalid_range");
        assert!(MapError::MissingData("units".into()).is_input_error());
        assert!(!MapError::Render("boom".into()).is_input_error());
    }

    #[test]
    fn test_invalid_range_message() {
        let err = MapError::InvalidRange { min: 10.0, max: 5.0 };
        assert_eq!(
            err.to_string(),
            "Invalid value range: min (10) must be less than max (5)"
        );
    }
}
