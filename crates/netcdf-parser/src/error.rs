//! Error types for NetCDF parsing operations.

use map_common::MapError;
use thiserror::Error;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF parsing.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Missing required variable, coordinate or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Requested time or level index cannot be served
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Error reported by libnetcdf
    #[error("NetCDF library error: {0}")]
    Library(String),
}

impl From<netcdf::Error> for NetCdfError {
    fn from(err: netcdf::Error) -> Self {
        NetCdfError::Library(err.to_string())
    }
}

impl From<NetCdfError> for MapError {
    fn from(err: NetCdfError) -> Self {
        match err {
            NetCdfError::IoError(e) => MapError::Io(e),
            NetCdfError::MissingData(msg) => MapError::MissingData(msg),
            NetCdfError::InvalidFormat(msg) | NetCdfError::InvalidSelection(msg) => {
                MapError::InvalidInput(msg)
            }
            NetCdfError::Library(msg) => MapError::InvalidInput(format!("NetCDF: {}", msg)),
        }
    }
}
