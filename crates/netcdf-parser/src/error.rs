//! Error types for NetCDF parsing operations.

use climate_common::ClimateError;
use thiserror::Error;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF parsing.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Missing required variable, dimension or coordinate
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl From<netcdf::Error> for NetCdfError {
    fn from(err: netcdf::Error) -> Self {
        NetCdfError::InvalidFormat(err.to_string())
    }
}

impl From<NetCdfError> for ClimateError {
    fn from(err: NetCdfError) -> Self {
        match err {
            NetCdfError::IoError(e) => ClimateError::Io(e),
            NetCdfError::MissingData(what) => ClimateError::MissingField(what),
            NetCdfError::InvalidFormat(msg) => ClimateError::DataReadError(msg),
        }
    }
}
