//! Core error type.
//!
//! Sub-crates define their own error enums; `CoreError` only covers
//! malformed primitive values.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid coordinate ({lat}, {lon}): expected finite lat in [-90, 90] and lon in [-180, 180]")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

pub type CoreResult<T> = Result<T, CoreError>;
