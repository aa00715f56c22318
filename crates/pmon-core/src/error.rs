//! Error types for process monitoring

use std::io;
use thiserror::Error;

/// Result type for monitoring operations
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Errors that can occur while monitoring a process
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("process {0} not found")]
    ProcessNotFound(i32),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("malformed accounting data: {0}")]
    MalformedAccountingData(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
