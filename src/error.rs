//! Error types and handling.

use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// A student with the same phone-derived id is already registered
    #[error("Student with phone id '{0}' already exists")]
    DuplicateStudent(String),

    /// Subject name already exists for the teacher
    #[error("Subject '{0}' already exists")]
    DuplicateSubject(String),

    /// Operation invoked without a teacher/subject/student selected
    #[error("No {0} selected")]
    MissingSelection(&'static str),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backing store could not be read, written or locked
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Export error (CSV or Excel)
    #[error("Export error: {0}")]
    Export(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Create a storage error with message
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageUnavailable(msg.into())
    }

    /// Create a config error with message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error with message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error with message
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Whether the error leaves the store untouched and only needs a message.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::StorageUnavailable(_) | Self::Io(_))
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        Self::Export(e.to_string())
    }
}
