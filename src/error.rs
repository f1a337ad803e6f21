//! Crate-wide result alias.

pub use crate::types::ScanError;

pub type Result<T> = std::result::Result<T, ScanError>;

/// Turns any displayable error into [`ScanError::ConfigError`], prefixed with
/// a description of what was being attempted.
pub trait ErrorContext<T> {
    fn with_context<F>(self, describe: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: std::fmt::Display> ErrorContext<T> for std::result::Result<T, E> {
    fn with_context<F>(self, describe: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| ScanError::ConfigError(format!("{}: {}", describe(), e)))
    }
}
