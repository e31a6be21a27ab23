//! Error types for the driver boundary.

use thiserror::Error;

/// Errors surfaced by [`crate::Browser`] implementations.
///
/// Transient "element not found yet" conditions are *not* errors; they are
/// reported as `Ok(None)` / empty result sets and absorbed by the waiter's
/// poll loop.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The WebDriver session could not be established.
    #[error("webdriver session error: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),

    /// A WebDriver command failed after the session was established.
    #[error("webdriver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    /// A script executed in the page returned a value we could not interpret.
    #[error("unexpected script result shape: {0}")]
    ScriptShape(String),
}
