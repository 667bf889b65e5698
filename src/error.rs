//! Error handling for the lpdash dashboard crate.

/// A specialized `Result` type for dashboard operations.
pub type Result<T> = std::result::Result<T, DashboardError>;

/// The main error type for dashboard operations.
///
/// Partial collection failures (a single unreadable metric source) are not
/// represented here: the collector recovers them locally with sentinel values.
/// This type covers the failures that are allowed to surface: sink writes,
/// which are fatal to a single iteration, and configuration problems, which
/// are fatal to the process at startup.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// I/O operation failed (sink write, framebuffer open, ...)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// PNG encoding failed
    #[error("PNG encoding error: {0}")]
    Png(#[from] image::ImageError),

    /// Configuration error (invalid environment variable at startup)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DashboardError {
    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
