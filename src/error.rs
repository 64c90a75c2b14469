use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the collision engine.
///
/// Non-colliding configurations are not errors: they are reported as an
/// infinite collision time. Stale events are dropped silently.
#[derive(Debug, Error)]
pub enum Error {
    /// `extract_min`/`min` called on an empty event queue.
    #[error("event queue is empty")]
    QueueEmpty,

    /// Invalid constructor or step argument.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Degenerate geometry (e.g., coincident particle centers on bounce).
    #[error("numerical error: {0}")]
    MathError(String),
}
