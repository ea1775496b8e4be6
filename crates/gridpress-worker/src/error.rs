use thiserror::Error;

/// Failures that terminate a generation run.
///
/// Per-item failures never land here — they are retried and then papered
/// over with a placeholder. Only whole-run problems become an error
/// response on the wire.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// Every generated item was filtered out during completion
    #[error("no valid puzzles generated")]
    NoValidPuzzles,

    /// The request configuration fails validation
    #[error("invalid generation config: {0}")]
    InvalidConfig(String),

    /// The caller dropped its response receiver mid-run
    #[error("response channel closed")]
    ChannelClosed,
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for WorkerError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        WorkerError::ChannelClosed
    }
}
