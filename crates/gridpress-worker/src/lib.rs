//! Batch puzzle-generation worker.
//!
//! Wraps the `gridpress-core` engine in a message-driven worker task: a
//! generate request goes in over one channel, progress / completion / error
//! responses come back over another. Inside the task everything is
//! single-threaded and cooperative — the puzzle cache has exactly one
//! writer, and the only suspension points are voluntary yields that keep
//! the host runtime responsive.

pub mod cache;
pub mod error;
pub mod orchestrator;
pub mod protocol;
pub mod worker;

pub use cache::PuzzleCache;
pub use error::WorkerError;
pub use protocol::{
    BatchItem, DifficultyMix, DifficultySection, GenerationConfig, WorkerRequest, WorkerResponse,
};
pub use worker::{spawn, WorkerHandle};
