//! Job execution: the progress tracker, the bounded fetch queue, the fetch
//! worker, and the generation orchestrator.
//!
//! This crate owns every state transition a job goes through. The HTTP layer
//! (`clookit-api`) only creates durable rows and hands work to these
//! functions.

pub mod download;
pub mod generation;
pub mod progress;
pub mod queue;

pub use download::{spawn_download, DownloadTask};
pub use generation::{run_generation, GenerationOutcome, GenerationRequest};
pub use progress::{DownloadProgress, ProgressTracker};
pub use queue::DownloadQueue;
