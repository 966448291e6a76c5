//! Upload pipeline: content-type derivation, artifact matching, polling, and orchestration.

pub mod content_type;
pub mod matcher;
pub mod poller;
mod service;
pub mod types;

pub use content_type::derive_content_type;
pub use matcher::{find_by_name, match_artifact};
pub use poller::{PollOutcome, PollPolicy, Sleeper, TokioSleeper, poll_for_artifact};
pub use service::ProcessingService;
pub use types::{UploadError, UploadOptions, UploadOutcome};
