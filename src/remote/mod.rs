//! Document backend integration.

pub mod client;
pub mod types;

pub use client::{DocumentBackend, RemoteClient};
pub use types::{ArtifactRecord, ArtifactStatus, RemoteError, UploadRequest, UploadTicket};
