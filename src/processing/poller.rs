//! Bounded polling loop that reconciles an upload with the eventually-consistent listing.
//!
//! Each tick sleeps for the policy interval, re-fetches the full listing, and runs the
//! matcher. A processed match ends the loop immediately; a pending match and no match both
//! continue to the next tick. Running out of ticks is a soft outcome, while a listing error
//! aborts the loop.

use std::time::Duration;

use async_trait::async_trait;

use crate::{
    processing::matcher::match_artifact,
    remote::{ArtifactRecord, DocumentBackend, RemoteError, UploadTicket},
};

/// Default number of ticks before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 20;
/// Default wait before each tick.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(15_000);

/// Tick budget and spacing for one poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Maximum number of ticks.
    pub max_attempts: u32,
    /// Sleep performed before every tick.
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Suspends the poll loop between ticks.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Result of inspecting one listing.
#[derive(Debug, Clone, PartialEq)]
enum TickOutcome {
    MatchedProcessed(ArtifactRecord),
    MatchedPending(ArtifactRecord),
    Unmatched,
}

/// Mutable state owned by a single loop invocation.
#[derive(Debug)]
struct PollState {
    attempts_made: u32,
    max_attempts: u32,
    matched_record: Option<ArtifactRecord>,
}

impl PollState {
    fn new(policy: &PollPolicy) -> Self {
        Self {
            attempts_made: 0,
            max_attempts: policy.max_attempts,
            matched_record: None,
        }
    }

    fn has_budget(&self) -> bool {
        self.attempts_made < self.max_attempts
    }
}

/// How a poll loop ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// A processed record was found on tick `attempts`.
    Processed {
        /// The terminally resolved record.
        record: ArtifactRecord,
        /// Ticks performed, including the successful one.
        attempts: u32,
    },
    /// The tick budget ran out without a processed match.
    Exhausted {
        /// The last record matched while still pending, if any.
        last_match: Option<ArtifactRecord>,
        /// Ticks performed.
        attempts: u32,
    },
}

impl PollOutcome {
    /// Number of ticks the loop performed.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Processed { attempts, .. } | Self::Exhausted { attempts, .. } => *attempts,
        }
    }
}

/// Poll the backend listing until the upload resolves or the tick budget is spent.
pub async fn poll_for_artifact(
    backend: &dyn DocumentBackend,
    sleeper: &dyn Sleeper,
    policy: &PollPolicy,
    uploaded_file_name: &str,
    ticket: &UploadTicket,
) -> Result<PollOutcome, RemoteError> {
    let mut state = PollState::new(policy);

    while state.has_budget() {
        sleeper.sleep(policy.interval).await;
        state.attempts_made += 1;

        let records = backend.list_artifacts().await?;
        let outcome = match match_artifact(&records, uploaded_file_name, ticket) {
            Some(record) if record.is_processed() => TickOutcome::MatchedProcessed(record.clone()),
            Some(record) => TickOutcome::MatchedPending(record.clone()),
            None => TickOutcome::Unmatched,
        };

        match outcome {
            TickOutcome::MatchedProcessed(record) => {
                tracing::info!(
                    upload_id = %ticket.upload_id,
                    attempt = state.attempts_made,
                    file_name = %record.file_name,
                    "Upload processed"
                );
                return Ok(PollOutcome::Processed {
                    record,
                    attempts: state.attempts_made,
                });
            }
            TickOutcome::MatchedPending(record) => {
                tracing::debug!(
                    upload_id = %ticket.upload_id,
                    attempt = state.attempts_made,
                    max_attempts = state.max_attempts,
                    file_name = %record.file_name,
                    "Upload visible but still processing"
                );
                state.matched_record = Some(record);
            }
            TickOutcome::Unmatched => {
                tracing::debug!(
                    upload_id = %ticket.upload_id,
                    attempt = state.attempts_made,
                    max_attempts = state.max_attempts,
                    listed = records.len(),
                    "Upload not yet visible in listing"
                );
            }
        }
    }

    tracing::warn!(
        upload_id = %ticket.upload_id,
        attempts = state.attempts_made,
        seen = state.matched_record.is_some(),
        "Polling budget exhausted before processing finished"
    );
    Ok(PollOutcome::Exhausted {
        last_match: state.matched_record,
        attempts: state.attempts_made,
    })
}


#[cfg(test)]
mod tests {
    use super::testing::{RecordingSleeper, ScriptedBackend};
    use super::*;
    use crate::remote::ArtifactStatus;
    use reqwest::StatusCode;

    fn ticket() -> UploadTicket {
        UploadTicket {
            upload_id: "u1".into(),
            presigned_url: "https://storage.example/u1".into(),
        }
    }

    fn record(status: ArtifactStatus) -> ArtifactRecord {
        ArtifactRecord {
            file_name: "invoice_final.pdf".into(),
            upload_id: Some("u1".into()),
            status,
            ..ArtifactRecord::default()
        }
    }

    #[tokio::test]
    async fn exhausts_budget_after_exactly_twenty_ticks() {
        let backend = ScriptedBackend::new("u1", vec![Ok(Vec::new())]);
        let sleeper = RecordingSleeper::default();
        let policy = PollPolicy::default();

        let outcome = poll_for_artifact(&backend, &sleeper, &policy, "invoice.pdf", &ticket())
            .await
            .expect("poll");

        assert_eq!(
            outcome,
            PollOutcome::Exhausted {
                last_match: None,
                attempts: 20
            }
        );
        assert_eq!(backend.list_calls(), 20);
        assert_eq!(sleeper.total(), Duration::from_millis(300_000));
    }

    #[tokio::test]
    async fn stops_on_first_processed_tick() {
        let backend = ScriptedBackend::new(
            "u1",
            vec![
                Ok(Vec::new()),
                Ok(vec![record(ArtifactStatus::Pending)]),
                Ok(vec![record(ArtifactStatus::Processed)]),
                Ok(vec![record(ArtifactStatus::Processed)]),
            ],
        );
        let sleeper = RecordingSleeper::default();

        let outcome = poll_for_artifact(
            &backend,
            &sleeper,
            &PollPolicy::default(),
            "invoice.pdf",
            &ticket(),
        )
        .await
        .expect("poll");

        assert_eq!(outcome.attempts(), 3);
        assert!(matches!(outcome, PollOutcome::Processed { ref record, .. } if record.is_processed()));
        assert_eq!(backend.list_calls(), 3);
        assert_eq!(sleeper.total(), Duration::from_millis(45_000));
    }

    #[tokio::test]
    async fn keeps_last_pending_match_on_exhaustion() {
        let backend = ScriptedBackend::new("u1", vec![Ok(vec![record(ArtifactStatus::Pending)])]);
        let sleeper = RecordingSleeper::default();
        let policy = PollPolicy {
            max_attempts: 3,
            interval: Duration::from_millis(10),
        };

        let outcome = poll_for_artifact(&backend, &sleeper, &policy, "invoice.pdf", &ticket())
            .await
            .expect("poll");

        match outcome {
            PollOutcome::Exhausted {
                last_match: Some(record),
                attempts,
            } => {
                assert_eq!(attempts, 3);
                assert_eq!(record.status, ArtifactStatus::Pending);
            }
            other => panic!("expected exhausted with pending match, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn listing_error_aborts_loop() {
        let backend = ScriptedBackend::new(
            "u1",
            vec![Ok(Vec::new()), Err(StatusCode::BAD_GATEWAY)],
        );
        let sleeper = RecordingSleeper::default();

        let err = poll_for_artifact(
            &backend,
            &sleeper,
            &PollPolicy::default(),
            "invoice.pdf",
            &ticket(),
        )
        .await
        .expect_err("listing failure should propagate");

        assert!(matches!(err, RemoteError::List { status, .. } if status == StatusCode::BAD_GATEWAY));
        assert_eq!(backend.list_calls(), 2);
    }

    #[tokio::test]
    async fn zero_budget_performs_no_ticks() {
        let backend = ScriptedBackend::new("u1", vec![Ok(vec![record(ArtifactStatus::Processed)])]);
        let sleeper = RecordingSleeper::default();
        let policy = PollPolicy {
            max_attempts: 0,
            interval: Duration::from_millis(10),
        };

        let outcome = poll_for_artifact(&backend, &sleeper, &policy, "invoice.pdf", &ticket())
            .await
            .expect("poll");
        assert_eq!(outcome.attempts(), 0);
        assert_eq!(backend.list_calls(), 0);
    }
}
