//! Test-outcome telemetry: the time-series sink and failure diagnostics.
//!
//! Everything in this crate is best-effort relative to the functional
//! verdict: a sink write or screenshot capture that fails is logged and
//! swallowed, never escalated into the test's own pass/fail status.

pub mod influx;
pub mod snapshot;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};
use waypoint_common::TestOutcome;

pub use influx::InfluxSink;
pub use snapshot::SnapshotWriter;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid telemetry endpoint: {0}")]
    Endpoint(String),

    #[error("telemetry write failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("telemetry sink rejected the write: status {status}: {message}")]
    Rejected { status: u16, message: String },
}

/// Write sink for per-test outcome records.
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    async fn write_point(&self, outcome: &TestOutcome) -> Result<(), TelemetryError>;
}

/// Persists each run's outcome record, exactly once, best-effort.
///
/// A failed write is logged and *not* retried: a retry that lands after a
/// partial success would duplicate the point, and observability failures
/// must never alter the already-determined verdict either way.
pub struct OutcomeReporter<S> {
    sink: S,
}

impl<S: TelemetrySink> OutcomeReporter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub async fn report(&self, outcome: &TestOutcome) {
        match self.sink.write_point(outcome).await {
            Ok(()) => {
                info!(
                    test_name = %outcome.test_name,
                    status = outcome.status.as_str(),
                    duration_secs = outcome.duration_secs,
                    "outcome recorded"
                );
            }
            Err(e) => {
                warn!(
                    test_name = %outcome.test_name,
                    error = %e,
                    "outcome could not be recorded, continuing"
                );
            }
        }
    }
}
