//! Common types shared across Waypoint crates.
//!
//! This crate defines the per-run outcome record written to telemetry and
//! the centralized tracing/logging initialisation. It is intentionally
//! lightweight so that every crate in the workspace can depend on it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod observability;

/// Terminal verdict of one journey execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestStatus {
    Passed,
    Failed,
}

impl TestStatus {
    /// Tag value used in the telemetry schema.
    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
        }
    }
}

/// Result record for a single test execution.
///
/// Created once when the journey finishes and never mutated afterwards;
/// the reporter writes it to the telemetry sink exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestOutcome {
    pub test_name: String,
    pub status: TestStatus,
    /// Wall-clock duration of the run in seconds.
    pub duration_secs: f64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl TestOutcome {
    pub fn new(
        test_name: impl Into<String>,
        status: TestStatus,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        let duration_secs = (completed_at - started_at)
            .to_std()
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        Self {
            test_name: test_name.into(),
            status,
            duration_secs,
            started_at,
            completed_at,
        }
    }

    pub fn passed(&self) -> bool {
        self.status == TestStatus::Passed
    }
}
