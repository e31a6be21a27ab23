//! Ordered journey execution with short-circuit on the first failure.

use anyhow::Result;
use futures::future::BoxFuture;
use std::future::Future;
use tracing::{info, warn};

/// A named assertion against the page state left by the previous step.
pub struct JourneyStep<'a> {
    name: &'static str,
    assertion: BoxFuture<'a, Result<bool>>,
}

impl<'a> JourneyStep<'a> {
    pub fn new(
        name: &'static str,
        assertion: impl Future<Output = Result<bool>> + Send + 'a,
    ) -> Self {
        Self {
            name,
            assertion: Box::pin(assertion),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// State machine of one journey execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JourneyState {
    NotStarted,
    Running(usize),
    Passed,
    Failed {
        step: usize,
        name: &'static str,
        reason: String,
    },
}

impl JourneyState {
    pub fn passed(&self) -> bool {
        matches!(self, JourneyState::Passed)
    }
}

/// A strict finite sequence of steps, executed in order.
///
/// Steps are not independent: each presupposes the page state its
/// predecessor established, so the first failing assertion terminates the
/// journey and later steps are never polled.
pub struct Journey<'a> {
    steps: Vec<JourneyStep<'a>>,
}

impl<'a> Journey<'a> {
    pub fn new(steps: Vec<JourneyStep<'a>>) -> Self {
        Self { steps }
    }

    pub async fn run(self) -> JourneyState {
        let total = self.steps.len();
        for (index, step) in self.steps.into_iter().enumerate() {
            let name = step.name;
            info!(step = index + 1, total, name, "journey step starting");
            match step.assertion.await {
                Ok(true) => {
                    info!(step = index + 1, name, "journey step passed");
                }
                Ok(false) => {
                    warn!(step = index + 1, name, "journey step assertion did not hold");
                    return JourneyState::Failed {
                        step: index,
                        name,
                        reason: "assertion did not hold".to_string(),
                    };
                }
                Err(e) => {
                    warn!(step = index + 1, name, error = %e, "journey step errored");
                    return JourneyState::Failed {
                        step: index,
                        name,
                        reason: format!("{e:#}"),
                    };
                }
            }
        }
        JourneyState::Passed
    }
}
