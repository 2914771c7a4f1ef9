// src/application/services/dispatch.rs
use crate::application::error::{ApplicationError, ApplicationResult};
use std::{fmt, future::Future};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::warn;

/// Follow-up work that runs after an admin action has been committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BestEffortStep {
    Audit,
    Notify,
}

impl BestEffortStep {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Audit => "audit",
            Self::Notify => "notify",
        }
    }
}

impl fmt::Display for BestEffortStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct BestEffortFailure {
    pub step: BestEffortStep,
    pub target_id: String,
    pub error: ApplicationError,
}

pub type FailureReceiver = mpsc::UnboundedReceiver<BestEffortFailure>;

/// Runs best-effort follow-up jobs off the request path. Failures go to a
/// dedicated channel and never reach the request's result.
#[derive(Clone)]
pub struct BestEffortDispatcher {
    failures: mpsc::UnboundedSender<BestEffortFailure>,
}

impl BestEffortDispatcher {
    pub fn new() -> (Self, FailureReceiver) {
        let (failures, rx) = mpsc::unbounded_channel();
        (Self { failures }, rx)
    }

    /// Detach a follow-up job from the caller.
    pub fn spawn<F>(&self, job: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(job)
    }

    /// Await one step and report its failure, if any. Returns whether the
    /// step succeeded.
    pub async fn run<T, F>(&self, step: BestEffortStep, target_id: &str, work: F) -> bool
    where
        F: Future<Output = ApplicationResult<T>> + Send,
    {
        match work.await {
            Ok(_) => true,
            Err(error) => {
                let failure = BestEffortFailure {
                    step,
                    target_id: target_id.to_string(),
                    error,
                };
                if let Err(mpsc::error::SendError(failure)) = self.failures.send(failure) {
                    log_failure(&failure);
                }
                false
            }
        }
    }
}

/// Drain the failure channel into the log until every dispatcher is dropped.
pub fn spawn_failure_logger(mut failures: FailureReceiver) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(failure) = failures.recv().await {
            log_failure(&failure);
        }
    })
}

fn log_failure(failure: &BestEffortFailure) {
    warn!(
        step = %failure.step,
        target_id = %failure.target_id,
        error = %failure.error,
        "best-effort step failed after admin action was applied"
    );
}
