//! Drives a remote run from submission to a terminal status.
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::anyhow;
use serde_json::Value;
use thiserror::Error;

use super::core::{AssistantService, Run, RunStatus};

/// Why a turn did not produce an assistant reply.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("run {run_id} ended {status} before completing")]
    Terminal { run_id: String, status: RunStatus },
    #[error("run {run_id} still {status} after {attempts} status checks")]
    TimedOut {
        run_id: String,
        status: RunStatus,
        attempts: u32,
    },
    #[error("turn cancelled while waiting for the run")]
    Cancelled,
    #[error(transparent)]
    Service(#[from] anyhow::Error),
}

/// Submits a turn and polls the resulting run at a fixed interval, up
/// to a bounded number of status checks. Holds no per-turn state.
pub struct RunPoller {
    interval: Duration,
    max_attempts: u32,
}

impl RunPoller {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Post the user's text to the thread, then start a run for the
    /// configured assistant over it.
    pub async fn submit_turn(
        &self,
        service: &dyn AssistantService,
        thread_id: &str,
        assistant_id: &str,
        text: &str,
    ) -> Result<Run, RunError> {
        service.add_user_message(thread_id, text).await?;
        let run = service.create_run(thread_id, assistant_id).await?;
        tracing::debug!("Submitted run {} on thread {}", run.id, thread_id);
        Ok(run)
    }

    /// Poll the run until it reaches `completed`, then fetch and return
    /// the newest message on the thread. The cancel flag is honored
    /// between attempts. A terminal status other than `completed` and
    /// an exhausted attempt limit are distinct failures; a failed
    /// status check is not retried.
    pub async fn await_completion(
        &self,
        service: &dyn AssistantService,
        thread_id: &str,
        run: &Run,
        cancel: &AtomicBool,
    ) -> Result<Value, RunError> {
        let mut last_status = run.status;
        for attempt in 0..self.max_attempts {
            if cancel.load(Ordering::SeqCst) {
                return Err(RunError::Cancelled);
            }

            let current = service.run_status(thread_id, &run.id).await?;
            last_status = current.status;
            match current.status {
                RunStatus::Completed => {
                    let mut messages = service.list_messages(thread_id).await?;
                    if messages.is_empty() {
                        return Err(RunError::Service(anyhow!(
                            "thread {} has no messages after run {}",
                            thread_id,
                            run.id
                        )));
                    }
                    // Newest first, so the reply is the head of the list
                    return Ok(messages.remove(0));
                }
                status if status.is_terminal() => {
                    return Err(RunError::Terminal {
                        run_id: run.id.clone(),
                        status,
                    });
                }
                status => {
                    tracing::debug!(
                        "Run {} is {} (check {} of {})",
                        run.id,
                        status,
                        attempt + 1,
                        self.max_attempts
                    );
                    tokio::time::sleep(self.interval).await;
                }
            }
        }

        Err(RunError::TimedOut {
            run_id: run.id.clone(),
            status: last_status,
            attempts: self.max_attempts,
        })
    }
}
