//! The watch loop: follows one build from queue to completion, streaming
//! newly arrived console lines to the terminal.

use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::Config;
use crate::jenkins_client::{fetch_console, JenkinsApi};
use crate::types::{BuildRef, JinkiesError};

/// Consecutive failed status fetches tolerated before the watch gives up on
/// the build reference. Queue waits never count against this budget.
const MAX_STATUS_FAILURES: u32 = 5;

/// Where the watch loop currently is in a build's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WatchState {
    /// No status fetch has succeeded yet; the build may still be queued.
    ResolvingQueue,
    /// Build status is readable and console output is being streamed.
    Streaming,
}

/// Pluggable delay between polls so tests can run without real time.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer.
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Polls a single build and prints its console output as it arrives.
///
/// The server's progressive console endpoint is append-only and returns the
/// cumulative text, so the session tracks its own read cursor. The cursor
/// backs up one line after each print because the final line may still be in
/// progress and can grow on the next poll.
pub struct WatchSession<'a, W: Write> {
    api: &'a dyn JenkinsApi,
    sleeper: &'a dyn Sleeper,
    out: W,
    queue_poll_interval: Duration,
    stream_poll_interval: Duration,
}

impl<'a, W: Write> WatchSession<'a, W> {
    pub fn new(api: &'a dyn JenkinsApi, sleeper: &'a dyn Sleeper, config: &Config, out: W) -> Self {
        Self {
            api,
            sleeper,
            out,
            queue_poll_interval: config.queue_poll_interval,
            stream_poll_interval: config.stream_poll_interval,
        }
    }

    /// Blocks until the build completes, returning the result string the
    /// server reported. A build that cannot be resolved within the failure
    /// budget (or whose job cannot be loaded at all) returns `Err`.
    ///
    /// A job that stays queued waits indefinitely; that mirrors the server's
    /// own behavior and is deliberate.
    pub async fn run(&mut self, build: &BuildRef) -> Result<String, JinkiesError> {
        let mut state = WatchState::ResolvingQueue;
        let mut cursor = 0usize;
        let mut failures = 0u32;
        let mut waits = 0u32;
        let mut first_wait = true;

        loop {
            let status = match self.api.build_status(&build.job, build.number).await {
                Ok(status) => status,
                Err(err) if state == WatchState::ResolvingQueue => {
                    // The build may not exist yet because the job is still
                    // queued; only the job-level status can tell.
                    let job = self.api.job_status(&build.job).await.map_err(|job_err| {
                        JinkiesError::JobLoad {
                            job: build.job.clone(),
                            detail: job_err.to_string(),
                        }
                    })?;
                    waits += 1;
                    if job.in_queue {
                        if first_wait {
                            write!(self.out, "Waiting in job queue .")?;
                            first_wait = false;
                        } else {
                            write!(self.out, ".")?;
                        }
                        self.out.flush()?;
                        self.sleeper.sleep(self.queue_poll_interval).await;
                    } else {
                        // No delay between these retries; the budget caps
                        // them at six attempts.
                        failures += 1;
                        if failures > MAX_STATUS_FAILURES {
                            return Err(JinkiesError::JobLoad {
                                job: build.job.clone(),
                                detail: err.to_string(),
                            });
                        }
                    }
                    continue;
                }
                Err(err) => {
                    // Transient mid-stream failure; shares the same budget.
                    failures += 1;
                    if failures > MAX_STATUS_FAILURES {
                        return Err(JinkiesError::JobLoad {
                            job: build.job.clone(),
                            detail: err.to_string(),
                        });
                    }
                    debug!(build = %build, error = %err, "status poll failed, retrying");
                    self.sleeper.sleep(self.stream_poll_interval).await;
                    continue;
                }
            };

            if state == WatchState::ResolvingQueue {
                if failures > 0 || waits > 0 {
                    writeln!(self.out)?;
                }
                writeln!(
                    self.out,
                    "Started build #{}, ETA {:.1}s",
                    build.number,
                    status.estimated_secs()
                )?;
                state = WatchState::Streaming;
            }
            failures = 0;

            let lines = fetch_console(self.api, &build.job, build.number).await;
            if lines.len() > cursor {
                writeln!(self.out, "{}", lines[cursor..].join("\n"))?;
                // Re-examine the last line next poll; it may still be a
                // line in progress.
                cursor = lines.len() - 1;
            }

            if !status.building {
                let result = status.result.unwrap_or_else(|| "UNKNOWN".to_string());
                writeln!(self.out, "{result}")?;
                return Ok(result);
            }
            self.sleeper.sleep(self.stream_poll_interval).await;
        }
    }
}
