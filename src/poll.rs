use std::time::Duration;

use chrono::Local;
use tokio::time::Instant;

use crate::client::ApifyClient;
use crate::model::Run;
use crate::{info_time, Result};

/// Fixed-interval polling with a hard ceiling.
#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    pub interval: Duration,
    pub max_wait: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        PollOptions {
            interval: Duration::from_secs(crate::POLL_INTERVAL_SECS),
            max_wait: Duration::from_secs(crate::POLL_MAX_WAIT_SECS),
        }
    }
}

/// Last observed state of a polled run.
#[derive(Debug, Clone)]
pub struct PollOutcome {
    pub run: Run,
    /// False when the ceiling was hit before the run finished.
    pub finished: bool,
    pub elapsed: Duration,
}

/// Estimated completion shown while waiting: time based, capped at 90 until the run
/// actually finishes.
pub fn progress_percent(elapsed: Duration, max_wait: Duration, finished: bool) -> u8 {
    if finished {
        return 100;
    }
    if max_wait.is_zero() {
        return 90;
    }
    let pct = elapsed.as_secs_f64() / max_wait.as_secs_f64() * 100.0;
    pct.min(90.0) as u8
}

/// Polls `GET /actor-runs/{id}` every `interval` until the run is terminal or
/// `max_wait` of wall-clock time has passed.
pub async fn poll_run(client: &ApifyClient, run_id: &str, opts: PollOptions) -> Result<PollOutcome> {
    let start_time = Local::now();
    let started = Instant::now();

    loop {
        let run = client.get_run(run_id).await?;
        let elapsed = started.elapsed();
        let finished = run.status.is_terminal();
        info_time!(
            start_time,
            "Status: {} [{:>3}%]",
            run.status,
            progress_percent(elapsed, opts.max_wait, finished)
        );

        if finished || elapsed >= opts.max_wait {
            return Ok(PollOutcome {
                run,
                finished,
                elapsed,
            });
        }

        tokio::time::sleep(opts.interval).await;
    }
}
