//! Run management: list runs, start one without blocking, poll it, then read its
//! statistics, log and output.

use std::time::Duration;

use serde_json::json;

use crate::client::ApifyClient;
use crate::model::{Run, RunStatus};
use crate::poll::{poll_run, PollOptions};
use crate::render::{banner, date, short_id, summary, tail, truncate, Column, Panel, Table};
use crate::{step, Result};

pub const ACTOR_ID: &str = "apify/hello-world";

const LIST_LIMIT: u32 = 10;
const LOG_TAIL_CHARS: usize = 500;
const OUTPUT_PREVIEW: usize = 3;

#[derive(Debug, Clone, clap::Args)]
pub struct RunsOptions {
    /// Input message for the demo run
    #[arg(long, default_value = "Hello from the Learning Lab!")]
    pub message: String,
    /// Seconds between status checks
    #[arg(
        long,
        default_value_t = crate::POLL_INTERVAL_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub poll_interval: u64,
    /// Give up waiting after this many seconds and abort the run
    #[arg(long, default_value_t = crate::POLL_MAX_WAIT_SECS)]
    pub max_wait: u64,
}

impl RunsOptions {
    pub fn poll_options(&self) -> PollOptions {
        PollOptions {
            interval: Duration::from_secs(self.poll_interval),
            max_wait: Duration::from_secs(self.max_wait),
        }
    }
}

pub fn status_label(status: &RunStatus) -> String {
    let glyph = match status {
        RunStatus::Succeeded => "✓ ",
        RunStatus::Running => "● ",
        RunStatus::Failed => "✗ ",
        RunStatus::Aborted => "◼ ",
        _ => "",
    };
    format!("{glyph}{status}")
}

/// `12.3s`, or `N/A` for runs without a recorded duration.
pub fn duration_label(millis: u64) -> String {
    if millis == 0 {
        "N/A".to_string()
    } else {
        format!("{:.1}s", millis as f64 / 1000.0)
    }
}

pub fn runs_table(runs: &[Run]) -> Table {
    let mut table = Table::with_title("Recent Runs")
        .column(Column::new("Status").width(12))
        .column(Column::new("Actor").max_width(25))
        .column(Column::new("Run ID").width(15))
        .column(Column::new("Duration").right())
        .column(Column::new("Started"));
    for run in runs.iter().take(LIST_LIMIT as usize) {
        let actor = if run.act_id.is_empty() {
            "Unknown"
        } else {
            run.act_id.as_str()
        };
        table.add_row([
            status_label(&run.status),
            truncate(actor, 22),
            short_id(&run.id),
            duration_label(run.stats.duration_millis),
            date(run.started_at),
        ]);
    }
    table
}

fn opt_label<T: ToString>(v: &Option<T>, default: &str) -> String {
    v.as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| default.to_string())
}

/// Configuration, statistics and resource usage of a finished run.
pub fn run_statistics(run: &Run) -> String {
    let mut out = String::new();
    out.push_str("\n  Run Configuration:\n");
    out.push_str(&format!("    Memory: {} MB\n", opt_label(&run.options.memory_mbytes, "N/A")));
    out.push_str(&format!(
        "    Timeout: {} seconds\n",
        opt_label(&run.options.timeout_secs, "N/A")
    ));
    out.push_str(&format!("    Build: {}\n", opt_label(&run.options.build, "latest")));

    let stats = &run.stats;
    out.push_str("\n  Run Statistics:\n");
    out.push_str(&format!(
        "    Duration: {:.2} seconds\n",
        stats.duration_millis as f64 / 1000.0
    ));
    out.push_str(&format!("    Run Time: {:.2} seconds\n", stats.run_time_secs));
    out.push_str(&format!("    Input Size: {} bytes\n", stats.input_body_len));
    out.push_str(&format!("    Restart Count: {}\n", stats.restart_count));

    if !run.usage.is_empty() {
        let usage = |key: &str| run.usage.get(key).copied().unwrap_or(0.0);
        out.push_str("\n  Resource Usage:\n");
        out.push_str(&format!("    Compute Units: {:.4}\n", usage("ACTOR_COMPUTE_UNITS")));
        out.push_str(&format!("    Dataset Reads: {}\n", usage("DATASET_READS")));
        out.push_str(&format!("    Dataset Writes: {}\n", usage("DATASET_WRITES")));
        out.push_str(&format!("    KV Store Reads: {}\n", usage("KEY_VALUE_STORE_READS")));
        out.push_str(&format!("    KV Store Writes: {}\n", usage("KEY_VALUE_STORE_WRITES")));
    }
    out
}

pub async fn run(client: &ApifyClient, opts: &RunsOptions) -> Result<()> {
    println!("{}", banner("11 - Run Management"));

    step!(1, "List Recent Runs");
    let recent = client.list_runs(LIST_LIMIT, true).await?;
    println!("  Found {} total runs in your account", recent.total);
    if !recent.items.is_empty() {
        println!("{}", runs_table(&recent.items));
    }

    step!(2, "Start a New Actor Run");
    let input = json!({ "message": opts.message });
    println!("  Actor: {ACTOR_ID}");
    println!("  Input: {input}");
    println!("\n  Starting run...");
    let started = client.start(ACTOR_ID, &input).await?;
    let run_id = started.id;
    println!("  ✓ Run started!");
    println!("    Run ID: {run_id}");
    println!("    Status: {}", started.status);

    step!(3, "Monitor Run Progress");
    println!("  Polling for status updates...\n");
    let outcome = poll_run(client, &run_id, opts.poll_options()).await?;
    let mut final_run = outcome.run;
    if !outcome.finished {
        println!(
            "\n  Run still {} after {}s, aborting it",
            final_run.status,
            outcome.elapsed.as_secs()
        );
        final_run = client.abort_run(&run_id).await?;
    }
    println!("\n  Final Status: {}", final_run.status);

    step!(4, "Analyze Run Statistics");
    print!("{}", run_statistics(&final_run));

    step!(5, "View Run Log");
    match client.run_log(&run_id).await {
        Ok(log) if log.is_empty() => println!("  No log available"),
        Ok(log) => println!(
            "{}",
            Panel::new(tail(&log, LOG_TAIL_CHARS)).title("Run Log (last 500 chars)")
        ),
        Err(e) => println!("  Could not fetch log: {e}"),
    }

    step!(6, "Get Run Output");
    if let Some(dataset_id) = &final_run.default_dataset_id {
        let items = client.iterate_items(dataset_id).await?;
        println!("  Dataset ID: {dataset_id}");
        println!("  Items in dataset: {}", items.len());
        if !items.is_empty() {
            println!("\n  Output Data:");
            for item in items.iter().take(OUTPUT_PREVIEW) {
                println!("    {item}");
            }
        }
    }
    if let Some(store_id) = &final_run.default_key_value_store_id {
        println!("\n  Key-Value Store: {store_id}");
    }

    step!(7, "Run Management Operations");
    println!("\n  Available operations:");
    println!("    • POST /actor-runs/{{id}}/abort - Stop a running actor");
    println!("    • POST /actor-runs/{{id}}/resurrect - Restart a finished run");
    println!("    • POST /actor-runs/{{id}}/metamorph - Transform into another actor");
    println!("    • POST /actor-runs/{{id}}/reboot - Restart the container");

    println!(
        "{}",
        summary(
            "Run Management Complete",
            &format!(
                "Run Management Complete!\n\n\
                 Run ID: {run_id}\n\
                 Status: {}\n\
                 Duration: {:.2}s\n\n\
                 Run Statuses:\n  \
                 • READY - Waiting to start\n  \
                 • RUNNING - Currently executing\n  \
                 • SUCCEEDED - Completed successfully\n  \
                 • FAILED - Error occurred\n  \
                 • ABORTED - Manually stopped\n  \
                 • TIMED-OUT - Exceeded timeout",
                final_run.status,
                final_run.stats.duration_millis as f64 / 1000.0
            ),
        )
    );
    Ok(())
}
