//! One module per walkthrough, plus the steps the actor walkthroughs share.

pub mod amazon;
pub mod crawler;
pub mod datasets;
pub mod google_maps;
pub mod hello;
pub mod instagram;
pub mod kv_store;
pub mod runs;
pub mod schedules;
pub mod tiktok;
pub mod twitter;
pub mod web_scraper;

use chrono::Local;
use serde_json::Value;

use crate::client::ApifyClient;
use crate::model::{Run, RunStatus};
use crate::{info_time, Result};

/// A finished actor run together with its default dataset.
pub struct ActorOutput {
    pub run: Run,
    pub dataset_id: String,
    pub items: Vec<Value>,
}

/// Name of a storage created by a walkthrough, e.g. `learning-lab-demo-20240501-101500`.
pub fn demo_name(prefix: &str) -> String {
    format!("{prefix}-{}", Local::now().format("%Y%m%d-%H%M%S"))
}

fn print_config(heading: &str, rows: &[(&str, String)]) {
    println!("\n{heading}:");
    for (key, value) in rows {
        println!("  {key}: {value}");
    }
}

/// Calls the actor, waits for it and fetches the whole default dataset.
///
/// A failed call is fatal for every actor walkthrough, so the error is reported and
/// returned.
async fn run_actor(
    client: &ApifyClient,
    actor_id: &str,
    input: &Value,
    expected: &str,
) -> Result<ActorOutput> {
    println!("\nRunning the actor...");
    println!("  This may take {expected}\n");

    let start_time = Local::now();
    let run = match client.call(actor_id, input).await {
        Ok(run) => run,
        Err(e) => {
            println!("  ✗ Error: {e}");
            return Err(e);
        }
    };
    if run.status == RunStatus::Succeeded {
        info_time!(start_time, "✓ Actor run completed!");
    } else {
        info_time!(start_time, "Actor run finished with status {}", run.status);
    }

    println!("\nResults:");
    let dataset_id = run.default_dataset_id.clone().unwrap_or_default();
    println!("  Dataset ID: {dataset_id}");

    let items = if dataset_id.is_empty() {
        Vec::new()
    } else {
        client.iterate_items(&dataset_id).await?
    };

    Ok(ActorOutput {
        run,
        dataset_id,
        items,
    })
}
