//! Key-value store operations: records of different content types, key listing,
//! updates and deletes.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::demo_name;
use crate::client::ApifyClient;
use crate::model::{KeyInfo, KeyValueStore, Record};
use crate::render::{banner, cut, date, short_id, summary, timestamp, Column, Panel, Table};
use crate::{step, Result, CONSOLE_URL};

const LIST_LIMIT: u32 = 5;

/// Progress of a scraping job, persisted between runs under the `state` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunState {
    pub last_run_at: DateTime<Local>,
    pub items_processed: u32,
    #[serde(default)]
    pub errors: Vec<String>,
    pub current_page: u32,
    pub total_pages: u32,
}

pub fn sample_config() -> Value {
    json!({
        "version": "1.0.0",
        "environment": "development",
        "features": {
            "darkMode": true,
            "notifications": true,
            "autoSave": false
        },
        "limits": {
            "maxItems": 1000,
            "timeout": 30
        }
    })
}

pub fn pending_urls() -> Value {
    json!([
        "https://example.com/page1",
        "https://example.com/page2",
        "https://example.com/page3",
    ])
}

pub fn sample_metadata() -> Value {
    json!({
        "createdBy": "learning-lab",
        "purpose": "demonstration",
        "tags": ["demo", "tutorial", "rust"]
    })
}

pub fn stores_table(stores: &[KeyValueStore]) -> Table {
    let mut table = Table::with_title("Recent Key-Value Stores")
        .column(Column::new("Name"))
        .column(Column::new("ID"))
        .column(Column::new("Modified"));
    for store in stores.iter().take(LIST_LIMIT as usize) {
        let name = store.name.as_deref().filter(|n| !n.is_empty()).unwrap_or("[unnamed]");
        table.add_row([cut(name, 25), short_id(&store.id), date(store.modified_at)]);
    }
    table
}

pub fn keys_table(keys: &[KeyInfo]) -> Table {
    let mut table = Table::with_title("Stored Keys")
        .column(Column::new("Key"))
        .column(Column::new("Size").right());
    for k in keys {
        table.add_row([k.key.clone(), format!("{} bytes", k.size)]);
    }
    table
}

/// Renders a record the way its content type suggests: JSON pretty-printed, anything
/// else as text.
pub fn record_preview(record: &Record) -> String {
    if record.is_json() {
        if let Ok(value) = record.json() {
            if let Ok(pretty) = serde_json::to_string_pretty(&value) {
                return pretty;
            }
        }
    }
    record.text()
}

pub fn store_info(info: &KeyValueStore) -> String {
    format!(
        "  Name: {}\n  ID: {}\n  Created: {}\n  Modified: {}\n  Accessed: {}\n",
        info.name.as_deref().unwrap_or("N/A"),
        info.id,
        timestamp(info.created_at),
        timestamp(info.modified_at),
        timestamp(info.accessed_at),
    )
}

async fn set_state(client: &ApifyClient, store_id: &str, state: &RunState) -> Result<()> {
    client
        .set_json_record(store_id, "state", &serde_json::to_value(state)?)
        .await
}

pub async fn run(client: &ApifyClient) -> Result<()> {
    println!("{}", banner("10 - Key-Value Store Operations"));

    step!(1, "List Existing Key-Value Stores");
    let existing = client.list_stores(LIST_LIMIT).await?;
    println!("  Found {} stores in your account", existing.total);
    if !existing.items.is_empty() {
        println!("{}", stores_table(&existing.items));
    }

    step!(2, "Create a New Key-Value Store");
    let store_name = demo_name("learning-lab-kvs");
    let store_id = client.get_or_create_store(&store_name).await?.id;
    println!("  ✓ Created store: {store_name}");
    println!("    ID: {store_id}");

    step!(3, "Store Different Value Types");
    println!("\n  3.1: JSON Object");
    client.set_json_record(&store_id, "config", &sample_config()).await?;
    println!("    ✓ Stored 'config' (JSON object)");

    println!("\n  3.2: Simple String");
    client
        .set_record(&store_id, "status", b"active".to_vec(), "text/plain")
        .await?;
    println!("    ✓ Stored 'status' (text/plain)");

    println!("\n  3.3: Array/List");
    client.set_json_record(&store_id, "pending_urls", &pending_urls()).await?;
    println!("    ✓ Stored 'pending_urls' (JSON array)");

    println!("\n  3.4: State Object");
    let state = RunState {
        last_run_at: Local::now(),
        items_processed: 150,
        errors: Vec::new(),
        current_page: 5,
        total_pages: 10,
    };
    set_state(client, &store_id, &state).await?;
    println!("    ✓ Stored 'state' (run state)");

    println!("\n  3.5: Metadata Object");
    client.set_json_record(&store_id, "metadata", &sample_metadata()).await?;
    println!("    ✓ Stored 'metadata'");

    step!(4, "Retrieve Values");
    println!("\n  Retrieving 'config':");
    if let Some(record) = client.get_record(&store_id, "config").await? {
        println!("{}", Panel::new(record_preview(&record)).title("config").width(50));
    }

    println!("\n  Retrieving 'status':");
    if let Some(record) = client.get_record(&store_id, "status").await? {
        println!("    Value: {}", record.text());
    }

    println!("\n  Retrieving 'pending_urls':");
    if let Some(record) = client.get_record(&store_id, "pending_urls").await? {
        let urls: Vec<String> = serde_json::from_slice(&record.value)?;
        for url in urls {
            println!("    • {url}");
        }
    }

    step!(5, "List All Keys in Store");
    let keys = client.list_keys(&store_id).await?;
    println!("{}", keys_table(&keys.items));

    step!(6, "Update a Value");
    let updated = RunState {
        last_run_at: Local::now(),
        items_processed: 200,
        current_page: 10,
        ..state
    };
    set_state(client, &store_id, &updated).await?;
    println!("  ✓ Updated 'state' record");
    if let Some(record) = client.get_record(&store_id, "state").await? {
        let stored: RunState = serde_json::from_slice(&record.value)?;
        println!("    Items processed: {}", stored.items_processed);
        println!("    Current page: {}", stored.current_page);
    }

    step!(7, "Delete a Key");
    client.delete_record(&store_id, "status").await?;
    println!("  ✓ Deleted 'status' record");
    let verification = match client.get_record(&store_id, "status").await? {
        None => "Not found (deleted)",
        Some(_) => "Still exists",
    };
    println!("    Verification: {verification}");

    step!(8, "Store Information");
    let info = client.get_store(&store_id).await?;
    print!("{}", store_info(&info));

    step!(9, "Clean Up");
    println!("  Store: {store_name}");
    println!("  Keeping store for your reference.");
    println!("  View at: {CONSOLE_URL}/storage/key-value-stores/{store_id}");

    println!(
        "{}",
        summary(
            "Key-Value Store Complete",
            &format!(
                "Key-Value Store Operations Complete!\n\n\
                 Store: {store_name}\n\
                 ID: {store_id}\n\n\
                 Common Use Cases:\n  \
                 • Store run configuration\n  \
                 • Persist state between runs\n  \
                 • Cache expensive computations\n  \
                 • Store files (images, CSVs)\n  \
                 • Share data between actors"
            ),
        )
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_uses_camel_case_keys() {
        let state = RunState {
            last_run_at: Local::now(),
            items_processed: 150,
            errors: Vec::new(),
            current_page: 5,
            total_pages: 10,
        };
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["itemsProcessed"], 150);
        assert_eq!(value["currentPage"], 5);
        assert_eq!(value["errors"], json!([]));
        assert!(value["lastRunAt"].is_string());

        let back: RunState = serde_json::from_value(value).unwrap();
        assert_eq!(back.total_pages, 10);
    }

    #[test]
    fn previews_by_content_type() {
        let json_record = Record {
            key: "config".into(),
            value: br#"{"version":"1.0.0"}"#.to_vec(),
            content_type: "application/json; charset=utf-8".into(),
        };
        assert_eq!(record_preview(&json_record), "{\n  \"version\": \"1.0.0\"\n}");

        let text_record = Record {
            key: "status".into(),
            value: b"active".to_vec(),
            content_type: "text/plain".into(),
        };
        assert_eq!(record_preview(&text_record), "active");
    }

    #[test]
    fn keys_table_lists_sizes() {
        let keys = vec![
            KeyInfo { key: "config".into(), size: 164 },
            KeyInfo { key: "state".into(), size: 98 },
        ];
        let out = keys_table(&keys).to_string();
        assert!(out.contains("164 bytes"));
        assert!(out.contains("│ state "));
        assert!(keys_table(&[]).is_empty());
    }
}
