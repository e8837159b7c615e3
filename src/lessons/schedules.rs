//! Schedules and webhooks: cron-driven runs and notifications about run events.

use serde_json::json;

use super::demo_name;
use crate::client::ApifyClient;
use crate::model::{
    NewSchedule, NewWebhook, Schedule, ScheduleAction, SchedulePatch, ScheduleRunOptions,
    Webhook, WebhookCondition, WebhookEventType,
};
use crate::render::{banner, check, cut, date, summary, timestamp, Column, Table};
use crate::{step, Result};

pub const ACTOR_ID: &str = "apify/hello-world";

const LIST_LIMIT: u32 = 10;
const TABLE_ROWS: usize = 5;

pub const CRON_EXAMPLES: [(&str, &str); 8] = [
    ("0 * * * *", "Every hour at minute 0"),
    ("0 9 * * *", "Every day at 9:00 AM"),
    ("0 9 * * 1-5", "Every weekday at 9:00 AM"),
    ("0 0 * * 0", "Every Sunday at midnight"),
    ("0 9,18 * * *", "Every day at 9 AM and 6 PM"),
    ("*/15 * * * *", "Every 15 minutes"),
    ("0 0 1 * *", "First day of every month"),
    ("0 0 * * 1", "Every Monday at midnight"),
];

pub const PAYLOAD_VARIABLES: [(&str, &str); 7] = [
    ("{{eventType}}", "Type of event (e.g., ACTOR.RUN.SUCCEEDED)"),
    ("{{eventData}}", "Full event data object"),
    ("{{resource}}", "The affected resource (run, etc.)"),
    ("{{actorId}}", "ID of the actor"),
    ("{{actorRunId}}", "ID of the actor run"),
    ("{{userId}}", "Your user ID"),
    ("{{createdAt}}", "Event timestamp"),
];

pub const PAYLOAD_TEMPLATE: &str = r#"{
    "event": {{eventType}},
    "actor": {{actorId}},
    "runId": {{actorRunId}},
    "status": {{resource.status}},
    "data": {{resource.defaultDatasetId}}
}"#;

const DEMO_CRON: &str = "0 9 * * 1";
const WEEKDAY_CRON: &str = "0 9 * * 1-5";

#[derive(Debug, Clone, clap::Args)]
pub struct SchedulesOptions {
    /// Also register a webhook posting run results to this URL
    #[arg(long)]
    pub webhook_url: Option<String>,
}

/// Disabled weekly schedule running the hello-world actor.
pub fn demo_schedule(name: &str) -> NewSchedule {
    NewSchedule {
        name: name.to_string(),
        cron_expression: DEMO_CRON.to_string(),
        is_enabled: false,
        is_exclusive: false,
        timezone: "UTC".to_string(),
        actions: vec![ScheduleAction::RunActor {
            actor_id: ACTOR_ID.to_string(),
            run_input: json!({ "message": "Scheduled run from Learning Lab" }),
            run_options: ScheduleRunOptions {
                memory: 256,
                timeout: 60,
            },
        }],
    }
}

pub fn demo_webhook(request_url: &str, actor_id: &str) -> NewWebhook {
    NewWebhook {
        request_url: request_url.to_string(),
        event_types: vec![WebhookEventType::RunSucceeded, WebhookEventType::RunFailed],
        condition: WebhookCondition {
            actor_id: Some(actor_id.to_string()),
        },
        payload_template: Some(PAYLOAD_TEMPLATE.to_string()),
    }
}

pub fn schedules_table(schedules: &[Schedule]) -> Table {
    let mut table = Table::with_title("Existing Schedules")
        .column(Column::new("Name").max_width(25))
        .column(Column::new("Cron"))
        .column(Column::new("Enabled").center())
        .column(Column::new("Last Run"));
    for s in schedules.iter().take(TABLE_ROWS) {
        let last_run = match s.last_run_at {
            Some(_) => date(s.last_run_at),
            None => "Never".to_string(),
        };
        table.add_row([
            cut(s.name.as_deref().unwrap_or("Unnamed"), 22),
            s.cron_expression.clone().unwrap_or_else(|| "N/A".into()),
            check(s.is_enabled).to_string(),
            last_run,
        ]);
    }
    table
}

fn pairs_table(headers: (&str, &str), rows: &[(&str, &str)]) -> Table {
    let mut table = Table::new()
        .column(Column::new(headers.0))
        .column(Column::new(headers.1));
    for (a, b) in rows {
        table.add_row([*a, *b]);
    }
    table
}

pub fn cron_table() -> Table {
    pairs_table(("Cron Expression", "Description"), &CRON_EXAMPLES)
}

pub fn events_table() -> Table {
    let rows: Vec<(&str, &str)> = WebhookEventType::ALL
        .iter()
        .map(|e| (e.as_str(), e.description()))
        .collect();
    pairs_table(("Event", "Description"), &rows)
}

pub fn variables_table() -> Table {
    pairs_table(("Variable", "Description"), &PAYLOAD_VARIABLES)
}

pub fn webhooks_table(webhooks: &[Webhook]) -> Table {
    let mut table = Table::with_title("Existing Webhooks")
        .column(Column::new("Request URL").max_width(40))
        .column(Column::new("Events"))
        .column(Column::new("Actor"));
    for w in webhooks.iter().take(TABLE_ROWS) {
        let events: Vec<&str> = w.event_types.iter().map(WebhookEventType::as_str).collect();
        table.add_row([
            w.request_url.clone(),
            events.join(", "),
            w.condition.actor_id.clone().unwrap_or_else(|| "any".into()),
        ]);
    }
    table
}

pub fn schedule_details(info: &Schedule) -> String {
    let mut out = String::new();
    out.push_str("\n  Schedule Details:\n");
    out.push_str(&format!("    Name: {}\n", info.name.as_deref().unwrap_or("N/A")));
    out.push_str(&format!(
        "    Cron: {}\n",
        info.cron_expression.as_deref().unwrap_or("N/A")
    ));
    out.push_str(&format!("    Enabled: {}\n", info.is_enabled));
    out.push_str(&format!(
        "    Timezone: {}\n",
        info.timezone.as_deref().unwrap_or("UTC")
    ));
    out.push_str(&format!("    Created: {}\n", date(info.created_at)));
    if info.next_run_at.is_some() {
        out.push_str(&format!("    Next Run: {}\n", timestamp(info.next_run_at)));
    }
    out
}

async fn create_webhook(client: &ApifyClient, url: &str) -> Result<Webhook> {
    let actor = client.get_actor(ACTOR_ID).await?;
    client.create_webhook(&demo_webhook(url, &actor.id)).await
}

pub async fn run(client: &ApifyClient, opts: &SchedulesOptions) -> Result<()> {
    println!("{}", banner("12 - Scheduled Tasks & Webhooks"));

    step!(1, "List Existing Schedules");
    let existing = client.list_schedules(LIST_LIMIT).await?;
    println!("  Found {} schedules in your account", existing.total);
    if existing.items.is_empty() {
        println!("  No schedules found");
    } else {
        println!("{}", schedules_table(&existing.items));
    }

    step!(2, "Understanding Cron Expressions");
    println!("\n  Cron format: minute hour day-of-month month day-of-week");
    println!("\n  Examples:");
    println!("{}", cron_table());

    step!(3, "Create a Schedule (Demo)");
    let schedule_name = demo_name("learning-lab-demo");
    println!("\n  Schedule Configuration:");
    println!("    Name: {schedule_name}");
    println!("    Cron: {DEMO_CRON} (Every Monday at 9 AM)");
    println!("    Actor: {ACTOR_ID}");
    println!("    Enabled: No (disabled for demo)");
    println!("\n  Creating schedule...");
    let schedule_id = match client.create_schedule(&demo_schedule(&schedule_name)).await {
        Ok(schedule) => {
            println!("  ✓ Schedule created!");
            println!("    ID: {}", schedule.id);
            Some(schedule.id)
        }
        Err(e) => {
            println!("  Note: Could not create schedule: {e}");
            None
        }
    };

    step!(4, "Schedule Operations");
    if let Some(id) = &schedule_id {
        let patch = SchedulePatch {
            cron_expression: Some(WEEKDAY_CRON.to_string()),
            description: Some("Weekday runs from the Learning Lab".to_string()),
            ..Default::default()
        };
        match client.update_schedule(id, &patch).await {
            Ok(_) => println!("  ✓ Updated cron to {WEEKDAY_CRON} (Every weekday at 9 AM)"),
            Err(e) => println!("  Note: Could not update schedule: {e}"),
        }

        match client.get_schedule(id).await {
            Ok(info) => print!("{}", schedule_details(&info)),
            Err(e) => println!("  Note: Could not fetch schedule: {e}"),
        }
    } else {
        println!("  Skipped, no demo schedule was created");
    }

    step!(5, "Understanding Webhooks");
    println!("\n  Webhooks notify external services when events occur.");
    match client.list_webhooks(LIST_LIMIT).await {
        Ok(page) if page.items.is_empty() => println!("  No webhooks in your account yet"),
        Ok(page) => println!("{}", webhooks_table(&page.items)),
        Err(e) => println!("  Note: Couldn't list webhooks: {e}"),
    }
    println!("\n  Supported Events:");
    println!("{}", events_table());

    step!(6, "Create a Webhook");
    match &opts.webhook_url {
        Some(url) => match create_webhook(client, url).await {
            Ok(webhook) => {
                println!("  ✓ Webhook created!");
                println!("    ID: {}", webhook.id);
                println!("    URL: {}", webhook.request_url);
            }
            Err(e) => println!("  Note: Could not create webhook: {e}"),
        },
        None => {
            println!("\n  Example Webhook Configuration:");
            println!("    URL: https://webhook.site/your-unique-url");
            println!("    Events: ACTOR.RUN.SUCCEEDED, ACTOR.RUN.FAILED");
            println!("    Payload Template:\n{PAYLOAD_TEMPLATE}");
            println!("\n  Pass --webhook-url <URL> to create it for real.");
        }
    }

    step!(7, "Webhook Payload Variables");
    println!("\n  Available template variables:");
    println!("{}", variables_table());

    step!(8, "Clean Up");
    if let Some(id) = &schedule_id {
        println!("\n  Demo schedule: {schedule_name}");
        println!("  Deleting demo schedule...");
        match client.delete_schedule(id).await {
            Ok(()) => println!("  ✓ Demo schedule deleted"),
            Err(e) => println!("  Could not delete: {e}"),
        }
    }

    println!(
        "{}",
        summary(
            "Scheduling Complete",
            "Scheduling & Webhooks Complete!\n\n\
             Schedules:\n  \
             • Create recurring runs with cron expressions\n  \
             • Run any actor or task on a schedule\n  \
             • Enable/disable without deleting\n\n\
             Webhooks:\n  \
             • Get notified on run completion\n  \
             • Trigger external workflows\n  \
             • Custom payload templates\n  \
             • Filter by actor/task",
        )
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::client::test_support::client_for;

    async fn server_with_no_schedules() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/schedules"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": { "total": 0, "items": [] } })),
            )
            .mount(&server)
            .await;
        server
    }

    fn no_webhook() -> SchedulesOptions {
        SchedulesOptions { webhook_url: None }
    }

    #[test]
    fn demo_schedule_body() {
        let body = serde_json::to_value(demo_schedule("learning-lab-demo-x")).unwrap();
        assert_eq!(body["cronExpression"], "0 9 * * 1");
        assert_eq!(body["isEnabled"], false);
        assert_eq!(body["isExclusive"], false);
        assert_eq!(
            body["actions"][0],
            json!({
                "type": "RUN_ACTOR",
                "actorId": "apify/hello-world",
                "runInput": { "message": "Scheduled run from Learning Lab" },
                "runOptions": { "memory": 256, "timeout": 60 }
            })
        );
    }

    #[test]
    fn demo_webhook_body() {
        let body = serde_json::to_value(demo_webhook("https://example.com/hook", "E2jjCZ")).unwrap();
        assert_eq!(body["requestUrl"], "https://example.com/hook");
        assert_eq!(body["eventTypes"], json!(["ACTOR.RUN.SUCCEEDED", "ACTOR.RUN.FAILED"]));
        assert_eq!(body["condition"], json!({ "actorId": "E2jjCZ" }));
        assert!(body["payloadTemplate"].as_str().unwrap().contains("{{eventType}}"));
    }

    #[test]
    fn reference_tables() {
        assert_eq!(cron_table().len(), 8);
        assert_eq!(events_table().len(), 5);
        assert!(events_table().to_string().contains("ACTOR.RUN.TIMED_OUT"));
        assert!(variables_table().to_string().contains("{{actorRunId}}"));
    }

    #[test]
    fn schedules_without_runs() {
        let schedule: Schedule = serde_json::from_value(json!({
            "id": "s1",
            "name": "nightly",
            "cronExpression": "0 0 * * *",
            "isEnabled": true
        }))
        .unwrap();
        let out = schedules_table(std::slice::from_ref(&schedule)).to_string();
        assert!(out.contains("Never"));
        assert!(out.contains("✓"));

        let details = schedule_details(&schedule);
        assert!(details.contains("Timezone: UTC"));
        assert!(details.contains("Created: N/A"));
        assert!(!details.contains("Next Run"));
    }

    #[tokio::test]
    async fn failed_update_still_deletes_the_schedule() {
        let server = server_with_no_schedules().await;
        Mock::given(method("POST"))
            .and(path("/schedules"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "data": { "id": "s1" } })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/schedules/s1"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/schedules/s1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        run(&client_for(&server), &no_webhook()).await.unwrap();
    }

    #[tokio::test]
    async fn failed_create_skips_update_and_delete() {
        let server = server_with_no_schedules().await;
        Mock::given(method("POST"))
            .and(path("/schedules"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        run(&client_for(&server), &no_webhook()).await.unwrap();
    }
}
