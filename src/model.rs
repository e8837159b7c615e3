//! Typed views of the Apify API resources the walkthroughs read.
//!
//! Only the fields the reports print are modelled; everything else in a response is
//! ignored. Actor output records stay `serde_json::Value` since every actor has its own
//! shape.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope around every JSON answer of the API.
#[derive(Debug, Deserialize)]
pub(crate) struct Data<T> {
    pub data: T,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub plan: Plan,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub description: Option<String>,
    #[serde(default)]
    pub monthly_usage_credits_usd: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: String,
    pub name: Option<String>,
    pub username: Option<String>,
    pub title: Option<String>,
}

/// Lifecycle state of an actor run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum RunStatus {
    Ready,
    Running,
    Succeeded,
    Failed,
    Aborting,
    Aborted,
    TimingOut,
    TimedOut,
    Unknown(String),
}

impl RunStatus {
    /// The run will not change state any more.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Succeeded | RunStatus::Failed | RunStatus::Aborted | RunStatus::TimedOut
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            RunStatus::Ready => "READY",
            RunStatus::Running => "RUNNING",
            RunStatus::Succeeded => "SUCCEEDED",
            RunStatus::Failed => "FAILED",
            RunStatus::Aborting => "ABORTING",
            RunStatus::Aborted => "ABORTED",
            RunStatus::TimingOut => "TIMING-OUT",
            RunStatus::TimedOut => "TIMED-OUT",
            RunStatus::Unknown(s) => s,
        }
    }
}

impl From<String> for RunStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "READY" => RunStatus::Ready,
            "RUNNING" => RunStatus::Running,
            "SUCCEEDED" => RunStatus::Succeeded,
            "FAILED" => RunStatus::Failed,
            "ABORTING" => RunStatus::Aborting,
            "ABORTED" => RunStatus::Aborted,
            "TIMING-OUT" => RunStatus::TimingOut,
            "TIMED-OUT" => RunStatus::TimedOut,
            _ => RunStatus::Unknown(value),
        }
    }
}

impl From<RunStatus> for String {
    fn from(value: RunStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    pub id: String,
    #[serde(default)]
    pub act_id: String,
    pub status: RunStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub default_dataset_id: Option<String>,
    pub default_key_value_store_id: Option<String>,
    #[serde(default)]
    pub stats: RunStats,
    #[serde(default)]
    pub options: RunOptions,
    #[serde(default)]
    pub usage: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    #[serde(default)]
    pub duration_millis: u64,
    #[serde(default)]
    pub run_time_secs: f64,
    #[serde(default)]
    pub input_body_len: u64,
    #[serde(default)]
    pub restart_count: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOptions {
    pub memory_mbytes: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub build: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub id: String,
    pub name: Option<String>,
    #[serde(default)]
    pub item_count: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub modified_at: Option<DateTime<Utc>>,
    pub accessed_at: Option<DateTime<Utc>>,
}

/// A page of dataset items, pagination comes from the `X-Apify-Pagination-*` headers.
#[derive(Debug, Clone, Default)]
pub struct ItemsPage {
    pub total: u64,
    pub count: u64,
    pub offset: u64,
    pub limit: u64,
    pub items: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValueStore {
    pub id: String,
    pub name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub modified_at: Option<DateTime<Utc>>,
    pub accessed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeyInfo {
    pub key: String,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyList {
    #[serde(default)]
    pub items: Vec<KeyInfo>,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub is_truncated: bool,
    pub next_exclusive_start_key: Option<String>,
}

/// Raw value of a key-value store entry.
#[derive(Debug, Clone)]
pub struct Record {
    pub key: String,
    pub value: Vec<u8>,
    pub content_type: String,
}

impl Record {
    pub fn json(&self) -> serde_json::Result<Value> {
        serde_json::from_slice(&self.value)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.value).into_owned()
    }

    pub fn is_json(&self) -> bool {
        self.content_type.starts_with("application/json")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: String,
    pub name: Option<String>,
    pub cron_expression: Option<String>,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub is_exclusive: bool,
    pub timezone: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub last_run_at: Option<DateTime<Utc>>,
    pub next_run_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub actions: Vec<Value>,
}

/// Body of `POST /schedules`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSchedule {
    pub name: String,
    pub cron_expression: String,
    pub is_enabled: bool,
    pub is_exclusive: bool,
    pub timezone: String,
    pub actions: Vec<ScheduleAction>,
}

/// Body of `PUT /schedules/{id}`, unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cron_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleAction {
    #[serde(rename_all = "camelCase")]
    RunActor {
        actor_id: String,
        run_input: Value,
        run_options: ScheduleRunOptions,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleRunOptions {
    pub memory: u32,
    pub timeout: u32,
}

/// Run lifecycle events a webhook can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum WebhookEventType {
    #[serde(rename = "ACTOR.RUN.CREATED")]
    RunCreated,
    #[serde(rename = "ACTOR.RUN.SUCCEEDED")]
    RunSucceeded,
    #[serde(rename = "ACTOR.RUN.FAILED")]
    RunFailed,
    #[serde(rename = "ACTOR.RUN.ABORTED")]
    RunAborted,
    #[serde(rename = "ACTOR.RUN.TIMED_OUT")]
    RunTimedOut,
}

impl WebhookEventType {
    pub const ALL: [WebhookEventType; 5] = [
        WebhookEventType::RunSucceeded,
        WebhookEventType::RunFailed,
        WebhookEventType::RunAborted,
        WebhookEventType::RunTimedOut,
        WebhookEventType::RunCreated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookEventType::RunCreated => "ACTOR.RUN.CREATED",
            WebhookEventType::RunSucceeded => "ACTOR.RUN.SUCCEEDED",
            WebhookEventType::RunFailed => "ACTOR.RUN.FAILED",
            WebhookEventType::RunAborted => "ACTOR.RUN.ABORTED",
            WebhookEventType::RunTimedOut => "ACTOR.RUN.TIMED_OUT",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WebhookEventType::RunCreated => "New actor run was started",
            WebhookEventType::RunSucceeded => "Actor run completed successfully",
            WebhookEventType::RunFailed => "Actor run failed",
            WebhookEventType::RunAborted => "Actor run was aborted",
            WebhookEventType::RunTimedOut => "Actor run exceeded timeout",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookCondition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    pub id: String,
    pub request_url: String,
    #[serde(default)]
    pub event_types: Vec<WebhookEventType>,
    #[serde(default)]
    pub condition: WebhookCondition,
    pub payload_template: Option<String>,
}

/// Body of `POST /webhooks`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWebhook {
    pub request_url: String,
    pub event_types: Vec<WebhookEventType>,
    pub condition: WebhookCondition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_template: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn run_status_parses_known_and_unknown() {
        let run: Run = serde_json::from_value(json!({
            "id": "r1",
            "actId": "a1",
            "status": "TIMED-OUT",
            "startedAt": "2024-05-01T10:00:00.000Z",
            "stats": { "durationMillis": 1500 },
            "usage": { "DATASET_WRITES": 3.0 }
        }))
        .unwrap();
        assert_eq!(run.status, RunStatus::TimedOut);
        assert!(run.status.is_terminal());
        assert_eq!(run.stats.duration_millis, 1500);
        assert_eq!(run.usage.get("DATASET_WRITES"), Some(&3.0));

        let status: RunStatus = serde_json::from_value(json!("PAUSED")).unwrap();
        assert_eq!(status, RunStatus::Unknown("PAUSED".into()));
        assert!(!status.is_terminal());
        assert!(!RunStatus::Running.is_terminal());
    }

    #[test]
    fn schedule_body_uses_api_field_names() {
        let body = NewSchedule {
            name: "demo".into(),
            cron_expression: "0 9 * * 1".into(),
            is_enabled: false,
            is_exclusive: false,
            timezone: "UTC".into(),
            actions: vec![ScheduleAction::RunActor {
                actor_id: "apify/hello-world".into(),
                run_input: json!({ "message": "hi" }),
                run_options: ScheduleRunOptions { memory: 256, timeout: 60 },
            }],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["cronExpression"], "0 9 * * 1");
        assert_eq!(value["isEnabled"], false);
        assert_eq!(value["actions"][0]["type"], "RUN_ACTOR");
        assert_eq!(value["actions"][0]["actorId"], "apify/hello-world");
        assert_eq!(value["actions"][0]["runOptions"]["memory"], 256);
    }

    #[test]
    fn schedule_patch_skips_unset_fields() {
        let patch = SchedulePatch {
            cron_expression: Some("0 9 * * 1-5".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({ "cronExpression": "0 9 * * 1-5" })
        );
    }

    #[test]
    fn webhook_events_serialize_with_dots() {
        let hook = NewWebhook {
            request_url: "https://example.com/hook".into(),
            event_types: vec![WebhookEventType::RunSucceeded, WebhookEventType::RunTimedOut],
            condition: WebhookCondition { actor_id: Some("abc".into()) },
            payload_template: None,
        };
        let value = serde_json::to_value(&hook).unwrap();
        assert_eq!(value["eventTypes"], json!(["ACTOR.RUN.SUCCEEDED", "ACTOR.RUN.TIMED_OUT"]));
        assert_eq!(value["condition"]["actorId"], "abc");
        assert!(value.get("payloadTemplate").is_none());
    }
}
