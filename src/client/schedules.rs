use reqwest::Method;

use super::ApifyClient;
use crate::model::{NewSchedule, Page, Schedule, SchedulePatch};
use crate::Result;

impl ApifyClient {
    pub async fn list_schedules(&self, limit: u32) -> Result<Page<Schedule>> {
        let req = self
            .request(Method::GET, &["schedules"])?
            .query(&[("limit", limit.to_string())]);
        Self::data(req).await
    }

    pub async fn create_schedule(&self, schedule: &NewSchedule) -> Result<Schedule> {
        Self::data(self.request(Method::POST, &["schedules"])?.json(schedule)).await
    }

    pub async fn get_schedule(&self, schedule_id: &str) -> Result<Schedule> {
        Self::data(self.request(Method::GET, &["schedules", schedule_id])?).await
    }

    pub async fn update_schedule(&self, schedule_id: &str, patch: &SchedulePatch) -> Result<Schedule> {
        let req = self
            .request(Method::PUT, &["schedules", schedule_id])?
            .json(patch);
        Self::data(req).await
    }

    pub async fn delete_schedule(&self, schedule_id: &str) -> Result<()> {
        Self::send(self.request(Method::DELETE, &["schedules", schedule_id])?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::client::test_support::client_for;
    use crate::model::SchedulePatch;

    #[tokio::test]
    async fn update_then_delete() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/schedules/s1"))
            .and(body_partial_json(json!({ "cronExpression": "0 9 * * 1-5" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {
                "id": "s1", "name": "demo", "cronExpression": "0 9 * * 1-5",
                "isEnabled": false, "timezone": "UTC"
            }})))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/schedules/s1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let patch = SchedulePatch {
            cron_expression: Some("0 9 * * 1-5".into()),
            ..Default::default()
        };
        let schedule = client.update_schedule("s1", &patch).await.unwrap();
        assert_eq!(schedule.cron_expression.as_deref(), Some("0 9 * * 1-5"));
        assert!(!schedule.is_enabled);
        client.delete_schedule("s1").await.unwrap();
    }
}
