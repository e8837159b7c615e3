use reqwest::Method;

use super::ApifyClient;
use crate::model::{Page, Run};
use crate::Result;

impl ApifyClient {
    /// Most recent runs of the account, newest first when `desc` is set.
    pub async fn list_runs(&self, limit: u32, desc: bool) -> Result<Page<Run>> {
        let mut query = vec![("limit", limit.to_string())];
        if desc {
            query.push(("desc", "1".to_string()));
        }
        let req = self.request(Method::GET, &["actor-runs"])?.query(&query);
        Self::data(req).await
    }

    pub async fn get_run(&self, run_id: &str) -> Result<Run> {
        Self::data(self.request(Method::GET, &["actor-runs", run_id])?).await
    }

    /// Like [`get_run`](Self::get_run) but the server holds the answer for up to
    /// `wait_secs` seconds or until the run finishes.
    pub async fn wait_for_run(&self, run_id: &str, wait_secs: u64) -> Result<Run> {
        let req = self
            .request(Method::GET, &["actor-runs", run_id])?
            .query(&[("waitForFinish", wait_secs.to_string())]);
        Self::data(req).await
    }

    pub async fn abort_run(&self, run_id: &str) -> Result<Run> {
        Self::data(self.request(Method::POST, &["actor-runs", run_id, "abort"])?).await
    }

    /// Full plain-text log of the run.
    pub async fn run_log(&self, run_id: &str) -> Result<String> {
        let res = Self::send(self.request(Method::GET, &["actor-runs", run_id, "log"])?).await?;
        Ok(res.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::client::test_support::client_for;
    use crate::model::RunStatus;

    #[tokio::test]
    async fn list_runs_newest_first() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/actor-runs"))
            .and(query_param("limit", "10"))
            .and(query_param("desc", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {
                "total": 42, "count": 1, "offset": 0, "limit": 10,
                "items": [{ "id": "r1", "actId": "a1", "status": "FAILED",
                            "stats": { "durationMillis": 2500 } }]
            }})))
            .mount(&server)
            .await;

        let page = client_for(&server).list_runs(10, true).await.unwrap();
        assert_eq!(page.total, 42);
        assert_eq!(page.items[0].status, RunStatus::Failed);
    }

    #[tokio::test]
    async fn abort_and_log() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/actor-runs/r1/abort"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {
                "id": "r1", "actId": "a1", "status": "ABORTING"
            }})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/actor-runs/r1/log"))
            .respond_with(ResponseTemplate::new(200).set_body_string("INFO  Hello world!\n"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(client.abort_run("r1").await.unwrap().status, RunStatus::Aborting);
        assert_eq!(client.run_log("r1").await.unwrap(), "INFO  Hello world!\n");
    }
}
