use reqwest::Method;
use serde_json::Value;

use super::{actor_path_id, ApifyClient};
use crate::model::{Actor, Page, Run};
use crate::{info_time, Result};

/// Longest server-side wait the API accepts for `waitForFinish`.
pub(crate) const MAX_WAIT_FOR_FINISH_SECS: u64 = 60;

impl ApifyClient {
    /// Actors owned by or used by the account.
    pub async fn list_actors(&self, limit: u32) -> Result<Page<Actor>> {
        let req = self
            .request(Method::GET, &["acts"])?
            .query(&[("limit", limit.to_string())]);
        Self::data(req).await
    }

    pub async fn get_actor(&self, actor_id: &str) -> Result<Actor> {
        let id = actor_path_id(actor_id);
        Self::data(self.request(Method::GET, &["acts", &id])?).await
    }

    /// Starts a run and returns immediately with its initial state.
    pub async fn start(&self, actor_id: &str, input: &Value) -> Result<Run> {
        let id = actor_path_id(actor_id);
        let req = self.request(Method::POST, &["acts", &id, "runs"])?.json(input);
        Self::data(req).await
    }

    /// Starts a run and waits until it reaches a terminal status.
    pub async fn call(&self, actor_id: &str, input: &Value) -> Result<Run> {
        let start_time = chrono::Local::now();
        let mut run = self.start(actor_id, input).await?;
        info_time!("Started run {} of {actor_id}", run.id);

        while !run.status.is_terminal() {
            run = self.wait_for_run(&run.id, MAX_WAIT_FOR_FINISH_SECS).await?;
            info_time!(start_time, "Run {} is {}", run.id, run.status);
        }
        Ok(run)
    }
}
