use reqwest::Method;

use super::ApifyClient;
use crate::model::{NewWebhook, Page, Webhook};
use crate::Result;

impl ApifyClient {
    pub async fn list_webhooks(&self, limit: u32) -> Result<Page<Webhook>> {
        let req = self
            .request(Method::GET, &["webhooks"])?
            .query(&[("limit", limit.to_string())]);
        Self::data(req).await
    }

    pub async fn create_webhook(&self, webhook: &NewWebhook) -> Result<Webhook> {
        Self::data(self.request(Method::POST, &["webhooks"])?.json(webhook)).await
    }
}
