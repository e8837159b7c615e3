use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::ApifyClient;
use crate::model::{Dataset, ItemsPage, Page};
use crate::Result;

/// Page size used by [`ApifyClient::iterate_items`].
const ITERATE_PAGE_SIZE: u64 = 1000;

/// Query of `GET /datasets/{id}/items`.
#[derive(Debug, Clone, Default)]
pub struct ListItemsOptions {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
    /// Only these fields of every item are returned.
    pub fields: Vec<String>,
}

impl ListItemsOptions {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(offset) = self.offset {
            query.push(("offset", offset.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if !self.fields.is_empty() {
            query.push(("fields", self.fields.join(",")));
        }
        query
    }
}

fn pagination_header(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

impl ApifyClient {
    pub async fn list_datasets(&self, limit: u32) -> Result<Page<Dataset>> {
        let req = self
            .request(Method::GET, &["datasets"])?
            .query(&[("limit", limit.to_string()), ("desc", "1".to_string())]);
        Self::data(req).await
    }

    /// Returns the named dataset of the account, creating it when missing.
    pub async fn get_or_create_dataset(&self, name: &str) -> Result<Dataset> {
        let req = self.request(Method::POST, &["datasets"])?.query(&[("name", name)]);
        Self::data(req).await
    }

    pub async fn get_dataset(&self, dataset_id: &str) -> Result<Dataset> {
        Self::data(self.request(Method::GET, &["datasets", dataset_id])?).await
    }

    pub async fn delete_dataset(&self, dataset_id: &str) -> Result<()> {
        Self::send(self.request(Method::DELETE, &["datasets", dataset_id])?).await?;
        Ok(())
    }

    /// One page of items; totals come from the pagination headers.
    pub async fn list_items(&self, dataset_id: &str, opts: &ListItemsOptions) -> Result<ItemsPage> {
        let (page, _) = self.fetch_items(dataset_id, opts).await?;
        Ok(page)
    }

    /// The page plus the total announced by the server, if it sent one.
    async fn fetch_items(
        &self,
        dataset_id: &str,
        opts: &ListItemsOptions,
    ) -> Result<(ItemsPage, Option<u64>)> {
        let req = self
            .request(Method::GET, &["datasets", dataset_id, "items"])?
            .query(&opts.query());
        let res = Self::send(req).await?;

        let headers = res.headers().clone();
        let items: Vec<Value> = serde_json::from_slice(&res.bytes().await?)?;
        let count = items.len() as u64;
        let total = pagination_header(&headers, "x-apify-pagination-total");

        let page = ItemsPage {
            total: total.unwrap_or(count),
            count,
            offset: pagination_header(&headers, "x-apify-pagination-offset")
                .or(opts.offset)
                .unwrap_or(0),
            limit: pagination_header(&headers, "x-apify-pagination-limit")
                .or(opts.limit)
                .unwrap_or(count),
            items,
        };
        Ok((page, total))
    }

    /// Every item of the dataset, fetched page by page.
    pub async fn iterate_items(&self, dataset_id: &str) -> Result<Vec<Value>> {
        let mut all = Vec::new();
        let mut offset = 0;
        loop {
            let opts = ListItemsOptions {
                offset: Some(offset),
                limit: Some(ITERATE_PAGE_SIZE),
                ..Default::default()
            };
            let (page, total) = self.fetch_items(dataset_id, &opts).await?;
            let fetched = page.items.len() as u64;
            all.extend(page.items);
            offset += fetched;

            if fetched < ITERATE_PAGE_SIZE || total.is_some_and(|t| offset >= t) {
                break;
            }
        }
        Ok(all)
    }

    /// Appends items to the end of the dataset.
    pub async fn push_items<T: Serialize>(&self, dataset_id: &str, items: &[T]) -> Result<()> {
        let req = self
            .request(Method::POST, &["datasets", dataset_id, "items"])?
            .json(items);
        Self::send(req).await?;
        Ok(())
    }
}
