use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::Value;

use super::ApifyClient;
use crate::model::{KeyList, KeyValueStore, Page, Record};
use crate::{Error, Result};

impl ApifyClient {
    pub async fn list_stores(&self, limit: u32) -> Result<Page<KeyValueStore>> {
        let req = self
            .request(Method::GET, &["key-value-stores"])?
            .query(&[("limit", limit.to_string()), ("desc", "1".to_string())]);
        Self::data(req).await
    }

    /// Returns the named store of the account, creating it when missing.
    pub async fn get_or_create_store(&self, name: &str) -> Result<KeyValueStore> {
        let req = self
            .request(Method::POST, &["key-value-stores"])?
            .query(&[("name", name)]);
        Self::data(req).await
    }

    pub async fn get_store(&self, store_id: &str) -> Result<KeyValueStore> {
        Self::data(self.request(Method::GET, &["key-value-stores", store_id])?).await
    }

    /// `None` when the key does not exist.
    pub async fn get_record(&self, store_id: &str, key: &str) -> Result<Option<Record>> {
        let req = self.request(Method::GET, &["key-value-stores", store_id, "records", key])?;
        let res = match Self::send(req).await {
            Ok(res) => res,
            Err(e) if e.is_status(StatusCode::NOT_FOUND) => return Ok(None),
            Err(e) => return Err(e),
        };

        let content_type = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let value = res.bytes().await?.to_vec();

        Ok(Some(Record {
            key: key.to_string(),
            value,
            content_type,
        }))
    }

    /// Stores raw bytes under `key`, replacing any previous value.
    pub async fn set_record(
        &self,
        store_id: &str,
        key: &str,
        value: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        let header = HeaderValue::from_str(content_type)
            .map_err(|_| Error::InvalidHeader(content_type.to_string()))?;
        let req = self
            .request(Method::PUT, &["key-value-stores", store_id, "records", key])?
            .header(CONTENT_TYPE, header)
            .body(value);
        Self::send(req).await?;
        Ok(())
    }

    pub async fn set_json_record(&self, store_id: &str, key: &str, value: &Value) -> Result<()> {
        let body = serde_json::to_vec(value)?;
        self.set_record(store_id, key, body, "application/json; charset=utf-8")
            .await
    }

    pub async fn delete_record(&self, store_id: &str, key: &str) -> Result<()> {
        let req = self.request(Method::DELETE, &["key-value-stores", store_id, "records", key])?;
        Self::send(req).await?;
        Ok(())
    }

    pub async fn list_keys(&self, store_id: &str) -> Result<KeyList> {
        Self::data(self.request(Method::GET, &["key-value-stores", store_id, "keys"])?).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::client::test_support::client_for;

    #[tokio::test]
    async fn missing_record_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/key-value-stores/kv1/records/status"))
            .respond_with(ResponseTemplate::new(404).set_body_string(
                r#"{"error":{"type":"record-not-found","message":"Record was not found"}}"#,
            ))
            .mount(&server)
            .await;

        assert!(client_for(&server).get_record("kv1", "status").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn text_record_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/key-value-stores/kv1/records/status"))
            .and(header("content-type", "text/plain"))
            .and(body_string("active"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/key-value-stores/kv1/records/status"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/plain")
                    .set_body_string("active"),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        client
            .set_record("kv1", "status", b"active".to_vec(), "text/plain")
            .await
            .unwrap();
        let record = client.get_record("kv1", "status").await.unwrap().unwrap();
        assert_eq!(record.text(), "active");
        assert!(!record.is_json());
    }

    #[tokio::test]
    async fn json_record_and_keys() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/key-value-stores/kv1/records/config"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"{"version":"1.0.0"}"#, "application/json; charset=utf-8"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/key-value-stores/kv1/keys"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {
                "items": [{ "key": "config", "size": 19 }, { "key": "state", "size": 90 }],
                "count": 2, "limit": 1000, "isTruncated": false
            }})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let record = client.get_record("kv1", "config").await.unwrap().unwrap();
        assert!(record.is_json());
        assert_eq!(record.json().unwrap()["version"], "1.0.0");

        let keys = client.list_keys("kv1").await.unwrap();
        assert_eq!(keys.items.len(), 2);
        assert_eq!(keys.items[1].size, 90);
        assert!(!keys.is_truncated);
    }

    #[tokio::test]
    async fn invalid_content_type_is_rejected_locally() {
        let server = MockServer::start().await;
        let res = client_for(&server)
            .set_record("kv1", "k", Vec::new(), "text/plain\n")
            .await;
        assert!(matches!(res, Err(crate::Error::InvalidHeader(_))));
    }
}
