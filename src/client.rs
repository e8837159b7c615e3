//! Async client for the Apify REST API (v2).
//!
//! Resource operations live in the submodules as `impl ApifyClient` blocks; this file
//! holds the shared request plumbing: URL building, bearer auth, the `{"data": ...}`
//! envelope and API error decoding.

mod actors;
mod datasets;
mod key_value_stores;
mod runs;
mod schedules;
mod user;
mod webhooks;

pub use datasets::ListItemsOptions;

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::Config;
use crate::model::Data;
use crate::{Error, Result};

/// Handle to the Apify API. Cheap to clone, the inner `reqwest::Client` uses an `Arc`.
#[derive(Clone)]
pub struct ApifyClient {
    http: Client,
    base_url: Url,
    token: Secret<String>,
}

impl std::fmt::Debug for ApifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApifyClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(rename = "type")]
    kind: Option<String>,
    message: Option<String>,
}

impl ApifyClient {
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| Error::InvalidBaseUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(config.base_url.clone()));
        }

        let http = Client::builder()
            .user_agent(concat!("apify-lab/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(ApifyClient {
            http,
            base_url,
            token: Secret::new(config.token().to_string()),
        })
    }

    /// Appends percent-encoded path segments to the base URL.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.url(segments)?;
        Ok(self
            .http
            .request(method, url)
            .bearer_auth(self.token.expose_secret()))
    }

    /// Sends the request and turns a non-2xx answer into [`Error::Api`].
    async fn send(builder: RequestBuilder) -> Result<Response> {
        let res = builder.send().await?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let body = res.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(ApiErrorBody { error }) => match (error.kind, error.message) {
                (Some(kind), Some(msg)) => format!("{msg} ({kind})"),
                (None, Some(msg)) => msg,
                (Some(kind), None) => kind,
                (None, None) => body,
            },
            Err(_) if body.is_empty() => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
            Err(_) => body,
        };
        Err(Error::Api { status, message })
    }

    /// Sends the request and unwraps the `data` field of the JSON answer.
    async fn data<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T> {
        let res = Self::send(builder).await?;
        let bytes = res.bytes().await?;
        let Data { data } = serde_json::from_slice(&bytes)?;
        Ok(data)
    }
}

/// `user/actor-name` is addressed as `user~actor-name` in API paths.
fn actor_path_id(actor_id: &str) -> String {
    actor_id.replace('/', "~")
}

#[cfg(test)]
pub(crate) mod test_support {
    use wiremock::MockServer;

    use super::ApifyClient;
    use crate::config::Config;

    pub const TOKEN: &str = "test-token";

    pub fn client_for(server: &MockServer) -> ApifyClient {
        let config = Config::new(Some(TOKEN.into()), Some(server.uri())).unwrap();
        ApifyClient::new(&config).unwrap()
    }
}
