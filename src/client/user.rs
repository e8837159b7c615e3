use reqwest::Method;

use super::ApifyClient;
use crate::model::User;
use crate::Result;

impl ApifyClient {
    /// Account the token belongs to.
    pub async fn me(&self) -> Result<User> {
        Self::data(self.request(Method::GET, &["users", "me"])?).await
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::client::test_support::client_for;

    #[tokio::test]
    async fn me_unwraps_data_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"data":{"id":"u1","username":"lab","email":"lab@example.com",
                    "profile":{"name":"Lab User"},
                    "plan":{"description":"Free","monthlyUsageCreditsUsd":5}}}"#,
            ))
            .mount(&server)
            .await;

        let user = client_for(&server).me().await.unwrap();
        assert_eq!(user.username.as_deref(), Some("lab"));
        assert_eq!(user.profile.name.as_deref(), Some("Lab User"));
        assert_eq!(user.plan.monthly_usage_credits_usd, 5.0);
    }
}
