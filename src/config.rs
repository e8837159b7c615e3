use secrecy::{ExposeSecret, Secret};

use crate::{Error, Result, DEFAULT_BASE_URL, TOKEN_ENV_VAR};

/// Connection settings shared by every walkthrough.
pub struct Config {
    token: Secret<String>,
    pub base_url: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Config {
    /// Fails with [`Error::MissingToken`] when the token is absent or blank.
    pub fn new(token: Option<String>, base_url: Option<String>) -> Result<Self> {
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(Error::MissingToken { var: TOKEN_ENV_VAR })?;

        let base_url = base_url
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Config {
            token: Secret::new(token),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub(crate) fn token(&self) -> &str {
        self.token.expose_secret()
    }

    /// `first 20 chars...last 4 chars`, or all stars for short tokens.
    pub fn masked_token(&self) -> String {
        let chars: Vec<char> = self.token().chars().collect();
        if chars.len() <= 24 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..20].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_token_is_rejected() {
        let err = Config::new(None, None).unwrap_err();
        assert!(matches!(err, Error::MissingToken { var } if var == TOKEN_ENV_VAR));
    }

    #[test]
    fn blank_token_is_rejected() {
        assert!(Config::new(Some("   ".into()), None).is_err());
    }

    #[test]
    fn default_and_custom_base_url() {
        let config = Config::new(Some("tok".into()), None).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);

        let config = Config::new(Some("tok".into()), Some("http://127.0.0.1:9000/".into())).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn token_is_masked() {
        let config = Config::new(Some("apify_api_abcdefghij1234567890WXYZ".into()), None).unwrap();
        assert_eq!(config.masked_token(), "apify_api_abcdefghij...WXYZ");

        let config = Config::new(Some("short".into()), None).unwrap();
        assert_eq!(config.masked_token(), "*****");
        assert!(!format!("{config:?}").contains("short"));
    }
}
