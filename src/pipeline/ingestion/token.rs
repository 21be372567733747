use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::constants::{ENDPOINT_AUTH, TOKEN_REFRESH_BUFFER_SECS};
use crate::error::{MentionError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(TOKEN_REFRESH_BUFFER_SECS) < self.expires_at
    }
}

/// Exchanges the API key for a bearer token and refreshes it shortly before
/// it expires.
#[derive(Debug)]
pub struct TokenManager {
    base_url: String,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenManager {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            cached: Mutex::new(None),
        }
    }

    /// A valid bearer token, fetching a new one when needed.
    pub async fn bearer(&self, http: &reqwest::Client, api_key: &str) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(Utc::now())) {
            return Ok(token.token.clone());
        }

        debug!("Refreshing API token");
        let fresh = self.refresh(http, api_key).await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }

    async fn refresh(&self, http: &reqwest::Client, api_key: &str) -> Result<CachedToken> {
        let url = format!("{}{}/token", self.base_url, ENDPOINT_AUTH);
        let response = http
            .post(&url)
            .json(&json!({ "apiKey": api_key }))
            .send()
            .await
            .map_err(|e| MentionError::Auth(format!("Failed to refresh token: {e}")))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MentionError::Auth(format!("Failed to refresh token: {body}")));
        }

        let data: TokenResponse = response
            .json()
            .await
            .map_err(|e| MentionError::Auth(format!("Invalid token response: {e}")))?;
        info!("Obtained API token valid for {}s", data.expires_in);
        Ok(CachedToken {
            token: data.token,
            expires_at: Utc::now() + Duration::seconds(data.expires_in),
        })
    }
}
