use chrono::NaiveDate;
use reqwest::Method;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use super::rate_limiter::{Limits, RateLimiter};
use super::token::TokenManager;
use crate::config::ApiConfig;
use crate::constants::{ENDPOINT_MENTIONS, RETRY_BACKOFF_FACTOR_SECS, RETRY_STATUSES};
use crate::error::{MentionError, Result, ValidationError};
use crate::pipeline::processing::RawMention;

/// Parameters for fetching mentions.
#[derive(Debug, Clone)]
pub struct MentionQuery {
    /// `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// `YYYY-MM-DD`
    pub end_date: Option<String>,
    pub limit: u32,
}

impl Default for MentionQuery {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            limit: 100,
        }
    }
}

fn is_valid_date(date: &str) -> bool {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}

fn invalid(message: &str) -> MentionError {
    ValidationError::InvalidParameter(message.to_string()).into()
}

/// Client for the MentionMind API: bearer-token auth, client-side rate
/// limiting and retry with exponential backoff.
pub struct MentionMindClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    max_retries: u32,
    tokens: TokenManager,
    limiter: RateLimiter,
}

impl MentionMindClient {
    pub fn new(api_key: impl Into<String>, config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(Self {
            http,
            api_key: api_key.into(),
            tokens: TokenManager::new(base_url.clone()),
            base_url,
            max_retries: config.max_retries,
            limiter: RateLimiter::new(Limits::new(config.rate_limit_calls, config.rate_limit_period_seconds)),
        })
    }

    fn backoff(attempt: u32) -> Duration {
        Duration::from_secs_f64(RETRY_BACKOFF_FACTOR_SECS * 2f64.powi(attempt as i32))
    }

    /// Send one API request, retrying transient failures. Successful empty
    /// bodies come back as `{}` and non-object bodies as `{"data": ...}`.
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Map<String, Value>> {
        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        let mut attempt = 0;

        loop {
            self.limiter.acquire().await;
            let token = self.tokens.bearer(&self.http, &self.api_key).await?;

            let mut builder = self
                .http
                .request(method.clone(), &url)
                .bearer_auth(token)
                .query(query);
            if let Some(body) = body {
                builder = builder.json(body);
            }

            let response = match builder.send().await {
                Ok(response) => response,
                Err(e) if attempt < self.max_retries && (e.is_timeout() || e.is_connect()) => {
                    warn!("Request to {} failed ({}), retrying", url, e);
                    tokio::time::sleep(Self::backoff(attempt)).await;
                    attempt += 1;
                    continue;
                }
                Err(e) => {
                    error!("API request failed: {}", e);
                    return Err(e.into());
                }
            };

            let status = response.status().as_u16();
            if RETRY_STATUSES.contains(&status) && attempt < self.max_retries {
                warn!("{} returned {}, retrying", url, status);
                tokio::time::sleep(Self::backoff(attempt)).await;
                attempt += 1;
                continue;
            }

            let text = response.text().await?;
            if !(200..300).contains(&status) {
                error!("API request failed with status {}", status);
                return Err(MentionError::Api {
                    status,
                    message: format!("API request failed: {text}"),
                });
            }
            if text.trim().is_empty() {
                return Ok(Map::new());
            }
            return Ok(match serde_json::from_str::<Value>(&text)? {
                Value::Object(map) => map,
                other => {
                    let mut map = Map::new();
                    map.insert("data".to_string(), other);
                    map
                }
            });
        }
    }

    /// Fetch raw mentions. Dates must be `YYYY-MM-DD`.
    #[instrument(skip(self))]
    pub async fn get_mentions(&self, query: &MentionQuery) -> Result<Vec<RawMention>> {
        if query.start_date.as_deref().is_some_and(|d| !is_valid_date(d)) {
            return Err(invalid("start_date must be in YYYY-MM-DD format"));
        }
        if query.end_date.as_deref().is_some_and(|d| !is_valid_date(d)) {
            return Err(invalid("end_date must be in YYYY-MM-DD format"));
        }

        let mut params = vec![("limit", query.limit.to_string())];
        if let Some(start) = &query.start_date {
            params.push(("startDate", start.clone()));
        }
        if let Some(end) = &query.end_date {
            params.push(("endDate", end.clone()));
        }

        let mut response = self.request(Method::GET, ENDPOINT_MENTIONS, &params, None).await?;
        let records = match response.remove("mentions").or_else(|| response.remove("data")) {
            Some(Value::Array(records)) => records,
            _ => Vec::new(),
        };
        info!("Fetched {} mentions", records.len());

        let mut mentions = Vec::with_capacity(records.len());
        for record in records {
            match RawMention::from_api_value(record) {
                Ok(mention) => {
                    if let RawMention::Vendor(vendor) = &mention {
                        debug!(title = %vendor.title(), keywords = %vendor.keywords(), "Vendor mention");
                    }
                    mentions.push(mention)
                }
                Err(e) => warn!("Skipping malformed API record: {}", e),
            }
        }
        Ok(mentions)
    }

    pub async fn remove_mention(&self, mention_id: &str, project_id: Option<&str>) -> Result<()> {
        if mention_id.is_empty() {
            return Err(invalid("mention_id is required"));
        }
        let mut body = json!({ "mention_id": mention_id });
        if let Some(project_id) = project_id.filter(|p| !p.is_empty()) {
            body["project_id"] = json!(project_id);
        }
        self.request(Method::POST, &format!("{ENDPOINT_MENTIONS}/remove"), &[], Some(&body))
            .await?;
        debug!("Removed mention {}", mention_id);
        Ok(())
    }

    pub async fn remove_all_mentions(&self, project_id: &str) -> Result<()> {
        if project_id.is_empty() {
            return Err(invalid("project_id is required"));
        }
        let body = json!({ "project_id": project_id });
        self.request(Method::POST, &format!("{ENDPOINT_MENTIONS}/remove_all"), &[], Some(&body))
            .await?;
        info!("Removed all mentions for project {}", project_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles() {
        assert_eq!(MentionMindClient::backoff(0), Duration::from_millis(500));
        assert_eq!(MentionMindClient::backoff(1), Duration::from_secs(1));
        assert_eq!(MentionMindClient::backoff(2), Duration::from_secs(2));
    }

    #[test]
    fn test_date_parameter_format() {
        assert!(is_valid_date("2024-01-31"));
        assert!(!is_valid_date("2024/01/31"));
        assert!(!is_valid_date("2024-02-30"));
    }
}
