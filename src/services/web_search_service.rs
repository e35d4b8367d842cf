use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::domain::WebSearchHit,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<WebSearchHit>>;
}

/// Google results through the Serper API.
pub struct SerperWebSearch {
    http: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
}

#[derive(Debug, Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
    num: usize,
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<WebSearchHit>,
}

impl SerperWebSearch {
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        Self {
            http,
            endpoint: config.serper_endpoint.clone(),
            api_key: config.serper_api_key.clone(),
        }
    }
}

#[async_trait]
impl WebSearch for SerperWebSearch {
    async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<WebSearchHit>> {
        let api_key = self.api_key.expose_secret();
        if api_key.trim().is_empty() {
            return Err(AppError::UpstreamError(
                "Web search is not configured (SERPER_API_KEY missing)".to_string(),
            ));
        }

        let response = self
            .http
            .post(&self.endpoint)
            .header("X-API-KEY", api_key)
            .json(&SerperRequest { q: query, num: limit })
            .send()
            .await?
            .error_for_status()?;

        let body: SerperResponse = response.json().await?;
        log::debug!("Serper returned {} organic results for '{}'", body.organic.len(), query);

        Ok(body.organic.into_iter().take(limit).collect())
    }
}
