use crate::http::{build_client, get, url_with_params};
use crate::{SearchConfig, SearchSource, SourceError};
use reqwest::blocking::Client;
use serde::Deserialize;
use swaudit_types::Citation;
use tracing::debug;

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

/// SerpAPI-compatible web search.
pub struct SerpApiSearch {
    config: SearchConfig,
    api_key: Option<String>,
    client: Client,
}

impl SerpApiSearch {
    /// A missing key is not an error here; every search then fails with
    /// [`SourceError::MissingCredentials`].
    pub fn new(config: SearchConfig, api_key: Option<String>) -> Result<Self, SourceError> {
        let client = build_client(config.timeout_secs)?;
        Ok(Self {
            config,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            client,
        })
    }

    /// Read the API key from the configured environment variable.
    pub fn from_env(config: SearchConfig) -> Result<Self, SourceError> {
        let api_key = std::env::var(&config.api_key_env).ok();
        Self::new(config, api_key)
    }
}

impl SearchSource for SerpApiSearch {
    fn search(&self, query: &str) -> Result<Vec<Citation>, SourceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SourceError::MissingCredentials(self.config.api_key_env.clone()))?;

        let num = self.config.num_results.to_string();
        let url = url_with_params(
            &self.config.endpoint,
            &[
                ("q", query),
                ("api_key", api_key),
                ("num", num.as_str()),
                ("hl", self.config.language.as_str()),
                ("gl", self.config.country.as_str()),
            ],
        )?;

        debug!(query, "web search");
        let body = get(&self.client, url, &[], self.config.timeout_secs)?;
        let response: SearchResponse =
            serde_json::from_slice(&body).map_err(|e| SourceError::Parse(e.to_string()))?;
        if let Some(err) = response.error {
            return Err(SourceError::Service(err));
        }

        let hits: Vec<Citation> = response
            .organic_results
            .into_iter()
            .take(self.config.num_results as usize)
            .map(|r| Citation {
                title: r.title,
                url: r.link,
                snippet: r.snippet,
            })
            .collect();
        debug!(query, hits = hits.len(), "web search done");
        Ok(hits)
    }
}
