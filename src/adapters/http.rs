use crate::config::Configuration;
use crate::domain::ports::CitationSource;
use crate::utils::error::{EticError, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Fetches BibTeX text for a DOI from a content-negotiating resolver.
pub struct DoiFetcher {
    client: Client,
    url_base: String,
    accept: String,
    timeout: Duration,
}

impl DoiFetcher {
    pub fn new(config: &Configuration) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &Configuration) -> Self {
        Self {
            client,
            url_base: config.url_base.clone(),
            accept: config.accept.clone(),
            timeout: config.timeout,
        }
    }

    /// Request URL for `doi`. A full http(s) URL is used verbatim.
    pub fn url_for(&self, doi: &str) -> String {
        match Url::parse(doi) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                tracing::warn!("Full URL provided; using as is.");
                doi.to_string()
            }
            _ => format!("{}{}", self.url_base, doi.trim()),
        }
    }
}

#[async_trait]
impl CitationSource for DoiFetcher {
    async fn fetch(&self, doi: &str) -> Result<String> {
        let url = self.url_for(doi);
        tracing::debug!("Making request to: {}", url);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, &self.accept)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EticError::TimeoutError { url: url.clone() }
                } else {
                    EticError::HttpError(e)
                }
            })?;

        tracing::debug!("Response status: {}", response.status());

        if response.status() != StatusCode::OK {
            return Err(EticError::HttpStatusError {
                status: response.status().as_u16(),
                url,
            });
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                EticError::TimeoutError { url }
            } else {
                EticError::HttpError(e)
            }
        })
    }
}
