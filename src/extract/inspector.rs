//! Page inspection for a terminal host
//!
//! The inspector is the collaborator that knows the page being checked. Over
//! HTTP there is no live document to scroll or outline, so highlighting only
//! reports whether the identifier belongs to the last extraction.

use crate::config::UserAgentConfig;
use crate::extract::{extract_links, ExtractError};
use crate::state::LinkDescriptor;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

const PAGE_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of the links on a page and target for element highlighting
#[async_trait]
pub trait PageInspector: Send + Sync {
    /// Extracts every checkable reference on the page
    async fn extract_links(&self, page_url: &str) -> Result<Vec<LinkDescriptor>, ExtractError>;

    /// Brings the element with the given identifier to the user's attention
    ///
    /// Returns false when no element with that identifier is known.
    async fn highlight(&self, id: &str) -> bool;
}

/// Fetches pages with reqwest and extracts references from the HTML
pub struct HttpPageInspector {
    client: Client,
    last_extraction: Mutex<Vec<LinkDescriptor>>,
}

impl HttpPageInspector {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            last_extraction: Mutex::new(Vec::new()),
        }
    }

    /// Builds a page-fetching client; unlike link probes, page fetches follow redirects
    pub fn from_config(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.header_value())
            .timeout(PAGE_FETCH_TIMEOUT)
            .gzip(true)
            .brotli(true)
            .build()?;
        Ok(Self::new(client))
    }

    fn remember(&self, links: &[LinkDescriptor]) {
        let mut last = self.last_extraction.lock().unwrap_or_else(|e| e.into_inner());
        *last = links.to_vec();
    }
}

#[async_trait]
impl PageInspector for HttpPageInspector {
    async fn extract_links(&self, page_url: &str) -> Result<Vec<LinkDescriptor>, ExtractError> {
        let url = Url::parse(page_url).map_err(|source| ExtractError::InvalidUrl {
            url: page_url.to_string(),
            source,
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ExtractError::UnsupportedScheme(url.scheme().to_string()));
        }

        tracing::debug!("Fetching page {}", url);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::HttpStatus(status.as_u16()));
        }

        // Relative references resolve against the final URL after redirects
        let base = response.url().clone();
        let html = response.text().await?;
        let links = extract_links(&html, &base);

        tracing::info!("Extracted {} links from {}", links.len(), base);
        self.remember(&links);
        Ok(links)
    }

    async fn highlight(&self, id: &str) -> bool {
        let last = self.last_extraction.lock().unwrap_or_else(|e| e.into_inner());
        match last.iter().find(|link| link.id == id) {
            Some(link) => {
                tracing::info!("Highlight <{}> {} ({})", link.kind, link.url, link.id);
                true
            }
            None => {
                tracing::warn!("No element with id {}", id);
                false
            }
        }
    }
}
