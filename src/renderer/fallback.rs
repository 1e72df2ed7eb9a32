//! Plain HTTP fetch used when the browser path fails

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::FallbackFetcher;
use super::options::RenderOptions;

/// `GET` the page with the render user agent; non-2xx is an error
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_options(options: &RenderOptions) -> Result<Self> {
        let client = Client::builder()
            .user_agent(options.user_agent.clone())
            .timeout(options.timeout)
            .build()
            .context("Failed to build fallback HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FallbackFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Fallback request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("Fallback fetch returned {status}");
        }

        let body = response
            .text()
            .await
            .context("Failed to read fallback response body")?;
        debug!(url, bytes = body.len(), "Fallback fetch succeeded");
        Ok(body)
    }
}
