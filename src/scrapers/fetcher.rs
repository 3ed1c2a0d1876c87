use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::ScraperConfig;

/// Retrieval of raw page markup. Failures are soft: implementations log and
/// return `None`, callers skip the unit of work.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, timeout: Duration) -> Option<String>;
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    config: ScraperConfig,
}

impl HttpFetcher {
    pub fn new(config: ScraperConfig) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()?;

        Ok(Self { client, config })
    }

    async fn fetch_with_retry(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let attempts = self.config.retry_max.max(1);
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);

        for attempt in 0..attempts {
            match self.client.get(url).timeout(timeout).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response.text().await?);
                    }

                    // Only server-side errors are worth another attempt
                    if !status.is_server_error() || attempt == attempts - 1 {
                        return Err(format!("HTTP error: {}", status).into());
                    }
                }
                Err(e) => {
                    if attempt == attempts - 1 {
                        return Err(e.into());
                    }
                }
            }

            tracing::warn!("Retry {}/{} for {}. Waiting {:?}", attempt + 1, attempts, url, delay);
            tokio::time::sleep(delay).await;
            delay *= 2;
        }

        Err("Max retries exceeded".into())
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Option<String> {
        match self.fetch_with_retry(url, timeout).await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", url, e);
                None
            }
        }
    }
}
