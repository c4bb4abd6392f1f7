//! HTTP-backed page driver
//!
//! This driver covers catalog pages that are fully server-rendered:
//! - Navigation is a GET with the configured user agent and language header
//! - Waiting checks the fetched document for the marker
//! - Clicking follows the first matching element's `href`
//!
//! Launch settings that only mean something to a real browser (headless mode,
//! sandboxing, viewport) are recorded in the launch log line and otherwise
//! ignored.

use crate::config::{BrowserConfig, TimeoutConfig};
use crate::driver::{PageDriver, PageSnapshot};
use crate::url::resolve_href;
use crate::DriverError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::Client;
use scraper::Selector;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client carrying the browser identity settings
///
/// # Arguments
///
/// * `config` - User agent and language settings
/// * `timeout` - Overall request timeout, normally the navigation bound
///
/// # Example
///
/// ```no_run
/// use catalog_crawler::config::BrowserConfig;
/// use catalog_crawler::driver::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&BrowserConfig::default(), Duration::from_secs(60)).unwrap();
/// ```
pub fn build_http_client(config: &BrowserConfig, timeout: Duration) -> Result<Client, DriverError> {
    let mut headers = HeaderMap::new();
    let language = HeaderValue::from_str(&config.accept_language).map_err(|e| {
        DriverError::Launch(format!(
            "invalid accept-language '{}': {}",
            config.accept_language, e
        ))
    })?;
    headers.insert(ACCEPT_LANGUAGE, language);

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
        .map_err(|e| DriverError::Launch(e.to_string()))
}

/// A page driver session over plain HTTP
pub struct HttpDriver {
    client: Client,
    navigation_timeout: Duration,
    current: Option<PageSnapshot>,
    closed: bool,
}

impl HttpDriver {
    /// Starts a session with the given identity and timeouts
    pub fn launch(browser: &BrowserConfig, timeouts: &TimeoutConfig) -> Result<Self, DriverError> {
        tracing::info!(
            "Launching page driver (headless: {}, sandbox: {}, viewport: {}x{})",
            browser.headless,
            browser.sandbox,
            browser.viewport_width,
            browser.viewport_height
        );

        let client = build_http_client(browser, timeouts.navigation())?;

        Ok(Self {
            client,
            navigation_timeout: timeouts.navigation(),
            current: None,
            closed: false,
        })
    }

    fn ensure_open(&self) -> Result<(), DriverError> {
        if self.closed {
            Err(DriverError::SessionClosed)
        } else {
            Ok(())
        }
    }

    /// Finds the absolute destination of the first element matching `marker`
    fn click_target(&self, marker: &str) -> Result<String, DriverError> {
        let current = self.current.as_ref().ok_or(DriverError::NoPageLoaded)?;
        let selector =
            Selector::parse(marker).map_err(|_| DriverError::InvalidSelector(marker.to_string()))?;
        let base = Url::parse(&current.url).map_err(|e| DriverError::Navigation {
            url: current.url.clone(),
            message: e.to_string(),
        })?;

        let document = current.document();
        document
            .select(&selector)
            .next()
            .and_then(|element| element.value().attr("href"))
            .and_then(|href| resolve_href(href, &base))
            .ok_or_else(|| DriverError::NothingToClick {
                marker: marker.to_string(),
            })
    }
}

#[async_trait]
impl PageDriver for HttpDriver {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), DriverError> {
        self.ensure_open()?;
        self.current = None;

        tracing::debug!("Navigating to {}", url);

        let client = &self.client;
        let fetch = async {
            let response = client.get(url).send().await?;
            let status = response.status();
            let final_url = response.url().to_string();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, final_url, body))
        };

        let (status, final_url, body) = match tokio::time::timeout(timeout, fetch).await {
            Err(_) => {
                return Err(DriverError::NavigationTimeout {
                    url: url.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                })
            }
            Ok(Err(e)) if e.is_timeout() => {
                return Err(DriverError::NavigationTimeout {
                    url: url.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                })
            }
            Ok(Err(e)) => {
                return Err(DriverError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })
            }
            Ok(Ok(fetched)) => fetched,
        };

        if !status.is_success() {
            return Err(DriverError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        self.current = Some(PageSnapshot::new(final_url, body));
        Ok(())
    }

    /// A fetched page never changes, so a missing marker fails at once rather
    /// than after the full bound.
    async fn wait_for_selector(
        &mut self,
        marker: &str,
        timeout: Duration,
    ) -> Result<(), DriverError> {
        self.ensure_open()?;

        let current = self.current.as_ref().ok_or(DriverError::NoPageLoaded)?;
        let selector =
            Selector::parse(marker).map_err(|_| DriverError::InvalidSelector(marker.to_string()))?;

        let present = current.document().select(&selector).next().is_some();
        if present {
            Ok(())
        } else {
            Err(DriverError::MarkerTimeout {
                marker: marker.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            })
        }
    }

    async fn snapshot(&mut self) -> Result<PageSnapshot, DriverError> {
        self.ensure_open()?;
        self.current.clone().ok_or(DriverError::NoPageLoaded)
    }

    async fn click(&mut self, marker: &str) -> Result<(), DriverError> {
        self.ensure_open()?;

        let target = self.click_target(marker)?;
        tracing::debug!("Following '{}' to {}", marker, target);

        let timeout = self.navigation_timeout;
        self.navigate(&target, timeout).await
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        if !self.closed {
            tracing::debug!("Closing page driver session");
        }
        self.current = None;
        self.closed = true;
        Ok(())
    }
}
