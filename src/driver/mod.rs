//! Page driver capability
//!
//! The crawl only ever talks to a page through [`PageDriver`]: load a URL,
//! wait for a marker, snapshot what is loaded, click a control, close. A
//! session is used by one caller at a time and is never shared.
//!
//! [`HttpDriver`] is the bundled implementation. It fetches pages with
//! `reqwest` and treats a click as following the control's `href`.

mod http;

pub use http::{build_http_client, HttpDriver};

use crate::DriverError;
use async_trait::async_trait;
use scraper::Html;
use std::time::Duration;

/// The content of the currently loaded page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    /// URL the content was served from (after redirects)
    pub url: String,

    /// Raw HTML
    pub html: String,
}

impl PageSnapshot {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }

    /// Parses the HTML into a queryable document
    pub fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }
}

/// A single page-automation session
#[async_trait]
pub trait PageDriver: Send {
    /// Loads `url`, giving up after `timeout`
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), DriverError>;

    /// Waits until an element matching `marker` is present
    async fn wait_for_selector(&mut self, marker: &str, timeout: Duration)
        -> Result<(), DriverError>;

    /// Returns the currently loaded content
    async fn snapshot(&mut self) -> Result<PageSnapshot, DriverError>;

    /// Activates the first element matching `marker`
    async fn click(&mut self, marker: &str) -> Result<(), DriverError>;

    /// Releases the session
    async fn close(&mut self) -> Result<(), DriverError>;
}
