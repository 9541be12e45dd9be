// src/profile_extraction/page.rs
//! Sources of profile pages: in-memory HTML, saved HTML files, remote URLs

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::error::{HireSightError, Result};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Complete,
}

/// HTML plus the URL it was captured at
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub url: String,
    pub html: String,
}

#[async_trait]
pub trait ProfilePage: Send + Sync {
    async fn ready_state(&self) -> ReadyState;
    async fn current_url(&self) -> Result<String>;
    async fn snapshot(&self) -> Result<PageSnapshot>;
}

/// A page already held in memory
#[derive(Debug, Clone)]
pub struct StaticPage {
    url: String,
    html: String,
}

impl StaticPage {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }
}

#[async_trait]
impl ProfilePage for StaticPage {
    async fn ready_state(&self) -> ReadyState {
        ReadyState::Complete
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.url.clone())
    }

    async fn snapshot(&self) -> Result<PageSnapshot> {
        Ok(PageSnapshot {
            url: self.url.clone(),
            html: self.html.clone(),
        })
    }
}

/// A profile page saved to disk by a browser. The file may be rewritten while
/// we watch it; it counts as loaded once the closing `</html>` is present.
#[derive(Debug, Clone)]
pub struct FilePage {
    path: PathBuf,
}

impl FilePage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            HireSightError::InvalidInput(format!(
                "cannot read page {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn file_url(&self) -> String {
        let absolute = std::fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone());
        format!("file://{}", absolute.display())
    }
}

#[async_trait]
impl ProfilePage for FilePage {
    async fn ready_state(&self) -> ReadyState {
        match self.read().await {
            Ok(html) if html.to_lowercase().contains("</html>") => ReadyState::Complete,
            _ => ReadyState::Loading,
        }
    }

    async fn current_url(&self) -> Result<String> {
        let html = self.read().await?;
        Ok(canonical_url(&html).unwrap_or_else(|| self.file_url()))
    }

    async fn snapshot(&self) -> Result<PageSnapshot> {
        let html = self.read().await?;
        let url = canonical_url(&html).unwrap_or_else(|| self.file_url());
        Ok(PageSnapshot { url, html })
    }
}

/// A page fetched over HTTP with a desktop browser user agent
pub struct RemotePage {
    client: Client,
    url: String,
}

impl RemotePage {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ProfilePage for RemotePage {
    async fn ready_state(&self) -> ReadyState {
        ReadyState::Complete
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.url.clone())
    }

    async fn snapshot(&self) -> Result<PageSnapshot> {
        info!("Fetching profile page: {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HireSightError::Network(format!(
                "fetching {} returned HTTP {}",
                self.url, status
            )));
        }

        let final_url = response.url().to_string();
        let html = response.text().await?;
        Ok(PageSnapshot {
            url: final_url,
            html,
        })
    }
}

/// `<link rel="canonical">` or `og:url`, whichever comes first
pub fn canonical_url(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    [
        ("link[rel=\"canonical\"]", "href"),
        ("meta[property=\"og:url\"]", "content"),
    ]
    .iter()
    .find_map(|(selector, attribute)| {
        let selector = Selector::parse(selector).ok()?;
        document
            .select(&selector)
            .find_map(|element| element.value().attr(attribute))
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    })
}
