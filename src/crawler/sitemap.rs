//! Sitemap reader collaborator
//!
//! Seeds the first traversal layer from `<scheme>://<host>/sitemap.xml`.
//! Reading is best-effort: every failure degrades to an empty list.

use crate::SitemapError;
use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::{header, Client};
use url::Url;

/// Reads the URL list a site advertises in its sitemap
#[async_trait]
pub trait SitemapReader: Send + Sync {
    /// Returns the advertised URLs, or an empty list on any failure
    async fn read_sitemap(&self, seed: &Url) -> Vec<String>;
}

/// Sitemap reader that never finds anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSitemap;

#[async_trait]
impl SitemapReader for NoSitemap {
    async fn read_sitemap(&self, _seed: &Url) -> Vec<String> {
        Vec::new()
    }
}

/// Fetches `/sitemap.xml` from the seed's origin over HTTP
#[derive(Debug, Clone)]
pub struct HttpSitemapReader {
    client: Client,
    user_agent: Option<String>,
}

impl HttpSitemapReader {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            user_agent: None,
        }
    }

    /// Sends `user_agent` instead of the client's default
    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    async fn read(&self, sitemap_url: &Url) -> Result<Vec<String>, SitemapError> {
        let mut request = self.client.get(sitemap_url.clone());
        if let Some(user_agent) = &self.user_agent {
            request = request.header(header::USER_AGENT, user_agent.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SitemapError::Status(status.as_u16()));
        }

        let xml = response.text().await?;
        Ok(parse_locations(&xml)?)
    }
}

#[async_trait]
impl SitemapReader for HttpSitemapReader {
    async fn read_sitemap(&self, seed: &Url) -> Vec<String> {
        let sitemap_url = match seed.join("/sitemap.xml") {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Cannot build sitemap URL for {}: {}", seed, e);
                return Vec::new();
            }
        };

        match self.read(&sitemap_url).await {
            Ok(urls) => {
                tracing::debug!("Sitemap {} lists {} URLs", sitemap_url, urls.len());
                urls
            }
            Err(e) => {
                tracing::warn!("Error reading sitemap {}: {}", sitemap_url, e);
                Vec::new()
            }
        }
    }
}

/// Collects the text of every `<loc>` element
///
/// Namespace prefixes are ignored, so `<sm:loc>` counts too. Entries of a
/// sitemap index are returned as-is; they are not followed.
pub fn parse_locations(xml: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut locations = Vec::new();
    let mut in_loc = false;
    let mut current = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"loc" => {
                in_loc = true;
                current.clear();
            }
            Event::End(e) if e.local_name().as_ref() == b"loc" => {
                in_loc = false;
                let loc = current.trim();
                if !loc.is_empty() {
                    locations.push(loc.to_string());
                }
            }
            Event::Text(e) if in_loc => {
                current.push_str(&e.unescape()?);
            }
            Event::CData(e) if in_loc => {
                current.push_str(&String::from_utf8_lossy(&e));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(locations)
}
