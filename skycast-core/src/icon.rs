//! Condition icon lookup.
//!
//! Providers send icon references as protocol-relative URLs
//! (`//cdn.weatherapi.com/...`). They are normalized to `https` before any
//! request is made, and fetched images are kept in memory keyed by that URL.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::{collections::HashMap, time::Duration};
use tokio::sync::Mutex;

/// `"//host/icon.png" -> "https://host/icon.png"`; absolute URLs pass through.
pub fn normalize_icon_url(raw: &str) -> String {
    let raw = raw.trim();
    match raw.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => raw.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub url: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLookup {
    Found(Image),
    /// The caller shows a placeholder instead.
    NotFound,
}

#[async_trait]
pub trait ImageResolver: Send + Sync {
    async fn resolve_image(&self, url: &str) -> ImageLookup;
}

/// HTTP image fetcher with an unbounded in-memory cache.
#[derive(Debug)]
pub struct HttpImageCache {
    http: Client,
    entries: Mutex<HashMap<String, Image>>,
}

impl HttpImageCache {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, entries: Mutex::new(HashMap::new()) })
    }

    pub async fn cached_len(&self) -> usize {
        self.entries.lock().await.len()
    }

    async fn download(&self, url: &str) -> Option<Image> {
        let res = match self.http.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("Icon request failed: {}", e);
                return None;
            }
        };

        if !res.status().is_success() {
            tracing::debug!("Icon request returned status {}", res.status());
            return None;
        }

        let content_type = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        match res.bytes().await {
            Ok(bytes) => Some(Image { url: url.to_string(), content_type, bytes }),
            Err(e) => {
                tracing::debug!("Icon body read failed: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl ImageResolver for HttpImageCache {
    async fn resolve_image(&self, url: &str) -> ImageLookup {
        let url = normalize_icon_url(url);
        if url.is_empty() {
            return ImageLookup::NotFound;
        }

        if let Some(hit) = self.entries.lock().await.get(&url) {
            return ImageLookup::Found(hit.clone());
        }

        // Not holding the lock across the request; two racing misses both fetch.
        match self.download(&url).await {
            Some(image) => {
                self.entries.lock().await.insert(url, image.clone());
                ImageLookup::Found(image)
            }
            None => ImageLookup::NotFound,
        }
    }
}
