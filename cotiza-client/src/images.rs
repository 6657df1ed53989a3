//! Image prefetch for document export
//!
//! Item thumbnails live at remote URLs and are only needed when a PDF
//! is generated. All images of one export are requested in parallel,
//! each bounded by its own timeout; a failed download degrades to a
//! missing thumbnail, never a failed export.

use crate::{ClientConfig, ClientResult, NetworkClient};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::warn;

/// Parallel image downloader with a per-session byte cache
#[derive(Debug, Clone)]
pub struct ImageFetcher {
    client: NetworkClient,
    proxy_base: Option<String>,
    timeout: Duration,
    cache: Arc<Mutex<HashMap<String, Option<Vec<u8>>>>>,
}

impl ImageFetcher {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            client: NetworkClient::new(config)?,
            proxy_base: config.image_proxy.clone(),
            timeout: Duration::from_secs(config.image_timeout),
            cache: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Fetch every URL in parallel. Each entry of the result maps a URL
    /// to its bytes, or `None` when the download failed or timed out.
    pub async fn fetch_all(&self, urls: &[String]) -> HashMap<String, Option<Vec<u8>>> {
        let mut results = HashMap::new();
        let mut pending = Vec::new();

        {
            let cache = self.cache.lock().await;
            for url in urls {
                match cache.get(url) {
                    Some(bytes) => {
                        results.insert(url.clone(), bytes.clone());
                    }
                    None => pending.push(url.clone()),
                }
            }
        }
        pending.sort();
        pending.dedup();

        let downloads = pending.iter().map(|url| self.fetch_one(url));
        let downloaded: Vec<Option<Vec<u8>>> = join_all(downloads).await;

        let mut cache = self.cache.lock().await;
        for (url, bytes) in pending.into_iter().zip(downloaded) {
            cache.insert(url.clone(), bytes.clone());
            results.insert(url, bytes);
        }
        results
    }

    /// One download attempt with proxy fallback, both timeout-bounded
    async fn fetch_one(&self, url: &str) -> Option<Vec<u8>> {
        match tokio::time::timeout(self.timeout, self.client.get_bytes(url)).await {
            Ok(Ok(bytes)) => return Some(bytes),
            Ok(Err(e)) => warn!(%url, error = %e, "image download failed"),
            Err(_) => warn!(%url, "image download timed out"),
        }

        let proxy_base = self.proxy_base.as_ref()?;
        let proxied = format!("{}{}", proxy_base.trim_end_matches('/'), proxy_path(url));
        match tokio::time::timeout(self.timeout, self.client.get_bytes(&proxied)).await {
            Ok(Ok(bytes)) => Some(bytes),
            Ok(Err(e)) => {
                warn!(%proxied, error = %e, "proxied image download failed");
                None
            }
            Err(_) => {
                warn!(%proxied, "proxied image download timed out");
                None
            }
        }
    }
}

/// The proxy serves `/fetch?url=<original>` with the original URL
/// percent-encoded
fn proxy_path(url: &str) -> String {
    let mut encoded = String::with_capacity(url.len());
    for byte in url.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    format!("/fetch?url={}", encoded)
}
