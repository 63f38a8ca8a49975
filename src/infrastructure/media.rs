use crate::domain::media::{MediaStorage, StoredMedia};
use anyhow::bail;
use async_trait::async_trait;
use url::Url;

/// Media store for assets already hosted by a CDN.
///
/// The client uploads to the object store itself and hands us the resulting
/// URL; anything that is not an absolute `http(s)` URL is refused.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlMediaStorage;

impl UrlMediaStorage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MediaStorage for UrlMediaStorage {
    async fn upload(&self, reference: &str) -> Result<StoredMedia, anyhow::Error> {
        let url = Url::parse(reference.trim())
            .map_err(|e| anyhow::anyhow!("Unreadable media reference: {}", e))?;

        if !matches!(url.scheme(), "http" | "https") {
            bail!("Unsupported media scheme: {}", url.scheme());
        }
        if url.host_str().is_none() {
            bail!("Media reference has no host");
        }

        Ok(StoredMedia {
            url: url.to_string(),
        })
    }
}
