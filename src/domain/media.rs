use async_trait::async_trait;

/// Location of an asset after it has been handed to the media store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    pub url: String,
}

/// External object store for avatars and cover images.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    async fn upload(&self, reference: &str) -> Result<StoredMedia, anyhow::Error>;
}
