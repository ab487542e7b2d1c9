use async_trait::async_trait;

use crate::application::errors::MediaError;

/// Looks up a media URI for a free-text query
#[async_trait]
pub trait MediaResolver: Send + Sync {
    async fn resolve_media(&self, query: &str) -> Result<String, MediaError>;
}
