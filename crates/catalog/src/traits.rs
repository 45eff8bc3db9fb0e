use crate::Result;

/// Genre-tag lookup against an external music catalog. Best-effort from the
/// caller's point of view: consumers must tolerate errors and slowness.
#[async_trait::async_trait]
pub trait GenreLookup: Send + Sync {
    async fn genre_tags(&self, provider_track_id: &str) -> Result<Vec<String>>;
}

/// Lookup that knows nothing. Used when no catalog is configured.
pub struct NoCatalog;

#[async_trait::async_trait]
impl GenreLookup for NoCatalog {
    async fn genre_tags(&self, provider_track_id: &str) -> Result<Vec<String>> {
        Err(crate::CatalogError::TrackNotFound(
            provider_track_id.to_string(),
        ))
    }
}
