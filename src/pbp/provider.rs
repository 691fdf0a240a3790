use async_trait::async_trait;

use super::models::PlayTable;
use crate::error::SourceError;

/// Trait that every play-by-play source must implement.
///
/// The engine never looks at raw files or HTTP responses; it only sees the
/// [`PlayTable`] a source returns.
#[async_trait]
pub trait PlayByPlaySource: Send + Sync {
    /// Load every regular-season play of `season`.
    async fn fetch_season(&self, season: u16) -> Result<PlayTable, SourceError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
