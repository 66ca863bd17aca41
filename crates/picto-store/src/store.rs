pub(crate) mod memory;
pub(crate) mod sqlite;

use async_trait::async_trait;

use crate::{error::Result, model::ImageRecord};

/// Append-only log of uploaded image metadata
///
/// Records are created exactly once and never updated or removed, so the
/// capability exposes nothing but `create`.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist a new record, assigning its id and creation time
    async fn create(&self, filename: &str, url: &str) -> Result<ImageRecord>;
}
