use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::ImageStore;
use crate::{
    error::{Result, StoreError},
    model::ImageRecord,
};

/// Process-local record store
#[derive(Default)]
pub struct MemoryImageStore {
    records: Mutex<Vec<ImageRecord>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record created so far, oldest first
    pub fn records(&self) -> Vec<ImageRecord> {
        self.records.lock().map(|records| records.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn create(&self, filename: &str, url: &str) -> Result<ImageRecord> {
        let mut records = self.records.lock().map_err(|_| StoreError::Unavailable)?;

        let id = i64::try_from(records.len()).map_err(|_| StoreError::Unavailable)? + 1;
        let record = ImageRecord {
            id,
            filename: filename.to_string(),
            url: url.to_string(),
            created_at: Utc::now(),
        };

        records.push(record.clone());

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ids_start_at_one_and_increase() {
        let store = MemoryImageStore::new();

        let first = store.create("a.png", "placeholder-url").await.unwrap();
        let second = store.create("b.png", "placeholder-url").await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.records(), vec![first, second]);
    }
}
