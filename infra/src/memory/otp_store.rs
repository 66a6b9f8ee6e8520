//! `OtpRepository` backed by a map behind an async lock

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use otp_core::domain::entities::OtpRecord;
use otp_core::errors::StoreError;
use otp_core::repositories::OtpRepository;

/// In-memory secret store
#[derive(Default)]
pub struct InMemoryOtpStore {
    records: RwLock<HashMap<Uuid, OtpRecord>>,
}

impl InMemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl OtpRepository for InMemoryOtpStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<OtpRecord>, StoreError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn save(&self, record: &OtpRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.id()) {
            return Err(StoreError::Inconsistent(format!(
                "Record {} already exists",
                record.id()
            )));
        }
        records.insert(record.id(), record.clone());
        Ok(())
    }

    async fn record_failed_attempt(
        &self,
        id: Uuid,
        max_attempts: u32,
    ) -> Result<Option<u32>, StoreError> {
        // Read and increment under one write guard
        let mut records = self.records.write().await;
        Ok(records
            .get_mut(&id)
            .map(|record| record.count_failed_attempt(max_attempts)))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.records.write().await.remove(&id).is_some())
    }

    async fn find_expired(&self, before: DateTime<Utc>) -> Result<Vec<OtpRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|record| record.is_expired_at(before))
            .cloned()
            .collect())
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<usize, StoreError> {
        let mut records = self.records.write().await;
        let removed = ids.iter().filter(|id| records.remove(id).is_some()).count();

        debug!(requested = ids.len(), removed = removed, "Removed records from memory store");
        Ok(removed)
    }
}
