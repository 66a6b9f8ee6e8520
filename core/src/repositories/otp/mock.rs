//! Mock implementation of OtpRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Barrier, RwLock};
use uuid::Uuid;

use crate::domain::entities::otp_record::OtpRecord;
use crate::errors::StoreError;

use super::r#trait::OtpRepository;

/// Mock OTP repository with call counting and failure injection
pub struct MockOtpRepository {
    records: Arc<RwLock<HashMap<Uuid, OtpRecord>>>,
    should_fail: AtomicBool,
    calls: AtomicUsize,
    find_barrier: std::sync::Mutex<Option<Arc<Barrier>>>,
}

impl MockOtpRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            should_fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            find_barrier: std::sync::Mutex::new(None),
        }
    }

    /// Make every subsequent call fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.should_fail.store(failing, Ordering::SeqCst);
    }

    /// Number of store calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every `find_by_id` wait on `barrier` after taking its snapshot,
    /// so concurrent verifiers all act on the same stale copy
    pub fn hold_lookups_at(&self, barrier: Arc<Barrier>) {
        *self.find_barrier.lock().unwrap() = Some(barrier);
    }

    pub async fn get(&self, id: Uuid) -> Option<OtpRecord> {
        self.records.read().await.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Insert a record directly, bypassing the engine
    pub async fn insert(&self, record: OtpRecord) {
        self.records.write().await.insert(record.id(), record);
    }

    /// Remove a record directly, bypassing the engine
    pub async fn remove(&self, id: Uuid) {
        self.records.write().await.remove(&id);
    }

    fn enter(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("mock store offline".to_string()));
        }
        Ok(())
    }
}

impl Default for MockOtpRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OtpRepository for MockOtpRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<OtpRecord>, StoreError> {
        self.enter()?;
        let found = self.records.read().await.get(&id).cloned();
        let barrier = self.find_barrier.lock().unwrap().clone();
        if let Some(barrier) = barrier {
            barrier.wait().await;
        }
        Ok(found)
    }

    async fn save(&self, record: &OtpRecord) -> Result<(), StoreError> {
        self.enter()?;
        self.records.write().await.insert(record.id(), record.clone());
        Ok(())
    }

    async fn record_failed_attempt(
        &self,
        id: Uuid,
        max_attempts: u32,
    ) -> Result<Option<u32>, StoreError> {
        self.enter()?;
        let mut records = self.records.write().await;
        Ok(records
            .get_mut(&id)
            .map(|record| record.count_failed_attempt(max_attempts)))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.enter()?;
        Ok(self.records.write().await.remove(&id).is_some())
    }

    async fn find_expired(&self, before: DateTime<Utc>) -> Result<Vec<OtpRecord>, StoreError> {
        self.enter()?;
        Ok(self
            .records
            .read()
            .await
            .values()
            .filter(|r| r.is_expired_at(before))
            .cloned()
            .collect())
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<usize, StoreError> {
        self.enter()?;
        let mut records = self.records.write().await;
        Ok(ids.iter().filter(|id| records.remove(id).is_some()).count())
    }
}
