//! Secret store contract for OTP records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::otp_record::OtpRecord;
use crate::errors::StoreError;

/// Durable keyed storage for OTP records
///
/// Several engines may share one store. Records are only ever created by
/// `save`; afterwards the attempt counter changes solely through
/// `record_failed_attempt`, which never inserts, so a record deleted by a
/// sweep or a concurrent verification stays deleted.
#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Point lookup by identifier
    ///
    /// # Returns
    /// * `Ok(Some(OtpRecord))` - Record found
    /// * `Ok(None)` - No record with this identifier
    /// * `Err(StoreError)` - Store fault
    async fn find_by_id(&self, id: Uuid) -> Result<Option<OtpRecord>, StoreError>;

    /// Insert a newly issued record
    async fn save(&self, record: &OtpRecord) -> Result<(), StoreError>;

    /// Atomically count one failed attempt
    ///
    /// Increments `attempt_count` only while it is below `max_attempts`,
    /// in a single step relative to other callers for the same identifier.
    ///
    /// # Returns
    /// * `Ok(Some(count))` - Counter after the call (equal to `max_attempts`
    ///   once the budget is spent, even if this call did not increment it)
    /// * `Ok(None)` - No record with this identifier
    /// * `Err(StoreError)` - Store fault
    async fn record_failed_attempt(
        &self,
        id: Uuid,
        max_attempts: u32,
    ) -> Result<Option<u32>, StoreError>;

    /// Delete one record
    ///
    /// # Returns
    /// * `Ok(true)` - This call removed the record
    /// * `Ok(false)` - The record was already gone
    /// * `Err(StoreError)` - Store fault
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// All records whose `expires_at` lies strictly before `before`
    async fn find_expired(&self, before: DateTime<Utc>) -> Result<Vec<OtpRecord>, StoreError>;

    /// Delete a batch of records
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records actually removed
    /// * `Err(StoreError)` - Deletion failed
    async fn delete_many(&self, ids: &[Uuid]) -> Result<usize, StoreError>;
}
