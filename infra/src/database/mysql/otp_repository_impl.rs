//! MySQL implementation of the OtpRepository trait.
//!
//! Records live in the `otp_records` table (see `migrations/`). Identifiers
//! are stored as `BINARY(16)`, digests and salts as raw bytes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, MySql, MySqlPool, QueryBuilder, Row};
use tracing::{debug, error, info};
use uuid::Uuid;

use otp_core::domain::entities::{Digest, OtpRecord, Salt};
use otp_core::errors::StoreError;
use otp_core::repositories::OtpRepository;

/// Upper bound on identifiers per `DELETE ... IN (...)` statement
const DELETE_CHUNK_SIZE: usize = 500;

/// MySQL-backed secret store
pub struct MySqlOtpRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlOtpRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to OtpRecord entity
    fn row_to_record(row: &MySqlRow) -> Result<OtpRecord, StoreError> {
        let id: Vec<u8> = row.try_get("id").map_err(|e| column_error("id", e))?;
        let hashed_value: Vec<u8> = row
            .try_get("hashed_value")
            .map_err(|e| column_error("hashed_value", e))?;
        let salt: Vec<u8> = row.try_get("salt").map_err(|e| column_error("salt", e))?;
        let expires_at: DateTime<Utc> = row
            .try_get("expires_at")
            .map_err(|e| column_error("expires_at", e))?;
        let attempt_count: u32 = row
            .try_get("attempt_count")
            .map_err(|e| column_error("attempt_count", e))?;

        let id = Uuid::from_slice(&id)
            .map_err(|e| StoreError::Inconsistent(format!("Invalid record id: {}", e)))?;
        let hashed_value: Digest = hashed_value.as_slice().try_into().map_err(|_| {
            StoreError::Inconsistent(format!("Digest of record {} has wrong length", id))
        })?;
        let salt: Salt = salt.as_slice().try_into().map_err(|_| {
            StoreError::Inconsistent(format!("Salt of record {} has wrong length", id))
        })?;

        Ok(OtpRecord::restore(
            id,
            hashed_value,
            salt,
            expires_at,
            attempt_count,
        ))
    }
}

#[async_trait]
impl OtpRepository for MySqlOtpRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<OtpRecord>, StoreError> {
        let query = r#"
            SELECT id, hashed_value, salt, expires_at, attempt_count
            FROM otp_records
            WHERE id = ?
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(id.as_bytes().as_slice())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error("find_by_id", e))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn save(&self, record: &OtpRecord) -> Result<(), StoreError> {
        // Plain insert: an existing row is never overwritten
        let query = r#"
            INSERT INTO otp_records (
                id, hashed_value, salt, expires_at, attempt_count
            ) VALUES (?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(record.id().as_bytes().as_slice())
            .bind(record.hashed_value().as_slice())
            .bind(record.salt().as_slice())
            .bind(record.expires_at())
            .bind(record.attempt_count())
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("save", e))?;

        debug!(otp_id = %record.id(), "Saved OTP record");
        Ok(())
    }

    async fn record_failed_attempt(
        &self,
        id: Uuid,
        max_attempts: u32,
    ) -> Result<Option<u32>, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| query_error("record_failed_attempt", e))?;

        // The row lock taken here is held until commit
        sqlx::query(
            "UPDATE otp_records SET attempt_count = attempt_count + 1 \
             WHERE id = ? AND attempt_count < ?",
        )
        .bind(id.as_bytes().as_slice())
        .bind(max_attempts)
        .execute(&mut *tx)
        .await
        .map_err(|e| query_error("record_failed_attempt", e))?;

        let row = sqlx::query("SELECT attempt_count FROM otp_records WHERE id = ? FOR UPDATE")
            .bind(id.as_bytes().as_slice())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| query_error("record_failed_attempt", e))?;

        let attempt_count = row
            .map(|row| row.try_get::<u32, _>("attempt_count"))
            .transpose()
            .map_err(|e| column_error("attempt_count", e))?;

        tx.commit()
            .await
            .map_err(|e| query_error("record_failed_attempt", e))?;

        debug!(otp_id = %id, attempt_count = ?attempt_count, "Counted failed attempt");
        Ok(attempt_count)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM otp_records WHERE id = ?")
            .bind(id.as_bytes().as_slice())
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("delete", e))?;

        let removed = result.rows_affected() > 0;
        debug!(otp_id = %id, removed = removed, "Deleted OTP record");
        Ok(removed)
    }

    async fn find_expired(&self, before: DateTime<Utc>) -> Result<Vec<OtpRecord>, StoreError> {
        let query = r#"
            SELECT id, hashed_value, salt, expires_at, attempt_count
            FROM otp_records
            WHERE expires_at < ?
        "#;

        let rows = sqlx::query(query)
            .bind(before)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_error("find_expired", e))?;

        rows.iter().map(Self::row_to_record).collect()
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<usize, StoreError> {
        let mut removed = 0usize;

        for chunk in ids.chunks(DELETE_CHUNK_SIZE) {
            let mut builder = QueryBuilder::<MySql>::new("DELETE FROM otp_records WHERE id IN (");
            let mut separated = builder.separated(", ");
            for id in chunk {
                separated.push_bind(id.as_bytes().to_vec());
            }
            separated.push_unseparated(")");

            let result = builder
                .build()
                .execute(&self.pool)
                .await
                .map_err(|e| query_error("delete_many", e))?;

            removed += result.rows_affected() as usize;
        }

        if removed > 0 {
            info!(removed = removed, "Deleted OTP records in batch");
        }

        Ok(removed)
    }
}

fn query_error(operation: &str, e: sqlx::Error) -> StoreError {
    error!(operation = operation, error = %e, "OTP store query failed");

    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(format!("{}: {}", operation, e))
        }
        other => StoreError::Query(format!("{}: {}", operation, other)),
    }
}

fn column_error(column: &str, e: sqlx::Error) -> StoreError {
    StoreError::Inconsistent(format!("Failed to get {}: {}", column, e))
}
