//! Request idempotency guard backed by the `unique_requests` table.
//!
//! A recorded request id means the request was processed or is in flight.
//! The unique index on `request_id` settles races between concurrent
//! retries: the loser sees a unique-constraint violation and treats the
//! request as a duplicate.

use chrono::Utc;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, SqlErr, TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::entities::unique_requests;

/// Result of recording a request id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// First time the id was seen.
    Recorded,
    /// The id was already recorded.
    Duplicate,
}

impl RecordOutcome {
    /// Returns true if the request was seen before.
    #[must_use]
    pub const fn is_duplicate(self) -> bool {
        matches!(self, Self::Duplicate)
    }
}

/// Repository for request id bookkeeping.
#[derive(Debug, Clone)]
pub struct IdempotencyRepository {
    db: DatabaseConnection,
}

impl IdempotencyRepository {
    /// Creates a new idempotency repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns true if `request_id` was already recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn request_exists(&self, request_id: &str) -> Result<bool, DbErr> {
        request_exists(&self.db, request_id).await
    }

    /// Records `request_id` in its own, immediately committed transaction.
    ///
    /// The record survives a rollback of whatever transaction the caller
    /// runs afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails for any reason
    /// other than the id already existing.
    pub async fn record_committed(&self, request_id: &str) -> Result<RecordOutcome, DbErr> {
        let txn = self.db.begin().await?;
        let outcome = record_request(&txn, request_id).await?;
        match outcome {
            RecordOutcome::Recorded => txn.commit().await?,
            RecordOutcome::Duplicate => txn.rollback().await?,
        }
        Ok(outcome)
    }
}

/// Existence probe usable inside or outside a transaction.
pub(crate) async fn request_exists<C>(conn: &C, request_id: &str) -> Result<bool, DbErr>
where
    C: ConnectionTrait,
{
    let count = unique_requests::Entity::find()
        .filter(unique_requests::Column::RequestId.eq(request_id))
        .count(conn)
        .await?;
    Ok(count > 0)
}

/// Inserts `request_id`, mapping a unique violation to `Duplicate`.
///
/// On Postgres a violation aborts the surrounding transaction, so callers
/// must stop and roll back on `Duplicate`.
pub(crate) async fn record_request<C>(conn: &C, request_id: &str) -> Result<RecordOutcome, DbErr>
where
    C: ConnectionTrait,
{
    let row = unique_requests::ActiveModel {
        id: Set(Uuid::now_v7()),
        request_id: Set(request_id.to_owned()),
        created_at: Set(Utc::now().into()),
    };

    match unique_requests::Entity::insert(row).exec(conn).await {
        Ok(_) => {
            debug!(request_id, "Request id recorded");
            Ok(RecordOutcome::Recorded)
        }
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            info!(request_id, "Request dropped: already recorded");
            Ok(RecordOutcome::Duplicate)
        }
        Err(err) => Err(err),
    }
}
