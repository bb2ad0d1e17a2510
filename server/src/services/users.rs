//! Postgres-backed application user records.
//!
//! TRADE-OFFS
//! ==========
//! The upsert is two statements (`INSERT .. ON CONFLICT DO NOTHING`, then a
//! read) rather than one CTE. Under READ COMMITTED the second statement sees a
//! row committed by a racing insert, which a single-statement CTE would not.

use session::{ApplicationUserRecord, NewUserRecord, RecordStore, SyncError};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const USER_COLUMNS: &str = "id, email, display_name, balance, created_at";

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RecordStore for PgUserStore {
    async fn get_user_by_id(&self, id: &str) -> Result<Option<ApplicationUserRecord>, SyncError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(sync_error_from_sqlx)?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn upsert_user(&self, record: NewUserRecord) -> Result<ApplicationUserRecord, SyncError> {
        let inserted = sqlx::query(
            "INSERT INTO users (id, email, display_name, balance) VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(&record.id)
        .bind(&record.email)
        .bind(&record.display_name)
        .bind(record.balance)
        .execute(&self.pool)
        .await
        .map_err(sync_error_from_sqlx)?
        .rows_affected();

        if inserted == 0 {
            tracing::debug!(user_id = %record.id, "user record already present");
        }

        self.get_user_by_id(&record.id)
            .await?
            .ok_or_else(|| SyncError::Rejected(format!("user {} vanished after upsert", record.id)))
    }
}

pub(crate) fn user_from_row(row: &PgRow) -> ApplicationUserRecord {
    ApplicationUserRecord {
        id: row.get("id"),
        email: row.get("email"),
        display_name: row.get("display_name"),
        balance: row.get("balance"),
        created_at: row.get("created_at"),
    }
}

/// Connection-level failures are retryable; anything the database itself
/// answered is a rejection.
pub(crate) fn sync_error_from_sqlx(err: sqlx::Error) -> SyncError {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => SyncError::Unreachable(err.to_string()),
        sqlx::Error::Database(db) => SyncError::Rejected(db.message().to_owned()),
        other => SyncError::Rejected(other.to_string()),
    }
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;
