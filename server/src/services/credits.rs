//! Inkbucks ledger: spending, refunds and the generation log.
//!
//! DESIGN
//! ======
//! A spend is a single conditional `UPDATE` so two concurrent generations
//! can never take the balance below zero; the `CHECK (balance >= 0)`
//! constraint backs this up at the schema level. A failed generation is
//! refunded with the inverse `UPDATE`.

use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum CreditError {
    #[error("no credits left")]
    Insufficient,
    #[error("user {0} has no application record")]
    UnknownUser(String),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

#[async_trait::async_trait]
pub trait CreditLedger: Send + Sync {
    /// Take one credit; returns the remaining balance.
    async fn spend(&self, user_id: &str) -> Result<i32, CreditError>;

    /// Give one credit back; returns the new balance.
    async fn refund(&self, user_id: &str) -> Result<i32, CreditError>;

    /// Record a successful generation.
    async fn record_icon(&self, user_id: &str, prompt: &str, format: &str) -> Result<Uuid, CreditError>;
}

#[derive(Clone)]
pub struct PgCreditLedger {
    pool: PgPool,
}

impl PgCreditLedger {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn user_exists(&self, user_id: &str) -> Result<bool, CreditError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}

#[async_trait::async_trait]
impl CreditLedger for PgCreditLedger {
    async fn spend(&self, user_id: &str) -> Result<i32, CreditError> {
        let remaining: Option<i32> = sqlx::query_scalar(
            "UPDATE users SET balance = balance - 1 WHERE id = $1 AND balance > 0 RETURNING balance",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match remaining {
            Some(balance) => Ok(balance),
            None if self.user_exists(user_id).await? => Err(CreditError::Insufficient),
            None => Err(CreditError::UnknownUser(user_id.to_owned())),
        }
    }

    async fn refund(&self, user_id: &str) -> Result<i32, CreditError> {
        sqlx::query_scalar("UPDATE users SET balance = balance + 1 WHERE id = $1 RETURNING balance")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CreditError::UnknownUser(user_id.to_owned()))
    }

    async fn record_icon(&self, user_id: &str, prompt: &str, format: &str) -> Result<Uuid, CreditError> {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO icons (id, user_id, prompt, format) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(user_id)
            .bind(prompt)
            .bind(format)
            .execute(&self.pool)
            .await?;
        Ok(id)
    }
}

#[cfg(test)]
#[path = "credits_test.rs"]
mod tests;
