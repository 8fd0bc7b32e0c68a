//! PostgreSQL implementation of VerificationCodeRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use songbook_core::entities::VerificationCode;
use songbook_core::traits::{RepoResult, VerificationCodeRepository};

use super::error::map_db_error;

/// PostgreSQL implementation of VerificationCodeRepository
#[derive(Clone)]
pub struct PgVerificationCodeRepository {
    pool: PgPool,
}

impl PgVerificationCodeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VerificationCodeRepository for PgVerificationCodeRepository {
    #[instrument(skip(self, code), fields(email = %code.email))]
    async fn create(&self, code: &VerificationCode) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO verification_codes (id, email, code, expires_at, used, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(code.id.into_inner())
        .bind(&code.email)
        .bind(&code.code)
        .bind(code.expires_at)
        .bind(code.used)
        .bind(code.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, code))]
    async fn redeem(&self, email: &str, code: &str, now: DateTime<Utc>) -> RepoResult<bool> {
        // Single statement: the row lock taken by the subquery makes a
        // concurrent redeem of the same row skip it and match nothing.
        let redeemed = sqlx::query_scalar::<_, Uuid>(
            r"
            UPDATE verification_codes
            SET used = TRUE
            WHERE id = (
                SELECT id FROM verification_codes
                WHERE email = $1 AND code = $2 AND used = FALSE AND expires_at > $3
                ORDER BY created_at DESC
                LIMIT 1
                FOR UPDATE SKIP LOCKED
            )
            AND used = FALSE
            RETURNING id
            ",
        )
        .bind(email)
        .bind(code)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(redeemed.is_some())
    }
}
