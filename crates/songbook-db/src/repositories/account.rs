//! PostgreSQL implementation of AccountRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use songbook_core::entities::Account;
use songbook_core::error::DomainError;
use songbook_core::traits::{AccountRepository, ProfileUpdate, PurgeOutcome, RepoResult};
use songbook_core::value_objects::AccountId;

use crate::models::{AccountModel, ACCOUNT_COLUMNS};

use super::error::{map_db_error, map_insert_error};
use super::song::delete_songs_owned_by;

/// PostgreSQL implementation of AccountRepository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    /// Create a new PgAccountRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_by(
        &self,
        column: &str,
        bind: AccountLookup<'_>,
    ) -> RepoResult<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE {column} = $1");
        let query = sqlx::query_as::<_, AccountModel>(&sql);
        let query = match bind {
            AccountLookup::Id(id) => query.bind(id),
            AccountLookup::Email(email) => query.bind(email),
        };

        query
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?
            .map(Account::try_from)
            .transpose()
    }
}

enum AccountLookup<'a> {
    Id(Uuid),
    Email(&'a str),
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: AccountId) -> RepoResult<Option<Account>> {
        self.fetch_one_by("id", AccountLookup::Id(id.into_inner()))
            .await
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>> {
        self.fetch_one_by("email", AccountLookup::Email(email)).await
    }

    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self, account, password_hash), fields(account_id = %account.id))]
    async fn create(&self, account: &Account, password_hash: Option<&str>) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO accounts (id, email, username, password_hash, provider, picture_url,
                                  is_blocked, is_admin, delete_requested_at, purge_deadline,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(account.id.into_inner())
        .bind(&account.email)
        .bind(&account.username)
        .bind(password_hash)
        .bind(account.provider.as_str())
        .bind(&account.picture_url)
        .bind(account.is_blocked)
        .bind(account.is_admin)
        .bind(account.delete_requested_at)
        .bind(account.purge_deadline)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, account.id))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, id: AccountId) -> RepoResult<Option<String>> {
        let hash = sqlx::query_scalar::<_, Option<String>>(
            "SELECT password_hash FROM accounts WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(hash.flatten())
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(
        &self,
        id: AccountId,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE accounts
            SET password_hash = $2, updated_at = $3
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .bind(password_hash)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::AccountNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<Account>> {
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY created_at, id LIMIT $1 OFFSET $2"
        );

        sqlx::query_as::<_, AccountModel>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(Account::try_from)
            .collect()
    }

    #[instrument(skip(self, update))]
    async fn update_profile(
        &self,
        id: AccountId,
        update: &ProfileUpdate,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<Account>> {
        let sql = format!(
            r"
            UPDATE accounts
            SET username = COALESCE($2, username),
                picture_url = COALESCE($3, picture_url),
                updated_at = $4
            WHERE id = $1
            RETURNING {ACCOUNT_COLUMNS}
            "
        );

        sqlx::query_as::<_, AccountModel>(&sql)
            .bind(id.into_inner())
            .bind(update.username.as_deref())
            .bind(update.picture_url.as_deref())
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?
            .map(Account::try_from)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn set_blocked(
        &self,
        id: AccountId,
        blocked: bool,
        now: DateTime<Utc>,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE accounts
            SET is_blocked = $2, updated_at = $3
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .bind(blocked)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn request_deletion(
        &self,
        id: AccountId,
        requested_at: DateTime<Utc>,
        purge_deadline: DateTime<Utc>,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE accounts
            SET delete_requested_at = $2, purge_deadline = $3, updated_at = $2
            WHERE id = $1 AND delete_requested_at IS NULL
            ",
        )
        .bind(id.into_inner())
        .bind(requested_at)
        .bind(purge_deadline)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn cancel_deletion(&self, id: AccountId, now: DateTime<Utc>) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE accounts
            SET delete_requested_at = NULL, purge_deadline = NULL, updated_at = $2
            WHERE id = $1 AND purge_deadline IS NOT NULL
            ",
        )
        .bind(id.into_inner())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn find_purge_candidates(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> RepoResult<Vec<AccountId>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r"
            SELECT id FROM accounts
            WHERE purge_deadline IS NOT NULL AND purge_deadline <= $1
            ORDER BY purge_deadline
            LIMIT $2
            ",
        )
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ids.into_iter().map(AccountId::from_uuid).collect())
    }

    #[instrument(skip(self))]
    async fn purge_if_due(&self, id: AccountId, now: DateTime<Utc>) -> RepoResult<PurgeOutcome> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Re-check the predicate under a row lock; a cancel that committed
        // after the candidate snapshot makes this match nothing.
        let claimed = sqlx::query_scalar::<_, Uuid>(
            r"
            SELECT id FROM accounts
            WHERE id = $1 AND purge_deadline IS NOT NULL AND purge_deadline <= $2
            FOR UPDATE
            ",
        )
        .bind(id.into_inner())
        .bind(now)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if claimed.is_none() {
            tx.rollback().await.map_err(map_db_error)?;
            debug!(account_id = %id, "Purge candidate no longer due");
            return Ok(PurgeOutcome::NotClaimed);
        }

        let songs_deleted = delete_songs_owned_by(&mut *tx, id.into_inner()).await?;

        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(PurgeOutcome::Purged { songs_deleted })
    }

    async fn ping(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}
