//! PostgreSQL implementation of SongRepository

use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool};
use tracing::instrument;
use uuid::Uuid;

use songbook_core::entities::Song;
use songbook_core::traits::{RepoResult, SongRepository};
use songbook_core::value_objects::{AccountId, SongId};

use crate::models::SongModel;

use super::error::{map_db_error, map_insert_error};

/// Delete every song owned by `owner` on the given executor.
///
/// Shared with the account purge so the cascade can run inside its transaction.
pub(crate) async fn delete_songs_owned_by<'e, E>(executor: E, owner: Uuid) -> RepoResult<u64>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM songs WHERE created_by = $1")
        .bind(owner)
        .execute(executor)
        .await
        .map_err(map_db_error)?;

    Ok(result.rows_affected())
}

/// PostgreSQL implementation of SongRepository
#[derive(Clone)]
pub struct PgSongRepository {
    pool: PgPool,
}

impl PgSongRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SongRepository for PgSongRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: SongId) -> RepoResult<Option<Song>> {
        let result = sqlx::query_as::<_, SongModel>(
            r"
            SELECT id, title, artist, lyrics, chords, created_by, created_at
            FROM songs
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Song::from))
    }

    #[instrument(skip(self))]
    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<Song>> {
        let rows = sqlx::query_as::<_, SongModel>(
            r"
            SELECT id, title, artist, lyrics, chords, created_by, created_at
            FROM songs
            ORDER BY created_at DESC, id
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Song::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_owner(&self, account_id: AccountId) -> RepoResult<Vec<Song>> {
        let rows = sqlx::query_as::<_, SongModel>(
            r"
            SELECT id, title, artist, lyrics, chords, created_by, created_at
            FROM songs
            WHERE created_by = $1
            ORDER BY created_at DESC, id
            ",
        )
        .bind(account_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Song::from).collect())
    }

    #[instrument(skip(self, song), fields(song_id = %song.id, owner = %song.created_by))]
    async fn create(&self, song: &Song) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO songs (id, title, artist, lyrics, chords, created_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(song.id.into_inner())
        .bind(&song.title)
        .bind(&song.artist)
        .bind(&song.lyrics)
        .bind(&song.chords)
        .bind(song.created_by.into_inner())
        .bind(song.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, song.created_by))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_all_owned_by(&self, account_id: AccountId) -> RepoResult<u64> {
        delete_songs_owned_by(&self.pool, account_id.into_inner()).await
    }
}
