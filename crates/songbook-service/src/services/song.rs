//! Song catalog service
//!
//! Just enough of the catalog to give accounts owned content for the purge
//! cascade to remove.

use songbook_core::entities::Song;
use tracing::{info, instrument};

use crate::dto::{CreateSongRequest, PageQuery, SongResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::gate::AuthContext;

pub struct SongService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SongService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a song owned by the caller. Accounts pending deletion may not
    /// add content.
    #[instrument(skip(self, auth, request), fields(account_id = %auth.account_id))]
    pub async fn create_song(
        &self,
        auth: &AuthContext,
        request: CreateSongRequest,
    ) -> ServiceResult<SongResponse> {
        auth.require_active()?;

        let song = Song::new(
            request.title,
            request.artist,
            request.lyrics,
            request.chords,
            auth.account_id,
            self.ctx.now(),
        );
        self.ctx.song_repo().create(&song).await?;

        info!(song_id = %song.id, "Song created");
        Ok(SongResponse::from(&song))
    }

    #[instrument(skip(self))]
    pub async fn list_songs(&self, query: &PageQuery) -> ServiceResult<Vec<SongResponse>> {
        let songs = self
            .ctx
            .song_repo()
            .list(query.limit(), query.offset())
            .await?;
        Ok(songs.iter().map(SongResponse::from).collect())
    }

    #[instrument(skip(self, auth), fields(account_id = %auth.account_id))]
    pub async fn list_own_songs(&self, auth: &AuthContext) -> ServiceResult<Vec<SongResponse>> {
        let songs = self.ctx.song_repo().find_by_owner(auth.account_id).await?;
        Ok(songs.iter().map(SongResponse::from).collect())
    }
}
