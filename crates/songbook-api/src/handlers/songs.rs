//! Song handlers

use axum::{extract::State, Json};
use songbook_service::dto::{CreateSongRequest, PageQuery, PageResponse, SongResponse};
use songbook_service::SongService;

use crate::extractors::{AuthUser, ValidatedJson, ValidatedQuery};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Create a song. Refused while the account is pending deletion.
///
/// POST /songs
pub async fn create_song(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateSongRequest>,
) -> ApiResult<Created<Json<SongResponse>>> {
    let service = SongService::new(state.service_context());
    let response = service.create_song(&auth, request).await?;
    Ok(Created(Json(response)))
}

/// GET /songs?limit=&offset=
pub async fn list_songs(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> ApiResult<Json<PageResponse<SongResponse>>> {
    let service = SongService::new(state.service_context());
    let songs = service.list_songs(&query).await?;
    Ok(Json(PageResponse {
        data: songs,
        limit: query.limit(),
        offset: query.offset(),
    }))
}

/// GET /songs/my
pub async fn list_my_songs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<SongResponse>>> {
    let service = SongService::new(state.service_context());
    let songs = service.list_own_songs(&auth).await?;
    Ok(Json(songs))
}
