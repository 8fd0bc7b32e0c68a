//! Song entity <-> model mapper

use songbook_core::entities::Song;
use songbook_core::value_objects::{AccountId, SongId};

use crate::models::SongModel;

impl From<SongModel> for Song {
    fn from(model: SongModel) -> Self {
        Song {
            id: SongId::from_uuid(model.id),
            title: model.title,
            artist: model.artist,
            lyrics: model.lyrics,
            chords: model.chords,
            created_by: AccountId::from_uuid(model.created_by),
            created_at: model.created_at,
        }
    }
}
