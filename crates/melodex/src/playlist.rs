use crate::{
    Melodex, MelodexError,
    id::{PlaylistId, SongId},
    song::Song,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

const PLAYLIST: &str = "playlist";
const ALL_PLAYLISTS: &str = const_format::formatcp!("{PLAYLIST}/getAllUserPlaylists");
const CREATE: &str = const_format::formatcp!("{PLAYLIST}/createPlaylist");
const SONGS_TO_ADD: &str = const_format::formatcp!("{PLAYLIST}/getSongsToAdd");
const ADD_SONGS: &str = const_format::formatcp!("{PLAYLIST}/addSongsToPlaylist");
const DELETE_SONG: &str = const_format::formatcp!("{PLAYLIST}/deleteSongFromPlaylist");
const DELETE: &str = const_format::formatcp!("{PLAYLIST}/deletePlaylist");

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Playlist {
    #[serde(rename = "PlaylistID")]
    pub playlist_id: PlaylistId,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub date_added: Option<String>,
    /// In the order they were added.
    #[serde(default)]
    pub songs: Vec<Song>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewPlaylist {
    #[serde(rename = "playlistName")]
    pub name: String,
    #[serde(rename = "playlistImage")]
    pub image: String,
    #[serde(rename = "songIDs")]
    pub songs: Vec<SongId>,
}

impl Melodex {
    pub async fn playlists(&self) -> Result<Vec<Playlist>, MelodexError> {
        self.fetch_list(self.get(ALL_PLAYLISTS)?).await
    }

    pub async fn create_playlist(&self, playlist: &NewPlaylist) -> Result<(), MelodexError> {
        self.execute(self.post(CREATE)?.json(playlist)).await
    }

    /// Library songs that are not in `playlist` yet.
    pub async fn songs_to_add(&self, playlist: PlaylistId) -> Result<Vec<Song>, MelodexError> {
        self.fetch_list(self.post(SONGS_TO_ADD)?.json(&json!({ "playlistID": playlist })))
            .await
    }

    pub async fn add_songs_to_playlist(
        &self,
        playlist: PlaylistId,
        songs: &[SongId],
    ) -> Result<(), MelodexError> {
        self.execute(
            self.post(ADD_SONGS)?
                .json(&json!({ "playlistID": playlist, "songIDs": songs })),
        )
        .await
    }

    pub async fn delete_song_from_playlist(
        &self,
        playlist: PlaylistId,
        song: SongId,
    ) -> Result<(), MelodexError> {
        self.execute(
            self.post(DELETE_SONG)?
                .json(&json!({ "playlistID": playlist, "songID": song })),
        )
        .await
    }

    pub async fn delete_playlist(&self, playlist: PlaylistId) -> Result<(), MelodexError> {
        self.execute(self.post(DELETE)?.json(&json!({ "playlistID": playlist })))
            .await
    }
}
