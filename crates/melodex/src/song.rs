use crate::{
    Melodex, MelodexError,
    id::SongId,
    validate::{CustomSong, SpotifyQuery},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

const SONG: &str = "song";
const ALL_USER_SONGS: &str = const_format::formatcp!("{SONG}/getAllUserSongs");
const ADD_CUSTOM_SONG: &str = const_format::formatcp!("{SONG}/addCustomSong");
const ADD_SPOTIFY_SONG: &str = const_format::formatcp!("{SONG}/addSpotifySong");
const DELETE_SONG: &str = const_format::formatcp!("{SONG}/deleteSong/User");
const SEARCH_SPOTIFY: &str = "spotifyapi/searchSong";

/// Image sizes stored on library songs, largest first.
pub const COVER_LARGE: usize = 0;
pub const COVER_MEDIUM: usize = 1;
pub const COVER_SMALL: usize = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Named {
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageVariant {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

/// A song in the user's library.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Song {
    #[serde(rename = "SongID")]
    pub song_id: SongId,
    pub title: String,
    #[serde(default)]
    pub performers: Vec<Named>,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub genres: Vec<Named>,
    #[serde(default)]
    pub length: u64,
    #[serde(default)]
    pub release_date: Option<String>,
    /// JSON-encoded list of [`ImageVariant`]s.
    #[serde(default)]
    pub image: Option<String>,
}

impl Song {
    pub fn performer_names(&self) -> String {
        join_names(&self.performers)
    }

    pub fn genre_names(&self) -> String {
        join_names(&self.genres)
    }

    pub fn cover(&self, size: usize) -> Option<ImageVariant> {
        decode_images(self.image.as_deref()?).into_iter().nth(size)
    }
}

pub(crate) fn join_names(names: &[Named]) -> String {
    names
        .iter()
        .map(|n| n.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// The API stores cover art as a JSON string inside the JSON body. Anything
/// that does not decode is treated as "no image".
pub fn decode_images(raw: &str) -> Vec<ImageVariant> {
    serde_json::from_str(raw).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpotifyId(pub String);

impl std::fmt::Display for SpotifyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyAlbum {
    pub name: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageVariant>,
}

/// A song from the external catalog: search results and recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SpotifySong {
    pub spotify_id: SpotifyId,
    pub title: String,
    #[serde(default)]
    pub performer: Vec<SpotifyArtist>,
    pub album: SpotifyAlbum,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub length: u64,
}

impl SpotifySong {
    pub fn performer_names(&self) -> String {
        self.performer
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Melodex {
    pub async fn user_songs(&self) -> Result<Vec<Song>, MelodexError> {
        self.fetch_list(self.get(ALL_USER_SONGS)?).await
    }

    pub async fn add_custom_song(&self, song: &CustomSong) -> Result<(), MelodexError> {
        self.execute(self.post(ADD_CUSTOM_SONG)?.json(song)).await
    }

    pub async fn add_spotify_song(&self, id: &SpotifyId) -> Result<(), MelodexError> {
        self.execute(self.post(ADD_SPOTIFY_SONG)?.json(&json!({ "spotifyId": id })))
            .await
    }

    pub async fn delete_song(&self, id: SongId) -> Result<(), MelodexError> {
        self.execute(self.post(DELETE_SONG)?.json(&json!({ "songId": id })))
            .await
    }

    pub async fn search_spotify(
        &self,
        query: &SpotifyQuery,
    ) -> Result<Vec<SpotifySong>, MelodexError> {
        query.validate()?;
        self.fetch_list(self.post(SEARCH_SPOTIFY)?.json(query)).await
    }
}
