use crate::{
    Melodex, MelodexError,
    id::{PerformerId, PerformerRatingId, SongId, SongRatingId},
    song::{Named, decode_images, ImageVariant},
    validate::Rating,
};
use bytes::Bytes;
use futures::Stream;
use serde::{Deserialize, Serialize};
use serde_json::json;

const SONG_RATING: &str = "rating/song";
const SONG_RATINGS: &str = const_format::formatcp!("{SONG_RATING}/get/userid");
const RATE_SONG: &str = const_format::formatcp!("{SONG_RATING}/create");
const DELETE_SONG_RATING: &str = const_format::formatcp!("{SONG_RATING}/delete/songratingid");
const RATED_PERFORMERS: &str = const_format::formatcp!("{SONG_RATING}/get/performers");
const EXPORT: &str = const_format::formatcp!("{SONG_RATING}/export/performername");

const PERFORMER_RATING: &str = "rating/performer";
const PERFORMER_RATINGS: &str = const_format::formatcp!("{PERFORMER_RATING}/get/userid");
const RATE_PERFORMER: &str = const_format::formatcp!("{PERFORMER_RATING}/create");
const DELETE_PERFORMER_RATING: &str =
    const_format::formatcp!("{PERFORMER_RATING}/delete/performerratingid");
const ALL_PERFORMERS: &str = "performer/getAllPerformers";

/// File name used when saving a ratings export.
pub const EXPORT_FILE_NAME: &str = "ratings_export.txt";

/// The song as embedded in a rating row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SongInfo {
    pub title: String,
    pub album: String,
    pub release_date: Option<String>,
    pub length: u64,
    pub image: Option<String>,
    pub performers: Vec<Named>,
}

impl SongInfo {
    pub fn cover(&self, size: usize) -> Option<ImageVariant> {
        decode_images(self.image.as_deref()?).into_iter().nth(size)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SongRating {
    #[serde(rename = "SongRatingID", default)]
    pub song_rating_id: Option<SongRatingId>,
    #[serde(rename = "SongID", default)]
    pub song_id: Option<SongId>,
    pub rating: u8,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub song_info: Option<SongInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Performer {
    #[serde(rename = "PerformerID", default)]
    pub performer_id: Option<PerformerId>,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PerformerRating {
    #[serde(rename = "PerformerRatingID")]
    pub performer_rating_id: PerformerRatingId,
    pub rating: u8,
    #[serde(default)]
    pub date: Option<String>,
    pub performer_info: Performer,
}

/// Mean of every rating the user gave `song`, to one decimal, or `"N/A"`.
pub fn average_rating(ratings: &[SongRating], song: SongId) -> String {
    let (sum, count) = ratings
        .iter()
        .filter(|r| r.song_id == Some(song))
        .fold((0u32, 0u32), |(sum, count), r| {
            (sum + u32::from(r.rating), count + 1)
        });

    if count == 0 {
        return "N/A".to_string();
    }
    // tenths rounded half up, so 4.25 shows as 4.3
    let tenths = (20 * sum + count) / (2 * count);
    format!("{}.{}", tenths / 10, tenths % 10)
}

impl Melodex {
    pub async fn song_ratings(&self) -> Result<Vec<SongRating>, MelodexError> {
        self.fetch_list(self.get(SONG_RATINGS)?).await
    }

    pub async fn rate_song(&self, song: SongId, rating: Rating) -> Result<(), MelodexError> {
        self.execute(
            self.post(RATE_SONG)?
                .json(&json!({ "songId": song, "rating": rating })),
        )
        .await
    }

    pub async fn delete_song_rating(&self, id: SongRatingId) -> Result<(), MelodexError> {
        self.execute(
            self.post(DELETE_SONG_RATING)?
                .json(&json!({ "songRatingId": id })),
        )
        .await
    }

    /// Performers that appear in the user's song ratings, for the export
    /// picker.
    pub async fn rated_performers(&self) -> Result<Vec<Performer>, MelodexError> {
        self.fetch_list(self.get(RATED_PERFORMERS)?).await
    }

    /// Plain-text export of the user's song ratings for one performer.
    pub async fn export_performer_ratings(
        &self,
        performer_name: &str,
    ) -> Result<impl Stream<Item = Result<Bytes, reqwest::Error>>, MelodexError> {
        let response = self
            .raw(
                self.post(EXPORT)?
                    .json(&json!({ "performerName": performer_name })),
            )
            .await?;
        Ok(response.bytes_stream())
    }

    pub async fn performers(&self) -> Result<Vec<Performer>, MelodexError> {
        self.fetch_list(self.get(ALL_PERFORMERS)?).await
    }

    pub async fn performer_ratings(&self) -> Result<Vec<PerformerRating>, MelodexError> {
        self.fetch_list(self.get(PERFORMER_RATINGS)?).await
    }

    pub async fn rate_performer(
        &self,
        performer: PerformerId,
        rating: Rating,
    ) -> Result<(), MelodexError> {
        self.execute(
            self.post(RATE_PERFORMER)?
                .json(&json!({ "performerId": performer, "rating": rating })),
        )
        .await
    }

    pub async fn delete_performer_rating(
        &self,
        id: PerformerRatingId,
    ) -> Result<(), MelodexError> {
        self.execute(
            self.post(DELETE_PERFORMER_RATING)?
                .json(&json!({ "performerRatingId": id })),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratings() -> Vec<SongRating> {
        serde_json::from_value(json!([
            { "SongID": 1, "Rating": 4 },
            { "SongID": 1, "Rating": 5 },
            { "SongID": 2, "Rating": 3 }
        ]))
        .unwrap()
    }

    #[test]
    fn averages_one_song() {
        assert_eq!(average_rating(&ratings(), SongId::from(1)), "4.5");
        assert_eq!(average_rating(&ratings(), SongId::from(2)), "3.0");
    }

    #[test]
    fn average_rounds_half_up() {
        let ratings: Vec<SongRating> = serde_json::from_value(json!([
            { "SongID": 1, "Rating": 4 },
            { "SongID": 1, "Rating": 4 },
            { "SongID": 1, "Rating": 4 },
            { "SongID": 1, "Rating": 5 },
            { "SongID": 2, "Rating": 1 },
            { "SongID": 2, "Rating": 2 },
            { "SongID": 2, "Rating": 2 }
        ]))
        .unwrap();
        assert_eq!(average_rating(&ratings, SongId::from(1)), "4.3");
        assert_eq!(average_rating(&ratings, SongId::from(2)), "1.7");
    }

    #[test]
    fn unrated_song() {
        assert_eq!(average_rating(&ratings(), SongId::from(9)), "N/A");
        assert_eq!(average_rating(&[], SongId::from(1)), "N/A");
    }

    #[test]
    fn decodes_performer_rating() {
        let rating: PerformerRating = serde_json::from_value(json!({
            "PerformerRatingID": 3,
            "Rating": 5,
            "Date": "2024-01-02T10:00:00.000Z",
            "PerformerInfo": { "PerformerID": 8, "Name": "Queen", "Image": null }
        }))
        .unwrap();
        assert_eq!(rating.performer_info.name, "Queen");
        assert_eq!(rating.performer_info.performer_id, Some(PerformerId::from(8)));
    }
}
