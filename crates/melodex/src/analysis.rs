use std::cmp::Ordering;

use crate::{Melodex, MelodexError, song::Song};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

const ANALYSIS: &str = "analysis";
const BY_DECADE: &str = const_format::formatcp!("{ANALYSIS}/getTopRatedSongsByDecade");
const LAST_MONTHS: &str = const_format::formatcp!("{ANALYSIS}/getTopRatedSongsFromLastMonths");
const DAILY_AVERAGE: &str = const_format::formatcp!("{ANALYSIS}/getDailyAverageRating");

pub const DECADES: [u16; 7] = [2020, 2010, 2000, 1990, 1980, 1970, 1960];
pub const MONTH_WINDOWS: [u32; 5] = [1, 2, 3, 6, 12];
pub const SHARE_LIMIT: usize = 5;
const TWEET_INTENT: &str = "https://twitter.com/intent/tweet";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingValue {
    #[serde(rename = "Rating")]
    pub rating: u8,
}

/// A library song together with the ratings that put it in a top list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatedSong {
    #[serde(flatten)]
    pub song: Song,
    #[serde(rename = "SongRatingInfo", default)]
    pub ratings: Vec<RatingValue>,
    #[serde(rename = "DateAdded", default)]
    pub date_added: Option<String>,
}

impl RatedSong {
    pub fn first_rating(&self) -> u8 {
        self.ratings.first().map(|r| r.rating).unwrap_or(0)
    }

    fn added_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(self.date_added.as_deref()?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAverage {
    pub date: String,
    pub average_rating: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    DateAdded,
    Rating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: SortColumn,
    pub ascending: bool,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            column: SortColumn::DateAdded,
            ascending: false,
        }
    }
}

impl SortOrder {
    /// Clicking a column header: the same column flips direction, a new
    /// column starts ascending.
    pub fn toggle(self, column: SortColumn) -> Self {
        let ascending = !(self.column == column && self.ascending);
        Self { column, ascending }
    }

    pub fn apply(self, songs: &mut [RatedSong]) {
        songs.sort_by(|a, b| {
            let ord = match self.column {
                SortColumn::Rating => a.first_rating().cmp(&b.first_rating()),
                SortColumn::DateAdded => a.added_at().cmp(&b.added_at()),
            };
            if self.ascending { ord } else { ord.reverse() }
        });
    }
}

pub(crate) fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Text for sharing the top of a list, e.g. "from the 1980s!".
pub fn share_text(scope: &str, songs: &[RatedSong]) -> String {
    let mut text = String::from("Check out my favourite songs ");
    if songs.is_empty() {
        text.push_str("No songs to display.");
        return text;
    }

    text.push_str(scope);
    text.push_str("\n\n");
    for (i, rated) in songs.iter().take(SHARE_LIMIT).enumerate() {
        text.push_str(&format!(
            "{}) {} ~ {}\n",
            i + 1,
            rated.song.title,
            rated.song.performer_names()
        ));
    }
    text
}

pub fn tweet_url(text: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(text.as_bytes()).collect();
    format!("{TWEET_INTENT}?text={encoded}")
}

/// Largest first; ties keep server order.
pub fn peak(averages: &[DailyAverage]) -> Option<&DailyAverage> {
    averages.iter().fold(None, |best: Option<&DailyAverage>, d| match best {
        Some(b) if b.average_rating.partial_cmp(&d.average_rating) != Some(Ordering::Less) => {
            Some(b)
        }
        _ => Some(d),
    })
}

impl Melodex {
    pub async fn top_rated_by_decade(
        &self,
        decade: u16,
        count: u32,
    ) -> Result<Vec<RatedSong>, MelodexError> {
        self.fetch_list(
            self.post(BY_DECADE)?
                .json(&json!({ "decade": decade, "count": count })),
        )
        .await
    }

    pub async fn top_rated_from_last_months(
        &self,
        months: u32,
    ) -> Result<Vec<RatedSong>, MelodexError> {
        self.fetch_list(self.post(LAST_MONTHS)?.json(&json!({ "month": months })))
            .await
    }

    pub async fn daily_average_rating(&self, days: u32) -> Result<Vec<DailyAverage>, MelodexError> {
        self.fetch_list(self.post(DAILY_AVERAGE)?.json(&json!({ "day": days })))
            .await
    }
}
