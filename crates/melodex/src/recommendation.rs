use crate::{Melodex, MelodexError, song::SpotifySong};
use serde_json::json;

const RECOMMENDATION: &str = "recommendation";

/// The recommendation feeds the API offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    /// Mixed picks; the only feed that takes a result count.
    General { count: u32 },
    SongLatest,
    SongRating,
    PerformerRating,
    FriendRating,
    FriendLatest,
}

impl Feed {
    pub const NAMED: [Feed; 5] = [
        Feed::SongLatest,
        Feed::SongRating,
        Feed::PerformerRating,
        Feed::FriendRating,
        Feed::FriendLatest,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Feed::General { .. } => const_format::formatcp!("{RECOMMENDATION}/get"),
            Feed::SongLatest => const_format::formatcp!("{RECOMMENDATION}/song/latest"),
            Feed::SongRating => const_format::formatcp!("{RECOMMENDATION}/song/rating"),
            Feed::PerformerRating => const_format::formatcp!("{RECOMMENDATION}/performer/rating"),
            Feed::FriendRating => const_format::formatcp!("{RECOMMENDATION}/friend/rating"),
            Feed::FriendLatest => const_format::formatcp!("{RECOMMENDATION}/friend/latest"),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Feed::General { .. } => "general",
            Feed::SongLatest => "latest",
            Feed::SongRating => "rating",
            Feed::PerformerRating => "performer",
            Feed::FriendRating => "friend-rating",
            Feed::FriendLatest => "friend-latest",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Feed::General { .. } => "Recommended for you",
            Feed::SongLatest => "Based on your latest songs",
            Feed::SongRating => "Based on your song ratings",
            Feed::PerformerRating => "Based on your performer ratings",
            Feed::FriendRating => "Based on your friends' song ratings",
            Feed::FriendLatest => "Based on your friends' latest songs",
        }
    }

    pub fn from_name(name: &str) -> Option<Feed> {
        Feed::NAMED.into_iter().find(|f| f.name() == name)
    }
}

impl Melodex {
    pub async fn recommendations(&self, feed: Feed) -> Result<Vec<SpotifySong>, MelodexError> {
        let request = self.post(feed.path())?;
        let request = match feed {
            Feed::General { count } => request.json(&json!({ "numberOfResults": count })),
            _ => request,
        };
        self.fetch_list(request).await
    }
}
