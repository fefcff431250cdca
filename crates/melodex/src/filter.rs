//! Client-side search over an already fetched collection. Never touches the
//! network.

use crate::{
    analysis::{DailyAverage, RatedSong},
    friend::{Friend, UserInfo},
    playlist::Playlist,
    rating::{Performer, PerformerRating, SongRating},
    song::{Song, SpotifySong},
};

pub trait Filterable {
    /// `needle` is already lowercased and non-empty.
    fn matches(&self, needle: &str) -> bool;
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Items whose view-specific text fields contain `query`, ignoring case. An
/// empty query keeps everything.
pub fn filter<'a, T: Filterable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items.iter().filter(|item| item.matches(&needle)).collect()
}

impl Filterable for Song {
    fn matches(&self, needle: &str) -> bool {
        contains(&self.title, needle)
            || self.performers.iter().any(|p| contains(&p.name, needle))
            || contains(&self.album, needle)
    }
}

impl Filterable for SpotifySong {
    fn matches(&self, needle: &str) -> bool {
        contains(&self.title, needle)
            || self.performer.iter().any(|p| contains(&p.name, needle))
            || contains(&self.album.name, needle)
    }
}

impl Filterable for SongRating {
    fn matches(&self, needle: &str) -> bool {
        self.song_info
            .as_ref()
            .is_some_and(|s| contains(&s.title, needle) || contains(&s.album, needle))
    }
}

impl Filterable for Performer {
    fn matches(&self, needle: &str) -> bool {
        contains(&self.name, needle)
    }
}

impl Filterable for PerformerRating {
    fn matches(&self, needle: &str) -> bool {
        self.performer_info.matches(needle)
    }
}

impl Filterable for UserInfo {
    fn matches(&self, needle: &str) -> bool {
        contains(&self.name, needle) || contains(self.handle(), needle)
    }
}

impl Filterable for Friend {
    fn matches(&self, needle: &str) -> bool {
        self.friend_info.matches(needle)
    }
}

impl Filterable for Playlist {
    fn matches(&self, needle: &str) -> bool {
        contains(&self.name, needle)
    }
}

impl Filterable for RatedSong {
    fn matches(&self, needle: &str) -> bool {
        self.song.matches(needle)
    }
}

impl Filterable for DailyAverage {
    fn matches(&self, needle: &str) -> bool {
        self.date.contains(needle)
    }
}
