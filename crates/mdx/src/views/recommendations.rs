use std::fmt::Write;

use melodex::{recommendation::Feed, song::SpotifySong};

use super::{
    View,
    search::{add_row, spotify_table},
};
use crate::shell::{
    data::Data,
    render::{heading, list},
    router::Route,
    view::ListView,
};

pub struct RecommendationsView {
    feed: Feed,
    songs: ListView<SpotifySong>,
}

impl Default for RecommendationsView {
    fn default() -> Self {
        Self {
            feed: Feed::SongLatest,
            songs: ListView::default(),
        }
    }
}

fn feed_names() -> String {
    Feed::NAMED
        .iter()
        .map(Feed::name)
        .collect::<Vec<_>>()
        .join(", ")
}

impl View for RecommendationsView {
    const COMMANDS: &'static [(&'static str, &'static str)] = &[
        ("feed <name>", "switch feed"),
        ("add <n>", "add song n to your library"),
        ("find <text>", "filter the feed"),
    ];

    async fn mount(&mut self, data: &Data) {
        self.load(data).await;
    }

    async fn handle(&mut self, data: &Data, cmd: &str, args: &str) -> bool {
        match cmd {
            "feed" => match Feed::from_name(args.trim()) {
                Some(feed) => {
                    self.feed = feed;
                    self.load(data).await;
                }
                None => data
                    .toasts
                    .warn(format!("Unknown feed. Try one of: {}.", feed_names())),
            },
            "add" => add_row(data, &mut self.songs, args).await,
            "find" => self.songs.set_query(args),
            _ => return false,
        }
        true
    }

    fn render(&self, _data: &Data) -> String {
        let mut out = String::new();
        heading(&mut out, Route::Recommendations.title());
        writeln!(out, "{} [{}]", self.feed.describe(), self.feed.name()).ok();
        list(&mut out, &self.songs, "No recommendations found.", spotify_table);
        writeln!(out, "\nFeeds: {}", feed_names()).ok();
        out
    }
}

impl RecommendationsView {
    async fn load(&mut self, data: &Data) {
        self.songs
            .load(
                data,
                "fetching song recommendations",
                data.client.recommendations(self.feed),
            )
            .await;
    }
}
