use melodex::{
    MelodexError,
    format::{convert_to_minutes, readable_date},
    rating::{SongRating, average_rating},
    song::Song,
    validate::Rating,
};

use super::{View, first_word, number, row};
use crate::shell::{
    data::Data,
    render::{Table, heading, list},
    router::Route,
    view::{Labels, ListView},
};

const RATE: Labels = Labels {
    pending: "Rating song...",
    done: "Song rated successfully.",
    action: "rating song",
};

const REMOVE: Labels = Labels {
    pending: "Removing song...",
    done: "Song removed successfully.",
    action: "removing song",
};

#[derive(Default)]
pub struct LibraryView {
    songs: ListView<Song>,
    ratings: Vec<SongRating>,
}

impl View for LibraryView {
    const COMMANDS: &'static [(&'static str, &'static str)] = &[
        ("find <text>", "filter by title, performer or album"),
        ("rate <n> <1-5>", "rate song n"),
        ("remove <n>", "remove song n from your library"),
    ];

    async fn mount(&mut self, data: &Data) {
        self.songs
            .load(data, "fetching songs", data.client.user_songs())
            .await;
        self.load_ratings(data).await;
    }

    async fn handle(&mut self, data: &Data, cmd: &str, args: &str) -> bool {
        match cmd {
            "find" => self.songs.set_query(args),
            "rate" => self.rate(data, args).await,
            "remove" => self.remove(data, args).await,
            _ => return false,
        }
        true
    }

    fn render(&self, _data: &Data) -> String {
        let mut out = String::new();
        heading(&mut out, Route::Library.title());
        list(&mut out, &self.songs, "No songs found.", |songs| {
            let mut table = Table::new(&[
                "Title",
                "Performer",
                "Album",
                "Genres",
                "Length",
                "Released",
                "Avg",
            ]);
            for song in songs {
                table.row([
                    song.title.clone(),
                    song.performer_names(),
                    song.album.clone(),
                    song.genre_names(),
                    convert_to_minutes(song.length),
                    song.release_date
                        .as_deref()
                        .map(readable_date)
                        .unwrap_or_default(),
                    average_rating(&self.ratings, song.song_id),
                ]);
            }
            table.render()
        });
        out
    }
}

impl LibraryView {
    async fn load_ratings(&mut self, data: &Data) {
        match data.client.song_ratings().await {
            Ok(ratings) => self.ratings = ratings,
            Err(e) => data.fail(&e, "fetching song ratings"),
        }
    }

    fn pick(&self, data: &Data, arg: &str) -> Option<Song> {
        row(data, &self.songs.visible(), arg).cloned()
    }

    async fn rate(&mut self, data: &Data, args: &str) {
        let (n, value) = first_word(args);
        let Some(song) = self.pick(data, n) else {
            return;
        };
        let Some(value) = number::<i64>(data, value, "rating") else {
            return;
        };
        let rating = match Rating::new(value) {
            Ok(rating) => rating,
            Err(errors) => return data.fail(&MelodexError::Validation(errors), RATE.action),
        };

        let rated = self
            .songs
            .mutate(
                data,
                &RATE,
                data.client.rate_song(song.song_id, rating),
                "fetching songs",
                || data.client.user_songs(),
            )
            .await;
        if rated {
            self.load_ratings(data).await;
        }
    }

    async fn remove(&mut self, data: &Data, args: &str) {
        let Some(song) = self.pick(data, args) else {
            return;
        };
        tracing::info!(song = %song.song_id, title = %song.title, "removing song");

        self.songs
            .mutate(
                data,
                &REMOVE,
                data.client.delete_song(song.song_id),
                "fetching songs",
                || data.client.user_songs(),
            )
            .await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use axum::{
        Json, Router,
        http::StatusCode,
        routing::{get, post},
    };
    use serde_json::{Value, json};

    use super::*;
    use crate::testing::{Harness, serve};

    fn library(song_hits: Arc<AtomicUsize>) -> Router {
        Router::new()
            .route(
                "/song/getAllUserSongs",
                get(move || {
                    song_hits.fetch_add(1, Ordering::SeqCst);
                    async {
                        Json(json!({ "data": [
                            { "SongID": 1, "Title": "Blinding Lights", "Album": "After Hours", "Length": 200040 },
                            { "SongID": 2, "Title": "Moth To Flame", "Album": "Dawn FM" }
                        ] }))
                    }
                }),
            )
            .route(
                "/rating/song/get/userid",
                get(|| async {
                    Json(json!({ "data": [
                        { "SongID": 1, "Rating": 4 },
                        { "SongID": 1, "Rating": 5 }
                    ] }))
                }),
            )
    }

    #[tokio::test]
    async fn shows_average_rating_per_song() {
        let mut h = Harness::new(&serve(library(Arc::default())).await);
        let mut view = LibraryView::default();
        view.mount(&h.data).await;

        let text = view.render(&h.data);
        let blinding = text.lines().find(|l| l.contains("Blinding Lights")).unwrap();
        assert!(blinding.contains("3:20"));
        assert!(blinding.trim_end().ends_with("4.5"));
        let moth = text.lines().find(|l| l.contains("Moth To Flame")).unwrap();
        assert!(moth.trim_end().ends_with("N/A"));
        assert!(h.toasts().is_empty());
    }

    #[tokio::test]
    async fn rows_follow_the_filter() {
        let removed = Arc::new(std::sync::Mutex::new(Value::Null));
        let seen = removed.clone();
        let router = library(Arc::default()).route(
            "/song/deleteSong/User",
            post(move |Json(body): Json<Value>| {
                *seen.lock().unwrap() = body;
                async { StatusCode::OK }
            }),
        );
        let h = Harness::new(&serve(router).await);
        let mut view = LibraryView::default();
        view.mount(&h.data).await;

        view.handle(&h.data, "find", "dawn").await;
        view.handle(&h.data, "remove", "1").await;
        assert_eq!(*removed.lock().unwrap(), json!({ "songId": 2 }));
    }

    #[tokio::test]
    async fn out_of_range_rating_is_never_sent() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut h = Harness::new(&serve(library(hits.clone())).await);
        let mut view = LibraryView::default();
        view.mount(&h.data).await;
        h.toasts();

        view.handle(&h.data, "rate", "1 9").await;
        assert_eq!(
            h.messages(),
            ["Please select a rating between 1 and 5."]
        );
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
