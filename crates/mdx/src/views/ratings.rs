use std::fmt::Write;

use melodex::{
    MelodexError,
    format::{readable_date, stars},
    rating::{Performer, PerformerRating, SongRating},
    validate::Rating,
};

use super::{View, first_word, number, row};
use crate::shell::{
    data::Data,
    render::{Table, heading, list},
    router::Route,
    view::{Labels, ListView},
};

const ADD_RATING: Labels = Labels {
    pending: "Adding rating...",
    done: "Rating added successfully.",
    action: "adding rating",
};

const RATE_SONG: Labels = Labels {
    pending: "Rating song...",
    done: "Song rated successfully.",
    action: "rating song",
};

const DELETE_RATING: Labels = Labels {
    pending: "Deleting rating...",
    done: "Rating deleted successfully.",
    action: "deleting rating",
};

fn parse_rating(data: &Data, arg: &str, action: &str) -> Option<Rating> {
    let value = number::<i64>(data, arg, "rating")?;
    match Rating::new(value) {
        Ok(rating) => Some(rating),
        Err(errors) => {
            data.fail(&MelodexError::Validation(errors), action);
            None
        }
    }
}

fn date(date: Option<&str>) -> String {
    date.map(readable_date).unwrap_or_default()
}

#[derive(Default)]
pub struct SongRatingsView {
    ratings: ListView<SongRating>,
}

impl View for SongRatingsView {
    const COMMANDS: &'static [(&'static str, &'static str)] = &[
        ("find <text>", "filter by title or album"),
        ("rate <n> <1-5>", "change the rating in row n"),
        ("delete <n>", "delete the rating in row n"),
    ];

    async fn mount(&mut self, data: &Data) {
        self.ratings
            .load(data, "fetching song ratings", data.client.song_ratings())
            .await;
    }

    async fn handle(&mut self, data: &Data, cmd: &str, args: &str) -> bool {
        match cmd {
            "find" => self.ratings.set_query(args),
            "rate" => self.rate(data, args).await,
            "delete" => self.delete(data, args).await,
            _ => return false,
        }
        true
    }

    fn render(&self, _data: &Data) -> String {
        let mut out = String::new();
        heading(&mut out, Route::SongRatings.title());
        list(&mut out, &self.ratings, "No ratings found.", |ratings| {
            let mut table = Table::new(&["Title", "Performer", "Album", "Rating", "Date"]);
            for rating in ratings {
                let info = rating.song_info.clone().unwrap_or_default();
                let performers: Vec<&str> =
                    info.performers.iter().map(|p| p.name.as_str()).collect();
                table.row([
                    info.title.clone(),
                    performers.join(", "),
                    info.album.clone(),
                    stars(rating.rating),
                    date(rating.date.as_deref()),
                ]);
            }
            table.render()
        });
        out
    }
}

impl SongRatingsView {
    async fn rate(&mut self, data: &Data, args: &str) {
        let (n, value) = first_word(args);
        let Some(song) = row(data, &self.ratings.visible(), n).map(|r| r.song_id) else {
            return;
        };
        let Some(song) = song else {
            data.toasts.warn("Song not found.");
            return;
        };
        let Some(rating) = parse_rating(data, value, RATE_SONG.action) else {
            return;
        };

        self.ratings
            .mutate(
                data,
                &RATE_SONG,
                data.client.rate_song(song, rating),
                "fetching song ratings",
                || data.client.song_ratings(),
            )
            .await;
    }

    async fn delete(&mut self, data: &Data, args: &str) {
        let Some(id) = row(data, &self.ratings.visible(), args).map(|r| r.song_rating_id) else {
            return;
        };
        let Some(id) = id else {
            data.toasts.warn("Rating not found.");
            return;
        };

        self.ratings
            .mutate(
                data,
                &DELETE_RATING,
                data.client.delete_song_rating(id),
                "fetching song ratings",
                || data.client.song_ratings(),
            )
            .await;
    }
}

#[derive(Default)]
pub struct PerformerRatingsView {
    ratings: ListView<PerformerRating>,
    performers: ListView<Performer>,
}

impl View for PerformerRatingsView {
    const COMMANDS: &'static [(&'static str, &'static str)] = &[
        ("find <text>", "filter your performer ratings"),
        ("performers <text>", "filter the performer list"),
        ("rate <n> <1-5>", "rate performer n from the performer list"),
        ("delete <n>", "delete the rating in row n"),
    ];

    async fn mount(&mut self, data: &Data) {
        self.ratings
            .load(data, "fetching ratings", data.client.performer_ratings())
            .await;
        self.performers
            .load(data, "fetching performers", data.client.performers())
            .await;
    }

    async fn handle(&mut self, data: &Data, cmd: &str, args: &str) -> bool {
        match cmd {
            "find" => self.ratings.set_query(args),
            "performers" => self.performers.set_query(args),
            "rate" => self.rate(data, args).await,
            "delete" => self.delete(data, args).await,
            _ => return false,
        }
        true
    }

    fn render(&self, _data: &Data) -> String {
        let mut out = String::new();
        heading(&mut out, Route::PerformerRatings.title());
        list(&mut out, &self.ratings, "No ratings found.", |ratings| {
            let mut table = Table::new(&["Performer", "Rating", "Date"]);
            for rating in ratings {
                table.row([
                    rating.performer_info.name.clone(),
                    stars(rating.rating),
                    date(rating.date.as_deref()),
                ]);
            }
            table.render()
        });

        writeln!(out, "\nPerformers").ok();
        list(&mut out, &self.performers, "No performers found.", |performers| {
            let mut table = Table::new(&["Name"]);
            for performer in performers {
                table.row([performer.name.as_str()]);
            }
            table.render()
        });
        out
    }
}

impl PerformerRatingsView {
    async fn rate(&mut self, data: &Data, args: &str) {
        let (n, value) = first_word(args);
        let Some(performer) = row(data, &self.performers.visible(), n).map(|p| p.performer_id)
        else {
            return;
        };
        let Some(performer) = performer else {
            data.toasts.warn("Performer not found.");
            return;
        };
        let Some(rating) = parse_rating(data, value, ADD_RATING.action) else {
            return;
        };

        self.ratings
            .mutate(
                data,
                &ADD_RATING,
                data.client.rate_performer(performer, rating),
                "fetching ratings",
                || data.client.performer_ratings(),
            )
            .await;
    }

    async fn delete(&mut self, data: &Data, args: &str) {
        let Some(id) = row(data, &self.ratings.visible(), args).map(|r| r.performer_rating_id)
        else {
            return;
        };

        self.ratings
            .mutate(
                data,
                &DELETE_RATING,
                data.client.delete_performer_rating(id),
                "fetching ratings",
                || data.client.performer_ratings(),
            )
            .await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc, Mutex,
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

    #[tokio::test]
    async fn delete_refetches_song_ratings() {
        let fetched = Arc::new(AtomicUsize::new(0));
        let hits = fetched.clone();
        let deleted = Arc::new(Mutex::new(Value::Null));
        let seen = deleted.clone();
        let router = Router::new()
            .route(
                "/rating/song/get/userid",
                get(move || {
                    hits.fetch_add(1, Ordering::SeqCst);
                    async {
                        Json(json!({ "data": [{
                            "SongRatingID": 31, "SongID": 1, "Rating": 4,
                            "Date": "2024-03-05 14:07:00",
                            "SongInfo": { "Title": "Blinding Lights", "Album": "After Hours" }
                        }] }))
                    }
                }),
            )
            .route(
                "/rating/song/delete/songratingid",
                post(move |Json(body): Json<Value>| {
                    *seen.lock().unwrap() = body;
                    async { StatusCode::OK }
                }),
            );
        let mut h = Harness::new(&serve(router).await);
        let mut view = SongRatingsView::default();
        view.mount(&h.data).await;
        assert!(view.render(&h.data).contains("★★★★☆"));

        view.handle(&h.data, "delete", "1").await;
        assert_eq!(*deleted.lock().unwrap(), json!({ "songRatingId": 31 }));
        assert_eq!(fetched.load(Ordering::SeqCst), 2);
        assert_eq!(
            h.messages(),
            ["Deleting rating...", "Rating deleted successfully."]
        );
    }

    #[tokio::test]
    async fn rates_from_the_performer_list() {
        let body = Arc::new(Mutex::new(Value::Null));
        let seen = body.clone();
        let router = Router::new()
            .route(
                "/rating/performer/get/userid",
                get(|| async { StatusCode::NOT_FOUND }),
            )
            .route(
                "/performer/getAllPerformers",
                get(|| async {
                    Json(json!({ "data": [
                        { "PerformerID": 8, "Name": "Queen" },
                        { "PerformerID": 9, "Name": "The Weeknd" }
                    ] }))
                }),
            )
            .route(
                "/rating/performer/create",
                post(move |Json(b): Json<Value>| {
                    *seen.lock().unwrap() = b;
                    async { StatusCode::OK }
                }),
            );
        let mut h = Harness::new(&serve(router).await);
        let mut view = PerformerRatingsView::default();
        view.mount(&h.data).await;
        assert!(view.render(&h.data).contains("No ratings found."));

        view.handle(&h.data, "performers", "weeknd").await;
        view.handle(&h.data, "rate", "1 5").await;
        assert_eq!(
            *body.lock().unwrap(),
            json!({ "performerId": 9, "rating": 5 })
        );
        assert_eq!(
            h.messages(),
            ["Adding rating...", "Rating added successfully."]
        );
    }
}
