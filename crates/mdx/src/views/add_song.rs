use std::fmt::Write;

use melodex::validate::{CustomSongForm, ValidationErrors};

use super::{ADD_SONG, View, first_word};
use crate::shell::{data::Data, render::heading, router::Route};

const FIELDS: [(&str, &str); 6] = [
    ("title", "Track Name"),
    ("performers", "Performer Name(s)"),
    ("album", "Album Name"),
    ("length", "Length (ms)"),
    ("genres", "Genre(s)"),
    ("release_date", "Release Date"),
];

#[derive(Default)]
pub struct AddSongView {
    form: CustomSongForm,
    errors: ValidationErrors,
}

impl AddSongView {
    fn field_mut(&mut self, field: &str) -> Option<&mut String> {
        let form = &mut self.form;
        Some(match field {
            "title" => &mut form.title,
            "performers" => &mut form.performers,
            "album" => &mut form.album,
            "length" => &mut form.length,
            "genres" => &mut form.genres,
            "release_date" | "released" => &mut form.release_date,
            _ => return None,
        })
    }

    fn field(&self, field: &str) -> &str {
        let form = &self.form;
        match field {
            "title" => &form.title,
            "performers" => &form.performers,
            "album" => &form.album,
            "length" => &form.length,
            "genres" => &form.genres,
            _ => &form.release_date,
        }
    }

    async fn submit(&mut self, data: &Data) {
        let song = match self.form.validate() {
            Ok(song) => song,
            Err(errors) => {
                tracing::debug!(%errors, "add song form rejected");
                self.errors = errors;
                return;
            }
        };
        self.errors = ValidationErrors::default();

        data.toasts.info(ADD_SONG.pending);
        match data.client.add_custom_song(&song).await {
            Ok(()) => {
                data.toasts.success(ADD_SONG.done);
                self.form = CustomSongForm::default();
            }
            Err(e) => data.fail(&e, ADD_SONG.action),
        }
    }
}

impl View for AddSongView {
    const COMMANDS: &'static [(&'static str, &'static str)] = &[
        ("set <field> <value>", "fields: title performers album length genres release_date"),
        ("clear", "empty the form"),
        ("submit", "add the song to your library"),
    ];

    async fn mount(&mut self, _data: &Data) {}

    async fn handle(&mut self, data: &Data, cmd: &str, args: &str) -> bool {
        match cmd {
            "set" => {
                let (field, value) = first_word(args);
                match self.field_mut(field) {
                    Some(slot) => *slot = value.to_string(),
                    None => data.toasts.warn(format!("Unknown field `{field}`.")),
                }
            }
            "clear" => *self = Self::default(),
            "submit" => self.submit(data).await,
            _ => return false,
        }
        true
    }

    fn render(&self, _data: &Data) -> String {
        let mut out = String::new();
        heading(&mut out, Route::AddSong.title());
        for (field, label) in FIELDS {
            writeln!(out, "{label:<18} {}", self.field(field)).ok();
            if let Some(message) = self.errors.field(field) {
                writeln!(out, "{:<18} ^ {message}", "").ok();
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::{Value, json};

    use super::*;
    use crate::testing::{Harness, serve};

    async fn fill(view: &mut AddSongView, data: &Data) {
        for args in [
            "title Blinding Lights",
            "performers The Weeknd",
            "album After Hours",
            "length 200040",
            "genres synthwave, pop",
            "release_date 2019-11-29",
        ] {
            view.handle(data, "set", args).await;
        }
    }

    #[tokio::test]
    async fn bad_fields_stay_inline() {
        let mut h = Harness::new("http://127.0.0.1:9");
        let mut view = AddSongView::default();
        fill(&mut view, &h.data).await;
        view.handle(&h.data, "set", "length -5").await;
        view.handle(&h.data, "set", "released 2019/11/29").await;
        view.handle(&h.data, "submit", "").await;

        let text = view.render(&h.data);
        assert!(text.contains("^ Length should be a positive number"));
        assert!(text.contains("^ Release Date should be in the format YYYY-MM-DD"));
        assert!(h.toasts().is_empty());
    }

    #[tokio::test]
    async fn submits_and_clears() {
        let body = Arc::new(Mutex::new(Value::Null));
        let seen = body.clone();
        let router = Router::new().route(
            "/song/addCustomSong",
            post(move |Json(b): Json<Value>| {
                *seen.lock().unwrap() = b;
                async { StatusCode::OK }
            }),
        );
        let mut h = Harness::new(&serve(router).await);
        let mut view = AddSongView::default();
        fill(&mut view, &h.data).await;
        view.handle(&h.data, "submit", "").await;

        assert_eq!(
            *body.lock().unwrap(),
            json!({
                "title": "Blinding Lights",
                "performers": "The Weeknd",
                "album": "After Hours",
                "length": 200040,
                "genres": "synthwave, pop",
                "releaseDate": "2019-11-29"
            })
        );
        assert_eq!(h.messages(), ["Adding song...", "Song added successfully."]);
        assert_eq!(view.form.title, "");
    }
}
