use std::fmt::Write;

use melodex::{
    MelodexError, format::convert_to_minutes, song::SpotifySong, validate::SpotifyQuery,
};

use super::{ADD_SONG, View, first_word, row};
use crate::shell::{
    data::Data,
    render::{Table, heading, list},
    router::Route,
    view::ListView,
};

pub(super) fn spotify_table(songs: &[&SpotifySong]) -> String {
    let mut table = Table::new(&["Title", "Performer", "Album", "Released", "Length"]);
    for song in songs {
        table.row([
            song.title.clone(),
            song.performer_names(),
            song.album.name.clone(),
            song.album.release_date.clone().unwrap_or_default(),
            convert_to_minutes(song.length),
        ]);
    }
    table.render()
}

/// Adds row `args` of `list` to the library.
pub(super) async fn add_row(data: &Data, list: &mut ListView<SpotifySong>, args: &str) {
    let Some(id) = row(data, &list.visible(), args).map(|s| s.spotify_id.clone()) else {
        return;
    };
    list.operate(data, &ADD_SONG, data.client.add_spotify_song(&id))
        .await;
}

#[derive(Default)]
pub struct SearchView {
    query: SpotifyQuery,
    results: ListView<SpotifySong>,
}

impl View for SearchView {
    const COMMANDS: &'static [(&'static str, &'static str)] = &[
        ("set track <name>", "track name (required)"),
        ("set performer <name>", "narrow by performer"),
        ("set album <name>", "narrow by album"),
        ("search", "search the catalog"),
        ("add <n>", "add result n to your library"),
        ("find <text>", "filter the results"),
    ];

    async fn mount(&mut self, _data: &Data) {}

    async fn handle(&mut self, data: &Data, cmd: &str, args: &str) -> bool {
        match cmd {
            "set" => {
                let (field, value) = first_word(args);
                let value = value.to_string();
                match field {
                    "track" => self.query.track_name = value,
                    "performer" => self.query.performer_name = value,
                    "album" => self.query.album_name = value,
                    _ => data.toasts.warn(format!("Unknown field `{field}`.")),
                }
            }
            "search" => self.search(data).await,
            "add" => add_row(data, &mut self.results, args).await,
            "find" => self.results.set_query(args),
            _ => return false,
        }
        true
    }

    fn render(&self, _data: &Data) -> String {
        let mut out = String::new();
        heading(&mut out, Route::SearchSong.title());
        writeln!(out, "Track      {}", self.query.track_name).ok();
        writeln!(out, "Performer  {}", self.query.performer_name).ok();
        writeln!(out, "Album      {}\n", self.query.album_name).ok();

        list(&mut out, &self.results, "No songs found.", spotify_table);
        out
    }
}

impl SearchView {
    async fn search(&mut self, data: &Data) {
        // a missing track name is a notice, not a list state
        if let Err(errors) = self.query.validate() {
            data.fail(&MelodexError::Validation(errors), "searching");
            return;
        }
        self.results
            .load(
                data,
                "fetching search results",
                data.client.search_spotify(&self.query),
            )
            .await;
    }
}
