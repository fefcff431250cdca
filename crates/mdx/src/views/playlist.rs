use std::fmt::Write;

use melodex::{
    format::{convert_to_minutes, readable_date},
    id::{PlaylistId, SongId},
    playlist::{NewPlaylist, Playlist},
    song::Song,
};

use super::{View, first_word, row};
use crate::shell::{
    data::Data,
    render::{Table, heading, list},
    router::Route,
    view::{Labels, ListView},
};

const CREATE: Labels = Labels {
    pending: "Creating playlist...",
    done: "Playlist created successfully.",
    action: "creating playlist",
};

const ADD_TO: Labels = Labels {
    pending: "Adding song to playlist...",
    done: "Song added to playlist successfully.",
    action: "adding song to playlist",
};

const DROP_FROM: Labels = Labels {
    pending: "Removing song from playlist...",
    done: "Song removed from playlist successfully.",
    action: "removing song from playlist",
};

const DELETE: Labels = Labels {
    pending: "Deleting playlist...",
    done: "Playlist deleted successfully.",
    action: "deleting playlist",
};

fn song_table(songs: &[&Song]) -> String {
    let mut table = Table::new(&["Title", "Performer", "Album", "Length"]);
    for song in songs {
        table.row([
            song.title.clone(),
            song.performer_names(),
            song.album.clone(),
            convert_to_minutes(song.length),
        ]);
    }
    table.render()
}

#[derive(Default)]
pub struct PlaylistView {
    playlists: ListView<Playlist>,
    draft: NewPlaylist,
    open: Option<PlaylistId>,
    candidates: ListView<Song>,
}

impl View for PlaylistView {
    const COMMANDS: &'static [(&'static str, &'static str)] = &[
        ("find <text>", "filter playlists by name"),
        ("set name <name>", "name for a new playlist"),
        ("set image <url>", "cover image for a new playlist"),
        ("set songs <id,id,...>", "library song ids to start with"),
        ("create", "create the playlist"),
        ("open <n>", "show playlist n"),
        ("close", "back to the playlist list"),
        ("add <n>", "add song n to the open playlist"),
        ("drop <n>", "remove song n from the open playlist"),
        ("delete <n>", "delete playlist n"),
    ];

    async fn mount(&mut self, data: &Data) {
        self.refresh(data).await;
    }

    async fn handle(&mut self, data: &Data, cmd: &str, args: &str) -> bool {
        match cmd {
            "find" => self.playlists.set_query(args),
            "set" => self.set(data, args),
            "create" => self.create(data).await,
            "open" => {
                let Some(id) = row(data, &self.playlists.visible(), args).map(|p| p.playlist_id)
                else {
                    return true;
                };
                self.open = Some(id);
                self.load_candidates(data).await;
            }
            "close" => {
                self.open = None;
                self.candidates = ListView::default();
            }
            "add" => self.add(data, args).await,
            "drop" => self.drop_song(data, args).await,
            "delete" => self.delete(data, args).await,
            _ => return false,
        }
        true
    }

    fn render(&self, _data: &Data) -> String {
        let mut out = String::new();
        heading(&mut out, Route::Playlist.title());

        if let Some(playlist) = self.opened() {
            writeln!(out, "Playlist: {}", playlist.name).ok();
            if let Some(added) = &playlist.date_added {
                writeln!(out, "Created {}", readable_date(added)).ok();
            }
            if playlist.songs.is_empty() {
                writeln!(out, "No songs in this playlist yet.").ok();
            } else {
                let songs: Vec<&Song> = playlist.songs.iter().collect();
                out.push_str(&song_table(&songs));
            }
            writeln!(out, "\nSongs you can add").ok();
            list(
                &mut out,
                &self.candidates,
                "Every library song is already in this playlist.",
                song_table,
            );
            return out;
        }

        list(&mut out, &self.playlists, "No playlists yet.", |playlists| {
            let mut table = Table::new(&["Name", "Songs", "Created"]);
            for playlist in playlists {
                table.row([
                    playlist.name.clone(),
                    playlist.songs.len().to_string(),
                    playlist
                        .date_added
                        .as_deref()
                        .map(readable_date)
                        .unwrap_or_default(),
                ]);
            }
            table.render()
        });

        writeln!(out, "\nNew playlist").ok();
        writeln!(out, "Name   {}", self.draft.name).ok();
        writeln!(out, "Image  {}", self.draft.image).ok();
        let ids: Vec<String> = self.draft.songs.iter().map(ToString::to_string).collect();
        writeln!(out, "Songs  {}", ids.join(", ")).ok();
        out
    }
}

impl PlaylistView {
    fn opened(&self) -> Option<&Playlist> {
        let id = self.open?;
        self.playlists.items().iter().find(|p| p.playlist_id == id)
    }

    async fn refresh(&mut self, data: &Data) {
        self.playlists
            .load(data, "fetching playlist data", data.client.playlists())
            .await;
        if self.open.is_some() {
            self.load_candidates(data).await;
        }
    }

    async fn load_candidates(&mut self, data: &Data) {
        let Some(id) = self.open else {
            return;
        };
        self.candidates
            .load(data, "fetching song data", data.client.songs_to_add(id))
            .await;
    }

    fn set(&mut self, data: &Data, args: &str) {
        let (field, value) = first_word(args);
        match field {
            "name" => self.draft.name = value.to_string(),
            "image" => self.draft.image = value.to_string(),
            "songs" => {
                let parsed: Result<Vec<SongId>, _> = value
                    .split(',')
                    .filter(|s| !s.trim().is_empty())
                    .map(str::parse)
                    .collect();
                match parsed {
                    Ok(songs) => self.draft.songs = songs,
                    Err(_) => data.toasts.warn("Song ids must be numbers."),
                }
            }
            _ => data.toasts.warn(format!("Unknown field `{field}`.")),
        }
    }

    async fn create(&mut self, data: &Data) {
        if self.draft.name.trim().is_empty() {
            data.toasts.warn("Please enter a playlist name.");
            return;
        }

        let created = self
            .playlists
            .mutate(
                data,
                &CREATE,
                data.client.create_playlist(&self.draft),
                "fetching playlist data",
                || data.client.playlists(),
            )
            .await;
        if created {
            self.draft = NewPlaylist::default();
        }
    }

    async fn add(&mut self, data: &Data, args: &str) {
        let Some(playlist) = self.open else {
            data.toasts.warn("Open a playlist first.");
            return;
        };
        let Some(song) = row(data, &self.candidates.visible(), args).map(|s| s.song_id) else {
            return;
        };

        self.playlists
            .mutate(
                data,
                &ADD_TO,
                data.client.add_songs_to_playlist(playlist, &[song]),
                "fetching playlist data",
                || data.client.playlists(),
            )
            .await;
        self.load_candidates(data).await;
    }

    async fn drop_song(&mut self, data: &Data, args: &str) {
        let Some(playlist) = self.opened() else {
            data.toasts.warn("Open a playlist first.");
            return;
        };
        let songs: Vec<&Song> = playlist.songs.iter().collect();
        let Some(song) = row(data, &songs, args).map(|s| s.song_id) else {
            return;
        };
        let playlist = playlist.playlist_id;

        self.playlists
            .mutate(
                data,
                &DROP_FROM,
                data.client.delete_song_from_playlist(playlist, song),
                "fetching playlist data",
                || data.client.playlists(),
            )
            .await;
        self.load_candidates(data).await;
    }

    async fn delete(&mut self, data: &Data, args: &str) {
        let Some(id) = row(data, &self.playlists.visible(), args).map(|p| p.playlist_id) else {
            return;
        };

        let deleted = self
            .playlists
            .mutate(
                data,
                &DELETE,
                data.client.delete_playlist(id),
                "fetching playlist data",
                || data.client.playlists(),
            )
            .await;
        if deleted && self.open == Some(id) {
            self.open = None;
            self.candidates = ListView::default();
        }
    }
}
