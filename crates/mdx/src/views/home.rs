use std::fmt::Write;

use melodex::{auth::UserProfile, friend::Friend, recommendation::Feed, song::SpotifySong};

use super::{
    View,
    search::{add_row, spotify_table},
};
use crate::shell::{
    data::Data,
    render::{Table, heading, list},
    router::Route,
    view::ListView,
};

#[derive(Default)]
pub struct HomeView {
    profile: Option<UserProfile>,
    friends: ListView<Friend>,
    picks: ListView<SpotifySong>,
}

impl View for HomeView {
    const COMMANDS: &'static [(&'static str, &'static str)] = &[
        ("add <n>", "add pick n to your library"),
        ("find <text>", "filter the picks"),
    ];

    async fn mount(&mut self, data: &Data) {
        match data.client.profile().await {
            Ok(profile) => self.profile = Some(profile),
            Err(e) => data.fail(&e, "fetching user info"),
        }

        self.friends
            .load(data, "fetching friends", data.client.friends())
            .await;

        let count = data.config.ui.recommendations;
        self.picks
            .load(
                data,
                "fetching song recommendations",
                data.client.recommendations(Feed::General { count }),
            )
            .await;
    }

    async fn handle(&mut self, data: &Data, cmd: &str, args: &str) -> bool {
        match cmd {
            "add" => add_row(data, &mut self.picks, args).await,
            "find" => self.picks.set_query(args),
            _ => return false,
        }
        true
    }

    fn render(&self, _data: &Data) -> String {
        let mut out = String::new();
        heading(&mut out, Route::Home.title());
        if let Some(profile) = &self.profile {
            writeln!(out, "Welcome back, {} <{}>\n", profile.name, profile.email).ok();
        }

        writeln!(out, "Your friends").ok();
        list(&mut out, &self.friends, "No friends yet.", |friends| {
            let mut table = Table::new(&["Name", "Email"]);
            for friend in friends {
                table.row([
                    friend.friend_info.name.as_str(),
                    friend.friend_info.email.as_str(),
                ]);
            }
            table.render()
        });

        writeln!(out, "\n{}", Feed::General { count: 0 }.describe()).ok();
        list(&mut out, &self.picks, "No recommendations yet.", spotify_table);

        out.push_str("\nPages: ");
        let pages: Vec<&str> = Route::ALL
            .iter()
            .filter(|r| r.is_protected() && **r != Route::Home)
            .map(|r| r.path())
            .collect();
        out.push_str(&pages.join(" "));
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Json, Router,
        routing::{get, post},
    };
    use serde_json::{Value, json};

    use super::*;
    use crate::testing::{Harness, serve};

    #[tokio::test]
    async fn shows_profile_and_general_picks() {
        let router = Router::new()
            .route(
                "/user",
                get(|| async { Json(json!({ "data": { "Name": "Ana", "Email": "ana@example.com" } })) }),
            )
            .route(
                "/friend/getAllFriends",
                get(|| async {
                    Json(json!({ "data": [
                        { "FriendInfo": { "UserID": 4, "Name": "Bo", "Email": "rockfan@example.com" } }
                    ] }))
                }),
            )
            .route(
                "/recommendation/get",
                post(|Json(body): Json<Value>| async move {
                    assert_eq!(body["numberOfResults"], 6);
                    Json(json!({ "data": [{
                        "SpotifyId": "x1",
                        "Title": "Starboy",
                        "Performer": [{ "name": "The Weeknd" }],
                        "Album": { "name": "Starboy" },
                        "Length": 230453
                    }] }))
                }),
            );
        let mut h = Harness::new(&serve(router).await);
        h.login();
        let mut view = HomeView::default();
        view.mount(&h.data).await;

        let text = view.render(&h.data);
        assert!(text.contains("Welcome back, Ana <ana@example.com>"));
        let friends = text.find("rockfan@example.com").unwrap();
        let picks = text.find("Starboy").unwrap();
        assert!(friends < picks);
        assert!(text.contains("/library"));
        assert!(h.toasts().is_empty());
    }
}
