use std::fmt::Write;

use melodex::{
    friend::{Friend, UserInfo},
    validate::{MIN_SEARCH_LEN, user_search},
};

use super::{View, row};
use crate::shell::{
    data::Data,
    render::{Table, heading, list},
    router::Route,
    view::{Labels, ListView, ViewState},
};

const ADD_FRIEND: Labels = Labels {
    pending: "Adding friend...",
    done: "Friend added successfully!",
    action: "adding friend",
};

const REMOVE_FRIEND: Labels = Labels {
    pending: "Removing friend...",
    done: "Friend removed successfully!",
    action: "removing friend",
};

fn user_table(users: &[&UserInfo]) -> String {
    let mut table = Table::new(&["Name", "Username", "Email"]);
    for user in users {
        table.row([user.name.as_str(), user.handle(), user.email.as_str()]);
    }
    table.render()
}

#[derive(Default)]
pub struct FriendsView {
    friends: ListView<Friend>,
    results: ListView<UserInfo>,
}

impl View for FriendsView {
    const COMMANDS: &'static [(&'static str, &'static str)] = &[
        ("find <text>", "filter your friends by name or username"),
        ("search <text>", "look for other users (2+ characters)"),
        ("add <email|n>", "add a friend by email, or search result n"),
        ("remove <n>", "remove friend n"),
    ];

    async fn mount(&mut self, data: &Data) {
        self.friends
            .load(data, "fetching friends", data.client.friends())
            .await;
    }

    async fn handle(&mut self, data: &Data, cmd: &str, args: &str) -> bool {
        match cmd {
            "find" => self.friends.set_query(args),
            "search" => self.search(data, args).await,
            "add" => self.add(data, args).await,
            "remove" => self.remove(data, args).await,
            _ => return false,
        }
        true
    }

    fn render(&self, _data: &Data) -> String {
        let mut out = String::new();
        heading(&mut out, Route::Friends.title());
        list(&mut out, &self.friends, "No friends yet.", |friends| {
            let users: Vec<&UserInfo> = friends.iter().map(|f| &f.friend_info).collect();
            user_table(&users)
        });

        if !matches!(self.results.state(), ViewState::Idle) {
            writeln!(out, "\nSearch results").ok();
            list(&mut out, &self.results, "No users found.", user_table);
        }
        out
    }
}

impl FriendsView {
    async fn search(&mut self, data: &Data, args: &str) {
        let Some(query) = user_search(args) else {
            self.results = ListView::default();
            data.toasts.info(format!(
                "Type at least {MIN_SEARCH_LEN} characters to search."
            ));
            return;
        };

        self.results
            .load(data, "searching for friends", data.client.search_users(query))
            .await;
    }

    async fn add(&mut self, data: &Data, args: &str) {
        let args = args.trim();
        let email = if args.parse::<usize>().is_ok() {
            match row(data, &self.results.visible(), args) {
                Some(user) => user.email.clone(),
                None => return,
            }
        } else {
            args.to_string()
        };
        if email.is_empty() {
            data.toasts.warn("Please enter an email address.");
            return;
        }

        self.friends
            .mutate(
                data,
                &ADD_FRIEND,
                data.client.add_friend(&email),
                "fetching friends",
                || data.client.friends(),
            )
            .await;
    }

    async fn remove(&mut self, data: &Data, args: &str) {
        let Some(user) = row(data, &self.friends.visible(), args).map(|f| f.friend_info.user_id)
        else {
            return;
        };
        let Some(user) = user else {
            data.toasts.warn("Friend not found.");
            return;
        };

        self.friends
            .mutate(
                data,
                &REMOVE_FRIEND,
                data.client.delete_friend(user),
                "fetching friends",
                || data.client.friends(),
            )
            .await;
    }
}
