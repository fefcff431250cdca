mod add_song;
mod analysis;
mod auth;
mod export;
mod friends;
mod home;
mod import;
mod library;
mod playlist;
mod ratings;
mod recommendations;
mod search;

use std::str::FromStr;

use crate::shell::{data::Data, router::Route, view::Labels};
use add_song::AddSongView;
use analysis::AnalysisView;
use auth::{LoginView, RegisterView};
use export::ExportView;
use friends::FriendsView;
use home::HomeView;
use import::ImportView;
use library::LibraryView;
use playlist::PlaylistView;
use ratings::{PerformerRatingsView, SongRatingsView};
use recommendations::RecommendationsView;
use search::SearchView;

/// One routed screen. A fresh value is built and mounted on every
/// navigation; nothing carries over between visits.
#[allow(async_fn_in_trait)]
pub trait View: Default {
    /// `(usage, description)` pairs for `help`.
    const COMMANDS: &'static [(&'static str, &'static str)];

    async fn mount(&mut self, data: &Data);

    /// Returns `false` for commands this view does not know.
    async fn handle(&mut self, data: &Data, cmd: &str, args: &str) -> bool;

    fn render(&self, data: &Data) -> String;
}

macro_rules! screens {
    ($($route:ident => $view:ident),* $(,)?) => {
        pub enum Screen {
            $($route($view)),*
        }

        impl Screen {
            pub fn for_route(route: Route) -> Self {
                match route {
                    $(Route::$route => Screen::$route($view::default())),*
                }
            }

            pub fn route(&self) -> Route {
                match self {
                    $(Screen::$route(_) => Route::$route),*
                }
            }

            pub fn commands(route: Route) -> &'static [(&'static str, &'static str)] {
                match route {
                    $(Route::$route => <$view as View>::COMMANDS),*
                }
            }

            pub async fn mount(&mut self, data: &Data) {
                match self {
                    $(Screen::$route(view) => view.mount(data).await),*
                }
            }

            pub async fn handle(&mut self, data: &Data, cmd: &str, args: &str) -> bool {
                match self {
                    $(Screen::$route(view) => view.handle(data, cmd, args).await),*
                }
            }

            pub fn render(&self, data: &Data) -> String {
                match self {
                    $(Screen::$route(view) => view.render(data)),*
                }
            }
        }
    };
}

screens! {
    Home => HomeView,
    Login => LoginView,
    Register => RegisterView,
    Library => LibraryView,
    AddSong => AddSongView,
    SearchSong => SearchView,
    ImportSong => ImportView,
    SongRatings => SongRatingsView,
    PerformerRatings => PerformerRatingsView,
    ExportRatings => ExportView,
    Playlist => PlaylistView,
    Analysis => AnalysisView,
    Friends => FriendsView,
    Recommendations => RecommendationsView,
}

pub(crate) const ADD_SONG: Labels = Labels {
    pending: "Adding song...",
    done: "Song added successfully.",
    action: "adding song",
};

/// Splits off the first word of `args`.
pub(crate) fn first_word(args: &str) -> (&str, &str) {
    let args = args.trim();
    match args.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim()),
        None => (args, ""),
    }
}

/// Splits off the first word and leaves the rest as typed, minus the one
/// separating space.
pub(crate) fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim_start();
    match line.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail),
        None => (line, ""),
    }
}

/// Picks a row by the 1-based number printed next to it.
pub(crate) fn row<'a, T>(data: &Data, rows: &[&'a T], arg: &str) -> Option<&'a T> {
    let arg = arg.trim();
    match arg.parse::<usize>() {
        Ok(n) if (1..=rows.len()).contains(&n) => Some(rows[n - 1]),
        _ => {
            data.toasts
                .warn(format!("There is no row `{arg}`. Use a number from the list."));
            None
        }
    }
}

pub(crate) fn number<T: FromStr>(data: &Data, arg: &str, what: &str) -> Option<T> {
    match arg.trim().parse() {
        Ok(n) => Some(n),
        Err(_) => {
            data.toasts.warn(format!("Please enter a valid {what}."));
            None
        }
    }
}
