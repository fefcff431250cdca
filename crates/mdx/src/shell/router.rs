use std::time::Duration;

use melodex::Session;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Library,
    AddSong,
    SearchSong,
    ImportSong,
    SongRatings,
    PerformerRatings,
    ExportRatings,
    Playlist,
    Analysis,
    Friends,
    Recommendations,
}

impl Route {
    pub const ALL: [Route; 14] = [
        Route::Home,
        Route::Login,
        Route::Register,
        Route::Library,
        Route::AddSong,
        Route::SearchSong,
        Route::ImportSong,
        Route::SongRatings,
        Route::PerformerRatings,
        Route::ExportRatings,
        Route::Playlist,
        Route::Analysis,
        Route::Friends,
        Route::Recommendations,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Library => "/library",
            Route::AddSong => "/song/add",
            Route::SearchSong => "/song/search",
            Route::ImportSong => "/song/import",
            Route::SongRatings => "/rating/song",
            Route::PerformerRatings => "/rating/performer",
            Route::ExportRatings => "/rating/export",
            Route::Playlist => "/playlist",
            Route::Analysis => "/analysis",
            Route::Friends => "/friends",
            Route::Recommendations => "/recommendations",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Login => "Login",
            Route::Register => "Register",
            Route::Library => "Your Songs",
            Route::AddSong => "Add Song",
            Route::SearchSong => "Search Song",
            Route::ImportSong => "Import Songs",
            Route::SongRatings => "Song Ratings",
            Route::PerformerRatings => "Performer Ratings",
            Route::ExportRatings => "Export Ratings",
            Route::Playlist => "Playlists",
            Route::Analysis => "Analysis",
            Route::Friends => "Friends",
            Route::Recommendations => "Recommendations For You",
        }
    }

    pub fn parse(path: &str) -> Option<Route> {
        let path = path.trim();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        Route::ALL.into_iter().find(|r| r.path() == path)
    }

    pub fn is_protected(self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }
}

/// Decides what actually renders for `requested`. Looks at the session on
/// every call; nothing is cached between navigations.
pub fn guard(requested: Route, session: &Session) -> Route {
    if requested.is_protected() && !session.is_authenticated() {
        Route::Login
    } else {
        requested
    }
}

/// Asks the shell to switch views. Usable from spawned tasks.
#[derive(Debug, Clone)]
pub struct Navigator {
    tx: mpsc::UnboundedSender<Route>,
}

impl Navigator {
    pub fn new(tx: mpsc::UnboundedSender<Route>) -> Self {
        Self { tx }
    }

    pub fn navigate(&self, route: Route) {
        tracing::debug!(path = route.path(), "navigation requested");
        self.tx.send(route).ok();
    }

    pub fn navigate_after(&self, route: Route, delay: Duration) {
        let navigator = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.navigate(route);
        });
    }
}
