use std::future::Future;

use melodex::{
    Failure, MelodexError,
    filter::{Filterable, filter},
};

use super::data::Data;

/// Where a list view is in its fetch cycle. Data from the last good fetch
/// rides along in `Loading` and `Error` so it stays on screen.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading { prior: Option<T> },
    Empty,
    Success(T),
    Error { failure: Failure, prior: Option<T> },
}

impl<T> ViewState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Success(data) => Some(data),
            ViewState::Loading { prior } | ViewState::Error { prior, .. } => prior.as_ref(),
            ViewState::Idle | ViewState::Empty => None,
        }
    }

    fn take_data(&mut self) -> Option<T> {
        match std::mem::replace(self, ViewState::Idle) {
            ViewState::Success(data) => Some(data),
            ViewState::Loading { prior } | ViewState::Error { prior, .. } => prior,
            ViewState::Idle | ViewState::Empty => None,
        }
    }
}

/// Toast texts for one mutating action.
pub struct Labels {
    /// Shown while the call is in flight, e.g. "Removing song...".
    pub pending: &'static str,
    pub done: &'static str,
    /// Completes "Error ...", e.g. "removing song".
    pub action: &'static str,
}

/// A server-fetched collection plus the local search box over it.
#[derive(Debug)]
pub struct ListView<T> {
    state: ViewState<Vec<T>>,
    query: String,
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        Self {
            state: ViewState::Idle,
            query: String::new(),
        }
    }
}

impl<T> ListView<T> {
    pub fn state(&self) -> &ViewState<Vec<T>> {
        &self.state
    }

    pub fn items(&self) -> &[T] {
        self.state.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn items_mut(&mut self) -> Option<&mut Vec<T>> {
        match &mut self.state {
            ViewState::Success(items) => Some(items),
            _ => None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.trim().to_string();
    }

    fn begin(&mut self) {
        let prior = self.state.take_data();
        self.state = ViewState::Loading { prior };
    }

    fn settle(&mut self, data: &Data, action: &str, result: Result<Vec<T>, MelodexError>) {
        let prior = self.state.take_data();
        self.state = match result {
            Ok(items) if items.is_empty() => ViewState::Empty,
            Ok(items) => {
                self.query.clear();
                ViewState::Success(items)
            }
            Err(e) if e.failure() == Failure::NotFound => ViewState::Empty,
            Err(e) => {
                data.fail(&e, action);
                ViewState::Error {
                    failure: e.failure(),
                    prior,
                }
            }
        };
    }

    pub async fn load<F>(&mut self, data: &Data, action: &str, fetch: F)
    where
        F: Future<Output = Result<Vec<T>, MelodexError>>,
    {
        self.begin();
        let result = fetch.await;
        self.settle(data, action, result);
    }

    /// Runs one mutating call. The shell refuses other commands for this
    /// screen until it resolves. Returns whether it succeeded.
    pub async fn operate<F>(&mut self, data: &Data, labels: &Labels, op: F) -> bool
    where
        F: Future<Output = Result<(), MelodexError>>,
    {
        data.toasts.info(labels.pending);
        match op.await {
            Ok(()) => {
                data.toasts.success(labels.done);
                true
            }
            Err(e) => {
                data.fail(&e, labels.action);
                false
            }
        }
    }

    /// [`operate`](Self::operate), then exactly one refetch of the list
    /// whether or not the mutation went through.
    pub async fn mutate<F, R, RF>(
        &mut self,
        data: &Data,
        labels: &Labels,
        op: F,
        refetch_action: &str,
        refetch: R,
    ) -> bool
    where
        F: Future<Output = Result<(), MelodexError>>,
        R: FnOnce() -> RF,
        RF: Future<Output = Result<Vec<T>, MelodexError>>,
    {
        let ok = self.operate(data, labels, op).await;
        self.load(data, refetch_action, refetch()).await;
        ok
    }
}

impl<T: Filterable> ListView<T> {
    /// The fetched items narrowed by the search box. Never refetches.
    pub fn visible(&self) -> Vec<&T> {
        filter(self.items(), &self.query)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use axum::{
        Json, Router,
        http::StatusCode,
        routing::{get, post},
    };
    use melodex::song::Song;
    use serde_json::json;

    use super::*;
    use crate::{
        shell::{expiry::EXPIRED_MESSAGE, router::Route, toast::Level},
        testing::{Harness, serve},
    };

    const REMOVE: Labels = Labels {
        pending: "Removing song...",
        done: "Song removed successfully.",
        action: "removing song",
    };

    fn counted_songs(hits: Arc<AtomicUsize>) -> Router {
        Router::new().route(
            "/song/getAllUserSongs",
            get(move || {
                hits.fetch_add(1, Ordering::SeqCst);
                async {
                    Json(json!({ "data": [
                        { "SongID": 1, "Title": "Blinding Lights", "Album": "After Hours" },
                        { "SongID": 2, "Title": "Moth To Flame", "Album": "Dawn FM" }
                    ] }))
                }
            }),
        )
    }

    #[tokio::test]
    async fn not_found_is_empty_not_error() {
        let router = Router::new().route(
            "/song/getAllUserSongs",
            get(|| async { StatusCode::NOT_FOUND }),
        );
        let mut h = Harness::new(&serve(router).await);
        let mut view = ListView::<Song>::default();

        view.load(&h.data, "fetching songs", h.data.client.user_songs())
            .await;

        assert!(matches!(view.state(), ViewState::Empty));
        assert!(h.toasts().is_empty());
    }

    #[tokio::test]
    async fn unauthorized_goes_through_expiry_once() {
        let router = Router::new().route(
            "/song/getAllUserSongs",
            get(|| async { StatusCode::UNAUTHORIZED }),
        );
        let mut h = Harness::with_delay(&serve(router).await, Duration::from_millis(50));
        h.data.session().set_session("a", "r").unwrap();

        let mut songs = ListView::<Song>::default();
        let mut again = ListView::<Song>::default();
        songs
            .load(&h.data, "fetching songs", h.data.client.user_songs())
            .await;
        again
            .load(&h.data, "fetching songs", h.data.client.user_songs())
            .await;

        assert!(matches!(
            songs.state(),
            ViewState::Error {
                failure: Failure::Unauthorized,
                ..
            }
        ));
        assert!(!h.data.session().is_authenticated());

        let toasts = h.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].level, Level::Warning);
        assert_eq!(toasts[0].message, EXPIRED_MESSAGE);

        let route = tokio::time::timeout(Duration::from_secs(2), h.routes.recv())
            .await
            .unwrap();
        assert_eq!(route, Some(Route::Login));
        assert!(h.routes.try_recv().is_err());
    }

    #[tokio::test]
    async fn other_errors_keep_prior_data() {
        let fail = Arc::new(AtomicUsize::new(0));
        let calls = fail.clone();
        let router = Router::new().route(
            "/song/getAllUserSongs",
            get(move || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Ok(Json(json!({ "data": [{ "SongID": 1, "Title": "Blinding Lights" }] })))
                    } else {
                        Err(StatusCode::BAD_GATEWAY)
                    }
                }
            }),
        );
        let mut h = Harness::new(&serve(router).await);
        let mut view = ListView::<Song>::default();

        view.load(&h.data, "fetching songs", h.data.client.user_songs())
            .await;
        view.load(&h.data, "fetching songs", h.data.client.user_songs())
            .await;

        assert!(matches!(
            view.state(),
            ViewState::Error {
                failure: Failure::Other,
                prior: Some(_)
            }
        ));
        assert_eq!(view.items().len(), 1);
        let toasts = h.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].level, Level::Error);
        assert_eq!(toasts[0].message, "Error fetching songs.");
    }

    #[tokio::test]
    async fn mutation_refetches_once_even_when_it_fails() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = counted_songs(hits.clone()).route(
            "/song/deleteSong/User",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let mut h = Harness::new(&serve(router).await);
        let mut view = ListView::<Song>::default();

        let ok = view
            .mutate(
                &h.data,
                &REMOVE,
                h.data.client.delete_song(1.into()),
                "fetching songs",
                || h.data.client.user_songs(),
            )
            .await;

        assert!(!ok);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(view.items().len(), 2);

        let levels: Vec<_> = h.toasts().into_iter().map(|t| t.level).collect();
        assert_eq!(levels, [Level::Info, Level::Error]);
    }

    #[tokio::test]
    async fn mutation_refetches_once_on_success() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = counted_songs(hits.clone())
            .route("/song/deleteSong/User", post(|| async { StatusCode::OK }));
        let mut h = Harness::new(&serve(router).await);
        let mut view = ListView::<Song>::default();

        assert!(
            view.mutate(
                &h.data,
                &REMOVE,
                h.data.client.delete_song(1.into()),
                "fetching songs",
                || h.data.client.user_songs(),
            )
            .await
        );
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        let toasts = h.toasts();
        assert_eq!(toasts[1].message, "Song removed successfully.");
    }

    #[tokio::test]
    async fn filtering_stays_local() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut h = Harness::new(&serve(counted_songs(hits.clone())).await);
        let mut view = ListView::<Song>::default();
        view.load(&h.data, "fetching songs", h.data.client.user_songs())
            .await;

        view.set_query("after");
        let titles: Vec<_> = view.visible().iter().map(|s| s.title.clone()).collect();
        assert_eq!(titles, ["Blinding Lights"]);

        view.set_query("");
        assert_eq!(view.visible().len(), 2);

        view.set_query("zzz");
        assert!(view.visible().is_empty());

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(h.toasts().is_empty());
    }

    #[tokio::test]
    async fn fresh_data_resets_the_filter() {
        let mut h = Harness::new(&serve(counted_songs(Arc::default())).await);
        let mut view = ListView::<Song>::default();
        view.load(&h.data, "fetching songs", h.data.client.user_songs())
            .await;
        view.set_query("zzz");

        view.load(&h.data, "fetching songs", h.data.client.user_songs())
            .await;
        assert_eq!(view.query(), "");
        assert_eq!(view.visible().len(), 2);
        assert!(h.toasts().is_empty());
    }
}
