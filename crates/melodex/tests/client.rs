use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use axum::{
    Json, Router,
    body::Bytes,
    extract::Query,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::{delete, get, post},
};
use futures::StreamExt;
use melodex::{
    Failure, Melodex, MelodexError, Session,
    auth::Registered,
    id::SongId,
    validate::{Rating, SpotifyQuery},
};
use serde_json::{Value, json};

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

type Seen = Arc<Mutex<Vec<Option<String>>>>;

fn song_list(seen: Seen) -> Router {
    Router::new().route(
        "/song/getAllUserSongs",
        get(move |headers: HeaderMap| {
            let seen = seen.clone();
            async move {
                seen.lock().unwrap().push(bearer(&headers));
                Json(json!({ "data": [
                    { "SongID": 1, "Title": "Blinding Lights", "Album": "After Hours" }
                ] }))
            }
        }),
    )
}

#[tokio::test]
async fn bearer_header_follows_the_session() {
    let seen = Seen::default();
    let base = serve(song_list(seen.clone())).await;
    let session = Session::in_memory();
    let client = Melodex::new(&base, session.clone()).unwrap();

    client.user_songs().await.unwrap();
    session.set_session("a", "r").unwrap();
    client.user_songs().await.unwrap();
    client.user_songs().await.unwrap();
    session.clear_session().unwrap();
    client.user_songs().await.unwrap();

    let seen = seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            None,
            Some("Bearer a".to_string()),
            Some("Bearer a".to_string()),
            None
        ]
    );
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn unwraps_data_envelope() {
    let base = serve(song_list(Seen::default())).await;
    let client = Melodex::new(&base, Session::in_memory()).unwrap();

    let songs = client.user_songs().await.unwrap();
    assert_eq!(songs.len(), 1);
    assert_eq!(songs[0].song_id, SongId::from(1));
    assert_eq!(songs[0].album, "After Hours");
}

#[tokio::test]
async fn both_no_result_conventions_are_empty() {
    let router = Router::new()
        .route(
            "/song/getAllUserSongs",
            get(|| async { (StatusCode::NOT_FOUND, Json(json!({ "message": "none" }))) }),
        )
        .route(
            "/friend/getAllFriends",
            get(|| async { Json(json!({ "data": [] })) }),
        )
        .route(
            "/playlist/getAllUserPlaylists",
            get(|| async { Json(json!({ "data": null })) }),
        );
    let base = serve(router).await;
    let client = Melodex::new(&base, Session::in_memory()).unwrap();

    assert!(client.user_songs().await.unwrap().is_empty());
    assert!(client.friends().await.unwrap().is_empty());
    assert!(client.playlists().await.unwrap().is_empty());
}

#[tokio::test]
async fn auth_failures_are_classified() {
    let router = Router::new()
        .route("/song/getAllUserSongs", get(|| async { StatusCode::UNAUTHORIZED }))
        .route("/friend/getAllFriends", get(|| async { StatusCode::FORBIDDEN }))
        .route(
            "/user",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
    let base = serve(router).await;
    let client = Melodex::new(&base, Session::in_memory()).unwrap();

    let err = client.user_songs().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.status(), Some(reqwest::StatusCode::UNAUTHORIZED));

    let err = client.friends().await.unwrap_err();
    assert_eq!(err.failure(), Failure::Unauthorized);

    match client.profile().await.unwrap_err() {
        MelodexError::Non200 { status, body } => {
            assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn single_resources_404_is_not_found() {
    let router = Router::new().route("/user", get(|| async { StatusCode::NOT_FOUND }));
    let base = serve(router).await;
    let client = Melodex::new(&base, Session::in_memory()).unwrap();

    assert_eq!(
        client.profile().await.unwrap_err().failure(),
        Failure::NotFound
    );
}

#[tokio::test]
async fn login_stores_tokens() {
    let router = Router::new().route(
        "/auth/login",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["email"], "ana@example.com");
            assert_eq!(body["password"], "secret1");
            Json(json!({ "accessToken": "acc", "refreshToken": "ref" }))
        }),
    );
    let base = serve(router).await;
    let session = Session::in_memory();
    let client = Melodex::new(&base, session.clone()).unwrap();

    let tokens = client.login("ana@example.com", "secret1").await.unwrap();
    assert_eq!(tokens.access_token, "acc");
    assert_eq!(session.access_token().as_deref(), Some("acc"));
    assert_eq!(session.refresh_token().as_deref(), Some("ref"));
}

#[tokio::test]
async fn invalid_login_never_reaches_the_server() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let router = Router::new().route(
        "/auth/login",
        post(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { StatusCode::OK }
        }),
    );
    let base = serve(router).await;
    let client = Melodex::new(&base, Session::in_memory()).unwrap();

    let err = client.login("not-an-email", "123").await.unwrap_err();
    assert_eq!(err.failure(), Failure::Validation);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn register_without_tokens_requires_login() {
    let router = Router::new().route("/register", post(|| async { StatusCode::OK }));
    let base = serve(router).await;
    let session = Session::in_memory();
    let client = Melodex::new(&base, session.clone()).unwrap();

    let outcome = client
        .register("Ana", "ana@example.com", "secret1")
        .await
        .unwrap();
    assert_eq!(outcome, Registered::LoginRequired);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn logout_clears_session_even_on_failure() {
    let tokens = Arc::new(Mutex::new(None));
    let seen = tokens.clone();
    let router = Router::new().route(
        "/auth/logout",
        delete(move |Json(body): Json<Value>| {
            *seen.lock().unwrap() = Some(body["token"].clone());
            async { StatusCode::INTERNAL_SERVER_ERROR }
        }),
    );
    let base = serve(router).await;
    let session = Session::in_memory();
    session.set_session("acc", "ref").unwrap();
    let client = Melodex::new(&base, session.clone()).unwrap();

    assert!(client.logout().await.is_err());
    assert!(!session.is_authenticated());
    assert_eq!(session.refresh_token(), None);
    assert_eq!(*tokens.lock().unwrap(), Some(json!("ref")));
}

#[tokio::test]
async fn rating_payload() {
    let body = Arc::new(Mutex::new(Value::Null));
    let seen = body.clone();
    let router = Router::new().route(
        "/rating/song/create",
        post(move |Json(b): Json<Value>| {
            *seen.lock().unwrap() = b;
            async { StatusCode::OK }
        }),
    );
    let base = serve(router).await;
    let client = Melodex::new(&base, Session::in_memory()).unwrap();

    client
        .rate_song(SongId::from(12), Rating::new(4).unwrap())
        .await
        .unwrap();
    assert_eq!(*body.lock().unwrap(), json!({ "songId": 12, "rating": 4 }));
}

#[tokio::test]
async fn spotify_search_requires_track_name() {
    let client = Melodex::new("http://127.0.0.1:9", Session::in_memory()).unwrap();
    let err = client
        .search_spotify(&SpotifyQuery::default())
        .await
        .unwrap_err();
    assert_eq!(err.failure(), Failure::Validation);
}

#[tokio::test]
async fn user_search_sends_query_parameter() {
    let router = Router::new().route(
        "/user/search",
        get(
            |Query(q): Query<std::collections::HashMap<String, String>>| async move {
                Json(json!({ "data": [
                    { "UserID": 4, "Name": q["query"].clone(), "Email": "x@example.com" }
                ] }))
            },
        ),
    );
    let base = serve(router).await;
    let client = Melodex::new(&base, Session::in_memory()).unwrap();

    let users = client.search_users("ana lima").await.unwrap();
    assert_eq!(users[0].name, "ana lima");
}

#[tokio::test]
async fn export_streams_text() {
    let router = Router::new().route(
        "/rating/song/export/performername",
        post(|Json(body): Json<Value>| async move {
            format!("ratings for {}\nBohemian Rhapsody: 5\n", body["performerName"].as_str().unwrap())
        }),
    );
    let base = serve(router).await;
    let client = Melodex::new(&base, Session::in_memory()).unwrap();

    let mut stream = Box::pin(client.export_performer_ratings("Queen").await.unwrap());
    let mut text = Vec::new();
    while let Some(chunk) = stream.next().await {
        text.extend_from_slice(&chunk.unwrap());
    }
    assert_eq!(
        String::from_utf8(text).unwrap(),
        "ratings for Queen\nBohemian Rhapsody: 5\n"
    );
}

#[tokio::test]
async fn csv_upload_is_multipart() {
    let received = Arc::new(Mutex::new(Vec::new()));
    let seen = received.clone();
    let router = Router::new().route(
        "/upload",
        post(move |headers: HeaderMap, body: Bytes| {
            let content_type = headers
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            assert!(content_type.starts_with("multipart/form-data"));
            *seen.lock().unwrap() = body.to_vec();
            async { StatusCode::OK }
        }),
    );
    let base = serve(router).await;
    let client = Melodex::new(&base, Session::in_memory()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("songs.csv");
    std::fs::write(&path, "title,performer\nBlinding Lights,The Weeknd\n").unwrap();

    client.upload_csv(&path).await.unwrap();

    let body = String::from_utf8_lossy(&received.lock().unwrap()).into_owned();
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("filename=\"songs.csv\""));
    assert!(body.contains("Blinding Lights,The Weeknd"));
}
