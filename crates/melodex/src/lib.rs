pub mod analysis;
pub mod auth;
mod error;
pub mod filter;
pub mod format;
pub mod friend;
pub mod id;
pub mod import;
pub mod playlist;
pub mod rating;
pub mod recommendation;
mod response;
pub mod session;
pub mod song;
pub mod validate;

pub use error::{Failure, MelodexError, StorageError};
pub use response::Tokens;
pub use session::Session;

use crate::response::MelodexResponse;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

/// Client for the melodex REST API.
///
/// Every request carries `Authorization: Bearer <accessToken>` while the
/// session holds one. Nothing is retried and the refresh token is never
/// exchanged: a 401/403 comes back as [`MelodexError::Unauthorized`] for the
/// caller to act on.
#[derive(Debug, Clone)]
pub struct Melodex {
    client: reqwest::Client,
    base: Url,
    session: Session,
}

impl Melodex {
    pub fn new(base_url: &str, session: Session) -> Result<Self, MelodexError> {
        let mut base = Url::parse(base_url)?;
        // `join` drops the last path segment unless the base ends in a slash
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, MelodexError> {
        let url = self.base.join(path.trim_start_matches('/'))?;
        tracing::debug!(%method, %url, "dispatching request");

        let builder = self.client.request(method, url);
        Ok(match self.session.access_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    pub(crate) fn get(&self, path: &str) -> Result<RequestBuilder, MelodexError> {
        self.request(Method::GET, path)
    }

    pub(crate) fn post(&self, path: &str) -> Result<RequestBuilder, MelodexError> {
        self.request(Method::POST, path)
    }

    pub(crate) fn delete(&self, path: &str) -> Result<RequestBuilder, MelodexError> {
        self.request(Method::DELETE, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, MelodexError> {
        let response = request.send().await?;
        let status = response.status();

        match status {
            s if s.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(MelodexError::NotFound),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                tracing::debug!(%status, "request rejected as unauthorized");
                Err(MelodexError::Unauthorized(status))
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                tracing::warn!(%status, %body, "request failed");
                Err(MelodexError::Non200 { status, body })
            }
        }
    }

    /// Sends and unwraps the `{ "data": ... }` envelope.
    pub(crate) async fn fetch<T>(&self, request: RequestBuilder) -> Result<T, MelodexError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(request).await?;
        let data = response.json::<MelodexResponse<T>>().await?;
        Ok(data.data)
    }

    /// Like [`fetch`](Self::fetch) for collections. The API reports "no
    /// results" either as a 404 or as an empty (or null) `data`; both come
    /// back as an empty `Vec`.
    pub(crate) async fn fetch_list<T>(&self, request: RequestBuilder) -> Result<Vec<T>, MelodexError>
    where
        T: DeserializeOwned,
    {
        match self.fetch::<Option<Vec<T>>>(request).await {
            Ok(items) => Ok(items.unwrap_or_default()),
            Err(MelodexError::NotFound) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Sends and discards whatever body comes back.
    pub(crate) async fn execute(&self, request: RequestBuilder) -> Result<(), MelodexError> {
        self.send(request).await?;
        Ok(())
    }

    pub(crate) async fn raw(&self, request: RequestBuilder) -> Result<Response, MelodexError> {
        self.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_keeps_its_path() {
        let client = Melodex::new("http://localhost:3000/api", Session::in_memory()).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:3000/api/");

        let url = client.base.join("song/getAllUserSongs").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/song/getAllUserSongs");
    }

    #[test]
    fn rejects_garbage_base_url() {
        assert!(matches!(
            Melodex::new("not a url", Session::in_memory()),
            Err(MelodexError::Url(_))
        ));
    }
}
