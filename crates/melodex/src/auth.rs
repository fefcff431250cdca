use crate::{Melodex, MelodexError, Tokens, response::MaybeTokens, validate};
use serde::{Deserialize, Serialize};
use serde_json::json;

const LOGIN: &str = "auth/login";
const LOGOUT: &str = "auth/logout";
const REGISTER: &str = "register";
const USER: &str = "user";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserProfile {
    pub name: String,
    pub email: String,
}

/// What a successful registration led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registered {
    /// The server handed out tokens; the session is live.
    LoggedIn,
    /// The user still has to log in.
    LoginRequired,
}

impl Melodex {
    /// Exchanges credentials for a token pair and stores it in the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Tokens, MelodexError> {
        validate::login(email, password)?;

        let response = self
            .raw(
                self.post(LOGIN)?
                    .json(&json!({ "email": email.trim(), "password": password })),
            )
            .await?;
        let tokens = response.json::<Tokens>().await?;

        self.session()
            .set_session(&tokens.access_token, &tokens.refresh_token)?;
        tracing::info!("logged in");
        Ok(tokens)
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Registered, MelodexError> {
        validate::registration(name, email, password)?;

        let response = self
            .raw(self.post(REGISTER)?.json(&json!({
                "name": name.trim(),
                "email": email.trim(),
                "password": password,
            })))
            .await?;

        // most deployments answer with an empty body
        let tokens = response.json::<MaybeTokens>().await.unwrap_or_default();
        match (tokens.access_token, tokens.refresh_token) {
            (Some(access), Some(refresh)) if !access.is_empty() => {
                self.session().set_session(&access, &refresh)?;
                Ok(Registered::LoggedIn)
            }
            _ => Ok(Registered::LoginRequired),
        }
    }

    /// Revokes the refresh token server-side and clears the session. The
    /// session is cleared even when the server call fails.
    pub async fn logout(&self) -> Result<(), MelodexError> {
        let token = self.session().refresh_token();
        let result = match self.delete(LOGOUT) {
            Ok(request) => self.execute(request.json(&json!({ "token": token }))).await,
            Err(e) => Err(e),
        };

        self.session().clear_session()?;
        result
    }

    pub async fn profile(&self) -> Result<UserProfile, MelodexError> {
        self.fetch(self.get(USER)?).await
    }
}
