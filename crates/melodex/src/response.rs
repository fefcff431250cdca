use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct MelodexResponse<T> {
    pub data: T,
}

/// Token pair handed out by `/auth/login` (and by `/register` on servers that
/// log the new user straight in). Unlike every other endpoint it is not
/// wrapped in `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tokens {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MaybeTokens {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}
