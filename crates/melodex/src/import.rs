use std::path::Path;

use crate::{Melodex, MelodexError};
use reqwest::multipart::{Form, Part};
use serde_json::json;

const UPLOAD: &str = "upload";
const TRANSFER: &str = "transferDataFromExternalDB";

impl Melodex {
    /// Uploads a CSV of songs as the multipart field `file`.
    pub async fn upload_csv(&self, path: impl AsRef<Path>) -> Result<(), MelodexError> {
        let path = path.as_ref();
        let contents = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "songs.csv".to_string());

        tracing::info!(file = %path.display(), bytes = contents.len(), "uploading csv");
        let part = Part::bytes(contents)
            .file_name(file_name)
            .mime_str("text/csv")?;

        self.execute(self.post(UPLOAD)?.multipart(Form::new().part("file", part)))
            .await
    }

    /// Asks the server to pull songs from the configured external database.
    pub async fn transfer_external_db(&self) -> Result<(), MelodexError> {
        self.execute(self.post(TRANSFER)?.json(&json!({}))).await
    }
}
