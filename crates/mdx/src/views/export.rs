use std::{
    fmt::Write,
    path::{Path, PathBuf},
};

use bytes::Bytes;
use bytesize::ByteSize;
use futures::{Stream, StreamExt};
use melodex::rating::{EXPORT_FILE_NAME, Performer};
use tokio::io::AsyncWriteExt;

use super::{View, row};
use crate::shell::{
    data::Data,
    render::{Table, heading, list},
    router::Route,
    view::ListView,
};

async fn save<S, E>(stream: S, path: &Path) -> anyhow::Result<u64>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // the previous export stays in place until this one is complete
    let tmp = tempfile::Builder::new()
        .prefix(".ratings_export")
        .tempfile_in(dir)?;
    let mut file = tokio::fs::File::from_std(tmp.reopen()?);

    let mut stream = std::pin::pin!(stream);
    let mut written = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    drop(file);

    tmp.persist(path)?;
    Ok(written)
}

#[derive(Default)]
pub struct ExportView {
    performers: ListView<Performer>,
    saved: Option<(PathBuf, u64)>,
}

impl View for ExportView {
    const COMMANDS: &'static [(&'static str, &'static str)] = &[
        ("find <text>", "filter performers"),
        ("export <n>", "save your song ratings for performer n"),
    ];

    async fn mount(&mut self, data: &Data) {
        self.performers
            .load(data, "fetching performers", data.client.rated_performers())
            .await;
    }

    async fn handle(&mut self, data: &Data, cmd: &str, args: &str) -> bool {
        match cmd {
            "find" => self.performers.set_query(args),
            "export" => self.export(data, args).await,
            _ => return false,
        }
        true
    }

    fn render(&self, _data: &Data) -> String {
        let mut out = String::new();
        heading(&mut out, Route::ExportRatings.title());
        list(&mut out, &self.performers, "No performers found.", |performers| {
            let mut table = Table::new(&["Performer"]);
            for performer in performers {
                table.row([performer.name.as_str()]);
            }
            table.render()
        });
        if let Some((path, size)) = &self.saved {
            writeln!(out, "\nSaved {} ({})", path.display(), ByteSize(*size)).ok();
        }
        out
    }
}

impl ExportView {
    async fn export(&mut self, data: &Data, args: &str) {
        let Some(name) = row(data, &self.performers.visible(), args).map(|p| p.name.clone())
        else {
            return;
        };
        let path = data.config.ui.export_dir.join(EXPORT_FILE_NAME);

        data.toasts.info("Downloading file...");
        let stream = match data.client.export_performer_ratings(&name).await {
            Ok(stream) => stream,
            Err(e) => return data.fail(&e, "downloading the file"),
        };

        match save(stream, &path).await {
            Ok(size) => {
                tracing::info!(performer = %name, path = %path.display(), size, "ratings exported");
                data.toasts.success("File downloaded successfully!");
                self.saved = Some((path, size));
            }
            Err(e) => {
                tracing::error!(error = %e, path = %path.display(), "failed to save export");
                data.toasts.error("Error downloading the file.");
            }
        }
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
    use crate::{
        config::Config,
        testing::{Harness, serve},
    };

    #[tokio::test]
    async fn broken_download_keeps_previous_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPORT_FILE_NAME);
        std::fs::write(&path, "Queen\nBohemian Rhapsody: 5\n").unwrap();

        let stream = futures::stream::iter([
            Ok(Bytes::from_static(b"Queen\nUnder Pre")),
            Err(std::io::Error::other("connection reset")),
        ]);
        assert!(save(stream, &path).await.is_err());

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Queen\nBohemian Rhapsody: 5\n"
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn writes_ratings_export_txt() {
        let router = Router::new()
            .route(
                "/rating/song/get/performers",
                get(|| async { Json(json!({ "data": [{ "PerformerID": 8, "Name": "Queen" }] })) }),
            )
            .route(
                "/rating/song/export/performername",
                post(|Json(body): Json<Value>| async move {
                    format!("{}\nBohemian Rhapsody: 5\n", body["performerName"].as_str().unwrap())
                }),
            );
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.ui.export_dir = dir.path().to_path_buf();
        let mut h = Harness::with_config(&serve(router).await, config);

        let mut view = ExportView::default();
        view.mount(&h.data).await;
        view.handle(&h.data, "export", "1").await;

        let saved = std::fs::read_to_string(dir.path().join("ratings_export.txt")).unwrap();
        assert_eq!(saved, "Queen\nBohemian Rhapsody: 5\n");
        assert_eq!(
            h.messages(),
            ["Downloading file...", "File downloaded successfully!"]
        );
    }
}
