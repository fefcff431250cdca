use std::{fmt::Write, path::PathBuf};

use bytesize::ByteSize;

use super::View;
use crate::shell::{data::Data, render::heading, router::Route};

#[derive(Default)]
pub struct ImportView {
    file: Option<(PathBuf, u64)>,
}

impl View for ImportView {
    const COMMANDS: &'static [(&'static str, &'static str)] = &[
        ("file <path>", "choose a CSV file"),
        ("upload", "upload the chosen file"),
        ("transfer", "import songs from the external database"),
    ];

    async fn mount(&mut self, _data: &Data) {}

    async fn handle(&mut self, data: &Data, cmd: &str, args: &str) -> bool {
        match cmd {
            "file" => self.choose(data, args).await,
            "upload" => self.upload(data).await,
            "transfer" => {
                data.toasts.info("Importing from external DB...");
                match data.client.transfer_external_db().await {
                    Ok(()) => data.toasts.success("Songs imported from DB successfully"),
                    Err(e) => data.fail(&e, "importing from external DB"),
                }
            }
            _ => return false,
        }
        true
    }

    fn render(&self, _data: &Data) -> String {
        let mut out = String::new();
        heading(&mut out, Route::ImportSong.title());
        match &self.file {
            Some((path, size)) => {
                writeln!(out, "File: {} ({})", path.display(), ByteSize(*size)).ok();
            }
            None => {
                writeln!(out, "No file chosen.").ok();
            }
        }
        out
    }
}

impl ImportView {
    async fn choose(&mut self, data: &Data, args: &str) {
        let path = PathBuf::from(args.trim());
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if !is_csv {
            data.toasts.warn("Please choose a .csv file.");
            return;
        }

        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => self.file = Some((path, meta.len())),
            Ok(_) => data.toasts.warn(format!("{} is not a file.", path.display())),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "cannot stat csv");
                data.toasts.warn(format!("Cannot read {}.", path.display()));
            }
        }
    }

    async fn upload(&mut self, data: &Data) {
        let Some((path, _)) = self.file.clone() else {
            data.toasts.warn("No CSV file selected");
            return;
        };

        data.toasts.info("Importing from CSV file...");
        match data.client.upload_csv(&path).await {
            Ok(()) => {
                data.toasts.success("Songs uploaded successfully");
                self.file = None;
            }
            Err(e) => data.fail(&e, "importing from CSV file"),
        }
    }
}
