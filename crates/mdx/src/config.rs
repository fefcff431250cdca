use std::{path::{Path, PathBuf}, time::Duration};

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct SessionConfig {
    /// Where the token file lives; defaults to the platform data dir.
    pub storage: Option<PathBuf>,
    #[serde(default = "default_redirect_delay_ms")]
    pub redirect_delay_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    #[serde(default = "default_start")]
    pub start: String,
    #[serde(default = "default_recommendations")]
    pub recommendations: u32,
}

fn default_base_url() -> String {
    "http://localhost:3000".into()
}

fn default_redirect_delay_ms() -> u64 {
    3000
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_start() -> String {
    "/".into()
}

fn default_recommendations() -> u32 {
    6
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage: None,
            redirect_delay_ms: default_redirect_delay_ms(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            export_dir: default_export_dir(),
            start: default_start(),
            recommendations: default_recommendations(),
        }
    }
}

impl SessionConfig {
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }
}

pub fn load(extra: Option<&Path>) -> anyhow::Result<Config> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("failed to get config directory"))?
        .join("mdx")
        .join("config.toml");

    let mut figment = Figment::new()
        .merge(Toml::file("config.toml"))
        .merge(Toml::file(config_dir));
    if let Some(path) = extra {
        figment = figment.merge(Toml::file(path));
    }

    // MDX_API__BASE_URL=... style overrides
    Ok(figment
        .merge(Env::prefixed("MDX_").split("__"))
        .extract()?)
}
