use std::{fs, io::ErrorKind, path::Path};

use anyhow::{anyhow, bail, Context};
use client_core::{diagnostics::DEFAULT_LOG_CAPACITY, ConnectionSettings};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "dashboard.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub ui_version: String,
    pub password: Option<String>,
    pub log_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "ws://localhost:8081/ws".into(),
            ui_version: "0.1-a1".into(),
            password: None,
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    server_url: Option<String>,
    ui_version: Option<String>,
    password: Option<String>,
    log_capacity: Option<usize>,
}

impl Settings {
    pub fn connection(&self) -> anyhow::Result<ConnectionSettings> {
        let server_url = normalize_server_url(&self.server_url)?;
        ConnectionSettings::new(server_url, self.ui_version.clone(), self.password.clone())
            .context("invalid connection settings")
    }
}

/// Defaults, then the config file (if it exists), then `DASHBOARD_*`
/// variables from `env`.
pub fn load_settings(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
            if let Some(v) = file_cfg.server_url {
                settings.server_url = v;
            }
            if let Some(v) = file_cfg.ui_version {
                settings.ui_version = v;
            }
            if let Some(v) = file_cfg.password {
                settings.password = Some(v);
            }
            if let Some(v) = file_cfg.log_capacity {
                settings.log_capacity = v;
            }
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    }

    if let Some(v) = env("DASHBOARD_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("DASHBOARD_UI_VERSION") {
        settings.ui_version = v;
    }
    if let Some(v) = env("DASHBOARD_PASSWORD") {
        settings.password = Some(v);
    }
    if let Some(v) = env("DASHBOARD_LOG_CAPACITY") {
        settings.log_capacity = v
            .parse()
            .with_context(|| format!("DASHBOARD_LOG_CAPACITY must be a number, got '{v}'"))?;
    }

    if settings.log_capacity == 0 {
        bail!("log_capacity must be at least 1");
    }

    Ok(settings)
}

/// Accepts `ws(s)://` as is and rewrites `http(s)://` to the matching
/// WebSocket scheme.
pub fn normalize_server_url(raw: &str) -> anyhow::Result<String> {
    let mut url = Url::parse(raw.trim()).with_context(|| format!("invalid server url '{raw}'"))?;
    let scheme = match url.scheme() {
        "ws" | "wss" => return Ok(url.to_string()),
        "http" => "ws",
        "https" => "wss",
        other => bail!("server url '{raw}' has unsupported scheme '{other}'"),
    };
    url.set_scheme(scheme)
        .map_err(|_| anyhow!("cannot rewrite server url '{raw}' to {scheme}://"))?;
    Ok(url.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
