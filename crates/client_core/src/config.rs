use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context};
use serde::Deserialize;
use url::Url;

use crate::{pagination::DEFAULT_SCROLL_THRESHOLD_PX, search::DEFAULT_SEARCH_DEBOUNCE};

pub const DEFAULT_SETTINGS_FILE: &str = "item_list.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server_url: String,
    pub search_debounce_ms: u64,
    pub scroll_threshold_px: f64,
    /// Zero disables the timeout.
    pub request_timeout_ms: u64,
    pub reload_after_reorder: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:4000".into(),
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE.as_millis() as u64,
            scroll_threshold_px: DEFAULT_SCROLL_THRESHOLD_PX,
            request_timeout_ms: 10_000,
            reload_after_reorder: false,
        }
    }
}

/// Timing and policy knobs the engine runs with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncTuning {
    pub search_debounce: Duration,
    pub scroll_threshold_px: f64,
    pub request_timeout: Option<Duration>,
    pub reload_after_reorder: bool,
}

impl Default for SyncTuning {
    fn default() -> Self {
        Settings::default().tuning()
    }
}

impl Settings {
    pub fn tuning(&self) -> SyncTuning {
        SyncTuning {
            search_debounce: Duration::from_millis(self.search_debounce_ms),
            scroll_threshold_px: self.scroll_threshold_px.max(0.0),
            request_timeout: (self.request_timeout_ms > 0)
                .then(|| Duration::from_millis(self.request_timeout_ms)),
            reload_after_reorder: self.reload_after_reorder,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    server_url: Option<String>,
    search_debounce_ms: Option<u64>,
    scroll_threshold_px: Option<f64>,
    request_timeout_ms: Option<u64>,
    reload_after_reorder: Option<bool>,
}

impl FileSettings {
    fn apply(self, settings: &mut Settings) {
        if let Some(v) = self.server_url {
            settings.server_url = v;
        }
        if let Some(v) = self.search_debounce_ms {
            settings.search_debounce_ms = v;
        }
        if let Some(v) = self.scroll_threshold_px {
            settings.scroll_threshold_px = v;
        }
        if let Some(v) = self.request_timeout_ms {
            settings.request_timeout_ms = v;
        }
        if let Some(v) = self.reload_after_reorder {
            settings.reload_after_reorder = v;
        }
    }
}

/// Defaults, then `item_list.toml` in the working directory if present, then
/// environment overrides.
pub fn load_settings() -> anyhow::Result<Settings> {
    let path = Path::new(DEFAULT_SETTINGS_FILE);
    let mut settings = if path.exists() {
        load_settings_from(path)?
    } else {
        Settings::default()
    };
    apply_env_overrides(&mut settings);
    settings.server_url = normalize_server_url(&settings.server_url)?;
    Ok(settings)
}

pub fn load_settings_from(path: &Path) -> anyhow::Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    parse_settings(&raw).with_context(|| format!("invalid settings file '{}'", path.display()))
}

fn parse_settings(raw: &str) -> anyhow::Result<Settings> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    let mut settings = Settings::default();
    file_cfg.apply(&mut settings);
    settings.server_url = normalize_server_url(&settings.server_url)?;
    Ok(settings)
}

fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(v) = std::env::var("ITEM_LIST_SERVER_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = std::env::var("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Ok(v) = std::env::var("APP__SEARCH_DEBOUNCE_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.search_debounce_ms = parsed;
        }
    }
    if let Ok(v) = std::env::var("APP__SCROLL_THRESHOLD_PX") {
        if let Ok(parsed) = v.parse::<f64>() {
            settings.scroll_threshold_px = parsed;
        }
    }
    if let Ok(v) = std::env::var("APP__REQUEST_TIMEOUT_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_ms = parsed;
        }
    }
    if let Ok(v) = std::env::var("APP__RELOAD_AFTER_REORDER") {
        if let Ok(parsed) = v.parse::<bool>() {
            settings.reload_after_reorder = parsed;
        }
    }
}

/// Trims whitespace and trailing slashes; only http(s) base URLs are accepted.
pub fn normalize_server_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        bail!("server url must not be empty");
    }

    let parsed = Url::parse(trimmed).with_context(|| format!("invalid server url '{trimmed}'"))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => bail!("unsupported server url scheme '{other}' in '{trimmed}'"),
    }
    if parsed.host_str().is_none() {
        bail!("server url '{trimmed}' has no host");
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
