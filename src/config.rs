use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const BASE_URL_ENV: &str = "DIALOG_DISPLAY_BASE_URL";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

/// Loads the config file. A missing file falls back to defaults unless the
/// caller named it explicitly.
pub fn load_config(path: &Path, explicit: bool) -> Result<Config> {
    if !explicit && !path.exists() {
        return Ok(Config::default());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    parse_and_validate_config(&raw)
}

fn parse_and_validate_config(raw: &str) -> Result<Config> {
    let mut config: Config = toml::from_str(raw).context("failed to parse config as TOML")?;
    config.display.base_url = normalize_base_url(&config.display.base_url)
        .context("display.base_url is invalid")?;
    Ok(config)
}

/// Applies the environment and command line overrides, in that order, and
/// validates whichever value wins.
pub fn apply_overrides(
    mut config: Config,
    env_base_url: Option<String>,
    cli_base_url: Option<String>,
) -> Result<Config> {
    if let Some(base_url) = env_base_url.filter(|value| !value.trim().is_empty()) {
        config.display.base_url = normalize_base_url(&base_url)
            .with_context(|| format!("{BASE_URL_ENV} is invalid"))?;
    }
    if let Some(base_url) = cli_base_url {
        config.display.base_url =
            normalize_base_url(&base_url).context("--base-url is invalid")?;
    }
    Ok(config)
}

pub fn base_url_from_env() -> Option<String> {
    std::env::var(BASE_URL_ENV).ok()
}

/// Checks that `raw` is an http(s) origin with an optional path prefix and
/// returns it without trailing slashes.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("base url must not be empty");
    }
    let url = Url::parse(trimmed).context("base url must be a valid URL string")?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("base url must use http or https, got {}", url.scheme());
    }
    if url.host_str().is_none() {
        bail!("base url must have a host");
    }
    if url.query().is_some() || url.fragment().is_some() {
        bail!("base url must not carry a query or fragment");
    }
    Ok(trimmed.trim_end_matches('/').to_owned())
}
