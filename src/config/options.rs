// src/config/options.rs
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use super::consts::*;
use crate::error::ConfigError;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppOptions {
    #[serde(default)]
    pub client: ClientOptions,
    #[serde(default)]
    pub export: ExportOptions,
}

impl AppOptions {
    /// Defaults → `api_downloader.toml` (if present) → `USERDATA_*` env.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment(Path::new(CONFIG_FILE))
            .extract()
            .map_err(ConfigError::from)
    }

    /// Provider chain, exposed so tests can layer on top.
    pub fn figment(config_file: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if config_file.exists() {
            figment = figment.merge(Toml::file(config_file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

/// Knobs for the API client. The normalizer never sees these.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    pub api_url: String,
    pub timeout_secs: u64,
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before retry n is `backoff_factor * 2^(n-1)` seconds.
    pub backoff_factor: f64,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_url: s!(API_URL),
            timeout_secs: TIMEOUT_SECS,
            max_retries: MAX_RETRIES,
            backoff_factor: BACKOFF_FACTOR,
            user_agent: s!(USER_AGENT),
        }
    }
}

impl ClientOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Sleep before retry `n` (1-based). Zero when backoff is disabled.
    pub fn backoff_delay(&self, n: u32) -> Duration {
        if n == 0 || self.backoff_factor <= 0.0 {
            return Duration::ZERO;
        }
        let exp = n.saturating_sub(1).min(30) as i32;
        let secs = (self.backoff_factor * 2f64.powi(exp)).min(MAX_BACKOFF_SECS);
        Duration::from_secs_f64(secs)
    }

    pub fn should_retry_status(status: u16) -> bool {
        RETRY_STATUSES.contains(&status)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub out_dir: PathBuf,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { out_dir: PathBuf::from(DEFAULT_OUT_DIR) }
    }
}

impl ExportOptions {
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Parse GUI text into the output directory. Blank resets to default.
    pub fn set_out_dir(&mut self, text: &str) {
        let s = text.trim();
        self.out_dir = if s.is_empty() {
            PathBuf::from(DEFAULT_OUT_DIR)
        } else {
            PathBuf::from(crate::file::normalize_separators(s))
        };
    }
}
