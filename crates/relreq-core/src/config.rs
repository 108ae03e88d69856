use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;
use crate::transport::CurlOptions;

/// Retry policy parameters (optional `[retry]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Timeout of the first attempt in seconds (e.g. 1.0).
    pub initial_timeout_secs: f64,
    /// Seconds added to the timeout after each failed attempt.
    pub timeout_increment_secs: f64,
    /// Retry 4xx responses like any other failure.
    #[serde(default = "default_true")]
    pub retry_client_errors: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RetryConfig {
    fn default() -> Self {
        let p = RetryPolicy::default();
        Self {
            max_attempts: p.max_attempts,
            initial_timeout_secs: p.initial_timeout.as_secs_f64(),
            timeout_increment_secs: p.timeout_increment.as_secs_f64(),
            retry_client_errors: p.retry_client_errors,
        }
    }
}

impl RetryConfig {
    /// Build a validated policy. Rejects negative, NaN, or infinite durations.
    pub fn to_policy(&self) -> Result<RetryPolicy> {
        let policy = RetryPolicy {
            max_attempts: self.max_attempts,
            initial_timeout: secs_to_duration("initial_timeout_secs", self.initial_timeout_secs)?,
            timeout_increment: secs_to_duration(
                "timeout_increment_secs",
                self.timeout_increment_secs,
            )?,
            retry_client_errors: self.retry_client_errors,
        };
        if let Err(reason) = policy.validate() {
            bail!("invalid [retry] config: {}", reason);
        }
        Ok(policy)
    }
}

/// Convert a seconds value from config or CLI input, naming the field on error.
pub fn secs_to_duration(field: &str, secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .map_err(|e| anyhow::anyhow!("{} = {} is not a valid duration: {}", field, secs, e))
}

/// HTTP transport parameters (optional `[transport]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Connect-phase limit in seconds; never longer than the attempt timeout.
    #[serde(default)]
    pub connect_timeout_secs: Option<f64>,
    #[serde(default = "default_true")]
    pub follow_redirects: bool,
    #[serde(default = "default_max_redirections")]
    pub max_redirections: u32,
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_max_redirections() -> u32 {
    10
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: None,
            follow_redirects: true,
            max_redirections: default_max_redirections(),
            user_agent: None,
        }
    }
}

impl TransportConfig {
    pub fn to_curl_options(&self) -> Result<CurlOptions> {
        let mut opts = CurlOptions {
            follow_redirects: self.follow_redirects,
            max_redirections: self.max_redirections,
            ..CurlOptions::default()
        };
        if let Some(secs) = self.connect_timeout_secs {
            opts.connect_timeout = Some(secs_to_duration("connect_timeout_secs", secs)?);
        }
        if let Some(ua) = &self.user_agent {
            opts.user_agent = Some(ua.clone());
        }
        Ok(opts)
    }
}

/// Global configuration loaded from `~/.config/relreq/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelreqConfig {
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    /// Optional transport tuning; if missing, built-in defaults are used.
    #[serde(default)]
    pub transport: Option<TransportConfig>,
    /// sqlx SQLite URL for item storage (default: `items.db` under the XDG state dir).
    #[serde(default)]
    pub database_url: Option<String>,
}

impl RelreqConfig {
    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        match &self.retry {
            Some(r) => r.to_policy(),
            None => Ok(RetryPolicy::default()),
        }
    }

    pub fn curl_options(&self) -> Result<CurlOptions> {
        match &self.transport {
            Some(t) => t.to_curl_options(),
            None => Ok(CurlOptions::default()),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("relreq")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RelreqConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RelreqConfig {
            retry: Some(RetryConfig::default()),
            ..RelreqConfig::default()
        };
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: RelreqConfig = toml::from_str(&data)?;
    Ok(cfg)
}
