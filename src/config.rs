//! Runtime configuration for the fetch stage.
//!
//! Values are layered, lowest precedence first:
//! 1. built-in defaults ([`Config::default`])
//! 2. an optional TOML file ([`Config::load`])
//! 3. `FLIGHTDELAY_*` environment variables ([`Config::apply_env`])
//! 4. explicit overrides by the caller (the CLI flags)
//!
//! # Example file
//! ```toml
//! base_url = "http://stat-computing.org/dataexpo/2009"
//! connect_timeout_secs = 20
//! read_timeout_secs = 20
//! transfer_timeout_secs = 1800
//! temp_dir = "/var/tmp"
//! ```

use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Base address the yearly archives are published under.
pub const DEFAULT_BASE_URL: &str = "http://stat-computing.org/dataexpo/2009";
/// Connect and read timeout applied when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
/// Upper bound on a whole download, connect included. The yearly archives
/// run to over a hundred megabytes.
pub const DEFAULT_TRANSFER_TIMEOUT: Duration = Duration::from_secs(30 * 60);

pub const ENV_BASE_URL: &str = "FLIGHTDELAY_BASE_URL";
pub const ENV_CONNECT_TIMEOUT: &str = "FLIGHTDELAY_CONNECT_TIMEOUT_SECS";
pub const ENV_READ_TIMEOUT: &str = "FLIGHTDELAY_READ_TIMEOUT_SECS";
pub const ENV_TRANSFER_TIMEOUT: &str = "FLIGHTDELAY_TRANSFER_TIMEOUT_SECS";
pub const ENV_TEMP_DIR: &str = "FLIGHTDELAY_TEMP_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Longest wait for a single read from the socket.
    pub read_timeout: Duration,
    /// Deadline for the whole transfer, however steadily bytes arrive.
    pub transfer_timeout: Duration,
    /// Directory for the transient archive; the system temp dir when `None`.
    pub temp_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: DEFAULT_TIMEOUT,
            read_timeout: DEFAULT_TIMEOUT,
            transfer_timeout: DEFAULT_TRANSFER_TIMEOUT,
            temp_dir: None,
        }
    }
}

/// On-disk shape; every key is optional and overrides the default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    base_url: Option<String>,
    connect_timeout_secs: Option<u64>,
    read_timeout_secs: Option<u64>,
    transfer_timeout_secs: Option<u64>,
    temp_dir: Option<PathBuf>,
}

impl Config {
    /// Parse a TOML document on top of the defaults.
    ///
    /// # Errors
    /// Returns an error on malformed TOML, unknown keys, or a zero timeout.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(text).context("parse configuration")?;
        let mut cfg = Self::default();
        if let Some(url) = file.base_url {
            cfg.base_url = url;
        }
        if let Some(secs) = file.connect_timeout_secs {
            cfg.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file.read_timeout_secs {
            cfg.read_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file.transfer_timeout_secs {
            cfg.transfer_timeout = Duration::from_secs(secs);
        }
        if file.temp_dir.is_some() {
            cfg.temp_dir = file.temp_dir;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a TOML configuration file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or [`Config::from_toml_str`]
    /// rejects it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("load {}", path.display()))
    }

    /// Apply `FLIGHTDELAY_*` overrides from the process environment.
    ///
    /// # Errors
    /// Returns an error if a timeout variable is not a positive integer.
    pub fn apply_env(self) -> Result<Self> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// # Errors
    /// See [`Config::apply_env`].
    pub fn apply_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(secs) = lookup(ENV_CONNECT_TIMEOUT) {
            self.connect_timeout = parse_secs(ENV_CONNECT_TIMEOUT, &secs)?;
        }
        if let Some(secs) = lookup(ENV_READ_TIMEOUT) {
            self.read_timeout = parse_secs(ENV_READ_TIMEOUT, &secs)?;
        }
        if let Some(secs) = lookup(ENV_TRANSFER_TIMEOUT) {
            self.transfer_timeout = parse_secs(ENV_TRANSFER_TIMEOUT, &secs)?;
        }
        if let Some(dir) = lookup(ENV_TEMP_DIR) {
            self.temp_dir = Some(PathBuf::from(dir));
        }
        self.validate()?;
        Ok(self)
    }

    /// # Errors
    /// Returns an error for an empty base URL or a zero timeout.
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.base_url.trim().is_empty(), "base_url must not be empty");
        ensure!(!self.connect_timeout.is_zero(), "connect timeout must be positive");
        ensure!(!self.read_timeout.is_zero(), "read timeout must be positive");
        ensure!(!self.transfer_timeout.is_zero(), "transfer timeout must be positive");
        Ok(())
    }
}

fn parse_secs(key: &str, value: &str) -> Result<Duration> {
    let secs: u64 = value
        .trim()
        .parse()
        .with_context(|| format!("{key}={value:?} is not a number of seconds"))?;
    Ok(Duration::from_secs(secs))
}
