use std::time::Duration;
use std::{env, fmt, fs, io, path};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::monitoring::PollerSettings;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    ReadFailed { path: path::PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", path.display())]
    WriteFailed { path: path::PathBuf, source: io::Error },
    #[error("failed to parse {}: {source}", path.display())]
    ParseFailed { path: path::PathBuf, source: toml::de::Error },
    #[error("failed to serialize config: {0}")]
    SerializeFailed(#[from] toml::ser::Error),
    #[error("no config directory available, set XDG_CONFIG_HOME or HOME")]
    ConfigPathUnavailable,
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub registry: Registry,
    pub poller: Poller,
}

/// Where watches are listed from and results reported to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Registry {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Poller {
    /// Pause between two polling cycles
    pub poll_interval_secs: u64,
    /// Upper bound on a single URL check
    pub check_timeout_secs: u64,
    pub max_concurrent_checks: usize,
}

impl Default for Registry {
    fn default() -> Self {
        Self { base_url: "http://127.0.0.1:8000".into(), request_timeout_secs: 10 }
    }
}

impl Default for Poller {
    fn default() -> Self {
        Self { poll_interval_secs: 2, check_timeout_secs: 10, max_concurrent_checks: 1 }
    }
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/uptick/service.toml or
/// $HOME/.config/...)
fn default_config_path() -> Result<path::PathBuf, Error> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(Error::ConfigPathUnavailable);
    };

    Ok(path.join("uptick/service.toml"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);

        writeln!(f, "Current Poller Configuration:")?;
        write_title_1(f, "Registry")?;
        write_1(f, "Base URL", &self.registry.base_url)?;
        write_1(f, "Request Timeout (s)", &self.registry.request_timeout_secs)?;
        write_title_1(f, "Poller")?;
        write_1(f, "Poll Interval (s)", &self.poller.poll_interval_secs)?;
        write_1(f, "Check Timeout (s)", &self.poller.check_timeout_secs)?;
        write_1(f, "Max Concurrent Checks", &self.poller.max_concurrent_checks)?;

        Ok(())
    }
}

impl Config {
    /// Generate Config structure from file
    ///
    /// Creates a default config in ~/.config/uptick/service.toml
    ///  or the specified path if one does not exist
    pub fn from_config(optional_path: Option<impl AsRef<path::Path>>) -> Result<Self, Error> {
        let config_path: path::PathBuf = if let Some(path) = optional_path {
            normalize_toml_path(path.as_ref())
        } else {
            default_config_path()?
        };

        if config_path.exists() {
            let raw_string = fs::read_to_string(&config_path)
                .map_err(|source| Error::ReadFailed { path: config_path.clone(), source })?;
            toml::from_str(raw_string.as_str())
                .map_err(|source| Error::ParseFailed { path: config_path, source })
        } else {
            let config = Self::default();
            config.write_config(&config_path)?;
            tracing::info!("Wrote default config to {}", config_path.display());
            Ok(config)
        }
    }

    /// Serialize and write a config to a file
    pub fn write_config(&self, path: &path::Path) -> Result<(), Error> {
        let config_str: String = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| Error::WriteFailed { path: parent.to_path_buf(), source })?;
        }

        fs::write(path, config_str).map_err(|source| Error::WriteFailed { path: path.to_path_buf(), source })
    }

    pub fn validate(&self) -> Result<(), Error> {
        let url = Url::parse(&self.registry.base_url)
            .map_err(|e| Error::Invalid(format!("registry.base_url {:?}: {e}", self.registry.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Invalid(format!("registry.base_url must be http(s), got {}", url.scheme())));
        }

        for (name, value) in [
            ("registry.request_timeout_secs", self.registry.request_timeout_secs),
            ("poller.poll_interval_secs", self.poller.poll_interval_secs),
            ("poller.check_timeout_secs", self.poller.check_timeout_secs),
        ] {
            if value == 0 {
                return Err(Error::Invalid(format!("{name} must be at least 1")));
            }
        }

        if self.poller.max_concurrent_checks == 0 {
            return Err(Error::Invalid("poller.max_concurrent_checks must be at least 1".into()));
        }

        Ok(())
    }
}

impl Registry {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Poller {
    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout_secs)
    }

    pub fn settings(&self) -> PollerSettings {
        PollerSettings {
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            max_concurrent_checks: self.max_concurrent_checks,
        }
    }
}
