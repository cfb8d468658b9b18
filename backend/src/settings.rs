//! Application settings loaded via OrthoConfig.
//!
//! Values come from `APP_*` environment variables, an optional config file
//! and CLI flags. [`AppSettings::resolve`] validates them once at startup
//! into a typed [`RuntimeConfig`]; any [`ConfigError`] aborts startup.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_ENV: &str = "dev";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
const DEFAULT_DATABASE_NAME: &str = "dev";
const DEFAULT_LOG_LEVEL: &str = "info";

fn default_static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static")
}

/// How the HTML pages are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FrontendMode {
    /// Serve pre-written HTML files from the static directory.
    Static,
    /// Render pages from embedded templates.
    #[default]
    Jinja,
}

impl FrontendMode {
    /// Lower-case name as accepted in configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Jinja => "jinja",
        }
    }
}

impl fmt::Display for FrontendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrontendMode {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "jinja" => Ok(Self::Jinja),
            _ => Err(ConfigError::UnknownFrontendMode {
                value: raw.to_owned(),
            }),
        }
    }
}

/// Startup configuration failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Sources could not be read or merged.
    #[error("failed to load settings: {message}")]
    Load {
        /// Loader diagnostic.
        message: String,
    },
    /// Port zero was requested.
    #[error("port must be between 1 and 65535")]
    ZeroPort,
    /// Base URL does not parse.
    #[error("base URL {value:?} is invalid: {message}")]
    InvalidBaseUrl {
        /// Rejected URL.
        value: String,
        /// Parser diagnostic.
        message: String,
    },
    /// Frontend mode is neither `static` nor `jinja`.
    #[error("unknown frontend mode {value:?}; expected \"static\" or \"jinja\"")]
    UnknownFrontendMode {
        /// Rejected mode.
        value: String,
    },
    /// A required text setting is blank.
    #[error("{field} must not be empty")]
    Empty {
        /// Setting name.
        field: &'static str,
    },
    /// Log level is not a valid `EnvFilter` directive.
    #[error("log level {value:?} is not a valid filter: {message}")]
    InvalidLogLevel {
        /// Rejected directive.
        value: String,
        /// Parser diagnostic.
        message: String,
    },
    /// Static directory is missing or unreadable.
    #[error("static directory {path} cannot be opened: {message}")]
    StaticDir {
        /// Configured directory.
        path: String,
        /// I/O diagnostic.
        message: String,
    },
}

/// Raw settings as loaded.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "APP")]
pub struct AppSettings {
    /// Deployment environment label.
    pub env: Option<String>,
    /// TCP port the HTTP server listens on.
    pub port: Option<u16>,
    /// Public base URL of the API, used by pages and diagnostics.
    pub base_url: Option<String>,
    /// MongoDB connection string; `memory://` selects the in-memory store.
    pub mongodb_uri: Option<String>,
    /// Database holding the register collections.
    pub database_name: Option<String>,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_level: Option<String>,
    /// `static` or `jinja`.
    pub frontend_mode: Option<String>,
    /// Directory holding the static pages.
    pub static_dir: Option<PathBuf>,
}

/// Validated settings consumed by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Deployment environment label.
    pub env: String,
    /// Address the HTTP server binds, on all interfaces.
    pub bind_addr: SocketAddr,
    /// Public base URL of the API.
    pub base_url: Url,
    /// MongoDB connection string or `memory://`.
    pub mongodb_uri: String,
    /// Database holding the register collections.
    pub database_name: String,
    /// Validated `EnvFilter` directive.
    pub log_level: String,
    /// How HTML pages are produced.
    pub frontend_mode: FrontendMode,
    /// Directory holding the static pages.
    pub static_dir: PathBuf,
}

fn non_empty(value: Option<&str>, default: &str, field: &'static str) -> Result<String, ConfigError> {
    let value = value.unwrap_or(default).trim();
    if value.is_empty() {
        return Err(ConfigError::Empty { field });
    }
    Ok(value.to_owned())
}

impl AppSettings {
    /// Load settings from the process environment, config file and arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a source cannot be parsed.
    pub fn from_process() -> Result<Self, ConfigError> {
        Self::load().map_err(|err| ConfigError::Load {
            message: err.to_string(),
        })
    }

    /// Validate and apply defaults.
    ///
    /// # Examples
    /// ```
    /// use backend::settings::{AppSettings, FrontendMode};
    ///
    /// let config = AppSettings::default().resolve().expect("defaults are valid");
    /// assert_eq!(config.bind_addr.port(), 8000);
    /// assert_eq!(config.frontend_mode, FrontendMode::Jinja);
    /// ```
    pub fn resolve(&self) -> Result<RuntimeConfig, ConfigError> {
        let port = self.port.unwrap_or(DEFAULT_PORT);
        if port == 0 {
            return Err(ConfigError::ZeroPort);
        }

        let raw_url = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL).trim();
        let base_url = Url::parse(raw_url).map_err(|err| ConfigError::InvalidBaseUrl {
            value: raw_url.to_owned(),
            message: err.to_string(),
        })?;

        let frontend_mode = self
            .frontend_mode
            .as_deref()
            .map_or(Ok(FrontendMode::default()), FrontendMode::from_str)?;

        let log_level = non_empty(self.log_level.as_deref(), DEFAULT_LOG_LEVEL, "log_level")?;
        EnvFilter::try_new(&log_level).map_err(|err| ConfigError::InvalidLogLevel {
            value: log_level.clone(),
            message: err.to_string(),
        })?;

        Ok(RuntimeConfig {
            env: non_empty(self.env.as_deref(), DEFAULT_ENV, "env")?,
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
            base_url,
            mongodb_uri: non_empty(self.mongodb_uri.as_deref(), DEFAULT_MONGODB_URI, "mongodb_uri")?,
            database_name: non_empty(
                self.database_name.as_deref(),
                DEFAULT_DATABASE_NAME,
                "database_name",
            )?,
            log_level,
            frontend_mode,
            static_dir: self.static_dir.clone().unwrap_or_else(default_static_dir),
        })
    }
}
