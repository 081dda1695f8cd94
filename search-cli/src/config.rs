//! `config.toml` loading and CLI overrides.

use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use dirs::home_dir;
use scrollsearch_client::DEFAULT_BASE_URL;
use scrollsearch_controller::ControllerConfig;
use serde::Deserialize;

pub const SCROLLSEARCH_HOME_ENV: &str = "SCROLLSEARCH_HOME";
pub const CONFIG_TOML_FILE: &str = "config.toml";

/// Contents of `config.toml`. Every key is optional.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigToml {
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
    pub debounce_ms: Option<u64>,
    /// `0` disables the per-request timeout.
    pub request_timeout_ms: Option<u64>,
    pub abort_superseded: Option<bool>,
}

/// Values supplied on the command line. These win over `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub debounce_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
    pub initial_query: String,
}

/// Effective configuration for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub user_agent: String,
    pub controller: ControllerConfig,
}

impl Config {
    pub fn load(overrides: ConfigOverrides) -> io::Result<Self> {
        let home = find_scrollsearch_home()?;
        let toml = load_config_toml(&home)?;
        Ok(Self::from_toml_and_overrides(toml, overrides))
    }

    pub fn from_toml_and_overrides(toml: ConfigToml, overrides: ConfigOverrides) -> Self {
        let defaults = ControllerConfig::default();
        let debounce = overrides
            .debounce_ms
            .or(toml.debounce_ms)
            .map_or(defaults.debounce, Duration::from_millis);
        let request_timeout = match overrides.request_timeout_ms.or(toml.request_timeout_ms) {
            Some(0) => None,
            Some(ms) => Some(Duration::from_millis(ms)),
            None => defaults.request_timeout,
        };

        Self {
            base_url: overrides
                .base_url
                .or(toml.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            user_agent: toml.user_agent.unwrap_or_else(default_user_agent),
            controller: ControllerConfig {
                debounce,
                request_timeout,
                abort_superseded: toml.abort_superseded.unwrap_or(defaults.abort_superseded),
                initial_query: overrides.initial_query,
            },
        }
    }
}

pub fn default_user_agent() -> String {
    format!("scrollsearch/{}", env!("CARGO_PKG_VERSION"))
}

/// Reads `config.toml` from `home`. A missing file yields the defaults.
pub fn load_config_toml(home: &Path) -> io::Result<ConfigToml> {
    let path = home.join(CONFIG_TOML_FILE);
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("{} not found, using defaults", path.display());
            return Ok(ConfigToml::default());
        }
        Err(err) => return Err(err),
    };
    toml::from_str(&contents).map_err(|err| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("failed to parse {}: {err}", path.display()),
        )
    })
}

/// Returns the directory holding `config.toml`: `$SCROLLSEARCH_HOME` when set
/// to a non-empty value, `~/.scrollsearch` otherwise.
///
/// An explicit `SCROLLSEARCH_HOME` must name an existing directory and is
/// returned canonicalized. The default location may not exist yet, in which
/// case the search simply runs with default settings.
pub fn find_scrollsearch_home() -> io::Result<PathBuf> {
    let home_env = std::env::var(SCROLLSEARCH_HOME_ENV)
        .ok()
        .filter(|val| !val.is_empty());
    find_scrollsearch_home_from_env(home_env.as_deref())
}

fn find_scrollsearch_home_from_env(home_env: Option<&str>) -> io::Result<PathBuf> {
    let Some(val) = home_env else {
        let home = home_dir().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no home directory found; set {SCROLLSEARCH_HOME_ENV}"),
            )
        })?;
        return Ok(home.join(".scrollsearch"));
    };

    let path = PathBuf::from(val);
    match std::fs::metadata(&path) {
        Ok(metadata) if metadata.is_dir() => path
            .canonicalize()
            .map_err(|err| home_env_error(err.kind(), val, &format!("cannot be resolved: {err}"))),
        Ok(_) => Err(home_env_error(
            io::ErrorKind::InvalidInput,
            val,
            "is not a directory",
        )),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(home_env_error(
            io::ErrorKind::NotFound,
            val,
            "does not exist",
        )),
        Err(err) => Err(home_env_error(
            err.kind(),
            val,
            &format!("cannot be read: {err}"),
        )),
    }
}

fn home_env_error(kind: io::ErrorKind, val: &str, problem: &str) -> io::Error {
    io::Error::new(kind, format!("{SCROLLSEARCH_HOME_ENV}={val:?} {problem}"))
}
