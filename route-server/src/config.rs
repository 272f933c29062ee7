//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_ORS_BASE_URL: &str = "https://api.openrouteservice.org";
const DEFAULT_OSRM_BASE_URL: &str = "https://router.project-osrm.org";
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 60;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_STATIC_DIR: &str = "static";

/// Error reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything the binary needs to start.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,

    /// OpenRouteService key; ORS is only used when set.
    pub ors_api_key: Option<String>,
    pub ors_base_url: String,
    pub osrm_base_url: String,

    /// HTTP timeout per provider call.
    pub provider_timeout: Duration,

    /// Provider response cache TTL. `None` disables the cache.
    pub cache_ttl: Option<Duration>,

    /// Serve road paths from this JSON file instead of HTTP providers.
    pub fixture_file: Option<PathBuf>,

    pub static_dir: PathBuf,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let listen_addr = parse_var(
            "ROUTE_LISTEN_ADDR",
            get("ROUTE_LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
        )?;

        let provider_timeout_secs: u64 = match get("ROUTE_PROVIDER_TIMEOUT_SECS") {
            Some(v) => parse_var("ROUTE_PROVIDER_TIMEOUT_SECS", v)?,
            None => DEFAULT_PROVIDER_TIMEOUT_SECS,
        };

        let cache_ttl_secs: u64 = match get("ROUTE_CACHE_TTL_SECS") {
            Some(v) => parse_var("ROUTE_CACHE_TTL_SECS", v)?,
            None => DEFAULT_CACHE_TTL_SECS,
        };

        Ok(Self {
            listen_addr,
            ors_api_key: get("ORS_API_KEY").map(|k| k.trim().to_string()),
            ors_base_url: get("ORS_BASE_URL").unwrap_or_else(|| DEFAULT_ORS_BASE_URL.to_string()),
            osrm_base_url: get("OSRM_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OSRM_BASE_URL.to_string()),
            provider_timeout: Duration::from_secs(provider_timeout_secs),
            cache_ttl: (cache_ttl_secs > 0).then(|| Duration::from_secs(cache_ttl_secs)),
            fixture_file: get("ROUTE_FIXTURE_FILE").map(PathBuf::from),
            static_dir: PathBuf::from(
                get("ROUTE_STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
            ),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            ors_api_key: None,
            ors_base_url: DEFAULT_ORS_BASE_URL.to_string(),
            osrm_base_url: DEFAULT_OSRM_BASE_URL.to_string(),
            provider_timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
            cache_ttl: Some(Duration::from_secs(DEFAULT_CACHE_TTL_SECS)),
            fixture_file: None,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

fn parse_var<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: e.to_string(),
        value,
    })
}
