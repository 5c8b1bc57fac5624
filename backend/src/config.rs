use std::{net::SocketAddr, num::NonZeroUsize, path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;

use crate::directions::{DEFAULT_ORS_BASE_URL, DEFAULT_ORS_PROFILE};
use crate::geocode::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_NOMINATIM_BASE_URL, DEFAULT_USER_AGENT, GeocoderConfig,
};

/// Keys shorter than this are treated as placeholders.
pub const MIN_API_KEY_LEN: usize = 10;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_DEMO_DELAY_MS: u64 = 1500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value `{value}` for {var}")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct OrsConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub profile: String,
}

impl OrsConfig {
    /// The key, if it looks like a real one.
    pub fn usable_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| key.chars().count() >= MIN_API_KEY_LEN)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub ors: OrsConfig,
    pub geocoder: GeocoderConfig,
    pub geocode_overrides_path: Option<PathBuf>,
    pub http_timeout: Duration,
    pub demo_delay: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        let http_timeout =
            Duration::from_secs(parse_or(&get, "HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?);
        let cache_capacity = parse_or(&get, "GEOCODE_CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY)?;
        let cache_capacity =
            NonZeroUsize::new(cache_capacity).ok_or_else(|| ConfigError::InvalidValue {
                var: "GEOCODE_CACHE_CAPACITY",
                value: cache_capacity.to_string(),
            })?;

        Ok(Self {
            bind_addr: parse_or(
                &get,
                "BIND_ADDR",
                DEFAULT_BIND_ADDR
                    .parse()
                    .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 8080))),
            )?,
            ors: OrsConfig {
                api_key: get("ORS_API_KEY"),
                base_url: get("ORS_BASE_URL").unwrap_or_else(|| DEFAULT_ORS_BASE_URL.to_string()),
                profile: get("ORS_PROFILE").unwrap_or_else(|| DEFAULT_ORS_PROFILE.to_string()),
            },
            geocoder: GeocoderConfig {
                base_url: get("NOMINATIM_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_NOMINATIM_BASE_URL.to_string()),
                user_agent: get("GEOCODER_USER_AGENT")
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
                cache_capacity,
                timeout: http_timeout,
            },
            geocode_overrides_path: get("GEOCODE_OVERRIDES_PATH").map(PathBuf::from),
            http_timeout,
            demo_delay: Duration::from_millis(parse_or(&get, "DEMO_DELAY_MS", DEFAULT_DEMO_DELAY_MS)?),
        })
    }
}

fn parse_or<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        None => Ok(default),
    }
}
