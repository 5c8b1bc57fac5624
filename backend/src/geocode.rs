use std::{
    fs::File,
    io::{self, BufReader},
    num::NonZeroUsize,
    path::Path,
    sync::{Mutex, PoisonError},
    time::Duration,
};

use lru::LruCache;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Coordinate, GeocodeResult};

pub const DEFAULT_NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = "EcoRoute/0.1";
pub const DEFAULT_CACHE_CAPACITY: usize = 100;
pub const RESULT_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("query must not be empty")]
    EmptyQuery,
    #[error("no location found for `{0}`")]
    NoResult(String),
    #[error("geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("geocoder responded with status {0}")]
    Upstream(u16),
    #[error("failed to read geocode overrides: {0}")]
    OverridesIo(#[from] io::Error),
    #[error("invalid geocode overrides: {0}")]
    OverridesParse(#[from] serde_json::Error),
}

/// Fixed answer for queries the upstream geocoder resolves badly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeOverride {
    /// Case-insensitive substrings; any match triggers the override.
    pub terms: Vec<String>,
    pub result: GeocodeResult,
}

/// The default "Al Anbar" point sits in open desert with no road to snap to.
static DEFAULT_OVERRIDES: Lazy<Vec<GeocodeOverride>> = Lazy::new(|| {
    vec![GeocodeOverride {
        terms: vec!["الانبار".into(), "al anbar".into(), "anbar".into()],
        result: GeocodeResult {
            lat: 33.4318,
            lon: 43.2987,
            display_name: "Al Anbar (Ramadi), Iraq".into(),
        },
    }]
});

#[derive(Debug, Clone)]
pub struct GeocodeOverrides {
    entries: Vec<GeocodeOverride>,
}

impl Default for GeocodeOverrides {
    fn default() -> Self {
        Self::new(DEFAULT_OVERRIDES.clone())
    }
}

impl GeocodeOverrides {
    pub fn new(entries: Vec<GeocodeOverride>) -> Self {
        let entries = entries
            .into_iter()
            .map(|mut entry| {
                entry.terms = entry.terms.iter().map(|t| t.to_lowercase()).collect();
                entry
            })
            .collect();
        Self { entries }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GeocodeError> {
        let file = File::open(path)?;
        let entries: Vec<GeocodeOverride> = serde_json::from_reader(BufReader::new(file))?;
        Ok(Self::new(entries))
    }

    pub fn lookup(&self, query: &str) -> Option<&GeocodeResult> {
        let query = query.to_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.terms.iter().any(|term| query.contains(term.as_str())))
            .map(|entry| &entry.result)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Bounded query → results store evicting the oldest insertion first.
///
/// Reads use `peek`, so a hit never refreshes an entry's position.
pub struct GeocodeCache {
    entries: Mutex<LruCache<String, Vec<GeocodeResult>>>,
}

impl GeocodeCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, query: &str) -> Option<Vec<GeocodeResult>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .peek(query)
            .cloned()
    }

    pub fn insert(&self, query: String, results: Vec<GeocodeResult>) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.contains(&query) {
            return;
        }
        if let Some((evicted, _)) = entries.push(query, results) {
            tracing::debug!("geocode cache full, evicted `{evicted}`");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub user_agent: String,
    pub cache_capacity: NonZeroUsize,
    pub timeout: Duration,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NOMINATIM_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            cache_capacity: NonZeroUsize::new(DEFAULT_CACHE_CAPACITY)
                .unwrap_or(NonZeroUsize::MIN),
            timeout: Duration::from_secs(15),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

impl NominatimPlace {
    fn into_result(self) -> Option<GeocodeResult> {
        Some(GeocodeResult {
            lat: self.lat.trim().parse().ok()?,
            lon: self.lon.trim().parse().ok()?,
            display_name: self.display_name,
        })
    }
}

/// Nominatim-backed address lookup with overrides and a bounded cache.
pub struct Geocoder {
    client: reqwest::Client,
    search_url: String,
    overrides: GeocodeOverrides,
    cache: GeocodeCache,
}

impl Geocoder {
    pub fn new(config: &GeocoderConfig, overrides: GeocodeOverrides) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            search_url: format!("{}/search", config.base_url.trim_end_matches('/')),
            overrides,
            cache: GeocodeCache::new(config.cache_capacity),
        })
    }

    pub async fn search(&self, query: &str) -> Result<Vec<GeocodeResult>, GeocodeError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }

        if let Some(result) = self.overrides.lookup(query) {
            tracing::debug!("geocode override matched `{query}`");
            return Ok(vec![result.clone()]);
        }

        if let Some(results) = self.cache.get(query) {
            tracing::debug!("geocode cache hit for `{query}`");
            return Ok(results);
        }

        let limit = RESULT_LIMIT.to_string();
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("format", "json"), ("q", query), ("limit", limit.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Upstream(response.status().as_u16()));
        }

        let places: Vec<NominatimPlace> = response.json().await?;
        let results: Vec<GeocodeResult> = places
            .into_iter()
            .filter_map(NominatimPlace::into_result)
            .collect();

        tracing::info!("geocoded `{query}` to {} candidate(s)", results.len());
        self.cache.insert(query.to_string(), results.clone());
        Ok(results)
    }

    /// First candidate wins; callers get no say in disambiguation.
    pub async fn resolve(&self, query: &str) -> Result<Coordinate, GeocodeError> {
        self.search(query)
            .await?
            .first()
            .map(GeocodeResult::coordinate)
            .ok_or_else(|| GeocodeError::NoResult(query.to_string()))
    }

    pub fn cached_queries(&self) -> usize {
        self.cache.len()
    }
}
