//! Page size settings and the shared handle the paginator reads them from.

use crate::error::ConfigError;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fmt,
    path::Path,
    str::FromStr,
    sync::{Arc, PoisonError, RwLock},
};

pub const DEFAULT_LIMIT: usize = 20;
pub const DEFAULT_MAX_LIMIT: usize = 100;

pub const ENV_LIMIT: &str = "PAGER_LIMIT";
pub const ENV_MAX_LIMIT: &str = "PAGER_MAX_LIMIT";
pub const ENV_HAS_MORE: &str = "PAGER_HAS_MORE";

/// How a page decides whether more rows follow it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HasMoreStrategy {
    /// Count the boundary-filtered scope and compare with the page size.
    #[default]
    Count,
    /// Fetch one extra row and drop it.
    Overfetch,
}

impl FromStr for HasMoreStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" => Ok(HasMoreStrategy::Count),
            "overfetch" => Ok(HasMoreStrategy::Overfetch),
            other => Err(format!("unknown has-more strategy: {other}")),
        }
    }
}

impl fmt::Display for HasMoreStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HasMoreStrategy::Count => write!(f, "count"),
            HasMoreStrategy::Overfetch => write!(f, "overfetch"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagerConfig {
    limit: usize,
    max_limit: usize,
    has_more: HasMoreStrategy,
}

/// On-disk form; every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    limit: Option<usize>,
    max_limit: Option<usize>,
    has_more: Option<HasMoreStrategy>,
}

impl Default for PagerConfig {
    fn default() -> Self {
        PagerConfig {
            limit: DEFAULT_LIMIT,
            max_limit: DEFAULT_MAX_LIMIT,
            has_more: HasMoreStrategy::default(),
        }
    }
}

impl PagerConfig {
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn max_limit(&self) -> usize {
        self.max_limit
    }

    pub fn has_more(&self) -> HasMoreStrategy {
        self.has_more
    }

    /// Stores the default page size, clamped to the current `max_limit`.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.min(self.max_limit);
    }

    pub fn set_max_limit(&mut self, max_limit: usize) {
        self.max_limit = max_limit;
    }

    pub fn set_has_more(&mut self, strategy: HasMoreStrategy) {
        self.has_more = strategy;
    }

    /// Parses a JSON document such as `{"limit": 50, "max_limit": 200}`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_str(json)?;
        let mut config = PagerConfig::default();
        if let Some(max_limit) = file.max_limit {
            config.set_max_limit(max_limit);
        }
        if let Some(limit) = file.limit {
            config.set_limit(limit);
        }
        if let Some(strategy) = file.has_more {
            config.set_has_more(strategy);
        }
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Overlays `PAGER_*` variables on the defaults. `max_limit` is applied
    /// first so the limit is clamped against the new ceiling.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let mut config = PagerConfig::default();
        if let Some(max_limit) = parse_var::<usize>(&vars, ENV_MAX_LIMIT)? {
            config.set_max_limit(max_limit);
        }
        if let Some(limit) = parse_var::<usize>(&vars, ENV_LIMIT)? {
            config.set_limit(limit);
        }
        if let Some(strategy) = parse_var::<HasMoreStrategy>(&vars, ENV_HAS_MORE)? {
            config.set_has_more(strategy);
        }
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }
}

fn parse_var<T: FromStr>(
    vars: &HashMap<String, String>,
    name: &str,
) -> Result<Option<T>, ConfigError> {
    vars.get(name)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidVar {
                name: name.to_string(),
                value: raw.clone(),
            })
        })
        .transpose()
}

lazy_static! {
    static ref GLOBAL_CONFIG: SharedConfig = SharedConfig::default();
}

/// Cloneable handle to a `PagerConfig`. Updates are visible to every clone
/// on their next read.
#[derive(Debug, Clone, Default)]
pub struct SharedConfig(Arc<RwLock<PagerConfig>>);

impl SharedConfig {
    pub fn new(config: PagerConfig) -> Self {
        SharedConfig(Arc::new(RwLock::new(config)))
    }

    /// The process-wide configuration, created on first use.
    pub fn global() -> SharedConfig {
        GLOBAL_CONFIG.clone()
    }

    pub fn snapshot(&self) -> PagerConfig {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn configure<F>(&self, update: F)
    where
        F: FnOnce(&mut PagerConfig),
    {
        let mut config = self.0.write().unwrap_or_else(PoisonError::into_inner);
        update(&mut *config);
    }

    pub fn replace(&self, config: PagerConfig) {
        self.configure(|current| *current = config);
    }

    /// Restores the defaults.
    pub fn reset(&self) {
        self.replace(PagerConfig::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PagerConfig::default();
        assert_eq!(config.limit(), 20);
        assert_eq!(config.max_limit(), 100);
        assert_eq!(config.has_more(), HasMoreStrategy::Count);
    }

    #[test]
    fn test_limit_is_clamped_to_max() {
        let mut config = PagerConfig::default();
        config.set_limit(500);
        assert_eq!(config.limit(), 100);

        config.set_max_limit(10);
        assert_eq!(config.limit(), 100);
        config.set_limit(50);
        assert_eq!(config.limit(), 10);
    }

    #[test]
    fn test_from_vars_applies_max_first() {
        let config = PagerConfig::from_vars([
            (ENV_LIMIT, "300"),
            (ENV_MAX_LIMIT, "250"),
            (ENV_HAS_MORE, "Overfetch"),
        ])
        .unwrap();

        assert_eq!(config.max_limit(), 250);
        assert_eq!(config.limit(), 250);
        assert_eq!(config.has_more(), HasMoreStrategy::Overfetch);
    }

    #[test]
    fn test_from_vars_rejects_garbage() {
        let err = PagerConfig::from_vars([(ENV_LIMIT, "lots")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { name, .. } if name == ENV_LIMIT));
    }

    #[test]
    fn test_from_json() {
        let config = PagerConfig::from_json(r#"{"limit": 40, "has_more": "overfetch"}"#).unwrap();
        assert_eq!(config.limit(), 40);
        assert_eq!(config.max_limit(), 100);
        assert_eq!(config.has_more(), HasMoreStrategy::Overfetch);

        assert!(PagerConfig::from_json("{").is_err());
    }

    #[test]
    fn test_shared_config_updates_are_visible_to_clones() {
        let shared = SharedConfig::default();
        let reader = shared.clone();

        shared.configure(|c| c.set_limit(5));
        assert_eq!(reader.snapshot().limit(), 5);

        shared.reset();
        assert_eq!(reader.snapshot(), PagerConfig::default());
    }

    #[test]
    fn test_global_is_shared() {
        let a = SharedConfig::global();
        let b = SharedConfig::global();
        assert!(Arc::ptr_eq(&a.0, &b.0));
    }
}
