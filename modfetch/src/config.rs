//! Configuration for remote module resolution.
//!
//! A [`RemoteConfig`] is built once at startup and passed by reference into
//! the resolver chain. Nothing reads the environment at resolution time.
//!
//! Sources, later ones winning:
//! 1. Built-in defaults (root URL, version tag, timeout, retry policy)
//! 2. An INI file (see [`RemoteConfig::from_ini_file`])
//! 3. Environment variables (see [`RemoteConfig::from_env`])
//!
//! The cache root has no default; a configuration without one is rejected.
//!
//! # File format
//!
//! ```text
//! [remote]
//! root_url = http://www.jboss.org/jbossas/modules/
//! repository_version = trunk
//! timeout_secs = 30
//! max_retries = 2
//! retry_backoff_ms = 200
//!
//! [cache]
//! root = /var/cache/modules
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use reqwest::Url;
use thiserror::Error;

use crate::cache::CacheError;
use crate::remote::{RetryPolicy, DEFAULT_TIMEOUT_SECS};

/// Default repository root URL.
pub const DEFAULT_ROOT_URL: &str = "http://www.jboss.org/jbossas/modules/";

/// Default repository version tag.
pub const DEFAULT_REPOSITORY_VERSION: &str = "trunk";

/// Environment variable overriding the repository root URL.
pub const ENV_ROOT_URL: &str = "MODFETCH_ROOT_URL";
/// Environment variable overriding the repository version tag.
pub const ENV_REPOSITORY_VERSION: &str = "MODFETCH_REPOSITORY_VERSION";
/// Environment variable naming the cache root.
pub const ENV_CACHE_ROOT: &str = "MODFETCH_CACHE_ROOT";
/// Fallback environment variable naming the cache root.
pub const ENV_MODULE_PATH: &str = "MODULEPATH";
/// Environment variable overriding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "MODFETCH_TIMEOUT_SECS";

const SECTION_REMOTE: &str = "remote";
const SECTION_CACHE: &str = "cache";

/// Errors produced while building a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No cache root was configured.
    #[error("no cache root configured (set [cache] root, MODFETCH_CACHE_ROOT or MODULEPATH)")]
    MissingCacheRoot,

    /// The repository root URL is unusable.
    #[error("invalid repository URL '{url}': {reason}")]
    InvalidRootUrl { url: String, reason: String },

    /// The repository version tag is unusable.
    #[error("invalid repository version '{0}': must be non-empty and contain no '/'")]
    InvalidRepositoryVersion(String),

    /// A numeric setting could not be parsed.
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },

    /// The configuration file could not be read.
    #[error("failed to read config file {}: {reason}", path.display())]
    File { path: PathBuf, reason: String },

    /// The cache root cannot be used.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The HTTP client could not be created.
    #[error("failed to create HTTP client: {0}")]
    HttpClient(String),
}

/// Configuration for remote module resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Repository root URL; artifacts live under `<root_url><version>/...`.
    pub root_url: String,

    /// Version tag prefixed to every remote path (e.g. `trunk`).
    pub repository_version: String,

    /// Local cache root directory.
    pub cache_root: PathBuf,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Retry policy for transient repository failures.
    pub retry: RetryPolicy,
}

impl RemoteConfig {
    /// Create a configuration with defaults and the given cache root.
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        Self {
            root_url: DEFAULT_ROOT_URL.to_string(),
            repository_version: DEFAULT_REPOSITORY_VERSION.to_string(),
            cache_root: cache_root.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        }
    }

    /// Set the repository root URL.
    pub fn with_root_url(mut self, url: impl Into<String>) -> Self {
        self.root_url = url.into();
        self
    }

    /// Set the repository version tag.
    pub fn with_repository_version(mut self, version: impl Into<String>) -> Self {
        self.repository_version = version.into();
        self
    }

    /// Set the HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Build a configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a configuration from a variable lookup.
    ///
    /// Used by [`RemoteConfig::from_env`]; takes the lookup as a parameter so
    /// callers can supply variables from elsewhere.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut layer = ConfigLayer::default();
        layer.apply_vars(lookup)?;
        layer.finish()
    }

    /// Build a configuration from an INI file.
    pub fn from_ini_file(path: &Path) -> Result<Self, ConfigError> {
        ConfigLayer::from_ini_file(path)?.finish()
    }

    /// Build a configuration from an optional INI file overlaid with the
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_vars(path, |key| std::env::var(key).ok())
    }

    /// Build a configuration from an optional INI file overlaid with
    /// variables from `lookup`.
    ///
    /// `lookup` is queried with the `MODFETCH_*` / `MODULEPATH` names, so a
    /// caller can put its own overrides (e.g. command-line flags) in front of
    /// the environment.
    pub fn load_with_vars<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut layer = match path {
            Some(path) => ConfigLayer::from_ini_file(path)?,
            None => ConfigLayer::default(),
        };
        layer.apply_vars(lookup)?;
        layer.finish()
    }

    /// Check the configuration and normalize the root URL.
    ///
    /// The root URL must be an absolute http(s) URL; a trailing `/` is added
    /// when missing so resource paths can be appended directly.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.cache_root.as_os_str().is_empty() {
            return Err(ConfigError::MissingCacheRoot);
        }

        let url = Url::parse(&self.root_url).map_err(|e| ConfigError::InvalidRootUrl {
            url: self.root_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidRootUrl {
                url: self.root_url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if !self.root_url.ends_with('/') {
            self.root_url.push('/');
        }

        if self.repository_version.is_empty() || self.repository_version.contains('/') {
            return Err(ConfigError::InvalidRepositoryVersion(
                self.repository_version.clone(),
            ));
        }

        Ok(self)
    }
}

/// Get the default configuration file path (`~/.modfetch/config.ini`).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".modfetch").join("config.ini"))
}

/// Partially specified configuration, one per source.
#[derive(Debug, Default)]
struct ConfigLayer {
    root_url: Option<String>,
    repository_version: Option<String>,
    cache_root: Option<PathBuf>,
    timeout_secs: Option<u64>,
    max_retries: Option<u32>,
    retry_backoff_ms: Option<u64>,
}

impl ConfigLayer {
    fn from_ini_file(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::File {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let remote = |key: &str| {
            ini.section(Some(SECTION_REMOTE))
                .and_then(|s| s.get(key))
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };
        let cache_root = ini
            .section(Some(SECTION_CACHE))
            .and_then(|s| s.get("root"))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            root_url: remote("root_url").map(String::from),
            repository_version: remote("repository_version").map(String::from),
            cache_root,
            timeout_secs: remote("timeout_secs")
                .map(|v| parse_number("remote.timeout_secs", v))
                .transpose()?,
            max_retries: remote("max_retries")
                .map(|v| parse_number("remote.max_retries", v))
                .transpose()?,
            retry_backoff_ms: remote("retry_backoff_ms")
                .map(|v| parse_number("remote.retry_backoff_ms", v))
                .transpose()?,
        })
    }

    fn apply_vars<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_ROOT_URL) {
            self.root_url = Some(url);
        }
        if let Some(version) = get(ENV_REPOSITORY_VERSION) {
            self.repository_version = Some(version);
        }
        if let Some(root) = get(ENV_CACHE_ROOT).or_else(|| get(ENV_MODULE_PATH)) {
            self.cache_root = Some(PathBuf::from(root));
        }
        if let Some(timeout) = get(ENV_TIMEOUT_SECS) {
            self.timeout_secs = Some(parse_number(ENV_TIMEOUT_SECS, &timeout)?);
        }
        Ok(())
    }

    fn finish(self) -> Result<RemoteConfig, ConfigError> {
        let cache_root = self.cache_root.ok_or(ConfigError::MissingCacheRoot)?;
        let mut config = RemoteConfig::new(cache_root);

        if let Some(url) = self.root_url {
            config.root_url = url;
        }
        if let Some(version) = self.repository_version {
            config.repository_version = version;
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = self.max_retries {
            config.retry.max_retries = retries;
        }
        if let Some(ms) = self.retry_backoff_ms {
            config.retry.initial_backoff = Duration::from_millis(ms);
        }

        config.validate()
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = RemoteConfig::new("/cache");
        assert_eq!(config.root_url, DEFAULT_ROOT_URL);
        assert_eq!(config.repository_version, "trunk");
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.retry, RetryPolicy::default());
    }

    #[test]
    fn test_builder_pattern() {
        let config = RemoteConfig::new("/cache")
            .with_root_url("https://repo.example.com/modules/")
            .with_repository_version("7.0")
            .with_timeout(Duration::from_secs(5))
            .with_retry(RetryPolicy::none());

        assert_eq!(config.root_url, "https://repo.example.com/modules/");
        assert_eq!(config.repository_version, "7.0");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry.max_retries, 0);
    }

    #[test]
    fn test_from_vars_requires_cache_root() {
        let result = RemoteConfig::from_vars(vars(&[]));
        assert!(matches!(result, Err(ConfigError::MissingCacheRoot)));
    }

    #[test]
    fn test_from_vars_reads_all_settings() {
        let config = RemoteConfig::from_vars(vars(&[
            (ENV_ROOT_URL, "https://repo.example.com/m"),
            (ENV_REPOSITORY_VERSION, "6.1"),
            (ENV_CACHE_ROOT, "/var/cache/modules"),
            (ENV_TIMEOUT_SECS, "12"),
        ]))
        .unwrap();

        assert_eq!(config.root_url, "https://repo.example.com/m/");
        assert_eq!(config.repository_version, "6.1");
        assert_eq!(config.cache_root, PathBuf::from("/var/cache/modules"));
        assert_eq!(config.timeout, Duration::from_secs(12));
    }

    #[test]
    fn test_module_path_fallback() {
        let config = RemoteConfig::from_vars(vars(&[(ENV_MODULE_PATH, "/opt/modules")])).unwrap();
        assert_eq!(config.cache_root, PathBuf::from("/opt/modules"));

        let config = RemoteConfig::from_vars(vars(&[
            (ENV_MODULE_PATH, "/opt/modules"),
            (ENV_CACHE_ROOT, "/preferred"),
        ]))
        .unwrap();
        assert_eq!(config.cache_root, PathBuf::from("/preferred"));
    }

    #[test]
    fn test_invalid_timeout() {
        let result = RemoteConfig::from_vars(vars(&[
            (ENV_CACHE_ROOT, "/cache"),
            (ENV_TIMEOUT_SECS, "soon"),
        ]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let bad = RemoteConfig::new("/cache").with_root_url("not a url").validate();
        assert!(matches!(bad, Err(ConfigError::InvalidRootUrl { .. })));

        let ftp = RemoteConfig::new("/cache")
            .with_root_url("ftp://example.com/")
            .validate();
        assert!(matches!(ftp, Err(ConfigError::InvalidRootUrl { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_version() {
        for version in ["", "a/b"] {
            let result = RemoteConfig::new("/cache")
                .with_repository_version(version)
                .validate();
            assert!(matches!(
                result,
                Err(ConfigError::InvalidRepositoryVersion(_))
            ));
        }
    }

    #[test]
    fn test_from_ini_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(
            &path,
            "[remote]\n\
             root_url = https://repo.example.com/modules/\n\
             repository_version = 7.1\n\
             timeout_secs = 9\n\
             max_retries = 4\n\
             retry_backoff_ms = 50\n\
             \n\
             [cache]\n\
             root = /srv/modules\n",
        )
        .unwrap();

        let config = RemoteConfig::from_ini_file(&path).unwrap();
        assert_eq!(config.root_url, "https://repo.example.com/modules/");
        assert_eq!(config.repository_version, "7.1");
        assert_eq!(config.cache_root, PathBuf::from("/srv/modules"));
        assert_eq!(config.timeout, Duration::from_secs(9));
        assert_eq!(config.retry.max_retries, 4);
        assert_eq!(config.retry.initial_backoff, Duration::from_millis(50));
    }

    #[test]
    fn test_ini_file_without_cache_root() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(&path, "[remote]\nrepository_version = 7.1\n").unwrap();

        let result = RemoteConfig::from_ini_file(&path);
        assert!(matches!(result, Err(ConfigError::MissingCacheRoot)));
    }

    #[test]
    fn test_vars_override_ini_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(
            &path,
            "[remote]\nrepository_version = 7.1\n[cache]\nroot = /from/file\n",
        )
        .unwrap();

        let config = RemoteConfig::load_with_vars(
            Some(&path),
            vars(&[(ENV_CACHE_ROOT, "/from/vars")]),
        )
        .unwrap();
        assert_eq!(config.repository_version, "7.1");
        assert_eq!(config.cache_root, PathBuf::from("/from/vars"));
    }

    #[test]
    fn test_missing_ini_file() {
        let temp = tempfile::tempdir().unwrap();
        let result = RemoteConfig::from_ini_file(&temp.path().join("absent.ini"));
        assert!(matches!(result, Err(ConfigError::File { .. })));
    }

    #[test]
    fn test_default_config_path() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with(".modfetch/config.ini"));
        }
    }
}
