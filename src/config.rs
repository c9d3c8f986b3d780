//! Backend connection settings read from the environment

use std::time::Duration;

use crate::types::{GstError, GstResult};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5001/api";
pub const API_URL_VAR: &str = "GST_API_URL";
pub const API_TIMEOUT_VAR: &str = "GST_API_TIMEOUT_SECS";

#[derive(Clone, Debug, PartialEq)]
pub struct BackendConfig {
    /// Base URL including the `/api` prefix
    pub base_url: String,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: None,
        }
    }
}

impl BackendConfig {
    pub fn from_env() -> GstResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup, e.g. a map in tests
    pub fn from_lookup<F>(lookup: F) -> GstResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(API_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout = match lookup(API_TIMEOUT_VAR).filter(|v| !v.trim().is_empty()) {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    GstError::Config(format!(
                        "{} must be a whole number of seconds, got '{}'",
                        API_TIMEOUT_VAR, raw
                    ))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self::default().with_base_url(base_url)?.with_timeout(timeout))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> GstResult<Self> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(GstError::Config(format!(
                "Backend URL must start with http:// or https://, got '{}'",
                base_url
            )));
        }
        self.base_url = base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = BackendConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_overrides() {
        let config = BackendConfig::from_lookup(lookup(&[
            (API_URL_VAR, "https://gst.example.com/api/"),
            (API_TIMEOUT_VAR, "30"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://gst.example.com/api");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            BackendConfig::from_lookup(lookup(&[(API_TIMEOUT_VAR, "soon")])),
            Err(GstError::Config(_))
        ));
        assert!(matches!(
            BackendConfig::from_lookup(lookup(&[(API_URL_VAR, "localhost:5001")])),
            Err(GstError::Config(_))
        ));
    }
}
