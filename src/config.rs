//! Plugin settings, read from the environment Munin passes to plugins.

use std::time::Duration;

use regex::Regex;

use crate::docker::{self, DEFAULT_TIMEOUT, DockerClient, Endpoint};

pub const DOCKER_HOST_ENV: &str = "DOCKER_HOST";
pub const DOCKER_API_VERSION_ENV: &str = "DOCKER_API_VERSION";
pub const DOCKER_TIMEOUT_ENV: &str = "DOCKER_TIMEOUT";
pub const EXCLUDE_CONTAINER_NAME_ENV: &str = "EXCLUDE_CONTAINER_NAME";
pub const DIRTY_CONFIG_ENV: &str = "MUNIN_CAP_DIRTYCONFIG";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid DOCKER_HOST: {0}")]
    Endpoint(#[source] docker::Error),
    #[error("invalid DOCKER_TIMEOUT `{0}`, expected a positive number of seconds")]
    Timeout(String),
    #[error("invalid EXCLUDE_CONTAINER_NAME `{pattern}`: {source}")]
    ExcludePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoint: Endpoint,
    pub api_version: Option<String>,
    pub timeout: Duration,
    /// Containers whose name matches are left out of the per-container series.
    pub exclude: Option<Regex>,
    /// Munin accepts values in the `config` response.
    pub dirty_config: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::default(),
            api_version: None,
            timeout: DEFAULT_TIMEOUT,
            exclude: None,
            dirty_config: false,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from `lookup`, treating empty values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let endpoint = match get(DOCKER_HOST_ENV) {
            Some(host) => host.trim().parse().map_err(Error::Endpoint)?,
            None => Endpoint::default(),
        };

        let timeout = match get(DOCKER_TIMEOUT_ENV) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(Error::Timeout(raw)),
            },
            None => DEFAULT_TIMEOUT,
        };

        let exclude = get(EXCLUDE_CONTAINER_NAME_ENV)
            .map(|pattern| {
                Regex::new(&pattern).map_err(|source| Error::ExcludePattern { pattern, source })
            })
            .transpose()?;

        let settings = Self {
            endpoint,
            api_version: get(DOCKER_API_VERSION_ENV).map(|v| v.trim().to_owned()),
            timeout,
            exclude,
            dirty_config: get(DIRTY_CONFIG_ENV).as_deref() == Some("1"),
        };
        log::debug!("Settings: {settings:?}");

        Ok(settings)
    }

    pub fn client(&self) -> DockerClient {
        let client = DockerClient::new(self.endpoint.clone()).with_timeout(self.timeout);
        match &self.api_version {
            Some(version) => client.with_api_version(version.as_str()),
            None => client,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings(&[]).unwrap();
        assert_eq!(
            settings.endpoint,
            Endpoint::Unix(PathBuf::from("/var/run/docker.sock"))
        );
        assert_eq!(settings.timeout, Duration::from_secs(60));
        assert!(settings.api_version.is_none());
        assert!(settings.exclude.is_none());
        assert!(!settings.dirty_config);
    }

    #[test]
    fn test_all_variables() {
        let settings = settings(&[
            ("DOCKER_HOST", "tcp://127.0.0.1:2375"),
            ("DOCKER_API_VERSION", "1.41"),
            ("DOCKER_TIMEOUT", "5"),
            ("EXCLUDE_CONTAINER_NAME", "^runner-"),
            ("MUNIN_CAP_DIRTYCONFIG", "1"),
        ])
        .unwrap();
        assert_eq!(settings.endpoint, Endpoint::Tcp("127.0.0.1:2375".to_owned()));
        assert_eq!(settings.api_version.as_deref(), Some("1.41"));
        assert_eq!(settings.timeout, Duration::from_secs(5));
        let exclude = settings.exclude.unwrap();
        assert!(exclude.is_match("runner-42"));
        assert!(!exclude.is_match("web"));
        assert!(settings.dirty_config);
    }

    #[test]
    fn test_empty_values_are_unset() {
        let settings = settings(&[("DOCKER_HOST", ""), ("EXCLUDE_CONTAINER_NAME", " ")]).unwrap();
        assert_eq!(settings.endpoint, Endpoint::default());
        assert!(settings.exclude.is_none());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            settings(&[("DOCKER_HOST", "ssh://box")]),
            Err(Error::Endpoint(_))
        ));
        assert!(matches!(
            settings(&[("DOCKER_TIMEOUT", "0")]),
            Err(Error::Timeout(ref v)) if v == "0"
        ));
        assert!(matches!(
            settings(&[("DOCKER_TIMEOUT", "soon")]),
            Err(Error::Timeout(_))
        ));
        assert!(matches!(
            settings(&[("EXCLUDE_CONTAINER_NAME", "(")]),
            Err(Error::ExcludePattern { ref pattern, .. }) if pattern == "("
        ));
    }

    #[test]
    fn test_dirty_config_requires_one() {
        assert!(!settings(&[("MUNIN_CAP_DIRTYCONFIG", "0")]).unwrap().dirty_config);
        assert!(!settings(&[("MUNIN_CAP_DIRTYCONFIG", "yes")]).unwrap().dirty_config);
    }
}
