//! Process settings
//!
//! Settings are read once at startup from the environment:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `GROUP_NAME` | required |
//! | `SECRETS_DIR` | `/var/run/secrets/dns01` |
//! | `SOFTLAYER_ENDPOINT` | `https://api.softlayer.com/rest/v3.1` |
//! | `SOFTLAYER_TIMEOUT_SECS` | `30` |

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use validator::Validate;

/// Default SoftLayer REST endpoint
pub const DEFAULT_SOFTLAYER_ENDPOINT: &str = "https://api.softlayer.com/rest/v3.1";

/// Default root of mounted secrets
pub const DEFAULT_SECRETS_DIR: &str = "/var/run/secrets/dns01";

/// Errors loading process settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Environment could not be deserialized
    #[error("Failed to read settings from environment: {0}")]
    Environment(#[from] envy::Error),

    /// A setting failed validation
    #[error("Invalid settings: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// Solver process settings
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SolverSettings {
    /// API group the solver is registered under
    #[validate(length(min = 1, message = "GROUP_NAME must be specified"))]
    pub group_name: String,

    /// Root directory of mounted secrets (`<root>/<namespace>/<name>/<key>`)
    #[serde(default = "default_secrets_dir")]
    pub secrets_dir: PathBuf,

    /// SoftLayer REST API base URL
    #[serde(default = "default_softlayer_endpoint")]
    #[validate(url)]
    pub softlayer_endpoint: String,

    /// Per-request timeout for SoftLayer API calls
    #[serde(default = "default_softlayer_timeout_secs")]
    #[validate(range(min = 1, max = 300))]
    pub softlayer_timeout_secs: u64,
}

impl SolverSettings {
    /// Load and validate settings from the process environment
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_vars(std::env::vars())
    }

    /// Load and validate settings from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> Result<Self, SettingsError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let settings: Self = envy::from_iter(vars)?;
        settings.validate()?;
        debug!(
            group_name = %settings.group_name,
            secrets_dir = %settings.secrets_dir.display(),
            endpoint = %settings.softlayer_endpoint,
            "Loaded solver settings"
        );
        Ok(settings)
    }

    pub fn softlayer_timeout(&self) -> Duration {
        Duration::from_secs(self.softlayer_timeout_secs)
    }
}

fn default_secrets_dir() -> PathBuf {
    PathBuf::from(DEFAULT_SECRETS_DIR)
}

fn default_softlayer_endpoint() -> String {
    DEFAULT_SOFTLAYER_ENDPOINT.to_string()
}

fn default_softlayer_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let settings =
            SolverSettings::from_vars(vars(&[("GROUP_NAME", "acme.example.com")])).unwrap();

        assert_eq!(settings.group_name, "acme.example.com");
        assert_eq!(settings.secrets_dir, PathBuf::from(DEFAULT_SECRETS_DIR));
        assert_eq!(settings.softlayer_endpoint, DEFAULT_SOFTLAYER_ENDPOINT);
        assert_eq!(settings.softlayer_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let settings = SolverSettings::from_vars(vars(&[
            ("GROUP_NAME", "acme.example.com"),
            ("SECRETS_DIR", "/tmp/secrets"),
            ("SOFTLAYER_ENDPOINT", "http://127.0.0.1:8080/rest"),
            ("SOFTLAYER_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(settings.secrets_dir, PathBuf::from("/tmp/secrets"));
        assert_eq!(settings.softlayer_endpoint, "http://127.0.0.1:8080/rest");
        assert_eq!(settings.softlayer_timeout_secs, 5);
    }

    #[test]
    fn test_group_name_required() {
        let result = SolverSettings::from_vars(vars(&[]));
        assert!(matches!(result, Err(SettingsError::Environment(_))));

        let result = SolverSettings::from_vars(vars(&[("GROUP_NAME", "")]));
        assert!(matches!(result, Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_invalid_endpoint() {
        let result = SolverSettings::from_vars(vars(&[
            ("GROUP_NAME", "acme.example.com"),
            ("SOFTLAYER_ENDPOINT", "not a url"),
        ]));
        assert!(matches!(result, Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_timeout_out_of_range() {
        let result = SolverSettings::from_vars(vars(&[
            ("GROUP_NAME", "acme.example.com"),
            ("SOFTLAYER_TIMEOUT_SECS", "0"),
        ]));
        assert!(matches!(result, Err(SettingsError::Invalid(_))));
    }
}
