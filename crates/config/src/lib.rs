//! Configuration for the SoftLayer DNS-01 solver
//!
//! Two layers:
//!
//! - [`ProviderConfig`] - decoded per challenge from the issuer's opaque blob
//! - [`SolverSettings`] - read once per process from the environment

pub mod provider;
pub mod settings;

pub use provider::{ConfigDecodeError, ProviderConfig, SecretKeySelector};
pub use settings::{
    SettingsError, SolverSettings, DEFAULT_SECRETS_DIR, DEFAULT_SOFTLAYER_ENDPOINT,
};
