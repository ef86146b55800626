//! Extension configuration loaded from the environment and files.
//!
//! This module provides the configuration struct consumed by the credential
//! store, merging values from environment variables and configuration files
//! using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in defaults
//! 2. **Configuration file** – `.hubcred.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `HUBCRED_ENTERPRISE_URI`,
//!    `HUBCRED_AVATAR_SIZE`
//!
//! # Configuration File
//!
//! ```toml
//! enterprise_uri = "https://github.example.com"
//! avatar_size = 64
//! ```

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::auth::AuthError;

/// Configuration for the credential store and its API handles.
///
/// # Environment Variables
///
/// - `HUBCRED_ENTERPRISE_URI`: base URI of a GitHub Enterprise instance
/// - `HUBCRED_AVATAR_SIZE`: pixel size requested for author avatars
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "HUBCRED",
    discovery(
        dotfile_name = ".hubcred.toml",
        config_file_name = "hubcred.toml",
        app_name = "hubcred"
    )
)]
pub struct HubcredConfig {
    /// Base URI of a self-hosted GitHub Enterprise instance.
    ///
    /// When unset, only the public `github.com` provider is available.
    #[ortho_config()]
    pub enterprise_uri: Option<String>,

    /// Pixel size requested for author avatar images.
    ///
    /// Defaults to 64.
    #[ortho_config()]
    pub avatar_size: u32,
}

const DEFAULT_AVATAR_SIZE: u32 = 64;

impl Default for HubcredConfig {
    fn default() -> Self {
        Self {
            enterprise_uri: None,
            avatar_size: DEFAULT_AVATAR_SIZE,
        }
    }
}

impl HubcredConfig {
    /// Returns true when an enterprise base URI is configured.
    #[must_use]
    pub const fn has_enterprise_uri(&self) -> bool {
        self.enterprise_uri.is_some()
    }

    /// Returns the configured enterprise base URI.
    ///
    /// Trailing slashes are stripped so derived API paths compose cleanly.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] when no enterprise URI is
    /// configured and [`AuthError::InvalidUrl`] when the configured value
    /// cannot be parsed.
    pub fn enterprise_uri(&self) -> Result<Url, AuthError> {
        let raw = self
            .enterprise_uri
            .as_deref()
            .ok_or_else(|| AuthError::Configuration {
                message: "enterprise URI is not configured".to_owned(),
            })?;

        Url::parse(raw.trim_end_matches('/'))
            .map_err(|error| AuthError::InvalidUrl(error.to_string()))
    }
}
