//! Provider identity and endpoint derivation.

use serde::{Deserialize, Serialize};
use url::Url;

use super::error::AuthError;
use crate::config::HubcredConfig;

/// OAuth scopes requested from the host authentication subsystem.
///
/// Dependents assume exactly this set; changing it requires coordinating
/// every consumer of the stored sessions.
pub const AUTH_SCOPES: &[&str] = &["read:user", "user:email", "repo"];

/// REST API base for the public `github.com` provider.
pub const PUBLIC_API_BASE: &str = "https://api.github.com";

/// GraphQL endpoint for the public `github.com` provider.
pub const PUBLIC_GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";

/// One of the two supported remote hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthProvider {
    /// The public `github.com` host.
    #[serde(rename = "github")]
    GitHub,
    /// A self-hosted GitHub Enterprise instance.
    #[serde(rename = "github-enterprise")]
    GitHubEnterprise,
}

impl AuthProvider {
    /// Both providers, in initialisation order.
    pub const ALL: [Self; 2] = [Self::GitHub, Self::GitHubEnterprise];

    /// Stable identifier used as the host session scope key.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::GitHubEnterprise => "github-enterprise",
        }
    }

    /// Derives the REST API base URL for this provider.
    ///
    /// The public provider uses the fixed `api.github.com` base; enterprise
    /// instances serve the REST API under `/api/v3`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] when the enterprise URI is
    /// required but not configured, or [`AuthError::InvalidUrl`] when it
    /// cannot be parsed.
    pub fn rest_api_base(self, config: &HubcredConfig) -> Result<Url, AuthError> {
        match self {
            Self::GitHub => Url::parse(PUBLIC_API_BASE)
                .map_err(|error| AuthError::InvalidUrl(error.to_string())),
            Self::GitHubEnterprise => {
                let base = config.enterprise_uri()?;
                join_path(&base, "api/v3")
            }
        }
    }

    /// Derives the GraphQL endpoint URL for this provider.
    ///
    /// Enterprise instances serve GraphQL under `/api/graphql` rather than
    /// the public host's top-level `/graphql`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] when the enterprise URI is
    /// required but not configured, or [`AuthError::InvalidUrl`] when it
    /// cannot be parsed.
    pub fn graphql_endpoint(self, config: &HubcredConfig) -> Result<Url, AuthError> {
        match self {
            Self::GitHub => Url::parse(PUBLIC_GRAPHQL_ENDPOINT)
                .map_err(|error| AuthError::InvalidUrl(error.to_string())),
            Self::GitHubEnterprise => {
                let base = config.enterprise_uri()?;
                join_path(&base, "api/graphql")
            }
        }
    }
}

impl std::fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

fn join_path(base: &Url, suffix: &str) -> Result<Url, AuthError> {
    let joined = format!(
        "{base}/{suffix}",
        base = base.as_str().trim_end_matches('/')
    );
    Url::parse(&joined).map_err(|error| AuthError::InvalidUrl(error.to_string()))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{AUTH_SCOPES, AuthProvider};
    use crate::auth::AuthError;
    use crate::config::HubcredConfig;

    fn enterprise_config() -> HubcredConfig {
        HubcredConfig {
            enterprise_uri: Some("https://github.example.com".to_owned()),
            ..HubcredConfig::default()
        }
    }

    #[rstest]
    fn public_endpoints_are_fixed() {
        let config = HubcredConfig::default();
        let rest = AuthProvider::GitHub
            .rest_api_base(&config)
            .expect("public REST base should parse");
        let graphql = AuthProvider::GitHub
            .graphql_endpoint(&config)
            .expect("public GraphQL endpoint should parse");
        assert_eq!(rest.as_str(), "https://api.github.com/");
        assert_eq!(graphql.as_str(), "https://api.github.com/graphql");
    }

    #[rstest]
    fn enterprise_endpoints_derive_from_configured_uri() {
        let config = enterprise_config();
        let rest = AuthProvider::GitHubEnterprise
            .rest_api_base(&config)
            .expect("enterprise REST base should derive");
        let graphql = AuthProvider::GitHubEnterprise
            .graphql_endpoint(&config)
            .expect("enterprise GraphQL endpoint should derive");
        assert_eq!(rest.as_str(), "https://github.example.com/api/v3");
        assert_eq!(graphql.as_str(), "https://github.example.com/api/graphql");
    }

    #[rstest]
    fn enterprise_endpoints_require_configuration() {
        let config = HubcredConfig::default();
        let error = AuthProvider::GitHubEnterprise
            .rest_api_base(&config)
            .expect_err("missing enterprise URI should error");
        assert!(
            matches!(error, AuthError::Configuration { .. }),
            "expected Configuration, got {error:?}"
        );
    }

    #[rstest]
    fn scopes_cover_user_and_repo_access() {
        assert_eq!(AUTH_SCOPES, &["read:user", "user:email", "repo"]);
    }

    #[rstest]
    #[case(AuthProvider::GitHub, "github")]
    #[case(AuthProvider::GitHubEnterprise, "github-enterprise")]
    fn provider_ids_are_stable(#[case] provider: AuthProvider, #[case] id: &str) {
        assert_eq!(provider.id(), id);
        assert_eq!(provider.to_string(), id);
    }
}
