//! The per-provider API handle and its construction.
//!
//! A [`Hub`] bundles the authenticated REST client, the GraphQL transport,
//! and the cached current-user record for one provider. Hubs are owned
//! exclusively by the credential store and replaced wholesale on re-login.

use async_trait::async_trait;
use http::Uri;
use http::header::{ACCEPT, USER_AGENT};
use octocrab::Octocrab;
use serde::Deserialize;

use super::error::AuthError;
use super::graphql::GraphqlClient;
use super::provider::AuthProvider;
use crate::config::HubcredConfig;

/// User agent sent with every REST and GraphQL request.
pub const STANDARD_USER_AGENT: &str = "GitHub VSCode Pull Requests";

/// Vendor preview media type opted into on every request.
pub const PREVIEW_ACCEPT_HEADER: &str = "application/vnd.github.shadow-cat-preview+json";

/// The authenticated user cached on a hub.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CurrentUser {
    /// Login name, compared case-sensitively by `is_current_user`.
    pub login: String,
    /// Display name when the user has set one.
    pub name: Option<String>,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
}

/// The bundle of authenticated clients and cached user for one provider.
pub struct Hub {
    provider: AuthProvider,
    rest: Octocrab,
    graphql: GraphqlClient,
    current_user: Option<CurrentUser>,
}

impl Hub {
    /// Assembles a hub from already-constructed parts.
    #[must_use]
    pub const fn new(
        provider: AuthProvider,
        rest: Octocrab,
        graphql: GraphqlClient,
        current_user: Option<CurrentUser>,
    ) -> Self {
        Self {
            provider,
            rest,
            graphql,
            current_user,
        }
    }

    /// Provider this hub is bound to.
    #[must_use]
    pub const fn provider(&self) -> AuthProvider {
        self.provider
    }

    /// Authenticated REST client.
    #[must_use]
    pub const fn rest(&self) -> &Octocrab {
        &self.rest
    }

    /// Authenticated GraphQL transport.
    #[must_use]
    pub const fn graphql(&self) -> &GraphqlClient {
        &self.graphql
    }

    /// Cached current-user record, populated during hub construction.
    #[must_use]
    pub const fn current_user(&self) -> Option<&CurrentUser> {
        self.current_user.as_ref()
    }
}

impl std::fmt::Debug for Hub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hub")
            .field("provider", &self.provider)
            .field("current_user", &self.current_user)
            .finish_non_exhaustive()
    }
}

/// Builds hubs from session tokens.
///
/// The trait seam keeps the credential store testable without real HTTP.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HubBuilder: Send + Sync {
    /// Builds an authenticated hub for the provider and fetches its current
    /// user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] when endpoint derivation, client construction,
    /// or the current-user fetch fails.
    async fn build(&self, token: &str, provider: AuthProvider) -> Result<Hub, AuthError>;
}

/// Production hub builder backed by Octocrab and reqwest.
#[derive(Debug, Clone)]
pub struct OctocrabHubBuilder {
    config: HubcredConfig,
}

impl OctocrabHubBuilder {
    /// Creates a builder that derives endpoints from the given configuration.
    #[must_use]
    pub const fn new(config: HubcredConfig) -> Self {
        Self { config }
    }

    fn build_rest_client(&self, token: &str, provider: AuthProvider) -> Result<Octocrab, AuthError> {
        let api_base = provider.rest_api_base(&self.config)?;
        let base_uri: Uri = api_base
            .as_str()
            .parse::<Uri>()
            .map_err(|error| AuthError::InvalidUrl(error.to_string()))?;

        Octocrab::builder()
            .personal_token(token.to_owned())
            .base_uri(base_uri)
            .map_err(|error| AuthError::Api {
                message: format!("build client failed: {error}"),
            })?
            .add_header(USER_AGENT, STANDARD_USER_AGENT.to_owned())
            .add_header(ACCEPT, PREVIEW_ACCEPT_HEADER.to_owned())
            .build()
            .map_err(|error| map_octocrab_error("build client", &error))
    }
}

#[async_trait]
impl HubBuilder for OctocrabHubBuilder {
    async fn build(&self, token: &str, provider: AuthProvider) -> Result<Hub, AuthError> {
        let rest = self.build_rest_client(token, provider)?;
        let graphql = GraphqlClient::new(provider.graphql_endpoint(&self.config)?, token);

        let current_user: CurrentUser = rest
            .get("/user", None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("current user", &error))?;

        Ok(Hub::new(provider, rest, graphql, Some(current_user)))
    }
}

/// Checks if a GitHub error status indicates an authentication failure.
const fn is_auth_failure(status: http::StatusCode) -> bool {
    matches!(
        status,
        http::StatusCode::UNAUTHORIZED | http::StatusCode::FORBIDDEN
    )
}

/// Checks if an octocrab error represents a network/transport issue.
const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> AuthError {
    if let octocrab::Error::GitHub { source, .. } = error {
        return if is_auth_failure(source.status_code) {
            AuthError::Authentication {
                message: format!(
                    "{operation} failed: GitHub returned {status} {message}",
                    status = source.status_code,
                    message = source.message
                ),
            }
        } else {
            AuthError::Api {
                message: format!(
                    "{operation} failed with status {status}: {message}",
                    status = source.status_code,
                    message = source.message
                ),
            }
        };
    }

    if is_network_error(error) {
        return AuthError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    AuthError::Api {
        message: format!("{operation} failed: {error}"),
    }
}
