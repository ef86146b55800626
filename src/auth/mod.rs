//! Credential and session management for GitHub providers.
//!
//! This module owns the [`CredentialStore`], which holds at most one
//! authenticated API handle per provider (public `github.com` and an
//! optional GitHub Enterprise instance), mediates sign-in prompts, and
//! caches the current authenticated user per handle. The host's
//! authentication subsystem, the user interaction surface, durable storage,
//! and telemetry are all injected capabilities so the lifecycle can be
//! exercised with fakes.

pub mod error;
pub mod graphql;
pub mod host;
pub mod hub;
pub mod interaction;
pub mod keyvalue;
pub mod provider;
pub mod store;

pub use error::AuthError;
pub use graphql::GraphqlClient;
pub use host::{AuthenticationHost, Session, SessionOptions};
pub use hub::{
    CurrentUser, Hub, HubBuilder, OctocrabHubBuilder, PREVIEW_ACCEPT_HEADER, STANDARD_USER_AGENT,
};
pub use interaction::{RetryChoice, SignInChoice, UserInteraction};
pub use keyvalue::{KeyValueStore, PROMPT_FOR_SIGN_IN_KEY};
pub use provider::{AUTH_SCOPES, AuthProvider};
pub use store::CredentialStore;

#[cfg(any(test, feature = "test-support"))]
pub use keyvalue::InMemoryKeyValueStore;

#[cfg(test)]
pub use host::MockAuthenticationHost;
#[cfg(test)]
pub use hub::MockHubBuilder;
#[cfg(test)]
pub use interaction::MockUserInteraction;
#[cfg(test)]
pub use keyvalue::MockKeyValueStore;
