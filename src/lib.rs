//! Credential and session management for GitHub-integrated host extensions.
//!
//! The crate provides a [`CredentialStore`] that owns authenticated API
//! handles (REST via Octocrab plus a GraphQL transport) for the public
//! `github.com` host and an optional GitHub Enterprise instance, driving the
//! sign-in, retry, and session-change lifecycle against an injected host
//! authentication subsystem. Alongside it sits a small pull request data
//! model, [`PullRequestRecord`], mirroring the remote resource.

pub mod auth;
pub mod config;
pub mod pulls;
pub mod telemetry;

pub use auth::{
    AuthError, AuthProvider, AuthenticationHost, CredentialStore, CurrentUser, GraphqlClient, Hub,
    HubBuilder, OctocrabHubBuilder, Session, SessionOptions,
};
pub use config::HubcredConfig;
pub use pulls::{PullRequestRecord, PullRequestState, RawPullRequest};
pub use telemetry::{NoopTelemetrySink, TelemetryEvent, TelemetrySink};
