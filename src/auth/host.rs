//! Injected capability for the host's authentication subsystem.
//!
//! The credential store never talks to a concrete host directly; it consumes
//! this trait so the session lifecycle can be driven by a fake in tests. The
//! trait-based design mirrors the gateway seams used elsewhere in the crate.

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::error::AuthError;
use super::provider::AuthProvider;

/// A host-managed credential lease.
///
/// The id is opaque and stored per provider purely for bookkeeping; only the
/// access token participates in handle construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque session identifier assigned by the host.
    pub id: String,
    /// Access token backing the session.
    pub access_token: String,
}

/// Controls whether a session request may interact with the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Allow the host to prompt for sign-in when no session exists.
    pub create_if_none: bool,
    /// Discard any existing session and prompt for a fresh one.
    pub force_new_session: bool,
}

impl SessionOptions {
    /// Options for a passive request that must not show UI.
    pub const SILENT: Self = Self {
        create_if_none: false,
        force_new_session: false,
    };

    /// Options for an interactive request that may prompt.
    pub const INTERACTIVE: Self = Self {
        create_if_none: true,
        force_new_session: false,
    };

    /// Options that discard existing credentials and always prompt.
    pub const FORCED: Self = Self {
        create_if_none: true,
        force_new_session: true,
    };
}

/// Host authentication subsystem consumed by the credential store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthenticationHost: Send + Sync {
    /// Requests a session for the provider with the given scopes.
    ///
    /// Returns `Ok(None)` when no session exists and the options forbid
    /// prompting.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::ConsentDeclined`] when the user rejects a forced
    /// consent prompt and [`AuthError::HostAuth`] for any other host failure.
    async fn get_session(
        &self,
        provider: AuthProvider,
        scopes: &'static [&'static str],
        options: SessionOptions,
    ) -> Result<Option<Session>, AuthError>;

    /// Checks whether a session exists without prompting.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::HostAuth`] when the host cannot answer; callers
    /// treat this as "no session".
    async fn has_session(
        &self,
        provider: AuthProvider,
        scopes: &'static [&'static str],
    ) -> Result<bool, AuthError>;

    /// Subscribes to host session-change notifications.
    ///
    /// Each received value names the provider whose sessions changed.
    fn subscribe_sessions_changed(&self) -> broadcast::Receiver<AuthProvider>;
}
