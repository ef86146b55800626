//! Error types exposed by the credential and session layer.

use thiserror::Error;

/// Errors surfaced while obtaining sessions or building API handles.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The user declined a forced consent prompt.
    ///
    /// Treated as benign by callers that forced a fresh sign-in.
    #[error("user declined the sign-in consent prompt")]
    ConsentDeclined,

    /// The host returned no session and was not allowed to prompt.
    #[error("no session available for provider")]
    NoSession,

    /// The host authentication subsystem failed to produce a session.
    #[error("host authentication failed: {message}")]
    HostAuth {
        /// Failure detail reported by the host.
        message: String,
    },

    /// The remote API rejected the session token.
    #[error("GitHub rejected the credentials: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// The remote API returned a non-authentication error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response detail describing the failure.
        message: String,
    },

    /// Networking failed while calling the remote API.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// A GraphQL response carried an `errors` array.
    #[error("GraphQL query failed: {message}")]
    Graphql {
        /// Concatenated GraphQL error messages.
        message: String,
    },

    /// A base or endpoint URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration was missing or inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}
