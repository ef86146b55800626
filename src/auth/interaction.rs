//! Injected capability for user-facing sign-in prompts.
//!
//! Prompt wording and presentation belong to the host; the credential store
//! only cares about which choice the user made.

use async_trait::async_trait;

use super::provider::AuthProvider;

/// Outcome of the blocking retry prompt shown after a failed sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryChoice {
    /// Run another sign-in attempt.
    TryAgain,
    /// Give up on signing in.
    Cancel,
}

/// Outcome of the non-blocking sign-in notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInChoice {
    /// Start the interactive sign-in flow.
    SignIn,
    /// Suppress the notification permanently.
    DontShowAgain,
    /// The notification was dismissed without a choice.
    Dismissed,
}

/// User interaction surface consumed by the credential store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserInteraction: Send + Sync {
    /// Shows a modal "try again / cancel" choice after a failed attempt.
    async fn retry_prompt(&self, provider: AuthProvider, message: &str) -> RetryChoice;

    /// Shows the "Sign in" / "Don't show again" notification.
    async fn sign_in_prompt(&self, provider: AuthProvider) -> SignInChoice;
}
