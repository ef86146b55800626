//! The credential store: session lifecycle and per-provider API handles.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::error::AuthError;
use super::host::{AuthenticationHost, Session, SessionOptions};
use super::hub::{CurrentUser, Hub, HubBuilder};
use super::interaction::{RetryChoice, SignInChoice, UserInteraction};
use super::keyvalue::{KeyValueStore, PROMPT_FOR_SIGN_IN_KEY};
use super::provider::{AUTH_SCOPES, AuthProvider};
use crate::config::HubcredConfig;
use crate::telemetry::{TelemetryEvent, TelemetrySink};

/// Per-provider authentication state.
///
/// The slot is only ever replaced wholesale under its mutex, never mutated
/// field-by-field across an await point.
#[derive(Debug, Default)]
struct ProviderState {
    hub: Option<Arc<Hub>>,
    session_id: Option<String>,
}

/// Owns at most one authenticated API handle per provider and drives the
/// sign-in lifecycle.
///
/// All collaborators are injected: the host authentication subsystem, the
/// hub builder, the user interaction surface, durable key/value storage,
/// and the telemetry sink. Failures during passive initialisation are
/// absorbed and only observable through logs and telemetry.
pub struct CredentialStore {
    host: Arc<dyn AuthenticationHost>,
    hub_builder: Arc<dyn HubBuilder>,
    interaction: Arc<dyn UserInteraction>,
    key_value: Arc<dyn KeyValueStore>,
    telemetry: Arc<dyn TelemetrySink>,
    config: HubcredConfig,
    github: Mutex<ProviderState>,
    enterprise: Mutex<ProviderState>,
    initialized_tx: broadcast::Sender<AuthProvider>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

const INITIALIZED_CHANNEL_CAPACITY: usize = 16;

impl CredentialStore {
    /// Creates the store and subscribes to host session-change events.
    ///
    /// The returned store reacts to a provider losing its session by
    /// clearing the corresponding handle and re-running a passive
    /// initialisation.
    #[must_use]
    pub fn new(
        host: Arc<dyn AuthenticationHost>,
        hub_builder: Arc<dyn HubBuilder>,
        interaction: Arc<dyn UserInteraction>,
        key_value: Arc<dyn KeyValueStore>,
        telemetry: Arc<dyn TelemetrySink>,
        config: HubcredConfig,
    ) -> Arc<Self> {
        let (initialized_tx, _initial_rx) = broadcast::channel(INITIALIZED_CHANNEL_CAPACITY);
        let store = Arc::new(Self {
            host,
            hub_builder,
            interaction,
            key_value,
            telemetry,
            config,
            github: Mutex::new(ProviderState::default()),
            enterprise: Mutex::new(ProviderState::default()),
            initialized_tx,
            listener: Mutex::new(None),
        });
        store.spawn_session_listener();
        store
    }

    /// Subscribes to notifications fired after each successful
    /// initialisation.
    #[must_use]
    pub fn subscribe_initialized(&self) -> broadcast::Receiver<AuthProvider> {
        self.initialized_tx.subscribe()
    }

    /// Initialises the handle for one provider.
    ///
    /// A passive call never shows UI; `force` discards existing credentials
    /// and always prompts. Declined consent during a forced call is treated
    /// as benign. When the host returns no session, state is left unchanged.
    ///
    /// # Errors
    ///
    /// Propagates host failures other than declined consent, and any failure
    /// while building the handle.
    pub async fn initialize(&self, provider: AuthProvider, force: bool) -> Result<(), AuthError> {
        if provider == AuthProvider::GitHubEnterprise && !self.config.has_enterprise_uri() {
            info!(%provider, "enterprise URI not configured, skipping initialisation");
            return Ok(());
        }

        let options = if force {
            SessionOptions::FORCED
        } else {
            SessionOptions::SILENT
        };

        let session = match self.host.get_session(provider, AUTH_SCOPES, options).await {
            Ok(Some(session)) => session,
            Ok(None) => {
                info!(%provider, "host returned no session, leaving state unchanged");
                return Ok(());
            }
            Err(AuthError::ConsentDeclined) if force => {
                info!(%provider, "user declined forced consent prompt");
                return Ok(());
            }
            Err(error) => return Err(error),
        };

        let hub = self.hub_builder.build(&session.access_token, provider).await?;
        self.install_hub(provider, hub, session);

        // At most one notification per successful call.
        let _subscriber_count = self.initialized_tx.send(provider);
        info!(%provider, "provider initialised");
        Ok(())
    }

    /// Initialises all configured providers without awaiting the outcome.
    ///
    /// Failures are not propagated; they surface only through logs and
    /// telemetry.
    pub fn create(self: &Arc<Self>) {
        let store = Arc::clone(self);
        drop(tokio::spawn(async move {
            store.run_create(false).await;
        }));
    }

    /// Re-runs the sign-in flow for all configured providers, forcing a
    /// fresh login prompt.
    ///
    /// Used when existing credentials are known to be invalid. Like
    /// [`create`](Self::create), this is fire-and-forget.
    pub fn recreate(self: &Arc<Self>) {
        let store = Arc::clone(self);
        drop(tokio::spawn(async move {
            store.run_create(true).await;
        }));
    }

    /// Discards both handles unconditionally, then re-runs
    /// [`create`](Self::create).
    pub fn reset(self: &Arc<Self>) {
        for provider in AuthProvider::ALL {
            self.clear_slot(provider);
        }
        self.create();
    }

    async fn run_create(&self, force: bool) {
        if let Err(failure) = self.initialize(AuthProvider::GitHub, force).await {
            warn!(provider = %AuthProvider::GitHub, %failure, "initialisation failed");
        }
        if self.config.has_enterprise_uri()
            && let Err(failure) = self
                .initialize(AuthProvider::GitHubEnterprise, force)
                .await
        {
            warn!(provider = %AuthProvider::GitHubEnterprise, %failure, "initialisation failed");
        }
    }

    /// Returns true when the provider has an authenticated handle.
    #[must_use]
    pub fn is_authenticated(&self, provider: AuthProvider) -> bool {
        self.slot(provider).hub.is_some()
    }

    /// Returns true when any provider has an authenticated handle.
    #[must_use]
    pub fn is_any_authenticated(&self) -> bool {
        AuthProvider::ALL
            .into_iter()
            .any(|provider| self.is_authenticated(provider))
    }

    /// Returns the current handle for the provider, if any. No side effects.
    #[must_use]
    pub fn get_hub(&self, provider: AuthProvider) -> Option<Arc<Hub>> {
        self.slot(provider).hub.clone()
    }

    /// Returns the current handle, invoking the interactive login flow when
    /// none exists.
    pub async fn get_hub_or_login(&self, provider: AuthProvider) -> Option<Arc<Hub>> {
        match self.get_hub(provider) {
            Some(hub) => Some(hub),
            None => self.login(provider).await,
        }
    }

    /// Shows the sign-in notification unless the user opted out previously.
    ///
    /// Choosing "Sign in" delegates to [`login`](Self::login); "Don't show
    /// again" persists the opt-out and records a cancellation event.
    pub async fn show_sign_in_notification(&self, provider: AuthProvider) -> Option<Arc<Hub>> {
        if self.key_value.fetch(PROMPT_FOR_SIGN_IN_KEY).as_deref() == Some("false") {
            return None;
        }

        match self.interaction.sign_in_prompt(provider).await {
            SignInChoice::SignIn => self.login(provider).await,
            SignInChoice::DontShowAgain => {
                self.key_value.store(PROMPT_FOR_SIGN_IN_KEY, "false");
                self.telemetry
                    .record(TelemetryEvent::AuthCancel { provider });
                None
            }
            SignInChoice::Dismissed => None,
        }
    }

    /// Runs the interactive login flow for the provider.
    ///
    /// Each failed attempt is logged and answered with a modal "try again /
    /// cancel" choice; the loop continues only while the user retries. No
    /// error ever reaches the caller: giving up yields `None` plus an
    /// `auth.fail` telemetry event.
    pub async fn login(&self, provider: AuthProvider) -> Option<Arc<Hub>> {
        self.telemetry.record(TelemetryEvent::AuthStart { provider });

        loop {
            match self.attempt_login(provider).await {
                Ok(hub) => {
                    self.telemetry
                        .record(TelemetryEvent::AuthSuccess { provider });
                    return Some(hub);
                }
                Err(failure) => {
                    error!(%provider, %failure, detail = ?failure, "login attempt failed");
                    let choice = self
                        .interaction
                        .retry_prompt(provider, &failure.to_string())
                        .await;
                    if choice == RetryChoice::Cancel {
                        self.telemetry.record(TelemetryEvent::AuthFail { provider });
                        return None;
                    }
                }
            }
        }
    }

    async fn attempt_login(&self, provider: AuthProvider) -> Result<Arc<Hub>, AuthError> {
        let session = self
            .host
            .get_session(provider, AUTH_SCOPES, SessionOptions::INTERACTIVE)
            .await?
            .ok_or(AuthError::NoSession)?;

        let hub = self.hub_builder.build(&session.access_token, provider).await?;
        Ok(self.install_hub(provider, hub, session))
    }

    /// Returns true when either authenticated handle's cached user login
    /// equals `username` exactly (case-sensitive).
    #[must_use]
    pub fn is_current_user(&self, username: &str) -> bool {
        AuthProvider::ALL.into_iter().any(|provider| {
            self.current_user(provider)
                .is_some_and(|user| user.login == username)
        })
    }

    /// Returns the cached current-user record for the provider.
    ///
    /// Guaranteed present only while `is_authenticated(provider)` holds;
    /// otherwise this returns `None`.
    #[must_use]
    pub fn current_user(&self, provider: AuthProvider) -> Option<CurrentUser> {
        self.slot(provider)
            .hub
            .as_ref()
            .and_then(|hub| hub.current_user().cloned())
    }

    /// Returns the opaque id of the session backing the provider's handle.
    ///
    /// Recorded purely for bookkeeping; it is reassigned on each successful
    /// login and never drives invalidation.
    #[must_use]
    pub fn session_id(&self, provider: AuthProvider) -> Option<String> {
        self.slot(provider).session_id.clone()
    }

    /// Asks the host whether a session exists, without prompting.
    ///
    /// Host failures are swallowed and reported as `false`.
    pub async fn has_session(&self, provider: AuthProvider) -> bool {
        match self.host.has_session(provider, AUTH_SCOPES).await {
            Ok(present) => present,
            Err(failure) => {
                warn!(%provider, %failure, "session lookup failed, treating as no session");
                false
            }
        }
    }

    /// Releases the host event subscription. Idempotent.
    pub fn dispose(&self) {
        if let Some(handle) = self.lock_listener().take() {
            handle.abort();
        }
    }

    fn spawn_session_listener(self: &Arc<Self>) {
        let mut events = self.host.subscribe_sessions_changed();
        let weak = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(provider) => {
                        let Some(store) = weak.upgrade() else { break };
                        store.on_sessions_changed(provider).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "missed session-change events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        *self.lock_listener() = Some(handle);
    }

    async fn on_sessions_changed(&self, provider: AuthProvider) {
        if !self.has_session(provider).await {
            self.clear_slot(provider);
        }
        if !self.is_authenticated(provider)
            && let Err(failure) = self.initialize(provider, false).await
        {
            warn!(%provider, %failure, "re-initialisation after session change failed");
        }
    }

    /// Replaces the provider's slot in a single synchronous write.
    fn install_hub(&self, provider: AuthProvider, hub: Hub, session: Session) -> Arc<Hub> {
        let shared = Arc::new(hub);
        let mut slot = self.slot(provider);
        slot.hub = Some(Arc::clone(&shared));
        slot.session_id = Some(session.id);
        shared
    }

    fn clear_slot(&self, provider: AuthProvider) {
        let mut slot = self.slot(provider);
        slot.hub = None;
        slot.session_id = None;
    }

    fn slot(&self, provider: AuthProvider) -> MutexGuard<'_, ProviderState> {
        let mutex = match provider {
            AuthProvider::GitHub => &self.github,
            AuthProvider::GitHubEnterprise => &self.enterprise,
        };
        mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn lock_listener(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.listener
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Drop for CredentialStore {
    fn drop(&mut self) {
        self.dispose();
    }
}
