//! End-to-end credential store lifecycle against fake collaborators.
//!
//! These tests drive the store the way a host would: seed sessions, let the
//! fire-and-forget `create` run, drop a session and fire the change event,
//! and watch the per-provider state follow.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use hubcred::auth::{
    AuthError, AuthProvider, AuthenticationHost, CredentialStore, CurrentUser, GraphqlClient, Hub,
    HubBuilder, InMemoryKeyValueStore, RetryChoice, Session, SessionOptions, SignInChoice,
    UserInteraction,
};
use hubcred::config::HubcredConfig;
use hubcred::telemetry::RecordingTelemetrySink;
use tokio::sync::broadcast;

/// Host fake holding one optional session per provider.
struct FakeHost {
    sessions: Mutex<HashMap<AuthProvider, Session>>,
    changes: broadcast::Sender<AuthProvider>,
}

impl FakeHost {
    fn new() -> Arc<Self> {
        let (changes, _receiver) = broadcast::channel(8);
        Arc::new(Self {
            sessions: Mutex::new(HashMap::new()),
            changes,
        })
    }

    fn seed(&self, provider: AuthProvider, token: &str) {
        let session = Session {
            id: format!("session-{provider}"),
            access_token: token.to_owned(),
        };
        self.sessions
            .lock()
            .expect("sessions mutex should be available")
            .insert(provider, session);
    }

    fn revoke(&self, provider: AuthProvider) {
        self.sessions
            .lock()
            .expect("sessions mutex should be available")
            .remove(&provider);
        self.changes
            .send(provider)
            .expect("change listener should be subscribed");
    }
}

#[async_trait]
impl AuthenticationHost for FakeHost {
    async fn get_session(
        &self,
        provider: AuthProvider,
        _scopes: &'static [&'static str],
        _options: SessionOptions,
    ) -> Result<Option<Session>, AuthError> {
        Ok(self
            .sessions
            .lock()
            .expect("sessions mutex should be available")
            .get(&provider)
            .cloned())
    }

    async fn has_session(
        &self,
        provider: AuthProvider,
        _scopes: &'static [&'static str],
    ) -> Result<bool, AuthError> {
        Ok(self
            .sessions
            .lock()
            .expect("sessions mutex should be available")
            .contains_key(&provider))
    }

    fn subscribe_sessions_changed(&self) -> broadcast::Receiver<AuthProvider> {
        self.changes.subscribe()
    }
}

/// Hub builder fake that derives the cached login from the token.
struct FakeHubBuilder;

#[async_trait]
impl HubBuilder for FakeHubBuilder {
    async fn build(&self, token: &str, provider: AuthProvider) -> Result<Hub, AuthError> {
        let rest = octocrab::Octocrab::builder()
            .build()
            .map_err(|error| AuthError::Api {
                message: format!("build client failed: {error}"),
            })?;
        let endpoint = "https://api.github.com/graphql"
            .parse()
            .map_err(|_| AuthError::InvalidUrl("endpoint".to_owned()))?;
        Ok(Hub::new(
            provider,
            rest,
            GraphqlClient::new(endpoint, token),
            Some(CurrentUser {
                login: format!("user-of-{token}"),
                name: None,
                avatar_url: None,
            }),
        ))
    }
}

/// Interaction fake that always cancels.
struct CancellingInteraction;

#[async_trait]
impl UserInteraction for CancellingInteraction {
    async fn retry_prompt(&self, _provider: AuthProvider, _message: &str) -> RetryChoice {
        RetryChoice::Cancel
    }

    async fn sign_in_prompt(&self, _provider: AuthProvider) -> SignInChoice {
        SignInChoice::Dismissed
    }
}

fn build_store(host: &Arc<FakeHost>, config: HubcredConfig) -> Arc<CredentialStore> {
    CredentialStore::new(
        Arc::clone(host) as Arc<dyn AuthenticationHost>,
        Arc::new(FakeHubBuilder),
        Arc::new(CancellingInteraction),
        Arc::new(InMemoryKeyValueStore::default()),
        Arc::new(RecordingTelemetrySink::default()),
        config,
    )
}

async fn wait_until_authenticated(store: &CredentialStore, provider: AuthProvider) -> bool {
    for _attempt in 0..50 {
        if store.is_authenticated(provider) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

#[tokio::test]
async fn create_initialises_all_configured_providers() {
    let host = FakeHost::new();
    host.seed(AuthProvider::GitHub, "tok-public");
    host.seed(AuthProvider::GitHubEnterprise, "tok-enterprise");
    let config = HubcredConfig {
        enterprise_uri: Some("https://github.example.com".to_owned()),
        ..HubcredConfig::default()
    };
    let store = build_store(&host, config);

    store.create();

    assert!(wait_until_authenticated(&store, AuthProvider::GitHub).await);
    assert!(wait_until_authenticated(&store, AuthProvider::GitHubEnterprise).await);
    assert!(store.is_current_user("user-of-tok-public"));
    assert!(store.is_current_user("user-of-tok-enterprise"));
}

#[tokio::test]
async fn create_skips_unconfigured_enterprise() {
    let host = FakeHost::new();
    host.seed(AuthProvider::GitHub, "tok-public");
    let store = build_store(&host, HubcredConfig::default());

    store.create();

    assert!(wait_until_authenticated(&store, AuthProvider::GitHub).await);
    assert!(!store.is_authenticated(AuthProvider::GitHubEnterprise));
}

#[tokio::test]
async fn revoked_session_clears_the_handle() {
    let host = FakeHost::new();
    host.seed(AuthProvider::GitHub, "tok-public");
    let store = build_store(&host, HubcredConfig::default());

    store.create();
    assert!(wait_until_authenticated(&store, AuthProvider::GitHub).await);

    host.revoke(AuthProvider::GitHub);

    for _attempt in 0..50 {
        if !store.is_authenticated(AuthProvider::GitHub) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(!store.is_authenticated(AuthProvider::GitHub));
    assert_eq!(store.current_user(AuthProvider::GitHub), None);
}

#[tokio::test]
async fn reset_then_create_reauthenticates_from_surviving_sessions() {
    let host = FakeHost::new();
    host.seed(AuthProvider::GitHub, "tok-public");
    let store = build_store(&host, HubcredConfig::default());

    store.create();
    assert!(wait_until_authenticated(&store, AuthProvider::GitHub).await);

    store.reset();

    // The host still holds a session, so the spawned create() signs back in.
    assert!(wait_until_authenticated(&store, AuthProvider::GitHub).await);
    store.dispose();
}

#[tokio::test]
async fn initialized_event_fires_per_successful_initialisation() {
    let host = FakeHost::new();
    host.seed(AuthProvider::GitHub, "tok-public");
    let store = build_store(&host, HubcredConfig::default());
    let mut initialized = store.subscribe_initialized();

    store
        .initialize(AuthProvider::GitHub, false)
        .await
        .expect("initialisation should succeed");

    let provider = tokio::time::timeout(Duration::from_secs(1), initialized.recv())
        .await
        .expect("event should arrive promptly")
        .expect("channel should stay open");
    assert_eq!(provider, AuthProvider::GitHub);
}
