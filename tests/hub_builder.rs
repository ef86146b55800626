//! Integration tests for hub construction against a mock GitHub API.

use hubcred::auth::{AuthError, AuthProvider, HubBuilder, OctocrabHubBuilder, PREVIEW_ACCEPT_HEADER};
use hubcred::config::HubcredConfig;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn enterprise_config(server: &MockServer) -> HubcredConfig {
    HubcredConfig {
        enterprise_uri: Some(server.uri()),
        ..HubcredConfig::default()
    }
}

#[tokio::test]
async fn builds_enterprise_hub_and_caches_current_user() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/user"))
        .and(header("accept", PREVIEW_ACCEPT_HEADER))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "hubber",
            "name": "Enterprise Hubber",
            "avatar_url": "https://avatars.example.com/u/7"
        })))
        .mount(&server)
        .await;

    let builder = OctocrabHubBuilder::new(enterprise_config(&server));
    let hub = builder
        .build("token-abc", AuthProvider::GitHubEnterprise)
        .await
        .expect("hub should build");

    assert_eq!(hub.provider(), AuthProvider::GitHubEnterprise);
    let user = hub.current_user().expect("current user should be cached");
    assert_eq!(user.login, "hubber");
    assert_eq!(user.name.as_deref(), Some("Enterprise Hubber"));

    let endpoint = hub.graphql().endpoint().as_str().to_owned();
    assert!(
        endpoint.ends_with("/api/graphql"),
        "enterprise GraphQL endpoint should sit under /api: {endpoint}"
    );
}

#[tokio::test]
async fn rejected_token_maps_to_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Bad credentials"
        })))
        .mount(&server)
        .await;

    let builder = OctocrabHubBuilder::new(enterprise_config(&server));
    let error = builder
        .build("token-bad", AuthProvider::GitHubEnterprise)
        .await
        .expect_err("bad token should fail");

    assert!(
        matches!(error, AuthError::Authentication { .. }),
        "expected Authentication, got {error:?}"
    );
}

#[tokio::test]
async fn enterprise_build_requires_configuration() {
    let builder = OctocrabHubBuilder::new(HubcredConfig::default());
    let error = builder
        .build("token-abc", AuthProvider::GitHubEnterprise)
        .await
        .expect_err("missing enterprise URI should fail");

    assert!(
        matches!(error, AuthError::Configuration { .. }),
        "expected Configuration, got {error:?}"
    );
}
