//! Thin GraphQL transport authorised with a session token.
//!
//! Every request re-sends the bearer token and the fixed preview `Accept`
//! value, and carries `Cache-Control: no-store` so queries always re-fetch
//! rather than being answered from an intermediary cache.

use http::header::{ACCEPT, AUTHORIZATION, CACHE_CONTROL, USER_AGENT};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use super::error::AuthError;
use super::hub::{PREVIEW_ACCEPT_HEADER, STANDARD_USER_AGENT};

/// GraphQL transport bound to one provider's endpoint and token.
#[derive(Clone)]
pub struct GraphqlClient {
    http: reqwest::Client,
    endpoint: Url,
    token: String,
}

impl std::fmt::Debug for GraphqlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphqlClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a, V> {
    query: &'a str,
    variables: &'a V,
}

impl GraphqlClient {
    /// Creates a client for the given endpoint and access token.
    #[must_use]
    pub fn new(endpoint: Url, token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            token: token.to_owned(),
        }
    }

    /// Endpoint this client posts queries to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Executes a GraphQL query and deserialises the `data` payload.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Network`] on transport failures,
    /// [`AuthError::Authentication`] when the endpoint rejects the token,
    /// [`AuthError::Api`] on other non-success statuses or undecodable
    /// bodies, and [`AuthError::Graphql`] when the response carries an
    /// `errors` array.
    pub async fn query<V, T>(&self, query: &str, variables: &V) -> Result<T, AuthError>
    where
        V: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.endpoint.clone())
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, PREVIEW_ACCEPT_HEADER)
            .header(USER_AGENT, STANDARD_USER_AGENT)
            .header(CACHE_CONTROL, "no-store")
            .json(&GraphqlRequest { query, variables })
            .send()
            .await
            .map_err(|error| AuthError::Network {
                message: format!("GraphQL request failed: {error}"),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AuthError::Authentication {
                message: format!("GraphQL endpoint returned {status}"),
            });
        }
        if !status.is_success() {
            return Err(AuthError::Api {
                message: format!("GraphQL endpoint returned {status}"),
            });
        }

        let body: Value = response.json().await.map_err(|error| AuthError::Api {
            message: format!("GraphQL response decode failed: {error}"),
        })?;

        if let Some(errors) = body.get("errors").and_then(Value::as_array)
            && !errors.is_empty()
        {
            return Err(AuthError::Graphql {
                message: join_error_messages(errors),
            });
        }

        let data = body.get("data").cloned().ok_or_else(|| AuthError::Api {
            message: "GraphQL response carried no data".to_owned(),
        })?;

        serde_json::from_value(data).map_err(|error| AuthError::Api {
            message: format!("GraphQL data deserialisation failed: {error}"),
        })
    }
}

fn join_error_messages(errors: &[Value]) -> String {
    let messages: Vec<&str> = errors
        .iter()
        .filter_map(|entry| entry.get("message").and_then(Value::as_str))
        .collect();

    if messages.is_empty() {
        "unknown GraphQL error".to_owned()
    } else {
        messages.join("; ")
    }
}
