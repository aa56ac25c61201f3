//! Authenticated client for the budgeting REST API

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::tokens::{AuthTokens, FileTokenStore, TokenStore};
use super::transport::{ApiRequest, ApiResponse, HttpTransport, Method, ReqwestTransport};
use crate::config::{BudgetwisePaths, Settings};
use crate::error::{BudgetwiseError, BudgetwiseResult, ErrorEnvelope};

/// Endpoint that trades a refresh token for a new pair
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Longest slice of a non-JSON error body echoed back to the user
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
    /// Present when the server rotates refresh tokens
    #[serde(default)]
    refresh: Option<String>,
}

/// REST client with bearer auth and a single refresh-and-resend on 401
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn HttpTransport>, tokens: Arc<dyn TokenStore>) -> Self {
        Self { transport, tokens }
    }

    /// Client wired to the configured API and the on-disk token file
    pub fn from_settings(settings: &Settings, paths: &BudgetwisePaths) -> BudgetwiseResult<Self> {
        let transport = ReqwestTransport::new(
            &settings.api_base_url,
            Duration::from_secs(settings.request_timeout_secs),
        )?;
        Ok(Self::new(
            Arc::new(transport),
            Arc::new(FileTokenStore::new(paths)),
        ))
    }

    pub fn token_store(&self) -> &dyn TokenStore {
        self.tokens.as_ref()
    }

    /// Send an authenticated request and return the successful response
    ///
    /// A 401 triggers one refresh and one resend. If either fails the stored
    /// tokens are cleared and [`BudgetwiseError::AuthExpired`] is returned.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> BudgetwiseResult<ApiResponse> {
        let tokens = self
            .tokens
            .load()?
            .ok_or_else(|| BudgetwiseError::AuthExpired("not logged in".into()))?;

        let mut request = ApiRequest::new(method, path);
        if let Some(body) = body {
            request = request.with_body(body);
        }

        let response = self
            .transport
            .send(&request.clone().with_bearer(tokens.access.as_str()))
            .await?;
        if !response.is_unauthorized() {
            return into_result(response);
        }

        warn!("Access token rejected for {} {}, refreshing", method, path);
        let refreshed = match self.refresh(&tokens).await {
            Ok(refreshed) => refreshed,
            Err(e) => return Err(self.expire(&e.to_string())),
        };

        let retried = self
            .transport
            .send(&request.with_bearer(refreshed.access.as_str()))
            .await?;
        if retried.is_unauthorized() {
            return Err(self.expire("access token rejected after refresh"));
        }
        into_result(retried)
    }

    /// Exchange the refresh token for a new pair and store it
    async fn refresh(&self, current: &AuthTokens) -> BudgetwiseResult<AuthTokens> {
        let request = ApiRequest::new(Method::Post, REFRESH_PATH)
            .with_body(json!({ "refresh": current.refresh.as_str() }));
        let response = into_result(self.transport.send(&request).await?)?;

        let parsed: RefreshResponse = serde_json::from_str(&response.body)?;
        let tokens = AuthTokens::new(
            parsed.access,
            parsed.refresh.unwrap_or_else(|| current.refresh.clone()),
        );
        self.tokens.save(&tokens)?;
        debug!("Stored refreshed token pair");
        Ok(tokens)
    }

    fn expire(&self, reason: &str) -> BudgetwiseError {
        if let Err(e) = self.tokens.clear() {
            warn!("Failed to clear stored tokens: {}", e);
        }
        BudgetwiseError::AuthExpired(reason.to_string())
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> BudgetwiseResult<T> {
        let response = self.request(Method::Get, path, None).await?;
        parse_body(&response)
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> BudgetwiseResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        let response = self.request(Method::Post, path, Some(body)).await?;
        parse_body(&response)
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> BudgetwiseResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        let response = self.request(Method::Put, path, Some(body)).await?;
        parse_body(&response)
    }

    pub async fn delete(&self, path: &str) -> BudgetwiseResult<()> {
        self.request(Method::Delete, path, None).await?;
        Ok(())
    }
}

/// Map a non-2xx response to [`BudgetwiseError::Api`]
fn into_result(response: ApiResponse) -> BudgetwiseResult<ApiResponse> {
    if response.is_success() {
        return Ok(response);
    }

    let message = ErrorEnvelope::parse(&response.body)
        .and_then(|e| e.text().map(str::to_string))
        .unwrap_or_else(|| {
            let trimmed = response.body.trim();
            if trimmed.is_empty() {
                format!("HTTP {}", response.status)
            } else {
                trimmed.chars().take(MAX_ERROR_BODY).collect()
            }
        });

    Err(BudgetwiseError::Api {
        status: response.status,
        message,
    })
}

/// Parse a JSON body; an empty body reads as JSON `null`
fn parse_body<T: DeserializeOwned>(response: &ApiResponse) -> BudgetwiseResult<T> {
    let body = if response.body.trim().is_empty() {
        "null"
    } else {
        response.body.as_str()
    };
    serde_json::from_str(body).map_err(|e| {
        BudgetwiseError::Json(format!(
            "Failed to parse response: {} - {}",
            e,
            body.chars().take(MAX_ERROR_BODY).collect::<String>()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::ScriptedTransport;
    use crate::api::tokens::MemoryTokenStore;

    fn client(transport: ScriptedTransport) -> (ApiClient, Arc<ScriptedTransport>, Arc<MemoryTokenStore>) {
        let transport = Arc::new(transport);
        let tokens = Arc::new(MemoryTokenStore::with_tokens(AuthTokens::new("old", "r1")));
        let client = ApiClient::new(transport.clone(), tokens.clone());
        (client, transport, tokens)
    }

    #[tokio::test]
    async fn test_sends_bearer_and_parses_json() {
        let (client, transport, _) =
            client(ScriptedTransport::new().respond_json(200, json!([1, 2, 3])));

        let values: Vec<i32> = client.get_json("/numbers").await.unwrap();
        assert_eq!(values, vec![1, 2, 3]);

        let sent = transport.requests();
        assert_eq!(sent[0].bearer.as_deref(), Some("old"));
        assert_eq!(sent[0].method, Method::Get);
    }

    #[tokio::test]
    async fn test_refreshes_once_and_resends() {
        let (client, transport, tokens) = client(
            ScriptedTransport::new()
                .respond(401, "")
                .respond_json(200, json!({"access": "new", "refresh": "r2"}))
                .respond_json(200, json!({"ok": true})),
        );

        let value: Value = client.get_json("/users/me").await.unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(
            transport.calls(),
            vec!["GET /users/me", "POST /auth/refresh", "GET /users/me"]
        );

        let sent = transport.requests();
        assert_eq!(sent[1].bearer, None);
        assert_eq!(sent[1].body, Some(json!({"refresh": "r1"})));
        assert_eq!(sent[2].bearer.as_deref(), Some("new"));
        assert_eq!(tokens.load().unwrap(), Some(AuthTokens::new("new", "r2")));
    }

    #[tokio::test]
    async fn test_refresh_keeps_refresh_token_when_not_rotated() {
        let (client, _, tokens) = client(
            ScriptedTransport::new()
                .respond(401, "")
                .respond_json(200, json!({"access": "new"}))
                .respond(204, ""),
        );

        client.delete("/categories/1").await.unwrap();
        assert_eq!(tokens.load().unwrap(), Some(AuthTokens::new("new", "r1")));
    }

    #[tokio::test]
    async fn test_failed_refresh_clears_tokens() {
        let (client, transport, tokens) = client(
            ScriptedTransport::new()
                .respond(401, "")
                .respond_json(401, json!({"error": "refresh expired"})),
        );

        let err = client.get_json::<Value>("/budgets").await.unwrap_err();
        assert!(err.is_auth());
        assert!(tokens.load().unwrap().is_none());
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_second_401_is_not_retried_again() {
        let (client, transport, tokens) = client(
            ScriptedTransport::new()
                .respond(401, "")
                .respond_json(200, json!({"access": "new"}))
                .respond(401, ""),
        );

        let err = client.get_json::<Value>("/budgets").await.unwrap_err();
        assert!(err.is_auth());
        assert!(tokens.load().unwrap().is_none());
        assert_eq!(transport.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_error_envelope_becomes_api_error() {
        let (client, transport, _) = client(
            ScriptedTransport::new().respond_json(422, json!({"message": "name taken"})),
        );

        let err = client
            .post_json::<_, Value>("/categories", &json!({"name": "Food"}))
            .await
            .unwrap_err();
        match err {
            BudgetwiseError::Api { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "name taken");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        // Non-401 errors are never retried
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_plain_text_error_body() {
        let (client, _, _) = client(ScriptedTransport::new().respond(502, "Bad Gateway"));
        let err = client.get_json::<Value>("/budgets").await.unwrap_err();
        assert_eq!(err.toast(), "The server had a problem (502): Bad Gateway");
    }

    #[tokio::test]
    async fn test_not_logged_in() {
        let transport = Arc::new(ScriptedTransport::new());
        let client = ApiClient::new(transport.clone(), Arc::new(MemoryTokenStore::new()));

        let err = client.get_json::<Value>("/budgets").await.unwrap_err();
        assert!(err.is_auth());
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_network_failure_propagates() {
        let (client, _, tokens) = client(ScriptedTransport::new().fail("connection refused"));
        let err = client.get_json::<Value>("/budgets").await.unwrap_err();
        assert!(matches!(err, BudgetwiseError::Network(_)));
        assert!(tokens.load().unwrap().is_some());
    }
}
