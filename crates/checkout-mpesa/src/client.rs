//! # Request Client
//!
//! Authenticated JSON requests against the payments backend.
//!
//! Every call:
//! - attaches `Authorization: Bearer {token}` when the token store has one
//! - sends `Content-Type: application/json` unless the caller overrides it
//! - makes exactly one attempt, with no retry and no timeout override
//! - turns any non-2xx answer into `CheckoutError::Request` with a message
//!   taken from the body's `detail` or `message`, or `HTTP {code}: {reason}`

use crate::config::ApiConfig;
use checkout_core::{CheckoutError, CheckoutResult, TokenStore};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// Per-call options
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<serde_json::Value>,
    /// Caller headers; these win over the defaults on conflict
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: Vec::new(),
        }
    }

    /// POST with `body` serialized as JSON
    pub fn post_json<B: Serialize + ?Sized>(body: &B) -> CheckoutResult<Self> {
        let body = serde_json::to_value(body)
            .map_err(|e| CheckoutError::Serialization(format!("Failed to encode body: {}", e)))?;

        Ok(Self {
            method: Method::POST,
            body: Some(body),
            headers: Vec::new(),
        })
    }

    /// Builder: set the HTTP method
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Builder: add a caller header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

/// JSON request primitive shared by every backend call
#[derive(Clone)]
pub struct RequestClient {
    config: ApiConfig,
    client: Client,
    tokens: Arc<dyn TokenStore>,
}

impl RequestClient {
    /// Create a client. No request timeout is configured: a pending call
    /// runs until it completes or the transport fails.
    pub fn new(config: ApiConfig, tokens: Arc<dyn TokenStore>) -> CheckoutResult<Self> {
        let client = Client::builder().build().map_err(|e| {
            CheckoutError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            config,
            client,
            tokens,
        })
    }

    /// Default headers merged with the caller's (caller wins)
    fn headers(&self, options: &RequestOptions) -> CheckoutResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.tokens.token() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                CheckoutError::Configuration("Session token is not a valid header value".to_string())
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                CheckoutError::Configuration(format!("Invalid header name: {}", name))
            })?;
            let value = HeaderValue::from_str(value).map_err(|_| {
                CheckoutError::Configuration(format!("Invalid value for header {}", name))
            })?;
            headers.insert(name, value);
        }

        Ok(headers)
    }

    /// Send one request and decode the JSON response as `T`
    #[instrument(skip(self, options), fields(method = %options.method))]
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> CheckoutResult<T> {
        let url = self.config.url(endpoint);
        let headers = self.headers(&options)?;

        debug!("Sending request to {}", url);

        let mut builder = self.client.request(options.method, &url).headers(headers);
        if let Some(body) = &options.body {
            let bytes = serde_json::to_vec(body).map_err(|e| {
                CheckoutError::Serialization(format!("Failed to encode body: {}", e))
            })?;
            builder = builder.body(bytes);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| CheckoutError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response.text().await;

        if !status.is_success() {
            let body = body.unwrap_or_default();
            error!("API error: status={}, body={}", status, body);

            return Err(CheckoutError::Request {
                status: Some(status.as_u16()),
                message: error_message(status, &body),
            });
        }

        let body = body.map_err(|e| CheckoutError::Transport(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| CheckoutError::Request {
            status: Some(status.as_u16()),
            message: format!("Invalid response body: {}", e),
        })
    }
}

/// Message for a non-success response: `detail`, then `message`, then
/// `HTTP {code}: {reason}` when the body is not JSON or has neither field.
///
/// `{reason}` is the canonical phrase for the code, not the server's own
/// status line; codes with no registered phrase read `Unknown Status`.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    let from_body = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["detail", "message"].iter().find_map(|key| {
                value
                    .get(key)
                    .and_then(serde_json::Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
        });

    from_body.unwrap_or_else(|| {
        format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status")
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_core::StaticTokenStore;
    use serde::Deserialize;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Echo {
        ok: bool,
    }

    fn client(server: &MockServer, token: Option<&str>) -> RequestClient {
        let tokens: Arc<dyn TokenStore> = match token {
            Some(t) => Arc::new(StaticTokenStore::new(t)),
            None => Arc::new(StaticTokenStore::anonymous()),
        };
        RequestClient::new(ApiConfig::new(server.uri()), tokens).unwrap()
    }

    #[test]
    fn test_error_message_detail() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"detail":"Insufficient balance"}"#),
            "Insufficient balance"
        );
    }

    #[test]
    fn test_error_message_prefers_detail_over_message() {
        assert_eq!(
            error_message(
                StatusCode::BAD_REQUEST,
                r#"{"message":"second","detail":"first"}"#
            ),
            "first"
        );
        assert_eq!(
            error_message(StatusCode::UNPROCESSABLE_ENTITY, r#"{"message":"Bad phone"}"#),
            "Bad phone"
        );
    }

    #[test]
    fn test_error_message_synthesized() {
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>boom</html>"),
            "HTTP 500: Internal Server Error"
        );
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"phone_number":["Invalid"]}"#),
            "HTTP 400: Bad Request"
        );
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"detail":""}"#),
            "HTTP 400: Bad Request"
        );
        assert_eq!(
            error_message(StatusCode::SERVICE_UNAVAILABLE, ""),
            "HTTP 503: Service Unavailable"
        );
    }

    #[test]
    fn test_error_message_unregistered_status() {
        let status = StatusCode::from_u16(520).unwrap();
        assert_eq!(error_message(status, ""), "HTTP 520: Unknown Status");
        assert_eq!(
            error_message(status, r#"{"message":"Origin error"}"#),
            "Origin error"
        );
    }

    #[tokio::test]
    async fn test_request_uses_option_method() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/echo/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let options = RequestOptions::default().with_method(Method::DELETE);
        let result: Echo = client(&server, None)
            .request("/echo/", options)
            .await
            .unwrap();
        assert!(result.ok);
    }

    #[tokio::test]
    async fn test_bearer_and_content_type_attached() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/echo/"))
            .and(header("authorization", "Bearer abc123"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"hello": "world"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let result: Echo = client(&server, Some("abc123"))
            .request("/echo/", RequestOptions::post_json(&json!({"hello": "world"})).unwrap())
            .await
            .unwrap();

        assert_eq!(result, Echo { ok: true });
    }

    #[tokio::test]
    async fn test_no_authorization_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/echo/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let _: Echo = client(&server, None)
            .request("/echo/", RequestOptions::get())
            .await
            .unwrap();

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        assert!(received[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_caller_headers_win() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/echo/"))
            .and(header("content-type", "application/vnd.api+json"))
            .and(header("authorization", "Bearer override"))
            .and(header("x-request-source", "checkout"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let options = RequestOptions::get()
            .with_header("Content-Type", "application/vnd.api+json")
            .with_header("Authorization", "Bearer override")
            .with_header("X-Request-Source", "checkout");

        let result: Echo = client(&server, Some("stored"))
            .request("/echo/", options)
            .await
            .unwrap();
        assert!(result.ok);
    }

    #[tokio::test]
    async fn test_non_success_json_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"detail": "Insufficient balance"})),
            )
            .mount(&server)
            .await;

        let err = client(&server, None)
            .request::<Echo>("/pay/", RequestOptions::post_json(&json!({})).unwrap())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CheckoutError::Request {
                status: Some(400),
                message: "Insufficient balance".into()
            }
        );
    }

    #[tokio::test]
    async fn test_non_success_non_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream crashed"))
            .mount(&server)
            .await;

        let err = client(&server, None)
            .request::<Echo>("/pay/", RequestOptions::get())
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "HTTP 500: Internal Server Error");
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_unparseable_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client(&server, None)
            .request::<Echo>("/pay/", RequestOptions::get())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Request { status: Some(200), .. }));
    }

    #[tokio::test]
    async fn test_invalid_caller_header_fails_before_network() {
        let server = MockServer::start().await;

        let err = client(&server, None)
            .request::<Echo>("/pay/", RequestOptions::get().with_header("bad header", "x"))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Configuration(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transport_error() {
        // Nothing listens on port 1
        let tokens: Arc<dyn TokenStore> = Arc::new(StaticTokenStore::anonymous());
        let client = RequestClient::new(ApiConfig::new("http://127.0.0.1:1"), tokens).unwrap();

        let err = client
            .request::<Echo>("/pay/", RequestOptions::get())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Transport(_)));
        assert_eq!(err.user_message(), "Checkout failed");
    }
}
