//! HTTP client for Azure Resource Manager.
//!
//! This module provides [`ArmClient`], the shared entry point used by every
//! service crate. The client holds immutable configuration (endpoint,
//! subscription, credential) plus the HTTP transport, and implements the
//! send step of the prepare → send → respond cycle.
//!
//! # Examples
//!
//! ## Using a bearer token
//! ```rust,no_run
//! use azure_arm_core::client::ArmClient;
//! use azure_arm_core::auth::ArmCredential;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ArmClient::builder()
//!     .subscription_id("00000000-0000-0000-0000-000000000000")
//!     .credential(ArmCredential::access_token("eyJ0eXAi..."))
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Using the Azure CLI login
//! ```rust,no_run
//! use azure_arm_core::client::ArmClient;
//! use azure_arm_core::auth::ArmCredential;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ArmClient::builder()
//!     .subscription_id("00000000-0000-0000-0000-000000000000")
//!     .credential(ArmCredential::azure_cli()?)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client as HttpClient, Method};
use url::Url;

use std::time::Duration;

use crate::auth::ArmCredential;
use crate::error::{ArmError, ArmResult};
use crate::request::{Operation, PreparedRequest, RequestPreparer};
use crate::response::ArmResponse;

/// Public-cloud Resource Manager endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://management.azure.com";

/// Environment variable overriding the Resource Manager endpoint.
pub const ENDPOINT_ENV: &str = "AZURE_RESOURCE_MANAGER_ENDPOINT";

/// Environment variable holding the subscription id.
pub const SUBSCRIPTION_ID_ENV: &str = "AZURE_SUBSCRIPTION_ID";

/// Default connection timeout (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default read/response timeout (60 seconds).
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);

/// The base client for interacting with Azure Resource Manager.
///
/// Configuration is read-only once built, so a single client can be cloned
/// and shared freely across tasks and concurrent provisioning flows.
#[derive(Debug, Clone)]
pub struct ArmClient {
    pub(crate) http: HttpClient,
    pub(crate) endpoint: Url,
    pub(crate) subscription_id: String,
    pub(crate) credential: ArmCredential,
}

/// Builder for constructing an [`ArmClient`].
///
/// Use [`ArmClient::builder()`] to create a new builder.
#[derive(Debug, Default)]
pub struct ArmClientBuilder {
    endpoint: Option<String>,
    subscription_id: Option<String>,
    credential: Option<ArmCredential>,
    http_client: Option<HttpClient>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
}

impl ArmClient {
    /// Create a new builder for configuring an `ArmClient`.
    pub fn builder() -> ArmClientBuilder {
        ArmClientBuilder::default()
    }

    /// Get the base endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Get the subscription id substituted for `{subscriptionId}`.
    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    /// Build a full URL for an API path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be joined to the endpoint URL.
    pub fn url(&self, path: &str) -> ArmResult<Url> {
        self.endpoint
            .join(path)
            .map_err(|e| ArmError::invalid_endpoint_with_source("failed to construct URL", e))
    }

    /// Start preparing a request for `operation` against a path template.
    pub fn request<'a>(
        &'a self,
        operation: &Operation,
        method: Method,
        template: &'a str,
    ) -> RequestPreparer<'a> {
        RequestPreparer::new(self, *operation, method, template)
    }

    /// Prepare a GET for an absolute continuation link returned by a list
    /// operation.
    ///
    /// The link must share the endpoint's origin; the credential is never
    /// sent anywhere else.
    pub fn request_from_link(
        &self,
        operation: &Operation,
        link: &str,
    ) -> ArmResult<PreparedRequest> {
        let url = Url::parse(link).map_err(|e| {
            ArmError::preparation(
                operation.name,
                format!("invalid continuation link '{link}': {e}"),
            )
        })?;
        if url.origin() != self.endpoint.origin() {
            return Err(ArmError::preparation(
                operation.name,
                format!("continuation link '{link}' does not match the client endpoint"),
            ));
        }
        Ok(PreparedRequest {
            operation: *operation,
            method: Method::GET,
            url,
            body: None,
        })
    }

    /// Send a prepared request once.
    ///
    /// Adds the authorization header and JSON content type. The status code
    /// is not inspected here; that is the job of [`ArmResponse`].
    ///
    /// # Errors
    ///
    /// Returns an error if the credential cannot be resolved or the request
    /// fails at the transport level.
    #[tracing::instrument(
        name = "arm::send",
        skip(self, request),
        fields(operation = request.operation.name, method = %request.method)
    )]
    pub async fn send(&self, request: PreparedRequest) -> ArmResult<ArmResponse> {
        let auth = self.credential.resolve().await?;

        let mut builder = self
            .http
            .request(request.method, request.url)
            .header(AUTHORIZATION, auth)
            .header(CONTENT_TYPE, "application/json; charset=utf-8");
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ArmError::transport(request.operation.name, e))?;

        tracing::debug!(status = response.status().as_u16(), "response received");
        Ok(ArmResponse::new(request.operation, response))
    }
}

impl ArmClientBuilder {
    /// Set the Resource Manager endpoint.
    ///
    /// If not set, the builder checks `AZURE_RESOURCE_MANAGER_ENDPOINT` and
    /// then falls back to [`DEFAULT_ENDPOINT`].
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the subscription id.
    ///
    /// If not set, the builder reads `AZURE_SUBSCRIPTION_ID`.
    pub fn subscription_id(mut self, subscription_id: impl Into<String>) -> Self {
        self.subscription_id = Some(subscription_id.into());
        self
    }

    /// Set the credential to use for authentication.
    ///
    /// If not set, the builder uses [`ArmCredential::from_env()`].
    pub fn credential(mut self, credential: ArmCredential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Set a custom HTTP client.
    ///
    /// **Note:** If you provide a custom HTTP client, timeout configuration
    /// on this builder is ignored.
    pub fn http_client(mut self, client: HttpClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the read timeout, covering the whole request/response cycle.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Build the `ArmClient`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No subscription id is provided and `AZURE_SUBSCRIPTION_ID` is not set
    /// - The endpoint URL is invalid
    /// - Credential creation fails (when using environment-based credentials)
    pub fn build(self) -> ArmResult<ArmClient> {
        let http = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .connect_timeout(self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT))
                .timeout(self.read_timeout.unwrap_or(DEFAULT_READ_TIMEOUT))
                .build()
                .map_err(|e| ArmError::transport("client/build", e))?,
        };

        let endpoint_str = self
            .endpoint
            .or_else(|| std::env::var(ENDPOINT_ENV).ok())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let endpoint = Url::parse(&endpoint_str)
            .map_err(|e| ArmError::invalid_endpoint_with_source("invalid endpoint URL", e))?;

        let subscription_id = self
            .subscription_id
            .or_else(|| std::env::var(SUBSCRIPTION_ID_ENV).ok())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                ArmError::MissingConfig(
                    "subscription id is required. Set it via builder or AZURE_SUBSCRIPTION_ID env var."
                        .into(),
                )
            })?;

        let credential = self
            .credential
            .map(Ok)
            .unwrap_or_else(ArmCredential::from_env)?;

        Ok(ArmClient {
            http,
            endpoint,
            subscription_id,
            credential,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tracing_test::traced_test;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEST_OP: Operation = Operation::new("test/things/get", &[200]);
    const CREATE_OP: Operation = Operation::new("test/things/create", &[200, 201]);
    const DELETE_OP: Operation = Operation::new("test/things/delete", &[200, 202, 204]);

    fn test_builder() -> ArmClientBuilder {
        ArmClient::builder()
            .endpoint("https://management.azure.com")
            .subscription_id("sub-1")
            .credential(ArmCredential::access_token("test"))
    }

    #[test]
    #[serial]
    fn builder_requires_subscription_id() {
        std::env::remove_var(SUBSCRIPTION_ID_ENV);

        let result = ArmClient::builder()
            .credential(ArmCredential::access_token("test"))
            .build();

        assert!(matches!(result.unwrap_err(), ArmError::MissingConfig(_)));
    }

    #[test]
    #[serial]
    fn builder_uses_subscription_from_env() {
        let original = std::env::var(SUBSCRIPTION_ID_ENV).ok();
        std::env::set_var(SUBSCRIPTION_ID_ENV, "env-sub");

        let client = ArmClient::builder()
            .credential(ArmCredential::access_token("test"))
            .build()
            .expect("should build");
        assert_eq!(client.subscription_id(), "env-sub");

        match original {
            Some(val) => std::env::set_var(SUBSCRIPTION_ID_ENV, val),
            None => std::env::remove_var(SUBSCRIPTION_ID_ENV),
        }
    }

    #[test]
    #[serial]
    fn builder_defaults_to_public_cloud_endpoint() {
        let original = std::env::var(ENDPOINT_ENV).ok();
        std::env::remove_var(ENDPOINT_ENV);

        let client = ArmClient::builder()
            .subscription_id("sub-1")
            .credential(ArmCredential::access_token("test"))
            .build()
            .expect("should build");
        assert_eq!(client.endpoint().as_str(), "https://management.azure.com/");

        if let Some(val) = original {
            std::env::set_var(ENDPOINT_ENV, val);
        }
    }

    #[test]
    fn builder_invalid_endpoint_url() {
        let result = test_builder().endpoint("not a valid url").build();
        assert!(matches!(
            result.unwrap_err(),
            ArmError::InvalidEndpoint { .. }
        ));
    }

    #[test]
    fn builder_accepts_timeouts() {
        let client = test_builder()
            .connect_timeout(Duration::from_secs(1))
            .read_timeout(Duration::from_secs(2))
            .build();
        assert!(client.is_ok());
    }

    #[test]
    fn client_is_cloneable_and_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ArmClient>();

        let client = test_builder().build().expect("should build");
        let cloned = client.clone();
        assert_eq!(client.endpoint(), cloned.endpoint());
        assert_eq!(client.subscription_id(), cloned.subscription_id());
    }

    #[test]
    fn request_from_link_builds_get() {
        let client = test_builder().build().unwrap();
        let request = client
            .request_from_link(&TEST_OP, "https://management.azure.com/next?page=2")
            .expect("should prepare");
        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.query_value("page").as_deref(), Some("2"));
    }

    #[test]
    fn request_from_invalid_link_is_preparation_error() {
        let client = test_builder().build().unwrap();
        let err = client.request_from_link(&TEST_OP, "::not a url").unwrap_err();
        assert!(matches!(err, ArmError::Preparation { .. }));
    }

    #[test]
    fn request_from_foreign_link_is_rejected() {
        let client = test_builder().build().unwrap();
        for link in [
            "https://attacker.example.com/next",
            "http://management.azure.com/next",
            "https://management.azure.com:8443/next",
        ] {
            let err = client.request_from_link(&TEST_OP, link).unwrap_err();
            match err {
                ArmError::Preparation { message, .. } => {
                    assert!(message.contains("does not match"), "{link}: {message}")
                }
                other => panic!("Expected Preparation error, got {other:?}"),
            }
        }
    }

    // --- Wiremock integration tests ---

    async fn setup_mock_client(server: &MockServer) -> ArmClient {
        ArmClient::builder()
            .endpoint(server.uri())
            .subscription_id("sub-1")
            .credential(ArmCredential::access_token("test-token"))
            .build()
            .expect("should build client")
    }

    #[tokio::test]
    async fn send_attaches_auth_and_api_version() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/subscriptions/sub-1/things/a"))
            .and(header("Authorization", "Bearer test-token"))
            .and(query_param("api-version", "2015-06-15"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"name": "a"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let request = client
            .request(&TEST_OP, Method::GET, "/subscriptions/{subscriptionId}/things/{name}")
            .path_param("name", "a")
            .api_version("2015-06-15")
            .prepare()
            .unwrap();

        let body: serde_json::Value = client
            .send(request)
            .await
            .expect("should send")
            .json()
            .await
            .expect("should decode");
        assert_eq!(body["name"], "a");
    }

    #[tokio::test]
    async fn put_sends_json_body_and_accepts_created() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/subscriptions/sub-1/things/a"))
            .and(header("content-type", "application/json; charset=utf-8"))
            .and(body_json(serde_json::json!({"location": "westus"})))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(serde_json::json!({"location": "westus"})),
            )
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let request = client
            .request(&CREATE_OP, Method::PUT, "/subscriptions/{subscriptionId}/things/{name}")
            .path_param("name", "a")
            .api_version("v")
            .json(&serde_json::json!({"location": "westus"}))
            .prepare()
            .unwrap();

        let response = client.send(request).await.unwrap();
        assert_eq!(response.status_code(), 201);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["location"], "westus");
    }

    #[tokio::test]
    async fn status_outside_accepted_set_is_response_error() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "error": {"code": "InternalServerError", "message": "Something went wrong"}
            })))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let request = client
            .request(&DELETE_OP, Method::DELETE, "/subscriptions/{subscriptionId}/things/a")
            .api_version("v")
            .prepare()
            .unwrap();

        let err = client.send(request).await.unwrap().status().await.unwrap_err();
        match err {
            ArmError::Response {
                operation,
                status,
                code,
                message,
            } => {
                assert_eq!(operation, "test/things/delete");
                assert_eq!(status, 500);
                assert_eq!(code.as_deref(), Some("InternalServerError"));
                assert_eq!(message, "Something went wrong");
            }
            other => panic!("Expected Response error, got {other:?}"),
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn rejected_response_is_logged() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let request = client
            .request(&TEST_OP, Method::GET, "/things")
            .api_version("v")
            .prepare()
            .unwrap();

        let result = client.send(request).await.unwrap().status().await;
        assert!(result.is_err());
        assert!(logs_contain("response rejected"));
        assert!(!logs_contain("test-token"));
    }

    #[tokio::test]
    async fn success_status_not_in_set_is_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let request = client
            .request(&TEST_OP, Method::GET, "/things")
            .api_version("v")
            .prepare()
            .unwrap();

        let err = client
            .send(request)
            .await
            .unwrap()
            .json::<serde_json::Value>()
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(204));
    }

    #[tokio::test]
    async fn undecodable_body_is_response_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let request = client
            .request(&TEST_OP, Method::GET, "/things")
            .api_version("v")
            .prepare()
            .unwrap();

        let err = client
            .send(request)
            .await
            .unwrap()
            .json::<serde_json::Value>()
            .await
            .unwrap_err();
        match err {
            ArmError::Response { status, message, .. } => {
                assert_eq!(status, 200);
                assert!(message.contains("not json"));
            }
            other => panic!("Expected Response error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn json_optional_returns_none_for_empty_body() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let op = Operation::new("test/things/create", &[200, 202]);
        let request = client
            .request(&op, Method::PUT, "/things")
            .api_version("v")
            .json(&serde_json::json!({}))
            .prepare()
            .unwrap();

        let body: Option<serde_json::Value> =
            client.send(request).await.unwrap().json_optional().await.unwrap();
        assert!(body.is_none());
    }

    #[tokio::test]
    async fn transport_failure_is_transport_error() {
        // Port 1 is never listening, so the connection is refused.
        let client = ArmClient::builder()
            .endpoint("http://127.0.0.1:1")
            .subscription_id("sub-1")
            .credential(ArmCredential::access_token("test-token"))
            .build()
            .expect("should build client");
        let request = client
            .request(&TEST_OP, Method::GET, "/things")
            .api_version("v")
            .prepare()
            .unwrap();

        let err = client.send(request).await.unwrap_err();
        match err {
            ArmError::Transport { operation, .. } => assert_eq!(operation, "test/things/get"),
            other => panic!("Expected Transport error, got {other:?}"),
        }
    }
}
