//! Helpers for testing code built on [`ArmClient`] against a wiremock server.
//!
//! Enabled by the `test-support` feature; sibling crates pull it in as a
//! dev-dependency.

use wiremock::{MockServer, Request, Respond, ResponseTemplate};

use crate::auth::ArmCredential;
use crate::client::ArmClient;

/// Subscription id used by mock clients.
pub const TEST_SUBSCRIPTION_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Bearer token used by mock clients (not a real token).
pub const TEST_ACCESS_TOKEN: &str = "test-access-token";

/// Create a test client connected to a mock server.
pub async fn setup_mock_client(server: &MockServer) -> ArmClient {
    ArmClient::builder()
        .endpoint(server.uri())
        .subscription_id(TEST_SUBSCRIPTION_ID)
        .credential(ArmCredential::access_token(TEST_ACCESS_TOKEN))
        .build()
        .expect("should build client")
}

/// Path prefix of every resource-group scoped URL for [`TEST_SUBSCRIPTION_ID`].
pub fn resource_group_path(group: &str) -> String {
    format!("/subscriptions/{TEST_SUBSCRIPTION_ID}/resourceGroups/{group}")
}

/// Responds to a PUT the way ARM does: the request body comes back with
/// `id` and `name` filled in from the request path.
#[derive(Debug, Clone, Copy)]
pub struct EchoResource {
    status: u16,
}

impl EchoResource {
    pub fn new(status: u16) -> Self {
        Self { status }
    }
}

impl Default for EchoResource {
    fn default() -> Self {
        Self::new(200)
    }
}

impl Respond for EchoResource {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut body = serde_json::from_slice::<serde_json::Value>(&request.body)
            .ok()
            .filter(serde_json::Value::is_object)
            .unwrap_or_else(|| serde_json::json!({}));

        let path = request.url.path().to_string();
        let name = path.rsplit('/').next().unwrap_or_default().to_string();
        if let Some(object) = body.as_object_mut() {
            object.entry("id").or_insert_with(|| path.clone().into());
            object.entry("name").or_insert_with(|| name.into());
        }

        ResponseTemplate::new(self.status).set_body_json(body)
    }
}
