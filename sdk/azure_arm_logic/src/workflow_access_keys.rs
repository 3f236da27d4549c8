//! Workflow access keys.
//!
//! An access key grants callers the right to invoke a workflow's request
//! triggers. Its secret values are only returned by [`list_secret_keys`] and
//! [`regenerate_secret_key`].

use std::fmt;

use azure_arm_core::client::ArmClient;
use azure_arm_core::error::ArmResult;
use azure_arm_core::pagination::{self, ListResult};
use azure_arm_core::request::{Operation, PreparedRequest};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::models::API_VERSION;

const ACCESS_KEY_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Logic/workflows/{workflowName}/accessKeys/{accessKeyName}";
const ACCESS_KEYS_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Logic/workflows/{workflowName}/accessKeys";
const LIST_SECRET_KEYS_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Logic/workflows/{workflowName}/accessKeys/{accessKeyName}/list";
const REGENERATE_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Logic/workflows/{workflowName}/accessKeys/{accessKeyName}/regenerate";

pub const CREATE_OR_UPDATE: Operation =
    Operation::new("logic/workflow_access_keys/create_or_update", &[200, 201]);
pub const DELETE: Operation = Operation::new("logic/workflow_access_keys/delete", &[200, 204]);
pub const GET: Operation = Operation::new("logic/workflow_access_keys/get", &[200]);
pub const LIST: Operation = Operation::new("logic/workflow_access_keys/list", &[200]);
pub const LIST_SECRET_KEYS: Operation =
    Operation::new("logic/workflow_access_keys/list_secret_keys", &[200]);
pub const REGENERATE_SECRET_KEY: Operation =
    Operation::new("logic/workflow_access_keys/regenerate_secret_key", &[200]);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowAccessKey {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<WorkflowAccessKeyProperties>,
}

/// Validity window of an access key, as RFC 3339 timestamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowAccessKeyProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_before: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_after: Option<String>,
}

/// The secret values of an access key.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSecretKeys {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_secret_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_secret_key: Option<String>,
}

impl fmt::Debug for WorkflowSecretKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("WorkflowSecretKeys")
            .field("primary_secret_key", &redact(&self.primary_secret_key))
            .field("secondary_secret_key", &redact(&self.secondary_secret_key))
            .finish()
    }
}

/// Which of the two secret keys to regenerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyType {
    NotSpecified,
    Primary,
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateSecretKeyParameters {
    pub key_type: KeyType,
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

pub fn create_or_update_request(
    client: &ArmClient,
    resource_group_name: &str,
    workflow_name: &str,
    access_key_name: &str,
    access_key: &WorkflowAccessKey,
) -> ArmResult<PreparedRequest> {
    client
        .request(&CREATE_OR_UPDATE, Method::PUT, ACCESS_KEY_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("workflowName", workflow_name)
        .path_param("accessKeyName", access_key_name)
        .api_version(API_VERSION)
        .json(access_key)
        .prepare()
}

/// Create or update a workflow access key.
#[tracing::instrument(
    name = "arm::logic::workflow_access_keys::create_or_update",
    skip(client, access_key),
    fields(resource_group = %resource_group_name, workflow = %workflow_name, access_key = %access_key_name)
)]
pub async fn create_or_update(
    client: &ArmClient,
    resource_group_name: &str,
    workflow_name: &str,
    access_key_name: &str,
    access_key: &WorkflowAccessKey,
) -> ArmResult<WorkflowAccessKey> {
    let request = create_or_update_request(
        client,
        resource_group_name,
        workflow_name,
        access_key_name,
        access_key,
    )?;
    client.send(request).await?.json().await
}

pub fn delete_request(
    client: &ArmClient,
    resource_group_name: &str,
    workflow_name: &str,
    access_key_name: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&DELETE, Method::DELETE, ACCESS_KEY_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("workflowName", workflow_name)
        .path_param("accessKeyName", access_key_name)
        .api_version(API_VERSION)
        .prepare()
}

#[tracing::instrument(
    name = "arm::logic::workflow_access_keys::delete",
    skip(client),
    fields(resource_group = %resource_group_name, workflow = %workflow_name, access_key = %access_key_name)
)]
pub async fn delete(
    client: &ArmClient,
    resource_group_name: &str,
    workflow_name: &str,
    access_key_name: &str,
) -> ArmResult<u16> {
    let request = delete_request(client, resource_group_name, workflow_name, access_key_name)?;
    client.send(request).await?.status().await
}

pub fn get_request(
    client: &ArmClient,
    resource_group_name: &str,
    workflow_name: &str,
    access_key_name: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&GET, Method::GET, ACCESS_KEY_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("workflowName", workflow_name)
        .path_param("accessKeyName", access_key_name)
        .api_version(API_VERSION)
        .prepare()
}

#[tracing::instrument(
    name = "arm::logic::workflow_access_keys::get",
    skip(client),
    fields(resource_group = %resource_group_name, workflow = %workflow_name, access_key = %access_key_name)
)]
pub async fn get(
    client: &ArmClient,
    resource_group_name: &str,
    workflow_name: &str,
    access_key_name: &str,
) -> ArmResult<WorkflowAccessKey> {
    let request = get_request(client, resource_group_name, workflow_name, access_key_name)?;
    client.send(request).await?.json().await
}

pub fn list_request(
    client: &ArmClient,
    resource_group_name: &str,
    workflow_name: &str,
    top: Option<i32>,
) -> ArmResult<PreparedRequest> {
    client
        .request(&LIST, Method::GET, ACCESS_KEYS_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("workflowName", workflow_name)
        .api_version(API_VERSION)
        .optional_query("$top", top)
        .prepare()
}

#[tracing::instrument(
    name = "arm::logic::workflow_access_keys::list",
    skip(client),
    fields(resource_group = %resource_group_name, workflow = %workflow_name)
)]
pub async fn list(
    client: &ArmClient,
    resource_group_name: &str,
    workflow_name: &str,
    top: Option<i32>,
) -> ArmResult<ListResult<WorkflowAccessKey>> {
    let request = list_request(client, resource_group_name, workflow_name, top)?;
    client.send(request).await?.json().await
}

pub async fn list_next(
    client: &ArmClient,
    last: &ListResult<WorkflowAccessKey>,
) -> ArmResult<Option<ListResult<WorkflowAccessKey>>> {
    pagination::next_page(client, &LIST, last).await
}

pub fn list_secret_keys_request(
    client: &ArmClient,
    resource_group_name: &str,
    workflow_name: &str,
    access_key_name: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&LIST_SECRET_KEYS, Method::POST, LIST_SECRET_KEYS_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("workflowName", workflow_name)
        .path_param("accessKeyName", access_key_name)
        .api_version(API_VERSION)
        .prepare()
}

/// Fetch the secret values of an access key.
#[tracing::instrument(
    name = "arm::logic::workflow_access_keys::list_secret_keys",
    skip(client),
    fields(resource_group = %resource_group_name, workflow = %workflow_name, access_key = %access_key_name)
)]
pub async fn list_secret_keys(
    client: &ArmClient,
    resource_group_name: &str,
    workflow_name: &str,
    access_key_name: &str,
) -> ArmResult<WorkflowSecretKeys> {
    let request =
        list_secret_keys_request(client, resource_group_name, workflow_name, access_key_name)?;
    client.send(request).await?.json().await
}

pub fn regenerate_secret_key_request(
    client: &ArmClient,
    resource_group_name: &str,
    workflow_name: &str,
    access_key_name: &str,
    parameters: &RegenerateSecretKeyParameters,
) -> ArmResult<PreparedRequest> {
    client
        .request(&REGENERATE_SECRET_KEY, Method::POST, REGENERATE_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("workflowName", workflow_name)
        .path_param("accessKeyName", access_key_name)
        .api_version(API_VERSION)
        .json(parameters)
        .prepare()
}

/// Replace one of the secret keys and return the new pair.
#[tracing::instrument(
    name = "arm::logic::workflow_access_keys::regenerate_secret_key",
    skip(client, parameters),
    fields(resource_group = %resource_group_name, workflow = %workflow_name, access_key = %access_key_name, key_type = ?parameters.key_type)
)]
pub async fn regenerate_secret_key(
    client: &ArmClient,
    resource_group_name: &str,
    workflow_name: &str,
    access_key_name: &str,
    parameters: &RegenerateSecretKeyParameters,
) -> ArmResult<WorkflowSecretKeys> {
    let request = regenerate_secret_key_request(
        client,
        resource_group_name,
        workflow_name,
        access_key_name,
        parameters,
    )?;
    let keys = client.send(request).await?.json().await?;

    tracing::debug!("secret key regenerated");
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{resource_group_path, setup_mock_client, EchoResource};
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn key_path() -> String {
        format!(
            "{}/providers/Microsoft.Logic/workflows/flow1/accessKeys/key1",
            resource_group_path("rg1")
        )
    }

    #[test]
    fn secret_keys_debug_is_redacted() {
        let keys = WorkflowSecretKeys {
            primary_secret_key: Some("super-secret".into()),
            secondary_secret_key: None,
        };
        let debug = format!("{keys:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_create_or_update_access_key() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(key_path()))
            .and(query_param("api-version", API_VERSION))
            .and(body_json(serde_json::json!({
                "properties": {"notAfter": "2030-01-01T00:00:00Z"}
            })))
            .respond_with(EchoResource::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let key = WorkflowAccessKey {
            properties: Some(WorkflowAccessKeyProperties {
                not_after: Some("2030-01-01T00:00:00Z".into()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let saved = create_or_update(&client, "rg1", "flow1", "key1", &key)
            .await
            .expect("should save");
        assert_eq!(saved.name.as_deref(), Some("key1"));
    }

    #[tokio::test]
    async fn test_delete_access_key() {
        for status in [200, 204] {
            let server = MockServer::start().await;
            Mock::given(method("DELETE"))
                .and(path(key_path()))
                .respond_with(ResponseTemplate::new(status))
                .mount(&server)
                .await;

            let client = setup_mock_client(&server).await;
            assert_eq!(delete(&client, "rg1", "flow1", "key1").await.unwrap(), status);
        }
    }

    #[tokio::test]
    async fn test_list_secret_keys() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("{}/list", key_path())))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "primarySecretKey": "p-key",
                "secondarySecretKey": "s-key"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let keys = list_secret_keys(&client, "rg1", "flow1", "key1").await.unwrap();
        assert_eq!(keys.primary_secret_key.as_deref(), Some("p-key"));
        assert_eq!(keys.secondary_secret_key.as_deref(), Some("s-key"));
    }

    #[tokio::test]
    async fn test_regenerate_secret_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("{}/regenerate", key_path())))
            .and(body_json(serde_json::json!({"keyType": "Primary"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "primarySecretKey": "new-p-key",
                "secondarySecretKey": "s-key"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let keys = regenerate_secret_key(
            &client,
            "rg1",
            "flow1",
            "key1",
            &RegenerateSecretKeyParameters {
                key_type: KeyType::Primary,
            },
        )
        .await
        .unwrap();
        assert_eq!(keys.primary_secret_key.as_deref(), Some("new-p-key"));
    }

    #[tokio::test]
    async fn test_list_access_keys_with_top() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!(
                "{}/providers/Microsoft.Logic/workflows/flow1/accessKeys",
                resource_group_path("rg1")
            )))
            .and(query_param("$top", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [{"name": "key1"}, {"name": "key2"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let page = list(&client, "rg1", "flow1", Some(10)).await.unwrap();
        assert_eq!(page.value.len(), 2);
        assert!(list_next(&client, &page).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_access_key_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(key_path()))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let err = get(&client, "rg1", "flow1", "key1").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }
}
