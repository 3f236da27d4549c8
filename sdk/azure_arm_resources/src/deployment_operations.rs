//! Operations performed by a template deployment.

use azure_arm_core::client::ArmClient;
use azure_arm_core::error::ArmResult;
use azure_arm_core::pagination::{self, ListResult};
use azure_arm_core::request::{Operation, PreparedRequest};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::models::API_VERSION;

const DEPLOYMENT_OPERATION_PATH: &str = "/subscriptions/{subscriptionId}/resourcegroups/{resourceGroupName}/deployments/{deploymentName}/operations/{operationId}";
const DEPLOYMENT_OPERATIONS_PATH: &str = "/subscriptions/{subscriptionId}/resourcegroups/{resourceGroupName}/deployments/{deploymentName}/operations";

pub const GET: Operation = Operation::new("resources/deployment_operations/get", &[200]);
pub const LIST: Operation = Operation::new("resources/deployment_operations/list", &[200]);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One step of a deployment, usually the creation of a single resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentOperation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<DeploymentOperationProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentOperationProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,

    /// RFC 3339 timestamp of the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<String>,

    /// Free-form status payload; shape depends on the target provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_resource: Option<TargetResource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

pub fn get_request(
    client: &ArmClient,
    resource_group_name: &str,
    deployment_name: &str,
    operation_id: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&GET, Method::GET, DEPLOYMENT_OPERATION_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("deploymentName", deployment_name)
        .path_param("operationId", operation_id)
        .api_version(API_VERSION)
        .prepare()
}

/// Get a single deployment operation.
#[tracing::instrument(
    name = "arm::resources::deployment_operations::get",
    skip(client),
    fields(resource_group = %resource_group_name, deployment = %deployment_name, operation_id = %operation_id)
)]
pub async fn get(
    client: &ArmClient,
    resource_group_name: &str,
    deployment_name: &str,
    operation_id: &str,
) -> ArmResult<DeploymentOperation> {
    let request = get_request(client, resource_group_name, deployment_name, operation_id)?;
    client.send(request).await?.json().await
}

pub fn list_request(
    client: &ArmClient,
    resource_group_name: &str,
    deployment_name: &str,
    top: Option<i32>,
) -> ArmResult<PreparedRequest> {
    client
        .request(&LIST, Method::GET, DEPLOYMENT_OPERATIONS_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("deploymentName", deployment_name)
        .api_version(API_VERSION)
        .optional_query("$top", top)
        .prepare()
}

/// List the operations of a deployment (first page).
#[tracing::instrument(
    name = "arm::resources::deployment_operations::list",
    skip(client),
    fields(resource_group = %resource_group_name, deployment = %deployment_name)
)]
pub async fn list(
    client: &ArmClient,
    resource_group_name: &str,
    deployment_name: &str,
    top: Option<i32>,
) -> ArmResult<ListResult<DeploymentOperation>> {
    let request = list_request(client, resource_group_name, deployment_name, top)?;
    client.send(request).await?.json().await
}

pub async fn list_next(
    client: &ArmClient,
    last: &ListResult<DeploymentOperation>,
) -> ArmResult<Option<ListResult<DeploymentOperation>>> {
    pagination::next_page(client, &LIST, last).await
}
