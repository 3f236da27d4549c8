//! History of a workflow trigger's firings.

use azure_arm_core::client::ArmClient;
use azure_arm_core::error::ArmResult;
use azure_arm_core::pagination::{self, ListResult};
use azure_arm_core::request::{Operation, PreparedRequest};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::models::{ContentLink, ResourceReference, API_VERSION};

const HISTORY_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Logic/workflows/{workflowName}/triggers/{triggerName}/histories/{historyName}";
const HISTORIES_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Logic/workflows/{workflowName}/triggers/{triggerName}/histories";

pub const GET: Operation = Operation::new("logic/workflow_trigger_histories/get", &[200]);
pub const LIST: Operation = Operation::new("logic/workflow_trigger_histories/list", &[200]);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowTriggerHistory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<WorkflowTriggerHistoryProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowTriggerHistoryProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,

    /// `Succeeded`, `Failed`, `Skipped`, ...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs_link: Option<ContentLink>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub outputs_link: Option<ContentLink>,

    /// Whether the trigger started a run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fired: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<ResourceReference>,
}

pub fn get_request(
    client: &ArmClient,
    resource_group_name: &str,
    workflow_name: &str,
    trigger_name: &str,
    history_name: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&GET, Method::GET, HISTORY_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("workflowName", workflow_name)
        .path_param("triggerName", trigger_name)
        .path_param("historyName", history_name)
        .api_version(API_VERSION)
        .prepare()
}

#[tracing::instrument(
    name = "arm::logic::workflow_trigger_histories::get",
    skip(client),
    fields(resource_group = %resource_group_name, workflow = %workflow_name, trigger = %trigger_name, history = %history_name)
)]
pub async fn get(
    client: &ArmClient,
    resource_group_name: &str,
    workflow_name: &str,
    trigger_name: &str,
    history_name: &str,
) -> ArmResult<WorkflowTriggerHistory> {
    let request = get_request(
        client,
        resource_group_name,
        workflow_name,
        trigger_name,
        history_name,
    )?;
    client.send(request).await?.json().await
}

pub fn list_request(
    client: &ArmClient,
    resource_group_name: &str,
    workflow_name: &str,
    trigger_name: &str,
    top: Option<i32>,
) -> ArmResult<PreparedRequest> {
    client
        .request(&LIST, Method::GET, HISTORIES_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("workflowName", workflow_name)
        .path_param("triggerName", trigger_name)
        .api_version(API_VERSION)
        .optional_query("$top", top)
        .prepare()
}

#[tracing::instrument(
    name = "arm::logic::workflow_trigger_histories::list",
    skip(client),
    fields(resource_group = %resource_group_name, workflow = %workflow_name, trigger = %trigger_name)
)]
pub async fn list(
    client: &ArmClient,
    resource_group_name: &str,
    workflow_name: &str,
    trigger_name: &str,
    top: Option<i32>,
) -> ArmResult<ListResult<WorkflowTriggerHistory>> {
    let request = list_request(client, resource_group_name, workflow_name, trigger_name, top)?;
    client.send(request).await?.json().await
}

pub async fn list_next(
    client: &ArmClient,
    last: &ListResult<WorkflowTriggerHistory>,
) -> ArmResult<Option<ListResult<WorkflowTriggerHistory>>> {
    pagination::next_page(client, &LIST, last).await
}
