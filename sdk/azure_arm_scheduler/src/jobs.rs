//! Scheduler jobs.
//!
//! A job pairs a recurrence with an action (an HTTP call or a queue
//! message) and lives in a job collection.

use std::collections::HashMap;

use azure_arm_core::client::ArmClient;
use azure_arm_core::error::ArmResult;
use azure_arm_core::pagination::{self, ListResult};
use azure_arm_core::request::{Operation, PreparedRequest, RequestPreparer};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::API_VERSION;

const JOB_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Scheduler/jobCollections/{jobCollectionName}/jobs/{jobName}";
const JOBS_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Scheduler/jobCollections/{jobCollectionName}/jobs";
const HISTORY_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Scheduler/jobCollections/{jobCollectionName}/jobs/{jobName}/history";
const RUN_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Scheduler/jobCollections/{jobCollectionName}/jobs/{jobName}/run";

pub const CREATE_OR_UPDATE: Operation = Operation::new("scheduler/jobs/create_or_update", &[200, 201]);
pub const PATCH: Operation = Operation::new("scheduler/jobs/patch", &[200]);
pub const DELETE: Operation = Operation::new("scheduler/jobs/delete", &[200]);
pub const GET: Operation = Operation::new("scheduler/jobs/get", &[200]);
pub const RUN: Operation = Operation::new("scheduler/jobs/run", &[200]);
pub const LIST: Operation = Operation::new("scheduler/jobs/list", &[200]);
pub const LIST_JOB_HISTORY: Operation = Operation::new("scheduler/jobs/list_job_history", &[200]);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDefinition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<JobProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<JobAction>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<JobRecurrence>,

    /// `Enabled`, `Disabled`, `Faulted` or `Completed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Execution counters, maintained by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAction {
    /// `Http`, `Https`, `StorageQueue`, `ServiceBusQueue` or `ServiceBusTopic`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<HttpRequest>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_message: Option<StorageQueueMessage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_policy: Option<RetryPolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageQueueMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_account: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sas_token: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// How the scheduler retries a failed action. Retries are performed by the
/// service, not by this client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryPolicy {
    /// `None` or `Fixed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_type: Option<String>,

    /// ISO 8601 duration, such as `PT30S`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_interval: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_count: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecurrence {
    /// `Minute`, `Hour`, `Day`, `Week` or `Month`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_count: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_count: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub faulted_count: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_execution_time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_execution_time: Option<String>,
}

/// One execution of a job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobHistoryDefinition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<JobHistoryDefinitionProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobHistoryDefinitionProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_execution_time: Option<String>,

    /// `MainAction` or `ErrorAction`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_name: Option<String>,

    /// `Completed`, `Failed` or `Postponed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_count: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_count: Option<i32>,
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

fn job_request<'a>(
    client: &'a ArmClient,
    operation: &Operation,
    method: Method,
    template: &'static str,
    resource_group_name: &str,
    job_collection_name: &str,
    job_name: &str,
) -> RequestPreparer<'a> {
    client
        .request(operation, method, template)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("jobCollectionName", job_collection_name)
        .path_param("jobName", job_name)
        .api_version(API_VERSION)
}

pub fn create_or_update_request(
    client: &ArmClient,
    resource_group_name: &str,
    job_collection_name: &str,
    job_name: &str,
    job: &JobDefinition,
) -> ArmResult<PreparedRequest> {
    job_request(
        client,
        &CREATE_OR_UPDATE,
        Method::PUT,
        JOB_PATH,
        resource_group_name,
        job_collection_name,
        job_name,
    )
    .json(job)
    .prepare()
}

/// Create or replace a job.
#[tracing::instrument(
    name = "arm::scheduler::jobs::create_or_update",
    skip(client, job),
    fields(resource_group = %resource_group_name, job_collection = %job_collection_name, job = %job_name)
)]
pub async fn create_or_update(
    client: &ArmClient,
    resource_group_name: &str,
    job_collection_name: &str,
    job_name: &str,
    job: &JobDefinition,
) -> ArmResult<JobDefinition> {
    let request =
        create_or_update_request(client, resource_group_name, job_collection_name, job_name, job)?;
    let job = client.send(request).await?.json::<JobDefinition>().await?;

    tracing::debug!(job_id = ?job.id, "job saved");
    Ok(job)
}

pub fn patch_request(
    client: &ArmClient,
    resource_group_name: &str,
    job_collection_name: &str,
    job_name: &str,
    job: &JobDefinition,
) -> ArmResult<PreparedRequest> {
    job_request(
        client,
        &PATCH,
        Method::PATCH,
        JOB_PATH,
        resource_group_name,
        job_collection_name,
        job_name,
    )
    .json(job)
    .prepare()
}

/// Update only the fields set in `job`.
#[tracing::instrument(
    name = "arm::scheduler::jobs::patch",
    skip(client, job),
    fields(resource_group = %resource_group_name, job_collection = %job_collection_name, job = %job_name)
)]
pub async fn patch(
    client: &ArmClient,
    resource_group_name: &str,
    job_collection_name: &str,
    job_name: &str,
    job: &JobDefinition,
) -> ArmResult<JobDefinition> {
    let request = patch_request(client, resource_group_name, job_collection_name, job_name, job)?;
    client.send(request).await?.json().await
}

pub fn delete_request(
    client: &ArmClient,
    resource_group_name: &str,
    job_collection_name: &str,
    job_name: &str,
) -> ArmResult<PreparedRequest> {
    job_request(
        client,
        &DELETE,
        Method::DELETE,
        JOB_PATH,
        resource_group_name,
        job_collection_name,
        job_name,
    )
    .prepare()
}

#[tracing::instrument(
    name = "arm::scheduler::jobs::delete",
    skip(client),
    fields(resource_group = %resource_group_name, job_collection = %job_collection_name, job = %job_name)
)]
pub async fn delete(
    client: &ArmClient,
    resource_group_name: &str,
    job_collection_name: &str,
    job_name: &str,
) -> ArmResult<u16> {
    let request = delete_request(client, resource_group_name, job_collection_name, job_name)?;
    client.send(request).await?.status().await
}

pub fn get_request(
    client: &ArmClient,
    resource_group_name: &str,
    job_collection_name: &str,
    job_name: &str,
) -> ArmResult<PreparedRequest> {
    job_request(
        client,
        &GET,
        Method::GET,
        JOB_PATH,
        resource_group_name,
        job_collection_name,
        job_name,
    )
    .prepare()
}

#[tracing::instrument(
    name = "arm::scheduler::jobs::get",
    skip(client),
    fields(resource_group = %resource_group_name, job_collection = %job_collection_name, job = %job_name)
)]
pub async fn get(
    client: &ArmClient,
    resource_group_name: &str,
    job_collection_name: &str,
    job_name: &str,
) -> ArmResult<JobDefinition> {
    let request = get_request(client, resource_group_name, job_collection_name, job_name)?;
    client.send(request).await?.json().await
}

pub fn run_request(
    client: &ArmClient,
    resource_group_name: &str,
    job_collection_name: &str,
    job_name: &str,
) -> ArmResult<PreparedRequest> {
    job_request(
        client,
        &RUN,
        Method::POST,
        RUN_PATH,
        resource_group_name,
        job_collection_name,
        job_name,
    )
    .prepare()
}

/// Trigger an immediate execution of a job.
#[tracing::instrument(
    name = "arm::scheduler::jobs::run",
    skip(client),
    fields(resource_group = %resource_group_name, job_collection = %job_collection_name, job = %job_name)
)]
pub async fn run(
    client: &ArmClient,
    resource_group_name: &str,
    job_collection_name: &str,
    job_name: &str,
) -> ArmResult<u16> {
    let request = run_request(client, resource_group_name, job_collection_name, job_name)?;
    client.send(request).await?.status().await
}

pub fn list_request(
    client: &ArmClient,
    resource_group_name: &str,
    job_collection_name: &str,
    top: Option<i32>,
    skip: Option<i32>,
) -> ArmResult<PreparedRequest> {
    client
        .request(&LIST, Method::GET, JOBS_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("jobCollectionName", job_collection_name)
        .api_version(API_VERSION)
        .optional_query("$top", top)
        .optional_query("$skip", skip)
        .prepare()
}

/// List the jobs of a job collection (first page).
#[tracing::instrument(
    name = "arm::scheduler::jobs::list",
    skip(client),
    fields(resource_group = %resource_group_name, job_collection = %job_collection_name)
)]
pub async fn list(
    client: &ArmClient,
    resource_group_name: &str,
    job_collection_name: &str,
    top: Option<i32>,
    skip: Option<i32>,
) -> ArmResult<ListResult<JobDefinition>> {
    let request = list_request(client, resource_group_name, job_collection_name, top, skip)?;
    client.send(request).await?.json().await
}

pub async fn list_next(
    client: &ArmClient,
    last: &ListResult<JobDefinition>,
) -> ArmResult<Option<ListResult<JobDefinition>>> {
    pagination::next_page(client, &LIST, last).await
}

pub fn list_job_history_request(
    client: &ArmClient,
    resource_group_name: &str,
    job_collection_name: &str,
    job_name: &str,
    top: Option<i32>,
    skip: Option<i32>,
) -> ArmResult<PreparedRequest> {
    job_request(
        client,
        &LIST_JOB_HISTORY,
        Method::GET,
        HISTORY_PATH,
        resource_group_name,
        job_collection_name,
        job_name,
    )
    .optional_query("$top", top)
    .optional_query("$skip", skip)
    .prepare()
}

/// List the execution history of a job (first page).
#[tracing::instrument(
    name = "arm::scheduler::jobs::list_job_history",
    skip(client),
    fields(resource_group = %resource_group_name, job_collection = %job_collection_name, job = %job_name)
)]
pub async fn list_job_history(
    client: &ArmClient,
    resource_group_name: &str,
    job_collection_name: &str,
    job_name: &str,
    top: Option<i32>,
    skip: Option<i32>,
) -> ArmResult<ListResult<JobHistoryDefinition>> {
    let request = list_job_history_request(
        client,
        resource_group_name,
        job_collection_name,
        job_name,
        top,
        skip,
    )?;
    client.send(request).await?.json().await
}

pub async fn list_job_history_next(
    client: &ArmClient,
    last: &ListResult<JobHistoryDefinition>,
) -> ArmResult<Option<ListResult<JobHistoryDefinition>>> {
    pagination::next_page(client, &LIST_JOB_HISTORY, last).await
}
