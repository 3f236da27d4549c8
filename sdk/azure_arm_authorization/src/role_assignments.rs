//! Role assignments.
//!
//! A role assignment grants a principal a role definition at a scope. Scopes
//! and assignment ids are themselves resource paths, such as
//! `subscriptions/{id}/resourceGroups/{group}`, and are inserted into the URL
//! without escaping.

use azure_arm_core::client::ArmClient;
use azure_arm_core::error::ArmResult;
use azure_arm_core::pagination::{self, ListResult};
use azure_arm_core::request::{Operation, PreparedRequest};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::API_VERSION;

const ASSIGNMENT_PATH: &str =
    "/{scope}/providers/Microsoft.Authorization/roleAssignments/{roleAssignmentName}";
const ASSIGNMENT_BY_ID_PATH: &str = "/{roleAssignmentId}";
const SUBSCRIPTION_ASSIGNMENTS_PATH: &str =
    "/subscriptions/{subscriptionId}/providers/Microsoft.Authorization/roleAssignments";
const RESOURCE_ASSIGNMENTS_PATH: &str = "/subscriptions/{subscriptionId}/resourcegroups/{resourceGroupName}/providers/{resourceProviderNamespace}/{parentResourcePath}/{resourceType}/{resourceName}/providers/Microsoft.Authorization/roleAssignments";
const TOP_LEVEL_RESOURCE_ASSIGNMENTS_PATH: &str = "/subscriptions/{subscriptionId}/resourcegroups/{resourceGroupName}/providers/{resourceProviderNamespace}/{resourceType}/{resourceName}/providers/Microsoft.Authorization/roleAssignments";
const RESOURCE_GROUP_ASSIGNMENTS_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Authorization/roleAssignments";
const SCOPE_ASSIGNMENTS_PATH: &str = "/{scope}/providers/Microsoft.Authorization/roleAssignments";

pub const CREATE: Operation = Operation::new("authorization/role_assignments/create", &[200, 201]);
pub const CREATE_BY_ID: Operation =
    Operation::new("authorization/role_assignments/create_by_id", &[200, 201]);
pub const DELETE: Operation = Operation::new("authorization/role_assignments/delete", &[200]);
pub const DELETE_BY_ID: Operation =
    Operation::new("authorization/role_assignments/delete_by_id", &[200]);
pub const GET: Operation = Operation::new("authorization/role_assignments/get", &[200]);
pub const GET_BY_ID: Operation = Operation::new("authorization/role_assignments/get_by_id", &[200]);
pub const LIST: Operation = Operation::new("authorization/role_assignments/list", &[200]);
pub const LIST_FOR_RESOURCE: Operation =
    Operation::new("authorization/role_assignments/list_for_resource", &[200]);
pub const LIST_FOR_RESOURCE_GROUP: Operation =
    Operation::new("authorization/role_assignments/list_for_resource_group", &[200]);
pub const LIST_FOR_SCOPE: Operation =
    Operation::new("authorization/role_assignments/list_for_scope", &[200]);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<RoleAssignmentPropertiesWithScope>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignmentPropertiesWithScope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_definition_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_id: Option<String>,
}

/// Body of a create request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignmentCreateParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<RoleAssignmentProperties>,
}

impl RoleAssignmentCreateParameters {
    /// Grant `role_definition_id` to `principal_id`.
    pub fn new(role_definition_id: impl Into<String>, principal_id: impl Into<String>) -> Self {
        Self {
            properties: Some(RoleAssignmentProperties {
                role_definition_id: Some(role_definition_id.into()),
                principal_id: Some(principal_id.into()),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignmentProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_definition_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_id: Option<String>,
}

/// An empty filter is the same as no filter.
fn non_empty(filter: Option<&str>) -> Option<&str> {
    filter.filter(|f| !f.is_empty())
}

// ---------------------------------------------------------------------------
// By scope and name
// ---------------------------------------------------------------------------

pub fn create_request(
    client: &ArmClient,
    scope: &str,
    role_assignment_name: &str,
    parameters: &RoleAssignmentCreateParameters,
) -> ArmResult<PreparedRequest> {
    client
        .request(&CREATE, Method::PUT, ASSIGNMENT_PATH)
        .raw_path_param("scope", scope)
        .path_param("roleAssignmentName", role_assignment_name)
        .api_version(API_VERSION)
        .json(parameters)
        .prepare()
}

/// Create a role assignment at `scope`. `role_assignment_name` is a GUID
/// chosen by the caller.
#[tracing::instrument(
    name = "arm::authorization::role_assignments::create",
    skip(client, parameters),
    fields(scope = %scope, role_assignment = %role_assignment_name)
)]
pub async fn create(
    client: &ArmClient,
    scope: &str,
    role_assignment_name: &str,
    parameters: &RoleAssignmentCreateParameters,
) -> ArmResult<RoleAssignment> {
    let request = create_request(client, scope, role_assignment_name, parameters)?;
    let assignment = client.send(request).await?.json::<RoleAssignment>().await?;

    tracing::debug!(role_assignment_id = ?assignment.id, "role assignment created");
    Ok(assignment)
}

pub fn delete_request(
    client: &ArmClient,
    scope: &str,
    role_assignment_name: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&DELETE, Method::DELETE, ASSIGNMENT_PATH)
        .raw_path_param("scope", scope)
        .path_param("roleAssignmentName", role_assignment_name)
        .api_version(API_VERSION)
        .prepare()
}

/// Delete a role assignment; the service returns the deleted assignment.
#[tracing::instrument(
    name = "arm::authorization::role_assignments::delete",
    skip(client),
    fields(scope = %scope, role_assignment = %role_assignment_name)
)]
pub async fn delete(
    client: &ArmClient,
    scope: &str,
    role_assignment_name: &str,
) -> ArmResult<RoleAssignment> {
    let request = delete_request(client, scope, role_assignment_name)?;
    client.send(request).await?.json().await
}

pub fn get_request(
    client: &ArmClient,
    scope: &str,
    role_assignment_name: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&GET, Method::GET, ASSIGNMENT_PATH)
        .raw_path_param("scope", scope)
        .path_param("roleAssignmentName", role_assignment_name)
        .api_version(API_VERSION)
        .prepare()
}

#[tracing::instrument(
    name = "arm::authorization::role_assignments::get",
    skip(client),
    fields(scope = %scope, role_assignment = %role_assignment_name)
)]
pub async fn get(
    client: &ArmClient,
    scope: &str,
    role_assignment_name: &str,
) -> ArmResult<RoleAssignment> {
    let request = get_request(client, scope, role_assignment_name)?;
    client.send(request).await?.json().await
}

// ---------------------------------------------------------------------------
// By fully qualified id
// ---------------------------------------------------------------------------

pub fn create_by_id_request(
    client: &ArmClient,
    role_assignment_id: &str,
    parameters: &RoleAssignmentCreateParameters,
) -> ArmResult<PreparedRequest> {
    client
        .request(&CREATE_BY_ID, Method::PUT, ASSIGNMENT_BY_ID_PATH)
        .raw_path_param("roleAssignmentId", role_assignment_id)
        .api_version(API_VERSION)
        .json(parameters)
        .prepare()
}

/// Create a role assignment addressed by its fully qualified id.
#[tracing::instrument(
    name = "arm::authorization::role_assignments::create_by_id",
    skip(client, parameters),
    fields(role_assignment_id = %role_assignment_id)
)]
pub async fn create_by_id(
    client: &ArmClient,
    role_assignment_id: &str,
    parameters: &RoleAssignmentCreateParameters,
) -> ArmResult<RoleAssignment> {
    let request = create_by_id_request(client, role_assignment_id, parameters)?;
    client.send(request).await?.json().await
}

pub fn delete_by_id_request(
    client: &ArmClient,
    role_assignment_id: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&DELETE_BY_ID, Method::DELETE, ASSIGNMENT_BY_ID_PATH)
        .raw_path_param("roleAssignmentId", role_assignment_id)
        .api_version(API_VERSION)
        .prepare()
}

#[tracing::instrument(
    name = "arm::authorization::role_assignments::delete_by_id",
    skip(client),
    fields(role_assignment_id = %role_assignment_id)
)]
pub async fn delete_by_id(client: &ArmClient, role_assignment_id: &str) -> ArmResult<RoleAssignment> {
    let request = delete_by_id_request(client, role_assignment_id)?;
    client.send(request).await?.json().await
}

pub fn get_by_id_request(client: &ArmClient, role_assignment_id: &str) -> ArmResult<PreparedRequest> {
    client
        .request(&GET_BY_ID, Method::GET, ASSIGNMENT_BY_ID_PATH)
        .raw_path_param("roleAssignmentId", role_assignment_id)
        .api_version(API_VERSION)
        .prepare()
}

#[tracing::instrument(
    name = "arm::authorization::role_assignments::get_by_id",
    skip(client),
    fields(role_assignment_id = %role_assignment_id)
)]
pub async fn get_by_id(client: &ArmClient, role_assignment_id: &str) -> ArmResult<RoleAssignment> {
    let request = get_by_id_request(client, role_assignment_id)?;
    client.send(request).await?.json().await
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

pub fn list_request(client: &ArmClient, filter: Option<&str>) -> ArmResult<PreparedRequest> {
    client
        .request(&LIST, Method::GET, SUBSCRIPTION_ASSIGNMENTS_PATH)
        .api_version(API_VERSION)
        .optional_query("$filter", non_empty(filter))
        .prepare()
}

/// List the role assignments of the subscription (first page).
#[tracing::instrument(name = "arm::authorization::role_assignments::list", skip(client))]
pub async fn list(client: &ArmClient, filter: Option<&str>) -> ArmResult<ListResult<RoleAssignment>> {
    let request = list_request(client, filter)?;
    client.send(request).await?.json().await
}

pub async fn list_next(
    client: &ArmClient,
    last: &ListResult<RoleAssignment>,
) -> ArmResult<Option<ListResult<RoleAssignment>>> {
    pagination::next_page(client, &LIST, last).await
}

/// Identifies a resource inside a resource group for
/// [`list_for_resource`].
#[derive(Debug, Clone, Copy)]
pub struct ResourceLocator<'a> {
    pub resource_group_name: &'a str,
    pub resource_provider_namespace: &'a str,
    /// Path of the parent resource, such as `servers/db1`; empty for a
    /// top-level resource.
    pub parent_resource_path: &'a str,
    pub resource_type: &'a str,
    pub resource_name: &'a str,
}

pub fn list_for_resource_request(
    client: &ArmClient,
    resource: ResourceLocator<'_>,
    filter: Option<&str>,
) -> ArmResult<PreparedRequest> {
    let parent = resource.parent_resource_path.trim_matches('/');
    let builder = if parent.is_empty() {
        client.request(
            &LIST_FOR_RESOURCE,
            Method::GET,
            TOP_LEVEL_RESOURCE_ASSIGNMENTS_PATH,
        )
    } else {
        client
            .request(&LIST_FOR_RESOURCE, Method::GET, RESOURCE_ASSIGNMENTS_PATH)
            .raw_path_param("parentResourcePath", parent)
    };
    builder
        .path_param("resourceGroupName", resource.resource_group_name)
        .path_param("resourceProviderNamespace", resource.resource_provider_namespace)
        .raw_path_param("resourceType", resource.resource_type)
        .path_param("resourceName", resource.resource_name)
        .api_version(API_VERSION)
        .optional_query("$filter", non_empty(filter))
        .prepare()
}

/// List the role assignments of a single resource (first page).
#[tracing::instrument(
    name = "arm::authorization::role_assignments::list_for_resource",
    skip(client, resource),
    fields(resource_group = %resource.resource_group_name, resource = %resource.resource_name)
)]
pub async fn list_for_resource(
    client: &ArmClient,
    resource: ResourceLocator<'_>,
    filter: Option<&str>,
) -> ArmResult<ListResult<RoleAssignment>> {
    let request = list_for_resource_request(client, resource, filter)?;
    client.send(request).await?.json().await
}

pub async fn list_for_resource_next(
    client: &ArmClient,
    last: &ListResult<RoleAssignment>,
) -> ArmResult<Option<ListResult<RoleAssignment>>> {
    pagination::next_page(client, &LIST_FOR_RESOURCE, last).await
}

pub fn list_for_resource_group_request(
    client: &ArmClient,
    resource_group_name: &str,
    filter: Option<&str>,
) -> ArmResult<PreparedRequest> {
    client
        .request(&LIST_FOR_RESOURCE_GROUP, Method::GET, RESOURCE_GROUP_ASSIGNMENTS_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .api_version(API_VERSION)
        .optional_query("$filter", non_empty(filter))
        .prepare()
}

#[tracing::instrument(
    name = "arm::authorization::role_assignments::list_for_resource_group",
    skip(client),
    fields(resource_group = %resource_group_name)
)]
pub async fn list_for_resource_group(
    client: &ArmClient,
    resource_group_name: &str,
    filter: Option<&str>,
) -> ArmResult<ListResult<RoleAssignment>> {
    let request = list_for_resource_group_request(client, resource_group_name, filter)?;
    client.send(request).await?.json().await
}

pub async fn list_for_resource_group_next(
    client: &ArmClient,
    last: &ListResult<RoleAssignment>,
) -> ArmResult<Option<ListResult<RoleAssignment>>> {
    pagination::next_page(client, &LIST_FOR_RESOURCE_GROUP, last).await
}

pub fn list_for_scope_request(
    client: &ArmClient,
    scope: &str,
    filter: Option<&str>,
) -> ArmResult<PreparedRequest> {
    client
        .request(&LIST_FOR_SCOPE, Method::GET, SCOPE_ASSIGNMENTS_PATH)
        .raw_path_param("scope", scope)
        .api_version(API_VERSION)
        .optional_query("$filter", non_empty(filter))
        .prepare()
}

#[tracing::instrument(
    name = "arm::authorization::role_assignments::list_for_scope",
    skip(client),
    fields(scope = %scope)
)]
pub async fn list_for_scope(
    client: &ArmClient,
    scope: &str,
    filter: Option<&str>,
) -> ArmResult<ListResult<RoleAssignment>> {
    let request = list_for_scope_request(client, scope, filter)?;
    client.send(request).await?.json().await
}

pub async fn list_for_scope_next(
    client: &ArmClient,
    last: &ListResult<RoleAssignment>,
) -> ArmResult<Option<ListResult<RoleAssignment>>> {
    pagination::next_page(client, &LIST_FOR_SCOPE, last).await
}
