//! Resource groups.
//!
//! ## Example
//!
//! ```rust,no_run
//! use azure_arm_core::client::ArmClient;
//! use azure_arm_core::pagination;
//! use azure_arm_resources::resource_groups;
//!
//! # async fn example(client: &ArmClient) -> azure_arm_core::ArmResult<()> {
//! let first = resource_groups::list(client, None, Some(50)).await?;
//! let all = pagination::collect_all(client, resource_groups::LIST, first).await?;
//! for group in all {
//!     println!("{:?} in {:?}", group.name, group.location);
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

use azure_arm_core::client::ArmClient;
use azure_arm_core::error::ArmResult;
use azure_arm_core::pagination::{self, ListResult};
use azure_arm_core::request::{Operation, PreparedRequest};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::models::API_VERSION;

const RESOURCE_GROUP_PATH: &str =
    "/subscriptions/{subscriptionId}/resourcegroups/{resourceGroupName}";
const RESOURCE_GROUPS_PATH: &str = "/subscriptions/{subscriptionId}/resourcegroups";

/// `204` means the group exists and `404` that it does not. Some endpoints
/// answer a HEAD with `200`, which also means it exists.
pub const CHECK_EXISTENCE: Operation =
    Operation::new("resources/resource_groups/check_existence", &[204, 404, 200]);
pub const CREATE_OR_UPDATE: Operation =
    Operation::new("resources/resource_groups/create_or_update", &[201, 200]);
pub const DELETE: Operation = Operation::new("resources/resource_groups/delete", &[202, 200]);
pub const GET: Operation = Operation::new("resources/resource_groups/get", &[200]);
pub const LIST: Operation = Operation::new("resources/resource_groups/list", &[200]);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A resource group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Azure region, such as `westus`. Required on creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<ResourceGroupProperties>,
}

impl ResourceGroup {
    /// A resource group body for the given region.
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroupProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

pub fn check_existence_request(
    client: &ArmClient,
    resource_group_name: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&CHECK_EXISTENCE, Method::HEAD, RESOURCE_GROUP_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .api_version(API_VERSION)
        .prepare()
}

/// Check whether a resource group exists.
///
/// # Tracing
///
/// Emits a span named `arm::resources::resource_groups::check_existence`.
#[tracing::instrument(
    name = "arm::resources::resource_groups::check_existence",
    skip(client),
    fields(resource_group = %resource_group_name)
)]
pub async fn check_existence(client: &ArmClient, resource_group_name: &str) -> ArmResult<bool> {
    let request = check_existence_request(client, resource_group_name)?;
    let status = client.send(request).await?.status().await?;

    let exists = status != 404;
    tracing::debug!(exists, "resource group existence checked");
    Ok(exists)
}

pub fn create_or_update_request(
    client: &ArmClient,
    resource_group_name: &str,
    group: &ResourceGroup,
) -> ArmResult<PreparedRequest> {
    client
        .request(&CREATE_OR_UPDATE, Method::PUT, RESOURCE_GROUP_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .api_version(API_VERSION)
        .json(group)
        .prepare()
}

/// Create a resource group, or update the tags of an existing one.
#[tracing::instrument(
    name = "arm::resources::resource_groups::create_or_update",
    skip(client, group),
    fields(resource_group = %resource_group_name, location = ?group.location)
)]
pub async fn create_or_update(
    client: &ArmClient,
    resource_group_name: &str,
    group: &ResourceGroup,
) -> ArmResult<ResourceGroup> {
    tracing::debug!("creating or updating resource group");

    let request = create_or_update_request(client, resource_group_name, group)?;
    let group = client.send(request).await?.json::<ResourceGroup>().await?;

    tracing::debug!(resource_group_id = ?group.id, "resource group saved");
    Ok(group)
}

pub fn delete_request(client: &ArmClient, resource_group_name: &str) -> ArmResult<PreparedRequest> {
    client
        .request(&DELETE, Method::DELETE, RESOURCE_GROUP_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .api_version(API_VERSION)
        .prepare()
}

/// Delete a resource group and everything in it.
///
/// The service usually answers `202 Accepted`: deletion continues in the
/// background and this call does not wait for it.
#[tracing::instrument(
    name = "arm::resources::resource_groups::delete",
    skip(client),
    fields(resource_group = %resource_group_name)
)]
pub async fn delete(client: &ArmClient, resource_group_name: &str) -> ArmResult<u16> {
    let request = delete_request(client, resource_group_name)?;
    client.send(request).await?.status().await
}

pub fn get_request(client: &ArmClient, resource_group_name: &str) -> ArmResult<PreparedRequest> {
    client
        .request(&GET, Method::GET, RESOURCE_GROUP_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .api_version(API_VERSION)
        .prepare()
}

#[tracing::instrument(
    name = "arm::resources::resource_groups::get",
    skip(client),
    fields(resource_group = %resource_group_name)
)]
pub async fn get(client: &ArmClient, resource_group_name: &str) -> ArmResult<ResourceGroup> {
    let request = get_request(client, resource_group_name)?;
    client.send(request).await?.json().await
}

pub fn list_request(
    client: &ArmClient,
    filter: Option<&str>,
    top: Option<i32>,
) -> ArmResult<PreparedRequest> {
    client
        .request(&LIST, Method::GET, RESOURCE_GROUPS_PATH)
        .api_version(API_VERSION)
        .optional_query("$filter", filter)
        .optional_query("$top", top)
        .prepare()
}

/// List the resource groups of the subscription (first page).
///
/// `filter` is an OData expression such as `tagname eq 'env'`.
#[tracing::instrument(name = "arm::resources::resource_groups::list", skip(client))]
pub async fn list(
    client: &ArmClient,
    filter: Option<&str>,
    top: Option<i32>,
) -> ArmResult<ListResult<ResourceGroup>> {
    let request = list_request(client, filter, top)?;
    client.send(request).await?.json().await
}

pub async fn list_next(
    client: &ArmClient,
    last: &ListResult<ResourceGroup>,
) -> ArmResult<Option<ListResult<ResourceGroup>>> {
    pagination::next_page(client, &LIST, last).await
}
