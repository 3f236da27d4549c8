//! Storage accounts.
//!
//! Account names are global across Azure: check availability with
//! [`check_name_availability`] before calling [`create`].

use std::collections::HashMap;

use azure_arm_core::client::ArmClient;
use azure_arm_core::error::ArmResult;
use azure_arm_core::pagination::{self, ListResult};
use azure_arm_core::request::{Operation, PreparedRequest};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::API_VERSION;

const CHECK_NAME_AVAILABILITY_PATH: &str =
    "/subscriptions/{subscriptionId}/providers/Microsoft.Storage/checkNameAvailability";
const ACCOUNT_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Storage/storageAccounts/{accountName}";
const ACCOUNTS_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Storage/storageAccounts";

/// Resource type sent with a name availability check.
pub const STORAGE_ACCOUNT_TYPE: &str = "Microsoft.Storage/storageAccounts";

pub const CHECK_NAME_AVAILABILITY: Operation =
    Operation::new("storage/storage_accounts/check_name_availability", &[200]);
/// `202` means creation continues asynchronously; the body may be empty.
pub const CREATE: Operation = Operation::new("storage/storage_accounts/create", &[200, 202]);
pub const DELETE: Operation = Operation::new("storage/storage_accounts/delete", &[200, 204]);
pub const GET_PROPERTIES: Operation =
    Operation::new("storage/storage_accounts/get_properties", &[200]);
pub const LIST_BY_RESOURCE_GROUP: Operation =
    Operation::new("storage/storage_accounts/list_by_resource_group", &[200]);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Replication and performance tier of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    #[serde(rename = "Standard_LRS")]
    StandardLrs,
    #[serde(rename = "Standard_ZRS")]
    StandardZrs,
    #[serde(rename = "Standard_GRS")]
    StandardGrs,
    #[serde(rename = "Standard_RAGRS")]
    StandardRagrs,
    #[serde(rename = "Premium_LRS")]
    PremiumLrs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccountCheckNameAvailabilityParameters {
    pub name: String,

    #[serde(rename = "type")]
    pub resource_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckNameAvailabilityResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_available: Option<bool>,

    /// `AccountNameInvalid` or `AlreadyExists` when unavailable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccountCreateParameters {
    pub location: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,

    pub properties: StorageAccountPropertiesCreateParameters,
}

impl StorageAccountCreateParameters {
    pub fn new(location: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            location: location.into(),
            tags: None,
            properties: StorageAccountPropertiesCreateParameters { account_type },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccountPropertiesCreateParameters {
    pub account_type: AccountType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<StorageAccountProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccountProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_endpoints: Option<Endpoints>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_location: Option<String>,

    /// `Available` or `Unavailable`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_of_primary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
}

/// Service endpoints of an account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blob: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

pub fn check_name_availability_request(
    client: &ArmClient,
    account_name: &str,
) -> ArmResult<PreparedRequest> {
    let parameters = StorageAccountCheckNameAvailabilityParameters {
        name: account_name.to_string(),
        resource_type: STORAGE_ACCOUNT_TYPE.to_string(),
    };
    client
        .request(&CHECK_NAME_AVAILABILITY, Method::POST, CHECK_NAME_AVAILABILITY_PATH)
        .api_version(API_VERSION)
        .json(&parameters)
        .prepare()
}

/// Check whether `account_name` is free to use.
#[tracing::instrument(
    name = "arm::storage::storage_accounts::check_name_availability",
    skip(client),
    fields(account = %account_name)
)]
pub async fn check_name_availability(
    client: &ArmClient,
    account_name: &str,
) -> ArmResult<CheckNameAvailabilityResult> {
    let request = check_name_availability_request(client, account_name)?;
    let result = client
        .send(request)
        .await?
        .json::<CheckNameAvailabilityResult>()
        .await?;

    tracing::debug!(
        available = ?result.name_available,
        reason = ?result.reason,
        "name availability checked"
    );
    Ok(result)
}

pub fn create_request(
    client: &ArmClient,
    resource_group_name: &str,
    account_name: &str,
    parameters: &StorageAccountCreateParameters,
) -> ArmResult<PreparedRequest> {
    client
        .request(&CREATE, Method::PUT, ACCOUNT_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("accountName", account_name)
        .api_version(API_VERSION)
        .json(parameters)
        .prepare()
}

/// Create a storage account.
///
/// Returns `None` when the service accepted the request without describing
/// the account yet (`202 Accepted` with an empty body).
#[tracing::instrument(
    name = "arm::storage::storage_accounts::create",
    skip(client, parameters),
    fields(resource_group = %resource_group_name, account = %account_name, location = %parameters.location)
)]
pub async fn create(
    client: &ArmClient,
    resource_group_name: &str,
    account_name: &str,
    parameters: &StorageAccountCreateParameters,
) -> ArmResult<Option<StorageAccount>> {
    tracing::debug!("creating storage account");

    let request = create_request(client, resource_group_name, account_name, parameters)?;
    client.send(request).await?.json_optional().await
}

pub fn delete_request(
    client: &ArmClient,
    resource_group_name: &str,
    account_name: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&DELETE, Method::DELETE, ACCOUNT_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("accountName", account_name)
        .api_version(API_VERSION)
        .prepare()
}

#[tracing::instrument(
    name = "arm::storage::storage_accounts::delete",
    skip(client),
    fields(resource_group = %resource_group_name, account = %account_name)
)]
pub async fn delete(
    client: &ArmClient,
    resource_group_name: &str,
    account_name: &str,
) -> ArmResult<u16> {
    let request = delete_request(client, resource_group_name, account_name)?;
    client.send(request).await?.status().await
}

pub fn get_properties_request(
    client: &ArmClient,
    resource_group_name: &str,
    account_name: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&GET_PROPERTIES, Method::GET, ACCOUNT_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("accountName", account_name)
        .api_version(API_VERSION)
        .prepare()
}

#[tracing::instrument(
    name = "arm::storage::storage_accounts::get_properties",
    skip(client),
    fields(resource_group = %resource_group_name, account = %account_name)
)]
pub async fn get_properties(
    client: &ArmClient,
    resource_group_name: &str,
    account_name: &str,
) -> ArmResult<StorageAccount> {
    let request = get_properties_request(client, resource_group_name, account_name)?;
    client.send(request).await?.json().await
}

pub fn list_by_resource_group_request(
    client: &ArmClient,
    resource_group_name: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&LIST_BY_RESOURCE_GROUP, Method::GET, ACCOUNTS_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .api_version(API_VERSION)
        .prepare()
}

#[tracing::instrument(
    name = "arm::storage::storage_accounts::list_by_resource_group",
    skip(client),
    fields(resource_group = %resource_group_name)
)]
pub async fn list_by_resource_group(
    client: &ArmClient,
    resource_group_name: &str,
) -> ArmResult<ListResult<StorageAccount>> {
    let request = list_by_resource_group_request(client, resource_group_name)?;
    client.send(request).await?.json().await
}

pub async fn list_by_resource_group_next(
    client: &ArmClient,
    last: &ListResult<StorageAccount>,
) -> ArmResult<Option<ListResult<StorageAccount>>> {
    pagination::next_page(client, &LIST_BY_RESOURCE_GROUP, last).await
}
