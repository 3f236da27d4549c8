//! Resource provider registration.
//!
//! A subscription must be registered with a resource provider namespace such
//! as `Microsoft.Compute` before it can create that provider's resources.

use azure_arm_core::client::ArmClient;
use azure_arm_core::error::ArmResult;
use azure_arm_core::pagination::{self, ListResult};
use azure_arm_core::request::{Operation, PreparedRequest};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::models::API_VERSION;

const PROVIDER_PATH: &str =
    "/subscriptions/{subscriptionId}/providers/{resourceProviderNamespace}";
const REGISTER_PATH: &str =
    "/subscriptions/{subscriptionId}/providers/{resourceProviderNamespace}/register";
const UNREGISTER_PATH: &str =
    "/subscriptions/{subscriptionId}/providers/{resourceProviderNamespace}/unregister";
const PROVIDERS_PATH: &str = "/subscriptions/{subscriptionId}/providers";

pub const REGISTER: Operation = Operation::new("resources/providers/register", &[200]);
pub const UNREGISTER: Operation = Operation::new("resources/providers/unregister", &[200]);
pub const GET: Operation = Operation::new("resources/providers/get", &[200]);
pub const LIST: Operation = Operation::new("resources/providers/list", &[200]);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A resource provider and its registration state for the subscription.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// `Registered`, `Registering`, `NotRegistered` or `Unregistering`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_types: Option<Vec<ProviderResourceType>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderResourceType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_versions: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

pub fn register_request(
    client: &ArmClient,
    resource_provider_namespace: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&REGISTER, Method::POST, REGISTER_PATH)
        .path_param("resourceProviderNamespace", resource_provider_namespace)
        .api_version(API_VERSION)
        .prepare()
}

/// Register the subscription with a resource provider.
#[tracing::instrument(
    name = "arm::resources::providers::register",
    skip(client),
    fields(namespace = %resource_provider_namespace)
)]
pub async fn register(client: &ArmClient, resource_provider_namespace: &str) -> ArmResult<Provider> {
    let request = register_request(client, resource_provider_namespace)?;
    let provider = client.send(request).await?.json::<Provider>().await?;

    tracing::debug!(state = ?provider.registration_state, "provider registration requested");
    Ok(provider)
}

pub fn unregister_request(
    client: &ArmClient,
    resource_provider_namespace: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&UNREGISTER, Method::POST, UNREGISTER_PATH)
        .path_param("resourceProviderNamespace", resource_provider_namespace)
        .api_version(API_VERSION)
        .prepare()
}

/// Unregister the subscription from a resource provider.
#[tracing::instrument(
    name = "arm::resources::providers::unregister",
    skip(client),
    fields(namespace = %resource_provider_namespace)
)]
pub async fn unregister(
    client: &ArmClient,
    resource_provider_namespace: &str,
) -> ArmResult<Provider> {
    let request = unregister_request(client, resource_provider_namespace)?;
    client.send(request).await?.json().await
}

pub fn get_request(
    client: &ArmClient,
    resource_provider_namespace: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&GET, Method::GET, PROVIDER_PATH)
        .path_param("resourceProviderNamespace", resource_provider_namespace)
        .api_version(API_VERSION)
        .prepare()
}

#[tracing::instrument(
    name = "arm::resources::providers::get",
    skip(client),
    fields(namespace = %resource_provider_namespace)
)]
pub async fn get(client: &ArmClient, resource_provider_namespace: &str) -> ArmResult<Provider> {
    let request = get_request(client, resource_provider_namespace)?;
    client.send(request).await?.json().await
}

pub fn list_request(client: &ArmClient, top: Option<i32>) -> ArmResult<PreparedRequest> {
    client
        .request(&LIST, Method::GET, PROVIDERS_PATH)
        .api_version(API_VERSION)
        .optional_query("$top", top)
        .prepare()
}

/// List the resource providers visible to the subscription (first page).
#[tracing::instrument(name = "arm::resources::providers::list", skip(client))]
pub async fn list(client: &ArmClient, top: Option<i32>) -> ArmResult<ListResult<Provider>> {
    let request = list_request(client, top)?;
    client.send(request).await?.json().await
}

pub async fn list_next(
    client: &ArmClient,
    last: &ListResult<Provider>,
) -> ArmResult<Option<ListResult<Provider>>> {
    pagination::next_page(client, &LIST, last).await
}
