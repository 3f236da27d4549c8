//! The operation catalogue a resource provider publishes.

use azure_arm_core::client::ArmClient;
use azure_arm_core::error::ArmResult;
use azure_arm_core::pagination::{self, ListResult};
use azure_arm_core::request::{Operation, PreparedRequest};
use reqwest::Method;
use serde::{Deserialize, Serialize};

const OPERATIONS_PATH: &str = "/providers/{resourceProviderNamespace}/operations";

/// A provider without a catalogue answers `204 No Content`.
pub const LIST: Operation = Operation::new("resources/provider_operation_details/list", &[200, 204]);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceProviderOperationDefinition {
    /// Operation name, such as `Microsoft.Compute/virtualMachines/read`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<ResourceProviderOperationDisplayProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceProviderOperationDisplayProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The catalogue is versioned by the provider itself, so the caller names
/// the `api-version` to query it with.
pub fn list_request(
    client: &ArmClient,
    resource_provider_namespace: &str,
    api_version: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&LIST, Method::GET, OPERATIONS_PATH)
        .path_param("resourceProviderNamespace", resource_provider_namespace)
        .api_version(api_version)
        .prepare()
}

/// List the operations of a resource provider (first page). A `204` yields
/// an empty page.
#[tracing::instrument(
    name = "arm::resources::provider_operation_details::list",
    skip(client),
    fields(namespace = %resource_provider_namespace)
)]
pub async fn list(
    client: &ArmClient,
    resource_provider_namespace: &str,
    api_version: &str,
) -> ArmResult<ListResult<ResourceProviderOperationDefinition>> {
    let request = list_request(client, resource_provider_namespace, api_version)?;
    let page = client.send(request).await?.json_optional().await?;
    Ok(page.unwrap_or_default())
}

pub async fn list_next(
    client: &ArmClient,
    last: &ListResult<ResourceProviderOperationDefinition>,
) -> ArmResult<Option<ListResult<ResourceProviderOperationDefinition>>> {
    pagination::next_page(client, &LIST, last).await
}
