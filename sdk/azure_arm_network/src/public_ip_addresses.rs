//! Public IP addresses.

use std::collections::HashMap;

use azure_arm_core::client::ArmClient;
use azure_arm_core::error::ArmResult;
use azure_arm_core::models::SubResource;
use azure_arm_core::pagination::{self, ListResult};
use azure_arm_core::request::{Operation, PreparedRequest};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::models::{IpAllocationMethod, API_VERSION};

const PUBLIC_IP_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/publicIPAddresses/{publicIpAddressName}";
const PUBLIC_IPS_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/publicIPAddresses";

pub const CREATE_OR_UPDATE: Operation =
    Operation::new("network/public_ip_addresses/create_or_update", &[201, 200]);
pub const DELETE: Operation =
    Operation::new("network/public_ip_addresses/delete", &[204, 202, 200]);
pub const GET: Operation = Operation::new("network/public_ip_addresses/get", &[200]);
pub const LIST: Operation = Operation::new("network/public_ip_addresses/list", &[200]);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A public IP address resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicIpAddress {
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
    pub etag: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<PublicIpAddressPropertiesFormat>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicIpAddressPropertiesFormat {
    #[serde(
        rename = "publicIPAllocationMethod",
        skip_serializing_if = "Option::is_none"
    )]
    pub public_ip_allocation_method: Option<IpAllocationMethod>,

    /// The NIC IP configuration this address is bound to (read-only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_configuration: Option<SubResource>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_settings: Option<PublicIpAddressDnsSettings>,

    /// Assigned address; absent until allocation for dynamic addresses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_timeout_in_minutes: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_guid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicIpAddressDnsSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_name_label: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse_fqdn: Option<String>,
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

pub fn create_or_update_request(
    client: &ArmClient,
    resource_group_name: &str,
    public_ip_address_name: &str,
    address: &PublicIpAddress,
) -> ArmResult<PreparedRequest> {
    client
        .request(&CREATE_OR_UPDATE, Method::PUT, PUBLIC_IP_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("publicIpAddressName", public_ip_address_name)
        .api_version(API_VERSION)
        .json(address)
        .prepare()
}

/// Create or update a public IP address.
#[tracing::instrument(
    name = "arm::network::public_ip_addresses::create_or_update",
    skip(client, address),
    fields(resource_group = %resource_group_name, public_ip = %public_ip_address_name)
)]
pub async fn create_or_update(
    client: &ArmClient,
    resource_group_name: &str,
    public_ip_address_name: &str,
    address: &PublicIpAddress,
) -> ArmResult<PublicIpAddress> {
    tracing::debug!("creating or updating public IP address");

    let request =
        create_or_update_request(client, resource_group_name, public_ip_address_name, address)?;
    let address = client.send(request).await?.json::<PublicIpAddress>().await?;

    tracing::debug!(public_ip_id = ?address.id, "public IP address saved");
    Ok(address)
}

pub fn delete_request(
    client: &ArmClient,
    resource_group_name: &str,
    public_ip_address_name: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&DELETE, Method::DELETE, PUBLIC_IP_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("publicIpAddressName", public_ip_address_name)
        .api_version(API_VERSION)
        .prepare()
}

#[tracing::instrument(
    name = "arm::network::public_ip_addresses::delete",
    skip(client),
    fields(resource_group = %resource_group_name, public_ip = %public_ip_address_name)
)]
pub async fn delete(
    client: &ArmClient,
    resource_group_name: &str,
    public_ip_address_name: &str,
) -> ArmResult<u16> {
    let request = delete_request(client, resource_group_name, public_ip_address_name)?;
    client.send(request).await?.status().await
}

pub fn get_request(
    client: &ArmClient,
    resource_group_name: &str,
    public_ip_address_name: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&GET, Method::GET, PUBLIC_IP_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("publicIpAddressName", public_ip_address_name)
        .api_version(API_VERSION)
        .prepare()
}

#[tracing::instrument(
    name = "arm::network::public_ip_addresses::get",
    skip(client),
    fields(resource_group = %resource_group_name, public_ip = %public_ip_address_name)
)]
pub async fn get(
    client: &ArmClient,
    resource_group_name: &str,
    public_ip_address_name: &str,
) -> ArmResult<PublicIpAddress> {
    let request = get_request(client, resource_group_name, public_ip_address_name)?;
    client.send(request).await?.json().await
}

pub fn list_request(client: &ArmClient, resource_group_name: &str) -> ArmResult<PreparedRequest> {
    client
        .request(&LIST, Method::GET, PUBLIC_IPS_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .api_version(API_VERSION)
        .prepare()
}

#[tracing::instrument(
    name = "arm::network::public_ip_addresses::list",
    skip(client),
    fields(resource_group = %resource_group_name)
)]
pub async fn list(
    client: &ArmClient,
    resource_group_name: &str,
) -> ArmResult<ListResult<PublicIpAddress>> {
    let request = list_request(client, resource_group_name)?;
    client.send(request).await?.json().await
}

pub async fn list_next(
    client: &ArmClient,
    last: &ListResult<PublicIpAddress>,
) -> ArmResult<Option<ListResult<PublicIpAddress>>> {
    pagination::next_page(client, &LIST, last).await
}
