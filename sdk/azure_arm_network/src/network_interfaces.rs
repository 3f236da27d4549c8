//! Network interfaces.
//!
//! A network interface binds a VM to a subnet through one or more IP
//! configurations, each of which may reference a public IP address.

use std::collections::HashMap;

use azure_arm_core::client::ArmClient;
use azure_arm_core::error::ArmResult;
use azure_arm_core::models::SubResource;
use azure_arm_core::pagination::{self, ListResult};
use azure_arm_core::request::{Operation, PreparedRequest};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::models::{IpAllocationMethod, API_VERSION};

const NETWORK_INTERFACE_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/networkInterfaces/{networkInterfaceName}";
const NETWORK_INTERFACES_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/networkInterfaces";

pub const CREATE_OR_UPDATE: Operation =
    Operation::new("network/network_interfaces/create_or_update", &[201, 200]);
pub const DELETE: Operation =
    Operation::new("network/network_interfaces/delete", &[204, 202, 200]);
pub const GET: Operation = Operation::new("network/network_interfaces/get", &[200]);
pub const LIST: Operation = Operation::new("network/network_interfaces/list", &[200]);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
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
    pub properties: Option<NetworkInterfacePropertiesFormat>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterfacePropertiesFormat {
    /// The VM this interface is attached to (read-only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_machine: Option<SubResource>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_security_group: Option<SubResource>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_configurations: Option<Vec<NetworkInterfaceIpConfiguration>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,

    #[serde(rename = "enableIPForwarding", skip_serializing_if = "Option::is_none")]
    pub enable_ip_forwarding: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_guid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

/// One IP configuration of a network interface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterfaceIpConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<NetworkInterfaceIpConfigurationPropertiesFormat>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterfaceIpConfigurationPropertiesFormat {
    #[serde(rename = "privateIPAddress", skip_serializing_if = "Option::is_none")]
    pub private_ip_address: Option<String>,

    #[serde(
        rename = "privateIPAllocationMethod",
        skip_serializing_if = "Option::is_none"
    )]
    pub private_ip_allocation_method: Option<IpAllocationMethod>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet: Option<SubResource>,

    #[serde(rename = "publicIPAddress", skip_serializing_if = "Option::is_none")]
    pub public_ip_address: Option<SubResource>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

pub fn create_or_update_request(
    client: &ArmClient,
    resource_group_name: &str,
    network_interface_name: &str,
    interface: &NetworkInterface,
) -> ArmResult<PreparedRequest> {
    client
        .request(&CREATE_OR_UPDATE, Method::PUT, NETWORK_INTERFACE_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("networkInterfaceName", network_interface_name)
        .api_version(API_VERSION)
        .json(interface)
        .prepare()
}

/// Create or update a network interface.
#[tracing::instrument(
    name = "arm::network::network_interfaces::create_or_update",
    skip(client, interface),
    fields(resource_group = %resource_group_name, network_interface = %network_interface_name)
)]
pub async fn create_or_update(
    client: &ArmClient,
    resource_group_name: &str,
    network_interface_name: &str,
    interface: &NetworkInterface,
) -> ArmResult<NetworkInterface> {
    tracing::debug!("creating or updating network interface");

    let request =
        create_or_update_request(client, resource_group_name, network_interface_name, interface)?;
    let interface = client.send(request).await?.json::<NetworkInterface>().await?;

    tracing::debug!(network_interface_id = ?interface.id, "network interface saved");
    Ok(interface)
}

pub fn delete_request(
    client: &ArmClient,
    resource_group_name: &str,
    network_interface_name: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&DELETE, Method::DELETE, NETWORK_INTERFACE_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("networkInterfaceName", network_interface_name)
        .api_version(API_VERSION)
        .prepare()
}

#[tracing::instrument(
    name = "arm::network::network_interfaces::delete",
    skip(client),
    fields(resource_group = %resource_group_name, network_interface = %network_interface_name)
)]
pub async fn delete(
    client: &ArmClient,
    resource_group_name: &str,
    network_interface_name: &str,
) -> ArmResult<u16> {
    let request = delete_request(client, resource_group_name, network_interface_name)?;
    client.send(request).await?.status().await
}

pub fn get_request(
    client: &ArmClient,
    resource_group_name: &str,
    network_interface_name: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&GET, Method::GET, NETWORK_INTERFACE_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("networkInterfaceName", network_interface_name)
        .api_version(API_VERSION)
        .prepare()
}

#[tracing::instrument(
    name = "arm::network::network_interfaces::get",
    skip(client),
    fields(resource_group = %resource_group_name, network_interface = %network_interface_name)
)]
pub async fn get(
    client: &ArmClient,
    resource_group_name: &str,
    network_interface_name: &str,
) -> ArmResult<NetworkInterface> {
    let request = get_request(client, resource_group_name, network_interface_name)?;
    client.send(request).await?.json().await
}

pub fn list_request(client: &ArmClient, resource_group_name: &str) -> ArmResult<PreparedRequest> {
    client
        .request(&LIST, Method::GET, NETWORK_INTERFACES_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .api_version(API_VERSION)
        .prepare()
}

#[tracing::instrument(
    name = "arm::network::network_interfaces::list",
    skip(client),
    fields(resource_group = %resource_group_name)
)]
pub async fn list(
    client: &ArmClient,
    resource_group_name: &str,
) -> ArmResult<ListResult<NetworkInterface>> {
    let request = list_request(client, resource_group_name)?;
    client.send(request).await?.json().await
}

pub async fn list_next(
    client: &ArmClient,
    last: &ListResult<NetworkInterface>,
) -> ArmResult<Option<ListResult<NetworkInterface>>> {
    pagination::next_page(client, &LIST, last).await
}
