//! Virtual networks.

use std::collections::HashMap;

use azure_arm_core::client::ArmClient;
use azure_arm_core::error::ArmResult;
use azure_arm_core::pagination::{self, ListResult};
use azure_arm_core::request::{Operation, PreparedRequest};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::models::API_VERSION;
use crate::subnets::Subnet;

const VIRTUAL_NETWORK_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/virtualNetworks/{virtualNetworkName}";
const VIRTUAL_NETWORKS_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/virtualNetworks";

pub const CREATE_OR_UPDATE: Operation =
    Operation::new("network/virtual_networks/create_or_update", &[201, 200]);
pub const DELETE: Operation =
    Operation::new("network/virtual_networks/delete", &[204, 202, 200]);
pub const GET: Operation = Operation::new("network/virtual_networks/get", &[200]);
pub const LIST: Operation = Operation::new("network/virtual_networks/list", &[200]);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A virtual network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNetwork {
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
    pub properties: Option<VirtualNetworkPropertiesFormat>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNetworkPropertiesFormat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_space: Option<AddressSpace>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp_options: Option<DhcpOptions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnets: Option<Vec<Subnet>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_guid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

/// CIDR blocks reserved for a virtual network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressSpace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_prefixes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DhcpOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_servers: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

pub fn create_or_update_request(
    client: &ArmClient,
    resource_group_name: &str,
    virtual_network_name: &str,
    network: &VirtualNetwork,
) -> ArmResult<PreparedRequest> {
    client
        .request(&CREATE_OR_UPDATE, Method::PUT, VIRTUAL_NETWORK_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("virtualNetworkName", virtual_network_name)
        .api_version(API_VERSION)
        .json(network)
        .prepare()
}

/// Create or update a virtual network, including any subnets listed in its
/// properties.
#[tracing::instrument(
    name = "arm::network::virtual_networks::create_or_update",
    skip(client, network),
    fields(resource_group = %resource_group_name, virtual_network = %virtual_network_name)
)]
pub async fn create_or_update(
    client: &ArmClient,
    resource_group_name: &str,
    virtual_network_name: &str,
    network: &VirtualNetwork,
) -> ArmResult<VirtualNetwork> {
    tracing::debug!("creating or updating virtual network");

    let request =
        create_or_update_request(client, resource_group_name, virtual_network_name, network)?;
    let network = client.send(request).await?.json::<VirtualNetwork>().await?;

    tracing::debug!(virtual_network_id = ?network.id, "virtual network saved");
    Ok(network)
}

pub fn delete_request(
    client: &ArmClient,
    resource_group_name: &str,
    virtual_network_name: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&DELETE, Method::DELETE, VIRTUAL_NETWORK_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("virtualNetworkName", virtual_network_name)
        .api_version(API_VERSION)
        .prepare()
}

/// Delete a virtual network. Returns the HTTP status.
#[tracing::instrument(
    name = "arm::network::virtual_networks::delete",
    skip(client),
    fields(resource_group = %resource_group_name, virtual_network = %virtual_network_name)
)]
pub async fn delete(
    client: &ArmClient,
    resource_group_name: &str,
    virtual_network_name: &str,
) -> ArmResult<u16> {
    let request = delete_request(client, resource_group_name, virtual_network_name)?;
    client.send(request).await?.status().await
}

pub fn get_request(
    client: &ArmClient,
    resource_group_name: &str,
    virtual_network_name: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&GET, Method::GET, VIRTUAL_NETWORK_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("virtualNetworkName", virtual_network_name)
        .api_version(API_VERSION)
        .prepare()
}

#[tracing::instrument(
    name = "arm::network::virtual_networks::get",
    skip(client),
    fields(resource_group = %resource_group_name, virtual_network = %virtual_network_name)
)]
pub async fn get(
    client: &ArmClient,
    resource_group_name: &str,
    virtual_network_name: &str,
) -> ArmResult<VirtualNetwork> {
    let request = get_request(client, resource_group_name, virtual_network_name)?;
    client.send(request).await?.json().await
}

pub fn list_request(client: &ArmClient, resource_group_name: &str) -> ArmResult<PreparedRequest> {
    client
        .request(&LIST, Method::GET, VIRTUAL_NETWORKS_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .api_version(API_VERSION)
        .prepare()
}

/// List the virtual networks in a resource group (first page).
#[tracing::instrument(
    name = "arm::network::virtual_networks::list",
    skip(client),
    fields(resource_group = %resource_group_name)
)]
pub async fn list(
    client: &ArmClient,
    resource_group_name: &str,
) -> ArmResult<ListResult<VirtualNetwork>> {
    let request = list_request(client, resource_group_name)?;
    client.send(request).await?.json().await
}

pub async fn list_next(
    client: &ArmClient,
    last: &ListResult<VirtualNetwork>,
) -> ArmResult<Option<ListResult<VirtualNetwork>>> {
    pagination::next_page(client, &LIST, last).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{resource_group_path, setup_mock_client, EchoResource};
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn vnet_path() -> String {
        format!(
            "{}/providers/Microsoft.Network/virtualNetworks/vnet1",
            resource_group_path("rg1")
        )
    }

    fn sample_network() -> VirtualNetwork {
        VirtualNetwork {
            location: Some("westus".into()),
            properties: Some(VirtualNetworkPropertiesFormat {
                address_space: Some(AddressSpace {
                    address_prefixes: Some(vec!["10.0.0.0/16".into()]),
                }),
                subnets: Some(vec![Subnet::new("subnet1", "10.0.0.0/24")]),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn virtual_network_wire_format() {
        let json = serde_json::to_value(sample_network()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "location": "westus",
                "properties": {
                    "addressSpace": {"addressPrefixes": ["10.0.0.0/16"]},
                    "subnets": [{"name": "subnet1", "properties": {"addressPrefix": "10.0.0.0/24"}}]
                }
            })
        );
    }

    #[tokio::test]
    async fn test_create_or_update_virtual_network() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(vnet_path()))
            .and(query_param("api-version", API_VERSION))
            .and(body_json(serde_json::to_value(sample_network()).unwrap()))
            .respond_with(EchoResource::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let vnet = create_or_update(&client, "rg1", "vnet1", &sample_network())
            .await
            .expect("should succeed");

        assert_eq!(vnet.name.as_deref(), Some("vnet1"));
        let subnets = vnet.properties.unwrap().subnets.unwrap();
        assert_eq!(subnets[0].name.as_deref(), Some("subnet1"));
    }

    #[tokio::test]
    async fn test_get_virtual_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(vnet_path()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": vnet_path(),
                "name": "vnet1",
                "type": "Microsoft.Network/virtualNetworks",
                "location": "westus",
                "properties": {"provisioningState": "Succeeded"}
            })))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let vnet = get(&client, "rg1", "vnet1").await.expect("should get");
        assert_eq!(
            vnet.resource_type.as_deref(),
            Some("Microsoft.Network/virtualNetworks")
        );
    }

    #[tokio::test]
    async fn test_delete_virtual_network_rejects_409() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path(vnet_path()))
            .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
                "error": {"code": "InUseSubnetCannotBeDeleted", "message": "Subnet is in use"}
            })))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let err = delete(&client, "rg1", "vnet1").await.unwrap_err();
        assert_eq!(err.status(), Some(409));
        assert!(err.to_string().contains("Subnet is in use"));
    }

    #[tokio::test]
    async fn test_list_virtual_networks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!(
                "{}/providers/Microsoft.Network/virtualNetworks",
                resource_group_path("rg1")
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [{"name": "vnet1"}]
            })))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let page = list(&client, "rg1").await.expect("should list");
        assert_eq!(page.value[0].name.as_deref(), Some("vnet1"));
    }
}
