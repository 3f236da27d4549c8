//! Subnets of a virtual network.

use azure_arm_core::client::ArmClient;
use azure_arm_core::error::ArmResult;
use azure_arm_core::models::SubResource;
use azure_arm_core::pagination::{self, ListResult};
use azure_arm_core::request::{Operation, PreparedRequest};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::models::API_VERSION;

const SUBNET_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/virtualNetworks/{virtualNetworkName}/subnets/{subnetName}";
const SUBNETS_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/virtualNetworks/{virtualNetworkName}/subnets";

pub const CREATE_OR_UPDATE: Operation =
    Operation::new("network/subnets/create_or_update", &[201, 200]);
pub const DELETE: Operation = Operation::new("network/subnets/delete", &[204, 202, 200]);
pub const GET: Operation = Operation::new("network/subnets/get", &[200]);
pub const LIST: Operation = Operation::new("network/subnets/list", &[200]);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A subnet within a virtual network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subnet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<SubnetPropertiesFormat>,
}

impl Subnet {
    /// A subnet named `name` covering `address_prefix`.
    pub fn new(name: impl Into<String>, address_prefix: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            properties: Some(SubnetPropertiesFormat {
                address_prefix: Some(address_prefix.into()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubnetPropertiesFormat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_prefix: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_security_group: Option<SubResource>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_table: Option<SubResource>,

    /// IP configurations of the NICs attached to this subnet (read-only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_configurations: Option<Vec<SubResource>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

pub fn create_or_update_request(
    client: &ArmClient,
    resource_group_name: &str,
    virtual_network_name: &str,
    subnet_name: &str,
    subnet: &Subnet,
) -> ArmResult<PreparedRequest> {
    client
        .request(&CREATE_OR_UPDATE, Method::PUT, SUBNET_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("virtualNetworkName", virtual_network_name)
        .path_param("subnetName", subnet_name)
        .api_version(API_VERSION)
        .json(subnet)
        .prepare()
}

/// Create or update a subnet in a virtual network.
#[tracing::instrument(
    name = "arm::network::subnets::create_or_update",
    skip(client, subnet),
    fields(resource_group = %resource_group_name, virtual_network = %virtual_network_name, subnet = %subnet_name)
)]
pub async fn create_or_update(
    client: &ArmClient,
    resource_group_name: &str,
    virtual_network_name: &str,
    subnet_name: &str,
    subnet: &Subnet,
) -> ArmResult<Subnet> {
    tracing::debug!("creating or updating subnet");

    let request = create_or_update_request(
        client,
        resource_group_name,
        virtual_network_name,
        subnet_name,
        subnet,
    )?;
    let subnet = client.send(request).await?.json::<Subnet>().await?;

    tracing::debug!(subnet_id = ?subnet.id, "subnet saved");
    Ok(subnet)
}

pub fn delete_request(
    client: &ArmClient,
    resource_group_name: &str,
    virtual_network_name: &str,
    subnet_name: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&DELETE, Method::DELETE, SUBNET_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("virtualNetworkName", virtual_network_name)
        .path_param("subnetName", subnet_name)
        .api_version(API_VERSION)
        .prepare()
}

/// Delete a subnet. Returns the HTTP status.
#[tracing::instrument(
    name = "arm::network::subnets::delete",
    skip(client),
    fields(resource_group = %resource_group_name, virtual_network = %virtual_network_name, subnet = %subnet_name)
)]
pub async fn delete(
    client: &ArmClient,
    resource_group_name: &str,
    virtual_network_name: &str,
    subnet_name: &str,
) -> ArmResult<u16> {
    let request = delete_request(client, resource_group_name, virtual_network_name, subnet_name)?;
    client.send(request).await?.status().await
}

pub fn get_request(
    client: &ArmClient,
    resource_group_name: &str,
    virtual_network_name: &str,
    subnet_name: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&GET, Method::GET, SUBNET_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("virtualNetworkName", virtual_network_name)
        .path_param("subnetName", subnet_name)
        .api_version(API_VERSION)
        .prepare()
}

#[tracing::instrument(
    name = "arm::network::subnets::get",
    skip(client),
    fields(resource_group = %resource_group_name, virtual_network = %virtual_network_name, subnet = %subnet_name)
)]
pub async fn get(
    client: &ArmClient,
    resource_group_name: &str,
    virtual_network_name: &str,
    subnet_name: &str,
) -> ArmResult<Subnet> {
    let request = get_request(client, resource_group_name, virtual_network_name, subnet_name)?;
    client.send(request).await?.json().await
}

pub fn list_request(
    client: &ArmClient,
    resource_group_name: &str,
    virtual_network_name: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&LIST, Method::GET, SUBNETS_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("virtualNetworkName", virtual_network_name)
        .api_version(API_VERSION)
        .prepare()
}

/// List the subnets of a virtual network (first page).
#[tracing::instrument(
    name = "arm::network::subnets::list",
    skip(client),
    fields(resource_group = %resource_group_name, virtual_network = %virtual_network_name)
)]
pub async fn list(
    client: &ArmClient,
    resource_group_name: &str,
    virtual_network_name: &str,
) -> ArmResult<ListResult<Subnet>> {
    let request = list_request(client, resource_group_name, virtual_network_name)?;
    client.send(request).await?.json().await
}

pub async fn list_next(
    client: &ArmClient,
    last: &ListResult<Subnet>,
) -> ArmResult<Option<ListResult<Subnet>>> {
    pagination::next_page(client, &LIST, last).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{resource_group_path, setup_mock_client, EchoResource};
    use azure_arm_core::ArmError;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn subnet_path() -> String {
        format!(
            "{}/providers/Microsoft.Network/virtualNetworks/vnet1/subnets/subnet1",
            resource_group_path("rg1")
        )
    }

    #[tokio::test]
    async fn test_create_or_update_subnet() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path(subnet_path()))
            .and(query_param("api-version", API_VERSION))
            .and(body_json(serde_json::json!({
                "name": "subnet1",
                "properties": {"addressPrefix": "10.0.0.0/24"}
            })))
            .respond_with(EchoResource::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let subnet = create_or_update(
            &client,
            "rg1",
            "vnet1",
            "subnet1",
            &Subnet::new("subnet1", "10.0.0.0/24"),
        )
        .await
        .expect("should succeed");

        assert_eq!(subnet.id.as_deref(), Some(subnet_path().as_str()));
        assert_eq!(
            subnet.properties.unwrap().address_prefix.as_deref(),
            Some("10.0.0.0/24")
        );
    }

    #[tokio::test]
    async fn empty_subnet_name_fails_before_sending() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let err = create_or_update(&client, "rg1", "vnet1", "", &Subnet::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ArmError::Preparation { .. }));
        assert!(err.to_string().contains("subnetName"));
    }

    #[tokio::test]
    async fn test_get_subnet_404() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(subnet_path()))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": {"code": "NotFound", "message": "Subnet not found"}
            })))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let err = get(&client, "rg1", "vnet1", "subnet1").await.unwrap_err();
        match err {
            ArmError::Response { status, code, .. } => {
                assert_eq!(status, 404);
                assert_eq!(code.as_deref(), Some("NotFound"));
            }
            other => panic!("Expected Response error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_subnet() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path(subnet_path()))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        assert_eq!(delete(&client, "rg1", "vnet1", "subnet1").await.unwrap(), 202);
    }

    #[tokio::test]
    async fn test_list_subnets_single_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!(
                "{}/providers/Microsoft.Network/virtualNetworks/vnet1/subnets",
                resource_group_path("rg1")
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [{"name": "a"}, {"name": "b"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let page = list(&client, "rg1", "vnet1").await.expect("should list");
        assert_eq!(page.value.len(), 2);
        assert!(list_next(&client, &page).await.unwrap().is_none());
    }
}
