//! Availability sets.

use std::collections::HashMap;

use azure_arm_core::client::ArmClient;
use azure_arm_core::error::ArmResult;
use azure_arm_core::models::SubResource;
use azure_arm_core::pagination::{self, ListResult};
use azure_arm_core::request::{Operation, PreparedRequest};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::API_VERSION;

const AVAILABILITY_SET_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Compute/availabilitySets/{name}";
const AVAILABILITY_SETS_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Compute/availabilitySets";

pub const CREATE_OR_UPDATE: Operation =
    Operation::new("compute/availability_sets/create_or_update", &[200]);
pub const DELETE: Operation = Operation::new("compute/availability_sets/delete", &[200, 204]);
pub const GET: Operation = Operation::new("compute/availability_sets/get", &[200]);
pub const LIST: Operation = Operation::new("compute/availability_sets/list", &[200]);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySet {
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
    pub properties: Option<AvailabilitySetProperties>,
}

impl AvailabilitySet {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySetProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_update_domain_count: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_fault_domain_count: Option<i32>,

    /// Virtual machines placed in this set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_machines: Option<Vec<SubResource>>,
}

pub fn create_or_update_request(
    client: &ArmClient,
    resource_group_name: &str,
    name: &str,
    availability_set: &AvailabilitySet,
) -> ArmResult<PreparedRequest> {
    client
        .request(&CREATE_OR_UPDATE, Method::PUT, AVAILABILITY_SET_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("name", name)
        .api_version(API_VERSION)
        .json(availability_set)
        .prepare()
}

#[tracing::instrument(
    name = "arm::compute::availability_sets::create_or_update",
    skip(client, availability_set),
    fields(resource_group = %resource_group_name, availability_set = %name)
)]
pub async fn create_or_update(
    client: &ArmClient,
    resource_group_name: &str,
    name: &str,
    availability_set: &AvailabilitySet,
) -> ArmResult<AvailabilitySet> {
    let request = create_or_update_request(client, resource_group_name, name, availability_set)?;
    client.send(request).await?.json().await
}

pub fn delete_request(
    client: &ArmClient,
    resource_group_name: &str,
    name: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&DELETE, Method::DELETE, AVAILABILITY_SET_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("name", name)
        .api_version(API_VERSION)
        .prepare()
}

#[tracing::instrument(
    name = "arm::compute::availability_sets::delete",
    skip(client),
    fields(resource_group = %resource_group_name, availability_set = %name)
)]
pub async fn delete(client: &ArmClient, resource_group_name: &str, name: &str) -> ArmResult<u16> {
    let request = delete_request(client, resource_group_name, name)?;
    client.send(request).await?.status().await
}

pub fn get_request(
    client: &ArmClient,
    resource_group_name: &str,
    name: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&GET, Method::GET, AVAILABILITY_SET_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("name", name)
        .api_version(API_VERSION)
        .prepare()
}

#[tracing::instrument(
    name = "arm::compute::availability_sets::get",
    skip(client),
    fields(resource_group = %resource_group_name, availability_set = %name)
)]
pub async fn get(
    client: &ArmClient,
    resource_group_name: &str,
    name: &str,
) -> ArmResult<AvailabilitySet> {
    let request = get_request(client, resource_group_name, name)?;
    client.send(request).await?.json().await
}

pub fn list_request(client: &ArmClient, resource_group_name: &str) -> ArmResult<PreparedRequest> {
    client
        .request(&LIST, Method::GET, AVAILABILITY_SETS_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .api_version(API_VERSION)
        .prepare()
}

#[tracing::instrument(
    name = "arm::compute::availability_sets::list",
    skip(client),
    fields(resource_group = %resource_group_name)
)]
pub async fn list(
    client: &ArmClient,
    resource_group_name: &str,
) -> ArmResult<ListResult<AvailabilitySet>> {
    let request = list_request(client, resource_group_name)?;
    client.send(request).await?.json().await
}

pub async fn list_next(
    client: &ArmClient,
    last: &ListResult<AvailabilitySet>,
) -> ArmResult<Option<ListResult<AvailabilitySet>>> {
    pagination::next_page(client, &LIST, last).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{resource_group_path, setup_mock_client, EchoResource};
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn set_path() -> String {
        format!(
            "{}/providers/Microsoft.Compute/availabilitySets/av1",
            resource_group_path("rg1")
        )
    }

    #[tokio::test]
    async fn test_create_availability_set() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(set_path()))
            .and(query_param("api-version", API_VERSION))
            .and(body_json(serde_json::json!({"location": "westus"})))
            .respond_with(EchoResource::default())
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let set = create_or_update(&client, "rg1", "av1", &AvailabilitySet::new("westus"))
            .await
            .unwrap();
        assert_eq!(set.id.as_deref(), Some(set_path().as_str()));
        assert_eq!(set.name.as_deref(), Some("av1"));
    }

    #[tokio::test]
    async fn test_create_availability_set_rejects_201() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(set_path()))
            .respond_with(EchoResource::new(201))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let err = create_or_update(&client, "rg1", "av1", &AvailabilitySet::new("westus"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(201));
    }

    #[tokio::test]
    async fn test_get_and_delete_availability_set() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(set_path()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "av1",
                "properties": {
                    "platformFaultDomainCount": 3,
                    "virtualMachines": [{"id": "/vm/1"}]
                }
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(set_path()))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let set = get(&client, "rg1", "av1").await.unwrap();
        let props = set.properties.unwrap();
        assert_eq!(props.platform_fault_domain_count, Some(3));
        assert_eq!(props.virtual_machines.unwrap()[0].id.as_deref(), Some("/vm/1"));

        assert_eq!(delete(&client, "rg1", "av1").await.unwrap(), 204);
    }

    #[tokio::test]
    async fn test_list_availability_sets() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!(
                "{}/providers/Microsoft.Compute/availabilitySets",
                resource_group_path("rg1")
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [{"name": "av1"}, {"name": "av2"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let page = list(&client, "rg1").await.unwrap();
        assert_eq!(page.value.len(), 2);
        assert!(list_next(&client, &page).await.unwrap().is_none());
    }
}
