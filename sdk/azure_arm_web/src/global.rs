//! Subscription-level App Service operations.
//!
//! None of these calls is scoped to a resource group: each one reads or
//! writes state under `/subscriptions/{subscriptionId}/providers/Microsoft.Web`.

use std::collections::HashMap;
use std::fmt;

use azure_arm_core::client::ArmClient;
use azure_arm_core::error::ArmResult;
use azure_arm_core::pagination::ListResult;
use azure_arm_core::request::{Operation, PreparedRequest, RequestPreparer};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::API_VERSION;

const CHECK_NAME_AVAILABILITY_PATH: &str =
    "/subscriptions/{subscriptionId}/providers/Microsoft.Web/checknameavailability";
const CLASSIC_MOBILE_SERVICES_PATH: &str =
    "/subscriptions/{subscriptionId}/providers/Microsoft.Web/classicMobileServices";
const HOSTING_ENVIRONMENTS_PATH: &str =
    "/subscriptions/{subscriptionId}/providers/Microsoft.Web/hostingEnvironments";
const MANAGED_HOSTING_ENVIRONMENTS_PATH: &str =
    "/subscriptions/{subscriptionId}/providers/Microsoft.Web/managedHostingEnvironments";
const SERVER_FARMS_PATH: &str = "/subscriptions/{subscriptionId}/providers/Microsoft.Web/serverfarms";
const SITES_PATH: &str = "/subscriptions/{subscriptionId}/providers/Microsoft.Web/sites";
const WEB_HOSTING_PLANS_PATH: &str =
    "/subscriptions/{subscriptionId}/providers/Microsoft.Web/webhostingplans";
const GEO_REGIONS_PATH: &str = "/subscriptions/{subscriptionId}/providers/Microsoft.Web/geoRegions";
const PUBLISHING_CREDENTIALS_PATH: &str =
    "/subscriptions/{subscriptionId}/providers/Microsoft.Web/publishingCredentials";
const HOSTING_ENVIRONMENT_NAME_AVAILABLE_PATH: &str =
    "/subscriptions/{subscriptionId}/providers/Microsoft.Web/ishostingenvironmentnameavailable";
const HOSTING_ENVIRONMENT_LEGACY_NAME_AVAILABLE_PATH: &str =
    "/subscriptions/{subscriptionId}/providers/Microsoft.Web/ishostingenvironmentnameavailable/{name}";
const PREMIER_ADD_ON_OFFERS_PATH: &str =
    "/subscriptions/{subscriptionId}/providers/Microsoft.Web/premieraddonoffers";

pub const CHECK_NAME_AVAILABILITY: Operation =
    Operation::new("web/global/check_name_availability", &[200]);
pub const GET_ALL_CLASSIC_MOBILE_SERVICES: Operation =
    Operation::new("web/global/get_all_classic_mobile_services", &[200]);
pub const GET_ALL_HOSTING_ENVIRONMENTS: Operation =
    Operation::new("web/global/get_all_hosting_environments", &[200]);
pub const GET_ALL_MANAGED_HOSTING_ENVIRONMENTS: Operation =
    Operation::new("web/global/get_all_managed_hosting_environments", &[200]);
pub const GET_ALL_SERVER_FARMS: Operation =
    Operation::new("web/global/get_all_server_farms", &[200]);
pub const GET_ALL_SITES: Operation = Operation::new("web/global/get_all_sites", &[200]);
pub const GET_ALL_WEB_HOSTING_PLANS: Operation =
    Operation::new("web/global/get_all_web_hosting_plans", &[200]);
pub const GET_SUBSCRIPTION_GEO_REGIONS: Operation =
    Operation::new("web/global/get_subscription_geo_regions", &[200]);
pub const GET_SUBSCRIPTION_PUBLISHING_CREDENTIALS: Operation =
    Operation::new("web/global/get_subscription_publishing_credentials", &[200]);
pub const IS_HOSTING_ENVIRONMENT_NAME_AVAILABLE: Operation =
    Operation::new("web/global/is_hosting_environment_name_available", &[200]);
pub const IS_HOSTING_ENVIRONMENT_WITH_LEGACY_NAME_AVAILABLE: Operation = Operation::new(
    "web/global/is_hosting_environment_with_legacy_name_available",
    &[200],
);
pub const LIST_PREMIER_ADD_ON_OFFERS: Operation =
    Operation::new("web/global/list_premier_add_on_offers", &[200]);
pub const UPDATE_SUBSCRIPTION_PUBLISHING_CREDENTIALS: Operation = Operation::new(
    "web/global/update_subscription_publishing_credentials",
    &[200],
);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// An App Service resource. `P` is the resource-specific property bag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebResource<P> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<P>,
}

pub type Site = WebResource<SiteProperties>;
pub type ServerFarm = WebResource<ServerFarmProperties>;
pub type GeoRegion = WebResource<GeoRegionProperties>;
pub type HostingEnvironment = WebResource<serde_json::Value>;
pub type ManagedHostingEnvironment = WebResource<serde_json::Value>;
pub type ClassicMobileService = WebResource<serde_json::Value>;
pub type User = WebResource<UserProperties>;

/// Untyped payload returned by the availability and add-on offer queries.
pub type ObjectSet = serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_names: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_host_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_farm_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerFarmProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_number_of_workers: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_sites: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo_region: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoRegionProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Deployment credentials shared by every site in the subscription.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub publishing_user_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub publishing_password: Option<String>,
}

impl fmt::Debug for UserProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserProperties")
            .field("name", &self.name)
            .field("publishing_user_name", &self.publishing_user_name)
            .field(
                "publishing_password",
                &self.publishing_password.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceNameAvailabilityRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// `Site`, `Slot`, `HostingEnvironment`, ...
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_fqdn: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceNameAvailability {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_available: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

fn subscription_request<'a>(
    client: &'a ArmClient,
    operation: &Operation,
    method: Method,
    template: &'static str,
) -> RequestPreparer<'a> {
    client
        .request(operation, method, template)
        .api_version(API_VERSION)
}

pub fn check_name_availability_request(
    client: &ArmClient,
    request: &ResourceNameAvailabilityRequest,
) -> ArmResult<PreparedRequest> {
    subscription_request(
        client,
        &CHECK_NAME_AVAILABILITY,
        Method::POST,
        CHECK_NAME_AVAILABILITY_PATH,
    )
    .json(request)
    .prepare()
}

/// Check whether a resource name is available.
#[tracing::instrument(
    name = "arm::web::global::check_name_availability",
    skip(client, request),
    fields(resource_name = ?request.name)
)]
pub async fn check_name_availability(
    client: &ArmClient,
    request: &ResourceNameAvailabilityRequest,
) -> ArmResult<ResourceNameAvailability> {
    let prepared = check_name_availability_request(client, request)?;
    client.send(prepared).await?.json().await
}

pub fn get_all_classic_mobile_services_request(client: &ArmClient) -> ArmResult<PreparedRequest> {
    subscription_request(
        client,
        &GET_ALL_CLASSIC_MOBILE_SERVICES,
        Method::GET,
        CLASSIC_MOBILE_SERVICES_PATH,
    )
    .prepare()
}

#[tracing::instrument(name = "arm::web::global::get_all_classic_mobile_services", skip(client))]
pub async fn get_all_classic_mobile_services(
    client: &ArmClient,
) -> ArmResult<ListResult<ClassicMobileService>> {
    let request = get_all_classic_mobile_services_request(client)?;
    client.send(request).await?.json().await
}

pub fn get_all_hosting_environments_request(client: &ArmClient) -> ArmResult<PreparedRequest> {
    subscription_request(
        client,
        &GET_ALL_HOSTING_ENVIRONMENTS,
        Method::GET,
        HOSTING_ENVIRONMENTS_PATH,
    )
    .prepare()
}

#[tracing::instrument(name = "arm::web::global::get_all_hosting_environments", skip(client))]
pub async fn get_all_hosting_environments(
    client: &ArmClient,
) -> ArmResult<ListResult<HostingEnvironment>> {
    let request = get_all_hosting_environments_request(client)?;
    client.send(request).await?.json().await
}

pub fn get_all_managed_hosting_environments_request(
    client: &ArmClient,
) -> ArmResult<PreparedRequest> {
    subscription_request(
        client,
        &GET_ALL_MANAGED_HOSTING_ENVIRONMENTS,
        Method::GET,
        MANAGED_HOSTING_ENVIRONMENTS_PATH,
    )
    .prepare()
}

#[tracing::instrument(
    name = "arm::web::global::get_all_managed_hosting_environments",
    skip(client)
)]
pub async fn get_all_managed_hosting_environments(
    client: &ArmClient,
) -> ArmResult<ListResult<ManagedHostingEnvironment>> {
    let request = get_all_managed_hosting_environments_request(client)?;
    client.send(request).await?.json().await
}

pub fn get_all_server_farms_request(
    client: &ArmClient,
    detailed: Option<bool>,
) -> ArmResult<PreparedRequest> {
    subscription_request(client, &GET_ALL_SERVER_FARMS, Method::GET, SERVER_FARMS_PATH)
        .optional_query("detailed", detailed)
        .prepare()
}

/// List App Service plans. `detailed` asks for the full property set.
#[tracing::instrument(name = "arm::web::global::get_all_server_farms", skip(client))]
pub async fn get_all_server_farms(
    client: &ArmClient,
    detailed: Option<bool>,
) -> ArmResult<ListResult<ServerFarm>> {
    let request = get_all_server_farms_request(client, detailed)?;
    client.send(request).await?.json().await
}

pub fn get_all_sites_request(client: &ArmClient) -> ArmResult<PreparedRequest> {
    subscription_request(client, &GET_ALL_SITES, Method::GET, SITES_PATH).prepare()
}

#[tracing::instrument(name = "arm::web::global::get_all_sites", skip(client))]
pub async fn get_all_sites(client: &ArmClient) -> ArmResult<ListResult<Site>> {
    let request = get_all_sites_request(client)?;
    client.send(request).await?.json().await
}

pub fn get_all_web_hosting_plans_request(
    client: &ArmClient,
    detailed: Option<bool>,
) -> ArmResult<PreparedRequest> {
    subscription_request(
        client,
        &GET_ALL_WEB_HOSTING_PLANS,
        Method::GET,
        WEB_HOSTING_PLANS_PATH,
    )
    .optional_query("detailed", detailed)
    .prepare()
}

#[tracing::instrument(name = "arm::web::global::get_all_web_hosting_plans", skip(client))]
pub async fn get_all_web_hosting_plans(
    client: &ArmClient,
    detailed: Option<bool>,
) -> ArmResult<ListResult<ServerFarm>> {
    let request = get_all_web_hosting_plans_request(client, detailed)?;
    client.send(request).await?.json().await
}

pub fn get_subscription_geo_regions_request(client: &ArmClient) -> ArmResult<PreparedRequest> {
    subscription_request(
        client,
        &GET_SUBSCRIPTION_GEO_REGIONS,
        Method::GET,
        GEO_REGIONS_PATH,
    )
    .prepare()
}

#[tracing::instrument(name = "arm::web::global::get_subscription_geo_regions", skip(client))]
pub async fn get_subscription_geo_regions(client: &ArmClient) -> ArmResult<ListResult<GeoRegion>> {
    let request = get_subscription_geo_regions_request(client)?;
    client.send(request).await?.json().await
}

pub fn get_subscription_publishing_credentials_request(
    client: &ArmClient,
) -> ArmResult<PreparedRequest> {
    subscription_request(
        client,
        &GET_SUBSCRIPTION_PUBLISHING_CREDENTIALS,
        Method::GET,
        PUBLISHING_CREDENTIALS_PATH,
    )
    .prepare()
}

#[tracing::instrument(
    name = "arm::web::global::get_subscription_publishing_credentials",
    skip(client)
)]
pub async fn get_subscription_publishing_credentials(client: &ArmClient) -> ArmResult<User> {
    let request = get_subscription_publishing_credentials_request(client)?;
    client.send(request).await?.json().await
}

pub fn is_hosting_environment_name_available_request(
    client: &ArmClient,
    name: &str,
) -> ArmResult<PreparedRequest> {
    subscription_request(
        client,
        &IS_HOSTING_ENVIRONMENT_NAME_AVAILABLE,
        Method::GET,
        HOSTING_ENVIRONMENT_NAME_AVAILABLE_PATH,
    )
    .query("name", name)
    .prepare()
}

#[tracing::instrument(
    name = "arm::web::global::is_hosting_environment_name_available",
    skip(client),
    fields(hosting_environment = %name)
)]
pub async fn is_hosting_environment_name_available(
    client: &ArmClient,
    name: &str,
) -> ArmResult<ObjectSet> {
    let request = is_hosting_environment_name_available_request(client, name)?;
    client.send(request).await?.json().await
}

pub fn is_hosting_environment_with_legacy_name_available_request(
    client: &ArmClient,
    name: &str,
) -> ArmResult<PreparedRequest> {
    subscription_request(
        client,
        &IS_HOSTING_ENVIRONMENT_WITH_LEGACY_NAME_AVAILABLE,
        Method::GET,
        HOSTING_ENVIRONMENT_LEGACY_NAME_AVAILABLE_PATH,
    )
    .path_param("name", name)
    .prepare()
}

/// Same check as [`is_hosting_environment_name_available`], with the name in
/// the path as older environments expect.
#[tracing::instrument(
    name = "arm::web::global::is_hosting_environment_with_legacy_name_available",
    skip(client),
    fields(hosting_environment = %name)
)]
pub async fn is_hosting_environment_with_legacy_name_available(
    client: &ArmClient,
    name: &str,
) -> ArmResult<ObjectSet> {
    let request = is_hosting_environment_with_legacy_name_available_request(client, name)?;
    client.send(request).await?.json().await
}

pub fn list_premier_add_on_offers_request(client: &ArmClient) -> ArmResult<PreparedRequest> {
    subscription_request(
        client,
        &LIST_PREMIER_ADD_ON_OFFERS,
        Method::GET,
        PREMIER_ADD_ON_OFFERS_PATH,
    )
    .prepare()
}

#[tracing::instrument(name = "arm::web::global::list_premier_add_on_offers", skip(client))]
pub async fn list_premier_add_on_offers(client: &ArmClient) -> ArmResult<ObjectSet> {
    let request = list_premier_add_on_offers_request(client)?;
    client.send(request).await?.json().await
}

pub fn update_subscription_publishing_credentials_request(
    client: &ArmClient,
    request_message: &User,
) -> ArmResult<PreparedRequest> {
    subscription_request(
        client,
        &UPDATE_SUBSCRIPTION_PUBLISHING_CREDENTIALS,
        Method::PUT,
        PUBLISHING_CREDENTIALS_PATH,
    )
    .json(request_message)
    .prepare()
}

#[tracing::instrument(
    name = "arm::web::global::update_subscription_publishing_credentials",
    skip(client, request_message)
)]
pub async fn update_subscription_publishing_credentials(
    client: &ArmClient,
    request_message: &User,
) -> ArmResult<User> {
    let request = update_subscription_publishing_credentials_request(client, request_message)?;
    client.send(request).await?.json().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{setup_mock_client, TEST_SUBSCRIPTION_ID};
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn web_path(suffix: &str) -> String {
        format!("/subscriptions/{TEST_SUBSCRIPTION_ID}/providers/Microsoft.Web/{suffix}")
    }

    #[tokio::test]
    async fn test_check_name_availability() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(web_path("checknameavailability")))
            .and(query_param("api-version", API_VERSION))
            .and(body_json(serde_json::json!({"name": "mysite", "type": "Site"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "nameAvailable": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let request = ResourceNameAvailabilityRequest {
            name: Some("mysite".into()),
            resource_type: Some("Site".into()),
            is_fqdn: None,
        };
        let result = check_name_availability(&client, &request).await.unwrap();
        assert_eq!(result.name_available, Some(true));
    }

    #[test]
    fn detailed_flag_is_optional() {
        let client = ArmClient::builder()
            .endpoint("https://management.azure.com")
            .subscription_id(TEST_SUBSCRIPTION_ID)
            .credential(azure_arm_core::auth::ArmCredential::access_token("t"))
            .build()
            .unwrap();

        let plain = get_all_server_farms_request(&client, None).unwrap();
        assert_eq!(plain.query_value("detailed"), None);

        let detailed = get_all_web_hosting_plans_request(&client, Some(true)).unwrap();
        assert_eq!(detailed.query_value("detailed").as_deref(), Some("true"));
        assert!(detailed.url().path().ends_with("/webhostingplans"));
    }

    #[tokio::test]
    async fn test_get_all_sites() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(web_path("sites")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [{
                    "name": "site1",
                    "kind": "app",
                    "properties": {"state": "Running", "hostNames": ["site1.azurewebsites.net"]}
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let sites = get_all_sites(&client).await.unwrap();
        let props = sites.value[0].properties.as_ref().unwrap();
        assert_eq!(props.state.as_deref(), Some("Running"));
        assert_eq!(
            props.host_names.as_deref(),
            Some(&["site1.azurewebsites.net".to_string()][..])
        );
    }

    #[tokio::test]
    async fn test_collections_decode() {
        let server = MockServer::start().await;
        for suffix in [
            "classicMobileServices",
            "hostingEnvironments",
            "managedHostingEnvironments",
            "geoRegions",
        ] {
            Mock::given(method("GET"))
                .and(path(web_path(suffix)))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "value": [{"name": suffix}]
                })))
                .expect(1)
                .mount(&server)
                .await;
        }

        let client = setup_mock_client(&server).await;
        let mobile = get_all_classic_mobile_services(&client).await.unwrap();
        assert_eq!(mobile.value[0].name.as_deref(), Some("classicMobileServices"));
        let hosting = get_all_hosting_environments(&client).await.unwrap();
        assert_eq!(hosting.value.len(), 1);
        let managed = get_all_managed_hosting_environments(&client).await.unwrap();
        assert_eq!(managed.value.len(), 1);
        let regions = get_subscription_geo_regions(&client).await.unwrap();
        assert_eq!(regions.value[0].name.as_deref(), Some("geoRegions"));
    }

    #[tokio::test]
    async fn test_hosting_environment_name_checks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(web_path("ishostingenvironmentnameavailable")))
            .and(query_param("name", "ase1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(true)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(web_path("ishostingenvironmentnameavailable/ase1")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(false)))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let current = is_hosting_environment_name_available(&client, "ase1")
            .await
            .unwrap();
        assert_eq!(current, serde_json::json!(true));
        let legacy = is_hosting_environment_with_legacy_name_available(&client, "ase1")
            .await
            .unwrap();
        assert_eq!(legacy, serde_json::json!(false));
    }

    #[tokio::test]
    async fn test_publishing_credentials_round_trip() {
        let server = MockServer::start().await;
        let credentials = serde_json::json!({
            "name": "web",
            "properties": {"publishingUserName": "deployer", "publishingPassword": "s3cret"}
        });
        Mock::given(method("GET"))
            .and(path(web_path("publishingCredentials")))
            .respond_with(ResponseTemplate::new(200).set_body_json(credentials.clone()))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(web_path("publishingCredentials")))
            .and(body_json(credentials.clone()))
            .respond_with(ResponseTemplate::new(200).set_body_json(credentials.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let user = get_subscription_publishing_credentials(&client).await.unwrap();
        let debug = format!("{user:?}");
        assert!(!debug.contains("s3cret"));

        let updated = update_subscription_publishing_credentials(&client, &user)
            .await
            .unwrap();
        assert_eq!(updated, user);
    }

    #[tokio::test]
    async fn test_list_premier_add_on_offers_rejects_404() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(web_path("premieraddonoffers")))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let err = list_premier_add_on_offers(&client).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }
}
