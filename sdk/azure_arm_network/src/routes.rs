//! Routes within a route table.
//!
//! ## Example
//!
//! ```rust,no_run
//! use azure_arm_core::client::ArmClient;
//! use azure_arm_network::routes::{self, Route, RoutePropertiesFormat};
//!
//! # async fn example(client: &ArmClient) -> azure_arm_core::error::ArmResult<()> {
//! let route = Route {
//!     properties: Some(RoutePropertiesFormat {
//!         address_prefix: Some("10.1.0.0/16".into()),
//!         next_hop_type: Some("VirtualAppliance".into()),
//!         next_hop_ip_address: Some("10.0.0.4".into()),
//!         ..Default::default()
//!     }),
//!     ..Default::default()
//! };
//! let saved = routes::create_or_update(client, "my-group", "my-table", "to-appliance", &route).await?;
//!
//! let mut page = routes::list(client, "my-group", "my-table").await?;
//! loop {
//!     for r in &page.value {
//!         println!("{:?}", r.name);
//!     }
//!     match routes::list_next(client, &page).await? {
//!         Some(next) => page = next,
//!         None => break,
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use azure_arm_core::client::ArmClient;
use azure_arm_core::error::ArmResult;
use azure_arm_core::pagination::{self, ListResult};
use azure_arm_core::request::{Operation, PreparedRequest};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::models::API_VERSION;

const ROUTE_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/routeTables/{routeTableName}/routes/{routeName}";
const ROUTES_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/routeTables/{routeTableName}/routes";

pub const CREATE_OR_UPDATE: Operation =
    Operation::new("network/routes/create_or_update", &[201, 200]);
pub const DELETE: Operation = Operation::new("network/routes/delete", &[204, 202, 200]);
pub const GET: Operation = Operation::new("network/routes/get", &[200]);
pub const LIST: Operation = Operation::new("network/routes/list", &[200]);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A route in a route table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<RoutePropertiesFormat>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePropertiesFormat {
    /// Destination CIDR to which the route applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_prefix: Option<String>,

    /// `VirtualNetworkGateway`, `VnetLocal`, `Internet`, `VirtualAppliance` or `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_hop_type: Option<String>,

    /// Only allowed when the next hop type is `VirtualAppliance`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_hop_ip_address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

pub fn create_or_update_request(
    client: &ArmClient,
    resource_group_name: &str,
    route_table_name: &str,
    route_name: &str,
    route: &Route,
) -> ArmResult<PreparedRequest> {
    client
        .request(&CREATE_OR_UPDATE, Method::PUT, ROUTE_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("routeTableName", route_table_name)
        .path_param("routeName", route_name)
        .api_version(API_VERSION)
        .json(route)
        .prepare()
}

/// Create or update a route in the specified route table.
///
/// # Tracing
///
/// Emits a span named `arm::network::routes::create_or_update`.
#[tracing::instrument(
    name = "arm::network::routes::create_or_update",
    skip(client, route),
    fields(resource_group = %resource_group_name, route_table = %route_table_name, route = %route_name)
)]
pub async fn create_or_update(
    client: &ArmClient,
    resource_group_name: &str,
    route_table_name: &str,
    route_name: &str,
    route: &Route,
) -> ArmResult<Route> {
    tracing::debug!("creating or updating route");

    let request =
        create_or_update_request(client, resource_group_name, route_table_name, route_name, route)?;
    let route = client.send(request).await?.json::<Route>().await?;

    tracing::debug!(route_id = ?route.id, "route saved");
    Ok(route)
}

pub fn delete_request(
    client: &ArmClient,
    resource_group_name: &str,
    route_table_name: &str,
    route_name: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&DELETE, Method::DELETE, ROUTE_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("routeTableName", route_table_name)
        .path_param("routeName", route_name)
        .api_version(API_VERSION)
        .prepare()
}

/// Delete a route from a route table. Returns the HTTP status; `202` means
/// the deletion continues asynchronously.
#[tracing::instrument(
    name = "arm::network::routes::delete",
    skip(client),
    fields(resource_group = %resource_group_name, route_table = %route_table_name, route = %route_name)
)]
pub async fn delete(
    client: &ArmClient,
    resource_group_name: &str,
    route_table_name: &str,
    route_name: &str,
) -> ArmResult<u16> {
    let request = delete_request(client, resource_group_name, route_table_name, route_name)?;
    client.send(request).await?.status().await
}

pub fn get_request(
    client: &ArmClient,
    resource_group_name: &str,
    route_table_name: &str,
    route_name: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&GET, Method::GET, ROUTE_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("routeTableName", route_table_name)
        .path_param("routeName", route_name)
        .api_version(API_VERSION)
        .prepare()
}

/// Get a route from a route table.
#[tracing::instrument(
    name = "arm::network::routes::get",
    skip(client),
    fields(resource_group = %resource_group_name, route_table = %route_table_name, route = %route_name)
)]
pub async fn get(
    client: &ArmClient,
    resource_group_name: &str,
    route_table_name: &str,
    route_name: &str,
) -> ArmResult<Route> {
    let request = get_request(client, resource_group_name, route_table_name, route_name)?;
    client.send(request).await?.json().await
}

pub fn list_request(
    client: &ArmClient,
    resource_group_name: &str,
    route_table_name: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&LIST, Method::GET, ROUTES_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("routeTableName", route_table_name)
        .api_version(API_VERSION)
        .prepare()
}

/// List the routes in a route table (first page).
#[tracing::instrument(
    name = "arm::network::routes::list",
    skip(client),
    fields(resource_group = %resource_group_name, route_table = %route_table_name)
)]
pub async fn list(
    client: &ArmClient,
    resource_group_name: &str,
    route_table_name: &str,
) -> ArmResult<ListResult<Route>> {
    let request = list_request(client, resource_group_name, route_table_name)?;
    client.send(request).await?.json().await
}

/// Fetch the page after `last`, or `None` if `last` was the final page.
pub async fn list_next(
    client: &ArmClient,
    last: &ListResult<Route>,
) -> ArmResult<Option<ListResult<Route>>> {
    pagination::next_page(client, &LIST, last).await
}
