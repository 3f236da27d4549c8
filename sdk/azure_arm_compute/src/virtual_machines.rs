//! Virtual machines.
//!
//! A [`VirtualMachine`] references resources that must already exist: the
//! network interfaces in its [`NetworkProfile`], the availability set, and
//! the storage account that holds its VHDs.

use std::collections::HashMap;
use std::fmt;

use azure_arm_core::client::ArmClient;
use azure_arm_core::error::ArmResult;
use azure_arm_core::models::SubResource;
use azure_arm_core::pagination::{self, ListResult};
use azure_arm_core::request::{Operation, PreparedRequest};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::API_VERSION;

const VIRTUAL_MACHINE_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Compute/virtualMachines/{vmName}";
const VIRTUAL_MACHINES_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Compute/virtualMachines";

/// The smallest general purpose size.
pub const STANDARD_A0: &str = "Standard_A0";

pub const CREATE_OR_UPDATE: Operation =
    Operation::new("compute/virtual_machines/create_or_update", &[200, 201]);
pub const DELETE: Operation =
    Operation::new("compute/virtual_machines/delete", &[200, 202, 204]);
pub const GET: Operation = Operation::new("compute/virtual_machines/get", &[200]);
pub const LIST: Operation = Operation::new("compute/virtual_machines/list", &[200]);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachine {
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
    pub properties: Option<VirtualMachineProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware_profile: Option<HardwareProfile>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_profile: Option<StorageProfile>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_profile: Option<OsProfile>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_profile: Option<NetworkProfile>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_set: Option<SubResource>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareProfile {
    /// e.g. [`STANDARD_A0`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_size: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<ImageReference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_disk: Option<OsDisk>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_disks: Option<Vec<DataDisk>>,
}

/// A marketplace image, e.g. `Canonical` / `UbuntuServer` / `14.04.2-LTS` / `latest`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageReference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ImageReference {
    pub fn new(
        publisher: impl Into<String>,
        offer: impl Into<String>,
        sku: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            publisher: Some(publisher.into()),
            offer: Some(offer.into()),
            sku: Some(sku.into()),
            version: Some(version.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiskCreateOption {
    FromImage,
    Empty,
    Attach,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CachingType {
    None,
    ReadOnly,
    ReadWrite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsDisk {
    pub name: String,

    pub vhd: VirtualHardDisk,

    pub create_option: DiskCreateOption,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub caching: Option<CachingType>,

    /// `Windows` or `Linux`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataDisk {
    pub lun: i32,

    pub name: String,

    pub vhd: VirtualHardDisk,

    pub create_option: DiskCreateOption,

    #[serde(rename = "diskSizeGB", skip_serializing_if = "Option::is_none")]
    pub disk_size_gb: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub caching: Option<CachingType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualHardDisk {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl VirtualHardDisk {
    /// VHD blob `<disk>.vhd` in the `vhds` container of a storage account.
    pub fn in_account(storage_account: &str, disk_name: &str) -> Self {
        Self {
            uri: Some(format!(
                "https://{storage_account}.blob.core.windows.net/vhds/{disk_name}.vhd"
            )),
        }
    }
}

/// Administrator account and host name.
///
/// The service never returns `admin_password`; `Debug` output redacts it.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computer_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,
}

impl fmt::Debug for OsProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OsProfile")
            .field("computer_name", &self.computer_name)
            .field("admin_username", &self.admin_username)
            .field(
                "admin_password",
                &self.admin_password.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_interfaces: Option<Vec<NetworkInterfaceReference>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterfaceReference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<NetworkInterfaceReferenceProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkInterfaceReferenceProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

pub fn create_or_update_request(
    client: &ArmClient,
    resource_group_name: &str,
    vm_name: &str,
    vm: &VirtualMachine,
) -> ArmResult<PreparedRequest> {
    client
        .request(&CREATE_OR_UPDATE, Method::PUT, VIRTUAL_MACHINE_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("vmName", vm_name)
        .api_version(API_VERSION)
        .json(vm)
        .prepare()
}

/// Create or update a virtual machine.
///
/// The service answers once the request is accepted; provisioning carries on
/// in the background (see `provisioning_state`).
#[tracing::instrument(
    name = "arm::compute::virtual_machines::create_or_update",
    skip(client, vm),
    fields(resource_group = %resource_group_name, vm = %vm_name)
)]
pub async fn create_or_update(
    client: &ArmClient,
    resource_group_name: &str,
    vm_name: &str,
    vm: &VirtualMachine,
) -> ArmResult<VirtualMachine> {
    tracing::debug!("creating or updating virtual machine");

    let request = create_or_update_request(client, resource_group_name, vm_name, vm)?;
    let vm = client.send(request).await?.json::<VirtualMachine>().await?;

    tracing::debug!(
        vm_id = ?vm.id,
        provisioning_state = ?vm.properties.as_ref().and_then(|p| p.provisioning_state.as_deref()),
        "virtual machine saved"
    );
    Ok(vm)
}

pub fn delete_request(
    client: &ArmClient,
    resource_group_name: &str,
    vm_name: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&DELETE, Method::DELETE, VIRTUAL_MACHINE_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("vmName", vm_name)
        .api_version(API_VERSION)
        .prepare()
}

#[tracing::instrument(
    name = "arm::compute::virtual_machines::delete",
    skip(client),
    fields(resource_group = %resource_group_name, vm = %vm_name)
)]
pub async fn delete(
    client: &ArmClient,
    resource_group_name: &str,
    vm_name: &str,
) -> ArmResult<u16> {
    let request = delete_request(client, resource_group_name, vm_name)?;
    client.send(request).await?.status().await
}

pub fn get_request(
    client: &ArmClient,
    resource_group_name: &str,
    vm_name: &str,
) -> ArmResult<PreparedRequest> {
    client
        .request(&GET, Method::GET, VIRTUAL_MACHINE_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .path_param("vmName", vm_name)
        .api_version(API_VERSION)
        .prepare()
}

#[tracing::instrument(
    name = "arm::compute::virtual_machines::get",
    skip(client),
    fields(resource_group = %resource_group_name, vm = %vm_name)
)]
pub async fn get(
    client: &ArmClient,
    resource_group_name: &str,
    vm_name: &str,
) -> ArmResult<VirtualMachine> {
    let request = get_request(client, resource_group_name, vm_name)?;
    client.send(request).await?.json().await
}

pub fn list_request(client: &ArmClient, resource_group_name: &str) -> ArmResult<PreparedRequest> {
    client
        .request(&LIST, Method::GET, VIRTUAL_MACHINES_PATH)
        .path_param("resourceGroupName", resource_group_name)
        .api_version(API_VERSION)
        .prepare()
}

#[tracing::instrument(
    name = "arm::compute::virtual_machines::list",
    skip(client),
    fields(resource_group = %resource_group_name)
)]
pub async fn list(
    client: &ArmClient,
    resource_group_name: &str,
) -> ArmResult<ListResult<VirtualMachine>> {
    let request = list_request(client, resource_group_name)?;
    client.send(request).await?.json().await
}

pub async fn list_next(
    client: &ArmClient,
    last: &ListResult<VirtualMachine>,
) -> ArmResult<Option<ListResult<VirtualMachine>>> {
    pagination::next_page(client, &LIST, last).await
}
