//! Provision a single virtual machine together with everything it needs.
//!
//! [`create_simple_vm`] runs the steps one after another and stops at the
//! first failure:
//!
//! 1. resource group (created, or looked up when it already exists);
//! 2. storage account for the VHDs;
//! 3. availability set;
//! 4. virtual network and subnet (`10.0.0.0/16`, `10.0.0.0/24`);
//! 5. dynamic public IP address and a network interface bound to the subnet;
//! 6. the virtual machine itself (`Standard_A0`, OS disk from the image and
//!    one empty 100 GB data disk).
//!
//! Nothing is deleted when a step fails; the error lists what was created.

use azure_arm_compute::availability_sets::{self, AvailabilitySet};
use azure_arm_compute::virtual_machines::{
    self, DataDisk, DiskCreateOption, HardwareProfile, ImageReference, NetworkInterfaceReference,
    NetworkProfile, OsDisk, OsProfile, StorageProfile, VirtualHardDisk, VirtualMachine,
    VirtualMachineProperties, STANDARD_A0,
};
use azure_arm_core::client::ArmClient;
use azure_arm_core::models::SubResource;
use azure_arm_core::ArmError;
use azure_arm_network::models::IpAllocationMethod;
use azure_arm_network::network_interfaces::{
    self, NetworkInterface, NetworkInterfaceIpConfiguration,
    NetworkInterfaceIpConfigurationPropertiesFormat, NetworkInterfacePropertiesFormat,
};
use azure_arm_network::public_ip_addresses::{
    self, PublicIpAddress, PublicIpAddressPropertiesFormat,
};
use azure_arm_network::subnets::{self, Subnet};
use azure_arm_network::virtual_networks::{
    self, AddressSpace, VirtualNetwork, VirtualNetworkPropertiesFormat,
};
use azure_arm_resources::providers;
use azure_arm_resources::resource_groups::{self, ResourceGroup};
use azure_arm_storage::storage_accounts::{
    self, AccountType, StorageAccount, StorageAccountCreateParameters,
};
use secrecy::{ExposeSecret, SecretString};

use crate::error::{ProvisionError, Stage};
use crate::names;

/// Resource providers registered after a new resource group is created.
pub const REQUIRED_PROVIDERS: [&str; 3] =
    ["Microsoft.Storage", "Microsoft.Network", "Microsoft.Compute"];

const VIRTUAL_NETWORK_PREFIX: &str = "10.0.0.0/16";
const SUBNET_PREFIX: &str = "10.0.0.0/24";
const DATA_DISK_SIZE_GB: i32 = 100;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// What to do when the storage account name is already taken.
///
/// Applies only to the `AlreadyExists` answer. Any other unavailability
/// (an invalid name, for one) fails the storage account stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageAccountPolicy {
    /// Fail with [`ProvisionError::StorageAccountNameTaken`].
    #[default]
    CreateOnly,
    /// Use the existing account. Only sensible for an account the caller owns.
    AllowReuse,
}

/// Inputs to [`create_simple_vm`]. Build with [`VmParameters::builder`].
#[derive(Debug, Clone)]
pub struct VmParameters {
    image_reference: ImageReference,
    user: String,
    password: SecretString,
    name: Option<String>,
    storage_account: Option<String>,
    availability_set: Option<String>,
    storage_account_policy: StorageAccountPolicy,
}

impl VmParameters {
    pub fn builder() -> VmParametersBuilder {
        VmParametersBuilder::default()
    }

    pub fn image_reference(&self) -> &ImageReference {
        &self.image_reference
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn storage_account(&self) -> Option<&str> {
        self.storage_account.as_deref()
    }

    pub fn availability_set(&self) -> Option<&str> {
        self.availability_set.as_deref()
    }

    pub fn storage_account_policy(&self) -> StorageAccountPolicy {
        self.storage_account_policy
    }
}

/// Builder for [`VmParameters`].
#[derive(Debug, Default)]
pub struct VmParametersBuilder {
    image_reference: Option<ImageReference>,
    user: Option<String>,
    password: Option<SecretString>,
    name: Option<String>,
    storage_account: Option<String>,
    availability_set: Option<String>,
    storage_account_policy: StorageAccountPolicy,
}

impl VmParametersBuilder {
    /// **Required.** The marketplace image to boot from.
    pub fn image_reference(mut self, image_reference: ImageReference) -> Self {
        self.image_reference = Some(image_reference);
        self
    }

    /// **Required.** Administrator user name.
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// **Required.** Administrator password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// VM and computer name. Generated (`vm<hex8>`) when not set.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Storage account for the VHDs. Generated when not set.
    pub fn storage_account(mut self, storage_account: impl Into<String>) -> Self {
        self.storage_account = Some(storage_account.into());
        self
    }

    /// Availability set name. Generated (`av-<hex8>`) when not set.
    pub fn availability_set(mut self, availability_set: impl Into<String>) -> Self {
        self.availability_set = Some(availability_set.into());
        self
    }

    pub fn storage_account_policy(mut self, policy: StorageAccountPolicy) -> Self {
        self.storage_account_policy = policy;
        self
    }

    /// Build the parameters. Fails when the image, user or password is
    /// missing or empty. Empty optional names count as not set.
    pub fn build(self) -> Result<VmParameters, ProvisionError> {
        let user = self
            .user
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ProvisionError::empty("userName"))?;
        let password = self
            .password
            .filter(|p| !p.expose_secret().is_empty())
            .ok_or_else(|| ProvisionError::empty("password"))?;
        let image_reference =
            self.image_reference
                .ok_or_else(|| ProvisionError::Validation {
                    parameter: "imageReference".into(),
                    message: "is required".into(),
                })?;

        Ok(VmParameters {
            image_reference,
            user,
            password,
            name: non_empty(self.name),
            storage_account: non_empty(self.storage_account),
            availability_set: non_empty(self.availability_set),
            storage_account_policy: self.storage_account_policy,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageAccountDecision {
    Created,
    /// The name was taken and [`StorageAccountPolicy::AllowReuse`] was set.
    Reused,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorageAccountOutcome {
    pub name: String,
    pub decision: StorageAccountDecision,
    /// The created account, when the service described it in its answer.
    pub account: Option<StorageAccount>,
}

/// A provider that could not be registered. The flow carries on regardless.
#[derive(Debug)]
pub struct ProviderRegistrationFailure {
    pub namespace: &'static str,
    pub error: ArmError,
}

/// Everything [`create_simple_vm`] created or used.
#[derive(Debug)]
pub struct SimpleVm {
    pub resource_group: ResourceGroup,
    pub storage_account: StorageAccountOutcome,
    pub availability_set: AvailabilitySet,
    pub virtual_network: VirtualNetwork,
    pub subnet: Subnet,
    pub public_ip_address: PublicIpAddress,
    pub network_interface: NetworkInterface,
    pub virtual_machine: VirtualMachine,
    pub provider_registration_failures: Vec<ProviderRegistrationFailure>,
}

// ---------------------------------------------------------------------------
// Flow
// ---------------------------------------------------------------------------

/// Tracks what the flow has created so far, for error reporting.
struct Progress {
    location: String,
    created: Vec<String>,
}

impl Progress {
    fn new(location: String) -> Self {
        Self {
            location,
            created: Vec::new(),
        }
    }

    fn record(&mut self, stage: Stage, name: &str, id: Option<&str>) {
        tracing::info!(resource = %stage, name, id = ?id, "created");
        if let Some(id) = id {
            self.created.push(id.to_string());
        }
    }

    fn create_failed(&self, stage: Stage, name: &str, source: ArmError) -> ProvisionError {
        self.failed(
            stage,
            format!(
                "Failed to create {stage} '{name}' in location '{}'",
                self.location
            ),
            source,
        )
    }

    fn failed(&self, stage: Stage, message: String, source: ArmError) -> ProvisionError {
        tracing::debug!(%stage, error = %source, "provisioning stage failed");
        ProvisionError::Stage {
            stage,
            message,
            created: self.created.clone(),
            source,
        }
    }
}

/// Create a virtual machine and its supporting resources.
///
/// `group`: an existing or new resource group. `None` creates `grp<hex8>`
/// and registers the [`REQUIRED_PROVIDERS`]; registration failures are
/// logged and returned in [`SimpleVm::provider_registration_failures`].
///
/// `location` is required whenever a resource group has to be created. When
/// the group already exists its own location is used instead.
///
/// # Example
///
/// ```rust,no_run
/// use azure_arm_compute::virtual_machines::ImageReference;
/// use azure_arm_core::client::ArmClient;
/// use azure_arm_provisioning::simple_vm::{self, VmParameters};
///
/// # async fn example(client: &ArmClient) -> Result<(), Box<dyn std::error::Error>> {
/// let params = VmParameters::builder()
///     .image_reference(ImageReference::new("Canonical", "UbuntuServer", "14.04.2-LTS", "latest"))
///     .user("azureuser")
///     .password("P@ssw0rd!")
///     .build()?;
///
/// let vm = simple_vm::create_simple_vm(client, None, Some("westus"), params).await?;
/// println!("{:?}", vm.virtual_machine.id);
/// # Ok(())
/// # }
/// ```
#[tracing::instrument(
    name = "arm::provisioning::create_simple_vm",
    skip_all,
    fields(resource_group = ?group, location = ?location)
)]
pub async fn create_simple_vm(
    client: &ArmClient,
    group: Option<&str>,
    location: Option<&str>,
    params: VmParameters,
) -> Result<SimpleVm, ProvisionError> {
    let location = location.filter(|l| !l.is_empty());
    if group.is_some_and(str::is_empty) {
        return Err(ProvisionError::empty("resourceGroupName"));
    }
    if group.is_none() && location.is_none() {
        return Err(ProvisionError::empty("location"));
    }

    let (group_name, resource_group, mut progress, provider_registration_failures) =
        match group {
            None => {
                let name = names::resource_group();
                let location = location.unwrap_or_default().to_string();
                let mut progress = Progress::new(location.clone());
                let group = create_resource_group(client, &name, &location, &mut progress).await?;
                let failures = register_providers(client).await;
                (name, group, progress, failures)
            }
            Some(name) => {
                let (group, progress) = existing_or_new_group(client, name, location).await?;
                (name.to_string(), group, progress, Vec::new())
            }
        };

    let storage_account =
        provide_storage_account(client, &group_name, &params, &mut progress).await?;

    let availability_set_name = params
        .availability_set
        .clone()
        .unwrap_or_else(names::availability_set);
    let availability_set = availability_sets::create_or_update(
        client,
        &group_name,
        &availability_set_name,
        &AvailabilitySet::new(progress.location.clone()),
    )
    .await
    .map_err(|e| progress.create_failed(Stage::AvailabilitySet, &availability_set_name, e))?;
    progress.record(
        Stage::AvailabilitySet,
        &availability_set_name,
        availability_set.id.as_deref(),
    );

    let (virtual_network, subnet) = create_network(client, &group_name, &mut progress).await?;
    let (public_ip_address, network_interface) =
        create_network_interface(client, &group_name, &subnet, &mut progress).await?;

    let vm_name = params.name.clone().unwrap_or_else(names::virtual_machine);
    let body = virtual_machine_body(
        &progress.location,
        &params,
        &vm_name,
        &storage_account.name,
        availability_set.id.as_deref(),
        network_interface.id.as_deref(),
    );
    let virtual_machine = virtual_machines::create_or_update(client, &group_name, &vm_name, &body)
        .await
        .map_err(|e| progress.create_failed(Stage::VirtualMachine, &vm_name, e))?;
    progress.record(
        Stage::VirtualMachine,
        &vm_name,
        virtual_machine.id.as_deref(),
    );

    Ok(SimpleVm {
        resource_group,
        storage_account,
        availability_set,
        virtual_network,
        subnet,
        public_ip_address,
        network_interface,
        virtual_machine,
        provider_registration_failures,
    })
}

async fn create_resource_group(
    client: &ArmClient,
    name: &str,
    location: &str,
    progress: &mut Progress,
) -> Result<ResourceGroup, ProvisionError> {
    let group = resource_groups::create_or_update(client, name, &ResourceGroup::new(location))
        .await
        .map_err(|e| progress.create_failed(Stage::ResourceGroup, name, e))?;
    progress.record(Stage::ResourceGroup, name, group.id.as_deref());
    Ok(group)
}

/// Register the providers the flow needs. Failures are collected, not fatal.
async fn register_providers(client: &ArmClient) -> Vec<ProviderRegistrationFailure> {
    let mut failures = Vec::new();
    for namespace in REQUIRED_PROVIDERS {
        match providers::register(client, namespace).await {
            Ok(provider) => {
                tracing::debug!(namespace, state = ?provider.registration_state, "provider registered");
            }
            Err(error) => {
                tracing::warn!(namespace, error = %error, "provider registration failed");
                failures.push(ProviderRegistrationFailure { namespace, error });
            }
        }
    }
    failures
}

/// Look up a named group; create it when it does not exist yet.
async fn existing_or_new_group(
    client: &ArmClient,
    name: &str,
    location: Option<&str>,
) -> Result<(ResourceGroup, Progress), ProvisionError> {
    let lookup_failed = |source: ArmError| {
        Progress::new(location.unwrap_or_default().to_string()).failed(
            Stage::ResourceGroup,
            format!("Failed to look up resource group '{name}'"),
            source,
        )
    };

    if resource_groups::check_existence(client, name)
        .await
        .map_err(lookup_failed)?
    {
        let group = resource_groups::get(client, name)
            .await
            .map_err(lookup_failed)?;
        let location = group
            .location
            .as_deref()
            .or(location)
            .ok_or_else(|| ProvisionError::empty("location"))?;
        tracing::debug!(resource_group = name, location, "using existing resource group");
        let progress = Progress::new(location.to_string());
        return Ok((group, progress));
    }

    let location = location.ok_or_else(|| ProvisionError::empty("location"))?;
    let mut progress = Progress::new(location.to_string());
    let group = create_resource_group(client, name, location, &mut progress).await?;
    Ok((group, progress))
}

/// Unavailability reason meaning the account exists and may be reused.
const NAME_ALREADY_EXISTS: &str = "AlreadyExists";

async fn provide_storage_account(
    client: &ArmClient,
    group_name: &str,
    params: &VmParameters,
    progress: &mut Progress,
) -> Result<StorageAccountOutcome, ProvisionError> {
    let name = params
        .storage_account
        .clone()
        .unwrap_or_else(|| names::storage_account(group_name));

    let availability = storage_accounts::check_name_availability(client, &name)
        .await
        .map_err(|e| {
            progress.failed(
                Stage::StorageAccount,
                format!("Failed to check availability of storage account '{name}'"),
                e,
            )
        })?;

    if availability.name_available != Some(true) {
        if availability.reason.as_deref() != Some(NAME_ALREADY_EXISTS) {
            let detail = availability
                .message
                .or(availability.reason)
                .unwrap_or_else(|| "name is not available".to_string());
            return Err(progress.create_failed(
                Stage::StorageAccount,
                &name,
                ArmError::Validation {
                    parameter: "storageAccountName".to_string(),
                    message: format!("is not usable: {detail}"),
                },
            ));
        }
        return match params.storage_account_policy {
            StorageAccountPolicy::AllowReuse => {
                tracing::info!(name = %name, reason = ?availability.reason, "reusing storage account");
                Ok(StorageAccountOutcome {
                    name,
                    decision: StorageAccountDecision::Reused,
                    account: None,
                })
            }
            StorageAccountPolicy::CreateOnly => Err(ProvisionError::StorageAccountNameTaken {
                name,
                reason: availability.reason,
                created: progress.created.clone(),
            }),
        };
    }

    let parameters =
        StorageAccountCreateParameters::new(progress.location.clone(), AccountType::StandardLrs);
    let account = storage_accounts::create(client, group_name, &name, &parameters)
        .await
        .map_err(|e| progress.create_failed(Stage::StorageAccount, &name, e))?;

    let id = account.as_ref().and_then(|a| a.id.clone()).unwrap_or_else(|| {
        format!(
            "/subscriptions/{}/resourceGroups/{group_name}/providers/Microsoft.Storage/storageAccounts/{name}",
            client.subscription_id()
        )
    });
    progress.record(Stage::StorageAccount, &name, Some(&id));

    Ok(StorageAccountOutcome {
        name,
        decision: StorageAccountDecision::Created,
        account,
    })
}

async fn create_network(
    client: &ArmClient,
    group_name: &str,
    progress: &mut Progress,
) -> Result<(VirtualNetwork, Subnet), ProvisionError> {
    let vnet_name = names::virtual_network(group_name);
    let subnet_name = names::subnet(group_name);
    let subnet = Subnet::new(subnet_name.clone(), SUBNET_PREFIX);

    let network = VirtualNetwork {
        location: Some(progress.location.clone()),
        properties: Some(VirtualNetworkPropertiesFormat {
            address_space: Some(AddressSpace {
                address_prefixes: Some(vec![VIRTUAL_NETWORK_PREFIX.to_string()]),
            }),
            subnets: Some(vec![subnet.clone()]),
            ..Default::default()
        }),
        ..Default::default()
    };
    let network = virtual_networks::create_or_update(client, group_name, &vnet_name, &network)
        .await
        .map_err(|e| progress.create_failed(Stage::VirtualNetwork, &vnet_name, e))?;
    progress.record(Stage::VirtualNetwork, &vnet_name, network.id.as_deref());

    let subnet = subnets::create_or_update(client, group_name, &vnet_name, &subnet_name, &subnet)
        .await
        .map_err(|e| progress.create_failed(Stage::Subnet, &subnet_name, e))?;
    // The subnet id is a child of the network's; only the network is recorded.
    tracing::info!(resource = %Stage::Subnet, name = %subnet_name, id = ?subnet.id, "created");

    Ok((network, subnet))
}

async fn create_network_interface(
    client: &ArmClient,
    group_name: &str,
    subnet: &Subnet,
    progress: &mut Progress,
) -> Result<(PublicIpAddress, NetworkInterface), ProvisionError> {
    let (ip_name, nic_name) = names::public_ip_and_nic();

    let address = PublicIpAddress {
        location: Some(progress.location.clone()),
        properties: Some(PublicIpAddressPropertiesFormat {
            public_ip_allocation_method: Some(IpAllocationMethod::Dynamic),
            ..Default::default()
        }),
        ..Default::default()
    };
    let address = public_ip_addresses::create_or_update(client, group_name, &ip_name, &address)
        .await
        .map_err(|e| progress.create_failed(Stage::PublicIpAddress, &ip_name, e))?;
    progress.record(Stage::PublicIpAddress, &ip_name, address.id.as_deref());

    let interface = NetworkInterface {
        location: Some(progress.location.clone()),
        properties: Some(NetworkInterfacePropertiesFormat {
            ip_configurations: Some(vec![NetworkInterfaceIpConfiguration {
                name: Some(format!("{nic_name}Config")),
                properties: Some(NetworkInterfaceIpConfigurationPropertiesFormat {
                    private_ip_allocation_method: Some(IpAllocationMethod::Dynamic),
                    subnet: Some(SubResource {
                        id: subnet.id.clone(),
                    }),
                    public_ip_address: Some(SubResource {
                        id: address.id.clone(),
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    };
    let interface = network_interfaces::create_or_update(client, group_name, &nic_name, &interface)
        .await
        .map_err(|e| progress.create_failed(Stage::NetworkInterface, &nic_name, e))?;
    progress.record(Stage::NetworkInterface, &nic_name, interface.id.as_deref());

    Ok((address, interface))
}

/// The request body for the VM: `Standard_A0`, OS disk from the image and one
/// empty data disk at LUN 0, both as VHDs in `storage_account`.
fn virtual_machine_body(
    location: &str,
    params: &VmParameters,
    vm_name: &str,
    storage_account: &str,
    availability_set_id: Option<&str>,
    network_interface_id: Option<&str>,
) -> VirtualMachine {
    let os_disk_name = names::os_disk();
    let data_disk_name = names::data_disk();

    VirtualMachine {
        location: Some(location.to_string()),
        properties: Some(VirtualMachineProperties {
            hardware_profile: Some(HardwareProfile {
                vm_size: Some(STANDARD_A0.to_string()),
            }),
            storage_profile: Some(StorageProfile {
                image_reference: Some(params.image_reference.clone()),
                os_disk: Some(OsDisk {
                    vhd: VirtualHardDisk::in_account(storage_account, &os_disk_name),
                    name: os_disk_name,
                    create_option: DiskCreateOption::FromImage,
                    caching: None,
                    os_type: None,
                }),
                data_disks: Some(vec![DataDisk {
                    lun: 0,
                    vhd: VirtualHardDisk::in_account(storage_account, &data_disk_name),
                    name: data_disk_name,
                    create_option: DiskCreateOption::Empty,
                    disk_size_gb: Some(DATA_DISK_SIZE_GB),
                    caching: None,
                }]),
            }),
            os_profile: Some(OsProfile {
                computer_name: Some(vm_name.to_string()),
                admin_username: Some(params.user.clone()),
                admin_password: Some(params.password.expose_secret().to_string()),
            }),
            network_profile: Some(NetworkProfile {
                network_interfaces: Some(vec![NetworkInterfaceReference {
                    id: network_interface_id.map(str::to_string),
                    properties: None,
                }]),
            }),
            availability_set: Some(SubResource {
                id: availability_set_id.map(str::to_string),
            }),
            provisioning_state: None,
        }),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{setup_mock_client, EchoResource, TEST_SUBSCRIPTION_ID};
    use wiremock::matchers::{body_partial_json, method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_params() -> VmParametersBuilder {
        VmParameters::builder()
            .image_reference(ImageReference::new(
                "Canonical",
                "UbuntuServer",
                "14.04.2-LTS",
                "latest",
            ))
            .user("azureuser")
            .password("P@ssw0rd!")
    }

    fn group_regex() -> String {
        format!("^/subscriptions/{TEST_SUBSCRIPTION_ID}/resourcegroups/[^/]+$")
    }

    fn register_path(namespace: &str) -> String {
        format!("/subscriptions/{TEST_SUBSCRIPTION_ID}/providers/{namespace}/register")
    }

    /// Every PUT echoes its body; registrations and name checks succeed.
    async fn mount_happy_path(server: &MockServer) {
        Mock::given(method("PUT"))
            .and(path_regex(group_regex()))
            .respond_with(EchoResource::new(201))
            .mount(server)
            .await;
        for namespace in REQUIRED_PROVIDERS {
            Mock::given(method("POST"))
                .and(path(register_path(namespace)))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "namespace": namespace,
                    "registrationState": "Registered"
                })))
                .mount(server)
                .await;
        }
        Mock::given(method("POST"))
            .and(path(format!(
                "/subscriptions/{TEST_SUBSCRIPTION_ID}/providers/Microsoft.Storage/checkNameAvailability"
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "nameAvailable": true
            })))
            .mount(server)
            .await;
        for (provider_path, status) in [
            ("Microsoft.Storage/storageAccounts/[^/]+", 200u16),
            ("Microsoft.Compute/availabilitySets/[^/]+", 200),
            ("Microsoft.Network/virtualNetworks/[^/]+", 201),
            ("Microsoft.Network/virtualNetworks/[^/]+/subnets/[^/]+", 201),
            ("Microsoft.Network/publicIPAddresses/[^/]+", 201),
            ("Microsoft.Network/networkInterfaces/[^/]+", 201),
            ("Microsoft.Compute/virtualMachines/[^/]+", 201),
        ] {
            Mock::given(method("PUT"))
                .and(path_regex(format!("/providers/{provider_path}$")))
                .respond_with(EchoResource::new(status))
                .mount(server)
                .await;
        }
    }

    /// Mock that must not be hit, with higher priority than the happy path.
    async fn forbid_put(server: &MockServer, provider_path: &str) {
        Mock::given(method("PUT"))
            .and(path_regex(format!("/providers/{provider_path}$")))
            .respond_with(ResponseTemplate::new(500))
            .with_priority(1)
            .expect(0)
            .mount(server)
            .await;
    }

    #[test]
    fn builder_rejects_missing_credentials() {
        let err = VmParameters::builder()
            .image_reference(ImageReference::default())
            .password("secret")
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "The value passed for 'userName' cannot be empty");

        let err = sample_params().password("").build().unwrap_err();
        assert!(matches!(
            err,
            ProvisionError::Validation { ref parameter, .. } if parameter == "password"
        ));
    }

    #[test]
    fn builder_treats_empty_names_as_unset() {
        let params = sample_params().name("").availability_set("").build().unwrap();
        assert_eq!(params.name(), None);
        assert_eq!(params.availability_set(), None);
        assert_eq!(params.storage_account_policy(), StorageAccountPolicy::CreateOnly);
        assert!(!format!("{params:?}").contains("P@ssw0rd!"));
    }

    #[test]
    fn virtual_machine_body_shape_and_round_trip() {
        let params = sample_params().build().unwrap();
        let body = virtual_machine_body("westus", &params, "vm1", "acct1", Some("/av/1"), Some("/nic/1"));

        let json = serde_json::to_value(&body).unwrap();
        let props = &json["properties"];
        assert_eq!(json["location"], "westus");
        assert_eq!(props["hardwareProfile"]["vmSize"], "Standard_A0");
        assert_eq!(props["osProfile"]["computerName"], "vm1");
        assert_eq!(props["osProfile"]["adminPassword"], "P@ssw0rd!");
        assert_eq!(props["storageProfile"]["imageReference"]["offer"], "UbuntuServer");
        assert_eq!(props["storageProfile"]["osDisk"]["createOption"], "fromImage");
        let os_uri = props["storageProfile"]["osDisk"]["vhd"]["uri"].as_str().unwrap();
        assert!(os_uri.starts_with("https://acct1.blob.core.windows.net/vhds/osdisk"));
        let data_disk = &props["storageProfile"]["dataDisks"][0];
        assert_eq!(data_disk["lun"], 0);
        assert_eq!(data_disk["diskSizeGB"], 100);
        assert_eq!(props["networkProfile"]["networkInterfaces"][0]["id"], "/nic/1");
        assert_eq!(props["availabilitySet"]["id"], "/av/1");

        let back: VirtualMachine = serde_json::from_value(json).unwrap();
        assert_eq!(back, body);
    }

    #[tokio::test]
    async fn test_create_simple_vm_with_generated_group() {
        let server = MockServer::start().await;
        mount_happy_path(&server).await;

        let client = setup_mock_client(&server).await;
        let vm = create_simple_vm(&client, None, Some("westus"), sample_params().build().unwrap())
            .await
            .unwrap();

        let group = vm.resource_group.name.as_deref().unwrap();
        assert!(group.starts_with("grp"));
        assert_eq!(vm.resource_group.location.as_deref(), Some("westus"));
        assert!(vm.provider_registration_failures.is_empty());

        assert_eq!(vm.storage_account.decision, StorageAccountDecision::Created);
        assert!(vm.storage_account.name.starts_with(&format!("{group}accnt")));
        assert!(vm.availability_set.name.as_deref().unwrap().starts_with("av-"));
        assert_eq!(vm.virtual_network.name, Some(format!("{group}vnet")));
        assert_eq!(vm.subnet.name, Some(format!("{group}subnet")));

        let nic = vm.network_interface.properties.as_ref().unwrap();
        let ip_config = &nic.ip_configurations.as_ref().unwrap()[0];
        let nic_name = vm.network_interface.name.as_deref().unwrap();
        assert_eq!(ip_config.name, Some(format!("{nic_name}Config")));
        let ip_props = ip_config.properties.as_ref().unwrap();
        assert_eq!(ip_props.subnet.as_ref().unwrap().id, vm.subnet.id);
        assert_eq!(
            ip_props.public_ip_address.as_ref().unwrap().id,
            vm.public_ip_address.id
        );

        let vm_name = vm.virtual_machine.name.as_deref().unwrap();
        let suffix = vm_name.strip_prefix("vm").unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        assert_eq!(vm.virtual_machine.location.as_deref(), Some("westus"));

        let vm_props = vm.virtual_machine.properties.as_ref().unwrap();
        let nics = vm_props.network_profile.as_ref().unwrap().network_interfaces.as_ref().unwrap();
        assert_eq!(nics.len(), 1);
        assert_eq!(nics[0].id, vm.network_interface.id);
        assert_eq!(
            vm_props.availability_set.as_ref().unwrap().id,
            vm.availability_set.id
        );
    }

    #[tokio::test]
    async fn test_generated_names_differ_between_runs() {
        let server = MockServer::start().await;
        mount_happy_path(&server).await;
        let client = setup_mock_client(&server).await;

        let first = create_simple_vm(&client, None, Some("westus"), sample_params().build().unwrap())
            .await
            .unwrap();
        let second = create_simple_vm(&client, None, Some("westus"), sample_params().build().unwrap())
            .await
            .unwrap();

        assert_ne!(first.resource_group.name, second.resource_group.name);
        assert_ne!(first.storage_account.name, second.storage_account.name);
        assert_ne!(first.virtual_machine.name, second.virtual_machine.name);
    }

    #[tokio::test]
    async fn test_existing_group_uses_its_location() {
        let server = MockServer::start().await;
        let group_path = format!("/subscriptions/{TEST_SUBSCRIPTION_ID}/resourcegroups/existing");
        Mock::given(method("HEAD"))
            .and(path(group_path.clone()))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(group_path.clone()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": group_path,
                "name": "existing",
                "location": "eastus"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(group_path.clone()))
            .respond_with(ResponseTemplate::new(500))
            .with_priority(1)
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path_regex("/register$"))
            .respond_with(ResponseTemplate::new(500))
            .with_priority(1)
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path_regex("/providers/Microsoft.Storage/storageAccounts/[^/]+$"))
            .and(body_partial_json(serde_json::json!({"location": "eastus"})))
            .respond_with(EchoResource::default())
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;
        mount_happy_path(&server).await;

        let client = setup_mock_client(&server).await;
        let params = sample_params().name("vm1").storage_account("acct1").build().unwrap();
        let vm = create_simple_vm(&client, Some("existing"), Some("westus"), params)
            .await
            .unwrap();

        assert_eq!(vm.resource_group.location.as_deref(), Some("eastus"));
        assert_eq!(vm.storage_account.name, "acct1");
        assert_eq!(vm.virtual_machine.name.as_deref(), Some("vm1"));
        assert_eq!(vm.virtual_machine.location.as_deref(), Some("eastus"));
        assert_eq!(vm.virtual_network.name.as_deref(), Some("existingvnet"));
    }

    #[tokio::test]
    async fn test_named_group_is_created_when_absent() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path(format!(
                "/subscriptions/{TEST_SUBSCRIPTION_ID}/resourcegroups/fresh"
            )))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path_regex("/register$"))
            .respond_with(ResponseTemplate::new(500))
            .with_priority(1)
            .expect(0)
            .mount(&server)
            .await;
        mount_happy_path(&server).await;

        let client = setup_mock_client(&server).await;
        let vm = create_simple_vm(&client, Some("fresh"), Some("westus"), sample_params().build().unwrap())
            .await
            .unwrap();
        assert_eq!(vm.resource_group.name.as_deref(), Some("fresh"));
        assert_eq!(vm.resource_group.location.as_deref(), Some("westus"));
    }

    #[tokio::test]
    async fn test_storage_forbidden_aborts_before_network() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path_regex("/providers/Microsoft.Storage/storageAccounts/[^/]+$"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "error": {"code": "AuthorizationFailed", "message": "not allowed"}
            })))
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;
        for provider_path in [
            "Microsoft.Compute/availabilitySets/[^/]+",
            "Microsoft.Network/virtualNetworks/[^/]+",
            "Microsoft.Network/virtualNetworks/[^/]+/subnets/[^/]+",
            "Microsoft.Network/publicIPAddresses/[^/]+",
            "Microsoft.Network/networkInterfaces/[^/]+",
            "Microsoft.Compute/virtualMachines/[^/]+",
        ] {
            forbid_put(&server, provider_path).await;
        }
        mount_happy_path(&server).await;

        let client = setup_mock_client(&server).await;
        let err = create_simple_vm(&client, None, Some("westus"), sample_params().build().unwrap())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("storage account"), "{err}");
        assert!(err.to_string().contains("in location 'westus'"));
        assert_eq!(err.stage(), Some(Stage::StorageAccount));
        assert_eq!(err.created().len(), 1);
        assert!(err.created()[0].contains("/resourcegroups/grp"));
        match err {
            ProvisionError::Stage { source, .. } => assert_eq!(source.status(), Some(403)),
            other => panic!("Expected Stage error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_location_fails_before_any_request() {
        let server = MockServer::start().await;
        let client = setup_mock_client(&server).await;

        let err = create_simple_vm(&client, None, None, sample_params().build().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProvisionError::Validation { ref parameter, .. } if parameter == "location"
        ));

        let err = create_simple_vm(&client, Some(""), Some("westus"), sample_params().build().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ProvisionError::Validation { .. }));

        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_provider_registration_failures_are_collected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(register_path("Microsoft.Network")))
            .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
                "error": {"code": "Conflict", "message": "registration in progress"}
            })))
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;
        mount_happy_path(&server).await;

        let client = setup_mock_client(&server).await;
        let vm = create_simple_vm(&client, None, Some("westus"), sample_params().build().unwrap())
            .await
            .unwrap();

        assert_eq!(vm.provider_registration_failures.len(), 1);
        let failure = &vm.provider_registration_failures[0];
        assert_eq!(failure.namespace, "Microsoft.Network");
        assert_eq!(failure.error.status(), Some(409));
        assert!(vm.virtual_machine.id.is_some());
        assert!(logs_contain("provider registration failed"));
    }

    #[tokio::test]
    async fn test_taken_storage_name_fails_without_reuse() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex("/Microsoft.Storage/checkNameAvailability$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "nameAvailable": false,
                "reason": "AlreadyExists"
            })))
            .with_priority(1)
            .mount(&server)
            .await;
        forbid_put(&server, "Microsoft.Storage/storageAccounts/[^/]+").await;
        forbid_put(&server, "Microsoft.Compute/availabilitySets/[^/]+").await;
        mount_happy_path(&server).await;

        let client = setup_mock_client(&server).await;
        let params = sample_params().storage_account("taken").build().unwrap();
        let err = create_simple_vm(&client, None, Some("westus"), params)
            .await
            .unwrap_err();

        match &err {
            ProvisionError::StorageAccountNameTaken { name, reason, created } => {
                assert_eq!(name, "taken");
                assert_eq!(reason.as_deref(), Some("AlreadyExists"));
                assert_eq!(created.len(), 1);
            }
            other => panic!("Expected StorageAccountNameTaken, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_taken_storage_name_reused_when_allowed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex("/Microsoft.Storage/checkNameAvailability$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "nameAvailable": false,
                "reason": "AlreadyExists"
            })))
            .with_priority(1)
            .mount(&server)
            .await;
        forbid_put(&server, "Microsoft.Storage/storageAccounts/[^/]+").await;
        mount_happy_path(&server).await;

        let client = setup_mock_client(&server).await;
        let params = sample_params()
            .storage_account("mine")
            .storage_account_policy(StorageAccountPolicy::AllowReuse)
            .build()
            .unwrap();
        let vm = create_simple_vm(&client, None, Some("westus"), params)
            .await
            .unwrap();

        assert_eq!(vm.storage_account.decision, StorageAccountDecision::Reused);
        assert_eq!(vm.storage_account.name, "mine");
        assert!(vm.storage_account.account.is_none());
        let os_disk = vm
            .virtual_machine
            .properties
            .unwrap()
            .storage_profile
            .unwrap()
            .os_disk
            .unwrap();
        assert!(os_disk
            .vhd
            .uri
            .unwrap()
            .starts_with("https://mine.blob.core.windows.net/vhds/"));
    }

    #[tokio::test]
    async fn test_invalid_storage_name_is_not_reused() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex("/Microsoft.Storage/checkNameAvailability$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "nameAvailable": false,
                "reason": "AccountNameInvalid",
                "message": "Not-Valid_Name is not a valid storage account name."
            })))
            .with_priority(1)
            .mount(&server)
            .await;
        forbid_put(&server, "Microsoft.Storage/storageAccounts/[^/]+").await;
        forbid_put(&server, "Microsoft.Compute/availabilitySets/[^/]+").await;
        forbid_put(&server, "Microsoft.Compute/virtualMachines/[^/]+").await;
        mount_happy_path(&server).await;

        let client = setup_mock_client(&server).await;
        let params = sample_params()
            .storage_account("Not-Valid_Name")
            .storage_account_policy(StorageAccountPolicy::AllowReuse)
            .build()
            .unwrap();
        let err = create_simple_vm(&client, None, Some("westus"), params)
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Some(Stage::StorageAccount));
        assert_eq!(err.created().len(), 1);
        let text = err.to_string();
        assert!(text.contains("storage account 'Not-Valid_Name'"), "{text}");
        assert!(text.contains("not a valid storage account name"), "{text}");
    }

    #[tokio::test]
    async fn test_virtual_machine_failure_reports_created_resources() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path_regex("/providers/Microsoft.Compute/virtualMachines/[^/]+$"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"code": "InvalidParameter", "message": "bad image"}
            })))
            .with_priority(1)
            .mount(&server)
            .await;
        mount_happy_path(&server).await;

        let client = setup_mock_client(&server).await;
        let params = sample_params().name("vm1").build().unwrap();
        let err = create_simple_vm(&client, None, Some("westus"), params)
            .await
            .unwrap_err();

        assert!(err
            .to_string()
            .starts_with("Failed to create virtual machine 'vm1' in location 'westus'"));
        // group, storage account, availability set, network, public ip, nic
        assert_eq!(err.created().len(), 6);
    }
}
