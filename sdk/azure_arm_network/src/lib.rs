//! # Azure Resource Manager: Network
//!
//! Operations on the `Microsoft.Network` resource provider: virtual networks
//! and their subnets, public IP addresses, network interfaces and routes.
//!
//! ```rust,no_run
//! use azure_arm_core::client::ArmClient;
//! use azure_arm_network::virtual_networks;
//!
//! # async fn example(client: &ArmClient) -> azure_arm_core::ArmResult<()> {
//! let vnet = virtual_networks::get(client, "my-group", "my-vnet").await?;
//! println!("{:?}", vnet.id);
//! # Ok(())
//! # }
//! ```

pub mod models;
pub mod network_interfaces;
pub mod public_ip_addresses;
pub mod routes;
pub mod subnets;
pub mod virtual_networks;

/// Test utilities shared across modules.
#[cfg(test)]
pub(crate) mod test_utils {
    pub use azure_arm_core::test_support::{resource_group_path, setup_mock_client, EchoResource};
}
