//! # Azure Resource Manager: Compute
//!
//! Availability sets and virtual machines on the `Microsoft.Compute`
//! resource provider.
//!
//! ```rust,no_run
//! use azure_arm_core::client::ArmClient;
//! use azure_arm_compute::virtual_machines;
//!
//! # async fn example(client: &ArmClient) -> azure_arm_core::ArmResult<()> {
//! let page = virtual_machines::list(client, "my-group").await?;
//! for vm in &page.value {
//!     println!("{:?}", vm.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod availability_sets;
pub mod virtual_machines;

/// API version query parameter for all Microsoft.Compute requests.
pub const API_VERSION: &str = "2015-06-15";
