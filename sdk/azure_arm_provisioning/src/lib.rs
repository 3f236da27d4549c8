//! # Azure Resource Manager: Provisioning
//!
//! Multi-step flows built on the per-service clients. Each flow runs its
//! requests one at a time and stops at the first failure; nothing already
//! created is rolled back.
//!
//! ## Simple virtual machine
//!
//! ```rust,no_run
//! use azure_arm_compute::virtual_machines::ImageReference;
//! use azure_arm_core::client::ArmClient;
//! use azure_arm_provisioning::simple_vm::{create_simple_vm, VmParameters};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ArmClient::builder().build()?;
//!
//! let params = VmParameters::builder()
//!     .image_reference(ImageReference::new("Canonical", "UbuntuServer", "14.04.2-LTS", "latest"))
//!     .user("azureuser")
//!     .password(std::env::var("VM_PASSWORD")?)
//!     .build()?;
//!
//! let vm = create_simple_vm(&client, Some("my-group"), Some("westus"), params).await?;
//! for failure in &vm.provider_registration_failures {
//!     eprintln!("could not register {}: {}", failure.namespace, failure.error);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod names;
pub mod simple_vm;

pub use error::{ProvisionError, Stage};

/// Test utilities shared across modules.
#[cfg(test)]
pub(crate) mod test_utils {
    pub use azure_arm_core::test_support::{setup_mock_client, EchoResource, TEST_SUBSCRIPTION_ID};
}
