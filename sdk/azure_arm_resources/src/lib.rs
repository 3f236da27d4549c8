//! # Azure Resource Manager: Resources
//!
//! Subscription-level management: resource groups, resource provider
//! registration, deployment operations and the operation catalogue each
//! provider publishes.
//!
//! ```rust,no_run
//! use azure_arm_core::client::ArmClient;
//! use azure_arm_resources::resource_groups::{self, ResourceGroup};
//!
//! # async fn example(client: &ArmClient) -> azure_arm_core::ArmResult<()> {
//! if !resource_groups::check_existence(client, "my-group").await? {
//!     let group = ResourceGroup::new("westus");
//!     resource_groups::create_or_update(client, "my-group", &group).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod deployment_operations;
pub mod models;
pub mod provider_operation_details;
pub mod providers;
pub mod resource_groups;

/// Test utilities shared across modules.
#[cfg(test)]
pub(crate) mod test_utils {
    pub use azure_arm_core::test_support::{setup_mock_client, EchoResource, TEST_SUBSCRIPTION_ID};
}
