//! # Azure Resource Manager: Authorization
//!
//! Role-based access control assignments (`Microsoft.Authorization`).
//!
//! ```rust,no_run
//! use azure_arm_core::client::ArmClient;
//! use azure_arm_authorization::role_assignments;
//!
//! # async fn example(client: &ArmClient) -> azure_arm_core::ArmResult<()> {
//! let scope = format!("subscriptions/{}/resourceGroups/my-group", client.subscription_id());
//! let page = role_assignments::list_for_scope(client, &scope, Some("atScope()")).await?;
//! for assignment in &page.value {
//!     println!("{:?}", assignment.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod role_assignments;

/// API version query parameter for all Microsoft.Authorization requests.
pub const API_VERSION: &str = "2015-07-01";
