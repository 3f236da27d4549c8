//! # Azure Resource Manager: Storage
//!
//! `Microsoft.Storage` storage accounts.
//!
//! ```rust,no_run
//! use azure_arm_core::client::ArmClient;
//! use azure_arm_storage::storage_accounts::{self, AccountType, StorageAccountCreateParameters};
//!
//! # async fn example(client: &ArmClient) -> azure_arm_core::ArmResult<()> {
//! let availability = storage_accounts::check_name_availability(client, "mystorageacct").await?;
//! if availability.name_available == Some(true) {
//!     let parameters = StorageAccountCreateParameters::new("westus", AccountType::StandardLrs);
//!     storage_accounts::create(client, "my-group", "mystorageacct", &parameters).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod storage_accounts;

/// API version query parameter for all Microsoft.Storage requests.
pub const API_VERSION: &str = "2015-06-15";
