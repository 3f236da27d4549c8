//! # Azure Resource Manager: Scheduler
//!
//! Jobs in `Microsoft.Scheduler` job collections.
//!
//! ```rust,no_run
//! use azure_arm_core::client::ArmClient;
//! use azure_arm_scheduler::jobs;
//!
//! # async fn example(client: &ArmClient) -> azure_arm_core::ArmResult<()> {
//! jobs::run(client, "my-group", "my-collection", "nightly").await?;
//! let history = jobs::list_job_history(client, "my-group", "my-collection", "nightly", Some(10), None).await?;
//! for entry in &history.value {
//!     println!("{:?}", entry.properties.as_ref().and_then(|p| p.status.as_deref()));
//! }
//! # Ok(())
//! # }
//! ```

pub mod jobs;

/// API version query parameter for all Microsoft.Scheduler requests.
pub const API_VERSION: &str = "2016-01-01";

/// Test utilities shared across modules.
#[cfg(test)]
pub(crate) mod test_utils {
    pub use azure_arm_core::test_support::{resource_group_path, setup_mock_client, EchoResource};
}
