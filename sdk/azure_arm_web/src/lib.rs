//! # Azure Resource Manager: Web
//!
//! Subscription-wide `Microsoft.Web` (App Service) queries: sites, server
//! farms, hosting environments, publishing credentials and name checks.

pub mod global;

/// API version query parameter for all Microsoft.Web requests.
pub const API_VERSION: &str = "2015-08-01";

/// Test utilities shared across modules.
#[cfg(test)]
pub(crate) mod test_utils {
    pub use azure_arm_core::test_support::{setup_mock_client, TEST_SUBSCRIPTION_ID};
}
