//! # Azure Resource Manager Core
//!
//! Shared plumbing for the Azure Resource Manager Rust SDK: client
//! configuration, authentication, and the prepare → send → respond cycle
//! every service crate builds its operations on.
//!
//! ```rust,no_run
//! use azure_arm_core::auth::ArmCredential;
//! use azure_arm_core::client::ArmClient;
//! use azure_arm_core::request::Operation;
//! use reqwest::Method;
//!
//! const GET_GROUP: Operation = Operation::new("resources/resource_groups/get", &[200]);
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ArmClient::builder()
//!     .subscription_id("00000000-0000-0000-0000-000000000000")
//!     .credential(ArmCredential::from_env()?)
//!     .build()?;
//!
//! let request = client
//!     .request(&GET_GROUP, Method::GET, "/subscriptions/{subscriptionId}/resourcegroups/{resourceGroupName}")
//!     .path_param("resourceGroupName", "my-group")
//!     .api_version("2015-11-01")
//!     .prepare()?;
//! let group: serde_json::Value = client.send(request).await?.json().await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod pagination;
pub mod request;
pub mod response;

#[cfg(feature = "test-support")]
pub mod test_support;

pub use error::{ArmError, ArmResult};
