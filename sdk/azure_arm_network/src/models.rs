//! Shared types for the Microsoft.Network resource provider.

use serde::{Deserialize, Serialize};

/// API version query parameter for all Microsoft.Network requests.
pub const API_VERSION: &str = "2015-06-15";

/// How an IP address is assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IpAllocationMethod {
    Static,
    Dynamic,
}
