//! Shared types for the Microsoft.Resources provider.

/// API version query parameter for all Microsoft.Resources requests.
pub const API_VERSION: &str = "2015-11-01";
