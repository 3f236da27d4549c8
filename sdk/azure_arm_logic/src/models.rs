//! Shared types for the Microsoft.Logic resource provider.

use serde::{Deserialize, Serialize};

/// API version query parameter for all Microsoft.Logic requests.
pub const API_VERSION: &str = "2015-02-01-preview";

/// Reference to a related resource, such as the run a trigger fired.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceReference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

/// Link to content stored outside the resource, such as run inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentLink {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_size: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}
