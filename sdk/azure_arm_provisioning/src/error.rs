use std::fmt;

use azure_arm_core::ArmError;
use thiserror::Error;

/// The step of a provisioning flow that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ResourceGroup,
    StorageAccount,
    AvailabilitySet,
    VirtualNetwork,
    Subnet,
    PublicIpAddress,
    NetworkInterface,
    VirtualMachine,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let thing = match self {
            Self::ResourceGroup => "resource group",
            Self::StorageAccount => "storage account",
            Self::AvailabilitySet => "availability set",
            Self::VirtualNetwork => "virtual network",
            Self::Subnet => "subnet",
            Self::PublicIpAddress => "public ip address",
            Self::NetworkInterface => "network interface",
            Self::VirtualMachine => "virtual machine",
        };
        f.write_str(thing)
    }
}

/// Errors returned by provisioning flows.
///
/// Nothing is rolled back on failure. [`Stage`](Self::Stage) and
/// [`StorageAccountNameTaken`](Self::StorageAccountNameTaken) carry the ids
/// of the resources created before the flow stopped, so the caller can clean
/// them up (deleting the resource group removes all of them).
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// An argument was rejected before any request was made.
    #[error("The value passed for '{parameter}' {message}")]
    Validation { parameter: String, message: String },

    /// A request for one stage of the flow failed.
    #[error("{message}: {source}")]
    Stage {
        stage: Stage,
        /// `Failed to create <thing> '<name>' in location '<location>'`
        message: String,
        created: Vec<String>,
        #[source]
        source: ArmError,
    },

    /// The storage account name is in use and reuse was not allowed.
    #[error("storage account name '{name}' is not available{}", reason_suffix(.reason))]
    StorageAccountNameTaken {
        name: String,
        reason: Option<String>,
        created: Vec<String>,
    },
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|r| format!(" ({r})"))
        .unwrap_or_default()
}

impl ProvisionError {
    pub(crate) fn empty(parameter: &str) -> Self {
        Self::Validation {
            parameter: parameter.to_string(),
            message: "cannot be empty".to_string(),
        }
    }

    /// Ids of the resources that exist because of the failed flow.
    pub fn created(&self) -> &[String] {
        match self {
            Self::Validation { .. } => &[],
            Self::Stage { created, .. } | Self::StorageAccountNameTaken { created, .. } => created,
        }
    }

    /// The stage that failed, if a request was made.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Validation { .. } => None,
            Self::Stage { stage, .. } => Some(*stage),
            Self::StorageAccountNameTaken { .. } => Some(Stage::StorageAccount),
        }
    }
}
