//! # Azure Resource Manager: Logic
//!
//! Access keys and trigger histories of `Microsoft.Logic` workflows.

pub mod models;
pub mod workflow_access_keys;
pub mod workflow_trigger_histories;
