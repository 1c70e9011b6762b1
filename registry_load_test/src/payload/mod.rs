//! Synthetic shell descriptor payloads.
//!
//! A payload is built in two parts: [`DescriptorIds`] mints every identifier
//! the descriptor carries, and the version-specific templates in [`legacy`]
//! and [`v3`] fill in the fixed descriptive fields around them.

pub mod legacy;
pub mod v3;

use serde::Serialize;
use uuid::Uuid;

/// Every identifier carried by one generated shell descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorIds {
    pub shell_id: String,
    pub global_asset_id: String,
    pub specific_asset_ids: [String; 2],
    pub submodel_ids: [String; 2],
}

impl DescriptorIds {
    /// Fresh UUIDv4 values for every identifier
    pub fn random() -> Self {
        Self {
            shell_id: new_id(),
            global_asset_id: new_id(),
            specific_asset_ids: [new_id(), new_id()],
            submodel_ids: [new_id(), new_id()],
        }
    }

    /// Fresh identifiers except for the shell id, which is taken as given
    pub fn with_shell_id(shell_id: impl Into<String>) -> Self {
        Self {
            shell_id: shell_id.into(),
            ..Self::random()
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.shell_id.as_str())
            .chain(std::iter::once(self.global_asset_id.as_str()))
            .chain(self.specific_asset_ids.iter().map(String::as_str))
            .chain(self.submodel_ids.iter().map(String::as_str))
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A generated shell descriptor in the shape one API version expects
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ShellPayload {
    Legacy(legacy::ShellDescriptor),
    V3(v3::ShellDescriptor),
}

impl ShellPayload {
    pub fn id(&self) -> &str {
        match self {
            ShellPayload::Legacy(shell) => &shell.identification,
            ShellPayload::V3(shell) => &shell.id,
        }
    }

    /// Request body for the create call
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// The specific asset id list, serialized for the lookup query
    pub fn specific_asset_ids_json(&self) -> serde_json::Result<String> {
        match self {
            ShellPayload::Legacy(shell) => serde_json::to_string(&shell.specific_asset_ids),
            ShellPayload::V3(shell) => serde_json::to_string(&shell.specific_asset_ids),
        }
    }
}
