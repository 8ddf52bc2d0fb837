//! `.cli/deployed-state.json`: which targets have live stacks.

use super::Validate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeployedState {
    #[serde(default)]
    pub targets: BTreeMap<String, DeploymentRecord>,
}

/// Deployment record for one target. Fields written by deploy that this tool
/// does not interpret are carried through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_name: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Validate for DeployedState {
    fn validate(&self) -> std::result::Result<(), String> {
        if let Some((name, _)) = self
            .targets
            .iter()
            .find(|(_, record)| matches!(&record.stack_name, Some(s) if s.trim().is_empty()))
        {
            return Err(format!("target '{}' has an empty stackName", name));
        }
        Ok(())
    }
}
