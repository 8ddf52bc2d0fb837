//! Builders turn validated user input into new resource records.
//!
//! A builder only reads the current documents. It returns a build plan whose
//! `apply` step cannot fail, so every check happens before anything is
//! mutated and the caller decides when (and in how many writes) to persist.

pub mod agent;
pub mod gateway;
pub mod identity;
pub mod mcp_tool;
pub mod memory;
pub mod target;

pub use agent::{build_agent, AgentBuild, AgentKind, AgentOptions, MemoryOption};
pub use gateway::{build_gateway, GatewayBuild, GatewayOptions};
pub use identity::{build_identity, IdentityBuild, IdentityOptions};
pub use mcp_tool::{build_mcp_tool, tool_code_dir, McpToolBuild, McpToolOptions, ToolExposure};
pub use memory::{build_memory, MemoryBuild, MemoryOptions};
pub use target::{build_target, TargetOptions};

use crate::error::{AgentCoreError, ResourceKind, Result};
use crate::schema::{AgentSpec, ProjectSpec};
use std::collections::HashSet;

pub(crate) fn require_agent<'a>(spec: &'a ProjectSpec, name: &str) -> Result<&'a AgentSpec> {
    spec.agent(name)
        .ok_or_else(|| AgentCoreError::not_found(ResourceKind::Agent, name))
}

/// Every name must be an existing agent, listed once, and not the owner.
pub(crate) fn require_users<'a, I>(spec: &ProjectSpec, owner: Option<&str>, users: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for user in users {
        require_agent(spec, user)?;
        if Some(user) == owner {
            return Err(AgentCoreError::Validation(format!(
                "agent '{}' is the owner and cannot also be listed as a user",
                user
            )));
        }
        if !seen.insert(user) {
            return Err(AgentCoreError::Validation(format!(
                "agent '{}' is listed more than once",
                user
            )));
        }
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::fixtures::project_with_agents;
    use super::*;

    #[test]
    fn test_require_users_rejects_owner() {
        let spec = project_with_agents("Acme", &["A", "B"]);
        let err = require_users(&spec, Some("A"), ["B", "A"]).unwrap_err();
        assert!(matches!(err, AgentCoreError::Validation(_)));
    }

    #[test]
    fn test_require_users_reports_missing_agent() {
        let spec = project_with_agents("Acme", &["A"]);
        let err = require_users(&spec, Some("A"), ["Ghost"]).unwrap_err();
        assert_eq!(err.to_string(), "Agent 'Ghost' not found");
    }

    #[test]
    fn test_require_users_rejects_repeats() {
        let spec = project_with_agents("Acme", &["A", "B"]);
        assert!(require_users(&spec, None, ["B", "B"]).is_err());
    }
}
