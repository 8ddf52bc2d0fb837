//! Naming rules shared by builders, attach and removal.
//!
//! Everything here is pure and deterministic: removal and attach recompute
//! qualified names from what the user typed and must land on exactly the name
//! stored when the resource was created.

use crate::error::{AgentCoreError, ResourceKind, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static RESOURCE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]{0,47}$").expect("valid regex"));

// Project and identity names end up concatenated into cloud resource names,
// which only accept alphanumerics.
static PROJECT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]{0,22}$").expect("valid regex"));
static IDENTITY_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]{0,39}$").expect("valid regex"));

/// `{project}{simple}` with no separator
pub fn qualify(project: &str, simple: &str) -> String {
    format!("{}{}", project, simple)
}

/// Upper-case a name for use inside an environment variable
pub fn env_suffix(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

pub fn identity_env_var(simple: &str) -> String {
    format!("AGENTCORE_IDENTITY_{}", env_suffix(simple))
}

/// Env var holding a model-provider API key
pub fn credential_env_var(simple: &str) -> String {
    format!("AGENTCORE_CREDENTIAL_{}", env_suffix(simple))
}

pub fn memory_env_var(memory: &str) -> String {
    format!("AGENTCORE_MEMORY_{}_ID", env_suffix(memory))
}

pub fn gateway_env_var(gateway: &str) -> String {
    format!("AGENTCORE_GATEWAY_{}_URL", env_suffix(gateway))
}

pub fn agent_invocation_env_var(target_agent: &str) -> String {
    format!("AGENTCORE_AGENT_{}_ARN", env_suffix(target_agent))
}

pub fn mcp_runtime_env_var(tool: &str) -> String {
    format!("AGENTCORE_MCP_{}_URL", env_suffix(tool))
}

/// Name of the remote tool an agent uses to invoke `target_agent`
pub fn invocation_tool_name(target_agent: &str) -> String {
    format!("invoke{}", target_agent)
}

/// Case-sensitive exact match against existing names
pub fn is_taken<'a, I>(existing: I, name: &str) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    existing.into_iter().any(|n| n == name)
}

/// Resolve a user-supplied identity name, which may be simple or already
/// qualified, to the stored qualified name.
///
/// An exact match wins; otherwise the input is qualified with the project name.
pub fn resolve_qualified<F>(project: &str, input: &str, exists: F) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    if exists(input) {
        return Some(input.to_string());
    }
    let qualified = qualify(project, input);
    exists(&qualified).then_some(qualified)
}

pub fn validate_resource_name(kind: ResourceKind, name: &str) -> Result<()> {
    if RESOURCE_NAME.is_match(name) {
        Ok(())
    } else {
        Err(AgentCoreError::Validation(format!(
            "{} name '{}' must start with a letter and contain only letters, digits and underscores (max 48 characters)",
            kind, name
        )))
    }
}

pub fn validate_project_name(name: &str) -> Result<()> {
    if PROJECT_NAME.is_match(name) {
        Ok(())
    } else {
        Err(AgentCoreError::Validation(format!(
            "project name '{}' must start with a letter and contain only letters and digits (max 23 characters)",
            name
        )))
    }
}

pub fn validate_identity_name(name: &str) -> Result<()> {
    if IDENTITY_NAME.is_match(name) {
        Ok(())
    } else {
        Err(AgentCoreError::Validation(format!(
            "identity name '{}' must start with a letter and contain only letters and digits (max 40 characters)",
            name
        )))
    }
}
