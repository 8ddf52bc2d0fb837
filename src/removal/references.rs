//! Reference scans and the strip operations that cascade a removal.
//!
//! Every function here edits a next-state [`DocumentSet`] in place and
//! appends one summary line per reference it drops.

use crate::schema::{AgentSpec, ProjectSpec, Relation};
use crate::store::DocumentSet;

/// Memories and credentials held with `relation: own` by `agent`
pub(super) fn owned_by(project: &ProjectSpec, agent: &str) -> (Vec<String>, Vec<String>) {
    let Some(spec) = project.agent(agent) else {
        return (Vec::new(), Vec::new());
    };
    let memories = spec
        .memory_providers
        .iter()
        .filter(|p| p.relation == Relation::Own && project.memory(&p.name).is_some())
        .map(|p| p.name.clone())
        .collect();
    let credentials = spec
        .identity_providers
        .iter()
        .filter(|p| p.relation() == Relation::Own && project.credential(p.name()).is_some())
        .map(|p| p.name().to_string())
        .collect();
    (memories, credentials)
}

pub(super) fn strip_agent(docs: &mut DocumentSet, name: &str, summary: &mut Vec<String>) {
    let (memories, credentials) = owned_by(&docs.project, name);

    docs.project.agents.retain(|a| a.name != name);

    for memory in &memories {
        let users = users_of(&docs.project, |a| {
            a.memory_providers.iter().any(|p| &p.name == memory)
        });
        summary.push(owned_line("memory", memory, name, &users));
        strip_memory(&mut docs.project, memory, summary);
    }
    for credential in &credentials {
        let users = users_of(&docs.project, |a| {
            a.identity_providers.iter().any(|p| p.name() == credential.as_str())
        });
        summary.push(owned_line("identity", credential, name, &users));
        strip_identity(&mut docs.project, credential, summary);
    }

    for agent in &mut docs.project.agents {
        let before = agent.remote_tools.len();
        agent.remote_tools.retain(|t| t.target_agent() != name);
        if agent.remote_tools.len() != before {
            summary.push(format!(
                "Remove remote tool invoking '{}' from agent '{}'",
                name, agent.name
            ));
        }
    }

    if let Some(mcp) = docs.mcp.as_mut() {
        for tool in &mut mcp.mcp_runtime_tools {
            let before = tool.bindings.len();
            tool.bindings.retain(|b| b.agent_name != name);
            if tool.bindings.len() != before {
                summary.push(format!(
                    "Remove binding of agent '{}' from MCP tool '{}'",
                    name, tool.name
                ));
            }
        }
    }
}

/// Names of the remaining agents matching `holds`
fn users_of(project: &ProjectSpec, holds: impl Fn(&AgentSpec) -> bool) -> Vec<String> {
    project
        .agents
        .iter()
        .filter(|a| holds(a))
        .map(|a| format!("'{}'", a.name))
        .collect()
}

fn owned_line(what: &str, resource: &str, owner: &str, users: &[String]) -> String {
    let line = format!("Remove {} '{}' owned by agent '{}'", what, resource, owner);
    if users.is_empty() {
        line
    } else {
        format!("{} (also used by {})", line, users.join(", "))
    }
}

pub(super) fn strip_memory(project: &mut ProjectSpec, name: &str, summary: &mut Vec<String>) {
    project.memories.retain(|m| m.name != name);
    for agent in &mut project.agents {
        let before = agent.memory_providers.len();
        agent.memory_providers.retain(|p| p.name != name);
        if agent.memory_providers.len() != before {
            summary.push(format!(
                "Remove memory provider '{}' from agent '{}'",
                name, agent.name
            ));
        }
    }
}

pub(super) fn strip_identity(project: &mut ProjectSpec, name: &str, summary: &mut Vec<String>) {
    project.credentials.retain(|c| c.name != name);
    for agent in &mut project.agents {
        let before = agent.identity_providers.len();
        agent.identity_providers.retain(|p| p.name() != name);
        if agent.identity_providers.len() != before {
            summary.push(format!(
                "Remove identity provider '{}' from agent '{}'",
                name, agent.name
            ));
        }
    }
}

/// Strip a gateway and everything pointing at it. Returns the names of the
/// tools that lived behind it.
pub(super) fn strip_gateway(
    docs: &mut DocumentSet,
    name: &str,
    summary: &mut Vec<String>,
) -> Vec<String> {
    let mut tools = Vec::new();

    if let Some(mcp) = docs.mcp.as_mut() {
        if let Some(gateway) = mcp.gateway(name) {
            tools = gateway
                .targets
                .iter()
                .flat_map(|t| t.tool_definitions.iter())
                .map(|d| d.name.clone())
                .collect();
        }
        mcp.agent_core_gateways.retain(|g| g.name != name);
    }

    for agent in &mut docs.project.agents {
        let before = agent.mcp_providers.len();
        agent.mcp_providers.retain(|p| p.name() != name);
        if agent.mcp_providers.len() != before {
            summary.push(format!(
                "Remove gateway provider '{}' from agent '{}'",
                name, agent.name
            ));
        }
    }

    for tool in &tools {
        summary.push(format!("Remove MCP tool '{}' behind gateway '{}'", tool, name));
        strip_tool_definition(docs, tool, summary);
    }

    tools
}

/// Strip an MCP tool from wherever it is declared: a runtime tool, or a tool
/// definition inside a gateway target. A target left without definitions is
/// dropped with it.
pub(super) fn strip_mcp_tool(docs: &mut DocumentSet, name: &str, summary: &mut Vec<String>) {
    if let Some(mcp) = docs.mcp.as_mut() {
        if let Some(tool) = mcp.runtime_tool(name) {
            for binding in &tool.bindings {
                summary.push(format!(
                    "Remove binding of agent '{}' from MCP tool '{}'",
                    binding.agent_name, name
                ));
            }
        }
        mcp.mcp_runtime_tools.retain(|t| t.name != name);

        for gateway in &mut mcp.agent_core_gateways {
            for target in &mut gateway.targets {
                target.tool_definitions.retain(|d| d.name != name);
            }
            let before = gateway.targets.len();
            gateway.targets.retain(|t| !t.tool_definitions.is_empty());
            if gateway.targets.len() != before {
                summary.push(format!(
                    "Remove empty target from gateway '{}'",
                    gateway.name
                ));
            }
        }
    }

    strip_tool_definition(docs, name, summary);
}

fn strip_tool_definition(docs: &mut DocumentSet, name: &str, summary: &mut Vec<String>) {
    if let Some(defs) = docs.mcp_defs.as_mut() {
        if defs.tools.remove(name).is_some() {
            summary.push(format!("Remove tool definition '{}' from mcp-defs.json", name));
        }
    }
}
