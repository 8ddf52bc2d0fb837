use super::{Draft, RemovalPlan};
use crate::error::{ResourceKind, Result};
use crate::schema::{McpDefs, McpSpec};
use crate::store::{ConfigKind, DocumentSet};

/// Plan `remove all`: clear every resource but keep the project identity.
///
/// Deployment targets and deployed state are not resources of the graph and
/// stay untouched, so a later deploy can still tear the stacks down.
pub fn plan_reset(docs: &DocumentSet) -> Result<RemovalPlan> {
    let mut next = docs.clone();
    let mut summary = vec![format!("Reset project '{}'", docs.project.name)];

    let project = &mut next.project;
    if !project.agents.is_empty() {
        summary.push(format!("Remove {} agent(s)", project.agents.len()));
    }
    if !project.memories.is_empty() {
        summary.push(format!("Remove {} memory(ies)", project.memories.len()));
    }
    if !project.credentials.is_empty() {
        summary.push(format!("Remove {} identity(ies)", project.credentials.len()));
    }
    project.agents.clear();
    project.memories.clear();
    project.credentials.clear();

    if let Some(mcp) = next.mcp.as_mut() {
        if !mcp.is_empty() {
            summary.push(format!(
                "Remove {} gateway(s) and {} MCP runtime tool(s)",
                mcp.agent_core_gateways.len(),
                mcp.mcp_runtime_tools.len()
            ));
        }
        *mcp = McpSpec::default();
    }
    if let Some(defs) = next.mcp_defs.as_mut() {
        if !defs.tools.is_empty() {
            summary.push(format!("Remove {} tool definition(s)", defs.tools.len()));
        }
        *defs = McpDefs::default();
    }

    Draft {
        kind: ResourceKind::Project,
        name: docs.project.name.clone(),
        authoritative: ConfigKind::Project,
        next,
        summary,
        directories: Vec::new(),
        teardown: None,
    }
    .finish(docs)
}
