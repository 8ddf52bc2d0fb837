use super::{CommandResult, Context};
use crate::error::{AgentCoreError, ResourceKind, Result};
use crate::store::{ConfigKind, DocumentSet};
use crate::utils::env::load_env_file;

/// Load every document through the store, then check that references between
/// documents still resolve.
pub fn execute(ctx: &Context) -> Result<CommandResult> {
    let docs = ctx.store.load_all()?;
    check_references(&docs)?;

    let checked: Vec<&str> = ConfigKind::ALL
        .iter()
        .filter(|kind| ctx.store.exists(**kind))
        .map(|kind| kind.relative_path())
        .collect();
    tracing::debug!(files = ?checked, "documents validated");

    let result = CommandResult::ok(
        ResourceKind::Project,
        &docs.project.name,
        format!(
            "Project '{}' is valid ({})",
            docs.project.name,
            checked.join(", ")
        ),
    );

    let missing = missing_keys(ctx, &docs)?;
    Ok(if missing.is_empty() {
        result
    } else {
        result.with_note(format!(
            "Not set in agentcore/{}: {}",
            ctx.settings.env.file,
            missing.join(", ")
        ))
    })
}

/// Credential env vars that the env file does not assign.
fn missing_keys(ctx: &Context, docs: &DocumentSet) -> Result<Vec<String>> {
    let path = ctx.project.config_dir().join(&ctx.settings.env.file);
    let vars = if path.is_file() {
        load_env_file(&path)?
    } else {
        Default::default()
    };
    Ok(docs
        .project
        .credentials
        .iter()
        .map(|c| c.env_var_name.clone())
        .filter(|var| !vars.get(var).is_some_and(|v| !v.is_empty()))
        .collect())
}

/// First reference that points at a resource no document declares.
fn check_references(docs: &DocumentSet) -> Result<()> {
    let spec = &docs.project;
    let dangling = |what: &str, name: &str, agent: &str| {
        AgentCoreError::Validation(format!(
            "agent '{}' references unknown {} '{}'",
            agent, what, name
        ))
    };

    if let Some(m) = spec.memories.iter().find(|m| spec.memory_owner(&m.name).is_none()) {
        return Err(AgentCoreError::Validation(format!(
            "memory '{}' has no owner agent",
            m.name
        )));
    }
    if let Some(c) = spec
        .credentials
        .iter()
        .find(|c| spec.credential_owner(&c.name).is_none())
    {
        return Err(AgentCoreError::Validation(format!(
            "identity '{}' has no owner agent",
            c.name
        )));
    }

    for agent in &spec.agents {
        if let Some(p) = agent
            .memory_providers
            .iter()
            .find(|p| spec.memory(&p.name).is_none())
        {
            return Err(dangling("memory", &p.name, &agent.name));
        }
        if let Some(p) = agent
            .identity_providers
            .iter()
            .find(|p| spec.credential(p.name()).is_none())
        {
            return Err(dangling("identity", p.name(), &agent.name));
        }
        if let Some(t) = agent
            .remote_tools
            .iter()
            .find(|t| spec.agent(t.target_agent()).is_none())
        {
            return Err(dangling("agent", t.target_agent(), &agent.name));
        }
        if let Some(p) = agent
            .mcp_providers
            .iter()
            .find(|p| !docs.mcp.as_ref().is_some_and(|m| m.gateway(p.name()).is_some()))
        {
            return Err(dangling("gateway", p.name(), &agent.name));
        }
    }

    if let Some(mcp) = &docs.mcp {
        for tool in &mcp.mcp_runtime_tools {
            if let Some(b) = tool
                .bindings
                .iter()
                .find(|b| spec.agent(&b.agent_name).is_none())
            {
                return Err(AgentCoreError::Validation(format!(
                    "MCP tool '{}' is bound to unknown agent '{}'",
                    tool.name, b.agent_name
                )));
            }
        }
    }

    Ok(())
}
