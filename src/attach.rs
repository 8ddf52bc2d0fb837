//! Linking two existing resources.
//!
//! Each verb resolves both sides, rejects self and repeat attachment, and only
//! then appends the new reference record. A failed attach leaves the
//! documents exactly as they were.

use crate::builders::require_agent;
use crate::error::{AgentCoreError, ResourceKind, Result};
use crate::naming;
use crate::schema::{
    Access, Binding, IdentityProvider, McpProvider, McpSpec, MemoryProvider, ProjectSpec,
    Relation, RemoteTool,
};

/// What an attach added, for reporting back to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub kind: ResourceKind,
    /// Stored name of the attached resource
    pub name: String,
    pub agent: String,
    pub env_var_name: String,
}

/// Give `source` a remote tool that invokes `target`.
pub fn attach_agent(
    spec: &mut ProjectSpec,
    source: &str,
    target: &str,
    description: Option<String>,
) -> Result<Attachment> {
    let source_agent = require_agent(spec, source)?;
    require_agent(spec, target)?;

    if source == target {
        return Err(AgentCoreError::SelfAttachment(source.to_string()));
    }

    let tool_name = naming::invocation_tool_name(target);
    if source_agent.has_remote_tool(&tool_name)
        || source_agent
            .remote_tools
            .iter()
            .any(|t| t.target_agent() == target)
    {
        return Err(AgentCoreError::already_attached(
            ResourceKind::Agent,
            target,
            source,
        ));
    }

    let env_var_name = naming::agent_invocation_env_var(target);
    let record = RemoteTool::AgentInvocation {
        name: tool_name,
        target_agent: target.to_string(),
        description,
        env_var_name: env_var_name.clone(),
    };
    push_to(spec, source, |agent| agent.remote_tools.push(record));

    Ok(Attachment {
        kind: ResourceKind::Agent,
        name: target.to_string(),
        agent: source.to_string(),
        env_var_name,
    })
}

pub fn attach_gateway(
    spec: &mut ProjectSpec,
    mcp: &McpSpec,
    agent: &str,
    gateway: &str,
) -> Result<Attachment> {
    let existing = require_agent(spec, agent)?;
    if mcp.gateway(gateway).is_none() {
        return Err(AgentCoreError::not_found(ResourceKind::Gateway, gateway));
    }
    if existing.has_mcp_provider(gateway) {
        return Err(AgentCoreError::already_attached(
            ResourceKind::Gateway,
            gateway,
            agent,
        ));
    }

    let env_var_name = naming::gateway_env_var(gateway);
    let record = McpProvider::Gateway {
        name: gateway.to_string(),
        env_var_name: env_var_name.clone(),
    };
    push_to(spec, agent, |a| a.mcp_providers.push(record));

    Ok(Attachment {
        kind: ResourceKind::Gateway,
        name: gateway.to_string(),
        agent: agent.to_string(),
        env_var_name,
    })
}

/// Attach an existing memory with `use` relation.
pub fn attach_memory(
    spec: &mut ProjectSpec,
    agent: &str,
    memory: &str,
    access: Access,
) -> Result<Attachment> {
    let existing = require_agent(spec, agent)?;
    if spec.memory(memory).is_none() {
        return Err(AgentCoreError::not_found(ResourceKind::Memory, memory));
    }
    if existing.has_memory(memory) {
        return Err(AgentCoreError::already_attached(
            ResourceKind::Memory,
            memory,
            agent,
        ));
    }

    let env_var_name = naming::memory_env_var(memory);
    let record = MemoryProvider {
        relation: Relation::Use,
        name: memory.to_string(),
        access,
        env_var_name: env_var_name.clone(),
    };
    push_to(spec, agent, |a| a.memory_providers.push(record));

    Ok(Attachment {
        kind: ResourceKind::Memory,
        name: memory.to_string(),
        agent: agent.to_string(),
        env_var_name,
    })
}

/// Attach an existing credential with `use` relation. `identity` may be the
/// simple or the qualified name.
pub fn attach_identity(spec: &mut ProjectSpec, agent: &str, identity: &str) -> Result<Attachment> {
    let existing = require_agent(spec, agent)?;
    let qualified = naming::resolve_qualified(&spec.name, identity, |n| {
        spec.credential(n).is_some()
    })
    .ok_or_else(|| AgentCoreError::not_found(ResourceKind::Identity, identity))?;

    if existing.has_identity(&qualified) {
        return Err(AgentCoreError::already_attached(
            ResourceKind::Identity,
            &qualified,
            agent,
        ));
    }

    // Reuse the env var chosen when the credential was created.
    let env_var_name = spec
        .credential(&qualified)
        .map(|c| c.env_var_name.clone())
        .unwrap_or_default();
    let record = IdentityProvider::Use {
        name: qualified.clone(),
        env_var_name: env_var_name.clone(),
    };
    push_to(spec, agent, |a| a.identity_providers.push(record));

    Ok(Attachment {
        kind: ResourceKind::Identity,
        name: qualified,
        agent: agent.to_string(),
        env_var_name,
    })
}

/// Bind an agent to an MCP runtime tool. The binding lives on the tool.
pub fn attach_mcp_runtime(
    spec: &ProjectSpec,
    mcp: &mut McpSpec,
    agent: &str,
    tool: &str,
) -> Result<Attachment> {
    require_agent(spec, agent)?;
    let runtime_tool = mcp
        .runtime_tool_mut(tool)
        .ok_or_else(|| AgentCoreError::not_found(ResourceKind::McpTool, tool))?;

    if runtime_tool.bindings.iter().any(|b| b.agent_name == agent) {
        return Err(AgentCoreError::already_attached(
            ResourceKind::McpTool,
            tool,
            agent,
        ));
    }

    let env_var_name = naming::mcp_runtime_env_var(tool);
    runtime_tool.bindings.push(Binding {
        agent_name: agent.to_string(),
        env_var_name: env_var_name.clone(),
    });

    Ok(Attachment {
        kind: ResourceKind::McpTool,
        name: tool.to_string(),
        agent: agent.to_string(),
        env_var_name,
    })
}

fn push_to<F>(spec: &mut ProjectSpec, agent: &str, push: F)
where
    F: FnOnce(&mut crate::schema::AgentSpec),
{
    if let Some(agent) = spec.agent_mut(agent) {
        push(agent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::fixtures::project_with_agents;
    use crate::schema::{Credential, CredentialVariant, Memory};

    fn spec_with_resources() -> ProjectSpec {
        let mut spec = project_with_agents("Acme", &["A", "B"]);
        spec.memories.push(Memory {
            name: "Shared".to_string(),
            event_expiry_duration: 30,
            strategies: vec![],
        });
        spec.credentials.push(Credential {
            name: "AcmeKey".to_string(),
            variant: CredentialVariant::ApiKey,
            description: None,
            env_var_name: "AGENTCORE_IDENTITY_KEY".to_string(),
        });
        spec
    }

    #[test]
    fn test_attach_agent_adds_remote_tool() {
        let mut spec = spec_with_resources();
        let attachment = attach_agent(&mut spec, "A", "B", None).unwrap();
        assert_eq!(attachment.env_var_name, "AGENTCORE_AGENT_B_ARN");

        let a = spec.agent("A").unwrap();
        assert_eq!(a.remote_tools[0].name(), "invokeB");
        assert_eq!(a.remote_tools[0].target_agent(), "B");
    }

    #[test]
    fn test_self_attachment_is_rejected() {
        let mut spec = spec_with_resources();
        let before = spec.clone();
        let err = attach_agent(&mut spec, "A", "A", None).unwrap_err();
        assert!(matches!(err, AgentCoreError::SelfAttachment(_)));
        assert_eq!(spec, before);
    }

    #[test]
    fn test_attach_twice_is_already_attached() {
        let mut spec = spec_with_resources();
        attach_agent(&mut spec, "A", "B", None).unwrap();
        let err = attach_agent(&mut spec, "A", "B", None).unwrap_err();
        assert!(matches!(err, AgentCoreError::AlreadyAttached { .. }));
        assert_eq!(spec.agent("A").unwrap().remote_tools.len(), 1);
    }

    #[test]
    fn test_missing_side_is_named() {
        let mut spec = spec_with_resources();
        let err = attach_agent(&mut spec, "A", "Ghost", None).unwrap_err();
        assert_eq!(err.to_string(), "Agent 'Ghost' not found");

        let err = attach_memory(&mut spec, "A", "Nope", Access::Read).unwrap_err();
        assert_eq!(err.to_string(), "Memory 'Nope' not found");
    }

    #[test]
    fn test_attach_memory_defaults_to_use() {
        let mut spec = spec_with_resources();
        attach_memory(&mut spec, "B", "Shared", Access::ReadWrite).unwrap();
        let provider = &spec.agent("B").unwrap().memory_providers[0];
        assert_eq!(provider.relation, Relation::Use);
        assert_eq!(provider.access, Access::ReadWrite);
    }

    #[test]
    fn test_attach_identity_accepts_simple_and_qualified_names() {
        let mut spec = spec_with_resources();
        let attachment = attach_identity(&mut spec, "A", "Key").unwrap();
        assert_eq!(attachment.name, "AcmeKey");
        assert_eq!(attachment.env_var_name, "AGENTCORE_IDENTITY_KEY");

        attach_identity(&mut spec, "B", "AcmeKey").unwrap();
        let b = &spec.agent("B").unwrap().identity_providers[0];
        assert_eq!(b.relation(), Relation::Use);

        let err = attach_identity(&mut spec, "B", "Key").unwrap_err();
        assert!(matches!(err, AgentCoreError::AlreadyAttached { .. }));
    }

    #[test]
    fn test_attach_gateway_requires_gateway() {
        let mut spec = spec_with_resources();
        let err = attach_gateway(&mut spec, &McpSpec::default(), "A", "G").unwrap_err();
        assert_eq!(err.to_string(), "Gateway 'G' not found");
    }

    #[test]
    fn test_attach_mcp_runtime_binds_on_tool() {
        use crate::schema::mcp::empty_input_schema;
        use crate::schema::{
            Language, McpRuntimeTool, ToolCompute, ToolDefinition, ToolHost, ToolImplementation,
        };

        let spec = spec_with_resources();
        let mut mcp = McpSpec::default();
        mcp.mcp_runtime_tools.push(McpRuntimeTool {
            name: "lookup".to_string(),
            tool_definition: ToolDefinition {
                name: "lookup".to_string(),
                description: String::new(),
                input_schema: empty_input_schema(),
            },
            compute: ToolCompute {
                host: ToolHost::AgentCoreRuntime,
                implementation: ToolImplementation {
                    language: Language::Python,
                    path: "app/mcp/lookup".to_string(),
                    handler: "handler.lambda_handler".to_string(),
                },
                runtime: "python3.12".to_string(),
            },
            bindings: vec![],
        });

        attach_mcp_runtime(&spec, &mut mcp, "A", "lookup").unwrap();
        assert_eq!(mcp.mcp_runtime_tools[0].bindings[0].agent_name, "A");
        assert!(attach_mcp_runtime(&spec, &mut mcp, "A", "lookup").is_err());
    }
}
