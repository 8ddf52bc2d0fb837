use super::require_users;
use crate::error::{AgentCoreError, ResourceKind, Result};
use crate::naming;
use crate::schema::mcp::empty_input_schema;
use crate::schema::{
    Binding, GatewayTarget, Language, McpDefs, McpRuntimeTool, McpSpec,
    ProjectSpec, TargetType, ToolCompute, ToolDefinition, ToolHost, ToolImplementation,
};
use std::path::{Path, PathBuf};

/// Where a new tool is reachable from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolExposure {
    McpRuntime,
    BehindGateway { gateway: String },
}

#[derive(Debug, Clone)]
pub struct McpToolOptions {
    pub name: String,
    pub description: Option<String>,
    pub language: Language,
    pub exposure: ToolExposure,
    pub host: Option<ToolHost>,
    /// Agents bound to a runtime tool
    pub agents: Vec<String>,
}

#[derive(Debug, Clone)]
enum Placement {
    Runtime(McpRuntimeTool),
    GatewayTarget {
        gateway: String,
        target: GatewayTarget,
    },
}

#[derive(Debug, Clone)]
pub struct McpToolBuild {
    placement: Placement,
    definition: ToolDefinition,
}

/// Source directory of an MCP tool, relative to the project root
pub fn tool_code_dir(project_root: &Path, name: &str) -> PathBuf {
    project_root.join("app").join("mcp").join(name)
}

pub fn build_mcp_tool(
    spec: &ProjectSpec,
    mcp: &McpSpec,
    defs: &McpDefs,
    opts: McpToolOptions,
) -> Result<McpToolBuild> {
    naming::validate_resource_name(ResourceKind::McpTool, &opts.name)?;

    // Tool names share one namespace across runtime tools, every gateway and mcp-defs.
    if mcp.has_tool(&opts.name) || defs.tools.contains_key(&opts.name) {
        return Err(AgentCoreError::duplicate(ResourceKind::McpTool, &opts.name));
    }

    let definition = ToolDefinition {
        name: opts.name.clone(),
        description: opts
            .description
            .unwrap_or_else(|| format!("{} tool", opts.name)),
        input_schema: empty_input_schema(),
    };

    let placement = match opts.exposure {
        ToolExposure::McpRuntime => {
            let host = opts.host.unwrap_or(ToolHost::AgentCoreRuntime);
            if host != ToolHost::AgentCoreRuntime {
                return Err(AgentCoreError::Validation(
                    "MCP runtime tools must be hosted on agentcore-runtime".to_string(),
                ));
            }
            require_users(spec, None, opts.agents.iter().map(String::as_str))?;

            Placement::Runtime(McpRuntimeTool {
                name: opts.name.clone(),
                tool_definition: definition.clone(),
                compute: compute(&opts.name, opts.language, host),
                bindings: opts
                    .agents
                    .iter()
                    .map(|agent_name| Binding {
                        agent_name: agent_name.clone(),
                        env_var_name: naming::mcp_runtime_env_var(&opts.name),
                    })
                    .collect(),
            })
        }
        ToolExposure::BehindGateway { gateway } => {
            if mcp.gateway(&gateway).is_none() {
                return Err(AgentCoreError::not_found(ResourceKind::Gateway, gateway));
            }
            if !opts.agents.is_empty() {
                return Err(AgentCoreError::Validation(
                    "agents reach gateway tools through the gateway; attach the agent to the gateway instead"
                        .to_string(),
                ));
            }

            Placement::GatewayTarget {
                gateway,
                target: GatewayTarget {
                    name: opts.name.clone(),
                    target_type: TargetType::Lambda,
                    tool_definitions: vec![definition.clone()],
                    compute: compute(
                        &opts.name,
                        opts.language,
                        opts.host.unwrap_or(ToolHost::Lambda),
                    ),
                },
            }
        }
    };

    Ok(McpToolBuild {
        placement,
        definition,
    })
}

impl McpToolBuild {
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn gateway(&self) -> Option<&str> {
        match &self.placement {
            Placement::Runtime(_) => None,
            Placement::GatewayTarget { gateway, .. } => Some(gateway),
        }
    }

    pub fn apply(self, mcp: &mut McpSpec, defs: &mut McpDefs) {
        match self.placement {
            Placement::Runtime(tool) => mcp.mcp_runtime_tools.push(tool),
            Placement::GatewayTarget { gateway, target } => {
                if let Some(gateway) = mcp.gateway_mut(&gateway) {
                    gateway.targets.push(target);
                }
            }
        }
        defs.tools
            .insert(self.definition.name.clone(), self.definition);
    }
}

fn compute(name: &str, language: Language, host: ToolHost) -> ToolCompute {
    let (runtime, handler) = match language {
        Language::Python => ("python3.12", "handler.lambda_handler"),
        Language::TypeScript => ("nodejs20.x", "index.handler"),
    };
    ToolCompute {
        host,
        implementation: ToolImplementation {
            language,
            path: format!("app/mcp/{}", name),
            handler: handler.to_string(),
        },
        runtime: runtime.to_string(),
    }
}
