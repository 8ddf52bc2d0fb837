//! `mcp.json` (gateways and MCP runtime tools) and `mcp-defs.json` (tool definitions).

use super::project::Language;
use super::{check_unique, Validate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Required suffix of a JWT discovery URL
pub const WELL_KNOWN_SUFFIX: &str = "/.well-known/openid-configuration";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpSpec {
    #[serde(default)]
    pub agent_core_gateways: Vec<Gateway>,

    #[serde(default)]
    pub mcp_runtime_tools: Vec<McpRuntimeTool>,
}

impl McpSpec {
    pub fn gateway(&self, name: &str) -> Option<&Gateway> {
        self.agent_core_gateways.iter().find(|g| g.name == name)
    }

    pub fn gateway_mut(&mut self, name: &str) -> Option<&mut Gateway> {
        self.agent_core_gateways.iter_mut().find(|g| g.name == name)
    }

    pub fn runtime_tool(&self, name: &str) -> Option<&McpRuntimeTool> {
        self.mcp_runtime_tools.iter().find(|t| t.name == name)
    }

    pub fn runtime_tool_mut(&mut self, name: &str) -> Option<&mut McpRuntimeTool> {
        self.mcp_runtime_tools.iter_mut().find(|t| t.name == name)
    }

    /// Every tool name declared anywhere in the spec, runtime tools first
    pub fn tool_names(&self) -> impl Iterator<Item = &str> {
        let runtime = self.mcp_runtime_tools.iter().map(|t| t.name.as_str());
        let behind_gateway = self
            .agent_core_gateways
            .iter()
            .flat_map(|g| g.targets.iter())
            .flat_map(|t| t.tool_definitions.iter())
            .map(|d| d.name.as_str());
        runtime.chain(behind_gateway)
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tool_names().any(|n| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.agent_core_gateways.is_empty() && self.mcp_runtime_tools.is_empty()
    }
}

impl Validate for McpSpec {
    fn validate(&self) -> std::result::Result<(), String> {
        check_unique(
            "gateway",
            self.agent_core_gateways.iter().map(|g| g.name.as_str()),
        )?;
        check_unique("tool", self.tool_names())?;

        for gateway in &self.agent_core_gateways {
            check_unique(
                &format!("target of gateway '{}'", gateway.name),
                gateway.targets.iter().map(|t| t.name.as_str()),
            )?;
            for target in &gateway.targets {
                if target.tool_definitions.is_empty() {
                    return Err(format!(
                        "target '{}' of gateway '{}' has no tool definitions",
                        target.name, gateway.name
                    ));
                }
            }
            gateway
                .check_authorizer()
                .map_err(|e| format!("gateway '{}': {}", gateway.name, e))?;
        }

        for tool in &self.mcp_runtime_tools {
            if tool.tool_definition.name != tool.name {
                return Err(format!(
                    "runtime tool '{}' has a tool definition named '{}'",
                    tool.name, tool.tool_definition.name
                ));
            }
            check_unique(
                &format!("binding of tool '{}'", tool.name),
                tool.bindings.iter().map(|b| b.agent_name.as_str()),
            )?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum AuthorizerType {
    #[default]
    #[serde(rename = "NONE")]
    #[value(name = "none")]
    None,
    #[serde(rename = "CUSTOM_JWT")]
    #[value(name = "custom-jwt")]
    CustomJwt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gateway {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub targets: Vec<GatewayTarget>,

    #[serde(default)]
    pub authorizer_type: AuthorizerType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorizer_configuration: Option<AuthorizerConfiguration>,
}

impl Gateway {
    /// `CUSTOM_JWT` requires a complete JWT configuration; `NONE` must not carry one.
    pub fn check_authorizer(&self) -> std::result::Result<(), String> {
        match (self.authorizer_type, &self.authorizer_configuration) {
            (AuthorizerType::None, None) => Ok(()),
            (AuthorizerType::None, Some(_)) => {
                Err("authorizerConfiguration is only allowed with CUSTOM_JWT".to_string())
            }
            (AuthorizerType::CustomJwt, None) => {
                Err("CUSTOM_JWT requires authorizerConfiguration.customJwtAuthorizer".to_string())
            }
            (AuthorizerType::CustomJwt, Some(config)) => config.custom_jwt_authorizer.check(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerConfiguration {
    pub custom_jwt_authorizer: CustomJwtAuthorizer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomJwtAuthorizer {
    pub discovery_url: String,
    #[serde(default)]
    pub allowed_audience: Vec<String>,
    #[serde(default)]
    pub allowed_clients: Vec<String>,
}

impl CustomJwtAuthorizer {
    pub fn check(&self) -> std::result::Result<(), String> {
        if !self.discovery_url.starts_with("https://") {
            return Err(format!(
                "discovery URL '{}' must use https",
                self.discovery_url
            ));
        }
        if !self.discovery_url.ends_with(WELL_KNOWN_SUFFIX) {
            return Err(format!(
                "discovery URL '{}' must end with {}",
                self.discovery_url, WELL_KNOWN_SUFFIX
            ));
        }
        if self.allowed_audience.is_empty() && self.allowed_clients.is_empty() {
            return Err("at least one allowed audience or allowed client is required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    #[default]
    Lambda,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayTarget {
    pub name: String,
    #[serde(default)]
    pub target_type: TargetType,
    pub tool_definitions: Vec<ToolDefinition>,
    pub compute: ToolCompute,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "empty_input_schema")]
    pub input_schema: serde_json::Value,
}

pub fn empty_input_schema() -> serde_json::Value {
    serde_json::json!({ "type": "object", "properties": {} })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum ToolHost {
    #[value(name = "lambda")]
    Lambda,
    #[value(name = "agentcore-runtime")]
    AgentCoreRuntime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCompute {
    pub host: ToolHost,
    pub implementation: ToolImplementation,
    pub runtime: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolImplementation {
    pub language: Language,
    pub path: String,
    pub handler: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpRuntimeTool {
    pub name: String,
    pub tool_definition: ToolDefinition,
    pub compute: ToolCompute,
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

/// An agent bound to an MCP runtime tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub agent_name: String,
    pub env_var_name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct McpDefs {
    #[serde(default)]
    pub tools: BTreeMap<String, ToolDefinition>,
}

impl Validate for McpDefs {
    fn validate(&self) -> std::result::Result<(), String> {
        for (key, definition) in &self.tools {
            if key != &definition.name {
                return Err(format!(
                    "tool entry '{}' holds a definition named '{}'",
                    key, definition.name
                ));
            }
        }
        Ok(())
    }
}
