//! `agentcore.json`: the project spec with agents, memories and credentials.

use super::{check_unique, Validate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSpec {
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub agents: Vec<AgentSpec>,

    #[serde(default)]
    pub memories: Vec<Memory>,

    #[serde(default)]
    pub credentials: Vec<Credential>,
}

fn default_version() -> String {
    "0.1".to_string()
}

impl ProjectSpec {
    /// Empty project spec with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: default_version(),
            description: None,
            agents: Vec::new(),
            memories: Vec::new(),
            credentials: Vec::new(),
        }
    }

    pub fn agent(&self, name: &str) -> Option<&AgentSpec> {
        self.agents.iter().find(|a| a.name == name)
    }

    pub fn agent_mut(&mut self, name: &str) -> Option<&mut AgentSpec> {
        self.agents.iter_mut().find(|a| a.name == name)
    }

    pub fn memory(&self, name: &str) -> Option<&Memory> {
        self.memories.iter().find(|m| m.name == name)
    }

    pub fn credential(&self, name: &str) -> Option<&Credential> {
        self.credentials.iter().find(|c| c.name == name)
    }

    /// Agent holding `relation: own` for the named memory, if any
    pub fn memory_owner(&self, memory: &str) -> Option<&AgentSpec> {
        self.agents.iter().find(|a| {
            a.memory_providers
                .iter()
                .any(|p| p.name == memory && p.relation == Relation::Own)
        })
    }

    /// Agent holding `relation: own` for the named credential, if any
    pub fn credential_owner(&self, credential: &str) -> Option<&AgentSpec> {
        self.agents.iter().find(|a| {
            a.identity_providers
                .iter()
                .any(|p| p.name() == credential && p.relation() == Relation::Own)
        })
    }
}

impl Validate for ProjectSpec {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("project name cannot be empty".to_string());
        }

        check_unique("agent", self.agents.iter().map(|a| a.name.as_str()))?;
        check_unique("memory", self.memories.iter().map(|m| m.name.as_str()))?;
        check_unique(
            "credential",
            self.credentials.iter().map(|c| c.name.as_str()),
        )?;

        for memory in &self.memories {
            if !(MIN_EXPIRY_DAYS..=MAX_EXPIRY_DAYS).contains(&memory.event_expiry_duration) {
                return Err(format!(
                    "memory '{}' eventExpiryDuration must be between {} and {} days",
                    memory.name, MIN_EXPIRY_DAYS, MAX_EXPIRY_DAYS
                ));
            }
        }

        let mut memory_owners: HashMap<&str, &str> = HashMap::new();
        let mut credential_owners: HashMap<&str, &str> = HashMap::new();

        for agent in &self.agents {
            agent.validate()?;

            for provider in &agent.memory_providers {
                if provider.relation == Relation::Own {
                    if let Some(other) = memory_owners.insert(&provider.name, &agent.name) {
                        return Err(format!(
                            "memory '{}' is owned by both '{}' and '{}'",
                            provider.name, other, agent.name
                        ));
                    }
                }
            }
            for provider in &agent.identity_providers {
                if provider.relation() == Relation::Own {
                    if let Some(other) = credential_owners.insert(provider.name(), &agent.name) {
                        return Err(format!(
                            "identity '{}' is owned by both '{}' and '{}'",
                            provider.name(),
                            other,
                            agent.name
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSpec {
    pub name: String,

    #[serde(flatten)]
    pub source: AgentSource,

    #[serde(default)]
    pub identity_providers: Vec<IdentityProvider>,

    #[serde(default)]
    pub memory_providers: Vec<MemoryProvider>,

    #[serde(default)]
    pub remote_tools: Vec<RemoteTool>,

    #[serde(default)]
    pub mcp_providers: Vec<McpProvider>,
}

impl AgentSpec {
    pub fn new(name: impl Into<String>, source: AgentSource) -> Self {
        Self {
            name: name.into(),
            source,
            identity_providers: Vec::new(),
            memory_providers: Vec::new(),
            remote_tools: Vec::new(),
            mcp_providers: Vec::new(),
        }
    }

    pub fn has_identity(&self, name: &str) -> bool {
        self.identity_providers.iter().any(|p| p.name() == name)
    }

    pub fn has_memory(&self, name: &str) -> bool {
        self.memory_providers.iter().any(|p| p.name == name)
    }

    pub fn has_remote_tool(&self, name: &str) -> bool {
        self.remote_tools.iter().any(|t| t.name() == name)
    }

    pub fn has_mcp_provider(&self, name: &str) -> bool {
        self.mcp_providers.iter().any(|p| p.name() == name)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        let scope = |what: &str| format!("{} of agent '{}'", what, self.name);

        check_unique(
            &scope("identity provider"),
            self.identity_providers.iter().map(|p| p.name()),
        )?;
        check_unique(
            &scope("memory provider"),
            self.memory_providers.iter().map(|p| p.name.as_str()),
        )?;
        check_unique(
            &scope("remote tool"),
            self.remote_tools.iter().map(|t| t.name()),
        )?;
        check_unique(
            &scope("MCP provider"),
            self.mcp_providers.iter().map(|p| p.name()),
        )?;

        if self
            .remote_tools
            .iter()
            .any(|t| t.target_agent() == self.name)
        {
            return Err(format!("agent '{}' references itself", self.name));
        }

        Ok(())
    }
}

/// Where an agent's code comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AgentSource {
    /// Rendered from a template by `add agent`
    #[serde(rename_all = "camelCase")]
    Generated {
        framework: Framework,
        language: Language,
        model_provider: ModelProvider,
        code_location: String,
        entrypoint: String,
    },
    /// Bring-your-own code at an explicit location
    #[serde(rename_all = "camelCase")]
    Byo {
        code_location: String,
        entrypoint: String,
        language: Language,
    },
}

impl AgentSource {
    pub fn code_location(&self) -> &str {
        match self {
            AgentSource::Generated { code_location, .. } | AgentSource::Byo { code_location, .. } => {
                code_location
            }
        }
    }

    pub fn language(&self) -> Language {
        match self {
            AgentSource::Generated { language, .. } | AgentSource::Byo { language, .. } => *language,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Framework {
    #[value(name = "strands")]
    Strands,
    #[serde(rename = "LangChain_LangGraph")]
    #[value(name = "langgraph")]
    LangChainLangGraph,
    #[value(name = "google-adk")]
    GoogleADK,
    #[value(name = "openai-agents")]
    OpenAIAgents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Language {
    Python,
    #[value(name = "typescript")]
    TypeScript,
}

impl Language {
    /// File extensions accepted for an entrypoint in this language
    pub fn entrypoint_extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &["py"],
            Language::TypeScript => &["ts", "js"],
        }
    }

    pub fn default_entrypoint(&self) -> &'static str {
        match self {
            Language::Python => "main.py",
            Language::TypeScript => "main.ts",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum ModelProvider {
    Bedrock,
    Anthropic,
    #[value(name = "openai")]
    OpenAI,
    Gemini,
}

impl ModelProvider {
    /// Bedrock is reached through the execution role; every other provider needs an API key.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, ModelProvider::Bedrock)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelProvider::Bedrock => "Bedrock",
            ModelProvider::Anthropic => "Anthropic",
            ModelProvider::OpenAI => "OpenAI",
            ModelProvider::Gemini => "Gemini",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    Own,
    Use,
}

/// An agent's link to a credential. Owned entries carry the credential details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "relation", rename_all = "lowercase")]
pub enum IdentityProvider {
    #[serde(rename_all = "camelCase")]
    Own {
        name: String,
        variant: CredentialVariant,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        env_var_name: String,
    },
    #[serde(rename_all = "camelCase")]
    Use { name: String, env_var_name: String },
}

impl IdentityProvider {
    pub fn name(&self) -> &str {
        match self {
            IdentityProvider::Own { name, .. } | IdentityProvider::Use { name, .. } => name,
        }
    }

    pub fn relation(&self) -> Relation {
        match self {
            IdentityProvider::Own { .. } => Relation::Own,
            IdentityProvider::Use { .. } => Relation::Use,
        }
    }

    pub fn env_var_name(&self) -> &str {
        match self {
            IdentityProvider::Own { env_var_name, .. }
            | IdentityProvider::Use { env_var_name, .. } => env_var_name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Read,
    #[default]
    #[value(name = "readwrite")]
    ReadWrite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryProvider {
    pub relation: Relation,
    pub name: String,
    #[serde(default)]
    pub access: Access,
    pub env_var_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RemoteTool {
    /// Invoke another agent of the same project
    #[serde(rename_all = "camelCase")]
    AgentInvocation {
        name: String,
        target_agent: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        env_var_name: String,
    },
}

impl RemoteTool {
    pub fn name(&self) -> &str {
        match self {
            RemoteTool::AgentInvocation { name, .. } => name,
        }
    }

    pub fn target_agent(&self) -> &str {
        match self {
            RemoteTool::AgentInvocation { target_agent, .. } => target_agent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum McpProvider {
    #[serde(rename_all = "camelCase")]
    Gateway { name: String, env_var_name: String },
}

impl McpProvider {
    pub fn name(&self) -> &str {
        match self {
            McpProvider::Gateway { name, .. } => name,
        }
    }
}

pub const MIN_EXPIRY_DAYS: u32 = 7;
pub const MAX_EXPIRY_DAYS: u32 = 365;
pub const DEFAULT_EXPIRY_DAYS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    pub name: String,
    #[serde(default = "default_expiry")]
    pub event_expiry_duration: u32,
    #[serde(default)]
    pub strategies: Vec<MemoryStrategy>,
}

fn default_expiry() -> u32 {
    DEFAULT_EXPIRY_DAYS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStrategy {
    #[serde(rename = "type")]
    pub strategy_type: StrategyType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub namespaces: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyType {
    Semantic,
    Summarization,
    UserPreference,
    Custom,
}

impl StrategyType {
    pub fn default_namespaces(&self) -> Vec<String> {
        let ns = match self {
            StrategyType::Semantic => "/users/{actorId}/facts",
            StrategyType::Summarization => "/summaries/{actorId}/{sessionId}",
            StrategyType::UserPreference => "/users/{actorId}/preferences",
            StrategyType::Custom => return Vec::new(),
        };
        vec![ns.to_string()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum CredentialVariant {
    #[value(name = "api-key")]
    ApiKey,
    #[value(name = "oauth")]
    OAuth,
}

/// Project-level credential provider. `name` is qualified with the project name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub name: String,
    pub variant: CredentialVariant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub env_var_name: String,
}
