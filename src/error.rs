use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Kind of resource a command operates on. Used to build user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Project,
    Agent,
    Memory,
    Identity,
    Gateway,
    McpTool,
    Target,
}

impl ResourceKind {
    /// Identifier used in JSON output (`resourceType`)
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Project => "project",
            ResourceKind::Agent => "agent",
            ResourceKind::Memory => "memory",
            ResourceKind::Identity => "identity",
            ResourceKind::Gateway => "gateway",
            ResourceKind::McpTool => "mcp-tool",
            ResourceKind::Target => "target",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ResourceKind::Project => "Project",
            ResourceKind::Agent => "Agent",
            ResourceKind::Memory => "Memory",
            ResourceKind::Identity => "Identity",
            ResourceKind::Gateway => "Gateway",
            ResourceKind::McpTool => "MCP tool",
            ResourceKind::Target => "Deployment target",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug)]
pub enum AgentCoreError {
    #[error("{kind} '{name}' not found")]
    NotFound { kind: ResourceKind, name: String },

    #[error("{kind} '{name}' already exists")]
    Duplicate { kind: ResourceKind, name: String },

    #[error("{kind} '{name}' is already attached to agent '{agent}'")]
    AlreadyAttached {
        kind: ResourceKind,
        name: String,
        agent: String,
    },

    #[error("Agent '{0}' cannot be attached to itself")]
    SelfAttachment(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("{} is invalid: {message}\nFix the file manually and re-run the command.", path.display())]
    SchemaValidation { path: PathBuf, message: String },

    #[error("Deployment toolkit failed: {0}")]
    Toolkit(String),

    #[error("{0}")]
    PartialRemoval(String),

    #[error("Project detection failed: {0}")]
    ProjectDetection(String),

    #[error("Settings parse error: {0}")]
    SettingsParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AgentCoreError {
    pub fn not_found(kind: ResourceKind, name: impl Into<String>) -> Self {
        AgentCoreError::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn duplicate(kind: ResourceKind, name: impl Into<String>) -> Self {
        AgentCoreError::Duplicate {
            kind,
            name: name.into(),
        }
    }

    pub fn already_attached(
        kind: ResourceKind,
        name: impl Into<String>,
        agent: impl Into<String>,
    ) -> Self {
        AgentCoreError::AlreadyAttached {
            kind,
            name: name.into(),
            agent: agent.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AgentCoreError>;
